//! Todo Entity
//!
//! A single task inside a section of the panel.

use serde::{Deserialize, Deserializer, Serialize};
use super::entity::Entity;

/// Priority of a todo; ordering rank is high=3, medium=2, low=1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Accepts a missing, null, non-string or unknown priority as `medium`
pub(crate) fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_str().map(Priority::parse).unwrap_or_default())
}

/// Reads `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Creation timestamp in ms, unique within the list
    pub id: i64,
    pub text: String,
    pub description: String,
    pub done: bool,
    pub priority: Priority,
    /// Id of the owning section
    pub section: String,
    pub created_at: i64,
}

impl Todo {
    pub fn new(id: i64, text: String, priority: Priority, section: String) -> Self {
        Self {
            id,
            text,
            description: String::new(),
            done: false,
            priority,
            section,
            created_at: id,
        }
    }

    pub fn in_section(&self, section_id: &str) -> bool {
        self.section == section_id
    }
}

impl Entity for Todo {
    type Id = i64;
    const KIND: &'static str = "Todo";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Partial update for a todo; `None` fields are left as they are
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub text: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub section: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_creation() {
        let todo = Todo::new(1700, "Write report".to_string(), Priority::High, "today".to_string());
        assert_eq!(todo.id(), 1700);
        assert_eq!(todo.created_at, 1700);
        assert!(!todo.done);
        assert!(todo.description.is_empty());
        assert!(todo.in_section("today"));
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!(Priority::parse("high"), Priority::High);
        assert_eq!(Priority::parse("urgent"), Priority::Medium);
        assert!(Priority::High.rank() > Priority::Medium.rank());
    }

    #[test]
    fn test_todo_json_uses_camel_case() {
        let todo = Todo::new(5, "a".to_string(), Priority::Low, "later".to_string());
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["priority"], "low");
    }
}
