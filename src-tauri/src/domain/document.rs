//! Persisted Document
//!
//! The whole durable state of the panel: todos plus sections. Also the raw
//! shapes found on disk, which are normalised by `reconcile` before use.

use serde::{Deserialize, Serialize};

use super::entity::{move_index, position_of, DomainError, DomainResult};
use super::reconcile::{sorted_view, SortMethod};
use super::section::{default_sections, unique_slug, Section};
use super::todo::{lenient_priority, null_as_default, Priority, Todo, TodoPatch};

/// Normalised document; every field of every todo and section is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDocument {
    pub todos: Vec<Todo>,
    pub sections: Vec<Section>,
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            sections: default_sections(),
        }
    }
}

/// Result of a save, as returned to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
}

/// Top-level shape of the file: a bare todo array (legacy) or an object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredDocument {
    Legacy(Vec<RawTodo>),
    Current(RawDocument),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub todos: Option<Vec<RawTodo>>,
    #[serde(default)]
    pub sections: Option<Vec<RawSection>>,
}

/// A todo as written by any version of the app
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTodo {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub expanded: Option<bool>,
}

impl From<&Todo> for RawTodo {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text.clone(),
            description: Some(todo.description.clone()),
            done: todo.done,
            priority: todo.priority,
            section: Some(todo.section.clone()),
            created_at: Some(todo.created_at),
        }
    }
}

impl From<&Section> for RawSection {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            name: section.name.clone(),
            expanded: Some(section.expanded),
        }
    }
}

impl From<&PersistedDocument> for StoredDocument {
    fn from(doc: &PersistedDocument) -> Self {
        StoredDocument::Current(RawDocument {
            todos: Some(doc.todos.iter().map(RawTodo::from).collect()),
            sections: Some(doc.sections.iter().map(RawSection::from).collect()),
        })
    }
}

impl PersistedDocument {
    pub fn section(&self, id: &str) -> DomainResult<&Section> {
        position_of(&self.sections, &id.to_string()).map(|idx| &self.sections[idx])
    }

    /// Append a todo created at `now` (ms). The id is `now` unless taken.
    pub fn add_todo(
        &mut self,
        text: &str,
        priority: Priority,
        section: &str,
        now: i64,
    ) -> DomainResult<&Todo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidInput("todo text is empty".to_string()));
        }

        let mut id = now;
        if self.todos.iter().any(|t| t.id == id) {
            id = self.todos.iter().map(|t| t.id).max().unwrap_or(now) + 1;
        }

        let mut todo = Todo::new(id, text.to_string(), priority, section.to_string());
        todo.created_at = now;
        self.todos.push(todo);
        Ok(&self.todos[self.todos.len() - 1])
    }

    pub fn update_todo(&mut self, id: i64, patch: TodoPatch) -> DomainResult<&Todo> {
        let idx = position_of(&self.todos, &id)?;
        let todo = &mut self.todos[idx];

        if let Some(text) = patch.text {
            let text = text.trim();
            // blank edits keep the old text
            if !text.is_empty() {
                todo.text = text.to_string();
            }
        }
        if let Some(description) = patch.description {
            todo.description = description;
        }
        if let Some(done) = patch.done {
            todo.done = done;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(section) = patch.section {
            todo.section = section;
        }
        Ok(&self.todos[idx])
    }

    pub fn toggle_todo(&mut self, id: i64) -> DomainResult<&Todo> {
        let idx = position_of(&self.todos, &id)?;
        self.todos[idx].done = !self.todos[idx].done;
        Ok(&self.todos[idx])
    }

    pub fn delete_todo(&mut self, id: i64) -> DomainResult<Todo> {
        let idx = position_of(&self.todos, &id)?;
        Ok(self.todos.remove(idx))
    }

    /// Drag-reorder in the unsorted list
    pub fn move_todo(&mut self, from: usize, to: usize) -> DomainResult<()> {
        move_index(&mut self.todos, from, to)
    }

    pub fn add_section(&mut self, name: &str) -> DomainResult<&Section> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("section name is empty".to_string()));
        }
        let id = unique_slug(name, &self.sections);
        self.sections.push(Section::new(id, name));
        Ok(&self.sections[self.sections.len() - 1])
    }

    pub fn rename_section(&mut self, id: &str, name: &str) -> DomainResult<&Section> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("section name is empty".to_string()));
        }
        let idx = position_of(&self.sections, &id.to_string())?;
        self.sections[idx].name = name.to_string();
        Ok(&self.sections[idx])
    }

    pub fn toggle_section(&mut self, id: &str) -> DomainResult<&Section> {
        let idx = position_of(&self.sections, &id.to_string())?;
        self.sections[idx].expanded = !self.sections[idx].expanded;
        Ok(&self.sections[idx])
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) -> DomainResult<()> {
        move_index(&mut self.sections, from, to)
    }

    /// Remove a section and every todo in it. Returns the removed todos.
    pub fn delete_section(&mut self, id: &str) -> DomainResult<Vec<Todo>> {
        let idx = position_of(&self.sections, &id.to_string())?;
        self.sections.remove(idx);

        let (removed, kept): (Vec<Todo>, Vec<Todo>) = std::mem::take(&mut self.todos)
            .into_iter()
            .partition(|t| t.in_section(id));
        self.todos = kept;
        Ok(removed)
    }

    /// Sorted view of one section's todos
    pub fn section_todos(&self, section_id: &str, method: SortMethod) -> Vec<Todo> {
        let todos: Vec<Todo> = self
            .todos
            .iter()
            .filter(|t| t.in_section(section_id))
            .cloned()
            .collect();
        sorted_view(&todos, method)
    }
}
