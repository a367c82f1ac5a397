//! Data Reconciler
//!
//! Turns whatever shape was stored on disk into a `PersistedDocument` with
//! every current field filled in, and computes the sorted todo view.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::document::{PersistedDocument, RawDocument, RawSection, RawTodo, StoredDocument};
use super::section::{default_sections, Section, DEFAULT_SECTION_ID};
use super::todo::Todo;

/// How the todo list is ordered for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    #[default]
    None,
    Priority,
    CreatedAt,
}

/// Normalise a document read from disk. `now` (ms) stamps todos that have
/// no creation time. A legacy array gets the default sections.
pub fn reconcile(stored: StoredDocument, now: i64) -> PersistedDocument {
    match stored {
        StoredDocument::Legacy(todos) => PersistedDocument {
            todos: fill_todos(todos, now),
            sections: default_sections(),
        },
        StoredDocument::Current(RawDocument { todos, sections }) => PersistedDocument {
            todos: fill_todos(todos.unwrap_or_default(), now),
            sections: sections.map(fill_sections).unwrap_or_else(default_sections),
        },
    }
}

/// Normalise a document handed in for saving. A legacy array is written
/// with an empty section list.
pub fn reconcile_for_save(stored: StoredDocument, now: i64) -> PersistedDocument {
    match stored {
        StoredDocument::Legacy(todos) => PersistedDocument {
            todos: fill_todos(todos, now),
            sections: Vec::new(),
        },
        current => reconcile(current, now),
    }
}

fn fill_todos(todos: Vec<RawTodo>, now: i64) -> Vec<Todo> {
    todos
        .into_iter()
        .map(|raw| Todo {
            id: raw.id,
            text: raw.text,
            description: raw.description.unwrap_or_default(),
            done: raw.done,
            priority: raw.priority,
            section: raw
                .section
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SECTION_ID.to_string()),
            created_at: raw.created_at.filter(|&t| t != 0).unwrap_or(now),
        })
        .collect()
}

fn fill_sections(sections: Vec<RawSection>) -> Vec<Section> {
    sections
        .into_iter()
        .map(|raw| Section {
            id: raw.id,
            name: raw.name,
            expanded: raw.expanded.unwrap_or(true),
        })
        .collect()
}

/// Ordered copy of `todos`. `None` keeps input order; the other methods put
/// unfinished todos first, then order by the method's key, newest/highest
/// first. Equal keys keep input order.
pub fn sorted_view(todos: &[Todo], method: SortMethod) -> Vec<Todo> {
    let mut view = todos.to_vec();
    if method == SortMethod::None {
        return view;
    }

    view.sort_by(|a, b| {
        let by_done = a.done.cmp(&b.done);
        if by_done != Ordering::Equal {
            return by_done;
        }
        match method {
            SortMethod::Priority => b.priority.rank().cmp(&a.priority.rank()),
            SortMethod::CreatedAt => b.created_at.cmp(&a.created_at),
            SortMethod::None => Ordering::Equal,
        }
    });
    view
}
