//! Tauri Commands for the todo document
//!
//! `get_todos` and `save_todos` hand the whole document across IPC. The
//! remaining commands apply one edit on the backend: load, change, save,
//! and return the new document.

use tauri::State;

use crate::domain::{
    sorted_view, DomainResult, PersistedDocument, Priority, SaveResult, SortMethod, StoredDocument, Todo,
    TodoPatch, DEFAULT_SECTION_ID,
};
use crate::repository::{DocumentStore, JsonFileStore};
use crate::AppState;

/// Load, apply `edit`, save. The store lock is held throughout.
async fn edit_document<F>(state: &AppState, edit: F) -> Result<PersistedDocument, String>
where
    F: FnOnce(&mut PersistedDocument) -> DomainResult<()>,
{
    let store = state.store.lock().await;
    apply_edit(&store, edit)
}

fn apply_edit<F>(store: &JsonFileStore, edit: F) -> Result<PersistedDocument, String>
where
    F: FnOnce(&mut PersistedDocument) -> DomainResult<()>,
{
    let mut doc = store.load();
    edit(&mut doc).map_err(|e| e.to_string())?;
    if !store.save(&doc).success {
        return Err("Failed to save todos".to_string());
    }
    Ok(doc)
}

/// Read the whole document
#[tauri::command]
pub async fn get_todos(state: State<'_, AppState>) -> Result<PersistedDocument, String> {
    let store = state.store.lock().await;
    Ok(store.load())
}

/// Overwrite the whole document (object or legacy array)
#[tauri::command]
pub async fn save_todos(state: State<'_, AppState>, data: StoredDocument) -> Result<SaveResult, String> {
    let store = state.store.lock().await;
    Ok(store.save_stored(data))
}

/// All todos in display order
#[tauri::command]
pub async fn get_sorted_todos(state: State<'_, AppState>, method: SortMethod) -> Result<Vec<Todo>, String> {
    let store = state.store.lock().await;
    Ok(sorted_view(&store.load().todos, method))
}

/// One section's todos in display order
#[tauri::command]
pub async fn get_section_todos(
    state: State<'_, AppState>,
    section: String,
    method: SortMethod,
) -> Result<Vec<Todo>, String> {
    let store = state.store.lock().await;
    let doc = store.load();
    doc.section(&section).map_err(|e| e.to_string())?;
    Ok(doc.section_todos(&section, method))
}

#[tauri::command]
pub async fn add_todo(
    state: State<'_, AppState>,
    text: String,
    priority: Option<Priority>,
    section: Option<String>,
) -> Result<PersistedDocument, String> {
    let now = crate::now_millis();
    let section = section.unwrap_or_else(|| DEFAULT_SECTION_ID.to_string());
    edit_document(&state, |doc| {
        doc.add_todo(&text, priority.unwrap_or_default(), &section, now).map(|_| ())
    })
    .await
}

#[tauri::command]
pub async fn update_todo(
    state: State<'_, AppState>,
    id: i64,
    patch: TodoPatch,
) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.update_todo(id, patch).map(|_| ())).await
}

#[tauri::command]
pub async fn toggle_todo(state: State<'_, AppState>, id: i64) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.toggle_todo(id).map(|_| ())).await
}

#[tauri::command]
pub async fn delete_todo(state: State<'_, AppState>, id: i64) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.delete_todo(id).map(|_| ())).await
}

/// Drag-reorder a todo
#[tauri::command]
pub async fn move_todo(state: State<'_, AppState>, from: usize, to: usize) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.move_todo(from, to)).await
}

#[tauri::command]
pub async fn add_section(state: State<'_, AppState>, name: String) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.add_section(&name).map(|_| ())).await
}

#[tauri::command]
pub async fn rename_section(
    state: State<'_, AppState>,
    id: String,
    name: String,
) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.rename_section(&id, &name).map(|_| ())).await
}

/// Collapse or expand a section
#[tauri::command]
pub async fn toggle_section(state: State<'_, AppState>, id: String) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.toggle_section(&id).map(|_| ())).await
}

#[tauri::command]
pub async fn reorder_sections(
    state: State<'_, AppState>,
    from: usize,
    to: usize,
) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.reorder_sections(from, to)).await
}

/// Delete a section together with all of its todos
#[tauri::command]
pub async fn delete_section(state: State<'_, AppState>, id: String) -> Result<PersistedDocument, String> {
    edit_document(&state, |doc| doc.delete_section(&id).map(|_| ())).await
}
