//! Window Commands
//!
//! Panel visibility and quitting, as requested from the UI.

use tauri::{AppHandle, State};
use crate::panel::PanelState;
use crate::AppState;

/// Slide the panel out
#[tauri::command]
pub async fn hide_window(state: State<'_, AppState>) -> Result<(), String> {
    state.session.controller().hide();
    Ok(())
}

/// Close button: hides, never destroys
#[tauri::command]
pub async fn close_window(state: State<'_, AppState>) -> Result<(), String> {
    state.session.controller().close();
    Ok(())
}

#[tauri::command]
pub async fn panel_state(state: State<'_, AppState>) -> Result<PanelState, String> {
    Ok(state.session.controller().state())
}

/// Release everything and exit
#[tauri::command]
pub async fn force_quit(app: AppHandle, state: State<'_, AppState>) -> Result<(), String> {
    tracing::info!("Force quit requested via IPC");
    state.session.quit(&app);
    Ok(())
}
