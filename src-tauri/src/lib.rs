//! Slide-in TODO panel backend
//!
//! Layered architecture:
//! - domain: Todos, sections, the persisted document and its reconciliation
//! - repository: JSON file store
//! - panel: Window geometry, slide animation, lifecycle controller, session
//! - commands: Tauri command handlers
//! - tray / shortcut: Tray icon menu and global hotkeys

use std::path::PathBuf;
use tauri::{Manager, RunEvent, WindowEvent};
use tokio::sync::Mutex;

mod commands;
mod config;
mod domain;
mod panel;
mod repository;
mod shortcut;
mod tray;

use config::AppConfig;
use panel::{create_panel_window, PanelSession, MAIN_WINDOW_LABEL};
use repository::JsonFileStore;
use shortcut::HotkeyBindings;

/// Application state shared across commands
pub struct AppState {
    pub store: Mutex<JsonFileStore>,
    pub session: PanelSession,
    pub hotkeys: HotkeyBindings,
}

/// Milliseconds since the epoch, used for todo ids and creation times
pub(crate) fn now_millis() -> i64 {
    chrono::Local::now().timestamp_millis()
}

/// Get the todo file path from the install location
fn get_data_path(app_handle: &tauri::AppHandle, config: &AppConfig) -> PathBuf {
    let install_dir = app_handle.path().resource_dir().ok();
    let data_dir = app_handle.path().app_data_dir().ok();
    config.resolve_data_file(install_dir, data_dir)
}

pub fn run() {
    let config = AppConfig::from_env();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // a second launch brings the existing panel in
            if let Some(state) = app.try_state::<AppState>() {
                if !state.session.is_torn_down() {
                    state.session.controller().show();
                }
            }
        }))
        .plugin(shortcut::plugin())
        .setup(move |app| {
            let app_handle = app.handle().clone();

            // Initialize logging
            match app_handle.path().app_log_dir() {
                Ok(log_dir) => {
                    if let Err(e) = rolling_logger::init_logger(log_dir, "SlideTodo") {
                        eprintln!("Failed to init rolling logger: {}", e);
                    }
                }
                Err(e) => eprintln!("No log directory available: {}", e),
            }
            let _ = rolling_logger::info(&format!("App setup starting ({:?} mode)", config.mode));

            let data_path = get_data_path(&app_handle, &config);
            let _ = rolling_logger::info(&format!("Todo file: {}", data_path.display()));

            // parsed after the logger is up so bad hotkeys get reported
            let hotkeys = HotkeyBindings::from_config(&config);

            let (window, geometry) = create_panel_window(&app_handle, &config)?;
            let session = PanelSession::new(window, geometry);

            app.manage(AppState {
                store: Mutex::new(JsonFileStore::new(data_path)),
                session,
                hotkeys,
            });
            let state = app.state::<AppState>();

            if let Err(e) = tray::build_tray(&app_handle) {
                let _ = rolling_logger::error(&format!("Failed to create tray: {}", e));
            }

            let registered = shortcut::register_all(&app_handle, &state.hotkeys);
            if registered < state.hotkeys.all().len() {
                let _ = rolling_logger::warn("Some hotkeys could not be registered; the tray still works");
            }

            // slide in once everything is wired up
            state.session.controller().show();
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            let Some(state) = window.try_state::<AppState>() else {
                return;
            };
            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    api.prevent_close();
                    state.session.controller().close();
                }
                WindowEvent::Destroyed => state.session.window_destroyed(),
                _ => {}
            }
        })
        .invoke_handler(tauri::generate_handler![
            // Document
            commands::get_todos,
            commands::save_todos,
            commands::get_sorted_todos,
            commands::get_section_todos,
            // Todo edits
            commands::add_todo,
            commands::update_todo,
            commands::toggle_todo,
            commands::delete_todo,
            commands::move_todo,
            // Section edits
            commands::add_section,
            commands::rename_section,
            commands::toggle_section,
            commands::reorder_sections,
            commands::delete_section,
            // Window
            commands::hide_window,
            commands::close_window,
            commands::panel_state,
            commands::force_quit,
            // Diagnostics
            commands::get_recent_logs,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let RunEvent::Exit = event {
            if let Some(state) = app_handle.try_state::<AppState>() {
                state.session.teardown(app_handle);
            }
        }
    });
}
