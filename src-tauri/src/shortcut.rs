//! Global Hotkeys
//!
//! One hotkey toggles the panel, an optional second one quits. A hotkey
//! that fails to parse or register is logged and skipped; the tray still
//! reaches the panel.

use tauri::plugin::TauriPlugin;
use tauri::{AppHandle, Manager, Wry};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Toggle,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct HotkeyBindings {
    pub toggle: Option<Shortcut>,
    pub quit: Option<Shortcut>,
}

fn parse_shortcut(what: &str, raw: &str) -> Option<Shortcut> {
    match raw.trim().parse::<Shortcut>() {
        Ok(shortcut) => Some(shortcut),
        Err(e) => {
            warn!("Ignoring {} hotkey {:?}: {}", what, raw, e);
            None
        }
    }
}

impl HotkeyBindings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            toggle: parse_shortcut("toggle", &config.toggle_hotkey),
            quit: config.quit_hotkey.as_deref().and_then(|raw| parse_shortcut("quit", raw)),
        }
    }

    pub fn action_for(&self, shortcut: &Shortcut) -> Option<HotkeyAction> {
        if self.toggle.as_ref() == Some(shortcut) {
            Some(HotkeyAction::Toggle)
        } else if self.quit.as_ref() == Some(shortcut) {
            Some(HotkeyAction::Quit)
        } else {
            None
        }
    }

    pub fn all(&self) -> Vec<Shortcut> {
        self.toggle.iter().chain(self.quit.iter()).copied().collect()
    }
}

/// Action for a key event; only presses of a bound hotkey count
pub fn action_for_event(
    bindings: &HotkeyBindings,
    shortcut: &Shortcut,
    key_state: ShortcutState,
) -> Option<HotkeyAction> {
    if key_state != ShortcutState::Pressed {
        return None;
    }
    bindings.action_for(shortcut)
}

/// Plugin whose handler dispatches the bindings held in `AppState`
pub fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_global_shortcut::Builder::new()
        .with_handler(|app, shortcut, event| {
            // nothing is bound until setup has managed the state
            let Some(state) = app.try_state::<AppState>() else {
                return;
            };
            let Some(action) = action_for_event(&state.hotkeys, shortcut, event.state) else {
                return;
            };
            match action {
                HotkeyAction::Toggle => {
                    state.session.controller().toggle();
                }
                HotkeyAction::Quit => {
                    info!("Quit shortcut pressed");
                    state.session.quit(app);
                }
            }
        })
        .build()
}

/// Register every bound hotkey; returns how many succeeded
pub fn register_all(app: &AppHandle, bindings: &HotkeyBindings) -> usize {
    let mut registered = 0;
    for shortcut in bindings.all() {
        match app.global_shortcut().register(shortcut) {
            Ok(()) => {
                info!("Registered hotkey {:?}", shortcut);
                registered += 1;
            }
            Err(e) => warn!("Failed to register hotkey {:?}: {}", shortcut, e),
        }
    }
    registered
}
