//! Tray Icon
//!
//! Tray icon with the panel menu. The icon degrades through a chain of
//! sources so the tray always exists, even with no icon files installed.

use std::path::{Path, PathBuf};

use base64::Engine;
use tauri::image::Image;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager};
use tracing::{info, warn};

use crate::AppState;

pub const TRAY_ID: &str = "main-tray";
pub const HOMEPAGE_URL: &str = "https://github.com/omergorenn/todo-electron";

/// 16x16 check-box glyph used when no icon file can be read
const EMBEDDED_ICON_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAAT0lEQVR42mNgoAawsbH5Tw5GMYAcSwfOAKWjceR7AaSZbBfANOM0AFkBPs14XYDNEGxieL2ArAGXqwiGAUgjPi8RFYgUG0DflEhRZqIEAAADHnONnicHOAAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Show,
    Hide,
    Homepage,
    Quit,
}

impl TrayAction {
    pub const ALL: [TrayAction; 4] = [TrayAction::Show, TrayAction::Hide, TrayAction::Homepage, TrayAction::Quit];

    pub fn id(&self) -> &'static str {
        match self {
            TrayAction::Show => "show",
            TrayAction::Hide => "hide",
            TrayAction::Homepage => "homepage",
            TrayAction::Quit => "quit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrayAction::Show => "Show TODO Panel",
            TrayAction::Hide => "Hide TODO Panel",
            TrayAction::Homepage => "View on GitHub",
            TrayAction::Quit => "Quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }
}

/// Where the tray icon ended up coming from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Platform(PathBuf),
    Fallback(PathBuf),
    Embedded,
    Empty,
}

fn platform_icon_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "trayIconTemplate.png"
    } else {
        "trayIcon.png"
    }
}

fn icon_from_file(path: &Path) -> Result<Image<'static>, String> {
    if !path.exists() {
        return Err(format!("Icon file not found at: {}", path.display()));
    }
    let image = Image::from_path(path).map_err(|e| e.to_string())?;
    if image.width() == 0 || image.height() == 0 {
        return Err(format!("Icon at {} is empty", path.display()));
    }
    Ok(image.to_owned())
}

fn embedded_icon() -> Result<Image<'static>, String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(EMBEDDED_ICON_PNG)
        .map_err(|e| e.to_string())?;
    Image::from_bytes(&bytes)
        .map(|image| image.to_owned())
        .map_err(|e| e.to_string())
}

/// Platform icon, then fallback icon (both under `resource_dir`), then the
/// embedded image, then a transparent pixel. Each failure is logged.
pub fn load_tray_icon(resource_dir: Option<&Path>) -> (Image<'static>, IconSource) {
    if let Some(dir) = resource_dir {
        let primary = dir.join(platform_icon_name());
        match icon_from_file(&primary) {
            Ok(image) => return (image, IconSource::Platform(primary)),
            Err(e) => warn!("Failed with custom icon: {}", e),
        }

        let fallback = dir.join("fallbackIcon.png");
        match icon_from_file(&fallback) {
            Ok(image) => return (image, IconSource::Fallback(fallback)),
            Err(e) => warn!("Failed with fallback icon: {}", e),
        }
    }

    match embedded_icon() {
        Ok(image) => (image, IconSource::Embedded),
        Err(e) => {
            warn!("Even the embedded icon failed: {}", e);
            (Image::new_owned(vec![0, 0, 0, 0], 1, 1), IconSource::Empty)
        }
    }
}

/// Build the tray icon and its menu
pub fn build_tray(app: &AppHandle) -> tauri::Result<TrayIcon> {
    let resource_dir = app.path().resource_dir().ok().map(|d| d.join("resources"));
    let (icon, source) = load_tray_icon(resource_dir.as_deref());
    info!("Tray icon source: {:?}", source);

    let item = |action: TrayAction| MenuItem::with_id(app, action.id(), action.label(), true, None::<&str>);
    let show = item(TrayAction::Show)?;
    let hide = item(TrayAction::Hide)?;
    let homepage = item(TrayAction::Homepage)?;
    let quit = item(TrayAction::Quit)?;
    let separator_a = PredefinedMenuItem::separator(app)?;
    let separator_b = PredefinedMenuItem::separator(app)?;
    let menu = Menu::with_items(app, &[&show, &hide, &separator_a, &homepage, &separator_b, &quit])?;

    TrayIconBuilder::with_id(TRAY_ID)
        .icon(icon)
        .icon_as_template(cfg!(target_os = "macos"))
        .tooltip("TODO App")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            if let Some(action) = TrayAction::from_id(event.id.as_ref()) {
                handle_action(app, action);
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                if let Some(state) = tray.app_handle().try_state::<AppState>() {
                    state.session.controller().toggle();
                }
            }
        })
        .build(app)
}

fn handle_action(app: &AppHandle, action: TrayAction) {
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };

    match action {
        TrayAction::Show => {
            state.session.controller().show();
        }
        TrayAction::Hide => {
            state.session.controller().hide();
        }
        TrayAction::Homepage => {
            if let Err(e) = open::that(HOMEPAGE_URL) {
                warn!("Failed to open {}: {}", HOMEPAGE_URL, e);
            }
        }
        TrayAction::Quit => {
            info!("Quit menu item clicked");
            state.session.quit(app);
        }
    }
}
