//! Panel Window
//!
//! Creates the frameless, always-on-top panel parked off-screen.

use tauri::{AppHandle, WebviewWindow, WebviewWindowBuilder};

use super::geometry::{PanelGeometry, FALLBACK_SCREEN_WIDTH};
use crate::config::AppConfig;

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Logical width of the primary monitor
fn screen_width(app: &AppHandle) -> i32 {
    match app.primary_monitor() {
        Ok(Some(monitor)) => {
            let size = monitor.size().to_logical::<f64>(monitor.scale_factor());
            size.width.round() as i32
        }
        _ => FALLBACK_SCREEN_WIDTH,
    }
}

pub fn create_panel_window(
    app: &AppHandle,
    config: &AppConfig,
) -> tauri::Result<(WebviewWindow, PanelGeometry)> {
    let geometry = PanelGeometry::for_screen_width(screen_width(app));

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, config.window_url())
        .title("TODO")
        .inner_size(geometry.width as f64, geometry.height as f64)
        .position(geometry.hidden_x as f64, geometry.y as f64)
        .decorations(false)
        .always_on_top(true)
        .resizable(false)
        .skip_taskbar(true)
        .visible(false)
        .build()?;

    Ok((window, geometry))
}
