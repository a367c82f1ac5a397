//! Panel Layer
//!
//! The slide-in window: geometry, animation engine, lifecycle controller
//! and the session that owns every releasable resource.

mod animation;
mod controller;
mod geometry;
mod session;
mod surface;
mod window;

pub use controller::PanelState;
pub use session::PanelSession;
pub use window::{create_panel_window, MAIN_WINDOW_LABEL};
