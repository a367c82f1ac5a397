//! Panel Surface
//!
//! The window operations the controller and the animation need, so both can
//! run against a real Tauri window or an in-memory stand-in.

use std::sync::atomic::{AtomicBool, Ordering};

use tauri::{LogicalPosition, WebviewWindow};

pub trait PanelSurface: Send + Sync + 'static {
    fn set_position(&self, x: i32, y: i32) -> Result<(), String>;
    /// False once the window has been destroyed
    fn is_alive(&self) -> bool;
    fn show(&self) -> Result<(), String>;
    fn hide(&self) -> Result<(), String>;
    /// Release the window; repeated calls are no-ops
    fn destroy(&self) -> Result<(), String>;
    /// The window is already gone; later calls must not touch it
    fn mark_destroyed(&self);
}

/// The panel's webview window
pub struct TauriSurface {
    window: WebviewWindow,
    destroyed: AtomicBool,
}

impl TauriSurface {
    pub fn new(window: WebviewWindow) -> Self {
        Self {
            window,
            destroyed: AtomicBool::new(false),
        }
    }
}

impl PanelSurface for TauriSurface {
    fn set_position(&self, x: i32, y: i32) -> Result<(), String> {
        if !self.is_alive() {
            return Err("Window destroyed".to_string());
        }
        self.window
            .set_position(LogicalPosition::new(x as f64, y as f64))
            .map_err(|e| e.to_string())
    }

    fn is_alive(&self) -> bool {
        !self.destroyed.load(Ordering::SeqCst)
    }

    fn show(&self) -> Result<(), String> {
        if !self.is_alive() {
            return Err("Window destroyed".to_string());
        }
        self.window.show().map_err(|e| e.to_string())
    }

    fn hide(&self) -> Result<(), String> {
        if !self.is_alive() {
            return Ok(());
        }
        self.window.hide().map_err(|e| e.to_string())
    }

    fn destroy(&self) -> Result<(), String> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.window.destroy().map_err(|e| e.to_string())
    }

    fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::PanelSurface;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every call; dies on its own after `destroy_after` writes
    pub struct FakeSurface {
        pub positions: Mutex<Vec<(i32, i32)>>,
        pub visible: AtomicBool,
        pub destroyed: AtomicBool,
        pub destroy_calls: AtomicUsize,
        pub destroy_after: Option<usize>,
    }

    impl FakeSurface {
        pub fn new() -> Self {
            Self {
                positions: Mutex::new(Vec::new()),
                visible: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
                destroy_calls: AtomicUsize::new(0),
                destroy_after: None,
            }
        }

        pub fn dying_after(writes: usize) -> Self {
            Self {
                destroy_after: Some(writes),
                ..Self::new()
            }
        }

        pub fn xs(&self) -> Vec<i32> {
            self.positions.lock().unwrap().iter().map(|(x, _)| *x).collect()
        }

        pub fn last_x(&self) -> Option<i32> {
            self.xs().last().copied()
        }

        pub fn is_visible(&self) -> bool {
            self.visible.load(Ordering::SeqCst)
        }
    }

    impl PanelSurface for FakeSurface {
        fn set_position(&self, x: i32, y: i32) -> Result<(), String> {
            if !self.is_alive() {
                return Err("destroyed".to_string());
            }
            self.positions.lock().unwrap().push((x, y));
            Ok(())
        }

        fn is_alive(&self) -> bool {
            if self.destroyed.load(Ordering::SeqCst) {
                return false;
            }
            match self.destroy_after {
                Some(n) => self.positions.lock().unwrap().len() < n,
                None => true,
            }
        }

        fn show(&self) -> Result<(), String> {
            self.visible.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn hide(&self) -> Result<(), String> {
            self.visible.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn destroy(&self) -> Result<(), String> {
            self.destroy_calls.fetch_add(1, Ordering::SeqCst);
            self.destroyed.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn mark_destroyed(&self) {
            self.destroyed.store(true, Ordering::SeqCst);
        }
    }
}
