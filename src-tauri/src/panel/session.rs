//! Panel Session
//!
//! Everything the running app has to release on the way out: the window
//! (through its controller and live animations), the tray icon and the
//! registered hotkeys. Teardown runs once no matter how many exit paths
//! reach it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tauri::{AppHandle, WebviewWindow};
use tauri_plugin_global_shortcut::GlobalShortcutExt;
use tracing::{info, warn};

use super::controller::PanelController;
use super::geometry::PanelGeometry;
use super::surface::{PanelSurface, TauriSurface};
use crate::tray::TRAY_ID;

/// App-wide resources released at teardown, outside the panel window
pub trait AppShell {
    fn unregister_hotkeys(&self) -> Result<(), String>;
    /// False when there was no tray to remove
    fn remove_tray(&self) -> bool;
    fn exit(&self, code: i32);
}

impl AppShell for AppHandle {
    fn unregister_hotkeys(&self) -> Result<(), String> {
        self.global_shortcut().unregister_all().map_err(|e| e.to_string())
    }

    fn remove_tray(&self) -> bool {
        self.remove_tray_by_id(TRAY_ID).is_some()
    }

    fn exit(&self, code: i32) {
        AppHandle::exit(self, code)
    }
}

pub struct PanelSession<S: PanelSurface = TauriSurface> {
    controller: PanelController<S>,
    torn_down: AtomicBool,
}

impl PanelSession<TauriSurface> {
    pub fn new(window: WebviewWindow, geometry: PanelGeometry) -> Self {
        Self::with_controller(PanelController::new(Arc::new(TauriSurface::new(window)), geometry))
    }
}

impl<S: PanelSurface> PanelSession<S> {
    pub fn with_controller(controller: PanelController<S>) -> Self {
        Self {
            controller,
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn controller(&self) -> &PanelController<S> {
        &self.controller
    }

    /// The window went away underneath us (OS or framework initiated)
    pub fn window_destroyed(&self) {
        self.controller.surface().mark_destroyed();
        if self.controller.destroy() {
            info!("Panel window destroyed externally");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Release animations, hotkeys, tray and window. False if already done.
    pub fn teardown<A: AppShell + ?Sized>(&self, shell: &A) -> bool {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("Tearing down panel session");

        let cancelled = self.controller.animations().cancel_all();
        info!("Cleared {} animation(s)", cancelled);

        if let Err(e) = shell.unregister_hotkeys() {
            warn!("Failed to unregister hotkeys: {}", e);
        }

        if !shell.remove_tray() {
            warn!("No tray icon to remove");
        }

        self.controller.destroy();
        info!("Cleanup complete");
        true
    }

    /// Full teardown followed by process exit
    pub fn quit<A: AppShell + ?Sized>(&self, shell: &A) {
        self.teardown(shell);
        shell.exit(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::controller::PanelState;
    use crate::panel::surface::fake::FakeSurface;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeShell {
        unregisters: AtomicUsize,
        tray_removals: AtomicUsize,
        exits: Mutex<Vec<i32>>,
    }

    impl AppShell for FakeShell {
        fn unregister_hotkeys(&self) -> Result<(), String> {
            self.unregisters.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn remove_tray(&self) -> bool {
            self.tray_removals.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn exit(&self, code: i32) {
            self.exits.lock().unwrap().push(code);
        }
    }

    fn session() -> (Arc<FakeSurface>, PanelSession<FakeSurface>) {
        let surface = Arc::new(FakeSurface::new());
        let controller = PanelController::new(surface.clone(), PanelGeometry::for_screen_width(1000));
        (surface, PanelSession::with_controller(controller))
    }

    #[tokio::test]
    async fn test_teardown_releases_each_resource_once() {
        let (surface, session) = session();
        let shell = FakeShell::default();
        session.controller().show();
        assert_eq!(session.controller().animations().live_count(), 1);

        assert!(session.teardown(&shell));
        assert!(!session.teardown(&shell));

        assert!(session.is_torn_down());
        assert_eq!(session.controller().animations().live_count(), 0);
        assert_eq!(shell.unregisters.load(Ordering::SeqCst), 1);
        assert_eq!(shell.tray_removals.load(Ordering::SeqCst), 1);
        assert_eq!(surface.destroy_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.controller().state(), PanelState::Destroyed);

        let before = surface.xs().len();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(surface.xs().len(), before);
    }

    #[tokio::test]
    async fn test_every_exit_path_shares_one_teardown() {
        let (surface, session) = session();
        let shell = FakeShell::default();

        // tray Quit, then quit hotkey, then the runtime's exit event
        session.quit(&shell);
        session.quit(&shell);
        session.teardown(&shell);

        assert_eq!(shell.unregisters.load(Ordering::SeqCst), 1);
        assert_eq!(shell.tray_removals.load(Ordering::SeqCst), 1);
        assert_eq!(surface.destroy_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*shell.exits.lock().unwrap(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_external_window_destroy_settles_state() {
        let (surface, session) = session();
        session.controller().show();

        session.window_destroyed();
        assert_eq!(session.controller().state(), PanelState::Destroyed);
        assert_eq!(session.controller().animations().live_count(), 0);

        assert!(!session.controller().toggle());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(session.controller().state(), PanelState::Destroyed);

        // teardown later still releases the app resources, not the window again
        let shell = FakeShell::default();
        assert!(session.teardown(&shell));
        assert_eq!(shell.unregisters.load(Ordering::SeqCst), 1);
        assert_eq!(surface.destroy_calls.load(Ordering::SeqCst), 1);
    }
}
