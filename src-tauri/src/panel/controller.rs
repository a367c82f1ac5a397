//! Panel Controller
//!
//! Owns the show/hide lifecycle of the single panel window:
//!
//! ```text
//! Hidden --show--> Showing --slide done--> Visible
//! Visible --hide--> Hiding --slide done--> Hidden
//! any --destroy--> Destroyed
//! ```
//!
//! `show` is also accepted while hiding and `hide` while showing; the running
//! slide is cancelled and the new one starts from its fixed origin.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, warn};

use super::animation::{AnimationId, AnimationRegistry};
use super::geometry::PanelGeometry;
use super::surface::PanelSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Hidden,
    Showing,
    Visible,
    Hiding,
    Destroyed,
}

struct Status {
    state: PanelState,
    /// Bumped on every transition; a slide only settles its own generation
    generation: u64,
    animation: Option<AnimationId>,
}

pub struct PanelController<S: PanelSurface> {
    surface: Arc<S>,
    geometry: PanelGeometry,
    animations: Arc<AnimationRegistry>,
    status: Arc<Mutex<Status>>,
}

impl<S: PanelSurface> PanelController<S> {
    /// Controller for a window already parked at `geometry.hidden_x`
    pub fn new(surface: Arc<S>, geometry: PanelGeometry) -> Self {
        Self {
            surface,
            geometry,
            animations: Arc::new(AnimationRegistry::new()),
            status: Arc::new(Mutex::new(Status {
                state: PanelState::Hidden,
                generation: 0,
                animation: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> PanelState {
        self.lock().state
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    pub fn animations(&self) -> &Arc<AnimationRegistry> {
        &self.animations
    }

    /// Slide the panel in. Returns false when it is already (becoming) visible.
    pub fn show(&self) -> bool {
        let mut status = self.lock();
        if !matches!(status.state, PanelState::Hidden | PanelState::Hiding) {
            return false;
        }
        let generation = self.begin(&mut status, PanelState::Showing);

        if let Err(e) = self.surface.show() {
            warn!("Failed to show panel: {}", e);
        }

        let settle = Arc::clone(&self.status);
        let id = self.animations.animate(
            Arc::clone(&self.surface),
            self.geometry.hidden_x,
            self.geometry.visible_x,
            self.geometry.y,
            move || {
                let mut status = settle.lock().unwrap_or_else(|e| e.into_inner());
                if status.generation == generation {
                    status.state = PanelState::Visible;
                    status.animation = None;
                }
            },
        );
        status.animation = Some(id);
        debug!("Panel showing (animation {})", id);
        true
    }

    /// Slide the panel out and hide it. Returns false when it is already
    /// (becoming) hidden.
    pub fn hide(&self) -> bool {
        let mut status = self.lock();
        if !matches!(status.state, PanelState::Visible | PanelState::Showing) {
            return false;
        }
        let generation = self.begin(&mut status, PanelState::Hiding);

        let settle = Arc::clone(&self.status);
        let surface = Arc::clone(&self.surface);
        let id = self.animations.animate(
            Arc::clone(&self.surface),
            self.geometry.visible_x,
            self.geometry.hidden_x,
            self.geometry.y,
            move || {
                let mut status = settle.lock().unwrap_or_else(|e| e.into_inner());
                if status.generation == generation {
                    if let Err(e) = surface.hide() {
                        warn!("Failed to hide panel: {}", e);
                    }
                    status.state = PanelState::Hidden;
                    status.animation = None;
                }
            },
        );
        status.animation = Some(id);
        debug!("Panel hiding (animation {})", id);
        true
    }

    /// Window chrome close: the window is kept and only hidden
    pub fn close(&self) -> bool {
        self.hide()
    }

    pub fn toggle(&self) -> bool {
        match self.state() {
            PanelState::Visible | PanelState::Showing => self.hide(),
            PanelState::Hidden | PanelState::Hiding => self.show(),
            PanelState::Destroyed => false,
        }
    }

    /// Cancel every slide and release the window. Only the first call acts.
    pub fn destroy(&self) -> bool {
        let mut status = self.lock();
        if status.state == PanelState::Destroyed {
            return false;
        }
        self.begin(&mut status, PanelState::Destroyed);

        let cancelled = self.animations.cancel_all();
        if cancelled > 0 {
            debug!("Cancelled {} running animation(s)", cancelled);
        }
        if let Err(e) = self.surface.destroy() {
            warn!("Failed to destroy panel window: {}", e);
        }
        true
    }

    /// Enter `state`, cancelling the slide of the previous transition
    fn begin(&self, status: &mut Status, state: PanelState) -> u64 {
        if let Some(id) = status.animation.take() {
            self.animations.cancel(id);
        }
        status.state = state;
        status.generation += 1;
        status.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::surface::fake::FakeSurface;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const SETTLE: Duration = Duration::from_millis(600);

    fn controller() -> (Arc<FakeSurface>, PanelController<FakeSurface>) {
        let surface = Arc::new(FakeSurface::new());
        let ctrl = PanelController::new(surface.clone(), PanelGeometry::for_screen_width(1000));
        (surface, ctrl)
    }

    #[tokio::test]
    async fn test_show_slides_in() {
        let (surface, ctrl) = controller();
        assert_eq!(ctrl.state(), PanelState::Hidden);

        assert!(ctrl.show());
        assert_eq!(ctrl.state(), PanelState::Showing);
        assert!(surface.is_visible());

        tokio::time::sleep(SETTLE).await;
        assert_eq!(ctrl.state(), PanelState::Visible);
        assert_eq!(surface.last_x(), Some(710));
        assert!(!ctrl.show());
    }

    #[tokio::test]
    async fn test_hide_slides_out_and_hides() {
        let (surface, ctrl) = controller();
        ctrl.show();
        tokio::time::sleep(SETTLE).await;

        assert!(ctrl.hide());
        assert_eq!(ctrl.state(), PanelState::Hiding);
        tokio::time::sleep(SETTLE).await;

        assert_eq!(ctrl.state(), PanelState::Hidden);
        assert_eq!(surface.last_x(), Some(1010));
        assert!(!surface.is_visible());
        assert!(!ctrl.hide());
    }

    #[tokio::test]
    async fn test_close_behaves_like_hide() {
        let (surface, ctrl) = controller();
        ctrl.show();
        tokio::time::sleep(SETTLE).await;

        assert!(ctrl.close());
        tokio::time::sleep(SETTLE).await;
        assert_eq!(ctrl.state(), PanelState::Hidden);
        assert_eq!(surface.destroy_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_toggle_reverses_mid_flight() {
        let (surface, ctrl) = controller();
        ctrl.toggle();
        assert_eq!(ctrl.state(), PanelState::Showing);

        ctrl.toggle();
        assert_eq!(ctrl.state(), PanelState::Hiding);
        assert_eq!(ctrl.animations().live_count(), 1);

        tokio::time::sleep(SETTLE).await;
        assert_eq!(ctrl.state(), PanelState::Hidden);
        assert_eq!(surface.last_x(), Some(1010));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let (surface, ctrl) = controller();
        ctrl.show();

        assert!(ctrl.destroy());
        assert!(!ctrl.destroy());
        assert_eq!(ctrl.state(), PanelState::Destroyed);
        assert_eq!(surface.destroy_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.animations().live_count(), 0);

        assert!(!ctrl.toggle());
        assert!(!ctrl.show());
        tokio::time::sleep(SETTLE).await;
        assert_eq!(ctrl.state(), PanelState::Destroyed);
    }
}
