//! Slide Animation
//!
//! A horizontal slide is a small state machine advanced one tick at a time
//! (`SlideAnimation::tick`). `drive` feeds it from a 10 ms interval and
//! writes the positions; `AnimationRegistry` spawns drives and keeps their
//! handles so every live timer can be cancelled at teardown.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tauri::async_runtime::{self, JoinHandle};
use tracing::debug;

use super::surface::PanelSurface;

pub const STEPS: u32 = 20;
pub const FRAME_INTERVAL: Duration = Duration::from_millis(10);

pub type AnimationId = u64;

/// What the driver should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Write this intermediate x
    Move(i32),
    /// Write the target x; the slide is over
    Arrive(i32),
    /// Stop without writing
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Arrived,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct SlideAnimation {
    to: i32,
    step: f64,
    current: f64,
    taken: u32,
    phase: Phase,
}

impl SlideAnimation {
    pub fn new(from: i32, to: i32) -> Self {
        Self {
            to,
            step: (to - from) as f64 / STEPS as f64,
            current: from as f64,
            taken: 0,
            phase: Phase::Running,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance one step. `target_alive` is false once the window is gone,
    /// which aborts the slide. Ticks after the slide ended yield `Abort`.
    pub fn tick(&mut self, target_alive: bool) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Abort;
        }
        if !target_alive {
            self.phase = Phase::Aborted;
            return Tick::Abort;
        }

        self.current += self.step;
        self.taken += 1;

        let reached = (self.step > 0.0 && self.current >= self.to as f64)
            || (self.step < 0.0 && self.current <= self.to as f64)
            || self.step == 0.0
            || self.taken >= STEPS;

        if reached {
            self.phase = Phase::Arrived;
            Tick::Arrive(self.to)
        } else {
            Tick::Move(self.current.round() as i32)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
}

/// Run `animation` against `surface` at row `y`, one tick per frame
pub async fn drive<S: PanelSurface + ?Sized>(
    mut animation: SlideAnimation,
    surface: &S,
    y: i32,
) -> Outcome {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    // first tick of an interval completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        match animation.tick(surface.is_alive()) {
            Tick::Move(x) => {
                if let Err(e) = surface.set_position(x, y) {
                    debug!("Animation stopped: {}", e);
                    return Outcome::Aborted;
                }
            }
            Tick::Arrive(x) => {
                return match surface.set_position(x, y) {
                    Ok(()) => Outcome::Completed,
                    Err(e) => {
                        debug!("Animation stopped at the end: {}", e);
                        Outcome::Aborted
                    }
                };
            }
            Tick::Abort => return Outcome::Aborted,
        }
    }
}

/// Live animation tasks, keyed by id
#[derive(Default)]
pub struct AnimationRegistry {
    live: Mutex<HashMap<AnimationId, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slide `surface` from `from` to `to`; `on_complete` runs once if the
    /// slide reaches its target.
    pub fn animate<S, F>(
        self: &Arc<Self>,
        surface: Arc<S>,
        from: i32,
        to: i32,
        y: i32,
        on_complete: F,
    ) -> AnimationId
    where
        S: PanelSurface + ?Sized,
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let registry = Arc::clone(self);

        // hold the lock across spawn so the task cannot unregister first
        let mut live = self.live.lock().unwrap_or_else(|e| e.into_inner());
        let handle = async_runtime::spawn(async move {
            let outcome = drive(SlideAnimation::new(from, to), surface.as_ref(), y).await;
            registry.forget(id);
            if outcome == Outcome::Completed {
                on_complete();
            }
        });
        live.insert(id, handle);
        id
    }

    fn forget(&self, id: AnimationId) {
        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Abort one animation; false if it already finished
    pub fn cancel(&self, id: AnimationId) -> bool {
        match self.live.lock().unwrap_or_else(|e| e.into_inner()).remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every live animation, returning how many were running
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<JoinHandle<()>> = self
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in &drained {
            handle.abort();
        }
        drained.len()
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::surface::fake::FakeSurface;
    use std::sync::atomic::AtomicUsize;

    fn run_to_end(anim: &mut SlideAnimation) -> Vec<Tick> {
        let mut ticks = Vec::new();
        loop {
            let t = anim.tick(true);
            ticks.push(t);
            if !matches!(t, Tick::Move(_)) {
                break;
            }
        }
        ticks
    }

    #[test]
    fn test_tick_reaches_target_exactly() {
        let mut anim = SlideAnimation::new(0, 200);
        let ticks = run_to_end(&mut anim);

        assert_eq!(ticks.len(), 20);
        assert_eq!(ticks[0], Tick::Move(10));
        assert_eq!(*ticks.last().unwrap(), Tick::Arrive(200));
        assert_eq!(anim.phase(), Phase::Arrived);
        for t in &ticks {
            if let Tick::Move(x) = t {
                assert!(*x < 200);
            }
        }
    }

    #[test]
    fn test_tick_moving_left() {
        let mut anim = SlideAnimation::new(1450, 1130);
        let ticks = run_to_end(&mut anim);
        assert_eq!(ticks[0], Tick::Move(1434));
        assert_eq!(*ticks.last().unwrap(), Tick::Arrive(1130));
        assert_eq!(ticks.len(), 20);
    }

    #[test]
    fn test_uneven_distance_never_overshoots() {
        let mut anim = SlideAnimation::new(0, 333);
        let ticks = run_to_end(&mut anim);
        assert!(ticks.len() <= 20);
        assert_eq!(*ticks.last().unwrap(), Tick::Arrive(333));
    }

    #[test]
    fn test_zero_distance_arrives_immediately() {
        let mut anim = SlideAnimation::new(50, 50);
        assert_eq!(anim.tick(true), Tick::Arrive(50));
        assert_eq!(anim.tick(true), Tick::Abort);
    }

    #[test]
    fn test_dead_target_aborts() {
        let mut anim = SlideAnimation::new(0, 200);
        anim.tick(true);
        assert_eq!(anim.tick(false), Tick::Abort);
        assert_eq!(anim.phase(), Phase::Aborted);
        assert_eq!(anim.tick(true), Tick::Abort);
    }

    #[tokio::test]
    async fn test_drive_completes_at_target() {
        let surface = FakeSurface::new();
        let outcome = drive(SlideAnimation::new(0, 200), &surface, 10).await;

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(surface.xs().len(), 20);
        assert_eq!(surface.last_x(), Some(200));
        assert!(surface.positions.lock().unwrap().iter().all(|(_, y)| *y == 10));
    }

    #[tokio::test]
    async fn test_drive_stops_when_window_dies() {
        let surface = FakeSurface::dying_after(5);
        let outcome = drive(SlideAnimation::new(0, 200), &surface, 10).await;

        assert_eq!(outcome, Outcome::Aborted);
        assert_eq!(surface.xs(), vec![10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn test_registry_runs_completion_once() {
        let registry = Arc::new(AnimationRegistry::new());
        let surface = Arc::new(FakeSurface::new());
        let completed = Arc::new(AtomicUsize::new(0));

        let counter = completed.clone();
        registry.animate(surface.clone(), 0, 200, 10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(surface.last_x(), Some(200));
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_registry_abort_skips_completion() {
        let registry = Arc::new(AnimationRegistry::new());
        let surface = Arc::new(FakeSurface::dying_after(5));
        let completed = Arc::new(AtomicUsize::new(0));

        let counter = completed.clone();
        registry.animate(surface.clone(), 0, 200, 10, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(surface.xs().len(), 5);
        assert_eq!(registry.live_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_all_stops_timers() {
        let registry = Arc::new(AnimationRegistry::new());
        let surface = Arc::new(FakeSurface::new());
        let completed = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = completed.clone();
            registry.animate(surface.clone(), 0, 200, 10, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(registry.cancel_all(), 3);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(registry.live_count(), 0);
        assert!(surface.last_x() != Some(200));
    }
}
