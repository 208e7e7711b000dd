//! Playback Controller
//!
//! Replays a recorded trace against the display array on a timer. Every
//! event gets its own task on a single-threaded [`LocalSet`], sleeping until
//! `k * delay` after start. The whole schedule is laid out once when
//! playback starts.
//!
//! ## Cancellation
//!
//! The session keeps a map from handle id to the task's [`JoinHandle`].
//! `reset()`, completion and teardown abort every live handle and clear the
//! map, so a task from an older trace can never write into a newer array.
//!
//! ## Ordering
//!
//! A task applies every not-yet-applied event up to and including its own
//! index. If two wake-ups are delivered out of order, the later index
//! applies both and the earlier one finds nothing left to do.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::{JoinHandle, LocalSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::algorithm::Algorithm;
use crate::config::{random_array, VisualizerConfig};
use crate::error::{PlaybackError, PlaybackResult};
use crate::event::{AnimationEvent, Trace};
use crate::recorder;
use crate::render::{Frame, Highlight, Renderer};

/// Lifecycle of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStatus {
    Idle,
    Running,
    Completed,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

type HandleId = u64;

/// State shared between the controller and its scheduled tasks.
struct Session {
    display: Vec<u32>,
    highlights: Vec<Highlight>,
    trace: Trace,
    cursor: usize,
    status: PlaybackStatus,
    handles: HashMap<HandleId, JoinHandle<()>>,
    next_handle: HandleId,
    renderer: Option<Renderer>,
    status_tx: watch::Sender<PlaybackStatus>,
}

impl Session {
    fn set_status(&mut self, status: PlaybackStatus) {
        self.status = status;
        self.status_tx.send_replace(status);
    }

    /// Abort every outstanding task. Returns how many were live.
    fn cancel_pending(&mut self) -> usize {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        count
    }

    fn apply(&mut self, event: AnimationEvent) {
        self.highlights.fill(Highlight::Idle);
        event.apply(&mut self.display);

        let (marked, highlight) = match event {
            AnimationEvent::Compare { i, j } => ([Some(i), Some(j)], Highlight::Compared),
            AnimationEvent::Swap { i, j } => ([Some(i), Some(j)], Highlight::Swapped),
            AnimationEvent::Write { index, .. } => ([Some(index), None], Highlight::Swapped),
        };
        for idx in marked.into_iter().flatten() {
            if let Some(slot) = self.highlights.get_mut(idx) {
                *slot = highlight;
            }
        }
    }

    /// Apply events up to and including `index`, completing the session if
    /// the trace is exhausted.
    fn advance_to(&mut self, index: usize) {
        if self.cursor > index {
            return;
        }
        while self.cursor <= index {
            let Some(&event) = self.trace.get(self.cursor) else {
                break;
            };
            self.apply(event);
            self.cursor += 1;
        }

        if self.cursor >= self.trace.len() {
            self.complete();
        }
        self.render();
    }

    fn complete(&mut self) {
        let stragglers = self.cancel_pending();
        self.highlights.fill(Highlight::Idle);
        self.set_status(PlaybackStatus::Completed);
        info!(
            events = self.trace.len(),
            stragglers, "playback completed"
        );
    }

    fn render(&mut self) {
        let Session {
            display,
            highlights,
            status,
            renderer,
            ..
        } = self;
        if let Some(renderer) = renderer.as_mut() {
            renderer(&Frame {
                values: display,
                highlights,
                completed: *status == PlaybackStatus::Completed,
            });
        }
    }
}

/// Owns one playback session and the [`LocalSet`] its event tasks live on.
///
/// Nothing is applied unless one of the `run_*` methods is being awaited.
pub struct PlaybackController {
    config: VisualizerConfig,
    rng: StdRng,
    session: Rc<RefCell<Session>>,
    status_rx: watch::Receiver<PlaybackStatus>,
    local: LocalSet,
}

impl PlaybackController {
    /// Create an idle controller showing a fresh random array.
    pub fn new(config: VisualizerConfig) -> Self {
        let mut rng = config.rng();
        let display = random_array(config.size(), &mut rng);
        Self::build(config, rng, display)
    }

    /// Create an idle controller showing `values` instead of a random array.
    ///
    /// The next `reset()` goes back to random arrays of the configured size.
    pub fn with_display(config: VisualizerConfig, values: Vec<u32>) -> Self {
        let rng = config.rng();
        Self::build(config, rng, values)
    }

    fn build(config: VisualizerConfig, rng: StdRng, display: Vec<u32>) -> Self {
        let (status_tx, status_rx) = watch::channel(PlaybackStatus::Idle);
        let session = Session {
            highlights: vec![Highlight::Idle; display.len()],
            display,
            trace: Vec::new(),
            cursor: 0,
            status: PlaybackStatus::Idle,
            handles: HashMap::new(),
            next_handle: 0,
            renderer: None,
            status_tx,
        };

        PlaybackController {
            config,
            rng,
            session: Rc::new(RefCell::new(session)),
            status_rx,
            local: LocalSet::new(),
        }
    }

    /// Install the callback that receives a frame after every visible change.
    pub fn set_renderer<F>(&mut self, renderer: F)
    where
        F: FnMut(&Frame<'_>) + 'static,
    {
        let mut session = self.session.borrow_mut();
        session.renderer = Some(Box::new(renderer));
        session.render();
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn status(&self) -> PlaybackStatus {
        self.session.borrow().status
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status_rx.clone()
    }

    pub fn display(&self) -> Vec<u32> {
        self.session.borrow().display.clone()
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        self.session.borrow().highlights.clone()
    }

    /// Number of events applied from the current trace.
    pub fn cursor(&self) -> usize {
        self.session.borrow().cursor
    }

    pub fn trace_len(&self) -> usize {
        self.session.borrow().trace.len()
    }

    /// Number of scheduled event tasks that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.session.borrow().handles.len()
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) -> PlaybackResult<()> {
        self.ensure_not_running("algorithm")?;
        self.config.set_algorithm(algorithm);
        Ok(())
    }

    /// Change playback speed (clamped to 1..=100).
    pub fn set_speed(&mut self, speed: u32) -> PlaybackResult<()> {
        self.ensure_not_running("speed")?;
        self.config.set_speed(speed);
        Ok(())
    }

    /// Change the array size (clamped to 5..=50) and regenerate the array.
    pub fn set_size(&mut self, size: usize) -> PlaybackResult<()> {
        self.ensure_not_running("array size")?;
        self.config.set_size(size);
        self.reset();
        Ok(())
    }

    fn ensure_not_running(&self, setting: &'static str) -> PlaybackResult<()> {
        if self.status() == PlaybackStatus::Running {
            warn!(setting, "control change rejected while running");
            return Err(PlaybackError::Busy { setting });
        }
        Ok(())
    }

    /// Record the configured algorithm on the displayed array and start playback.
    ///
    /// From `Completed` this resets to a fresh random array first.
    pub fn sort(&mut self) -> PlaybackResult<()> {
        match self.status() {
            PlaybackStatus::Running => {
                return Err(PlaybackError::InvalidTransition {
                    from: PlaybackStatus::Running,
                });
            }
            PlaybackStatus::Completed => self.reset(),
            PlaybackStatus::Idle => {}
        }

        let snapshot = self.display();
        let trace = recorder::record(&snapshot, self.config.algorithm());
        self.start(trace)
    }

    /// Schedule `trace` against the display array. Only valid from `Idle`.
    ///
    /// Event `k` is applied `k * delay` after this call. An empty trace
    /// completes immediately.
    pub fn start(&mut self, trace: Trace) -> PlaybackResult<()> {
        let mut session = self.session.borrow_mut();
        if session.status != PlaybackStatus::Idle {
            return Err(PlaybackError::InvalidTransition {
                from: session.status,
            });
        }

        session.trace = trace;
        session.cursor = 0;

        if session.trace.is_empty() {
            session.complete();
            session.render();
            return Ok(());
        }

        let delay = self.config.delay();
        let base = Instant::now();
        session.set_status(PlaybackStatus::Running);

        for index in 0..session.trace.len() {
            let id = session.next_handle;
            session.next_handle += 1;

            let offset = delay.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            let deadline = base + offset;
            let shared = Rc::clone(&self.session);
            let handle = self.local.spawn_local(async move {
                tokio::time::sleep_until(deadline).await;
                let mut session = shared.borrow_mut();
                session.handles.remove(&id);
                session.advance_to(index);
            });
            session.handles.insert(id, handle);
        }

        info!(
            algorithm = %self.config.algorithm(),
            events = session.trace.len(),
            delay_ms = delay.as_millis() as u64,
            "playback started"
        );
        Ok(())
    }

    /// Cancel all scheduled work, draw a fresh random array and return to `Idle`.
    ///
    /// Safe from any status.
    pub fn reset(&mut self) {
        let mut session = self.session.borrow_mut();
        let cancelled = session.cancel_pending();

        session.trace.clear();
        session.cursor = 0;
        session.display = random_array(self.config.size(), &mut self.rng);
        session.highlights = vec![Highlight::Idle; session.display.len()];
        session.set_status(PlaybackStatus::Idle);
        session.render();

        debug!(cancelled, size = self.config.size(), "reset display array");
    }

    /// Drive scheduled tasks until `future` resolves.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.run_until(future).await
    }

    /// Drive scheduled tasks for `duration` of (possibly paused) tokio time.
    pub async fn run_for(&self, duration: Duration) {
        self.run_until(tokio::time::sleep(duration)).await;
    }

    /// Drive scheduled tasks until the session is no longer `Running`.
    pub async fn run_until_settled(&self) -> PlaybackStatus {
        let mut status_rx = self.status_rx.clone();
        self.run_until(async move {
            let settled = status_rx
                .wait_for(|status| *status != PlaybackStatus::Running)
                .await
                .map(|status| *status);
            // The sender lives in the session, which outlives this call.
            settled.unwrap_or(PlaybackStatus::Idle)
        })
        .await
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            let cancelled = session.cancel_pending();
            if cancelled > 0 {
                debug!(cancelled, "dropped controller with pending events");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_VALUE, MIN_VALUE};
    use crate::recorder::is_sorted;

    /// 10 ms between events.
    const SPEED_10MS: u32 = 91;

    fn controller(values: &[u32], algorithm: Algorithm) -> PlaybackController {
        let config = VisualizerConfig::default()
            .with_algorithm(algorithm)
            .with_speed(SPEED_10MS)
            .with_seed(Some(11));
        PlaybackController::with_display(config, values.to_vec())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_controller_is_idle() {
        let c = PlaybackController::new(VisualizerConfig::default().with_seed(Some(3)));
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.display().len(), 20);
        assert!(c
            .display()
            .iter()
            .all(|v| (MIN_VALUE..=MAX_VALUE).contains(v)));
        assert_eq!(c.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_golden_bubble_playback() {
        let mut c = controller(&[5, 3, 8, 1], Algorithm::Bubble);
        c.sort().unwrap();
        assert_eq!(c.status(), PlaybackStatus::Running);
        assert_eq!(c.trace_len(), 10);
        assert_eq!(c.pending(), 10);

        // Events at 0 ms (compare) and 10 ms (swap) have run.
        c.run_for(ms(15)).await;
        assert_eq!(c.cursor(), 2);
        assert_eq!(c.display(), vec![3, 5, 8, 1]);
        assert_eq!(c.pending(), 8);

        assert_eq!(c.run_until_settled().await, PlaybackStatus::Completed);
        assert_eq!(c.display(), vec![1, 3, 5, 8]);
        assert_eq!(c.cursor(), 10);
        assert_eq!(c.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_fixed_cadence() {
        let mut c = controller(&[9, 8, 7, 6, 5], Algorithm::Quick);
        c.sort().unwrap();

        c.run_for(ms(35)).await;
        assert_eq!(c.cursor(), 4);
        c.run_for(ms(10)).await;
        assert_eq!(c.cursor(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compare_only_highlights() {
        let mut c = controller(&[5, 3, 8, 1], Algorithm::Bubble);
        c.sort().unwrap();
        c.run_for(ms(5)).await;

        assert_eq!(c.display(), vec![5, 3, 8, 1]);
        assert_eq!(
            c.highlights(),
            vec![
                Highlight::Compared,
                Highlight::Compared,
                Highlight::Idle,
                Highlight::Idle
            ]
        );

        c.run_for(ms(10)).await;
        assert_eq!(c.highlights()[..2], [Highlight::Swapped, Highlight::Swapped]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_and_quick_playback_sorts() {
        for algorithm in [Algorithm::Merge, Algorithm::Quick] {
            let mut c = controller(&[44, 9, 100, 5, 71, 71, 23, 8], algorithm);
            c.sort().unwrap();
            assert_eq!(c.run_until_settled().await, PlaybackStatus::Completed);
            assert_eq!(c.display(), vec![5, 8, 9, 23, 44, 71, 71, 100]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_single_complete_immediately() {
        for values in [vec![], vec![42]] {
            let mut c = controller(&values, Algorithm::Merge);
            c.sort().unwrap();
            assert_eq!(c.status(), PlaybackStatus::Completed);
            assert_eq!(c.pending(), 0);
            assert_eq!(c.display(), values);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_run_cancels_everything() {
        let mut c = controller(&[50, 40, 30, 20, 10], Algorithm::Bubble);
        c.sort().unwrap();
        c.run_for(ms(25)).await;
        assert!(c.cursor() > 0);

        c.reset();
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.pending(), 0);
        assert_eq!(c.cursor(), 0);
        assert_eq!(c.trace_len(), 0);

        let fresh = c.display();
        assert_eq!(fresh.len(), c.config().size());

        // Well past where the old schedule would have ended.
        c.run_for(ms(1_000)).await;
        assert_eq!(c.display(), fresh);
        assert_eq!(c.status(), PlaybackStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_stale_events_after_reset_and_restart() {
        let mut c = controller(&[50, 40, 30, 20, 10], Algorithm::Quick);
        c.sort().unwrap();
        c.run_for(ms(15)).await;

        c.reset();
        let fresh = c.display();
        c.sort().unwrap();
        let events = c.trace_len();

        assert_eq!(c.run_until_settled().await, PlaybackStatus::Completed);
        assert_eq!(c.cursor(), events);

        let mut expected = fresh;
        expected.sort_unstable();
        assert_eq!(c.display(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_from_every_status() {
        let mut c = controller(&[3, 2, 1], Algorithm::Bubble);

        c.reset();
        assert_eq!(c.status(), PlaybackStatus::Idle);

        c.sort().unwrap();
        c.reset();
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.pending(), 0);

        c.sort().unwrap();
        c.run_until_settled().await;
        assert_eq!(c.status(), PlaybackStatus::Completed);
        c.reset();
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_idle() {
        let mut c = controller(&[2, 1], Algorithm::Bubble);
        c.sort().unwrap();
        assert_eq!(
            c.start(Vec::new()),
            Err(PlaybackError::InvalidTransition {
                from: PlaybackStatus::Running
            })
        );
        assert_eq!(
            c.sort(),
            Err(PlaybackError::InvalidTransition {
                from: PlaybackStatus::Running
            })
        );

        c.run_until_settled().await;
        assert_eq!(
            c.start(vec![AnimationEvent::Swap { i: 0, j: 1 }]),
            Err(PlaybackError::InvalidTransition {
                from: PlaybackStatus::Completed
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_after_completion_uses_fresh_array() {
        let mut c = controller(&[2, 1], Algorithm::Merge);
        c.sort().unwrap();
        c.run_until_settled().await;

        c.sort().unwrap();
        assert_eq!(c.display().len(), c.config().size());
        assert_eq!(c.run_until_settled().await, PlaybackStatus::Completed);
        assert!(is_sorted(&c.display()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_locked_while_running() {
        let mut c = controller(&[4, 3, 2, 1], Algorithm::Bubble);
        c.sort().unwrap();

        assert_eq!(c.set_speed(10), Err(PlaybackError::Busy { setting: "speed" }));
        assert_eq!(
            c.set_size(30),
            Err(PlaybackError::Busy {
                setting: "array size"
            })
        );
        assert_eq!(
            c.select_algorithm(Algorithm::Quick),
            Err(PlaybackError::Busy {
                setting: "algorithm"
            })
        );
        assert_eq!(c.config().speed(), SPEED_10MS);

        c.run_until_settled().await;
        c.set_speed(100).unwrap();
        c.select_algorithm(Algorithm::Quick).unwrap();
        assert_eq!(c.config().delay(), ms(1));
        assert_eq!(c.config().algorithm(), Algorithm::Quick);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_size_regenerates_and_resets() {
        let mut c = controller(&[4, 3, 2, 1], Algorithm::Bubble);
        c.set_size(33).unwrap();
        assert_eq!(c.display().len(), 33);
        assert_eq!(c.status(), PlaybackStatus::Idle);

        c.set_size(2).unwrap();
        assert_eq!(c.display().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_renderer_sees_every_step() {
        let frames: Rc<RefCell<Vec<(Vec<u32>, bool)>>> = Rc::default();
        let sink = Rc::clone(&frames);

        let mut c = controller(&[5, 3, 8, 1], Algorithm::Bubble);
        c.set_renderer(move |frame| {
            sink.borrow_mut()
                .push((frame.values.to_vec(), frame.completed));
        });
        c.sort().unwrap();
        c.run_until_settled().await;

        let frames = frames.borrow();
        // Initial frame on install, then one per event.
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[0], (vec![5, 3, 8, 1], false));
        assert_eq!(frames[2], (vec![3, 5, 8, 1], false));
        assert_eq!(frames[10], (vec![1, 3, 5, 8], true));
        assert!(frames[..10].iter().all(|(_, done)| !done));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_subscription() {
        let mut c = controller(&[2, 1], Algorithm::Quick);
        let rx = c.subscribe();
        c.sort().unwrap();
        assert_eq!(*rx.borrow(), PlaybackStatus::Running);
        c.run_until_settled().await;
        assert_eq!(*rx.borrow(), PlaybackStatus::Completed);
        c.reset();
        assert_eq!(*rx.borrow(), PlaybackStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_while_running() {
        let frames = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&frames);

        let mut c = controller(&[9, 7, 5, 3, 1], Algorithm::Bubble);
        c.set_renderer(move |_| *sink.borrow_mut() += 1);
        c.sort().unwrap();
        c.run_for(ms(20)).await;
        assert!(c.pending() > 0);

        let session = Rc::downgrade(&c.session);
        let drawn = *frames.borrow();
        drop(c);

        // Tasks and the renderer went down with the controller.
        assert!(session.upgrade().is_none());
        assert_eq!(Rc::strong_count(&frames), 1);

        tokio::time::sleep(ms(500)).await;
        assert_eq!(*frames.borrow(), drawn);
    }
}
