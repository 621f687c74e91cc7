//! Deterministic in-memory host
//!
//! A [`HeadlessHost`] owns a manual clock. Nothing moves until
//! [`advance`](HeadlessHost::advance) is called, which:
//!
//! 1. ticks every live animation by the given number of milliseconds and
//!    fires the finish callbacks of animations that finished, then
//! 2. runs the frame callbacks that were queued before the call. Frames
//!    requested while running are deferred to the next `advance`.
//!
//! Intersection is driven explicitly with
//! [`set_intersecting`](HeadlessHost::set_intersecting).

mod animation;
mod element;
mod observer;

pub use animation::HeadlessAnimation;
pub use element::{HeadlessDocument, HeadlessElement};
pub use observer::{HeadlessObserver, HeadlessObserverFactory};

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::host::{ElementId, FrameCallback, FrameScheduler, Host, MediaQueries, REDUCED_MOTION_QUERY};

#[derive(Default)]
struct ClockState {
    now_ms: f64,
    frames: Vec<FrameCallback>,
    animations: Vec<Weak<HeadlessAnimation>>,
}

/// Manual clock shared by the host and its elements
#[derive(Default)]
pub(crate) struct Clock {
    state: Mutex<ClockState>,
}

impl Clock {
    pub(crate) fn register(&self, animation: &Arc<HeadlessAnimation>) {
        self.state
            .lock()
            .unwrap()
            .animations
            .push(Arc::downgrade(animation));
    }

    fn advance(&self, dt_ms: f64) {
        let animations: Vec<Arc<HeadlessAnimation>> = {
            let mut state = self.state.lock().unwrap();
            state.now_ms += dt_ms;
            state.animations.retain(|a| a.strong_count() > 0);
            state.animations.iter().filter_map(Weak::upgrade).collect()
        };

        let finished: Vec<_> = animations.iter().filter_map(|a| a.tick(dt_ms)).collect();
        for callback in finished {
            callback();
        }

        let frames = std::mem::take(&mut self.state.lock().unwrap().frames);
        for frame in frames {
            frame();
        }
    }
}

impl FrameScheduler for Clock {
    fn request_frame(&self, callback: FrameCallback) {
        self.state.lock().unwrap().frames.push(callback);
    }
}

/// Media query state toggled by tests
#[derive(Default)]
pub struct HeadlessMedia {
    matching: Mutex<BTreeSet<String>>,
}

impl HeadlessMedia {
    pub fn set_matches(&self, query: &str, matches: bool) {
        let mut matching = self.matching.lock().unwrap();
        if matches {
            matching.insert(query.to_string());
        } else {
            matching.remove(query);
        }
    }
}

impl MediaQueries for HeadlessMedia {
    fn matches(&self, query: &str) -> bool {
        self.matching.lock().unwrap().contains(query)
    }
}

/// In-memory host with a manual clock
#[derive(Clone)]
pub struct HeadlessHost {
    clock: Arc<Clock>,
    document: Arc<HeadlessDocument>,
    observers: Arc<HeadlessObserverFactory>,
    media: Arc<HeadlessMedia>,
    next_id: Arc<AtomicU64>,
    development: bool,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Development-mode host with no media queries matching
    pub fn new() -> Self {
        Self {
            clock: Arc::new(Clock::default()),
            document: Arc::new(HeadlessDocument::default()),
            observers: Arc::new(HeadlessObserverFactory::default()),
            media: Arc::new(HeadlessMedia::default()),
            next_id: Arc::new(AtomicU64::new(1)),
            development: true,
        }
    }

    pub fn with_reduced_motion(self, reduced: bool) -> Self {
        self.media.set_matches(REDUCED_MOTION_QUERY, reduced);
        self
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Capability bundle for the engine
    pub fn host(&self) -> Host {
        Host::new(
            self.document.clone(),
            self.clock.clone(),
            self.observers.clone(),
            self.media.clone(),
        )
        .with_development(self.development)
    }

    pub fn create_element(&self, tag: &str) -> Arc<HeadlessElement> {
        self.build_element(tag, true)
    }

    /// Element whose `animate()` reports no capability
    pub fn create_inert_element(&self, tag: &str) -> Arc<HeadlessElement> {
        self.build_element(tag, false)
    }

    fn build_element(&self, tag: &str, animatable: bool) -> Arc<HeadlessElement> {
        let id = ElementId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let element = Arc::new(HeadlessElement::new(id, tag, animatable, self.clock.clone()));
        self.document.register(&element);
        element
    }

    /// Move time forward, then run one frame
    pub fn advance(&self, dt_ms: f64) {
        self.clock.advance(dt_ms);
    }

    /// Run one frame without moving time
    pub fn run_frame(&self) {
        self.clock.advance(0.0);
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.state.lock().unwrap().now_ms
    }

    pub fn pending_frames(&self) -> usize {
        self.clock.state.lock().unwrap().frames.len()
    }

    /// Report the element fully inside or outside the viewport
    pub fn set_intersecting(&self, target: ElementId, intersecting: bool) {
        self.set_intersection_ratio(target, if intersecting { 1.0 } else { 0.0 });
    }

    /// Report a visible fraction; observers fire when it crosses their threshold
    pub fn set_intersection_ratio(&self, target: ElementId, ratio: f64) {
        self.observers.deliver(target, ratio.clamp(0.0, 1.0));
    }

    pub fn observers(&self) -> &HeadlessObserverFactory {
        &self.observers
    }

    pub fn media(&self) -> &HeadlessMedia {
        &self.media
    }

    pub fn document(&self) -> &HeadlessDocument {
        &self.document
    }
}
