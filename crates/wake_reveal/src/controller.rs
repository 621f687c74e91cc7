//! Reveal controller
//!
//! Binds one element to an intersection observer and plays a reveal tween
//! when it enters the viewport:
//!
//! 1. `mount` obtains the shared animator, applies the `from` state to the
//!    targets and starts observing the element.
//! 2. On entry the `to` state is tweened in; timeline events drive
//!    [`RevealState`]. With `once` the element is unobserved on completion.
//! 3. Without `once`, leaving the viewport kills the tween and re-applies
//!    the `from` state so the next entry reveals again.
//!
//! Reduced motion settles the state synchronously and never observes.
//! Setup failures leave the content visible and stop there.
//!
//! Dropping the last [`RevealController`] clone cleans up, same as
//! [`cleanup`](RevealController::cleanup).

use std::fmt;
use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};
use wake_animation::{Animator, MotionContext, Target, Timeline, TimelineEvent};
use wake_core::{ElementRef, IntersectionCallback, IntersectionObserver};

use crate::markers;
use crate::options::{RevealOptions, RevealState};
use crate::phase::{PhaseMachine, RevealEvent, RevealPhase};

new_key_type! {
    /// Handle of a state listener
    pub struct StateListenerKey;
}

/// Called with the new state after every change
pub type StateListener = Arc<dyn Fn(&RevealState) + Send + Sync>;

struct Runtime {
    phase: PhaseMachine,
    animator: Option<Arc<dyn Animator>>,
    observer: Option<Arc<dyn IntersectionObserver>>,
    timeline: Option<Timeline>,
    markers_attached: bool,
}

struct ControllerInner {
    context: MotionContext,
    element: ElementRef,
    options: RevealOptions,
    state: Mutex<RevealState>,
    runtime: Mutex<Runtime>,
    listeners: Mutex<SlotMap<StateListenerKey, StateListener>>,
}

impl ControllerInner {
    /// The element itself, or its direct children when staggered
    fn targets(&self) -> Target {
        if self.options.is_staggered() {
            Target::Nodes(self.element.children())
        } else {
            Target::from(&self.element)
        }
    }

    fn phase(&self) -> RevealPhase {
        self.runtime.lock().unwrap().phase.current()
    }

    fn update_state(&self, update: impl FnOnce(&mut RevealState)) {
        let snapshot = {
            let mut state = self.state.lock().unwrap();
            let before = *state;
            update(&mut state);
            if *state == before {
                return;
            }
            *state
        };

        let listeners: Vec<StateListener> = self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn attach(self: &Arc<Self>, animator: Arc<dyn Animator>) {
        {
            // Claim under one lock so concurrent mounts attach a single observer
            let mut runtime = self.runtime.lock().unwrap();
            if !runtime.phase.is_in(RevealPhase::Idle) {
                return;
            }
            runtime.phase.send(RevealEvent::Observe);
            runtime.animator = Some(animator.clone());
        }

        let targets = self.targets();
        animator.set(targets.clone(), &self.options.from);

        let weak = Arc::downgrade(self);
        let callback: IntersectionCallback = Arc::new(move |entries| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let id = inner.element.id();
            for entry in entries.iter().filter(|entry| entry.target == id) {
                inner.handle_intersection(entry.is_intersecting);
            }
        });

        match self
            .context
            .host()
            .observers
            .create(self.options.observer_init(), callback)
        {
            Ok(observer) => {
                let disposed = {
                    let mut runtime = self.runtime.lock().unwrap();
                    let disposed = runtime.phase.is_in(RevealPhase::Disposed);
                    if !disposed {
                        runtime.observer = Some(observer.clone());
                    }
                    disposed
                };
                if disposed {
                    observer.disconnect();
                    return;
                }
                observer.observe(&self.element);
                debug!(element = %self.element.id(), "reveal observing");
            }
            Err(err) => {
                warn!(
                    element = %self.element.id(),
                    error = %err,
                    "intersection observer unavailable, showing content"
                );
                animator.set(targets, &self.options.to);
                {
                    let mut runtime = self.runtime.lock().unwrap();
                    runtime.animator = None;
                    runtime.phase.send(RevealEvent::Fail);
                }
                self.update_state(|state| *state = RevealState::SETTLED);
            }
        }
    }

    fn handle_intersection(self: &Arc<Self>, is_intersecting: bool) {
        self.update_state(|state| state.is_in_view = is_intersecting);
        if is_intersecting {
            self.reveal();
        } else if !self.options.once {
            self.reset();
        }
    }

    fn reveal(self: &Arc<Self>) {
        let (animator, attach_markers) = {
            let mut runtime = self.runtime.lock().unwrap();
            if !runtime.phase.can_send(RevealEvent::Enter) {
                return;
            }
            let Some(animator) = runtime.animator.clone() else {
                return;
            };
            runtime.phase.send(RevealEvent::Enter);

            let attach = self.options.markers
                && self.context.host().development
                && !runtime.markers_attached;
            runtime.markers_attached |= attach;
            (animator, attach)
        };

        if attach_markers {
            markers::attach(self.element.as_ref(), &self.options);
        }

        let timeline = animator.to(self.targets(), self.options.reveal_vars());
        let weak = Arc::downgrade(self);
        timeline.subscribe(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_timeline_event(event);
            }
        });
        debug!(element = %self.element.id(), handles = timeline.handle_count(), "reveal started");

        let mut runtime = self.runtime.lock().unwrap();
        if runtime.phase.is_in(RevealPhase::Disposed) {
            drop(runtime);
            timeline.kill();
            return;
        }
        runtime.timeline = Some(timeline);
    }

    fn on_timeline_event(&self, event: &TimelineEvent) {
        match *event {
            TimelineEvent::Started => self.update_state(|state| {
                state.is_revealed = true;
                state.progress = 0.0;
            }),
            TimelineEvent::Updated(progress) => {
                self.update_state(|state| state.progress = progress.clamp(0.0, 1.0))
            }
            TimelineEvent::Completed => {
                let observer = {
                    let mut runtime = self.runtime.lock().unwrap();
                    if runtime.phase.current() != RevealPhase::Revealing {
                        return;
                    }
                    runtime.phase.send(RevealEvent::Complete);
                    if self.options.once {
                        runtime.observer.clone()
                    } else {
                        None
                    }
                };

                self.update_state(|state| state.progress = 1.0);
                if let Some(observer) = observer {
                    observer.unobserve(&self.element);
                    debug!(element = %self.element.id(), "reveal complete, unobserved");
                }
            }
            TimelineEvent::Killed => {}
        }
    }

    /// Back to the hidden state so the next entry reveals again
    fn reset(&self) {
        let (animator, timeline) = {
            let mut runtime = self.runtime.lock().unwrap();
            if !runtime.phase.can_send(RevealEvent::Leave) {
                return;
            }
            runtime.phase.send(RevealEvent::Leave);
            (runtime.animator.clone(), runtime.timeline.take())
        };

        if let Some(timeline) = timeline {
            timeline.kill();
        }
        if let Some(animator) = animator {
            animator.set(self.targets(), &self.options.from);
        }
        self.update_state(|state| {
            state.is_revealed = false;
            state.progress = 0.0;
        });
        debug!(element = %self.element.id(), "reveal reset");
    }

    fn dispose(&self) {
        let (timeline, observer, markers_attached) = {
            let mut runtime = self.runtime.lock().unwrap();
            if runtime.phase.is_in(RevealPhase::Disposed) {
                return;
            }
            runtime.phase.send(RevealEvent::Dispose);
            runtime.animator = None;
            (
                runtime.timeline.take(),
                runtime.observer.take(),
                std::mem::take(&mut runtime.markers_attached),
            )
        };

        if let Some(timeline) = timeline {
            timeline.kill();
        }
        if let Some(observer) = observer {
            observer.unobserve(&self.element);
            observer.disconnect();
        }
        if markers_attached {
            markers::detach(self.element.as_ref());
        }
        debug!(element = %self.element.id(), "reveal disposed");
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Scroll reveal bound to one element
#[derive(Clone)]
pub struct RevealController {
    inner: Arc<ControllerInner>,
}

impl RevealController {
    /// Create an unmounted reveal
    ///
    /// Under reduced motion the state is settled here and `mount` does
    /// nothing.
    pub fn new(context: &MotionContext, element: ElementRef, options: RevealOptions) -> Self {
        let mut phase = PhaseMachine::new();
        let state = if context.reduced_motion() {
            phase.send(RevealEvent::ReduceMotion);
            debug!(element = %element.id(), "reduced motion, reveal settled");
            RevealState::SETTLED
        } else {
            RevealState::HIDDEN
        };

        Self {
            inner: Arc::new(ControllerInner {
                context: context.clone(),
                element,
                options,
                state: Mutex::new(state),
                runtime: Mutex::new(Runtime {
                    phase,
                    animator: None,
                    observer: None,
                    timeline: None,
                    markers_attached: false,
                }),
                listeners: Mutex::new(SlotMap::with_key()),
            }),
        }
    }

    /// Hide the targets and start observing
    ///
    /// Does nothing unless the reveal is still idle. If the animator cannot
    /// be constructed the element is left as authored.
    pub async fn mount(&self) {
        if self.phase() != RevealPhase::Idle {
            return;
        }

        match self.inner.context.animator().await {
            Ok(animator) => self.inner.attach(animator),
            Err(err) => {
                warn!(
                    element = %self.inner.element.id(),
                    error = %err,
                    "animator unavailable, reveal disabled"
                );
                self.inner.runtime.lock().unwrap().phase.send(RevealEvent::Fail);
            }
        }
    }

    /// Kill the tween, stop observing and remove markers
    ///
    /// Idempotent. Late observer or timeline notifications are ignored.
    pub fn cleanup(&self) {
        self.inner.dispose();
    }

    pub fn element(&self) -> &ElementRef {
        &self.inner.element
    }

    pub fn options(&self) -> &RevealOptions {
        &self.inner.options
    }

    pub fn state(&self) -> RevealState {
        *self.inner.state.lock().unwrap()
    }

    pub fn is_revealed(&self) -> bool {
        self.state().is_revealed
    }

    pub fn is_in_view(&self) -> bool {
        self.state().is_in_view
    }

    pub fn progress(&self) -> f64 {
        self.state().progress
    }

    pub fn phase(&self) -> RevealPhase {
        self.inner.phase()
    }

    /// Transitions taken so far (for debugging)
    pub fn phase_history(&self) -> Vec<(RevealPhase, RevealEvent, RevealPhase)> {
        self.inner.runtime.lock().unwrap().phase.history().to_vec()
    }

    /// The current reveal tween, if one is running or finished
    pub fn timeline(&self) -> Option<Timeline> {
        self.inner.runtime.lock().unwrap().timeline.clone()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&RevealState) + Send + Sync + 'static,
    ) -> StateListenerKey {
        self.inner.listeners.lock().unwrap().insert(Arc::new(listener))
    }

    pub fn unsubscribe(&self, key: StateListenerKey) {
        self.inner.listeners.lock().unwrap().remove(key);
    }
}

impl fmt::Debug for RevealController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealController")
            .field("element", &self.inner.element.id())
            .field("phase", &self.phase())
            .field("state", &self.state())
            .finish()
    }
}

/// Create and mount a reveal for `element`
pub async fn use_reveal(
    context: &MotionContext,
    element: ElementRef,
    options: RevealOptions,
) -> RevealController {
    let controller = RevealController::new(context, element, options);
    controller.mount().await;
    controller
}
