//! Timeline orchestration over native animations
//!
//! A [`Timeline`] owns one native animation handle per animated element and
//! controls them as a unit. Its lifecycle is an explicit state machine:
//!
//! ```text
//! Pending ──(start frame)──► Running ──(all handles done)──► Completed
//!    │                          │                               │
//!    └──────────────(kill)──────┴────────────(kill)─────────────┴──► Killed
//! ```
//!
//! Progress is observed through a single subscription point,
//! [`Timeline::subscribe`]. The `onStart`/`onUpdate`/`onComplete` vars
//! callbacks are listeners on that stream, so each fires once per timeline
//! no matter how many elements it animates.
//!
//! Tweens are placed one after another: every `to`/`from`/`from_to` call
//! starts where the previous call ended, unless an explicit position is
//! given with the `*_at` variants.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use wake_core::{
    EffectTiming, ElementId, FillMode, Host, Keyframe, NativeAnimation, PlayState,
    PlaybackDirection,
};

use crate::config::MotionConfig;
use crate::keyframe;
use crate::target::Target;
use crate::vars::AnimationVars;

new_key_type! {
    /// Key of a live timeline in the animator registry
    pub struct TimelineKey;
    /// Key of a timeline subscription
    pub struct ListenerKey;
}

/// Lifecycle of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineStatus {
    /// Created; the start frame has not run yet
    Pending,
    Running,
    /// Every handle finished
    Completed,
    /// Handles cancelled; the timeline is inert
    Killed,
}

/// Lifecycle event delivered to subscribers
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineEvent {
    Started,
    /// Progress (0.0 to 1.0), once per frame while running
    Updated(f64),
    Completed,
    Killed,
}

/// Subscriber callback
pub type TimelineListener = Arc<dyn Fn(&TimelineEvent) + Send + Sync>;

/// Options of an explicit timeline
#[derive(Clone, Debug, Default)]
pub struct TimelineOptions {
    /// Start paused; nothing moves until [`Timeline::play`]
    pub paused: bool,
    /// Seconds before the first tween
    pub delay: f64,
    /// Timing inherited by every tween that does not set its own
    pub defaults: AnimationVars,
}

impl TimelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn with_delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    pub fn with_defaults(mut self, defaults: AnimationVars) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Shared state of the native animator
pub(crate) struct Engine {
    pub(crate) config: Arc<MotionConfig>,
    pub(crate) host: Host,
    registry: Mutex<SlotMap<TimelineKey, Weak<TimelineInner>>>,
}

impl Engine {
    pub(crate) fn new(config: Arc<MotionConfig>, host: Host) -> Self {
        Self {
            config,
            host,
            registry: Mutex::new(SlotMap::with_key()),
        }
    }

    pub(crate) fn timeline(self: &Arc<Self>, options: TimelineOptions) -> Timeline {
        let paused = options.paused;
        let inner = Arc::new(TimelineInner {
            engine: Arc::clone(self),
            options,
            state: Mutex::new(TimelineState::new(paused)),
        });

        let key = {
            let mut registry = self.registry.lock().unwrap();
            registry.retain(|_, timeline| timeline.strong_count() > 0);
            registry.insert(Arc::downgrade(&inner))
        };
        inner.state.lock().unwrap().key = Some(key);
        tracing::trace!(?key, paused, "timeline created");

        // An empty timeline still starts, and completes, on the next frame
        inner.schedule_frame();

        Timeline { inner: Some(inner) }
    }

    /// Timelines that are still referenced and not killed
    pub(crate) fn live_timelines(&self) -> Vec<Timeline> {
        let mut registry = self.registry.lock().unwrap();
        registry.retain(|_, timeline| timeline.strong_count() > 0);
        registry
            .values()
            .filter_map(Weak::upgrade)
            .map(|inner| Timeline { inner: Some(inner) })
            .collect()
    }

    fn unregister(&self, key: TimelineKey) {
        self.registry.lock().unwrap().remove(key);
    }
}

enum Tween {
    To(AnimationVars),
    From(AnimationVars),
    FromTo(AnimationVars, AnimationVars),
}

struct Track {
    handle: Arc<dyn NativeAnimation>,
    element: ElementId,
    /// End of the first iteration, delay included
    iteration_end_ms: f64,
    /// End of all iterations, delay included
    end_ms: f64,
}

impl Track {
    fn is_done(&self, reversed: bool) -> bool {
        match self.handle.play_state() {
            PlayState::Finished | PlayState::Idle => true,
            PlayState::Running => false,
            // Seeked onto a boundary
            PlayState::Paused if reversed => self.handle.current_time() <= 0.0,
            PlayState::Paused => self.handle.current_time() >= self.end_ms,
        }
    }
}

struct TimelineState {
    status: TimelineStatus,
    paused: bool,
    reversed: bool,
    time_scale: f64,
    tracks: Vec<Track>,
    /// End of the last placed tween, in seconds
    cursor: f64,
    listeners: SlotMap<ListenerKey, TimelineListener>,
    frame_pending: bool,
    key: Option<TimelineKey>,
}

impl TimelineState {
    fn new(paused: bool) -> Self {
        Self {
            status: TimelineStatus::Pending,
            paused,
            reversed: false,
            time_scale: 1.0,
            tracks: Vec::new(),
            cursor: 0.0,
            listeners: SlotMap::with_key(),
            frame_pending: false,
            key: None,
        }
    }

    fn all_done(&self) -> bool {
        self.tracks.iter().all(|t| t.is_done(self.reversed))
    }

    fn elapsed_ms(&self) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.handle.current_time())
            .fold(0.0, f64::max)
    }

    fn span_ms(&self) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.iteration_end_ms)
            .fold(0.0, f64::max)
    }

    fn total_ms(&self) -> f64 {
        self.tracks.iter().map(|t| t.end_ms).fold(0.0, f64::max)
    }

    fn progress(&self) -> f64 {
        let span = self.span_ms();
        if span <= 0.0 {
            return if self.status == TimelineStatus::Completed {
                1.0
            } else {
                0.0
            };
        }
        (self.elapsed_ms() / span).clamp(0.0, 1.0)
    }

    fn rate(&self) -> f64 {
        if self.reversed {
            -self.time_scale
        } else {
            self.time_scale
        }
    }

    fn listeners(&self) -> Vec<TimelineListener> {
        self.listeners.values().cloned().collect()
    }
}

struct TimelineInner {
    engine: Arc<Engine>,
    options: TimelineOptions,
    state: Mutex<TimelineState>,
}

impl TimelineInner {
    fn schedule_frame(self: &Arc<Self>) {
        {
            let mut state = self.state.lock().unwrap();
            if state.frame_pending || state.paused || state.status == TimelineStatus::Killed {
                return;
            }
            state.frame_pending = true;
        }

        let inner = Arc::clone(self);
        self.engine
            .host
            .frames
            .request_frame(Box::new(move || inner.on_frame()));
    }

    fn on_frame(self: &Arc<Self>) {
        let mut events: SmallVec<[TimelineEvent; 3]> = SmallVec::new();
        let (listeners, again) = {
            let mut state = self.state.lock().unwrap();
            state.frame_pending = false;
            if state.paused || state.status == TimelineStatus::Killed {
                return;
            }

            match state.status {
                TimelineStatus::Pending => {
                    state.status = TimelineStatus::Running;
                    events.push(TimelineEvent::Started);
                }
                TimelineStatus::Completed if state.all_done() => return,
                // Reopened by reverse, seek or new tweens
                TimelineStatus::Completed => state.status = TimelineStatus::Running,
                TimelineStatus::Running | TimelineStatus::Killed => {}
            }

            events.push(TimelineEvent::Updated(state.progress()));
            let done = state.all_done();
            if done {
                state.status = TimelineStatus::Completed;
                events.push(TimelineEvent::Completed);
                tracing::trace!(key = ?state.key, "timeline completed");
            }
            (state.listeners(), !done)
        };

        if again {
            self.schedule_frame();
        }
        emit(&listeners, &events);
    }

    fn add_tween(self: &Arc<Self>, target: Target, tween: Tween, position: Option<f64>) {
        let engine = &self.engine;
        let config = &engine.config;
        let development = engine.host.development;

        // `from` tweens end at each element's own resting state
        let rests = matches!(tween, Tween::From(_));
        let (keyframes, vars): (SmallVec<[Keyframe; 2]>, AnimationVars) = match tween {
            Tween::To(vars) | Tween::From(vars) => (
                smallvec::smallvec![keyframe::translate(&vars, config, development)],
                vars,
            ),
            Tween::FromTo(from, to) => (
                smallvec::smallvec![
                    keyframe::translate(&from, config, development),
                    keyframe::translate(&to, config, development),
                ],
                to,
            ),
        };
        let vars = vars.with_defaults(&self.options.defaults);
        let elements = target.resolve(engine.host.document.as_ref());

        let duration = vars
            .duration
            .unwrap_or_else(|| config.ui.as_secs_f64())
            .max(0.0);
        let own_delay = vars.delay.unwrap_or(0.0);
        let stagger = vars.stagger.unwrap_or(0.0).max(0.0);
        let easing = vars.ease.unwrap_or(config.easing).to_css();
        let iterations = match vars.repeat {
            Some(repeat) if repeat < 0 => f64::INFINITY,
            Some(repeat) => f64::from(repeat) + 1.0,
            None => 1.0,
        };
        let direction = if vars.yoyo {
            PlaybackDirection::Alternate
        } else {
            PlaybackDirection::Normal
        };

        {
            let mut state = self.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return;
            }

            let position = position.unwrap_or(state.cursor);
            let start = self.options.delay + position + own_delay;
            // New handles join at the timeline's current time
            let elapsed = state.elapsed_ms();
            let total = elements.len();

            for (index, element) in elements.iter().enumerate() {
                let step = vars.stagger_from.step(index, total) as f64;
                let timing = EffectTiming {
                    duration_ms: duration * 1000.0,
                    delay_ms: (start + stagger * step) * 1000.0,
                    easing: easing.clone(),
                    iterations,
                    direction,
                    fill: FillMode::Both,
                };

                let mut frames = keyframes.clone();
                if rests {
                    frames.push(keyframe::resting(&vars, element.as_ref(), config, development));
                }

                let Some(handle) = element.animate(&frames, &timing) else {
                    tracing::debug!(element = %element.id(), "element cannot animate, skipped");
                    continue;
                };
                if state.time_scale != 1.0 {
                    handle.set_playback_rate(state.time_scale);
                }
                if elapsed > 0.0 {
                    handle.set_current_time(elapsed);
                }
                if state.paused {
                    handle.pause();
                }

                state.tracks.push(Track {
                    handle,
                    element: element.id(),
                    iteration_end_ms: timing.iteration_end_ms(),
                    end_ms: timing.end_time_ms(),
                });
            }

            let last_step = (0..total)
                .map(|index| vars.stagger_from.step(index, total))
                .max()
                .unwrap_or(0);
            let span = own_delay + stagger * last_step as f64 + duration;
            state.cursor = state.cursor.max(position + span);

            if vars.has_callbacks() {
                state.listeners.insert(vars_listener(&vars));
            }

            tracing::debug!(
                key = ?state.key,
                targets = total,
                handles = state.tracks.len(),
                duration,
                stagger,
                "tween added"
            );
        }

        self.schedule_frame();
    }

    fn kill(&self) {
        let (tracks, listeners, key) = {
            let mut state = self.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return;
            }
            state.status = TimelineStatus::Killed;
            state.paused = false;
            let listeners = state.listeners();
            state.listeners.clear();
            (std::mem::take(&mut state.tracks), listeners, state.key.take())
        };

        for track in &tracks {
            track.handle.set_on_finish(None);
            track.handle.cancel();
        }
        if let Some(key) = key {
            self.engine.unregister(key);
        }
        tracing::trace!(?key, handles = tracks.len(), "timeline killed");

        emit(&listeners, &[TimelineEvent::Killed]);
    }
}

fn emit(listeners: &[TimelineListener], events: &[TimelineEvent]) {
    for event in events {
        for listener in listeners {
            listener(event);
        }
    }
}

fn vars_listener(vars: &AnimationVars) -> TimelineListener {
    let on_start = vars.on_start.clone();
    let on_update = vars.on_update.clone();
    let on_complete = vars.on_complete.clone();

    Arc::new(move |event| match event {
        TimelineEvent::Started => {
            if let Some(callback) = &on_start {
                callback();
            }
        }
        TimelineEvent::Updated(progress) => {
            if let Some(callback) = &on_update {
                callback(*progress);
            }
        }
        TimelineEvent::Completed => {
            if let Some(callback) = &on_complete {
                callback();
            }
        }
        TimelineEvent::Killed => {}
    })
}

/// A controllable group of native animations
///
/// Cloning yields another handle to the same timeline. A no-op timeline
/// (reduced motion) accepts every call and does nothing.
#[derive(Clone)]
pub struct Timeline {
    inner: Option<Arc<TimelineInner>>,
}

impl Timeline {
    /// Inert timeline: no handles, progress and durations are zero
    pub fn noop() -> Self {
        Self { inner: None }
    }

    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Animate to `vars`, from the element's current state
    pub fn to(&self, target: impl Into<Target>, vars: AnimationVars) -> &Self {
        self.add(target.into(), Tween::To(vars), None)
    }

    /// Like [`to`](Self::to), starting `position` seconds into the timeline
    pub fn to_at(&self, target: impl Into<Target>, vars: AnimationVars, position: f64) -> &Self {
        self.add(target.into(), Tween::To(vars), Some(position))
    }

    /// Animate from `vars` to the resting state
    pub fn from(&self, target: impl Into<Target>, vars: AnimationVars) -> &Self {
        self.add(target.into(), Tween::From(vars), None)
    }

    pub fn from_at(&self, target: impl Into<Target>, vars: AnimationVars, position: f64) -> &Self {
        self.add(target.into(), Tween::From(vars), Some(position))
    }

    /// Animate from `from` to `to`; timing is read from `to`
    pub fn from_to(
        &self,
        target: impl Into<Target>,
        from: AnimationVars,
        to: AnimationVars,
    ) -> &Self {
        self.add(target.into(), Tween::FromTo(from, to), None)
    }

    pub fn from_to_at(
        &self,
        target: impl Into<Target>,
        from: AnimationVars,
        to: AnimationVars,
        position: f64,
    ) -> &Self {
        self.add(target.into(), Tween::FromTo(from, to), Some(position))
    }

    /// Jump to `vars` at the end of the sequence, without tweening
    ///
    /// Placed as a zero-length tween, so the values apply when playback
    /// reaches that point and hold through fill. Callbacks and repeats on
    /// `vars` are ignored.
    pub fn set(&self, target: impl Into<Target>, vars: &AnimationVars) -> &Self {
        self.add(target.into(), Tween::To(vars.instant()), None)
    }

    pub fn set_at(&self, target: impl Into<Target>, vars: &AnimationVars, position: f64) -> &Self {
        self.add(target.into(), Tween::To(vars.instant()), Some(position))
    }

    fn add(&self, target: Target, tween: Tween, position: Option<f64>) -> &Self {
        if let Some(inner) = &self.inner {
            inner.add_tween(target, tween, position);
        }
        self
    }

    /// Resume paused handles
    pub fn play(&self) -> &Self {
        let Some(inner) = &self.inner else {
            return self;
        };
        {
            let mut state = inner.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return self;
            }
            state.paused = false;
            for track in &state.tracks {
                if track.handle.play_state() == PlayState::Paused && !track.is_done(state.reversed) {
                    track.handle.play();
                }
            }
        }
        inner.schedule_frame();
        self
    }

    pub fn pause(&self) -> &Self {
        if let Some(inner) = &self.inner {
            let mut state = inner.state.lock().unwrap();
            if state.status != TimelineStatus::Killed {
                state.paused = true;
                for track in &state.tracks {
                    if track.handle.play_state() == PlayState::Running {
                        track.handle.pause();
                    }
                }
            }
        }
        self
    }

    /// Flip the direction of every handle and play
    pub fn reverse(&self) -> &Self {
        let Some(inner) = &self.inner else {
            return self;
        };
        {
            let mut state = inner.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return self;
            }
            state.paused = false;
            state.reversed = !state.reversed;
            for track in &state.tracks {
                track.handle.reverse();
            }
        }
        inner.schedule_frame();
        self
    }

    /// Rewind every handle and play forward; lifecycle events fire again
    pub fn restart(&self) -> &Self {
        let Some(inner) = &self.inner else {
            return self;
        };
        {
            let mut state = inner.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return self;
            }
            state.status = TimelineStatus::Pending;
            state.paused = false;
            state.reversed = false;
            for track in &state.tracks {
                track.handle.set_playback_rate(state.time_scale);
                track.handle.set_current_time(0.0);
                track.handle.play();
            }
        }
        inner.schedule_frame();
        self
    }

    /// Cancel every handle and make the timeline inert
    ///
    /// Safe to call any number of times.
    pub fn kill(&self) {
        if let Some(inner) = &self.inner {
            inner.kill();
        }
    }

    /// Normalized progress over one iteration of the whole timeline
    pub fn progress(&self) -> f64 {
        self.inner
            .as_ref()
            .map_or(0.0, |inner| inner.state.lock().unwrap().progress())
    }

    /// Seek every handle to `value` of the timeline's span
    ///
    /// All handles are moved to the same timeline time, so a handle shorter
    /// than the span may already be at its end.
    pub fn set_progress(&self, value: f64) -> &Self {
        let Some(inner) = &self.inner else {
            return self;
        };
        let (listeners, progress) = {
            let state = inner.state.lock().unwrap();
            if state.status == TimelineStatus::Killed {
                return self;
            }
            let time = value.clamp(0.0, 1.0) * state.span_ms();
            for track in &state.tracks {
                track.handle.set_current_time(time);
                if !state.paused && !track.is_done(state.reversed) {
                    track.handle.play();
                }
            }
            (state.listeners(), state.progress())
        };

        inner.schedule_frame();
        emit(&listeners, &[TimelineEvent::Updated(progress)]);
        self
    }

    /// Playback rate shared by every handle
    pub fn time_scale(&self) -> f64 {
        self.inner
            .as_ref()
            .map_or(1.0, |inner| inner.state.lock().unwrap().time_scale)
    }

    /// Non-positive scales are ignored
    pub fn set_time_scale(&self, scale: f64) -> &Self {
        if scale <= 0.0 {
            return self;
        }
        if let Some(inner) = &self.inner {
            let mut state = inner.state.lock().unwrap();
            state.time_scale = scale;
            let rate = state.rate();
            for track in &state.tracks {
                track.handle.set_playback_rate(rate);
            }
        }
        self
    }

    /// Seconds spanned by one iteration of every tween, delays included
    pub fn duration(&self) -> f64 {
        self.inner
            .as_ref()
            .map_or(0.0, |inner| inner.state.lock().unwrap().span_ms() / 1000.0)
    }

    /// Seconds including repeats; infinite when a tween repeats forever
    pub fn total_duration(&self) -> f64 {
        self.inner
            .as_ref()
            .map_or(0.0, |inner| inner.state.lock().unwrap().total_ms() / 1000.0)
    }

    /// A no-op timeline reports [`TimelineStatus::Killed`]
    pub fn status(&self) -> TimelineStatus {
        self.inner
            .as_ref()
            .map_or(TimelineStatus::Killed, |inner| inner.state.lock().unwrap().status)
    }

    pub fn is_paused(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.state.lock().unwrap().paused)
    }

    pub fn is_reversed(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.state.lock().unwrap().reversed)
    }

    /// Number of native handles, one per animated element
    pub fn handle_count(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.state.lock().unwrap().tracks.len())
    }

    pub fn handles(&self) -> Vec<Arc<dyn NativeAnimation>> {
        self.inner.as_ref().map_or_else(Vec::new, |inner| {
            inner
                .state
                .lock()
                .unwrap()
                .tracks
                .iter()
                .map(|t| t.handle.clone())
                .collect()
        })
    }

    /// Subscribe to lifecycle events
    ///
    /// Returns `None` for a no-op or killed timeline, which emits nothing.
    pub fn subscribe(
        &self,
        listener: impl Fn(&TimelineEvent) + Send + Sync + 'static,
    ) -> Option<ListenerKey> {
        let inner = self.inner.as_ref()?;
        let mut state = inner.state.lock().unwrap();
        if state.status == TimelineStatus::Killed {
            return None;
        }
        Some(state.listeners.insert(Arc::new(listener)))
    }

    pub fn unsubscribe(&self, key: ListenerKey) {
        if let Some(inner) = &self.inner {
            inner.state.lock().unwrap().listeners.remove(key);
        }
    }

    /// Whether any handle animates one of `elements`
    pub(crate) fn animates(&self, elements: &FxHashSet<ElementId>) -> bool {
        self.inner.as_ref().is_some_and(|inner| {
            inner
                .state
                .lock()
                .unwrap()
                .tracks
                .iter()
                .any(|t| elements.contains(&t.element))
        })
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("Timeline(noop)"),
            Some(inner) => {
                let state = inner.state.lock().unwrap();
                f.debug_struct("Timeline")
                    .field("key", &state.key)
                    .field("status", &state.status)
                    .field("paused", &state.paused)
                    .field("handles", &state.tracks.len())
                    .finish()
            }
        }
    }
}

/// Synchronous style assignment behind `Animator::set`
pub(crate) fn set_styles(engine: &Engine, target: &Target, vars: &AnimationVars) {
    let keyframe = keyframe::translate(vars, &engine.config, engine.host.development);
    for element in target.resolve(engine.host.document.as_ref()) {
        keyframe::apply(element.as_ref(), &keyframe);
    }
}
