//! Headless native animation

use std::sync::Mutex;

use crate::host::{EffectTiming, ElementId, FinishCallback, Keyframe, NativeAnimation, PlayState};

struct Playback {
    current_time: f64,
    rate: f64,
    play_state: PlayState,
    on_finish: Option<FinishCallback>,
}

/// Clock-driven stand-in for a Web Animations `Animation`
///
/// Time only moves when [`HeadlessHost::advance`](super::HeadlessHost::advance)
/// is called. Keyframes are recorded verbatim for assertions; the effect is
/// not sampled.
pub struct HeadlessAnimation {
    element: ElementId,
    keyframes: Vec<Keyframe>,
    timing: EffectTiming,
    playback: Mutex<Playback>,
}

impl HeadlessAnimation {
    pub(crate) fn new(element: ElementId, keyframes: Vec<Keyframe>, timing: EffectTiming) -> Self {
        Self {
            element,
            keyframes,
            timing,
            playback: Mutex::new(Playback {
                current_time: 0.0,
                rate: 1.0,
                play_state: PlayState::Running,
                on_finish: None,
            }),
        }
    }

    /// Element this animation was created on
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn first_keyframe(&self) -> Option<&Keyframe> {
        self.keyframes.first()
    }

    pub fn last_keyframe(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    pub fn delay_ms(&self) -> f64 {
        self.timing.delay_ms
    }

    /// Not cancelled: still running, paused, or holding its fill
    pub fn is_active(&self) -> bool {
        self.playback.lock().unwrap().play_state != PlayState::Idle
    }

    pub fn has_finish_callback(&self) -> bool {
        self.playback.lock().unwrap().on_finish.is_some()
    }

    /// Advance by `dt_ms` of wall time; returns the finish callback to fire
    pub(crate) fn tick(&self, dt_ms: f64) -> Option<FinishCallback> {
        let mut playback = self.playback.lock().unwrap();
        if playback.play_state != PlayState::Running {
            return None;
        }

        let end = self.timing.end_time_ms();
        playback.current_time += dt_ms * playback.rate;

        let done = if playback.rate >= 0.0 {
            if playback.current_time >= end {
                playback.current_time = end;
                true
            } else {
                false
            }
        } else if playback.current_time <= 0.0 {
            playback.current_time = 0.0;
            true
        } else {
            false
        };

        if done {
            playback.play_state = PlayState::Finished;
            playback.on_finish.clone()
        } else {
            None
        }
    }
}

impl NativeAnimation for HeadlessAnimation {
    fn play(&self) {
        let mut playback = self.playback.lock().unwrap();
        if playback.play_state == PlayState::Running {
            return;
        }

        // Auto-rewind like the Web Animations API
        let end = self.timing.end_time_ms();
        if playback.rate >= 0.0 && playback.current_time >= end {
            playback.current_time = 0.0;
        } else if playback.rate < 0.0 && playback.current_time <= 0.0 && end.is_finite() {
            playback.current_time = end;
        }
        playback.play_state = PlayState::Running;
    }

    fn pause(&self) {
        self.playback.lock().unwrap().play_state = PlayState::Paused;
    }

    fn reverse(&self) {
        {
            let mut playback = self.playback.lock().unwrap();
            playback.rate = -playback.rate;
            if playback.play_state == PlayState::Running {
                return;
            }
            playback.play_state = PlayState::Paused;
        }
        self.play();
    }

    fn cancel(&self) {
        let mut playback = self.playback.lock().unwrap();
        playback.play_state = PlayState::Idle;
        playback.current_time = 0.0;
    }

    fn current_time(&self) -> f64 {
        self.playback.lock().unwrap().current_time
    }

    fn set_current_time(&self, time_ms: f64) {
        let end = self.timing.end_time_ms();
        let mut playback = self.playback.lock().unwrap();
        playback.current_time = if end.is_finite() {
            time_ms.clamp(0.0, end)
        } else {
            time_ms.max(0.0)
        };

        if matches!(playback.play_state, PlayState::Idle | PlayState::Finished) {
            playback.play_state = PlayState::Paused;
        }
    }

    fn playback_rate(&self) -> f64 {
        self.playback.lock().unwrap().rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.playback.lock().unwrap().rate = rate;
    }

    fn timing(&self) -> EffectTiming {
        self.timing.clone()
    }

    fn play_state(&self) -> PlayState {
        self.playback.lock().unwrap().play_state
    }

    fn set_on_finish(&self, callback: Option<FinishCallback>) {
        self.playback.lock().unwrap().on_finish = callback;
    }
}
