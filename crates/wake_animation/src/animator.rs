//! Animator interface
//!
//! The tween-library-shaped entry point: `to`, `from`, `from_to`, `set` and
//! `timeline`. There is one real implementation, [`NativeAnimator`], backed
//! by host native animations, and [`NoopAnimator`] for reduced motion.
//! [`create_animator`] picks between them from the [`MotionConfig`].

use std::sync::Arc;

use rustc_hash::FxHashSet;
use wake_core::Host;

use crate::config::MotionConfig;
use crate::error::Result;
use crate::target::Target;
use crate::timeline::{set_styles, Engine, Timeline, TimelineOptions};
use crate::vars::AnimationVars;

/// Timeline-based animation API
pub trait Animator: Send + Sync {
    /// Animate from the current state to `vars`
    fn to(&self, target: Target, vars: AnimationVars) -> Timeline;

    /// Animate from `vars` to the resting state
    fn from(&self, target: Target, vars: AnimationVars) -> Timeline;

    fn from_to(&self, target: Target, from: AnimationVars, to: AnimationVars) -> Timeline;

    /// Assign inline styles synchronously
    fn set(&self, target: Target, vars: &AnimationVars);

    /// Explicit timeline to chain tweens on
    fn timeline(&self, options: TimelineOptions) -> Timeline;

    /// Kill every live timeline animating any of the target's elements
    fn kill_tweens_of(&self, target: Target);

    /// Number of live timelines
    fn active_timelines(&self) -> usize;

    fn is_noop(&self) -> bool {
        false
    }
}

/// Animator backed by native host animations
pub struct NativeAnimator {
    engine: Arc<Engine>,
}

impl NativeAnimator {
    pub fn new(config: Arc<MotionConfig>, host: Host) -> Self {
        Self {
            engine: Arc::new(Engine::new(config, host)),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.engine.config
    }
}

impl Animator for NativeAnimator {
    fn to(&self, target: Target, vars: AnimationVars) -> Timeline {
        let timeline = self.engine.timeline(TimelineOptions::default());
        timeline.to(target, vars);
        timeline
    }

    fn from(&self, target: Target, vars: AnimationVars) -> Timeline {
        let timeline = self.engine.timeline(TimelineOptions::default());
        timeline.from(target, vars);
        timeline
    }

    fn from_to(&self, target: Target, from: AnimationVars, to: AnimationVars) -> Timeline {
        let timeline = self.engine.timeline(TimelineOptions::default());
        timeline.from_to(target, from, to);
        timeline
    }

    fn set(&self, target: Target, vars: &AnimationVars) {
        set_styles(&self.engine, &target, vars);
    }

    fn timeline(&self, options: TimelineOptions) -> Timeline {
        self.engine.timeline(options)
    }

    fn kill_tweens_of(&self, target: Target) {
        let elements: FxHashSet<_> = target
            .resolve(self.engine.host.document.as_ref())
            .iter()
            .map(|e| e.id())
            .collect();
        if elements.is_empty() {
            return;
        }

        let doomed: Vec<Timeline> = self
            .engine
            .live_timelines()
            .into_iter()
            .filter(|timeline| timeline.animates(&elements))
            .collect();
        tracing::debug!(timelines = doomed.len(), "killing tweens of target");
        for timeline in doomed {
            timeline.kill();
        }
    }

    fn active_timelines(&self) -> usize {
        self.engine.live_timelines().len()
    }
}

/// Animator for reduced motion: nothing is ever animated
#[derive(Debug, Default)]
pub struct NoopAnimator;

impl Animator for NoopAnimator {
    fn to(&self, _target: Target, _vars: AnimationVars) -> Timeline {
        Timeline::noop()
    }

    fn from(&self, _target: Target, _vars: AnimationVars) -> Timeline {
        Timeline::noop()
    }

    fn from_to(&self, _target: Target, _from: AnimationVars, _to: AnimationVars) -> Timeline {
        Timeline::noop()
    }

    fn set(&self, _target: Target, _vars: &AnimationVars) {}

    fn timeline(&self, _options: TimelineOptions) -> Timeline {
        Timeline::noop()
    }

    fn kill_tweens_of(&self, _target: Target) {}

    fn active_timelines(&self) -> usize {
        0
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Build the animator matching the configuration
pub fn create_animator(config: Arc<MotionConfig>, host: Host) -> Result<Arc<dyn Animator>> {
    if config.reduced_motion {
        tracing::debug!("reduced motion: using no-op animator");
        return Ok(Arc::new(NoopAnimator));
    }
    Ok(Arc::new(NativeAnimator::new(config, host)))
}
