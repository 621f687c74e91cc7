//! Declarative animation vars
//!
//! [`AnimationVars`] describes a target state plus tween timing, in the
//! shape of the tween library the compatibility layer mimics. Times are in
//! seconds and converted to milliseconds at the native boundary.
//!
//! Anything that is not transform, opacity, timing or a callback lands in
//! [`AnimationVars::extra`] and is dropped during keyframe translation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Callback without arguments (`onStart`, `onComplete`)
pub type VarsCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving timeline progress (`onUpdate`)
pub type UpdateCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Order in which staggered targets start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaggerDirection {
    /// Animate first to last
    #[default]
    #[serde(rename = "start")]
    Forward,
    /// Animate last to first
    #[serde(rename = "end")]
    Reverse,
    /// Animate from center outward
    #[serde(rename = "center")]
    FromCenter,
}

impl StaggerDirection {
    /// Multiple of the stagger interval applied to the target at `index`
    pub fn step(self, index: usize, total: usize) -> usize {
        match self {
            StaggerDirection::Forward => index,
            StaggerDirection::Reverse => total.saturating_sub(1).saturating_sub(index),
            StaggerDirection::FromCenter => {
                let center = total / 2;
                center.abs_diff(index)
            }
        }
    }
}

/// Target state and timing of a tween
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationVars {
    pub opacity: Option<f64>,
    /// translateX in pixels
    pub x: Option<f64>,
    /// translateY in pixels
    pub y: Option<f64>,
    pub scale: Option<f64>,
    /// Rotation in degrees
    pub rotation: Option<f64>,

    /// Seconds
    pub duration: Option<f64>,
    /// Seconds
    pub delay: Option<f64>,
    pub ease: Option<Easing>,
    /// Seconds between consecutive targets
    pub stagger: Option<f64>,
    pub stagger_from: StaggerDirection,
    /// Extra iterations; `-1` repeats forever
    pub repeat: Option<i32>,
    /// Alternate direction on every repeat
    pub yoyo: bool,

    /// Properties outside the animatable set
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,

    #[serde(skip)]
    pub on_start: Option<VarsCallback>,
    #[serde(skip)]
    pub on_update: Option<UpdateCallback>,
    #[serde(skip)]
    pub on_complete: Option<VarsCallback>,
}

impl AnimationVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opacity(mut self, value: f64) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn with_x(mut self, px: f64) -> Self {
        self.x = Some(px);
        self
    }

    pub fn with_y(mut self, px: f64) -> Self {
        self.y = Some(px);
        self
    }

    pub fn with_scale(mut self, value: f64) -> Self {
        self.scale = Some(value);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_delay(mut self, secs: f64) -> Self {
        self.delay = Some(secs);
        self
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn with_stagger(mut self, secs: f64) -> Self {
        self.stagger = Some(secs);
        self
    }

    pub fn with_stagger_from(mut self, direction: StaggerDirection) -> Self {
        self.stagger_from = direction;
        self
    }

    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Set an arbitrary property; non-animatable keys are dropped at translation
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn on_start(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(callback));
        self
    }

    pub fn on_update(mut self, callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(callback));
        self
    }

    /// Whether any transform component is set
    pub fn has_transform(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.scale.is_some() || self.rotation.is_some()
    }

    pub fn has_callbacks(&self) -> bool {
        self.on_start.is_some() || self.on_update.is_some() || self.on_complete.is_some()
    }

    /// Shallow merge: every field set on `overrides` wins
    pub fn merge(mut self, overrides: &AnimationVars) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if overrides.$field.is_some() {
                    self.$field = overrides.$field.clone();
                })*
            };
        }
        take!(
            opacity, x, y, scale, rotation, duration, delay, ease, stagger, repeat, on_start,
            on_update, on_complete
        );
        if overrides.stagger_from != StaggerDirection::default() {
            self.stagger_from = overrides.stagger_from;
        }
        self.yoyo |= overrides.yoyo;
        self.extra
            .extend(overrides.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Fill unset timing fields from timeline defaults
    ///
    /// Callbacks are never inherited; they belong to the call that set them.
    pub fn with_defaults(mut self, defaults: &AnimationVars) -> Self {
        self.duration = self.duration.or(defaults.duration);
        self.delay = self.delay.or(defaults.delay);
        self.ease = self.ease.or(defaults.ease);
        self.stagger = self.stagger.or(defaults.stagger);
        self.repeat = self.repeat.or(defaults.repeat);
        self.yoyo |= defaults.yoyo;
        if self.stagger_from == StaggerDirection::default() {
            self.stagger_from = defaults.stagger_from;
        }
        self
    }

    /// Zero-length copy: properties, delay and stagger only
    pub fn instant(&self) -> AnimationVars {
        AnimationVars {
            opacity: self.opacity,
            x: self.x,
            y: self.y,
            scale: self.scale,
            rotation: self.rotation,
            duration: Some(0.0),
            delay: self.delay,
            stagger: self.stagger,
            stagger_from: self.stagger_from,
            extra: self.extra.clone(),
            ..Default::default()
        }
    }

    /// Vars at rest: opacity 1, no translation, scale 1, no rotation
    ///
    /// Only the properties set on `self` are included. A `from` tween ends
    /// here for every property the element does not style inline.
    pub fn identity(&self) -> AnimationVars {
        AnimationVars {
            opacity: self.opacity.map(|_| 1.0),
            x: self.x.map(|_| 0.0),
            y: self.y.map(|_| 0.0),
            scale: self.scale.map(|_| 1.0),
            rotation: self.rotation.map(|_| 0.0),
            ..Default::default()
        }
    }
}

impl fmt::Debug for AnimationVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationVars")
            .field("opacity", &self.opacity)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("ease", &self.ease)
            .field("stagger", &self.stagger)
            .field("stagger_from", &self.stagger_from)
            .field("repeat", &self.repeat)
            .field("yoyo", &self.yoyo)
            .field("extra", &self.extra)
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}
