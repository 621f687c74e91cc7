//! Reveal options and observable state
//!
//! [`RevealOptions`] is the fully resolved configuration of one reveal.
//! [`RevealOverrides`] is the partial form callers and presets merge on top
//! of it; every field is optional and a present field replaces the base
//! value wholesale (the `from`/`to` vars are not merged key by key).

use serde::{Deserialize, Serialize};
use wake_animation::{AnimationVars, Easing};
use wake_core::ObserverInit;

/// Viewport fraction that must be visible before revealing
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// Shrinks the bottom of the viewport so reveals start slightly after entry
pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -10% 0px";

/// Seconds
pub const DEFAULT_DURATION: f64 = 0.6;

/// Ease-out curve shared with the motion tokens
pub const DEFAULT_EASE: Easing = Easing::CubicBezier(0.22, 1.0, 0.36, 1.0);

/// Resolved reveal configuration
#[derive(Clone, Debug)]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: String,
    /// Reveal only the first time the element enters
    pub once: bool,
    /// Seconds
    pub delay: f64,
    /// Seconds
    pub duration: f64,
    pub ease: Easing,
    /// Hidden state applied on mount
    pub from: AnimationVars,
    /// Visible state animated to on entry
    pub to: AnimationVars,
    /// Seconds between direct children; zero animates the element itself
    pub stagger: f64,
    /// Draw trigger markers in development builds
    pub markers: bool,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            once: true,
            delay: 0.0,
            duration: DEFAULT_DURATION,
            ease: DEFAULT_EASE,
            from: AnimationVars::new().with_opacity(0.0).with_y(30.0),
            to: AnimationVars::new().with_opacity(1.0).with_y(0.0),
            stagger: 0.0,
            markers: false,
        }
    }
}

impl RevealOptions {
    /// Shallow merge; present overrides replace base values
    pub fn merge(mut self, overrides: &RevealOverrides) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(value) = &overrides.$field {
                    self.$field = value.clone();
                })*
            };
        }
        take!(threshold, root_margin, once, delay, duration, ease, from, to, stagger, markers);
        self
    }

    /// Whether children animate one after another
    pub fn is_staggered(&self) -> bool {
        self.stagger > 0.0
    }

    /// Vars for the reveal tween: the `to` state with this reveal's timing
    pub fn reveal_vars(&self) -> AnimationVars {
        let vars = self
            .to
            .clone()
            .with_duration(self.duration)
            .with_delay(self.delay)
            .with_ease(self.ease);
        if self.is_staggered() {
            vars.with_stagger(self.stagger)
        } else {
            vars
        }
    }

    pub fn observer_init(&self) -> ObserverInit {
        ObserverInit::new(self.threshold, self.root_margin.clone())
    }
}

/// Partial reveal options
///
/// Deserializes from the camelCase shape used in markup and config files:
///
/// ```rust
/// use wake_reveal::RevealOverrides;
///
/// let overrides: RevealOverrides =
///     serde_json::from_str(r#"{ "once": false, "rootMargin": "0px", "to": { "opacity": 1 } }"#)
///         .unwrap();
/// assert_eq!(overrides.once, Some(false));
/// assert_eq!(overrides.to.and_then(|to| to.opacity), Some(1.0));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealOverrides {
    pub threshold: Option<f64>,
    pub root_margin: Option<String>,
    pub once: Option<bool>,
    pub delay: Option<f64>,
    pub duration: Option<f64>,
    pub ease: Option<Easing>,
    pub from: Option<AnimationVars>,
    pub to: Option<AnimationVars>,
    pub stagger: Option<f64>,
    pub markers: Option<bool>,
}

impl RevealOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_root_margin(mut self, margin: impl Into<String>) -> Self {
        self.root_margin = Some(margin.into());
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = Some(once);
        self
    }

    pub fn with_delay(mut self, secs: f64) -> Self {
        self.delay = Some(secs);
        self
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn with_from(mut self, from: AnimationVars) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: AnimationVars) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_stagger(mut self, secs: f64) -> Self {
        self.stagger = Some(secs);
        self
    }

    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = Some(markers);
        self
    }

    /// Layer `other` on top; its present fields win
    pub fn and(mut self, other: &RevealOverrides) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        take!(threshold, root_margin, once, delay, duration, ease, from, to, stagger, markers);
        self
    }
}

/// Observable state of a reveal
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RevealState {
    /// Set when the reveal tween starts, cleared on a repeatable reset
    pub is_revealed: bool,
    /// Last intersection reported for the element
    pub is_in_view: bool,
    /// Reveal tween progress (0.0 to 1.0)
    pub progress: f64,
}

impl RevealState {
    /// Nothing observed yet
    pub const HIDDEN: RevealState = RevealState {
        is_revealed: false,
        is_in_view: false,
        progress: 0.0,
    };

    /// Final state without animating (reduced motion, degraded hosts)
    pub const SETTLED: RevealState = RevealState {
        is_revealed: true,
        is_in_view: true,
        progress: 1.0,
    };
}
