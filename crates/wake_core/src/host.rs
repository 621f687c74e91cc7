//! Host primitives
//!
//! Browser APIs the engine depends on (`Element.animate`, inline styles,
//! `requestAnimationFrame`, `matchMedia`) expressed as object-safe traits.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::events::IntersectionObserverFactory;

/// Media query matched when the user asked the OS to minimise motion
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Stable identifier of a host element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inline style properties the engine writes
///
/// Only compositor-friendly properties exist here; there is no way to ask a
/// host element to animate layout or paint properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleProperty {
    Transform,
    Opacity,
}

impl StyleProperty {
    /// CSS property name
    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::Transform => "transform",
            StyleProperty::Opacity => "opacity",
        }
    }
}

/// A keyframe handed to [`Element::animate`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    /// Composed CSS transform, e.g. `translateY(30px) scale(0.95)`
    pub transform: Option<String>,
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f64>,
}

impl Keyframe {
    /// Keyframe with only opacity set
    pub fn opacity(value: f64) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Keyframe with only a transform set
    pub fn transform(value: impl Into<String>) -> Self {
        Self {
            transform: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transform.is_none() && self.opacity.is_none()
    }
}

/// Fill mode of a native animation effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Effect stops applying once the animation is done
    None,
    /// Hold the final keyframe after the animation completes
    #[default]
    Forwards,
    /// Apply the first keyframe during the delay phase
    Backwards,
    /// Both forwards and backwards
    Both,
}

/// Iteration direction of a native animation effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackDirection {
    #[default]
    Normal,
    Reverse,
    /// Every other iteration runs backwards (yoyo)
    Alternate,
}

/// Timing of a native animation effect
///
/// All times are milliseconds, the unit of the native animation API.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectTiming {
    pub duration_ms: f64,
    pub delay_ms: f64,
    /// CSS timing function, e.g. `cubic-bezier(0.22, 1, 0.36, 1)`
    pub easing: String,
    /// Iteration count; `f64::INFINITY` repeats forever
    pub iterations: f64,
    pub direction: PlaybackDirection,
    pub fill: FillMode,
}

impl EffectTiming {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
            easing: "linear".to_string(),
            iterations: 1.0,
            direction: PlaybackDirection::Normal,
            fill: FillMode::Forwards,
        }
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Duration of all iterations, excluding the delay
    pub fn active_duration_ms(&self) -> f64 {
        if self.iterations.is_infinite() {
            f64::INFINITY
        } else {
            self.duration_ms * self.iterations
        }
    }

    /// End of the active phase, measured from the start of the delay
    pub fn end_time_ms(&self) -> f64 {
        self.delay_ms + self.active_duration_ms()
    }

    /// End of the first iteration, measured from the start of the delay
    pub fn iteration_end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }
}

/// Play state of a native animation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    /// Cancelled or never started
    Idle,
    Running,
    Paused,
    Finished,
}

/// Callback fired every time a native animation finishes
pub type FinishCallback = Arc<dyn Fn() + Send + Sync>;

/// A native animation handle (`Animation` in the Web Animations API)
pub trait NativeAnimation: Send + Sync {
    fn play(&self);
    fn pause(&self);
    /// Flip the playback rate and play
    fn reverse(&self);
    /// Stop and drop the effect without firing finish callbacks
    fn cancel(&self);

    /// Current time in milliseconds, including the delay phase
    fn current_time(&self) -> f64;
    fn set_current_time(&self, time_ms: f64);

    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&self, rate: f64);

    fn timing(&self) -> EffectTiming;
    fn play_state(&self) -> PlayState;

    /// Replace the finish callback (`onfinish`); `None` clears it
    fn set_on_finish(&self, callback: Option<FinishCallback>);
}

/// Kind of a debug overlay drawn inside an element
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayKind {
    /// Horizontal line at `offset_percent` of the element height
    Line { offset_percent: f64 },
    /// Text label pinned to the element
    Label,
    /// Multi-line status panel
    Panel,
}

/// Development-only decoration attached to an element
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Key used to replace or detach the overlay
    pub key: String,
    pub kind: OverlayKind,
    pub text: String,
}

impl Overlay {
    pub fn line(key: impl Into<String>, offset_percent: f64) -> Self {
        Self {
            key: key.into(),
            kind: OverlayKind::Line { offset_percent },
            text: String::new(),
        }
    }

    pub fn label(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: OverlayKind::Label,
            text: text.into(),
        }
    }

    pub fn panel(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: OverlayKind::Panel,
            text: text.into(),
        }
    }
}

/// A host element
pub trait Element: Send + Sync {
    fn id(&self) -> ElementId;
    fn tag_name(&self) -> String;

    /// Start a native keyframe animation
    ///
    /// Returns `None` when the element has no animation capability.
    fn animate(
        &self,
        keyframes: &[Keyframe],
        timing: &EffectTiming,
    ) -> Option<Arc<dyn NativeAnimation>>;

    /// Write an inline style; `None` removes the declaration
    fn set_style(&self, property: StyleProperty, value: Option<&str>);
    fn style(&self, property: StyleProperty) -> Option<String>;

    /// Direct child nodes, including text and comments
    fn children(&self) -> Vec<Node>;

    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn attribute(&self, name: &str) -> Option<String>;

    fn toggle_class(&self, class: &str, enabled: bool);
    fn has_class(&self, class: &str) -> bool;

    /// Attach a debug overlay, replacing any overlay with the same key
    fn attach_overlay(&self, overlay: Overlay);
    fn detach_overlay(&self, key: &str);
}

/// Shared element handle
pub type ElementRef = Arc<dyn Element>;

/// A node of the host tree
#[derive(Clone)]
pub enum Node {
    Element(ElementRef),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&ElementRef> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn into_element(self) -> Option<ElementRef> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(element) => write!(f, "Element({}, <{}>)", element.id(), element.tag_name()),
            Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Node::Comment(text) => f.debug_tuple("Comment").field(text).finish(),
        }
    }
}

impl From<ElementRef> for Node {
    fn from(element: ElementRef) -> Self {
        Node::Element(element)
    }
}

/// Document-level queries
pub trait Document: Send + Sync {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>>;
}

/// One-shot callback run on the next animation frame
pub type FrameCallback = Box<dyn FnOnce() + Send>;

/// `requestAnimationFrame` analog
pub trait FrameScheduler: Send + Sync {
    fn request_frame(&self, callback: FrameCallback);
}

/// `matchMedia` analog
pub trait MediaQueries: Send + Sync {
    fn matches(&self, query: &str) -> bool;
}

/// Bundle of host capabilities handed to the engine
#[derive(Clone)]
pub struct Host {
    pub document: Arc<dyn Document>,
    pub frames: Arc<dyn FrameScheduler>,
    pub observers: Arc<dyn IntersectionObserverFactory>,
    pub media: Arc<dyn MediaQueries>,
    /// Development build: enables debug markers and warnings
    pub development: bool,
}

impl Host {
    pub fn new(
        document: Arc<dyn Document>,
        frames: Arc<dyn FrameScheduler>,
        observers: Arc<dyn IntersectionObserverFactory>,
        media: Arc<dyn MediaQueries>,
    ) -> Self {
        Self {
            document,
            frames,
            observers,
            media,
            development: cfg!(debug_assertions),
        }
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Whether the OS/user preference asks for reduced motion
    pub fn prefers_reduced_motion(&self) -> bool {
        self.media.matches(REDUCED_MOTION_QUERY)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_timing_end_time() {
        let timing = EffectTiming::new(600.0).with_delay(150.0);
        assert_eq!(timing.active_duration_ms(), 600.0);
        assert_eq!(timing.end_time_ms(), 750.0);

        let mut looping = EffectTiming::new(600.0);
        looping.iterations = f64::INFINITY;
        assert!(looping.end_time_ms().is_infinite());
        assert_eq!(looping.iteration_end_ms(), 600.0);
    }

    #[test]
    fn test_keyframe_constructors() {
        assert!(Keyframe::default().is_empty());
        assert_eq!(Keyframe::opacity(0.5).opacity, Some(0.5));
        assert_eq!(
            Keyframe::transform("scale(1)").transform.as_deref(),
            Some("scale(1)")
        );
    }

    #[test]
    fn test_style_property_names() {
        assert_eq!(StyleProperty::Transform.css_name(), "transform");
        assert_eq!(StyleProperty::Opacity.css_name(), "opacity");
    }
}
