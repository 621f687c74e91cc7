//! Wake Host Primitives
//!
//! The motion engine never talks to a browser directly. Everything it needs
//! from the host is expressed here as a trait:
//!
//! - **Elements**: inline `transform`/`opacity`, attributes, classes, children
//!   and `animate()` for native keyframe animations
//! - **Native animations**: play/pause/reverse/cancel, seeking, playback rate
//! - **Frames**: `requestAnimationFrame`-style one-shot callbacks
//! - **Intersection observers**: visibility entries per observed element
//! - **Media queries**: `prefers-reduced-motion` and friends
//!
//! The [`headless`] module provides a deterministic in-memory host with a
//! manual clock, used by the test suites of every wake crate.
//!
//! # Example
//!
//! ```rust
//! use wake_core::headless::HeadlessHost;
//! use wake_core::{Element, EffectTiming, Keyframe};
//!
//! let headless = HeadlessHost::new();
//! let card = headless.create_element("article");
//!
//! let animation = card
//!     .animate(&[Keyframe::opacity(1.0)], &EffectTiming::new(300.0))
//!     .expect("headless elements can animate");
//!
//! headless.advance(300.0);
//! assert_eq!(animation.current_time(), 300.0);
//! ```

pub mod error;
pub mod events;
pub mod host;

#[cfg(feature = "headless")]
pub mod headless;

pub use error::{HostError, Result};
pub use events::{
    IntersectionCallback, IntersectionEntry, IntersectionObserver, IntersectionObserverFactory,
    ObserverInit,
};
pub use host::{
    Document, EffectTiming, Element, ElementId, ElementRef, FillMode, FinishCallback,
    FrameCallback, FrameScheduler, Host, Keyframe, MediaQueries, NativeAnimation, Node, Overlay,
    OverlayKind, PlayState, PlaybackDirection, StyleProperty, REDUCED_MOTION_QUERY,
};
