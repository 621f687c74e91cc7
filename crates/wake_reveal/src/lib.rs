//! Wake Scroll Reveals
//!
//! Intersection-driven reveal animations on top of `wake_animation`.
//!
//! # Features
//!
//! - **Reveal controller**: hide on mount, tween in on entry, once or repeatable
//! - **Presets**: fade-up, fade-in, scale-in, slides, card stagger, hero and
//!   masked headline entrances
//! - **Section binding**: preset by name with state mirrored to attributes
//!   and classes
//! - **Reduced motion**: settled state, no observers, no animations
//!
//! # Example
//!
//! ```rust
//! use wake_animation::MotionContext;
//! use wake_core::headless::HeadlessHost;
//! use wake_core::{Element, ElementRef};
//! use wake_reveal::{presets, use_reveal, RevealOverrides};
//!
//! let headless = HeadlessHost::new();
//! let section = headless.create_element("section");
//! let context = MotionContext::new(headless.host());
//!
//! let element: ElementRef = section.clone();
//! let reveal = futures::executor::block_on(use_reveal(
//!     &context,
//!     element,
//!     presets::fade_up(&RevealOverrides::default()),
//! ));
//! assert!(!reveal.is_revealed());
//!
//! headless.set_intersecting(section.id(), true);
//! headless.advance(600.0);
//! assert!(reveal.is_revealed());
//! assert_eq!(reveal.progress(), 1.0);
//! ```

pub mod controller;
pub mod markers;
pub mod options;
pub mod phase;
pub mod presets;
pub mod section;

pub use controller::{use_reveal, RevealController, StateListener, StateListenerKey};
pub use options::{RevealOptions, RevealOverrides, RevealState};
pub use phase::{PhaseMachine, RevealEvent, RevealPhase};
pub use presets::RevealPreset;
pub use section::{AnimatedSection, MountedSection};
