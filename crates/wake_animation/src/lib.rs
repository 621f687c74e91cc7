//! Wake Animation System
//!
//! A tween-library-shaped animation API over host native animations,
//! restricted to `transform` and `opacity`.
//!
//! # Features
//!
//! - **Motion tokens**: durations, stagger, easing and the reduced-motion flag
//! - **Vars**: declarative target states (`opacity`, `x`, `y`, `scale`, `rotation`)
//! - **Timelines**: grouped native animations with play/pause/reverse/kill,
//!   progress and time scale, and one lifecycle subscription point
//! - **Reduced motion**: a no-op animator that never creates an animation
//!
//! # Example
//!
//! ```rust
//! use wake_animation::{AnimationVars, MotionContext, Target, TimelineStatus};
//! use wake_core::headless::HeadlessHost;
//!
//! let headless = HeadlessHost::new();
//! let card = headless.create_element("article");
//! let context = MotionContext::new(headless.host());
//!
//! let animator = futures::executor::block_on(context.animator()).unwrap();
//! let timeline = animator.to(
//!     Target::element(card.clone()),
//!     AnimationVars::new().with_opacity(1.0).with_y(0.0).with_duration(0.6),
//! );
//!
//! headless.advance(600.0);
//! assert_eq!(timeline.status(), TimelineStatus::Completed);
//! assert_eq!(timeline.progress(), 1.0);
//! ```

pub mod animator;
pub mod config;
pub mod context;
pub mod easing;
pub mod error;
pub mod keyframe;
pub mod target;
pub mod timeline;
pub mod vars;

pub use animator::{create_animator, Animator, NativeAnimator, NoopAnimator};
pub use config::{AnimatableProperty, MotionConfig};
pub use context::{AnimatorFactory, MotionContext};
pub use easing::Easing;
pub use error::{ConfigError, MotionError, Result};
pub use target::Target;
pub use timeline::{
    ListenerKey, Timeline, TimelineEvent, TimelineKey, TimelineListener, TimelineOptions,
    TimelineStatus,
};
pub use vars::{AnimationVars, StaggerDirection, UpdateCallback, VarsCallback};
