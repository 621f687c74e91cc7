//! Animated section binding
//!
//! Declarative wrapper that resolves a preset by name, wires a
//! [`RevealController`] to a section element and mirrors the reveal state
//! into attributes and classes for styling:
//!
//! | Attribute       | Value                         |
//! |-----------------|-------------------------------|
//! | `data-animate`  | preset id                     |
//! | `data-revealed` | `true` / `false`              |
//! | `data-in-view`  | `true` / `false`              |
//! | `data-progress` | progress with two decimals    |
//!
//! Classes: `is-revealed`, `is-in-view`, `reduced-motion`, `debug-mode`.

use std::time::Duration;

use tracing::debug;
use wake_animation::{MotionConfig, MotionContext};
use wake_core::{ElementRef, Overlay};

use crate::controller::RevealController;
use crate::options::{RevealOptions, RevealOverrides, RevealState};
use crate::presets::RevealPreset;

pub const DEBUG_PANEL_KEY: &str = "wake-section-debug";

/// Section configuration
#[derive(Clone, Debug)]
pub struct AnimatedSection {
    animate: String,
    animation_options: RevealOverrides,
    stagger_children: bool,
    stagger_delay: Option<Duration>,
    debug: bool,
    class_name: Option<String>,
    attributes: Vec<(String, String)>,
}

impl Default for AnimatedSection {
    fn default() -> Self {
        Self {
            animate: RevealPreset::FadeUp.id().to_string(),
            animation_options: RevealOverrides::default(),
            stagger_children: false,
            stagger_delay: None,
            debug: false,
            class_name: None,
            attributes: Vec::new(),
        }
    }
}

impl AnimatedSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset name; unknown names fall back to fade-up
    pub fn animate(mut self, preset: impl Into<String>) -> Self {
        self.animate = preset.into();
        self
    }

    pub fn animation_options(mut self, overrides: RevealOverrides) -> Self {
        self.animation_options = overrides;
        self
    }

    pub fn stagger_children(mut self, stagger: bool) -> Self {
        self.stagger_children = stagger;
        self
    }

    /// Interval between children; defaults to the stagger token
    pub fn stagger_delay(mut self, delay: Duration) -> Self {
        self.stagger_delay = Some(delay);
        self
    }

    /// Markers and a state panel in development builds
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Extra attribute forwarded to the element unchanged
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn preset(&self) -> RevealPreset {
        RevealPreset::from_name(&self.animate)
    }

    /// Preset options with the section's overrides, stagger and debug flag
    pub fn resolve_options(&self, config: &MotionConfig) -> RevealOptions {
        let stagger = if self.stagger_children {
            self.stagger_delay.unwrap_or(config.stagger).as_secs_f64()
        } else {
            0.0
        };

        let mut overrides = self.animation_options.clone().with_stagger(stagger);
        if self.debug {
            overrides = overrides.with_markers(true);
        }
        self.preset().options(&overrides)
    }

    /// Bind to `element` and start observing
    pub async fn mount(&self, context: &MotionContext, element: ElementRef) -> MountedSection {
        let preset = self.preset();

        if let Some(class_name) = &self.class_name {
            for class in class_name.split_whitespace() {
                element.toggle_class(class, true);
            }
        }
        for (name, value) in &self.attributes {
            element.set_attribute(name, value);
        }
        element.set_attribute("data-animate", preset.id());

        let mirror = StateMirror {
            element: element.clone(),
            preset,
            reduced_motion: context.reduced_motion(),
            debug: self.debug && context.host().development,
        };

        let controller = RevealController::new(
            context,
            element,
            self.resolve_options(context.config()),
        );
        mirror.apply(&controller.state());

        let debug = mirror.debug;
        let element = mirror.element.clone();
        controller.subscribe(move |state| mirror.apply(state));
        controller.mount().await;
        debug!(preset = preset.id(), phase = %controller.phase(), "section mounted");

        MountedSection {
            element,
            controller,
            preset,
            debug,
        }
    }
}

struct StateMirror {
    element: ElementRef,
    preset: RevealPreset,
    reduced_motion: bool,
    debug: bool,
}

impl StateMirror {
    fn apply(&self, state: &RevealState) {
        let element = self.element.as_ref();
        element.set_attribute("data-revealed", bool_str(state.is_revealed));
        element.set_attribute("data-in-view", bool_str(state.is_in_view));
        element.set_attribute("data-progress", &format!("{:.2}", state.progress));

        element.toggle_class("is-revealed", state.is_revealed);
        element.toggle_class("is-in-view", state.is_in_view);
        element.toggle_class("reduced-motion", self.reduced_motion);
        element.toggle_class("debug-mode", self.debug);

        if self.debug {
            element.attach_overlay(Overlay::panel(
                DEBUG_PANEL_KEY,
                panel_text(self.preset, state),
            ));
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn panel_text(preset: RevealPreset, state: &RevealState) -> String {
    format!(
        "{}\nrevealed: {}\nin view: {}\nprogress: {:.2}",
        preset.id(),
        state.is_revealed,
        state.is_in_view,
        state.progress
    )
}

/// A mounted section; dropping it cleans up the reveal
pub struct MountedSection {
    element: ElementRef,
    controller: RevealController,
    preset: RevealPreset,
    debug: bool,
}

impl MountedSection {
    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    pub fn controller(&self) -> &RevealController {
        &self.controller
    }

    pub fn preset(&self) -> RevealPreset {
        self.preset
    }

    pub fn state(&self) -> RevealState {
        self.controller.state()
    }

    pub fn unmount(self) {}
}

impl Drop for MountedSection {
    fn drop(&mut self) {
        self.controller.cleanup();
        if self.debug {
            self.element.detach_overlay(DEBUG_PANEL_KEY);
        }
    }
}
