//! Motion configuration
//!
//! Design tokens shared by every animation: durations, stagger interval,
//! default easing, the animatable property allow-list and the
//! reduced-motion flag. A [`MotionConfig`] is built once per application
//! root and never mutated afterwards.
//!
//! Tokens can be overridden from a `[motion]` TOML table:
//!
//! ```toml
//! [motion]
//! section_ms = 700
//! stagger_ms = 60
//! easing = "power3.out"
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wake_core::{Host, StyleProperty};

use crate::easing::Easing;
use crate::error::ConfigError;

/// A CSS property the engine is allowed to animate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatableProperty {
    Transform,
    Opacity,
}

impl AnimatableProperty {
    pub fn css_name(self) -> &'static str {
        self.style_property().css_name()
    }

    pub fn style_property(self) -> StyleProperty {
        match self {
            AnimatableProperty::Transform => StyleProperty::Transform,
            AnimatableProperty::Opacity => StyleProperty::Opacity,
        }
    }
}

impl fmt::Display for AnimatableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for AnimatableProperty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "transform" => Ok(AnimatableProperty::Transform),
            "opacity" => Ok(AnimatableProperty::Opacity),
            other => Err(ConfigError::DisallowedProperty(other.to_string())),
        }
    }
}

/// Process-wide motion tokens
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Hover and press feedback
    pub micro: Duration,
    /// Default tween duration
    pub ui: Duration,
    /// Section reveals
    pub section: Duration,
    /// Page transitions
    pub page: Duration,
    /// Delay between staggered children
    pub stagger: Duration,
    pub easing: Easing,
    allowed_properties: BTreeSet<AnimatableProperty>,
    pub reduced_motion: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            micro: Duration::from_millis(150),
            ui: Duration::from_millis(250),
            section: Duration::from_millis(600),
            page: Duration::from_millis(900),
            stagger: Duration::from_millis(75),
            easing: Easing::CubicBezier(0.22, 1.0, 0.36, 1.0),
            allowed_properties: default_allowed_properties(),
            reduced_motion: false,
        }
    }
}

fn default_allowed_properties() -> BTreeSet<AnimatableProperty> {
    BTreeSet::from([AnimatableProperty::Transform, AnimatableProperty::Opacity])
}

impl MotionConfig {
    /// Design tokens with the reduced-motion preference read from the host
    pub fn detect(host: &Host) -> Self {
        Self::default().resolve(host)
    }

    /// Apply the host's reduced-motion preference
    ///
    /// A config that already asks for reduced motion keeps it.
    pub fn resolve(mut self, host: &Host) -> Self {
        self.reduced_motion |= host.prefers_reduced_motion();
        self
    }

    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Parse a TOML document with an optional `[motion]` table
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: MotionFile = toml::from_str(source)?;
        file.motion.into_config()
    }

    pub fn allowed_properties(&self) -> &BTreeSet<AnimatableProperty> {
        &self.allowed_properties
    }

    pub fn allows(&self, property: AnimatableProperty) -> bool {
        self.allowed_properties.contains(&property)
    }

    /// Stagger interval in seconds, the unit of animation vars
    pub fn stagger_secs(&self) -> f64 {
        self.stagger.as_secs_f64()
    }
}

#[derive(Debug, Default, Deserialize)]
struct MotionFile {
    #[serde(default)]
    motion: MotionTable,
}

/// `[motion]` table; missing keys keep the design constants
#[derive(Debug, Deserialize)]
struct MotionTable {
    #[serde(default = "default_micro_ms")]
    micro_ms: u64,
    #[serde(default = "default_ui_ms")]
    ui_ms: u64,
    #[serde(default = "default_section_ms")]
    section_ms: u64,
    #[serde(default = "default_page_ms")]
    page_ms: u64,
    #[serde(default = "default_stagger_ms")]
    stagger_ms: u64,
    #[serde(default)]
    easing: Option<String>,
    #[serde(default)]
    allowed_properties: Option<Vec<String>>,
    #[serde(default)]
    reduced_motion: bool,
}

fn default_micro_ms() -> u64 {
    150
}

fn default_ui_ms() -> u64 {
    250
}

fn default_section_ms() -> u64 {
    600
}

fn default_page_ms() -> u64 {
    900
}

fn default_stagger_ms() -> u64 {
    75
}

impl Default for MotionTable {
    fn default() -> Self {
        Self {
            micro_ms: default_micro_ms(),
            ui_ms: default_ui_ms(),
            section_ms: default_section_ms(),
            page_ms: default_page_ms(),
            stagger_ms: default_stagger_ms(),
            easing: None,
            allowed_properties: None,
            reduced_motion: false,
        }
    }
}

impl MotionTable {
    fn into_config(self) -> Result<MotionConfig, ConfigError> {
        let durations = [
            ("micro_ms", self.micro_ms),
            ("ui_ms", self.ui_ms),
            ("section_ms", self.section_ms),
            ("page_ms", self.page_ms),
        ];
        if let Some((field, _)) = durations.into_iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::ZeroDuration(field));
        }

        let easing = match self.easing {
            Some(name) => name.parse()?,
            None => MotionConfig::default().easing,
        };

        // The list may narrow the allow-list but never widen it
        let allowed_properties = match self.allowed_properties {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<AnimatableProperty>())
                .collect::<Result<BTreeSet<_>, _>>()?,
            None => default_allowed_properties(),
        };

        Ok(MotionConfig {
            micro: Duration::from_millis(self.micro_ms),
            ui: Duration::from_millis(self.ui_ms),
            section: Duration::from_millis(self.section_ms),
            page: Duration::from_millis(self.page_ms),
            stagger: Duration::from_millis(self.stagger_ms),
            easing,
            allowed_properties,
            reduced_motion: self.reduced_motion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wake_core::headless::HeadlessHost;

    #[test]
    fn test_design_constants() {
        let config = MotionConfig::default();
        assert_eq!(config.micro, Duration::from_millis(150));
        assert_eq!(config.ui, Duration::from_millis(250));
        assert_eq!(config.section, Duration::from_millis(600));
        assert_eq!(config.page, Duration::from_millis(900));
        assert_eq!(config.stagger, Duration::from_millis(75));
        assert_eq!(config.easing.to_css(), "cubic-bezier(0.22, 1, 0.36, 1)");
        assert!(config.allows(AnimatableProperty::Transform));
        assert!(config.allows(AnimatableProperty::Opacity));
        assert!(!config.reduced_motion);
    }

    #[test]
    fn test_detect_reads_reduced_motion() {
        let headless = HeadlessHost::new().with_reduced_motion(true);
        assert!(MotionConfig::detect(&headless.host()).reduced_motion);
        assert!(!MotionConfig::detect(&HeadlessHost::new().host()).reduced_motion);
    }

    #[test]
    fn test_toml_overrides() {
        let config = MotionConfig::from_toml_str(
            r#"
            [motion]
            section_ms = 700
            stagger_ms = 60
            easing = "power3.out"
            allowed_properties = ["opacity"]
            "#,
        )
        .unwrap();

        assert_eq!(config.section, Duration::from_millis(700));
        assert_eq!(config.stagger, Duration::from_millis(60));
        assert_eq!(config.ui, Duration::from_millis(250));
        assert_eq!(config.easing, Easing::EaseOutQuart);
        assert!(!config.allows(AnimatableProperty::Transform));
    }

    #[test]
    fn test_empty_document_keeps_defaults() {
        assert_eq!(MotionConfig::from_toml_str("").unwrap(), MotionConfig::default());
    }

    #[test]
    fn test_toml_rejects_widening_allow_list() {
        let err = MotionConfig::from_toml_str(
            r#"
            [motion]
            allowed_properties = ["transform", "width"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DisallowedProperty(p) if p == "width"));
    }

    #[test]
    fn test_toml_rejects_bad_values() {
        assert!(matches!(
            MotionConfig::from_toml_str("[motion]\nui_ms = 0"),
            Err(ConfigError::ZeroDuration("ui_ms"))
        ));
        assert!(matches!(
            MotionConfig::from_toml_str("[motion]\neasing = \"wobble\""),
            Err(ConfigError::InvalidEasing(_))
        ));
        assert!(matches!(
            MotionConfig::from_toml_str("[motion]\nui_ms = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
