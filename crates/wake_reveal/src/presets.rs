//! Built-in reveal presets.
//!
//! Each preset is a pure function from caller overrides to a full
//! [`RevealOptions`]: the preset's defaults with the overrides merged on
//! top. Presets never touch the host.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use tracing::warn;
use wake_animation::{AnimationVars, Easing};

use crate::options::{RevealOptions, RevealOverrides};

/// Built-in preset catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealPreset {
    /// Rise 30px while fading in.
    #[default]
    FadeUp,
    FadeIn,
    /// Grow from 95% while fading in.
    ScaleIn,
    SlideInLeft,
    SlideInRight,
    /// Direct children rise one after another.
    CardStagger,
    /// Slow, slightly delayed entrance for page heroes.
    HeroReveal,
    /// Headline lines rise out of their mask.
    MaskedHeadline,
}

impl RevealPreset {
    /// Stable preset id used in markup (`data-animate`) and config.
    pub fn id(self) -> &'static str {
        match self {
            Self::FadeUp => "fade-up",
            Self::FadeIn => "fade-in",
            Self::ScaleIn => "scale-in",
            Self::SlideInLeft => "slide-in-left",
            Self::SlideInRight => "slide-in-right",
            Self::CardStagger => "card-stagger",
            Self::HeroReveal => "hero-reveal",
            Self::MaskedHeadline => "masked-headline",
        }
    }

    /// User-facing display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::FadeUp => "Fade Up",
            Self::FadeIn => "Fade In",
            Self::ScaleIn => "Scale In",
            Self::SlideInLeft => "Slide In Left",
            Self::SlideInRight => "Slide In Right",
            Self::CardStagger => "Card Stagger",
            Self::HeroReveal => "Hero Reveal",
            Self::MaskedHeadline => "Masked Headline",
        }
    }

    /// Full preset list.
    pub fn all() -> &'static [RevealPreset] {
        const PRESETS: [RevealPreset; 8] = [
            RevealPreset::FadeUp,
            RevealPreset::FadeIn,
            RevealPreset::ScaleIn,
            RevealPreset::SlideInLeft,
            RevealPreset::SlideInRight,
            RevealPreset::CardStagger,
            RevealPreset::HeroReveal,
            RevealPreset::MaskedHeadline,
        ];
        &PRESETS
    }

    /// Look a preset up by id or camelCase name (`fade-up`, `fadeUp`).
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|preset| preset.id() == name || camel_case(preset.id()) == name)
    }

    /// Like [`lookup`](Self::lookup), falling back to fade-up for unknown names.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            warn!(preset = name, fallback = "fade-up", "unknown reveal preset");
            Self::FadeUp
        })
    }

    /// Preset defaults without overrides.
    pub fn defaults(self) -> RevealOptions {
        match self {
            Self::FadeUp => RevealOptions::default(),
            Self::FadeIn => RevealOptions {
                from: AnimationVars::new().with_opacity(0.0),
                to: AnimationVars::new().with_opacity(1.0),
                ..RevealOptions::default()
            },
            Self::ScaleIn => RevealOptions {
                duration: 0.5,
                from: AnimationVars::new().with_opacity(0.0).with_scale(0.95),
                to: AnimationVars::new().with_opacity(1.0).with_scale(1.0),
                ..RevealOptions::default()
            },
            Self::SlideInLeft => RevealOptions {
                from: AnimationVars::new().with_opacity(0.0).with_x(-40.0),
                to: AnimationVars::new().with_opacity(1.0).with_x(0.0),
                ..RevealOptions::default()
            },
            Self::SlideInRight => RevealOptions {
                from: AnimationVars::new().with_opacity(0.0).with_x(40.0),
                to: AnimationVars::new().with_opacity(1.0).with_x(0.0),
                ..RevealOptions::default()
            },
            Self::CardStagger => RevealOptions {
                threshold: 0.1,
                duration: 0.5,
                stagger: 0.075,
                from: AnimationVars::new().with_opacity(0.0).with_y(24.0),
                to: AnimationVars::new().with_opacity(1.0).with_y(0.0),
                ..RevealOptions::default()
            },
            Self::HeroReveal => RevealOptions {
                delay: 0.1,
                duration: 0.9,
                ease: Easing::EaseOutExpo,
                from: AnimationVars::new()
                    .with_opacity(0.0)
                    .with_y(40.0)
                    .with_scale(0.98),
                to: AnimationVars::new()
                    .with_opacity(1.0)
                    .with_y(0.0)
                    .with_scale(1.0),
                ..RevealOptions::default()
            },
            Self::MaskedHeadline => RevealOptions {
                threshold: 0.3,
                duration: 0.9,
                stagger: 0.08,
                ease: Easing::EaseOutQuart,
                from: AnimationVars::new().with_opacity(0.0).with_y(60.0),
                to: AnimationVars::new().with_opacity(1.0).with_y(0.0),
                ..RevealOptions::default()
            },
        }
    }

    /// Preset defaults with `overrides` merged on top.
    pub fn options(self, overrides: &RevealOverrides) -> RevealOptions {
        self.defaults().merge(overrides)
    }
}

impl Display for RevealPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for RevealPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown reveal preset: {s}"))
    }
}

fn camel_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut upper = false;
    for c in id.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn fade_up(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::FadeUp.options(overrides)
}

pub fn fade_in(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::FadeIn.options(overrides)
}

pub fn scale_in(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::ScaleIn.options(overrides)
}

pub fn slide_in_left(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::SlideInLeft.options(overrides)
}

pub fn slide_in_right(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::SlideInRight.options(overrides)
}

pub fn card_stagger(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::CardStagger.options(overrides)
}

pub fn hero_reveal(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::HeroReveal.options(overrides)
}

pub fn masked_headline(overrides: &RevealOverrides) -> RevealOptions {
    RevealPreset::MaskedHeadline.options(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("fade-up"), "fadeUp");
        assert_eq!(camel_case("slide-in-left"), "slideInLeft");
        assert_eq!(camel_case("fade"), "fade");
    }
}
