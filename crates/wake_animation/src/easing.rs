//! Easing functions for animations
//!
//! Curves are sampled in Rust with [`Easing::apply`] and handed to the host
//! as CSS timing functions with [`Easing::to_css`]. Names are accepted in CSS
//! form (`ease-out`, `cubic-bezier(...)`) and in the tween-library form the
//! compatibility layer mimics (`power2.out`, `expo.out`, `none`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease`
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseOutExpo,
    /// Overshoots past 1.0 before settling
    EaseOutBack,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Easing::EaseOutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            // CSS keywords are defined as bezier curves
            Easing::Ease | Easing::EaseIn | Easing::EaseOut | Easing::EaseInOut => {
                let (x1, y1, x2, y2) = self.control_points();
                cubic_bezier_ease(t, x1, y1, x2, y2)
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }

    /// Bezier control points approximating this curve
    pub fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            Easing::Linear => (0.0, 0.0, 1.0, 1.0),
            Easing::Ease => (0.25, 0.1, 0.25, 1.0),
            Easing::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Easing::EaseInQuad => (0.11, 0.0, 0.5, 0.0),
            Easing::EaseOutQuad => (0.5, 1.0, 0.89, 1.0),
            Easing::EaseInOutQuad => (0.45, 0.0, 0.55, 1.0),
            Easing::EaseInCubic => (0.32, 0.0, 0.67, 0.0),
            Easing::EaseOutCubic => (0.33, 1.0, 0.68, 1.0),
            Easing::EaseInOutCubic => (0.65, 0.0, 0.35, 1.0),
            Easing::EaseInQuart => (0.5, 0.0, 0.75, 0.0),
            Easing::EaseOutQuart => (0.25, 1.0, 0.5, 1.0),
            Easing::EaseInOutQuart => (0.76, 0.0, 0.24, 1.0),
            Easing::EaseInQuint => (0.64, 0.0, 0.78, 0.0),
            Easing::EaseOutQuint => (0.22, 1.0, 0.36, 1.0),
            Easing::EaseInOutQuint => (0.83, 0.0, 0.17, 1.0),
            Easing::EaseOutExpo => (0.16, 1.0, 0.3, 1.0),
            Easing::EaseOutBack => (0.34, 1.56, 0.64, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// CSS timing function for native animations
    pub fn to_css(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::Ease => "ease".to_string(),
            Easing::EaseIn => "ease-in".to_string(),
            Easing::EaseOut => "ease-out".to_string(),
            Easing::EaseInOut => "ease-in-out".to_string(),
            _ => {
                let (x1, y1, x2, y2) = self.control_points();
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(args) = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_cubic_bezier(args).ok_or_else(|| ConfigError::InvalidEasing(s.to_string()));
        }

        let easing = match name {
            "linear" | "none" => Easing::Linear,
            "ease" => Easing::Ease,
            "ease-in" => Easing::EaseIn,
            "ease-out" => Easing::EaseOut,
            "ease-in-out" => Easing::EaseInOut,
            // A bare power name eases out, like the tween library
            "power1" | "power1.out" | "quad.out" => Easing::EaseOutQuad,
            "power1.in" | "quad.in" => Easing::EaseInQuad,
            "power1.inOut" | "quad.inOut" => Easing::EaseInOutQuad,
            "power2" | "power2.out" | "cubic.out" => Easing::EaseOutCubic,
            "power2.in" | "cubic.in" => Easing::EaseInCubic,
            "power2.inOut" | "cubic.inOut" => Easing::EaseInOutCubic,
            "power3" | "power3.out" | "quart.out" => Easing::EaseOutQuart,
            "power3.in" | "quart.in" => Easing::EaseInQuart,
            "power3.inOut" | "quart.inOut" => Easing::EaseInOutQuart,
            "power4" | "power4.out" | "quint.out" => Easing::EaseOutQuint,
            "power4.in" | "quint.in" => Easing::EaseInQuint,
            "power4.inOut" | "quint.inOut" => Easing::EaseInOutQuint,
            "expo" | "expo.out" => Easing::EaseOutExpo,
            "back" | "back.out" => Easing::EaseOutBack,
            _ => return Err(ConfigError::InvalidEasing(s.to_string())),
        };
        Ok(easing)
    }
}

fn parse_cubic_bezier(args: &str) -> Option<Easing> {
    let values: Vec<f32> = args
        .split(',')
        .map(|v| v.trim().parse::<f32>().ok())
        .collect::<Option<_>>()?;
    let [x1, y1, x2, y2] = values.as_slice() else {
        return None;
    };
    // x coordinates must stay inside the unit interval for the curve to be a function
    if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
        return None;
    }
    Some(Easing::CubicBezier(*x1, *y1, *x2, *y2))
}

impl TryFrom<String> for Easing {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_css()
    }
}

/// Cubic bezier easing calculation (matches browser `cubic-bezier()` timing functions).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
