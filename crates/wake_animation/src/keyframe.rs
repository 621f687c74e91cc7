//! Keyframe translation
//!
//! Turns [`AnimationVars`] into native [`Keyframe`]s. Transform components
//! compose into one `transform` string in a fixed order
//! (`translateX translateY scale rotate`); opacity passes through. Nothing
//! else ever reaches the host.

use smallvec::SmallVec;
use wake_core::{Element, Keyframe, StyleProperty};

use crate::config::{AnimatableProperty, MotionConfig};
use crate::vars::AnimationVars;

/// Translate vars into a keyframe restricted to the allowed properties
///
/// Dropped properties are reported with `warn!` in development builds and
/// `debug!` otherwise; translation never fails.
pub fn translate(vars: &AnimationVars, config: &MotionConfig, development: bool) -> Keyframe {
    let mut dropped: SmallVec<[&str; 4]> = vars.extra.keys().map(String::as_str).collect();

    let transform = if config.allows(AnimatableProperty::Transform) {
        compose_transform(vars)
    } else {
        if vars.has_transform() {
            dropped.push(AnimatableProperty::Transform.css_name());
        }
        None
    };

    let opacity = match vars.opacity {
        Some(_) if !config.allows(AnimatableProperty::Opacity) => {
            dropped.push(AnimatableProperty::Opacity.css_name());
            None
        }
        opacity => opacity,
    };

    for property in dropped {
        if development {
            tracing::warn!(
                property,
                "dropping non-animatable property; only transform and opacity are animated"
            );
        } else {
            tracing::debug!(property, "dropped non-animatable property");
        }
    }

    Keyframe { transform, opacity }
}

/// Compose `x`, `y`, `scale` and `rotation` into a CSS transform
pub fn compose_transform(vars: &AnimationVars) -> Option<String> {
    let mut parts: SmallVec<[String; 4]> = SmallVec::new();
    if let Some(x) = vars.x {
        parts.push(format!("translateX({}px)", format_number(x)));
    }
    if let Some(y) = vars.y {
        parts.push(format!("translateY({}px)", format_number(y)));
    }
    if let Some(scale) = vars.scale {
        parts.push(format!("scale({})", format_number(scale)));
    }
    if let Some(rotation) = vars.rotation {
        parts.push(format!("rotate({}deg)", format_number(rotation)));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Implicit end keyframe of a `from` tween on `element`
///
/// Inline transform and opacity keep their authored values; properties the
/// element does not style fall back to identity.
pub fn resting(
    vars: &AnimationVars,
    element: &dyn Element,
    config: &MotionConfig,
    development: bool,
) -> Keyframe {
    let mut keyframe = translate(&vars.identity(), config, development);
    if keyframe.transform.is_some() {
        if let Some(authored) = element
            .style(StyleProperty::Transform)
            .filter(|value| !value.trim().is_empty())
        {
            keyframe.transform = Some(authored);
        }
    }
    if keyframe.opacity.is_some() {
        if let Some(authored) = element
            .style(StyleProperty::Opacity)
            .and_then(|value| value.trim().parse::<f64>().ok())
        {
            keyframe.opacity = Some(authored);
        }
    }
    keyframe
}

/// Shortest decimal form; `-0` prints as `0`
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Write a keyframe into inline styles, leaving unset properties untouched
pub fn apply(element: &dyn Element, keyframe: &Keyframe) {
    if let Some(transform) = &keyframe.transform {
        element.set_style(StyleProperty::Transform, Some(transform));
    }
    if let Some(opacity) = keyframe.opacity {
        element.set_style(StyleProperty::Opacity, Some(&format_number(opacity)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wake_core::headless::HeadlessHost;

    #[test]
    fn test_transform_order_is_fixed() {
        let vars = AnimationVars::new()
            .with_rotation(45.0)
            .with_scale(0.95)
            .with_y(30.0)
            .with_x(-40.0);
        assert_eq!(
            compose_transform(&vars).as_deref(),
            Some("translateX(-40px) translateY(30px) scale(0.95) rotate(45deg)")
        );
    }

    #[test]
    fn test_zero_translation_is_explicit() {
        let keyframe = translate(
            &AnimationVars::new().with_opacity(1.0).with_y(0.0),
            &MotionConfig::default(),
            true,
        );
        assert_eq!(keyframe.transform.as_deref(), Some("translateY(0px)"));
        assert_eq!(keyframe.opacity, Some(1.0));
    }

    #[test]
    fn test_opacity_only_has_no_transform() {
        let keyframe = translate(&AnimationVars::new().with_opacity(0.0), &MotionConfig::default(), true);
        assert_eq!(keyframe, Keyframe::opacity(0.0));
    }

    #[test]
    fn test_disallowed_properties_are_dropped() {
        let vars = AnimationVars::new()
            .with_opacity(0.5)
            .with("color", "red")
            .with("width", 200)
            .with("backgroundColor", "#fff");
        let keyframe = translate(&vars, &MotionConfig::default(), true);

        assert_eq!(keyframe, Keyframe::opacity(0.5));
    }

    #[test]
    fn test_narrowed_allow_list_drops_transform() {
        let config = MotionConfig::from_toml_str("[motion]\nallowed_properties = [\"opacity\"]").unwrap();
        let keyframe = translate(&AnimationVars::new().with_opacity(1.0).with_y(20.0), &config, false);
        assert_eq!(keyframe, Keyframe::opacity(1.0));
    }

    #[test]
    fn test_apply_writes_inline_styles() {
        let headless = HeadlessHost::new();
        let element = headless.create_element("div");
        apply(
            element.as_ref(),
            &Keyframe {
                transform: Some("translateY(30px)".into()),
                opacity: Some(0.0),
            },
        );

        assert_eq!(element.style(StyleProperty::Transform).as_deref(), Some("translateY(30px)"));
        assert_eq!(element.style(StyleProperty::Opacity).as_deref(), Some("0"));
    }

    #[test]
    fn test_resting_keeps_authored_styles() {
        let headless = HeadlessHost::new();
        let element = headless.create_element("div");
        element.set_style(StyleProperty::Opacity, Some("0.5"));

        let vars = AnimationVars::new().with_opacity(0.0).with_y(30.0);
        let keyframe = resting(&vars, element.as_ref(), &MotionConfig::default(), true);

        assert_eq!(keyframe.opacity, Some(0.5));
        assert_eq!(keyframe.transform.as_deref(), Some("translateY(0px)"));
    }

    #[test]
    fn test_resting_ignores_unanimated_styles() {
        let headless = HeadlessHost::new();
        let element = headless.create_element("div");
        element.set_style(StyleProperty::Transform, Some("rotate(10deg)"));

        let vars = AnimationVars::new().with_opacity(0.0);
        let keyframe = resting(&vars, element.as_ref(), &MotionConfig::default(), true);

        assert_eq!(keyframe, Keyframe::opacity(1.0));
    }
}
