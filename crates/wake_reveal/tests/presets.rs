use std::collections::HashSet;

use pretty_assertions::assert_eq;
use wake_animation::{AnimationVars, Easing};
use wake_reveal::{presets, RevealOptions, RevealOverrides, RevealPreset};

#[test]
fn preset_ids_are_unique_and_resolvable() {
    let mut ids = HashSet::new();

    for preset in RevealPreset::all() {
        assert!(ids.insert(preset.id()), "duplicate preset id: {}", preset.id());
        assert_eq!(RevealPreset::lookup(preset.id()), Some(*preset));
        assert_eq!(preset.id().parse::<RevealPreset>(), Ok(*preset));
    }

    assert_eq!(ids.len(), 8);
}

#[test]
fn camel_case_names_resolve() {
    assert_eq!(RevealPreset::lookup("fadeUp"), Some(RevealPreset::FadeUp));
    assert_eq!(RevealPreset::lookup("slideInRight"), Some(RevealPreset::SlideInRight));
    assert_eq!(RevealPreset::lookup("maskedHeadline"), Some(RevealPreset::MaskedHeadline));
}

#[test]
fn unknown_names_fall_back_to_fade_up() {
    assert_eq!(RevealPreset::lookup("spin"), None);
    assert_eq!(RevealPreset::from_name("spin"), RevealPreset::FadeUp);
    assert!("spin".parse::<RevealPreset>().is_err());
}

#[test]
fn display_uses_display_name() {
    assert_eq!(RevealPreset::CardStagger.to_string(), "Card Stagger");
}

#[test]
fn presets_only_touch_transform_and_opacity() {
    for preset in RevealPreset::all() {
        let options = preset.defaults();
        for vars in [&options.from, &options.to] {
            assert!(vars.extra.is_empty(), "{} carries extra properties", preset.id());
            assert!(vars.opacity.is_some(), "{} must fade", preset.id());
        }
    }
}

#[test]
fn fade_up_defaults() {
    let options = presets::fade_up(&RevealOverrides::default());

    assert_eq!(options.from.opacity, Some(0.0));
    assert_eq!(options.from.y, Some(30.0));
    assert_eq!(options.to.opacity, Some(1.0));
    assert_eq!(options.to.y, Some(0.0));
    assert_eq!(options.duration, 0.6);
    assert!(options.once);
    assert_eq!(options.stagger, 0.0);
}

#[test]
fn scale_in_and_slides() {
    let scale = presets::scale_in(&RevealOverrides::default());
    assert_eq!(scale.from.scale, Some(0.95));
    assert_eq!(scale.to.scale, Some(1.0));
    assert_eq!(scale.duration, 0.5);

    assert_eq!(presets::slide_in_left(&RevealOverrides::default()).from.x, Some(-40.0));
    assert_eq!(presets::slide_in_right(&RevealOverrides::default()).from.x, Some(40.0));
    assert_eq!(presets::fade_in(&RevealOverrides::default()).from.y, None);
}

#[test]
fn card_stagger_staggers_children() {
    let options = presets::card_stagger(&RevealOverrides::default());
    assert_eq!(options.stagger, 0.075);
    assert_eq!(options.threshold, 0.1);
    assert_eq!(options.from.y, Some(24.0));
    assert!(options.is_staggered());
}

#[test]
fn hero_and_headline_timing() {
    let hero = presets::hero_reveal(&RevealOverrides::default());
    assert_eq!(hero.delay, 0.1);
    assert_eq!(hero.duration, 0.9);
    assert_eq!(hero.ease, Easing::EaseOutExpo);
    assert_eq!(hero.from.scale, Some(0.98));

    let headline = presets::masked_headline(&RevealOverrides::default());
    assert_eq!(headline.stagger, 0.08);
    assert_eq!(headline.threshold, 0.3);
    assert_eq!(headline.from.y, Some(60.0));
}

#[test]
fn overrides_win_over_preset_defaults() {
    let options = presets::card_stagger(
        &RevealOverrides::new()
            .with_once(false)
            .with_stagger(0.12)
            .with_from(AnimationVars::new().with_opacity(0.2)),
    );

    assert!(!options.once);
    assert_eq!(options.stagger, 0.12);
    assert_eq!(options.from.opacity, Some(0.2));
    assert_eq!(options.from.y, None);
    // untouched preset values survive
    assert_eq!(options.threshold, 0.1);
    assert_eq!(options.duration, 0.5);
}

#[test]
fn overrides_load_from_toml() {
    let overrides: RevealOverrides = toml::from_str(
        r#"
        once = false
        duration = 1.2
        ease = "power2.out"
        rootMargin = "0px 0px -20% 0px"

        [from]
        opacity = 0.0
        x = -80.0
        "#,
    )
    .unwrap();

    let options = RevealPreset::SlideInLeft.options(&overrides);
    assert!(!options.once);
    assert_eq!(options.duration, 1.2);
    assert_eq!(options.ease, Easing::EaseOutCubic);
    assert_eq!(options.root_margin, "0px 0px -20% 0px");
    assert_eq!(options.from.x, Some(-80.0));
    assert_eq!(options.to.x, Some(0.0));
}

#[test]
fn merging_empty_overrides_is_identity() {
    let base = RevealPreset::HeroReveal.defaults();
    let merged: RevealOptions = base.clone().merge(&RevealOverrides::default());
    assert_eq!(merged.threshold, base.threshold);
    assert_eq!(merged.delay, base.delay);
    assert_eq!(merged.to.scale, base.to.scale);
}
