//! Animator behavior against the headless host

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use wake_animation::{
    create_animator, AnimationVars, Animator, MotionConfig, StaggerDirection, Target,
    TimelineEvent, TimelineOptions, TimelineStatus,
};
use wake_core::headless::{HeadlessElement, HeadlessHost};
use wake_core::{Element, Keyframe, NativeAnimation, PlaybackDirection, StyleProperty};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn native(headless: &HeadlessHost) -> Arc<dyn Animator> {
    create_animator(Arc::new(MotionConfig::default()), headless.host()).unwrap()
}

fn cards(headless: &HeadlessHost, count: usize) -> Vec<Arc<HeadlessElement>> {
    (0..count)
        .map(|_| {
            let card = headless.create_element("article");
            card.toggle_class("card", true);
            card
        })
        .collect()
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = count.clone();
    (count, move || {
        count_clone.fetch_add(1, Ordering::SeqCst);
    })
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn to_creates_one_handle_per_resolved_element() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let cards = cards(&headless, 3);

    let timeline = animator.to(
        ".card".into(),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_y(0.0)
            .with_duration(0.5),
    );

    assert_eq!(timeline.handle_count(), 3);
    for card in &cards {
        let animation = card.last_animation().unwrap();
        assert_eq!(
            animation.last_keyframe(),
            Some(&Keyframe {
                transform: Some("translateY(0px)".into()),
                opacity: Some(1.0),
            })
        );
        let timing = animation.timing();
        assert_eq!(timing.duration_ms, 500.0);
        assert_eq!(timing.delay_ms, 0.0);
        assert_eq!(timing.easing, "cubic-bezier(0.22, 1, 0.36, 1)");
    }
}

#[test]
fn default_duration_and_easing_come_from_config() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    animator.to(Target::element(card.clone()), AnimationVars::new().with_opacity(1.0));

    let timing = card.last_animation().unwrap().timing();
    assert_eq!(timing.duration_ms, 250.0);
    assert_eq!(timing.iterations, 1.0);
}

#[test]
fn stagger_offsets_each_element_by_index() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let cards = cards(&headless, 5);

    animator.to(
        ".card".into(),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_delay(0.1)
            .with_stagger(0.075),
    );

    for (index, card) in cards.iter().enumerate() {
        let delay = card.last_animation().unwrap().delay_ms();
        assert_close(delay, 100.0 + 75.0 * index as f64);
    }
}

#[test]
fn stagger_can_run_in_reverse() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let cards = cards(&headless, 3);

    animator.to(
        ".card".into(),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_stagger(0.1)
            .with_stagger_from(StaggerDirection::Reverse),
    );

    let delays: Vec<f64> = cards
        .iter()
        .map(|c| c.last_animation().unwrap().delay_ms().round())
        .collect();
    assert_eq!(delays, vec![200.0, 100.0, 0.0]);
}

#[test]
fn from_animates_towards_resting_state() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    animator.from(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(0.0).with_y(30.0),
    );

    let animation = card.last_animation().unwrap();
    assert_eq!(
        animation.keyframes(),
        &[
            Keyframe {
                transform: Some("translateY(30px)".into()),
                opacity: Some(0.0),
            },
            Keyframe {
                transform: Some("translateY(0px)".into()),
                opacity: Some(1.0),
            },
        ]
    );
}

#[test]
fn from_ends_at_the_authored_inline_state() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");
    card.set_style(StyleProperty::Opacity, Some("0.5"));
    card.set_style(StyleProperty::Transform, Some("translateX(20px)"));

    animator.from(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(0.0).with_x(-40.0),
    );

    let animation = card.last_animation().unwrap();
    assert_eq!(
        animation.keyframes(),
        &[
            Keyframe {
                transform: Some("translateX(-40px)".into()),
                opacity: Some(0.0),
            },
            Keyframe {
                transform: Some("translateX(20px)".into()),
                opacity: Some(0.5),
            },
        ]
    );
}

#[test]
fn disallowed_properties_never_reach_keyframes() {
    init_tracing();
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    animator.from_to(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(0.0).with("color", "blue"),
        AnimationVars::new()
            .with_opacity(1.0)
            .with("color", "red")
            .with("height", 120),
    );

    let animation = card.last_animation().unwrap();
    assert_eq!(
        animation.keyframes(),
        &[Keyframe::opacity(0.0), Keyframe::opacity(1.0)]
    );
}

#[test]
fn elements_without_animation_support_are_skipped() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let inert = headless.create_inert_element("div");
    let live = headless.create_element("div");

    let timeline = animator.to(
        Target::elements([inert.clone(), live.clone()]),
        AnimationVars::new().with_opacity(1.0),
    );

    assert_eq!(timeline.handle_count(), 1);
    assert!(inert.animations().is_empty());
    assert_eq!(live.animations().len(), 1);
}

#[test]
fn callbacks_fire_once_per_timeline() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    // Keep the elements alive; the document only holds weak references
    let _cards = cards(&headless, 3);

    let (started, on_start) = counter();
    let (completed, on_complete) = counter();
    let updates = Arc::new(AtomicUsize::new(0));
    let updates_clone = updates.clone();

    animator.to(
        ".card".into(),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_duration(0.2)
            .on_start(on_start)
            .on_update(move |_| {
                updates_clone.fetch_add(1, Ordering::SeqCst);
            })
            .on_complete(on_complete),
    );

    assert_eq!(started.load(Ordering::SeqCst), 0, "onStart waits for a frame");
    headless.run_frame();
    assert_eq!(started.load(Ordering::SeqCst), 1);

    headless.advance(100.0);
    headless.advance(100.0);
    headless.advance(100.0);

    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
    assert_eq!(updates.load(Ordering::SeqCst), 3);
}

#[test]
fn subscription_sees_full_lifecycle() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");
    let events = Arc::new(Mutex::new(Vec::new()));

    let timeline = animator.to(
        Target::element(card),
        AnimationVars::new().with_opacity(1.0).with_duration(0.1),
    );
    let events_clone = events.clone();
    timeline.subscribe(move |event| events_clone.lock().unwrap().push(*event));

    assert_eq!(timeline.status(), TimelineStatus::Pending);
    headless.run_frame();
    assert_eq!(timeline.status(), TimelineStatus::Running);
    headless.advance(100.0);

    assert_eq!(timeline.status(), TimelineStatus::Completed);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            TimelineEvent::Started,
            TimelineEvent::Updated(0.0),
            TimelineEvent::Updated(1.0),
            TimelineEvent::Completed,
        ]
    );
}

#[test]
fn empty_timeline_completes_on_its_start_frame() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let (completed, on_complete) = counter();

    let timeline = animator.to("section".into(), AnimationVars::new().on_complete(on_complete));
    headless.run_frame();

    assert_eq!(timeline.handle_count(), 0);
    assert_eq!(timeline.status(), TimelineStatus::Completed);
    assert_eq!(timeline.progress(), 1.0);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[test]
fn kill_is_idempotent_and_cancels_every_handle() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let cards = cards(&headless, 3);
    let kills = Arc::new(AtomicUsize::new(0));

    let timeline = animator.to(".card".into(), AnimationVars::new().with_opacity(1.0));
    let kills_clone = kills.clone();
    timeline.subscribe(move |event| {
        if *event == TimelineEvent::Killed {
            kills_clone.fetch_add(1, Ordering::SeqCst);
        }
    });
    assert_eq!(animator.active_timelines(), 1);

    timeline.kill();
    timeline.kill();

    assert_eq!(timeline.status(), TimelineStatus::Killed);
    assert_eq!(timeline.handle_count(), 0);
    assert_eq!(kills.load(Ordering::SeqCst), 1);
    assert_eq!(animator.active_timelines(), 0);
    for card in &cards {
        assert_eq!(card.active_animation_count(), 0);
    }

    // Control calls on a killed timeline are no-ops
    timeline.play().pause().reverse().restart().set_progress(0.5);
    timeline.to(".card", AnimationVars::new().with_opacity(0.0));
    assert_eq!(timeline.handle_count(), 0);
    headless.advance(500.0);
    assert_eq!(timeline.status(), TimelineStatus::Killed);
}

#[test]
fn kill_tweens_of_only_touches_matching_timelines() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let a = headless.create_element("div");
    let b = headless.create_element("div");

    let first = animator.to(Target::element(a.clone()), AnimationVars::new().with_opacity(1.0));
    let second = animator.to(Target::element(b.clone()), AnimationVars::new().with_opacity(1.0));

    animator.kill_tweens_of(Target::element(a.clone()));

    assert_eq!(first.status(), TimelineStatus::Killed);
    assert_eq!(second.status(), TimelineStatus::Pending);
    assert_eq!(a.active_animation_count(), 0);
    assert_eq!(b.active_animation_count(), 1);
}

#[test]
fn explicit_timeline_places_tweens_in_sequence() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let a = headless.create_element("div");
    let b = headless.create_element("div");
    let c = headless.create_element("div");

    let timeline = animator.timeline(TimelineOptions::new().paused(true).with_delay(0.1));
    timeline
        .to(Target::element(a.clone()), AnimationVars::new().with_opacity(1.0).with_duration(0.3))
        .to(Target::element(b.clone()), AnimationVars::new().with_opacity(1.0).with_duration(0.2))
        .to_at(
            Target::element(c.clone()),
            AnimationVars::new().with_opacity(1.0).with_duration(0.1),
            0.0,
        );

    assert_close(a.last_animation().unwrap().delay_ms(), 100.0);
    assert_close(b.last_animation().unwrap().delay_ms(), 400.0);
    assert_close(c.last_animation().unwrap().delay_ms(), 100.0);
    assert_close(timeline.duration(), 0.6);
}

#[test]
fn center_stagger_sequences_from_its_last_start() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let cards = cards(&headless, 5);
    let next = headless.create_element("div");

    let timeline = animator.timeline(TimelineOptions::new().paused(true));
    timeline
        .to(
            ".card",
            AnimationVars::new()
                .with_opacity(1.0)
                .with_duration(1.0)
                .with_stagger(0.1)
                .with_stagger_from(StaggerDirection::FromCenter),
        )
        .to(Target::element(next.clone()), AnimationVars::new().with_opacity(1.0).with_duration(0.1));

    let delays: Vec<f64> = cards
        .iter()
        .map(|c| c.last_animation().unwrap().delay_ms().round())
        .collect();
    assert_eq!(delays, vec![200.0, 100.0, 0.0, 100.0, 200.0]);
    assert_close(next.last_animation().unwrap().delay_ms(), 1200.0);
    assert_close(timeline.duration(), 1.3);
}

#[test]
fn timeline_set_waits_for_its_place_in_the_sequence() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.timeline(TimelineOptions::default());
    timeline
        .to(Target::element(card.clone()), AnimationVars::new().with_opacity(1.0).with_duration(0.3))
        .set(Target::element(card.clone()), &AnimationVars::new().with_opacity(0.0));

    assert_eq!(card.style(StyleProperty::Opacity), None);
    let animations = card.animations();
    assert_eq!(animations.len(), 2);
    let set = animations.last().unwrap();
    assert_eq!(set.last_keyframe(), Some(&Keyframe::opacity(0.0)));
    assert_eq!(set.timing().duration_ms, 0.0);
    assert_close(set.delay_ms(), 300.0);

    headless.run_frame();
    headless.advance(300.0);
    assert_eq!(timeline.status(), TimelineStatus::Completed);
}

#[test]
fn paused_timeline_waits_for_play() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");
    let (started, on_start) = counter();

    let timeline = animator.timeline(TimelineOptions::new().paused(true));
    timeline.to(
        Target::element(card.clone()),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_duration(0.4)
            .on_start(on_start),
    );

    headless.advance(200.0);
    assert!(timeline.is_paused());
    assert_eq!(timeline.status(), TimelineStatus::Pending);
    assert_eq!(card.last_animation().unwrap().current_time(), 0.0);

    timeline.play();
    headless.advance(200.0);
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(card.last_animation().unwrap().current_time(), 200.0);
}

#[test]
fn timeline_defaults_apply_to_every_tween() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.timeline(
        TimelineOptions::new().with_defaults(AnimationVars::new().with_duration(0.8)),
    );
    timeline.to(Target::element(card.clone()), AnimationVars::new().with_opacity(1.0));

    assert_eq!(card.last_animation().unwrap().timing().duration_ms, 800.0);
}

#[test]
fn progress_setter_moves_handles_to_the_same_timeline_time() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let long = headless.create_element("div");
    let short = headless.create_element("div");

    let timeline = animator.timeline(TimelineOptions::new().paused(true));
    timeline
        .to(Target::element(long.clone()), AnimationVars::new().with_opacity(1.0).with_duration(1.0))
        .to_at(
            Target::element(short.clone()),
            AnimationVars::new().with_opacity(1.0).with_duration(0.5),
            0.0,
        );

    timeline.set_progress(0.5);
    assert_eq!(long.last_animation().unwrap().current_time(), 500.0);
    assert_eq!(short.last_animation().unwrap().current_time(), 500.0);
    assert_close(timeline.progress(), 0.5);

    timeline.set_progress(0.25);
    assert_eq!(short.last_animation().unwrap().current_time(), 250.0);
    assert_close(timeline.progress(), 0.25);
}

#[test]
fn progress_follows_playback() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.to(
        Target::element(card),
        AnimationVars::new().with_opacity(1.0).with_duration(0.4),
    );
    headless.run_frame();
    headless.advance(100.0);

    assert_close(timeline.progress(), 0.25);
}

#[test]
fn time_scale_sets_playback_rate() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(1.0).with_duration(0.4),
    );
    timeline.set_time_scale(2.0);
    timeline.set_time_scale(0.0);

    assert_eq!(timeline.time_scale(), 2.0);
    headless.advance(100.0);
    let animation = card.last_animation().unwrap();
    assert_eq!(animation.playback_rate(), 2.0);
    assert_eq!(animation.current_time(), 200.0);
}

#[test]
fn pause_and_resume() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(1.0).with_duration(0.4),
    );
    headless.advance(100.0);
    timeline.pause();
    headless.advance(100.0);
    assert_eq!(card.last_animation().unwrap().current_time(), 100.0);

    timeline.play();
    headless.advance(100.0);
    assert_eq!(card.last_animation().unwrap().current_time(), 200.0);
}

#[test]
fn reverse_runs_back_to_start_and_completes() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(1.0).with_duration(0.4),
    );
    headless.advance(300.0);
    timeline.reverse();
    assert!(timeline.is_reversed());
    headless.advance(300.0);

    assert_eq!(card.last_animation().unwrap().current_time(), 0.0);
    assert_eq!(timeline.status(), TimelineStatus::Completed);
    assert_eq!(timeline.progress(), 0.0);
}

#[test]
fn restart_replays_lifecycle() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");
    let (started, on_start) = counter();
    let (completed, on_complete) = counter();

    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_duration(0.2)
            .on_start(on_start)
            .on_complete(on_complete),
    );
    headless.advance(200.0);
    assert_eq!(timeline.status(), TimelineStatus::Completed);

    timeline.restart();
    assert_eq!(timeline.status(), TimelineStatus::Pending);
    assert_eq!(card.last_animation().unwrap().current_time(), 0.0);

    headless.run_frame();
    headless.advance(200.0);
    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(completed.load(Ordering::SeqCst), 2);
}

#[test]
fn repeat_and_yoyo_map_to_iterations_and_direction() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");
    let looping = headless.create_element("div");

    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new()
            .with_opacity(1.0)
            .with_duration(0.2)
            .with_repeat(2)
            .with_yoyo(true),
    );
    let timing = card.last_animation().unwrap().timing();
    assert_eq!(timing.iterations, 3.0);
    assert_eq!(timing.direction, PlaybackDirection::Alternate);
    assert_close(timeline.duration(), 0.2);
    assert_close(timeline.total_duration(), 0.6);

    let forever = animator.to(
        Target::element(looping),
        AnimationVars::new().with_opacity(1.0).with_repeat(-1),
    );
    assert!(forever.total_duration().is_infinite());
}

#[test]
fn set_assigns_styles_without_animating() {
    let headless = HeadlessHost::new();
    let animator = native(&headless);
    let card = headless.create_element("div");

    animator.set(
        Target::element(card.clone()),
        &AnimationVars::new().with_opacity(0.0).with_y(30.0).with("color", "red"),
    );

    assert!(card.animations().is_empty());
    assert_eq!(card.style(StyleProperty::Opacity).as_deref(), Some("0"));
    assert_eq!(
        card.style(StyleProperty::Transform).as_deref(),
        Some("translateY(30px)")
    );
}

#[test]
fn reduced_motion_animator_is_inert() {
    let headless = HeadlessHost::new();
    let animator = create_animator(
        Arc::new(MotionConfig::default().with_reduced_motion(true)),
        headless.host(),
    )
    .unwrap();
    let card = headless.create_element("div");
    let (started, on_start) = counter();

    assert!(animator.is_noop());
    let timeline = animator.to(
        Target::element(card.clone()),
        AnimationVars::new().with_opacity(1.0).on_start(on_start),
    );
    animator.set(Target::element(card.clone()), &AnimationVars::new().with_opacity(0.0));
    headless.advance(1_000.0);

    assert!(timeline.is_noop());
    assert_eq!(timeline.progress(), 0.0);
    assert_eq!(timeline.duration(), 0.0);
    assert_eq!(timeline.total_duration(), 0.0);
    assert!(timeline.subscribe(|_| {}).is_none());
    timeline.play().set_progress(1.0);
    assert_eq!(timeline.progress(), 0.0);
    timeline.kill();

    assert!(card.animations().is_empty());
    assert_eq!(card.style(StyleProperty::Opacity), None);
    assert_eq!(started.load(Ordering::SeqCst), 0);
    assert_eq!(animator.active_timelines(), 0);
}
