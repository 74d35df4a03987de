//! End-to-end runs of the director on a headless app.

use std::time::Duration;

use bevy::input::InputPlugin;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::camera::{CameraRig, focus_pose};
use crate::debug_panel::{CameraLog, DebugAction, DebugPanelPlugin, apply_debug_action};
use crate::store::{Experience, FocusTarget, LayerActivation, Scene, StoreConfig};
use crate::{ExperienceConfig, ExperiencePlugin};

fn director(start_scene: Scene) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, InputPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / 60.0,
        )))
        .add_plugins(ExperiencePlugin(ExperienceConfig {
            store: StoreConfig {
                start_scene,
                ..default()
            },
            ..default()
        }));
    app
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn exp(app: &App) -> &Experience {
    app.world().resource::<Experience>()
}

fn exp_mut(app: &mut App) -> Mut<'_, Experience> {
    app.world_mut().resource_mut::<Experience>()
}

#[test]
fn prelude_to_intro() {
    let mut app = director(Scene::Prelude);
    app.update();
    exp_mut(&mut app).request_scene_transition(Scene::Intro, None);
    run(&mut app, 60);

    let exp = exp(&app);
    assert_eq!(exp.current_scene(), Scene::Intro);
    assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Intro));
    assert!(!exp.is_animating());
    assert!(exp.pending_transition().is_none());
}

#[test]
fn flower_request_blooms_fully() {
    let mut app = director(Scene::Flower);
    app.update();
    assert_eq!(exp(&app).bloom_progress(), 0.0);
    exp_mut(&mut app).request_scene_transition(Scene::Flower, None);
    run(&mut app, 240);

    let exp = exp(&app);
    assert_eq!(exp.bloom_progress(), 1.0);
    assert!(exp.bloom_complete());
    assert!(!exp.is_animating());
    assert_eq!(exp.story_step(), 1, "flower starts on the blooming line");
}

#[test]
fn envelope_then_photo_focus() {
    let mut app = director(Scene::Flower);
    app.update();
    exp_mut(&mut app).set_bloom_progress(0.7);
    app.update();
    assert_eq!(exp(&app).focus_target(), FocusTarget::Envelope);

    exp_mut(&mut app).mark_read_letter();
    app.update();
    assert_eq!(exp(&app).focus_target(), FocusTarget::Photo);
}

#[test]
fn camera_flag_tracks_latest_move() {
    let mut app = director(Scene::Prelude);
    app.update();
    assert!(!exp(&app).is_camera_transitioning());

    exp_mut(&mut app).set_focus_target(FocusTarget::Envelope);
    run(&mut app, 20);
    assert!(exp(&app).is_camera_transitioning());

    exp_mut(&mut app).set_focus_target(FocusTarget::Center);
    run(&mut app, 20);
    assert!(exp(&app).is_camera_transitioning(), "superseded move keeps the flag");

    run(&mut app, 900);
    assert!(!exp(&app).is_camera_transitioning());
    let rig = app.world().resource::<CameraRig>();
    assert_eq!(rig.position(), focus_pose(FocusTarget::Center).position);
}

#[test]
fn freezing_leaves_focus_and_pose_alone() {
    let mut app = director(Scene::Climax);
    app.update();
    let before = app.world().resource::<CameraRig>().position();
    exp_mut(&mut app).set_frozen(true);
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    for _ in 0..10 {
        app.world_mut().write_message(MouseMotion {
            delta: Vec2::new(40.0, 10.0),
        });
        app.update();
    }

    assert_eq!(exp(&app).focus_target(), FocusTarget::Rose);
    assert_eq!(app.world().resource::<CameraRig>().position(), before);
}

#[test]
fn return_to_prelude_resets_progress() {
    let mut app = director(Scene::Intro);
    app.update();
    {
        let mut exp = exp_mut(&mut app);
        exp.set_open_count(24);
        exp.set_bloom_progress(24.0 / 36.0);
        exp.request_scene_transition(Scene::Flower, None);
    }
    run(&mut app, 40);
    assert!(exp(&app).is_animating(), "bloom tween running");

    exp_mut(&mut app).set_scene(Scene::Prelude);
    run(&mut app, 2);

    let exp = exp(&app);
    assert_eq!(exp.bloom_progress(), 0.0);
    assert_eq!(exp.open_count(), 0);
    assert_eq!(exp.story_step(), 0);
    assert!(!exp.is_animating());
    assert!(exp.pending_transition().is_none());
}

#[test]
fn story_reaches_chocolate_line_and_focuses_it() {
    let mut app = director(Scene::Climax);
    app.update();
    assert_eq!(exp(&app).story_step(), 3);
    exp_mut(&mut app).set_focus_target(FocusTarget::Photo);
    app.update();
    assert_eq!(exp(&app).focus_target(), FocusTarget::Photo);

    exp_mut(&mut app).set_story_step(4);
    app.update();
    assert_eq!(exp(&app).focus_target(), FocusTarget::Chocolate);
}

#[test]
fn debug_scene_jump_runs_the_transition_sequence() {
    let mut app = director(Scene::Prelude);
    app.add_plugins(DebugPanelPlugin);
    app.update();
    apply_debug_action(&mut exp_mut(&mut app), DebugAction::RequestScene(Scene::Climax));
    run(&mut app, 3);
    {
        let exp = exp(&app);
        assert_eq!(exp.current_scene(), Scene::Prelude, "commit waits for settle");
        assert!(exp.is_animating());
        assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Prelude));
    }

    run(&mut app, 60);
    let exp = exp(&app);
    assert_eq!(exp.current_scene(), Scene::Climax);
    assert_eq!(*exp.active_layers(), LayerActivation::for_scene(Scene::Climax));
    assert!(!exp.is_animating());
    assert!(exp.pending_transition().is_none());
}

#[test]
fn camera_log_counts_only_landed_moves() {
    let mut app = director(Scene::Prelude);
    app.add_plugins(DebugPanelPlugin);
    app.update();
    apply_debug_action(&mut exp_mut(&mut app), DebugAction::SetFocus(FocusTarget::Envelope));
    run(&mut app, 20);
    apply_debug_action(&mut exp_mut(&mut app), DebugAction::SetFocus(FocusTarget::Center));
    run(&mut app, 900);

    let log = app.world().resource::<CameraLog>();
    assert_eq!(log.arrivals, 1, "the superseded move never lands");
    assert_eq!(log.last.map(|a| a.target), Some(FocusTarget::Center));
}
