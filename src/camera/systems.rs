use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::CameraConfig;
use super::entities::{CameraArrived, CameraRig, DirectorCamera, focus_pose};
use crate::store::{Experience, FocusTarget};

/// Starts a move whenever the store's focus target changes. The first frame
/// places the rig on the initial target without moving.
pub fn follow_focus_target(
    mut last: Local<Option<FocusTarget>>,
    mut rig: ResMut<CameraRig>,
    mut exp: ResMut<Experience>,
) {
    let target = exp.focus_target();
    let Some(previous) = *last else {
        rig.snap_to(focus_pose(target));
        *last = Some(target);
        return;
    };
    if previous == target {
        return;
    }
    *last = Some(target);

    let id = rig.begin(target);
    debug!("camera move {id}: {previous:?} -> {target:?}");
    if !exp.is_camera_transitioning() {
        exp.set_camera_transitioning(true);
    }
}

/// Advances the in-flight move and drops the flag once it lands.
pub fn step_camera_move(
    time: Res<Time>,
    cfg: Res<CameraConfig>,
    mut rig: ResMut<CameraRig>,
    mut exp: ResMut<Experience>,
    mut arrived: MessageWriter<CameraArrived>,
) {
    if rig.active_move().is_none() {
        return;
    }
    let Some(done) = rig.step(time.delta_secs(), &cfg) else {
        return;
    };
    debug!("camera move {} arrived at {:?}", done.id, done.target);
    if exp.is_camera_transitioning() {
        exp.set_camera_transitioning(false);
    }
    arrived.write(CameraArrived {
        id: done.id,
        target: done.target,
    });
}

/// Drag with the left button to orbit, wheel to dolly. Input is drained but
/// ignored while a move is in flight.
pub fn orbit_camera(
    cfg: Res<CameraConfig>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    mut wheel: MessageReader<MouseWheel>,
    exp: Res<Experience>,
    mut rig: ResMut<CameraRig>,
) {
    let dragging = buttons.pressed(MouseButton::Left);
    let mut yaw = 0.0;
    let mut pitch = 0.0;
    for ev in motion.read() {
        if dragging {
            yaw -= ev.delta.x * cfg.orbit_sensitivity;
            pitch += ev.delta.y * cfg.orbit_sensitivity;
        }
    }
    let zoom: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        })
        .sum();

    if exp.is_camera_transitioning() || (yaw == 0.0 && pitch == 0.0 && zoom == 0.0) {
        return;
    }
    rig.orbit(yaw, pitch, zoom, &cfg);
}

/// Copies the rig pose onto the director camera.
pub fn apply_rig_to_camera(
    rig: Res<CameraRig>,
    mut query: Query<(&mut Transform, Ref<DirectorCamera>)>,
) {
    for (mut transform, marker) in &mut query {
        if rig.is_changed() || marker.is_added() {
            *transform = rig.transform();
        }
    }
}
