use bevy::prelude::*;

use super::CameraConfig;
use crate::math;
use crate::store::FocusTarget;

/// Marker for the camera entity driven by the [`CameraRig`].
#[derive(Component, Reflect)]
pub struct DirectorCamera;

/// Camera position plus the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FocusPose {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera faces.
    pub look_at: Vec3,
}

impl FocusPose {
    const fn new(position: [f32; 3], look_at: [f32; 3]) -> Self {
        Self {
            position: Vec3::from_array(position),
            look_at: Vec3::from_array(look_at),
        }
    }
}

/// Static pose table, one entry per focus target.
pub const fn focus_pose(target: FocusTarget) -> FocusPose {
    match target {
        FocusTarget::Rose => FocusPose::new([-2.2, 0.8, 6.5], [-2.2, -0.8, -1.0]),
        FocusTarget::Envelope => FocusPose::new([2.8, 0.8, 6.5], [2.8, -0.4, 0.5]),
        FocusTarget::Photo => FocusPose::new([0.0, 2.0, 7.5], [0.0, 2.0, -2.0]),
        FocusTarget::Chocolate => FocusPose::new([5.0, 0.8, 7.5], [5.0, -0.8, 1.0]),
        FocusTarget::Center => FocusPose::new([0.0, 1.0, 16.0], [0.0, 0.0, 0.0]),
    }
}

/// Sent when the most recent camera move has converged on its pose.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CameraArrived {
    /// Id of the finished move.
    pub id: u64,
    /// Target the move was heading to.
    pub target: FocusTarget,
}

/// A smooth move in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    /// Increasing per rig; the latest id owns the transitioning flag.
    pub id: u64,
    /// Target the move is heading to.
    pub target: FocusTarget,
    pose: FocusPose,
    position_velocity: Vec3,
    look_velocity: Vec3,
}

/// Pose of the director camera and the move it is running.
///
/// Starting a move while another is in flight supersedes it: the old move is
/// dropped and never reports completion.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    look_at: Vec3,
    active: Option<CameraMove>,
    last_id: u64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::at(focus_pose(FocusTarget::default()))
    }
}

impl CameraRig {
    /// Rig resting at `pose`.
    pub fn at(pose: FocusPose) -> Self {
        Self {
            position: pose.position,
            look_at: pose.look_at,
            active: None,
            last_id: 0,
        }
    }

    /// Eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera faces.
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Move in flight, if any.
    pub fn active_move(&self) -> Option<&CameraMove> {
        self.active.as_ref()
    }

    /// Id of the most recently started move.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Places the rig on `pose` and drops any move.
    pub fn snap_to(&mut self, pose: FocusPose) {
        self.position = pose.position;
        self.look_at = pose.look_at;
        self.active = None;
    }

    /// Starts a move towards `target`. The move in flight, if any, is
    /// dropped, so only the latest move can ever arrive.
    pub fn begin(&mut self, target: FocusTarget) -> u64 {
        self.last_id += 1;
        self.active = Some(CameraMove {
            id: self.last_id,
            target,
            pose: focus_pose(target),
            position_velocity: Vec3::ZERO,
            look_velocity: Vec3::ZERO,
        });
        self.last_id
    }

    /// Advances the active move. Returns it once both position and look-at
    /// are within `arrive_epsilon` of the target; the rig then sits exactly
    /// on the target pose.
    pub fn step(&mut self, dt: f32, cfg: &CameraConfig) -> Option<CameraMove> {
        let mv = self.active.as_mut()?;
        self.position = math::smooth_damp(
            self.position,
            mv.pose.position,
            &mut mv.position_velocity,
            cfg.smooth_time,
            dt,
        );
        self.look_at = math::smooth_damp(
            self.look_at,
            mv.pose.look_at,
            &mut mv.look_velocity,
            cfg.smooth_time,
            dt,
        );

        let arrived = self.position.distance(mv.pose.position) <= cfg.arrive_epsilon
            && self.look_at.distance(mv.pose.look_at) <= cfg.arrive_epsilon;
        if !arrived {
            return None;
        }
        self.position = mv.pose.position;
        self.look_at = mv.pose.look_at;
        self.active.take()
    }

    /// Pointer orbit around the look-at point plus dolly along the arm.
    /// Ignored while a move is in flight.
    pub fn orbit(&mut self, yaw: f32, pitch: f32, zoom: f32, cfg: &CameraConfig) {
        if self.active.is_some() {
            return;
        }
        let distance = (self.position.distance(self.look_at) - zoom * cfg.zoom_sensitivity)
            .clamp(cfg.min_distance, cfg.max_distance);
        self.position = math::orbit(
            self.position,
            self.look_at,
            yaw,
            pitch,
            distance,
            cfg.pitch_margin,
        );
    }

    /// World transform of the camera.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_at, Vec3::Y)
    }
}
