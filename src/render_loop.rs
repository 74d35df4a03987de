//! Render-loop activator.
//!
//! Keeps winit redrawing continuously while anything moves (a transition, a
//! camera move, a pointer interaction) or while the performance tier is above
//! `low`. Otherwise the app drops to reactive low-power updates.

use std::time::Duration;

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};

use crate::DirectorSet;
use crate::store::{Experience, PerformanceLevel};

/// Per-plugin configuration for the render-loop activator.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct RenderLoopConfig {
    /// Continuous frames kept after the last pointer press (seconds).
    pub pointer_hold_secs: f32,
    /// Longest wait between frames while idle (seconds).
    pub idle_wait_secs: f32,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            pointer_hold_secs: 1.0,
            idle_wait_secs: 1.0,
        }
    }
}

/// Current frame demand.
#[derive(Resource, Debug, Default)]
pub struct RenderDemand {
    pointer_hold: f32,
    continuous: Option<bool>,
}

impl RenderDemand {
    /// A pointer press happened within the hold window.
    pub fn pointer_active(&self) -> bool {
        self.pointer_hold > 0.0
    }

    /// Whether continuous frames were last requested.
    pub fn is_continuous(&self) -> bool {
        self.continuous.unwrap_or(true)
    }
}

/// Switches the winit update mode from store state.
pub struct RenderLoopPlugin(pub RenderLoopConfig);

impl Plugin for RenderLoopPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<RenderLoopConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<RenderDemand>()
            .add_systems(
                Update,
                (track_pointer, apply_update_mode)
                    .chain()
                    .after(DirectorSet::Camera),
            );
    }
}

/// Frames must keep coming while a transition is requested or running, the
/// camera moves or a pointer is busy, and always above the `low` tier.
pub fn needs_continuous_frames(exp: &Experience, pointer_active: bool) -> bool {
    exp.is_animating()
        || exp.pending_transition().is_some()
        || exp.is_camera_transitioning()
        || pointer_active
        || exp.performance_level() != PerformanceLevel::Low
}

fn track_pointer(
    time: Res<Time>,
    cfg: Res<RenderLoopConfig>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    mut demand: ResMut<RenderDemand>,
) {
    let pressed = buttons.is_some_and(|b| b.get_pressed().next().is_some())
        || touches.is_some_and(|t| t.iter().next().is_some());
    if pressed {
        demand.pointer_hold = cfg.pointer_hold_secs;
    } else if demand.pointer_hold > 0.0 {
        demand.pointer_hold = (demand.pointer_hold - time.delta_secs()).max(0.0);
    }
}

fn apply_update_mode(
    cfg: Res<RenderLoopConfig>,
    exp: Res<Experience>,
    mut demand: ResMut<RenderDemand>,
    winit: Option<ResMut<WinitSettings>>,
) {
    let continuous = needs_continuous_frames(&exp, demand.pointer_active());
    if demand.continuous == Some(continuous) {
        return;
    }
    demand.continuous = Some(continuous);
    debug!("render loop continuous: {continuous}");

    let Some(mut winit) = winit else {
        return;
    };
    winit.focused_mode = if continuous {
        UpdateMode::Continuous
    } else {
        UpdateMode::reactive_low_power(Duration::from_secs_f32(cfg.idle_wait_secs))
    };
}

#[cfg(test)]
mod tests {
    use bevy::input::InputPlugin;
    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::store::StorePlugin;

    fn app(level: PerformanceLevel) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, InputPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(WinitSettings::desktop_app())
            .add_plugins(StorePlugin(crate::store::StoreConfig {
                performance_level: level,
                ..default()
            }))
            .add_plugins(RenderLoopPlugin(RenderLoopConfig::default()));
        app
    }

    fn continuous(app: &App) -> bool {
        matches!(
            app.world().resource::<WinitSettings>().focused_mode,
            UpdateMode::Continuous
        )
    }

    #[test]
    fn predicate_covers_every_reason() {
        let mut exp = Experience::default();
        assert!(needs_continuous_frames(&exp, false), "medium tier");
        exp.set_performance_level(PerformanceLevel::Low);
        assert!(!needs_continuous_frames(&exp, false));
        assert!(needs_continuous_frames(&exp, true));
        exp.set_is_animating(true);
        assert!(needs_continuous_frames(&exp, false));
        exp.set_is_animating(false);
        exp.set_camera_transitioning(true);
        assert!(needs_continuous_frames(&exp, false));
    }

    #[test]
    fn low_tier_idles_until_animating() {
        let mut app = app(PerformanceLevel::Low);
        app.update();
        assert!(!continuous(&app));

        app.world_mut()
            .resource_mut::<Experience>()
            .set_is_animating(true);
        app.update();
        assert!(continuous(&app));

        app.world_mut()
            .resource_mut::<Experience>()
            .set_is_animating(false);
        app.update();
        assert!(!continuous(&app));
    }

    #[test]
    fn pointer_press_holds_frames_for_a_second() {
        let mut app = app(PerformanceLevel::Low);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(continuous(&app));

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .release(MouseButton::Left);
        for _ in 0..5 {
            app.update();
        }
        assert!(continuous(&app), "still inside the hold window");
        for _ in 0..10 {
            app.update();
        }
        assert!(!continuous(&app));
    }

    #[test]
    fn queued_request_wakes_the_loop_before_it_starts() {
        let mut exp = Experience::default();
        exp.set_performance_level(PerformanceLevel::Low);
        exp.request_scene_transition(crate::store::Scene::Intro, None);
        assert!(!exp.is_animating());
        assert!(needs_continuous_frames(&exp, false));

        let mut app = app(PerformanceLevel::Low);
        app.update();
        assert!(!continuous(&app));
        app.world_mut()
            .resource_mut::<Experience>()
            .request_scene_transition(crate::store::Scene::Intro, None);
        app.update();
        assert!(continuous(&app), "the queued request alone counts");
    }

    #[test]
    fn medium_tier_stays_continuous() {
        let mut app = app(PerformanceLevel::Medium);
        for _ in 0..3 {
            app.update();
        }
        assert!(continuous(&app));
    }
}
