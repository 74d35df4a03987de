use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::picking::Pickable;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::VisualsConfig;
use super::entities::{AmbientLayer, RoseGlow};
use crate::camera::{CameraRig, DirectorCamera, focus_pose};
use crate::gift::model_visibility;
use crate::math::{fibonacci_sphere, rose_glow};
use crate::rose;
use crate::store::{Experience, FocusTarget, LayerKey, ModelKey};

/// Spawns the camera, light, models and starfield.
pub fn setup_stage(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<VisualsConfig>,
    rig: Res<CameraRig>,
    exp: Res<Experience>,
) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: exp.layer_params().bloom_intensity() * cfg.bloom_scale,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        rig.transform(),
        DirectorCamera,
    ));

    commands.spawn((
        Name::new("Moonlight"),
        DirectionalLight {
            illuminance: 3_000.0,
            color: Color::srgb(0.85, 0.85, 1.0),
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let rose_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.75, 0.02, 0.12),
        emissive: LinearRgba::rgb(0.6, 0.0, 0.08),
        perceptual_roughness: 0.3,
        ..default()
    });
    let paper = materials.add(StandardMaterial {
        base_color: Color::srgb(0.96, 0.9, 0.8),
        perceptual_roughness: 0.9,
        ..default()
    });
    let chocolate = materials.add(StandardMaterial {
        base_color: Color::srgb(0.24, 0.12, 0.06),
        perceptual_roughness: 0.25,
        ..default()
    });
    let mascot = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.75, 0.82),
        ..default()
    });
    let star = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::rgb(8.0, 8.0, 10.0),
        unlit: true,
        ..default()
    });

    let transforms = exp.model_transforms();
    let hidden = Visibility::Hidden;

    commands
        .spawn((
            Name::new("Rose"),
            ModelKey::Rose,
            Mesh3d(meshes.add(Sphere::new(0.6))),
            MeshMaterial3d(rose_mat),
            transforms.get(ModelKey::Rose).to_transform(),
            hidden,
        ))
        .with_child((
            Name::new("Rose glow"),
            RoseGlow,
            PointLight {
                intensity: cfg.glow_lumens,
                color: Color::srgb(1.0, 0.35, 0.45),
                range: 8.0,
                ..default()
            },
            Transform::from_xyz(0.0, 0.4, 0.0),
        ))
        .observe(rose::on_rose_over)
        .observe(rose::on_rose_out)
        .observe(rose::on_rose_press)
        .observe(rose::on_rose_drag_start)
        .observe(rose::on_rose_release);

    let props = [
        (
            "Envelope",
            ModelKey::Envelope,
            meshes.add(Cuboid::new(1.2, 0.05, 0.8)),
            paper.clone(),
        ),
        (
            "Photo",
            ModelKey::Photo,
            meshes.add(Cuboid::new(1.0, 1.3, 0.04)),
            paper,
        ),
        (
            "Chocolate",
            ModelKey::Chocolate,
            meshes.add(Cuboid::new(0.9, 0.15, 0.5)),
            chocolate,
        ),
        (
            "Mascot",
            ModelKey::Mascot,
            meshes.add(Capsule3d::new(0.35, 0.6)),
            mascot,
        ),
    ];
    for (name, key, mesh, material) in props {
        commands.spawn((
            Name::new(name),
            key,
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transforms.get(key).to_transform(),
            hidden,
            Pickable::IGNORE,
        ));
    }

    let star_mesh = meshes.add(Sphere::new(cfg.star_size));
    commands
        .spawn((
            Name::new("Starfield"),
            AmbientLayer(LayerKey::Starfield),
            Transform::default(),
            hidden,
        ))
        .with_children(|parent| {
            for pos in fibonacci_sphere(cfg.star_count, cfg.star_radius) {
                parent.spawn((
                    Mesh3d(star_mesh.clone()),
                    MeshMaterial3d(star.clone()),
                    Transform::from_translation(pos),
                    Pickable::IGNORE,
                ));
            }
        });
}

/// Mirrors model transforms and gated visibility onto the model entities.
pub fn sync_models(
    exp: Res<Experience>,
    mut models: Query<(&ModelKey, &mut Transform, &mut Visibility)>,
) {
    if !exp.is_changed() {
        return;
    }
    let shown = model_visibility(&exp);
    for (key, mut transform, mut visibility) in &mut models {
        let target = exp.model_transforms().get(*key).to_transform();
        if *transform != target {
            *transform = target;
        }
        visibility.set_if_neq(if shown.get(*key) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

/// Shows each ambient layer root while its layer is active.
pub fn sync_layers(exp: Res<Experience>, mut layers: Query<(&AmbientLayer, &mut Visibility)>) {
    if !exp.is_changed() {
        return;
    }
    for (layer, mut visibility) in &mut layers {
        visibility.set_if_neq(if exp.active_layers().get(layer.0) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

/// Camera bloom follows the store's bloom-derived intensity.
pub fn sync_bloom(
    exp: Res<Experience>,
    cfg: Res<VisualsConfig>,
    mut cameras: Query<&mut Bloom, With<DirectorCamera>>,
) {
    let target = exp.layer_params().bloom_intensity() * cfg.bloom_scale;
    for mut bloom in &mut cameras {
        if (bloom.intensity - target).abs() > f32::EPSILON {
            bloom.intensity = target;
        }
    }
}

/// Rose glow grows with bloom and breathes while the light-pulse layer is on.
pub fn pulse_rose_glow(
    time: Res<Time>,
    exp: Res<Experience>,
    cfg: Res<VisualsConfig>,
    mut lights: Query<&mut PointLight, With<RoseGlow>>,
) {
    let pulse = exp.active_layers().get(LayerKey::LightPulse);
    let intensity =
        cfg.glow_lumens * rose_glow(exp.bloom_progress(), time.elapsed_secs(), pulse);
    for mut light in &mut lights {
        light.intensity = intensity;
    }
}

/// Marks every focus pose; the current target is drawn brighter.
pub fn draw_focus_poses(exp: Res<Experience>, mut gizmos: Gizmos) {
    for target in FocusTarget::ALL {
        let pose = focus_pose(target);
        let color = if target == exp.focus_target() {
            Color::srgb(1.0, 0.85, 0.2)
        } else {
            Color::srgba(0.4, 0.7, 1.0, 0.5)
        };
        gizmos.sphere(Isometry3d::from_translation(pose.position), 0.2, color);
        gizmos.line(pose.position, pose.look_at, color);
        gizmos.sphere(Isometry3d::from_translation(pose.look_at), 0.05, color);
    }
}
