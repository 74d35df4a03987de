use std::fmt;
use std::str::FromStr;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

/// Total number of petals on the rose (6 + 8 + 10 + 12 over four layers).
pub const TOTAL_PETALS: u32 = 36;

/// Named phase of the scripted narrative, in playback order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum Scene {
    /// Waiting screen, the rose is still a bud.
    #[default]
    Prelude,
    /// First touch: the rose starts opening.
    Intro,
    /// Rose in bloom, the envelope appears.
    Flower,
    /// Letter read, gifts are revealed.
    Climax,
    /// Chocolate close-up.
    Chocolate,
    /// Final convergence.
    Ending,
}

impl Scene {
    /// Every scene in playback order.
    pub const ALL: [Scene; 6] = [
        Scene::Prelude,
        Scene::Intro,
        Scene::Flower,
        Scene::Climax,
        Scene::Chocolate,
        Scene::Ending,
    ];

    /// Lower-case key used by configs and the CLI.
    pub fn key(self) -> &'static str {
        match self {
            Scene::Prelude => "prelude",
            Scene::Intro => "intro",
            Scene::Flower => "flower",
            Scene::Climax => "climax",
            Scene::Chocolate => "chocolate",
            Scene::Ending => "ending",
        }
    }

    /// `flower`, `climax`, `chocolate` or `ending`.
    pub fn is_flower_or_later(self) -> bool {
        self >= Scene::Flower
    }

    /// `climax`, `chocolate` or `ending`.
    pub fn is_climax_or_later(self) -> bool {
        self >= Scene::Climax
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A scene key that names none of the six scenes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scene `{0}`")]
pub struct UnknownScene(pub String);

impl FromStr for Scene {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scene::ALL
            .into_iter()
            .find(|scene| scene.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownScene(s.to_owned()))
    }
}

/// Named camera pose the director can move to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum FocusTarget {
    /// Close on the rose.
    #[default]
    Rose,
    /// Close on the letter envelope.
    Envelope,
    /// Framing the memory photos.
    Photo,
    /// Close on the chocolate cluster.
    Chocolate,
    /// Wide shot of the whole stage.
    Center,
}

impl FocusTarget {
    /// Every focus target.
    pub const ALL: [FocusTarget; 5] = [
        FocusTarget::Rose,
        FocusTarget::Envelope,
        FocusTarget::Photo,
        FocusTarget::Chocolate,
        FocusTarget::Center,
    ];
}

/// Rendering budget tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum PerformanceLevel {
    /// Lowest detail; the render loop may idle between events.
    Low,
    /// Default tier.
    #[default]
    Medium,
    /// Full post-processing and shadows.
    High,
}

/// Free-form options attached to a transition request.
pub type TransitionOptions = HashMap<String, String>;

/// An outstanding, not yet completed scene-change request.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct PendingTransition {
    /// Scene to commit.
    pub scene: Scene,
    /// Options passed by the requester, carried verbatim.
    pub options: TransitionOptions,
    /// Request id; strictly increasing across requests.
    pub seq: u64,
}

/// Ambient effect that can be toggled per scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum LayerKey {
    /// Star shell around the stage.
    Starfield,
    /// Film-grain post effect.
    FilmGrain,
    /// Breathing glow inside the rose.
    LightPulse,
    /// Falling meteors.
    Meteor,
    /// Rain streaks.
    Rain,
    /// Drifting letter paper.
    Letter,
    /// Rising hearts.
    Hearts,
    /// Floating love words.
    FloatingWords,
}

impl LayerKey {
    /// Every layer key.
    pub const ALL: [LayerKey; 8] = [
        LayerKey::Starfield,
        LayerKey::FilmGrain,
        LayerKey::LightPulse,
        LayerKey::Meteor,
        LayerKey::Rain,
        LayerKey::Letter,
        LayerKey::Hearts,
        LayerKey::FloatingWords,
    ];
}

/// Which ambient layers are on. Every key is always present.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct LayerActivation {
    pub starfield: bool,
    pub film_grain: bool,
    pub light_pulse: bool,
    pub meteor: bool,
    pub rain: bool,
    pub letter: bool,
    pub hearts: bool,
    pub floating_words: bool,
}

impl LayerActivation {
    /// Whether `key` is on.
    pub fn get(&self, key: LayerKey) -> bool {
        match key {
            LayerKey::Starfield => self.starfield,
            LayerKey::FilmGrain => self.film_grain,
            LayerKey::LightPulse => self.light_pulse,
            LayerKey::Meteor => self.meteor,
            LayerKey::Rain => self.rain,
            LayerKey::Letter => self.letter,
            LayerKey::Hearts => self.hearts,
            LayerKey::FloatingWords => self.floating_words,
        }
    }

    /// Turns `key` on or off.
    pub fn set(&mut self, key: LayerKey, active: bool) {
        let slot = match key {
            LayerKey::Starfield => &mut self.starfield,
            LayerKey::FilmGrain => &mut self.film_grain,
            LayerKey::LightPulse => &mut self.light_pulse,
            LayerKey::Meteor => &mut self.meteor,
            LayerKey::Rain => &mut self.rain,
            LayerKey::Letter => &mut self.letter,
            LayerKey::Hearts => &mut self.hearts,
            LayerKey::FloatingWords => &mut self.floating_words,
        };
        *slot = active;
    }
}

/// Tunable numeric layer parameter.
///
/// Has no variants for the bloom-derived `bloom_intensity` and `dof_focus`;
/// those only change through bloom progress.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum LayerParam {
    HeartCount,
    HeartSpeed,
    MeteorCount,
    MeteorSpeed,
    MeteorAngle,
    RainCount,
    RainOpacity,
    FilmGrainIntensity,
    VignetteDarkness,
    ChromaOffset,
    DofBokehScale,
    AmbientIntensity,
    EnvIntensity,
    EnvRotation,
    Brightness,
    Contrast,
    Saturation,
    FloatingWordsCount,
    FloatingWordsSpeed,
    FloatingWordsOpacity,
    FloatingWordsSize,
    WindSpeed,
    WindAngle,
    WindIntensity,
    SunsetIntensity,
    SunsetAngle,
    Warmth,
}

/// Runtime parameters consumed by the ambient layers and post-processing.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct LayerParams {
    pub heart_count: f32,
    /// Multiplier.
    pub heart_speed: f32,
    pub meteor_count: f32,
    pub meteor_speed: f32,
    pub meteor_angle: f32,
    pub rain_count: f32,
    pub rain_opacity: f32,
    pub film_grain_intensity: f32,
    pub vignette_darkness: f32,
    /// Derived from bloom progress.
    pub(crate) bloom_intensity: f32,
    pub chroma_offset: f32,
    /// Derived from bloom progress.
    pub(crate) dof_focus: f32,
    pub dof_bokeh_scale: f32,
    pub ambient_intensity: f32,
    pub env_intensity: f32,
    pub env_rotation: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    /// Max words on screen.
    pub floating_words_count: f32,
    pub floating_words_speed: f32,
    pub floating_words_opacity: f32,
    pub floating_words_size: f32,
    pub floating_words_color: Color,
    pub wind_speed: f32,
    /// Degrees.
    pub wind_angle: f32,
    pub wind_intensity: f32,
    pub sunset_intensity: f32,
    /// Degrees above the horizon.
    pub sunset_angle: f32,
    pub warmth: f32,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            heart_count: 50.0,
            heart_speed: 1.0,
            meteor_count: 40.0,
            meteor_speed: 0.008,
            meteor_angle: -0.8,
            rain_count: 300.0,
            rain_opacity: 0.8,
            film_grain_intensity: 0.04,
            vignette_darkness: 1.1,
            bloom_intensity: crate::math::bloom_intensity(0.0),
            chroma_offset: 0.0025,
            dof_focus: crate::math::dof_focus(0.0),
            dof_bokeh_scale: 0.6,
            ambient_intensity: 0.15,
            env_intensity: 0.8,
            env_rotation: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            floating_words_count: 15.0,
            floating_words_speed: 1.0,
            floating_words_opacity: 0.4,
            floating_words_size: 1.0,
            floating_words_color: Color::srgb_u8(0xE8, 0xAE, 0xB7),
            wind_speed: 1.0,
            wind_angle: 45.0,
            wind_intensity: 0.5,
            sunset_intensity: 0.6,
            sunset_angle: 15.0,
            warmth: 0.5,
        }
    }
}

impl LayerParams {
    /// Bloom post-processing intensity, derived from bloom progress.
    pub fn bloom_intensity(&self) -> f32 {
        self.bloom_intensity
    }

    /// Depth-of-field focus distance, derived from bloom progress.
    pub fn dof_focus(&self) -> f32 {
        self.dof_focus
    }

    /// Current value of a tunable parameter.
    pub fn get(&self, param: LayerParam) -> f32 {
        *self.slot(param)
    }

    pub(crate) fn set(&mut self, param: LayerParam, value: f32) {
        *self.slot_mut(param) = value;
    }

    fn slot(&self, param: LayerParam) -> &f32 {
        match param {
            LayerParam::HeartCount => &self.heart_count,
            LayerParam::HeartSpeed => &self.heart_speed,
            LayerParam::MeteorCount => &self.meteor_count,
            LayerParam::MeteorSpeed => &self.meteor_speed,
            LayerParam::MeteorAngle => &self.meteor_angle,
            LayerParam::RainCount => &self.rain_count,
            LayerParam::RainOpacity => &self.rain_opacity,
            LayerParam::FilmGrainIntensity => &self.film_grain_intensity,
            LayerParam::VignetteDarkness => &self.vignette_darkness,
            LayerParam::ChromaOffset => &self.chroma_offset,
            LayerParam::DofBokehScale => &self.dof_bokeh_scale,
            LayerParam::AmbientIntensity => &self.ambient_intensity,
            LayerParam::EnvIntensity => &self.env_intensity,
            LayerParam::EnvRotation => &self.env_rotation,
            LayerParam::Brightness => &self.brightness,
            LayerParam::Contrast => &self.contrast,
            LayerParam::Saturation => &self.saturation,
            LayerParam::FloatingWordsCount => &self.floating_words_count,
            LayerParam::FloatingWordsSpeed => &self.floating_words_speed,
            LayerParam::FloatingWordsOpacity => &self.floating_words_opacity,
            LayerParam::FloatingWordsSize => &self.floating_words_size,
            LayerParam::WindSpeed => &self.wind_speed,
            LayerParam::WindAngle => &self.wind_angle,
            LayerParam::WindIntensity => &self.wind_intensity,
            LayerParam::SunsetIntensity => &self.sunset_intensity,
            LayerParam::SunsetAngle => &self.sunset_angle,
            LayerParam::Warmth => &self.warmth,
        }
    }

    fn slot_mut(&mut self, param: LayerParam) -> &mut f32 {
        match param {
            LayerParam::HeartCount => &mut self.heart_count,
            LayerParam::HeartSpeed => &mut self.heart_speed,
            LayerParam::MeteorCount => &mut self.meteor_count,
            LayerParam::MeteorSpeed => &mut self.meteor_speed,
            LayerParam::MeteorAngle => &mut self.meteor_angle,
            LayerParam::RainCount => &mut self.rain_count,
            LayerParam::RainOpacity => &mut self.rain_opacity,
            LayerParam::FilmGrainIntensity => &mut self.film_grain_intensity,
            LayerParam::VignetteDarkness => &mut self.vignette_darkness,
            LayerParam::ChromaOffset => &mut self.chroma_offset,
            LayerParam::DofBokehScale => &mut self.dof_bokeh_scale,
            LayerParam::AmbientIntensity => &mut self.ambient_intensity,
            LayerParam::EnvIntensity => &mut self.env_intensity,
            LayerParam::EnvRotation => &mut self.env_rotation,
            LayerParam::Brightness => &mut self.brightness,
            LayerParam::Contrast => &mut self.contrast,
            LayerParam::Saturation => &mut self.saturation,
            LayerParam::FloatingWordsCount => &mut self.floating_words_count,
            LayerParam::FloatingWordsSpeed => &mut self.floating_words_speed,
            LayerParam::FloatingWordsOpacity => &mut self.floating_words_opacity,
            LayerParam::FloatingWordsSize => &mut self.floating_words_size,
            LayerParam::WindSpeed => &mut self.wind_speed,
            LayerParam::WindAngle => &mut self.wind_angle,
            LayerParam::WindIntensity => &mut self.wind_intensity,
            LayerParam::SunsetIntensity => &mut self.sunset_intensity,
            LayerParam::SunsetAngle => &mut self.sunset_angle,
            LayerParam::Warmth => &mut self.warmth,
        }
    }
}

/// Scene models that carry a transform and a debug visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component, Reflect)]
pub enum ModelKey {
    /// The rose at the center of the stage.
    Rose,
    /// Letter envelope.
    Envelope,
    /// Framed photo.
    Photo,
    /// Box of chocolate.
    Chocolate,
    /// Gift-bearing mascot.
    Mascot,
}

impl ModelKey {
    /// Every model.
    pub const ALL: [ModelKey; 5] = [
        ModelKey::Rose,
        ModelKey::Envelope,
        ModelKey::Photo,
        ModelKey::Chocolate,
        ModelKey::Mascot,
    ];
}

/// Debug overrides: a `false` hides the model regardless of story gates.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct VisibleModels {
    pub rose: bool,
    pub envelope: bool,
    pub photo: bool,
    pub chocolate: bool,
    pub mascot: bool,
}

impl Default for VisibleModels {
    fn default() -> Self {
        Self {
            rose: true,
            envelope: true,
            photo: true,
            chocolate: true,
            mascot: true,
        }
    }
}

impl VisibleModels {
    /// Debug flag for `model`.
    pub fn get(&self, model: ModelKey) -> bool {
        match model {
            ModelKey::Rose => self.rose,
            ModelKey::Envelope => self.envelope,
            ModelKey::Photo => self.photo,
            ModelKey::Chocolate => self.chocolate,
            ModelKey::Mascot => self.mascot,
        }
    }

    pub(crate) fn toggle(&mut self, model: ModelKey) {
        let slot = match model {
            ModelKey::Rose => &mut self.rose,
            ModelKey::Envelope => &mut self.envelope,
            ModelKey::Photo => &mut self.photo,
            ModelKey::Chocolate => &mut self.chocolate,
            ModelKey::Mascot => &mut self.mascot,
        };
        *slot = !*slot;
    }
}

/// Placement of one model in the stage.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ModelTransform {
    pub position: Vec3,
    /// Euler XYZ, radians.
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl ModelTransform {
    const fn new(position: [f32; 3], rotation: [f32; 3], scale: f32) -> Self {
        Self {
            position: Vec3::from_array(position),
            rotation: Vec3::from_array(rotation),
            scale,
        }
    }

    /// Converts to a Bevy [`Transform`].
    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ))
            .with_scale(Vec3::splat(self.scale))
    }
}

/// Field of a [`ModelTransform`] addressed by `set_model_transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformField {
    /// World position.
    Position(Vec3),
    /// Euler angles (radians, XYZ).
    Rotation(Vec3),
    /// Uniform scale.
    Scale(f32),
}

/// Stage placement of every model.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct ModelTransforms {
    pub rose: ModelTransform,
    pub envelope: ModelTransform,
    pub photo: ModelTransform,
    pub chocolate: ModelTransform,
    pub mascot: ModelTransform,
}

impl Default for ModelTransforms {
    fn default() -> Self {
        Self {
            rose: ModelTransform::new([-2.8, 0.2, -0.5], [0.0, 0.0, 0.0], 1.2),
            envelope: ModelTransform::new([4.0, -0.5, 2.0], [0.0, -0.3, 0.0], 1.0),
            photo: ModelTransform::new([1.1, 1.5, 0.0], [0.0, 0.0, 0.0], 1.0),
            chocolate: ModelTransform::new([-5.0, 4.2, -0.3], [-0.342, -0.4, 0.0], 1.7),
            mascot: ModelTransform::new([0.7, 0.1, -0.9], [-0.042, 0.0, 0.0], 2.8),
        }
    }
}

impl ModelTransforms {
    /// Transform record of `model`.
    pub fn get(&self, model: ModelKey) -> &ModelTransform {
        match model {
            ModelKey::Rose => &self.rose,
            ModelKey::Envelope => &self.envelope,
            ModelKey::Photo => &self.photo,
            ModelKey::Chocolate => &self.chocolate,
            ModelKey::Mascot => &self.mascot,
        }
    }

    pub(crate) fn get_mut(&mut self, model: ModelKey) -> &mut ModelTransform {
        match model {
            ModelKey::Rose => &mut self.rose,
            ModelKey::Envelope => &mut self.envelope,
            ModelKey::Photo => &mut self.photo,
            ModelKey::Chocolate => &mut self.chocolate,
            ModelKey::Mascot => &mut self.mascot,
        }
    }
}
