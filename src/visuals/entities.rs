use bevy::prelude::*;

use crate::store::LayerKey;

/// Root of an ambient layer; shown while the layer is active.
#[derive(Component, Reflect)]
pub struct AmbientLayer(pub LayerKey);

/// Point light inside the rose; pulses while the light-pulse layer is on.
#[derive(Component, Reflect)]
pub struct RoseGlow;
