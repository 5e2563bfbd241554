//! Procedural particle fields: starfield, sparkles, petals and hearts.
//!
//! Each field is generated once from a seed and then evaluated every frame by
//! its [`MotionLaw`]. Motion is a closed-form function of the static record
//! and the elapsed time, so stepping is pure and O(count).

mod field;
mod laws;

pub use field::{generate, step, FieldShape, ParticleField};
pub use laws::{FallingSway, RisingTumble, SwayParams, TumbleParams, Twinkle, TwinkleParams};

use glam::Vec3;
use rand::Rng;

use crate::error::ConfigError;
use crate::transform::Transform;

/// Static per-particle attributes, generated once per configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord<P> {
    /// Seed position (inside the field's shell)
    pub base_position: Vec3,
    /// Phase offset in `[0, TAU)`
    pub phase: f32,
    /// Category-specific rate (twinkle rate, fall or rise speed)
    pub speed: f32,
    pub params: P,
}

/// What the renderer receives for one particle this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInstance {
    pub transform: Transform,
    /// Brightness multiplier in `[0, 1]`
    pub intensity: f32,
    /// Index into the renderer's color palette
    pub palette_index: u32,
}

/// The one capability a particle category must provide.
///
/// New categories plug into [`ParticleField`] without touching its
/// generation or memoization.
pub trait MotionLaw {
    type Params: Copy + std::fmt::Debug;

    /// Category name used in logs.
    fn name(&self) -> &'static str;

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Per-particle rate stored in [`ParticleRecord::speed`].
    fn sample_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32;

    fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Params;

    /// Evaluate one particle at `elapsed` seconds.
    fn instance(&self, record: &ParticleRecord<Self::Params>, elapsed: f32) -> ParticleInstance;
}
