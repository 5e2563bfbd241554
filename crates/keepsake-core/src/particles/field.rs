//! Field generation, per-frame stepping and memoization.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use super::{MotionLaw, ParticleInstance, ParticleRecord};
use crate::clock::FrameTime;
use crate::error::ConfigError;

/// Particle count plus the spherical shell the seed positions are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl FieldShape {
    pub fn new(count: usize, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            count,
            inner_radius,
            outer_radius,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount {
                field: "particle count",
            });
        }
        let (inner, outer) = (self.inner_radius, self.outer_radius);
        if !(inner.is_finite() && outer.is_finite() && inner > 0.0 && outer > inner) {
            return Err(ConfigError::InvalidShell { inner, outer });
        }
        Ok(())
    }
}

/// Uniform direction, radius uniform in `[inner, outer]`.
fn sample_shell<R: Rng + ?Sized>(rng: &mut R, inner: f32, outer: f32) -> Vec3 {
    let r = rng.gen_range(inner..=outer);
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Generate `shape.count` records for `law`. Deterministic for a seeded `rng`.
pub fn generate<L, R>(shape: &FieldShape, law: &L, rng: &mut R) -> Result<Vec<ParticleRecord<L::Params>>, ConfigError>
where
    L: MotionLaw,
    R: Rng + ?Sized,
{
    shape.validate()?;
    law.validate()?;

    let mut records = Vec::with_capacity(shape.count);
    for _ in 0..shape.count {
        let base_position = sample_shell(rng, shape.inner_radius, shape.outer_radius);
        let phase = rng.gen_range(0.0..TAU);
        let speed = law.sample_speed(rng);
        let params = law.sample_params(rng);
        records.push(ParticleRecord {
            base_position,
            phase,
            speed,
            params,
        });
    }
    Ok(records)
}

/// Evaluate every record at `elapsed`, reusing `out`'s allocation.
pub fn step<L: MotionLaw>(law: &L, records: &[ParticleRecord<L::Params>], elapsed: f32, out: &mut Vec<ParticleInstance>) {
    out.clear();
    out.extend(records.iter().map(|record| law.instance(record, elapsed)));
}

/// A generated field plus its output buffer.
///
/// Records are regenerated only when the shape changes.
pub struct ParticleField<L: MotionLaw> {
    law: L,
    shape: FieldShape,
    seed: u64,
    records: Vec<ParticleRecord<L::Params>>,
    instances: Vec<ParticleInstance>,
}

impl<L: MotionLaw> ParticleField<L> {
    pub fn new(law: L, shape: FieldShape, seed: u64) -> Result<Self, ConfigError> {
        let records = generate(&shape, &law, &mut Xoshiro256StarStar::seed_from_u64(seed))?;
        log::debug!("generated {} {} particles", records.len(), law.name());
        Ok(Self {
            instances: Vec::with_capacity(records.len()),
            law,
            shape,
            seed,
            records,
        })
    }

    /// Apply a new shape. Returns `true` when the records were regenerated.
    pub fn reconfigure(&mut self, shape: FieldShape) -> Result<bool, ConfigError> {
        if shape == self.shape {
            return Ok(false);
        }
        self.records = generate(&shape, &self.law, &mut Xoshiro256StarStar::seed_from_u64(self.seed))?;
        self.shape = shape;
        log::info!(
            "regenerated {} field: {} particles in [{}, {}]",
            self.law.name(),
            shape.count,
            shape.inner_radius,
            shape.outer_radius
        );
        Ok(true)
    }

    pub fn step(&mut self, frame: FrameTime) -> &[ParticleInstance] {
        step(&self.law, &self.records, frame.elapsed(), &mut self.instances);
        &self.instances
    }

    /// Output of the last [`ParticleField::step`].
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn records(&self) -> &[ParticleRecord<L::Params>] {
        &self.records
    }

    pub fn law(&self) -> &L {
        &self.law
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
