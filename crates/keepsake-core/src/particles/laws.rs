//! Built-in motion laws.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{MotionLaw, ParticleInstance, ParticleRecord};
use crate::error::{ensure_ordered, ensure_positive, ensure_range, ConfigError};
use crate::transform::Transform;

/// Per-particle twinkle attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwinkleParams {
    /// Size at full intensity
    pub size: f32,
    pub palette_index: u32,
}

/// Points fixed in a slowly rotating frame, pulsing in brightness and size.
///
/// Used for the starfield and the sparkles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Twinkle {
    /// Rotation of the whole field about Y (rad/s)
    pub frame_rotation_speed: f32,
    /// Base angular rate of the twinkle wave (rad/s)
    pub twinkle_speed: f32,
    /// Per-particle rate multiplier range
    pub rate_jitter: [f32; 2],
    /// Exponent applied to the wave; higher gives sharper flashes
    pub sharpness: f32,
    pub size_range: [f32; 2],
    pub palette_size: u32,
}

impl Default for Twinkle {
    fn default() -> Self {
        Self::starfield()
    }
}

impl Twinkle {
    /// Far pastel stars in four colors, drifting slowly.
    pub fn starfield() -> Self {
        Self {
            frame_rotation_speed: 0.02,
            twinkle_speed: 2.0,
            rate_jitter: [0.75, 1.25],
            sharpness: 1.0,
            size_range: [0.8, 1.2],
            palette_size: 4,
        }
    }

    /// Closer, sharper flashes that do not rotate.
    pub fn sparkles() -> Self {
        Self {
            frame_rotation_speed: 0.0,
            twinkle_speed: 3.0,
            rate_jitter: [1.0, 1.0],
            sharpness: 2.0,
            size_range: [0.5, 2.0],
            palette_size: 1,
        }
    }
}

impl MotionLaw for Twinkle {
    type Params = TwinkleParams;

    fn name(&self) -> &'static str {
        "twinkle"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("twinkle.twinkle_speed", self.twinkle_speed)?;
        ensure_positive("twinkle.sharpness", self.sharpness)?;
        ensure_positive("twinkle.rate_jitter", self.rate_jitter[0])?;
        ensure_range("twinkle.rate_jitter", self.rate_jitter[0], self.rate_jitter[1])?;
        ensure_positive("twinkle.size_range", self.size_range[0])?;
        ensure_range("twinkle.size_range", self.size_range[0], self.size_range[1])?;
        if self.palette_size == 0 {
            return Err(ConfigError::ZeroCount {
                field: "twinkle.palette_size",
            });
        }
        Ok(())
    }

    fn sample_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.twinkle_speed * rng.gen_range(self.rate_jitter[0]..=self.rate_jitter[1])
    }

    fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> TwinkleParams {
        TwinkleParams {
            size: rng.gen_range(self.size_range[0]..=self.size_range[1]),
            palette_index: rng.gen_range(0..self.palette_size),
        }
    }

    fn instance(&self, record: &ParticleRecord<TwinkleParams>, elapsed: f32) -> ParticleInstance {
        let frame = Quat::from_rotation_y(self.frame_rotation_speed * elapsed);
        let wave = (elapsed * record.speed + record.phase).sin() * 0.5 + 0.5;
        let intensity = wave.powf(self.sharpness);

        ParticleInstance {
            transform: Transform::from_translation(frame * record.base_position)
                .with_scale(record.params.size * intensity),
            intensity,
            palette_index: record.params.palette_index,
        }
    }
}

/// Per-petal sway and spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwayParams {
    /// Sway angular rate (rad/s)
    pub sway_speed: f32,
    /// Sway amplitude (world units)
    pub sway_amount: f32,
    /// Tumble rate (rad/s)
    pub spin: f32,
}

/// Falling petals with lateral sway that wrap from the bottom back to the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingSway {
    /// Fall speed range (units/s)
    pub fall_speed: [f32; 2],
    /// Wrap-around bounds on Y
    pub lower: f32,
    pub upper: f32,
    pub sway_speed: [f32; 2],
    pub sway_amount: [f32; 2],
    /// Spin rates are drawn from `[-max_spin, max_spin]`
    pub max_spin: f32,
}

impl Default for FallingSway {
    fn default() -> Self {
        Self {
            fall_speed: [1.5, 2.1],
            lower: -15.0,
            upper: 25.0,
            sway_speed: [0.5, 2.0],
            sway_amount: [0.5, 1.5],
            max_spin: 0.05,
        }
    }
}

impl FallingSway {
    /// Y after falling; crossing `lower` restarts at `upper`.
    pub fn wrapped_height(&self, start: f32, fallen: f32) -> f32 {
        let y = start - fallen;
        if y >= self.lower {
            y
        } else {
            self.upper - (self.lower - y).rem_euclid(self.upper - self.lower)
        }
    }
}

impl MotionLaw for FallingSway {
    type Params = SwayParams;

    fn name(&self) -> &'static str {
        "falling-sway"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("petals.fall_speed", self.fall_speed[0])?;
        ensure_range("petals.fall_speed", self.fall_speed[0], self.fall_speed[1])?;
        ensure_ordered("petals bounds", self.lower, self.upper)?;
        ensure_range("petals.sway_speed", self.sway_speed[0], self.sway_speed[1])?;
        ensure_range("petals.sway_amount", self.sway_amount[0], self.sway_amount[1])?;
        ensure_range("petals.max_spin", 0.0, self.max_spin)?;
        Ok(())
    }

    fn sample_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.fall_speed[0]..=self.fall_speed[1])
    }

    fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> SwayParams {
        SwayParams {
            sway_speed: rng.gen_range(self.sway_speed[0]..=self.sway_speed[1]),
            sway_amount: rng.gen_range(self.sway_amount[0]..=self.sway_amount[1]),
            spin: rng.gen_range(-self.max_spin..=self.max_spin),
        }
    }

    fn instance(&self, record: &ParticleRecord<SwayParams>, elapsed: f32) -> ParticleInstance {
        let base = record.base_position;
        let p = &record.params;
        let y = self.wrapped_height(base.y, record.speed * elapsed);
        let sway = (elapsed * p.sway_speed + record.phase).sin() * p.sway_amount;

        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            elapsed * p.spin + record.phase,
            elapsed * p.spin * 1.5,
            (elapsed + record.phase).sin() * 0.5,
        );

        ParticleInstance {
            transform: Transform {
                translation: Vec3::new(base.x + sway, y, base.z + sway * 0.5),
                rotation,
                scale: 0.8 + (elapsed + record.phase).sin() * 0.2,
            },
            intensity: 1.0,
            palette_index: 0,
        }
    }
}

/// Per-heart tumble and drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TumbleParams {
    /// Angular velocity about X, Y and Z (rad/s)
    pub spin: Vec3,
    /// Rate of the small horizontal circle (rad/s)
    pub drift_rate: f32,
}

/// Rising, tumbling hearts that wrap from the top back to the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RisingTumble {
    /// Rise speed range (units/s)
    pub rise_speed: [f32; 2],
    pub lower: f32,
    pub upper: f32,
    /// Radius of the horizontal drift circle
    pub drift_radius: f32,
    pub drift_rate: [f32; 2],
    /// Spin rates are drawn from `[-max_spin, max_spin]` per axis
    pub max_spin: f32,
}

impl Default for RisingTumble {
    fn default() -> Self {
        Self {
            rise_speed: [1.0, 1.4],
            lower: -20.0,
            upper: 20.0,
            drift_radius: 2.0,
            drift_rate: [0.3, 0.45],
            max_spin: 0.6,
        }
    }
}

impl RisingTumble {
    /// Y after rising; crossing `upper` restarts at `lower`.
    pub fn wrapped_height(&self, start: f32, risen: f32) -> f32 {
        let y = start + risen;
        if y <= self.upper {
            y
        } else {
            self.lower + (y - self.upper).rem_euclid(self.upper - self.lower)
        }
    }
}

impl MotionLaw for RisingTumble {
    type Params = TumbleParams;

    fn name(&self) -> &'static str {
        "rising-tumble"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("hearts.rise_speed", self.rise_speed[0])?;
        ensure_range("hearts.rise_speed", self.rise_speed[0], self.rise_speed[1])?;
        ensure_ordered("hearts bounds", self.lower, self.upper)?;
        ensure_range("hearts.drift_radius", 0.0, self.drift_radius)?;
        ensure_range("hearts.drift_rate", self.drift_rate[0], self.drift_rate[1])?;
        ensure_range("hearts.max_spin", 0.0, self.max_spin)?;
        Ok(())
    }

    fn sample_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.rise_speed[0]..=self.rise_speed[1])
    }

    fn sample_params<R: Rng + ?Sized>(&self, rng: &mut R) -> TumbleParams {
        let spin = self.max_spin;
        TumbleParams {
            spin: Vec3::new(
                rng.gen_range(-spin..=spin),
                rng.gen_range(-spin..=spin),
                rng.gen_range(-spin..=spin),
            ),
            drift_rate: rng.gen_range(self.drift_rate[0]..=self.drift_rate[1]),
        }
    }

    fn instance(&self, record: &ParticleRecord<TumbleParams>, elapsed: f32) -> ParticleInstance {
        let base = record.base_position;
        let p = &record.params;
        let y = self.wrapped_height(base.y, record.speed * elapsed);
        let t = record.phase + p.drift_rate * elapsed;
        // Angles grow without bound; the quaternion wraps them.
        let angles = p.spin * elapsed;

        ParticleInstance {
            transform: Transform {
                translation: Vec3::new(
                    base.x + t.cos() * self.drift_radius,
                    y,
                    base.z + t.sin() * self.drift_radius,
                ),
                rotation: Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z),
                scale: 0.2 + t.cos().abs() * 0.2,
            },
            intensity: 1.0,
            palette_index: 0,
        }
    }
}
