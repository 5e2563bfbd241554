//! Generic smoothing/interpolation types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::clock::FrameTime;
use crate::transform::Transform;

/// How the per-frame interpolation factor is derived from `rate` and `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingLaw {
    /// `min(1, dt * rate)`
    #[default]
    ClampedLinear,
    /// `1 - e^(-dt * rate)`, frame-rate independent
    Exponential,
}

impl SmoothingLaw {
    /// Fraction of the remaining distance to cover this frame, always in `[0, 1]`.
    pub fn factor(&self, rate: f32, dt: f32) -> f32 {
        let t = match self {
            SmoothingLaw::ClampedLinear => dt * rate,
            SmoothingLaw::Exponential => 1.0 - (-dt * rate).exp(),
        };
        t.clamp(0.0, 1.0)
    }
}

/// Trait for types that can be interpolated (tweened).
pub trait Tweenable: Copy {
    /// Linear interpolation between two values.
    /// `t` should be 0.0 to 1.0, where 0.0 returns `a` and 1.0 returns `b`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;

    /// Distance used for "arrived" checks.
    fn distance(a: Self, b: Self) -> f32;
}

impl Tweenable for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn distance(a: Self, b: Self) -> f32 {
        (b - a).abs()
    }
}

impl Tweenable for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }

    fn distance(a: Self, b: Self) -> f32 {
        a.distance(b)
    }
}

impl Tweenable for Quat {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }

    fn distance(a: Self, b: Self) -> f32 {
        quat_distance(a, b)
    }
}

/// Chordal distance between unit quaternions; exactly zero for equal inputs
/// and about half the rotation angle for small differences. `q` and `-q` are
/// the same rotation.
fn quat_distance(a: Quat, b: Quat) -> f32 {
    (a - b).length().min((a + b).length())
}

impl Tweenable for Transform {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Transform {
            translation: a.translation.lerp(b.translation, t),
            rotation: a.rotation.slerp(b.rotation, t),
            scale: <f32 as Tweenable>::lerp(a.scale, b.scale, t),
        }
    }

    fn distance(a: Self, b: Self) -> f32 {
        a.translation
            .distance(b.translation)
            .max(quat_distance(a.rotation, b.rotation))
            .max((b.scale - a.scale).abs())
    }
}

/// Move `current` toward `target` by one smoothing step.
///
/// A paused frame returns `current` untouched. Negative deltas cannot reach
/// here; [`FrameTime::new`] rejects them.
pub fn smooth_toward<T: Tweenable>(current: T, target: T, rate: f32, frame: FrameTime, law: SmoothingLaw) -> T {
    if frame.is_paused() {
        return current;
    }
    T::lerp(current, target, law.factor(rate, frame.delta()))
}

/// A value that converges toward its target a little more every frame.
///
/// Once it comes within `settle_epsilon` of the target it snaps onto it, so
/// arrival is exact and [`Smoothed::is_settled`] can be used as a discrete
/// "animation finished" signal.
#[derive(Debug, Clone)]
pub struct Smoothed<T: Tweenable> {
    /// Current interpolated value
    current: T,
    /// Value being converged to
    target: T,
    /// Smoothing rate constant (1/s)
    rate: f32,
    law: SmoothingLaw,
    settle_epsilon: f32,
}

impl<T: Tweenable> Smoothed<T> {
    /// Create a settled value.
    pub fn new(initial: T, rate: f32, settle_epsilon: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            rate,
            law: SmoothingLaw::default(),
            settle_epsilon,
        }
    }

    pub fn with_law(mut self, law: SmoothingLaw) -> Self {
        self.law = law;
        self
    }

    /// Retarget. Abandoning a transition mid-flight is just this call.
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Set the value immediately without animation.
    pub fn set_immediate(&mut self, value: T) {
        self.current = value;
        self.target = value;
    }

    /// Advance by one frame. Returns `true` while still moving.
    pub fn update(&mut self, frame: FrameTime) -> bool {
        self.current = smooth_toward(self.current, self.target, self.rate, frame, self.law);
        if T::distance(self.current, self.target) <= self.settle_epsilon {
            self.current = self.target;
        }
        !self.is_settled()
    }

    pub fn value(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn distance_to_target(&self) -> f32 {
        T::distance(self.current, self.target)
    }

    pub fn is_settled(&self) -> bool {
        self.distance_to_target() <= self.settle_epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;

    fn frame(dt: f32) -> FrameTime {
        FrameTime::new(0.0, dt).unwrap()
    }

    #[test]
    fn test_factor_clamped() {
        assert!((SmoothingLaw::ClampedLinear.factor(3.0, 0.1) - 0.3).abs() < 1e-6);
        assert_eq!(SmoothingLaw::ClampedLinear.factor(3.0, 10.0), 1.0);
        assert_eq!(SmoothingLaw::Exponential.factor(3.0, 1000.0), 1.0);
        assert_eq!(SmoothingLaw::Exponential.factor(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_smooth_toward_zero_dt_is_noop() {
        let v = smooth_toward(Vec3::ZERO, Vec3::X, 5.0, frame(0.0), SmoothingLaw::ClampedLinear);
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_large_dt_lands_without_overshoot() {
        for law in [SmoothingLaw::ClampedLinear, SmoothingLaw::Exponential] {
            let v = smooth_toward(0.0f32, 10.0, 2.0, frame(100.0), law);
            assert!(v <= 10.0);
            assert!((v - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_smoothed_settles_exactly() {
        let mut val = Smoothed::new(0.0f32, 3.0, 1e-3);
        val.set_target(-2.2);
        assert!(!val.is_settled());

        let mut steps = 0;
        while val.update(frame(1.0 / 60.0)) {
            steps += 1;
            assert!(steps < 1000, "never settled");
        }
        assert_eq!(val.value(), -2.2);
    }

    #[test]
    fn test_smoothed_distance_monotonic() {
        let mut val = Smoothed::new(Vec3::new(0.0, 5.0, 50.0), 1.5, 1e-4).with_law(SmoothingLaw::Exponential);
        val.set_target(Vec3::new(0.0, 0.0, 15.0));
        let mut last = val.distance_to_target();
        for _ in 0..200 {
            val.update(frame(0.016));
            let d = val.distance_to_target();
            assert!(d <= last);
            last = d;
        }
    }

    #[test]
    fn test_smoothed_only_advances_on_valid_frames() {
        let mut val = Smoothed::new(0.0f32, 3.0, 1e-3);
        val.set_target(1.0);

        assert!(matches!(
            FrameTime::new(0.0, -0.5),
            Err(SceneError::InvalidFrameTime { .. })
        ));
        assert!(val.update(frame(0.0)));
        assert_eq!(val.value(), 0.0);

        val.update(frame(0.1));
        assert!(val.value() > 0.0 && val.value() < 1.0);
    }

    #[test]
    fn test_transform_distance_covers_scale() {
        let a = Transform::IDENTITY;
        let b = Transform::IDENTITY.with_scale(2.5);
        assert!((Transform::distance(a, b) - 1.5).abs() < 1e-6);
    }
}
