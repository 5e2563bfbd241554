//! Frame timing supplied by the external driver.
//!
//! Nothing in this crate reads the wall clock; every tick receives a
//! [`FrameTime`] built by the caller.

use crate::error::{SceneError, SceneResult};

/// Elapsed and delta time for one tick, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    elapsed: f32,
    delta: f32,
}

impl FrameTime {
    /// Validate and wrap a tick's timing.
    ///
    /// A delta of exactly zero is a valid no-op tick. Negative or non-finite
    /// values are a caller contract violation.
    pub fn new(elapsed: f32, delta: f32) -> SceneResult<Self> {
        if !elapsed.is_finite() || !delta.is_finite() || delta < 0.0 {
            return Err(SceneError::InvalidFrameTime { elapsed, delta });
        }
        Ok(Self { elapsed, delta })
    }

    /// Seconds since the scene started (monotonic).
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds since the previous tick (>= 0).
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn is_paused(&self) -> bool {
        self.delta == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delta_is_valid() {
        let frame = FrameTime::new(1.0, 0.0).unwrap();
        assert!(frame.is_paused());
    }

    #[test]
    fn test_negative_delta_rejected() {
        assert_eq!(
            FrameTime::new(1.0, -0.016),
            Err(SceneError::InvalidFrameTime {
                elapsed: 1.0,
                delta: -0.016
            })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(FrameTime::new(f32::NAN, 0.016).is_err());
        assert!(FrameTime::new(1.0, f32::INFINITY).is_err());
    }
}
