//! Error types shared by every scene component.

/// A configuration value that would make a component misbehave.
///
/// Raised at construction time; values are never clamped into range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A count that must be strictly positive was zero.
    #[error("{field} must be greater than zero")]
    ZeroCount { field: &'static str },

    /// A float parameter that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// Particle shell with `outer <= inner` or `inner <= 0`.
    #[error("invalid shell: need outer ({outer}) > inner ({inner}) > 0")]
    InvalidShell { inner: f32, outer: f32 },

    /// A `[lower, upper]` range whose bounds are not ordered.
    #[error("{field}: upper bound {upper} must exceed lower bound {lower}")]
    InvalidBounds {
        field: &'static str,
        lower: f32,
        upper: f32,
    },

    /// Neighbor count that cannot be satisfied by the point layout.
    #[error("neighbor count {neighbors} must be less than point count {points}")]
    NeighborCount { neighbors: usize, points: usize },
}

/// Errors reported by scene components at runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Negative or non-finite frame delta, or non-finite elapsed time.
    #[error("invalid frame time: elapsed {elapsed}, delta {delta}")]
    InvalidFrameTime { elapsed: f32, delta: f32 },

    /// Selection addressed to a card that does not exist.
    #[error("memory card {index} does not exist (field has {count} cards)")]
    UnknownCard { index: usize, count: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Checks that `upper > lower`.
pub(crate) fn ensure_ordered(field: &'static str, lower: f32, upper: f32) -> Result<(), ConfigError> {
    if upper > lower {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds {
            field,
            lower,
            upper,
        })
    }
}

/// Checks a sampling range `[lower, upper]` (equal bounds allowed).
pub(crate) fn ensure_range(field: &'static str, lower: f32, upper: f32) -> Result<(), ConfigError> {
    if lower.is_finite() && upper.is_finite() && upper >= lower {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds {
            field,
            lower,
            upper,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("rate", 1.5).is_ok());
        assert_eq!(
            ensure_positive("rate", 0.0),
            Err(ConfigError::NonPositive {
                field: "rate",
                value: 0.0
            })
        );
        assert!(ensure_positive("rate", f32::NAN).is_err());
        assert!(ensure_positive("rate", f32::INFINITY).is_err());
    }

    #[test]
    fn test_config_error_converts_into_scene_error() {
        let err: SceneError = ConfigError::ZeroCount { field: "count" }.into();
        assert_eq!(err.to_string(), "configuration error: count must be greater than zero");
    }
}
