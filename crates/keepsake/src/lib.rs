//! # Keepsake - an interactive 3D greeting scene
//!
//! Composes the camera rig, gift box, memory cards, particle fields and
//! constellation from `keepsake-core` into a [`Scene`] that a renderer drives
//! one frame at a time.

pub mod clock;
pub mod config;
pub mod render;
pub mod scene;
pub mod tour;

pub use config::SceneConfig;
pub use scene::{FocusConflict, FocusEvent, InteractableId, Scene, SceneInput, TickReport};

/// Common imports for hosts
pub mod prelude {
    pub use glam::{Vec2, Vec3};
    pub use keepsake_core::camera::{CameraPose, FocusKind, OrbitInput, ViewMode};
    pub use keepsake_core::clock::FrameTime;

    pub use crate::clock::{Clock, FixedStepClock, WallClock};
    pub use crate::render::{FieldKind, FrameStats, RenderSink};
    pub use crate::scene::{InteractableId, Scene, SceneInput};
}
