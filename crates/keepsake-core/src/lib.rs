//! Scene animation and state coordination for the Keepsake scene.
//!
//! Everything here is driven by a caller-supplied [`clock::FrameTime`]: the
//! camera rig, the interactables and the particle fields never read the wall
//! clock and never touch a renderer.

pub mod animation;
pub mod camera;
pub mod clock;
pub mod constellation;
pub mod error;
pub mod interactables;
pub mod particles;
pub mod transform;

pub use camera::{CameraPose, CameraRig, CameraRigConfig, FocusKind, FocusRequest, OrbitInput, ViewMode};
pub use clock::FrameTime;
pub use constellation::{Edge, NeighborGraph};
pub use error::{ConfigError, SceneError, SceneResult};
pub use interactables::FocusChange;
pub use transform::Transform;
