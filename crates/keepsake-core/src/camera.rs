//! Camera rig: the top-level view-mode coordinator.
//!
//! The rig owns the only mutable [`CameraPose`]. Each tick it is told whether
//! the session has started and which focus request (if any) is active, and
//! smooths the pose toward the target that the current [`ViewMode`] implies.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{smooth_toward, SmoothingLaw, Tweenable};
use crate::clock::FrameTime;
use crate::error::{ensure_ordered, ensure_positive, ConfigError};

/// Keeps orbiting away from the poles where yaw degenerates.
const MAX_ORBIT_PITCH: f32 = FRAC_PI_2 - 0.05;

/// Camera position plus the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    pub const fn looking_at_origin(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// Distance between the two camera positions (look-at is ignored).
    pub fn distance_to(&self, other: &CameraPose) -> f32 {
        self.position.distance(other.position)
    }
}

impl Tweenable for CameraPose {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        CameraPose {
            position: a.position.lerp(b.position, t),
            look_at: a.look_at.lerp(b.look_at, t),
        }
    }

    fn distance(a: Self, b: Self) -> f32 {
        a.distance_to(&b)
    }
}

/// Which interactable asked for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusKind {
    Gift,
    Memory,
}

/// A single focus request consumed by [`CameraRig::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRequest {
    pub kind: FocusKind,
    /// Overrides the per-kind fixed pose when present.
    pub source_pose: Option<CameraPose>,
}

impl FocusRequest {
    pub fn new(kind: FocusKind) -> Self {
        Self {
            kind,
            source_pose: None,
        }
    }

    pub fn with_source_pose(mut self, pose: CameraPose) -> Self {
        self.source_pose = Some(pose);
        self
    }
}

/// Discrete camera behavior selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Before the session starts: slow sway in front of the scene.
    Waiting,
    /// One-shot fly-in toward the default pose.
    Entering,
    /// Free orbit.
    Default,
    Focused(FocusKind),
}

/// User orbit input for one frame, applied only in [`ViewMode::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitInput {
    /// Radians around the look-at point's vertical axis.
    pub yaw: f32,
    /// Radians of elevation.
    pub pitch: f32,
    /// Change in distance from the look-at point (positive moves away).
    pub distance_delta: f32,
}

/// Camera rig settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRigConfig {
    /// Pose held (plus sway) until the session starts
    pub waiting_pose: CameraPose,
    /// Lateral sway amplitude while waiting
    pub sway_amplitude: f32,
    /// Lateral sway angular frequency (rad/s)
    pub sway_frequency: f32,
    /// Fly-in destination and initial orbit pose
    pub default_pose: CameraPose,
    pub gift_pose: CameraPose,
    pub memory_pose: CameraPose,
    pub smoothing_rate: f32,
    pub smoothing_law: SmoothingLaw,
    /// Fly-in counts as finished below this distance
    pub arrive_epsilon: f32,
    /// Return-from-focus counts as finished below this distance
    pub return_epsilon: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            waiting_pose: CameraPose::looking_at_origin(Vec3::new(0.0, 5.0, 50.0)),
            sway_amplitude: 5.0,
            sway_frequency: 0.2,
            default_pose: CameraPose::looking_at_origin(Vec3::new(0.0, 0.0, 15.0)),
            gift_pose: CameraPose::looking_at_origin(Vec3::new(0.0, 4.0, 8.0)),
            memory_pose: CameraPose::looking_at_origin(Vec3::new(0.0, 0.0, 25.0)),
            smoothing_rate: 1.5,
            smoothing_law: SmoothingLaw::ClampedLinear,
            arrive_epsilon: 1.0,
            return_epsilon: 0.5,
            min_distance: 5.0,
            max_distance: 35.0,
        }
    }
}

impl CameraRigConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("camera.smoothing_rate", self.smoothing_rate)?;
        ensure_positive("camera.arrive_epsilon", self.arrive_epsilon)?;
        ensure_positive("camera.return_epsilon", self.return_epsilon)?;
        ensure_positive("camera.min_distance", self.min_distance)?;
        ensure_ordered("camera orbit distance", self.min_distance, self.max_distance)?;
        Ok(())
    }
}

/// View-state controller driving the camera pose.
pub struct CameraRig {
    config: CameraRigConfig,
    mode: ViewMode,
    pose: CameraPose,
    /// Pose to return to after focus; only capture and consume touch it.
    saved_pose: Option<CameraPose>,
    /// Free-orbit target used in `Default`
    orbit_pose: CameraPose,
    started: bool,
    fly_in_complete: bool,
    /// Whether the previous tick had an active focus request
    focus_active: bool,
}

impl CameraRig {
    pub fn new(config: CameraRigConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: ViewMode::Waiting,
            pose: config.waiting_pose,
            saved_pose: None,
            orbit_pose: config.default_pose,
            started: false,
            fly_in_complete: false,
            focus_active: false,
            config,
        })
    }

    /// Advance one tick and return the new pose.
    ///
    /// `started` latches: once it has been seen `true`, later `false` values
    /// are ignored.
    pub fn update(&mut self, frame: FrameTime, started: bool, active_focus: Option<FocusRequest>) -> CameraPose {
        if started && !self.started {
            self.started = true;
            self.set_mode(ViewMode::Entering);
        }

        if !self.started {
            self.pose = self.waiting_pose_at(frame.elapsed());
            return self.pose;
        }

        match active_focus {
            Some(request) => self.hold_focus(request, frame),
            None => self.release_focus(frame),
        }
        self.pose
    }

    /// Rotate/dolly the free-orbit pose. Returns `false` when the input was
    /// ignored because the camera is not in free orbit.
    pub fn orbit(&mut self, input: OrbitInput) -> bool {
        if self.mode != ViewMode::Default || self.saved_pose.is_some() {
            log::trace!("orbit input ignored in {:?}", self.mode);
            return false;
        }

        let center = self.orbit_pose.look_at;
        let offset = self.orbit_pose.position - center;
        let radius = offset.length().max(f32::EPSILON);
        let yaw = offset.x.atan2(offset.z) + input.yaw;
        let pitch = ((offset.y / radius).clamp(-1.0, 1.0).asin() + input.pitch)
            .clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);
        let distance = (radius + input.distance_delta).clamp(self.config.min_distance, self.config.max_distance);

        let direction = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        self.orbit_pose.position = center + direction * distance;
        true
    }

    fn hold_focus(&mut self, request: FocusRequest, frame: FrameTime) {
        if !self.focus_active {
            self.focus_active = true;
            // Capture once per entry; a return still in flight keeps its pose.
            if self.fly_in_complete && self.saved_pose.is_none() {
                self.saved_pose = Some(self.pose);
                log::debug!("captured return pose {:?}", self.pose.position);
            }
        }

        self.set_mode(ViewMode::Focused(request.kind));
        let target = request
            .source_pose
            .unwrap_or_else(|| self.focus_pose(request.kind));
        self.step_toward(target, frame);
    }

    fn release_focus(&mut self, frame: FrameTime) {
        if self.focus_active {
            self.focus_active = false;
            log::debug!("focus released in {:?}", self.mode);
        }

        if let Some(saved) = self.saved_pose {
            self.step_toward(saved, frame);
            if self.pose.distance_to(&saved) < self.config.return_epsilon {
                self.saved_pose = None;
                self.orbit_pose = saved;
                self.set_mode(ViewMode::Default);
            }
            return;
        }

        if !self.fly_in_complete {
            let target = self.config.default_pose;
            self.set_mode(ViewMode::Entering);
            self.step_toward(target, frame);
            if self.pose.distance_to(&target) < self.config.arrive_epsilon {
                self.fly_in_complete = true;
                self.set_mode(ViewMode::Default);
            }
            return;
        }

        self.set_mode(ViewMode::Default);
        self.step_toward(self.orbit_pose, frame);
    }

    fn step_toward(&mut self, target: CameraPose, frame: FrameTime) {
        self.pose = smooth_toward(
            self.pose,
            target,
            self.config.smoothing_rate,
            frame,
            self.config.smoothing_law,
        );
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            log::debug!("view mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn waiting_pose_at(&self, elapsed: f32) -> CameraPose {
        let mut pose = self.config.waiting_pose;
        pose.position.x += (elapsed * self.config.sway_frequency).sin() * self.config.sway_amplitude;
        pose
    }

    pub fn focus_pose(&self, kind: FocusKind) -> CameraPose {
        match kind {
            FocusKind::Gift => self.config.gift_pose,
            FocusKind::Memory => self.config.memory_pose,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn saved_pose(&self) -> Option<CameraPose> {
        self.saved_pose
    }

    pub fn orbit_pose(&self) -> CameraPose {
        self.orbit_pose
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_fly_in_complete(&self) -> bool {
        self.fly_in_complete
    }

    /// Focus has ended but the camera is still heading back to the saved pose.
    pub fn is_returning(&self) -> bool {
        !self.focus_active && self.saved_pose.is_some()
    }

    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }
}
