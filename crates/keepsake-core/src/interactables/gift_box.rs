//! Gift box: open/close with a confirmation step.
//!
//! ```text
//! Closed --activate--> PendingConfirm --confirm--> Open --activate--> Closed
//!                            |
//!                            +--cancel--> Closed
//! ```
//!
//! The lid and the light inside follow the open/closed target continuously;
//! the discrete state only changes once the previous animation has landed.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::FocusChange;
use crate::animation::Smoothed;
use crate::camera::FocusKind;
use crate::clock::FrameTime;
use crate::error::{ensure_positive, ConfigError};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftBoxState {
    Closed,
    /// Waiting for the user to confirm opening
    PendingConfirm,
    Open,
}

/// Gift box animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftBoxConfig {
    /// World position of the box
    pub position: Vec3,
    /// Lid rotation about X when open (radians, closed is 0)
    pub lid_open_angle: f32,
    pub lid_rate: f32,
    pub light_rate: f32,
    /// Light ball height relative to the box, closed and open
    pub light_closed_height: f32,
    pub light_open_height: f32,
    pub light_closed_scale: f32,
    pub light_open_scale: f32,
    pub light_open_intensity: f32,
    pub settle_epsilon: f32,
    /// Breathing scale amplitude when not hovered
    pub idle_breathing_amplitude: f32,
    /// Breathing scale amplitude when hovered
    pub hover_breathing_amplitude: f32,
    pub breathing_frequency: f32,
    /// Yaw wobble (radians) when hovered
    pub hover_wobble_amplitude: f32,
    pub wobble_frequency: f32,
}

impl Default for GiftBoxConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -0.5, 0.0),
            lid_open_angle: -2.2,
            lid_rate: 3.0,
            light_rate: 2.0,
            light_closed_height: -0.2,
            light_open_height: 1.0,
            light_closed_scale: 0.1,
            light_open_scale: 1.0,
            light_open_intensity: 1.0,
            settle_epsilon: 1e-3,
            idle_breathing_amplitude: 0.01,
            hover_breathing_amplitude: 0.04,
            breathing_frequency: 2.0,
            hover_wobble_amplitude: 0.08,
            wobble_frequency: 6.0,
        }
    }
}

impl GiftBoxConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("gift_box.lid_rate", self.lid_rate)?;
        ensure_positive("gift_box.light_rate", self.light_rate)?;
        ensure_positive("gift_box.settle_epsilon", self.settle_epsilon)?;
        Ok(())
    }
}

/// Everything the renderer needs to draw the box this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiftBoxPose {
    /// Box body including hover jitter
    pub body: Transform,
    /// Lid hinge rotation about X (radians)
    pub lid_angle: f32,
    /// Light ball inside the box
    pub light: Transform,
    pub light_intensity: f32,
}

pub struct GiftBox {
    config: GiftBoxConfig,
    state: GiftBoxState,
    hovered: bool,
    lid_angle: Smoothed<f32>,
    light_height: Smoothed<f32>,
    light_scale: Smoothed<f32>,
    light_intensity: Smoothed<f32>,
}

impl GiftBox {
    pub fn new(config: GiftBoxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let eps = config.settle_epsilon;
        Ok(Self {
            state: GiftBoxState::Closed,
            hovered: false,
            lid_angle: Smoothed::new(0.0, config.lid_rate, eps),
            light_height: Smoothed::new(config.light_closed_height, config.light_rate, eps),
            light_scale: Smoothed::new(config.light_closed_scale, config.light_rate, eps),
            light_intensity: Smoothed::new(0.0, config.light_rate, eps),
            config,
        })
    }

    /// Pointer click on the box.
    ///
    /// Ignored while a confirmation is pending or while the lid is still
    /// moving, so repeated clicks never re-emit a signal.
    pub fn activate(&mut self) -> Option<FocusChange> {
        if self.state == GiftBoxState::PendingConfirm || self.is_animating() {
            log::trace!("gift box activation ignored in {:?}", self.state);
            return None;
        }

        match self.state {
            GiftBoxState::Closed => {
                self.set_state(GiftBoxState::PendingConfirm);
                None
            }
            GiftBoxState::Open => {
                self.set_state(GiftBoxState::Closed);
                self.retarget();
                Some(FocusChange::Released(FocusKind::Gift))
            }
            GiftBoxState::PendingConfirm => None,
        }
    }

    /// Accept the pending open prompt.
    pub fn confirm(&mut self) -> Option<FocusChange> {
        if self.state != GiftBoxState::PendingConfirm {
            log::trace!("gift box confirm ignored in {:?}", self.state);
            return None;
        }
        self.set_state(GiftBoxState::Open);
        self.retarget();
        Some(FocusChange::Requested(FocusKind::Gift))
    }

    /// Reject the pending open prompt. Returns whether anything changed.
    pub fn cancel(&mut self) -> bool {
        if self.state != GiftBoxState::PendingConfirm {
            return false;
        }
        self.set_state(GiftBoxState::Closed);
        true
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Advance the lid and light animation. Returns `true` while moving.
    pub fn update(&mut self, frame: FrameTime) -> bool {
        let lid = self.lid_angle.update(frame);
        let height = self.light_height.update(frame);
        let scale = self.light_scale.update(frame);
        let intensity = self.light_intensity.update(frame);
        lid || height || scale || intensity
    }

    pub fn is_animating(&self) -> bool {
        !(self.lid_angle.is_settled()
            && self.light_height.is_settled()
            && self.light_scale.is_settled()
            && self.light_intensity.is_settled())
    }

    pub fn state(&self) -> GiftBoxState {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// `Some(Gift)` while the box is open.
    pub fn focus_request(&self) -> Option<FocusKind> {
        (self.state == GiftBoxState::Open).then_some(FocusKind::Gift)
    }

    pub fn lid_angle(&self) -> f32 {
        self.lid_angle.value()
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity.value()
    }

    /// Transforms for this frame, including stateless hover feedback.
    pub fn pose(&self, elapsed: f32) -> GiftBoxPose {
        let (jitter_scale, jitter_yaw) = self.hover_jitter(elapsed);
        let body = Transform::from_translation(self.config.position)
            .with_rotation(Quat::from_rotation_y(jitter_yaw))
            .with_scale(jitter_scale);
        let light = Transform::from_translation(self.config.position + Vec3::Y * self.light_height.value())
            .with_scale(self.light_scale.value());

        GiftBoxPose {
            body,
            lid_angle: self.lid_angle.value(),
            light,
            light_intensity: self.light_intensity.value(),
        }
    }

    /// Breathing scale and yaw wobble as a pure function of time and hover.
    fn hover_jitter(&self, elapsed: f32) -> (f32, f32) {
        let c = &self.config;
        let amplitude = if self.hovered {
            c.hover_breathing_amplitude
        } else {
            c.idle_breathing_amplitude
        };
        let scale = 1.0 + (elapsed * c.breathing_frequency).sin() * amplitude;
        let yaw = if self.hovered {
            (elapsed * c.wobble_frequency).sin() * c.hover_wobble_amplitude
        } else {
            0.0
        };
        (scale, yaw)
    }

    fn retarget(&mut self) {
        let c = &self.config;
        if self.state == GiftBoxState::Open {
            self.lid_angle.set_target(c.lid_open_angle);
            self.light_height.set_target(c.light_open_height);
            self.light_scale.set_target(c.light_open_scale);
            self.light_intensity.set_target(c.light_open_intensity);
        } else {
            self.lid_angle.set_target(0.0);
            self.light_height.set_target(c.light_closed_height);
            self.light_scale.set_target(c.light_closed_scale);
            self.light_intensity.set_target(0.0);
        }
    }

    fn set_state(&mut self, state: GiftBoxState) {
        log::debug!("gift box {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
