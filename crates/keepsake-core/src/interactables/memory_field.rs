//! Memory cards orbiting the scene center.
//!
//! The field, not the individual card, owns the selection, which is what
//! guarantees that at most one card is focused at any time.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::FocusChange;
use crate::animation::Smoothed;
use crate::camera::FocusKind;
use crate::clock::FrameTime;
use crate::error::{ensure_positive, ConfigError, SceneError, SceneResult};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// At its layout slot
    Orbiting,
    /// In the shared reading pose, enlarged
    Focused,
}

/// Memory field settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryFieldConfig {
    pub count: usize,
    /// Radius of the layout sphere
    pub radius: f32,
    /// Reading pose shared by whichever card is focused
    pub focus_position: Vec3,
    pub focus_scale: f32,
    pub hover_scale: f32,
    pub rate: f32,
    pub settle_epsilon: f32,
}

impl Default for MemoryFieldConfig {
    fn default() -> Self {
        Self {
            count: 10,
            radius: 6.0,
            focus_position: Vec3::new(0.0, 0.0, 20.0),
            focus_scale: 2.5,
            hover_scale: 1.1,
            rate: 4.0,
            settle_epsilon: 1e-3,
        }
    }
}

impl MemoryFieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount {
                field: "memories.count",
            });
        }
        ensure_positive("memories.radius", self.radius)?;
        ensure_positive("memories.focus_scale", self.focus_scale)?;
        ensure_positive("memories.hover_scale", self.hover_scale)?;
        ensure_positive("memories.rate", self.rate)?;
        ensure_positive("memories.settle_epsilon", self.settle_epsilon)?;
        Ok(())
    }
}

/// Slots on a Fibonacci sphere, each card facing away from the center.
pub fn fibonacci_layout(count: usize, radius: f32) -> Vec<Transform> {
    let n = count as f32;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + (2.0 * i as f32) / n).acos();
            let theta = (n * std::f32::consts::PI).sqrt() * phi;
            let position = Vec3::new(
                radius * theta.cos() * phi.sin(),
                radius * theta.sin() * phi.sin(),
                radius * phi.cos(),
            );
            Transform::from_translation(position).with_rotation(facing_outward(position))
        })
        .collect()
}

/// Rotation whose +Z axis points from the origin toward `position`.
fn facing_outward(position: Vec3) -> Quat {
    let forward = position.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = Vec3::Y.cross(forward);
    if right.length_squared() < 1e-12 {
        right = Vec3::Z.cross(forward);
    }
    let right = right.normalize();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

struct MemoryCard {
    slot: Transform,
    transform: Smoothed<Transform>,
    hovered: bool,
}

pub struct MemoryField {
    config: MemoryFieldConfig,
    cards: Vec<MemoryCard>,
    selected: Option<usize>,
}

impl MemoryField {
    pub fn new(config: MemoryFieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cards = fibonacci_layout(config.count, config.radius)
            .into_iter()
            .map(|slot| MemoryCard {
                slot,
                transform: Smoothed::new(slot, config.rate, config.settle_epsilon),
                hovered: false,
            })
            .collect();
        Ok(Self {
            config,
            cards,
            selected: None,
        })
    }

    /// Pointer click on card `index`.
    ///
    /// Clicking the focused card deselects it; clicking another card moves
    /// the focus there in the same call.
    pub fn select(&mut self, index: usize) -> SceneResult<Option<FocusChange>> {
        self.check_index(index)?;

        let change = match self.selected {
            Some(current) if current == index => {
                self.selected = None;
                Some(FocusChange::Released(FocusKind::Memory))
            }
            Some(current) => {
                log::debug!("memory focus moves {} -> {}", current, index);
                self.selected = Some(index);
                None
            }
            None => {
                self.selected = Some(index);
                Some(FocusChange::Requested(FocusKind::Memory))
            }
        };
        self.retarget();
        Ok(change)
    }

    /// Return any focused card to its slot.
    pub fn deselect(&mut self) -> Option<FocusChange> {
        self.selected.take().map(|_| {
            self.retarget();
            FocusChange::Released(FocusKind::Memory)
        })
    }

    pub fn set_hovered(&mut self, index: usize, hovered: bool) -> SceneResult<()> {
        self.check_index(index)?;
        self.cards[index].hovered = hovered;
        self.retarget();
        Ok(())
    }

    /// Advance card animations. Returns `true` while any card is moving.
    pub fn update(&mut self, frame: FrameTime) -> bool {
        let mut moving = false;
        for card in &mut self.cards {
            moving |= card.transform.update(frame);
        }
        moving
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn card_state(&self, index: usize) -> Option<CardState> {
        (index < self.cards.len()).then(|| {
            if self.selected == Some(index) {
                CardState::Focused
            } else {
                CardState::Orbiting
            }
        })
    }

    pub fn focused_count(&self) -> usize {
        (0..self.cards.len())
            .filter(|&i| self.card_state(i) == Some(CardState::Focused))
            .count()
    }

    /// `Some(Memory)` while any card is focused.
    pub fn focus_request(&self) -> Option<FocusKind> {
        self.selected.map(|_| FocusKind::Memory)
    }

    pub fn transforms(&self) -> impl Iterator<Item = Transform> + '_ {
        self.cards.iter().map(|card| card.transform.value())
    }

    pub fn transform(&self, index: usize) -> Option<Transform> {
        self.cards.get(index).map(|card| card.transform.value())
    }

    /// Static layout positions (input to the constellation graph).
    pub fn slot_positions(&self) -> Vec<Vec3> {
        self.cards.iter().map(|card| card.slot.translation).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn focus_target(&self) -> Transform {
        Transform::from_translation(self.config.focus_position).with_scale(self.config.focus_scale)
    }

    fn retarget(&mut self) {
        let focus = self.focus_target();
        let hover_scale = self.config.hover_scale;
        for (i, card) in self.cards.iter_mut().enumerate() {
            let target = if self.selected == Some(i) {
                focus
            } else if card.hovered {
                card.slot.with_scale(hover_scale)
            } else {
                card.slot
            };
            card.transform.set_target(target);
        }
    }

    fn check_index(&self, index: usize) -> SceneResult<()> {
        if index < self.cards.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownCard {
                index,
                count: self.cards.len(),
            })
        }
    }
}
