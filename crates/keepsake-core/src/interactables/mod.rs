//! Clickable scene objects and their local state machines.
//!
//! Interactables own their state exclusively. The only thing they share with
//! the rest of the scene is the [`FocusChange`] they return from input
//! handlers and the focus kind they report while expanded.

pub mod gift_box;
pub mod memory_field;

pub use gift_box::{GiftBox, GiftBoxConfig, GiftBoxPose, GiftBoxState};
pub use memory_field::{CardState, MemoryField, MemoryFieldConfig};

use crate::camera::FocusKind;

/// Signal emitted when an interactable starts or stops asking for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Requested(FocusKind),
    Released(FocusKind),
}

impl FocusChange {
    pub fn kind(&self) -> FocusKind {
        match self {
            FocusChange::Requested(kind) | FocusChange::Released(kind) => *kind,
        }
    }
}
