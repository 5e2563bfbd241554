//! Smoothing primitives shared by the camera rig and every interactable.
//!
//! Provides `Smoothed<T>` for convergent per-frame interpolation and the
//! `Tweenable` trait implemented for the value types the scene animates.

mod tweens;

pub use tweens::{smooth_toward, Smoothed, SmoothingLaw, Tweenable};
