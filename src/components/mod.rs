//! ECS components for picture slots.
//!
//! Submodules overview:
//! - [`picture`] – the picture slot itself plus render-facing helpers
//! - [`pictureanimation`] – per-picture cell animation state machine

pub mod picture;
pub mod pictureanimation;
