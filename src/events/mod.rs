//! Message types exchanged between systems.
//!
//! Submodules:
//! - [`audio`] – fire-and-forget sound commands for the audio backend
//! - [`picture`] – picture and animation commands issued by scripts
pub mod audio;
pub mod picture;
