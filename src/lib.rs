//! pictureanim library.
//!
//! Cell animation for displayed pictures: a picture shows one sub-image
//! ("cell") of a sprite sheet or of a numbered file series at a time, steps
//! through the cells on a frame timer, cross-fades between them and can be
//! driven by a game variable instead of the timer.
//!
//! The crate is organised as an ECS: picture slots are entities, commands and
//! sound cues are messages, and [`stage::Stage`] wires the systems into a
//! per-frame schedule.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod script;
pub mod stage;
pub mod systems;
