//! Per-frame systems.
//!
//! Submodules overview
//! - [`audio`] – forward sound cues to the audio thread, advance its queue
//! - [`interpreter`] – run the text script and emit picture commands
//! - [`lua_commands`] – Lua `on_frame` callback and command draining (feature `lua`)
//! - [`pictureanimation`] – apply picture commands and tick animations
//! - [`time`] – advance the frame clock

pub mod audio;
pub mod interpreter;
#[cfg(feature = "lua")]
pub mod lua_commands;
pub mod pictureanimation;
pub mod time;
