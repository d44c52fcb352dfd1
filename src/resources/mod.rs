//! ECS resources made available to systems.
//!
//! Overview
//! - `animationconfig` – INI-backed screen and playback settings
//! - `audio` – bridge and channel to the audio backend thread
//! - `frameclock` – number of frames run so far
//! - `gamevariables` – integer game variables pictures can link to
//! - `interpreter` – the running text script
//! - `lua_runtime` – Lua scripting front end (feature `lua`)
//! - `picturescreen` – picture id to slot entity table and staged setup
pub mod animationconfig;
pub mod audio;
pub mod frameclock;
pub mod gamevariables;
pub mod interpreter;
#[cfg(feature = "lua")]
pub mod lua_runtime;
pub mod picturescreen;
