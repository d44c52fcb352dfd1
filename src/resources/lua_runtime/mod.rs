//! Lua scripting front end.
//!
//! Scripts drive pictures through the global `engine` table. Every call
//! queues a [`PictureCmd`](crate::events::picture::PictureCmd); the
//! [`lua_frame`](crate::systems::lua_commands::lua_frame) system drains the
//! queue into messages once per frame, after calling the optional global
//! `on_frame(frame)` function.
//!
//! # Example
//!
//! ```lua
//! engine.pa_init(4, 10, "Horizontal", 20)
//! engine.pa_sound(3, "Bell1")
//! engine.show_picture(1, "torch0")
//! engine.pa_start_loop(1, 2)
//!
//! function on_frame(frame)
//!     if frame == 300 then
//!         engine.pa_stop(1)
//!     end
//!     if engine.get_variable(1) > 0 then
//!         engine.pa_set_variable(2, 1)
//!     end
//! end
//! ```

mod runtime;

pub use runtime::LuaRuntime;
