//! Lua bridge system.
//!
//! Calls the script's `on_frame(frame)` callback, if it defines one, and
//! turns everything the script queued into [`PictureCmd`] messages.

use bevy_ecs::prelude::*;
use log::error;

use crate::events::picture::PictureCmd;
use crate::resources::frameclock::FrameClock;
use crate::resources::gamevariables::GameVariables;
use crate::resources::lua_runtime::LuaRuntime;

/// Run the Lua frame callback and forward queued commands.
pub fn lua_frame(
    lua_runtime: Option<NonSend<LuaRuntime>>,
    clock: Res<FrameClock>,
    variables: Res<GameVariables>,
    mut writer: MessageWriter<PictureCmd>,
) {
    let Some(lua_runtime) = lua_runtime else {
        return;
    };
    if variables.is_changed() {
        lua_runtime.update_variable_cache(&variables);
    }
    if lua_runtime.has_function("on_frame") {
        if let Err(e) = lua_runtime.call_function::<_, ()>("on_frame", clock.frame) {
            error!(target: "lua", "Error in on_frame(): {}", e);
        }
    }
    writer.write_batch(lua_runtime.drain_picture_commands());
}
