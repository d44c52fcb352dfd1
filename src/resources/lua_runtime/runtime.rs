//! Lua runtime core implementation.
//!
//! This module contains the `LuaRuntime` struct which manages the Lua interpreter
//! and provides the `engine` table API to Lua scripts.

use crate::components::pictureanimation::LayoutMode;
use crate::events::picture::PictureCmd;
use crate::resources::gamevariables::GameVariables;
use mlua::prelude::*;
use std::cell::RefCell;

use log::{error, info, warn};

/// Shared state accessible from Lua function closures.
/// This is stored in Lua's app_data and allows Lua functions to queue commands.
pub(super) struct LuaAppData {
    picture_commands: RefCell<Vec<PictureCmd>>,
    /// Game variable values as of the last cache update, id 1 at index 0.
    variable_snapshot: RefCell<Vec<i64>>,
}

/// Resource holding the Lua interpreter state.
///
/// This is a `NonSend` resource because the Lua state is not thread-safe.
pub struct LuaRuntime {
    lua: Lua,
}

/// Registers a Lua function that pushes a command to a queue in `LuaAppData`.
macro_rules! register_cmd {
    ($engine:expr, $lua:expr, $name:expr, $queue:ident,
     |$args:pat_param| $arg_ty:ty, $cmd:expr) => {
        $engine.set(
            $name,
            $lua.create_function(|lua, $args: $arg_ty| {
                lua.app_data_ref::<LuaAppData>()
                    .ok_or_else(|| LuaError::runtime("LuaAppData not found"))?
                    .$queue
                    .borrow_mut()
                    .push($cmd);
                Ok(())
            })?,
        )?;
    };
}

impl LuaRuntime {
    /// Creates a new Lua runtime with the `engine` table registered.
    ///
    /// # Errors
    ///
    /// Returns an error if Lua initialization or API registration fails.
    pub fn new() -> LuaResult<Self> {
        let lua = Lua::new();

        // Let `require` find modules next to the scripts directory.
        lua.load(r#"package.path = "./scripts/?.lua;./scripts/?/init.lua;" .. package.path"#)
            .exec()?;

        lua.set_app_data(LuaAppData {
            picture_commands: RefCell::new(Vec::new()),
            variable_snapshot: RefCell::new(Vec::new()),
        });

        let runtime = Self { lua };
        runtime.register_base_api()?;
        runtime.register_picture_api()?;
        runtime.register_animation_api()?;
        runtime.register_variable_api()?;

        Ok(runtime)
    }

    /// Registers the base `engine` table with logging functions.
    fn register_base_api(&self) -> LuaResult<()> {
        let engine = self.lua.create_table()?;

        // engine.log(message) - General purpose logging
        engine.set(
            "log",
            self.lua.create_function(|_, msg: String| {
                info!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;

        engine.set(
            "log_warn",
            self.lua.create_function(|_, msg: String| {
                warn!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;

        engine.set(
            "log_error",
            self.lua.create_function(|_, msg: String| {
                error!(target: "lua", "{}", msg);
                Ok(())
            })?,
        )?;

        self.lua.globals().set("engine", engine)?;

        Ok(())
    }

    /// Host picture commands: show, erase and variable writes.
    fn register_picture_api(&self) -> LuaResult<()> {
        let engine: LuaTable = self.lua.globals().get("engine")?;
        register_cmd!(engine, self.lua, "show_picture", picture_commands,
            |(picture, name, opacity)| (i64, String, Option<i64>),
            PictureCmd::Show { picture, name, opacity: opacity.unwrap_or(255) });
        register_cmd!(engine, self.lua, "erase_picture", picture_commands,
            |picture| i64, PictureCmd::Erase { picture });
        register_cmd!(engine, self.lua, "set_variable", picture_commands,
            |(variable, value)| (i64, i64), PictureCmd::SetVariable { variable, value });
        Ok(())
    }

    /// Cell animation commands, mirroring the `PA_*` script commands.
    fn register_animation_api(&self) -> LuaResult<()> {
        let engine: LuaTable = self.lua.globals().get("engine")?;

        // engine.pa_init(cells, frames, [layout], [fade])
        engine.set(
            "pa_init",
            self.lua.create_function(
                |lua, (cells, frames, layout, fade): (i64, i64, Option<String>, Option<i64>)| {
                    let layout = match layout {
                        Some(name) => name.parse::<LayoutMode>().unwrap_or_else(|bad| {
                            warn!(target: "lua", "unknown cell layout '{}', using Vertical", bad);
                            LayoutMode::Vertical
                        }),
                        None => LayoutMode::Vertical,
                    };
                    lua.app_data_ref::<LuaAppData>()
                        .ok_or_else(|| LuaError::runtime("LuaAppData not found"))?
                        .picture_commands
                        .borrow_mut()
                        .push(PictureCmd::AnimInit {
                            cells,
                            frames,
                            layout,
                            fade: fade.unwrap_or(0),
                        });
                    Ok(())
                },
            )?,
        )?;

        register_cmd!(engine, self.lua, "pa_sound", picture_commands,
            |(cell, sound)| (i64, String), PictureCmd::AnimSound { cell, sound });
        register_cmd!(engine, self.lua, "pa_start", picture_commands,
            |(picture, kind, custom)| (i64, i64, Option<Vec<i64>>),
            PictureCmd::AnimStart { picture, kind, custom: custom.unwrap_or_default(), looped: false });
        register_cmd!(engine, self.lua, "pa_start_loop", picture_commands,
            |(picture, kind, custom)| (i64, i64, Option<Vec<i64>>),
            PictureCmd::AnimStart { picture, kind, custom: custom.unwrap_or_default(), looped: true });
        register_cmd!(engine, self.lua, "pa_stop", picture_commands,
            |picture| i64, PictureCmd::AnimStop { picture, force: false });
        register_cmd!(engine, self.lua, "pa_stop_force", picture_commands,
            |picture| i64, PictureCmd::AnimStop { picture, force: true });
        register_cmd!(engine, self.lua, "pa_set_cell", picture_commands,
            |(picture, cell)| (i64, i64), PictureCmd::AnimSetCell { picture, cell, wait: false });
        register_cmd!(engine, self.lua, "pa_prog_cell", picture_commands,
            |picture| i64, PictureCmd::AnimProgress { picture, wait: false });
        register_cmd!(engine, self.lua, "pa_set_variable", picture_commands,
            |(picture, variable)| (i64, i64), PictureCmd::AnimLinkVariable { picture, variable });
        Ok(())
    }

    /// Read access to game variables from the cached snapshot.
    fn register_variable_api(&self) -> LuaResult<()> {
        let engine: LuaTable = self.lua.globals().get("engine")?;

        // engine.get_variable(id) -> integer, 0 when undeclared
        engine.set(
            "get_variable",
            self.lua.create_function(|lua, id: i64| {
                let value = lua.app_data_ref::<LuaAppData>().and_then(|data| {
                    let index = usize::try_from(id).ok()?.checked_sub(1)?;
                    data.variable_snapshot.borrow().get(index).copied()
                });
                Ok(value.unwrap_or(0))
            })?,
        )?;
        Ok(())
    }

    /// Drains all queued picture commands.
    pub fn drain_picture_commands(&self) -> Vec<PictureCmd> {
        self.lua
            .app_data_ref::<LuaAppData>()
            .map(|data| data.picture_commands.borrow_mut().drain(..).collect())
            .unwrap_or_default()
    }

    /// Refresh the variable values `engine.get_variable` reads.
    pub fn update_variable_cache(&self, variables: &GameVariables) {
        if let Some(data) = self.lua.app_data_ref::<LuaAppData>() {
            let mut snapshot = data.variable_snapshot.borrow_mut();
            snapshot.clear();
            snapshot.extend_from_slice(variables.values());
        }
    }

    /// Loads and executes a Lua script from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the script has syntax/runtime errors.
    pub fn run_script(&self, path: &str) -> LuaResult<()> {
        let script = std::fs::read_to_string(path)
            .map_err(|e| LuaError::ExternalError(std::sync::Arc::new(e)))?;
        self.lua.load(&script).set_name(path).exec()
    }

    /// Executes a chunk of Lua source.
    pub fn run_source(&self, name: &str, source: &str) -> LuaResult<()> {
        self.lua.load(source).set_name(name).exec()
    }

    /// Calls a global Lua function by name with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the function doesn't exist or execution fails.
    pub fn call_function<A, R>(&self, name: &str, args: A) -> LuaResult<R>
    where
        A: IntoLuaMulti,
        R: FromLuaMulti,
    {
        let func: LuaFunction = self.lua.globals().get(name)?;
        func.call(args)
    }

    /// Checks if a global function exists.
    pub fn has_function(&self, name: &str) -> bool {
        self.lua.globals().get::<LuaFunction>(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_are_queued_in_order() {
        let runtime = LuaRuntime::new().unwrap();
        runtime
            .run_source(
                "setup",
                r#"
                engine.pa_init(4, 10, "Horizontal", 20)
                engine.pa_sound(3, "Bell1")
                engine.show_picture(1, "torch0")
                engine.pa_start_loop(1, 3, {1, 2, 1, 3})
                "#,
            )
            .unwrap();
        let cmds = runtime.drain_picture_commands();
        assert_eq!(
            cmds,
            vec![
                PictureCmd::AnimInit {
                    cells: 4,
                    frames: 10,
                    layout: LayoutMode::Horizontal,
                    fade: 20
                },
                PictureCmd::AnimSound {
                    cell: 3,
                    sound: "Bell1".to_string()
                },
                PictureCmd::Show {
                    picture: 1,
                    name: "torch0".to_string(),
                    opacity: 255
                },
                PictureCmd::AnimStart {
                    picture: 1,
                    kind: 3,
                    custom: vec![1, 2, 1, 3],
                    looped: true
                },
            ]
        );
        assert!(runtime.drain_picture_commands().is_empty());
    }

    #[test]
    fn test_unknown_layout_falls_back_to_vertical() {
        let runtime = LuaRuntime::new().unwrap();
        runtime
            .run_source(
                "bad",
                r#"
                engine.pa_init(4, 1, "Vert")
                engine.show_picture(1, "lamp")
                "#,
            )
            .unwrap();
        assert_eq!(
            runtime.drain_picture_commands(),
            vec![
                PictureCmd::AnimInit {
                    cells: 4,
                    frames: 1,
                    layout: LayoutMode::Vertical,
                    fade: 0
                },
                PictureCmd::Show {
                    picture: 1,
                    name: "lamp".to_string(),
                    opacity: 255
                },
            ]
        );
    }

    #[test]
    fn test_get_variable_reads_cache() {
        let runtime = LuaRuntime::new().unwrap();
        let mut vars = GameVariables::new(3);
        vars.set(2, 17);
        runtime.update_variable_cache(&vars);
        runtime
            .run_source(
                "read",
                "function read_vars() return engine.get_variable(2), engine.get_variable(9) end",
            )
            .unwrap();
        let (a, b): (i64, i64) = runtime.call_function("read_vars", ()).unwrap();
        assert_eq!((a, b), (17, 0));
    }

    #[test]
    fn test_has_function() {
        let runtime = LuaRuntime::new().unwrap();
        assert!(!runtime.has_function("on_frame"));
        runtime.run_source("cb", "function on_frame(n) end").unwrap();
        assert!(runtime.has_function("on_frame"));
    }
}
