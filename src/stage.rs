//! Headless picture stage.
//!
//! [`Stage`] owns a bevy [`World`] with the picture slots, game variables and
//! message queues, plus the per-frame [`Schedule`]. One call to
//! [`Stage::step`] is one host frame:
//!
//! 1. the text script runs ([`run_interpreter`])
//! 2. the Lua `on_frame` callback runs (feature `lua`)
//! 3. queued commands are applied ([`apply_picture_cmds`])
//! 4. every shown picture ticks ([`picture_animation`])
//! 5. sound cues go to the audio bridge ([`forward_audio_cmds`])
//! 6. message queues advance and the frame clock counts the frame
//!
//! Render queries made between two steps therefore always see the state
//! after the tick.

use bevy_ecs::prelude::*;

use crate::components::picture::{Picture, PictureFrame, PictureId};
use crate::components::pictureanimation::PictureAnimation;
use crate::events::audio::AudioCmd;
use crate::events::picture::PictureCmd;
use crate::resources::animationconfig::AnimationConfig;
use crate::resources::frameclock::FrameClock;
use crate::resources::gamevariables::GameVariables;
use crate::resources::interpreter::ScriptInterpreter;
use crate::resources::picturescreen::{PictureScreen, setup_picture_screen};
use crate::systems::audio::{forward_audio_cmds, update_bevy_audio_cmds};
use crate::systems::interpreter::run_interpreter;
use crate::systems::pictureanimation::{
    apply_picture_cmds, picture_animation, update_picture_cmds,
};
use crate::systems::time::advance_frame_clock;

#[cfg(feature = "lua")]
use crate::resources::lua_runtime::LuaRuntime;
#[cfg(feature = "lua")]
use crate::systems::lua_commands::lua_frame;

pub struct Stage {
    world: World,
    schedule: Schedule,
}

impl Stage {
    pub fn new(config: &AnimationConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(config.clone());
        setup_picture_screen(&mut world, config.max_pictures);
        world.insert_resource(GameVariables::new(config.variable_count));
        world.init_resource::<FrameClock>();
        world.init_resource::<Messages<PictureCmd>>();
        world.init_resource::<Messages<AudioCmd>>();

        let mut schedule = Schedule::default();
        #[cfg(feature = "lua")]
        schedule.add_systems(
            (
                run_interpreter,
                lua_frame,
                apply_picture_cmds,
                picture_animation,
                forward_audio_cmds,
                update_picture_cmds,
                update_bevy_audio_cmds,
                advance_frame_clock,
            )
                .chain(),
        );
        #[cfg(not(feature = "lua"))]
        schedule.add_systems(
            (
                run_interpreter,
                apply_picture_cmds,
                picture_animation,
                forward_audio_cmds,
                update_picture_cmds,
                update_bevy_audio_cmds,
                advance_frame_clock,
            )
                .chain(),
        );

        Self { world, schedule }
    }

    /// Replace the running text script.
    pub fn load_script(&mut self, source: &str) {
        self.world
            .insert_resource(ScriptInterpreter::from_source(source));
    }

    pub fn load_script_file(&mut self, path: &str) -> Result<(), String> {
        let interpreter = ScriptInterpreter::load_file(path)?;
        self.world.insert_resource(interpreter);
        Ok(())
    }

    /// Create the Lua runtime and run the script at `path` once.
    ///
    /// Commands issued by the script body are applied on the next step.
    #[cfg(feature = "lua")]
    pub fn load_lua(&mut self, path: &str) -> mlua::Result<()> {
        let runtime = LuaRuntime::new()?;
        runtime.run_script(path)?;
        self.world.insert_non_send_resource(runtime);
        Ok(())
    }

    /// Queue a command for the next step.
    pub fn send(&mut self, cmd: PictureCmd) {
        self.world.write_message(cmd);
    }

    /// Run one host frame.
    pub fn step(&mut self) {
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.world.resource::<FrameClock>().frame
    }

    /// True once the text script has run out of lines (or none is loaded).
    pub fn is_script_finished(&self) -> bool {
        self.world
            .get_resource::<ScriptInterpreter>()
            .is_none_or(ScriptInterpreter::is_finished)
    }

    pub fn variables(&self) -> &GameVariables {
        self.world.resource::<GameVariables>()
    }

    pub fn variables_mut(&mut self) -> Mut<'_, GameVariables> {
        self.world.resource_mut::<GameVariables>()
    }

    pub fn picture(&self, id: PictureId) -> Option<&Picture> {
        let entity = self.world.resource::<PictureScreen>().entity(id)?;
        self.world.get::<Picture>(entity)
    }

    pub fn animation(&self, id: PictureId) -> Option<&PictureAnimation> {
        let entity = self.world.resource::<PictureScreen>().entity(id)?;
        self.world.get::<PictureAnimation>(entity)
    }

    /// Drawable state of every shown picture, by picture id.
    pub fn frames(&mut self) -> Vec<PictureFrame> {
        let mut query = self.world.query::<(&Picture, &PictureAnimation)>();
        let mut frames: Vec<PictureFrame> = query
            .iter(&self.world)
            .filter_map(|(picture, anim)| PictureFrame::capture(picture, anim))
            .collect();
        frames.sort_by_key(|frame| frame.picture);
        frames
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
