//! Script interpreter system.
//!
//! Runs the loaded [`ScriptInterpreter`] for one frame and writes the
//! resulting [`PictureCmd`] messages, which
//! [`apply_picture_cmds`](crate::systems::pictureanimation::apply_picture_cmds)
//! applies later in the same frame.

use bevy_ecs::prelude::*;

use crate::components::pictureanimation::PictureAnimation;
use crate::events::picture::PictureCmd;
use crate::resources::interpreter::{FadeSource, ScriptInterpreter};
use crate::resources::picturescreen::PictureScreen;

/// Fade lookups for the interpreter, by clamped picture id.
struct PictureFades<'a, 'w, 's, 'q> {
    screen: &'a PictureScreen,
    pictures: &'a Query<'w, 's, &'q PictureAnimation>,
}

impl PictureFades<'_, '_, '_, '_> {
    fn animation(&self, picture: i64) -> Option<&PictureAnimation> {
        let max = self.screen.max_pictures().max(1) as i64;
        self.screen
            .entity(picture.clamp(1, max) as usize)
            .and_then(|entity| self.pictures.get(entity).ok())
    }
}

impl FadeSource for PictureFades<'_, '_, '_, '_> {
    fn fade_duration(&self, picture: i64) -> u32 {
        self.animation(picture)
            .map_or(0, PictureAnimation::fade_duration)
    }

    fn is_fading(&self, picture: i64) -> bool {
        self.animation(picture)
            .is_some_and(PictureAnimation::is_fading)
    }
}

/// Execute the next batch of script lines.
pub fn run_interpreter(
    interpreter: Option<ResMut<ScriptInterpreter>>,
    screen: Res<PictureScreen>,
    pictures: Query<&PictureAnimation>,
    mut writer: MessageWriter<PictureCmd>,
) {
    let Some(mut interpreter) = interpreter else {
        return;
    };
    if interpreter.is_finished() {
        return;
    }
    let fades = PictureFades {
        screen: &screen,
        pictures: &pictures,
    };
    let batch = interpreter.step(&fades);
    writer.write_batch(batch);
}
