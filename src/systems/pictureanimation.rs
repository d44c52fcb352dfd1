//! Picture animation systems.
//!
//! - [`apply_picture_cmds`] applies the frame's [`PictureCmd`] messages to
//!   the picture slots, the staged setup and the game variables.
//! - [`picture_animation`] ticks every shown picture once and turns sound cues
//!   into [`AudioCmd::PlayFx`] messages.
//! - [`update_picture_cmds`] advances the command message queue.
//!
//! Commands are applied strictly before the tick of the same frame, so a
//! picture shown and started by one batch of commands animates on that
//! frame already.
//!
//! # Related
//!
//! - [`crate::components::pictureanimation::PictureAnimation`] – the state machine being driven
//! - [`crate::resources::picturescreen::PictureScreen`] – picture id lookup and staged setup

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::picture::Picture;
use crate::components::pictureanimation::{
    MAX_CELLS, MAX_FADE_DURATION, MAX_FRAME_INTERVAL, PictureAnimation, SequenceMode,
};
use crate::error::{AnimationWarning, clamp_reported};
use crate::events::audio::AudioCmd;
use crate::events::picture::PictureCmd;
use crate::resources::gamevariables::{GameVariables, VariableSource};
use crate::resources::picturescreen::{PictureScreen, StagedAnimation};

/// Apply queued picture commands in the order they were written.
///
/// Every command degrades instead of failing: bad numbers are clamped,
/// commands for pictures that are not shown are dropped, and each case is
/// logged with `warn!`.
pub fn apply_picture_cmds(
    mut reader: MessageReader<PictureCmd>,
    mut screen: ResMut<PictureScreen>,
    mut variables: ResMut<GameVariables>,
    mut pictures: Query<(&mut Picture, &mut PictureAnimation)>,
    mut audio_writer: MessageWriter<AudioCmd>,
) {
    for cmd in reader.read() {
        let warnings = apply_picture_cmd(
            cmd,
            &mut screen,
            &mut variables,
            &mut pictures,
            &mut audio_writer,
        );
        for warning in warnings {
            warn!("{:?}: {}", cmd, warning);
        }
    }
}

fn apply_picture_cmd(
    cmd: &PictureCmd,
    screen: &mut PictureScreen,
    variables: &mut GameVariables,
    pictures: &mut Query<(&mut Picture, &mut PictureAnimation)>,
    audio_writer: &mut MessageWriter<AudioCmd>,
) -> Vec<AnimationWarning> {
    let mut warnings = Vec::new();

    // Commands that do not address a picture slot.
    match cmd {
        PictureCmd::SetVariable { variable, value } => {
            let declared = usize::try_from(*variable)
                .ok()
                .filter(|id| variables.set(*id, *value));
            if declared.is_none() {
                warnings.push(AnimationWarning::UnknownVariable {
                    variable: *variable,
                });
            }
            return warnings;
        }
        PictureCmd::AnimInit {
            cells,
            frames,
            layout,
            fade,
        } => {
            let setup = StagedAnimation {
                cell_count: clamp_reported("cells", *cells, 1, MAX_CELLS as i64, &mut warnings),
                frame_interval: clamp_reported(
                    "frames",
                    *frames,
                    1,
                    MAX_FRAME_INTERVAL as i64,
                    &mut warnings,
                ),
                layout: *layout,
                fade_duration: clamp_reported(
                    "fade",
                    *fade,
                    0,
                    MAX_FADE_DURATION as i64,
                    &mut warnings,
                ),
            };
            debug!("staged animation setup {:?}", setup);
            screen.stage(setup);
            return warnings;
        }
        PictureCmd::AnimSound { cell, sound } => {
            let cell = clamp_reported("cell", *cell, 1, MAX_CELLS as i64, &mut warnings);
            screen.stage_sound(cell as usize - 1, sound.clone());
            audio_writer.write(AudioCmd::LoadFx { id: sound.clone() });
            return warnings;
        }
        _ => {}
    }

    let Some(requested) = cmd.picture() else {
        return warnings;
    };
    let max = screen.max_pictures().max(1) as i64;
    let id = clamp_reported("picture", requested, 1, max, &mut warnings);
    let Some((mut picture, mut anim)) = screen
        .entity(id as usize)
        .and_then(|entity| pictures.get_mut(entity).ok())
    else {
        warnings.push(AnimationWarning::MissingTarget { picture: id });
        return warnings;
    };
    if !picture.is_shown() && !matches!(cmd, PictureCmd::Show { .. }) {
        warnings.push(AnimationWarning::MissingTarget { picture: id });
        return warnings;
    }

    match cmd {
        PictureCmd::Show { name, opacity, .. } => {
            let opacity = clamp_reported("opacity", *opacity, 0, 255, &mut warnings) as u8;
            picture.show(name.clone(), opacity);
            anim.initialize();
            if let Some((setup, sounds)) = screen.take_staged() {
                warnings.extend(anim.configure(
                    setup.cell_count,
                    setup.frame_interval,
                    setup.layout,
                    setup.fade_duration,
                    sounds,
                ));
                debug!("picture {} animates {} cells", id, anim.cell_count());
            }
        }
        PictureCmd::Erase { .. } => {
            picture.erase();
            anim.initialize();
        }
        PictureCmd::AnimStart {
            kind,
            custom,
            looped,
            ..
        } => {
            let kind = clamp_reported("kind", *kind, 1, 3, &mut warnings);
            let custom = custom
                .iter()
                .map(|&c| clamp_reported("custom cell", c, 1, MAX_CELLS as i64, &mut warnings) as usize)
                .collect();
            if let Some(warning) = anim.start(SequenceMode::from_kind(kind, custom), *looped) {
                warnings.push(warning);
            }
        }
        PictureCmd::AnimStop { force, .. } => anim.stop(*force),
        PictureCmd::AnimSetCell { cell, .. } => {
            let cell = clamp_reported("cell", *cell, 1, MAX_CELLS as i64, &mut warnings);
            anim.set_cell_direct(cell as usize - 1);
        }
        PictureCmd::AnimProgress { .. } => anim.advance_one_step(),
        PictureCmd::AnimLinkVariable { variable, .. } => {
            let declared = variables.declared().max(1) as i64;
            let variable = clamp_reported("variable", *variable, 1, declared, &mut warnings) as usize;
            anim.link_variable(variable, variables.value(variable));
        }
        PictureCmd::SetVariable { .. } | PictureCmd::AnimInit { .. } | PictureCmd::AnimSound { .. } => {}
    }
    warnings
}

/// Advance every shown picture's animation by one frame.
pub fn picture_animation(
    mut query: Query<(&Picture, &mut PictureAnimation)>,
    variables: Res<GameVariables>,
    mut audio_writer: MessageWriter<AudioCmd>,
) {
    for (picture, mut anim) in query.iter_mut() {
        if !picture.is_shown() {
            continue;
        }
        let outcome = anim.tick(&*variables);
        if let Some(id) = outcome.sound {
            audio_writer.write(AudioCmd::PlayFx { id });
        }
        if outcome.finished {
            debug!("picture {} finished its animation", picture.id);
        }
    }
}

/// Advance the ECS message queue for PictureCmd.
pub fn update_picture_cmds(mut msgs: ResMut<Messages<PictureCmd>>) {
    msgs.update();
}
