//! Picture and animation commands.
//!
//! [`PictureCmd`] is the command surface of the screen. Scripts (the text
//! interpreter or Lua) write these messages; the
//! [`apply_picture_cmds`](crate::systems::pictureanimation::apply_picture_cmds)
//! system applies them before the animations tick. Numeric arguments are
//! carried exactly as written and clamped when applied.

use bevy_ecs::message::Message;
use serde::{Deserialize, Serialize};

use crate::components::pictureanimation::LayoutMode;

#[derive(Message, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureCmd {
    /// Show an image in a picture slot.
    Show {
        picture: i64,
        name: String,
        opacity: i64,
    },
    /// Empty a picture slot.
    Erase { picture: i64 },
    /// Write a game variable.
    SetVariable { variable: i64, value: i64 },
    /// Stage the animation setup for the next picture shown.
    AnimInit {
        cells: i64,
        frames: i64,
        layout: LayoutMode,
        fade: i64,
    },
    /// Stage a sound for a 1-based cell of the next animated picture.
    AnimSound { cell: i64, sound: String },
    /// Start animating. `kind` is 1 forward, 2 ping-pong, 3 custom.
    AnimStart {
        picture: i64,
        kind: i64,
        custom: Vec<i64>,
        looped: bool,
    },
    AnimStop { picture: i64, force: bool },
    /// Show a 1-based cell directly.
    AnimSetCell { picture: i64, cell: i64, wait: bool },
    /// Advance one cell.
    AnimProgress { picture: i64, wait: bool },
    /// Let a game variable drive the cell.
    AnimLinkVariable { picture: i64, variable: i64 },
}

impl PictureCmd {
    /// True for commands that ask the issuing script to wait out the fade.
    pub fn waits_for_fade(&self) -> bool {
        matches!(
            self,
            PictureCmd::AnimSetCell { wait: true, .. } | PictureCmd::AnimProgress { wait: true, .. }
        )
    }

    /// Picture slot targeted by the command, if any.
    pub fn picture(&self) -> Option<i64> {
        match self {
            PictureCmd::Show { picture, .. }
            | PictureCmd::Erase { picture }
            | PictureCmd::AnimStart { picture, .. }
            | PictureCmd::AnimStop { picture, .. }
            | PictureCmd::AnimSetCell { picture, .. }
            | PictureCmd::AnimProgress { picture, .. }
            | PictureCmd::AnimLinkVariable { picture, .. } => Some(*picture),
            PictureCmd::SetVariable { .. }
            | PictureCmd::AnimInit { .. }
            | PictureCmd::AnimSound { .. } => None,
        }
    }
}
