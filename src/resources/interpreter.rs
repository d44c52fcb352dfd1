//! Script interpreter resource.
//!
//! Holds a parsed text script and the position reached in it. Each frame the
//! [`run_interpreter`](crate::systems::interpreter::run_interpreter) system
//! asks for the next batch of commands with [`ScriptInterpreter::step`]; a
//! batch ends at the end of the script, at a `WAIT` line, or after a command
//! that waits for its picture's cross-fade.

use bevy_ecs::prelude::Resource;
use log::warn;

use crate::events::picture::PictureCmd;
use crate::script::{ScriptLine, parse_script};

/// Why the script is not executing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspend {
    /// Frames left before execution resumes.
    Frames(u32),
    /// Resume once this picture is no longer fading.
    Fade(i64),
}

/// Cross-fade state of the pictures a script can wait on.
pub trait FadeSource {
    /// Frames a cell change on `picture` fades for.
    fn fade_duration(&self, picture: i64) -> u32;
    /// True while `picture` is still cross-fading.
    fn is_fading(&self, picture: i64) -> bool;
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ScriptInterpreter {
    lines: Vec<ScriptLine>,
    cursor: usize,
    suspend: Option<Suspend>,
}

impl ScriptInterpreter {
    /// Parse `source`. Unparseable lines are logged and dropped.
    pub fn from_source(source: &str) -> Self {
        let (lines, errors) = parse_script(source);
        for error in &errors {
            warn!("script: {}", error);
        }
        Self {
            lines,
            cursor: 0,
            suspend: None,
        }
    }

    pub fn load_file(path: &str) -> Result<Self, String> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script {}: {}", path, e))?;
        Ok(Self::from_source(&source))
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.lines.len() && self.suspend.is_none()
    }

    pub fn suspend(&self) -> Option<Suspend> {
        self.suspend
    }

    /// Run one frame's worth of script.
    ///
    /// A command with a wait flag holds the script for the picture's fade
    /// duration; a duration of 0 does not hold it at all. When the same batch
    /// shows or erases that picture its fade duration is not known yet, so
    /// the script waits on the picture's fade itself instead.
    pub fn step(&mut self, fades: &impl FadeSource) -> Vec<PictureCmd> {
        match self.suspend {
            Some(Suspend::Frames(n)) if n > 1 => {
                self.suspend = Some(Suspend::Frames(n - 1));
                return Vec::new();
            }
            Some(Suspend::Fade(picture)) if fades.is_fading(picture) => return Vec::new(),
            _ => self.suspend = None,
        }

        let mut batch: Vec<PictureCmd> = Vec::new();
        while let Some(line) = self.lines.get(self.cursor) {
            self.cursor += 1;
            match line {
                ScriptLine::Wait(0) => {}
                ScriptLine::Wait(frames) => {
                    self.suspend = Some(Suspend::Frames(*frames));
                    break;
                }
                ScriptLine::Command(cmd) => {
                    let wait_on = cmd.picture().filter(|_| cmd.waits_for_fade());
                    let resets_target = wait_on.is_some_and(|picture| {
                        batch.iter().any(|earlier| resets_picture(earlier, picture))
                    });
                    batch.push(cmd.clone());
                    if let Some(picture) = wait_on {
                        if resets_target {
                            self.suspend = Some(Suspend::Fade(picture));
                            break;
                        }
                        let frames = fades.fade_duration(picture);
                        if frames > 0 {
                            self.suspend = Some(Suspend::Frames(frames));
                            break;
                        }
                    }
                }
            }
        }
        batch
    }
}

fn resets_picture(cmd: &PictureCmd, picture: i64) -> bool {
    match cmd {
        PictureCmd::Show { picture: p, .. } | PictureCmd::Erase { picture: p } => *p == picture,
        _ => false,
    }
}
