//! Text command scripts.
//!
//! A script is a list of lines, one command per line, executed in order by
//! the [`ScriptInterpreter`](crate::resources::interpreter::ScriptInterpreter).
//! Blank lines and lines starting with `#` or `//` are ignored. Command names
//! are case-insensitive and arguments are separated by whitespace.
//!
//! ```text
//! PA_INIT 4 10 Horizontal 20     # cells, frames per cell, layout, fade frames
//! PA_SOUND 3 Bell1               # play Bell1 when cell 3 comes up
//! SHOW_PICTURE 1 torch0 255
//! PA_START_LOOP 1 3 [1,2,1,3,1,4]
//! WAIT 120
//! PA_SET_CELL 1 2 WithWait
//! PA_STOP 1
//! ```
//!
//! Numbers are read leniently: anything that does not start with an integer
//! counts as 0 and a missing number is 0. Range checks happen when the
//! command is applied.

use log::warn;
use smallvec::SmallVec;

use crate::components::pictureanimation::LayoutMode;
use crate::error::ScriptError;
use crate::events::picture::PictureCmd;

/// One executable line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    Command(PictureCmd),
    /// Suspend the script for this many frames.
    Wait(u32),
}

/// Read the leading integer of `arg`, or 0.
pub fn arg_number(arg: Option<&str>) -> i64 {
    let Some(arg) = arg else {
        return 0;
    };
    let arg = arg.trim();
    let (sign, digits) = match arg.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, arg.strip_prefix('+').unwrap_or(arg)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// Read a `[1,2,3]` or `1,2,3` list of integers. A missing list is empty.
pub fn arg_number_list(arg: Option<&str>) -> Vec<i64> {
    let Some(arg) = arg else {
        return Vec::new();
    };
    let inner = arg.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|part| arg_number(Some(part))).collect()
}

fn is_wait_flag(arg: Option<&str>) -> bool {
    arg.is_some_and(|a| a == "WithWait" || a.eq_ignore_ascii_case("WAIT"))
}

/// Parse a single line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ScriptLine>, ScriptError> {
    let text = text.split(" #").next().unwrap_or(text).trim();
    if text.is_empty() || text.starts_with('#') || text.starts_with("//") {
        return Ok(None);
    }
    let tokens: SmallVec<[&str; 8]> = text.split_whitespace().collect();
    let command = tokens[0].to_ascii_uppercase();
    let arg = |i: usize| tokens.get(i).copied();
    let num = |i: usize| arg_number(arg(i));
    let required = |i: usize, expected: &'static str| {
        arg(i).ok_or_else(|| ScriptError::MissingArgument {
            line,
            command: command.clone(),
            expected,
        })
    };

    let cmd = match command.as_str() {
        "WAIT" => return Ok(Some(ScriptLine::Wait(num(1).clamp(0, u32::MAX as i64) as u32))),
        "SHOW_PICTURE" => PictureCmd::Show {
            picture: num(1),
            name: required(2, "a picture number and an image name")?.to_string(),
            opacity: arg(3).map_or(255, |a| arg_number(Some(a))),
        },
        "ERASE_PICTURE" => PictureCmd::Erase { picture: num(1) },
        "SET_VARIABLE" => PictureCmd::SetVariable {
            variable: num(1),
            value: num(2),
        },
        "PA_INIT" => {
            let layout = match arg(3) {
                Some(name) => name.parse::<LayoutMode>().unwrap_or_else(|layout| {
                    warn!("script: {}, using Vertical", ScriptError::UnknownLayout { line, layout });
                    LayoutMode::Vertical
                }),
                None => LayoutMode::Vertical,
            };
            PictureCmd::AnimInit {
                cells: num(1),
                frames: num(2),
                layout,
                fade: num(4),
            }
        }
        "PA_SOUND" => PictureCmd::AnimSound {
            cell: num(1),
            sound: required(2, "a cell number and a sound name")?.to_string(),
        },
        "PA_START" | "PA_START_LOOP" => PictureCmd::AnimStart {
            picture: num(1),
            kind: num(2),
            custom: arg_number_list(arg(3)),
            looped: command == "PA_START_LOOP",
        },
        "PA_STOP" => PictureCmd::AnimStop {
            picture: num(1),
            force: false,
        },
        "PA_STOP_FORCE" => PictureCmd::AnimStop {
            picture: num(1),
            force: true,
        },
        "PA_SET_CELL" => PictureCmd::AnimSetCell {
            picture: num(1),
            cell: num(2),
            wait: is_wait_flag(arg(3)),
        },
        "PA_PROG_CELL" => PictureCmd::AnimProgress {
            picture: num(1),
            wait: is_wait_flag(arg(2)),
        },
        "PA_SET_VARIABLE" => PictureCmd::AnimLinkVariable {
            picture: num(1),
            variable: num(2),
        },
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: tokens[0].to_string(),
            });
        }
    };
    Ok(Some(ScriptLine::Command(cmd)))
}

/// Parse a whole script. Lines that fail to parse are returned as errors and
/// left out of the script.
pub fn parse_script(source: &str) -> (Vec<ScriptLine>, Vec<ScriptError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    for (i, text) in source.lines().enumerate() {
        match parse_line(i + 1, text) {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    (lines, errors)
}
