//! Warning and error types.
//!
//! Nothing in the per-frame path is fatal: a malformed command degrades the
//! animation of one picture and is reported through [`AnimationWarning`],
//! which callers log with `warn!` and then carry on. [`ScriptError`] covers
//! problems in script lines; the interpreter logs them and skips lines it
//! cannot turn into a command.

use thiserror::Error;

/// Non-fatal conditions raised while applying animation commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationWarning {
    /// A numeric input was outside its legal range and was clamped.
    #[error("{field} = {requested} is out of range [{min}, {max}], using {applied}")]
    Clamped {
        field: &'static str,
        requested: i64,
        min: i64,
        max: i64,
        applied: i64,
    },
    /// A custom sequence was requested without any cells; Forward is used instead.
    #[error("custom sequence is empty, falling back to forward playback")]
    EmptySequence,
    /// A command referenced a picture that is not currently shown.
    #[error("picture {picture} is not shown, command ignored")]
    MissingTarget { picture: i64 },
    /// A command wrote a game variable that was never declared.
    #[error("variable {variable} is not declared, command ignored")]
    UnknownVariable { variable: i64 },
}

/// A problem found while parsing a script line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' expects {expected}")]
    MissingArgument {
        line: usize,
        command: String,
        expected: &'static str,
    },
    /// Logged only; the command is kept with the vertical layout.
    #[error("line {line}: unknown cell layout '{layout}'")]
    UnknownLayout { line: usize, layout: String },
}

/// Clamp `value` into `[min, max]`, recording a [`AnimationWarning::Clamped`]
/// when the value had to change.
pub fn clamp_reported(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
    warnings: &mut Vec<AnimationWarning>,
) -> i64 {
    let applied = value.clamp(min, max);
    if applied != value {
        warnings.push(AnimationWarning::Clamped {
            field,
            requested: value,
            min,
            max,
            applied,
        });
    }
    applied
}
