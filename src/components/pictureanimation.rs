//! Cell animation state for a displayed picture.
//!
//! A [`PictureAnimation`] walks a picture through a number of sub-images
//! ("cells"). Each host frame the [`picture_animation`] system calls
//! [`PictureAnimation::tick`]; the render side then asks for
//! [`PictureAnimation::resolve_cell_index`] and
//! [`PictureAnimation::resolve_fade_weight`] to decide which cell to draw and
//! how much opacity is still owed to the previous one.
//!
//! The cell shown is either driven by the internal timer or pulled from a
//! game variable, see [`CellSource`]. A linked variable always wins.
//!
//! # Related
//!
//! - [`crate::components::picture::Picture`] – the picture slot this state belongs to
//! - [`crate::systems::pictureanimation`] – command application and per-frame update
//!
//! [`picture_animation`]: crate::systems::pictureanimation::picture_animation

use std::str::FromStr;

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{AnimationWarning, clamp_reported};
use crate::resources::gamevariables::{VariableId, VariableSource};

/// Maximum number of cells a single animation may have.
pub const MAX_CELLS: usize = 200;
/// Maximum number of frames between two cell advances.
pub const MAX_FRAME_INTERVAL: u32 = 9999;
/// Maximum cross-fade length in frames.
pub const MAX_FADE_DURATION: u32 = 9999;

/// Sound cues keyed by 0-based cell index.
pub type CellSounds = FxHashMap<usize, String>;

/// How the cells are arranged in the source art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Cells stacked top to bottom in one sheet.
    #[default]
    Vertical,
    /// Cells side by side in one sheet.
    Horizontal,
    /// One image file per cell, named by a numeric suffix.
    SerialFiles,
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "V" | "VERTICAL" => Ok(LayoutMode::Vertical),
            "H" | "HORIZONTAL" => Ok(LayoutMode::Horizontal),
            "N" | "SERIAL" | "SERIALNUMBER" | "SERIALFILES" => Ok(LayoutMode::SerialFiles),
            _ => Err(s.to_string()),
        }
    }
}

/// Rule mapping the raw advance counter to a cell index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequenceMode {
    /// 0, 1, 2, ..., n-1, 0, 1, ...
    #[default]
    Forward,
    /// 0, 1, ..., n-1, n-2, ..., 1, 0, 1, ...
    PingPong,
    /// Explicit order of 1-based cell ids.
    Custom(Vec<usize>),
}

impl SequenceMode {
    /// Build a mode from the numeric kind used by the command surface
    /// (1 = forward, 2 = ping-pong, 3 = custom). Unknown kinds play forward.
    pub fn from_kind(kind: i64, custom: Vec<usize>) -> Self {
        match kind {
            2 => SequenceMode::PingPong,
            3 => SequenceMode::Custom(custom),
            _ => SequenceMode::Forward,
        }
    }
}

/// Where the visible cell comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellSource {
    /// Advanced by the frame timer and manual commands.
    #[default]
    Timer,
    /// Read from a game variable every frame.
    LinkedVariable(VariableId),
}

/// What happened during one [`PictureAnimation::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The resolved cell changed this frame.
    pub cell_changed: bool,
    /// Sound cue bound to the new cell, if the timer moved onto it.
    pub sound: Option<String>,
    /// A non-looping animation reached its first cell again and stopped.
    pub finished: bool,
}

/// Per-picture cell animation state.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
pub struct PictureAnimation {
    cell_count: usize,
    frame_interval: u32,
    layout: LayoutMode,
    fade_duration: u32,
    sequence: SequenceMode,
    looped: bool,
    running: bool,
    advance_count: usize,
    previous_cell: usize,
    elapsed_ticks: u32,
    fade_remaining: u32,
    source: CellSource,
    linked_value: i64,
    cell_sounds: CellSounds,
}

impl Default for PictureAnimation {
    fn default() -> Self {
        Self {
            cell_count: 1,
            frame_interval: 1,
            layout: LayoutMode::Vertical,
            fade_duration: 0,
            sequence: SequenceMode::Forward,
            looped: false,
            running: false,
            advance_count: 0,
            previous_cell: 0,
            elapsed_ticks: 0,
            fade_remaining: 0,
            source: CellSource::Timer,
            linked_value: 0,
            cell_sounds: CellSounds::default(),
        }
    }
}

impl PictureAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every attribute to its default.
    pub fn initialize(&mut self) {
        *self = Self::default();
    }

    /// One-time setup right after the picture becomes visible.
    ///
    /// Out-of-range inputs are clamped; the returned warnings describe what
    /// was changed.
    pub fn configure(
        &mut self,
        cell_count: i64,
        frame_interval: i64,
        layout: LayoutMode,
        fade_duration: i64,
        cell_sounds: CellSounds,
    ) -> Vec<AnimationWarning> {
        let mut warnings = Vec::new();
        self.cell_count =
            clamp_reported("cell_count", cell_count, 1, MAX_CELLS as i64, &mut warnings) as usize;
        self.frame_interval = clamp_reported(
            "frame_interval",
            frame_interval,
            1,
            MAX_FRAME_INTERVAL as i64,
            &mut warnings,
        ) as u32;
        self.fade_duration = clamp_reported(
            "fade_duration",
            fade_duration,
            0,
            MAX_FADE_DURATION as i64,
            &mut warnings,
        ) as u32;
        self.layout = layout;
        self.cell_sounds = cell_sounds;
        self.advance_count = 0;
        self.elapsed_ticks = 0;
        warnings
    }

    /// Begin automatic advancement.
    ///
    /// An empty custom sequence falls back to forward playback. Custom ids
    /// outside `[1, cell_count]` are accepted here and clamped when resolved.
    pub fn start(&mut self, sequence: SequenceMode, looped: bool) -> Option<AnimationWarning> {
        let old_cell = self.resolve_cell_index();
        let mut warning = None;
        self.sequence = match sequence {
            SequenceMode::Custom(cells) if cells.is_empty() => {
                warning = Some(AnimationWarning::EmptySequence);
                SequenceMode::Forward
            }
            other => other,
        };
        self.advance_count %= self.sequence_len();
        self.looped = looped;
        self.running = true;
        if self.resolve_cell_index() != old_cell {
            self.begin_fade_from(old_cell);
        }
        warning
    }

    /// Stop at the next return to cell 0, or immediately when `force` is set.
    pub fn stop(&mut self, force: bool) {
        self.looped = false;
        if force {
            self.running = false;
        }
    }

    /// Jump to a position in the sequence.
    ///
    /// The fade restarts only if the resolved cell actually changes.
    pub fn set_cell_direct(&mut self, index: usize) {
        let old_cell = self.resolve_cell_index();
        self.advance_count = index % self.sequence_len();
        let new_cell = self.resolve_cell_index();
        if new_cell != old_cell {
            self.begin_fade_from(old_cell);
        }
    }

    /// Move one step forward in the sequence.
    pub fn advance_one_step(&mut self) {
        self.set_cell_direct(self.advance_count + 1);
    }

    /// Make the variable `id` drive the visible cell.
    ///
    /// `current` is the variable's value at link time. If it resolves to a
    /// different cell than the one on screen, the fade restarts.
    pub fn link_variable(&mut self, id: VariableId, current: i64) {
        let old_cell = self.resolve_cell_index();
        self.source = CellSource::LinkedVariable(id);
        self.linked_value = current;
        if self.resolve_cell_index() != old_cell {
            self.begin_fade_from(old_cell);
        }
    }

    /// Bind a sound cue to a 0-based cell index.
    pub fn bind_sound(&mut self, cell: usize, sound: impl Into<String>) {
        self.cell_sounds.insert(cell, sound.into());
    }

    /// Advance the state by one host frame.
    pub fn tick(&mut self, variables: &impl VariableSource) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        // Runs whether or not the animation is running, so a fade started
        // just before a stop still completes.
        if self.fade_remaining > 0 {
            self.fade_remaining -= 1;
        }

        match self.source {
            CellSource::LinkedVariable(id) => {
                let value = variables.value(id);
                if value != self.linked_value {
                    let old_cell = self.resolve_cell_index();
                    self.linked_value = value;
                    let new_cell = self.resolve_cell_index();
                    if new_cell != old_cell {
                        self.begin_fade_from(old_cell);
                        outcome.cell_changed = true;
                    }
                }
            }
            CellSource::Timer => {
                if !self.running {
                    return outcome;
                }
                self.elapsed_ticks += 1;
                if self.elapsed_ticks >= self.frame_interval {
                    self.elapsed_ticks = 0;
                    let old_cell = self.resolve_cell_index();
                    self.advance_one_step();
                    let cell = self.resolve_cell_index();
                    outcome.cell_changed = cell != old_cell;
                    outcome.sound = self.cell_sounds.get(&cell).cloned();
                    if cell == 0 && !self.looped {
                        self.running = false;
                        outcome.finished = true;
                    }
                }
            }
        }
        outcome
    }

    /// The cell index that should be visible now, in `[0, cell_count)`.
    pub fn resolve_cell_index(&self) -> usize {
        let cells = self.cell_count;
        if let CellSource::LinkedVariable(_) = self.source {
            return self.linked_value.rem_euclid(cells as i64) as usize;
        }
        let step = self.advance_count % self.sequence_len();
        match &self.sequence {
            SequenceMode::Forward => step % cells,
            SequenceMode::PingPong => {
                let last = cells as isize - 1;
                (last - (step as isize - last).abs()) as usize
            }
            SequenceMode::Custom(order) => order
                .get(step)
                .map_or(0, |id| id.saturating_sub(1).min(cells - 1)),
        }
    }

    /// Opacity share still owed to the previous cell: 1.0 right after a
    /// change, decaying linearly to 0.0.
    pub fn resolve_fade_weight(&self) -> f32 {
        if self.fade_duration == 0 {
            return 0.0;
        }
        self.fade_remaining as f32 / self.fade_duration as f32
    }

    /// Length of one traversal of the current sequence, never 0.
    pub fn sequence_len(&self) -> usize {
        let len = match &self.sequence {
            SequenceMode::Forward => self.cell_count,
            SequenceMode::PingPong => (self.cell_count - 1) * 2,
            SequenceMode::Custom(order) => order.len(),
        };
        len.max(1)
    }

    fn begin_fade_from(&mut self, old_cell: usize) {
        self.previous_cell = old_cell;
        self.fade_remaining = self.fade_duration;
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }
    pub fn frame_interval(&self) -> u32 {
        self.frame_interval
    }
    pub fn layout(&self) -> LayoutMode {
        self.layout
    }
    /// True when each cell lives in its own image file.
    pub fn is_multi_file(&self) -> bool {
        self.layout == LayoutMode::SerialFiles
    }
    pub fn fade_duration(&self) -> u32 {
        self.fade_duration
    }
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0
    }
    pub fn fade_remaining(&self) -> u32 {
        self.fade_remaining
    }
    /// Cell shown before the last change; the one to cross-fade out.
    pub fn previous_cell(&self) -> usize {
        self.previous_cell
    }
    pub fn sequence(&self) -> &SequenceMode {
        &self.sequence
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn is_looping(&self) -> bool {
        self.looped
    }
    pub fn advance_count(&self) -> usize {
        self.advance_count
    }
    pub fn source(&self) -> CellSource {
        self.source
    }
    pub fn cell_sounds(&self) -> &CellSounds {
        &self.cell_sounds
    }
}
