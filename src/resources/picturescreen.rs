//! Picture slot table.
//!
//! The [`PictureScreen`] resource is the explicit lookup from a picture id to
//! the slot entity holding its [`Picture`] and [`PictureAnimation`]. Systems
//! and scripts reach a picture's animation state only through this table.
//!
//! It also holds the animation setup staged by an init command, which is
//! applied to the next picture that is shown, together with the cell sounds
//! reserved for it.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::picture::{Picture, PictureId};
use crate::components::pictureanimation::{CellSounds, LayoutMode, PictureAnimation};

/// Animation setup waiting for the next shown picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAnimation {
    pub cell_count: i64,
    pub frame_interval: i64,
    pub layout: LayoutMode,
    pub fade_duration: i64,
}

/// Picture id → slot entity table plus the staged setup.
#[derive(Resource, Debug, Default)]
pub struct PictureScreen {
    slots: Vec<Entity>,
    staged: Option<StagedAnimation>,
    staged_sounds: CellSounds,
}

impl PictureScreen {
    /// Number of picture slots; valid ids are `1..=max_pictures()`.
    pub fn max_pictures(&self) -> usize {
        self.slots.len()
    }

    /// Slot entity for a picture id.
    pub fn entity(&self, id: PictureId) -> Option<Entity> {
        id.checked_sub(1).and_then(|i| self.slots.get(i)).copied()
    }

    pub fn stage(&mut self, setup: StagedAnimation) {
        self.staged = Some(setup);
    }

    /// Reserve a sound for a 0-based cell of the next animated picture.
    pub fn stage_sound(&mut self, cell: usize, sound: impl Into<String>) {
        self.staged_sounds.insert(cell, sound.into());
    }

    pub fn staged(&self) -> Option<&StagedAnimation> {
        self.staged.as_ref()
    }

    pub fn staged_sounds(&self) -> &CellSounds {
        &self.staged_sounds
    }

    /// Hand out the staged setup and its sounds if it animates more than one
    /// cell, clearing both. A single-cell setup stays staged.
    pub fn take_staged(&mut self) -> Option<(StagedAnimation, CellSounds)> {
        match self.staged {
            Some(setup) if setup.cell_count > 1 => {
                self.staged = None;
                Some((setup, std::mem::take(&mut self.staged_sounds)))
            }
            _ => None,
        }
    }
}

/// Spawn one slot entity per picture id and insert the [`PictureScreen`].
pub fn setup_picture_screen(world: &mut World, max_pictures: usize) {
    let slots = (1..=max_pictures)
        .map(|id| world.spawn((Picture::new(id), PictureAnimation::new())).id())
        .collect();
    world.insert_resource(PictureScreen {
        slots,
        ..Default::default()
    });
}
