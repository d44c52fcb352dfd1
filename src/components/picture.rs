//! Picture slot component and render-facing helpers.
//!
//! Every picture id the screen supports is an entity carrying a [`Picture`]
//! and a [`PictureAnimation`]. Showing a picture fills the slot, erasing it
//! empties the slot again. Rendering itself lives outside this crate; the
//! helpers here answer the questions a renderer asks: which rectangle of
//! the sheet is the current cell, which file holds it, and how opaque the
//! previous cell still is during a cross-fade.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::pictureanimation::{LayoutMode, PictureAnimation};

/// 1-based picture slot number.
pub type PictureId = usize;

/// Default opacity of a freshly shown picture.
pub const FULL_OPACITY: u8 = 255;

/// A picture slot on the screen.
#[derive(Component, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: PictureId,
    /// Image name while shown, `None` while the slot is empty.
    pub name: Option<String>,
    pub opacity: u8,
}

impl Picture {
    pub fn new(id: PictureId) -> Self {
        Self {
            id,
            name: None,
            opacity: FULL_OPACITY,
        }
    }
    pub fn show(&mut self, name: impl Into<String>, opacity: u8) {
        self.name = Some(name.into());
        self.opacity = opacity;
    }
    pub fn erase(&mut self) {
        self.name = None;
        self.opacity = FULL_OPACITY;
    }
    pub fn is_shown(&self) -> bool {
        self.name.is_some()
    }
}

/// Source rectangle of one cell, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Rectangle of `cell` inside an image of `width` x `height`.
///
/// For [`LayoutMode::SerialFiles`] the image is the cell's own file, so the
/// whole image is returned.
pub fn cell_frame(
    layout: LayoutMode,
    cell_count: usize,
    cell: usize,
    width: u32,
    height: u32,
) -> CellFrame {
    let cells = cell_count.max(1) as u32;
    let cell = cell as u32;
    match layout {
        LayoutMode::Vertical => {
            let h = height / cells;
            CellFrame {
                x: 0,
                y: cell * h,
                width,
                height: h,
            }
        }
        LayoutMode::Horizontal => {
            let w = width / cells;
            CellFrame {
                x: cell * w,
                y: 0,
                width: w,
                height,
            }
        }
        LayoutMode::SerialFiles => CellFrame {
            x: 0,
            y: 0,
            width,
            height,
        },
    }
}

/// File names of every cell for [`LayoutMode::SerialFiles`].
///
/// Cell 0 is `base` itself. For the others the last `d` characters of `base`
/// are replaced by the zero-padded cell index, `d` being the number of digits
/// in `cell_count` (`anim00`, `anim01`, ... for 10 to 99 cells).
pub fn serial_cell_names(base: &str, cell_count: usize) -> Vec<String> {
    let digits = cell_count.to_string().len();
    let chars: Vec<char> = base.chars().collect();
    let stem: String = chars[..chars.len().saturating_sub(digits)].iter().collect();
    let mut names = Vec::with_capacity(cell_count);
    names.push(base.to_string());
    for i in 1..cell_count {
        names.push(format!("{stem}{i:0digits$}"));
    }
    names
}

/// Opacity of the previous cell drawn over the current one during a fade.
pub fn previous_cell_opacity(opacity: u8, fade_weight: f32) -> u8 {
    (opacity as f32 * fade_weight.clamp(0.0, 1.0)).round() as u8
}

/// What a renderer needs to draw one shown picture this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureFrame {
    pub picture: PictureId,
    /// Image to draw the current cell from.
    pub image: String,
    pub layout: LayoutMode,
    pub cell_count: usize,
    pub cell: usize,
    pub previous_cell: usize,
    /// Image holding the previous cell.
    pub previous_image: String,
    pub fade_weight: f32,
    pub previous_opacity: u8,
    pub running: bool,
}

impl PictureFrame {
    /// Capture the drawable state of a shown picture, `None` for an empty slot.
    pub fn capture(picture: &Picture, anim: &PictureAnimation) -> Option<Self> {
        let name = picture.name.as_deref()?;
        let cell = anim.resolve_cell_index();
        let previous_cell = anim.previous_cell();
        let (image, previous_image) = if anim.is_multi_file() {
            let names = serial_cell_names(name, anim.cell_count());
            let pick = |c: usize| names.get(c).cloned().unwrap_or_else(|| name.to_string());
            (pick(cell), pick(previous_cell))
        } else {
            (name.to_string(), name.to_string())
        };
        let fade_weight = anim.resolve_fade_weight();
        Some(Self {
            picture: picture.id,
            image,
            layout: anim.layout(),
            cell_count: anim.cell_count(),
            cell,
            previous_cell,
            previous_image,
            fade_weight,
            previous_opacity: previous_cell_opacity(picture.opacity, fade_weight),
            running: anim.is_running(),
        })
    }
}
