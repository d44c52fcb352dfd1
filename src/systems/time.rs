//! Frame clock system.
//!
//! Advances the shared [`FrameClock`](crate::resources::frameclock::FrameClock)
//! once per frame, after everything else in the schedule has run.
use bevy_ecs::prelude::*;

use crate::resources::frameclock::FrameClock;

/// Count one more completed frame.
pub fn advance_frame_clock(mut clock: ResMut<FrameClock>) {
    clock.frame += 1;
}
