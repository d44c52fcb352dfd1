use bevy_ecs::prelude::Resource;

/// Host frame counter. Everything in this crate is measured in frames.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    /// Frames completed since startup.
    pub frame: u64,
}
