//! Sound side effects.
//!
//! Picture animations never play audio themselves: binding a cell sound and
//! moving onto that cell write [`AudioCmd`] messages, which
//! [`forward_audio_cmds`](crate::systems::audio::forward_audio_cmds) hands to
//! whatever audio backend holds the other end of the
//! [`AudioBridge`](crate::resources::audio::AudioBridge). Nothing is sent back.

use bevy_ecs::message::Message;

/// Commands sent *to* the audio backend.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    /// Preload a sound effect so the first play is not delayed.
    LoadFx { id: String },
    /// Play a sound effect once.
    PlayFx { id: String },
    /// Ask the backend to stop.
    Shutdown,
}
