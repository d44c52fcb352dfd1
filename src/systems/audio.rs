//! Audio forwarding.
//!
//! - [`forward_audio_cmds`] hands the frame's [`AudioCmd`] messages to the
//!   backend through the [`AudioBridge`] channel.
//! - [`update_bevy_audio_cmds`] advances the message queue once per frame.
//! - [`audio_thread`] is the built-in backend: it only logs what it would play.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use crate::events::audio::AudioCmd;
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use log::{debug, info};
use rustc_hash::FxHashSet;

/// Forward ECS AudioCmd messages to the backend via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Option<Res<AudioBridge>>, mut reader: MessageReader<AudioCmd>) {
    let Some(bridge) = bridge else {
        // no backend attached; mark the messages as read
        let _ = reader.read().count();
        return;
    };
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Entry point of the logging audio backend.
///
/// Blocks on the channel until it receives [`AudioCmd::Shutdown`] or every
/// sender is dropped.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>) {
    info!(
        "[audio] thread starting (id={:?})",
        std::thread::current().id()
    );
    let mut loaded: FxHashSet<String> = FxHashSet::default();
    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id } => {
                if loaded.insert(id.clone()) {
                    debug!("[audio] fx loaded id='{}'", id);
                }
            }
            AudioCmd::PlayFx { id } => {
                if !loaded.contains(&id) {
                    debug!("[audio] fx '{}' played without preload", id);
                }
                info!("[audio] play fx id='{}'", id);
            }
            AudioCmd::Shutdown => break,
        }
    }
    info!("[audio] thread exiting");
}
