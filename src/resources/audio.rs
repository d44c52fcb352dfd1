//! ECS resource bridging the world with an audio backend.
//!
//! Use [`setup_audio`] to spawn the built-in logging backend thread, or
//! [`setup_audio_channel`] to receive the commands yourself. Call
//! [`shutdown_audio`] during teardown to stop and join the thread.

use crate::events::audio::AudioCmd;
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Shared bridge between the ECS world and the audio backend.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> backend).
    pub tx_cmd: Sender<AudioCmd>,
    /// Join handle for the backend thread, when this crate spawned it.
    pub handle: Option<std::thread::JoinHandle<()>>,
}

/// Register the bridge and `Messages<AudioCmd>`, returning the receiving end
/// for an external backend.
pub fn setup_audio_channel(world: &mut World) -> Receiver<AudioCmd> {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    world.insert_resource(AudioBridge {
        tx_cmd,
        handle: None,
    });
    world.insert_resource(Messages::<AudioCmd>::default());
    rx_cmd
}

/// Spawn the logging backend thread and register bridge resources.
pub fn setup_audio(world: &mut World) {
    let rx_cmd = setup_audio_channel(world);
    let handle = std::thread::spawn(move || audio_thread(rx_cmd));
    world.resource_mut::<AudioBridge>().handle = Some(handle);
}

/// Request shutdown of the backend thread and join it.
///
/// If the bridge resource exists, sends [`AudioCmd::Shutdown`], waits for the
/// thread (if any) to exit, and removes the resource from the world.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        if let Some(handle) = bridge.handle {
            let _ = handle.join();
        }
    }
}
