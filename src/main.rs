//! pictureanim entry point.
//!
//! Runs a picture animation script headless for a number of frames and
//! prints what a renderer would draw: per shown picture, the image, the
//! visible cell and the cross-fade state.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- scripts/torch.txt --frames 120
//! cargo run --release -- scripts/torch.txt --json --lua scripts/torch.lua
//! RUST_LOG=debug cargo run -- scripts/torch.txt
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

use pictureanim::components::picture::PictureFrame;
use pictureanim::resources::animationconfig::AnimationConfig;
use pictureanim::resources::audio::{setup_audio, shutdown_audio};
use pictureanim::stage::Stage;

#[derive(Parser)]
#[command(version, about = "Headless player for picture cell animations")]
struct Cli {
    /// Text command script to run.
    script: PathBuf,

    /// Number of frames to run (overrides the config file).
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./pictureanim.ini")]
    config: PathBuf,

    /// Print snapshots as JSON lines.
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config file before running.
    #[arg(long)]
    save_config: bool,

    /// Lua script run at startup; may define `on_frame(frame)`.
    #[cfg(feature = "lua")]
    #[arg(long, value_name = "PATH")]
    lua: Option<PathBuf>,
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: u64,
    pictures: &'a [PictureFrame],
}

fn print_text(frame: u64, pictures: &[PictureFrame]) {
    for p in pictures {
        let state = if p.running { "running" } else { "idle" };
        if p.fade_weight > 0.0 {
            println!(
                "frame {:>5}  picture {:>3}  {} cell {}/{}  {}  fading from cell {} ({}) at {:.2}",
                frame,
                p.picture,
                p.image,
                p.cell + 1,
                p.cell_count,
                state,
                p.previous_cell + 1,
                p.previous_image,
                p.fade_weight
            );
        } else {
            println!(
                "frame {:>5}  picture {:>3}  {} cell {}/{}  {}",
                frame,
                p.picture,
                p.image,
                p.cell + 1,
                p.cell_count,
                state
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AnimationConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if cli.save_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let mut stage = Stage::new(&config);
    let script = cli.script.to_string_lossy();
    if let Err(e) = stage.load_script_file(&script) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    #[cfg(feature = "lua")]
    if let Some(path) = cli.lua.as_ref() {
        if let Err(e) = stage.load_lua(&path.to_string_lossy()) {
            error!(target: "lua", "Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    setup_audio(stage.world_mut());
    info!(
        "Running {} for {} frames ({} picture slots)",
        script, config.frames, config.max_pictures
    );

    for _ in 0..config.frames {
        stage.step();
        let frame = stage.frame();
        if frame % config.snapshot_every != 0 {
            continue;
        }
        let pictures = stage.frames();
        if cli.json {
            match serde_json::to_string(&FrameReport {
                frame,
                pictures: &pictures,
            }) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Failed to encode frame {}: {}", frame, e),
            }
        } else {
            print_text(frame, &pictures);
        }
    }

    if !stage.is_script_finished() {
        info!("Script still running after {} frames", stage.frame());
    }
    shutdown_audio(stage.world_mut());
}
