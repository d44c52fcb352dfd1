//! Picture animation integration tests: commands and ticks through the ECS
//! schedule, from a raw World up to the full Stage.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use pictureanim::components::picture::Picture;
use pictureanim::components::pictureanimation::{
    CellSource, LayoutMode, MAX_CELLS, PictureAnimation, SequenceMode,
};
use pictureanim::events::audio::AudioCmd;
use pictureanim::events::picture::PictureCmd;
use pictureanim::resources::animationconfig::AnimationConfig;
use pictureanim::resources::audio::setup_audio_channel;
use pictureanim::resources::gamevariables::GameVariables;
use pictureanim::resources::picturescreen::{PictureScreen, setup_picture_screen};
use pictureanim::stage::Stage;
use pictureanim::systems::pictureanimation::{
    apply_picture_cmds, picture_animation, update_picture_cmds,
};

fn make_world() -> World {
    let mut world = World::new();
    setup_picture_screen(&mut world, 8);
    world.insert_resource(GameVariables::new(20));
    world.init_resource::<Messages<PictureCmd>>();
    world.init_resource::<Messages<AudioCmd>>();
    world
}

fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((apply_picture_cmds, picture_animation, update_picture_cmds).chain());
    schedule
}

fn send(world: &mut World, cmds: Vec<PictureCmd>) {
    let mut state = SystemState::<MessageWriter<PictureCmd>>::new(world);
    let mut writer = state.get_mut(world);
    writer.write_batch(cmds);
    state.apply(world);
}

fn anim(world: &World, id: usize) -> PictureAnimation {
    let entity = world.resource::<PictureScreen>().entity(id).unwrap();
    world.get::<PictureAnimation>(entity).unwrap().clone()
}

fn init(cells: i64, frames: i64, fade: i64) -> PictureCmd {
    PictureCmd::AnimInit {
        cells,
        frames,
        layout: LayoutMode::Vertical,
        fade,
    }
}

fn show(picture: i64) -> PictureCmd {
    PictureCmd::Show {
        picture,
        name: "cell0".to_string(),
        opacity: 255,
    }
}

fn start(picture: i64, kind: i64, custom: Vec<i64>, looped: bool) -> PictureCmd {
    PictureCmd::AnimStart {
        picture,
        kind,
        custom,
        looped,
    }
}

fn small_stage() -> Stage {
    let mut config = AnimationConfig::new();
    config.max_pictures = 8;
    config.variable_count = 20;
    Stage::new(&config)
}

fn cell(stage: &Stage, id: usize) -> usize {
    stage.animation(id).unwrap().resolve_cell_index()
}

// =============================================================================
// Sequence modes through the schedule
// =============================================================================

#[test]
fn forward_loop_tracks_frame_count() {
    for cells in [1_i64, 2, 5, 13, 200] {
        let mut world = make_world();
        let mut schedule = frame_schedule();
        send(&mut world, vec![init(cells, 1, 0), show(1), start(1, 1, vec![], true)]);
        for n in 1..=300_usize {
            schedule.run(&mut world);
            assert_eq!(anim(&world, 1).resolve_cell_index(), n % cells as usize);
        }
    }
}

#[test]
fn ping_pong_bounces_between_ends() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(4, 1, 0), show(1), start(1, 2, vec![], true)]);
    let mut seen = vec![anim(&world, 1).resolve_cell_index()];
    for _ in 0..7 {
        schedule.run(&mut world);
        seen.push(anim(&world, 1).resolve_cell_index());
    }
    // the first run applies the commands and ticks once
    assert_eq!(seen[1..], [1, 2, 3, 2, 1, 0, 1]);
}

#[test]
fn custom_sequence_repeats_with_its_period() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(
        &mut world,
        vec![init(4, 1, 0), show(1), start(1, 3, vec![1, 2, 1, 3, 1, 4], true)],
    );
    let mut seen = Vec::new();
    for _ in 0..12 {
        schedule.run(&mut world);
        seen.push(anim(&world, 1).resolve_cell_index());
    }
    assert_eq!(seen, vec![1, 0, 2, 0, 3, 0, 1, 0, 2, 0, 3, 0]);
}

#[test]
fn non_loop_stops_on_first_cell() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(3, 1, 0), show(1), start(1, 1, vec![], false)]);
    for _ in 0..3 {
        schedule.run(&mut world);
    }
    let a = anim(&world, 1);
    assert!(!a.is_running());
    assert_eq!(a.resolve_cell_index(), 0);
    schedule.run(&mut world);
    assert_eq!(anim(&world, 1).resolve_cell_index(), 0);
}

#[test]
fn soft_stop_runs_to_first_cell() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(4, 1, 0), show(1), start(1, 1, vec![], true)]);
    schedule.run(&mut world);
    send(&mut world, vec![PictureCmd::AnimStop {
        picture: 1,
        force: false,
    }]);
    schedule.run(&mut world);
    assert!(anim(&world, 1).is_running());
    schedule.run(&mut world);
    schedule.run(&mut world);
    let a = anim(&world, 1);
    assert_eq!(a.resolve_cell_index(), 0);
    assert!(!a.is_running());
}

// =============================================================================
// Fades, manual cells and linked variables
// =============================================================================

#[test]
fn fade_decays_after_manual_cell_change() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(4, 1, 10), show(1)]);
    schedule.run(&mut world);
    send(&mut world, vec![PictureCmd::AnimSetCell {
        picture: 1,
        cell: 3,
        wait: false,
    }]);
    schedule.run(&mut world);
    // the command is applied before this frame's tick
    assert_eq!(anim(&world, 1).resolve_fade_weight(), 0.9);
    for _ in 0..4 {
        schedule.run(&mut world);
    }
    assert_eq!(anim(&world, 1).resolve_fade_weight(), 0.5);
    for _ in 0..10 {
        schedule.run(&mut world);
    }
    assert_eq!(anim(&world, 1).resolve_fade_weight(), 0.0);
}

#[test]
fn progress_to_same_cell_keeps_fade() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(
        &mut world,
        vec![init(4, 1, 10), show(1), start(1, 3, vec![2, 2, 3], true), PictureCmd::AnimStop {
            picture: 1,
            force: true,
        }],
    );
    schedule.run(&mut world);
    let before = anim(&world, 1);
    send(&mut world, vec![PictureCmd::AnimProgress {
        picture: 1,
        wait: false,
    }]);
    schedule.run(&mut world);
    let after = anim(&world, 1);
    assert_eq!(after.resolve_cell_index(), before.resolve_cell_index());
    assert_eq!(after.advance_count(), before.advance_count() + 1);
    // the fade begun by the start keeps counting down instead of restarting
    assert_eq!(after.fade_remaining(), before.fade_remaining() - 1);
}

#[test]
fn link_onto_other_cell_starts_fade() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(4, 1, 10), show(1)]);
    schedule.run(&mut world);
    world.resource_mut::<GameVariables>().set(2, 3);
    send(&mut world, vec![PictureCmd::AnimLinkVariable {
        picture: 1,
        variable: 2,
    }]);
    schedule.run(&mut world);
    let a = anim(&world, 1);
    assert_eq!(a.resolve_cell_index(), 3);
    assert_eq!(a.previous_cell(), 0);
    assert_eq!(a.resolve_fade_weight(), 0.9);
}

#[test]
fn linked_variable_wins_over_timer() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(
        &mut world,
        vec![
            PictureCmd::SetVariable {
                variable: 4,
                value: 7,
            },
            init(5, 1, 0),
            show(1),
            start(1, 1, vec![], true),
            PictureCmd::AnimLinkVariable {
                picture: 1,
                variable: 4,
            },
        ],
    );
    for _ in 0..6 {
        schedule.run(&mut world);
        let a = anim(&world, 1);
        assert_eq!(a.resolve_cell_index(), 2);
        assert!(a.is_running());
        assert_eq!(a.source(), CellSource::LinkedVariable(4));
    }
    world.resource_mut::<GameVariables>().set(4, 9);
    schedule.run(&mut world);
    assert_eq!(anim(&world, 1).resolve_cell_index(), 4);
}

#[test]
fn configure_clamps_without_failing() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(&mut world, vec![init(500, 0, 0), show(1), start(1, 1, vec![], true)]);
    schedule.run(&mut world);
    let a = anim(&world, 1);
    assert_eq!(a.cell_count(), MAX_CELLS);
    assert_eq!(a.frame_interval(), 1);
    assert_eq!(a.resolve_cell_index(), 1);
}

#[test]
fn hidden_pictures_do_not_tick() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(
        &mut world,
        vec![init(4, 1, 0), show(2), start(2, 1, vec![], true), PictureCmd::Erase { picture: 2 }],
    );
    for _ in 0..3 {
        schedule.run(&mut world);
    }
    assert_eq!(anim(&world, 2), PictureAnimation::default());
    let entity = world.resource::<PictureScreen>().entity(2).unwrap();
    assert!(!world.get::<Picture>(entity).unwrap().is_shown());
}

#[test]
fn each_picture_animates_independently() {
    let mut world = make_world();
    let mut schedule = frame_schedule();
    send(
        &mut world,
        vec![
            init(3, 1, 0),
            show(1),
            init(6, 2, 0),
            show(2),
            start(1, 1, vec![], true),
            start(2, 2, vec![], true),
        ],
    );
    for _ in 0..4 {
        schedule.run(&mut world);
    }
    assert_eq!(anim(&world, 1).resolve_cell_index(), 1);
    assert_eq!(anim(&world, 2).resolve_cell_index(), 2);
    assert_eq!(anim(&world, 2).sequence(), &SequenceMode::PingPong);
}

// =============================================================================
// Stage: scripts, waits and sound cues
// =============================================================================

#[test]
fn stage_wait_suspends_script() {
    let mut stage = small_stage();
    stage.load_script("SHOW_PICTURE 1 lamp\nWAIT 3\nERASE_PICTURE 1\n");
    for _ in 0..3 {
        stage.step();
        assert!(stage.picture(1).unwrap().is_shown());
    }
    stage.step();
    assert!(!stage.picture(1).unwrap().is_shown());
    assert!(stage.is_script_finished());
}

#[test]
fn stage_with_wait_holds_for_the_fade() {
    let mut stage = small_stage();
    stage.load_script(
        "PA_INIT 3 100 Vertical 6\nSHOW_PICTURE 1 lamp\nPA_SET_CELL 1 2 WithWait\nERASE_PICTURE 1\n",
    );
    for _ in 0..6 {
        stage.step();
        assert!(stage.picture(1).unwrap().is_shown());
    }
    stage.step();
    assert!(!stage.picture(1).unwrap().is_shown());
}

#[test]
fn stage_with_wait_holds_full_fade_on_unchanged_cell() {
    let mut stage = small_stage();
    stage.load_script(
        "PA_INIT 3 100 Vertical 4\nSHOW_PICTURE 1 lamp\nWAIT 1\nPA_SET_CELL 1 1 WithWait\nERASE_PICTURE 1\n",
    );
    for _ in 0..5 {
        stage.step();
        assert!(stage.picture(1).unwrap().is_shown());
    }
    assert!(!stage.animation(1).unwrap().is_fading());
    stage.step();
    assert!(!stage.picture(1).unwrap().is_shown());
}

#[test]
fn stage_with_wait_without_fade_runs_on() {
    let mut stage = small_stage();
    stage.load_script(
        "PA_INIT 3 100\nSHOW_PICTURE 1 lamp\nWAIT 1\nPA_SET_CELL 1 2 WithWait\nERASE_PICTURE 1\n",
    );
    stage.step();
    assert!(stage.picture(1).unwrap().is_shown());
    stage.step();
    assert!(!stage.picture(1).unwrap().is_shown());
    assert!(stage.is_script_finished());
}

#[test]
fn stage_emits_sound_cues() {
    let mut stage = small_stage();
    let rx = setup_audio_channel(stage.world_mut());
    stage.load_script("PA_SOUND 2 Bell1\nPA_INIT 3 1\nSHOW_PICTURE 1 bell\nPA_START_LOOP 1 1\n");
    for _ in 0..4 {
        stage.step();
    }
    let cmds: Vec<AudioCmd> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            AudioCmd::LoadFx {
                id: "Bell1".to_string()
            },
            AudioCmd::PlayFx {
                id: "Bell1".to_string()
            },
            AudioCmd::PlayFx {
                id: "Bell1".to_string()
            },
        ]
    );
}

#[test]
fn stage_serial_files_report_cell_images() {
    let mut stage = small_stage();
    stage.load_script("PA_INIT 12 2 SerialNumber 4\nSHOW_PICTURE 3 boom00\nPA_START 3 1\n");
    for _ in 0..4 {
        stage.step();
    }
    assert_eq!(cell(&stage, 3), 2);
    let frames = stage.frames();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(frame.image, "boom02");
    assert_eq!(frame.previous_image, "boom01");
    assert_eq!(frame.layout, LayoutMode::SerialFiles);
    assert!(frame.fade_weight > 0.0);
}

#[test]
fn stage_staged_setup_skips_single_cell_init() {
    let mut stage = small_stage();
    stage.load_script("PA_INIT 1 5\nSHOW_PICTURE 1 still\nSHOW_PICTURE 2 still\n");
    stage.step();
    assert_eq!(stage.animation(1).unwrap().cell_count(), 1);
    assert_eq!(stage.animation(2).unwrap().cell_count(), 1);
}

#[cfg(feature = "lua")]
#[test]
fn stage_lua_on_frame_drives_pictures() {
    let path = std::env::temp_dir().join(format!("pictureanim-stage-{}.lua", std::process::id()));
    std::fs::write(
        &path,
        r#"
        engine.pa_init(4, 1)
        engine.show_picture(1, "gear0")
        engine.pa_start_loop(1, 1)
        function on_frame(frame)
            if frame == 2 then
                engine.pa_stop_force(1)
            end
        end
        "#,
    )
    .unwrap();
    let mut stage = small_stage();
    stage.load_lua(&path.to_string_lossy()).unwrap();
    for _ in 0..5 {
        stage.step();
    }
    let a = stage.animation(1).unwrap();
    assert_eq!(a.resolve_cell_index(), 2);
    assert!(!a.is_running());
    let _ = std::fs::remove_file(path);
}

#[cfg(feature = "lua")]
#[test]
fn stage_lua_bad_layout_keeps_later_commands() {
    let path = std::env::temp_dir().join(format!("pictureanim-layout-{}.lua", std::process::id()));
    std::fs::write(
        &path,
        r#"
        function on_frame(frame)
            if frame == 0 then
                engine.pa_init(4, 1, "Vert")
                engine.show_picture(1, "lamp")
            end
        end
        "#,
    )
    .unwrap();
    let mut stage = small_stage();
    stage.load_lua(&path.to_string_lossy()).unwrap();
    stage.step();
    assert!(stage.picture(1).unwrap().is_shown());
    let a = stage.animation(1).unwrap();
    assert_eq!(a.cell_count(), 4);
    assert_eq!(a.layout(), LayoutMode::Vertical);
    let _ = std::fs::remove_file(path);
}
