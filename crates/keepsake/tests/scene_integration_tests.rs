//! Integration tests driving a full scene through its public input/tick/apply
//! surface, the way a host renderer would.

use std::collections::HashSet;

use glam::Vec2;
use keepsake::clock::{Clock, FixedStepClock};
use keepsake::render::{FieldKind, FrameStats};
use keepsake::tour::{default_tour, Tour};
use keepsake::{InteractableId, Scene, SceneConfig, SceneInput};
use keepsake_core::camera::{FocusKind, OrbitInput, ViewMode};
use keepsake_core::clock::FrameTime;
use keepsake_core::interactables::GiftBoxState;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

const DT: f32 = 1.0 / 60.0;

fn run_frames(scene: &mut Scene, clock: &mut FixedStepClock, frames: usize) {
    for _ in 0..frames {
        let frame = clock.tick().unwrap();
        scene.tick(frame);
    }
}

// ============================================================================
// Scripted Tour
// ============================================================================

#[test]
fn test_default_tour_visits_every_mode() {
    let mut scene = Scene::new(&SceneConfig::default()).unwrap();
    let mut clock = FixedStepClock::from_fps(60.0);
    let mut tour = Tour::new(default_tour());
    let mut stats = FrameStats::new();
    let mut modes = HashSet::new();
    let mut focus_events = Vec::new();

    for _ in 0..900 {
        let frame = clock.tick().unwrap();
        for step in tour.due(frame.elapsed()) {
            if let Some(event) = scene.handle(step.input).unwrap() {
                focus_events.push(event);
            }
        }
        let report = scene.tick(frame);
        assert_eq!(report.focus_conflict, None);
        modes.insert(report.mode);
        scene.apply(&mut stats);
    }

    assert!(tour.is_finished());
    for mode in [
        ViewMode::Waiting,
        ViewMode::Entering,
        ViewMode::Default,
        ViewMode::Focused(FocusKind::Gift),
        ViewMode::Focused(FocusKind::Memory),
    ] {
        assert!(modes.contains(&mode), "never saw {:?}", mode);
    }

    // Gift requested and released, memory requested and released.
    assert_eq!(focus_events.len(), 4);
    assert!(focus_events.windows(2).all(|w| w[0].sequence < w[1].sequence));

    assert_eq!(scene.gift_box().state(), GiftBoxState::Closed);
    assert_eq!(scene.memories().selected(), None);

    assert_eq!(stats.frames, 900);
    assert_eq!(stats.total_particles(), 600 + 80 + 50 + 50);
    assert_eq!(stats.particle_bytes, stats.total_particles() * 80);
    assert_eq!(stats.memory_cards.len(), 10);
    assert!(stats.constellation_segments >= 10);
    assert!(stats.gift_box.is_some());
}

// ============================================================================
// Camera Coordination
// ============================================================================

#[test]
fn test_gift_round_trip_restores_camera() {
    let mut scene = Scene::new(&SceneConfig::default()).unwrap();
    let mut clock = FixedStepClock::from_fps(60.0);

    scene.handle(SceneInput::Start).unwrap();
    run_frames(&mut scene, &mut clock, 400);
    assert_eq!(scene.camera().mode(), ViewMode::Default);

    scene.handle(SceneInput::Activate(InteractableId::GiftBox)).unwrap();
    scene.handle(SceneInput::Confirm).unwrap();
    let before = scene.camera().pose();
    run_frames(&mut scene, &mut clock, 1);
    let saved = scene.camera().saved_pose().expect("pose captured on focus entry");
    assert!(saved.distance_to(&before) < 1e-6);

    // Approach to the gift pose never moves away from it.
    let target = scene.camera().focus_pose(FocusKind::Gift);
    let mut last = scene.camera().pose().distance_to(&target);
    for _ in 0..400 {
        run_frames(&mut scene, &mut clock, 1);
        let d = scene.camera().pose().distance_to(&target);
        assert!(d <= last + 1e-5);
        last = d;
    }
    assert!(last < 0.05);

    scene.handle(SceneInput::Activate(InteractableId::GiftBox)).unwrap();
    assert_eq!(scene.gift_box().state(), GiftBoxState::Closed);
    run_frames(&mut scene, &mut clock, 1);
    assert!(scene.camera().is_returning());

    run_frames(&mut scene, &mut clock, 600);
    assert_eq!(scene.camera().mode(), ViewMode::Default);
    assert_eq!(scene.camera().saved_pose(), None);
    assert!(scene.camera().pose().distance_to(&saved) < 0.5);
    assert_eq!(scene.gift_box().lid_angle(), 0.0);
}

#[test]
fn test_orbit_only_in_default_mode() {
    let mut scene = Scene::new(&SceneConfig::default()).unwrap();
    let mut clock = FixedStepClock::from_fps(60.0);
    let orbit = OrbitInput {
        yaw: 0.5,
        pitch: 0.0,
        distance_delta: 100.0,
    };

    scene.handle(SceneInput::Orbit(orbit)).unwrap();
    assert_eq!(scene.camera().orbit_pose(), scene.camera().config().default_pose);

    scene.handle(SceneInput::Start).unwrap();
    run_frames(&mut scene, &mut clock, 400);
    scene.handle(SceneInput::Orbit(orbit)).unwrap();

    let orbit_pose = scene.camera().orbit_pose();
    let distance = orbit_pose.position.distance(orbit_pose.look_at);
    assert!((distance - scene.camera().config().max_distance).abs() < 1e-3);

    run_frames(&mut scene, &mut clock, 600);
    assert!(scene.camera().pose().distance_to(&orbit_pose) < 0.05);
}

// ============================================================================
// Determinism
// ============================================================================

fn render_once(config: &SceneConfig, elapsed: f32) -> FrameStats {
    let mut scene = Scene::new(config).unwrap();
    scene.tick(FrameTime::new(elapsed, DT).unwrap());
    let mut stats = FrameStats::new();
    scene.apply(&mut stats);
    stats
}

#[test]
fn test_same_seed_same_frame() {
    let config = SceneConfig::default();
    let a = render_once(&config, 7.25);
    let b = render_once(&config, 7.25);
    for kind in FieldKind::ALL {
        assert_eq!(a.buffer(kind).bytes(), b.buffer(kind).bytes());
    }

    let other = SceneConfig {
        seed: config.seed + 1,
        ..config.clone()
    };
    let c = render_once(&other, 7.25);
    assert_ne!(a.buffer(FieldKind::Starfield).bytes(), c.buffer(FieldKind::Starfield).bytes());
}

#[test]
fn test_single_card_scene_has_no_lines() {
    let mut config = SceneConfig::default();
    config.memories.count = 1;
    config.constellation.neighbors = 0;
    let mut scene = Scene::new(&config).unwrap();
    assert!(scene.constellation().edges().is_empty());

    scene.handle(SceneInput::Activate(InteractableId::MemoryCard(0))).unwrap();
    scene.tick(FrameTime::new(DT, DT).unwrap());
    let mut stats = FrameStats::new();
    scene.apply(&mut stats);
    assert_eq!(stats.memory_cards.len(), 1);
    assert_eq!(stats.constellation_segments, 0);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = SceneConfig::default();
    config.memories.count = 3;
    assert!(Scene::new(&config).is_err());

    let mut config = SceneConfig::default();
    config.starfield.count = 0;
    assert!(Scene::new(&config).is_err());
}

// ============================================================================
// Randomized Input
// ============================================================================

#[test]
fn test_random_inputs_keep_invariants() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0x5eed);
    let mut scene = Scene::new(&SceneConfig::default()).unwrap();
    let card_count = scene.memories().len();
    let mut elapsed = 0.0;

    for i in 0..3000 {
        let input = match rng.gen_range(0..10) {
            0 if i > 100 => SceneInput::Start,
            1 => SceneInput::Activate(InteractableId::GiftBox),
            2 => SceneInput::Confirm,
            3 => SceneInput::Cancel,
            4 => SceneInput::Activate(InteractableId::MemoryCard(rng.gen_range(0..card_count))),
            5 => SceneInput::Hover(InteractableId::MemoryCard(rng.gen_range(0..card_count)), rng.gen_bool(0.5)),
            6 => SceneInput::Deselect,
            7 => SceneInput::Orbit(OrbitInput {
                yaw: rng.gen_range(-0.5..0.5),
                pitch: rng.gen_range(-0.5..0.5),
                distance_delta: rng.gen_range(-3.0..3.0),
            }),
            8 => SceneInput::Pointer(Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))),
            _ => SceneInput::Hover(InteractableId::GiftBox, rng.gen_bool(0.5)),
        };
        scene.handle(input).unwrap();

        // Occasional zero-delta and large-delta frames.
        let dt = match rng.gen_range(0..20) {
            0 => 0.0,
            1 => 0.5,
            _ => DT,
        };
        elapsed += dt;
        let report = scene.tick(FrameTime::new(elapsed, dt).unwrap());

        let memories = scene.memories();
        assert!(memories.focused_count() <= 1);
        let gift_open = scene.gift_box().state() == GiftBoxState::Open;
        let expected = match (gift_open, memories.selected().is_some()) {
            (false, false) => None,
            (true, false) => Some(FocusKind::Gift),
            (false, true) => Some(FocusKind::Memory),
            (true, true) => report.focus_conflict.map(|c| c.winner),
        };
        assert_eq!(report.active_focus, expected);
        assert!(report.camera.position.is_finite());
        if !scene.is_started() {
            assert_eq!(report.mode, ViewMode::Waiting);
        }
    }
}
