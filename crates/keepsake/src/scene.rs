//! Scene composition: owns every component and wires them together per tick.
//!
//! Order within a tick is fixed: particle fields and interactables advance
//! first, the active focus is resolved from what they report, and only then
//! does the camera rig consume it. A click handled before a tick therefore
//! moves the camera in that same tick.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use keepsake_core::camera::{CameraPose, CameraRig, FocusKind, FocusRequest, OrbitInput, ViewMode};
use keepsake_core::clock::FrameTime;
use keepsake_core::constellation::NeighborGraph;
use keepsake_core::error::SceneResult;
use keepsake_core::interactables::{FocusChange, GiftBox, MemoryField};
use keepsake_core::particles::{FallingSway, FieldShape, ParticleField, ParticleInstance, RisingTumble, Twinkle};
use keepsake_core::transform::Transform;

use crate::config::SceneConfig;
use crate::render::{FieldKind, RenderSink};

/// Height of the pointer-following light above the scene plane.
const POINTER_LIGHT_Z: f32 = 10.0;

/// Visible area in world units until the first [`SceneInput::Resize`].
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(16.0, 9.0);

/// Addressable scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractableId {
    GiftBox,
    MemoryCard(usize),
}

/// Input events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneInput {
    /// The user dismissed the start overlay. Latches.
    Start,
    /// Pointer click on an interactable
    Activate(InteractableId),
    /// "Yes" on the gift box prompt
    Confirm,
    /// "No" on the gift box prompt
    Cancel,
    Hover(InteractableId, bool),
    Orbit(OrbitInput),
    /// Pointer position in normalized device coordinates
    Pointer(Vec2),
    /// Visible area in world units
    Resize(Vec2),
    /// Return any focused memory card to its slot
    Deselect,
}

/// A focus change together with its position in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub sequence: u64,
    pub change: FocusChange,
}

/// Both interactables asked for the camera; `winner` was requested last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusConflict {
    pub winner: FocusKind,
    pub loser: FocusKind,
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: FrameTime,
    pub mode: ViewMode,
    pub camera: CameraPose,
    pub active_focus: Option<FocusKind>,
    pub focus_conflict: Option<FocusConflict>,
    /// Some interactable is still moving toward its target
    pub animating: bool,
}

pub struct Scene {
    camera: CameraRig,
    gift_box: GiftBox,
    memories: MemoryField,
    starfield: ParticleField<Twinkle>,
    sparkles: ParticleField<Twinkle>,
    petals: ParticleField<FallingSway>,
    hearts: ParticleField<RisingTumble>,
    constellation: NeighborGraph,
    segments: Vec<(Vec3, Vec3)>,
    card_transforms: Vec<Transform>,
    started: bool,
    pointer: Vec2,
    viewport: Vec2,
    sequence: u64,
    /// Sequence number of the request that made each kind active
    focus_stamps: HashMap<FocusKind, u64>,
    conflict: Option<FocusConflict>,
    elapsed: f32,
}

/// Per-field seed derived from the scene seed.
fn field_seed(seed: u64, kind: FieldKind) -> u64 {
    seed ^ (kind.index() as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

impl Scene {
    pub fn new(config: &SceneConfig) -> SceneResult<Self> {
        config.validate()?;

        let seed = config.seed;
        let starfield = ParticleField::new(
            config.starfield.motion.clone(),
            config.starfield.shape(),
            field_seed(seed, FieldKind::Starfield),
        )?;
        let sparkles = ParticleField::new(
            config.sparkles.motion.clone(),
            config.sparkles.shape(),
            field_seed(seed, FieldKind::Sparkles),
        )?;
        let petals = ParticleField::new(
            config.petals.motion.clone(),
            config.petals.shape(),
            field_seed(seed, FieldKind::Petals),
        )?;
        let hearts = ParticleField::new(
            config.hearts.motion.clone(),
            config.hearts.shape(),
            field_seed(seed, FieldKind::Hearts),
        )?;

        let memories = MemoryField::new(config.memories.clone())?;
        let slots = memories.slot_positions();
        let constellation = NeighborGraph::build(&slots, config.constellation.neighbors)?;
        let segments = constellation.segments(&slots);
        let card_transforms = memories.transforms().collect();

        log::info!(
            "scene ready: {} stars, {} sparkles, {} petals, {} hearts, {} cards, {} constellation lines",
            starfield.len(),
            sparkles.len(),
            petals.len(),
            hearts.len(),
            memories.len(),
            segments.len()
        );

        Ok(Self {
            camera: CameraRig::new(config.camera.clone())?,
            gift_box: GiftBox::new(config.gift_box.clone())?,
            memories,
            starfield,
            sparkles,
            petals,
            hearts,
            constellation,
            segments,
            card_transforms,
            started: false,
            pointer: Vec2::ZERO,
            viewport: DEFAULT_VIEWPORT,
            sequence: 0,
            focus_stamps: HashMap::new(),
            conflict: None,
            elapsed: 0.0,
        })
    }

    /// Route one input event. Returns the focus change it caused, if any.
    pub fn handle(&mut self, input: SceneInput) -> SceneResult<Option<FocusEvent>> {
        let change = match input {
            SceneInput::Start => {
                if !self.started {
                    log::info!("session started");
                    self.started = true;
                }
                None
            }
            SceneInput::Activate(InteractableId::GiftBox) => self.gift_box.activate(),
            SceneInput::Activate(InteractableId::MemoryCard(index)) => self.memories.select(index)?,
            SceneInput::Confirm => self.gift_box.confirm(),
            SceneInput::Cancel => {
                self.gift_box.cancel();
                None
            }
            SceneInput::Hover(InteractableId::GiftBox, hovered) => {
                self.gift_box.set_hovered(hovered);
                None
            }
            SceneInput::Hover(InteractableId::MemoryCard(index), hovered) => {
                self.memories.set_hovered(index, hovered)?;
                None
            }
            SceneInput::Orbit(orbit) => {
                self.camera.orbit(orbit);
                None
            }
            SceneInput::Pointer(ndc) => {
                self.pointer = ndc;
                None
            }
            SceneInput::Resize(viewport) => {
                self.viewport = viewport;
                None
            }
            SceneInput::Deselect => self.memories.deselect(),
        };

        Ok(change.map(|change| self.stamp(change)))
    }

    /// Advance every component by one frame.
    pub fn tick(&mut self, frame: FrameTime) -> TickReport {
        self.elapsed = frame.elapsed();

        self.starfield.step(frame);
        self.sparkles.step(frame);
        self.petals.step(frame);
        self.hearts.step(frame);

        let mut animating = self.gift_box.update(frame);
        animating |= self.memories.update(frame);
        self.card_transforms.clear();
        self.card_transforms.extend(self.memories.transforms());

        let (active_focus, focus_conflict) = self.resolve_focus();
        let camera = self
            .camera
            .update(frame, self.started, active_focus.map(FocusRequest::new));

        TickReport {
            frame,
            mode: self.camera.mode(),
            camera,
            active_focus,
            focus_conflict,
            animating,
        }
    }

    /// Push the current frame to the renderer.
    pub fn apply<S: RenderSink>(&self, sink: &mut S) {
        sink.camera(self.camera.pose());
        for kind in FieldKind::ALL {
            sink.particles(kind, self.field_instances(kind));
        }
        sink.gift_box(&self.gift_box.pose(self.elapsed));
        sink.memory_cards(&self.card_transforms);
        sink.constellation(&self.segments);
        sink.pointer_light(self.pointer_light());
    }

    /// Change a particle field's count or shell. Returns `true` when the
    /// field was regenerated.
    pub fn reshape_field(&mut self, kind: FieldKind, shape: FieldShape) -> SceneResult<bool> {
        let regenerated = match kind {
            FieldKind::Starfield => self.starfield.reconfigure(shape)?,
            FieldKind::Sparkles => self.sparkles.reconfigure(shape)?,
            FieldKind::Petals => self.petals.reconfigure(shape)?,
            FieldKind::Hearts => self.hearts.reconfigure(shape)?,
        };
        Ok(regenerated)
    }

    pub fn field_instances(&self, kind: FieldKind) -> &[ParticleInstance] {
        match kind {
            FieldKind::Starfield => self.starfield.instances(),
            FieldKind::Sparkles => self.sparkles.instances(),
            FieldKind::Petals => self.petals.instances(),
            FieldKind::Hearts => self.hearts.instances(),
        }
    }

    /// Light position under the pointer.
    pub fn pointer_light(&self) -> Vec3 {
        Vec3::new(
            self.pointer.x * self.viewport.x / 2.0,
            self.pointer.y * self.viewport.y / 2.0,
            POINTER_LIGHT_Z,
        )
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn gift_box(&self) -> &GiftBox {
        &self.gift_box
    }

    pub fn memories(&self) -> &MemoryField {
        &self.memories
    }

    pub fn constellation(&self) -> &NeighborGraph {
        &self.constellation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    fn stamp(&mut self, change: FocusChange) -> FocusEvent {
        self.sequence += 1;
        match change {
            FocusChange::Requested(kind) => {
                self.focus_stamps.insert(kind, self.sequence);
            }
            FocusChange::Released(kind) => {
                self.focus_stamps.remove(&kind);
            }
        }
        log::debug!("focus #{}: {:?}", self.sequence, change);
        FocusEvent {
            sequence: self.sequence,
            change,
        }
    }

    /// Pick the focus the camera should follow. The most recent request wins
    /// when both interactables are expanded.
    fn resolve_focus(&mut self) -> (Option<FocusKind>, Option<FocusConflict>) {
        let gift = self.gift_box.focus_request();
        let memory = self.memories.focus_request();

        let conflict = match (gift, memory) {
            (Some(a), Some(b)) => {
                let stamp = |kind| self.focus_stamps.get(&kind).copied().unwrap_or(0);
                let (winner, loser) = if stamp(a) >= stamp(b) { (a, b) } else { (b, a) };
                Some(FocusConflict { winner, loser })
            }
            _ => None,
        };

        if conflict != self.conflict {
            if let Some(c) = conflict {
                log::warn!("{:?} and {:?} both request focus; following {:?}", c.winner, c.loser, c.winner);
            }
            self.conflict = conflict;
        }

        match conflict {
            Some(c) => (Some(c.winner), conflict),
            None => (gift.or(memory), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_core::interactables::{CardState, GiftBoxState};

    const DT: f32 = 1.0 / 60.0;

    struct Driver {
        scene: Scene,
        frame: u32,
    }

    impl Driver {
        fn new() -> Self {
            Self {
                scene: Scene::new(&SceneConfig::default()).unwrap(),
                frame: 0,
            }
        }

        fn tick(&mut self) -> TickReport {
            self.frame += 1;
            let frame = FrameTime::new(self.frame as f32 * DT, DT).unwrap();
            self.scene.tick(frame)
        }

        fn run(&mut self, frames: u32) -> TickReport {
            let mut report = self.tick();
            for _ in 1..frames {
                report = self.tick();
            }
            report
        }

        fn settle(&mut self) -> TickReport {
            let mut report = self.tick();
            let mut guard = 0;
            while report.animating {
                report = self.tick();
                guard += 1;
                assert!(guard < 10_000, "interactables never settled");
            }
            report
        }
    }

    #[test]
    fn test_waiting_until_started() {
        let mut driver = Driver::new();
        let report = driver.run(30);
        assert_eq!(report.mode, ViewMode::Waiting);

        driver.scene.handle(SceneInput::Start).unwrap();
        let report = driver.tick();
        assert_eq!(report.mode, ViewMode::Entering);
    }

    #[test]
    fn test_gift_focus_same_tick() {
        let mut driver = Driver::new();
        driver.scene.handle(SceneInput::Start).unwrap();
        driver.run(600);
        assert!(driver.scene.camera().is_fly_in_complete());

        assert_eq!(driver.scene.handle(SceneInput::Activate(InteractableId::GiftBox)).unwrap(), None);
        let event = driver.scene.handle(SceneInput::Confirm).unwrap().unwrap();
        assert_eq!(event.change, FocusChange::Requested(FocusKind::Gift));

        let report = driver.tick();
        assert_eq!(report.mode, ViewMode::Focused(FocusKind::Gift));
        assert_eq!(report.active_focus, Some(FocusKind::Gift));
        assert!(driver.scene.camera().saved_pose().is_some());
    }

    #[test]
    fn test_focus_conflict_prefers_latest() {
        let mut driver = Driver::new();
        driver.scene.handle(SceneInput::Start).unwrap();
        driver.run(600);

        driver.scene.handle(SceneInput::Activate(InteractableId::GiftBox)).unwrap();
        let gift = driver.scene.handle(SceneInput::Confirm).unwrap().unwrap();
        driver.settle();

        let memory = driver
            .scene
            .handle(SceneInput::Activate(InteractableId::MemoryCard(4)))
            .unwrap()
            .unwrap();
        assert!(memory.sequence > gift.sequence);

        let report = driver.tick();
        assert_eq!(report.active_focus, Some(FocusKind::Memory));
        assert_eq!(
            report.focus_conflict,
            Some(FocusConflict {
                winner: FocusKind::Memory,
                loser: FocusKind::Gift
            })
        );

        // Releasing the memory hands the camera back to the still-open gift.
        driver.scene.handle(SceneInput::Deselect).unwrap();
        let report = driver.tick();
        assert_eq!(report.active_focus, Some(FocusKind::Gift));
        assert_eq!(report.focus_conflict, None);
    }

    #[test]
    fn test_unknown_card_is_an_error() {
        let mut driver = Driver::new();
        assert!(driver
            .scene
            .handle(SceneInput::Activate(InteractableId::MemoryCard(99)))
            .is_err());
        assert!(driver
            .scene
            .handle(SceneInput::Hover(InteractableId::MemoryCard(10), true))
            .is_err());
    }

    #[test]
    fn test_card_selection_through_scene() {
        let mut driver = Driver::new();
        driver.scene.handle(SceneInput::Activate(InteractableId::MemoryCard(3))).unwrap();
        driver.scene.handle(SceneInput::Activate(InteractableId::MemoryCard(5))).unwrap();
        driver.settle();

        let memories = driver.scene.memories();
        assert_eq!(memories.card_state(3), Some(CardState::Orbiting));
        assert_eq!(memories.card_state(5), Some(CardState::Focused));
        assert_eq!(driver.scene.gift_box().state(), GiftBoxState::Closed);
    }

    #[test]
    fn test_pointer_light_follows_viewport() {
        let mut driver = Driver::new();
        driver.scene.handle(SceneInput::Pointer(Vec2::new(0.5, -1.0))).unwrap();
        assert_eq!(driver.scene.pointer_light(), Vec3::new(4.0, -4.5, 10.0));

        driver.scene.handle(SceneInput::Resize(Vec2::new(10.0, 6.0))).unwrap();
        assert_eq!(driver.scene.pointer_light(), Vec3::new(2.5, -3.0, 10.0));
    }

    #[test]
    fn test_reshape_field_memoized() {
        let mut driver = Driver::new();
        let shape = SceneConfig::default().petals.shape();
        assert!(!driver.scene.reshape_field(FieldKind::Petals, shape).unwrap());
        assert!(driver
            .scene
            .reshape_field(FieldKind::Petals, FieldShape::new(5, 1.0, 2.0))
            .unwrap());
        driver.tick();
        assert_eq!(driver.scene.field_instances(FieldKind::Petals).len(), 5);
    }

    #[test]
    fn test_field_seeds_differ() {
        let seeds: Vec<u64> = FieldKind::ALL.iter().map(|&k| field_seed(42, k)).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
