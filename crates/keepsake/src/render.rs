//! Boundary between scene state and whatever draws it.
//!
//! [`crate::scene::Scene::apply`] pushes one frame into a [`RenderSink`]. The
//! GPU-facing types here are plain `bytemuck::Pod` structs ready for a vertex
//! buffer upload.

use glam::{Mat4, Vec3};
use keepsake_core::camera::CameraPose;
use keepsake_core::interactables::GiftBoxPose;
use keepsake_core::particles::ParticleInstance;
use keepsake_core::transform::Transform;

/// Particle field identity, used to pick mesh and material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Starfield,
    Sparkles,
    Petals,
    Hearts,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Starfield,
        FieldKind::Sparkles,
        FieldKind::Petals,
        FieldKind::Hearts,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Receives one frame of scene output.
pub trait RenderSink {
    fn camera(&mut self, pose: CameraPose);
    fn particles(&mut self, kind: FieldKind, instances: &[ParticleInstance]);
    fn gift_box(&mut self, pose: &GiftBoxPose);
    fn memory_cards(&mut self, transforms: &[Transform]);
    fn constellation(&mut self, segments: &[(Vec3, Vec3)]);
    fn pointer_light(&mut self, position: Vec3);
}

/// Per-instance vertex data
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    pub intensity: f32,
    pub palette_index: u32,
    _padding: [u32; 2],
}

impl InstanceRaw {
    pub fn from_transform(transform: &Transform, intensity: f32, palette_index: u32) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
            intensity,
            palette_index,
            _padding: [0; 2],
        }
    }
}

impl From<&ParticleInstance> for InstanceRaw {
    fn from(instance: &ParticleInstance) -> Self {
        Self::from_transform(&instance.transform, instance.intensity, instance.palette_index)
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    /// World-space eye position, w unused
    pub eye: [f32; 4],
}

impl From<CameraPose> for CameraUniform {
    fn from(pose: CameraPose) -> Self {
        Self {
            view: Mat4::look_at_rh(pose.position, pose.look_at, Vec3::Y).to_cols_array_2d(),
            eye: pose.position.extend(1.0).to_array(),
        }
    }
}

/// Packs particle instances for upload, reusing its allocation.
#[derive(Debug, Default)]
pub struct InstanceBuffer {
    data: Vec<InstanceRaw>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, instances: &[ParticleInstance]) {
        self.data.clear();
        self.data.extend(instances.iter().map(InstanceRaw::from));
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.data
    }

    /// Raw bytes for a vertex buffer write
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Counts what each frame submitted (headless driver, tests)
#[derive(Debug, Default)]
pub struct FrameStats {
    pub frames: u64,
    pub camera: Option<CameraPose>,
    pub camera_uniform: Option<CameraUniform>,
    /// Instance count per [`FieldKind`], last frame
    pub particles: [usize; 4],
    /// Bytes packed for all fields, last frame
    pub particle_bytes: usize,
    pub gift_box: Option<GiftBoxPose>,
    pub memory_cards: Vec<Transform>,
    pub constellation_segments: usize,
    pub pointer_light: Option<Vec3>,
    buffers: [InstanceBuffer; 4],
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_particles(&self) -> usize {
        self.particles.iter().sum()
    }

    pub fn buffer(&self, kind: FieldKind) -> &InstanceBuffer {
        &self.buffers[kind.index()]
    }
}

impl RenderSink for FrameStats {
    fn camera(&mut self, pose: CameraPose) {
        // Camera is always submitted first.
        self.frames += 1;
        self.particle_bytes = 0;
        self.camera = Some(pose);
        self.camera_uniform = Some(pose.into());
    }

    fn particles(&mut self, kind: FieldKind, instances: &[ParticleInstance]) {
        let buffer = &mut self.buffers[kind.index()];
        buffer.fill(instances);
        self.particles[kind.index()] = buffer.len();
        self.particle_bytes += buffer.bytes().len();
    }

    fn gift_box(&mut self, pose: &GiftBoxPose) {
        self.gift_box = Some(*pose);
    }

    fn memory_cards(&mut self, transforms: &[Transform]) {
        self.memory_cards.clear();
        self.memory_cards.extend_from_slice(transforms);
    }

    fn constellation(&mut self, segments: &[(Vec3, Vec3)]) {
        self.constellation_segments = segments.len();
    }

    fn pointer_light(&mut self, position: Vec3) {
        self.pointer_light = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_instance_raw_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn test_instance_buffer_bytes() {
        let instance = ParticleInstance {
            transform: Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
                .with_rotation(Quat::from_rotation_y(0.5))
                .with_scale(2.0),
            intensity: 0.25,
            palette_index: 3,
        };
        let mut buffer = InstanceBuffer::new();
        buffer.fill(&[instance, instance]);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.bytes().len(), 160);

        let raw = buffer.instances()[0];
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.intensity, 0.25);
        assert_eq!(raw.palette_index, 3);

        buffer.fill(&[]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_camera_uniform_view() {
        let pose = CameraPose::looking_at_origin(Vec3::new(0.0, 0.0, 15.0));
        let uniform = CameraUniform::from(pose);
        let view = Mat4::from_cols_array_2d(&uniform.view);
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert!((origin_in_view - Vec3::new(0.0, 0.0, -15.0)).length() < 1e-4);
        assert_eq!(uniform.eye, [0.0, 0.0, 15.0, 1.0]);
    }
}
