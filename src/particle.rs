//! Per-sphere state and its GPU instance layout.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::container::InstanceHandle;
use crate::motion::{self, MotionParams, MotionSample, LONG_LENGTH, ROTATION_FREQUENCY};

/// Size of the end formation. Anchors sit `END_SIZE / 2` above and below the axis.
pub const END_SIZE: f32 = 20.0;

/// Half width of the jitter square around an anchor.
pub const END_JITTER: f32 = END_SIZE / 20.0;

/// The two terminal anchors. Index 0 goes with the first stream color.
pub const ANCHORS: [Vec3; 2] = [
    Vec3::new(0.0, END_SIZE / 2.0, 0.0),
    Vec3::new(0.0, -END_SIZE / 2.0, -END_SIZE),
];

/// Live transform written by each update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereTransform {
    pub position: Vec3,
    pub scale: f32,
}

impl From<MotionSample> for SphereTransform {
    fn from(sample: MotionSample) -> Self {
        Self {
            position: sample.position,
            scale: sample.scale,
        }
    }
}

/// One sphere in a stream.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Static motion inputs, sampled once at init.
    pub params: MotionParams,
    /// Which of the stream's two colors (and which anchor) this sphere uses.
    pub color_index: usize,
    /// Latest host-side evaluation.
    pub transform: SphereTransform,
    pub(crate) handle: InstanceHandle,
}

impl Particle {
    /// Draw a sphere's random parameters.
    ///
    /// `sign` is the stream direction (+1 or -1); the initial phase takes
    /// its sign.
    pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, sign: f32, scale_factor: f32) -> (MotionParams, usize) {
        let radius = rng.gen_range(30.0..40.0);
        let progress0 = rng.gen::<f32>() * sign;
        let offset = rng.gen_range(-5.0..5.0);
        let speed = rng.gen_range(0.02..0.07);

        let color_index = rng.gen_range(0..ANCHORS.len());
        let jitter = Vec3::new(
            rng.gen_range(-END_JITTER..END_JITTER),
            rng.gen_range(-END_JITTER..END_JITTER),
            rng.gen_range(0.0..END_JITTER),
        );

        let params = MotionParams {
            progress0,
            speed,
            radius,
            offset,
            rotation_frequency: ROTATION_FREQUENCY,
            long_length: LONG_LENGTH,
            end_position: ANCHORS[color_index] + jitter,
            scale_factor,
        };
        (params, color_index)
    }

    pub(crate) fn new(params: MotionParams, color_index: usize, handle: InstanceHandle) -> Self {
        Self {
            transform: motion::evaluate(&params, 0.0, 0.0).into(),
            params,
            color_index,
            handle,
        }
    }

    /// Membership handle in the render container.
    pub fn handle(&self) -> InstanceHandle {
        self.handle
    }

    /// Anchor this sphere's end position was jittered from.
    pub fn anchor(&self) -> Vec3 {
        ANCHORS[self.color_index]
    }
}

/// Per-instance vertex data uploaded to the GPU.
///
/// Locations 1–5 in the sphere vertex shader. Static for the lifetime of a
/// particle; the shader derives motion from these plus the frame uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    /// radius, progress0, offset, speed
    pub motion: [f32; 4],
    /// rotation_frequency, long_length, scale_factor, unused
    pub curve: [f32; 4],
    /// xyz = end position
    pub end_position: [f32; 4],
    /// rgb = linear color
    pub color: [f32; 4],
    /// Index into the per-stream uniforms.
    pub stream: u32,
    pub _pad: [u32; 3],
}

impl SphereInstance {
    pub fn new(params: &MotionParams, color: [f32; 3], stream: u32) -> Self {
        Self {
            motion: [params.radius, params.progress0, params.offset, params.speed],
            curve: [params.rotation_frequency, params.long_length, params.scale_factor, 0.0],
            end_position: params.end_position.extend(0.0).to_array(),
            color: [color[0], color[1], color[2], 1.0],
            stream,
            _pad: [0; 3],
        }
    }
}
