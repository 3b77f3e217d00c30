//! Closed-form particle motion along the helical stream curve.
//!
//! Every sphere's position is a pure function of its static parameters and
//! the elapsed time. The same math runs in two places:
//!
//! - here on the host, for bookkeeping ([`evaluate`]), and
//! - in WGSL on the GPU, per vertex ([`crate::shader::MOTION_WGSL`]).
//!
//! The WGSL is a hand-kept transliteration of this module. Its constants are
//! generated from the ones below, and the probe test in
//! `tests/motion_agreement.rs` checks that both sides produce the same
//! progress, position and scale.
//!
//! # Steps
//!
//! 1. `progress = wrap(progress0 + time * speed)` with floored modulo
//! 2. curve position from `progress`
//! 3. blend toward the end position by `hold`
//! 4. triangular scale envelope times the stream scale factor
//! 5. pointer magnification of the local geometry (shader only)

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::PI;

/// Amplitude of the slow vertical wave added on top of the orbit.
pub const CURVE_WAVE_AMPLITUDE: f32 = 30.0;

/// NDC distance under which the pointer magnifies a sphere.
pub const POINTER_RADIUS: f32 = 0.4;

/// Extra magnification at zero pointer distance (total factor is `1 + gain`).
pub const POINTER_GAIN: f32 = 6.0;

/// Orbit turns (in half revolutions) over one full progress cycle.
pub const ROTATION_FREQUENCY: f32 = 8.0;

/// Length of the curve along z.
pub const LONG_LENGTH: f32 = 200.0;

/// Static per-sphere inputs to the motion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub progress0: f32,
    pub speed: f32,
    pub radius: f32,
    pub offset: f32,
    pub rotation_frequency: f32,
    pub long_length: f32,
    pub end_position: Vec3,
    pub scale_factor: f32,
}

impl MotionParams {
    /// Parameters with the stream constants filled in.
    pub fn new(progress0: f32, speed: f32, radius: f32, offset: f32, end_position: Vec3) -> Self {
        Self {
            progress0,
            speed,
            radius,
            offset,
            rotation_frequency: ROTATION_FREQUENCY,
            long_length: LONG_LENGTH,
            end_position,
            scale_factor: 1.0,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Result of evaluating steps 1–4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Wrapped phase in `[0, 1)`.
    pub progress: f32,
    /// Blended center position in stream space.
    pub position: Vec3,
    /// Uniform scale, envelope times the stream scale factor.
    pub scale: f32,
}

/// Wrap `x` into `[0, 1)` with floored modulo.
///
/// Negative inputs land at the low end of the interval (`-0.3 -> 0.7`), like
/// GLSL `mod` and unlike Rust's `%`. Tiny negative inputs whose result rounds
/// up to `1.0` fold back to `0.0`.
#[inline]
pub fn wrap_unit(x: f32) -> f32 {
    let wrapped = x - x.floor();
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Step 1.
#[inline]
pub fn progress_at(progress0: f32, elapsed_time: f32, speed: f32) -> f32 {
    wrap_unit(progress0 + elapsed_time * speed)
}

/// Step 2: position on the helical curve.
#[inline]
pub fn curve_position(
    progress: f32,
    radius: f32,
    offset: f32,
    rotation_frequency: f32,
    long_length: f32,
) -> Vec3 {
    let angle = progress * PI * rotation_frequency;
    let x = angle.cos() * radius;
    let y = angle.sin() * radius + (progress * PI * 2.0).sin() * CURVE_WAVE_AMPLITUDE;
    let z = progress * long_length - long_length / 2.0 + offset;
    Vec3::new(x, y, z)
}

/// Step 3: `curve * (1 - hold) + end * hold`, written out to match WGSL `mix`.
#[inline]
pub fn blend_to_end(curve: Vec3, end_position: Vec3, hold: f32) -> Vec3 {
    curve * (1.0 - hold) + end_position * hold
}

/// Step 4 envelope: 0 at both ends of the cycle, 1 in the middle.
#[inline]
pub fn envelope(progress: f32) -> f32 {
    1.0 - (progress - 0.5).abs() * 2.0
}

/// Evaluate steps 1–4 for one sphere.
pub fn evaluate(params: &MotionParams, elapsed_time: f32, hold: f32) -> MotionSample {
    let progress = progress_at(params.progress0, elapsed_time, params.speed);
    let curve = curve_position(
        progress,
        params.radius,
        params.offset,
        params.rotation_frequency,
        params.long_length,
    );
    MotionSample {
        progress,
        position: blend_to_end(curve, params.end_position, hold),
        scale: envelope(progress) * params.scale_factor,
    }
}

/// Project a stream-space position to normalized device coordinates.
///
/// `model_view_proj` is `projection * view * stream_model`.
pub fn project_to_ndc(model_view_proj: Mat4, position: Vec3) -> Vec2 {
    let clip = model_view_proj * position.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

/// Step 5 factor for a given pointer distance in NDC.
#[inline]
pub fn pointer_magnification(distance: f32) -> f32 {
    if distance < POINTER_RADIUS {
        1.0 + (1.0 - distance / POINTER_RADIUS) * POINTER_GAIN
    } else {
        1.0
    }
}

/// Host transliteration of the vertex shader: where a mesh vertex ends up
/// in stream space for a given pointer.
///
/// Only used to check the visual-only path. Bookkeeping reads [`evaluate`].
pub fn vertex_position(
    params: &MotionParams,
    local_vertex: Vec3,
    elapsed_time: f32,
    hold: f32,
    pointer_ndc: Vec2,
    model_view_proj: Mat4,
) -> Vec3 {
    let sample = evaluate(params, elapsed_time, hold);
    let ndc = project_to_ndc(model_view_proj, sample.position);
    let magnified = local_vertex * pointer_magnification((pointer_ndc - ndc).length());
    magnified * sample.scale + sample.position
}
