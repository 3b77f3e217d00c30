//! WGSL sources for the sphere renderer and the motion probe.
//!
//! [`MOTION_WGSL`] is the GPU form of [`crate::motion`]. Keep the two in
//! step: any change to one side needs the same change on the other, and
//! `tests/motion_agreement.rs` will catch a mismatch on hardware.
//!
//! The constants the formulas use are not written in WGSL at all. They are
//! emitted from the Rust values by [`motion_constants_wgsl`].

use crate::motion::{CURVE_WAVE_AMPLITUDE, POINTER_GAIN, POINTER_RADIUS};

/// WGSL `const` declarations for the motion model, generated from the Rust constants.
///
/// `{:?}` prints the shortest literal that round-trips to the same `f32`,
/// so the shader sees the exact host values.
pub fn motion_constants_wgsl() -> String {
    format!(
        "const PI: f32 = {:?};\n\
         const CURVE_WAVE_AMPLITUDE: f32 = {:?};\n\
         const POINTER_RADIUS: f32 = {:?};\n\
         const POINTER_GAIN: f32 = {:?};\n",
        std::f32::consts::PI,
        CURVE_WAVE_AMPLITUDE,
        POINTER_RADIUS,
        POINTER_GAIN,
    )
}

/// Motion model functions shared by the vertex shader and the probe.
pub const MOTION_WGSL: &str = r#"
// Floored modulo into [0, 1); a result that rounds up to 1.0 folds to 0.0
fn wrap_unit(x: f32) -> f32 {
    let wrapped = x - floor(x);
    return select(wrapped, 0.0, wrapped >= 1.0);
}

fn progress_at(progress0: f32, time: f32, speed: f32) -> f32 {
    return wrap_unit(progress0 + time * speed);
}

fn curve_position(
    progress: f32,
    radius: f32,
    offset: f32,
    rotation_frequency: f32,
    long_length: f32,
) -> vec3<f32> {
    let angle = progress * PI * rotation_frequency;
    let x = cos(angle) * radius;
    let y = sin(angle) * radius + sin(progress * PI * 2.0) * CURVE_WAVE_AMPLITUDE;
    let z = progress * long_length - long_length / 2.0 + offset;
    return vec3<f32>(x, y, z);
}

fn blend_to_end(curve: vec3<f32>, end_position: vec3<f32>, hold: f32) -> vec3<f32> {
    return curve * (1.0 - hold) + end_position * hold;
}

fn envelope(progress: f32) -> f32 {
    return 1.0 - abs(progress - 0.5) * 2.0;
}

fn pointer_magnification(distance: f32) -> f32 {
    if distance < POINTER_RADIUS {
        return 1.0 + (1.0 - distance / POINTER_RADIUS) * POINTER_GAIN;
    }
    return 1.0;
}
"#;

/// Frame uniforms. Must match `gpu::Uniforms` byte for byte.
pub const UNIFORMS_WGSL: &str = r#"
struct StreamUniforms {
    model: mat4x4<f32>,
    time_sign: f32,
    pad0: f32,
    pad1: f32,
    pad2: f32,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    pointer: vec2<f32>,
    time: f32,
    hold: f32,
    streams: array<StreamUniforms, 2>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

/// Instanced sphere vertex and fragment stages.
pub const SPHERES_WGSL: &str = r#"
struct VertexInput {
    @location(0) mesh_position: vec3<f32>,
    // radius, progress0, offset, speed
    @location(1) motion: vec4<f32>,
    // rotation_frequency, long_length, scale_factor
    @location(2) curve: vec4<f32>,
    @location(3) end_position: vec4<f32>,
    @location(4) color: vec4<f32>,
    @location(5) stream_index: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let stream_data = uniforms.streams[in.stream_index];
    let time = uniforms.time * stream_data.time_sign;

    let progress = progress_at(in.motion.y, time, in.motion.w);
    let curve = curve_position(progress, in.motion.x, in.motion.z, in.curve.x, in.curve.y);
    let center = blend_to_end(curve, in.end_position.xyz, uniforms.hold);

    // Pointer proximity scales the mesh only, never the center
    let mvp = uniforms.view_proj * stream_data.model;
    let center_clip = mvp * vec4<f32>(center, 1.0);
    let center_ndc = center_clip.xy / center_clip.w;
    let magnify = pointer_magnification(length(uniforms.pointer - center_ndc));

    let scale = envelope(progress) * in.curve.z;
    let vertex_offset = in.mesh_position * magnify * scale;

    var out: VertexOutput;
    out.clip_position = mvp * vec4<f32>(vertex_offset + center, 1.0);
    out.color = in.color.rgb;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Compute entry point evaluating steps 1–4 for a batch of inputs.
pub const PROBE_WGSL: &str = r#"
struct ProbeInput {
    motion: vec4<f32>,
    curve: vec4<f32>,
    end_position: vec4<f32>,
    // x = time, y = hold
    time_hold: vec4<f32>,
};

struct ProbeOutput {
    position: vec3<f32>,
    progress: f32,
    scale: f32,
    pad0: f32,
    pad1: f32,
    pad2: f32,
};

@group(0) @binding(0)
var<storage, read> inputs: array<ProbeInput>;

@group(0) @binding(1)
var<storage, read_write> outputs: array<ProbeOutput>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let index = global_id.x;
    if index >= arrayLength(&inputs) {
        return;
    }

    let p = inputs[index];
    let progress = progress_at(p.motion.y, p.time_hold.x, p.motion.w);
    let curve = curve_position(progress, p.motion.x, p.motion.z, p.curve.x, p.curve.y);

    var out: ProbeOutput;
    out.position = blend_to_end(curve, p.end_position.xyz, p.time_hold.y);
    out.progress = progress;
    out.scale = envelope(progress) * p.curve.z;
    outputs[index] = out;
}
"#;

/// Full render shader source.
pub fn render_shader() -> String {
    format!(
        "{}{}{}{}",
        motion_constants_wgsl(),
        MOTION_WGSL,
        UNIFORMS_WGSL,
        SPHERES_WGSL
    )
}

/// Full probe shader source.
pub fn probe_shader() -> String {
    format!("{}{}{}", motion_constants_wgsl(), MOTION_WGSL, PROBE_WGSL)
}
