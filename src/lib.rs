//! # Sphere Streams
//!
//! Two opposing streams of GPU-instanced spheres flowing along a helical
//! curve, with a shared motion model evaluated on the host and in WGSL.
//!
//! Each sphere's motion is fixed at spawn by a handful of random
//! parameters. Per frame the only inputs are the elapsed time and a few
//! uniforms, so the vertex shader can place every instance without any
//! per-frame buffer writes. The same formula lives in [`motion`] for
//! bounds, visibility and tests.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sphere_streams::prelude::*;
//!
//! let config = SceneConfig::default();
//! sphere_streams::run(config)?;
//! ```
//!
//! Without a window, the scene runs entirely on the host:
//!
//! ```ignore
//! use rand::SeedableRng;
//! use sphere_streams::prelude::*;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut scene = Scene::new(SceneConfig::default())?;
//! scene.restart(&mut rng);
//! scene.update(1.5)?;
//! println!("{} visible", scene.visible_count());
//! ```
//!
//! ## Core Concepts
//!
//! ### Streams
//!
//! A [`ParticleStream`] owns `n_instances` particles and registers one
//! instance per particle in a shared [`RenderContainer`]. Its
//! [`Direction`] signs the elapsed time, so the bottom stream runs the
//! curve backwards.
//!
//! ### Motion
//!
//! Progress wraps into `[0, 1)`. Position follows a helix along `z`,
//! blended towards a fixed end position by `hold`. Scale peaks at the
//! middle of the curve and vanishes at both ends.
//!
//! ### Rendering
//!
//! The [`gpu::Renderer`] uploads the container when its revision changes
//! and otherwise only writes the frame uniforms. [`gpu::MotionProbe`] runs
//! the WGSL motion model in a compute pass for host/GPU comparison.

pub mod app;
pub mod config;
pub mod container;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod motion;
pub mod particle;
pub mod scene;
pub mod shader;
pub mod stream;
pub mod time;

pub use app::run;
pub use config::{derived_scale, Rgb, SceneConfig, StreamConfig};
pub use container::{InstanceHandle, RenderContainer};
pub use error::{ConfigError, GpuError, RunError};
pub use geometry::InstanceShape;
pub use glam::{Vec2, Vec3};
pub use motion::{MotionParams, MotionSample};
pub use particle::{Particle, SphereInstance, SphereTransform};
pub use scene::{FrameUniforms, Scene};
pub use stream::{Direction, ParticleStream};

/// Common imports.
///
/// ```ignore
/// use sphere_streams::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{SceneConfig, StreamConfig};
    pub use crate::container::RenderContainer;
    pub use crate::error::{ConfigError, GpuError, RunError};
    pub use crate::motion::MotionParams;
    pub use crate::scene::Scene;
    pub use crate::stream::{Direction, ParticleStream};
    pub use glam::{Vec2, Vec3};
}
