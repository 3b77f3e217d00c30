//! The two-stream scene.
//!
//! Owns the forward ("top") and backward ("bottom") streams, the render
//! container they share, and the per-frame values the vertex shader reads.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::Rng;

use crate::config::SceneConfig;
use crate::container::RenderContainer;
use crate::error::ConfigError;
use crate::stream::{Direction, ParticleStream};

/// Pointer position used while nothing has been forwarded. Far outside
/// NDC so no sphere is magnified.
pub const POINTER_PARKED: Vec2 = Vec2::new(1.0e4, 1.0e4);

/// Values shared by every vertex in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Elapsed seconds, before the per-stream direction sign.
    pub time: f32,
    /// Blend toward the end formation, 0 = on the curve.
    pub hold: f32,
    /// Pointer in NDC.
    pub pointer: Vec2,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            hold: 0.0,
            pointer: POINTER_PARKED,
        }
    }
}

/// Where a stream sits in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPlacement {
    /// XYZ Euler rotation in radians.
    pub rotation: Vec3,
    pub translation: Vec3,
}

impl StreamPlacement {
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self {
                rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
                translation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            },
            Direction::Backward => Self {
                rotation: Vec3::new(PI, FRAC_PI_2, 0.0),
                translation: Vec3::new(200.0, 0.0, 0.0),
            },
        }
    }

    /// Stream-to-world transform.
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_rotation_translation(rotation, self.translation)
    }
}

/// Both streams plus the shared state they render through.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    container: RenderContainer,
    top: ParticleStream,
    bottom: ParticleStream,
    uniforms: FrameUniforms,
}

impl Scene {
    /// Build an empty scene. Call [`restart`](Self::restart) to populate.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            top: ParticleStream::new(config.stream(Direction::Forward))?,
            bottom: ParticleStream::new(config.stream(Direction::Backward))?,
            container: RenderContainer::new(),
            uniforms: FrameUniforms::default(),
            config,
        })
    }

    /// Swap in a new config and rebuild both streams with fresh particles.
    pub fn reconfigure<R: Rng + ?Sized>(
        &mut self,
        config: SceneConfig,
        rng: &mut R,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        let top = ParticleStream::new(config.stream(Direction::Forward))?;
        let bottom = ParticleStream::new(config.stream(Direction::Backward))?;

        self.top.clean(&mut self.container);
        self.bottom.clean(&mut self.container);
        self.top = top;
        self.bottom = bottom;
        self.config = config;
        self.restart(rng);
        Ok(())
    }

    /// Full clean + init of both streams.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.top.clean(&mut self.container);
        self.bottom.clean(&mut self.container);
        self.top.init(rng, &mut self.container);
        self.bottom.init(rng, &mut self.container);

        tracing::info!(
            per_stream = self.config.n_instances,
            total = self.container.len(),
            use_cube = self.config.use_cube,
            "scene restarted"
        );
    }

    /// Advance both streams to `elapsed_time`. The bottom stream runs on `-t`.
    pub fn update(&mut self, elapsed_time: f32) -> Result<(), ConfigError> {
        self.top.update(self.top.direction().apply(elapsed_time))?;
        self.bottom.update(self.bottom.direction().apply(elapsed_time))?;
        self.uniforms.time = elapsed_time;
        Ok(())
    }

    /// Pointer moved to `ndc`. Forwarded only when pointer tracking is on.
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        if self.config.pointer_tracking {
            self.top.on_pointer_move(ndc, &mut self.uniforms);
            self.bottom.on_pointer_move(ndc, &mut self.uniforms);
        }
    }

    /// Set the blend toward the end formation. Nothing in the app drives this.
    ///
    /// Only the shader sees it. Host transforms stay on the curve, so
    /// [`ParticleStream::bounds`] and [`visible_count`](Self::visible_count)
    /// describe the hold-0 positions whatever this is set to.
    pub fn set_hold(&mut self, hold: f32) {
        self.uniforms.hold = hold.clamp(0.0, 1.0);
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn container(&self) -> &RenderContainer {
        &self.container
    }

    pub fn uniforms(&self) -> FrameUniforms {
        self.uniforms
    }

    pub fn top(&self) -> &ParticleStream {
        &self.top
    }

    pub fn bottom(&self) -> &ParticleStream {
        &self.bottom
    }

    pub fn streams(&self) -> [&ParticleStream; 2] {
        [&self.top, &self.bottom]
    }

    /// Spheres with a non-zero scale across both streams.
    pub fn visible_count(&self) -> usize {
        self.top.visible_count() + self.bottom.visible_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(n: u32) -> SceneConfig {
        SceneConfig {
            n_instances: n,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn test_restart_populates_both_streams() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = Scene::new(config(40)).expect("valid");
        assert!(scene.container().is_empty());

        scene.restart(&mut rng);
        assert_eq!(scene.top().len(), 40);
        assert_eq!(scene.bottom().len(), 40);
        assert_eq!(scene.container().len(), 80);

        // Restart replaces rather than appends.
        scene.restart(&mut rng);
        assert_eq!(scene.container().len(), 80);
    }

    #[test]
    fn test_update_runs_bottom_backwards() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut scene = Scene::new(config(10)).expect("valid");
        scene.restart(&mut rng);
        scene.update(4.0).expect("finite");

        for p in scene.bottom().particles() {
            let expected = crate::motion::evaluate(&p.params, -4.0, 0.0);
            assert_eq!(p.transform.position, expected.position);
        }
        for p in scene.top().particles() {
            let expected = crate::motion::evaluate(&p.params, 4.0, 0.0);
            assert_eq!(p.transform.position, expected.position);
        }
        assert_eq!(scene.uniforms().time, 4.0);
        assert!(scene.update(f32::NAN).is_err());
    }

    #[test]
    fn test_reconfigure_changes_count_and_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = Scene::new(config(10)).expect("valid");
        scene.restart(&mut rng);

        scene.reconfigure(config(25_500), &mut rng).expect("valid");
        assert_eq!(scene.container().len(), 51_000);
        assert!((scene.top().config().scale_factor - 0.6).abs() < 1e-6);

        assert!(matches!(
            scene.reconfigure(config(0), &mut rng),
            Err(ConfigError::ZeroInstances)
        ));
        // Rejected config leaves the running scene alone.
        assert_eq!(scene.container().len(), 51_000);
    }

    #[test]
    fn test_pointer_tracking_is_opt_in() {
        let mut scene = Scene::new(config(1)).expect("valid");
        scene.pointer_moved(Vec2::ZERO);
        assert_eq!(scene.uniforms().pointer, POINTER_PARKED);

        let mut scene = Scene::new(SceneConfig {
            pointer_tracking: true,
            ..config(1)
        })
        .expect("valid");
        scene.pointer_moved(Vec2::new(0.1, 0.2));
        assert_eq!(scene.uniforms().pointer, Vec2::new(0.1, 0.2));
    }

    #[test]
    fn test_hold_defaults_to_curve() {
        let mut scene = Scene::new(config(1)).expect("valid");
        assert_eq!(scene.uniforms().hold, 0.0);
        scene.set_hold(3.0);
        assert_eq!(scene.uniforms().hold, 1.0);
    }

    #[test]
    fn test_hold_does_not_move_host_transforms() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = Scene::new(config(30)).expect("valid");
        scene.restart(&mut rng);
        scene.update(2.0).expect("finite");
        let before = scene.top().bounds();

        scene.set_hold(1.0);
        scene.update(2.0).expect("finite");
        assert_eq!(scene.top().bounds(), before);
        for p in scene.top().particles() {
            let on_curve = crate::motion::evaluate(&p.params, 2.0, 0.0);
            assert_eq!(p.transform.position, on_curve.position);
        }
    }

    #[test]
    fn test_placements() {
        let top = StreamPlacement::for_direction(Direction::Forward).model_matrix();
        // Rotating +z by π/2 around y lands on +x.
        let p = top.transform_point3(Vec3::Z);
        assert!((p - Vec3::new(1.0 + FRAC_PI_2, 0.0, 0.0)).length() < 1e-5);

        let bottom = StreamPlacement::for_direction(Direction::Backward).model_matrix();
        let origin = bottom.transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(200.0, 0.0, 0.0));
        // The x flip turns the bottom stream upside down.
        let up = bottom.transform_vector3(Vec3::Y);
        assert!((up - Vec3::NEG_Y).length() < 1e-5);
    }
}
