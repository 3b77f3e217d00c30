//! One directional stream of spheres.
//!
//! A stream owns its particles by value. The only state it shares is the
//! [`RenderContainer`], and it touches that only in [`ParticleStream::init`]
//! and [`ParticleStream::clean`].
//!
//! ```ignore
//! let mut container = RenderContainer::new();
//! let mut stream = ParticleStream::new(StreamConfig::new(1000, Direction::Forward))?;
//! stream.init(&mut rng, &mut container);
//!
//! // every frame
//! stream.update(stream.direction().apply(elapsed))?;
//! ```

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::config::{Rgb, StreamConfig};
use crate::container::RenderContainer;
use crate::error::ConfigError;
use crate::motion;
use crate::particle::{Particle, SphereInstance};
use crate::scene::FrameUniforms;

/// Travel direction of a stream along its curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Phase advances with time (+1).
    Forward,
    /// Phase runs backwards (-1).
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// Direction-adjusted time handed to [`ParticleStream::update`].
    pub fn apply(self, elapsed_time: f32) -> f32 {
        elapsed_time * self.sign()
    }

    /// Slot in the per-stream shader uniforms.
    pub fn slot(self) -> u32 {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
        }
    }
}

/// A group of spheres sharing a direction and a color pair.
#[derive(Debug)]
pub struct ParticleStream {
    config: StreamConfig,
    particles: Vec<Particle>,
}

impl ParticleStream {
    /// Build an empty stream. Call [`init`](Self::init) to populate it.
    pub fn new(config: StreamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
        })
    }

    /// Sample `n_instances` fresh particles and register them with the container.
    ///
    /// Appends to whatever is already live; callers restart with
    /// [`clean`](Self::clean) first.
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R, container: &mut RenderContainer) {
        if !self.particles.is_empty() {
            tracing::warn!(
                direction = ?self.config.direction,
                live = self.particles.len(),
                "init on a populated stream, appending"
            );
        }

        let sign = self.config.direction.sign();
        let slot = self.config.direction.slot();
        self.particles.reserve(self.config.n_instances as usize);

        for _ in 0..self.config.n_instances {
            let (params, color_index) = Particle::sample(rng, sign, self.config.scale_factor);
            let color = self.config.colors[color_index].to_array();
            let handle = container.insert(SphereInstance::new(&params, color, slot));
            self.particles.push(Particle::new(params, color_index, handle));
        }

        tracing::debug!(
            direction = ?self.config.direction,
            count = self.particles.len(),
            scale = self.config.scale_factor,
            "stream initialized"
        );
    }

    /// Drop every particle and its container membership.
    pub fn clean(&mut self, container: &mut RenderContainer) {
        for particle in self.particles.drain(..) {
            if !container.remove(particle.handle) {
                tracing::warn!(handle = ?particle.handle, "particle was not in the container");
            }
        }
    }

    /// Recompute every live transform at `elapsed_time`.
    ///
    /// The time is taken as-is; the caller applies [`Direction::apply`].
    /// The hold blend is always 0 here.
    pub fn update(&mut self, elapsed_time: f32) -> Result<(), ConfigError> {
        if !elapsed_time.is_finite() {
            return Err(ConfigError::NonFiniteTime(elapsed_time));
        }
        for particle in &mut self.particles {
            particle.transform = motion::evaluate(&particle.params, elapsed_time, 0.0).into();
        }
        Ok(())
    }

    /// Forward the pointer position into the shared shader uniform.
    pub fn on_pointer_move(&self, ndc: Vec2, uniforms: &mut FrameUniforms) {
        uniforms.pointer = ndc;
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn colors(&self) -> [Rgb; 2] {
        self.config.colors
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles with a non-zero scale after the last update.
    pub fn visible_count(&self) -> usize {
        self.particles.iter().filter(|p| p.transform.scale > 0.0).count()
    }

    /// Axis-aligned bounds of the live centers, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.particles.iter().map(|p| p.transform.position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ANCHORS, END_JITTER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stream(n: u32, direction: Direction) -> ParticleStream {
        ParticleStream::new(StreamConfig::new(n, direction)).expect("valid config")
    }

    #[test]
    fn test_end_to_end_two_particles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut container = RenderContainer::new();
        let mut s = stream(2, Direction::Forward);

        s.init(&mut rng, &mut container);
        assert_eq!(s.len(), 2);
        assert_eq!(container.len(), 2);
        for p in s.particles() {
            assert!(p.params.progress0 >= 0.0);
        }

        s.update(0.0).expect("finite time");
        for p in s.particles() {
            let expected = p.params.progress0 * 200.0 - 100.0 + p.params.offset;
            assert!((p.transform.position.z - expected).abs() < 1e-4);
        }

        s.clean(&mut container);
        assert!(s.is_empty());
        assert!(container.is_empty());
    }

    #[test]
    fn test_clean_twice_then_init() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut container = RenderContainer::new();
        let mut s = stream(25, Direction::Backward);

        s.clean(&mut container);
        assert!(s.is_empty());

        s.init(&mut rng, &mut container);
        s.clean(&mut container);
        s.clean(&mut container);
        assert!(s.is_empty());
        assert!(container.is_empty());

        s.init(&mut rng, &mut container);
        assert_eq!(s.len(), 25);
        assert_eq!(container.len(), 25);
    }

    #[test]
    fn test_directions_occupy_opposite_halves() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut container = RenderContainer::new();
        let mut top = stream(200, Direction::Forward);
        let mut bottom = stream(200, Direction::Backward);
        top.init(&mut rng, &mut container);
        bottom.init(&mut rng, &mut container);

        assert!(top.particles().iter().all(|p| p.params.progress0 >= 0.0));
        assert!(bottom.particles().iter().all(|p| p.params.progress0 <= 0.0));

        let t = 0.0;
        top.update(top.direction().apply(t)).expect("finite");
        bottom.update(bottom.direction().apply(t)).expect("finite");
        for (s, p) in bottom.particles().iter().map(|p| (p.transform, p)) {
            // Negative phases wrap into [0, 1) before evaluating the curve.
            let progress = motion::wrap_unit(p.params.progress0);
            let z = progress * 200.0 - 100.0 + p.params.offset;
            assert!((s.position.z - z).abs() < 1e-3);
        }
        assert_eq!(container.len(), 400);
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let mut container = RenderContainer::new();
        let mut a = stream(16, Direction::Forward);
        let mut b = stream(16, Direction::Forward);
        a.init(&mut StdRng::seed_from_u64(11), &mut container);
        b.init(&mut StdRng::seed_from_u64(11), &mut container);

        let pa: Vec<_> = a.particles().iter().map(|p| p.params).collect();
        let pb: Vec<_> = b.particles().iter().map(|p| p.params).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_end_positions_near_one_anchor() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut container = RenderContainer::new();
        let mut s = stream(300, Direction::Forward);
        s.init(&mut rng, &mut container);

        for p in s.particles() {
            let near: Vec<_> = ANCHORS
                .iter()
                .filter(|a| (p.params.end_position - **a).abs().max_element() <= END_JITTER)
                .collect();
            assert_eq!(near.len(), 1);
            assert_eq!(*near[0], p.anchor());
        }
    }

    #[test]
    fn test_colors_follow_color_index() {
        let colors = [Rgb(Vec3::X), Rgb(Vec3::Y)];
        let config = StreamConfig::new(50, Direction::Backward).with_colors(colors);
        let mut s = ParticleStream::new(config).expect("valid config");
        let mut container = RenderContainer::new();
        s.init(&mut StdRng::seed_from_u64(5), &mut container);

        for p in s.particles() {
            let inst = container.get(p.handle()).expect("registered");
            assert_eq!(&inst.color[..3], &colors[p.color_index].to_array()[..]);
            assert_eq!(inst.stream, 1);
        }
    }

    #[test]
    fn test_update_rejects_non_finite_time() {
        let mut s = stream(1, Direction::Forward);
        assert!(matches!(s.update(f32::NAN), Err(ConfigError::NonFiniteTime(_))));
        assert!(matches!(s.update(f32::INFINITY), Err(ConfigError::NonFiniteTime(_))));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(matches!(
            ParticleStream::new(StreamConfig::new(0, Direction::Forward)),
            Err(ConfigError::ZeroInstances)
        ));
        assert!(matches!(
            ParticleStream::new(StreamConfig::new(5, Direction::Forward).with_scale_factor(2.0)),
            Err(ConfigError::ScaleOutOfRange(_))
        ));
    }

    #[test]
    fn test_bounds_and_visibility() {
        let mut s = stream(100, Direction::Forward);
        assert!(s.bounds().is_none());

        let mut container = RenderContainer::new();
        s.init(&mut StdRng::seed_from_u64(6), &mut container);
        s.update(3.0).expect("finite");

        let (min, max) = s.bounds().expect("non-empty");
        for p in s.particles() {
            assert!(p.transform.position.cmpge(min).all());
            assert!(p.transform.position.cmple(max).all());
        }
        // Radius plus wave bounds |x| and |y|, z stays on the curve length.
        assert!(max.x <= 40.0 && min.x >= -40.0);
        assert!(max.z <= 105.0 && min.z >= -105.0);
        assert!(s.visible_count() <= s.len());
    }

    #[test]
    fn test_pointer_hook_writes_uniform() {
        let s = stream(1, Direction::Forward);
        let mut uniforms = FrameUniforms::default();
        s.on_pointer_move(Vec2::new(0.25, -0.5), &mut uniforms);
        assert_eq!(uniforms.pointer, Vec2::new(0.25, -0.5));
    }
}
