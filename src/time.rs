//! Frame clock driving the per-frame update.
//!
//! One [`FrameClock::tick`] per rendered frame gives the elapsed seconds
//! passed to the scene, and keeps a running FPS estimate for logging.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // in the redraw handler:
//! let elapsed = clock.tick();
//! scene.update(elapsed)?;
//! ```

use std::time::{Duration, Instant};

/// Elapsed time, frame count and FPS.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock whose zero is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to now. Returns elapsed seconds since start.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. Instants earlier than the last tick count as zero delta.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now.max(self.last_frame);
        self.elapsed_secs = self.last_frame.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = self.last_frame.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = self.last_frame;
        }

        self.elapsed_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_tick_advances() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let t = clock.tick_at(start + Duration::from_millis(250));
        assert!((t - 0.25).abs() < 1e-6);
        assert!((clock.delta() - 0.25).abs() < 1e-6);
        assert_eq!(clock.frame(), 1);

        clock.tick_at(start + Duration::from_millis(300));
        assert!((clock.delta() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_backwards_instant_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.tick_at(start + Duration::from_secs(1));
        let t = clock.tick_at(start);
        assert_eq!(clock.delta(), 0.0);
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fps_estimate() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        // 30 frames over 600 ms, sampled at the 500 ms mark (25 frames).
        assert!((clock.fps() - 50.0).abs() < 0.5);
    }
}
