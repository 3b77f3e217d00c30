//! User controls: pointer conversion, instance-count keys and the
//! debounced restart they trigger.
//!
//! | Key | Action |
//! |-----|--------|
//! | `-` / `=` | 500 fewer / more spheres per stream |
//! | `[` / `]` | 2000 fewer / more spheres per stream |
//! | `C` | toggle cube / sphere meshes |
//!
//! Count and mesh changes do not restart immediately. Each one re-arms a
//! [`RestartDebounce`], and the scene is rebuilt once input goes quiet.

use std::time::{Duration, Instant};

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::config::{SceneConfig, MIN_INSTANCES};

/// Quiet period before a requested restart runs.
pub const RESTART_DELAY: Duration = Duration::from_millis(400);

/// Convert a cursor position in physical pixels to NDC (`y` up).
pub fn pointer_ndc(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Vec2::new((x / w * 2.0 - 1.0) as f32, -(y / h * 2.0 - 1.0) as f32)
}

/// Something the keyboard asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Change the per-stream count by this many spheres.
    AdjustInstances(i64),
    ToggleCube,
}

impl ControlAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(ControlAction::AdjustInstances(-500)),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(ControlAction::AdjustInstances(500)),
            KeyCode::BracketLeft => Some(ControlAction::AdjustInstances(-2000)),
            KeyCode::BracketRight => Some(ControlAction::AdjustInstances(2000)),
            KeyCode::KeyC => Some(ControlAction::ToggleCube),
            _ => None,
        }
    }

    /// The config this action produces. The count never drops below [`MIN_INSTANCES`].
    pub fn apply(self, config: &SceneConfig) -> SceneConfig {
        let mut next = config.clone();
        match self {
            ControlAction::AdjustInstances(delta) => {
                next.n_instances = adjust_instances(config.n_instances, delta);
            }
            ControlAction::ToggleCube => next.use_cube = !config.use_cube,
        }
        next
    }
}

/// Add `delta` to a per-stream count, flooring at [`MIN_INSTANCES`].
pub fn adjust_instances(current: u32, delta: i64) -> u32 {
    let next = (current as i64 + delta).max(MIN_INSTANCES as i64);
    next.min(u32::MAX as i64) as u32
}

/// Trailing-edge debounce for restart requests.
#[derive(Debug, Clone)]
pub struct RestartDebounce {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RestartDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Record a request at `now`, pushing the deadline back.
    pub fn request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_request.is_some()
    }

    /// `true` exactly once, when the quiet period after the last request has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_request {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.last_request = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RestartDebounce {
    fn default() -> Self {
        Self::new(RESTART_DELAY)
    }
}
