//! winit application driving the scene and renderer.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::controls::{pointer_ndc, ControlAction, RestartDebounce};
use crate::error::RunError;
use crate::geometry::InstanceShape;
use crate::gpu::Renderer;
use crate::scene::Scene;
use crate::time::FrameClock;

/// How often frame statistics are logged.
const STATS_EVERY_FRAMES: u64 = 600;

/// Open a window and run until it is closed.
pub fn run(config: SceneConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: Scene,
    /// Config the next debounced restart applies.
    pending_config: SceneConfig,
    restart: RestartDebounce,
    clock: FrameClock,
    rng: StdRng,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    failure: Option<RunError>,
}

impl App {
    pub fn new(config: SceneConfig) -> Result<Self, RunError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut scene = Scene::new(config.clone())?;
        scene.restart(&mut rng);

        Ok(Self {
            window: None,
            renderer: None,
            scene,
            pending_config: config,
            restart: RestartDebounce::default(),
            clock: FrameClock::new(),
            rng,
            mouse_pressed: false,
            last_mouse_pos: None,
            failure: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        tracing::error!("{}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn handle_action(&mut self, action: ControlAction) {
        self.pending_config = action.apply(&self.pending_config);
        self.restart.request(Instant::now());
        tracing::info!(
            per_stream = self.pending_config.n_instances,
            total = self.pending_config.n_instances * 2,
            use_cube = self.pending_config.use_cube,
            "restart scheduled"
        );
    }

    /// Apply a due restart. Runs before the frame's update, never during it.
    fn apply_pending_restart(&mut self) -> Result<(), RunError> {
        if !self.restart.poll(Instant::now()) {
            return Ok(());
        }
        self.scene
            .reconfigure(self.pending_config.clone(), &mut self.rng)?;
        if let Some(renderer) = &mut self.renderer {
            renderer.set_shape(InstanceShape::from_use_cube(self.scene.config().use_cube));
        }
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.apply_pending_restart() {
            self.fail(event_loop, err);
            return;
        }

        let elapsed = self.clock.tick();
        if let Err(err) = self.scene.update(elapsed) {
            self.fail(event_loop, err.into());
            return;
        }

        if self.clock.frame() % STATS_EVERY_FRAMES == 0 {
            tracing::debug!(
                fps = self.clock.fps(),
                frame_ms = self.clock.delta() * 1000.0,
                elapsed,
                visible = self.scene.visible_count(),
                total = self.scene.container().len(),
                "frame stats"
            );
        }

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&self.scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => tracing::warn!("Render error: {:?}", e),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Sphere Streams")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let config = self.scene.config();
        let shape = InstanceShape::from_use_cube(config.use_cube);
        let background = config.background.to_array();
        match pollster::block_on(Renderer::new(window.clone(), shape, background)) {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.window = Some(window);
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                    } else if let Some(action) = ControlAction::from_key(code) {
                        self.handle_action(action);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(renderer) = &mut self.renderer {
                    let ndc = pointer_ndc(position.x, position.y, renderer.config.width, renderer.config.height);
                    self.scene.pointer_moved(ndc);

                    if self.mouse_pressed {
                        if let Some((last_x, last_y)) = self.last_mouse_pos {
                            renderer
                                .camera
                                .orbit((position.x - last_x) as f32, (position.y - last_y) as f32);
                        }
                        self.last_mouse_pos = Some((position.x, position.y));
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(renderer) = &mut self.renderer {
                    renderer.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
