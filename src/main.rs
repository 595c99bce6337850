use std::env;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

// Import from the library crate
use cubefield::{controller, logging, model, ui, view, Error, Session, SessionConfig};

use controller::{InputEvent, InputState};
use model::Camera;
use view::{EguiFrame, GpuContext, RenderState, TextureAtlas};

const DEFAULT_CONFIG: &str = "sandbox.toml";

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    render: RenderState,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Game state
    camera: Camera,
    session: Session,
    input: InputState,

    // Frame timing
    started: Instant,
    last_frame_time: Instant,
    fps: ui::FpsCounter,
}

impl App {
    async fn new(window: Arc<Window>, config: SessionConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // Initialize wgpu
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).map_err(Error::from)?;
        let gpu = GpuContext::new(&instance, surface, size.width, size.height).await?;

        let mut rng = match config.terrain.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Textures first: no world exists until they are ready
        let atlas = TextureAtlas::generate(&mut rng).context("building block textures")?;
        let render = RenderState::new(&gpu.device, &gpu.queue, gpu.format, gpu.config.width, gpu.config.height, &atlas);
        let session = Session::new(config, &mut rng);

        let mut camera = Camera::new(gpu.config.width, gpu.config.height);
        camera.sync_from_player(&session.player);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let now = Instant::now();
        Ok(Self {
            window,
            gpu,
            render,
            egui_state,
            egui_ctx,
            camera,
            session,
            input: InputState::default(),
            started: now,
            last_frame_time: now,
            fps: ui::FpsCounter::default(),
        })
    }

    fn set_pointer_lock(&mut self, locked: bool) {
        if locked {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("pointer lock failed: {e}");
                return;
            }
        } else {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        }
        self.window.set_cursor_visible(!locked);
        self.input.process_event(&InputEvent::PointerLockChanged { locked });
    }

    /// Returns true if the event was handled
    fn input(&mut self, event: &WindowEvent) -> bool {
        // egui only sees the pointer while it is free
        if !self.input.pointer_locked && self.egui_state.on_window_event(self.window.as_ref(), event).consumed {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, repeat, .. }, .. } => {
                if let PhysicalKey::Code(code) = physical_key {
                    let key = format!("{code:?}");
                    match state {
                        ElementState::Pressed => {
                            if self.input.is_release_pointer(&key) {
                                self.set_pointer_lock(false);
                            }
                            self.input.process_event(&InputEvent::KeyDown { key, repeat: *repeat });
                        }
                        ElementState::Released => self.input.process_event(&InputEvent::KeyUp(key)),
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => controller::MouseButton::Left,
                    MouseButton::Right => controller::MouseButton::Right,
                    MouseButton::Middle => controller::MouseButton::Middle,
                    _ => return false,
                };
                let is_down = *state == ElementState::Pressed;
                self.input.process_event(&InputEvent::MouseButton { button, is_down });
                if is_down && button == controller::MouseButton::Left && !self.input.pointer_locked {
                    self.set_pointer_lock(true);
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_event(&InputEvent::CursorMoved { x: position.x as f32, y: position.y as f32 });
                true
            }
            WindowEvent::Focused(false) => {
                self.input.process_event(&InputEvent::FocusLost);
                self.set_pointer_lock(false);
                true
            }
            WindowEvent::Resized(size) => {
                // applied at the start of the next update
                self.input.process_event(&InputEvent::Resized { width: size.width, height: size.height });
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.render.resize(&self.gpu.device, width, height);
            self.camera.set_aspect(width, height);
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.input.process_event(&InputEvent::MouseMotion { dx: dx as f32, dy: dy as f32 });
    }

    fn update(&mut self) {
        let frame_time = Instant::now();
        let dt = (frame_time - self.last_frame_time).as_secs_f32();
        self.last_frame_time = frame_time;
        self.fps.tick(dt);

        if let Some((w, h)) = self.input.take_resize() {
            self.resize(w, h);
        }

        let snapshot = self.input.take_snapshot();
        self.session.tick(&snapshot, self.started.elapsed());

        self.camera.sync_from_player(&self.session.player);
        self.render.update(&self.gpu.device, &self.gpu.queue, &self.camera, &self.session.world);
    }

    fn render_ui(&mut self) -> EguiFrame {
        let stats = ui::HudStats::sample(&self.session, self.fps.fps, self.input.pointer_locked);
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = self.egui_ctx.run(raw_input, |ctx| ui::build_ui(ctx, &stats));
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        EguiFrame {
            primitives: self.egui_ctx.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let egui = self.render_ui();
        self.render.draw_frame(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, egui)
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config_path = env::var("VOXEL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = SessionConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config {config_path}"))?;

    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title("cubefield")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let mut app = pollster::block_on(App::new(window.clone(), config))?;
    info!("ready: {} blocks", app.session.world.len());

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::RedrawRequested => {
                            app.update();

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.gpu.reconfigure(),
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("surface out of memory");
                                    elwt.exit();
                                }
                                Err(e) => warn!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
