use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use impulse_common::FIXED_TIMESTEP;
use impulse_input::{InputEvent, InputState, Key, MouseButton};
use impulse_physics::PhysicsWorld;
use impulse_player::PlayerCamera;
use impulse_render_wgpu::{SandboxRenderer, Texture};
use impulse_scene::Scene;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "impulse-desktop", about = "Interactive rigid-body sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the crosshair texture
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Simulation-side application state, independent of the GPU objects.
struct AppState {
    world: PhysicsWorld,
    scene: Scene,
    camera: PlayerCamera,
    input: InputState,
    last_frame: Instant,
    /// Accumulated frame time toward the next physics step. Reset to zero
    /// after a step; any leftover is intentionally discarded.
    tick_accumulator: f32,
    show_debug_ray: bool,
    show_overlay: bool,
}

impl AppState {
    fn new(width: u32, height: u32) -> Self {
        let mut world = PhysicsWorld::new();
        let scene = Scene::populate(&mut world, SCENE_SEED);
        let camera = PlayerCamera::new(&mut world, width as f32, height as f32);

        Self {
            world,
            scene,
            camera,
            input: InputState::new(),
            last_frame: Instant::now(),
            tick_accumulator: 0.0,
            show_debug_ray: false,
            show_overlay: true,
        }
    }

    /// One variable-rate frame: input-driven camera work, then at most one
    /// fixed physics step if enough time accumulated.
    fn frame(&mut self, dt: f32) {
        if self.input.released(Key::Q) {
            self.scene.reset(&mut self.world);
        }
        if self.input.released(Key::F1) {
            self.show_debug_ray = !self.show_debug_ray;
            tracing::info!(enabled = self.show_debug_ray, "debug ray");
        }
        if self.input.released(Key::F3) {
            self.show_overlay = !self.show_overlay;
        }

        self.camera.update(&mut self.input, dt, &mut self.world);
        self.camera.handle_interactions(&self.input, &mut self.world);

        self.tick_accumulator += dt;
        if self.tick_accumulator >= FIXED_TIMESTEP {
            self.world.step();
            self.camera.fixed_update(&mut self.world);
            self.tick_accumulator = 0.0;
        }

        self.input.end_frame();
    }

    fn draw_ui(&mut self, ctx: &EguiContext, dt: f32, wireframe: bool) {
        if !self.show_overlay {
            return;
        }

        let position = self.camera.position(&self.world);
        egui::SidePanel::left("stats")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("impulse");
                ui.separator();
                ui.label(format!("mode: {}", self.camera.mode()));
                ui.label(format!(
                    "grabbed: {}",
                    if self.camera.grabbed().is_some() { "yes" } else { "no" }
                ));
                ui.label(format!("bodies: {}", self.world.body_count()));
                ui.label(format!(
                    "player: ({:.1}, {:.1}, {:.1})",
                    position.x, position.y, position.z
                ));
                ui.label(format!(
                    "yaw {:.0}\u{00b0}  pitch {:.0}\u{00b0}",
                    self.camera.yaw(),
                    self.camera.pitch()
                ));
                ui.label(format!("frame: {:.1} ms", dt * 1000.0));
                if wireframe {
                    ui.label("wireframe on");
                }
                ui.separator();
                ui.small("1-5: mode | LMB: fire | RMB: throw");
                ui.small("WASD: move | E: run | Space: jump");
                ui.small("Q: reset | F1: ray | F2: wire | F3: panel");
            });
    }
}

// Fixed scatter seed so every launch drops the same stack.
const SCENE_SEED: u64 = 42;

struct GpuApp {
    state: AppState,
    assets: PathBuf,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SandboxRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(cli: &Cli) -> Self {
        Self {
            state: AppState::new(cli.width, cli.height),
            assets: cli.assets.clone(),
            initial_size: PhysicalSize::new(cli.width.max(1), cli.height.max(1)),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn apply_input(&mut self, event: InputEvent) {
        self.state.input.apply(event);
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("impulse")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        // First-person control: relative mouse motion with a hidden cursor.
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            tracing::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        // Ask for line polygon mode when available so F2 can show wireframe.
        let optional_features =
            adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("impulse_device"),
                required_features: optional_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state
            .camera
            .set_surface_size(size.width as f32, size.height.max(1) as f32);

        let crosshair_path = self.assets.join("crosshair.png");
        let crosshair = match Texture::from_path(&device, &queue, &crosshair_path) {
            Ok(texture) => texture,
            Err(e) => {
                tracing::warn!(
                    path = %crosshair_path.display(),
                    "crosshair texture unavailable ({e}), using built-in pattern"
                );
                Texture::fallback_crosshair(&device, &queue)
            }
        };

        let renderer =
            SandboxRenderer::new(&device, surface_format, size.width, size.height, crosshair);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state
                        .camera
                        .set_surface_size(config.width as f32, config.height as f32);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    let event = match key_state {
                        ElementState::Pressed => InputEvent::KeyPressed(key),
                        ElementState::Released => InputEvent::KeyReleased(key),
                    };
                    self.apply_input(event);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button) = map_button(button) {
                    let event = match state {
                        ElementState::Pressed => InputEvent::ButtonPressed(button),
                        ElementState::Released => InputEvent::ButtonReleased(button),
                    };
                    self.apply_input(event);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;

                if self.state.input.held(Key::Escape) {
                    event_loop.exit();
                    return;
                }
                if self.state.input.released(Key::F2) {
                    if let Some(renderer) = &mut self.renderer {
                        let on = renderer.toggle_wireframe();
                        tracing::info!(enabled = on, "wireframe");
                    }
                }

                self.state.frame(dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let wireframe = self
                    .renderer
                    .as_ref()
                    .map(|r| r.wireframe())
                    .unwrap_or(false);
                if let Some(renderer) = &self.renderer {
                    let debug_ray = self
                        .state
                        .show_debug_ray
                        .then(|| self.state.camera.debug_ray())
                        .flatten();
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        &self.state.world,
                        &self.state.scene,
                        debug_ray,
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx, dt, wireframe);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.apply_input(InputEvent::MouseMotion {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Bodies before shapes: scene objects, then the player capsule.
        if let Err(e) = self.state.scene.clear(&mut self.state.world) {
            tracing::error!("scene teardown failed: {e}");
        }
        if let Err(e) = self.state.camera.release(&mut self.state.world) {
            tracing::error!("camera teardown failed: {e}");
        }
        tracing::info!("impulse-desktop exiting");
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyQ => Key::Q,
        KeyCode::Space => Key::Space,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("impulse-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
