mod config;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use busted_camera::Camera;
use busted_common::Geometry;
use busted_input::InputState;
use busted_render_wgpu::{CAMERA_UNIFORM, WgpuRenderer};
use clap::{Parser, ValueEnum};
use egui::Context as EguiContext;
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::platform::{WindowCursor, map_button, map_key, route_button, route_key};

#[derive(Parser)]
#[command(name = "busted-desktop", about = "Fly-camera quad demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file with window, camera and bindings sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in pixels (overrides the config file)
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels (overrides the config file)
    #[arg(long)]
    height: Option<u32>,

    /// Geometry to draw
    #[arg(long, value_enum, default_value_t = Scene::Quad)]
    scene: Scene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    /// Single 10 x 20 quad
    Quad,
    /// The same area split into 10 x 20 unit cells
    Grid,
}

impl Scene {
    fn geometry(self) -> Geometry {
        match self {
            Scene::Quad => Geometry::quad(),
            Scene::Grid => Geometry::grid(10, 20, 1.0),
        }
    }
}

/// Application state that lives independently of the GPU.
struct AppState {
    camera: Camera,
    input: InputState,
    show_hud: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: &AppConfig) -> Result<Self> {
        let camera = Camera::with_settings(
            config.window.width,
            config.window.height,
            Vec3::from_array(config.window.start_position),
            config.camera.clone(),
        )
        .context("creating camera")?;

        Ok(Self {
            camera,
            input: InputState::new(config.bindings.clone()),
            show_hud: true,
            last_frame: Instant::now(),
        })
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let summary = self.camera.summary();
        let p = summary.position;
        let o = summary.orientation;

        egui::SidePanel::left("hud")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Camera");
                ui.separator();
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                ui.label(format!("Forward: ({:.2}, {:.2}, {:.2})", o.x, o.y, o.z));
                ui.label(format!(
                    "Pitch: {:.1}  Yaw: {:.1}",
                    summary.pitch_degrees, summary.yaw_degrees
                ));
                ui.label(format!(
                    "Viewport: {}x{}",
                    summary.viewport.0, summary.viewport.1
                ));
                ui.label(format!("Look: {:?}", summary.rotation));
                ui.separator();
                ui.small("F1: HUD | LMB: Look | WASD: Move | Space/Ctrl: Up/Down | Shift: Sprint");
            });
    }
}

/// Window and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    cursor: WindowCursor,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    config: AppConfig,
    geometry: Geometry,
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: AppConfig, geometry: Geometry) -> Result<Self> {
        let state = AppState::new(&config)?;
        Ok(Self {
            config,
            geometry,
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        })
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("busted_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if window_config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        if let Err(e) = self.state.camera.set_viewport(size.width, size.height) {
            tracing::debug!("keeping configured viewport: {e}");
        }

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            &self.geometry,
        )
        .context("failed to create renderer")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
            cursor: WindowCursor::new(window.clone()),
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// One frame: Inputs, then Matrix, then draw.
    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let state = &mut self.state;

        let now = Instant::now();
        let dt = (now - state.last_frame).as_secs_f32().min(0.1);
        state.last_frame = now;

        state.camera.inputs(&state.input, &mut gpu.cursor, dt);

        let settings = state.camera.settings().clone();
        if let Err(e) = state.camera.upload(
            settings.fov_degrees,
            settings.near,
            settings.far,
            &mut gpu.renderer,
            CAMERA_UNIFORM,
        ) {
            tracing::error!("camera upload failed: {e}");
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        gpu.renderer.render(&gpu.device, &gpu.queue, &view);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_hud(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        // Minimized windows report 0x0; keep the last usable size.
        if new_size.width == 0 || new_size.height == 0 {
            tracing::debug!("ignoring zero-sized resize");
            return;
        }
        gpu.config.width = new_size.width;
        gpu.config.height = new_size.height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, new_size.width, new_size.height);
        if let Err(e) = self
            .state
            .camera
            .set_viewport(new_size.width, new_size.height)
        {
            tracing::warn!("camera viewport not updated: {e}");
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        // Cursor tracking and focus must see every event, even ones egui claims.
        match &event {
            WindowEvent::CursorMoved { position, .. } => gpu.cursor.track(*position),
            WindowEvent::Focused(false) => self.state.input.clear(),
            _ => {}
        }

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);

        // Releases go through even when egui claims them, or a held look
        // button would stay captured after being let go over the HUD.
        match &event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(*code) {
                    let pressed = *key_state == ElementState::Pressed;
                    route_key(&mut self.state.input, key, pressed, response.consumed);
                }
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                if let Some(button) = map_button(*button) {
                    let pressed = *btn_state == ElementState::Pressed;
                    route_button(&mut self.state.input, button, pressed, response.consumed);
                }
            }
            _ => {}
        }

        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if code == KeyCode::F1 && !repeat {
                    self.state.show_hud = !self.state.show_hud;
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(gpu) = &mut self.gpu {
                gpu.cursor.mouse_motion(delta);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!(scene = ?cli.scene, "busted-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, cli.scene.geometry())?;
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.fatal.take() {
        return Err(e);
    }
    Ok(())
}
