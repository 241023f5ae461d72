// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main editor application setup and event loop.

use crate::panel::SidePanel;
use crate::session::SessionError;
use crate::settings::SettingsError;
use crate::state::EditorState;
use egui_wgpu::wgpu;
use nodecanvas_graph::CanvasView;
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Editor application errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Surface creation failed
    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Device request failed
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EditorError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("nodecanvas Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EditorError::RendererInit("surface has no formats".to_string()))?;
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
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Editor Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            // The egui renderer wants a 'static pass; it is dropped before finish()
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Editor Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.1,
                                g: 0.1,
                                b: 0.1,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the editor
struct EditorRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
}

/// Editor state and widgets that live across window recreation
struct EditorInner {
    state: EditorState,
    panel: SidePanel,
    view: CanvasView,
}

impl EditorInner {
    fn new(state: EditorState) -> Self {
        Self {
            panel: SidePanel::new(&state.settings),
            view: CanvasView::new(),
            state,
        }
    }

    fn update(&mut self, ctx: &egui::Context) {
        let stats = self.state.stats();
        let status = self.state.status().map(str::to_owned);
        if let Some(action) =
            self.panel
                .show(ctx, &mut self.state.settings, stats, status.as_deref())
        {
            self.state.apply(action);
        }
        self.state.sync_style();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(24)))
            .show(ctx, |ui| {
                self.state.fit_canvas(ui.max_rect());
                self.view.show(ui, &mut self.state.canvas);
            });
    }

    fn shutdown(&mut self, window: Option<&Window>) {
        if let Some(window) = window {
            let size = window.inner_size().to_logical::<u32>(window.scale_factor());
            self.state.settings.window_size = [size.width, size.height];
        }
        if let Err(e) = self.state.save() {
            tracing::error!("Failed to save editor state: {e}");
        }
    }
}

/// Main editor application
pub struct EditorApp {
    running: Option<EditorRunning>,
    editor: EditorInner,
    error: Option<EditorError>,
}

impl EditorApp {
    /// Create a new editor application
    pub fn new(state: EditorState) -> Self {
        Self {
            running: None,
            editor: EditorInner::new(state),
            error: None,
        }
    }

    /// Run the editor until the window closes
    pub fn run(state: EditorState) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = EditorApp::new(state);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<EditorRunning> {
        tracing::info!("Creating editor window...");

        let [width, height] = self.editor.state.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title("Node Canvas")
            .with_inner_size(winit::dpi::LogicalSize::new(width, height))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        tracing::info!("Window size: {:?}", window.inner_size());

        Ok(EditorRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
        })
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("{e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                self.editor.shutdown(Some(&running.window));
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let editor = &mut self.editor;
                let full_output = running.egui_ctx.run(raw_input, |ctx| editor.update(ctx));

                let repaint_now = full_output
                    .viewport_output
                    .values()
                    .any(|v| v.repaint_delay.is_zero());

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        self.editor.shutdown(Some(&running.window));
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                if repaint_now {
                    running.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
