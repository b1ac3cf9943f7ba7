//! Core application state and lifecycle.

use gridsketch_core::canvas::Canvas;
use gridsketch_core::config::EditorConfig;
use gridsketch_render::{RenderContext, Renderer, RendererError, VelloRenderer};
use peniko::Color;
use std::sync::Arc;
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::event_handler::EventHandler;
use crate::shortcuts::ShortcutRegistry;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "GRIDSKETCH_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Load the editor configuration named by `GRIDSKETCH_CONFIG`, falling back
/// to defaults when it is unset or unusable.
pub fn load_config() -> EditorConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return EditorConfig::default();
    };
    match EditorConfig::load(&path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            log::warn!("Ignoring config {}: {}", path, e);
            EditorConfig::default()
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // State
    canvas: Canvas,
    event_handler: EventHandler,
}

/// Main application struct.
pub struct App {
    config: EditorConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// First fatal error, reported when the event loop returns.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            error: None,
        }
    }

    /// Run the application until the window is closed.
    pub async fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(load_config());
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Create the window, surface and renderers.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.window_width, self.config.window_height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| RendererError::Surface(format!("{e:?}")))?;

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("{e:?}")))?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut canvas = Canvas::new(&self.config);
        canvas.set_viewport_size(surface.config.width as f64, surface.config.height as f64);

        log::info!(
            "GridSketch initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            canvas,
            event_handler: EventHandler::new(),
        });

        window.request_redraw();
        Ok(())
    }

    /// Record a fatal error and stop the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    /// Process queued input, then render and present one frame.
    ///
    /// Returns false once the window has been closed.
    fn frame(&mut self) -> bool {
        let Some(state) = &mut self.state else {
            return true;
        };

        let input = state.event_handler.take_frame();
        let outcome = state.canvas.process_frame(&input);

        let ctx = RenderContext::new(&state.canvas).with_config(&self.config);
        state.shape_renderer.build_scene(&ctx);
        let background = Color::from(state.shape_renderer.background_color(&ctx));

        let Some(render_cx) = self.render_cx.as_ref() else {
            return outcome.keep_running;
        };

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}", RendererError::Surface(format!("{e:?}")));
                return outcome.keep_running;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color: background,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Intermediate texture with StorageBinding usage for Vello's compute
        // shaders, copied to the surface texture afterwards.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            state.shape_renderer.scene(),
            &render_texture_view,
            &params,
        ) {
            log::error!("{}", RendererError::RenderFailed(format!("{e:?}")));
            return outcome.keep_running;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut blit_encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state.texture_blitter.copy(
            device,
            &mut blit_encoder,
            &render_texture_view,
            &surface_view,
        );
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();
        outcome.keep_running
    }
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.event_handler.handle_window_event(&event);

        match event {
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                state
                    .canvas
                    .set_viewport_size(size.width as f64, size.height as f64);

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::CloseRequested => {
                // Finish the frame that carries the close request.
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                if self.frame() {
                    if let Some(state) = &self.state {
                        state.window.request_redraw();
                    }
                } else {
                    log::info!("Window closed");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
