use std::sync::Arc;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use galleria::controller::{FrameLoop, InputEvent};
use galleria::model::{Camera, Gallery};
use galleria::view::render::{self, CameraResources, CameraUniform, RenderState};
use galleria::view::{GpuContext, OverlayState};
use galleria::{logging, ui};

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    camera_resources: CameraResources,
    render_state: RenderState,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Navigation core
    gallery: Gallery,
    frame: FrameLoop,
    overlay: OverlayState,

    // Frame timing
    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let gpu = GpuContext::new_native(window.clone(), size.width, size.height).await;
        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (depth_texture, depth_view) =
            render::create_depth_texture(&device, size.width, size.height);

        let mut camera = Camera::new(size.width, size.height);
        camera.set_look_at(glam::Vec3::new(0.0, 10.0, 0.0));

        let camera_resources = render::create_camera_resources(&device);
        let pipeline = render::create_gallery_pipeline(
            &device,
            config.format,
            &camera_resources.bind_group_layout,
            depth_format,
        );

        let gallery = Gallery::new();
        let gallery_mesh = gallery.build_mesh().upload(&device);
        let frame = FrameLoop::new(camera, gallery.label_anchors());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let render_state = RenderState {
            format: config.format,
            alpha_mode: config.alpha_mode,
            width: size.width,
            height: size.height,
            pipeline,
            gallery_mesh,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: window.scale_factor() as f32,
        };

        tracing::info!(
            artworks = gallery.artworks.len(),
            "gallery loaded, starting frame loop"
        );

        Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            depth_texture,
            depth_view,
            camera_resources,
            render_state,
            egui_state,
            egui_ctx,
            gallery,
            frame,
            overlay: OverlayState::default(),
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Ask the platform for pointer capture; the state flips only when the
    /// grab call succeeds, which stands in for the capture-change notification
    fn request_capture(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(winit::window::CursorGrabMode::Locked)
            .or_else(|_| {
                self.window
                    .set_cursor_grab(winit::window::CursorGrabMode::Confined)
            });
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.frame
                    .push_event(InputEvent::PointerLockChanged { locked: true });
            }
            Err(e) => tracing::warn!("pointer capture unavailable: {e}"),
        }
    }

    fn release_capture(&mut self) {
        let _ = self
            .window
            .set_cursor_grab(winit::window::CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.frame
            .push_event(InputEvent::PointerLockChanged { locked: false });
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // egui gets first refusal only while the pointer is free
        if !self.frame.look.is_captured() {
            let response = self.egui_state.on_window_event(self.window.as_ref(), event);
            if response.consumed {
                return true;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    if *code == KeyCode::Escape {
                        if *state == ElementState::Pressed {
                            self.release_capture();
                        }
                        return true;
                    }
                    if let Some(key) = key_name(*code) {
                        let event = match state {
                            ElementState::Pressed => InputEvent::KeyDown(key.to_string()),
                            ElementState::Released => InputEvent::KeyUp(key.to_string()),
                        };
                        self.frame.push_event(event);
                    }
                }
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !self.frame.look.is_captured() {
                    self.request_capture();
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.release_capture();
                self.frame.push_event(InputEvent::FocusLost);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;

            self.render_state.width = new_size.width;
            self.render_state.height = new_size.height;
            self.frame.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    fn update(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        self.frame
            .tick(dt, self.config.width, self.config.height, &mut self.overlay);

        self.queue.write_buffer(
            &self.camera_resources.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: self.frame.camera.view_proj().to_cols_array_2d(),
            }),
        );
    }

    fn render(&mut self) {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let captured = self.frame.look.is_captured();
        let mut full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_overlay(ctx, &self.gallery, &self.overlay, captured, self.fps);
        });
        self.egui_state.handle_platform_output(
            &self.window,
            std::mem::take(&mut full_output.platform_output),
        );

        let dpr = self.window.scale_factor() as f32;
        let primitives = self
            .egui_ctx
            .tessellate(std::mem::take(&mut full_output.shapes), dpr);

        self.render_state.egui_primitives = Some(primitives);
        self.render_state.egui_full_output = Some(full_output);
        self.render_state.egui_dpr = dpr;

        self.render_state.draw_frame(
            &self.device,
            &self.queue,
            &self.surface,
            &self.depth_view,
            &self.camera_resources.camera_bind_group,
        );
    }
}

fn key_name(code: KeyCode) -> Option<&'static str> {
    match code {
        KeyCode::KeyW => Some("w"),
        KeyCode::KeyA => Some("a"),
        KeyCode::KeyS => Some("s"),
        KeyCode::KeyD => Some("d"),
        KeyCode::KeyC => Some("c"),
        KeyCode::Space => Some(" "),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some("Shift"),
        KeyCode::ArrowUp => Some("ArrowUp"),
        KeyCode::ArrowDown => Some("ArrowDown"),
        KeyCode::ArrowLeft => Some("ArrowLeft"),
        KeyCode::ArrowRight => Some("ArrowRight"),
        _ => None,
    }
}

fn main() {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("Galleria")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

    let mut app = pollster::block_on(App::new(window.clone()));

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);
                            app.render();
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent {
                event: winit::event::DeviceEvent::MouseMotion { delta },
                ..
            } => {
                // dropped entirely while released, never buffered
                if app.frame.look.is_captured() {
                    app.frame.push_event(InputEvent::MouseMove {
                        dx: delta.0 as f32,
                        dy: delta.1 as f32,
                    });
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
