// Re-export all public modules so they can be used from main.rs
pub mod logging;
pub mod ui;
pub mod utils;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm_entry {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use crate::controller::{FrameLoop, InputEvent};
    use crate::model::{Camera, Gallery};
    use crate::view::render::{self, CameraUniform, RenderState};
    use crate::view::{GpuContext, OverlayState};
    use crate::{logging, ui};

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        logging::init();
        let (window, document, canvas) = init_canvas(800, 600)?;
        setup_app(&window, &document, &canvas).await
    }

    /// Main application setup for WASM
    async fn setup_app(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
    ) -> Result<(), JsValue> {
        let gpu = GpuContext::new(canvas, 800, 600)
            .await
            .map_err(|e| js_error(format!("GPU init failed: {e:?}")))?;

        let width = gpu.config.width;
        let height = gpu.config.height;

        let mut camera = Camera::new(width, height);
        camera.set_look_at(Vec3::new(0.0, 10.0, 0.0));

        let gallery = Rc::new(Gallery::new());
        let gallery_mesh = gallery.build_mesh().upload(gpu.device.as_ref());

        let camera_resources = render::create_camera_resources(gpu.device.as_ref());
        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (_, depth_view) = render::create_depth_texture(gpu.device.as_ref(), width, height);
        let depth_view_cell: Rc<RefCell<wgpu::TextureView>> = Rc::new(RefCell::new(depth_view));

        let pipeline = render::create_gallery_pipeline(
            gpu.device.as_ref(),
            gpu.format,
            &camera_resources.bind_group_layout,
            depth_format,
        );

        let frame = Rc::new(RefCell::new(FrameLoop::new(camera, gallery.label_anchors())));
        let overlay = Rc::new(RefCell::new(OverlayState::default()));

        let egui_ctx = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(
            gpu.device.as_ref(),
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );

        setup_input_listeners(document, window, canvas, frame.clone())?;

        let mut render_state = RenderState {
            format: gpu.format,
            alpha_mode: gpu.config.alpha_mode,
            width,
            height,
            pipeline,
            gallery_mesh,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        };

        tracing::info!(artworks = gallery.artworks.len(), "gallery loaded, starting frame loop");

        let mut last_time = window.performance().map(|p| p.now()).unwrap_or(0.0);

        // Continuous redraw using requestAnimationFrame
        let f = RcCellCallback::new(window.clone(), {
            let window_for_loop = window.clone();
            let canvas = canvas.clone();
            let frame = frame.clone();
            let overlay = overlay.clone();
            let gallery = gallery.clone();
            let depth_view_cell = depth_view_cell.clone();

            move || {
                let now = window_for_loop
                    .performance()
                    .map(|p| p.now())
                    .unwrap_or(0.0);
                let dt = ((now - last_time) / 1000.0) as f32;
                last_time = now;

                handle_resize(
                    &window_for_loop,
                    &canvas,
                    gpu.device.as_ref(),
                    &gpu.surface,
                    &mut render_state,
                    &mut frame.borrow_mut(),
                    &depth_view_cell,
                );
                let width = render_state.width;
                let height = render_state.height;

                let captured = {
                    let mut fl = frame.borrow_mut();
                    fl.tick(dt, width, height, &mut overlay.borrow_mut());
                    gpu.queue.write_buffer(
                        &camera_resources.camera_buffer,
                        0,
                        bytemuck::bytes_of(&CameraUniform {
                            view_proj: fl.camera.view_proj().to_cols_array_2d(),
                        }),
                    );
                    fl.look.is_captured()
                };

                let dpr = window_for_loop.device_pixel_ratio() as f32;
                let mut full_output = ui::build_ui(
                    &egui_ctx,
                    &gallery,
                    &overlay.borrow(),
                    captured,
                    width,
                    height,
                    dpr,
                    dt,
                    now,
                );
                let primitives =
                    egui_ctx.tessellate(std::mem::take(&mut full_output.shapes), dpr);
                render_state.egui_primitives = Some(primitives);
                render_state.egui_full_output = Some(full_output);
                render_state.egui_dpr = dpr;

                let dv = depth_view_cell.borrow();
                render_state.draw_frame(
                    gpu.device.as_ref(),
                    gpu.queue.as_ref(),
                    &gpu.surface,
                    &dv,
                    &camera_resources.camera_bind_group,
                );
            }
        });
        f.start();

        Ok(())
    }

    /// Follow the browser window size; reconfigure the surface and rebuild
    /// the depth buffer when it changes
    fn handle_resize(
        window: &Window,
        canvas: &HtmlCanvasElement,
        device: &wgpu::Device,
        surface: &wgpu::Surface,
        render_state: &mut RenderState,
        frame: &mut FrameLoop,
        depth_view_cell: &Rc<RefCell<wgpu::TextureView>>,
    ) {
        if let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) {
            let nw = w.as_f64().unwrap_or(800.0) as u32;
            let nh = h.as_f64().unwrap_or(600.0) as u32;
            if nw > 0 && nh > 0 && (nw != render_state.width || nh != render_state.height) {
                canvas.set_width(nw);
                canvas.set_height(nh);
                frame.camera.set_aspect(nw, nh);
                render_state.width = nw;
                render_state.height = nh;

                let config = wgpu::SurfaceConfiguration {
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    format: render_state.format,
                    width: nw,
                    height: nh,
                    present_mode: wgpu::PresentMode::Fifo,
                    alpha_mode: render_state.alpha_mode,
                    view_formats: vec![],
                    desired_maximum_frame_latency: 2,
                };
                surface.configure(device, &config);

                let (_, depth_view) = render::create_depth_texture(device, nw, nh);
                *depth_view_cell.borrow_mut() = depth_view;
            }
        }
    }

    /// Wire browser events into the frame loop's inbound queue
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        canvas: &HtmlCanvasElement,
        frame: Rc<RefCell<FrameLoop>>,
    ) -> Result<(), JsValue> {
        // Keyboard down
        {
            let frame = frame.clone();
            let document_for_exit = document.clone();
            let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                let key = e.key();

                if key == "Escape" {
                    document_for_exit.exit_pointer_lock();
                    return;
                }

                // Keep navigation keys away from the browser
                if matches!(
                    key.as_str(),
                    "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "w" | "a" | "s" | "d"
                        | "W" | "A" | "S" | "D" | "c" | "C" | " " | "Shift"
                ) {
                    e.prevent_default();
                }

                frame.borrow_mut().push_event(InputEvent::KeyDown(key));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
            keydown.forget();
        }

        // Keyboard up
        {
            let frame = frame.clone();
            let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
                frame.borrow_mut().push_event(InputEvent::KeyUp(e.key()));
            }) as Box<dyn FnMut(KeyboardEvent)>);
            document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
            keyup.forget();
        }

        // Focus loss - drop all held intents
        {
            let frame = frame.clone();
            let blur = Closure::wrap(Box::new(move |_e: Event| {
                frame.borrow_mut().push_event(InputEvent::FocusLost);
            }) as Box<dyn FnMut(Event)>);
            window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
            blur.forget();
        }

        // Visibility change
        {
            let frame = frame.clone();
            let doc = document.clone();
            let visibility = Closure::wrap(Box::new(move |_e: Event| {
                frame.borrow_mut().push_event(InputEvent::VisibilityChanged {
                    visible: !doc.hidden(),
                });
            }) as Box<dyn FnMut(Event)>);
            document.add_event_listener_with_callback(
                "visibilitychange",
                visibility.as_ref().unchecked_ref(),
            )?;
            visibility.forget();
        }

        // Pointer lock change: the only place capture state is written
        {
            let frame = frame.clone();
            let doc_pl = document.clone();
            let plc = Closure::wrap(Box::new(move |_e: Event| {
                let locked = doc_pl.pointer_lock_element().is_some();
                frame
                    .borrow_mut()
                    .push_event(InputEvent::PointerLockChanged { locked });
            }) as Box<dyn FnMut(Event)>);
            document
                .add_event_listener_with_callback("pointerlockchange", plc.as_ref().unchecked_ref())?;
            plc.forget();
        }

        // Canvas click requests pointer lock; the flag flips only when the
        // pointerlockchange notification lands
        {
            let frame = frame.clone();
            let canvas_click = canvas.clone();
            let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
                if !frame.borrow().look.is_captured() {
                    canvas_click.request_pointer_lock();
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            canvas.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
            click.forget();
        }

        // Mouse move: dropped entirely while released, never buffered
        {
            let frame = frame.clone();
            let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
                let mut fl = frame.borrow_mut();
                if fl.look.is_captured() {
                    fl.push_event(InputEvent::MouseMove {
                        dx: e.movement_x() as f32,
                        dy: e.movement_y() as f32,
                    });
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
            mm.forget();
        }

        Ok(())
    }

    fn init_canvas(width: u32, height: u32) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or(js_error("no global `window`"))?;
        let document = window.document().ok_or(js_error("no document on window"))?;
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        canvas_el.set_width(width);
        canvas_el.set_height(height);
        body.append_child(&canvas_el)?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Recursively schedule next frame
                let cb_ref = callback_clone.borrow();
                window
                    .request_animation_frame(cb_ref.as_ref().unwrap().as_ref().unchecked_ref())
                    .expect("RAF failed");
            }) as Box<dyn FnMut()>));

            self.window
                .request_animation_frame(
                    callback.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                )
                .expect("RAF start failed");

            // Leak the closure to keep it alive
            std::mem::forget(callback);
        }
    }
}
