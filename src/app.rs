use log::{info, warn};
use web_time::Instant;
use winit::{
    event::{Event, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use crate::camera::OrbitCamera;
use crate::config::ViewerConfig;
use crate::controls::{ControlAction, ControlPanel};
use crate::input::InputState;
use crate::pipeline::Generator;
use crate::point_cloud::PointCloudStore;
use crate::point_pass::{create_depth_view, ExternalPointBuffer, GpuPointBackend, PointBindings, PointPass};
use crate::renderer::PointCloudRenderer;

const PIXELS_PER_SCROLL_LINE: f32 = 40.0;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

/// Runs the pipeline with the current controls and, on success, points the renderer at the
/// new data. On failure the previous point set stays on screen.
fn refresh_points(
    generator: &mut Generator,
    store: &mut PointCloudStore,
    renderer: &mut PointCloudRenderer<GpuPointBackend>,
    backend: &GpuPointBackend,
    controls: &ControlPanel,
    packed_upload: bool,
) {
    if let Err(err) = generator.regenerate_into(store, &controls.request()) {
        warn!("regeneration failed, keeping {} points: {err}", store.point_count());
        return;
    }
    if packed_upload {
        renderer.set_source_buffer(Some(ExternalPointBuffer::from_store(backend.device(), store)));
    }
}

pub async fn arun(config: ViewerConfig) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let window = WindowBuilder::new()
        .with_title("Hypercone Playground")
        .build(&event_loop)
        .expect("Failed to create window");

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to set
        // the size manually when on web.
        use winit::dpi::PhysicalSize;
        let _ = window.request_inner_size(PhysicalSize::new(800, 600));

        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("hypercone")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("Couldn't append canvas to document body.");
    }

    let size = window.inner_size();

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(&window).expect("Failed to create surface");
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .await
        .expect("Failed to find an appropriate adapter");

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
            },
            None,
        )
        .await
        .expect("Failed to create device");

    let mut surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .expect("Surface is not supported by the adapter");
    surface.configure(&device, &surface_config);

    let point_pass = PointPass::new(&device, surface_config.format);
    let point_bindings = PointBindings::new(&device, &point_pass);
    let mut depth_view = create_depth_view(&device, surface_config.width, surface_config.height);
    let mut backend = GpuPointBackend::new(device, queue);

    let packed_upload = config.packed_upload;
    let mut controls = config.controls;
    let mut generator = Generator::new(config.generator);
    let mut store = PointCloudStore::new();
    let mut renderer = PointCloudRenderer::<GpuPointBackend>::new();
    let mut camera = OrbitCamera::new();
    let mut input = InputState::new();

    refresh_points(&mut generator, &mut store, &mut renderer, &backend, &controls, packed_upload);
    info!("{}", controls.summary());

    let mut last_frame = Instant::now();
    let window = &window;

    event_loop
        .run(move |event, target| {
            // Have the closure take ownership of the resources.
            // `event_loop.run` never returns, therefore we must do this to ensure
            // the resources are properly cleaned up.
            let _ = (&instance, &adapter);

            if let Event::AboutToWait = event {
                let actions = input.take_actions();
                if !actions.is_empty() {
                    for action in actions {
                        controls.apply(action);
                        if action == ControlAction::Reset {
                            camera = OrbitCamera::new();
                        }
                    }
                    refresh_points(&mut generator, &mut store, &mut renderer, &backend, &controls, packed_upload);
                    info!("{}", controls.summary());
                }

                let (dx, dy) = input.take_drag_delta();
                camera.rotate(dx, dy);
                camera.zoom(input.take_scroll());
                let now = Instant::now();
                camera.update(now.duration_since(last_frame).as_secs_f32());
                last_frame = now;

                let frame = match surface.get_current_texture() {
                    Ok(frame) => frame,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        surface.configure(backend.device(), &surface_config);
                        return;
                    }
                    Err(err) => {
                        warn!("dropping frame: {err}");
                        return;
                    }
                };
                let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

                let aspect = surface_config.width as f32 / surface_config.height as f32;
                point_bindings.update(backend.queue(), camera.view_proj(aspect), renderer.point_tint());

                let mut encoder = backend
                    .device()
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
                let draw = renderer.prepare(&mut backend, Some(&store));

                {
                    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Point Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    if let Some(draw) = draw {
                        point_pass.record(&mut rpass, &point_bindings, draw);
                    }
                }
                backend.queue().submit(Some(encoder.finish()));
                frame.present();

                window.request_redraw();
            };

            if let Event::WindowEvent { window_id: _, event } = event {
                match event {
                    WindowEvent::Resized(new_size) => {
                        surface_config.width = new_size.width.max(1);
                        surface_config.height = new_size.height.max(1);
                        surface.configure(backend.device(), &surface_config);
                        depth_view = create_depth_view(backend.device(), surface_config.width, surface_config.height);
                        // On macos the window needs to be redrawn manually after resizing
                        window.request_redraw();
                    }
                    WindowEvent::KeyboardInput { event, .. } => input.handle_key_event(&event),
                    WindowEvent::MouseInput { state, button, .. } => input.handle_mouse_button(button, state),
                    WindowEvent::CursorMoved { position, .. } => input.handle_cursor_moved(position.x, position.y),
                    WindowEvent::CursorLeft { .. } => input.handle_cursor_left(),
                    WindowEvent::MouseWheel { delta, .. } => input.handle_scroll(match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_SCROLL_LINE,
                    }),
                    WindowEvent::RedrawRequested => {}
                    WindowEvent::CloseRequested => {
                        renderer.release();
                        target.exit();
                    }
                    _ => {}
                };
                if input.take_exit() {
                    renderer.release();
                    target.exit();
                }
            }
        })
        .expect("Event loop terminated with an error");
}
