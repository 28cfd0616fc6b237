pub mod config;
pub mod error;
pub mod primitives;
pub mod process;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use std::iter;
use anyhow::Context;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use config::DemoConfig;
use error::GfxError;
use primitives::camera::{projection, TintUniform, TransformUniform};
use process::frame::{DemoState, FrameControl};
use process::input::InputState;
use process::pipeline::{compile_shader, create_bind_group, create_bind_group_layout, create_pipelines, WireframeMode};


#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

pub struct State {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    fill_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    wireframe: WireframeMode,
    vertex_buffer: wgpu::Buffer,
    edge_buffer: Option<(wgpu::Buffer, u32)>,
    transform_buffer: wgpu::Buffer,
    fill_bind_group: wgpu::BindGroup,
    line_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
    demo: DemoState,
    input: InputState,
    window: Window,
}

impl State {
    async fn new(window: Window, demo_config: DemoConfig) -> Result<Self, GfxError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The window is stored in `State` after the surface, so it outlives it.
        let surface = unsafe { instance.create_surface(&window) }
            .map_err(|err| GfxError::Init(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| GfxError::Init("no compatible graphics adapter".to_string()))?;

        let info = adapter.get_info();
        log::info!("{:#?}", info);

        let wireframe = WireframeMode::for_features(adapter.features());
        log::info!("Wireframe mode: {:?}", wireframe);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    features: wireframe.required_features(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                },
                None,
            )
            .await
            .map_err(|err| GfxError::Init(err.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| GfxError::Init("surface is incompatible with the adapter".to_string()))?;
        log::info!("Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);


        // SCENE SETUP
        let demo = DemoState::new(demo_config);
        log::info!("Sphere mesh: {} vertices", demo.mesh().len());

        let vertex_buffer = demo.mesh().to_buffer(&device);
        let edge_buffer = match wireframe {
            WireframeMode::PolygonLine => None,
            WireframeMode::EdgeList => {
                // room for all three edges of every triangle; refilled each frame
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Edge Index Buffer"),
                    size: (demo.mesh().len() * 2 * std::mem::size_of::<u32>()) as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                Some((buffer, 0))
            }
        };

        let aspect = config.width as f32 / config.height as f32;
        let transform_buffer = TransformUniform::from(demo.camera(), aspect).to_buffer(&device);
        let fill_tint_buffer = TintUniform::new(demo_config.base_color).to_buffer(&device, "Fill Tint Buffer");
        let line_tint_buffer = TintUniform::new(demo_config.line_color).to_buffer(&device, "Line Tint Buffer");

        let bind_group_layout = create_bind_group_layout(&device);
        let fill_bind_group = create_bind_group(
            &device,
            &bind_group_layout,
            &transform_buffer,
            &fill_tint_buffer,
            "Fill Bind Group",
        );
        let line_bind_group = create_bind_group(
            &device,
            &bind_group_layout,
            &transform_buffer,
            &line_tint_buffer,
            "Line Bind Group",
        );


        // RENDER PIPELINES
        let shader_structs = include_str!("./shaders/structs.wgsl");
        let sphere_shader = include_str!("./shaders/sphere.wgsl");
        let combined_sphere_shader = format!("{}\n{}", shader_structs, sphere_shader);
        let shader = compile_shader(&device, "Sphere Shader", combined_sphere_shader).await?;

        let (fill_pipeline, wireframe_pipeline) =
            create_pipelines(&device, &shader, &bind_group_layout, config.format, wireframe).await?;

        let [r, g, b] = demo_config.clear_color;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            fill_pipeline,
            wireframe_pipeline,
            wireframe,
            vertex_buffer,
            edge_buffer,
            transform_buffer,
            fill_bind_group,
            line_bind_group,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            demo,
            input: InputState::new(),
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        self.input.process_events(event)
    }

    /// CPU side of a frame: input, camera, convergence, then uploads.
    fn update(&mut self) -> FrameControl {
        let snapshot = self.input.snapshot();
        let control = self.demo.update(&snapshot);
        if control == FrameControl::Continue {
            self.demo.mesh().update_buffer(&self.vertex_buffer, &self.queue);
            TransformUniform::from(self.demo.camera(), self.aspect())
                .update_buffer(&self.transform_buffer, &self.queue);

            let clip = projection(self.aspect()) * self.demo.camera().model();
            if let Some((buffer, edge_count)) = &mut self.edge_buffer {
                let edges = self.demo.mesh().visible_edge_indices(clip);
                if !edges.is_empty() {
                    self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&edges));
                }
                *edge_count = edges.len() as u32;
            }
        }
        control
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let vertex_count = self.demo.mesh().len() as u32;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            // Filled sphere
            render_pass.set_pipeline(&self.fill_pipeline);
            render_pass.set_bind_group(0, &self.fill_bind_group, &[]);
            render_pass.draw(0..vertex_count, 0..1);

            // Wireframe overlay
            render_pass.set_pipeline(&self.wireframe_pipeline);
            render_pass.set_bind_group(0, &self.line_bind_group, &[]);
            match &self.edge_buffer {
                Some((edges, edge_count)) => {
                    render_pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..*edge_count, 0, 0..1);
                }
                None => render_pass.draw(0..vertex_count, 0..1),
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn finish_frame(&mut self) {
        self.demo.finish_frame();
    }

    fn teardown(self) {
        log::info!("Tearing down renderer ({:?} wireframe)", self.wireframe);
        self.device.poll(wgpu::Maintain::Wait);
    }
}


#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = run().await {
            log::error!("{:#}", err);
        }
    });
}

pub async fn run() -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Warn).context("could not initialize logger")?;
        } else {
            env_logger::init();
        }
    }

    let demo_config = DemoConfig::default();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(demo_config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(demo_config.size[0], demo_config.size[1]))
        .build(&event_loop)
        .map_err(|err| GfxError::Init(err.to_string()))
        .context("could not open window")?;

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("chroma-sphere")?;
                let canvas = web_sys::Element::from(window.canvas());
                dst.append_child(&canvas).ok()?;
                Some(())
            })
            .ok_or_else(|| GfxError::Init("couldn't append canvas to document body".to_string()))?;
    }

    let state = State::new(window, demo_config)
        .await
        .context("could not set up renderer")?;
    let mut state = Some(state);

    event_loop.run(move |event, _, control_flow| {
        if let Event::LoopDestroyed = event {
            if let Some(state) = state.take() {
                state.teardown();
            }
            return;
        }
        let state = match state.as_mut() {
            Some(state) => state,
            None => return,
        };

        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window().id() => {
                if !state.input(event) {
                    match event {
                        WindowEvent::CloseRequested => {
                            log::info!("Window closed");
                            *control_flow = ControlFlow::Exit
                        }
                        WindowEvent::Resized(physical_size) => {
                            state.resize(*physical_size);
                        }
                        WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                            state.resize(**new_inner_size);
                        }
                        _ => {}
                    }
                }
            }
            Event::RedrawRequested(window_id) if window_id == state.window().id() => {
                if state.update() == FrameControl::Quit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.resize(state.size)
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        *control_flow = ControlFlow::Exit
                    }
                    Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout"),
                }
                state.finish_frame();
            }
            Event::MainEventsCleared => {
                state.window().request_redraw();
            }
            _ => {}
        }
    })
}
