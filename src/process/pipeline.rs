use crate::error::GfxError;
use crate::primitives::vertex::Vertex;

/// How the outline pass is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WireframeMode {
    /// `PolygonMode::Line` over the triangle list.
    PolygonLine,
    /// Line list through an index buffer of front-facing triangle edges,
    /// rebuilt every frame, for adapters without `POLYGON_MODE_LINE`.
    EdgeList,
}

impl WireframeMode {
    pub fn for_features(features: wgpu::Features) -> Self {
        if features.contains(wgpu::Features::POLYGON_MODE_LINE) {
            WireframeMode::PolygonLine
        } else {
            WireframeMode::EdgeList
        }
    }

    pub fn required_features(self) -> wgpu::Features {
        match self {
            WireframeMode::PolygonLine => wgpu::Features::POLYGON_MODE_LINE,
            WireframeMode::EdgeList => wgpu::Features::empty(),
        }
    }

    fn primitive(self) -> (wgpu::PrimitiveTopology, wgpu::PolygonMode) {
        match self {
            WireframeMode::PolygonLine => (wgpu::PrimitiveTopology::TriangleList, wgpu::PolygonMode::Line),
            WireframeMode::EdgeList => (wgpu::PrimitiveTopology::LineList, wgpu::PolygonMode::Fill),
        }
    }
}

/// Runs `f` inside a validation error scope and turns a captured error into
/// [`GfxError::Compile`].
pub async fn validated<T>(
    device: &wgpu::Device,
    label: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T, GfxError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match device.pop_error_scope().await {
        Some(err) => Err(GfxError::Compile {
            label,
            log: err.to_string(),
        }),
        None => Ok(value),
    }
}

pub async fn compile_shader(
    device: &wgpu::Device,
    label: &'static str,
    source: String,
) -> Result<wgpu::ShaderModule, GfxError> {
    validated(device, label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
    .await
}

pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let uniform = |binding: u32, visibility: wgpu::ShaderStages| wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Sphere Bind Group Layout"),
        entries: &[
            uniform(0, wgpu::ShaderStages::VERTEX),
            uniform(1, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

pub fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    transform_buffer: &wgpu::Buffer,
    tint_buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: tint_buffer.as_entire_binding(),
            },
        ],
    })
}

/// Builds the fill pipeline and the wireframe pipeline. Both read the same
/// vertex buffer layout and cull back faces. Culling has no effect on the
/// `EdgeList` line pass, which only receives visible edges.
pub async fn create_pipelines(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    wireframe: WireframeMode,
) -> Result<(wgpu::RenderPipeline, wgpu::RenderPipeline), GfxError> {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sphere Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let fill = validated(device, "Fill Pipeline", || {
        create_pipeline(
            device,
            module,
            &layout,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::PolygonMode::Fill,
            "Fill Pipeline",
        )
    })
    .await?;

    let (topology, polygon_mode) = wireframe.primitive();
    let lines = validated(device, "Wireframe Pipeline", || {
        create_pipeline(
            device,
            module,
            &layout,
            format,
            topology,
            polygon_mode,
            "Wireframe Pipeline",
        )
    })
    .await?;

    Ok((fill, lines))
}

fn create_pipeline(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    polygon_mode: wgpu::PolygonMode,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: "vs_main",
            buffers: &[Vertex::LAYOUT],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
