#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use std::borrow::Cow;
    use wasm_bindgen::prelude::*;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub solid_pipeline: ::wgpu::RenderPipeline,
        pub wireframe_pipeline: ::wgpu::RenderPipeline,
        pub marker_pipeline: ::wgpu::RenderPipeline,
        pub uniform_buffer: ::wgpu::Buffer,
        pub uniform_bind_group: ::wgpu::BindGroup,
        pub depth_view: ::wgpu::TextureView,
        pub solid_vertex_buffer: ::wgpu::Buffer,
        pub solid_vertex_count: u32,
        pub wireframe_vertex_buffer: ::wgpu::Buffer,
        pub wireframe_vertex_count: u32,
        pub marker_vertex_buffer: ::wgpu::Buffer,
        pub marker_vertex_count: u32,
    }

    const SOLID_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    _pad: f32,
};

@group(0) @binding(0)
var<storage, read> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
    // The model matrix is a pure rotation, so it is safe for normals too.
    return VsOut(
        globals.view_proj * globals.model * vec4<f32>(position, 1.0),
        (globals.model * vec4<f32>(normal, 0.0)).xyz,
    );
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(globals.light_dir);
    let ndotl = max(dot(n, l), 0.0);

    // Flat grey facets; the per-face normals do the visual work.
    let base = vec3<f32>(0.62, 0.64, 0.70);
    let shade = 0.25 + 0.75 * ndotl;
    return vec4<f32>(base * shade, 1.0);
}
"#;

    const WIREFRAME_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    _pad: f32,
};

@group(0) @binding(0)
var<storage, read> globals: Globals;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.view_proj * globals.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 0.85);
}
"#;

    // Marker positions arrive already in world space, so only the
    // view-projection applies here.
    const MARKER_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    light_dir: vec3<f32>,
    _pad: f32,
};

@group(0) @binding(0)
var<storage, read> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    return VsOut(globals.view_proj * vec4<f32>(position, 1.0), color);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(fs_in.color, 0.95);
}
"#;

    #[repr(C)]
    #[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    pub struct SolidVertex {
        pub position: [f32; 3],
        pub normal: [f32; 3],
    }

    #[repr(C)]
    #[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    pub struct LineVertex {
        pub position: [f32; 3],
    }

    #[repr(C)]
    #[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    pub struct MarkerVertex {
        pub position: [f32; 3],
        pub color: [f32; 3],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
        light_dir: [f32; 3],
        _pad: f32,
    }

    const LIGHT_DIR: [f32; 3] = [0.4, 0.7, 0.5];

    struct PipelineSpec<'a> {
        label: &'a str,
        shader: &'a ::wgpu::ShaderModule,
        vertex_layout: ::wgpu::VertexBufferLayout<'a>,
        topology: ::wgpu::PrimitiveTopology,
        blend: ::wgpu::BlendState,
        depth: Option<::wgpu::DepthStencilState>,
    }

    fn create_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        format: ::wgpu::TextureFormat,
        spec: PipelineSpec<'_>,
    ) -> ::wgpu::RenderPipeline {
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: spec.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[spec.vertex_layout],
            },
            fragment: Some(::wgpu::FragmentState {
                module: spec.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(spec.blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: spec.topology,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                // The facet mesh has mixed winding; culling would drop faces.
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: spec.depth,
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn depth_state(write: bool, compare: ::wgpu::CompareFunction) -> ::wgpu::DepthStencilState {
        ::wgpu::DepthStencilState {
            format: ::wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        }
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("showcase-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    pub async fn init_wgpu_from_canvas(
        canvas: web_sys::HtmlCanvasElement,
        solid_vertices: &[SolidVertex],
        wireframe_vertices: &[LineVertex],
    ) -> Result<WgpuContext, JsValue> {
        let width = canvas.width();
        let height = canvas.height();

        // The surface borrows the instance, and both live as long as the
        // page does, so the instance is leaked once at startup.
        //
        // WebGPU when the browser has it, WebGL otherwise.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("showcase-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let solid_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("showcase-solid-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(SOLID_SHADER)),
        });

        let wireframe_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("showcase-wireframe-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(WIREFRAME_SHADER)),
        });

        let marker_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("showcase-marker-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(MARKER_SHADER)),
        });

        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("showcase-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::STORAGE | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                label: Some("showcase-globals-bgl"),
                entries: &[::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: ::wgpu::BindingType::Buffer {
                        ty: ::wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("showcase-globals-bg"),
            layout: &uniform_bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
            label: Some("showcase-pipeline-layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            immediate_size: 0,
        });

        let position_attr = ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        };
        let second_vec3_attr = ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 1,
        };

        let solid_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineSpec {
                label: "showcase-solid-pipeline",
                shader: &solid_shader,
                vertex_layout: ::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<SolidVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[position_attr, second_vec3_attr],
                },
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                blend: ::wgpu::BlendState::REPLACE,
                depth: Some(depth_state(true, ::wgpu::CompareFunction::Less)),
            },
        );

        // The wireframe sits slightly off the surface; depth-test against the
        // solid so back edges stay hidden, but never write depth.
        let wireframe_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineSpec {
                label: "showcase-wireframe-pipeline",
                shader: &wireframe_shader,
                vertex_layout: ::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[position_attr],
                },
                topology: ::wgpu::PrimitiveTopology::LineList,
                blend: ::wgpu::BlendState::ALPHA_BLENDING,
                depth: Some(depth_state(false, ::wgpu::CompareFunction::LessEqual)),
            },
        );

        let marker_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            config.format,
            PipelineSpec {
                label: "showcase-marker-pipeline",
                shader: &marker_shader,
                vertex_layout: ::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MarkerVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[position_attr, second_vec3_attr],
                },
                topology: ::wgpu::PrimitiveTopology::PointList,
                blend: ::wgpu::BlendState::ALPHA_BLENDING,
                depth: Some(depth_state(false, ::wgpu::CompareFunction::LessEqual)),
            },
        );

        let solid_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("showcase-solid-vertices"),
            contents: bytemuck::cast_slice(solid_vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });

        let wireframe_vertex_buffer =
            device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("showcase-wireframe-vertices"),
                contents: bytemuck::cast_slice(wireframe_vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });

        let marker_vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("showcase-marker-vertices"),
            contents: bytemuck::bytes_of(&MarkerVertex {
                position: [0.0, 0.0, 0.0],
                color: [0.0, 0.0, 0.0],
            }),
            usage: ::wgpu::BufferUsages::VERTEX | ::wgpu::BufferUsages::COPY_DST,
        });

        // Seed the globals so the first frame never reads garbage.
        let globals = Globals {
            view_proj: [[0.0; 4]; 4],
            model: [[0.0; 4]; 4],
            light_dir: LIGHT_DIR,
            _pad: 0.0,
        };
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&globals));

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas,
            solid_pipeline,
            wireframe_pipeline,
            marker_pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            solid_vertex_buffer,
            solid_vertex_count: solid_vertices.len() as u32,
            wireframe_vertex_buffer,
            wireframe_vertex_count: wireframe_vertices.len() as u32,
            marker_vertex_buffer,
            marker_vertex_count: 0,
        })
    }

    pub fn set_marker_points(ctx: &mut WgpuContext, points: &[MarkerVertex]) {
        if points.is_empty() {
            ctx.marker_vertex_count = 0;
            return;
        }

        ctx.marker_vertex_buffer =
            ctx.device
                .create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                    label: Some("showcase-marker-vertices"),
                    contents: bytemuck::cast_slice(points),
                    usage: ::wgpu::BufferUsages::VERTEX,
                });
        ctx.marker_vertex_count = points.len() as u32;
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    pub fn render_showcase(
        ctx: &WgpuContext,
        view_proj: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
    ) -> Result<(), JsValue> {
        let frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let globals = Globals {
            view_proj,
            model,
            light_dir: LIGHT_DIR,
            _pad: 0.0,
        };
        ctx.queue
            .write_buffer(&ctx.uniform_buffer, 0, bytemuck::bytes_of(&globals));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("showcase-encoder"),
            });

        // All three draws share the same attachments, so one pass covers
        // them; pass-internal order puts markers on top of the wireframe.
        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("showcase-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: 0.015,
                            g: 0.015,
                            b: 0.022,
                            a: 1.0,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, &ctx.uniform_bind_group, &[]);

            rpass.set_pipeline(&ctx.solid_pipeline);
            rpass.set_vertex_buffer(0, ctx.solid_vertex_buffer.slice(..));
            rpass.draw(0..ctx.solid_vertex_count, 0..1);

            rpass.set_pipeline(&ctx.wireframe_pipeline);
            rpass.set_vertex_buffer(0, ctx.wireframe_vertex_buffer.slice(..));
            rpass.draw(0..ctx.wireframe_vertex_count, 0..1);

            if ctx.marker_vertex_count > 0 {
                rpass.set_pipeline(&ctx.marker_pipeline);
                rpass.set_vertex_buffer(0, ctx.marker_vertex_buffer.slice(..));
                rpass.draw(0..ctx.marker_vertex_count, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    #[derive(Debug, Copy, Clone)]
    pub struct SolidVertex {
        pub position: [f32; 3],
        pub normal: [f32; 3],
    }

    #[derive(Debug, Copy, Clone)]
    pub struct LineVertex {
        pub position: [f32; 3],
    }

    #[derive(Debug, Copy, Clone)]
    pub struct MarkerVertex {
        pub position: [f32; 3],
        pub color: [f32; 3],
    }

    pub async fn init_wgpu_from_canvas(
        _canvas: web_sys::HtmlCanvasElement,
        _solid_vertices: &[SolidVertex],
        _wireframe_vertices: &[LineVertex],
    ) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn set_marker_points(_ctx: &mut WgpuContext, _points: &[MarkerVertex]) {}

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_showcase(
        _ctx: &WgpuContext,
        _view_proj: [[f32; 4]; 4],
        _model: [[f32; 4]; 4],
    ) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{
    LineVertex, MarkerVertex, SolidVertex, WgpuContext, init_wgpu_from_canvas, render_showcase,
    resize_wgpu, set_marker_points,
};
