use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use quadspin_engine::coords::Viewport;
use quadspin_engine::render::{
    compile_stage, create_render_pipeline_checked, RenderCtx, RenderTarget, ShaderStage,
};

use crate::scene::Transforms;

const VERTEX_SHADER: &str = include_str!("shaders/quad.vert.wgsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/quad.frag.wgsl");

/// WGSL source for each stage of the quad program.
#[derive(Debug, Copy, Clone)]
struct ShaderSources<'a> {
    vertex: &'a str,
    fragment: &'a str,
}

const QUAD_SHADERS: ShaderSources<'static> = ShaderSources {
    vertex: VERTEX_SHADER,
    fragment: FRAGMENT_SHADER,
};

const MODEL_UNIFORM: &str = "u_model";
const VIEW_UNIFORM: &str = "u_view";
const PROJ_UNIFORM: &str = "u_proj";

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    /// Tightly packed position-only layout at attribute location 0.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangle-strip order: top-left, bottom-left, top-right, bottom-right.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.8, 0.5, 0.0] },
    QuadVertex { position: [-0.8, -0.5, 0.0] },
    QuadVertex { position: [0.8, 0.5, 0.0] },
    QuadVertex { position: [0.8, -0.5, 0.0] },
];

/// A resolved `var<uniform>` slot and the buffer bound to it.
struct UniformLocation {
    binding: u32,
    buffer: wgpu::Buffer,
}

/// Linked vertex + fragment stages with their model/view/projection uniforms.
///
/// A uniform missing from the vertex source resolves to `None`; uploads to it
/// are silently dropped.
///
/// `valid` is false when either stage failed to compile or the pipeline
/// failed to link; such a program draws nothing.
struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    valid: bool,
    bind_group: wgpu::BindGroup,
    model: Option<UniformLocation>,
    view: Option<UniformLocation>,
    proj: Option<UniformLocation>,
}

impl ShaderProgram {
    fn new(
        device: &wgpu::Device,
        sources: ShaderSources<'_>,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let vertex = compile_stage(device, ShaderStage::Vertex, "quadspin quad vs", sources.vertex);
        let fragment = compile_stage(device, ShaderStage::Fragment, "quadspin quad fs", sources.fragment);

        let model = uniform_location(device, sources.vertex, MODEL_UNIFORM);
        let view = uniform_location(device, sources.vertex, VIEW_UNIFORM);
        let proj = uniform_location(device, sources.vertex, PROJ_UNIFORM);

        let locations: Vec<&UniformLocation> =
            [&model, &view, &proj].into_iter().flatten().collect();

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = locations
            .iter()
            .map(|loc| wgpu::BindGroupLayoutEntry {
                binding: loc.binding,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(MAT4_SIZE),
                },
                count: None,
            })
            .collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadspin quad bgl"),
            entries: &layout_entries,
        });

        let group_entries: Vec<wgpu::BindGroupEntry> = locations
            .iter()
            .map(|loc| wgpu::BindGroupEntry {
                binding: loc.binding,
                resource: loc.buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadspin quad bind group"),
            layout: &bind_group_layout,
            entries: &group_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadspin quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let linked = create_render_pipeline_checked(
            device,
            &wgpu::RenderPipelineDescriptor {
                label: Some("quadspin quad pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &vertex.module,
                    entry_point: Some(vertex.stage.entry_point()),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fragment.module,
                    entry_point: Some(fragment.stage.entry_point()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Both faces are visible while the quad spins.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            },
        );

        let valid = vertex.compiled && fragment.compiled && linked.linked;
        if !valid {
            log::warn!("quad shader program is invalid; the quad will not be drawn");
        }

        // Stage modules are only needed for linking; they drop here.
        Self {
            pipeline: linked.pipeline,
            valid,
            bind_group,
            model,
            view,
            proj,
        }
    }

    fn set_uniform(queue: &wgpu::Queue, location: Option<&UniformLocation>, value: &Mat4) {
        if let Some(loc) = location {
            queue.write_buffer(&loc.buffer, 0, bytemuck::cast_slice(&value.to_cols_array()));
        }
    }

    fn destroy(self) {
        for loc in [self.model, self.view, self.proj].into_iter().flatten() {
            loc.buffer.destroy();
        }
    }
}

const MAT4_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;

fn uniform_location(device: &wgpu::Device, vertex_source: &str, name: &str) -> Option<UniformLocation> {
    let Some(binding) = resolve_uniform_binding(vertex_source, name) else {
        log::warn!("uniform '{name}' not declared in {}", ShaderStage::Vertex);
        return None;
    };

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(name),
        size: MAT4_SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    Some(UniformLocation { binding, buffer })
}

/// Finds the `@binding(N)` of the `var<uniform>` named `name` in WGSL source.
fn resolve_uniform_binding(source: &str, name: &str) -> Option<u32> {
    source.lines().find_map(|line| {
        let code = line.split_once("//").map_or(line, |(code, _)| code);
        let (attrs, decl) = code.split_once("var<uniform>")?;

        let ident = decl
            .trim_start()
            .split(|c: char| c == ':' || c.is_whitespace())
            .next()?;
        if ident != name {
            return None;
        }

        let start = attrs.find("@binding(")? + "@binding(".len();
        let len = attrs[start..].find(')')?;
        attrs[start..start + len].trim().parse().ok()
    })
}

/// GPU resources for the spinning quad.
///
/// Created once in `on_load`, released once via [`QuadRenderer::destroy`].
pub struct QuadRenderer {
    vertex_buffer: wgpu::Buffer,
    program: ShaderProgram,
}

impl QuadRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self::with_sources(device, QUAD_SHADERS, surface_format, depth_format)
    }

    fn with_sources(
        device: &wgpu::Device,
        sources: ShaderSources<'_>,
        surface_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadspin quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let program = ShaderProgram::new(device, sources, surface_format, depth_format);

        Self {
            vertex_buffer,
            program,
        }
    }

    /// Whether both shader stages compiled and the pipeline linked.
    pub fn is_valid(&self) -> bool {
        self.program.valid
    }

    /// Uploads `transforms` and draws the quad as a 4-vertex triangle strip.
    ///
    /// `viewport` is clamped to the target size; nothing is drawn when it is
    /// empty or when the shader program is invalid.
    pub fn render(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        viewport: Viewport,
        transforms: &Transforms,
    ) {
        let vp = Viewport::new(
            viewport.width.min(ctx.viewport.width),
            viewport.height.min(ctx.viewport.height),
        );
        let program = &self.program;
        if !vp.is_valid() || !program.valid {
            return;
        }

        ShaderProgram::set_uniform(ctx.queue, program.view.as_ref(), &transforms.view);
        ShaderProgram::set_uniform(ctx.queue, program.proj.as_ref(), &transforms.proj);
        ShaderProgram::set_uniform(ctx.queue, program.model.as_ref(), &transforms.model);

        let depth_attachment = target.depth_attachment();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadspin quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, vp.width, vp.height, 0.0, 1.0);
        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, &program.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }

    /// Releases the vertex buffer, the uniform buffers and the pipeline.
    pub fn destroy(self) {
        self.vertex_buffer.destroy();
        self.program.destroy();
        log::debug!("quad resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;

    // ── vertex data ───────────────────────────────────────────────────────

    #[test]
    fn vertex_layout_is_tightly_packed_vec3() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn vertex_bytes_match_float_count() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 4 * 3 * std::mem::size_of::<f32>());
    }

    #[test]
    fn strip_triangles_cover_the_quad() {
        let area = |a: [f32; 3], b: [f32; 3], c: [f32; 3]| {
            ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
        };
        let v = QUAD_VERTICES.map(|q| q.position);
        let total = area(v[0], v[1], v[2]) + area(v[1], v[2], v[3]);
        assert!((total - 1.6 * 1.0).abs() < 1e-6);
    }

    // ── uniform resolution ────────────────────────────────────────────────

    #[test]
    fn vertex_shader_uniforms_resolve() {
        assert_eq!(resolve_uniform_binding(VERTEX_SHADER, MODEL_UNIFORM), Some(0));
        assert_eq!(resolve_uniform_binding(VERTEX_SHADER, VIEW_UNIFORM), Some(1));
        assert_eq!(resolve_uniform_binding(VERTEX_SHADER, PROJ_UNIFORM), Some(2));
    }

    #[test]
    fn fragment_shader_declares_no_uniforms() {
        assert_eq!(resolve_uniform_binding(FRAGMENT_SHADER, MODEL_UNIFORM), None);
    }

    #[test]
    fn unknown_uniform_is_none() {
        assert_eq!(resolve_uniform_binding(VERTEX_SHADER, "u_color"), None);
    }

    #[test]
    fn prefix_match_is_not_a_match() {
        let src = "@group(0) @binding(4) var<uniform> u_model_inv: mat4x4<f32>;";
        assert_eq!(resolve_uniform_binding(src, "u_model"), None);
        assert_eq!(resolve_uniform_binding(src, "u_model_inv"), Some(4));
    }

    #[test]
    fn commented_out_declaration_is_ignored() {
        let src = "// @group(0) @binding(7) var<uniform> u_view: mat4x4<f32>;";
        assert_eq!(resolve_uniform_binding(src, "u_view"), None);
    }

    // ── shader sources ────────────────────────────────────────────────────

    #[test]
    fn stage_sources_define_their_entry_points() {
        assert!(VERTEX_SHADER.contains(&format!("fn {}(", ShaderStage::Vertex.entry_point())));
        assert!(FRAGMENT_SHADER.contains(&format!("fn {}(", ShaderStage::Fragment.entry_point())));
    }

    #[test]
    fn vertex_shader_applies_proj_view_model() {
        assert!(VERTEX_SHADER.contains("u_proj * u_view * u_model"));
    }

    // ── gpu (noop backend) ────────────────────────────────────────────────

    const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn noop_device() -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
    }

    fn target_texture(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("quad test target"),
                size: wgpu::Extent3d {
                    width: 64,
                    height: 32,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Records one frame through `QuadRenderer::render` and submits it.
    ///
    /// The noop device keeps wgpu's default error handler, which panics on any
    /// validation error reaching the queue.
    fn render_one_frame(device: &wgpu::Device, queue: &wgpu::Queue, quad: &QuadRenderer) {
        let color_view = target_texture(device, COLOR_FORMAT);
        let depth_view = target_texture(device, DEPTH_FORMAT);
        let viewport = Viewport::from_physical(64, 32);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        let ctx = RenderCtx::new(device, queue, COLOR_FORMAT, Some(DEPTH_FORMAT), viewport);
        {
            let mut target = RenderTarget::new(&mut encoder, &color_view, Some(&depth_view));
            let transforms = Transforms::for_frame(&AnimationState::default(), viewport);
            quad.render(&ctx, &mut target, viewport, &transforms);
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    #[test]
    fn quad_program_is_valid() {
        let (device, queue) = noop_device();
        let quad = QuadRenderer::new(&device, COLOR_FORMAT, Some(DEPTH_FORMAT));
        assert!(quad.is_valid());
        render_one_frame(&device, &queue, &quad);
        quad.destroy();
    }

    #[test]
    fn broken_vertex_stage_draws_nothing_and_keeps_running() {
        let (device, queue) = noop_device();
        let broken = format!("{VERTEX_SHADER}\nfn broken( -> oops");
        let sources = ShaderSources {
            vertex: &broken,
            fragment: FRAGMENT_SHADER,
        };

        let quad = QuadRenderer::with_sources(&device, sources, COLOR_FORMAT, Some(DEPTH_FORMAT));
        assert!(!quad.is_valid());

        for _ in 0..3 {
            render_one_frame(&device, &queue, &quad);
        }
        quad.destroy();
    }

    #[test]
    fn broken_fragment_stage_invalidates_program() {
        let (device, _queue) = noop_device();
        let sources = ShaderSources {
            vertex: VERTEX_SHADER,
            fragment: "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0 }",
        };

        let quad = QuadRenderer::with_sources(&device, sources, COLOR_FORMAT, Some(DEPTH_FORMAT));
        assert!(!quad.is_valid());
        quad.destroy();
    }
}
