//! The blit pipeline.
//!
//! Draws a source texture into a render target through a shader that
//! applies a transform matrix, an optional color transform (the GPU path
//! of the color service), and alpha association. All bind state lives
//! inside a scoped render pass, so it is released on every exit path.

use crate::context::GraphicsContext;
use crate::texture::{texture_format, GpuTexture};
use bytemuck::{Pod, Zeroable};
use nodecut_color::{ColorProcessor, TransferFunction};
use nodecut_core::PixelFormat;
use tracing::debug;
use wgpu::util::DeviceExt;

const BLIT_SHADER: &str = r#"
struct BlitUniform {
    transform: mat4x4<f32>,
    color_r: vec4<f32>,
    color_g: vec4<f32>,
    color_b: vec4<f32>,
    // x: source transfer id, y: target transfer id, z: flags
    ids: vec4<u32>,
    // x: source gamma, y: target gamma
    gammas: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: BlitUniform;
@group(0) @binding(1) var src: texture_2d<f32>;
@group(0) @binding(2) var src_sampler: sampler;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOut {
    // Two-triangle quad covering NDC, transformed by the matrix input
    var positions = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0), vec2<f32>(1.0, -1.0), vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0), vec2<f32>(1.0, -1.0), vec2<f32>(1.0, 1.0),
    );
    let pos = positions[index];
    var out: VertexOut;
    out.position = u.transform * vec4<f32>(pos, 0.0, 1.0);
    out.uv = vec2<f32>(pos.x * 0.5 + 0.5, 0.5 - pos.y * 0.5);
    return out;
}

fn to_linear(v: f32, id: u32, gamma: f32) -> f32 {
    if (id == 1u) {
        if (v <= 0.04045) { return v / 12.92; }
        return pow((v + 0.055) / 1.055, 2.4);
    }
    if (id == 2u) {
        if (v < 0.081) { return v / 4.5; }
        return pow((v + 0.099) / 1.099, 1.0 / 0.45);
    }
    if (id == 3u) {
        return pow(max(v, 0.0), gamma);
    }
    return v;
}

fn from_linear(v: f32, id: u32, gamma: f32) -> f32 {
    if (id == 1u) {
        if (v <= 0.0031308) { return v * 12.92; }
        return 1.055 * pow(v, 1.0 / 2.4) - 0.055;
    }
    if (id == 2u) {
        if (v < 0.018) { return v * 4.5; }
        return 1.099 * pow(v, 0.45) - 0.099;
    }
    if (id == 3u) {
        if (gamma == 0.0) { return 0.0; }
        return pow(max(v, 0.0), 1.0 / gamma);
    }
    return v;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    var c = textureSample(src, src_sampler, in.uv);

    if ((u.ids.z & 1u) != 0u) {
        var rgb = vec3<f32>(
            to_linear(c.r, u.ids.x, u.gammas.x),
            to_linear(c.g, u.ids.x, u.gammas.x),
            to_linear(c.b, u.ids.x, u.gammas.x),
        );
        rgb = vec3<f32>(
            dot(u.color_r.xyz, rgb),
            dot(u.color_g.xyz, rgb),
            dot(u.color_b.xyz, rgb),
        );
        c = vec4<f32>(
            from_linear(rgb.r, u.ids.y, u.gammas.y),
            from_linear(rgb.g, u.ids.y, u.gammas.y),
            from_linear(rgb.b, u.ids.y, u.gammas.y),
            c.a,
        );
    }

    if ((u.ids.z & 2u) != 0u) {
        c = vec4<f32>(c.rgb * c.a, c.a);
    }

    return c;
}
"#;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct BlitUniform {
    transform: [[f32; 4]; 4],
    color_r: [f32; 4],
    color_g: [f32; 4],
    color_b: [f32; 4],
    ids: [u32; 4],
    gammas: [f32; 4],
}

const FLAG_COLOR_TRANSFORM: u32 = 1;
const FLAG_ASSOCIATE_ALPHA: u32 = 2;

fn transfer_id(tf: TransferFunction) -> (u32, f32) {
    match tf {
        TransferFunction::Linear => (0, 1.0),
        TransferFunction::SRGB => (1, 1.0),
        TransferFunction::Rec709 => (2, 1.0),
        TransferFunction::Gamma(g) => (3, g),
    }
}

/// Per-blit parameters.
#[derive(Debug, Clone, Copy)]
pub struct BlitParams {
    /// Geometry transform applied to the source quad.
    pub transform: glam::Mat4,
    /// GPU color transform to fold into the blit, if any.
    pub color: Option<ColorProcessor>,
    /// Premultiply the output by its alpha.
    pub associate_alpha: bool,
}

impl Default for BlitParams {
    fn default() -> Self {
        Self {
            transform: glam::Mat4::IDENTITY,
            color: None,
            associate_alpha: true,
        }
    }
}

/// Shader pipeline blitting one texture into another.
pub struct BlitPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    target_format: PixelFormat,
}

impl BlitPipeline {
    /// Create a blit pipeline rendering into targets of `target_format`.
    pub fn new(ctx: &GraphicsContext, target_format: PixelFormat) -> Self {
        let device = &ctx.device;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        // Rgba32Float is not filterable without an extra
                        // device feature, so sampling is unfiltered
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format(target_format),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        debug!(?target_format, "blit pipeline created");

        Self {
            pipeline,
            bind_layout,
            sampler,
            target_format,
        }
    }

    /// Target pixel format this pipeline renders into.
    pub fn target_format(&self) -> PixelFormat {
        self.target_format
    }

    /// Blit `src` into `dst`, clearing `dst` first.
    pub fn blit(
        &self,
        ctx: &GraphicsContext,
        src: &GpuTexture,
        dst: &GpuTexture,
        params: &BlitParams,
    ) {
        let mut flags = 0u32;
        if params.color.is_some() {
            flags |= FLAG_COLOR_TRANSFORM;
        }
        if params.associate_alpha {
            flags |= FLAG_ASSOCIATE_ALPHA;
        }

        let (color_r, color_g, color_b, src_tf, dst_tf) = match params.color {
            Some(p) => {
                let m = p.matrix;
                (
                    [m[0][0], m[0][1], m[0][2], 0.0],
                    [m[1][0], m[1][1], m[1][2], 0.0],
                    [m[2][0], m[2][1], m[2][2], 0.0],
                    transfer_id(p.to_linear),
                    transfer_id(p.from_linear),
                )
            }
            None => (
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                (0, 1.0),
                (0, 1.0),
            ),
        };

        let uniform = BlitUniform {
            transform: params.transform.to_cols_array_2d(),
            color_r,
            color_g,
            color_b,
            ids: [src_tf.0, dst_tf.0, flags, 0],
            gammas: [src_tf.1, dst_tf.1, 0.0, 0.0],
        };

        let uniform_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Blit Uniform"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &self.bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&src.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..6, 0..1);
        }

        ctx.queue.submit(Some(encoder.finish()));
    }
}
