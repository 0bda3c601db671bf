//! Instanced point sprites for the particle cloud.
//!
//! Positions are uploaded once; colors are rewritten whenever the cloud's
//! color buffer is marked dirty. Each point is a screen-aligned square whose
//! size falls off with view depth.

use handcloud::PointCloud;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniforms {
    pub view_proj:     [[f32; 4]; 4], // 64 B
    pub model:         [[f32; 4]; 4], // +64 -> 128
    /// Surface size in physical pixels.
    pub viewport_size: [f32; 2],      // +8
    /// World-space sprite size, attenuated by depth in the shader.
    pub point_size:    f32,           // +4
    pub _pad0:         f32,           // +4 -> 144
}

// Buffer size must match the WGSL struct.
const _: [(); 144] = [(); core::mem::size_of::<PointUniforms>()];

pub struct PointsPipeline {
    pipeline:       wgpu::RenderPipeline,
    bind_group:     wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    quad_vb:        wgpu::Buffer,
    position_vb:    wgpu::Buffer,
    color_vb:       wgpu::Buffer,
    instances:      u32,
}

impl PointsPipeline {
    pub fn new(
        device:    &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        cloud:     &PointCloud,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label:              Some("Point Uniform Buffer"),
            size:               std::mem::size_of::<PointUniforms>() as u64,
            usage:              wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label:   Some("Point BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding:    0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty:                 wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size:   wgpu::BufferSize::new(
                        std::mem::size_of::<PointUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label:   Some("Point Bind Group"),
            layout:  &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding:  0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Sprite quad (two triangles), corners in [-1, 1].
        let corners: [[f32; 2]; 6] = [
            [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0],
            [-1.0, -1.0], [1.0, 1.0],  [-1.0, 1.0],
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Point Quad VB"),
            contents: bytemuck::cast_slice(&corners),
            usage:    wgpu::BufferUsages::VERTEX,
        });

        let position_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Point Positions"),
            contents: bytemuck::cast_slice(cloud.positions()),
            usage:    wgpu::BufferUsages::VERTEX,
        });

        let color_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Point Colors"),
            contents: bytemuck::cast_slice(cloud.colors()),
            usage:    wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("Points WGSL"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label:                Some("Point Pipeline Layout"),
            bind_group_layouts:   &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vbuf_layouts = [
            // Quad corners
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode:    wgpu::VertexStepMode::Vertex,
                attributes:   &[wgpu::VertexAttribute {
                    shader_location: 0,
                    format:          wgpu::VertexFormat::Float32x2,
                    offset:          0,
                }],
            },
            // Per-point position
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode:    wgpu::VertexStepMode::Instance,
                attributes:   &[wgpu::VertexAttribute {
                    shader_location: 1,
                    format:          wgpu::VertexFormat::Float32x3,
                    offset:          0,
                }],
            },
            // Per-point color
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode:    wgpu::VertexStepMode::Instance,
                attributes:   &[wgpu::VertexAttribute {
                    shader_location: 2,
                    format:          wgpu::VertexFormat::Float32x3,
                    offset:          0,
                }],
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label:  Some("Particle Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module:              &shader,
                entry_point:         "vs_main",
                buffers:             &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module:      &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format:     color_fmt,
                    blend:      None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format:              depth_fmt,
                depth_write_enabled: true,
                depth_compare:       wgpu::CompareFunction::LessEqual,
                stencil:             wgpu::StencilState::default(),
                bias:                wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview:   None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            quad_vb,
            position_vb,
            color_vb,
            instances: cloud.len() as u32,
        }
    }

    /// Re-uploads the color buffer. The cloud's length never changes, so the
    /// buffer is rewritten in place.
    pub fn upload_colors(&self, queue: &wgpu::Queue, colors: &[f32]) {
        queue.write_buffer(&self.color_vb, 0, bytemuck::cast_slice(colors));
    }

    pub fn draw<'a>(
        &'a self,
        rpass:    &mut wgpu::RenderPass<'a>,
        queue:    &wgpu::Queue,
        uniforms: &PointUniforms,
    ) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.position_vb.slice(..));
        rpass.set_vertex_buffer(2, self.color_vb.slice(..));
        rpass.draw(0..6, 0..self.instances);
    }
}

pub const POINTS_WGSL: &str = r#"
struct PointUniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    viewport_size: vec2<f32>,
    point_size: f32,
    _pad0: f32,
};
@group(0) @binding(0) var<uniform> U: PointUniforms;

struct VSOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) position: vec3<f32>,
    @location(2) color: vec3<f32>,
) -> VSOut {
    var out: VSOut;
    let center = U.view_proj * U.model * vec4<f32>(position, 1.0);

    // Sprite diameter in pixels: size * (viewport_height / 2) / view_depth.
    // In clip space the depth divide cancels, leaving a constant offset.
    let half_size = 0.5 * U.point_size * 0.5 * U.viewport_size.y;
    let offset = corner * half_size * 2.0 / U.viewport_size;

    out.clip = center + vec4<f32>(offset, 0.0, 0.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;
