//! The rendering orchestrator. Owns the GPU context, the depth target, the
//! point pipeline and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::points::{PointUniforms, PointsPipeline},
    targets::DepthTarget,
};
use crate::camera::Camera;
use handcloud::{FrameState, PointCloud};
use std::sync::Arc;
use winit::window::Window;

/// Background behind the cloud.
const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub depth: DepthTarget,
    pub points: PointsPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
    point_size: f32,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        cloud: &PointCloud,
        point_size: f32,
        vsync: bool,
    ) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window, vsync).await?;

        let depth = DepthTarget::new(&gfx.device, gfx.size);
        let points = PointsPipeline::new(&gfx.device, gfx.config.format, depth.format, cloud);

        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            depth,
            points,
            egui_renderer,
            point_size,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.depth.resize(&self.gfx.device, new_size);
        }
    }

    /// Pushes the cloud's colors to the GPU if they changed since the last
    /// upload.
    pub fn sync_colors(&mut self, cloud: &mut PointCloud) {
        if cloud.take_colors_dirty() {
            self.points.upload_colors(&self.gfx.queue, cloud.colors());
        }
    }

    /// Draws the cloud with the transform from this frame's step.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, camera: &Camera, frame: &FrameState) {
        let uniforms = PointUniforms {
            view_proj:     camera.view_proj().to_cols_array_2d(),
            model:         frame.transform.model_matrix().to_cols_array_2d(),
            viewport_size: self.gfx.viewport_size(),
            point_size:    self.point_size,
            _pad0:         0.0,
        };

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.points.draw(&mut pass, &self.gfx.queue, &uniforms);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
