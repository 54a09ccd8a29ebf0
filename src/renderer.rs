//! Frame rendering: the lit sphere pass, then the overlay on top.

use std::sync::Arc;

use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::font::{FontAtlas, GlyphSet};
use crate::gpu::GpuContext;
use crate::mesh::{Geometry, Mesh};
use crate::mesh_pass::{DrawCall, MeshPass};
use crate::overlay::{OverlayBatch, OverlayPass};
use crate::scene::Scene;
use crate::viewport::{OutputSurface, Viewport};

/// Owns every GPU resource needed to draw a [`Scene`].
pub struct Renderer {
    gpu: GpuContext,
    mesh_pass: MeshPass,
    overlay_pass: OverlayPass,
    sphere: Mesh,
    font: Option<FontAtlas>,
    overlay: OverlayBatch,
}

impl Renderer {
    /// Set up the GPU for `window` and upload the scene's sphere and the title glyphs.
    pub fn new(window: Arc<Window>, scene: &Scene, glyphs: Option<GlyphSet>) -> Result<Self> {
        let gpu = GpuContext::new(window)?;

        let geometry = Geometry::sphere(
            scene.sphere.radius,
            scene.sphere.width_segments,
            scene.sphere.height_segments,
        );
        tracing::debug!(
            vertices = geometry.vertices.len(),
            triangles = geometry.triangle_count(),
            "sphere tessellated"
        );
        let sphere = Mesh::new(&gpu, &geometry);

        let font = glyphs.map(|glyphs| FontAtlas::new(&gpu, glyphs));
        let mesh_pass = MeshPass::new(&gpu);
        let overlay_pass = OverlayPass::new(&gpu, font.as_ref());

        Ok(Self {
            gpu,
            mesh_pass,
            overlay_pass,
            sphere,
            font,
            overlay: OverlayBatch::default(),
        })
    }

    /// Draw one frame.
    ///
    /// A lost or outdated surface is reconfigured and a timed-out one skipped;
    /// both count as success and the next frame tries again. Any other surface
    /// error is returned.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
    ) -> Result<()> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                tracing::warn!(%err, "surface needs reconfiguring, skipping frame");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface texture timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.overlay
            .build(scene, viewport, self.font.as_ref().map(|font| &font.glyphs));

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let background = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: background.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.mesh_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let draw_calls = [DrawCall {
                mesh: &self.sphere,
                transform: scene.sphere.transform,
                material: scene.sphere.material,
            }];
            self.mesh_pass.render(
                &self.gpu,
                &mut render_pass,
                camera,
                &scene.light,
                &draw_calls,
            );
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.overlay_pass
                .render(&self.gpu, &mut render_pass, &self.overlay);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl OutputSurface for Renderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.gpu.set_size(width, height);
        self.mesh_pass.ensure_depth_size(&self.gpu);
    }
}
