//! The 2D layer drawn over the sphere: nav bar and title.
//!
//! Each frame the scene's overlay elements are turned into an
//! [`OverlayBatch`] of screen-space vertices, then drawn by [`OverlayPass`]
//! in two draws (flat quads, then text).

use crate::color::Color;
use crate::font::{FontAtlas, GlyphSet};
use crate::gpu::GpuContext;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Vertex for 2D quad and text rendering, in pixels from the top-left.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2d {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex2d {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex2d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

const MAX_VERTICES: usize = 4096;

/// Two triangles covering `(x0, y0)..(x1, y1)`.
fn quad(x0: f32, y0: f32, x1: f32, y1: f32, uv: [f32; 4], color: [f32; 4]) -> [Vertex2d; 6] {
    let [u0, v0, u1, v1] = uv;
    let vertex = |x: f32, y: f32, u: f32, v: f32| Vertex2d {
        position: [x, y],
        uv: [u, v],
        color,
    };
    [
        vertex(x0, y0, u0, v0),
        vertex(x1, y0, u1, v0),
        vertex(x0, y1, u0, v1),
        vertex(x1, y0, u1, v0),
        vertex(x1, y1, u1, v1),
        vertex(x0, y1, u0, v1),
    ]
}

/// One frame's worth of overlay vertices.
#[derive(Clone, Debug, Default)]
pub struct OverlayBatch {
    pub colored: Vec<Vertex2d>,
    pub text: Vec<Vertex2d>,
}

impl OverlayBatch {
    pub fn clear(&mut self) {
        self.colored.clear();
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.colored.is_empty() && self.text.is_empty()
    }

    /// Queue a flat colored rectangle.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.colored
            .extend_from_slice(&quad(x, y, x + w, y + h, [0.0; 4], color.to_array()));
    }

    /// Queue `text` with its baseline at `baseline_y`, starting at `x`.
    pub fn text(&mut self, glyphs: &GlyphSet, x: f32, baseline_y: f32, text: &str, color: Color) {
        let c = color.to_array();
        let mut cursor_x = x;

        for ch in text.chars() {
            let Some(glyph) = glyphs.glyph(ch) else {
                cursor_x += glyphs.size() * 0.5;
                continue;
            };

            if glyph.width > 0 && glyph.height > 0 {
                // fontdue's ymin is the offset from the baseline to the glyph's bottom edge.
                let gx = cursor_x + glyph.offset_x;
                let gy = baseline_y - glyph.offset_y - glyph.height as f32;
                let [u, v, uw, vh] = glyph.uv;
                self.text.extend_from_slice(&quad(
                    gx,
                    gy,
                    gx + glyph.width as f32,
                    gy + glyph.height as f32,
                    [u, v, u + uw, v + vh],
                    c,
                ));
            }

            cursor_x += glyph.advance;
        }
    }

    /// Lay out the scene's nav bar and title for `viewport`.
    ///
    /// The nav bar spans the full width and slides up by `offset * height`.
    /// The title is centered and skipped while fully transparent or when no
    /// glyphs are available.
    pub fn build(&mut self, scene: &Scene, viewport: &Viewport, glyphs: Option<&GlyphSet>) {
        self.clear();
        let width = viewport.width() as f32;
        let height = viewport.height() as f32;

        if let Some(nav) = &scene.nav {
            self.rect(0.0, nav.offset * nav.height, width, nav.height, nav.color);
        }

        if let (Some(title), Some(glyphs)) = (&scene.title, glyphs) {
            if title.opacity > 0.0 {
                let text_width = glyphs.measure(&title.text);
                let x = (width - text_width) * 0.5;
                let baseline_y = (height + glyphs.ascent()) * 0.5;
                let color = title.color.with_alpha(title.color.a * title.opacity);
                self.text(glyphs, x, baseline_y, &title.text, color);
            }
        }
    }
}

/// Draws an [`OverlayBatch`] with alpha blending, no depth.
pub struct OverlayPass {
    colored_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    font_bind_group: Option<wgpu::BindGroup>,
}

impl OverlayPass {
    pub fn new(gpu: &GpuContext, font: Option<&FontAtlas>) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniforms"),
            size: std::mem::size_of::<OverlayUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Uniform bind group layout (group 0)
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Overlay Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Font atlas bind group layout (group 1)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Overlay Texture Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let font_bind_group = font.map(|font| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Font Bind Group"),
                layout: &texture_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&font.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&font.sampler),
                    },
                ],
            })
        });

        let colored_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Overlay Colored Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let textured_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Overlay Textured Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout, &texture_bind_group_layout],
                push_constant_ranges: &[],
            });

        let blend_state = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = |label: &str, layout: &wgpu::PipelineLayout, fs_entry: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex2d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(blend_state),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let colored_pipeline = pipeline(
            "Overlay Colored Pipeline",
            &colored_pipeline_layout,
            "fs_colored",
        );
        let textured_pipeline = pipeline(
            "Overlay Textured Pipeline",
            &textured_pipeline_layout,
            "fs_textured",
        );

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Vertex Buffer"),
            size: (MAX_VERTICES * std::mem::size_of::<Vertex2d>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            colored_pipeline,
            textured_pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            font_bind_group,
        }
    }

    /// Draw `batch` into `render_pass`. Vertices past the buffer capacity are dropped.
    pub fn render(&self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass, batch: &OverlayBatch) {
        if batch.is_empty() {
            return;
        }

        let uniforms = OverlayUniforms {
            resolution: [gpu.width() as f32, gpu.height() as f32],
            _padding: [0.0, 0.0],
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let colored = &batch.colored[..batch.colored.len().min(MAX_VERTICES)];
        let text_capacity = MAX_VERTICES - colored.len();
        let text = &batch.text[..batch.text.len().min(text_capacity)];
        if colored.len() + text.len() < batch.colored.len() + batch.text.len() {
            tracing::warn!(capacity = MAX_VERTICES, "overlay vertex buffer full, dropping vertices");
        }

        gpu.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(colored));
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

        if !colored.is_empty() {
            render_pass.set_pipeline(&self.colored_pipeline);
            render_pass.draw(0..colored.len() as u32, 0..1);
        }

        if let Some(font_bind_group) = self.font_bind_group.as_ref().filter(|_| !text.is_empty()) {
            let offset = colored.len();
            gpu.queue.write_buffer(
                &self.vertex_buffer,
                (offset * std::mem::size_of::<Vertex2d>()) as u64,
                bytemuck::cast_slice(text),
            );

            render_pass.set_pipeline(&self.textured_pipeline);
            render_pass.set_bind_group(1, font_bind_group, &[]);
            render_pass.draw(offset as u32..(offset + text.len()) as u32, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::monospace_glyphs;

    fn min_y(vertices: &[Vertex2d]) -> f32 {
        vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn nav_bar_spans_the_width_and_slides_by_its_height() {
        let mut scene = Scene::default();
        let viewport = Viewport::new(800, 600);
        let mut batch = OverlayBatch::default();

        batch.build(&scene, &viewport, None);
        assert_eq!(batch.colored.len(), 6);
        assert_eq!(min_y(&batch.colored), 0.0);
        assert!(batch.colored.iter().any(|v| v.position == [800.0, 64.0]));

        scene.nav.as_mut().unwrap().offset = -1.0;
        batch.build(&scene, &viewport, None);
        assert_eq!(min_y(&batch.colored), -64.0);
        assert!(batch.colored.iter().all(|v| v.position[1] <= 0.0));
    }

    #[test]
    fn title_is_centered_and_faded_by_opacity() {
        let mut scene = Scene::default();
        scene.title.as_mut().unwrap().opacity = 0.5;
        let glyphs = monospace_glyphs(10.0);
        let viewport = Viewport::new(800, 600);
        let mut batch = OverlayBatch::default();

        batch.build(&scene, &viewport, Some(&glyphs));

        // "Give it a spin": 14 advances, 11 visible glyphs.
        assert_eq!(batch.text.len(), 11 * 6);
        let left = batch
            .text
            .iter()
            .map(|v| v.position[0])
            .fold(f32::INFINITY, f32::min);
        assert_eq!(left, (800.0 - 140.0) / 2.0 + 1.0);
        assert!(batch.text.iter().all(|v| v.color[3] == 0.5));
    }

    #[test]
    fn transparent_or_unrenderable_title_emits_nothing() {
        let mut scene = Scene::default();
        let viewport = Viewport::new(800, 600);
        let mut batch = OverlayBatch::default();

        batch.build(&scene, &viewport, None);
        assert!(batch.text.is_empty());

        scene.title.as_mut().unwrap().opacity = 0.0;
        batch.build(&scene, &viewport, Some(&monospace_glyphs(10.0)));
        assert!(batch.text.is_empty());
    }

    #[test]
    fn absent_elements_leave_the_batch_empty() {
        let scene = Scene {
            nav: None,
            title: None,
            ..Scene::default()
        };
        let mut batch = OverlayBatch::default();
        batch.build(&scene, &Viewport::new(800, 600), Some(&monospace_glyphs(10.0)));
        assert!(batch.is_empty());
    }
}
