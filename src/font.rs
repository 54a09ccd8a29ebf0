//! Font loading and glyph atlases for the overlay text.
//!
//! Glyphs are rasterized with `fontdue` into a single-channel atlas. The CPU
//! side ([`GlyphSet`]) is separate from the GPU upload ([`FontAtlas`]) so text
//! layout works without a device.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::error::{Error, Result};
use crate::gpu::GpuContext;

/// Fonts tried, in order, when no font path is configured.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const ATLAS_PADDING: u32 = 1;
const INITIAL_ATLAS_SIZE: u32 = 256;

/// Information about a single glyph in the font atlas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphInfo {
    /// UV coordinates in the atlas (x, y, width, height) normalized to [0, 1].
    pub uv: [f32; 4],
    /// Size of the glyph in pixels.
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the glyph's bottom-left corner.
    pub offset_x: f32,
    pub offset_y: f32,
    /// How far to advance the cursor after this glyph.
    pub advance: f32,
}

/// Where each glyph rectangle landed in the atlas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of each input rectangle, in input order.
    pub positions: Vec<(u32, u32)>,
}

/// Shelf-pack `sizes` into the smallest power-of-two atlas that holds them.
///
/// Rows fill left to right. When a pass does not fit, the smaller side of the
/// atlas doubles and packing starts over.
pub fn pack_glyphs(sizes: &[(u32, u32)], padding: u32) -> AtlasLayout {
    let mut width = INITIAL_ATLAS_SIZE;
    let mut height = INITIAL_ATLAS_SIZE;

    loop {
        if let Some(positions) = try_pack(sizes, padding, width, height) {
            return AtlasLayout {
                width,
                height,
                positions,
            };
        }
        if width <= height {
            width *= 2;
        } else {
            height *= 2;
        }
    }
}

fn try_pack(sizes: &[(u32, u32)], padding: u32, width: u32, height: u32) -> Option<Vec<(u32, u32)>> {
    let mut positions = Vec::with_capacity(sizes.len());
    let mut x = padding;
    let mut y = padding;
    let mut row_height = 0;

    for &(w, h) in sizes {
        if w + 2 * padding > width {
            return None;
        }
        if x + w + padding > width {
            x = padding;
            y += row_height + padding;
            row_height = 0;
        }
        if y + h + padding > height {
            return None;
        }
        positions.push((x, y));
        x += w + padding;
        row_height = row_height.max(h);
    }
    Some(positions)
}

/// Rasterized glyphs for one font at one size, plus the atlas bitmap.
#[derive(Clone, Debug)]
pub struct GlyphSet {
    glyphs: HashMap<char, GlyphInfo>,
    size: f32,
    line_height: f32,
    /// Baseline to top of the tallest glyphs.
    ascent: f32,
    atlas: Vec<u8>,
    atlas_width: u32,
    atlas_height: u32,
}

impl GlyphSet {
    /// Rasterize printable ASCII from TTF/OTF data.
    pub fn from_font_bytes(data: &[u8], size: f32) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| Error::Font(e.to_string()))?;

        let rasterized: Vec<(char, fontdue::Metrics, Vec<u8>)> = (32u8..=126u8)
            .map(char::from)
            .map(|c| {
                let (metrics, bitmap) = font.rasterize(c, size);
                (c, metrics, bitmap)
            })
            .collect();

        let sizes: Vec<(u32, u32)> = rasterized
            .iter()
            .map(|(_, m, _)| (m.width as u32, m.height as u32))
            .collect();
        let layout = pack_glyphs(&sizes, ATLAS_PADDING);

        let mut atlas = vec![0u8; (layout.width * layout.height) as usize];
        let mut glyphs = HashMap::with_capacity(rasterized.len());

        for ((c, metrics, bitmap), &(x, y)) in rasterized.iter().zip(&layout.positions) {
            let glyph_w = metrics.width as u32;
            let glyph_h = metrics.height as u32;

            for gy in 0..glyph_h {
                let src = (gy * glyph_w) as usize;
                let dst = ((y + gy) * layout.width + x) as usize;
                atlas[dst..dst + glyph_w as usize]
                    .copy_from_slice(&bitmap[src..src + glyph_w as usize]);
            }

            glyphs.insert(
                *c,
                GlyphInfo {
                    uv: [
                        x as f32 / layout.width as f32,
                        y as f32 / layout.height as f32,
                        glyph_w as f32 / layout.width as f32,
                        glyph_h as f32 / layout.height as f32,
                    ],
                    width: glyph_w,
                    height: glyph_h,
                    offset_x: metrics.xmin as f32,
                    offset_y: metrics.ymin as f32,
                    advance: metrics.advance_width,
                },
            );
        }

        let line_metrics = font.horizontal_line_metrics(size);
        let line_height = line_metrics.map(|m| m.new_line_size).unwrap_or(size * 1.2);
        let ascent = line_metrics.map(|m| m.ascent).unwrap_or(size * 0.8);

        tracing::debug!(
            size,
            atlas_width = layout.width,
            atlas_height = layout.height,
            "glyph atlas packed"
        );

        Ok(Self {
            glyphs,
            size,
            line_height,
            ascent,
            atlas,
            atlas_width: layout.width,
            atlas_height: layout.height,
        })
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&c)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Horizontal advance of `text`. Unknown characters advance half the font size.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| self.glyph(c).map_or(self.size * 0.5, |g| g.advance))
            .sum()
    }

    pub fn atlas(&self) -> (&[u8], u32, u32) {
        (&self.atlas, self.atlas_width, self.atlas_height)
    }
}

/// Read font bytes from `path`, or from the first system font that exists.
///
/// An explicit path that cannot be read is an error. When no path is given
/// and no system font is found, returns `Ok(None)`.
pub fn load_font_data(path: Option<&Path>) -> Result<Option<(PathBuf, Vec<u8>)>> {
    if let Some(path) = path {
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        return Ok(Some((path.to_path_buf(), data)));
    }

    for candidate in SYSTEM_FONT_PATHS.iter().map(Path::new) {
        match std::fs::read(candidate) {
            Ok(data) => return Ok(Some((candidate.to_path_buf(), data))),
            Err(_) => continue,
        }
    }
    Ok(None)
}

/// A [`GlyphSet`] uploaded to the GPU.
pub struct FontAtlas {
    pub glyphs: GlyphSet,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl FontAtlas {
    pub fn new(gpu: &GpuContext, glyphs: GlyphSet) -> Self {
        let (data, width, height) = glyphs.atlas();

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Font Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            glyphs,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A glyph set with fixed-width boxes for every printable ASCII char.
    pub(crate) fn monospace_glyphs(advance: f32) -> GlyphSet {
        let glyphs = (33u8..=126u8)
            .map(char::from)
            .map(|c| {
                let info = GlyphInfo {
                    uv: [0.0, 0.0, 0.1, 0.1],
                    width: 8,
                    height: 10,
                    offset_x: 1.0,
                    offset_y: 0.0,
                    advance,
                };
                (c, info)
            })
            .chain(std::iter::once((
                ' ',
                GlyphInfo {
                    uv: [0.0; 4],
                    width: 0,
                    height: 0,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    advance,
                },
            )))
            .collect();

        GlyphSet {
            glyphs,
            size: 16.0,
            line_height: 20.0,
            ascent: 12.0,
            atlas: vec![0; 16],
            atlas_width: 4,
            atlas_height: 4,
        }
    }

    #[test]
    fn packing_fills_rows_then_wraps() {
        let sizes = vec![(100, 20); 3];
        let layout = pack_glyphs(&sizes, 1);
        assert_eq!(layout.width, 256);
        assert_eq!(layout.positions, vec![(1, 1), (102, 1), (1, 22)]);
    }

    #[test]
    fn packing_grows_until_everything_fits() {
        let sizes = vec![(60, 60); 40];
        let layout = pack_glyphs(&sizes, 1);
        assert!(layout.width > 256 || layout.height > 256);

        for (i, &(x, y)) in layout.positions.iter().enumerate() {
            assert!(x + 60 < layout.width && y + 60 < layout.height);
            for &(ox, oy) in &layout.positions[..i] {
                let overlaps = x < ox + 60 && ox < x + 60 && y < oy + 60 && oy < y + 60;
                assert!(!overlaps);
            }
        }
    }

    #[test]
    fn packing_handles_a_glyph_wider_than_the_initial_atlas() {
        let layout = pack_glyphs(&[(300, 10)], 1);
        assert_eq!(layout.width, 512);
        assert_eq!(layout.positions, vec![(1, 1)]);
    }

    #[test]
    fn empty_glyphs_still_get_slots() {
        let layout = pack_glyphs(&[(0, 0), (5, 5)], 1);
        assert_eq!(layout.positions, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn measure_sums_advances_with_fallback() {
        let glyphs = monospace_glyphs(10.0);
        assert_eq!(glyphs.measure("Give it"), 70.0);
        // Non-ASCII falls back to half the font size.
        assert_eq!(glyphs.measure("é"), 8.0);
    }

    #[test]
    fn explicit_missing_font_path_is_an_error() {
        let result = load_font_data(Some(Path::new("/definitely/not/a/font.ttf")));
        assert!(matches!(result, Err(Error::Font(_))));
    }

    #[test]
    fn invalid_font_bytes_are_an_error() {
        assert!(matches!(
            GlyphSet::from_font_bytes(b"not a font", 16.0),
            Err(Error::Font(_))
        ));
    }
}
