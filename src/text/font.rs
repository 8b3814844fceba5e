//! Font handles and the text measurer.
//!
//! A [`FontHandle`] is a size-specific renderable font. Two backends exist:
//!
//! - **Outline**: a TTF/OTF face loaded through `ab_glyph`, rendered with
//!   anti-aliased coverage.
//! - **Bitmap**: the built-in Spleen faces, nearest-neighbour scaled to the
//!   requested pixel height. This is the last link of every font fallback
//!   chain, so a handle is always available even with no font files on disk.

use std::fmt;

use ab_glyph::{Font, FontArc, Glyph, ScaleFont, point};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

/// Representative ascender/descender string used to derive line height.
pub const LINE_SAMPLE: &str = "Ay";

/// Built-in Spleen bitmap faces, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitmapFace {
    S6x12,
    S8x16,
    S12x24,
}

impl BitmapFace {
    pub const ALL: [BitmapFace; 3] = [BitmapFace::S6x12, BitmapFace::S8x16, BitmapFace::S12x24];

    /// Native cell size (width, height) in pixels.
    pub fn cell(self) -> (u32, u32) {
        match self {
            BitmapFace::S6x12 => (6, 12),
            BitmapFace::S8x16 => (8, 16),
            BitmapFace::S12x24 => (12, 24),
        }
    }

    fn data(self) -> &'static [u8] {
        match self {
            BitmapFace::S6x12 => FONT_6X12,
            BitmapFace::S8x16 => FONT_8X16,
            BitmapFace::S12x24 => FONT_12X24,
        }
    }

    /// Largest face whose native height does not exceed `px`.
    ///
    /// Downscaling a bitmap face loses strokes, so small sizes use the
    /// smallest face and scale it down only when unavoidable.
    pub fn for_pixel_height(px: u32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|face| face.cell().1 <= px)
            .unwrap_or(BitmapFace::S6x12)
    }
}

/// A size-specific renderable font.
///
/// Cheap to clone (the outline variant shares its face through an `Arc`).
#[derive(Clone)]
pub enum FontHandle {
    Outline {
        font: FontArc,
        size: u32,
    },
    Bitmap {
        face: BitmapFace,
        size: u32,
        cell_width: u32,
    },
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::Outline { size, .. } => f.debug_struct("Outline").field("size", size).finish(),
            FontHandle::Bitmap {
                face,
                size,
                cell_width,
            } => f
                .debug_struct("Bitmap")
                .field("face", face)
                .field("size", size)
                .field("cell_width", cell_width)
                .finish(),
        }
    }
}

impl FontHandle {
    /// Wrap a loaded outline face at a pixel size.
    pub fn outline(font: FontArc, size: u32) -> Self {
        FontHandle::Outline {
            font,
            size: size.max(1),
        }
    }

    /// The built-in bitmap font at a pixel size.
    pub fn builtin(size: u32) -> Self {
        let size = size.max(1);
        let face = BitmapFace::for_pixel_height(size);
        let (fw, fh) = face.cell();
        let cell_width = ((size * fw + fh / 2) / fh).max(1);
        FontHandle::Bitmap {
            face,
            size,
            cell_width,
        }
    }

    /// Requested pixel size.
    pub fn size(&self) -> u32 {
        match self {
            FontHandle::Outline { size, .. } | FontHandle::Bitmap { size, .. } => *size,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Bitmap { .. })
    }

    /// Bounding box of `text` as (width, height) in pixels.
    ///
    /// Empty text measures `(0, 0)`.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        match self {
            FontHandle::Outline { font, size } => {
                let px = *size as f32;
                let (glyphs, caret) = layout_outline(font, px, text);
                let width = caret.ceil().max(0.0) as u32;
                let height = match ink_extent(font, &glyphs) {
                    Some((min_y, max_y)) => (max_y - min_y).ceil().max(0.0) as u32,
                    None => {
                        let scaled = font.as_scaled(px);
                        (scaled.ascent() - scaled.descent()).ceil().max(0.0) as u32
                    }
                };
                (width, height)
            }
            FontHandle::Bitmap {
                size, cell_width, ..
            } => (text.chars().count() as u32 * cell_width, *size),
        }
    }

    /// Height of one line, measured on [`LINE_SAMPLE`]. Never zero.
    ///
    /// For outline faces this is the ink box of "Ay", not the font's full
    /// ascent and descent. Glyphs that rise or drop further (`k`, `h`, `j`,
    /// `₹`, accented capitals like `É`) can ink a few pixels outside their
    /// line, and so outside the field box on the first or last line.
    pub fn line_height(&self) -> u32 {
        self.measure(LINE_SAMPLE).1.max(1)
    }

    /// Draw `text` with the top of its line box at `(x, top)`.
    ///
    /// `plot` receives canvas coordinates and a coverage value in `0.0..=1.0`.
    /// Coordinates may fall outside the canvas; callers clip.
    pub fn draw(&self, text: &str, x: i32, top: i32, mut plot: impl FnMut(i32, i32, f32)) {
        if text.is_empty() {
            return;
        }
        match self {
            FontHandle::Outline { font, size } => {
                let px = *size as f32;
                // Align the sample's ink top with the line top.
                let (sample, _) = layout_outline(font, px, LINE_SAMPLE);
                let above = match ink_extent(font, &sample) {
                    Some((min_y, _)) => -min_y,
                    None => font.as_scaled(px).ascent(),
                };
                let baseline = top as f32 + above;

                let scaled = font.as_scaled(px);
                let mut caret = x as f32;
                let mut prev = None;
                for ch in text.chars() {
                    let glyph_id = font.glyph_id(ch);
                    if let Some(prev) = prev {
                        caret += scaled.kern(prev, glyph_id);
                    }
                    let glyph = glyph_id.with_scale_and_position(px, point(caret, baseline));
                    caret += scaled.h_advance(glyph_id);
                    prev = Some(glyph_id);

                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|gx, gy, coverage| {
                            plot(
                                bounds.min.x as i32 + gx as i32,
                                bounds.min.y as i32 + gy as i32,
                                coverage,
                            );
                        });
                    }
                }
            }
            FontHandle::Bitmap {
                face,
                size,
                cell_width,
            } => {
                let (src_w, src_h) = face.cell();
                let (dst_w, dst_h) = (*cell_width, *size);
                let mut spleen = PSF2Font::new(face.data()).ok();
                let mut src = vec![0u8; (src_w * src_h) as usize];
                let mut dst = vec![0u8; (dst_w * dst_h) as usize];

                for (i, ch) in text.chars().enumerate() {
                    src.fill(0);
                    let utf8 = ch.to_string();
                    let found = match spleen.as_mut() {
                        Some(spleen) => match spleen.glyph_for_utf8(utf8.as_bytes()) {
                            Some(glyph) => {
                                for (row_y, row) in glyph.enumerate() {
                                    for (col_x, on) in row.enumerate() {
                                        let idx = row_y * src_w as usize + col_x;
                                        if on && row_y < src_h as usize && col_x < src_w as usize {
                                            src[idx] = 1;
                                        }
                                    }
                                }
                                true
                            }
                            None => false,
                        },
                        None => false,
                    };
                    if !found && !ch.is_whitespace() {
                        draw_box(&mut src, src_w as usize, src_h as usize);
                    }

                    dst.fill(0);
                    scale_bitmap(
                        &src,
                        src_w as usize,
                        src_h as usize,
                        &mut dst,
                        dst_w as usize,
                        dst_h as usize,
                    );

                    let cell_x = x + (i as u32 * dst_w) as i32;
                    for dy in 0..dst_h {
                        for dx in 0..dst_w {
                            if dst[(dy * dst_w + dx) as usize] != 0 {
                                plot(cell_x + dx as i32, top + dy as i32, 1.0);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Measure `text` in `font`. See [`FontHandle::measure`].
pub fn measure(text: &str, font: &FontHandle) -> (u32, u32) {
    font.measure(text)
}

/// Position glyphs on a zero baseline; returns the glyphs and final caret x.
fn layout_outline(font: &FontArc, px: f32, text: &str) -> (Vec<Glyph>, f32) {
    let scaled = font.as_scaled(px);
    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    let mut prev = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, glyph_id);
        }
        glyphs.push(glyph_id.with_scale_and_position(px, point(caret, 0.0)));
        caret += scaled.h_advance(glyph_id);
        prev = Some(glyph_id);
    }

    (glyphs, caret)
}

/// Vertical ink extent (min_y, max_y) relative to the baseline, if any glyph has an outline.
fn ink_extent(font: &FontArc, glyphs: &[Glyph]) -> Option<(f32, f32)> {
    glyphs
        .iter()
        .filter_map(|glyph| font.outline_glyph(glyph.clone()))
        .map(|outlined| {
            let bounds = outlined.px_bounds();
            (bounds.min.y, bounds.max.y)
        })
        .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))
}

/// Scale a bitmap from src dimensions to dst dimensions using nearest neighbor.
fn scale_bitmap(src: &[u8], src_w: usize, src_h: usize, dst: &mut [u8], dst_w: usize, dst_h: usize) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            let src_idx = sy * src_w + sx;
            let dst_idx = dy * dst_w + dx;
            if src_idx < src.len() && dst_idx < dst.len() {
                dst[dst_idx] = src[src_idx];
            }
        }
    }
}

/// Box outline for characters missing from the bitmap face.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}
