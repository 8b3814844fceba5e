//! Box renderer: places a resolved block inside its box and draws it.
//!
//! Vertical centering is always applied, clamped so a block taller than its
//! box starts flush at the box top. Horizontal placement is per line.

use image::{Rgba, RgbaImage};

use super::fit::WrappedBlock;
use crate::layout::{Alignment, PixelBox};

/// Top-left origin of every line in `block` when placed in `area`.
pub fn line_positions(block: &WrappedBlock, area: &PixelBox, align: Alignment) -> Vec<(i64, i64)> {
    let y0 = area.y as i64 + (area.height.saturating_sub(block.total_height()) / 2) as i64;

    block
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let x = match align {
                Alignment::Left => area.x as i64,
                Alignment::Center => {
                    let line_width = block.font.measure(line).0;
                    area.x as i64 + (area.width.saturating_sub(line_width) / 2) as i64
                }
            };
            (x, y0 + i as i64 * block.line_height as i64)
        })
        .collect()
}

/// Draw `block` into `overlay` in `color`.
pub fn render_block(overlay: &mut RgbaImage, block: &WrappedBlock, area: &PixelBox, align: Alignment, color: Rgba<u8>) {
    let (width, height) = overlay.dimensions();

    for (line, (x, y)) in block.lines.iter().zip(line_positions(block, area, align)) {
        block.font.draw(line, x as i32, y as i32, |px, py, coverage| {
            if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                return;
            }
            blend_pixel(overlay.get_pixel_mut(px as u32, py as u32), color, coverage);
        });
    }
}

/// Source-over blend of `color` at `coverage` onto `dst`.
pub fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let src_a = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }

    for c in 0..3 {
        let src_c = color[c] as f32;
        let dst_c = dst[c] as f32;
        let blended = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
