//! Filled shapes drawn with source-over blending.
//!
//! Used for template panels, the logo placeholder and debug box overlays.
//! Everything is clipped to the image.

use image::{Rgba, RgbaImage};

use crate::layout::PixelBox;
use crate::text::blend_pixel;

/// Fill `area` with `color`.
pub fn fill_rect(img: &mut RgbaImage, area: &PixelBox, color: Rgba<u8>) {
    for_each_pixel(img, area, |img, x, y| blend_pixel(img.get_pixel_mut(x, y), color, 1.0));
}

/// Outline `area` with a `thickness`-pixel border inside the box.
pub fn stroke_rect(img: &mut RgbaImage, area: &PixelBox, thickness: u32, color: Rgba<u8>) {
    let t = thickness.min(area.width / 2).min(area.height / 2).max(1);
    for_each_pixel(img, area, |img, x, y| {
        let dx = x - area.x;
        let dy = y - area.y;
        let edge = dx < t || dy < t || dx >= area.width - t || dy >= area.height - t;
        if edge {
            blend_pixel(img.get_pixel_mut(x, y), color, 1.0);
        }
    });
}

/// Fill `area` as a rectangle with corners of `radius` pixels.
pub fn fill_rounded_rect(img: &mut RgbaImage, area: &PixelBox, radius: u32, color: Rgba<u8>) {
    let r = radius.min(area.width / 2).min(area.height / 2) as i64;
    let (w, h) = (area.width as i64, area.height as i64);

    for_each_pixel(img, area, |img, x, y| {
        let lx = (x - area.x) as i64;
        let ly = (y - area.y) as i64;
        if rounded_rect_contains(lx, ly, w, h, r) {
            blend_pixel(img.get_pixel_mut(x, y), color, 1.0);
        }
    });
}

/// Fill the ellipse inscribed in `area`.
pub fn fill_ellipse(img: &mut RgbaImage, area: &PixelBox, color: Rgba<u8>) {
    let rx = area.width as f32 / 2.0;
    let ry = area.height as f32 / 2.0;
    let cx = area.x as f32 + rx;
    let cy = area.y as f32 + ry;

    for_each_pixel(img, area, |img, x, y| {
        let dx = (x as f32 + 0.5 - cx) / rx;
        let dy = (y as f32 + 0.5 - cy) / ry;
        if dx * dx + dy * dy <= 1.0 {
            blend_pixel(img.get_pixel_mut(x, y), color, 1.0);
        }
    });
}

fn rounded_rect_contains(x: i64, y: i64, w: i64, h: i64, r: i64) -> bool {
    if r == 0 || (x >= r && x < w - r) || (y >= r && y < h - r) {
        return true;
    }
    let cx = if x < r { r - 1 } else { w - r };
    let cy = if y < r { r - 1 } else { h - r };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

fn for_each_pixel(img: &mut RgbaImage, area: &PixelBox, mut f: impl FnMut(&mut RgbaImage, u32, u32)) {
    let x_end = area.x.saturating_add(area.width).min(img.width());
    let y_end = area.y.saturating_add(area.height).min(img.height());
    for y in area.y..y_end {
        for x in area.x..x_end {
            f(img, x, y);
        }
    }
}
