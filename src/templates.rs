//! Background template generation.
//!
//! Each template is a vertical gradient from lavender to the primary purple
//! with a rounded card panel on top. Loan and EMI cards use a purple panel
//! for white text; the bank card uses a white panel for dark text. EMI and
//! bank cards also get a translucent footer bar behind the contact line.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::card::save_png;
use crate::error::CardError;
use crate::layout::{Canvas, CardKind, FieldBox, PRIMARY};
use crate::shapes::fill_rounded_rect;

const GRADIENT_TOP: [u8; 3] = [230, 220, 240];
const FOOTER: [u8; 4] = [0, 0, 0, 150];
const PANEL_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Panel and optional footer bar per kind, on the reference canvas.
fn panels(kind: CardKind) -> (FieldBox, [u8; 4], Option<FieldBox>) {
    match kind {
        CardKind::Loan => (FieldBox::reference(40, 10, 1200, 700), PRIMARY, None),
        CardKind::Emi => (
            FieldBox::reference(40, 10, 1200, 590),
            PRIMARY,
            Some(FieldBox::reference(40, 612, 1200, 76)),
        ),
        CardKind::Bank => (
            FieldBox::reference(40, 60, 1200, 530),
            PANEL_WHITE,
            Some(FieldBox::reference(40, 612, 1200, 76)),
        ),
    }
}

/// Vertical gradient from `top` (first row) to `bottom` (last row).
pub fn vertical_gradient(canvas: Canvas, top: [u8; 3], bottom: [u8; 3]) -> RgbaImage {
    let span = canvas.height.saturating_sub(1).max(1) as f32;
    RgbaImage::from_fn(canvas.width, canvas.height, |_, y| {
        let t = y as f32 / span;
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba([mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255])
    })
}

/// Render the background template for `kind` at `canvas` size.
pub fn render_template(kind: CardKind, canvas: Canvas) -> RgbaImage {
    let bottom = [PRIMARY[0], PRIMARY[1], PRIMARY[2]];
    let mut img = vertical_gradient(canvas, GRADIENT_TOP, bottom);

    let radius = canvas.scale_size(30);
    let (panel, fill, footer) = panels(kind);
    fill_rounded_rect(&mut img, &panel.resolve(canvas), radius, Rgba(fill));
    if let Some(footer) = footer {
        fill_rounded_rect(&mut img, &footer.resolve(canvas), canvas.scale_size(20), Rgba(FOOTER));
    }
    img
}

/// Write templates for every card kind into `dir`.
///
/// Existing files are kept unless `force` is set. Returns the paths written.
pub fn ensure_templates(dir: &Path, canvas: Canvas, force: bool) -> Result<Vec<PathBuf>, CardError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for kind in CardKind::ALL {
        let path = dir.join(kind.template_file_name());
        if path.exists() && !force {
            debug!(kind = %kind, path = %path.display(), "template exists");
            continue;
        }
        save_png(&render_template(kind, canvas), &path)?;
        info!(kind = %kind, path = %path.display(), "created template");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SMALL: Canvas = Canvas {
        width: 128,
        height: 72,
    };

    #[test]
    fn test_gradient_endpoints() {
        let img = vertical_gradient(SMALL, [0, 0, 0], [200, 100, 50]);
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(0, 71), Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_template_panels() {
        let loan = render_template(CardKind::Loan, Canvas::HD_720P);
        assert_eq!(loan.dimensions(), (1280, 720));
        assert_eq!(*loan.get_pixel(640, 360), Rgba(PRIMARY));

        let bank = render_template(CardKind::Bank, Canvas::HD_720P);
        assert_eq!(*bank.get_pixel(640, 300), Rgba(PANEL_WHITE));
        // Footer darkens the gradient behind the contact line.
        let plain = vertical_gradient(Canvas::HD_720P, GRADIENT_TOP, [PRIMARY[0], PRIMARY[1], PRIMARY[2]]);
        assert!(bank.get_pixel(640, 650)[0] < plain.get_pixel(640, 650)[0]);
    }

    #[test]
    fn test_ensure_templates_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let written = ensure_templates(dir.path(), SMALL, false).unwrap();
        assert_eq!(written.len(), 3);
        assert!(dir.path().join("loan_card_template.png").is_file());

        assert!(ensure_templates(dir.path(), SMALL, false).unwrap().is_empty());
        assert_eq!(ensure_templates(dir.path(), SMALL, true).unwrap().len(), 3);
    }
}
