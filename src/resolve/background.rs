//! Per-card-type background templates.

use std::path::PathBuf;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::error::CardError;
use crate::layout::{Canvas, CardKind};

/// Supplies the background image a card is composited onto.
pub trait BackgroundProvider: Send + Sync {
    /// Background for `kind`, sized to the canvas.
    ///
    /// A missing template is not an error; a template that exists but
    /// cannot be decoded is.
    fn get(&self, kind: CardKind) -> Result<RgbaImage, CardError>;
}

/// Solid canvas used when no template is available.
pub fn blank_canvas(canvas: Canvas, fill: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(canvas.width, canvas.height, Rgba(fill))
}

/// Loads `{templates_dir}/{kind}_card_template.png`.
#[derive(Debug, Clone)]
pub struct TemplateBackgrounds {
    templates_dir: PathBuf,
    canvas: Canvas,
    fill: [u8; 4],
}

impl TemplateBackgrounds {
    pub fn new(templates_dir: impl Into<PathBuf>, canvas: Canvas, fill: [u8; 4]) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            canvas,
            fill,
        }
    }

    pub fn path_for(&self, kind: CardKind) -> PathBuf {
        self.templates_dir.join(kind.template_file_name())
    }
}

impl BackgroundProvider for TemplateBackgrounds {
    fn get(&self, kind: CardKind) -> Result<RgbaImage, CardError> {
        let path = self.path_for(kind);
        if !path.is_file() {
            warn!(kind = %kind, path = %path.display(), "template missing, using blank background");
            return Ok(blank_canvas(self.canvas, self.fill));
        }

        let img = image::open(&path)
            .map_err(|e| CardError::Template(format!("Failed to decode {}: {}", path.display(), e)))?;

        if img.width() == self.canvas.width && img.height() == self.canvas.height {
            return Ok(img.to_rgba8());
        }

        debug!(
            kind = %kind,
            from_width = img.width(),
            from_height = img.height(),
            "resizing template to canvas"
        );
        Ok(img
            .resize_exact(self.canvas.width, self.canvas.height, FilterType::Lanczos3)
            .to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const SMALL: Canvas = Canvas {
        width: 64,
        height: 36,
    };

    #[test]
    fn test_missing_template_is_blank() {
        let dir = tempfile::tempdir().unwrap();
        let provider = TemplateBackgrounds::new(dir.path(), SMALL, [1, 2, 3, 255]);
        let bg = provider.get(CardKind::Loan).unwrap();
        assert_eq!(bg.dimensions(), (64, 36));
        assert!(bg.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn test_template_resized_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let provider = TemplateBackgrounds::new(dir.path(), SMALL, [0, 0, 0, 255]);
        RgbaImage::from_pixel(128, 72, Rgba([90, 90, 90, 255]))
            .save(provider.path_for(CardKind::Emi))
            .unwrap();

        let bg = provider.get(CardKind::Emi).unwrap();
        assert_eq!(bg.dimensions(), (64, 36));
    }

    #[test]
    fn test_corrupt_template_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = TemplateBackgrounds::new(dir.path(), SMALL, [0, 0, 0, 255]);
        fs::write(provider.path_for(CardKind::Bank), b"not a png").unwrap();

        assert!(matches!(provider.get(CardKind::Bank), Err(CardError::Template(_))));
    }

    #[test]
    fn test_template_path() {
        let provider = TemplateBackgrounds::new("/t", SMALL, [0, 0, 0, 255]);
        assert_eq!(provider.path_for(CardKind::Bank), PathBuf::from("/t/bank_card_template.png"));
    }
}
