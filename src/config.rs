//! # Generator Configuration
//!
//! Everything a run needs besides the rows: canvas geometry, fit tuning,
//! fonts, currency formatting and asset locations.
//!
//! Loaded from an optional JSON file; every field has a default, so a file
//! only needs the keys it overrides:
//!
//! ```json
//! {
//!   "canvas": { "width": 1920, "height": 1080 },
//!   "fit": { "min_size": 14 },
//!   "currency": { "symbol": "Rs. ", "grouping": "western" },
//!   "paths": { "generated": "out" }
//! }
//! ```
//!
//! ## Defaults
//!
//! | Setting | Value |
//! |---------|-------|
//! | Canvas | 1280x720 |
//! | Fit step / minimum | 2 / 12 px |
//! | Ellipsis | `…` |
//! | Font family | Montserrat-SemiBold |
//! | Currency | `₹`, Indian grouping |
//! | Assets | `assets/{fonts,logos,templates,generated}` |
//! | Blank background | white |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CardError;
use crate::format::CurrencyFormat;
use crate::layout::Canvas;
use crate::text::FitParams;

/// Where fonts, logos and templates are read from and cards are written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub fonts: PathBuf,
    pub logos: PathBuf,
    pub templates: PathBuf,
    pub generated: PathBuf,
}

impl AssetPaths {
    /// Standard layout under one assets root.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            fonts: root.join("fonts"),
            logos: root.join("logos"),
            templates: root.join("templates"),
            generated: root.join("generated"),
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::under("assets")
    }
}

/// System font files tried when the configured family is not in the fonts dir.
pub fn default_system_fonts() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:/Windows/Fonts/arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// Full generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub canvas: Canvas,
    pub fit: FitParams,
    /// Font family looked up as `{fonts}/{family}.ttf` or `.otf`.
    pub font_family: String,
    pub currency: CurrencyFormat,
    pub paths: AssetPaths,
    pub system_fonts: Vec<PathBuf>,
    /// RGBA fill used when a template is missing.
    pub blank_background: [u8; 4],
    /// Draw every field box under its text.
    pub debug_boxes: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::HD_720P,
            fit: FitParams::default(),
            font_family: "Montserrat-SemiBold".to_string(),
            currency: CurrencyFormat::default(),
            paths: AssetPaths::default(),
            system_fonts: default_system_fonts(),
            blank_background: [255, 255, 255, 255],
            debug_boxes: false,
        }
    }
}

impl CardConfig {
    /// Load a config file and validate it.
    pub fn load(path: &Path) -> Result<Self, CardError> {
        let json = fs::read_to_string(path)
            .map_err(|e| CardError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: CardConfig = serde_json::from_str(&json)
            .map_err(|e| CardError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CardError::Config(format!(
                "Canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.fit.min_size == 0 {
            return Err(CardError::Config("fit.min_size must be at least 1".to_string()));
        }
        if self.fit.step == 0 {
            return Err(CardError::Config("fit.step must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Grouping;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = CardConfig::default();
        assert_eq!(config.canvas, Canvas::HD_720P);
        assert_eq!(config.fit.step, 2);
        assert_eq!(config.fit.min_size, 12);
        assert_eq!(config.paths.templates, PathBuf::from("assets/templates"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardgen.json");
        fs::write(
            &path,
            r#"{"canvas": {"width": 1920, "height": 1080}, "currency": {"grouping": "western"}, "fit": {"min_size": 14}}"#,
        )
        .unwrap();

        let config = CardConfig::load(&path).unwrap();
        assert_eq!(config.canvas, Canvas::FULL_HD);
        assert_eq!(config.currency.grouping, Grouping::Western);
        assert_eq!(config.currency.symbol, "\u{20b9}");
        assert_eq!(config.fit.min_size, 14);
        assert_eq!(config.fit.step, 2);
        assert_eq!(config.font_family, "Montserrat-SemiBold");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"canvas": {"width": 0, "height": 720}}"#).unwrap();
        assert!(matches!(CardConfig::load(&path), Err(CardError::Config(_))));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CardConfig::load(&path), Err(CardError::Config(_))));
    }

    #[test]
    fn test_asset_paths_under_root() {
        let paths = AssetPaths::under("/srv/cards");
        assert_eq!(paths.logos, PathBuf::from("/srv/cards/logos"));
        assert_eq!(paths.generated, PathBuf::from("/srv/cards/generated"));
    }
}
