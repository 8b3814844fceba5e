//! # Card Compositor
//!
//! Renders one card type for one row:
//!
//! ```text
//! background ◄── BackgroundProvider
//!     │
//!     │   overlay (transparent, canvas-sized)
//!     │     for each field in the Layout table:
//!     │       [debug box]
//!     │       text → fit → render_block
//!     │       logo → ImageResolver, or placeholder circle
//!     ▼
//! composite once → PNG
//! ```
//!
//! Field strings never fail: missing or unparseable values become `N/A` or a
//! fixed fallback.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::config::CardConfig;
use crate::error::CardError;
use crate::format::{NOT_AVAILABLE, format_due_date};
use crate::layout::{Alignment, CardKind, DARK, FieldKey, Layout, PixelBox};
use crate::resolve::{BackgroundProvider, FontResolver, ImageResolver};
use crate::row::CustomerRow;
use crate::shapes::{fill_ellipse, fill_rect, stroke_rect};
use crate::text::{fit, render_block};

/// Shown when a row has no phone number.
pub const PHONE_FALLBACK: &str = "+91 XXXXXXXXXX";
/// Shown when a row has no account number.
pub const ACCOUNT_NUMBER_FALLBACK: &str = "XXXXXXXXXXXX";

const PLACEHOLDER_FILL: [u8; 4] = [200, 200, 200, 255];
const PLACEHOLDER_LABEL: &str = "LOGO";
const DEBUG_FILL: [u8; 4] = [255, 255, 0, 70];
const DEBUG_OUTLINE: [u8; 4] = [255, 0, 0, 255];

/// What a layout field displays for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContent {
    Text(String),
    /// Logo reference, if the row has one.
    Logo(Option<String>),
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { NOT_AVAILABLE } else { value }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Display content of `key` for `row`.
pub fn field_content(key: FieldKey, row: &CustomerRow, config: &CardConfig) -> FieldContent {
    let currency = &config.currency;
    let text = match key {
        FieldKey::Logo => return FieldContent::Logo(row.bank_logo_path.clone()),
        FieldKey::EmiId => format!("Emi-ID - {}", or_na(row.emi_id())),
        FieldKey::Name => format!("Name - {}", or_na(&row.name)),
        FieldKey::Amount => format!("Amount - {}", currency.format_or_na(&row.loan_amount)),
        FieldKey::Title => "EMI Amount".to_string(),
        FieldKey::EmiAmount => currency.format_or_na(&row.emi_amount),
        FieldKey::Due => format!(
            "Due on {}",
            format_due_date(&row.due_date).as_deref().unwrap_or(NOT_AVAILABLE)
        ),
        FieldKey::Phone => format!("Contact: {}", or_fallback(&row.phone_number, PHONE_FALLBACK)),
        FieldKey::BankName => or_na(&row.bank_name).to_string(),
        FieldKey::Branch => format!("Branch: {}", or_na(&row.branch_name)),
        FieldKey::Ifsc => format!("IFSC: {}", or_na(&row.ifsc)),
        FieldKey::AccountHolder => format!("Account Holder: {}", or_na(row.account_holder())),
        FieldKey::AccountNumber => format!(
            "Account No: {}",
            row.account_number.as_deref().unwrap_or(ACCOUNT_NUMBER_FALLBACK)
        ),
        FieldKey::Reminder => format!(
            "For queries call: {}",
            or_fallback(&row.phone_number, PHONE_FALLBACK)
        ),
    };
    FieldContent::Text(text)
}

/// Renders cards against a set of resolvers.
pub struct CardRenderer<'a> {
    config: &'a CardConfig,
    fonts: &'a dyn FontResolver,
    images: &'a dyn ImageResolver,
    backgrounds: &'a dyn BackgroundProvider,
}

impl<'a> CardRenderer<'a> {
    pub fn new(
        config: &'a CardConfig,
        fonts: &'a dyn FontResolver,
        images: &'a dyn ImageResolver,
        backgrounds: &'a dyn BackgroundProvider,
    ) -> Self {
        Self {
            config,
            fonts,
            images,
            backgrounds,
        }
    }

    /// Render `kind` for `row` into a finished image.
    ///
    /// Only the background can fail; every field degrades.
    pub fn render(&self, kind: CardKind, row: &CustomerRow) -> Result<RgbaImage, CardError> {
        let mut card = self.backgrounds.get(kind)?;
        let overlay = self.render_overlay(kind, row);
        imageops::overlay(&mut card, &overlay, 0, 0);
        Ok(card)
    }

    /// All field content for `kind`, drawn onto a transparent canvas.
    pub fn render_overlay(&self, kind: CardKind, row: &CustomerRow) -> RgbaImage {
        let canvas = self.config.canvas;
        let mut overlay = RgbaImage::new(canvas.width, canvas.height);

        for spec in Layout::for_kind(kind).fields {
            let area = spec.area.resolve(canvas);
            if self.config.debug_boxes {
                fill_rect(&mut overlay, &area, Rgba(DEBUG_FILL));
                stroke_rect(&mut overlay, &area, 2, Rgba(DEBUG_OUTLINE));
            }

            match field_content(spec.key, row, self.config) {
                FieldContent::Text(text) => {
                    self.draw_text(
                        &mut overlay,
                        &text,
                        &area,
                        spec.start_size_for(canvas),
                        spec.align,
                        Rgba(spec.color),
                    );
                }
                FieldContent::Logo(reference) => self.place_logo(&mut overlay, reference.as_deref(), &area),
            }
        }
        overlay
    }

    fn draw_text(
        &self,
        overlay: &mut RgbaImage,
        text: &str,
        area: &PixelBox,
        start_size: u32,
        align: Alignment,
        color: Rgba<u8>,
    ) {
        let block = fit(
            text,
            area.width,
            area.height,
            &self.config.font_family,
            start_size,
            &self.config.fit,
            self.fonts,
        );
        render_block(overlay, &block, area, align, color);
    }

    fn place_logo(&self, overlay: &mut RgbaImage, reference: Option<&str>, area: &PixelBox) {
        let logo = reference.and_then(|r| self.images.resolve(r, area.width, area.height));
        if let Some(logo) = logo {
            imageops::overlay(overlay, &logo, area.x as i64, area.y as i64);
            return;
        }

        debug!(reference = reference.unwrap_or(""), "drawing logo placeholder");
        fill_ellipse(overlay, area, Rgba(PLACEHOLDER_FILL));

        // Label inside the circle's inscribed square.
        let inset_w = area.width / 7;
        let inset_h = area.height / 7;
        let label_area = PixelBox {
            x: area.x + inset_w,
            y: area.y + inset_h,
            width: area.width.saturating_sub(2 * inset_w).max(1),
            height: area.height.saturating_sub(2 * inset_h).max(1),
        };
        let start = self.config.canvas.scale_size(28);
        self.draw_text(overlay, PLACEHOLDER_LABEL, &label_area, start, Alignment::Center, Rgba(DARK));
    }
}

/// Output file for one card of one row.
pub fn output_path(dir: &Path, row: &CustomerRow, kind: CardKind) -> PathBuf {
    dir.join(format!("{}_{}.png", row.file_id(), kind.name()))
}

/// Encode as PNG in memory.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, CardError> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| CardError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(bytes.into_inner())
}

/// Write `img` as PNG via a `.tmp` sibling and a rename.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), CardError> {
    let bytes = encode_png(img)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, &bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(CardError::Io(e));
    }
    Ok(())
}
