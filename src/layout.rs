//! # Card Layout Tables
//!
//! Static box geometry for each card type. Boxes are authored in pixels on
//! the 1280x720 reference canvas and stored as fractions, so the same table
//! resolves against any configured canvas size.
//!
//! ## Loan card
//!
//! | Field | Box (x, y, w, h) | Align | Size |
//! |-------|------------------|-------|------|
//! | emi_id | 0, 20, 1280, 100 | center | 44 |
//! | name | 80, 140, 1120, 140 | left | 60 |
//! | amount | 80, 320, 1120, 140 | left | 60 |
//!
//! ## EMI card
//!
//! | Field | Box (x, y, w, h) | Align | Size |
//! |-------|------------------|-------|------|
//! | title | 80, 40, 1120, 60 | left | 36 |
//! | emi_amount | 80, 120, 1120, 180 | center | 110 |
//! | due | 80, 320, 1120, 80 | center | 40 |
//! | phone | 80, 620, 1120, 60 | center | 30 |
//!
//! ## Bank card
//!
//! | Field | Box (x, y, w, h) | Align | Size |
//! |-------|------------------|-------|------|
//! | logo | 80, 80, 160, 160 | - | - |
//! | bank_name | 260, 100, 960, 80 | left | 48 |
//! | branch | 260, 190, 960, 60 | left | 32 |
//! | ifsc | 260, 260, 960, 60 | left | 32 |
//! | account_holder | 260, 340, 960, 50 | left | 28 |
//! | account_number | 260, 400, 960, 50 | left | 28 |
//! | reminder | 80, 620, 1120, 60 | center | 30 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// White text on the purple panels.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Gold accent for highlights.
pub const ACCENT: [u8; 4] = [255, 204, 0, 255];
/// Dark text on the white bank panel.
pub const DARK: [u8; 4] = [30, 30, 30, 255];
/// Primary purple (#521B7B).
pub const PRIMARY: [u8; 4] = [82, 27, 123, 255];

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// # 1280x720 (reference)
    ///
    /// All layout tables are authored against this size.
    pub const HD_720P: Self = Self {
        width: 1280,
        height: 720,
    };

    /// # 1920x1080
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// Scale a reference-canvas font size to this canvas (by height).
    pub fn scale_size(&self, reference_size: u32) -> u32 {
        let scaled = reference_size as f64 * self.height as f64 / Self::HD_720P.height as f64;
        (scaled.round() as u32).max(1)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::HD_720P
    }
}

/// Horizontal alignment inside a box. Vertical centering is always applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A box as fractions of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FieldBox {
    /// Box from pixel coordinates on the reference canvas.
    pub const fn reference(x: u32, y: u32, width: u32, height: u32) -> Self {
        let w = Canvas::HD_720P.width as f32;
        let h = Canvas::HD_720P.height as f32;
        Self {
            x: x as f32 / w,
            y: y as f32 / h,
            width: width as f32 / w,
            height: height as f32 / h,
        }
    }

    /// Resolve to pixels on `canvas`. Width and height are at least 1.
    pub fn resolve(&self, canvas: Canvas) -> PixelBox {
        let cw = canvas.width as f32;
        let ch = canvas.height as f32;
        PixelBox {
            x: (self.x * cw).round() as u32,
            y: (self.y * ch).round() as u32,
            width: ((self.width * cw).round() as u32).max(1),
            height: ((self.height * ch).round() as u32).max(1),
        }
    }
}

/// A box resolved to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Card types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Loan,
    Emi,
    Bank,
}

impl CardKind {
    /// Render order within a row.
    pub const ALL: [CardKind; 3] = [CardKind::Loan, CardKind::Emi, CardKind::Bank];

    pub fn name(self) -> &'static str {
        match self {
            CardKind::Loan => "loan",
            CardKind::Emi => "emi",
            CardKind::Bank => "bank",
        }
    }

    /// Background template file name, e.g. `loan_card_template.png`.
    pub fn template_file_name(self) -> String {
        format!("{}_card_template.png", self.name())
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loan" => Ok(CardKind::Loan),
            "emi" => Ok(CardKind::Emi),
            "bank" => Ok(CardKind::Bank),
            other => Err(format!("unknown card type '{}' (expected loan, emi or bank)", other)),
        }
    }
}

/// Logical fields drawn on cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    EmiId,
    Name,
    Amount,
    Title,
    EmiAmount,
    Due,
    Phone,
    Logo,
    BankName,
    Branch,
    Ifsc,
    AccountHolder,
    AccountNumber,
    Reminder,
}

impl FieldKey {
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::EmiId => "emi_id",
            FieldKey::Name => "name",
            FieldKey::Amount => "amount",
            FieldKey::Title => "title",
            FieldKey::EmiAmount => "emi_amount",
            FieldKey::Due => "due",
            FieldKey::Phone => "phone",
            FieldKey::Logo => "logo",
            FieldKey::BankName => "bank_name",
            FieldKey::Branch => "branch",
            FieldKey::Ifsc => "ifsc",
            FieldKey::AccountHolder => "account_holder",
            FieldKey::AccountNumber => "account_number",
            FieldKey::Reminder => "reminder",
        }
    }
}

/// One row of a layout table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub area: FieldBox,
    pub align: Alignment,
    /// Starting font size on the reference canvas.
    pub start_size: u32,
    pub color: [u8; 4],
}

impl FieldSpec {
    const fn new(key: FieldKey, area: FieldBox, align: Alignment, start_size: u32, color: [u8; 4]) -> Self {
        Self {
            key,
            area,
            align,
            start_size,
            color,
        }
    }

    /// Starting font size scaled to `canvas`.
    pub fn start_size_for(&self, canvas: Canvas) -> u32 {
        canvas.scale_size(self.start_size)
    }
}

/// The fixed layout of one card type.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub kind: CardKind,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    pub fn for_kind(kind: CardKind) -> Layout {
        let fields = match kind {
            CardKind::Loan => LOAN_FIELDS,
            CardKind::Emi => EMI_FIELDS,
            CardKind::Bank => BANK_FIELDS,
        };
        Layout { kind, fields }
    }

    pub fn field(&self, key: FieldKey) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }
}

use Alignment::{Center, Left};

static LOAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(FieldKey::EmiId, FieldBox::reference(0, 20, 1280, 100), Center, 44, WHITE),
    FieldSpec::new(FieldKey::Name, FieldBox::reference(80, 140, 1120, 140), Left, 60, WHITE),
    FieldSpec::new(FieldKey::Amount, FieldBox::reference(80, 320, 1120, 140), Left, 60, WHITE),
];

static EMI_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(FieldKey::Title, FieldBox::reference(80, 40, 1120, 60), Left, 36, WHITE),
    FieldSpec::new(FieldKey::EmiAmount, FieldBox::reference(80, 120, 1120, 180), Center, 110, WHITE),
    FieldSpec::new(FieldKey::Due, FieldBox::reference(80, 320, 1120, 80), Center, 40, ACCENT),
    FieldSpec::new(FieldKey::Phone, FieldBox::reference(80, 620, 1120, 60), Center, 30, WHITE),
];

static BANK_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(FieldKey::Logo, FieldBox::reference(80, 80, 160, 160), Left, 0, DARK),
    FieldSpec::new(FieldKey::BankName, FieldBox::reference(260, 100, 960, 80), Left, 48, PRIMARY),
    FieldSpec::new(FieldKey::Branch, FieldBox::reference(260, 190, 960, 60), Left, 32, DARK),
    FieldSpec::new(FieldKey::Ifsc, FieldBox::reference(260, 260, 960, 60), Left, 32, DARK),
    FieldSpec::new(FieldKey::AccountHolder, FieldBox::reference(260, 340, 960, 50), Left, 28, DARK),
    FieldSpec::new(FieldKey::AccountNumber, FieldBox::reference(260, 400, 960, 50), Left, 28, DARK),
    FieldSpec::new(FieldKey::Reminder, FieldBox::reference(80, 620, 1120, 60), Center, 30, WHITE),
];
