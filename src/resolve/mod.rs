//! External resource resolution: fonts, logos and card backgrounds.
//!
//! Each resource sits behind a trait so the compositor can be driven by
//! filesystem-backed resolvers in production and in-memory ones in tests.
//! None of the resolvers return errors for missing resources; they degrade
//! to a fallback and log a warning. The one exception is a background
//! template that exists but cannot be decoded.

pub mod background;
pub mod fonts;
pub mod images;

pub use background::{BackgroundProvider, TemplateBackgrounds, blank_canvas};
pub use fonts::{BuiltinFonts, FontResolver, FsFontResolver};
pub use images::{FsImageResolver, ImageResolver, NoImages};
