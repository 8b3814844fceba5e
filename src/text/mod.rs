//! # Text Layout
//!
//! Box-constrained text layout, used by every field of every card.
//!
//! ```text
//! text ──► fit (size search) ──► wrap (per size) ──► WrappedBlock ──► render_block
//!              │                     │
//!              └── FontResolver      └── FontHandle::measure
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`font`] | Font handles and the text measurer |
//! | [`wrap`] | Greedy word wrapping |
//! | [`fit`] | Shrink-to-fit size search and ellipsis truncation |
//! | [`render`] | Vertical centering, alignment, drawing onto an overlay |

pub mod fit;
pub mod font;
pub mod render;
pub mod wrap;

pub use fit::{FitParams, WrappedBlock, fit};
pub use font::{BitmapFace, FontHandle, LINE_SAMPLE, measure};
pub use render::{blend_pixel, line_positions, render_block};
pub use wrap::wrap;
