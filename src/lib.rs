//! # Cardgen - Customer Card Renderer
//!
//! Cardgen turns rows of customer data into fixed-size PNG cards (loan
//! summary, EMI reminder, bank details). Every text field is laid out by a
//! box-constrained shrink-to-fit engine:
//!
//! - **Text layout**: greedy wrapping, iterative size search, ellipsis truncation
//! - **Layout tables**: static per-card box geometry on a reference canvas
//! - **Resolvers**: fonts, logos and background templates with graceful fallbacks
//! - **Batch runs**: per-row atomic output, optional parallel rows
//!
//! ## Quick Start
//!
//! ```no_run
//! use cardgen::{CardConfig, RunContext, row::load_rows};
//! use std::path::Path;
//!
//! let rows = load_rows(Path::new("customers.json"))?;
//! let ctx = RunContext::new(CardConfig::default());
//! let summary = ctx.run(&rows, 1)?;
//! println!("{} of {} rows rendered", summary.succeeded, summary.total);
//!
//! # Ok::<(), cardgen::error::CardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`text`] | Measuring, wrapping, fitting and drawing text in a box |
//! | [`layout`] | Card kinds, field boxes, colours |
//! | [`card`] | Field strings and the card compositor |
//! | [`resolve`] | Font, logo and background resolvers |
//! | [`run`] | Batch processing and run summary |
//! | [`row`] | Customer row input |
//! | [`format`] | Currency and date formatting |
//! | [`templates`] | Background template generation |
//! | [`config`] | Generator configuration |
//! | [`logging`] | Log subscriber setup |
//! | [`error`] | Error types |

pub mod card;
pub mod config;
pub mod error;
pub mod format;
pub mod layout;
pub mod logging;
pub mod resolve;
pub mod row;
pub mod run;
pub mod shapes;
pub mod templates;
pub mod text;

// Re-exports for convenience
pub use card::CardRenderer;
pub use config::CardConfig;
pub use error::CardError;
pub use layout::{Canvas, CardKind};
pub use row::CustomerRow;
pub use run::{RunContext, RunSummary};
