//! # Error Types
//!
//! This module defines error types used throughout the cardgen library.
//!
//! Most problems below the row boundary degrade instead of erroring (missing
//! fonts, missing logos, unparseable amounts). The variants here are the ones
//! that fail a card type or stop a whole run.

use thiserror::Error;

/// Main error type for cardgen operations
#[derive(Debug, Error)]
pub enum CardError {
    /// Row input could not be read or parsed
    #[error("Input error: {0}")]
    Input(String),

    /// Row input parsed but contained no rows
    #[error("Input contains no rows")]
    NoRows,

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Background template exists but is unusable
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
