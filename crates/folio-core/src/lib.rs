//! Core types and validation for the Folio content layer.
//!
//! This crate is deliberately free of I/O. It owns the content data model,
//! the per-record schema validator, date and duration arithmetic, and the
//! snapshot types every other crate consumes.

pub mod content;
pub mod dates;
pub mod error;
pub mod report;
pub mod schema;
pub mod slug;
pub mod snapshot;

pub use error::{Error, Result};
pub use report::{ErrorCode, FieldError, Report, Validated};
