//! Error types for `folio-core`.
//!
//! These cover failures of the machinery itself. Invalid content is never an
//! `Error`; it is reported through [`crate::Validated`] and [`crate::Report`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("expected a JSON array for {kind}, found {found}")]
  NotAnArray { kind: &'static str, found: &'static str },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
