//! Diagnostic registries for Folio.
//!
//! [`ErrorRegistry`] and [`LogRegistry`] keep the most recent entries in
//! bounded ring buffers for introspection. They are plain values: create one
//! per scope that should aggregate, and call `clear` between tests. Nothing
//! here affects correctness of the content pipeline.

mod category;
mod errors;
mod logs;
mod ring;

pub use category::{ErrorCategory, LogLevel, Severity};
pub use errors::{AppError, ErrorFilter, ErrorRegistry, ErrorStats};
pub use logs::{LogEntry, LogFilter, LogRegistry, LogStats};
pub use ring::SubscriptionId;

/// Entries a registry keeps unless told otherwise.
pub const DEFAULT_CAPACITY: usize = 100;
