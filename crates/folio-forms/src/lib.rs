//! Contact-form validation for Folio.
//!
//! [`ContactFormValidator`] turns a raw JSON submission into a
//! [`FormVerdict`]: schema errors, bot detection, sanitized text and an
//! advisory spam score. Delivery is the caller's business. A
//! [`RateLimiter`] is provided for callers that throttle by client.

pub mod rate_limit;
pub mod sanitize;
pub mod spam;
mod validator;

pub use rate_limit::{RateLimitConfig, RateLimitDecision, RateLimiter};
pub use sanitize::{escape_html, sanitize_html, sanitize_text, strip_dangerous};
pub use spam::{SpamConfig, SpamInput, SpamScore, score_spam};
pub use validator::{ContactFormValidator, FormConfig, FormVerdict, SanitizedSubmission};
