//! Text sanitization for user-submitted form fields.
//!
//! Escaping is not idempotent: running [`sanitize_html`] over its own output
//! escapes the `&` of every entity again. Sanitize once, at the boundary.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static DANGEROUS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?is)<\s*(?:script|iframe|object|embed)\b[^>]*>.*?<\s*/\s*(?:script|iframe|object|embed)\s*>")
    .expect("dangerous block regex")
});
static DANGEROUS_TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)<\s*/?\s*(?:script|iframe|object|embed)\b[^>]*>").expect("dangerous tag regex")
});
static TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("event handler regex")
});
static JS_PROTOCOL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("javascript regex"));

/// Remove script-capable markup: `script`, `iframe`, `object` and `embed`
/// elements (with their content), inline `on*=` handlers inside tags, and
/// `javascript:` URLs. Everything else is left as written.
pub fn strip_dangerous(input: &str) -> String {
  let s = DANGEROUS_BLOCK.replace_all(input, "");
  let s = DANGEROUS_TAG.replace_all(&s, "");
  let s = TAG.replace_all(&s, |caps: &Captures<'_>| {
    EVENT_HANDLER.replace_all(&caps[0], "").into_owned()
  });
  let s = JS_PROTOCOL.replace_all(&s, "");
  s.into_owned()
}

pub fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

/// Strip dangerous markup, then entity-escape what is left.
pub fn sanitize_html(input: &str) -> String { escape_html(&strip_dangerous(input)) }

/// [`sanitize_html`] for single-line fields: also trims and collapses
/// whitespace.
pub fn sanitize_text(input: &str) -> String {
  let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
  sanitize_html(&collapsed)
}
