//! Markdown preprocessing and linting.
//!
//! Pipeline:
//!   raw markdown
//!     └─ strip_front_matter()   → body
//!          └─ split_code()      → (prose, code)
//!               └─ strip_markdown() → plain text for counting

use std::sync::LazyLock;

use folio_core::Report;
use regex::Regex;

static IMAGE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("image regex"));
static LINK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").expect("link regex"));
static HEADER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s+").expect("header regex"));
static BLOCKQUOTE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*>\s?").expect("blockquote regex"));
static LIST_MARKER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*(?:[-*+]|\d+\.)\s+").expect("list regex"));
static RULE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("rule regex"));
static STRONG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(\*\*|__)([^*_]+)(\*\*|__)").expect("strong regex"));
static EMPHASIS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*|\b_([^_\n]+)_\b").expect("emphasis regex"));
static STRIKE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"~~([^~]+)~~").expect("strike regex"));
static INLINE_CODE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code regex"));
static HTML_TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<[^>]+>").expect("html regex"));
static EMPTY_LINK: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^!]\[[^\]]+\]\(\s*\)").expect("empty link regex"));

// ─── Front matter and code ───────────────────────────────────────────────────

/// Drop a leading `---` … `---` front-matter block, if present.
pub fn strip_front_matter(text: &str) -> &str {
  let body = text.strip_prefix('\u{feff}').unwrap_or(text);
  let Some(rest) = body
    .strip_prefix("---\n")
    .or_else(|| body.strip_prefix("---\r\n"))
  else {
    return body;
  };

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    offset += line.len();
    if line.trim_end() == "---" {
      return &rest[offset..];
    }
  }
  // Unterminated block: treat the whole thing as body.
  body
}

/// Whether `line` opens or closes a fenced code block. Only backtick fences
/// count; `~~~` lines are prose.
pub(crate) fn is_fence(line: &str) -> bool {
  let trimmed = line.trim_start();
  line.len() - trimmed.len() <= 3 && trimmed.starts_with("```")
}

/// Separate fenced code from prose. Fence lines themselves are dropped; an
/// unclosed fence swallows the rest of the document as code.
pub fn split_code(text: &str) -> (String, String) {
  let mut prose = String::new();
  let mut code = String::new();
  let mut in_code = false;

  for line in text.lines() {
    if is_fence(line) {
      in_code = !in_code;
      continue;
    }
    let target = if in_code { &mut code } else { &mut prose };
    target.push_str(line);
    target.push('\n');
  }
  (prose, code)
}

// ─── Stripping ───────────────────────────────────────────────────────────────

/// Reduce markdown prose to plain text: images and HTML tags vanish, links
/// keep their text, and heading, quote, list and emphasis markers are
/// removed. Run [`split_code`] first; fenced code is not handled here.
pub fn strip_markdown(text: &str) -> String {
  let s = IMAGE.replace_all(text, "");
  let s = LINK.replace_all(&s, "$1");
  let s = HTML_TAG.replace_all(&s, "");
  let s = RULE.replace_all(&s, "");
  let s = HEADER.replace_all(&s, "");
  let s = BLOCKQUOTE.replace_all(&s, "");
  let s = LIST_MARKER.replace_all(&s, "");
  let s = INLINE_CODE.replace_all(&s, "$1");
  let s = STRONG.replace_all(&s, "$2");
  let s = EMPHASIS.replace_all(&s, "$1$2");
  let s = STRIKE.replace_all(&s, "$1");
  s.into_owned()
}

// ─── Linting ─────────────────────────────────────────────────────────────────

/// Lint a markdown document.
///
/// Errors: an odd number of code-fence delimiters.
/// Warnings: images without alt text, links with an empty target, and
/// heading levels that skip (e.g. `#` straight to `###`).
pub fn validate_markdown(markdown: &str) -> Report {
  let mut report = Report::new();
  let body = strip_front_matter(markdown);

  let fences = body.lines().filter(|l| is_fence(l)).count();
  if fences % 2 != 0 {
    report.error(format!(
      "Unclosed code block: found {fences} fence delimiters"
    ));
  }

  let mut in_code = false;
  let mut previous_level: Option<usize> = None;
  for (i, line) in body.lines().enumerate() {
    let line_no = i + 1;
    if is_fence(line) {
      in_code = !in_code;
      continue;
    }
    if in_code {
      continue;
    }

    for cap in IMAGE.captures_iter(line) {
      if cap[1].trim().is_empty() {
        report.warn(format!(
          "Line {line_no}: image {:?} is missing alt text",
          &cap[2]
        ));
      }
    }
    if EMPTY_LINK.is_match(&format!(" {line}")) {
      report.warn(format!("Line {line_no}: link has an empty target"));
    }

    if let Some(level) = heading_level(line) {
      if let Some(prev) = previous_level
        && level > prev + 1
      {
        report.warn(format!(
          "Line {line_no}: heading level skipped from H{prev} to H{level}"
        ));
      }
      previous_level = Some(level);
    }
  }
  report
}

/// The ATX heading level of `line`, if it is one.
pub(crate) fn heading_level(line: &str) -> Option<usize> {
  let trimmed = line.trim_start();
  if line.len() - trimmed.len() > 3 {
    return None;
  }
  let hashes = trimmed.chars().take_while(|c| *c == '#').count();
  let rest = &trimmed[hashes..];
  let valid = (1..=6).contains(&hashes)
    && (rest.is_empty() || rest.starts_with(char::is_whitespace));
  valid.then_some(hashes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn front_matter_is_removed() {
    let doc = "---\ntitle: Hi\ntags: [a]\n---\n# Body\n";
    assert_eq!(strip_front_matter(doc), "# Body\n");
    assert_eq!(strip_front_matter("# No front matter"), "# No front matter");
    assert_eq!(strip_front_matter("---\nnever closed"), "---\nnever closed");
  }

  #[test]
  fn code_is_split_from_prose() {
    let (prose, code) = split_code("Intro\n```rust\nfn main() {}\n```\nOutro\n");
    assert_eq!(prose, "Intro\nOutro\n");
    assert_eq!(code, "fn main() {}\n");
  }

  #[test]
  fn markdown_syntax_is_stripped() {
    let plain = strip_markdown(
      "## Title\n> quoted **bold** and _em_\n- item with [a link](http://x.y)\n![pic](a.png)\n`code`",
    );
    assert_eq!(
      plain.split_whitespace().collect::<Vec<_>>(),
      vec!["Title", "quoted", "bold", "and", "em", "item", "with", "a", "link", "code"]
    );
  }

  #[test]
  fn snake_case_words_survive_emphasis_stripping() {
    assert_eq!(strip_markdown("call my_func_name now").trim(), "call my_func_name now");
  }

  #[test]
  fn unmatched_fence_is_an_error() {
    let r = validate_markdown("# T\n```\ncode\n");
    assert!(!r.valid);
    assert!(r.errors[0].contains("Unclosed code block"));
  }

  #[test]
  fn tilde_lines_are_not_fences() {
    assert!(validate_markdown("Intro\n~~~\nstill prose\n").is_clean());
    let (prose, code) = split_code("Intro\n~~~\nstill prose\n");
    assert!(prose.contains("still prose"));
    assert!(code.is_empty());
  }

  #[test]
  fn alt_text_and_heading_skips_are_warnings() {
    let r = validate_markdown("# Top\n### Deep\n![](shot.png)\n![ok](fine.png)\n");
    assert!(r.valid);
    assert_eq!(r.warnings.len(), 2);
    assert!(r.warnings[0].contains("H1 to H3"));
    assert!(r.warnings[1].contains("shot.png"));
  }

  #[test]
  fn headings_inside_code_are_ignored() {
    let r = validate_markdown("# Top\n```\n### not a heading\n```\n## Fine\n");
    assert!(r.is_clean());
  }

  #[test]
  fn heading_level_detection() {
    assert_eq!(heading_level("## Two"), Some(2));
    assert_eq!(heading_level("#hashtag"), None);
    assert_eq!(heading_level("####### seven"), None);
    assert_eq!(heading_level("    # indented code"), None);
  }
}
