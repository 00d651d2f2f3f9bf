//! Heading extraction and table-of-contents construction.

use std::collections::HashMap;

use folio_core::slug::normalize_slug;
use serde::{Deserialize, Serialize};

use crate::markdown::{heading_level, is_fence, strip_front_matter, strip_markdown};

/// An ATX heading with its anchor slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
  pub level: u8,
  pub text:  String,
  /// Unique within the document: repeats get `-1`, `-2`, … appended.
  pub slug:  String,
  /// 1-based line number in the body (after front matter).
  pub line:  usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
  pub level:    u8,
  pub text:     String,
  pub slug:     String,
  pub children: Vec<TocEntry>,
}

/// Every heading outside fenced code, in document order.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
  let body = strip_front_matter(markdown);
  let mut seen: HashMap<String, usize> = HashMap::new();
  let mut headings = Vec::new();
  let mut in_code = false;

  for (i, line) in body.lines().enumerate() {
    if is_fence(line) {
      in_code = !in_code;
      continue;
    }
    if in_code {
      continue;
    }
    let Some(level) = heading_level(line) else {
      continue;
    };

    let raw = line.trim_start()[level..].trim();
    // Closing hashes are decoration: "## Title ##".
    let raw = raw.trim_end_matches('#').trim_end();
    let text = strip_markdown(raw).trim().to_string();
    if text.is_empty() {
      continue;
    }

    let mut slug = normalize_slug(&text);
    if slug.is_empty() {
      slug = "section".to_string();
    }
    let count = seen.entry(slug.clone()).or_insert(0);
    if *count > 0 {
      slug = format!("{slug}-{count}");
    }
    *count += 1;

    headings.push(Heading {
      level: level as u8,
      text,
      slug,
      line: i + 1,
    });
  }
  headings
}

/// Nest headings by level. A heading closes every open entry at its own
/// level or deeper before attaching to the nearest shallower one; headings
/// with no shallower ancestor become roots.
pub fn build_toc(headings: &[Heading]) -> Vec<TocEntry> {
  let mut roots: Vec<TocEntry> = Vec::new();
  let mut open: Vec<TocEntry> = Vec::new();

  for heading in headings {
    while open.last().is_some_and(|top| top.level >= heading.level) {
      if let Some(done) = open.pop() {
        attach(&mut open, &mut roots, done);
      }
    }
    open.push(TocEntry {
      level:    heading.level,
      text:     heading.text.clone(),
      slug:     heading.slug.clone(),
      children: Vec::new(),
    });
  }
  while let Some(done) = open.pop() {
    attach(&mut open, &mut roots, done);
  }
  roots
}

fn attach(open: &mut [TocEntry], roots: &mut Vec<TocEntry>, entry: TocEntry) {
  match open.last_mut() {
    Some(parent) => parent.children.push(entry),
    None => roots.push(entry),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DOC: &str = "\
# Guide
Intro text.
## Install
### From source
### From crates.io
## Usage
```sh
# not a heading
```
## Usage
# Appendix
";

  #[test]
  fn headings_get_unique_slugs() {
    let headings = extract_headings(DOC);
    let slugs: Vec<&str> = headings.iter().map(|h| h.slug.as_str()).collect();
    assert_eq!(slugs, vec![
      "guide",
      "install",
      "from-source",
      "from-cratesio",
      "usage",
      "usage-1",
      "appendix"
    ]);
    assert_eq!(headings[1].line, 3);
  }

  #[test]
  fn toc_nests_by_level() {
    let toc = build_toc(&extract_headings(DOC));
    assert_eq!(toc.len(), 2);
    let guide = &toc[0];
    assert_eq!(guide.children.len(), 3);
    assert_eq!(guide.children[0].children.len(), 2);
    assert_eq!(guide.children[0].children[1].text, "From crates.io");
    assert_eq!(toc[1].slug, "appendix");
  }

  #[test]
  fn toc_tolerates_skipped_levels_and_leading_subheadings() {
    let toc = build_toc(&extract_headings("### Deep first\n# Top\n### Skip\n## Mid\n"));
    assert_eq!(toc.len(), 2);
    assert_eq!(toc[0].text, "Deep first");
    assert_eq!(toc[1].children.len(), 2);
    assert_eq!(toc[1].children[0].text, "Skip");
    assert_eq!(toc[1].children[1].text, "Mid");
  }

  #[test]
  fn inline_markup_is_removed_from_heading_text() {
    let h = extract_headings("## Using **`serde`** with [JSON](https://json.org) ##\n");
    assert_eq!(h[0].text, "Using serde with JSON");
    assert_eq!(h[0].slug, "using-serde-with-json");
  }
}
