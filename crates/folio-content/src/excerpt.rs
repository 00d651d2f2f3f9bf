//! Excerpt generation.

use crate::{
  markdown::{heading_level, split_code, strip_front_matter, strip_markdown},
  text::{collapse_whitespace, split_sentences},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptOptions {
  /// Budget in characters, ellipsis included.
  pub max_length:     usize,
  pub max_sentences:  usize,
  /// Cut on a word boundary when whole sentences do not fit.
  pub smart_truncate: bool,
  pub ellipsis:       String,
}

impl Default for ExcerptOptions {
  fn default() -> Self {
    Self {
      max_length:     160,
      max_sentences:  3,
      smart_truncate: true,
      ellipsis:       "...".to_string(),
    }
  }
}

/// Produce a summary for `markdown`.
///
/// An author-supplied excerpt wins verbatim. Otherwise front matter, fenced
/// code and headings are dropped, and whole sentences are accumulated until
/// the character or sentence budget would be exceeded. When not even the
/// first sentence fits, the text is truncated and the ellipsis appended.
pub fn generate_excerpt(
  markdown: &str,
  author_excerpt: Option<&str>,
  options: &ExcerptOptions,
) -> String {
  if let Some(excerpt) = author_excerpt
    && !excerpt.trim().is_empty()
  {
    return excerpt.to_string();
  }

  let body = strip_front_matter(markdown);
  let (prose, _) = split_code(body);
  let prose: String = prose
    .lines()
    .filter(|line| heading_level(line).is_none())
    .collect::<Vec<_>>()
    .join("\n");
  let text = collapse_whitespace(&strip_markdown(&prose));
  if text.is_empty() {
    return text;
  }

  let mut excerpt = String::new();
  let mut taken = 0;
  for sentence in split_sentences(&text) {
    if taken == options.max_sentences {
      break;
    }
    let candidate_len = if excerpt.is_empty() {
      sentence.chars().count()
    } else {
      excerpt.chars().count() + 1 + sentence.chars().count()
    };
    if candidate_len > options.max_length {
      break;
    }
    if !excerpt.is_empty() {
      excerpt.push(' ');
    }
    excerpt.push_str(&sentence);
    taken += 1;
  }

  if excerpt.is_empty() {
    truncate(&text, options)
  } else {
    excerpt
  }
}

/// Cut `text` to the budget and append the ellipsis. With smart truncation
/// the cut lands on the last whitespace inside the budget, provided that
/// whitespace sits at or beyond 80% of the budget; otherwise the cut is hard.
pub fn truncate(text: &str, options: &ExcerptOptions) -> String {
  if text.chars().count() <= options.max_length {
    return text.to_string();
  }
  let budget = options
    .max_length
    .saturating_sub(options.ellipsis.chars().count());
  let cut = text
    .char_indices()
    .nth(budget)
    .map_or(text.len(), |(i, _)| i);
  let head = &text[..cut];

  let head = if options.smart_truncate && !text[cut..].starts_with(char::is_whitespace) {
    match head.rfind(char::is_whitespace) {
      Some(space) if head[..space].chars().count() >= budget * 4 / 5 => &head[..space],
      _ => head,
    }
  } else {
    head
  };

  let head = head.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'));
  format!("{head}{}", options.ellipsis)
}
