//! Plain-text helpers shared by the excerpt, keyword and readability passes.

/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words are whitespace-separated tokens containing at least one letter or
/// digit; bare punctuation does not count.
pub fn count_words(s: &str) -> usize {
  s.split_whitespace()
    .filter(|t| t.chars().any(char::is_alphanumeric))
    .count()
}

/// Split prose into sentences on `.`, `!` or `?` followed by whitespace or
/// the end of input. Terminators stay attached; empty sentences are dropped.
pub fn split_sentences(s: &str) -> Vec<String> {
  let mut sentences = Vec::new();
  let mut current = String::new();
  let mut chars = s.chars().peekable();

  while let Some(c) = chars.next() {
    current.push(c);
    let at_boundary = chars.peek().is_none_or(|next| next.is_whitespace());
    if matches!(c, '.' | '!' | '?') && at_boundary {
      let sentence = collapse_whitespace(&current);
      if !sentence.is_empty() {
        sentences.push(sentence);
      }
      current.clear();
    }
  }

  let rest = collapse_whitespace(&current);
  if !rest.is_empty() {
    sentences.push(rest);
  }
  sentences
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_terminators_followed_by_space() {
    let s = split_sentences("Rust is fast. Is it safe? Yes!  Version 1.75 shipped");
    assert_eq!(s, vec![
      "Rust is fast.",
      "Is it safe?",
      "Yes!",
      "Version 1.75 shipped"
    ]);
  }

  #[test]
  fn counts_only_wordy_tokens() {
    assert_eq!(count_words("Hello , world -- 42"), 3);
    assert_eq!(count_words("   "), 0);
  }
}
