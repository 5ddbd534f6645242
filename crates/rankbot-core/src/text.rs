//! Text helpers shared by message rendering and autocomplete.
//!
//! Lengths are counted in characters, which is how the chat platform counts
//! its limits.

/// Longest message the chat platform accepts.
pub const MESSAGE_LIMIT: usize = 2000;

/// Longest autocomplete choice name the chat platform accepts.
pub const CHOICE_NAME_LIMIT: usize = 100;

/// Most autocomplete choices the chat platform displays.
pub const MAX_CHOICES: usize = 25;

const CHOICE_HEAD: usize = 86;
const ELLIPSIS: &str = "...";

/// Shorten a choice name to exactly [`CHOICE_NAME_LIMIT`] characters by
/// cutting out its middle, keeping the head and the tail readable.
pub fn truncate_choice_name(name: &str) -> String {
  let len = name.chars().count();
  if len <= CHOICE_NAME_LIMIT {
    return name.to_owned();
  }

  let tail_len = CHOICE_NAME_LIMIT - CHOICE_HEAD - ELLIPSIS.len();
  let head: String = name.chars().take(CHOICE_HEAD).collect();
  let tail: String = name.chars().skip(len - tail_len).collect();
  format!("{head}{ELLIPSIS}{tail}")
}

const SEARCH_PUNCTUATION: &[char] =
  &['\'', '"', ',', '-', '.', '!', '/', '(', ')', ':'];

fn search_tokens(s: &str) -> Vec<String> {
  s.chars()
    .filter(|c| !SEARCH_PUNCTUATION.contains(c))
    .collect::<String>()
    .split(' ')
    .map(str::to_lowercase)
    .collect()
}

/// Word-wise fuzzy match: every word of `query` must be a case-insensitive
/// substring of some word of `candidate`, ignoring common punctuation.
pub fn words_match(query: &str, candidate: &str) -> bool {
  let candidate_words = search_tokens(candidate);
  search_tokens(query)
    .iter()
    .all(|q| candidate_words.iter().any(|c| c.contains(q.as_str())))
}

/// Split `content` into chunks that fit in one message.
///
/// Chunks break at the last newline before the limit and the following chunk
/// is left-trimmed. A chunk without any newline is cut hard at the limit.
pub fn split_message(content: &str) -> Vec<String> {
  let mut fragments = Vec::new();
  let mut rest = content;

  while rest.chars().count() > MESSAGE_LIMIT {
    let limit = rest
      .char_indices()
      .nth(MESSAGE_LIMIT)
      .map_or(rest.len(), |(i, _)| i);
    let cut = rest[..limit]
      .rfind('\n')
      .filter(|&i| i > 0)
      .unwrap_or(limit);

    fragments.push(rest[..cut].to_owned());
    rest = rest[cut..].trim_start();
  }

  fragments.push(rest.to_owned());
  fragments
}

/// Render a score the way users type them: `8.0`, `7.5`, `6.25`.
pub fn format_score(score: f64) -> String {
  if score.fract() == 0.0 {
    format!("{score:.1}")
  } else {
    format!("{score}")
  }
}
