//! Fallback album resolution by name.
//!
//! Used when a command receives free text instead of a catalog id. Names are
//! compared after [`strip_name`], so punctuation, spacing and case never
//! matter.

use crate::{Error, Result, album::Album};

/// Keep only alphanumeric characters, lowercased.
pub fn strip_name(s: &str) -> String {
  s.chars()
    .filter(|c| c.is_alphanumeric())
    .flat_map(char::to_lowercase)
    .collect()
}

/// Split free text of the form `"artist - title"`.
///
/// The split happens at the last `" - "` so that titles never contain the
/// separator but artist names may.
pub fn split_display_name(text: &str) -> Option<(&str, &str)> {
  let (artist, title) = text.rsplit_once(" - ")?;
  let (artist, title) = (artist.trim(), title.trim());
  (!artist.is_empty() && !title.is_empty()).then_some((artist, title))
}

/// Find the single album whose stripped title contains the stripped `title`
/// and whose stripped artist credit contains the stripped `artist`.
///
/// Returns `Ok(None)` when nothing matches and [`Error::AmbiguousMatch`] when
/// more than one album does.
pub fn match_album<'a>(
  artist: &str,
  title: &str,
  candidates: &'a [Album],
) -> Result<Option<&'a Album>> {
  let artist_key = strip_name(artist);
  let title_key  = strip_name(title);

  let matches: Vec<&Album> = candidates
    .iter()
    .filter(|album| {
      strip_name(&album.title).contains(&title_key)
        && strip_name(&album.artist_credit()).contains(&artist_key)
    })
    .collect();

  match matches.as_slice() {
    [] => Ok(None),
    [only] => Ok(Some(only)),
    many => Err(Error::AmbiguousMatch {
      query: format!("{artist} - {title}"),
      count: many.len(),
    }),
  }
}
