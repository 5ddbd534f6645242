//! The changelog channel: one message per change to anyone's rankings or
//! homework.
//!
//! Posting is best effort. A failure is logged and never fails the command
//! that caused it.

use rankbot_core::{
  album::{Album, UserId},
  text::format_score,
};

use crate::{chat::ChatPlatform, config::ChangelogConfig, discord::Message};

/// A change worth announcing.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
  FirstUse { user: UserId },
  RatingAdded { user: UserId, album: &'a Album, score: f64 },
  RatingEdited { user: UserId, album: &'a Album, old: f64, new: f64 },
  RatingRemoved { user: UserId, album: &'a Album },
  HomeworkAdded { by: UserId, target: UserId, album: &'a Album },
  HomeworkFinished { user: UserId, album: &'a Album },
}

impl Event<'_> {
  pub fn render(&self) -> String {
    match *self {
      Event::FirstUse { user } => {
        format!("{} has just used ranking bot for the first time lfggggggg", user.mention())
      }
      Event::RatingAdded { user, album, score } => format!(
        "RANKINGS - {}:\n`rated {} as a {}`",
        user.mention(),
        album.display_name(),
        format_score(score)
      ),
      Event::RatingEdited { user, album, old, new } => format!(
        "RANKINGS - {}:\n`changed {} from a {}/10.0 to a {}/10.0`",
        user.mention(),
        album.display_name(),
        format_score(old),
        format_score(new)
      ),
      Event::RatingRemoved { user, album } => format!(
        "RANKINGS - {}:\n`removed {} from their rankings`",
        user.mention(),
        album.display_name()
      ),
      Event::HomeworkAdded { by, target, album } if by == target => format!(
        "HOMEWORK - {}:\n`added {} to their homework list`",
        by.mention(),
        album.display_name()
      ),
      Event::HomeworkAdded { by, target, album } => format!(
        "HOMEWORK - {}:\n`added {} to {}'s homework list`",
        by.mention(),
        album.display_name(),
        target.mention()
      ),
      Event::HomeworkFinished { user, album } => format!(
        "HOMEWORK - {}:\n`listened to {}`",
        user.mention(),
        album.display_name()
      ),
    }
  }
}

pub struct Changelog<'a, P> {
  chat:   &'a P,
  config: &'a ChangelogConfig,
}

impl<'a, P: ChatPlatform> Changelog<'a, P> {
  pub fn new(chat: &'a P, config: &'a ChangelogConfig) -> Self { Self { chat, config } }

  pub async fn record(&self, event: Event<'_>) {
    if !self.config.active {
      return;
    }
    let message = Message::text(event.render());
    if let Err(e) = self.chat.send_message(self.config.channel_id, &message).await {
      tracing::warn!(error = %e, "failed to post changelog entry");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rankbot_core::album::AlbumId;

  fn kid_a() -> Album {
    Album {
      album_id:  AlbumId::from("kida"),
      title:     "Kid A".into(),
      artists:   vec!["Radiohead".into()],
      year:      2000,
      cover_url: None,
    }
  }

  #[test]
  fn rating_events() {
    let album = kid_a();
    let user  = UserId(1);
    assert_eq!(
      Event::RatingAdded { user, album: &album, score: 9.0 }.render(),
      "RANKINGS - <@1>:\n`rated Radiohead - Kid A as a 9.0`"
    );
    assert_eq!(
      Event::RatingEdited { user, album: &album, old: 9.0, new: 7.5 }.render(),
      "RANKINGS - <@1>:\n`changed Radiohead - Kid A from a 9.0/10.0 to a 7.5/10.0`"
    );
    assert_eq!(
      Event::RatingRemoved { user, album: &album }.render(),
      "RANKINGS - <@1>:\n`removed Radiohead - Kid A from their rankings`"
    );
  }

  #[test]
  fn homework_for_someone_else_names_them() {
    let album = kid_a();
    let own   = Event::HomeworkAdded { by: UserId(1), target: UserId(1), album: &album };
    let other = Event::HomeworkAdded { by: UserId(1), target: UserId(2), album: &album };
    assert!(own.render().ends_with("`added Radiohead - Kid A to their homework list`"));
    assert!(other.render().ends_with("`added Radiohead - Kid A to <@2>'s homework list`"));
  }

  #[test]
  fn first_use() {
    assert_eq!(
      Event::FirstUse { user: UserId(3) }.render(),
      "<@3> has just used ranking bot for the first time lfggggggg"
    );
  }
}
