//! Outgoing message bodies, shared by channel messages and follow-ups.

use serde::Serialize;

/// Message flag that hides link previews.
pub const SUPPRESS_EMBEDS: u64 = 1 << 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
  #[serde(skip_serializing_if = "String::is_empty")]
  pub content:          String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub embeds:           Vec<Embed>,
  #[serde(skip_serializing_if = "is_zero")]
  pub flags:            u64,
  pub allowed_mentions: AllowedMentions,
}

fn is_zero(flags: &u64) -> bool { *flags == 0 }

impl Message {
  pub fn text(content: impl Into<String>) -> Self {
    Self { content: content.into(), ..Self::default() }
  }

  pub fn embed(embed: Embed) -> Self { Self { embeds: vec![embed], ..Self::default() } }

  pub fn suppress_embeds(mut self) -> Self {
    self.flags |= SUPPRESS_EMBEDS;
    self
  }
}

/// Mentions render but never notify anyone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllowedMentions {
  pub parse: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
  pub title:       String,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image:       Option<EmbedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedImage {
  pub url: String,
}
