//! Incoming interaction payloads.
//!
//! Only the fields the bot reads are declared. Discord sends snowflakes as
//! strings; [`Snowflake`] accepts both strings and numbers.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

pub const PING: u8 = 1;
pub const APPLICATION_COMMAND: u8 = 2;
pub const APPLICATION_COMMAND_AUTOCOMPLETE: u8 = 4;

// ─── Snowflake ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(pub u64);

impl fmt::Display for Snowflake {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl Serialize for Snowflake {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for Snowflake {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
      type Value = Snowflake;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake as a string or integer")
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> { Ok(Snowflake(v)) }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
        v.parse().map(Snowflake).map_err(E::custom)
      }
    }

    deserializer.deserialize_any(Visitor)
  }
}

// ─── Interaction ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
  #[serde(rename = "type")]
  pub kind:       u8,
  #[serde(default)]
  pub token:      String,
  pub data:       Option<CommandData>,
  /// Present when invoked in a guild.
  pub member:     Option<Member>,
  /// Present when invoked in a DM.
  pub user:       Option<User>,
  pub channel_id: Option<Snowflake>,
}

impl Interaction {
  pub fn invoker(&self) -> Option<&User> {
    self.member.as_ref().and_then(|m| m.user.as_ref()).or(self.user.as_ref())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
  pub name:     String,
  #[serde(default)]
  pub options:  Vec<CommandOption>,
  #[serde(default)]
  pub resolved: Resolved,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
  #[serde(default)]
  pub users:   HashMap<Snowflake, User>,
  #[serde(default)]
  pub members: HashMap<Snowflake, PartialMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
  pub name:    String,
  #[serde(rename = "type")]
  pub kind:    u8,
  pub value:   Option<Value>,
  #[serde(default)]
  pub focused: bool,
}

impl CommandOption {
  pub fn as_str(&self) -> Option<&str> { self.value.as_ref()?.as_str() }

  /// Integers arrive as numbers, but as the typed text while autocompleting.
  pub fn as_i64(&self) -> Option<i64> {
    match self.value.as_ref()? {
      Value::Number(n) => n.as_i64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self.value.as_ref()? {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
  pub user:  Option<User>,
  pub nick:  Option<String>,
  #[serde(default)]
  pub roles: Vec<Snowflake>,
}

/// A member as it appears in `resolved`, without its user.
#[derive(Debug, Clone, Deserialize)]
pub struct PartialMember {
  pub nick: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id:          Snowflake,
  pub username:    String,
  pub global_name: Option<String>,
}

impl User {
  pub fn display_name(&self) -> &str { self.global_name.as_deref().unwrap_or(&self.username) }
}
