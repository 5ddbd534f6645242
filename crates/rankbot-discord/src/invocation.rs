//! A command or autocomplete interaction reduced to what the handlers read.

use std::collections::HashMap;

use rankbot_core::album::UserId;

use crate::{
  chat::ChatUser,
  discord::{CommandOption, Interaction},
  error::{Error, Result},
};

#[derive(Debug, Clone)]
pub struct Invocation {
  pub command: String,
  pub options: Vec<CommandOption>,
  pub invoker: ChatUser,
  pub roles:   Vec<u64>,
  /// Users referenced by `USER` options, keyed by id.
  pub users:   HashMap<u64, ChatUser>,
}

impl Invocation {
  pub fn from_interaction(interaction: &Interaction) -> Result<Self> {
    let data = interaction
      .data
      .as_ref()
      .ok_or_else(|| Error::BadRequest("interaction has no command data".into()))?;
    let user = interaction
      .invoker()
      .ok_or_else(|| Error::BadRequest("interaction has no user".into()))?;
    let member = interaction.member.as_ref();

    let invoker = ChatUser {
      id:   UserId(user.id.0),
      name: member
        .and_then(|m| m.nick.clone())
        .unwrap_or_else(|| user.display_name().to_string()),
    };

    let users = data
      .resolved
      .users
      .iter()
      .map(|(id, u)| {
        let nick = data.resolved.members.get(id).and_then(|m| m.nick.clone());
        let name = nick.unwrap_or_else(|| u.display_name().to_string());
        (id.0, ChatUser { id: UserId(id.0), name })
      })
      .collect();

    Ok(Self {
      command: data.name.clone(),
      options: data.options.clone(),
      invoker,
      roles: member.map(|m| m.roles.iter().map(|r| r.0).collect()).unwrap_or_default(),
      users,
    })
  }

  pub fn option(&self, name: &str) -> Option<&CommandOption> {
    self.options.iter().find(|o| o.name == name)
  }

  pub fn string(&self, name: &str) -> Option<&str> { self.option(name)?.as_str() }

  pub fn integer(&self, name: &str) -> Option<i64> { self.option(name)?.as_i64() }

  pub fn number(&self, name: &str) -> Option<f64> { self.option(name)?.as_f64() }

  /// A `USER` option, falling back to the bare id when Discord did not
  /// resolve it.
  pub fn user(&self, name: &str) -> Option<ChatUser> {
    let id: u64 = self.string(name)?.parse().ok()?;
    Some(self.users.get(&id).cloned().unwrap_or_else(|| ChatUser {
      id:   UserId(id),
      name: id.to_string(),
    }))
  }

  /// The option the user is typing into, for autocomplete.
  pub fn focused(&self) -> Option<&CommandOption> { self.options.iter().find(|o| o.focused) }

  pub fn has_role(&self, role_id: u64) -> bool { self.roles.contains(&role_id) }
}
