//! The `ChatPlatform` trait: everything the bot asks of the chat service
//! outside of answering an interaction request.

use std::future::Future;

use rankbot_core::album::UserId;
use serde_json::Value;

use crate::discord::Message;

/// A user as the bot needs to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
  pub id:   UserId,
  /// Display name, used for playlist titles.
  pub name: String,
}

impl ChatUser {
  pub fn mention(&self) -> String { self.id.mention() }
}

pub trait ChatPlatform: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch_user(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<ChatUser, Self::Error>> + Send + '_;

  fn send_message<'a>(
    &'a self,
    channel_id: u64,
    message: &'a Message,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Ids of the recent messages in a channel that the bot itself wrote.
  fn bot_messages(
    &self,
    channel_id: u64,
  ) -> impl Future<Output = Result<Vec<u64>, Self::Error>> + Send + '_;

  fn delete_message(
    &self,
    channel_id: u64,
    message_id: u64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Answer a deferred interaction identified by its token.
  fn send_followup<'a>(
    &'a self,
    token: &'a str,
    message: &'a Message,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the guild's slash-command definitions.
  fn register_commands<'a>(
    &'a self,
    commands: &'a Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
