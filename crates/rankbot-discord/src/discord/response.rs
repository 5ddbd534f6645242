//! Interaction response bodies.

use serde::Serialize;

const PONG: u8 = 1;
const DEFERRED_CHANNEL_MESSAGE: u8 = 5;
const AUTOCOMPLETE_RESULT: u8 = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
  #[serde(rename = "type")]
  pub kind: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<AutocompleteData>,
}

impl InteractionResponse {
  pub fn pong() -> Self { Self { kind: PONG, data: None } }

  /// Acknowledge a command; the answer follows as follow-up messages.
  pub fn deferred() -> Self { Self { kind: DEFERRED_CHANNEL_MESSAGE, data: None } }

  pub fn autocomplete(choices: Vec<Choice>) -> Self {
    Self { kind: AUTOCOMPLETE_RESULT, data: Some(AutocompleteData { choices }) }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutocompleteData {
  pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
  pub name:  String,
  pub value: ChoiceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChoiceValue {
  String(String),
  Integer(i64),
}

impl Choice {
  pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self { name: name.into(), value: ChoiceValue::String(value.into()) }
  }

  pub fn integer(value: i64) -> Self {
    Self { name: value.to_string(), value: ChoiceValue::Integer(value) }
  }
}
