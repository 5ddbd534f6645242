//! Slash-command definitions registered with the guild.

use serde_json::{Value, json};

const STRING: u8 = 3;
const INTEGER: u8 = 4;
const USER: u8 = 6;
const NUMBER: u8 = 10;

fn command(name: &str, description: &str, options: Vec<Value>) -> Value {
  json!({ "name": name, "description": description, "type": 1, "options": options })
}

/// An album option filled from autocomplete.
fn entry(description: &str) -> Value {
  json!({
    "name": "entry",
    "description": description,
    "type": STRING,
    "required": true,
    "autocomplete": true,
  })
}

fn rating(description: &str) -> Value {
  json!({
    "name": "rating",
    "description": description,
    "type": NUMBER,
    "required": true,
    "min_value": 0,
    "max_value": 10,
  })
}

fn user(description: &str) -> Value {
  json!({ "name": "user", "description": description, "type": USER })
}

fn year(description: &str) -> Value {
  json!({ "name": "year", "description": description, "type": INTEGER })
}

/// Every command the bot answers, in registration order.
pub fn commands() -> Value {
  Value::Array(vec![
    command("update", "update the album rankings", vec![]),
    command("get-ratings", "shows the ratings of a specific year", vec![year(
      "the year of which you want the ratings",
    )]),
    command(
      "add-rating",
      "add an album to your rankings with the help of spotify search",
      vec![
        entry("the artist - album you're searching for"),
        rating("your rating of the album (0-10)"),
      ],
    ),
    command("edit-rating", "edit a rating on an album", vec![
      entry("the artist - album whos rating you want to change"),
      rating("your new rating of the album (0-10)"),
    ]),
    command("remove-rating", "remove an album from your ranking", vec![entry(
      "the artist - album you want to remove (see autocomplete)",
    )]),
    command("album-cover", "displays the cover of an album", vec![entry(
      "the album - artist you want to see the cover of (see autocomplete)",
    )]),
    command("stats", "find out stats about an album", vec![entry(
      "the artist - album you are trying to get (see autocomplete)",
    )]),
    command(
      "top-albums",
      "find the top albums of the year (or any year)",
      vec![
        json!({
          "name": "numberofalbums",
          "description": "how many albums do you want to see ranked? (default: 5)",
          "type": INTEGER,
          "autocomplete": true,
        }),
        json!({
          "name": "minimumratings",
          "description": "how many rankings do you want the album to have minimum (default: 1)",
          "type": INTEGER,
          "autocomplete": true,
        }),
        json!({
          "name": "sortby",
          "description": "the statistic to rank by",
          "type": STRING,
          "choices": [
            { "name": "average", "value": "avg" },
            { "name": "standard deviation", "value": "std" },
          ],
        }),
        year("the year you want to filter by, -1 for no filtering"),
      ],
    ),
    command("add-homework", "add homework to someone's list", vec![
      entry("the artist - album you are trying to add (select an autocomplete option)"),
      user("the user whose homework list you're adding to"),
    ]),
    command("get-homework", "view someone's homework", vec![user(
      "the user whose homework list you're looking at",
    )]),
    command("remove-homework", "remove homework from your list", vec![entry(
      "the artist - album you are trying to remove from your list (see autocomplete)",
    )]),
    command("add-all-homework", "MOD ONLY: add homework to everyones list", vec![entry(
      "the artist - album you are trying to add to everyones list (see autocomplete)",
    )]),
    command("sync", "MOD ONLY: syncs the application commands", vec![]),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(defs: &Value) -> Vec<&str> {
    defs.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect()
  }

  #[test]
  fn every_handled_command_is_defined() {
    let defs = commands();
    assert_eq!(names(&defs), [
      "update",
      "get-ratings",
      "add-rating",
      "edit-rating",
      "remove-rating",
      "album-cover",
      "stats",
      "top-albums",
      "add-homework",
      "get-homework",
      "remove-homework",
      "add-all-homework",
      "sync",
    ]);
  }

  #[test]
  fn entries_are_required_and_autocompleted() {
    let defs = commands();
    for def in defs.as_array().unwrap() {
      for option in def["options"].as_array().unwrap() {
        if option["name"] == "entry" {
          assert_eq!(option["required"], true, "{}", def["name"]);
          assert_eq!(option["autocomplete"], true, "{}", def["name"]);
        }
      }
    }
  }

  #[test]
  fn descriptions_fit_discords_limit() {
    let defs = commands();
    for def in defs.as_array().unwrap() {
      assert!(def["description"].as_str().unwrap().len() <= 100);
      for option in def["options"].as_array().unwrap() {
        assert!(option["description"].as_str().unwrap().len() <= 100);
      }
    }
  }
}
