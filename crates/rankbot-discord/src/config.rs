//! Runtime configuration, deserialised from `config.toml` and `RANKBOT__*`
//! environment variables.

use std::path::PathBuf;

use rankbot_spotify::SpotifyConfig;
use serde::Deserialize;

pub const DEFAULT_DISCORD_API: &str = "https://discord.com/api/v10";

#[derive(Deserialize, Clone, Debug)]
pub struct BotConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  pub discord:          DiscordConfig,
  #[serde(default)]
  pub changelog:        ChangelogConfig,
  #[serde(default)]
  pub ranking_channels: Vec<RankingChannel>,
  pub spotify:          SpotifySettings,
}

impl BotConfig {
  /// The channel that shows the rankings of `year`, if one is configured.
  pub fn ranking_channel(&self, year: i32) -> Option<u64> {
    self
      .ranking_channels
      .iter()
      .find(|c| c.year == year)
      .map(|c| c.channel_id)
  }
}

#[derive(Deserialize, Clone, Debug)]
pub struct DiscordConfig {
  pub application_id: u64,
  /// Hex-encoded Ed25519 key from the developer portal.
  pub public_key:     String,
  pub token:          String,
  pub guild_id:       u64,
  pub mod_role_id:    u64,
  #[serde(default = "default_discord_api")]
  pub api_base:       String,
}

fn default_discord_api() -> String { DEFAULT_DISCORD_API.to_string() }

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ChangelogConfig {
  #[serde(default)]
  pub active:     bool,
  #[serde(default)]
  pub channel_id: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RankingChannel {
  pub year:       i32,
  pub channel_id: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SpotifySettings {
  pub client_id:     String,
  pub client_secret: String,
  pub refresh_token: String,
  /// Keep a "{name}'s Homework" playlist in step with each homework list.
  #[serde(default)]
  pub playlists:     bool,
  pub api_base:      Option<String>,
  pub accounts_base: Option<String>,
}

impl SpotifySettings {
  pub fn client_config(&self) -> SpotifyConfig {
    let mut config = SpotifyConfig::new(
      self.client_id.clone(),
      self.client_secret.clone(),
      self.refresh_token.clone(),
    );
    if let Some(base) = &self.api_base {
      config.api_base = base.clone();
    }
    if let Some(base) = &self.accounts_base {
      config.accounts_base = base.clone();
    }
    config
  }
}
