//! rankbot server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store and serves the Discord interactions endpoint over HTTP.
//!
//! # Registering slash commands
//!
//! Commands only need registering when their definitions change:
//!
//! ```sh
//! cargo run -p rankbot-discord --bin rankbot -- --register-commands
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use rankbot_discord::{
  AppState, BotConfig,
  auth::SignatureVerifier,
  chat::ChatPlatform as _,
  definitions,
  discord::{DiscordHttp, http::DiscordHttpConfig},
};
use rankbot_spotify::SpotifyClient;
use rankbot_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Album ranking Discord bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Register the slash commands with the guild and exit.
  #[arg(long)]
  register_commands: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RANKBOT").separator("__"))
    .build()
    .context("failed to read config file")?;

  let bot_cfg: BotConfig = settings
    .try_deserialize()
    .context("failed to deserialise BotConfig")?;

  let discord = DiscordHttp::new(DiscordHttpConfig {
    api_base:       bot_cfg.discord.api_base.clone(),
    token:          bot_cfg.discord.token.clone(),
    application_id: bot_cfg.discord.application_id,
    guild_id:       bot_cfg.discord.guild_id,
  })
  .context("failed to build discord client")?;

  if cli.register_commands {
    discord
      .register_commands(&definitions::commands())
      .await
      .context("failed to register commands")?;
    tracing::info!(guild = bot_cfg.discord.guild_id, "slash commands registered");
    return Ok(());
  }

  let verifier = SignatureVerifier::from_hex(&bot_cfg.discord.public_key)
    .context("invalid discord public key")?;
  let spotify = SpotifyClient::new(bot_cfg.spotify.client_config())
    .context("failed to build spotify client")?;

  let store_path = expand_tilde(&bot_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let address = format!("{}:{}", bot_cfg.host, bot_cfg.port);
  let state = AppState {
    store:        Arc::new(store),
    catalog:      Arc::new(spotify),
    chat:         Arc::new(discord),
    config:       Arc::new(bot_cfg),
    verifier:     Arc::new(verifier),
    command_lock: Arc::default(),
  };

  let app = rankbot_discord::router(state);

  tracing::info!("Listening on http://{address}/interactions");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
