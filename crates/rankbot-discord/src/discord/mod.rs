//! Discord wire types and the REST client.

pub mod http;
pub mod interaction;
pub mod message;
pub mod response;

pub use http::DiscordHttp;
pub use interaction::{CommandOption, Interaction, Snowflake, User};
pub use message::{Embed, EmbedImage, Message};
pub use response::{Choice, InteractionResponse};
