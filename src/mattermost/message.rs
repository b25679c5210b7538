//! Send structured messages to any given Mattermost channel.

use super::{
    api::Api,
    channel::{resolve_channel, ChannelId},
    error::MattermostError,
};
use crate::config::Options;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// The color code for critical messages.
pub const COLOR_CRITICAL: &str = "#FF0000";
/// The color code for informational messages.
pub const COLOR_INFO: &str = "#E0E0D1";
/// The color code for successful messages.
pub const COLOR_SUCCESS: &str = "#00FF00";
/// The color code for warning messages.
pub const COLOR_WARNING: &str = "#FF8000";

/// The criticality of a message, shown as the color of its attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    Critical,
    #[default]
    Info,
    Success,
    Warning,
}

impl Level {
    /// Parse a level name. Unknown names are treated as [Level::Info] rather
    /// than rejected.
    pub fn from_name(name: &str) -> Self {
        match name {
            "critical" => Level::Critical,
            "success" => Level::Success,
            "warning" => Level::Warning,
            _ => Level::Info,
        }
    }

    /// The HTML color code of the message attachment.
    pub fn color(self) -> &'static str {
        match self {
            Level::Critical => COLOR_CRITICAL,
            Level::Info => COLOR_INFO,
            Level::Success => COLOR_SUCCESS,
            Level::Warning => COLOR_WARNING,
        }
    }
}

/// What's being said, and by whom.
pub struct Message {
    pub author: String,
    pub title: String,
    pub text: String,
    pub level: Level,
}

/// <https://developers.mattermost.com/integrate/reference/message-attachments/>
#[derive(Serialize)]
struct Attachment<'a> {
    author_name: &'a str,
    color: &'a str,
    title: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct Props<'a> {
    attachments: [Attachment<'a>; 1],
}

/// <https://api.mattermost.com/#tag/posts/operation/CreatePost>
#[derive(Serialize)]
struct MessageRequest<'a> {
    channel_id: &'a ChannelId,
    props: Props<'a>,
}

/// Serialize the body of a `POST /posts` carrying `msg` as its single
/// attachment.
pub fn create_msg_payload(
    channel_id: &ChannelId,
    msg: &Message,
) -> Result<Vec<u8>, MattermostError> {
    let req = MessageRequest {
        channel_id,
        props: Props {
            attachments: [Attachment {
                author_name: &msg.author,
                color: msg.level.color(),
                title: &msg.title,
                text: &msg.text,
            }],
        },
    };

    serde_json::to_vec(&req).map_err(MattermostError::Serialize)
}

/// Post a message in a channel whose ID is already known, returning
/// Mattermost's description of the created post.
pub async fn post_message<A: Api>(
    api: &A,
    channel_id: &ChannelId,
    msg: &Message,
    opts: &Options,
) -> Result<Value, MattermostError> {
    let payload = create_msg_payload(channel_id, msg)?;

    let res = api.post("/posts", payload, opts).await?;
    info!(channel_id = %channel_id, "Message posted");

    Ok(res)
}

/// Post a message to a channel ID or `@username`, opening the direct channel
/// first if need be. Nothing is posted if resolution fails.
pub async fn notify<A: Api>(
    api: &A,
    target: &str,
    msg: &Message,
    opts: &Options,
) -> Result<Value, MattermostError> {
    let channel_id = resolve_channel(api, target, opts).await?;

    post_message(api, &channel_id, msg, opts).await
}
