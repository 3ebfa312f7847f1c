//! Customer service messages
//!
//! Messages may be sent within 48 hours of the user's last interaction.

use serde::Serialize;

use crate::wx::{Action, ApiResponseBase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub picurl: String,
}

/// Message body, serialized under its `msgtype` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomMessage {
    Text {
        content: String,
    },
    Image {
        media_id: String,
    },
    Voice {
        media_id: String,
    },
    Video {
        media_id: String,
        thumb_media_id: String,
        title: String,
        description: String,
    },
    Music {
        title: String,
        description: String,
        musicurl: String,
        hqmusicurl: String,
        thumb_media_id: String,
    },
    News {
        articles: Vec<Article>,
    },
    MpNews {
        media_id: String,
    },
    MiniProgramPage {
        title: String,
        appid: String,
        pagepath: String,
        thumb_media_id: String,
    },
}

impl CustomMessage {
    pub fn text(content: impl Into<String>) -> Self {
        CustomMessage::Text {
            content: content.into(),
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        CustomMessage::Image {
            media_id: media_id.into(),
        }
    }

    pub fn msgtype(&self) -> &'static str {
        match self {
            CustomMessage::Text { .. } => "text",
            CustomMessage::Image { .. } => "image",
            CustomMessage::Voice { .. } => "voice",
            CustomMessage::Video { .. } => "video",
            CustomMessage::Music { .. } => "music",
            CustomMessage::News { .. } => "news",
            CustomMessage::MpNews { .. } => "mpnews",
            CustomMessage::MiniProgramPage { .. } => "miniprogrampage",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct KfAccount {
    kf_account: String,
}

#[derive(Debug, Clone, Serialize)]
struct CustomRequest {
    touser: String,
    msgtype: &'static str,
    #[serde(flatten)]
    message: CustomMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    customservice: Option<KfAccount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypingCommand {
    Typing,
    CancelTyping,
}

#[derive(Debug, Clone, Serialize)]
struct TypingRequest {
    touser: String,
    command: TypingCommand,
}

pub fn send(touser: impl Into<String>, message: CustomMessage) -> Action<ApiResponseBase> {
    send_as(touser, message, None)
}

/// Send as a specific customer service account (`kf_account`).
pub fn send_as(
    touser: impl Into<String>,
    message: CustomMessage,
    kf_account: Option<String>,
) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/message/custom/send").json(CustomRequest {
        touser: touser.into(),
        msgtype: message.msgtype(),
        message,
        customservice: kf_account.map(|kf_account| KfAccount { kf_account }),
    })
}

pub fn typing(touser: impl Into<String>, command: TypingCommand) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/message/custom/typing").json(TypingRequest {
        touser: touser.into(),
        command,
    })
}
