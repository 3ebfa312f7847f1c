//! Application messages

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

/// Who receives a message. Members, departments and tags are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    pub users: Vec<String>,
    pub parties: Vec<String>,
    pub tags: Vec<String>,
}

impl Recipients {
    /// Everyone in the application's visible range
    pub fn all() -> Self {
        Self::users(["@all"])
    }

    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn party(mut self, party: impl Into<String>) -> Self {
        self.parties.push(party.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagepath: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MpNewsArticle {
    pub title: String,
    pub thumb_media_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub key: String,
    pub value: String,
}

/// Message body, serialized under its `msgtype` key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Message {
    #[serde(rename = "text")]
    Text { content: String },
    #[serde(rename = "image")]
    Image { media_id: String },
    #[serde(rename = "voice")]
    Voice { media_id: String },
    #[serde(rename = "video")]
    Video {
        media_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "file")]
    File { media_id: String },
    #[serde(rename = "textcard")]
    TextCard {
        title: String,
        description: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        btntxt: Option<String>,
    },
    #[serde(rename = "news")]
    News { articles: Vec<NewsArticle> },
    #[serde(rename = "mpnews")]
    MpNews { articles: Vec<MpNewsArticle> },
    #[serde(rename = "markdown")]
    Markdown { content: String },
    #[serde(rename = "miniprogram_notice")]
    MiniProgramNotice {
        appid: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        page: Option<String>,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        emphasis_first_item: Option<bool>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        content_item: Vec<ContentItem>,
    },
    /// Template cards come in many layouts; the card is sent as given.
    #[serde(rename = "template_card")]
    TemplateCard(serde_json::Value),
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Message::Text {
            content: content.into(),
        }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        Message::Markdown {
            content: content.into(),
        }
    }

    pub fn msgtype(&self) -> &'static str {
        match self {
            Message::Text { .. } => "text",
            Message::Image { .. } => "image",
            Message::Voice { .. } => "voice",
            Message::Video { .. } => "video",
            Message::File { .. } => "file",
            Message::TextCard { .. } => "textcard",
            Message::News { .. } => "news",
            Message::MpNews { .. } => "mpnews",
            Message::Markdown { .. } => "markdown",
            Message::MiniProgramNotice { .. } => "miniprogram_notice",
            Message::TemplateCard(_) => "template_card",
        }
    }
}

/// Delivery flags of [`send_with`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Confidential message, watermarked and not forwardable
    pub safe: bool,
    pub enable_id_trans: bool,
    pub enable_duplicate_check: bool,
    /// Seconds, defaults to 1800 on the server
    pub duplicate_check_interval: Option<u32>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn join(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join("|"))
    }
}

#[derive(Debug, Clone, Serialize)]
struct SendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    touser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toparty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    totag: Option<String>,
    msgtype: &'static str,
    agentid: i64,
    #[serde(flatten)]
    message: Message,
    #[serde(skip_serializing_if = "is_false", serialize_with = "as_flag")]
    safe: bool,
    #[serde(skip_serializing_if = "is_false", serialize_with = "as_flag")]
    enable_id_trans: bool,
    #[serde(skip_serializing_if = "is_false", serialize_with = "as_flag")]
    enable_duplicate_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate_check_interval: Option<u32>,
}

fn as_flag<S: serde::Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Recipients WeCom could not deliver to, `|`-separated
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageSent {
    pub invaliduser: String,
    pub invalidparty: String,
    pub invalidtag: String,
    pub unlicenseduser: String,
    pub msgid: String,
    /// Only for template cards with buttons; used to update the card
    pub response_code: String,
}

#[derive(Debug, Clone, Serialize)]
struct RecallRequest {
    msgid: String,
}

pub fn send(agentid: i64, to: Recipients, message: Message) -> Action<MessageSent> {
    send_with(agentid, to, message, SendOptions::default())
}

pub fn send_with(
    agentid: i64,
    to: Recipients,
    message: Message,
    options: SendOptions,
) -> Action<MessageSent> {
    Action::post("/cgi-bin/message/send").json(SendRequest {
        touser: join(&to.users),
        toparty: join(&to.parties),
        totag: join(&to.tags),
        msgtype: message.msgtype(),
        agentid,
        message,
        safe: options.safe,
        enable_id_trans: options.enable_id_trans,
        enable_duplicate_check: options.enable_duplicate_check,
        duplicate_check_interval: options.duplicate_check_interval,
    })
}

/// Recall a message sent within the last 24 hours.
pub fn recall(msgid: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/message/recall").json(RecallRequest {
        msgid: msgid.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_send_text_to_users_and_party() {
        let to = Recipients::users(["UserID1", "UserID2"]).party("PartyID1").tag("TagID1");
        let action = send_with(
            1000002,
            to,
            Message::text("你的快递已到"),
            SendOptions {
                safe: true,
                ..SendOptions::default()
            },
        );
        assert_eq!(action.path(), "/cgi-bin/message/send");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({
                "touser": "UserID1|UserID2",
                "toparty": "PartyID1",
                "totag": "TagID1",
                "msgtype": "text",
                "agentid": 1000002,
                "text": {"content": "你的快递已到"},
                "safe": 1
            })
        );
    }

    #[test]
    fn test_send_textcard_to_all() {
        let card = Message::TextCard {
            title: "领奖通知".into(),
            description: "<div class=\"gray\">2016年9月26日</div>".into(),
            url: "URL".into(),
            btntxt: Some("更多".into()),
        };
        let body = send(1, Recipients::all(), card).body_json().unwrap().unwrap();
        assert_eq!(body["touser"], "@all");
        assert_eq!(body["msgtype"], "textcard");
        assert_eq!(body["textcard"]["btntxt"], "更多");
        assert!(body.get("toparty").is_none());
        assert!(body.get("safe").is_none());
    }

    #[test]
    fn test_send_miniprogram_notice_and_template_card() {
        let notice = Message::MiniProgramNotice {
            appid: "wx123123123123123".into(),
            page: Some("pages/index?userid=zhangsan&orderid=123123123".into()),
            title: "会议室预订成功通知".into(),
            description: Some("4月27日 16:16".into()),
            emphasis_first_item: Some(true),
            content_item: vec![ContentItem {
                key: "会议室".into(),
                value: "402".into(),
            }],
        };
        let body = send(1, Recipients::users(["zhangsan"]), notice)
            .body_json()
            .unwrap()
            .unwrap();
        assert_eq!(body["msgtype"], "miniprogram_notice");
        assert_eq!(body["miniprogram_notice"]["content_item"][0]["value"], "402");

        let card = json!({"card_type": "text_notice", "main_title": {"title": "欢迎使用企业微信"}});
        let body = send(1, Recipients::all(), Message::TemplateCard(card.clone()))
            .body_json()
            .unwrap()
            .unwrap();
        assert_eq!(body["template_card"], card);
    }

    #[test]
    fn test_sent_decode_and_recall() {
        let sent = send(1, Recipients::all(), Message::markdown("**hi**"))
            .decode(RawResponse::json(
                r#"{"errcode":0,"errmsg":"ok","invaliduser":"userid1|userid2","invalidparty":"","invalidtag":"","unlicenseduser":"","msgid":"xx","response_code":"xyzxyz"}"#,
            ))
            .unwrap();
        assert_eq!(sent.invaliduser, "userid1|userid2");
        assert_eq!(sent.msgid, "xx");
        assert_eq!(
            recall("xx").body_json().unwrap().unwrap(),
            json!({"msgid": "xx"})
        );
    }
}
