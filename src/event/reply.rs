//! Passive replies to callback messages
//!
//! A reply is the XML body returned from the callback handler. Every string
//! is wrapped in CDATA; `CreateTime` and `ArticleCount` are bare numbers.

use crate::error::WechatError;

use super::xml::XmlBuilder;

/// Largest `ArticleCount` WeChat accepts in a news reply
pub const MAX_NEWS_ARTICLES: usize = 8;

/// One item of a news reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub pic_url: String,
    pub url: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn pic_url(mut self, pic_url: impl Into<String>) -> Self {
        self.pic_url = pic_url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
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
        title: Option<String>,
        description: Option<String>,
    },
    Music {
        title: Option<String>,
        description: Option<String>,
        music_url: Option<String>,
        hq_music_url: Option<String>,
        thumb_media_id: String,
    },
    /// Rendered with at most [`MAX_NEWS_ARTICLES`] items; extra articles are dropped.
    /// WeChat shows only the first since 2018
    News(Vec<Article>),
    /// Hand the conversation to customer service, optionally a specific account
    TransferCustomerService {
        kf_account: Option<String>,
    },
    /// WeCom: relabel the pressed template card button
    UpdateButton {
        replace_name: String,
    },
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text {
            content: content.into(),
        }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        Reply::Image {
            media_id: media_id.into(),
        }
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            Reply::Text { .. } => "text",
            Reply::Image { .. } => "image",
            Reply::Voice { .. } => "voice",
            Reply::Video { .. } => "video",
            Reply::Music { .. } => "music",
            Reply::News(_) => "news",
            Reply::TransferCustomerService { .. } => "transfer_customer_service",
            Reply::UpdateButton { .. } => "update_button",
        }
    }

    /// Render the reply addressed to `to` (the sender of the inbound message)
    /// from `from` (the account that received it).
    pub fn to_xml(&self, to: &str, from: &str, create_time: i64) -> Result<String, WechatError> {
        let mut xml = XmlBuilder::new()?;
        xml.cdata("ToUserName", to)?;
        xml.cdata("FromUserName", from)?;
        xml.text("CreateTime", create_time)?;
        xml.cdata("MsgType", self.msg_type())?;

        match self {
            Reply::Text { content } => xml.cdata("Content", content)?,
            Reply::Image { media_id } => {
                xml.start("Image")?;
                xml.cdata("MediaId", media_id)?;
                xml.end("Image")?;
            }
            Reply::Voice { media_id } => {
                xml.start("Voice")?;
                xml.cdata("MediaId", media_id)?;
                xml.end("Voice")?;
            }
            Reply::Video {
                media_id,
                title,
                description,
            } => {
                xml.start("Video")?;
                xml.cdata("MediaId", media_id)?;
                if let Some(title) = title {
                    xml.cdata("Title", title)?;
                }
                if let Some(description) = description {
                    xml.cdata("Description", description)?;
                }
                xml.end("Video")?;
            }
            Reply::Music {
                title,
                description,
                music_url,
                hq_music_url,
                thumb_media_id,
            } => {
                xml.start("Music")?;
                for (name, value) in [
                    ("Title", title),
                    ("Description", description),
                    ("MusicUrl", music_url),
                    ("HQMusicUrl", hq_music_url),
                ] {
                    if let Some(value) = value {
                        xml.cdata(name, value)?;
                    }
                }
                xml.cdata("ThumbMediaId", thumb_media_id)?;
                xml.end("Music")?;
            }
            Reply::News(articles) => {
                let articles = &articles[..articles.len().min(MAX_NEWS_ARTICLES)];
                xml.text("ArticleCount", articles.len())?;
                xml.start("Articles")?;
                for article in articles {
                    xml.start("item")?;
                    xml.cdata("Title", &article.title)?;
                    xml.cdata("Description", &article.description)?;
                    xml.cdata("PicUrl", &article.pic_url)?;
                    xml.cdata("Url", &article.url)?;
                    xml.end("item")?;
                }
                xml.end("Articles")?;
            }
            Reply::TransferCustomerService { kf_account } => {
                if let Some(account) = kf_account {
                    xml.start("TransInfo")?;
                    xml.cdata("KfAccount", account)?;
                    xml.end("TransInfo")?;
                }
            }
            Reply::UpdateButton { replace_name } => {
                xml.start("Button")?;
                xml.cdata("ReplaceName", replace_name)?;
                xml.end("Button")?;
            }
        }

        xml.finish()
    }
}
