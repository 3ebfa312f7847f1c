//! Subscription messages

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataValue {
    pub value: String,
}

/// Which build of the Mini Program the message jumps into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MiniProgramState {
    Developer,
    Trial,
    Formal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageLang {
    #[serde(rename = "zh_CN")]
    ZhCn,
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "zh_HK")]
    ZhHk,
    #[serde(rename = "zh_TW")]
    ZhTw,
}

/// A subscription message, built field by field
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeMessage {
    touser: String,
    template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<String>,
    data: BTreeMap<String, DataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    miniprogram_state: Option<MiniProgramState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<MessageLang>,
}

impl SubscribeMessage {
    pub fn new(touser: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            touser: touser.into(),
            template_id: template_id.into(),
            page: None,
            data: BTreeMap::new(),
            miniprogram_state: None,
            lang: None,
        }
    }

    /// Fill template keyword `key`, e.g. `thing1` or `time2`.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), DataValue { value: value.into() });
        self
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn state(mut self, state: MiniProgramState) -> Self {
        self.miniprogram_state = Some(state);
        self
    }

    pub fn lang(mut self, lang: MessageLang) -> Self {
        self.lang = Some(lang);
        self
    }
}

pub fn send(message: SubscribeMessage) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/message/subscribe/send").json(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_body() {
        let message = SubscribeMessage::new("oUser", "tmpl")
            .data("thing1", "Order shipped")
            .data("time2", "2024-01-01 10:00")
            .page("pages/order?id=1")
            .state(MiniProgramState::Trial)
            .lang(MessageLang::ZhCn);
        let action = send(message);

        assert_eq!(action.path(), "/cgi-bin/message/subscribe/send");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({
                "touser": "oUser",
                "template_id": "tmpl",
                "page": "pages/order?id=1",
                "data": {
                    "thing1": {"value": "Order shipped"},
                    "time2": {"value": "2024-01-01 10:00"}
                },
                "miniprogram_state": "trial",
                "lang": "zh_CN"
            })
        );
    }
}
