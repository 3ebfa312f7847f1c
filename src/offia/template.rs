//! Template messages

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

/// Value of one template keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValue {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TemplateValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Mini Program page opened when the message is tapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateMiniProgram {
    pub appid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagepath: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateMessage {
    pub touser: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniprogram: Option<TemplateMiniProgram>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_msg_id: Option<String>,
    pub data: BTreeMap<String, TemplateValue>,
}

impl TemplateMessage {
    pub fn new(touser: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            touser: touser.into(),
            template_id: template_id.into(),
            url: None,
            miniprogram: None,
            client_msg_id: None,
            data: BTreeMap::new(),
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn miniprogram(mut self, appid: impl Into<String>, pagepath: Option<String>) -> Self {
        self.miniprogram = Some(TemplateMiniProgram {
            appid: appid.into(),
            pagepath,
        });
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: TemplateValue) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSent {
    pub msgid: i64,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrivateTemplate {
    pub template_id: String,
    pub title: String,
    pub primary_industry: String,
    pub deputy_industry: String,
    pub content: String,
    pub example: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateList {
    #[serde(default)]
    pub template_list: Vec<PrivateTemplate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateAdded {
    pub template_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndustryClass {
    pub first_class: String,
    pub second_class: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Industry {
    #[serde(default)]
    pub primary_industry: IndustryClass,
    #[serde(default)]
    pub secondary_industry: IndustryClass,
}

#[derive(Debug, Clone, Serialize)]
struct TemplateIdRequest {
    template_id: String,
}

#[derive(Debug, Clone, Serialize)]
struct AddTemplateRequest {
    template_id_short: String,
    keyword_name_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct SetIndustryRequest {
    industry_id1: String,
    industry_id2: String,
}

pub fn send(message: TemplateMessage) -> Action<MessageSent> {
    Action::post("/cgi-bin/message/template/send").json(message)
}

pub fn list() -> Action<TemplateList> {
    Action::get("/cgi-bin/template/get_all_private_template")
}

pub fn delete(template_id: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/template/del_private_template").json(TemplateIdRequest {
        template_id: template_id.into(),
    })
}

/// Add a template from the library by its short id (e.g. `TM00015`).
pub fn add(
    template_id_short: impl Into<String>,
    keyword_name_list: Vec<String>,
) -> Action<TemplateAdded> {
    Action::post("/cgi-bin/template/api_add_template").json(AddTemplateRequest {
        template_id_short: template_id_short.into(),
        keyword_name_list,
    })
}

pub fn set_industry(
    industry_id1: impl Into<String>,
    industry_id2: impl Into<String>,
) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/template/api_set_industry").json(SetIndustryRequest {
        industry_id1: industry_id1.into(),
        industry_id2: industry_id2.into(),
    })
}

pub fn get_industry() -> Action<Industry> {
    Action::get("/cgi-bin/template/get_industry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_send_body() {
        let message = TemplateMessage::new("OPENID", "ngqIpbwh8bUfcSsECmogfXcV14J0tQlEpBO27izEYtY")
            .url("http://weixin.qq.com/download")
            .miniprogram("xiaochengxuappid12345", Some("index?foo=bar".into()))
            .data("keyword1", TemplateValue::new("巧克力"))
            .data("keyword2", TemplateValue::new("39.8元").with_color("#173177"));

        let action = send(message);
        assert_eq!(action.path(), "/cgi-bin/message/template/send");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({
                "touser": "OPENID",
                "template_id": "ngqIpbwh8bUfcSsECmogfXcV14J0tQlEpBO27izEYtY",
                "url": "http://weixin.qq.com/download",
                "miniprogram": {"appid": "xiaochengxuappid12345", "pagepath": "index?foo=bar"},
                "data": {
                    "keyword1": {"value": "巧克力"},
                    "keyword2": {"value": "39.8元", "color": "#173177"}
                }
            })
        );
        let sent = action
            .decode(RawResponse::json(r#"{"errcode":0,"errmsg":"ok","msgid":200228332}"#))
            .unwrap();
        assert_eq!(sent.msgid, 200228332);
    }

    #[test]
    fn test_template_management() {
        let templates = list()
            .decode(RawResponse::json(
                r#"{"template_list":[{"template_id":"iPk5sOIt5X_flOVKn5GrTFpncEYTojx6ddbt8WYoV5s","title":"领取奖金提醒","primary_industry":"IT科技","deputy_industry":"互联网|电子商务","content":"{ {result.DATA} }","example":""}]}"#,
            ))
            .unwrap();
        assert_eq!(templates.template_list[0].title, "领取奖金提醒");

        assert_eq!(
            add("TM00015", vec!["金额".into()]).body_json().unwrap().unwrap(),
            json!({"template_id_short": "TM00015", "keyword_name_list": ["金额"]})
        );
        assert_eq!(
            delete("Dyvp3-Ff0cnail").body_json().unwrap().unwrap(),
            json!({"template_id": "Dyvp3-Ff0cnail"})
        );
    }

    #[test]
    fn test_industry() {
        assert_eq!(
            set_industry("1", "4").body_json().unwrap().unwrap(),
            json!({"industry_id1": "1", "industry_id2": "4"})
        );
        let industry = get_industry()
            .decode(RawResponse::json(
                r#"{"primary_industry":{"first_class":"运输与仓储","second_class":"快递"},"secondary_industry":{"first_class":"IT科技","second_class":"互联网|电子商务"}}"#,
            ))
            .unwrap();
        assert_eq!(industry.primary_industry.second_class, "快递");
    }
}
