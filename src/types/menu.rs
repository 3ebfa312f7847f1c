//! Custom menu shapes shared by the Official Account and WeCom agent menus.

use serde::{Deserialize, Serialize};

/// A custom menu: up to three top-level buttons
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub button: Vec<Button>,
    /// Set only on conditional menus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchrule: Option<MatchRule>,
    /// Assigned by WeChat to conditional menus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menuid: Option<i64>,
}

impl Menu {
    pub fn new(button: Vec<Button>) -> Self {
        Self {
            button,
            ..Self::default()
        }
    }

    pub fn with_match_rule(mut self, rule: MatchRule) -> Self {
        self.matchrule = Some(rule);
        self
    }
}

/// A menu button. Leaf buttons carry a `type`; parents carry `sub_button`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub button_type: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagepath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_button: Vec<Button>,
}

impl Button {
    fn leaf(button_type: &str, name: impl Into<String>) -> Self {
        Self {
            button_type: Some(button_type.to_string()),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn click(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::leaf("click", name)
        }
    }

    pub fn view(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::leaf("view", name)
        }
    }

    /// Key-bearing event buttons: `scancode_push`, `scancode_waitmsg`,
    /// `pic_sysphoto`, `pic_photo_or_album`, `pic_weixin`, `location_select`.
    pub fn event(
        button_type: impl AsRef<str>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::leaf(button_type.as_ref(), name)
        }
    }

    pub fn miniprogram(
        name: impl Into<String>,
        url: impl Into<String>,
        appid: impl Into<String>,
        pagepath: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            appid: Some(appid.into()),
            pagepath: Some(pagepath.into()),
            ..Self::leaf("miniprogram", name)
        }
    }

    pub fn media(name: impl Into<String>, media_id: impl Into<String>) -> Self {
        Self {
            media_id: Some(media_id.into()),
            ..Self::leaf("media_id", name)
        }
    }

    pub fn parent(name: impl Into<String>, sub_button: Vec<Button>) -> Self {
        Self {
            name: name.into(),
            sub_button,
            ..Self::default()
        }
    }
}

/// Audience filter of a conditional menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_platform_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_serialize_nested() {
        let menu = Menu::new(vec![
            Button::click("Today", "V1001_TODAY_MUSIC"),
            Button::parent(
                "More",
                vec![
                    Button::view("Search", "https://www.soso.com/"),
                    Button::event("scancode_push", "Scan", "rselfmenu_0_1"),
                ],
            ),
        ]);

        let json = serde_json::to_value(&menu).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "button": [
                    {"type": "click", "name": "Today", "key": "V1001_TODAY_MUSIC"},
                    {
                        "name": "More",
                        "sub_button": [
                            {"type": "view", "name": "Search", "url": "https://www.soso.com/"},
                            {"type": "scancode_push", "name": "Scan", "key": "rselfmenu_0_1"}
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_conditional_menu_serialize() {
        let menu = Menu::new(vec![Button::click("VIP", "vip")]).with_match_rule(MatchRule {
            tag_id: Some("2".into()),
            client_platform_type: None,
        });
        let json = serde_json::to_value(&menu).unwrap();
        assert_eq!(json["matchrule"]["tag_id"], "2");
        assert!(json.get("menuid").is_none());
    }
}
