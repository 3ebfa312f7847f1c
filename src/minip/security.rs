//! Content security checks

use serde::{Deserialize, Serialize};

use crate::wx::Action;

/// Where the checked text appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Profile = 1,
    Comment = 2,
    Forum = 3,
    SocialLog = 4,
}

#[derive(Debug, Clone, Serialize)]
struct MsgSecCheckRequest {
    version: u8,
    openid: String,
    scene: u8,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

/// `pass`, `review` or `risky`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    #[serde(default)]
    pub suggest: String,
    #[serde(default)]
    pub label: i32,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        self.suggest == "pass"
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckDetail {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub suggest: String,
    #[serde(default)]
    pub label: i32,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub prob: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgSecCheck {
    #[serde(default)]
    pub trace_id: String,
    #[serde(default)]
    pub result: Verdict,
    #[serde(default)]
    pub detail: Vec<CheckDetail>,
}

/// Check user text. `openid` must have opened the Mini Program in the last two hours.
pub fn msg_sec_check(
    openid: impl Into<String>,
    scene: Scene,
    content: impl Into<String>,
) -> Action<MsgSecCheck> {
    Action::post("/wxa/msg_sec_check").json(MsgSecCheckRequest {
        version: 2,
        openid: openid.into(),
        scene: scene as u8,
        content: content.into(),
        title: None,
        nickname: None,
        signature: None,
    })
}
