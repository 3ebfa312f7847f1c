//! Parametric QR codes

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::wx::Action;

const SHOW_QRCODE_URL: &str = "https://mp.weixin.qq.com/cgi-bin/showqrcode";

/// Scene value carried back in the scan event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    /// Temporary codes accept any 32-bit id, permanent ones 1..=100000
    Id(u32),
    /// 1 to 64 characters
    Str(String),
}

#[derive(Debug, Clone, Serialize)]
struct SceneBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene_str: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ActionInfo {
    scene: SceneBody,
}

#[derive(Debug, Clone, Serialize)]
struct CreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_seconds: Option<u32>,
    action_name: &'static str,
    action_info: ActionInfo,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct QrcodeTicket {
    pub ticket: String,
    /// Absent for permanent codes
    #[serde(default)]
    pub expire_seconds: Option<u32>,
    /// Content encoded in the QR image
    pub url: String,
}

/// Create a QR code ticket. `expire_seconds` of `None` makes a permanent code.
pub fn create(scene: Scene, expire_seconds: Option<u32>) -> Action<QrcodeTicket> {
    let action_name = match (&scene, expire_seconds.is_some()) {
        (Scene::Id(_), true) => "QR_SCENE",
        (Scene::Str(_), true) => "QR_STR_SCENE",
        (Scene::Id(_), false) => "QR_LIMIT_SCENE",
        (Scene::Str(_), false) => "QR_LIMIT_STR_SCENE",
    };
    let scene = match scene {
        Scene::Id(id) => SceneBody {
            scene_id: Some(id),
            scene_str: None,
        },
        Scene::Str(s) => SceneBody {
            scene_id: None,
            scene_str: Some(s),
        },
    };

    Action::post("/cgi-bin/qrcode/create").json(CreateRequest {
        expire_seconds,
        action_name,
        action_info: ActionInfo { scene },
    })
}

/// URL of the QR image for a ticket. Needs no access token.
pub fn show_url(ticket: &str) -> String {
    format!(
        "{SHOW_QRCODE_URL}?ticket={}",
        utf8_percent_encode(ticket, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_temporary_scene_id() {
        let action = create(Scene::Id(123), Some(604800));
        assert_eq!(action.path(), "/cgi-bin/qrcode/create");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({
                "expire_seconds": 604800,
                "action_name": "QR_SCENE",
                "action_info": {"scene": {"scene_id": 123}}
            })
        );
    }

    #[test]
    fn test_permanent_scene_str() {
        assert_eq!(
            create(Scene::Str("test".into()), None)
                .body_json()
                .unwrap()
                .unwrap(),
            json!({
                "action_name": "QR_LIMIT_STR_SCENE",
                "action_info": {"scene": {"scene_str": "test"}}
            })
        );
        let body = create(Scene::Str("s".into()), Some(60)).body_json().unwrap().unwrap();
        assert_eq!(body["action_name"], "QR_STR_SCENE");
        let body = create(Scene::Id(1), None).body_json().unwrap().unwrap();
        assert_eq!(body["action_name"], "QR_LIMIT_SCENE");
    }

    #[test]
    fn test_ticket_decode_and_show_url() {
        let ticket = create(Scene::Id(1), Some(60))
            .decode(RawResponse::json(
                r#"{"ticket":"gQH47joAAAAAAAAAASxodHRwOi8vd2VpeGluLnFxLmNvbS9xL2taZ2Z3TVRtNzJXV1Brb3ZhYmJJAAIEZ23sUwMEmm3sUw==","expire_seconds":60,"url":"http://weixin.qq.com/q/kZgfwMTm72WWPkovabbI"}"#,
            ))
            .unwrap();
        assert_eq!(ticket.expire_seconds, Some(60));
        assert_eq!(
            show_url("ab+c/d=="),
            "https://mp.weixin.qq.com/cgi-bin/showqrcode?ticket=ab%2Bc%2Fd%3D%3D"
        );
    }
}
