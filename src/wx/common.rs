//! Common API response primitives
//!
//! Most WeChat APIs return JSON responses with common `errcode` / `errmsg` fields.
//! The dispatch path checks the envelope before decoding, so result structs do
//! not need to carry these fields. Endpoints that return nothing beyond the
//! envelope decode into [`ApiResponseBase`].
//!
//! ```rust
//! use wechat_sdk::wx::common::{ApiResponseBase, WechatApiResponse};
//!
//! let json = r#"{"errcode": 0, "errmsg": "ok"}"#;
//! let resp: ApiResponseBase = serde_json::from_str(json).unwrap();
//! assert!(resp.check().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WechatError;

/// Trait for WeChat API responses that carry `errcode` / `errmsg`.
pub trait WechatApiResponse {
    /// `0` indicates success; any other value is an error.
    fn errcode(&self) -> i32;

    fn errmsg(&self) -> &str;

    /// Returns `WechatError::Api` unless `errcode == 0`.
    fn check(&self) -> Result<(), WechatError> {
        WechatError::check_api(self.errcode(), self.errmsg())
    }

    fn is_success(&self) -> bool {
        self.errcode() == 0
    }
}

/// Minimal API response carrying only `errcode` and `errmsg`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiResponseBase {
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

impl ApiResponseBase {
    pub fn success() -> Self {
        Self {
            errcode: 0,
            errmsg: "ok".to_string(),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            errcode: code,
            errmsg: message.into(),
        }
    }
}

impl WechatApiResponse for ApiResponseBase {
    fn errcode(&self) -> i32 {
        self.errcode
    }

    fn errmsg(&self) -> &str {
        &self.errmsg
    }
}

/// Language of localized user fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[serde(rename = "zh_CN")]
    ZhCN,
    #[serde(rename = "zh_TW")]
    ZhTW,
    #[serde(rename = "en")]
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::ZhCN => "zh_CN",
            Lang::ZhTW => "zh_TW",
            Lang::En => "en",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media kinds accepted by the upload endpoints of every platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Voice,
    Video,
    Thumb,
    /// WeCom only
    File,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Voice => "voice",
            MediaType::Video => "video",
            MediaType::Thumb => "thumb",
            MediaType::File => "file",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
