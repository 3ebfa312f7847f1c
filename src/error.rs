use std::sync::Arc;

use thiserror::Error;

/// Transport-level failures
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Reqwest(Arc<reqwest::Error>),

    #[error("response decode error: {0}")]
    Decode(String),
}

/// WeChat SDK error types
#[derive(Debug, Error)]
pub enum WechatError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("WeChat API error (code={code}): {message}")]
    Api { code: i32, message: String },

    #[error("Access token error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signature verification failed: {0}")]
    Signature(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<reqwest::Error> for WechatError {
    fn from(e: reqwest::Error) -> Self {
        WechatError::Http(HttpError::Reqwest(Arc::new(e)))
    }
}

impl From<quick_xml::DeError> for WechatError {
    fn from(e: quick_xml::DeError) -> Self {
        WechatError::Xml(e.to_string())
    }
}

impl WechatError {
    /// Turn a WeChat `errcode`/`errmsg` pair into a result.
    pub fn check_api(code: i32, message: &str) -> Result<(), WechatError> {
        if code == 0 {
            return Ok(());
        }
        Err(WechatError::Api {
            code,
            message: message.to_string(),
        })
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Transport failures, `-1` (system busy) and `45009` (rate limited) are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            WechatError::Http(HttpError::Reqwest(_)) => true,
            WechatError::Api { code, .. } => matches!(code, -1 | 45009),
            _ => false,
        }
    }

    /// Whether the error means the access token used for the call is no longer valid.
    pub fn is_token_expired(&self) -> bool {
        matches!(
            self,
            WechatError::Api {
                code: 40001 | 40014 | 42001,
                ..
            }
        )
    }
}
