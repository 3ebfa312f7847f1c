//! Login sessions

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::WechatError;
use crate::wx::{Action, ApiResponseBase};

type HmacSha256 = Hmac<Sha256>;

/// Result of `code2Session`
#[non_exhaustive]
#[derive(Clone, Deserialize)]
pub struct Session {
    pub openid: String,
    pub session_key: String,
    #[serde(default)]
    pub unionid: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("openid", &self.openid)
            .field("session_key", &"********")
            .field("unionid", &self.unionid)
            .finish()
    }
}

/// `hex(HMAC-SHA256(session_key, ""))`, proving possession of the session key.
pub fn session_signature(session_key: &str) -> Result<String, WechatError> {
    let mut mac = HmacSha256::new_from_slice(session_key.as_bytes())
        .map_err(|e| WechatError::Crypto(format!("Invalid session_key: {e}")))?;
    mac.update(b"");
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Exchange a `wx.login()` code. Authenticates with the app secret.
pub fn code_to_session(appid: &str, secret: &str, js_code: &str) -> Action<Session> {
    Action::get("/sns/jscode2session")
        .query("appid", appid)
        .query("secret", secret)
        .query("js_code", js_code)
        .query("grant_type", "authorization_code")
        .without_token()
}

/// Whether the session key held by the server is still valid.
pub fn check_session(openid: &str, session_key: &str) -> Result<Action<ApiResponseBase>, WechatError> {
    Ok(Action::get("/wxa/checksession")
        .query("openid", openid)
        .query("signature", session_signature(session_key)?)
        .query("sig_method", "hmac_sha256"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetSession {
    pub openid: String,
    pub session_key: String,
}

/// Issue a new session key, invalidating the old one.
pub fn reset_session_key(
    openid: &str,
    session_key: &str,
) -> Result<Action<ResetSession>, WechatError> {
    Ok(Action::get("/wxa/resetusersessionkey")
        .query("openid", openid)
        .query("signature", session_signature(session_key)?)
        .query("sig_method", "hmac_sha256"))
}
