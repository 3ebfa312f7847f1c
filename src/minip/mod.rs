//! Mini Program (小程序) APIs
//!
//! Besides the endpoint modules, [`Minip`] offers shortcuts for the login
//! flow: [`Minip::code_to_session`] and [`Minip::decrypt_user_data`].

pub mod auth;
pub mod crypto;
pub mod qrcode;
pub mod security;
pub mod subscribe;
pub mod user;

use std::sync::Arc;

use crate::client::{WechatClient, WechatContext};
use crate::error::WechatError;
use crate::token::TokenGrant;
use crate::types::{AppId, AppSecret};
use crate::wx::Action;

use self::auth::Session;
use self::crypto::DecryptedUserData;

/// Mini Program client
#[derive(Debug, Clone)]
pub struct Minip {
    context: Arc<WechatContext>,
    appid: AppId,
}

impl Minip {
    pub fn builder() -> MinipBuilder {
        MinipBuilder::default()
    }

    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    pub fn context(&self) -> &WechatContext {
        &self.context
    }

    pub async fn execute<T>(&self, action: Action<T>) -> Result<T, WechatError> {
        self.context.execute(action).await
    }

    pub async fn access_token(&self) -> Result<String, WechatError> {
        self.context.token_manager.get_token().await
    }

    pub async fn invalidate_token(&self) {
        self.context.token_manager.invalidate().await;
    }

    /// Exchange a `wx.login()` code for the user's openid and session key.
    pub async fn code_to_session(&self, js_code: &str) -> Result<Session, WechatError> {
        let secret = self.context.token_manager.grant().secret();
        self.execute(auth::code_to_session(self.appid.as_str(), secret, js_code))
            .await
    }

    /// Decrypt `wx.getUserInfo`-style payloads and check they were issued for this app.
    pub fn decrypt_user_data(
        &self,
        session_key: &str,
        encrypted_data: &str,
        iv: &str,
    ) -> Result<DecryptedUserData, WechatError> {
        let data = crypto::decrypt_user_data(session_key, encrypted_data, iv)?;
        crypto::verify_watermark(&data, self.appid.as_str())?;
        Ok(data)
    }
}

/// Builder for [`Minip`]
#[must_use]
#[derive(Debug, Default)]
pub struct MinipBuilder {
    appid: Option<AppId>,
    secret: Option<AppSecret>,
    stable_token: bool,
    client: Option<WechatClient>,
}

impl MinipBuilder {
    pub fn appid(mut self, appid: AppId) -> Self {
        self.appid = Some(appid);
        self
    }

    pub fn secret(mut self, secret: AppSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Fetch tokens from `/cgi-bin/stable_token` instead of `/cgi-bin/token`.
    pub fn stable_token(mut self, enabled: bool) -> Self {
        self.stable_token = enabled;
        self
    }

    pub fn client(mut self, client: WechatClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Minip, WechatError> {
        let appid = self
            .appid
            .ok_or_else(|| WechatError::Config("appid is required".to_string()))?;
        let secret = self
            .secret
            .ok_or_else(|| WechatError::Config("secret is required".to_string()))?;

        let client = match self.client {
            Some(client) => client,
            None => WechatClient::builder().build()?,
        };

        let grant = if self.stable_token {
            TokenGrant::StableToken {
                appid: appid.clone(),
                secret,
                force_refresh: false,
            }
        } else {
            TokenGrant::ClientCredential {
                appid: appid.clone(),
                secret,
            }
        };

        Ok(Minip {
            context: Arc::new(WechatContext::from_grant(client, grant)),
            appid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_appid() {
        let result = Minip::builder()
            .secret(AppSecret::new("secret1234567890ab").unwrap())
            .build();
        assert!(matches!(result, Err(WechatError::Config(_))));
    }

    #[test]
    fn test_builder_default_values() {
        let minip = Minip::builder()
            .appid(AppId::new("wx1234567890abcdef").unwrap())
            .secret(AppSecret::new("secret1234567890ab").unwrap())
            .build()
            .unwrap();
        assert_eq!(minip.appid(), "wx1234567890abcdef");
        assert_eq!(
            minip.context().client().base_url(),
            crate::client::DEFAULT_BASE_URL
        );
    }
}
