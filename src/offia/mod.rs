//! Official Account (公众号) APIs
//!
//! Every endpoint module only builds [`Action`]s; [`Offia::execute`] runs them
//! with the account's access token.
//!
//! ```rust,no_run
//! use wechat_sdk::offia::{self, Offia};
//! use wechat_sdk::types::{AppId, AppSecret, Button, Menu};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let offia = Offia::builder()
//!     .appid(AppId::new("wx1234567890abcdef")?)
//!     .secret(AppSecret::new("your_secret")?)
//!     .build()?;
//!
//! let menu = Menu::new(vec![Button::click("Today", "V1001_TODAY")]);
//! offia.execute(offia::menu::create(menu)).await?;
//! # Ok(())
//! # }
//! ```

pub mod basic;
pub mod custom;
pub mod jssdk;
pub mod media;
pub mod menu;
pub mod oauth;
pub mod qrcode;
pub mod tag;
pub mod template;
pub mod user;

use std::sync::Arc;

use crate::client::{WechatClient, WechatContext};
use crate::error::WechatError;
use crate::token::TokenGrant;
use crate::types::{AppId, AppSecret};
use crate::wx::Action;

/// Official Account client
#[derive(Debug, Clone)]
pub struct Offia {
    context: Arc<WechatContext>,
    appid: AppId,
}

impl Offia {
    pub fn builder() -> OffiaBuilder {
        OffiaBuilder::default()
    }

    pub fn appid(&self) -> &str {
        self.appid.as_str()
    }

    pub fn context(&self) -> &WechatContext {
        &self.context
    }

    /// Run an endpoint action with the managed access token.
    pub async fn execute<T>(&self, action: Action<T>) -> Result<T, WechatError> {
        self.context.execute(action).await
    }

    pub async fn access_token(&self) -> Result<String, WechatError> {
        self.context.token_manager.get_token().await
    }

    pub async fn invalidate_token(&self) {
        self.context.token_manager.invalidate().await;
    }
}

/// Builder for [`Offia`]
#[must_use]
#[derive(Debug, Default)]
pub struct OffiaBuilder {
    appid: Option<AppId>,
    secret: Option<AppSecret>,
    stable_token: bool,
    client: Option<WechatClient>,
}

impl OffiaBuilder {
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

    /// Use a preconfigured transport (base URL, timeouts, middleware).
    pub fn client(mut self, client: WechatClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Offia, WechatError> {
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

        Ok(Offia {
            context: Arc::new(WechatContext::from_grant(client, grant)),
            appid,
        })
    }
}
