//! Access token management for WeChat API
//!
//! Handles token caching, automatic refresh, and concurrency safety. The way a
//! token is obtained depends on the platform, see [`TokenGrant`].

use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::client::WechatClient;
use crate::error::{HttpError, WechatError};
use crate::types::{AccessToken, AppId, AppSecret, CorpId};
use crate::wx::Action;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 100;
const DEFAULT_REFRESH_BUFFER: Duration = Duration::from_secs(5 * 60);

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self, buffer: Duration) -> bool {
        Instant::now() + buffer >= self.expires_at
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Serialize)]
struct StableTokenRequest {
    grant_type: &'static str,
    appid: String,
    secret: String,
    force_refresh: bool,
}

/// How an access token is obtained
#[derive(Debug, Clone)]
pub enum TokenGrant {
    /// `GET /cgi-bin/token` (Official Account, Mini Program)
    ClientCredential { appid: AppId, secret: AppSecret },
    /// `POST /cgi-bin/stable_token` (Official Account, Mini Program)
    StableToken {
        appid: AppId,
        secret: AppSecret,
        force_refresh: bool,
    },
    /// `GET /cgi-bin/gettoken` (WeCom)
    Corp { corpid: CorpId, corpsecret: AppSecret },
}

impl TokenGrant {
    /// The appid or corpid the grant belongs to
    pub fn id(&self) -> &str {
        match self {
            TokenGrant::ClientCredential { appid, .. } | TokenGrant::StableToken { appid, .. } => {
                appid.as_str()
            }
            TokenGrant::Corp { corpid, .. } => corpid.as_str(),
        }
    }

    pub(crate) fn secret(&self) -> &str {
        match self {
            TokenGrant::ClientCredential { secret, .. } | TokenGrant::StableToken { secret, .. } => {
                secret.as_str()
            }
            TokenGrant::Corp { corpsecret, .. } => corpsecret.as_str(),
        }
    }

    /// The token request for this grant
    pub fn action(&self) -> Action<AccessTokenResponse> {
        match self {
            TokenGrant::ClientCredential { appid, secret } => {
                Action::get("/cgi-bin/token")
                    .query("grant_type", "client_credential")
                    .query("appid", appid.as_str())
                    .query("secret", secret.as_str())
                    .without_token()
            }
            TokenGrant::StableToken {
                appid,
                secret,
                force_refresh,
            } => Action::post("/cgi-bin/stable_token")
                .json(StableTokenRequest {
                    grant_type: "client_credential",
                    appid: appid.as_str().to_string(),
                    secret: secret.as_str().to_string(),
                    force_refresh: *force_refresh,
                })
                .without_token(),
            TokenGrant::Corp { corpid, corpsecret } => Action::get("/cgi-bin/gettoken")
                .query("corpid", corpid.as_str())
                .query("corpsecret", corpsecret.as_str())
                .without_token(),
        }
    }
}

/// Manages access_token lifecycle with automatic refresh
pub struct TokenManager {
    client: WechatClient,
    grant: TokenGrant,
    cache: Mutex<Option<CachedToken>>,
    refresh_buffer: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("grant", &self.grant)
            .field("refresh_buffer", &self.refresh_buffer)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(client: WechatClient, grant: TokenGrant) -> Self {
        Self {
            client,
            grant,
            cache: Mutex::new(None),
            refresh_buffer: DEFAULT_REFRESH_BUFFER,
        }
    }

    /// Refresh this long before the token actually expires. Default 5 minutes.
    pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    pub fn grant(&self) -> &TokenGrant {
        &self.grant
    }

    /// Return the cached token, fetching a new one when missing or about to expire.
    ///
    /// Concurrent callers wait on the same refresh.
    pub async fn get_token(&self) -> Result<String, WechatError> {
        let mut cache = self.cache.lock().await;

        if let Some(ref cached) = *cache {
            if !cached.is_expired(self.refresh_buffer) {
                return Ok(cached.token.as_str().to_string());
            }
        }

        let response = self.fetch_token_with_retry().await?;

        let token = AccessToken::new(response.access_token).map_err(WechatError::Token)?;
        info!(
            "[wechat] access token refreshed for {}, expires in {}s",
            self.grant.id(),
            response.expires_in
        );

        *cache = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });
        Ok(token.as_str().to_string())
    }

    async fn fetch_token_with_retry(&self) -> Result<AccessTokenResponse, WechatError> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match self.client.execute(self.grant.action(), None).await {
                Ok(response) => return Ok(response),
                Err(WechatError::Http(HttpError::Reqwest(e))) => {
                    warn!(
                        "[wechat] token request failed (attempt {}/{}): {}",
                        attempt + 1,
                        MAX_RETRIES,
                        e
                    );
                    last_error = Some(WechatError::Http(HttpError::Reqwest(e)));
                    if attempt < MAX_RETRIES - 1 {
                        tokio::time::sleep(Duration::from_millis(
                            RETRY_DELAY_MS * (attempt + 1) as u64,
                        ))
                        .await;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| WechatError::Token("Unknown error".to_string())))
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
    }
}
