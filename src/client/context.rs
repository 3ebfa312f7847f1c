use std::sync::Arc;

use log::warn;

use crate::error::WechatError;
use crate::token::{TokenGrant, TokenManager};
use crate::wx::Action;

use super::WechatClient;

/// Context holding the shared resources a platform facade executes through.
#[derive(Clone)]
pub struct WechatContext {
    pub(crate) client: Arc<WechatClient>,
    pub(crate) token_manager: Arc<TokenManager>,
}

impl std::fmt::Debug for WechatContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatContext")
            .field("client", &"WechatClient { .. }")
            .field("token_manager", &"TokenManager { .. }")
            .finish()
    }
}

impl WechatContext {
    pub fn new(client: Arc<WechatClient>, token_manager: Arc<TokenManager>) -> Self {
        Self {
            client,
            token_manager,
        }
    }

    pub(crate) fn from_grant(client: WechatClient, grant: TokenGrant) -> Self {
        let token_manager = Arc::new(TokenManager::new(client.clone(), grant));
        Self::new(Arc::new(client), token_manager)
    }

    pub fn client(&self) -> &WechatClient {
        &self.client
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    /// Run an action, supplying the managed access token when it needs one.
    ///
    /// A token-expired error drops the cached token so the next call refetches it.
    /// The failed call itself is not repeated.
    pub async fn execute<T>(&self, action: Action<T>) -> Result<T, WechatError> {
        let token = if action.requires_token() {
            Some(self.token_manager.get_token().await?)
        } else {
            None
        };

        let result = self.client.execute(action, token.as_deref()).await;
        if let Err(ref e) = result {
            if e.is_token_expired() {
                warn!("[wechat] access token rejected ({e}), invalidating cache");
                self.token_manager.invalidate().await;
            }
        }
        result
    }
}
