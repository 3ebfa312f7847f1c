//! Enterprise WeChat (企业微信 / WeCom) APIs
//!
//! Tokens come from `/cgi-bin/gettoken` with the corpid and the secret of the
//! application or contact-sync tool being used. Each secret needs its own
//! [`Corp`].

pub mod agent;
pub mod checkin;
pub mod department;
pub mod media;
pub mod menu;
pub mod message;
pub mod oa;
pub mod oauth;
pub mod tag;
pub mod user;

use std::sync::Arc;

use crate::client::{WechatClient, WechatContext, CORP_BASE_URL};
use crate::error::WechatError;
use crate::token::TokenGrant;
use crate::types::{AppSecret, CorpId};
use crate::wx::Action;

/// WeCom client bound to one corp secret
#[derive(Debug, Clone)]
pub struct Corp {
    context: Arc<WechatContext>,
    corpid: CorpId,
    agent_id: Option<i64>,
}

impl Corp {
    pub fn builder() -> CorpBuilder {
        CorpBuilder::default()
    }

    pub fn corpid(&self) -> &str {
        self.corpid.as_str()
    }

    /// Application the secret belongs to, if configured
    pub fn agent_id(&self) -> Option<i64> {
        self.agent_id
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
}

/// Builder for [`Corp`]
#[must_use]
#[derive(Debug, Default)]
pub struct CorpBuilder {
    corpid: Option<CorpId>,
    secret: Option<AppSecret>,
    agent_id: Option<i64>,
    client: Option<WechatClient>,
}

impl CorpBuilder {
    pub fn corpid(mut self, corpid: CorpId) -> Self {
        self.corpid = Some(corpid);
        self
    }

    pub fn secret(mut self, secret: AppSecret) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn agent_id(mut self, agent_id: i64) -> Self {
        self.agent_id = Some(agent_id);
        self
    }

    /// Use a preconfigured transport. Its base URL must point at the WeCom API.
    pub fn client(mut self, client: WechatClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Corp, WechatError> {
        let corpid = self
            .corpid
            .ok_or_else(|| WechatError::Config("corpid is required".to_string()))?;
        let corpsecret = self
            .secret
            .ok_or_else(|| WechatError::Config("secret is required".to_string()))?;

        let client = match self.client {
            Some(client) => client,
            None => WechatClient::builder().base_url(CORP_BASE_URL).build()?,
        };

        let grant = TokenGrant::Corp {
            corpid: corpid.clone(),
            corpsecret,
        };

        Ok(Corp {
            context: Arc::new(WechatContext::from_grant(client, grant)),
            corpid,
            agent_id: self.agent_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_qyapi() {
        let corp = Corp::builder()
            .corpid(CorpId::new("ww1234567890abcdef").unwrap())
            .secret(AppSecret::new("corpsecret").unwrap())
            .agent_id(1000002)
            .build()
            .unwrap();
        assert_eq!(corp.corpid(), "ww1234567890abcdef");
        assert_eq!(corp.agent_id(), Some(1000002));
        assert_eq!(corp.context().client().base_url(), CORP_BASE_URL);
        assert!(matches!(
            corp.context().token_manager().grant(),
            TokenGrant::Corp { .. }
        ));
    }

    #[test]
    fn test_builder_requires_secret() {
        let err = Corp::builder()
            .corpid(CorpId::new("ww1234567890abcdef").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, WechatError::Config(_)));
    }
}
