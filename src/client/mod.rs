//! WeChat HTTP Client module
//!
//! [`WechatClient`] is the shared transport, [`WechatContext`] pairs it with a
//! [`TokenManager`](crate::token::TokenManager) for the platform facades.

mod builder;
mod context;
mod wechat_client;

pub use builder::WechatClientBuilder;
pub use context::WechatContext;
pub use wechat_client::{WechatClient, CORP_BASE_URL, DEFAULT_BASE_URL};
