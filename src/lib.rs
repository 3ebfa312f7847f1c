//! WeChat SDK for Rust
//!
//! Server-side clients for three WeChat platforms sharing one transport:
//!
//! | Platform | Facade | Host |
//! |----------|--------|------|
//! | Official Account (公众号) | [`Offia`] | `api.weixin.qq.com` |
//! | WeCom (企业微信) | [`Corp`] | `qyapi.weixin.qq.com` |
//! | Mini Program (小程序) | [`Minip`] | `api.weixin.qq.com` |
//!
//! Every endpoint is a plain function returning an [`Action`]: the method,
//! path, query and body of one call plus the decoder for its response.
//! Facades run actions with a cached access token; [`WechatClient::execute`]
//! runs them with a token you manage yourself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wechat_sdk::offia::{self, Offia};
//! use wechat_sdk::types::{AppId, AppSecret};
//!
//! # async fn run() -> Result<(), wechat_sdk::WechatError> {
//! let offia = Offia::builder()
//!     .appid(AppId::new("wx1234567890abcdef").map_err(wechat_sdk::WechatError::Config)?)
//!     .secret(AppSecret::new("your_secret").map_err(wechat_sdk::WechatError::Config)?)
//!     .build()?;
//!
//! let followers = offia.execute(offia::user::followers(None)).await?;
//! println!("{} followers", followers.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`offia`], [`corp`], [`minip`] - platform facades and endpoint functions
//! - [`event`] - callback verification, message parsing, XML replies, AES payloads
//! - [`wx`] - the [`Action`] abstraction and shared response types
//! - [`client`] - HTTP transport and its builder
//! - [`token`] - access token caching and refresh
//! - [`middleware`] - tower layers for logging and retries
//! - [`error`] - [`WechatError`]
//! - [`types`] - validated identifiers and shared entities
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! match offia.execute(offia::menu::get()).await {
//!     Ok(menu) => { /* ... */ }
//!     Err(WechatError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

pub mod client;
pub mod corp;
pub mod error;
pub mod event;
pub mod middleware;
pub mod minip;
pub mod offia;
pub mod token;
pub mod types;
pub mod wx;
mod utils;

pub use client::{WechatClient, WechatClientBuilder, WechatContext};
pub use corp::Corp;
pub use error::WechatError;
pub use minip::Minip;
pub use offia::Offia;
pub use wx::Action;
