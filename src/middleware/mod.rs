//! Tower middleware for the HTTP transport.
//!
//! Layers wrap the raw `reqwest` round trip of every [`WechatClient`] call,
//! after the URL and body are built and before the errcode envelope is read.
//!
//! - [`LoggingMiddleware`] - method, masked URL, status and latency
//! - [`RetryMiddleware`] - retries on transport errors and 5xx
//!
//! ```rust
//! use tower::ServiceBuilder;
//! use wechat_sdk::client::WechatClient;
//! use wechat_sdk::middleware::{LoggingMiddleware, RetryMiddleware};
//!
//! let client = WechatClient::builder()
//!     .with_middleware(
//!         ServiceBuilder::new()
//!             .layer(LoggingMiddleware::new())
//!             .layer(RetryMiddleware::new()),
//!     )
//!     .build()
//!     .unwrap();
//! # let _ = client;
//! ```
//!
//! [`WechatClient`]: crate::client::WechatClient

pub use tower::{Layer, Service, ServiceBuilder};

mod logging;
mod retry;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
pub use retry::{RetryMiddleware, RetryMiddlewareService};
