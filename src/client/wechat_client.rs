//! WeChat HTTP Client
//!
//! The transport every platform facade shares. It knows nothing about
//! credentials: it runs an [`Action`] against its base URL, optionally with an
//! access token supplied by the caller.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use tower::Service;

use crate::error::WechatError;
use crate::wx::{Action, Body, RawResponse};

use super::builder::WechatClientBuilder;

/// Official Account and Mini Program API host
pub const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";
/// WeCom API host
pub const CORP_BASE_URL: &str = "https://qyapi.weixin.qq.com";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub(crate) type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// WeChat API Client
///
/// Reusable HTTP transport for calling WeChat APIs.
#[derive(Clone)]
pub struct WechatClient {
    http: Client,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Create a new client builder
    pub fn builder() -> WechatClientBuilder {
        WechatClientBuilder::default()
    }

    pub(crate) fn from_parts(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url,
            middleware_executor: None,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn append_access_token(path: &str, access_token: &str) -> String {
        let encoded = utf8_percent_encode(access_token, NON_ALPHANUMERIC);
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}access_token={encoded}")
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    /// Run an action.
    ///
    /// `access_token` is appended to the URL when given. Actions that require a
    /// token fail with [`WechatError::Token`] when none is supplied.
    ///
    /// # Errors
    /// - `WechatError::Http` for transport failures, non-2xx statuses and decode failures
    /// - `WechatError::Api` when the response carries `errcode != 0`
    pub async fn execute<T>(
        &self,
        action: Action<T>,
        access_token: Option<&str>,
    ) -> Result<T, WechatError> {
        if action.requires_token() && access_token.is_none() {
            return Err(WechatError::Token(format!(
                "{} requires an access token",
                action.path()
            )));
        }

        let (method, path, query, body, decode) = action.into_parts();
        debug!("[wechat] {} {}", method, path);

        let mut url = format!("{}{}", self.base_url, path);
        if let Some(token) = access_token {
            url = Self::append_access_token(&url, token);
        }

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            Body::Empty => builder,
            Body::Json(build) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(build()?),
            Body::Multipart(form) => builder.multipart(form.into_multipart()?),
        };

        let response = self.send_request(builder.build()?).await?;
        if let Err(e) = response.error_for_status_ref() {
            return Err(e.into());
        }

        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let raw = RawResponse::new(headers, bytes.to_vec());

        raw.check_envelope()?;
        decode(raw)
    }
}

impl Service<reqwest::Request> for WechatClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}
