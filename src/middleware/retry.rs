//! Transport-level retries.
//!
//! Retries requests that failed before WeChat produced an answer: connection
//! errors, timeouts and HTTP 5xx responses. WeChat-level `errcode` failures
//! arrive as HTTP 200 and are never retried here.
//!
//! POST requests are not retried unless enabled with
//! [`RetryMiddleware::with_retry_post`], since most WeChat POST endpoints
//! create or send something. Requests whose body cannot be cloned (streams)
//! are sent once.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use log::warn;
use reqwest::{Method, Request, Response};
use tokio::time::sleep;
use tower::{Layer, Service};

use crate::utils::jittered_delay;

/// Middleware that retries requests on transport errors and 5xx responses.
#[derive(Debug, Clone)]
pub struct RetryMiddleware {
    max_retries: u32,
    delay_ms: u64,
    retry_post: bool,
}

impl RetryMiddleware {
    /// Default: max_retries = 3, delay_ms = 100ms, retry_post = false
    pub fn new() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 100,
            retry_post: false,
        }
    }

    /// Retries after the first attempt; 0 disables retrying.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Base delay, doubled per attempt with jitter.
    pub fn with_delay_ms(mut self, delay: u64) -> Self {
        self.delay_ms = delay;
        self
    }

    pub fn with_retry_post(mut self, retry: bool) -> Self {
        self.retry_post = retry;
        self
    }

    fn allows(&self, method: &Method) -> bool {
        match *method {
            Method::POST => self.retry_post,
            Method::PATCH => false,
            _ => true,
        }
    }
}

impl Default for RetryMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RetryMiddleware {
    type Service = RetryMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryMiddlewareService {
            inner,
            policy: self.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryMiddlewareService<S> {
    inner: S,
    policy: RetryMiddleware,
}

fn should_retry(result: &Result<Response, reqwest::Error>) -> bool {
    match result {
        Ok(response) => response.status().is_server_error(),
        Err(e) => !e.is_builder() && !e.is_redirect(),
    }
}

impl<S> Service<Request> for RetryMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = reqwest::Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = reqwest::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let retryable = policy.allows(req.method());
            let mut attempt = 0u32;
            let mut current = req;

            loop {
                let spare = if retryable && attempt < policy.max_retries {
                    current.try_clone()
                } else {
                    None
                };
                let method = current.method().clone();
                let path = current.url().path().to_string();

                let result = inner.call(current).await;
                let Some(next) = spare else {
                    return result;
                };
                if !should_retry(&result) {
                    return result;
                }

                let delay = jittered_delay(policy.delay_ms, attempt);
                match &result {
                    Ok(response) => warn!(
                        "[wechat] {method} {path} returned {}, retrying in {delay:?} ({}/{})",
                        response.status(),
                        attempt + 1,
                        policy.max_retries
                    ),
                    Err(e) => warn!(
                        "[wechat] {method} {path} failed: {e}, retrying in {delay:?} ({}/{})",
                        attempt + 1,
                        policy.max_retries
                    ),
                }
                sleep(delay).await;
                attempt += 1;
                current = next;
            }
        })
    }
}
