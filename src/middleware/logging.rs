use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use reqwest::{Request, Response};
use tower::{Layer, Service};

/// Logs every outgoing request with credentials masked.
///
/// By default requests are logged at `info`; [`verbose`](Self::verbose)
/// moves them to `debug`. Failed requests are always logged at `warn`.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl<S> Layer<S> for LoggingMiddleware {
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

const SENSITIVE_PARAMS: &[&str] = &[
    "access_token",
    "appsecret",
    "secret",
    "corpsecret",
    "code",
    "js_code",
    "session_key",
    "refresh_token",
    "signature",
    "msg_signature",
];

/// Mask the values of credential-bearing query parameters.
pub(crate) fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let redacted = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.iter().any(|s| key.eq_ignore_ascii_case(s)) => {
                format!("{key}=[REDACTED]")
            }
            _ => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{redacted}")
}

fn log_outcome(method: &str, url: &str, status: u16, elapsed: Duration, verbose: bool) {
    if verbose {
        debug!("[wechat] {method} {url} -> {status} ({elapsed:?})");
    } else {
        info!("[wechat] {method} {url} -> {status} ({elapsed:?})");
    }
}

impl<S> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: std::fmt::Display + Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().to_string();
        let url = redact_url(req.url().as_str());
        let verbose = self.verbose;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let start = Instant::now();
            match inner.call(req).await {
                Ok(response) => {
                    log_outcome(&method, &url, response.status().as_u16(), start.elapsed(), verbose);
                    Ok(response)
                }
                Err(e) => {
                    warn!("[wechat] {method} {url} failed after {:?}: {e}", start.elapsed());
                    Err(e)
                }
            }
        })
    }
}
