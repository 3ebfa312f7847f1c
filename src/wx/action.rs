//! Endpoint descriptions
//!
//! An [`Action`] bundles everything one WeChat endpoint call needs: the HTTP
//! method, the path, query parameters, a lazily evaluated request body and the
//! decoder that turns the raw response into `T`. Endpoint modules only build
//! actions; [`WechatClient::execute`](crate::client::WechatClient::execute)
//! runs them.
//!
//! ```rust
//! use wechat_sdk::wx::{Action, RawResponse};
//!
//! #[derive(serde::Deserialize)]
//! struct IpList {
//!     ip_list: Vec<String>,
//! }
//!
//! let action: Action<IpList> = Action::get("/cgi-bin/getcallbackip");
//! assert_eq!(action.path(), "/cgi-bin/getcallbackip");
//!
//! let result = action
//!     .decode(RawResponse::json(r#"{"ip_list":["127.0.0.1"]}"#))
//!     .unwrap();
//! assert_eq!(result.ip_list, vec!["127.0.0.1"]);
//! ```

use std::fmt;
use std::sync::Arc;

use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{HttpError, WechatError};

type BodyBuilder = Arc<dyn Fn() -> Result<Vec<u8>, WechatError> + Send + Sync>;
type Decoder<T> = Box<dyn FnOnce(RawResponse) -> Result<T, WechatError> + Send>;

/// Request body of an [`Action`]
#[derive(Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    /// JSON document, serialized when the request is built
    Json(BodyBuilder),
    /// `multipart/form-data` file upload
    Multipart(UploadForm),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Json(_) => f.write_str("Json(..)"),
            Body::Multipart(form) => f.debug_tuple("Multipart").field(form).finish(),
        }
    }
}

/// A file to upload through a `multipart/form-data` body
#[derive(Clone, PartialEq, Eq)]
pub struct UploadForm {
    /// Form field carrying the file, `media` for almost every endpoint
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
    pub content_type: Option<String>,
    /// Additional text fields sent next to the file
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            field: "media".to_string(),
            file_name: file_name.into(),
            content: content.into(),
            content_type: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub(crate) fn into_multipart(self) -> Result<reqwest::multipart::Form, WechatError> {
        let mut part = reqwest::multipart::Part::bytes(self.content).file_name(self.file_name);
        if let Some(content_type) = &self.content_type {
            part = part.mime_str(content_type)?;
        }

        let mut form = reqwest::multipart::Form::new().part(self.field, part);
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

impl fmt::Debug for UploadForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadForm")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .field("content_type", &self.content_type)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Status-checked HTTP response handed to an action's decoder
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// The `errcode`/`errmsg` pair every WeChat JSON response may carry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub errcode: Option<i64>,
    #[serde(default)]
    pub errmsg: Option<String>,
}

impl RawResponse {
    pub fn new(headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// A JSON response, handy for decoding fixtures.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            body: body.into(),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// The errcode envelope, when the body is a JSON object that carries one.
    ///
    /// Binary downloads (images, voice, video) never have one.
    pub fn envelope(&self) -> Option<Envelope> {
        let first = self.body.iter().find(|b| !b.is_ascii_whitespace())?;
        if *first != b'{' {
            return None;
        }
        let envelope: Envelope = serde_json::from_slice(&self.body).ok()?;
        envelope.errcode.map(|_| envelope)
    }

    /// Fail with [`WechatError::Api`] when the envelope carries a non-zero errcode.
    pub fn check_envelope(&self) -> Result<(), WechatError> {
        let Some(envelope) = self.envelope() else {
            return Ok(());
        };
        let code = envelope.errcode.unwrap_or_default();
        if code == 0 {
            return Ok(());
        }
        Err(WechatError::Api {
            code: code.try_into().unwrap_or(i32::MAX),
            message: envelope
                .errmsg
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    fn file_name(&self) -> Option<String> {
        let disposition = self.headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
        disposition.split(';').find_map(|segment| {
            let (key, value) = segment.trim().split_once('=')?;
            (key.eq_ignore_ascii_case("filename")).then(|| value.trim_matches('"').to_string())
        })
    }
}

/// A downloaded binary file (media, Mini Program code images)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl From<RawResponse> for Media {
    fn from(raw: RawResponse) -> Self {
        Self {
            content_type: raw.content_type().map(str::to_string),
            file_name: raw.file_name(),
            data: raw.body,
        }
    }
}

/// One WeChat endpoint call, producing `T`
pub struct Action<T> {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
    requires_token: bool,
    decode: Decoder<T>,
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("requires_token", &self.requires_token)
            .finish_non_exhaustive()
    }
}

fn decode_json<T: DeserializeOwned>(raw: RawResponse) -> Result<T, WechatError> {
    serde_json::from_slice(&raw.body).map_err(|e| WechatError::Http(HttpError::Decode(e.to_string())))
}

impl<T> Action<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Action whose response is decoded from JSON.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self::with_decoder(method, path, decode_json::<T>)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }
}

impl Action<Media> {
    /// Action whose response is a binary file.
    pub fn download(method: Method, path: impl Into<String>) -> Self {
        Self::with_decoder(method, path, |raw| Ok(Media::from(raw)))
    }
}

impl<T> Action<T> {
    pub fn with_decoder<F>(method: Method, path: impl Into<String>, decode: F) -> Self
    where
        F: FnOnce(RawResponse) -> Result<T, WechatError> + Send + 'static,
    {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            requires_token: true,
            decode: Box::new(decode),
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when the value is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Send `body` as JSON. Serialization runs when the request is built.
    pub fn json<B>(mut self, body: B) -> Self
    where
        B: Serialize + Send + Sync + 'static,
    {
        self.body = Body::Json(Arc::new(move || Ok(serde_json::to_vec(&body)?)));
        self
    }

    pub fn upload(mut self, form: UploadForm) -> Self {
        self.body = Body::Multipart(form);
        self
    }

    /// The endpoint authenticates by other means (appid/secret, user token).
    pub fn without_token(mut self) -> Self {
        self.requires_token = false;
        self
    }

    /// Replace the decoder, changing the output type.
    pub fn decode_with<U, F>(self, decode: F) -> Action<U>
    where
        F: FnOnce(RawResponse) -> Result<U, WechatError> + Send + 'static,
    {
        Action {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            requires_token: self.requires_token,
            decode: Box::new(decode),
        }
    }

    /// Post-process the decoded value.
    pub fn map<U, F>(self, f: F) -> Action<U>
    where
        T: 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let decode = self.decode;
        Action {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            requires_token: self.requires_token,
            decode: Box::new(move |raw| decode(raw).map(f)),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn requires_token(&self) -> bool {
        self.requires_token
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Serialized JSON body, if the action has one.
    pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, WechatError> {
        match &self.body {
            Body::Json(build) => build().map(Some),
            _ => Ok(None),
        }
    }

    /// JSON body as a [`serde_json::Value`], for comparing against fixtures.
    pub fn body_json(&self) -> Result<Option<serde_json::Value>, WechatError> {
        self.body_bytes()?
            .map(|bytes| serde_json::from_slice(&bytes).map_err(WechatError::from))
            .transpose()
    }

    /// Run the decoder on an already envelope-checked response.
    pub fn decode(self, raw: RawResponse) -> Result<T, WechatError> {
        (self.decode)(raw)
    }

    pub(crate) fn into_parts(self) -> (Method, String, Vec<(String, String)>, Body, Decoder<T>) {
        (self.method, self.path, self.query, self.body, self.decode)
    }
}
