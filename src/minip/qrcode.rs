//! Mini Program codes, QR codes and outside-WeChat links
//!
//! The image endpoints answer with raw bytes on success and a JSON errcode
//! body on failure, so they decode into [`Media`].

use http::Method;
use serde::{Deserialize, Serialize};

use crate::wx::{Action, Media};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Options shared by both Mini Program code endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_color: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<LineColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hyaline: Option<bool>,
}

impl CodeStyle {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn line_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.auto_color = Some(false);
        self.line_color = Some(LineColor { r, g, b });
        self
    }

    pub fn hyaline(mut self) -> Self {
        self.is_hyaline = Some(true);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct WxaCodeRequest {
    path: String,
    #[serde(flatten)]
    style: CodeStyle,
}

#[derive(Debug, Clone, Serialize)]
struct UnlimitedCodeRequest {
    scene: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<String>,
    #[serde(skip_serializing_if = "is_true")]
    check_path: bool,
    #[serde(flatten)]
    style: CodeStyle,
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Debug, Clone, Serialize)]
struct QrcodeRequest {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
}

/// Mini Program code for a page path. Limited to 100,000 codes per app.
pub fn wxa_code(path: impl Into<String>, style: CodeStyle) -> Action<Media> {
    Action::download(Method::POST, "/wxa/getwxacode").json(WxaCodeRequest {
        path: path.into(),
        style,
    })
}

/// Mini Program code carrying a `scene` of up to 32 visible characters. Unlimited.
///
/// `page` must be a published page unless `check_path` is false.
/// The server checks by default, so the flag is only sent when disabled.
pub fn wxa_code_unlimited(
    scene: impl Into<String>,
    page: Option<String>,
    check_path: bool,
    style: CodeStyle,
) -> Action<Media> {
    Action::download(Method::POST, "/wxa/getwxacodeunlimit").json(UnlimitedCodeRequest {
        scene: scene.into(),
        page,
        check_path,
        style,
    })
}

/// Classic square QR code for a page path.
pub fn create_qrcode(path: impl Into<String>, width: Option<u32>) -> Action<Media> {
    Action::download(Method::POST, "/cgi-bin/wxaapp/createwxaqrcode").json(QrcodeRequest {
        path: path.into(),
        width,
    })
}

/// When a generated link stops working
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkExpiry {
    /// Unix timestamp
    At(i64),
    /// Days from now, at most 30
    InDays(u32),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_version: Option<String>,
}

impl LinkTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
struct ExpiryFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    is_expire: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_interval: Option<u32>,
}

impl From<Option<LinkExpiry>> for ExpiryFields {
    fn from(expiry: Option<LinkExpiry>) -> Self {
        match expiry {
            None => Self::default(),
            Some(LinkExpiry::At(ts)) => Self {
                is_expire: Some(true),
                expire_type: Some(0),
                expire_time: Some(ts),
                expire_interval: None,
            },
            Some(LinkExpiry::InDays(days)) => Self {
                is_expire: Some(true),
                expire_type: Some(1),
                expire_time: None,
                expire_interval: Some(days),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UrlLinkRequest {
    #[serde(flatten)]
    target: LinkTarget,
    #[serde(flatten)]
    expiry: ExpiryFields,
}

#[derive(Debug, Clone, Serialize)]
struct SchemeRequest {
    jump_wxa: LinkTarget,
    #[serde(flatten)]
    expiry: ExpiryFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlLink {
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlScheme {
    pub openlink: String,
}

/// `https://wxaurl.cn/...` link that opens the Mini Program from a browser.
pub fn generate_url_link(target: LinkTarget, expiry: Option<LinkExpiry>) -> Action<UrlLink> {
    Action::post("/wxa/generate_urllink").json(UrlLinkRequest {
        target,
        expiry: expiry.into(),
    })
}

/// `weixin://dl/business/?t=...` scheme that opens the Mini Program from an app.
pub fn generate_scheme(target: LinkTarget, expiry: Option<LinkExpiry>) -> Action<UrlScheme> {
    Action::post("/wxa/generatescheme").json(SchemeRequest {
        jump_wxa: target,
        expiry: expiry.into(),
    })
}
