//! Platform-independent building blocks shared by every endpoint module.
//!
//! - [`action`] - the [`Action`] request-builder / response-decoder pair
//! - [`common`] - shared response primitives and enums

pub mod action;
pub mod common;

pub use action::{Action, Body, Envelope, Media, RawResponse, UploadForm};
pub use common::{ApiResponseBase, Lang, MediaType, WechatApiResponse};
