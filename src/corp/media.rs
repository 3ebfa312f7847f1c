//! Temporary media

use http::Method;
use serde::Deserialize;

use crate::wx::{Action, Media, MediaType, UploadForm};

/// WeCom reports `created_at` as a string, unlike the Official Account API.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploaded {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub media_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUploaded {
    pub url: String,
}

/// Upload a temporary file (image, voice, video or file), valid for three days.
pub fn upload(media_type: MediaType, form: UploadForm) -> Action<MediaUploaded> {
    Action::post("/cgi-bin/media/upload")
        .query("type", media_type)
        .upload(form)
}

/// Upload a permanent image for use in messages and articles.
pub fn upload_image(form: UploadForm) -> Action<ImageUploaded> {
    Action::post("/cgi-bin/media/uploadimg").upload(form)
}

pub fn get(media_id: impl Into<String>) -> Action<Media> {
    Action::download(Method::GET, "/cgi-bin/media/get").query("media_id", media_id.into())
}
