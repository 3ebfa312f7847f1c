//! Temporary media and permanent material

use http::Method;
use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase, Media, MediaType, UploadForm};

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct TempMediaUploaded {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub media_id: String,
    /// Set instead of `media_id` for `thumb` uploads
    #[serde(default)]
    pub thumb_media_id: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageUploaded {
    pub url: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialAdded {
    pub media_id: String,
    /// Only for images
    #[serde(default)]
    pub url: Option<String>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MaterialCount {
    pub voice_count: i64,
    pub video_count: i64,
    pub image_count: i64,
    pub news_count: i64,
}

/// Title and introduction required when adding a permanent video
#[derive(Debug, Clone)]
pub struct VideoDescription {
    pub title: String,
    pub introduction: String,
}

#[derive(Debug, Clone, Serialize)]
struct MediaIdRequest {
    media_id: String,
}

/// Upload a temporary media file, kept by WeChat for three days.
pub fn upload_temp(media_type: MediaType, form: UploadForm) -> Action<TempMediaUploaded> {
    Action::post("/cgi-bin/media/upload")
        .query("type", media_type)
        .upload(form)
}

/// Download a temporary media file.
pub fn get_temp(media_id: impl Into<String>) -> Action<Media> {
    Action::download(Method::GET, "/cgi-bin/media/get").query("media_id", media_id.into())
}

/// Upload an image for use inside article content. Returns its URL.
pub fn upload_image(form: UploadForm) -> Action<ImageUploaded> {
    Action::post("/cgi-bin/media/uploadimg").upload(form)
}

/// Add a permanent material. Videos must carry a [`VideoDescription`].
pub fn add_material(
    media_type: MediaType,
    form: UploadForm,
    description: Option<VideoDescription>,
) -> Action<MaterialAdded> {
    let form = match description {
        Some(d) => form.text(
            "description",
            serde_json::json!({"title": d.title, "introduction": d.introduction}).to_string(),
        ),
        None => form,
    };
    Action::post("/cgi-bin/material/add_material")
        .query("type", media_type)
        .upload(form)
}

pub fn material_count() -> Action<MaterialCount> {
    Action::get("/cgi-bin/material/get_materialcount")
}

pub fn delete_material(media_id: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/material/del_material").json(MediaIdRequest {
        media_id: media_id.into(),
    })
}
