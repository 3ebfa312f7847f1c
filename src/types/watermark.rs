use serde::{Deserialize, Serialize};

/// Watermark embedded in Mini Program encrypted payloads and phone number results
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Watermark {
    /// Unix timestamp of the encryption
    pub timestamp: i64,
    /// AppID the payload was produced for
    pub appid: String,
}

impl Watermark {
    pub fn is_from(&self, appid: &str) -> bool {
        self.appid == appid
    }
}
