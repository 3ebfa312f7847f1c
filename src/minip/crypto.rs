//! Decryption of `encryptedData` payloads handed to the front end
//!
//! The payload is AES-128-CBC with PKCS#7 padding. The key is the user's
//! base64 session key and the IV comes base64-encoded alongside the data.

use aes::cipher::{BlockDecryptMut, KeyIvInit};
use aes::Aes128;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::block_padding::Pkcs7;
use cbc::Decryptor;
use serde::Deserialize;

use crate::error::WechatError;
use crate::types::Watermark;

type Aes128CbcDecryptor = Decryptor<Aes128>;

/// Decrypted payload with its watermark split out
#[derive(Debug, Clone, Deserialize)]
pub struct DecryptedUserData {
    /// Remaining fields, which vary by scenario (openId, unionId, phoneNumber...)
    #[serde(flatten)]
    pub data: serde_json::Value,
    pub watermark: Watermark,
}

impl DecryptedUserData {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, WechatError> {
    BASE64
        .decode(value)
        .map_err(|e| WechatError::Crypto(format!("invalid {name}: {e}")))
}

/// Decrypt user data with the session key from `code_to_session`.
///
/// # Errors
/// `WechatError::Crypto` for bad base64, wrong key/IV length, bad padding or
/// a plaintext that is not a JSON object with a watermark.
pub fn decrypt_user_data(
    session_key: &str,
    encrypted_data: &str,
    iv: &str,
) -> Result<DecryptedUserData, WechatError> {
    let key = decode_field("session_key", session_key)?;
    let mut buffer = decode_field("encrypted_data", encrypted_data)?;
    let iv = decode_field("iv", iv)?;

    if key.len() != 16 {
        return Err(WechatError::Crypto(format!(
            "session_key must be 16 bytes, got {}",
            key.len()
        )));
    }
    if iv.len() != 16 {
        return Err(WechatError::Crypto(format!(
            "iv must be 16 bytes, got {}",
            iv.len()
        )));
    }

    let decrypted = Aes128CbcDecryptor::new(key.as_slice().into(), iv.as_slice().into())
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|e| WechatError::Crypto(format!("decryption failed: {e:?}")))?;

    serde_json::from_slice(decrypted)
        .map_err(|e| WechatError::Crypto(format!("decrypted payload is not valid JSON: {e}")))
}

/// Check the watermark was issued for `expected_appid`.
pub fn verify_watermark(data: &DecryptedUserData, expected_appid: &str) -> Result<(), WechatError> {
    if !data.watermark.is_from(expected_appid) {
        return Err(WechatError::Signature(format!(
            "watermark appid mismatch: expected {}, got {}",
            expected_appid, data.watermark.appid
        )));
    }
    Ok(())
}
