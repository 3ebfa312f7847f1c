//! Callback payload encryption ("safe mode")
//!
//! Both the Official Account and WeCom encrypt callbacks the same way:
//!
//! - the key is the 43-character EncodingAESKey, base64-decoded to 32 bytes;
//! - the IV is the first 16 bytes of the key;
//! - the plaintext is `random(16) ‖ len(msg) as u32 BE ‖ msg ‖ receive_id`,
//!   PKCS#7-padded to a 32-byte block and AES-256-CBC encrypted;
//! - the signature is the hex SHA-1 of the sorted concatenation of token,
//!   timestamp, nonce and ciphertext.
//!
//! `receive_id` is the appid for an Official Account and the corpid for WeCom.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use rand::RngCore;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::error::WechatError;

use super::xml::XmlBuilder;

type Aes256CbcEncryptor = cbc::Encryptor<Aes256>;
type Aes256CbcDecryptor = cbc::Decryptor<Aes256>;

const BLOCK_SIZE: usize = 32;
const RANDOM_LEN: usize = 16;

// Console-generated keys may carry non-zero trailing bits.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Hex SHA-1 over the lexicographically sorted parts.
fn sha1_signature(parts: &mut [&str]) -> String {
    parts.sort_unstable();
    let mut sha = Sha1::new();
    for part in parts.iter() {
        sha.update(part.as_bytes());
    }
    hex::encode(sha.finalize())
}

/// Verify a plaintext-mode request: `signature` must be the SHA-1 of token,
/// timestamp and nonce.
pub fn check_signature(
    token: &str,
    signature: &str,
    timestamp: &str,
    nonce: &str,
) -> Result<(), WechatError> {
    let expected = sha1_signature(&mut [token, timestamp, nonce]);
    if expected.eq_ignore_ascii_case(signature.trim()) {
        Ok(())
    } else {
        Err(WechatError::Signature("callback signature mismatch".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct EncryptedEnvelope {
    #[serde(rename = "Encrypt")]
    encrypt: String,
}

/// Encrypts and decrypts callback payloads for one app.
#[derive(Clone)]
pub struct MsgCrypt {
    token: String,
    key: [u8; 32],
    receive_id: String,
}

impl std::fmt::Debug for MsgCrypt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgCrypt")
            .field("token", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .field("receive_id", &self.receive_id)
            .finish()
    }
}

impl MsgCrypt {
    /// # Errors
    /// `WechatError::Config` if `encoding_aes_key` does not decode to 32 bytes.
    pub fn new(
        token: impl Into<String>,
        encoding_aes_key: &str,
        receive_id: impl Into<String>,
    ) -> Result<Self, WechatError> {
        let raw = KEY_ENGINE
            .decode(format!("{}=", encoding_aes_key.trim()))
            .map_err(|e| WechatError::Config(format!("invalid EncodingAESKey: {e}")))?;
        let key: [u8; 32] = raw.try_into().map_err(|raw: Vec<u8>| {
            WechatError::Config(format!(
                "EncodingAESKey must decode to 32 bytes, got {}",
                raw.len()
            ))
        })?;

        Ok(Self {
            token: token.into(),
            key,
            receive_id: receive_id.into(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn receive_id(&self) -> &str {
        &self.receive_id
    }

    fn iv(&self) -> &[u8] {
        &self.key[..16]
    }

    pub fn signature(&self, timestamp: &str, nonce: &str, encrypt: &str) -> String {
        sha1_signature(&mut [self.token.as_str(), timestamp, nonce, encrypt])
    }

    pub fn verify_signature(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        encrypt: &str,
    ) -> Result<(), WechatError> {
        let expected = self.signature(timestamp, nonce, encrypt);
        if expected.eq_ignore_ascii_case(msg_signature.trim()) {
            Ok(())
        } else {
            Err(WechatError::Signature("msg_signature mismatch".to_string()))
        }
    }

    /// Encrypt `plain` and return the base64 ciphertext.
    pub fn encrypt(&self, plain: &str) -> Result<String, WechatError> {
        let mut random = [0u8; RANDOM_LEN];
        rand::thread_rng().fill_bytes(&mut random);
        self.encrypt_with_random(&random, plain)
    }

    fn encrypt_with_random(
        &self,
        random: &[u8; RANDOM_LEN],
        plain: &str,
    ) -> Result<String, WechatError> {
        let msg_len = u32::try_from(plain.len())
            .map_err(|_| WechatError::Crypto("message too long".to_string()))?;

        let mut buf = Vec::with_capacity(RANDOM_LEN + 4 + plain.len() + self.receive_id.len() + BLOCK_SIZE);
        buf.extend_from_slice(random);
        buf.extend_from_slice(&msg_len.to_be_bytes());
        buf.extend_from_slice(plain.as_bytes());
        buf.extend_from_slice(self.receive_id.as_bytes());

        let pad = BLOCK_SIZE - buf.len() % BLOCK_SIZE;
        buf.resize(buf.len() + pad, pad as u8);

        let len = buf.len();
        let ciphertext = Aes256CbcEncryptor::new((&self.key).into(), self.iv().into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, len)
            .map_err(|e| WechatError::Crypto(format!("encryption failed: {e:?}")))?;
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt a base64 ciphertext, checking the trailing receive id.
    ///
    /// An empty `receive_id` accepts any sender.
    pub fn decrypt(&self, encrypt: &str) -> Result<String, WechatError> {
        let mut buf = STANDARD
            .decode(encrypt.trim())
            .map_err(|e| WechatError::Crypto(format!("invalid ciphertext: {e}")))?;

        let plaintext = Aes256CbcDecryptor::new((&self.key).into(), self.iv().into())
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|e| WechatError::Crypto(format!("decryption failed: {e:?}")))?;

        let pad = plaintext.last().copied().unwrap_or_default() as usize;
        if pad == 0 || pad > BLOCK_SIZE || pad > plaintext.len() {
            return Err(WechatError::Crypto("invalid padding".to_string()));
        }
        let content = &plaintext[..plaintext.len() - pad];
        if content.len() < RANDOM_LEN + 4 {
            return Err(WechatError::Crypto("payload too short".to_string()));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&content[RANDOM_LEN..RANDOM_LEN + 4]);
        let msg_start = RANDOM_LEN + 4;
        let msg_end = msg_start + u32::from_be_bytes(len_bytes) as usize;
        if msg_end > content.len() {
            return Err(WechatError::Crypto("invalid message length".to_string()));
        }

        let from_receive_id = &content[msg_end..];
        if !self.receive_id.is_empty() && from_receive_id != self.receive_id.as_bytes() {
            return Err(WechatError::Signature(format!(
                "receive id mismatch: expected {}, got {}",
                self.receive_id,
                String::from_utf8_lossy(from_receive_id)
            )));
        }

        String::from_utf8(content[msg_start..msg_end].to_vec())
            .map_err(|e| WechatError::Crypto(format!("message is not UTF-8: {e}")))
    }

    /// Answer WeCom's URL verification: check the signature over `echostr`
    /// and return its decrypted content.
    pub fn verify_url(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        echostr: &str,
    ) -> Result<String, WechatError> {
        self.verify_signature(msg_signature, timestamp, nonce, echostr)?;
        self.decrypt(echostr)
    }

    /// Verify and decrypt an encrypted callback body, returning the inner XML.
    pub fn decrypt_message(
        &self,
        msg_signature: &str,
        timestamp: &str,
        nonce: &str,
        body: &str,
    ) -> Result<String, WechatError> {
        let envelope: EncryptedEnvelope = quick_xml::de::from_str(body)?;
        self.verify_signature(msg_signature, timestamp, nonce, &envelope.encrypt)?;
        self.decrypt(&envelope.encrypt)
    }

    /// Encrypt a reply and wrap it in the signed envelope WeChat expects.
    pub fn encrypt_message(
        &self,
        reply: &str,
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, WechatError> {
        let encrypt = self.encrypt(reply)?;
        let signature = self.signature(timestamp, nonce, &encrypt);

        let mut xml = XmlBuilder::new()?;
        xml.cdata("Encrypt", &encrypt)?;
        xml.cdata("MsgSignature", &signature)?;
        xml.text("TimeStamp", timestamp)?;
        xml.cdata("Nonce", nonce)?;
        xml.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "QDG6eK";
    const AES_KEY: &str = "YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4eXowMTIzNDU";
    const APPID: &str = "wx5823bf96d3bd56c7";
    const TIMESTAMP: &str = "1409659813";
    const NONCE: &str = "1372623149";
    const CIPHERTEXT: &str =
        "n+2yCHTHPE9sik87zYQO2y7vGIwMYa8oWzHj8lKCGkfqKkM8tj7k7fZYboKa88WNW0Vj5Pj53lvCfTnm4l/PAA==";
    const SIGNATURE: &str = "a50ce5fa2a367ef26d1692a9956a27e770fc6428";

    fn crypt() -> MsgCrypt {
        MsgCrypt::new(TOKEN, AES_KEY, APPID).unwrap()
    }

    #[test]
    fn test_known_ciphertext() {
        let crypt = crypt();
        assert_eq!(
            crypt
                .encrypt_with_random(b"0123456789abcdef", "<xml>hi</xml>")
                .unwrap(),
            CIPHERTEXT
        );
        assert_eq!(crypt.decrypt(CIPHERTEXT).unwrap(), "<xml>hi</xml>");
        assert_eq!(crypt.signature(TIMESTAMP, NONCE, CIPHERTEXT), SIGNATURE);
    }

    #[test]
    fn test_round_trip_is_randomized() {
        let crypt = crypt();
        let plain = "<xml><Content><![CDATA[你好]]></Content></xml>";
        let a = crypt.encrypt(plain).unwrap();
        let b = crypt.encrypt(plain).unwrap();
        assert_ne!(a, b);
        assert_eq!(crypt.decrypt(&a).unwrap(), plain);
        assert_eq!(crypt.decrypt(&b).unwrap(), plain);
    }

    #[test]
    fn test_receive_id_mismatch() {
        let other = MsgCrypt::new(TOKEN, AES_KEY, "wwcorp0000000000").unwrap();
        assert!(matches!(
            other.decrypt(CIPHERTEXT),
            Err(WechatError::Signature(_))
        ));

        let any = MsgCrypt::new(TOKEN, AES_KEY, "").unwrap();
        assert_eq!(any.decrypt(CIPHERTEXT).unwrap(), "<xml>hi</xml>");
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut bytes = STANDARD.decode(CIPHERTEXT).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = STANDARD.encode(bytes);
        assert!(crypt().decrypt(&tampered).is_err());
    }

    #[test]
    fn test_invalid_key_length() {
        let err = MsgCrypt::new(TOKEN, "c2hvcnQ", APPID).unwrap_err();
        assert!(matches!(err, WechatError::Config(_)));
    }

    #[test]
    fn test_message_envelope_round_trip() {
        let crypt = crypt();
        let envelope = crypt
            .encrypt_message("<xml><Content>ok</Content></xml>", TIMESTAMP, NONCE)
            .unwrap();
        assert!(envelope.starts_with("<xml><Encrypt><![CDATA["));
        assert!(envelope.contains("<TimeStamp>1409659813</TimeStamp>"));

        #[derive(Deserialize)]
        struct Outbound {
            #[serde(rename = "Encrypt")]
            encrypt: String,
            #[serde(rename = "MsgSignature")]
            msg_signature: String,
        }
        let outbound: Outbound = quick_xml::de::from_str(&envelope).unwrap();
        assert_eq!(
            crypt
                .decrypt_message(&outbound.msg_signature, TIMESTAMP, NONCE, &envelope)
                .unwrap(),
            "<xml><Content>ok</Content></xml>"
        );
        assert!(matches!(
            crypt.decrypt_message("0000", TIMESTAMP, NONCE, &envelope),
            Err(WechatError::Signature(_))
        ));
    }

    #[test]
    fn test_verify_url() {
        let crypt = crypt();
        assert_eq!(
            crypt.verify_url(SIGNATURE, TIMESTAMP, NONCE, CIPHERTEXT).unwrap(),
            "<xml>hi</xml>"
        );
        assert!(crypt.verify_url(SIGNATURE, TIMESTAMP, "1", CIPHERTEXT).is_err());
    }

    #[test]
    fn test_check_signature() {
        assert!(check_signature(TOKEN, "d2157f2f9079f4d6257b45edf665c43c62e60a0a", TIMESTAMP, NONCE).is_ok());
        assert!(check_signature(TOKEN, "d2157f2f", TIMESTAMP, NONCE).is_err());
    }
}
