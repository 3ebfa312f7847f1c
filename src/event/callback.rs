//! Callback endpoint glue
//!
//! [`Callback`] wraps the verification and (de)cryption a callback handler
//! performs around [`MixMessage`] and [`Reply`]. It is transport-agnostic:
//! hand it the raw query string and body from whatever HTTP server you use.

use log::debug;
use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::error::WechatError;
use crate::utils::{nonce_str, unix_timestamp};

use super::crypto::{check_signature, MsgCrypt};
use super::message::MixMessage;
use super::reply::Reply;

/// Query parameters WeChat appends to callback URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    pub signature: Option<String>,
    pub msg_signature: Option<String>,
    pub timestamp: String,
    pub nonce: String,
    pub echostr: Option<String>,
    pub encrypt_type: Option<String>,
    pub openid: Option<String>,
}

impl CallbackQuery {
    /// Parse a raw query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
            match key {
                "signature" => parsed.signature = Some(value),
                "msg_signature" => parsed.msg_signature = Some(value),
                "timestamp" => parsed.timestamp = value,
                "nonce" => parsed.nonce = value,
                "echostr" => parsed.echostr = Some(value),
                "encrypt_type" => parsed.encrypt_type = Some(value),
                "openid" => parsed.openid = Some(value),
                _ => {}
            }
        }
        parsed
    }

    fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, WechatError> {
        value
            .as_deref()
            .ok_or_else(|| WechatError::Signature(format!("missing {name} parameter")))
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Plaintext { token: String },
    Safe(MsgCrypt),
}

/// A configured callback endpoint, in plaintext or safe (encrypted) mode
#[derive(Debug, Clone)]
pub struct Callback {
    mode: Mode,
}

impl Callback {
    pub fn plaintext(token: impl Into<String>) -> Self {
        Self {
            mode: Mode::Plaintext {
                token: token.into(),
            },
        }
    }

    pub fn safe(crypt: MsgCrypt) -> Self {
        Self {
            mode: Mode::Safe(crypt),
        }
    }

    pub fn is_safe_mode(&self) -> bool {
        matches!(self.mode, Mode::Safe(_))
    }

    /// Answer the GET request WeChat sends when the callback URL is saved.
    ///
    /// Official Accounts sign `token/timestamp/nonce` and expect `echostr`
    /// back verbatim. WeCom signs with `msg_signature` over an encrypted
    /// `echostr` and expects it decrypted.
    pub fn verify_url(&self, query: &CallbackQuery) -> Result<String, WechatError> {
        let echostr = CallbackQuery::required(&query.echostr, "echostr")?;
        match (&self.mode, query.msg_signature.as_deref()) {
            (Mode::Safe(crypt), Some(msg_signature)) => {
                crypt.verify_url(msg_signature, &query.timestamp, &query.nonce, echostr)
            }
            (Mode::Safe(crypt), None) => {
                let signature = CallbackQuery::required(&query.signature, "signature")?;
                check_signature(crypt.token(), signature, &query.timestamp, &query.nonce)?;
                Ok(echostr.to_string())
            }
            (Mode::Plaintext { token }, _) => {
                let signature = CallbackQuery::required(&query.signature, "signature")?;
                check_signature(token, signature, &query.timestamp, &query.nonce)?;
                Ok(echostr.to_string())
            }
        }
    }

    /// Verify a POSTed callback and parse the message it carries.
    pub fn parse(&self, query: &CallbackQuery, body: &str) -> Result<MixMessage, WechatError> {
        let xml = match &self.mode {
            Mode::Plaintext { token } => {
                let signature = CallbackQuery::required(&query.signature, "signature")?;
                check_signature(token, signature, &query.timestamp, &query.nonce)?;
                body.to_string()
            }
            Mode::Safe(crypt) => {
                let msg_signature = CallbackQuery::required(&query.msg_signature, "msg_signature")?;
                crypt.decrypt_message(msg_signature, &query.timestamp, &query.nonce, body)?
            }
        };

        let message = MixMessage::parse(&xml)?;
        debug!(
            "[wechat] callback {} from {}",
            message.msg_type, message.from_user_name
        );
        Ok(message)
    }

    /// Render `reply` as the answer to `message`, encrypting it in safe mode.
    pub fn respond(&self, message: &MixMessage, reply: &Reply) -> Result<String, WechatError> {
        let timestamp = unix_timestamp();
        let xml = reply.to_xml(&message.from_user_name, &message.to_user_name, timestamp)?;
        match &self.mode {
            Mode::Plaintext { .. } => Ok(xml),
            Mode::Safe(crypt) => {
                crypt.encrypt_message(&xml, &timestamp.to_string(), &nonce_str(10))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MessageKind;

    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "Encrypt")]
        encrypt: String,
        #[serde(rename = "MsgSignature")]
        msg_signature: String,
    }

    const TOKEN: &str = "QDG6eK";
    const AES_KEY: &str = "YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4eXowMTIzNDU";
    const APPID: &str = "wx5823bf96d3bd56c7";

    const TEXT: &str = "<xml><ToUserName><![CDATA[gh_account]]></ToUserName>\
        <FromUserName><![CDATA[oUser]]></FromUserName><CreateTime>1348831860</CreateTime>\
        <MsgType><![CDATA[text]]></MsgType><Content><![CDATA[hi]]></Content>\
        <MsgId>1234567890123456</MsgId></xml>";

    #[test]
    fn test_query_parse() {
        let query = CallbackQuery::parse(
            "?signature=d2157f2f9079f4d6257b45edf665c43c62e60a0a&timestamp=1409659813&nonce=1372623149&echostr=a%2Bb%3D&extra=1",
        );
        assert_eq!(query.timestamp, "1409659813");
        assert_eq!(query.echostr.as_deref(), Some("a+b="));
        assert!(query.msg_signature.is_none());
    }

    #[test]
    fn test_plaintext_verify_and_parse() {
        let callback = Callback::plaintext(TOKEN);
        let query = CallbackQuery::parse(
            "signature=d2157f2f9079f4d6257b45edf665c43c62e60a0a&timestamp=1409659813&nonce=1372623149&echostr=hello",
        );
        assert_eq!(callback.verify_url(&query).unwrap(), "hello");

        let message = callback.parse(&query, TEXT).unwrap();
        assert_eq!(message.kind(), MessageKind::Text);

        let reply = callback.respond(&message, &Reply::text("pong")).unwrap();
        assert!(reply.contains("<ToUserName><![CDATA[oUser]]></ToUserName>"));
        assert!(reply.contains("<FromUserName><![CDATA[gh_account]]></FromUserName>"));
    }

    #[test]
    fn test_plaintext_rejects_bad_signature() {
        let callback = Callback::plaintext(TOKEN);
        let query = CallbackQuery::parse("signature=bad&timestamp=1&nonce=2");
        assert!(matches!(
            callback.parse(&query, TEXT),
            Err(WechatError::Signature(_))
        ));

        let unsigned = CallbackQuery::parse("timestamp=1&nonce=2");
        assert!(matches!(
            callback.parse(&unsigned, TEXT),
            Err(WechatError::Signature(_))
        ));
    }

    #[test]
    fn test_safe_mode_round_trip() {
        let crypt = MsgCrypt::new(TOKEN, AES_KEY, APPID).unwrap();
        let callback = Callback::safe(crypt.clone());
        assert!(callback.is_safe_mode());

        let body = crypt.encrypt_message(TEXT, "1409659813", "1372623149").unwrap();
        let encrypted: Envelope =
            quick_xml::de::from_str(&body).unwrap();
        let query = CallbackQuery {
            msg_signature: Some(encrypted.msg_signature),
            timestamp: "1409659813".to_string(),
            nonce: "1372623149".to_string(),
            encrypt_type: Some("aes".to_string()),
            ..CallbackQuery::default()
        };

        let message = callback.parse(&query, &body).unwrap();
        assert_eq!(message.content.as_deref(), Some("hi"));

        let response = callback.respond(&message, &Reply::text("pong")).unwrap();
        let envelope: Envelope =
            quick_xml::de::from_str(&response).unwrap();
        let inner = crypt.decrypt(&envelope.encrypt).unwrap();
        assert!(inner.contains("<Content><![CDATA[pong]]></Content>"));
    }

    #[test]
    fn test_safe_mode_requires_msg_signature() {
        let crypt = MsgCrypt::new(TOKEN, AES_KEY, APPID).unwrap();
        let body = crypt.encrypt_message(TEXT, "1", "2").unwrap();
        let query = CallbackQuery::parse("signature=x&timestamp=1&nonce=2");
        assert!(matches!(
            Callback::safe(crypt).parse(&query, &body),
            Err(WechatError::Signature(_))
        ));
    }

    #[test]
    fn test_safe_mode_wecom_url_verification() {
        let crypt = MsgCrypt::new(TOKEN, AES_KEY, APPID).unwrap();
        let echostr = crypt.encrypt("1616140317555161061").unwrap();
        let msg_signature = crypt.signature("1409659813", "1372623149", &echostr);
        let query = CallbackQuery {
            msg_signature: Some(msg_signature),
            timestamp: "1409659813".to_string(),
            nonce: "1372623149".to_string(),
            echostr: Some(echostr),
            ..CallbackQuery::default()
        };
        assert_eq!(
            Callback::safe(crypt).verify_url(&query).unwrap(),
            "1616140317555161061"
        );
    }
}
