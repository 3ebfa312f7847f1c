//! JS-SDK tickets and page signatures

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::utils::{nonce_str, unix_timestamp};
use crate::wx::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketType {
    Jsapi,
    WxCard,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Jsapi => "jsapi",
            TicketType::WxCard => "wx_card",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub ticket: String,
    pub expires_in: i64,
}

/// Values passed to `wx.config` on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsapiSignature {
    pub nonce_str: String,
    pub timestamp: i64,
    pub url: String,
    pub signature: String,
}

/// Fetch a ticket. Tickets live for 7200s and should be cached by the caller.
pub fn ticket(ticket_type: TicketType) -> Action<Ticket> {
    Action::get("/cgi-bin/ticket/getticket").query("type", ticket_type.as_str())
}

/// Sign a page URL for `wx.config`. Anything after `#` in `url` is ignored.
pub fn sign(ticket: &str, nonce_str: &str, timestamp: i64, url: &str) -> JsapiSignature {
    let url = url.split('#').next().unwrap_or(url);
    let plain = format!("jsapi_ticket={ticket}&noncestr={nonce_str}&timestamp={timestamp}&url={url}");
    JsapiSignature {
        nonce_str: nonce_str.to_string(),
        timestamp,
        url: url.to_string(),
        signature: hex::encode(Sha1::digest(plain.as_bytes())),
    }
}

/// [`sign`] with a fresh nonce and the current time.
pub fn sign_now(ticket: &str, url: &str) -> JsapiSignature {
    sign(ticket, &nonce_str(16), unix_timestamp(), url)
}
