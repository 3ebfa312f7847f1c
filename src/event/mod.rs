//! Callback handling shared by Official Accounts and WeCom
//!
//! - [`message`] - inbound message/event XML
//! - [`reply`] - passive XML replies
//! - [`crypto`] - safe-mode AES payload encryption and signatures
//! - [`callback`] - verification + parsing + replying in one place
//!
//! ```rust
//! use wechat_sdk::event::{Callback, CallbackQuery, MessageKind, Reply};
//!
//! let callback = Callback::plaintext("QDG6eK");
//! let query = CallbackQuery::parse(
//!     "signature=d2157f2f9079f4d6257b45edf665c43c62e60a0a&timestamp=1409659813&nonce=1372623149",
//! );
//! let body = "<xml><ToUserName><![CDATA[gh_1]]></ToUserName>\
//!     <FromUserName><![CDATA[oUser]]></FromUserName><CreateTime>1</CreateTime>\
//!     <MsgType><![CDATA[text]]></MsgType><Content><![CDATA[ping]]></Content></xml>";
//!
//! let message = callback.parse(&query, body).unwrap();
//! assert_eq!(message.kind(), MessageKind::Text);
//! let answer = callback.respond(&message, &Reply::text("pong")).unwrap();
//! assert!(answer.contains("<![CDATA[pong]]>"));
//! ```

pub mod callback;
pub mod crypto;
pub mod message;
pub mod reply;
mod xml;

pub use callback::{Callback, CallbackQuery};
pub use crypto::{check_signature, MsgCrypt};
pub use message::{ApprovalInfo, EventKind, MessageKind, MixMessage};
pub use reply::{Article, Reply};
