//! Inbound callback messages and events
//!
//! WeChat posts one flat XML document per callback. Rather than a type per
//! message, [`MixMessage`] holds every field any message or event may carry;
//! [`MixMessage::kind`] says which ones are meaningful.

use serde::Deserialize;

use crate::error::WechatError;

/// What kind of message a callback carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
    Voice,
    Video,
    ShortVideo,
    Location,
    Link,
    Event(EventKind),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Subscribe,
    Unsubscribe,
    /// Scan of a parametric QR code by an existing follower
    Scan,
    /// Periodic location report
    Location,
    Click,
    View,
    TemplateSendJobFinish,
    ScancodePush,
    ScancodeWaitMsg,
    LocationSelect,
    /// WeCom: user opened the app
    EnterAgent,
    /// WeCom: member, department or tag changed
    ChangeContact,
    /// WeCom: approval status changed
    SysApprovalChange,
    /// WeCom: template card button pressed
    TemplateCardEvent,
    Other(String),
}

impl EventKind {
    fn from_event(event: &str) -> Self {
        match event.to_ascii_lowercase().as_str() {
            "subscribe" => Self::Subscribe,
            "unsubscribe" => Self::Unsubscribe,
            "scan" => Self::Scan,
            "location" => Self::Location,
            "click" => Self::Click,
            "view" => Self::View,
            "templatesendjobfinish" => Self::TemplateSendJobFinish,
            "scancode_push" => Self::ScancodePush,
            "scancode_waitmsg" => Self::ScancodeWaitMsg,
            "location_select" => Self::LocationSelect,
            "enter_agent" => Self::EnterAgent,
            "change_contact" => Self::ChangeContact,
            "sys_approval_change" => Self::SysApprovalChange,
            "template_card_event" => Self::TemplateCardEvent,
            _ => Self::Other(event.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScanCodeInfo {
    pub scan_type: String,
    pub scan_result: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct SendLocationInfo {
    #[serde(rename = "Location_X")]
    pub location_x: f64,
    #[serde(rename = "Location_Y")]
    pub location_y: f64,
    pub scale: String,
    pub label: String,
    pub poiname: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Approver {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct Applyer {
    pub user_id: String,
    pub party: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApprovalDetail {
    pub approver: Approver,
    pub speech: String,
    pub sp_status: i32,
    pub sp_time: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApprovalRecord {
    pub sp_status: i32,
    pub approver_attr: i32,
    pub details: Vec<ApprovalDetail>,
}

/// Payload of WeCom's `sys_approval_change` event
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ApprovalInfo {
    pub sp_no: String,
    pub sp_name: String,
    /// 1 pending, 2 approved, 3 rejected, 4 revoked, 6 passed then revoked,
    /// 7 deleted, 10 paid
    pub sp_status: i32,
    pub template_id: String,
    pub apply_time: i64,
    pub applyer: Applyer,
    pub sp_record: Vec<ApprovalRecord>,
    pub notifyer: Vec<Approver>,
    pub statu_change_event: i32,
}

/// Every field an inbound message or event may carry
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct MixMessage {
    pub to_user_name: String,
    pub from_user_name: String,
    pub create_time: i64,
    pub msg_type: String,
    /// `MsgID` on template job events
    #[serde(alias = "MsgID")]
    pub msg_id: Option<i64>,
    #[serde(rename = "AgentID")]
    pub agent_id: Option<i64>,

    pub content: Option<String>,
    pub pic_url: Option<String>,
    pub media_id: Option<String>,
    pub format: Option<String>,
    pub recognition: Option<String>,
    pub thumb_media_id: Option<String>,
    #[serde(rename = "Location_X")]
    pub location_x: Option<f64>,
    #[serde(rename = "Location_Y")]
    pub location_y: Option<f64>,
    pub scale: Option<f64>,
    pub label: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,

    pub event: Option<String>,
    pub event_key: Option<String>,
    pub ticket: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub precision: Option<f64>,
    pub menu_id: Option<String>,
    pub scan_code_info: Option<ScanCodeInfo>,
    pub send_location_info: Option<SendLocationInfo>,
    /// `success`, `failed:user block` or `failed: system failed` for template jobs
    pub status: Option<String>,

    pub change_type: Option<String>,
    #[serde(rename = "UserID")]
    pub user_id: Option<String>,
    #[serde(rename = "NewUserID")]
    pub new_user_id: Option<String>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub add_user_items: Option<String>,
    pub del_user_items: Option<String>,
    pub add_party_items: Option<String>,
    pub del_party_items: Option<String>,

    pub approval_info: Option<ApprovalInfo>,

    pub task_id: Option<String>,
    pub card_type: Option<String>,
    pub response_code: Option<String>,
}

impl MixMessage {
    pub fn parse(xml: &str) -> Result<Self, WechatError> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    pub fn kind(&self) -> MessageKind {
        match self.msg_type.as_str() {
            "text" => MessageKind::Text,
            "image" => MessageKind::Image,
            "voice" => MessageKind::Voice,
            "video" => MessageKind::Video,
            "shortvideo" => MessageKind::ShortVideo,
            "location" => MessageKind::Location,
            "link" => MessageKind::Link,
            "event" => MessageKind::Event(EventKind::from_event(
                self.event.as_deref().unwrap_or_default(),
            )),
            other => MessageKind::Other(other.to_string()),
        }
    }

    pub fn is_event(&self) -> bool {
        self.msg_type == "event"
    }

    /// Scene value of the parametric QR code behind a subscribe or scan event.
    ///
    /// Subscribe events prefix it with `qrscene_`; scan events do not.
    pub fn qr_scene(&self) -> Option<&str> {
        let key = self.event_key.as_deref()?;
        match self.kind() {
            MessageKind::Event(EventKind::Subscribe) => key.strip_prefix("qrscene_"),
            MessageKind::Event(EventKind::Scan) => Some(key),
            _ => None,
        }
    }
}
