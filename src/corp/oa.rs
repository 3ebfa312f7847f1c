//! Approvals (审批)
//!
//! Approval forms are free-form; their controls and values are passed through
//! as JSON.

use serde::{Deserialize, Serialize};

use crate::wx::Action;

/// Filter of [`approval_info`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalFilter {
    /// `template_id`, `creator`, `department`, `sp_status` or `record_type`
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
struct ApprovalInfoRequest {
    starttime: String,
    endtime: String,
    new_cursor: String,
    size: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<ApprovalFilter>,
}

/// One page of approval numbers
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApprovalNumbers {
    pub sp_no_list: Vec<String>,
    /// Empty on the last page
    pub new_next_cursor: String,
}

#[derive(Debug, Clone, Serialize)]
struct SpNoRequest {
    sp_no: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Applicant {
    pub userid: String,
    pub partyid: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApprovalDetail {
    pub sp_no: String,
    pub sp_name: String,
    /// 1 pending, 2 approved, 3 rejected, 4 revoked, 6 revoked after approval,
    /// 7 deleted, 10 paid
    pub sp_status: i32,
    pub template_id: String,
    pub apply_time: i64,
    pub applyer: Applicant,
    pub sp_record: Vec<serde_json::Value>,
    pub notifyer: Vec<serde_json::Value>,
    pub apply_data: serde_json::Value,
    pub comments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalDetailResult {
    pub info: ApprovalDetail,
}

/// Submitted through [`apply_event`]. `apply_data` and `summary_list` follow
/// the template's control layout.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyEvent {
    pub creator_userid: String,
    pub template_id: String,
    /// 0: approvers from the request, 1: approvers from the template
    pub use_template_approver: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifyer: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_type: Option<i32>,
    pub apply_data: serde_json::Value,
    pub summary_list: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyEventResult {
    pub sp_no: String,
}

#[derive(Debug, Clone, Serialize)]
struct TemplateIdRequest {
    template_id: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateDetail {
    pub template_names: Vec<serde_json::Value>,
    pub template_content: serde_json::Value,
}

/// Approval numbers created between two Unix timestamps (at most 31 days apart).
pub fn approval_info(
    starttime: i64,
    endtime: i64,
    cursor: impl Into<String>,
    size: u32,
    filters: Vec<ApprovalFilter>,
) -> Action<ApprovalNumbers> {
    Action::post("/cgi-bin/oa/getapprovalinfo").json(ApprovalInfoRequest {
        starttime: starttime.to_string(),
        endtime: endtime.to_string(),
        new_cursor: cursor.into(),
        size,
        filters,
    })
}

pub fn approval_detail(sp_no: impl Into<String>) -> Action<ApprovalDetailResult> {
    Action::post("/cgi-bin/oa/getapprovaldetail").json(SpNoRequest {
        sp_no: sp_no.into(),
    })
}

pub fn apply_event(event: ApplyEvent) -> Action<ApplyEventResult> {
    Action::post("/cgi-bin/oa/applyevent").json(event)
}

pub fn template_detail(template_id: impl Into<String>) -> Action<TemplateDetail> {
    Action::post("/cgi-bin/oa/gettemplatedetail").json(TemplateIdRequest {
        template_id: template_id.into(),
    })
}
