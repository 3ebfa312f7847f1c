//! Web login for members (网页授权)

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::wx::Action;

const AUTHORIZE_URL: &str = "https://open.weixin.qq.com/connect/oauth2/authorize";

/// Page a member is sent to inside WeCom. Pass `agentid` to use the
/// `snsapi_privateinfo` scope; otherwise `snsapi_base` is requested.
pub fn authorize_url(
    corpid: &str,
    redirect_uri: &str,
    state: &str,
    agentid: Option<i64>,
) -> String {
    let redirect_uri = utf8_percent_encode(redirect_uri, NON_ALPHANUMERIC);
    match agentid {
        Some(agentid) => format!(
            "{AUTHORIZE_URL}?appid={corpid}&redirect_uri={redirect_uri}&response_type=code&scope=snsapi_privateinfo&state={state}&agentid={agentid}#wechat_redirect"
        ),
        None => format!(
            "{AUTHORIZE_URL}?appid={corpid}&redirect_uri={redirect_uri}&response_type=code&scope=snsapi_base&state={state}#wechat_redirect"
        ),
    }
}

/// Identity behind an authorization code. Members get `userid`; outsiders
/// get `openid` (and `external_userid` when they are an external contact).
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeUserInfo {
    pub userid: Option<String>,
    /// Present for `snsapi_privateinfo`, valid for 1800s
    pub user_ticket: Option<String>,
    pub openid: Option<String>,
    pub external_userid: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct UserTicketRequest {
    user_ticket: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserDetail {
    pub userid: String,
    pub gender: String,
    pub avatar: String,
    pub qr_code: String,
    pub mobile: String,
    pub email: String,
    pub biz_mail: String,
    pub address: String,
}

pub fn user_info(code: impl Into<String>) -> Action<CodeUserInfo> {
    Action::get("/cgi-bin/auth/getuserinfo").query("code", code.into())
}

/// Sensitive member fields, readable with the ticket from [`user_info`].
pub fn user_detail(user_ticket: impl Into<String>) -> Action<UserDetail> {
    Action::post("/cgi-bin/auth/getuserdetail").json(UserTicketRequest {
        user_ticket: user_ticket.into(),
    })
}
