//! Web page authorization (网页授权)
//!
//! The exchange endpoints authenticate with the appid/secret or the user's web
//! access token, so none of these actions use the account access token.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::wx::{Action, ApiResponseBase, Lang};

const AUTHORIZE_URL: &str = "https://open.weixin.qq.com/connect/oauth2/authorize";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Silent authorization, openid only
    Base,
    /// Asks the user for consent, grants access to [`user_info`]
    UserInfo,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Base => "snsapi_base",
            Scope::UserInfo => "snsapi_userinfo",
        }
    }
}

/// User web access token from the code exchange
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccessToken {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub openid: String,
    pub scope: String,
    #[serde(default)]
    pub is_snapshotuser: Option<i32>,
    #[serde(default)]
    pub unionid: Option<String>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnsUserInfo {
    pub openid: String,
    pub nickname: String,
    pub sex: i32,
    pub province: String,
    pub city: String,
    pub country: String,
    pub headimgurl: String,
    pub privilege: Vec<String>,
    pub unionid: Option<String>,
}

/// Page the user is sent to for authorization.
pub fn authorize_url(appid: &str, redirect_uri: &str, scope: Scope, state: &str) -> String {
    format!(
        "{AUTHORIZE_URL}?appid={appid}&redirect_uri={}&response_type=code&scope={}&state={state}#wechat_redirect",
        utf8_percent_encode(redirect_uri, NON_ALPHANUMERIC),
        scope.as_str(),
    )
}

/// Exchange the `code` from the redirect for a user access token.
pub fn access_token(appid: &str, secret: &str, code: &str) -> Action<UserAccessToken> {
    Action::get("/sns/oauth2/access_token")
        .query("appid", appid)
        .query("secret", secret)
        .query("code", code)
        .query("grant_type", "authorization_code")
        .without_token()
}

pub fn refresh_token(appid: &str, refresh_token: &str) -> Action<UserAccessToken> {
    Action::get("/sns/oauth2/refresh_token")
        .query("appid", appid)
        .query("grant_type", "refresh_token")
        .query("refresh_token", refresh_token)
        .without_token()
}

/// Requires the `snsapi_userinfo` scope.
pub fn user_info(user_access_token: &str, openid: &str, lang: Option<Lang>) -> Action<SnsUserInfo> {
    Action::get("/sns/userinfo")
        .query("access_token", user_access_token)
        .query("openid", openid)
        .query_opt("lang", lang)
        .without_token()
}

/// Whether a user access token is still valid.
pub fn check_token(user_access_token: &str, openid: &str) -> Action<ApiResponseBase> {
    Action::get("/sns/auth")
        .query("access_token", user_access_token)
        .query("openid", openid)
        .without_token()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;

    #[test]
    fn test_authorize_url() {
        assert_eq!(
            authorize_url(
                "wx520c15f417810387",
                "https://chong.qq.com/web/index.html",
                Scope::Base,
                "123"
            ),
            "https://open.weixin.qq.com/connect/oauth2/authorize?appid=wx520c15f417810387&redirect_uri=https%3A%2F%2Fchong%2Eqq%2Ecom%2Fweb%2Findex%2Ehtml&response_type=code&scope=snsapi_base&state=123#wechat_redirect"
        );
    }

    #[test]
    fn test_code_exchange() {
        let action = access_token("wxappid", "secret", "CODE");
        assert!(!action.requires_token());
        assert_eq!(action.path(), "/sns/oauth2/access_token");
        assert_eq!(action.query_value("grant_type"), Some("authorization_code"));
        assert_eq!(action.query_value("code"), Some("CODE"));

        let token = action
            .decode(RawResponse::json(
                r#"{"access_token":"ACCESS_TOKEN","expires_in":7200,"refresh_token":"REFRESH_TOKEN","openid":"OPENID","scope":"SCOPE","is_snapshotuser":1,"unionid":"UNIONID"}"#,
            ))
            .unwrap();
        assert_eq!(token.refresh_token, "REFRESH_TOKEN");
        assert_eq!(token.is_snapshotuser, Some(1));
    }

    #[test]
    fn test_refresh_and_userinfo() {
        let action = refresh_token("wxappid", "REFRESH");
        assert_eq!(action.query_value("grant_type"), Some("refresh_token"));

        let action = user_info("USER_TOKEN", "OPENID", Some(Lang::ZhCN));
        assert_eq!(action.query_value("access_token"), Some("USER_TOKEN"));
        assert_eq!(action.query_value("lang"), Some("zh_CN"));
        let info = action
            .decode(RawResponse::json(
                r#"{"openid":"OPENID","nickname":"NICKNAME","sex":1,"province":"PROVINCE","city":"CITY","country":"COUNTRY","headimgurl":"https://thirdwx.qlogo.cn/46","privilege":["PRIVILEGE1","PRIVILEGE2"],"unionid":"o6_bmasdasdsad6_2sgVt7hMZOPfL"}"#,
            ))
            .unwrap();
        assert_eq!(info.privilege.len(), 2);

        assert!(!check_token("T", "O").requires_token());
    }
}
