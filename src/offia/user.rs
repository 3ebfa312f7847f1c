//! Follower management

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase, Lang};

/// Basic profile of a follower
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    /// `0` when the user has unsubscribed; only `openid` is filled then
    pub subscribe: i32,
    pub openid: String,
    pub language: String,
    pub subscribe_time: i64,
    pub unionid: Option<String>,
    pub remark: String,
    pub groupid: i64,
    pub tagid_list: Vec<i64>,
    pub subscribe_scene: String,
    pub qr_scene: i64,
    pub qr_scene_str: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfoList {
    #[serde(default)]
    pub user_info_list: Vec<UserInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserQuery {
    pub openid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<Lang>,
}

impl UserQuery {
    pub fn new(openid: impl Into<String>) -> Self {
        Self {
            openid: openid.into(),
            lang: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct BatchInfoRequest {
    user_list: Vec<UserQuery>,
}

/// One page of follower openids
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Followers {
    pub total: i64,
    pub count: i64,
    pub data: FollowerData,
    /// Pass to the next [`followers`] call; empty on the last page
    pub next_openid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FollowerData {
    pub openid: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RemarkRequest {
    openid: String,
    remark: String,
}

pub fn info(openid: impl Into<String>, lang: Option<Lang>) -> Action<UserInfo> {
    Action::get("/cgi-bin/user/info")
        .query("openid", openid.into())
        .query_opt("lang", lang)
}

/// Up to 100 users per call
pub fn batch_info(user_list: Vec<UserQuery>) -> Action<UserInfoList> {
    Action::post("/cgi-bin/user/info/batchget").json(BatchInfoRequest { user_list })
}

/// Up to 10000 openids per page, starting after `next_openid`
pub fn followers(next_openid: Option<&str>) -> Action<Followers> {
    Action::get("/cgi-bin/user/get").query_opt("next_openid", next_openid)
}

pub fn update_remark(openid: impl Into<String>, remark: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/user/info/updateremark").json(RemarkRequest {
        openid: openid.into(),
        remark: remark.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_info_query() {
        let action = info("oLVPpjqs", Some(Lang::ZhCN));
        assert_eq!(action.path(), "/cgi-bin/user/info");
        assert_eq!(action.query_value("openid"), Some("oLVPpjqs"));
        assert_eq!(action.query_value("lang"), Some("zh_CN"));
        assert!(info("o", None).query_value("lang").is_none());
    }

    #[test]
    fn test_info_decode() {
        let user = info("o", None)
            .decode(RawResponse::json(
                r#"{
                    "subscribe": 1,
                    "openid": "o6_bmjrPTlm6_2sgVt7hMZOPfL2M",
                    "language": "zh_CN",
                    "subscribe_time": 1382694957,
                    "unionid": "o6_bmasdasdsad6_2sgVt7hMZOPfL",
                    "remark": "",
                    "groupid": 0,
                    "tagid_list": [128, 2],
                    "subscribe_scene": "ADD_SCENE_QR_CODE",
                    "qr_scene": 98765,
                    "qr_scene_str": ""
                }"#,
            ))
            .unwrap();
        assert_eq!(user.subscribe, 1);
        assert_eq!(user.tagid_list, vec![128, 2]);
        assert_eq!(user.unionid.as_deref(), Some("o6_bmasdasdsad6_2sgVt7hMZOPfL"));
    }

    #[test]
    fn test_batch_info_body() {
        let action = batch_info(vec![
            UserQuery::new("otvxTs4dckWG7imySrJd6jSi0CWE"),
            UserQuery {
                openid: "otvxTs_JZ6SEiP0imdhpi50fuSZg".into(),
                lang: Some(Lang::En),
            },
        ]);
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({"user_list": [
                {"openid": "otvxTs4dckWG7imySrJd6jSi0CWE"},
                {"openid": "otvxTs_JZ6SEiP0imdhpi50fuSZg", "lang": "en"}
            ]})
        );
    }

    #[test]
    fn test_followers_page() {
        let action = followers(Some("NEXT"));
        assert_eq!(action.query_value("next_openid"), Some("NEXT"));
        let page = action
            .decode(RawResponse::json(
                r#"{"total":2,"count":2,"data":{"openid":["a","b"]},"next_openid":"b"}"#,
            ))
            .unwrap();
        assert_eq!(page.data.openid, vec!["a", "b"]);
        assert_eq!(page.next_openid, "b");
        assert!(followers(None).query_pairs().is_empty());
    }

    #[test]
    fn test_update_remark_body() {
        assert_eq!(
            update_remark("oDF3iY9ffA-hqb2vVvbr7qxf6A0Q", "pangzi")
                .body_json()
                .unwrap()
                .unwrap(),
            json!({"openid": "oDF3iY9ffA-hqb2vVvbr7qxf6A0Q", "remark": "pangzi"})
        );
    }
}
