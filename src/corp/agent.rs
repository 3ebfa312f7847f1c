//! Application (agent) settings

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllowUsers {
    pub user: Vec<AllowUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllowUser {
    pub userid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllowParties {
    pub partyid: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AllowTags {
    pub tagid: Vec<i64>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentInfo {
    pub agentid: i64,
    pub name: String,
    pub square_logo_url: String,
    pub description: String,
    pub allow_userinfos: AllowUsers,
    pub allow_partys: AllowParties,
    pub allow_tags: AllowTags,
    pub close: i32,
    pub redirect_domain: String,
    pub report_location_flag: i32,
    pub isreportenter: i32,
    pub home_url: String,
    pub customized_publish_status: i32,
}

/// Fields changed by [`set`]; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentSettings {
    pub agentid: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_location_flag: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_mediaid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isreportenter: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentSummary {
    pub agentid: i64,
    pub name: String,
    pub square_logo_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentList {
    #[serde(default)]
    pub agentlist: Vec<AgentSummary>,
}

pub fn get(agentid: i64) -> Action<AgentInfo> {
    Action::get("/cgi-bin/agent/get").query("agentid", agentid)
}

pub fn set(settings: AgentSettings) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/agent/set").json(settings)
}

/// Applications the current secret may access.
pub fn list() -> Action<AgentList> {
    Action::get("/cgi-bin/agent/list")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_get_decode() {
        let action = get(1000005);
        assert_eq!(action.query_value("agentid"), Some("1000005"));
        let info = action
            .decode(RawResponse::json(
                r#"{
                    "errcode": 0, "errmsg": "ok",
                    "agentid": 1000005, "name": "HR助手",
                    "square_logo_url": "https://p.qlogo.cn/bizmail/FicwmI50icF8GH9ib7rUAYR5kicLTgP265naVFQKnleqSlRhiaBx7QA9u7Q/0",
                    "description": "HR服务与员工自助平台",
                    "allow_userinfos": {"user": [{"userid": "zhangshan"}, {"userid": "lisi"}]},
                    "allow_partys": {"partyid": [1]},
                    "allow_tags": {"tagid": [1, 2, 3]},
                    "close": 0,
                    "redirect_domain": "open.work.weixin.qq.com",
                    "report_location_flag": 0,
                    "isreportenter": 0,
                    "home_url": "https://open.work.weixin.qq.com",
                    "customized_publish_status": 1
                }"#,
            ))
            .unwrap();
        assert_eq!(info.allow_userinfos.user.len(), 2);
        assert_eq!(info.allow_tags.tagid, vec![1, 2, 3]);
    }

    #[test]
    fn test_set_only_changed_fields() {
        let body = set(AgentSettings {
            agentid: 1000005,
            name: Some("财经助手".into()),
            isreportenter: Some(0),
            ..AgentSettings::default()
        })
        .body_json()
        .unwrap()
        .unwrap();
        assert_eq!(
            body,
            json!({"agentid": 1000005, "name": "财经助手", "isreportenter": 0})
        );
    }

    #[test]
    fn test_list_decode() {
        let agents = list()
            .decode(RawResponse::json(
                r#"{"errcode":0,"errmsg":"ok","agentlist":[{"agentid":1000005,"name":"HR助手","square_logo_url":"url"}]}"#,
            ))
            .unwrap();
        assert_eq!(agents.agentlist[0].agentid, 1000005);
    }
}
