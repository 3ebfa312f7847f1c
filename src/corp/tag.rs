//! Contact tags

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

#[derive(Debug, Clone, Serialize)]
struct CreateRequest {
    tagname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tagid: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
struct TagUsersRequest {
    tagid: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    userlist: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    partylist: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagCreated {
    pub tagid: i64,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagMember {
    pub userid: String,
    pub name: String,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagUsers {
    pub tagname: String,
    pub userlist: Vec<TagMember>,
    pub partylist: Vec<i64>,
}

/// Members that could not be added to or removed from a tag.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagUsersResult {
    /// `|`-separated userids
    pub invalidlist: String,
    pub invalidparty: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub tagid: i64,
    pub tagname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub taglist: Vec<Tag>,
}

pub fn create(tagname: impl Into<String>, tagid: Option<i64>) -> Action<TagCreated> {
    Action::post("/cgi-bin/tag/create").json(CreateRequest {
        tagname: tagname.into(),
        tagid,
    })
}

pub fn get_users(tagid: i64) -> Action<TagUsers> {
    Action::get("/cgi-bin/tag/get").query("tagid", tagid)
}

pub fn add_users(tagid: i64, userlist: Vec<String>, partylist: Vec<i64>) -> Action<TagUsersResult> {
    Action::post("/cgi-bin/tag/addtagusers").json(TagUsersRequest {
        tagid,
        userlist,
        partylist,
    })
}

pub fn delete_users(
    tagid: i64,
    userlist: Vec<String>,
    partylist: Vec<i64>,
) -> Action<TagUsersResult> {
    Action::post("/cgi-bin/tag/deltagusers").json(TagUsersRequest {
        tagid,
        userlist,
        partylist,
    })
}

pub fn list() -> Action<TagList> {
    Action::get("/cgi-bin/tag/list")
}

/// Not in every corp's permission set, hence the ack result.
pub fn delete(tagid: i64) -> Action<ApiResponseBase> {
    Action::get("/cgi-bin/tag/delete").query("tagid", tagid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_create() {
        assert_eq!(
            create("UI", Some(12)).body_json().unwrap().unwrap(),
            json!({"tagname": "UI", "tagid": 12})
        );
        assert_eq!(
            create("UI", None).body_json().unwrap().unwrap(),
            json!({"tagname": "UI"})
        );
    }

    #[test]
    fn test_members() {
        let action = add_users(12, vec!["user1".into(), "user2".into()], vec![4]);
        assert_eq!(action.path(), "/cgi-bin/tag/addtagusers");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({"tagid": 12, "userlist": ["user1", "user2"], "partylist": [4]})
        );
        let result = action
            .decode(RawResponse::json(
                r#"{"errcode":0,"errmsg":"ok","invalidlist":"usr1|usr2","invalidparty":[2,4]}"#,
            ))
            .unwrap();
        assert_eq!(result.invalidlist, "usr1|usr2");

        let body = delete_users(12, vec!["user1".into()], vec![])
            .body_json()
            .unwrap()
            .unwrap();
        assert_eq!(body, json!({"tagid": 12, "userlist": ["user1"]}));
    }

    #[test]
    fn test_get_users_and_list() {
        let users = get_users(12)
            .decode(RawResponse::json(
                r#"{"tagname":"乒乓球协会","userlist":[{"userid":"zhangsan","name":"李四"}],"partylist":[2]}"#,
            ))
            .unwrap();
        assert_eq!(users.userlist[0].userid, "zhangsan");
        let tags = list()
            .decode(RawResponse::json(
                r#"{"taglist":[{"tagid":1,"tagname":"a"},{"tagid":2,"tagname":"b"}]}"#,
            ))
            .unwrap();
        assert_eq!(tags.taglist.len(), 2);
        assert_eq!(delete(1).query_value("tagid"), Some("1"));
    }
}
