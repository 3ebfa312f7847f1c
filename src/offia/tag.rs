//! User tags

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing)]
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagEnvelope {
    pub tag: Tag,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
struct TagIdRequest {
    tag: TagId,
}

#[derive(Debug, Clone, Serialize)]
struct TagId {
    id: i64,
}

#[derive(Debug, Clone, Serialize)]
struct TagName {
    name: String,
}

#[derive(Debug, Clone, Serialize)]
struct CreateRequest {
    tag: TagName,
}

#[derive(Debug, Clone, Serialize)]
struct BatchTaggingRequest {
    openid_list: Vec<String>,
    tagid: i64,
}

#[derive(Debug, Clone, Serialize)]
struct OpenIdRequest {
    openid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserTags {
    #[serde(default)]
    pub tagid_list: Vec<i64>,
}

/// Create a tag; the result echoes the assigned id.
pub fn create(name: impl Into<String>) -> Action<TagEnvelope> {
    Action::post("/cgi-bin/tags/create").json(CreateRequest {
        tag: TagName { name: name.into() },
    })
}

pub fn list() -> Action<TagList> {
    Action::get("/cgi-bin/tags/get")
}

pub fn update(id: i64, name: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/tags/update").json(TagEnvelope {
        tag: Tag {
            id,
            name: name.into(),
            count: 0,
        },
    })
}

pub fn delete(id: i64) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/tags/delete").json(TagIdRequest { tag: TagId { id } })
}

/// Tag up to 50 users at once
pub fn batch_tagging(tagid: i64, openid_list: Vec<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/tags/members/batchtagging")
        .json(BatchTaggingRequest { openid_list, tagid })
}

pub fn batch_untagging(tagid: i64, openid_list: Vec<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/tags/members/batchuntagging")
        .json(BatchTaggingRequest { openid_list, tagid })
}

pub fn tags_of_user(openid: impl Into<String>) -> Action<UserTags> {
    Action::post("/cgi-bin/tags/getidlist").json(OpenIdRequest {
        openid: openid.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_create_and_decode() {
        let action = create("Guangdong");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({"tag": {"name": "Guangdong"}})
        );
        let created = action
            .decode(RawResponse::json(r#"{"tag":{"id":134,"name":"Guangdong"}}"#))
            .unwrap();
        assert_eq!(created.tag.id, 134);
    }

    #[test]
    fn test_update_and_delete_bodies() {
        assert_eq!(
            update(134, "Guangzhou").body_json().unwrap().unwrap(),
            json!({"tag": {"id": 134, "name": "Guangzhou"}})
        );
        assert_eq!(
            delete(134).body_json().unwrap().unwrap(),
            json!({"tag": {"id": 134}})
        );
    }

    #[test]
    fn test_list_decode() {
        let tags = list()
            .decode(RawResponse::json(
                r#"{"tags":[{"id":1,"name":"blacklist","count":0},{"id":2,"name":"starred","count":3}]}"#,
            ))
            .unwrap();
        assert_eq!(tags.tags[1].count, 3);
    }

    #[test]
    fn test_member_tagging() {
        let action = batch_tagging(134, vec!["o1".into(), "o2".into()]);
        assert_eq!(action.path(), "/cgi-bin/tags/members/batchtagging");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({"openid_list": ["o1", "o2"], "tagid": 134})
        );
        assert_eq!(
            batch_untagging(134, vec![]).path(),
            "/cgi-bin/tags/members/batchuntagging"
        );
        let ids = tags_of_user("o1")
            .decode(RawResponse::json(r#"{"tagid_list":[134,2]}"#))
            .unwrap();
        assert_eq!(ids.tagid_list, vec![134, 2]);
    }
}
