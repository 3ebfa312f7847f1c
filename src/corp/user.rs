//! Contact members

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

/// A member of the corp directory. Used both to read and to write members;
/// empty fields are omitted from request bodies.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub userid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mobile: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub department: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub position: String,
    /// `"1"` male, `"2"` female
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gender: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub biz_mail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub is_leader_in_dept: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub direct_leader: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub telephone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_department: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<i32>,
    /// Extended attributes, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extattr: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_profile: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_position: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    // Read-only fields
    #[serde(skip_serializing)]
    pub avatar: String,
    #[serde(skip_serializing)]
    pub thumb_avatar: String,
    /// 1 active, 2 disabled, 4 not yet activated, 5 left
    #[serde(skip_serializing)]
    pub status: i32,
    #[serde(skip_serializing)]
    pub qr_code: String,
    #[serde(skip_serializing)]
    pub open_userid: String,
}

impl User {
    pub fn new(userid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn department(mut self, department: Vec<i64>) -> Self {
        self.department = department;
        self
    }

    pub fn mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = mobile.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimpleUser {
    pub userid: String,
    pub name: String,
    pub department: Vec<i64>,
    pub open_userid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleUserList {
    #[serde(default)]
    pub userlist: Vec<SimpleUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub userlist: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenIdResult {
    pub openid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserIdResult {
    pub userid: String,
}

#[derive(Debug, Clone, Serialize)]
struct UserIdRequest {
    userid: String,
}

#[derive(Debug, Clone, Serialize)]
struct MobileRequest {
    mobile: String,
}

pub fn get(userid: impl Into<String>) -> Action<User> {
    Action::get("/cgi-bin/user/get").query("userid", userid.into())
}

pub fn create(user: User) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/user/create").json(user)
}

pub fn update(user: User) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/user/update").json(user)
}

pub fn delete(userid: impl Into<String>) -> Action<ApiResponseBase> {
    Action::get("/cgi-bin/user/delete").query("userid", userid.into())
}

pub fn simple_list(department_id: i64, fetch_child: bool) -> Action<SimpleUserList> {
    Action::get("/cgi-bin/user/simplelist")
        .query("department_id", department_id)
        .query("fetch_child", u8::from(fetch_child))
}

pub fn list(department_id: i64, fetch_child: bool) -> Action<UserList> {
    Action::get("/cgi-bin/user/list")
        .query("department_id", department_id)
        .query("fetch_child", u8::from(fetch_child))
}

/// Map a userid to the openid used by WeChat Pay and other WeChat services.
pub fn convert_to_openid(userid: impl Into<String>) -> Action<OpenIdResult> {
    Action::post("/cgi-bin/user/convert_to_openid").json(UserIdRequest {
        userid: userid.into(),
    })
}

pub fn get_userid_by_mobile(mobile: impl Into<String>) -> Action<UserIdResult> {
    Action::post("/cgi-bin/user/getuserid").json(MobileRequest {
        mobile: mobile.into(),
    })
}
