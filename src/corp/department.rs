//! Departments

use serde::{Deserialize, Serialize};

use crate::wx::{Action, ApiResponseBase};

#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Department {
    /// Assigned by WeCom when omitted on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parentid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing)]
    pub department_leader: Vec<String>,
}

impl Department {
    pub fn new(name: impl Into<String>, parentid: i64) -> Self {
        Self {
            name: name.into(),
            parentid: Some(parentid),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentCreated {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentList {
    #[serde(default)]
    pub department: Vec<Department>,
}

pub fn create(department: Department) -> Action<DepartmentCreated> {
    Action::post("/cgi-bin/department/create").json(department)
}

/// `department.id` selects the department to change.
pub fn update(department: Department) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/department/update").json(department)
}

/// Departments with members or sub-departments cannot be deleted.
pub fn delete(id: i64) -> Action<ApiResponseBase> {
    Action::get("/cgi-bin/department/delete").query("id", id)
}

/// Department `id` and everything below it; the whole tree when `None`.
pub fn list(id: Option<i64>) -> Action<DepartmentList> {
    Action::get("/cgi-bin/department/list").query_opt("id", id)
}
