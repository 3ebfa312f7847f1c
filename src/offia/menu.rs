//! Custom menu
//!
//! Menus are built from the shared [`Menu`] / [`Button`](crate::types::Button)
//! types. Conditional menus carry a [`MatchRule`](crate::types::MatchRule).

use serde::{Deserialize, Serialize};

use crate::types::Menu;
use crate::wx::{Action, ApiResponseBase};

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalMenuCreated {
    pub menuid: String,
}

/// Result of [`get`]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MenuInfo {
    #[serde(default)]
    pub menu: Option<Menu>,
    #[serde(default)]
    pub conditionalmenu: Vec<Menu>,
}

#[derive(Debug, Clone, Serialize)]
struct MenuIdRequest {
    menuid: String,
}

#[derive(Debug, Clone, Serialize)]
struct TryMatchRequest {
    user_id: String,
}

/// Result of [`try_match`]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct MatchedMenu {
    #[serde(default)]
    pub button: Vec<crate::types::Button>,
}

pub fn create(menu: Menu) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/menu/create").json(menu)
}

pub fn get() -> Action<MenuInfo> {
    Action::get("/cgi-bin/menu/get")
}

/// Deletes the default menu together with every conditional menu.
pub fn delete() -> Action<ApiResponseBase> {
    Action::get("/cgi-bin/menu/delete")
}

pub fn add_conditional(menu: Menu) -> Action<ConditionalMenuCreated> {
    Action::post("/cgi-bin/menu/addconditional").json(menu)
}

pub fn delete_conditional(menuid: impl Into<String>) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/menu/delconditional").json(MenuIdRequest {
        menuid: menuid.into(),
    })
}

/// Which conditional menu a user would see. `user_id` is an openid or WeChat ID.
pub fn try_match(user_id: impl Into<String>) -> Action<MatchedMenu> {
    Action::post("/cgi-bin/menu/trymatch").json(TryMatchRequest {
        user_id: user_id.into(),
    })
}
