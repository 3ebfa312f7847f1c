//! Application menus

use crate::types::Menu;
use crate::wx::{Action, ApiResponseBase};

pub fn create(agentid: i64, menu: Menu) -> Action<ApiResponseBase> {
    Action::post("/cgi-bin/menu/create")
        .query("agentid", agentid)
        .json(menu)
}

pub fn get(agentid: i64) -> Action<Menu> {
    Action::get("/cgi-bin/menu/get").query("agentid", agentid)
}

pub fn delete(agentid: i64) -> Action<ApiResponseBase> {
    Action::get("/cgi-bin/menu/delete").query("agentid", agentid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Button;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_create_per_agent() {
        let menu = Menu::new(vec![
            Button::click("今日歌曲", "V1001_TODAY_MUSIC"),
            Button::parent(
                "菜单",
                vec![Button::event("pic_weixin", "微信相册发图", "rselfmenu_1_2")],
            ),
        ]);
        let action = create(1000002, menu);
        assert_eq!(action.path(), "/cgi-bin/menu/create");
        assert_eq!(action.query_value("agentid"), Some("1000002"));
        let body = action.body_json().unwrap().unwrap();
        assert_eq!(body["button"][0], json!({"type": "click", "name": "今日歌曲", "key": "V1001_TODAY_MUSIC"}));
        assert_eq!(body["button"][1]["sub_button"][0]["type"], "pic_weixin");
    }

    #[test]
    fn test_get_and_delete() {
        let menu = get(1000002)
            .decode(RawResponse::json(
                r#"{"errcode":0,"errmsg":"ok","button":[{"type":"view","name":"搜索","url":"http://www.soso.com/"}]}"#,
            ))
            .unwrap();
        assert_eq!(menu.button[0].url.as_deref(), Some("http://www.soso.com/"));
        assert_eq!(delete(1000002).query_value("agentid"), Some("1000002"));
    }
}
