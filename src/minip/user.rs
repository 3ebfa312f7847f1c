//! User phone numbers

use serde::{Deserialize, Serialize};

use crate::types::Watermark;
use crate::wx::Action;

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneInfo {
    /// With country code for non-mainland numbers
    pub phone_number: String,
    pub pure_phone_number: String,
    pub country_code: String,
    pub watermark: Watermark,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneNumber {
    pub phone_info: PhoneInfo,
}

#[derive(Debug, Clone, Serialize)]
struct CodeRequest {
    code: String,
}

/// Exchange the code from a `getPhoneNumber` button for the user's number.
pub fn phone_number(code: impl Into<String>) -> Action<PhoneNumber> {
    Action::post("/wxa/business/getuserphonenumber").json(CodeRequest { code: code.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wx::RawResponse;
    use serde_json::json;

    #[test]
    fn test_phone_number() {
        let action = phone_number("e31968a7f94cc5ee25fafc2aef2773f0bb8c3937b22520eb8ee345274d00c144");
        assert_eq!(action.path(), "/wxa/business/getuserphonenumber");
        assert_eq!(
            action.body_json().unwrap().unwrap(),
            json!({"code": "e31968a7f94cc5ee25fafc2aef2773f0bb8c3937b22520eb8ee345274d00c144"})
        );

        let result = action
            .decode(RawResponse::json(
                r#"{
                    "errcode": 0, "errmsg": "ok",
                    "phone_info": {
                        "phoneNumber": "xxxxxx",
                        "purePhoneNumber": "xxxxxx",
                        "countryCode": "86",
                        "watermark": {"timestamp": 1637744274, "appid": "xxxx"}
                    }
                }"#,
            ))
            .unwrap();
        assert_eq!(result.phone_info.country_code, "86");
        assert_eq!(result.phone_info.watermark.timestamp, 1637744274);
    }
}
