//! Mini Program facade against a mock server.

use wechat_sdk::client::WechatClient;
use wechat_sdk::minip::qrcode::CodeStyle;
use wechat_sdk::minip::subscribe::SubscribeMessage;
use wechat_sdk::minip::{self, Minip};
use wechat_sdk::types::{AppId, AppSecret};
use wechat_sdk::WechatError;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_minip(base_url: &str) -> Minip {
    let client = WechatClient::builder().base_url(base_url).build().unwrap();
    Minip::builder()
        .appid(AppId::new("wx1234567890abcdef").unwrap())
        .secret(AppSecret::new("secret1234567890ab").unwrap())
        .client(client)
        .build()
        .unwrap()
}

async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "minip_token",
            "expires_in": 7200
        })))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_code_to_session_uses_app_secret_not_token() {
    let server = MockServer::start().await;
    mount_token(&server, 0).await;
    Mock::given(method("GET"))
        .and(path("/sns/jscode2session"))
        .and(query_param("appid", "wx1234567890abcdef"))
        .and(query_param("secret", "secret1234567890ab"))
        .and(query_param("js_code", "login_code"))
        .and(query_param("grant_type", "authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "openid": "oUser",
            "session_key": "tiihtNczf5v6AKRyjwEUhQ==",
            "unionid": "oUnion"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let session = minip.code_to_session("login_code").await.unwrap();
    assert_eq!(session.openid, "oUser");
    assert_eq!(session.unionid.as_deref(), Some("oUnion"));
    assert!(!format!("{session:?}").contains("tiihtNczf5v6AKRyjwEUhQ=="));
}

#[tokio::test]
async fn test_invalid_code_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sns/jscode2session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 40029,
            "errmsg": "invalid code"
        })))
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let err = minip.code_to_session("bad").await.unwrap_err();
    assert!(matches!(err, WechatError::Api { code: 40029, .. }));
}

#[tokio::test]
async fn test_wxa_code_returns_image_bytes() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/wxa/getwxacodeunlimit"))
        .and(query_param("access_token", "minip_token"))
        .and(body_json(serde_json::json!({"scene": "id=42", "width": 430})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let image = minip
        .execute(minip::qrcode::wxa_code_unlimited(
            "id=42",
            None,
            true,
            CodeStyle::default().width(430),
        ))
        .await
        .unwrap();
    assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_wxa_code_json_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/wxa/getwxacode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 45029,
            "errmsg": "qrcode count out of limit"
        })))
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let err = minip
        .execute(minip::qrcode::wxa_code("pages/index", CodeStyle::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, WechatError::Api { code: 45029, .. }));
}

#[tokio::test]
async fn test_phone_number_and_subscribe_send() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/wxa/business/getuserphonenumber"))
        .and(body_json(serde_json::json!({"code": "phone_code"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errcode": 0,
            "errmsg": "ok",
            "phone_info": {
                "phoneNumber": "+86 13800138000",
                "purePhoneNumber": "13800138000",
                "countryCode": "86",
                "watermark": {"timestamp": 1637744274, "appid": "wx1234567890abcdef"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/message/subscribe/send"))
        .and(query_param("access_token", "minip_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let phone = minip
        .execute(minip::user::phone_number("phone_code"))
        .await
        .unwrap();
    assert_eq!(phone.phone_info.pure_phone_number, "13800138000");
    assert!(phone.phone_info.watermark.is_from(minip.appid()));

    minip
        .execute(minip::subscribe::send(
            SubscribeMessage::new("oUser", "tmpl").data("thing1", "shipped"),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_check_session_signs_with_session_key() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/wxa/checksession"))
        .and(query_param("openid", "oUser"))
        .and(query_param("sig_method", "hmac_sha256"))
        .and(query_param(
            "signature",
            "5d5d139563c95b5967b9bd9a8c9b233a9dedb45072794cd232dc1b74832607d0",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let minip = create_minip(&server.uri());
    let action = minip::auth::check_session("oUser", "key").unwrap();
    minip.execute(action).await.unwrap();
}
