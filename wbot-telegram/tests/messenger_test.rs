//! Runs TelegramMessenger against a mockito server standing in for the Bot API.

use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use wbot_core::{Button, InboundEvent, Keyboard, Messenger};
use wbot_telegram::{TelegramConfig, TelegramMessenger};

const TOKEN: &str = "test-token";

fn messenger(server: &Server) -> TelegramMessenger {
    let mut config = TelegramConfig::with_token(TOKEN.to_string());
    config.telegram_api_url = Some(server.url());
    config.request_timeout = Duration::from_secs(5);
    config.error_backoff = Duration::from_millis(10);
    TelegramMessenger::new(&config).expect("messenger")
}

fn method_path(method: &str) -> Matcher {
    Matcher::Regex(format!("(?i)^/bot{}/{}$", TOKEN, method))
}

fn sent_message_json(chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": { "id": chat_id, "type": "private", "first_name": "Test" },
            "from": { "id": 1, "is_bot": true, "first_name": "Bot" },
            "text": text
        }
    })
}

#[tokio::test]
async fn test_get_updates_converts_batch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", method_path("getUpdates"))
        .match_body(Matcher::PartialJson(json!({ "offset": 100 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "ok": true,
                "result": [
                    {
                        "update_id": 100,
                        "message": {
                            "message_id": 5,
                            "date": 1_700_000_000,
                            "chat": { "id": 555, "type": "private", "first_name": "Test" },
                            "from": { "id": 42, "is_bot": false, "first_name": "Test" },
                            "text": "/start"
                        }
                    },
                    {
                        "update_id": 101,
                        "callback_query": {
                            "id": "cbq-1",
                            "from": { "id": 42, "is_bot": false, "first_name": "Test" },
                            "chat_instance": "ci",
                            "data": "add_city",
                            "message": {
                                "message_id": 6,
                                "date": 1_700_000_000,
                                "chat": { "id": 555, "type": "private", "first_name": "Test" },
                                "from": { "id": 1, "is_bot": true, "first_name": "Bot" },
                                "text": "pick"
                            }
                        }
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let updates = messenger(&server).get_updates(100, 0).await;

    mock.assert_async().await;
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].id, 100);
    assert_eq!(
        updates[0].event,
        Some(InboundEvent::TextMessage {
            chat_id: 555,
            user_id: 42,
            text: "/start".to_string(),
        })
    );
    assert_eq!(updates[1].id, 101);
    assert!(matches!(
        updates[1].event,
        Some(InboundEvent::CallbackQuery { ref data, .. }) if data == "add_city"
    ));
}

#[tokio::test]
async fn test_get_updates_failure_returns_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("getUpdates"))
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"error_code":500,"description":"Internal Server Error"}"#)
        .create_async()
        .await;

    let updates = messenger(&server).get_updates(0, 0).await;
    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_get_updates_malformed_returns_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("getUpdates"))
        .with_status(200)
        .with_body("definitely not json")
        .create_async()
        .await;

    let updates = messenger(&server).get_updates(0, 0).await;
    assert!(updates.is_empty());
}

#[tokio::test]
async fn test_send_message_with_inline_keyboard() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::PartialJson(json!({
            "chat_id": 555,
            "text": "Choose a city",
            "reply_markup": {
                "inline_keyboard": [[{ "text": "Oslo", "callback_data": "city_id:1" }]]
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(sent_message_json(555, "Choose a city").to_string())
        .create_async()
        .await;

    let keyboard = Keyboard::inline(vec![vec![Button::callback("Oslo", "city_id:1")]]);
    messenger(&server)
        .send_message(555, "Choose a city", Some(&keyboard))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("sendMessage"))
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#)
        .create_async()
        .await;

    let result = messenger(&server).send_message(555, "hi", None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_answer_callback_with_toast() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", method_path("answerCallbackQuery"))
        .match_body(Matcher::PartialJson(json!({
            "callback_query_id": "cbq-9",
            "text": "City not found"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"result":true}"#)
        .create_async()
        .await;

    messenger(&server)
        .answer_callback("cbq-9", Some("City not found"))
        .await
        .unwrap();

    mock.assert_async().await;
}
