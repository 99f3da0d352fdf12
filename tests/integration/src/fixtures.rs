//! Event builders for integration tests

use chat_core::ChatId;
use serde_json::{json, Value};

pub fn connect(user: i64) -> Value {
    json!({"type": "connect", "data": {}, "created_by": user})
}

pub fn join(user: i64, chat_id: ChatId) -> Value {
    json!({"type": "join", "data": {"chat_id": chat_id}, "created_by": user})
}

pub fn send_message(user: i64, chat_id: ChatId, content: &str) -> Value {
    json!({
        "type": "send_message",
        "data": {"chat_id": chat_id, "content": content},
        "created_by": user
    })
}

pub fn typing(user: i64, chat_id: ChatId, is_typing: bool) -> Value {
    json!({
        "type": "typing",
        "data": {"chat_id": chat_id, "is_typing": is_typing},
        "created_by": user
    })
}
