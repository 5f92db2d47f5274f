use super::mocks::MockTransport;
use chat_relay::{
    backend::{ConversationalBackend, RawInferenceBackend},
    handler::{CORS_HEADERS, Envelope, GatewayEvent, Handler},
};
use serde_json::{Value, json};
use std::sync::Arc;

pub const RAW_ENDPOINT: &str = "http://backend.test/generate";
pub const CONVERSE_ENDPOINT: &str = "http://backend.test/model/nova/converse";

pub fn raw_handler(transport: &MockTransport) -> Handler {
    Handler::new(
        Box::new(RawInferenceBackend::new(RAW_ENDPOINT)),
        Arc::new(transport.clone()),
    )
}

pub fn conversational_handler(transport: &MockTransport) -> Handler {
    Handler::new(
        Box::new(ConversationalBackend::new(CONVERSE_ENDPOINT)),
        Arc::new(transport.clone()),
    )
}

/// Gateway event whose body carries `request` as a JSON string
pub fn event_for(request: Value) -> GatewayEvent {
    GatewayEvent::with_body(request.to_string())
}

pub fn chat_event(message: &str) -> GatewayEvent {
    event_for(json!({ "message": message }))
}

pub fn raw_reply(text: &str, response_time: f64) -> Value {
    json!({ "generated_text": text, "response_time": response_time })
}

pub fn converse_reply(text: &str) -> Value {
    json!({
        "output": {
            "message": { "role": "assistant", "content": [{ "text": text }] }
        },
        "stopReason": "end_turn",
        "usage": { "inputTokens": 10, "outputTokens": 5, "totalTokens": 15 }
    })
}

pub fn assert_cors(envelope: &Envelope) {
    for (name, value) in CORS_HEADERS {
        assert_eq!(
            envelope.headers.get(name).map(String::as_str),
            Some(value),
            "missing or wrong header {}",
            name
        );
    }
}

/// The single error message carried by a failure envelope
pub fn error_message(envelope: &Envelope) -> String {
    let body = envelope.body_json().unwrap();
    assert_eq!(body["detail"][0]["type"], "server_error");
    assert_eq!(body["detail"][0]["loc"], json!(["function", 0]));
    body["detail"][0]["msg"].as_str().unwrap().to_string()
}
