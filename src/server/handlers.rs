use crate::handler::{Envelope, GatewayEvent, Handler};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<Handler>,
}

/// Direct invocation: the request body is a full gateway event and the
/// envelope is returned as-is.
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<Envelope> {
    Json(state.handler.handle_json(&body).await)
}

/// Gateway-proxy mode: the request body becomes the event body and the
/// envelope is unpacked into a real HTTP response.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let event = GatewayEvent::with_body(String::from_utf8_lossy(&body));
    let envelope = state.handler.handle(event).await;
    proxy_response(envelope)
}

pub async fn preflight() -> Response {
    proxy_response(Envelope::preflight())
}

fn proxy_response(envelope: Envelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, envelope.body).into_response();

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Skipping invalid response header: {}", name),
        }
    }

    response
}
