mod types;

pub use types::*;

use crate::{
    Error, Result,
    backend::{self, Backend, HttpTransport, Transport},
    config::{BackendConfig, BackendKind},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

/// Turns one gateway event into one envelope, calling the backend at most
/// once. Never fails: every error becomes a failure envelope.
pub struct Handler {
    backend: Box<dyn Backend>,
    transport: Arc<dyn Transport>,
}

impl Handler {
    pub fn new(backend: Box<dyn Backend>, transport: Arc<dyn Transport>) -> Self {
        Self { backend, transport }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(backend::from_config(config), Arc::new(HttpTransport::new()))
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }

    pub async fn handle(&self, event: GatewayEvent) -> Envelope {
        self.respond(self.process(event)).await
    }

    /// Same as [`Handler::handle`] for an event that has not been decoded yet.
    pub async fn handle_json(&self, raw: &[u8]) -> Envelope {
        self.respond(async {
            let event = serde_json::from_slice::<GatewayEvent>(raw).map_err(|e| {
                debug!("Received event: {}", String::from_utf8_lossy(raw));
                Error::bad_request(format!("invalid event: {}", e))
            })?;
            self.process(event).await
        })
        .await
    }

    /// Runs one invocation inside its own span and folds the outcome into an
    /// envelope.
    async fn respond<F>(&self, invocation: F) -> Envelope
    where
        F: Future<Output = Result<Value>>,
    {
        let request_id = Uuid::new_v4();
        let span = info_span!("invocation", %request_id, backend = %self.backend.kind());

        async {
            match invocation.await {
                Ok(body) => Envelope::ok(&body),
                Err(e) => {
                    error!(kind = e.kind(), "Error occurred: {}", e);
                    Envelope::failure(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn process(&self, event: GatewayEvent) -> Result<Value> {
        debug!(
            "Received event: {}",
            serde_json::to_string(&event).unwrap_or_default()
        );

        if let Some(user) = event.caller_identity() {
            info!("Authenticated user: {}", user);
        }

        let request = event.inbound_request()?;
        info!(
            history_len = request.conversation_history.len(),
            "Processing message: {}", request.message
        );

        let payload = self.backend.build_payload(&request)?;
        let response = self
            .transport
            .post_json(self.backend.endpoint(), &payload)
            .await?;

        self.backend.parse_response(request, response)
    }
}
