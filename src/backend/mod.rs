mod conversational;
mod raw;
mod transport;
mod types;

pub use conversational::ConversationalBackend;
pub use raw::{RawInferenceBackend, format_response_time, unescape_newlines};
pub use transport::{HttpTransport, Transport};
pub use types::*;

use crate::{
    Result,
    config::{BackendConfig, BackendKind},
    conversation::InboundRequest,
};
use serde_json::Value;

/// Request/response shaping for one kind of text-generation backend.
///
/// Implementations never perform I/O; the handler sends the built payload
/// through a [`Transport`] and hands the decoded reply back to
/// [`Backend::parse_response`].
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// URL the payload is posted to.
    fn endpoint(&self) -> &str;

    fn build_payload(&self, request: &InboundRequest) -> Result<Value>;

    /// Validates the backend reply and produces the success body.
    fn parse_response(&self, request: InboundRequest, response: Value) -> Result<Value>;
}

/// Selects the backend variant once, at start-up.
pub fn from_config(config: &BackendConfig) -> Box<dyn Backend> {
    let endpoint = config.resolved_endpoint();
    match config.kind {
        BackendKind::RawInference => Box::new(RawInferenceBackend::new(endpoint)),
        BackendKind::Conversational => Box::new(ConversationalBackend::new(endpoint)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_config_selects_variant() {
        let mut config = BackendConfig::default();
        assert_eq!(from_config(&config).kind(), BackendKind::RawInference);

        config.kind = BackendKind::Conversational;
        assert_eq!(from_config(&config).kind(), BackendKind::Conversational);
    }

    #[test]
    fn test_from_config_fills_model_placeholder() {
        let config = BackendConfig {
            kind: BackendKind::Conversational,
            endpoint_url: "https://runtime.example.com/model/{model_id}/converse".to_string(),
            model_id: "nova-lite".to_string(),
        };

        let backend = from_config(&config);
        assert_eq!(
            backend.endpoint(),
            "https://runtime.example.com/model/nova-lite/converse"
        );
    }
}
