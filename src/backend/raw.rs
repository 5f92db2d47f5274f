use super::{
    Backend, NO_RESPONSE_CONTENT, RawInferencePayload, RawInferenceReply, RawInferenceResponse,
};
use crate::{Error, Result, config::BackendKind, conversation::InboundRequest};
use serde_json::Value;
use tracing::debug;

/// Single-prompt inference endpoint. Conversation history is accepted on the
/// inbound side but never reaches the prompt.
pub struct RawInferenceBackend {
    endpoint: String,
}

impl RawInferenceBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Backend for RawInferenceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::RawInference
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_payload(&self, request: &InboundRequest) -> Result<Value> {
        let payload = RawInferencePayload::new(request.message.as_str());
        Ok(serde_json::to_value(payload)?)
    }

    fn parse_response(&self, _request: InboundRequest, response: Value) -> Result<Value> {
        // serde would otherwise read a JSON array positionally
        if !response.is_object() {
            return Err(Error::malformed(NO_RESPONSE_CONTENT));
        }

        let response: RawInferenceResponse = serde_json::from_value(response)
            .map_err(|e| Error::malformed(format!("unexpected response shape: {}", e)))?;

        let generated_text = response
            .generated_text
            .map(|text| unescape_newlines(&text))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::malformed(NO_RESPONSE_CONTENT))?;

        let response_time = response
            .response_time
            .ok_or_else(|| Error::malformed("missing 'response_time' in backend response"))?;

        debug!("External API response: {}", generated_text);

        let reply = RawInferenceReply {
            generated_text,
            response_time: format_response_time(response_time),
        };
        Ok(serde_json::to_value(reply)?)
    }
}

/// Turns the two-character sequence `\n` into a real line break.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

pub fn format_response_time(seconds: f64) -> String {
    format!("{:.3}", seconds)
}
