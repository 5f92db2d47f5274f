use super::{
    Backend, ConversationalPayload, ConversationalReply, ConverseMessage, InferenceConfig,
    NO_RESPONSE_CONTENT,
};
use crate::{
    Error, Result,
    config::BackendKind,
    conversation::{ConversationTurn, InboundRequest},
};
use serde_json::Value;
use tracing::debug;

const RESPONSE_TEXT_POINTER: &str = "/output/message/content/0/text";

/// Hosted conversational model taking the whole message list per call.
pub struct ConversationalBackend {
    endpoint: String,
}

impl ConversationalBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

/// Copy of the inbound history with the new user turn appended.
fn outbound_turns(request: &InboundRequest) -> Vec<ConversationTurn> {
    let mut turns = request.conversation_history.clone();
    turns.push(ConversationTurn::user(request.message.as_str()));
    turns
}

impl Backend for ConversationalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Conversational
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_payload(&self, request: &InboundRequest) -> Result<Value> {
        let turns = outbound_turns(request);

        // TODO: decide whether unknown roles should fail the request instead of
        // being dropped from the outbound list.
        let messages: Vec<ConverseMessage> =
            turns.iter().filter_map(ConverseMessage::from_turn).collect();
        if messages.len() != turns.len() {
            debug!(
                "Dropped {} turn(s) with unsupported roles from outbound payload",
                turns.len() - messages.len()
            );
        }

        let payload = ConversationalPayload {
            messages,
            inference_config: InferenceConfig::default(),
        };
        Ok(serde_json::to_value(payload)?)
    }

    fn parse_response(&self, request: InboundRequest, response: Value) -> Result<Value> {
        let text = response
            .pointer(RESPONSE_TEXT_POINTER)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::malformed(NO_RESPONSE_CONTENT))?;

        debug!("Model response: {}", text);

        let mut conversation_history = outbound_turns(&request);
        conversation_history.push(ConversationTurn::assistant(text));

        let reply = ConversationalReply {
            success: true,
            response: text.to_string(),
            conversation_history,
        };
        Ok(serde_json::to_value(reply)?)
    }
}
