use crate::conversation::{ConversationTurn, ROLE_ASSISTANT, ROLE_USER};
use serde::{Deserialize, Serialize};

pub const MAX_NEW_TOKENS: u32 = 512;
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;

pub const NO_RESPONSE_CONTENT: &str = "no response content from the model";

// Raw inference wire contract

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInferencePayload {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64,
}

impl RawInferencePayload {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: MAX_NEW_TOKENS,
            do_sample: true,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInferenceResponse {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInferenceReply {
    pub generated_text: String,
    pub response_time: String,
}

// Conversational wire contract

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverseMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

impl ConverseMessage {
    /// Maps a turn onto the backend's message shape. Only "user" and
    /// "assistant" turns have a counterpart.
    pub fn from_turn(turn: &ConversationTurn) -> Option<Self> {
        let role = match turn.role.as_str() {
            ROLE_USER => ROLE_USER,
            ROLE_ASSISTANT => ROLE_ASSISTANT,
            _ => return None,
        };
        Some(Self {
            role: role.to_string(),
            content: vec![ContentBlock {
                text: turn.content.clone(),
            }],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    pub max_tokens: u32,
    pub stop_sequences: Vec<String>,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_tokens: MAX_NEW_TOKENS,
            stop_sequences: Vec::new(),
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalPayload {
    pub messages: Vec<ConverseMessage>,
    pub inference_config: InferenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalReply {
    pub success: bool,
    pub response: String,
    pub conversation_history: Vec<ConversationTurn>,
}
