use async_trait::async_trait;
use chat_relay::{Error, Result, backend::Transport};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Canned outcome of one backend call
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(Value),
    HttpError { status: u16, body: String },
    ConnectionError(String),
}

/// Mock transport for testing
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub replies: Arc<Mutex<Vec<MockReply>>>,
    pub requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_json(self, value: Value) -> Self {
        self.with_reply(MockReply::Json(value))
    }

    pub fn get_requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::internal("No more mock replies available"));
        }

        match replies.remove(0) {
            MockReply::Json(value) => Ok(value),
            MockReply::HttpError { status, body } => Err(Error::UpstreamHttp { status, body }),
            MockReply::ConnectionError(reason) => Err(Error::connection(reason)),
        }
    }
}
