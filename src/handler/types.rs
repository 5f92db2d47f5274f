use crate::{Error, Result, conversation::InboundRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

const CLAIM_EMAIL: &str = "email";
const CLAIM_USERNAME: &str = "cognito:username";

/// Gateway-style event. Fields other than `body` and `requestContext` are
/// kept only so the whole event can be logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<Map<String, Value>>,
}

impl GatewayEvent {
    /// Event whose body is the raw JSON text of a request.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(Value::String(body.into())),
            ..Default::default()
        }
    }

    pub fn with_claims(mut self, claims: Map<String, Value>) -> Self {
        self.request_context = Some(RequestContext {
            authorizer: Some(Authorizer {
                claims: Some(claims),
            }),
        });
        self
    }

    /// Display identifier of the authenticated caller: the email claim,
    /// else the username claim.
    pub fn caller_identity(&self) -> Option<&str> {
        let claims = self
            .request_context
            .as_ref()?
            .authorizer
            .as_ref()?
            .claims
            .as_ref()?;

        [CLAIM_EMAIL, CLAIM_USERNAME]
            .iter()
            .filter_map(|key| claims.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
    }

    /// Decodes the body into a request. The body is normally a JSON string;
    /// an already-decoded object is accepted as well.
    pub fn inbound_request(&self) -> Result<InboundRequest> {
        let request: InboundRequest = match &self.body {
            None | Some(Value::Null) => return Err(Error::bad_request("missing request body")),
            Some(Value::String(raw)) => serde_json::from_str(raw),
            Some(other) => serde_json::from_value(other.clone()),
        }
        .map_err(|e| Error::bad_request(format!("invalid request body: {}", e)))?;

        if request.message.is_empty() {
            return Err(Error::bad_request("'message' must not be empty"));
        }

        Ok(request)
    }
}

/// Fixed-shape response returned for every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub loc: (String, u32),
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

pub fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

impl Envelope {
    pub const OK: u16 = 200;
    pub const SERVER_ERROR: u16 = 500;

    pub fn ok(body: &Value) -> Self {
        Self {
            status_code: Self::OK,
            headers: cors_headers(),
            body: body.to_string(),
        }
    }

    /// Every error kind maps to the same status and generic marker; only the
    /// message text differs.
    pub fn failure(err: &Error) -> Self {
        let body = ErrorBody {
            detail: vec![ErrorDetail {
                loc: ("function".to_string(), 0),
                msg: format!("Error occurred: {}", err),
                error_type: "server_error".to_string(),
            }],
        };
        Self {
            status_code: Self::SERVER_ERROR,
            headers: cors_headers(),
            body: serde_json::to_string(&body).unwrap_or_default(),
        }
    }

    /// CORS preflight answer.
    pub fn preflight() -> Self {
        Self {
            status_code: Self::OK,
            headers: cors_headers(),
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Self::OK
    }

    pub fn body_json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
