use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// The service always answers with this wrapper, discriminated by `title`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "title")]
pub enum ResponseEnvelope {
    Success {
        #[serde(rename = "responseBody", default)]
        response_body: Value,
    },
    Error {
        #[serde(rename = "errorObject", default)]
        error_object: Value,
    },
}

/// Status code and untouched body text, as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Result of a successful call, shaped by the client's response mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `responseBody` of a `Success` envelope.
    Body(Value),
    /// Transport response passed through without interpreting the envelope.
    Raw(RawResponse),
}

impl Reply {
    pub fn body(&self) -> Option<&Value> {
        match self {
            Reply::Body(body) => Some(body),
            Reply::Raw(_) => None,
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Reply::Body(body) => Some(body),
            Reply::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&RawResponse> {
        match self {
            Reply::Raw(raw) => Some(raw),
            Reply::Body(_) => None,
        }
    }
}
