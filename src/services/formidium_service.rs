use crate::api::endpoints::Endpoint;
use crate::config::{ClientConfig, ConfigError, ResponseMode};
use crate::models::requests::{ReportRequest, SignedHeader};
use crate::models::responses::{RawResponse, Reply, ResponseEnvelope};
use crate::services::crypto::{CryptoError, Signer};
use crate::services::transport::{ReqwestTransport, Transport, TransportError};
use log::{debug, error, info, warn};
use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

/// Sent when the host cannot report its IANA zone.
pub const FALLBACK_TIME_ZONE: &str = "UTC";

#[derive(Error, Debug)]
pub enum FormidiumError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Response is not a valid envelope: {0}")]
    Protocol(String),

    #[error("API returned an error: {0}")]
    Api(Value),

    #[error("Failed to sign request: {0}")]
    Signing(#[from] CryptoError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing required field `{field}` for endpoint {endpoint}")]
    MissingField {
        endpoint: Endpoint,
        field: &'static str,
    },

    #[error("Field `{field}` for endpoint {endpoint} must be a YYYY-MM-DD date")]
    InvalidDate {
        endpoint: Endpoint,
        field: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Joins base URL and endpoint path with exactly one slash between them.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Strict-mode handling: unwraps `responseBody`, or fails with the error payload.
pub fn interpret_envelope(response: RawResponse) -> Result<Value, FormidiumError> {
    match serde_json::from_str::<ResponseEnvelope>(&response.body) {
        Ok(ResponseEnvelope::Success { response_body }) => Ok(response_body),
        Ok(ResponseEnvelope::Error { error_object }) => {
            error!("API returned an error: {}", error_object);
            Err(FormidiumError::Api(error_object))
        }
        Err(e) => {
            error!(
                "Could not parse response envelope (status {}): {}",
                response.status, e
            );
            Err(FormidiumError::Protocol(response.body))
        }
    }
}

fn resolve_time_zone(configured: Option<String>) -> String {
    if let Some(time_zone) = configured {
        return time_zone;
    }

    match iana_time_zone::get_timezone() {
        Ok(time_zone) => time_zone,
        Err(e) => {
            warn!(
                "Could not determine local time zone ({}), using {}",
                e, FALLBACK_TIME_ZONE
            );
            FALLBACK_TIME_ZONE.to_string()
        }
    }
}

/// Signed client for the fund-administration API.
///
/// Credentials and the time-zone name are fixed at construction. Every call
/// computes its own timestamp and signature, so a shared `&Client` can be used
/// from several threads at once.
pub struct Client<T = ReqwestTransport> {
    base_url: String,
    signer: Signer,
    time_zone: String,
    response_mode: ResponseMode,
    transport: T,
}

impl Client<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, FormidiumError> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }

    pub fn from_env() -> Result<Self, FormidiumError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, FormidiumError> {
        let signer = Signer::new(config.credentials)?;
        let time_zone = resolve_time_zone(config.time_zone);

        info!(
            "Formidium client initialized for {} (time zone {}, {:?} mode)",
            config.base_url, time_zone, config.response_mode
        );

        Ok(Client {
            base_url: config.base_url,
            signer,
            time_zone,
            response_mode: config.response_mode,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn response_mode(&self) -> ResponseMode {
        self.response_mode
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    pub fn signed_header(&self, timestamp_ms: i64) -> Result<SignedHeader, FormidiumError> {
        Ok(self.signer.signed_header(&self.time_zone, timestamp_ms)?)
    }

    /// Signs and POSTs `body` to `endpoint`. Nothing is retried.
    pub fn call(&self, endpoint: &str, body: &Value) -> Result<Reply, FormidiumError> {
        let url = self.url_for(endpoint);
        info!("Making POST request to {}", url);
        debug!("Request body: {}", body);

        // The same value goes into the signed message and the timeStamp header.
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let headers = self.signed_header(timestamp_ms)?.to_header_map()?;

        let response = self.transport.post(&url, body, headers)?;
        debug!("Received status {} from {}", response.status, url);

        match self.response_mode {
            ResponseMode::Raw => Ok(Reply::Raw(response)),
            ResponseMode::Strict => {
                let body = interpret_envelope(response)?;
                info!("Request to {} succeeded", url);
                debug!("Response: {}", body);
                Ok(Reply::Body(body))
            }
        }
    }

    /// Like `call`, but checks `body` against the endpoint catalog first.
    pub fn call_endpoint(&self, endpoint: Endpoint, body: Value) -> Result<Reply, FormidiumError> {
        let body = endpoint.spec().prepare(body)?;
        self.call(endpoint.path(), &body)
    }

    pub fn report<R: ReportRequest>(&self, request: &R) -> Result<Reply, FormidiumError> {
        let body = serde_json::to_value(request)?;
        self.call_endpoint(R::ENDPOINT, body)
    }
}
