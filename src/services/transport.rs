use crate::models::responses::RawResponse;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request error: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP client build error: {0}")]
    ClientBuildError(reqwest::Error),
}

/// A POST-with-headers capability. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: &Value, headers: HeaderMap)
        -> Result<RawResponse, TransportError>;
}

/// Blocking `reqwest` transport. Timeouts are whatever the wrapped client uses.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with reqwest's defaults. Fails if the TLS backend
    /// cannot be initialised.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(TransportError::ClientBuildError)?;
        Ok(ReqwestTransport { client })
    }

    /// Wraps a preconfigured client, e.g. one built with a request timeout.
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Transport for ReqwestTransport {
    fn post(
        &self,
        url: &str,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<RawResponse, TransportError> {
        let response = self.client.post(url).headers(headers).json(body).send()?;

        let status = response.status().as_u16();
        let text = response.text()?;

        Ok(RawResponse::new(status, text))
    }
}
