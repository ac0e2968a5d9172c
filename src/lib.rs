//! Signed client for the Formidium fund-administration reporting API.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use formidium::{Client, ClientConfig, Credentials};
//!
//! let config = ClientConfig::new(
//!     "https://api.example.com/v1",
//!     Credentials::new("api-key", "api-secret", "passphrase"),
//! );
//! let client = Client::new(config)?;
//! let reply = client.portfolio_extract(
//!     "Example Fund",
//!     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2022, 1, 31).unwrap(),
//! )?;
//! println!("{:?}", reply.body());
//! # Ok::<(), formidium::FormidiumError>(())
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod services;

pub use api::endpoints::{Endpoint, EndpointSpec};
pub use config::{ClientConfig, ConfigError, ResponseMode};
pub use models::common::Credentials;
pub use models::requests::{ReportRequest, SignedHeader};
pub use models::responses::{RawResponse, Reply, ResponseEnvelope};
pub use services::crypto::{open_signature, sign, verify_signature, CryptoError, Signer};
pub use services::formidium_service::{join_url, Client, FormidiumError};
pub use services::transport::{ReqwestTransport, Transport, TransportError};
