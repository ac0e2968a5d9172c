use super::common::iso_date;
use crate::api::endpoints::Endpoint;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_TYPE};
use serde::Serialize;

pub const SIGNATURE_HEADER: &str = "signature";
pub const API_KEY_HEADER: &str = "x-api-key";
// The service documents these as `timeZone` and `timeStamp`. Header names are
// case-insensitive and the http crate only stores them lowercased.
pub const TIME_ZONE_HEADER: &str = "timezone";
pub const TIMESTAMP_HEADER: &str = "timestamp";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Authentication headers for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    pub signature: String,
    pub api_key: String,
    pub time_zone: String,
    /// Must equal the timestamp embedded in the signed message.
    pub timestamp_ms: i64,
    pub content_type: &'static str,
}

impl SignedHeader {
    pub fn new(
        signature: String,
        api_key: impl Into<String>,
        time_zone: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        SignedHeader {
            signature,
            api_key: api_key.into(),
            time_zone: time_zone.into(),
            timestamp_ms,
            content_type: JSON_CONTENT_TYPE,
        }
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&self.signature)?);
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&self.api_key)?);
        headers.insert(TIME_ZONE_HEADER, HeaderValue::from_str(&self.time_zone)?);
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from(self.timestamp_ms));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        Ok(headers)
    }
}

/// A typed request body bound to one report endpoint.
pub trait ReportRequest: Serialize {
    const ENDPOINT: Endpoint;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioExtractRequest {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_name: String,
    pub page: u32,
}

impl PortfolioExtractRequest {
    pub fn new(fund_name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        PortfolioExtractRequest {
            start_date,
            end_date,
            fund_name: fund_name.into(),
            page: 0,
        }
    }
}

impl ReportRequest for PortfolioExtractRequest {
    const ENDPOINT: Endpoint = Endpoint::PortfolioExtract;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorAllocationRequest {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_name: String,
    // Sent as null when absent; the service expects the key to be present.
    pub investor_number: Option<String>,
    pub page: u32,
}

impl InvestorAllocationRequest {
    pub fn new(
        fund_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        investor_number: Option<String>,
    ) -> Self {
        InvestorAllocationRequest {
            start_date,
            end_date,
            fund_name: fund_name.into(),
            investor_number,
            page: 0,
        }
    }
}

impl ReportRequest for InvestorAllocationRequest {
    const ENDPOINT: Endpoint = Endpoint::InvestorAllocation;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesRequest {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_name: String,
    pub page: u32,
}

impl TradesRequest {
    pub fn new(fund_name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        TradesRequest {
            start_date,
            end_date,
            fund_name: fund_name.into(),
            page: 0,
        }
    }
}

impl ReportRequest for TradesRequest {
    const ENDPOINT: Endpoint = Endpoint::Trades;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsRequest {
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub fund_list: Vec<String>,
    pub page: u32,
}

impl PositionsRequest {
    pub fn new(fund_list: Vec<String>, date: NaiveDate) -> Self {
        PositionsRequest {
            date,
            fund_list,
            page: 0,
        }
    }
}

impl ReportRequest for PositionsRequest {
    const ENDPOINT: Endpoint = Endpoint::Positions;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRequest {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_name: String,
    pub page: u32,
}

impl PerformanceRequest {
    pub fn new(fund_name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        PerformanceRequest {
            start_date,
            end_date,
            fund_name: fund_name.into(),
            page: 0,
        }
    }
}

impl ReportRequest for PerformanceRequest {
    const ENDPOINT: Endpoint = Endpoint::Performance;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetRequest {
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_list: Vec<String>,
    pub page: u32,
}

impl BalanceSheetRequest {
    pub fn new(fund_list: Vec<String>, end_date: NaiveDate) -> Self {
        BalanceSheetRequest {
            end_date,
            fund_list,
            page: 0,
        }
    }
}

impl ReportRequest for BalanceSheetRequest {
    const ENDPOINT: Endpoint = Endpoint::BalanceSheet;
}

/// Not paginated: the service returns the whole statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatementRequest {
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_list: Vec<String>,
}

impl IncomeStatementRequest {
    pub fn new(fund_list: Vec<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        IncomeStatementRequest {
            start_date,
            end_date,
            fund_list,
        }
    }
}

impl ReportRequest for IncomeStatementRequest {
    const ENDPOINT: Endpoint = Endpoint::IncomeStatement;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccountRequest {
    pub fund_name: String,
}

impl ReportRequest for LedgerAccountRequest {
    const ENDPOINT: Endpoint = Endpoint::LedgerAccount;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodianAccountRequest {
    pub fund_name: String,
}

impl ReportRequest for CustodianAccountRequest {
    const ENDPOINT: Endpoint = Endpoint::CustodianAccount;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerRequest {
    pub page: u32,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub fund_name: String,
    pub broker_account_list: Vec<String>,
    #[serde(rename = "nameOfGLAccountList")]
    pub gl_account_list: Vec<String>,
}

impl GeneralLedgerRequest {
    pub fn new(
        fund_name: impl Into<String>,
        broker_account_list: Vec<String>,
        gl_account_list: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        GeneralLedgerRequest {
            page: 0,
            start_date,
            end_date,
            fund_name: fund_name.into(),
            broker_account_list,
            gl_account_list,
        }
    }
}

impl ReportRequest for GeneralLedgerRequest {
    const ENDPOINT: Endpoint = Endpoint::GeneralLedgerWithCustodian;
}

/// USD to `destination_currency` rates over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateRequest {
    pub destination_currency: String,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub page: u32,
}

impl ExchangeRateRequest {
    pub fn new(
        destination_currency: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        ExchangeRateRequest {
            destination_currency: destination_currency.into(),
            start_date,
            end_date,
            page: 0,
        }
    }
}

impl ReportRequest for ExchangeRateRequest {
    const ENDPOINT: Endpoint = Endpoint::ExchangeRateData;
}
