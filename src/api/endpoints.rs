use crate::models::common::parse_date;
use crate::services::formidium_service::FormidiumError;
use serde_json::{Map, Value};
use std::fmt;

/// Report endpoints exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PortfolioExtract,
    InvestorAllocation,
    Trades,
    Positions,
    Performance,
    BalanceSheet,
    IncomeStatement,
    LedgerAccount,
    CustodianAccount,
    GeneralLedgerWithCustodian,
    ExchangeRateData,
}

/// One row of the endpoint catalog.
#[derive(Debug)]
pub struct EndpointSpec {
    pub endpoint: Endpoint,
    pub path: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub date_fields: &'static [&'static str],
    pub paginated: bool,
}

// Indexed by `Endpoint as usize`; keep the order in sync with the enum.
pub static CATALOG: [EndpointSpec; 11] = [
    EndpointSpec {
        endpoint: Endpoint::PortfolioExtract,
        path: "portfolioExtract",
        required: &["startDate", "endDate", "fundName"],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::InvestorAllocation,
        path: "investorAllocationAllFrequency",
        required: &["startDate", "endDate", "fundName"],
        optional: &["investorNumber"],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::Trades,
        path: "trades",
        required: &["startDate", "endDate", "fundName"],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::Positions,
        path: "positionData",
        required: &["date", "fundList"],
        optional: &[],
        date_fields: &["date"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::Performance,
        path: "performanceData",
        required: &["startDate", "endDate", "fundName"],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::BalanceSheet,
        path: "balanceSheet",
        required: &["endDate", "fundList"],
        optional: &[],
        date_fields: &["endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::IncomeStatement,
        path: "incomeStatement",
        required: &["startDate", "endDate", "fundList"],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: false,
    },
    EndpointSpec {
        endpoint: Endpoint::LedgerAccount,
        path: "ledgerAccount",
        required: &["fundName"],
        optional: &[],
        date_fields: &[],
        paginated: false,
    },
    EndpointSpec {
        endpoint: Endpoint::CustodianAccount,
        path: "custodianAccount",
        required: &["fundName"],
        optional: &[],
        date_fields: &[],
        paginated: false,
    },
    EndpointSpec {
        endpoint: Endpoint::GeneralLedgerWithCustodian,
        path: "generalLedgerWithCustodian",
        required: &[
            "startDate",
            "endDate",
            "fundName",
            "brokerAccountList",
            "nameOfGLAccountList",
        ],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
    EndpointSpec {
        endpoint: Endpoint::ExchangeRateData,
        path: "exchangeRateData",
        required: &["destinationCurrency", "startDate", "endDate"],
        optional: &[],
        date_fields: &["startDate", "endDate"],
        paginated: true,
    },
];

impl Endpoint {
    pub const ALL: [Endpoint; 11] = [
        Endpoint::PortfolioExtract,
        Endpoint::InvestorAllocation,
        Endpoint::Trades,
        Endpoint::Positions,
        Endpoint::Performance,
        Endpoint::BalanceSheet,
        Endpoint::IncomeStatement,
        Endpoint::LedgerAccount,
        Endpoint::CustodianAccount,
        Endpoint::GeneralLedgerWithCustodian,
        Endpoint::ExchangeRateData,
    ];

    pub fn spec(self) -> &'static EndpointSpec {
        &CATALOG[self as usize]
    }

    pub fn path(self) -> &'static str {
        self.spec().path
    }

    /// Looks up an endpoint by path, ignoring surrounding slashes.
    pub fn from_path(path: &str) -> Option<Endpoint> {
        let path = path.trim_matches('/');
        CATALOG
            .iter()
            .find(|spec| spec.path == path)
            .map(|spec| spec.endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl EndpointSpec {
    /// Checks required fields and date formats, and fills in `page: 0` on
    /// paginated endpoints when the caller left it out.
    pub fn prepare(&self, body: Value) -> Result<Value, FormidiumError> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        for &field in self.required {
            if !fields.contains_key(field) {
                return Err(FormidiumError::MissingField {
                    endpoint: self.endpoint,
                    field,
                });
            }
        }

        for &field in self.date_fields {
            let valid = match fields.get(field) {
                Some(Value::String(value)) => parse_date(value).is_some(),
                Some(_) => false,
                None => true,
            };
            if !valid {
                return Err(FormidiumError::InvalidDate {
                    endpoint: self.endpoint,
                    field,
                });
            }
        }

        if self.paginated {
            fields.entry("page").or_insert(Value::from(0));
        }

        Ok(Value::Object(fields))
    }
}
