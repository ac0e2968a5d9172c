//! One method per report endpoint. Paginated reports always request page 0;
//! fetching later pages is left to the caller via `Client::call_endpoint`.

use crate::models::requests::{
    BalanceSheetRequest, CustodianAccountRequest, ExchangeRateRequest, GeneralLedgerRequest,
    IncomeStatementRequest, InvestorAllocationRequest, LedgerAccountRequest, PerformanceRequest,
    PortfolioExtractRequest, PositionsRequest, TradesRequest,
};
use crate::models::responses::Reply;
use crate::services::formidium_service::{Client, FormidiumError};
use crate::services::transport::Transport;
use chrono::NaiveDate;

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl<T: Transport> Client<T> {
    /// A portfolio extract of the fund over a date range.
    pub fn portfolio_extract(
        &self,
        fund_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&PortfolioExtractRequest::new(fund_name, start_date, end_date))
    }

    /// Allocation for one investor, or all investors when `investor_number` is `None`.
    pub fn investor_allocation(
        &self,
        fund_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        investor_number: Option<&str>,
    ) -> Result<Reply, FormidiumError> {
        self.report(&InvestorAllocationRequest::new(
            fund_name,
            start_date,
            end_date,
            investor_number.map(str::to_string),
        ))
    }

    pub fn trades(
        &self,
        fund_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&TradesRequest::new(fund_name, start_date, end_date))
    }

    /// Positions of one or more funds on a single date.
    pub fn positions(&self, fund_names: &[&str], date: NaiveDate) -> Result<Reply, FormidiumError> {
        self.report(&PositionsRequest::new(owned(fund_names), date))
    }

    /// Rates of return in several frequencies, along with fees.
    pub fn performance(
        &self,
        fund_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&PerformanceRequest::new(fund_name, start_date, end_date))
    }

    pub fn balance_sheet(
        &self,
        fund_names: &[&str],
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&BalanceSheetRequest::new(owned(fund_names), end_date))
    }

    pub fn income_statement(
        &self,
        fund_names: &[&str],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&IncomeStatementRequest::new(
            owned(fund_names),
            start_date,
            end_date,
        ))
    }

    pub fn ledger_accounts(&self, fund_name: &str) -> Result<Reply, FormidiumError> {
        self.report(&LedgerAccountRequest {
            fund_name: fund_name.to_string(),
        })
    }

    pub fn custodian_accounts(&self, fund_name: &str) -> Result<Reply, FormidiumError> {
        self.report(&CustodianAccountRequest {
            fund_name: fund_name.to_string(),
        })
    }

    /// General-ledger detail for the given broker accounts and GL account names.
    pub fn ledger_account_detail(
        &self,
        fund_name: &str,
        broker_account_numbers: &[&str],
        gl_accounts: &[&str],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&GeneralLedgerRequest::new(
            fund_name,
            owned(broker_account_numbers),
            owned(gl_accounts),
            start_date,
            end_date,
        ))
    }

    /// USD exchange rates into `destination_currency` over a date range.
    pub fn fx_rates(
        &self,
        destination_currency: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Reply, FormidiumError> {
        self.report(&ExchangeRateRequest::new(
            destination_currency,
            start_date,
            end_date,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::models::common::Credentials;
    use crate::models::responses::RawResponse;
    use crate::services::formidium_service::Client;
    use crate::services::transport::{Transport, TransportError};
    use chrono::NaiveDate;
    use reqwest::header::HeaderMap;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    // Records what was sent and answers every request with an empty success.
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, Value)>>,
    }

    impl Transport for Recorder {
        fn post(
            &self,
            url: &str,
            body: &Value,
            _headers: HeaderMap,
        ) -> Result<RawResponse, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            Ok(RawResponse::new(
                200,
                r#"{"title":"Success","responseBody":{"pageCount":1}}"#,
            ))
        }
    }

    fn client() -> Client<Recorder> {
        let config = ClientConfig::new("https://api.example.com/", Credentials::new("k", "s", "p"))
            .with_time_zone("UTC");
        Client::with_transport(config, Recorder::default()).unwrap()
    }

    fn last_sent(client: &Client<Recorder>) -> (String, Value) {
        client.transport().sent.lock().unwrap().last().cloned().unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_portfolio_extract() {
        let client = client();
        let reply = client
            .portfolio_extract("X", date(2022, 1, 1), date(2022, 1, 31))
            .unwrap();
        assert_eq!(reply.into_body(), Some(json!({"pageCount": 1})));

        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/portfolioExtract");
        assert_eq!(
            body,
            json!({"startDate": "2022-01-01", "endDate": "2022-01-31", "fundName": "X", "page": 0})
        );
    }

    #[test]
    fn test_investor_allocation() {
        let client = client();
        client
            .investor_allocation("X", date(2021, 12, 31), date(2022, 1, 31), Some("INV01"))
            .unwrap();

        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/investorAllocationAllFrequency");
        assert_eq!(body["investorNumber"], "INV01");
        assert_eq!(body["page"], 0);
    }

    #[test]
    fn test_list_based_reports() {
        let client = client();

        client.positions(&["A", "B"], date(2022, 1, 1)).unwrap();
        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/positionData");
        assert_eq!(
            body,
            json!({"date": "2022-01-01", "fundList": ["A", "B"], "page": 0})
        );

        client.balance_sheet(&["A"], date(2022, 1, 31)).unwrap();
        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/balanceSheet");
        assert_eq!(body, json!({"endDate": "2022-01-31", "fundList": ["A"], "page": 0}));

        client
            .income_statement(&["A"], date(2022, 1, 1), date(2022, 1, 31))
            .unwrap();
        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/incomeStatement");
        assert_eq!(
            body,
            json!({"startDate": "2022-01-01", "endDate": "2022-01-31", "fundList": ["A"]})
        );
    }

    #[test]
    fn test_fund_scoped_reports() {
        let client = client();
        let (start, end) = (date(2022, 1, 1), date(2022, 1, 31));

        client.trades("X", start, end).unwrap();
        assert_eq!(last_sent(&client).0, "https://api.example.com/trades");

        client.performance("X", start, end).unwrap();
        assert_eq!(last_sent(&client).0, "https://api.example.com/performanceData");

        client.ledger_accounts("X").unwrap();
        assert_eq!(
            last_sent(&client),
            (
                "https://api.example.com/ledgerAccount".to_string(),
                json!({"fundName": "X"})
            )
        );

        client.custodian_accounts("X").unwrap();
        assert_eq!(
            last_sent(&client),
            (
                "https://api.example.com/custodianAccount".to_string(),
                json!({"fundName": "X"})
            )
        );
    }

    #[test]
    fn test_ledger_account_detail() {
        let client = client();
        client
            .ledger_account_detail(
                "X",
                &["CY01", "Other"],
                &["Capital Addition", "Miscellaneous Income"],
                date(2022, 1, 1),
                date(2022, 1, 31),
            )
            .unwrap();

        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/generalLedgerWithCustodian");
        assert_eq!(body["brokerAccountList"], json!(["CY01", "Other"]));
        assert_eq!(
            body["nameOfGLAccountList"],
            json!(["Capital Addition", "Miscellaneous Income"])
        );
    }

    #[test]
    fn test_fx_rates() {
        let client = client();
        client
            .fx_rates("GBP", date(2021, 11, 30), date(2021, 12, 31))
            .unwrap();

        let (url, body) = last_sent(&client);
        assert_eq!(url, "https://api.example.com/exchangeRateData");
        assert_eq!(
            body,
            json!({
                "destinationCurrency": "GBP",
                "startDate": "2021-11-30",
                "endDate": "2021-12-31",
                "page": 0
            })
        );
    }
}
