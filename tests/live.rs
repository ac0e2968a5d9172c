//! Smoke tests against the real service. They need `BASE_URL`, `API_KEY`,
//! `API_SECRET`, `PASSPHRASE` and `FUND_NAME` in the environment (or `.env`).
//! `INVESTOR_NUMBER`, `BROKER_ACCOUNTS` and `GL_ACCOUNTS` (semicolon separated)
//! narrow the investor and ledger reports when set:
//!
//! ```sh
//! cargo test --test live -- --ignored
//! ```

use chrono::NaiveDate;
use formidium::Client;
use serde_json::Value;

fn client() -> Client {
    let _ = env_logger::builder().is_test(true).try_init();
    Client::from_env().expect("live tests need BASE_URL, API_KEY, API_SECRET and PASSPHRASE")
}

fn fund_name() -> String {
    std::env::var("FUND_NAME").expect("live tests need FUND_NAME")
}

fn list_var(name: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.split(';').map(|item| item.trim().to_string()).collect()
        }
        _ => default.iter().map(|item| item.to_string()).collect(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn page_count(body: &Value) -> i64 {
    body["pageCount"].as_i64().unwrap_or_default()
}

#[test]
#[ignore]
fn live_portfolio_extract() {
    let body = client()
        .portfolio_extract(&fund_name(), date(2022, 1, 1), date(2022, 1, 1))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}

#[test]
#[ignore]
fn live_investor_allocation() {
    let investor = std::env::var("INVESTOR_NUMBER").ok();
    let body = client()
        .investor_allocation(
            &fund_name(),
            date(2021, 12, 31),
            date(2022, 1, 31),
            investor.as_deref(),
        )
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}

#[test]
#[ignore]
fn live_trades() {
    let body = client()
        .trades(&fund_name(), date(2022, 1, 1), date(2022, 1, 31))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}

#[test]
#[ignore]
fn live_positions() {
    let fund = fund_name();
    let body = client()
        .positions(&[fund.as_str()], date(2022, 1, 1))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}

#[test]
#[ignore]
fn live_performance() {
    let body = client()
        .performance(&fund_name(), date(2022, 1, 1), date(2022, 1, 31))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}

#[test]
#[ignore]
fn live_balance_sheet() {
    let fund = fund_name();
    let body = client()
        .balance_sheet(&[fund.as_str()], date(2022, 1, 31))
        .unwrap()
        .into_body()
        .unwrap();
    // The service spells the key this way.
    assert!(body.get("TotalNetAsets").is_some());
}

#[test]
#[ignore]
fn live_income_statement() {
    let fund = fund_name();
    let body = client()
        .income_statement(&[fund.as_str()], date(2022, 1, 1), date(2022, 1, 31))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(body.get("IncomesList").is_some());
}

#[test]
#[ignore]
fn live_ledger_accounts() {
    let body = client()
        .ledger_accounts(&fund_name())
        .unwrap()
        .into_body()
        .unwrap();
    assert!(body["resultList"].as_array().is_some_and(|list| !list.is_empty()));
}

#[test]
#[ignore]
fn live_custodian_accounts() {
    let body = client()
        .custodian_accounts(&fund_name())
        .unwrap()
        .into_body()
        .unwrap();
    assert!(body["resultList"].as_array().is_some_and(|list| !list.is_empty()));
}

#[test]
#[ignore]
fn live_ledger_account_detail() {
    let brokers = list_var("BROKER_ACCOUNTS", &["CY01", "Other"]);
    let gl_accounts = list_var(
        "GL_ACCOUNTS",
        &[
            "Capital Addition",
            "Investment In Cryptocurrencies, (At Cost)",
            "Performance Fees Payable",
            "Miscellaneous Income",
        ],
    );
    let brokers: Vec<&str> = brokers.iter().map(String::as_str).collect();
    let gl_accounts: Vec<&str> = gl_accounts.iter().map(String::as_str).collect();

    let body = client()
        .ledger_account_detail(
            &fund_name(),
            &brokers,
            &gl_accounts,
            date(2022, 1, 1),
            date(2022, 1, 31),
        )
        .unwrap()
        .into_body()
        .unwrap();
    assert!(body["resultList"].as_array().is_some_and(|list| !list.is_empty()));
}

#[test]
#[ignore]
fn live_fx_rates() {
    let body = client()
        .fx_rates("GBP", date(2021, 11, 30), date(2021, 12, 31))
        .unwrap()
        .into_body()
        .unwrap();
    assert!(page_count(&body) > 0);
}
