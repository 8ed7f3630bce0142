//! # Tally
//!
//! Operator tool for the dispatch number cache of a running server.
//!
//! ## Usage
//!
//! Rescan and print.
//! ```sh
//! tally show
//! ```
//!
//! Someone typed `No.BHCP/2024/CAT/12-041` into the sheet by hand and the server handed out 035 again.
//! ```sh
//! tally set Letter 41
//! ```
//!
//! Any file type other than `Letter` moves the shared counter for everything else.
use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub mod models;

use models::{Numbers, NumbersResponse};

pub async fn fetch_numbers(server: &str) -> Result<Numbers> {
    let url = format!("{}/api/lastDispatchNumbers", server.trim_end_matches('/'));
    let response = Client::new()
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    read_numbers(response).await
}

pub async fn set_number(server: &str, file_type: &str, total: u64) -> Result<Numbers> {
    let url = format!("{}/api/updateLastDispatchNumber", server.trim_end_matches('/'));
    let response = Client::new()
        .post(&url)
        .json(&json!({ "type": file_type, "newTotal": total }))
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    read_numbers(response).await
}

#[derive(Deserialize)]
struct Failure {
    error: String,
}

async fn read_numbers(response: reqwest::Response) -> Result<Numbers> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let reason = serde_json::from_str::<Failure>(&text)
            .map(|f| f.error)
            .unwrap_or(text);
        bail!("Server responded with {status}: {reason}");
    }

    parse_numbers(&text)
}

pub fn parse_numbers(text: &str) -> Result<Numbers> {
    let body: NumbersResponse = serde_json::from_str(text).context("Unexpected response body")?;

    if !body.success {
        bail!("Server reported failure");
    }

    Ok(body.last_dispatch_numbers)
}

#[cfg(test)]
mod tests {
    use super::parse_numbers;

    #[test]
    fn test_parse_numbers() {
        let numbers = parse_numbers(
            r#"{"success":true,"lastDispatchNumbers":{"letters":35,"others":58}}"#,
        )
        .unwrap();

        assert_eq!(numbers.letters, 35);
        assert_eq!(numbers.others, 58);
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_numbers(r#"{"success":false,"lastDispatchNumbers":{"letters":0,"others":0}}"#).is_err());
        assert!(parse_numbers(r#"{"success":false,"error":"Missing field: type"}"#).is_err());
        assert!(parse_numbers("not json").is_err());
    }
}
