//! # Google Sheets
//!
//! The dispatch register lives in one tab of one spreadsheet.
//!
//! ## Schema
//! - A: dispatch number
//! - B: date
//! - C: subject
//! - D: file type
//! - E: recipient
//! - F: file link
//!
//! Row 1 is the header, typed in by hand when the sheet was created.
//!
//! ## Endpoints
//! - Read: `GET /v4/spreadsheets/{id}/values/{range}`, `values` is omitted when the range is empty
//! - Append: `POST /v4/spreadsheets/{id}/values/{range}:append`, values are parsed as if typed (`USER_ENTERED`)
use ledger::{Row, RowSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    google::{Credentials, check, endpoint},
};

const SERVICE: &str = "Sheets";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Row>,
}

#[derive(Serialize)]
struct AppendBody<'a> {
    values: [&'a [String]; 1],
}

#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    credentials: Credentials,
}

impl SheetsClient {
    pub fn new(client: Client, base_url: &str, spreadsheet_id: &str, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
        }
    }

    pub async fn get_rows(&self, range: &str) -> Result<Vec<Row>, AppError> {
        let url = endpoint(
            &self.base_url,
            ["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range],
        )?;

        let response = self
            .client
            .get(url)
            .bearer_auth(self.credentials.bearer().await?)
            .send()
            .await?;

        let value_range: ValueRange = check(SERVICE, response).await?.json().await?;

        Ok(value_range.values)
    }

    pub async fn append_row(&self, range: &str, values: &[String]) -> Result<(), AppError> {
        let append = format!("{range}:append");
        let url = endpoint(
            &self.base_url,
            ["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", append.as_str()],
        )?;

        let response = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(self.credentials.bearer().await?)
            .json(&AppendBody { values: [values] })
            .send()
            .await?;

        check(SERVICE, response).await?;

        Ok(())
    }
}

impl RowSource for SheetsClient {
    type Error = AppError;

    async fn get_rows(&self, range: &str) -> Result<Vec<Row>, AppError> {
        SheetsClient::get_rows(self, range).await
    }
}
