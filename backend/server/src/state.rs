use std::sync::Arc;

use ledger::DispatchNumbers;
use reqwest::Client;

use super::{config::Config, drive::DriveClient, sheets::SheetsClient};

pub struct AppState {
    pub config: Config,
    pub sheets: SheetsClient,
    pub drive: DriveClient,
    pub numbers: DispatchNumbers,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Arc<Self>> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let sheets = SheetsClient::new(
            client.clone(),
            &config.sheets_url,
            &config.spreadsheet_id,
            config.credentials.clone(),
        );
        let drive = DriveClient::new(
            client,
            &config.drive_url,
            config.drive_folder_id.clone(),
            config.credentials.clone(),
        );

        Ok(Arc::new(Self {
            config,
            sheets,
            drive,
            numbers: DispatchNumbers::new(),
        }))
    }
}
