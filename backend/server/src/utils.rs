use axum::{body::Bytes, extract::Multipart};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::AppError::{self, MalformedPayload, MissingField};

const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub dispatch_number: Option<String>,
    pub file_type: Option<String>,
    pub date: Option<String>,
    pub subject: Option<String>,
    pub recipient: Option<String>,
    pub file_link: Option<String>,
}

/// One register row, columns A through F.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub dispatch_number: String,
    pub date: String,
    pub subject: String,
    pub file_type: String,
    pub recipient: String,
    pub file_link: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub new_total: Option<u64>,
}

pub struct UploadedFile {
    pub name: String,
    pub mime: String,
    pub data: Bytes,
}

pub fn today_formatted() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Present and non-empty.
pub fn required<T>(value: Option<T>, name: &'static str) -> Result<T, AppError>
where
    T: AsRef<str>,
{
    value
        .filter(|v| !v.as_ref().is_empty())
        .ok_or(MissingField(name))
}

impl EntryPayload {
    pub fn into_entry(self, today: &str) -> Result<Entry, AppError> {
        Ok(Entry {
            dispatch_number: required(self.dispatch_number, "dispatchNumber")?,
            file_type: required(self.file_type, "fileType")?,
            date: self
                .date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| today.to_string()),
            subject: self.subject.unwrap_or_default(),
            recipient: self.recipient.unwrap_or_default(),
            file_link: self.file_link.unwrap_or_default(),
        })
    }
}

impl Entry {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.dispatch_number.clone(),
            self.date.clone(),
            self.subject.clone(),
            self.file_type.clone(),
            self.recipient.clone(),
            self.file_link.clone(),
        ]
    }

    /// Missing trailing cells come back empty, Sheets drops them.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();

        Self {
            dispatch_number: cell(0),
            date: cell(1),
            subject: cell(2),
            file_type: cell(3),
            recipient: cell(4),
            file_link: cell(5),
        }
    }
}

/// Pulls the `file` part out of an upload form, `fileName` overrides its name.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file = None;
    let mut name_override = None;

    while let Some(field) = multipart.next_field().await.map_err(|_| MalformedPayload)? {
        let field_name = field.name().map(str::to_string);

        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().map(str::to_string);
                let mime = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
                let data = field.bytes().await.map_err(|_| MalformedPayload)?;

                file = Some((name, mime, data));
            }
            Some("fileName") => {
                name_override = Some(field.text().await.map_err(|_| MalformedPayload)?);
            }
            _ => {}
        }
    }

    let (name, mime, data) = file.ok_or(MissingField("file"))?;
    let name = required(name_override.or(name), "fileName")?;

    Ok(UploadedFile { name, mime, data })
}
