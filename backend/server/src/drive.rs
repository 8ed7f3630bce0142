//! # Google Drive
//!
//! Uploaded files land in one folder, the register row keeps the link.
//!
//! ## Upload
//! - One request, `uploadType=multipart`: JSON metadata part then the raw file part, wrapped in `multipart/related`
//! - Drive wants `multipart/related`, not form data, so the body is put together by hand
//!
//! ## Sharing
//! - Links are opened by people without Drive access, so each upload gets an `anyone` reader permission
//! - Can be switched off with `SHARE_UPLOADS=false` when the folder is already shared
use axum::body::Bytes;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::AppError,
    google::{Credentials, check, endpoint},
};

const SERVICE: &str = "Drive";
const BOUNDARY: &str = "dispatch-upload-boundary";
const UPLOAD_FIELDS: &str = "id,name,webViewLink";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
}

#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    base_url: String,
    folder_id: Option<String>,
    credentials: Credentials,
}

impl DriveClient {
    pub fn new(
        client: Client,
        base_url: &str,
        folder_id: Option<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            folder_id,
            credentials,
        }
    }

    pub async fn upload(&self, name: &str, mime: &str, data: Bytes) -> Result<DriveFile, AppError> {
        let url = endpoint(&self.base_url, ["upload", "drive", "v3", "files"])?;
        let metadata = FileMetadata {
            name,
            parents: self.folder_id.as_deref().into_iter().collect(),
        };

        let metadata =
            serde_json::to_vec(&metadata).map_err(|e| AppError::InternalError(Box::new(e)))?;
        let body = related_body(&metadata, mime, &data);

        let response = self
            .client
            .post(url)
            .query(&[("uploadType", "multipart"), ("fields", UPLOAD_FIELDS)])
            .bearer_auth(self.credentials.bearer().await?)
            .header(CONTENT_TYPE, format!("multipart/related; boundary={BOUNDARY}"))
            .body(body)
            .send()
            .await?;

        Ok(check(SERVICE, response).await?.json().await?)
    }

    /// Anyone with the link can read.
    pub async fn share(&self, file_id: &str) -> Result<(), AppError> {
        let url = endpoint(&self.base_url, ["drive", "v3", "files", file_id, "permissions"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(self.credentials.bearer().await?)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;

        check(SERVICE, response).await?;

        Ok(())
    }
}

fn related_body(metadata: &[u8], mime: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + data.len() + 256);

    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}\r\nContent-Type: {mime}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    body
}

#[cfg(test)]
mod tests {
    use super::{BOUNDARY, DriveFile, related_body};

    #[test]
    fn test_related_body() {
        let body = related_body(br#"{"name":"a.pdf"}"#, "application/pdf", b"%PDF");
        let body = String::from_utf8(body).unwrap();

        assert!(body.starts_with(&format!("--{BOUNDARY}\r\n")));
        assert!(body.contains("{\"name\":\"a.pdf\"}\r\n"));
        assert!(body.contains("Content-Type: application/pdf\r\n\r\n%PDF\r\n"));
        assert!(body.ends_with(&format!("--{BOUNDARY}--\r\n")));
    }

    #[test]
    fn test_drive_file_without_link() {
        let file: DriveFile = serde_json::from_str(r#"{"id":"1","name":"a.pdf"}"#).unwrap();
        assert_eq!(file.web_view_link, None);
    }
}
