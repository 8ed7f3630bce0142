//! # Google APIs
//!
//! Shared plumbing for the Sheets and Drive clients.
//!
//! ## Credentials
//!
//! Both APIs take an OAuth bearer token. Minting tokens is not our job, either
//! - a fixed token is passed through `GOOGLE_ACCESS_TOKEN`, fine for short lived runs
//! - or a sidecar keeps `/run/secrets/GOOGLE_ACCESS_TOKEN` fresh and we re-read it on every call
use std::path::PathBuf;

use reqwest::{Response, Url};
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub enum Credentials {
    Fixed(String),
    Secret(PathBuf),
}

impl Credentials {
    pub async fn bearer(&self) -> Result<String, AppError> {
        match self {
            Credentials::Fixed(token) => Ok(token.clone()),
            Credentials::Secret(path) => Ok(tokio::fs::read_to_string(path).await?.trim().to_string()),
        }
    }
}

/// Passes 2xx responses through, turns anything else into [`AppError::Upstream`].
pub async fn check(service: &'static str, response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("{service} request failed with {status}: {body}");

    Err(AppError::Upstream {
        service,
        status: status.as_u16(),
        body,
    })
}

/// `base` with `segments` appended, each one percent-encoded.
pub fn endpoint<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, AppError> {
    let mut url = Url::parse(base).map_err(|e| AppError::InternalError(Box::new(e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::InternalError(format!("{base} cannot be a base URL").into()))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::endpoint;

    #[test]
    fn test_endpoint() {
        let url = endpoint("https://sheets.googleapis.com", ["v4", "spreadsheets", "abc"]).unwrap();
        assert_eq!(url.as_str(), "https://sheets.googleapis.com/v4/spreadsheets/abc");
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let url = endpoint("http://127.0.0.1:9000/", ["values", "Sheet1!A:D"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/values/Sheet1!A:D");
    }

    #[test]
    fn test_endpoint_encodes() {
        let url = endpoint("http://localhost", ["values", "Dispatch Register!A:D"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/values/Dispatch%20Register!A:D");
    }

    #[test]
    fn test_endpoint_bad_base() {
        assert!(endpoint("mailto:someone@example.com", ["x"]).is_err());
        assert!(endpoint("not a url", ["x"]).is_err());
    }
}
