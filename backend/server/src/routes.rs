use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::IntoResponse,
};
use ledger::NextNumbers;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    error::AppError::{self, MalformedPayload},
    state::AppState,
    utils::{Entry, EntryPayload, UpdatePayload, read_upload, required, today_formatted},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumbersResponse {
    pub success: bool,
    pub last_dispatch_numbers: NextNumbers,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: String,
    pub file_name: String,
    pub file_link: String,
}

#[derive(Serialize)]
pub struct EntriesResponse {
    pub success: bool,
    pub entries: Vec<Entry>,
}

fn numbers_response(last_dispatch_numbers: NextNumbers) -> Json<NumbersResponse> {
    Json(NumbersResponse {
        success: true,
        last_dispatch_numbers,
    })
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn last_dispatch_numbers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NumbersResponse>, AppError> {
    let numbers = state
        .numbers
        .refresh(&state.sheets, &state.config.numbers_range())
        .await
        .inspect_err(|e| warn!("Rescan failed, keeping cached numbers: {e}"))?;

    Ok(numbers_response(numbers))
}

pub async fn update_last_dispatch_number_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdatePayload>, JsonRejection>,
) -> Result<Json<NumbersResponse>, AppError> {
    let Json(payload) = payload.map_err(|_| MalformedPayload)?;

    let file_type = required(payload.file_type, "type")?;
    let new_total = payload.new_total.ok_or(AppError::MissingField("newTotal"))?;

    state.numbers.set_next(&file_type, new_total);
    info!("Next {file_type} number set to follow {new_total}");

    Ok(numbers_response(state.numbers.snapshot()))
}

pub async fn add_entry_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EntryPayload>, JsonRejection>,
) -> Result<Json<NumbersResponse>, AppError> {
    let Json(payload) = payload.map_err(|_| MalformedPayload)?;
    let entry = payload.into_entry(&today_formatted())?;

    state
        .sheets
        .append_row(&state.config.entries_range(), &entry.to_row())
        .await?;

    state
        .numbers
        .advance(&entry.file_type, &entry.dispatch_number);
    info!("Recorded {} ({})", entry.dispatch_number, entry.file_type);

    Ok(numbers_response(state.numbers.snapshot()))
}

pub async fn entries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EntriesResponse>, AppError> {
    let rows = state.sheets.get_rows(&state.config.entries_range()).await?;

    let entries = rows
        .iter()
        .skip(1)
        .map(|row| Entry::from_row(row))
        .collect();

    Ok(Json(EntriesResponse {
        success: true,
        entries,
    }))
}

pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_upload(multipart.map_err(|_| MalformedPayload)?).await?;
    let size = upload.data.len();

    let file = state
        .drive
        .upload(&upload.name, &upload.mime, upload.data)
        .await?;

    if state.config.share_uploads {
        state.drive.share(&file.id).await?;
    }

    info!("Uploaded {} ({size} bytes) as {}", file.name, file.id);

    let file_link = file
        .web_view_link
        .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", file.id));

    Ok(Json(UploadResponse {
        success: true,
        file_id: file.id,
        file_name: file.name,
        file_link,
    }))
}
