use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::Admin;
use crate::api::server::AppState;
use crate::api::{items, sales};
use crate::export::Exporter;
use crate::report;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPayload {
    pub latex_content: Option<String>,
    pub filename: Option<String>,
}

/// Body for the server-rendered report endpoints; send `{}` to accept the
/// default download name.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    #[serde(default)]
    pub filename: Option<String>,
}

fn pdf_response(filename: &str, bytes: Vec<u8>) -> impl IntoResponse + use<> {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    (headers, bytes)
}

/// Compiles caller-rendered LaTeX into a PDF download.
pub async fn pdf(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<PdfPayload>,
) -> ApiResult<impl IntoResponse> {
    let (Some(latex_content), Some(filename)) = (
        payload.latex_content.filter(|v| !v.is_empty()),
        payload.filename.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "LaTeX content and filename are required",
        ));
    };

    let filename = Exporter::sanitize_filename(&filename);
    let bytes = state.exporter.compile(&latex_content).await?;
    Ok(pdf_response(&filename, bytes))
}

/// Aggregates items by user, renders the table template, and compiles it.
pub async fn items_by_user(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<ReportPayload>,
) -> ApiResult<impl IntoResponse> {
    let filename = download_name(payload, "items_by_user.pdf");
    let groups = items::grouped(&state).await?;
    let latex = report::items_by_user(&groups);
    let bytes = state.exporter.compile(&latex).await?;
    Ok(pdf_response(&filename, bytes))
}

/// Aggregates sales by user, renders the table template, and compiles it.
pub async fn sales_by_user(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(payload): Json<ReportPayload>,
) -> ApiResult<impl IntoResponse> {
    let filename = download_name(payload, "sales_by_user.pdf");
    let groups = sales::grouped(&state).await?;
    let latex = report::sales_by_user(&groups);
    let bytes = state.exporter.compile(&latex).await?;
    Ok(pdf_response(&filename, bytes))
}

fn download_name(payload: ReportPayload, default: &str) -> String {
    payload
        .filename
        .filter(|v| !v.is_empty())
        .map(|name| Exporter::sanitize_filename(&name))
        .unwrap_or_else(|| default.to_string())
}
