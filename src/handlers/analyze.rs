use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderMap, StatusCode},
};
use std::time::Instant;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::middleware::REQUEST_ID_HEADER;
use crate::models::{AnalysisResponse, UploadedDocument};
use crate::state::AppState;

pub async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<AnalysisResponse> {
    let start = Instant::now();
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let (document, question) = read_form(multipart, state.max_file_size_mb).await?;

    info!(
        request_id = %request_id,
        file_name = %document.name,
        file_size = document.size,
        question_length = question.len(),
        "Analysis request received"
    );

    match state.analyzer.analyze(document, question).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                answer_length = response.answer.len(),
                total_time_ms = start.elapsed().as_millis() as u64,
                "Analysis completed successfully"
            );
            Ok(response)
        }
        Err(e) => {
            if !e.is_validation() {
                error!(request_id = %request_id, error = %e, "Analysis failed");
            }
            Err(e)
        }
    }
}

/// Reads the `file` and `question` fields, in whatever order they arrive.
async fn read_form(
    mut multipart: Multipart,
    limit_mb: usize,
) -> AppResult<(UploadedDocument, String)> {
    let mut document = None;
    let mut question = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit_mb))?;
                document = Some(UploadedDocument::new(file_name, data));
            }
            Some("question") => {
                question = Some(field.text().await.map_err(|e| multipart_error(e, limit_mb))?);
            }
            _ => {}
        }
    }

    let document = document.ok_or(AppError::MissingField { field: "file" })?;
    let question = question.ok_or(AppError::MissingField { field: "question" })?;
    Ok((document, question))
}

fn multipart_error(err: MultipartError, limit_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit: limit_mb }
    } else {
        err.into()
    }
}
