use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::resume::{self, ResumeAnalysis, ResumeUpload, ResumeValidationError, FIELD_NAME};
use crate::state::AppState;

/// POST /api/v1/resume/analyze
///
/// Expects a multipart body with the PDF under `resume`. Other fields are ignored.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ResumeValidationError::Malformed(e.body_text()))?
    {
        if field.name() != Some(FIELD_NAME) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ResumeValidationError::Malformed(e.body_text()))?;

        upload = Some(ResumeUpload::validate(
            file_name.as_deref(),
            content_type.as_deref(),
            data,
        )?);
        break;
    }

    let upload = upload.ok_or(ResumeValidationError::MissingFile)?;
    let analysis = resume::analyze(&state.api, upload).await?;
    Ok(Json(analysis))
}
