use axum::Json;
use serde::Serialize;

use crate::assessment::{AssessmentInput, GuidanceRequest, InterestThreshold};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentProgress {
    pub completion_percent: u8,
    /// What the wizard would submit right now.
    pub preview: GuidanceRequest,
}

/// GET /api/v1/assessment/template
pub async fn handle_template() -> Json<AssessmentInput> {
    Json(AssessmentInput::default())
}

/// POST /api/v1/assessment/progress
pub async fn handle_progress(Json(input): Json<AssessmentInput>) -> Json<AssessmentProgress> {
    Json(AssessmentProgress {
        completion_percent: input.completion_percent(),
        preview: input.normalize(InterestThreshold::ASSESSMENT_WIZARD),
    })
}
