use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::assessment::{AssessmentInput, InterestThreshold};
use crate::career::models::{CareerState, RecommendationResult};
use crate::errors::AppError;
use crate::guidance::client;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceReport {
    pub recommendation: RecommendationResult,
    pub readiness_score: f64,
    pub career_description: String,
    pub why_this_career: String,
    /// The Shared Career State after the recommendation was applied.
    pub career: CareerState,
}

/// POST /api/v1/guidance
pub async fn handle_guidance_page(
    State(state): State<AppState>,
    Json(input): Json<AssessmentInput>,
) -> Result<Json<GuidanceReport>, AppError> {
    run_guidance(&state, input, InterestThreshold::GUIDANCE_PAGE).await
}

/// POST /api/v1/assessment/submit
pub async fn handle_assessment_submit(
    State(state): State<AppState>,
    Json(input): Json<AssessmentInput>,
) -> Result<Json<GuidanceReport>, AppError> {
    run_guidance(&state, input, InterestThreshold::ASSESSMENT_WIZARD).await
}

/// POST /api/v1/guidance/journey
pub async fn handle_guidance_journey(
    State(state): State<AppState>,
    Json(input): Json<AssessmentInput>,
) -> Result<Json<GuidanceReport>, AppError> {
    run_guidance(&state, input, InterestThreshold::GUIDANCE_JOURNEY).await
}

/// Validate → normalize → submit → apply. Guidance failures are rethrown:
/// no recommendation is ever invented, and the career state is only touched
/// on success.
async fn run_guidance(
    state: &AppState,
    input: AssessmentInput,
    threshold: InterestThreshold,
) -> Result<Json<GuidanceReport>, AppError> {
    input.validate()?;
    let request = input.normalize(threshold);

    let recommendation = client::submit(&state.api, &request).await?;
    let career = state
        .career
        .apply_recommendation(recommendation.clone())
        .await?;

    info!(
        "Applied recommendation '{}' to career state",
        recommendation.recommended_career
    );

    Ok(Json(GuidanceReport {
        readiness_score: recommendation.effective_readiness(),
        career_description: recommendation.description_or_placeholder().to_string(),
        why_this_career: recommendation.why_or_placeholder().to_string(),
        recommendation,
        career,
    }))
}
