use axum::{extract::State, http::StatusCode, Json};

use crate::career::models::{CareerState, CareerUpdate, FieldUpdate, RecommendationResult};
use crate::career::store::CareerSnapshot;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/career
pub async fn handle_get_career(State(state): State<AppState>) -> Json<CareerSnapshot> {
    Json(state.career.snapshot().await)
}

/// PATCH /api/v1/career
///
/// Merges only the keys present in the body; `null` never clears a field.
pub async fn handle_update_career(
    State(state): State<AppState>,
    Json(update): Json<CareerUpdate>,
) -> Result<Json<CareerState>, AppError> {
    let career = &state.career;
    let updated = match update.single_field() {
        Ok(FieldUpdate::SelectedCareer(name)) => career.set_selected_career(&name).await?,
        Ok(FieldUpdate::ExperienceLevel(level)) => career.set_experience_level(&level).await?,
        Ok(FieldUpdate::SelectedSkills(skills)) => career.set_selected_skills(skills).await?,
        Ok(FieldUpdate::SelectedPath(path)) => career.set_selected_path(path).await?,
        Ok(FieldUpdate::CareerAnalysis(analysis)) => career.set_career_analysis(analysis).await?,
        Ok(FieldUpdate::Confidence(confidence)) => career.set_confidence(confidence).await?,
        Err(update) => career.update_career_data(update).await?,
    };
    Ok(Json(updated))
}

/// PUT /api/v1/career/analysis
pub async fn handle_set_analysis(
    State(state): State<AppState>,
    Json(analysis): Json<RecommendationResult>,
) -> Result<Json<CareerState>, AppError> {
    Ok(Json(state.career.set_career_analysis(analysis).await?))
}

/// DELETE /api/v1/career
pub async fn handle_clear_career(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.career.clear_career_data().await?;
    Ok(StatusCode::NO_CONTENT)
}
