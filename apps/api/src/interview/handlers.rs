use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api_client::outcome::{FallbackPolicy, Outcome, Sourced};
use crate::errors::AppError;
use crate::interview::{
    self, CompanyRole, EvaluateRequest, Evaluation, InterviewError, Material, PrepDay,
    ReadinessScore,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReadinessQuery {
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/v1/interview/readiness
pub async fn handle_readiness(
    State(state): State<AppState>,
    Query(query): Query<ReadinessQuery>,
) -> Result<Json<Sourced<ReadinessScore>>, AppError> {
    let company = non_blank(query.company.as_deref());
    let result = interview::fetch_readiness(&state.api, company).await;
    let outcome = Outcome::resolve(
        "interview readiness",
        result,
        FallbackPolicy::Mock,
        interview::mock_readiness,
    );
    Ok(Json(outcome.into_sourced()?))
}

/// POST /api/v1/interview/prep-plan
pub async fn handle_prep_plan(
    State(state): State<AppState>,
    Json(body): Json<CompanyRole>,
) -> Result<Json<Sourced<Vec<PrepDay>>>, AppError> {
    let target = resolve_target(&state, body).await?;
    let (company, role) = (
        target.company.clone().unwrap_or_default(),
        target.role.clone().unwrap_or_default(),
    );

    let result = interview::fetch_prep_plan(&state.api, &target).await;
    let outcome = Outcome::resolve("prep plan", result, FallbackPolicy::Mock, || {
        interview::mock_prep_plan(&company, &role)
    });
    Ok(Json(outcome.into_sourced()?))
}

/// GET /api/v1/interview/materials
pub async fn handle_materials(
    State(state): State<AppState>,
    Query(query): Query<CompanyRole>,
) -> Result<Json<Sourced<Vec<Material>>>, AppError> {
    let target = resolve_target(&state, query).await?;
    let company = target.company.clone().unwrap_or_default();

    let result = interview::fetch_materials(&state.api, &target).await;
    let outcome = Outcome::resolve("interview materials", result, FallbackPolicy::Mock, || {
        interview::mock_materials(&company)
    });
    Ok(Json(outcome.into_sourced()?))
}

/// POST /api/v1/interview/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<Sourced<Evaluation>>, AppError> {
    request.validate()?;

    let result = interview::evaluate_answer(&state.api, &request).await;
    let outcome = Outcome::resolve(
        "answer evaluation",
        result,
        FallbackPolicy::Mock,
        interview::mock_evaluation,
    );
    Ok(Json(outcome.into_sourced()?))
}

/// GET /api/v1/interview/pdf
///
/// No fallback: a failed download is reported to the user.
pub async fn handle_pdf(
    State(state): State<AppState>,
    Query(query): Query<PdfQuery>,
) -> Result<impl IntoResponse, AppError> {
    let company = non_blank(query.company.as_deref()).ok_or(InterviewError::MissingCompany)?;
    let kind = non_blank(query.kind.as_deref()).unwrap_or("guide");
    let role = non_blank(query.role.as_deref());

    let pdf = interview::download_pdf(&state.api, company, role, kind).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        interview::pdf_filename(company, kind)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}

/// Company is required; the role defaults to the selected career.
async fn resolve_target(state: &AppState, target: CompanyRole) -> Result<CompanyRole, AppError> {
    let company = non_blank(target.company.as_deref())
        .ok_or(InterviewError::MissingCompany)?
        .to_string();

    let role = match non_blank(target.role.as_deref()) {
        Some(role) => role.to_string(),
        None => state
            .career
            .snapshot()
            .await
            .known_career()
            .map(str::to_string)
            .ok_or(InterviewError::MissingRole)?,
    };

    Ok(CompanyRole {
        company: Some(company),
        role: Some(role),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
