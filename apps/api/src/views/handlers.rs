use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api_client::outcome::{FallbackPolicy, Outcome, Sourced};
use crate::errors::AppError;
use crate::interview::PrepSession;
use crate::state::AppState;
use crate::views::interview_prep::InterviewPrepView;
use crate::views::job_match::{self, JobMatch, JobMatchView, RiskReport};
use crate::views::learning_path::{LearningPath, LearningPathView};
use crate::views::roadmap::{
    completed_set, render_text, Phase, Roadmap, RoadmapFilter, RoadmapProgress, RoadmapView,
};
use crate::views::load;

#[derive(Debug, Deserialize)]
pub struct RoadmapQuery {
    pub q: Option<String>,
    pub difficulty: Option<String>,
    /// Comma-separated task ids the user has ticked off.
    pub completed: Option<String>,
}

impl RoadmapQuery {
    fn filter(&self) -> RoadmapFilter {
        RoadmapFilter {
            keyword: self.q.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPage {
    pub roadmap: Roadmap,
    pub filtered: bool,
    pub visible_phases: Vec<Phase>,
    pub progress: RoadmapProgress,
}

#[derive(Debug, Deserialize)]
pub struct InterviewPrepQuery {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub focus_weak_areas: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// GET /api/v1/views/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Query(query): Query<RoadmapQuery>,
) -> Result<Json<Sourced<RoadmapPage>>, AppError> {
    let snapshot = state.career.snapshot().await;
    let view = RoadmapView::new(state.roadmap_api.clone());
    let sourced = load(&view, &snapshot).await.into_sourced()?;

    let completed = completed_set(query.completed.as_deref());
    Ok(Json(sourced.map(|roadmap| {
        let filter = query.filter();
        let filtered = filter.is_active();
        let visible_phases = if filtered {
            filter.apply(&roadmap.phases)
        } else {
            roadmap.phases.clone()
        };
        let progress = RoadmapProgress::compute(&roadmap, &completed);
        RoadmapPage {
            roadmap,
            filtered,
            visible_phases,
            progress,
        }
    })))
}

/// GET /api/v1/views/roadmap/export
pub async fn handle_roadmap_export(
    State(state): State<AppState>,
    Query(query): Query<RoadmapQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.career.snapshot().await;
    let view = RoadmapView::new(state.roadmap_api.clone());
    let roadmap = load(&view, &snapshot).await.into_sourced()?.data;

    let completed = completed_set(query.completed.as_deref());
    let text = render_text(&roadmap, &completed, Utc::now());
    let filename = format!(
        "attachment; filename=\"{}_roadmap.txt\"",
        roadmap
            .career
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        text,
    ))
}

/// GET /api/v1/views/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    Query(query): Query<InterviewPrepQuery>,
) -> Result<Json<Sourced<PrepSession>>, AppError> {
    let snapshot = state.career.snapshot().await;
    let view = InterviewPrepView::new(
        state.api.clone(),
        query.company,
        query.role,
        query.focus_weak_areas,
    );
    Ok(Json(load(&view, &snapshot).await.into_sourced()?))
}

/// GET /api/v1/views/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Sourced<JobMatch>>, AppError> {
    let snapshot = state.career.snapshot().await;
    let view = JobMatchView::new(state.api.clone(), query.role);
    Ok(Json(load(&view, &snapshot).await.into_sourced()?))
}

/// GET /api/v1/views/job-match/risk
pub async fn handle_career_risk(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<Sourced<RiskReport>>, AppError> {
    let role = match query.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => role.to_string(),
        None => state
            .career
            .snapshot()
            .await
            .known_career()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Select a career first".to_string()))?,
    };

    let result = job_match::fetch_risk(&state.api, &role).await;
    let outcome = Outcome::resolve(
        "career risk",
        result,
        FallbackPolicy::Mock,
        job_match::sample_risk,
    );
    Ok(Json(outcome.into_sourced()?))
}

/// GET /api/v1/views/learning-path
pub async fn handle_learning_path(
    State(state): State<AppState>,
) -> Result<Json<Sourced<LearningPath>>, AppError> {
    let snapshot = state.career.snapshot().await;
    let view = LearningPathView::new(state.api.clone());
    Ok(Json(load(&view, &snapshot).await.into_sourced()?))
}
