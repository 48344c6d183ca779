//! Learning path view: a phased curriculum from the learning-roadmap service,
//! or a fixed 12-week sample when the service cannot be reached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api_client::{ApiClient, ApiError};
use crate::career::store::CareerSnapshot;
use crate::views::DependentView;

pub const FALLBACK_NOTICE: &str = "Using fallback path due to connection issue.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSkill {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningPhase {
    pub phase: u32,
    pub title: String,
    pub duration: String,
    pub goal: String,
    pub skills: Vec<LearningSkill>,
    pub outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningPath {
    pub role: String,
    pub current_level: String,
    pub total_time: String,
    pub weekly_commitment: String,
    pub phases: Vec<LearningPhase>,
}

pub struct LearningPathView {
    api: ApiClient,
}

impl LearningPathView {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DependentView for LearningPathView {
    type Data = LearningPath;

    fn name(&self) -> &'static str {
        "learning path"
    }

    fn requires_career(&self) -> bool {
        false
    }

    fn fallback_notice(&self) -> Option<&'static str> {
        Some(FALLBACK_NOTICE)
    }

    async fn fetch(&self, _snapshot: &CareerSnapshot) -> Result<LearningPath, ApiError> {
        let body: Value = self
            .api
            .post_json("career/learning-roadmap", &json!({}))
            .await?;
        parse_remote(body)
    }

    fn fallback(&self, _snapshot: &CareerSnapshot) -> LearningPath {
        sample_path()
    }
}

/// Accepts `{data: path}` or a bare path; a path without phases is unusable.
fn parse_remote(body: Value) -> Result<LearningPath, ApiError> {
    let payload = match body.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => body,
    };
    let has_phases = payload
        .get("phases")
        .and_then(Value::as_array)
        .is_some_and(|phases| !phases.is_empty());
    if !has_phases {
        return Err(ApiError::Rejected(
            "Learning path response had no phases".to_string(),
        ));
    }
    Ok(serde_json::from_value(payload)?)
}

fn skill(name: &str, kind: &str, time: &str, status: &str) -> LearningSkill {
    LearningSkill {
        name: name.to_string(),
        kind: kind.to_string(),
        time: time.to_string(),
        status: status.to_string(),
    }
}

pub fn sample_path() -> LearningPath {
    LearningPath {
        role: "Full Stack Developer".to_string(),
        current_level: "Intermediate".to_string(),
        total_time: "12 Weeks".to_string(),
        weekly_commitment: "15 hours/week".to_string(),
        phases: vec![
            LearningPhase {
                phase: 1,
                title: "Foundation Reinforcement".to_string(),
                duration: "Weeks 1-4".to_string(),
                goal: "Solidify core concepts and fill critical gaps in DevOps.".to_string(),
                skills: vec![
                    skill("Docker Fundamentals", "Gap", "10h", "Pending"),
                    skill("Advanced JavaScript Patterns", "Core", "8h", "Completed"),
                    skill("CSS Grid/Flexbox Mastery", "Core", "5h", "Completed"),
                ],
                outcome: "Ability to containerize applications and write clean, modular frontend code.".to_string(),
            },
            LearningPhase {
                phase: 2,
                title: "Advanced System Architecture".to_string(),
                duration: "Weeks 5-8".to_string(),
                goal: "Master backend scalability and API design.".to_string(),
                skills: vec![
                    skill("GraphQL API Design", "Gap", "12h", "Pending"),
                    skill("System Design Patterns", "Gap", "15h", "Pending"),
                    skill("Database Indexing & Optimization", "Core", "8h", "In Progress"),
                ],
                outcome: "Design scalable backend systems capable of handling high traffic.".to_string(),
            },
            LearningPhase {
                phase: 3,
                title: "Professional Projects & Interview Prep".to_string(),
                duration: "Weeks 9-12".to_string(),
                goal: "Build portfolio-worthy projects and prepare for technical screenings.".to_string(),
                skills: vec![
                    skill("Microservices Project (End-to-End)", "Project", "20h", "Pending"),
                    skill("LeetCode Patterns (Medium/Hard)", "Interview", "15h", "Pending"),
                    skill("Mock Interviews", "Interview", "5h", "Pending"),
                ],
                outcome: "Job-ready portfolio and confidence to crack Tier-1 tech interviews.".to_string(),
            },
        ],
    }
}
