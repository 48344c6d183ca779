//! Job match view: how well the profile fits the selected (or a requested)
//! role, plus a career risk report for that role.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api_client::{ApiClient, ApiError, GENERIC_FAILURE};
use crate::career::models::RecommendationResult;
use crate::career::store::CareerSnapshot;
use crate::views::DependentView;

const ESTIMATED_SALARY: &str = "$90k - $130k";
const ESTIMATED_DEMAND: &str = "High";
const DEFAULT_DESCRIPTION: &str = "A great role matching your profile.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMatch {
    pub role: String,
    pub match_score: f64,
    pub salary: String,
    pub demand: String,
    pub fit_reason: String,
    pub top_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryMatch {
    pub role: String,
    pub match_score: f64,
    pub skills: Vec<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub primary_match: RoleMatch,
    pub secondary_matches: Vec<SecondaryMatch>,
}

// ── Upstream wire format ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MatchResponse {
    #[serde(default)]
    success: bool,
    guidance: Option<RoleGuidance>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RoleGuidance {
    career: String,
    confidence: f64,
    reason: String,
    priority_skills: Vec<NamedSkill>,
    skill_gaps: Vec<SkillGap>,
    readiness_explanation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamedSkill {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkillGap {
    skill: String,
}

impl From<RoleGuidance> for RoleMatch {
    fn from(g: RoleGuidance) -> Self {
        RoleMatch {
            role: g.career,
            match_score: g.confidence,
            salary: ESTIMATED_SALARY.to_string(),
            demand: ESTIMATED_DEMAND.to_string(),
            fit_reason: g.reason,
            top_skills: g.priority_skills.into_iter().map(|s| s.name).collect(),
            missing_skills: g.skill_gaps.into_iter().map(|s| s.skill).collect(),
            description: g
                .readiness_explanation
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }
}

fn static_secondary_matches() -> Vec<SecondaryMatch> {
    vec![
        SecondaryMatch {
            role: "DevOps Engineer".to_string(),
            match_score: 75.0,
            skills: vec!["Docker".to_string(), "CI/CD".to_string(), "Linux".to_string()],
            reason: "Good infrastructure skills, but needs more automation experience.".to_string(),
        },
        SecondaryMatch {
            role: "Data Engineer".to_string(),
            match_score: 65.0,
            skills: vec!["SQL".to_string(), "Python".to_string(), "ETL".to_string()],
            reason: "Strong coding base, but needs specific data pipeline knowledge.".to_string(),
        },
    ]
}

/// Fallback built from the stored recommendation.
fn match_from_analysis(analysis: &RecommendationResult) -> JobMatch {
    JobMatch {
        primary_match: RoleMatch {
            role: analysis.recommended_career.clone(),
            match_score: analysis.confidence_score,
            salary: ESTIMATED_SALARY.to_string(),
            demand: ESTIMATED_DEMAND.to_string(),
            fit_reason: analysis.why_or_placeholder().to_string(),
            top_skills: analysis.priority_skills.clone(),
            missing_skills: Vec::new(),
            description: analysis.description_or_placeholder().to_string(),
        },
        secondary_matches: Vec::new(),
    }
}

pub fn sample_match() -> JobMatch {
    JobMatch {
        primary_match: RoleMatch {
            role: "Full Stack Developer".to_string(),
            match_score: 92.0,
            salary: "$85k - $120k".to_string(),
            demand: "Very High".to_string(),
            fit_reason: "Your combination of React, Node.js, and problem-solving skills aligns perfectly with this high-demand role.".to_string(),
            top_skills: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "System Design".to_string(),
            ],
            missing_skills: vec!["Docker".to_string(), "AWS".to_string()],
            description: "Build end-to-end web applications, designing both the front-end user experience and the back-end logic.".to_string(),
        },
        secondary_matches: Vec::new(),
    }
}

// ── View ────────────────────────────────────────────────────────────────────

pub struct JobMatchView {
    api: ApiClient,
    role: Option<String>,
}

impl JobMatchView {
    /// `role` overrides the selected career as the match target.
    pub fn new(api: ApiClient, role: Option<String>) -> Self {
        Self {
            api,
            role: role
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        }
    }

    fn target<'a>(&'a self, snapshot: &'a CareerSnapshot) -> Option<&'a str> {
        self.role.as_deref().or_else(|| snapshot.known_career())
    }
}

#[async_trait]
impl DependentView for JobMatchView {
    type Data = JobMatch;

    fn name(&self) -> &'static str {
        "job match"
    }

    fn requires_career(&self) -> bool {
        self.role.is_none()
    }

    async fn fetch(&self, snapshot: &CareerSnapshot) -> Result<JobMatch, ApiError> {
        let target = self
            .target(snapshot)
            .ok_or_else(|| ApiError::Rejected("No role to match against".to_string()))?;

        let response: MatchResponse = self
            .api
            .post_json("ai/career/match-role", &json!({ "targetRole": target }))
            .await?;

        match response.guidance {
            Some(guidance) if response.success => Ok(JobMatch {
                primary_match: guidance.into(),
                secondary_matches: static_secondary_matches(),
            }),
            _ => Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
        }
    }

    fn fallback(&self, snapshot: &CareerSnapshot) -> JobMatch {
        match snapshot.known_analysis() {
            Some(analysis) => match_from_analysis(analysis),
            None => sample_match(),
        }
    }
}

// ── Career risk ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSummary {
    pub stability_score: f64,
    pub risk_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBreakdown {
    pub layoff_risk: String,
    pub automation_risk: String,
    pub competition_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskReport {
    pub summary: RiskSummary,
    pub risk_breakdown: RiskBreakdown,
    pub ai_insight: String,
    pub risk_mitigation: Vec<String>,
    pub future_proofing_tip: String,
}

pub async fn fetch_risk(api: &ApiClient, role: &str) -> Result<RiskReport, ApiError> {
    api.post_json("ai/career-risk", &json!({ "targetRole": role }))
        .await
}

pub fn sample_risk() -> RiskReport {
    RiskReport {
        summary: RiskSummary {
            stability_score: 82.0,
            risk_level: "Low".to_string(),
        },
        risk_breakdown: RiskBreakdown {
            layoff_risk: "Low".to_string(),
            automation_risk: "Medium".to_string(),
            competition_level: "High".to_string(),
        },
        ai_insight: "This role is fundamental to tech infrastructure. While automation tools exist, they empower rather than replace this role.".to_string(),
        risk_mitigation: vec![
            "Master Cloud Native tools".to_string(),
            "Focus on Security".to_string(),
            "Learn AI integration".to_string(),
        ],
        future_proofing_tip: "Pivot towards Platform Engineering.".to_string(),
    }
}
