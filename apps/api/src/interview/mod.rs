//! Interview preparation endpoints: readiness, question sessions, prep plans,
//! study materials, answer evaluation and PDF guides.
//!
//! Everything except the PDF download falls back to mock data when the
//! backend is unreachable; a missing PDF is reported to the user.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::api_client::{ApiClient, ApiError, Envelope};

pub mod handlers;

pub const MIN_ANSWER_CHARS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterviewError {
    #[error("Please provide a more detailed answer before evaluating.")]
    AnswerTooShort,

    #[error("Company is required")]
    MissingCompany,

    #[error("Role is required")]
    MissingRole,
}

// ────────────────────────────────────────────────────────────────────────────
// Models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadinessScore {
    pub overall_score: f64,
    pub technical_score: f64,
    pub behavioral_score: f64,
    pub communication_score: f64,
    pub problem_solving_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub why_asked: String,
    pub what_it_tests: String,
    pub sample_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionSession {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInsights {
    pub tip: String,
    pub style: String,
    pub estimated_timeline: String,
    pub preparation_time: String,
    pub rounds: Vec<String>,
    pub difficulty: String,
}

/// A generated question set; insights only accompany company sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepSession {
    pub session: QuestionSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<CompanyInsights>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepDay {
    pub day: u32,
    pub topic: String,
    pub focus: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    pub score: f64,
    pub feedback: String,
    pub improvement_tips: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub question_id: Option<String>,
    pub answer: String,
}

impl EvaluateRequest {
    pub fn validate(&self) -> Result<(), InterviewError> {
        if self.answer.trim().chars().count() < MIN_ANSWER_CHARS {
            return Err(InterviewError::AnswerTooShort);
        }
        Ok(())
    }
}

/// Company and role for company-mode requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRole {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Upstream calls
// ────────────────────────────────────────────────────────────────────────────

pub async fn fetch_readiness(
    api: &ApiClient,
    company: Option<&str>,
) -> Result<ReadinessScore, ApiError> {
    let query: Vec<(&str, String)> = company
        .map(|c| vec![("company", c.to_string())])
        .unwrap_or_default();
    let envelope: Envelope<ReadinessScore> = api.get_json("interview/readiness", &query).await?;
    envelope.into_data()
}

pub async fn fetch_questions(
    api: &ApiClient,
    focus_weak_areas: bool,
    company: Option<&str>,
    role: Option<&str>,
) -> Result<PrepSession, ApiError> {
    let body = json!({
        "focusWeakAreas": focus_weak_areas,
        "company": company,
        "role": role,
    });
    let envelope: Envelope<PrepSession> = api.post_json("interview/questions", &body).await?;
    envelope.into_data()
}

pub async fn fetch_prep_plan(api: &ApiClient, target: &CompanyRole) -> Result<Vec<PrepDay>, ApiError> {
    let envelope: Envelope<Vec<PrepDay>> = api.post_json("interview/prep-plan", target).await?;
    envelope.into_data()
}

pub async fn fetch_materials(api: &ApiClient, target: &CompanyRole) -> Result<Vec<Material>, ApiError> {
    let mut query = Vec::new();
    if let Some(company) = &target.company {
        query.push(("company", company.clone()));
    }
    if let Some(role) = &target.role {
        query.push(("role", role.clone()));
    }
    let envelope: Envelope<Vec<Material>> = api.get_json("interview/materials", &query).await?;
    envelope.into_data()
}

pub async fn evaluate_answer(
    api: &ApiClient,
    request: &EvaluateRequest,
) -> Result<Evaluation, ApiError> {
    let envelope: Envelope<Evaluation> = api.post_json("interview/evaluate", request).await?;
    envelope.into_data()
}

pub async fn download_pdf(
    api: &ApiClient,
    company: &str,
    role: Option<&str>,
    kind: &str,
) -> Result<Bytes, ApiError> {
    let mut query = vec![("company", company.to_string()), ("type", kind.to_string())];
    if let Some(role) = role {
        query.push(("role", role.to_string()));
    }
    api.get_bytes("interview/pdf", &query).await
}

/// `Google_Interview_Guide.pdf` for the guide, `Google_technical_Guide.pdf` otherwise.
pub fn pdf_filename(company: &str, kind: &str) -> String {
    let company = filename_safe(company);
    let kind = filename_safe(kind);
    if kind == "guide" {
        format!("{company}_Interview_Guide.pdf")
    } else {
        format!("{company}_{kind}_Guide.pdf")
    }
}

fn filename_safe(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Mock datasets
// ────────────────────────────────────────────────────────────────────────────

pub fn mock_readiness() -> ReadinessScore {
    ReadinessScore {
        overall_score: 72.0,
        technical_score: 75.0,
        behavioral_score: 68.0,
        communication_score: 78.0,
        problem_solving_score: 70.0,
    }
}

fn question(id: &str, kind: &str, text: String, why: String, tests: &str, sample: &str) -> Question {
    Question {
        id: Some(id.to_string()),
        kind: kind.to_string(),
        question: text,
        why_asked: why,
        what_it_tests: tests.to_string(),
        sample_answer: sample.to_string(),
    }
}

pub fn mock_general_session() -> PrepSession {
    PrepSession {
        session: QuestionSession {
            id: Some("mock-session-id".to_string()),
            questions: vec![
                question(
                    "q1",
                    "technical",
                    "Explain the difference between event propagation and event bubbling in the DOM.".to_string(),
                    "Tests understanding of DOM event flow, crucial for handling user interactions in complex UIs.".to_string(),
                    "JavaScript DOM Events",
                    "Event propagation is the blanket term for the event flow, which includes three phases: capturing, target, and bubbling. Event bubbling specifically refers to the phase where the event travels from the target element up to the root.",
                ),
                question(
                    "q2",
                    "behavioral",
                    "Tell me about a time you had to optimize a slow rendering React component.".to_string(),
                    "Assesses practical performance optimization skills and problem-solving methodology.".to_string(),
                    "React Performance",
                    "I identified a list component re-rendering unnecessarily using React DevTools Profiler. I implemented React.memo to prevent updates when props didn't change and virtualized the list using react-window to handle 1000+ items, reducing render time by 80%.",
                ),
            ],
        },
        insights: None,
    }
}

pub fn mock_company_session(company: &str, role: &str) -> PrepSession {
    let system = if role.contains("Backend") {
        "API rate limiter"
    } else {
        "notification system"
    };

    PrepSession {
        session: QuestionSession {
            id: Some("mock-company-session".to_string()),
            questions: vec![
                question(
                    "cq1",
                    "technical",
                    format!("How would you design a scalable {system} for {company}?"),
                    format!("Tests system design skills relevant to {company}'s scale."),
                    "System Design",
                    "I would use a Token Bucket algorithm backed by Redis for low-latency state. For distribution, I'd implement consistent hashing to shard rate limits across nodes...",
                ),
                question(
                    "cq2",
                    "behavioral",
                    format!("Describe a situation where you demonstrated {company}'s leadership principles."),
                    "Cultural fit check is mandatory for this company.".to_string(),
                    "Culture Fit",
                    "I took ownership of a critical bug during a release, coordinating across three teams to fix it without blame, ensuring customer trust was maintained.",
                ),
            ],
        },
        insights: Some(CompanyInsights {
            tip: format!(
                "{company} values data-driven decision making. Always back your choices with metrics."
            ),
            style: "Structured & Behavioral".to_string(),
            estimated_timeline: "3-4 Weeks".to_string(),
            preparation_time: "2 Weeks".to_string(),
            rounds: vec![
                "Online Assessment".to_string(),
                "Technical Phone Screen".to_string(),
                "Onsite Loop (4 rounds)".to_string(),
            ],
            difficulty: "Medium-Hard".to_string(),
        }),
    }
}

pub fn mock_prep_plan(company: &str, role: &str) -> Vec<PrepDay> {
    let days: [(&str, String); 7] = [
        ("Data Structures", "Arrays, Strings, and Hash Maps mastery".to_string()),
        (
            "Company Research",
            format!("Deep dive into {company}'s products and culture"),
        ),
        ("System Design", "Scalability basics and Load Balancing".to_string()),
        ("Mock Interviews", "Peer practice for behavioral questions".to_string()),
        ("Algorithms", "Dynamic Programming and Graphs".to_string()),
        ("Role Specifics", format!("{role} specific framework deep dives")),
        ("Rest & Review", "Light review and mental preparation".to_string()),
    ];

    days.into_iter()
        .zip(1..)
        .map(|((topic, focus), day)| PrepDay {
            day,
            topic: topic.to_string(),
            focus,
        })
        .collect()
}

pub fn mock_materials(company: &str) -> Vec<Material> {
    vec![
        Material {
            id: "guide".to_string(),
            title: format!("{company} Interview Guide"),
            kind: "PDF Guide".to_string(),
        },
        Material {
            id: "technical".to_string(),
            title: "Top 50 Questions".to_string(),
            kind: "Cheatsheet".to_string(),
        },
        Material {
            id: "behavioral".to_string(),
            title: "Behavioral Masterclass".to_string(),
            kind: "E-Book".to_string(),
        },
    ]
}

pub fn mock_evaluation() -> Evaluation {
    Evaluation {
        score: 85.0,
        feedback: "Strong answer! You clearly articulated the core concept. To improve, try adding a specific example from your past projects.".to_string(),
        improvement_tips: "Mention specific tools or metrics.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::test_support::spawn_upstream;
    use crate::storage::MemoryStore;
    use axum::{routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_short_answers_rejected_before_network() {
        let request = EvaluateRequest {
            session_id: Some("s".to_string()),
            question_id: Some("q".to_string()),
            answer: "  I would profile first ".to_string(),
        };
        assert_eq!(request.validate(), Ok(()));

        let request = EvaluateRequest {
            answer: "   tiny    ".to_string(),
            ..request
        };
        assert_eq!(request.validate(), Err(InterviewError::AnswerTooShort));
    }

    #[test]
    fn test_mock_prep_plan_interpolates_company_and_role() {
        let plan = mock_prep_plan("Google", "Data Analyst");
        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].day, 1);
        assert_eq!(plan[6].day, 7);
        assert_eq!(plan[1].focus, "Deep dive into Google's products and culture");
        assert_eq!(plan[5].focus, "Data Analyst specific framework deep dives");
    }

    #[test]
    fn test_mock_company_session_varies_by_role() {
        let backend = mock_company_session("Uber", "Backend Developer");
        assert!(backend.session.questions[0].question.contains("API rate limiter"));
        let frontend = mock_company_session("Uber", "Frontend Developer");
        assert!(frontend.session.questions[0].question.contains("notification system"));
        assert!(frontend.insights.is_some());
    }

    #[test]
    fn test_pdf_filename() {
        assert_eq!(pdf_filename("Google", "guide"), "Google_Interview_Guide.pdf");
        assert_eq!(pdf_filename("Tata Consultancy", "technical"), "Tata_Consultancy_technical_Guide.pdf");
    }

    #[test]
    fn test_question_wire_format() {
        let value = serde_json::to_value(&mock_general_session()).unwrap();
        assert_eq!(value["session"]["_id"], "mock-session-id");
        assert_eq!(value["session"]["questions"][0]["type"], "technical");
        assert!(value["session"]["questions"][0]["whyAsked"].is_string());
        assert!(value.get("insights").is_none());
    }

    #[tokio::test]
    async fn test_fetch_questions_sends_focus_flag() {
        let router = Router::new().route(
            "/interview/questions",
            post(|Json(body): Json<Value>| async move {
                let focus = body["focusWeakAreas"].as_bool().unwrap_or(false);
                Json(json!({
                    "success": true,
                    "data": {
                        "session": {
                            "_id": "s1",
                            "questions": [{"_id": "x", "type": "technical", "question": format!("focus={focus}")}]
                        }
                    }
                }))
            }),
        );
        let base = spawn_upstream(router).await;
        let api = ApiClient::new(&base, Duration::from_secs(5), Arc::new(MemoryStore::new())).unwrap();

        let session = fetch_questions(&api, true, None, None).await.unwrap();
        assert_eq!(session.session.id.as_deref(), Some("s1"));
        assert_eq!(session.session.questions[0].question, "focus=true");
    }
}
