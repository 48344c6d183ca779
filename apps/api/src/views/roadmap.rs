//! Roadmap view: phased plan for the selected career and execution path.
//!
//! The roadmap service is asked first; when it is unavailable the local
//! catalog is used. Keyword/difficulty filtering and task completion are
//! computed per request and never persisted.

use std::collections::HashSet;
use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api_client::{ApiClient, ApiError};
use crate::career::models::CareerPath;
use crate::career::store::CareerSnapshot;
use crate::views::roadmap_catalog;
use crate::views::DependentView;

pub const SAMPLE_CAREER: &str = "Data Analyst";
const DEFAULT_CONFIDENCE: f64 = 82.0;

// ────────────────────────────────────────────────────────────────────────────
// Data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub difficulty: String,
    pub reason: String,
    pub impact: String,
    pub estimated_days: u32,
    pub estimated_hours: u32,
    pub salary_impact: String,
    pub resources: Vec<String>,
    pub xp_reward: u32,
    pub locked: bool,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub number: u32,
    pub duration: String,
    pub description: String,
    pub difficulty: String,
    pub locked: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Roadmap {
    pub career: String,
    pub career_description: String,
    pub timeline: String,
    pub salary_range: String,
    pub demand_level: String,
    pub skills_required: Vec<String>,
    pub confidence: f64,
    pub path: CareerPath,
    pub experience_level: String,
    pub phases: Vec<Phase>,
}

/// Builds the roadmap from the local catalog. Unknown careers use the
/// Data Analyst template under their own name.
pub fn local_roadmap(
    career: &str,
    path: CareerPath,
    experience_level: &str,
    confidence: f64,
) -> Roadmap {
    let template = roadmap_catalog::template_for(career, path);
    Roadmap {
        career: career.to_string(),
        career_description: template.description.to_string(),
        timeline: template.timeline.to_string(),
        salary_range: template.salary_range.to_string(),
        demand_level: template.demand_level.to_string(),
        skills_required: template
            .skills_required
            .iter()
            .map(|s| s.to_string())
            .collect(),
        confidence: if confidence > 0.0 {
            confidence
        } else {
            DEFAULT_CONFIDENCE
        },
        path,
        experience_level: experience_level.to_string(),
        phases: template.phases,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// View
// ────────────────────────────────────────────────────────────────────────────

pub struct RoadmapView {
    api: ApiClient,
}

impl RoadmapView {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DependentView for RoadmapView {
    type Data = Roadmap;

    fn name(&self) -> &'static str {
        "roadmap"
    }

    async fn fetch(&self, snapshot: &CareerSnapshot) -> Result<Roadmap, ApiError> {
        // `load` only fetches once a career is known.
        let career = snapshot
            .known_career()
            .ok_or_else(|| ApiError::Rejected("No career selected".to_string()))?;
        let query = [
            ("career", career.to_string()),
            ("path", snapshot.state.selected_path.as_str().to_string()),
            ("level", snapshot.state.experience_level.clone()),
        ];
        let body: Value = self.api.get_json("api/roadmap", &query).await?;
        parse_remote(body)
    }

    fn fallback(&self, snapshot: &CareerSnapshot) -> Roadmap {
        local_roadmap(
            snapshot.known_career().unwrap_or(SAMPLE_CAREER),
            snapshot.state.selected_path,
            &snapshot.state.experience_level,
            snapshot.state.confidence,
        )
    }
}

/// Accepts `{success, data: roadmap}` or a bare roadmap object.
fn parse_remote(body: Value) -> Result<Roadmap, ApiError> {
    let succeeded = body.get("success").and_then(Value::as_bool) == Some(true);
    let payload = match body.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ if succeeded => body,
        _ => {
            return Err(ApiError::Rejected(
                "Roadmap service returned no roadmap".to_string(),
            ))
        }
    };
    Ok(serde_json::from_value(payload)?)
}

// ────────────────────────────────────────────────────────────────────────────
// View-local filtering and progress
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RoadmapFilter {
    pub keyword: Option<String>,
    /// `all` or blank disables the difficulty filter.
    pub difficulty: Option<String>,
}

impl RoadmapFilter {
    fn keyword(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }

    fn difficulty(&self) -> Option<String> {
        self.difficulty
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("all"))
            .map(str::to_lowercase)
    }

    pub fn is_active(&self) -> bool {
        self.keyword().is_some() || self.difficulty().is_some()
    }

    /// Phases with only the matching tasks; phases left empty are dropped.
    pub fn apply(&self, phases: &[Phase]) -> Vec<Phase> {
        let keyword = self.keyword();
        let difficulty = self.difficulty();

        phases
            .iter()
            .map(|phase| Phase {
                tasks: phase
                    .tasks
                    .iter()
                    .filter(|task| {
                        keyword.as_deref().map_or(true, |k| task_mentions(task, k))
                            && difficulty
                                .as_deref()
                                .map_or(true, |d| task.difficulty.to_lowercase() == d)
                    })
                    .cloned()
                    .collect(),
                ..phase.clone()
            })
            .filter(|phase| !phase.tasks.is_empty())
            .collect()
    }
}

fn task_mentions(task: &Task, keyword: &str) -> bool {
    task.title.to_lowercase().contains(keyword)
        || task.description.to_lowercase().contains(keyword)
        || task.reason.to_lowercase().contains(keyword)
        || task
            .skills
            .iter()
            .any(|s| s.to_lowercase().contains(keyword))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_id: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapProgress {
    pub phases: Vec<PhaseProgress>,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl RoadmapProgress {
    /// Unknown task ids are ignored.
    pub fn compute(roadmap: &Roadmap, completed: &HashSet<String>) -> Self {
        let phases: Vec<PhaseProgress> = roadmap
            .phases
            .iter()
            .map(|phase| {
                let total = phase.tasks.len();
                let done = phase
                    .tasks
                    .iter()
                    .filter(|t| completed.contains(&t.id))
                    .count();
                PhaseProgress {
                    phase_id: phase.id.clone(),
                    completed: done,
                    total,
                    percent: percent(done, total),
                }
            })
            .collect();

        let total = phases.iter().map(|p| p.total).sum();
        let done = phases.iter().map(|p| p.completed).sum();
        Self {
            phases,
            completed: done,
            total,
            percent: percent(done, total),
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((done * 100) / total) as u8
    }
}

/// Parses the `completed=a,b,c` query value.
pub fn completed_set(raw: Option<&str>) -> HashSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plain-text export of the roadmap with completion marks.
pub fn render_text(
    roadmap: &Roadmap,
    completed: &HashSet<String>,
    generated_at: DateTime<Utc>,
) -> String {
    let rule = "=".repeat(77);
    let mut out = String::new();

    let _ = writeln!(out, "CAREER ROADMAP: {}", roadmap.career.to_uppercase());
    let _ = writeln!(out, "Generated on: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "Experience Level: {}", roadmap.experience_level);
    let _ = writeln!(out, "Execution Path: {}", roadmap.path.as_str().to_uppercase());
    let _ = writeln!(out, "\n{rule}\n");
    let _ = writeln!(out, "CAREER OVERVIEW");
    let _ = writeln!(out, "- Career: {}", roadmap.career);
    let _ = writeln!(out, "- Timeline: {}", roadmap.timeline);
    let _ = writeln!(out, "- Salary Range: {}", roadmap.salary_range);
    let _ = writeln!(out, "- Market Demand: {}", roadmap.demand_level);
    let _ = writeln!(out, "- Confidence Level: {}%", roadmap.confidence);
    let _ = writeln!(out, "\nREQUIRED SKILLS");
    for skill in &roadmap.skills_required {
        let _ = writeln!(out, "  • {skill}");
    }
    let _ = writeln!(out, "\n{rule}");

    for phase in &roadmap.phases {
        let done = phase
            .tasks
            .iter()
            .filter(|t| completed.contains(&t.id))
            .count();
        let _ = writeln!(out, "\nPHASE {}: {}", phase.number, phase.name);
        let _ = writeln!(out, "Duration: {}", phase.duration);
        let _ = writeln!(out, "Description: {}", phase.description);
        let _ = writeln!(out, "Progress: {done}/{} tasks completed", phase.tasks.len());

        for task in &phase.tasks {
            let mark = if completed.contains(&task.id) { '✓' } else { '○' };
            let _ = writeln!(out, "\n  {mark} {}", task.title);
            let _ = writeln!(out, "     Difficulty: {}", task.difficulty);
            let _ = writeln!(
                out,
                "     Timeline: {} days ({} hours)",
                task.estimated_days, task.estimated_hours
            );
            let _ = writeln!(out, "     Priority: {}", task.priority);
            let _ = writeln!(out, "     Why: {}", task.reason);
            let _ = writeln!(out, "     Impact: {}", task.impact);
            if !task.resources.is_empty() {
                let _ = writeln!(out, "     Resources:");
                for resource in &task.resources {
                    let _ = writeln!(out, "       - {resource}");
                }
            }
        }
    }

    out
}
