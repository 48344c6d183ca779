use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_EXPERIENCE_LEVEL: &str = "Fresher";

const PLACEHOLDER_DESCRIPTION: &str = "A rewarding career path based on your skills.";
const PLACEHOLDER_WHY: &str = "This career aligns with your profile.";

/// Execution path the student is preparing for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerPath {
    Internship,
    #[default]
    Placement,
    Studies,
}

impl CareerPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            CareerPath::Internship => "internship",
            CareerPath::Placement => "placement",
            CareerPath::Studies => "studies",
        }
    }
}

/// One month/step of the learning roadmap. The guidance API returns either a
/// plain sentence or a structured object per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoadmapStep {
    Text(String),
    Detail(Map<String, Value>),
}

/// Recommendation returned by the guidance endpoint. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommended_career: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_this_career: Option<String>,
    #[serde(default)]
    pub priority_skills: Vec<String>,
    #[serde(default)]
    pub short_term_steps: Vec<String>,
    #[serde(default)]
    pub learning_roadmap: Vec<RoadmapStep>,
    #[serde(
        default,
        alias = "readiness_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub readiness_score: Option<f64>,
}

impl RecommendationResult {
    /// Trims the title and clamps percentages into `[0, 100]`.
    pub fn normalized(mut self) -> Self {
        self.recommended_career = self.recommended_career.trim().to_string();
        self.confidence_score = clamp_percent(self.confidence_score);
        self.readiness_score = self.readiness_score.map(clamp_percent);
        self
    }

    pub fn description_or_placeholder(&self) -> &str {
        self.career_description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(PLACEHOLDER_DESCRIPTION)
    }

    pub fn why_or_placeholder(&self) -> &str {
        self.why_this_career
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(PLACEHOLDER_WHY)
    }

    /// Explicit readiness if the service gave one, else the confidence score.
    pub fn effective_readiness(&self) -> f64 {
        self.readiness_score.unwrap_or(self.confidence_score)
    }
}

pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// The Shared Career State as persisted under `careerData`.
///
/// Missing keys in a persisted document fall back to their defaults, so older
/// or partial entries still hydrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerState {
    pub selected_career: Option<String>,
    pub experience_level: String,
    pub selected_skills: Vec<String>,
    pub selected_path: CareerPath,
    pub career_analysis: Option<RecommendationResult>,
    pub confidence: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for CareerState {
    fn default() -> Self {
        Self {
            selected_career: None,
            experience_level: DEFAULT_EXPERIENCE_LEVEL.to_string(),
            selected_skills: Vec::new(),
            selected_path: CareerPath::default(),
            career_analysis: None,
            confidence: 0.0,
            last_updated: None,
        }
    }
}

impl CareerState {
    /// `careerAnalysis != null ⇒ selectedCareer == careerAnalysis.recommendedCareer`.
    pub fn is_consistent(&self) -> bool {
        match &self.career_analysis {
            None => true,
            Some(analysis) => {
                self.selected_career.as_deref() == Some(analysis.recommended_career.as_str())
            }
        }
    }
}

/// Partial update for `update_career_data`. Absent and `null` keys are both
/// left untouched; only `clear_career_data` resets fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerUpdate {
    pub selected_career: Option<String>,
    pub experience_level: Option<String>,
    pub selected_skills: Option<Vec<String>>,
    pub selected_path: Option<CareerPath>,
    pub career_analysis: Option<RecommendationResult>,
    pub confidence: Option<f64>,
}

/// A `CareerUpdate` that names exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    SelectedCareer(String),
    ExperienceLevel(String),
    SelectedSkills(Vec<String>),
    SelectedPath(CareerPath),
    CareerAnalysis(RecommendationResult),
    Confidence(f64),
}

impl CareerUpdate {
    /// Splits off a single-field update; anything else comes back unchanged.
    pub fn single_field(self) -> Result<FieldUpdate, CareerUpdate> {
        let present = [
            self.selected_career.is_some(),
            self.experience_level.is_some(),
            self.selected_skills.is_some(),
            self.selected_path.is_some(),
            self.career_analysis.is_some(),
            self.confidence.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();
        if present != 1 {
            return Err(self);
        }

        let field = match self {
            CareerUpdate { selected_career: Some(name), .. } => FieldUpdate::SelectedCareer(name),
            CareerUpdate { experience_level: Some(level), .. } => FieldUpdate::ExperienceLevel(level),
            CareerUpdate { selected_skills: Some(skills), .. } => FieldUpdate::SelectedSkills(skills),
            CareerUpdate { selected_path: Some(path), .. } => FieldUpdate::SelectedPath(path),
            CareerUpdate { career_analysis: Some(analysis), .. } => {
                FieldUpdate::CareerAnalysis(analysis)
            }
            CareerUpdate { confidence: Some(confidence), .. } => FieldUpdate::Confidence(confidence),
            other => return Err(other),
        };
        Ok(field)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_career.is_none()
            && self.experience_level.is_none()
            && self.selected_skills.is_none()
            && self.selected_path.is_none()
            && self.career_analysis.is_none()
            && self.confidence.is_none()
    }
}
