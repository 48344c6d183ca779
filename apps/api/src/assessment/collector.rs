//! Assessment Collector: accumulates form input and produces the normalized
//! guidance request.
//!
//! Ratings keep the order they were entered in; that order is the order of
//! the normalized skill and interest lists.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const MAX_SKILL_RATING: u8 = 5;
pub const MAX_INTEREST_PERCENT: u8 = 100;
pub const MAX_CGPA: f64 = 10.0;

pub const DEFAULT_GOALS: &str = "Looking for a role in technology";
pub const DEFAULT_EXPERIENCE: &str = "Fresher";

const DEFAULT_CGPA: f64 = 7.0;
const DEFAULT_INTEREST: u8 = 50;
const FORM_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "SQL",
    "ML",
    "Communication",
    "ProblemSolving",
];
const FORM_INTERESTS: &[&str] = &[
    "Data_Interest",
    "Development_Interest",
    "Management_Interest",
    "Research_Interest",
    "Design_Interest",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Name is required")]
    MissingName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Rate at least one skill before submitting")]
    NoSkillsRated,
}

// ────────────────────────────────────────────────────────────────────────────
// Interest thresholds
// ────────────────────────────────────────────────────────────────────────────

/// Interest cut-off. Each form that submits interests declares its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestThreshold {
    /// Strictly greater than the value.
    Above(u8),
    /// Greater than or equal to the value.
    AtLeast(u8),
}

impl InterestThreshold {
    /// Single-page guidance form.
    pub const GUIDANCE_PAGE: Self = InterestThreshold::Above(30);
    /// Multi-step assessment wizard (also drives its progress bar).
    pub const ASSESSMENT_WIZARD: Self = InterestThreshold::Above(40);
    /// Guidance step of the career journey.
    pub const GUIDANCE_JOURNEY: Self = InterestThreshold::AtLeast(60);

    pub fn admits(&self, percent: u8) -> bool {
        match *self {
            InterestThreshold::Above(limit) => percent > limit,
            InterestThreshold::AtLeast(limit) => percent >= limit,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ordered ratings
// ────────────────────────────────────────────────────────────────────────────

/// Name → score pairs in entry order. Setting an existing name updates it in
/// place without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedScores(Vec<(String, u8)>);

impl OrderedScores {
    pub fn set(&mut self, name: &str, value: u8) {
        match self.0.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for OrderedScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Raw slider values straight from the request, in document order.
#[derive(Debug, Clone, Default)]
struct RawScores(Vec<(String, f64)>);

impl<'de> Deserialize<'de> for RawScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = RawScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of names to numeric scores")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<RawScores, M::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    entries.push((name, value));
                }
                Ok(RawScores(entries))
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AssessmentInput
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawAssessment {
    name: String,
    email: String,
    cgpa: Option<f64>,
    skills: RawScores,
    interests: RawScores,
    goals: String,
    experience: String,
}

/// Form state for one assessment. Every value is clamped on entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAssessment")]
pub struct AssessmentInput {
    pub name: String,
    pub email: String,
    cgpa: f64,
    skills: OrderedScores,
    interests: OrderedScores,
    pub goals: String,
    pub experience: String,
}

impl From<RawAssessment> for AssessmentInput {
    fn from(raw: RawAssessment) -> Self {
        let mut input = AssessmentInput {
            name: raw.name,
            email: raw.email,
            cgpa: 0.0,
            skills: OrderedScores::default(),
            interests: OrderedScores::default(),
            goals: raw.goals,
            experience: raw.experience,
        };
        input.set_cgpa(raw.cgpa.unwrap_or(DEFAULT_CGPA));
        for (name, value) in raw.skills.0 {
            input.set_skill(&name, value);
        }
        for (name, value) in raw.interests.0 {
            input.set_interest(&name, value);
        }
        input
    }
}

impl Default for AssessmentInput {
    /// A freshly opened form: all skills unrated, all interests at 50%.
    fn default() -> Self {
        let mut input = AssessmentInput {
            name: String::new(),
            email: String::new(),
            cgpa: DEFAULT_CGPA,
            skills: OrderedScores::default(),
            interests: OrderedScores::default(),
            goals: String::new(),
            experience: String::new(),
        };
        for skill in FORM_SKILLS {
            input.skills.set(skill, 0);
        }
        for interest in FORM_INTERESTS {
            input.interests.set(interest, DEFAULT_INTEREST);
        }
        input
    }
}

impl AssessmentInput {
    pub fn cgpa(&self) -> f64 {
        self.cgpa
    }

    pub fn skills(&self) -> &OrderedScores {
        &self.skills
    }

    pub fn interests(&self) -> &OrderedScores {
        &self.interests
    }

    /// Clamps to `[0, 10]` with one-decimal granularity.
    pub fn set_cgpa(&mut self, cgpa: f64) {
        self.cgpa = if cgpa.is_finite() {
            ((cgpa * 10.0).round() / 10.0).clamp(0.0, MAX_CGPA)
        } else {
            0.0
        };
    }

    /// Slider values are whole numbers; fractions are truncated, then clamped to `[0, 5]`.
    pub fn set_skill(&mut self, name: &str, rating: f64) {
        self.skills.set(name, clamp_slider(rating, MAX_SKILL_RATING));
    }

    /// Truncated, then clamped to `[0, 100]`.
    pub fn set_interest(&mut self, name: &str, percent: f64) {
        self.interests
            .set(name, clamp_slider(percent, MAX_INTEREST_PERCENT));
    }

    /// Cosmetic progress: name, email, ≥3 rated skills, ≥2 interests above the
    /// wizard threshold. Each bucket is worth 25%.
    pub fn completion_percent(&self) -> u8 {
        let skills_rated = self.skills.iter().filter(|(_, v)| *v > 0).count();
        let interests_marked = self
            .interests
            .iter()
            .filter(|(_, v)| InterestThreshold::ASSESSMENT_WIZARD.admits(*v))
            .count();

        let filled = [
            !self.name.trim().is_empty(),
            !self.email.trim().is_empty(),
            skills_rated >= 3,
            interests_marked >= 2,
        ]
        .iter()
        .filter(|done| **done)
        .count();

        (filled * 25).min(100) as u8
    }

    /// Checks the required fields before anything is sent upstream.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.name.trim().is_empty() {
            return Err(AssessmentError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(AssessmentError::MissingEmail);
        }
        if !self.skills.iter().any(|(_, rating)| rating > 0) {
            return Err(AssessmentError::NoSkillsRated);
        }
        Ok(())
    }

    /// Builds the request body for the guidance endpoint.
    pub fn normalize(&self, threshold: InterestThreshold) -> GuidanceRequest {
        let skills = self
            .skills
            .iter()
            .filter(|(_, rating)| *rating > 0)
            .map(|(skill, rating)| format!("{skill} (Level: {rating}/{MAX_SKILL_RATING})"))
            .collect();

        let interests = self
            .interests
            .iter()
            .filter(|(_, percent)| threshold.admits(*percent))
            .map(|(interest, _)| interest_label(interest))
            .collect();

        GuidanceRequest {
            skills,
            interests,
            academics: format!("CGPA: {}", self.cgpa),
            goals: non_blank_or(&self.goals, DEFAULT_GOALS),
            experience: non_blank_or(&self.experience, DEFAULT_EXPERIENCE),
        }
    }
}

/// Body of `POST /career/career-guidance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceRequest {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub academics: String,
    pub goals: String,
    pub experience: String,
}

/// `Data_Interest` → `Data`, `Problem_Solving_Interest` → `Problem Solving`.
pub fn interest_label(raw: &str) -> String {
    raw.replacen("_Interest", "", 1).replacen('_', " ", 1)
}

fn clamp_slider(value: f64, max: u8) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().clamp(0.0, f64::from(max)) as u8
}

fn non_blank_or(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> AssessmentInput {
        serde_json::from_value(value).unwrap()
    }

    /// Parses request text directly; `json!` maps are key-sorted and lose entry order.
    fn input_from_body(body: &str) -> AssessmentInput {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_end_to_end_normalization_wizard_threshold() {
        let assessment = input(json!({
            "skills": { "Python": 4, "SQL": 0 },
            "interests": { "Data_Interest": 70, "Design_Interest": 20 },
            "cgpa": 8.2
        }));

        let request = assessment.normalize(InterestThreshold::ASSESSMENT_WIZARD);
        assert_eq!(request.skills, vec!["Python (Level: 4/5)".to_string()]);
        assert_eq!(request.interests, vec!["Data".to_string()]);
        assert_eq!(request.academics, "CGPA: 8.2");
        assert_eq!(request.goals, DEFAULT_GOALS);
        assert_eq!(request.experience, DEFAULT_EXPERIENCE);
    }

    #[test]
    fn test_skill_order_follows_entry_order_not_alphabet() {
        let assessment = input_from_body(
            r#"{"skills": {"SQL": 2, "Python": 5, "Java": 0, "Communication": 3}}"#,
        );
        let request = assessment.normalize(InterestThreshold::GUIDANCE_PAGE);
        assert_eq!(
            request.skills,
            vec![
                "SQL (Level: 2/5)".to_string(),
                "Python (Level: 5/5)".to_string(),
                "Communication (Level: 3/5)".to_string(),
            ]
        );
    }

    #[test]
    fn test_thresholds_per_call_site() {
        let assessment = input_from_body(
            r#"{"interests": {
                "Data_Interest": 30,
                "Development_Interest": 31,
                "Management_Interest": 41,
                "Research_Interest": 60,
                "Design_Interest": 59
            }}"#,
        );

        assert_eq!(
            assessment.normalize(InterestThreshold::GUIDANCE_PAGE).interests,
            vec!["Development", "Management", "Research", "Design"]
        );
        assert_eq!(
            assessment
                .normalize(InterestThreshold::ASSESSMENT_WIZARD)
                .interests,
            vec!["Management", "Research", "Design"]
        );
        assert_eq!(
            assessment
                .normalize(InterestThreshold::GUIDANCE_JOURNEY)
                .interests,
            vec!["Research"]
        );
    }

    #[test]
    fn test_values_are_clamped() {
        let assessment = input(json!({
            "cgpa": 11.37,
            "skills": { "Python": 9, "Java": -2, "SQL": 3.9 },
            "interests": { "Data_Interest": 250 }
        }));
        assert_eq!(assessment.cgpa(), 10.0);
        assert_eq!(assessment.skills().get("Python"), Some(5));
        assert_eq!(assessment.skills().get("Java"), Some(0));
        assert_eq!(assessment.skills().get("SQL"), Some(3));
        assert_eq!(assessment.interests().get("Data_Interest"), Some(100));
    }

    #[test]
    fn test_cgpa_one_decimal_granularity() {
        let mut assessment = AssessmentInput::default();
        assessment.set_cgpa(7.46);
        assert_eq!(assessment.cgpa(), 7.5);
        assessment.set_cgpa(7.0);
        assert_eq!(assessment.normalize(InterestThreshold::GUIDANCE_PAGE).academics, "CGPA: 7");
        assessment.set_cgpa(f64::NAN);
        assert_eq!(assessment.cgpa(), 0.0);
    }

    #[test]
    fn test_interest_labels() {
        assert_eq!(interest_label("Data_Interest"), "Data");
        assert_eq!(interest_label("Problem_Solving_Interest"), "Problem Solving");
        assert_eq!(interest_label("Design"), "Design");
    }

    #[test]
    fn test_completion_percent_buckets() {
        let mut assessment = AssessmentInput::default();
        // Default form: every interest sits at 50, which already passes the wizard threshold.
        assert_eq!(assessment.completion_percent(), 25);

        assessment.name = "Asha".to_string();
        assessment.email = "asha@example.com".to_string();
        assert_eq!(assessment.completion_percent(), 75);

        assessment.set_skill("Python", 4.0);
        assessment.set_skill("SQL", 3.0);
        assert_eq!(assessment.completion_percent(), 75);
        assessment.set_skill("ML", 1.0);
        assert_eq!(assessment.completion_percent(), 100);
    }

    #[test]
    fn test_updating_a_skill_keeps_its_position() {
        let mut assessment = AssessmentInput::default();
        assessment.set_skill("SQL", 2.0);
        assessment.set_skill("Python", 1.0);
        let request = assessment.normalize(InterestThreshold::GUIDANCE_PAGE);
        assert_eq!(
            request.skills,
            vec!["Python (Level: 1/5)".to_string(), "SQL (Level: 2/5)".to_string()]
        );
    }

    #[test]
    fn test_default_form_serializes_in_form_order() {
        let value = serde_json::to_string(&AssessmentInput::default()).unwrap();
        let python = value.find("\"Python\"").unwrap();
        let problem_solving = value.find("\"ProblemSolving\"").unwrap();
        assert!(python < problem_solving);
    }

    #[test]
    fn test_validate_required_fields() {
        let mut assessment = AssessmentInput::default();
        assert_eq!(assessment.validate(), Err(AssessmentError::MissingName));
        assessment.name = "Asha".to_string();
        assert_eq!(assessment.validate(), Err(AssessmentError::MissingEmail));
        assessment.email = "asha@example.com".to_string();
        assert_eq!(assessment.validate(), Err(AssessmentError::NoSkillsRated));
        assessment.set_skill("SQL", 2.0);
        assert_eq!(assessment.validate(), Ok(()));
    }

    #[test]
    fn test_explicit_goals_and_experience_carried_through() {
        let assessment = input(json!({
            "goals": "  Become a data scientist ",
            "experience": "1 year internship"
        }));
        let request = assessment.normalize(InterestThreshold::GUIDANCE_PAGE);
        assert_eq!(request.goals, "Become a data scientist");
        assert_eq!(request.experience, "1 year internship");
    }
}
