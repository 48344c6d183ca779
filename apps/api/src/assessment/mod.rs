// Assessment Collector: form input, clamping, normalization and progress.

pub mod collector;
pub mod handlers;

pub use collector::{AssessmentError, AssessmentInput, GuidanceRequest, InterestThreshold};
