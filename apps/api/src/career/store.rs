//! Shared Career State: single source of truth for cross-view career context.
//!
//! Every mutation goes through `CareerStore::mutate`, which holds the mutex
//! across read → modify → persist, writes the whole state (with a fresh
//! `lastUpdated`) under `careerData`, and only then commits to memory.
//! A failed persist leaves the in-memory state untouched.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::career::models::{
    clamp_percent, CareerPath, CareerState, CareerUpdate, RecommendationResult,
    DEFAULT_EXPERIENCE_LEVEL,
};
use crate::storage::{KeyValueStore, StorageError, CAREER_DATA_KEY};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to persist career data: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize career data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Career name cannot be empty")]
    EmptyCareer,
}

/// Whether persisted state has been loaded yet. Before hydration a missing
/// career means "not yet known", not "no career".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    NotHydrated,
    Hydrated,
}

/// Consistent read of the store at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct CareerSnapshot {
    pub readiness: Readiness,
    #[serde(flatten)]
    pub state: CareerState,
}

impl CareerSnapshot {
    /// The selected career, only once the store is hydrated.
    pub fn known_career(&self) -> Option<&str> {
        match self.readiness {
            Readiness::Hydrated => self.state.selected_career.as_deref(),
            Readiness::NotHydrated => None,
        }
    }

    pub fn known_analysis(&self) -> Option<&RecommendationResult> {
        match self.readiness {
            Readiness::Hydrated => self.state.career_analysis.as_ref(),
            Readiness::NotHydrated => None,
        }
    }
}

struct Inner {
    readiness: Readiness,
    state: CareerState,
}

#[derive(Clone)]
pub struct CareerStore {
    kv: Arc<dyn KeyValueStore>,
    inner: Arc<Mutex<Inner>>,
}

impl CareerStore {
    /// Creates a store with default state. Call `hydrate` to load persisted data.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            inner: Arc::new(Mutex::new(Inner {
                readiness: Readiness::NotHydrated,
                state: CareerState::default(),
            })),
        }
    }

    /// Loads the persisted entry if present. Idempotent: a hydrated store is
    /// never reloaded, so later writes cannot be clobbered by stale data.
    pub async fn hydrate(&self) -> Readiness {
        let mut inner = self.inner.lock().await;
        if inner.readiness == Readiness::NotHydrated {
            inner.state = load_persisted(self.kv.as_ref()).await;
            inner.readiness = Readiness::Hydrated;
        }
        inner.readiness
    }

    pub async fn snapshot(&self) -> CareerSnapshot {
        let inner = self.inner.lock().await;
        CareerSnapshot {
            readiness: inner.readiness,
            state: inner.state.clone(),
        }
    }

    pub async fn set_selected_career(&self, name: &str) -> Result<CareerState, StateError> {
        let name = name.to_string();
        self.mutate(move |state| apply_selected_career(state, &name))
            .await
    }

    pub async fn set_experience_level(&self, level: &str) -> Result<CareerState, StateError> {
        let level = level.to_string();
        self.mutate(move |state| {
            apply_experience_level(state, &level);
            Ok(())
        })
        .await
    }

    pub async fn set_selected_skills(&self, skills: Vec<String>) -> Result<CareerState, StateError> {
        self.mutate(move |state| {
            apply_selected_skills(state, skills);
            Ok(())
        })
        .await
    }

    pub async fn set_selected_path(&self, path: CareerPath) -> Result<CareerState, StateError> {
        self.mutate(move |state| {
            state.selected_path = path;
            Ok(())
        })
        .await
    }

    /// Stores the analysis with its career title and confidence in the same update.
    pub async fn set_career_analysis(
        &self,
        analysis: RecommendationResult,
    ) -> Result<CareerState, StateError> {
        self.mutate(move |state| {
            let confidence = analysis.confidence_score;
            apply_career_analysis(state, analysis)?;
            state.confidence = clamp_percent(confidence);
            Ok(())
        })
        .await
    }

    pub async fn set_confidence(&self, confidence: f64) -> Result<CareerState, StateError> {
        self.mutate(move |state| {
            state.confidence = clamp_percent(confidence);
            Ok(())
        })
        .await
    }

    /// Writes career, confidence and analysis from a fresh recommendation as
    /// one update, so no reader sees a half-applied result.
    pub async fn apply_recommendation(
        &self,
        result: RecommendationResult,
    ) -> Result<CareerState, StateError> {
        self.set_career_analysis(result).await
    }

    /// Merges only the keys present in `update`.
    pub async fn update_career_data(&self, update: CareerUpdate) -> Result<CareerState, StateError> {
        if update.is_empty() {
            self.hydrate().await;
            return Ok(self.snapshot().await.state);
        }

        self.mutate(move |state| {
            let CareerUpdate {
                selected_career,
                experience_level,
                selected_skills,
                selected_path,
                career_analysis,
                confidence,
            } = update;

            if let Some(level) = experience_level {
                apply_experience_level(state, &level);
            }
            if let Some(skills) = selected_skills {
                apply_selected_skills(state, skills);
            }
            if let Some(path) = selected_path {
                state.selected_path = path;
            }
            match (career_analysis, selected_career) {
                (Some(analysis), requested) => {
                    state.confidence = clamp_percent(analysis.confidence_score);
                    if let Some(requested) = requested {
                        if requested.trim() != analysis.recommended_career.trim() {
                            warn!(
                                "Update names career '{}' but analysis recommends '{}'; keeping the analysis",
                                requested, analysis.recommended_career
                            );
                        }
                    }
                    apply_career_analysis(state, analysis)?;
                }
                (None, Some(name)) => apply_selected_career(state, &name)?,
                (None, None) => {}
            }
            // An explicit confidence wins over the one carried by the analysis.
            if let Some(confidence) = confidence {
                state.confidence = clamp_percent(confidence);
            }
            Ok(())
        })
        .await
    }

    /// Resets every field and deletes the persisted entry.
    pub async fn clear_career_data(&self) -> Result<CareerState, StateError> {
        let mut inner = self.inner.lock().await;
        self.kv.remove(CAREER_DATA_KEY).await?;
        inner.state = CareerState::default();
        inner.readiness = Readiness::Hydrated;
        info!("Career data cleared");
        Ok(inner.state.clone())
    }

    async fn mutate<F>(&self, apply: F) -> Result<CareerState, StateError>
    where
        F: FnOnce(&mut CareerState) -> Result<(), StateError>,
    {
        let mut inner = self.inner.lock().await;

        // Never write defaults over a persisted entry we have not read yet.
        if inner.readiness == Readiness::NotHydrated {
            inner.state = load_persisted(self.kv.as_ref()).await;
            inner.readiness = Readiness::Hydrated;
        }

        let mut next = inner.state.clone();
        apply(&mut next)?;
        next.last_updated = Some(Utc::now());

        let serialized = serde_json::to_string(&next)?;
        self.kv.set(CAREER_DATA_KEY, &serialized).await?;

        debug!(
            "Career state persisted (career={:?}, path={})",
            next.selected_career,
            next.selected_path.as_str()
        );
        inner.state = next.clone();
        Ok(next)
    }
}

async fn load_persisted(kv: &dyn KeyValueStore) -> CareerState {
    let raw = match kv.get(CAREER_DATA_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return CareerState::default(),
        Err(e) => {
            warn!("Could not read persisted career data, using defaults: {e}");
            return CareerState::default();
        }
    };

    match serde_json::from_str::<CareerState>(&raw) {
        Ok(mut state) => {
            if !state.is_consistent() {
                if let Some(analysis) = &state.career_analysis {
                    warn!(
                        "Persisted career {:?} disagrees with analysis '{}'; repairing",
                        state.selected_career, analysis.recommended_career
                    );
                    state.selected_career = Some(analysis.recommended_career.clone());
                }
            }
            info!("Hydrated career data (career={:?})", state.selected_career);
            state
        }
        Err(e) => {
            warn!("Error loading career data from storage, using defaults: {e}");
            CareerState::default()
        }
    }
}

fn apply_selected_career(state: &mut CareerState, name: &str) -> Result<(), StateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StateError::EmptyCareer);
    }
    let stale = state
        .career_analysis
        .as_ref()
        .is_some_and(|a| a.recommended_career != name);
    if stale {
        debug!("Selected career changed to '{name}', dropping analysis for the previous career");
        state.career_analysis = None;
    }
    state.selected_career = Some(name.to_string());
    Ok(())
}

fn apply_career_analysis(
    state: &mut CareerState,
    analysis: RecommendationResult,
) -> Result<(), StateError> {
    let analysis = analysis.normalized();
    if analysis.recommended_career.is_empty() {
        return Err(StateError::EmptyCareer);
    }
    state.selected_career = Some(analysis.recommended_career.clone());
    state.career_analysis = Some(analysis);
    Ok(())
}

fn apply_experience_level(state: &mut CareerState, level: &str) {
    let level = level.trim();
    state.experience_level = if level.is_empty() {
        DEFAULT_EXPERIENCE_LEVEL.to_string()
    } else {
        level.to_string()
    };
}

fn apply_selected_skills(state: &mut CareerState, skills: Vec<String>) {
    state.selected_skills = skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    fn analysis(career: &str, confidence: f64) -> RecommendationResult {
        RecommendationResult {
            recommended_career: career.to_string(),
            confidence_score: confidence,
            career_description: None,
            why_this_career: None,
            priority_skills: vec!["SQL".to_string()],
            short_term_steps: vec![],
            learning_roadmap: vec![],
            readiness_score: None,
        }
    }

    async fn hydrated_store() -> (CareerStore, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let store = CareerStore::new(kv.clone());
        store.hydrate().await;
        (store, kv)
    }

    async fn persisted(kv: &MemoryStore) -> Option<CareerState> {
        kv.get(CAREER_DATA_KEY)
            .await
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_setter_writes_through_and_fresh_mount_reproduces_state() {
        let (store, kv) = hydrated_store().await;
        let before = Utc::now();

        store.set_selected_career("Data Analyst").await.unwrap();
        store.set_selected_path(CareerPath::Studies).await.unwrap();
        store
            .set_selected_skills(vec!["Python".to_string(), " ".to_string()])
            .await
            .unwrap();
        let live = store.set_confidence(64.0).await.unwrap();

        let remount = CareerStore::new(kv.clone());
        assert_eq!(remount.snapshot().await.readiness, Readiness::NotHydrated);
        remount.hydrate().await;
        let hydrated = remount.snapshot().await;

        assert_eq!(hydrated.readiness, Readiness::Hydrated);
        assert_eq!(hydrated.state.selected_career.as_deref(), Some("Data Analyst"));
        assert_eq!(hydrated.state.selected_path, CareerPath::Studies);
        assert_eq!(hydrated.state.selected_skills, vec!["Python".to_string()]);
        assert_eq!(hydrated.state.confidence, 64.0);
        assert_eq!(hydrated.state, live);
        assert!(hydrated.state.last_updated.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_and_removes_entry() {
        let (store, kv) = hydrated_store().await;
        store.set_selected_career("Data Analyst").await.unwrap();
        assert!(persisted(&kv).await.is_some());

        let first = store.clear_career_data().await.unwrap();
        assert!(persisted(&kv).await.is_none());
        let second = store.clear_career_data().await.unwrap();
        assert!(persisted(&kv).await.is_none());

        assert_eq!(first, second);
        assert_eq!(first, CareerState::default());
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields_untouched() {
        let (store, kv) = hydrated_store().await;
        store
            .apply_recommendation(analysis("Data Analyst", 77.0))
            .await
            .unwrap();
        store.set_experience_level("Intermediate").await.unwrap();

        let update: CareerUpdate =
            serde_json::from_value(serde_json::json!({ "selectedPath": "internship" })).unwrap();
        let state = store.update_career_data(update).await.unwrap();

        assert_eq!(state.selected_path, CareerPath::Internship);
        assert_eq!(state.selected_career.as_deref(), Some("Data Analyst"));
        assert_eq!(state.confidence, 77.0);
        assert_eq!(state.experience_level, "Intermediate");
        assert!(state.career_analysis.is_some());
        assert_eq!(persisted(&kv).await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_explicit_null_does_not_clear() {
        let (store, _kv) = hydrated_store().await;
        store.set_selected_career("Data Analyst").await.unwrap();

        let update: CareerUpdate = serde_json::from_value(serde_json::json!({
            "selectedCareer": null,
            "confidence": 12
        }))
        .unwrap();
        let state = store.update_career_data(update).await.unwrap();
        assert_eq!(state.selected_career.as_deref(), Some("Data Analyst"));
        assert_eq!(state.confidence, 12.0);
    }

    #[tokio::test]
    async fn test_analysis_setter_sets_career_atomically() {
        let (store, kv) = hydrated_store().await;
        let state = store
            .set_career_analysis(analysis("Data Analyst", 77.0))
            .await
            .unwrap();

        assert_eq!(state.selected_career.as_deref(), Some("Data Analyst"));
        assert_eq!(state.confidence, 77.0);
        assert!(state.is_consistent());

        let saved = persisted(&kv).await.unwrap();
        assert!(saved.is_consistent());
        assert_eq!(saved.confidence, 77.0);
    }

    #[tokio::test]
    async fn test_update_with_analysis_takes_its_confidence_unless_given() {
        let (store, _kv) = hydrated_store().await;
        let state = store
            .update_career_data(CareerUpdate {
                career_analysis: Some(analysis("Data Analyst", 64.0)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(state.confidence, 64.0);

        let state = store
            .update_career_data(CareerUpdate {
                career_analysis: Some(analysis("Data Analyst", 64.0)),
                confidence: Some(90.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(state.confidence, 90.0);
    }

    #[tokio::test]
    async fn test_changing_career_drops_mismatched_analysis() {
        let (store, _kv) = hydrated_store().await;
        store
            .set_career_analysis(analysis("Data Analyst", 77.0))
            .await
            .unwrap();
        let state = store.set_selected_career("Product Manager").await.unwrap();
        assert!(state.career_analysis.is_none());
        assert!(state.is_consistent());
    }

    #[tokio::test]
    async fn test_update_with_conflicting_career_keeps_analysis_title() {
        let (store, _kv) = hydrated_store().await;
        let update = CareerUpdate {
            selected_career: Some("Designer".to_string()),
            career_analysis: Some(analysis("Data Analyst", 70.0)),
            ..Default::default()
        };
        let state = store.update_career_data(update).await.unwrap();
        assert_eq!(state.selected_career.as_deref(), Some("Data Analyst"));
        assert!(state.is_consistent());
    }

    #[tokio::test]
    async fn test_empty_career_rejected() {
        let (store, kv) = hydrated_store().await;
        let err = store.set_selected_career("   ").await.unwrap_err();
        assert!(matches!(err, StateError::EmptyCareer));
        assert!(persisted(&kv).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_hydrates_to_defaults() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(CAREER_DATA_KEY, "{not json").await.unwrap();
        let store = CareerStore::new(kv);
        assert_eq!(store.hydrate().await, Readiness::Hydrated);
        assert_eq!(store.snapshot().await.state, CareerState::default());
    }

    #[tokio::test]
    async fn test_inconsistent_entry_is_repaired_on_hydrate() {
        let kv = Arc::new(MemoryStore::new());
        let torn = CareerState {
            selected_career: None,
            career_analysis: Some(analysis("Data Analyst", 77.0)),
            ..Default::default()
        };
        kv.set(CAREER_DATA_KEY, &serde_json::to_string(&torn).unwrap())
            .await
            .unwrap();
        let store = CareerStore::new(kv);
        store.hydrate().await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.known_career(), Some("Data Analyst"));
    }

    #[tokio::test]
    async fn test_write_before_hydrate_does_not_clobber_persisted_state() {
        let kv = Arc::new(MemoryStore::new());
        {
            let first = CareerStore::new(kv.clone());
            first
                .apply_recommendation(analysis("Data Analyst", 80.0))
                .await
                .unwrap();
        }

        let second = CareerStore::new(kv.clone());
        let snapshot = second.snapshot().await;
        assert_eq!(snapshot.readiness, Readiness::NotHydrated);
        assert_eq!(snapshot.known_career(), None);

        let state = second.set_selected_path(CareerPath::Internship).await.unwrap();
        assert_eq!(state.selected_career.as_deref(), Some("Data Analyst"));
        assert_eq!(state.confidence, 80.0);
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        async fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }
        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_memory_unchanged() {
        let store = CareerStore::new(Arc::new(FailingStore));
        store.hydrate().await;
        let err = store.set_selected_career("Data Analyst").await.unwrap_err();
        assert!(matches!(err, StateError::Storage(_)));
        assert_eq!(store.snapshot().await.state, CareerState::default());
    }
}
