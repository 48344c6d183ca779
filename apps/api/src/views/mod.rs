//! Dependent View Adapter.
//!
//! A view reads a snapshot of the Shared Career State, fetches its own data
//! from upstream and falls back to a pure local dataset when the fetch fails
//! or when the career it needs is not known yet. Views never write back to
//! the career state.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::api_client::outcome::{FallbackPolicy, Outcome};
use crate::api_client::ApiError;
use crate::career::store::CareerSnapshot;

pub mod handlers;
pub mod interview_prep;
pub mod job_match;
pub mod learning_path;
pub mod roadmap;
mod roadmap_catalog;

/// Notice attached when a view skips its fetch because no career is known.
pub const NO_CAREER_NOTICE: &str = "No career selected yet. Showing a sample.";

#[async_trait]
pub trait DependentView: Send + Sync {
    type Data: Serialize + Default + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the fetch needs a known career. Without one the view goes
    /// straight to its fallback.
    fn requires_career(&self) -> bool {
        true
    }

    fn policy(&self) -> FallbackPolicy {
        FallbackPolicy::Mock
    }

    /// Fixed notice shown with the fallback, instead of the failure message.
    fn fallback_notice(&self) -> Option<&'static str> {
        None
    }

    async fn fetch(&self, snapshot: &CareerSnapshot) -> Result<Self::Data, ApiError>;

    /// Must be deterministic for a given snapshot.
    fn fallback(&self, snapshot: &CareerSnapshot) -> Self::Data;
}

pub async fn load<V: DependentView>(view: &V, snapshot: &CareerSnapshot) -> Outcome<V::Data> {
    if view.requires_career() && snapshot.known_career().is_none() {
        debug!("{}: no known career, using fallback", view.name());
        return Outcome::Fallback {
            value: view.fallback(snapshot),
            reason: NO_CAREER_NOTICE.to_string(),
        };
    }

    let result = view.fetch(snapshot).await;
    let outcome = match Outcome::resolve(view.name(), result, view.policy(), || {
        view.fallback(snapshot)
    }) {
        Outcome::Fallback { value, reason } => Outcome::Fallback {
            value,
            reason: view
                .fallback_notice()
                .map(str::to_string)
                .unwrap_or(reason),
        },
        other => other,
    };
    debug!("{}: loaded from {:?}", view.name(), outcome.source());
    outcome
}
