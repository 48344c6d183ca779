//! Per-call fallback outcomes.
//!
//! Every upstream call site declares a `FallbackPolicy`. The policy decides
//! what a failed call turns into; nothing is retried.

use serde::Serialize;
use tracing::warn;

use super::ApiError;

/// What a call site does when its upstream request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Surface the failure to the caller (user-facing error).
    Rethrow,
    /// Substitute a literal mock dataset so the page is never empty.
    Mock,
    /// Substitute an empty/default structure.
    Empty,
}

/// Where the data a view renders came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    Fallback,
}

#[derive(Debug)]
pub enum Outcome<T> {
    Live(T),
    Fallback { value: T, reason: String },
    Failed(ApiError),
}

impl<T> Outcome<T> {
    /// Applies `policy` to an upstream result. `mock` is only evaluated for
    /// `FallbackPolicy::Mock` failures.
    pub fn resolve(
        context: &str,
        result: Result<T, ApiError>,
        policy: FallbackPolicy,
        mock: impl FnOnce() -> T,
    ) -> Self
    where
        T: Default,
    {
        match result {
            Ok(value) => Outcome::Live(value),
            Err(err) => match policy {
                FallbackPolicy::Rethrow => Outcome::Failed(err),
                FallbackPolicy::Mock => {
                    warn!("{context}: {}, using mock data ({err})", failure_kind(&err));
                    Outcome::Fallback {
                        value: mock(),
                        reason: err.user_message(),
                    }
                }
                FallbackPolicy::Empty => {
                    warn!("{context}: {}, using empty result ({err})", failure_kind(&err));
                    Outcome::Fallback {
                        value: T::default(),
                        reason: err.user_message(),
                    }
                }
            },
        }
    }

    pub fn source(&self) -> Option<DataSource> {
        match self {
            Outcome::Live(_) => Some(DataSource::Remote),
            Outcome::Fallback { .. } => Some(DataSource::Fallback),
            Outcome::Failed(_) => None,
        }
    }

    /// Collapses into a response body, or the error for `Failed`.
    pub fn into_sourced(self) -> Result<Sourced<T>, ApiError> {
        match self {
            Outcome::Live(data) => Ok(Sourced {
                source: DataSource::Remote,
                notice: None,
                data,
            }),
            Outcome::Fallback { value, reason } => Ok(Sourced {
                source: DataSource::Fallback,
                notice: Some(reason),
                data: value,
            }),
            Outcome::Failed(err) => Err(err),
        }
    }
}

fn failure_kind(err: &ApiError) -> &'static str {
    if err.is_transport() {
        "upstream unreachable"
    } else {
        "upstream rejected the request"
    }
}

/// Data tagged with its source, as returned to the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub data: T,
}

impl<T> Sourced<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            source: self.source,
            notice: self.notice,
            data: f(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> Result<Vec<u32>, ApiError> {
        Err(ApiError::Connect("refused".to_string()))
    }

    #[test]
    fn test_live_passes_through_without_calling_mock() {
        let outcome = Outcome::resolve("test", Ok(vec![1]), FallbackPolicy::Mock, || {
            panic!("mock must not run on success")
        });
        assert!(matches!(outcome, Outcome::Live(ref v) if v == &vec![1]));
        assert_eq!(outcome.source(), Some(DataSource::Remote));
    }

    #[test]
    fn test_mock_policy_substitutes_mock() {
        let outcome = Outcome::resolve("test", failure(), FallbackPolicy::Mock, || vec![9, 9]);
        let sourced = outcome.into_sourced().unwrap();
        assert_eq!(sourced.source, DataSource::Fallback);
        assert_eq!(sourced.data, vec![9, 9]);
        assert!(sourced.notice.is_some());
    }

    #[test]
    fn test_empty_policy_substitutes_default() {
        let outcome = Outcome::resolve("test", failure(), FallbackPolicy::Empty, || vec![9]);
        let sourced = outcome.into_sourced().unwrap();
        assert!(sourced.data.is_empty());
    }

    #[test]
    fn test_rethrow_policy_keeps_error() {
        let outcome = Outcome::resolve("test", failure(), FallbackPolicy::Rethrow, Vec::new);
        assert_eq!(outcome.source(), None);
        assert!(outcome.into_sourced().is_err());
    }
}
