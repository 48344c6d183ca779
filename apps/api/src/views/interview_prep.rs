//! Interview prep view: a generated question session, general or for one
//! company. The role defaults to the selected career.

use async_trait::async_trait;

use crate::api_client::{ApiClient, ApiError};
use crate::career::store::CareerSnapshot;
use crate::interview::{self, PrepSession};
use crate::views::DependentView;

pub struct InterviewPrepView {
    api: ApiClient,
    company: Option<String>,
    role: Option<String>,
    focus_weak_areas: bool,
}

impl InterviewPrepView {
    pub fn new(
        api: ApiClient,
        company: Option<String>,
        role: Option<String>,
        focus_weak_areas: bool,
    ) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            api,
            company: clean(company),
            role: clean(role),
            focus_weak_areas,
        }
    }

    fn role<'a>(&'a self, snapshot: &'a CareerSnapshot) -> Option<&'a str> {
        self.role.as_deref().or_else(|| snapshot.known_career())
    }

    /// Company mode needs both a company and a role.
    fn company_mode<'a>(&'a self, snapshot: &'a CareerSnapshot) -> Option<(&'a str, &'a str)> {
        Some((self.company.as_deref()?, self.role(snapshot)?))
    }
}

#[async_trait]
impl DependentView for InterviewPrepView {
    type Data = PrepSession;

    fn name(&self) -> &'static str {
        "interview prep"
    }

    fn requires_career(&self) -> bool {
        false
    }

    async fn fetch(&self, snapshot: &CareerSnapshot) -> Result<PrepSession, ApiError> {
        match self.company_mode(snapshot) {
            Some((company, role)) => {
                interview::fetch_questions(&self.api, true, Some(company), Some(role)).await
            }
            None => {
                interview::fetch_questions(
                    &self.api,
                    self.focus_weak_areas,
                    None,
                    self.role(snapshot),
                )
                .await
            }
        }
    }

    fn fallback(&self, snapshot: &CareerSnapshot) -> PrepSession {
        match self.company_mode(snapshot) {
            Some((company, role)) => interview::mock_company_session(company, role),
            None => interview::mock_general_session(),
        }
    }
}
