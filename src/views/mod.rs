//! Page controllers.
//!
//! Each page owns its loaded records plus the filter and form state the user
//! has entered. Filtering is pure predicate evaluation over what is in
//! memory. A later response always replaces earlier state.
//!
//! Pages:
//! - [`DashboardView`] - overview statistics and trends
//! - [`TaskBoard`] - task list with create, advance, delete, embedded assistant
//! - [`RiskBoard`] - risk alerts with filters, stats, resolve, risk report
//! - [`ReportView`] - health report, time range, natural-language query
//! - [`ChatSession`] - assistant conversation with suggestions and export

pub mod chat;
pub mod dashboard;
pub mod filter;
pub mod reports;
pub mod risks;
pub mod tasks;

pub use chat::{ChatSession, Transcript, contextual_suggestions, quick_questions};
pub use dashboard::DashboardView;
pub use filter::{Filter, matches_search};
pub use reports::{BarPoint, QueryResult, ReportView, TimeRange};
pub use risks::{RiskBoard, RiskStats};
pub use tasks::TaskBoard;

use serde::Serialize;

use crate::api::{Fetched, Origin};
use crate::client::ApiError;
use crate::{Error, Result};

/// What the page currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Showing data from the service
    Live,
    /// Showing sample data because the service call failed
    Sample { cause: ApiError },
    /// The load failed and no data could be shown
    Failed { error: ApiError },
}

impl PageStatus {
    pub fn from_origin(origin: &Origin) -> Self {
        match origin {
            Origin::Live => PageStatus::Live,
            Origin::Fallback { cause } => PageStatus::Sample {
                cause: cause.clone(),
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, PageStatus::Live | PageStatus::Sample { .. })
    }

    /// Notice to show above the page content, if any.
    pub fn banner(&self) -> Option<String> {
        match self {
            PageStatus::Sample { cause } => Some(format!("Showing sample data: {}", cause)),
            PageStatus::Failed { error } => Some(format!("Could not load data: {}", error)),
            PageStatus::Idle | PageStatus::Live => None,
        }
    }

    /// Short name for JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Idle => "idle",
            PageStatus::Live => "live",
            PageStatus::Sample { .. } => "sample",
            PageStatus::Failed { .. } => "failed",
        }
    }

    /// Record the origin of a mutation result: sample data taints the page.
    pub(crate) fn note(&mut self, origin: &Origin) {
        if let Origin::Fallback { cause } = origin {
            *self = PageStatus::Sample {
                cause: cause.clone(),
            };
        }
    }
}

impl Serialize for PageStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// Settle a page load: service failures become page state, anything else
/// (invalid input, local errors) is returned.
pub(crate) fn absorb<T>(status: &mut PageStatus, result: Result<Fetched<T>>) -> Result<Option<T>> {
    match result {
        Ok(fetched) => {
            *status = PageStatus::from_origin(&fetched.origin);
            Ok(Some(fetched.data))
        }
        Err(Error::Api(error)) => {
            tracing::warn!(error = %error, "page load failed");
            *status = PageStatus::Failed { error };
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_live_and_sample() {
        let mut status = PageStatus::Idle;
        let got = absorb(&mut status, Ok(Fetched::live(1))).unwrap();
        assert_eq!(got, Some(1));
        assert_eq!(status, PageStatus::Live);

        let got = absorb(&mut status, Ok(Fetched::fallback(2, ApiError::NotFound))).unwrap();
        assert_eq!(got, Some(2));
        assert!(status.banner().unwrap().starts_with("Showing sample data"));
    }

    #[test]
    fn test_absorb_api_error_becomes_failed_state() {
        let mut status = PageStatus::Live;
        let got: Option<u8> = absorb(&mut status, Err(ApiError::Unauthorized.into())).unwrap();
        assert_eq!(got, None);
        assert!(!status.is_loaded());
        assert_eq!(status.as_str(), "failed");
    }

    #[test]
    fn test_absorb_passes_local_errors_through() {
        let mut status = PageStatus::Idle;
        let result: Result<Option<u8>> =
            absorb(&mut status, Err(Error::InvalidInput("bad".into())));
        assert!(result.is_err());
        assert_eq!(status, PageStatus::Idle);
    }

    #[test]
    fn test_note_only_taints_on_fallback() {
        let mut status = PageStatus::Live;
        status.note(&Origin::Live);
        assert_eq!(status, PageStatus::Live);
        status.note(&Origin::Fallback {
            cause: ApiError::Timeout(30),
        });
        assert_eq!(status.as_str(), "sample");
    }
}
