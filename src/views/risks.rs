//! Risk alert page.

use serde::Serialize;

use super::filter::{Filter, matches_search};
use super::{PageStatus, absorb};
use crate::api::DashboardApi;
use crate::api::risks::ALL_PROJECTS;
use crate::models::{RiskAlert, RiskReport, RiskStatus, RiskType, Severity};
use crate::{Error, Result};

/// Counts over active alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RiskBoard {
    alerts: Vec<RiskAlert>,
    pub status: PageStatus,
    pub search: String,
    pub severity: Filter<Severity>,
    pub kind: Filter<RiskType>,
    /// Include RESOLVED alerts in the list
    pub show_resolved: bool,
    pub report: Option<RiskReport>,
}

impl RiskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[RiskAlert] {
        &self.alerts
    }

    pub async fn load(&mut self, api: &DashboardApi) -> Result<()> {
        let result = api.risks().alerts().await;
        if let Some(alerts) = absorb(&mut self.status, result)? {
            self.alerts = alerts;
        }
        Ok(())
    }

    /// Alerts passing every filter, most severe first.
    pub fn visible(&self) -> Vec<&RiskAlert> {
        let mut alerts: Vec<&RiskAlert> = self
            .alerts
            .iter()
            .filter(|a| self.show_resolved || a.is_active())
            .filter(|a| {
                matches_search(
                    &self.search,
                    &[a.title.as_str(), a.description.as_str(), a.project.as_str()],
                )
            })
            .filter(|a| self.severity.matches(&a.severity))
            .filter(|a| self.kind.matches(&a.kind))
            .collect();
        alerts.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
        alerts
    }

    pub fn stats(&self) -> RiskStats {
        self.alerts
            .iter()
            .filter(|a| a.is_active())
            .fold(RiskStats::default(), |mut s, a| {
                s.total += 1;
                match a.severity {
                    Severity::High => s.high += 1,
                    Severity::Medium => s.medium += 1,
                    Severity::Low => s.low += 1,
                }
                s
            })
    }

    /// Mark an alert resolved remotely, then locally.
    pub async fn resolve(&mut self, api: &DashboardApi, id: &str) -> Result<()> {
        let alert = self
            .alerts
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("risk alert {}", id)))?;
        if !alert.is_active() {
            return Err(Error::InvalidInput(format!("risk alert {} is already resolved", id)));
        }
        let fetched = api.risks().resolve(id).await?;
        fetched.data.confirm(&format!("resolve risk alert {}", id))?;
        self.status.note(&fetched.origin);
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.status = RiskStatus::Resolved;
        }
        Ok(())
    }

    /// Generate a portfolio-wide risk report.
    pub async fn generate_report(&mut self, api: &DashboardApi) -> Result<&RiskReport> {
        let fetched = api.risks().generate_report(ALL_PROJECTS).await?;
        self.status.note(&fetched.origin);
        Ok(self.report.insert(fetched.data))
    }
}
