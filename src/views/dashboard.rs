//! Dashboard page.

use super::{PageStatus, absorb};
use crate::Result;
use crate::api::DashboardApi;
use crate::models::{Dashboard, DistributionSlice};

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub status: PageStatus,
    pub data: Option<Dashboard>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &DashboardApi) -> Result<()> {
        let result = api.dashboard().overview().await;
        if let Some(data) = absorb(&mut self.status, result)? {
            self.data = Some(data);
        }
        Ok(())
    }

    /// Distribution slices with their share of the total, in percent.
    pub fn distribution_shares(&self) -> Vec<(&DistributionSlice, f64)> {
        let Some(data) = &self.data else {
            return Vec::new();
        };
        let total: u32 = data.task_distribution.iter().map(|s| s.value).sum();
        data.task_distribution
            .iter()
            .map(|s| {
                let share = if total == 0 {
                    0.0
                } else {
                    f64::from(s.value) * 100.0 / f64::from(total)
                };
                (s, share)
            })
            .collect()
    }

    /// Completed over planned for the latest period, in percent.
    pub fn latest_progress(&self) -> Option<f64> {
        let last = self.data.as_ref()?.project_progress.last()?;
        if last.planned == 0 {
            return None;
        }
        Some(f64::from(last.completed) * 100.0 / f64::from(last.planned))
    }
}
