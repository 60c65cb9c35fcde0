use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{PickOutcome, ReportStatus, Sport};
use crate::error::{DeskError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub sport: Sport,
    pub status: ReportStatus,
    pub generated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<String>,
    pub performance: Option<SystemPerformance>,
}

/// Aggregate W-L summary over the settled picks of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemPerformance {
    /// `"{wins}-{losses}"`; pushes are counted separately.
    pub record: String,
    /// Percentage in `0.0..=100.0`; pushes are excluded from the denominator.
    pub win_rate: f64,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub pending: u32,
}

impl Report {
    pub fn new(
        sport: Sport,
        performance: Option<SystemPerformance>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sport,
            status: ReportStatus::Draft,
            generated_at,
            published_at: None,
            published_by: None,
            performance,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == ReportStatus::Published
    }

    /// Children may be attached while draft or published.
    pub fn ensure_mutable(&self) -> Result<()> {
        match self.status {
            ReportStatus::Draft | ReportStatus::Published => Ok(()),
            status => Err(DeskError::ReportLocked {
                report_id: self.id,
                status,
            }),
        }
    }

    /// Moves a draft or unpublished report to published. Re-publishing stamps
    /// a fresh timestamp and publisher.
    pub fn publish(&mut self, published_by: &str, at: DateTime<Utc>) -> Result<()> {
        if self.is_published() {
            return Err(DeskError::AlreadyPublished { report_id: self.id });
        }

        self.status = ReportStatus::Published;
        self.published_at = Some(at);
        self.published_by = Some(published_by.to_string());
        Ok(())
    }

    /// Only changes status; publish history is retained.
    pub fn unpublish(&mut self) -> Result<()> {
        if !self.is_published() {
            return Err(DeskError::NotPublished {
                report_id: self.id,
                status: self.status,
            });
        }

        self.status = ReportStatus::Unpublished;
        Ok(())
    }
}

impl SystemPerformance {
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Option<PickOutcome>>,
    {
        let (mut wins, mut losses, mut pushes, mut pending) = (0u32, 0u32, 0u32, 0u32);

        for outcome in outcomes {
            match outcome {
                Some(PickOutcome::Win) => wins += 1,
                Some(PickOutcome::Loss) => losses += 1,
                Some(PickOutcome::Push) => pushes += 1,
                None => pending += 1,
            }
        }

        let decided = wins + losses;
        let win_rate = if decided > 0 {
            f64::from(wins) / f64::from(decided) * 100.0
        } else {
            0.0
        };

        Self {
            record: format!("{}-{}", wins, losses),
            win_rate,
            wins,
            losses,
            pushes,
            pending,
        }
    }

    pub fn settled(&self) -> u32 {
        self.wins + self.losses + self.pushes
    }

    /// One decimal place, e.g. `"66.7%"`.
    pub fn win_rate_display(&self) -> String {
        format!("{:.1}%", self.win_rate)
    }
}
