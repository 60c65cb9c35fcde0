use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{PickOutcome, ReportStatus};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeskError {
    #[error("Invalid sport: {0}")]
    InvalidSport(String),

    #[error("Report {report_id} is already published")]
    AlreadyPublished { report_id: Uuid },

    #[error("Report {report_id} is not published (status: {status})")]
    NotPublished { report_id: Uuid, status: ReportStatus },

    #[error("Report {report_id} is {status} and no longer accepts changes")]
    ReportLocked { report_id: Uuid, status: ReportStatus },

    #[error("{entity} {entity_id} belongs to report {actual_report}, not {expected_report}")]
    CrossReportReference {
        entity: &'static str,
        entity_id: Uuid,
        expected_report: Uuid,
        actual_report: Uuid,
    },

    #[error("Cannot record outcome for {pick_id} before game time {game_time} (now {now})")]
    PrematureOutcome {
        pick_id: Uuid,
        game_time: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("{entity_id} already settled as {existing}; use a correction to change it to {requested}")]
    OutcomeConflict {
        entity_id: Uuid,
        existing: PickOutcome,
        requested: PickOutcome,
    },

    #[error("Unparseable line: {0:?}")]
    UnparseableLine(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DeskError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        DeskError::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
