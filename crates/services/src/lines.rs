// Append-only line movement ledger

use chrono::{DateTime, Utc};
use pickdesk_db::{ReportBook, ReportStore};
use pickdesk_models::{LineDirection, LineMovement, NewLineMovement, Result};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::desk::{mutable_report, ReportDesk};

fn append(
    book: &mut ReportBook,
    movement: NewLineMovement,
    now: DateTime<Utc>,
) -> Result<LineMovement> {
    let pick = book.pick(movement.pick_id)?;
    mutable_report(book, pick.report_id)?;

    let recorded = LineMovement::record(pick, movement, now)?;
    book.append_movement(recorded.clone());
    Ok(recorded)
}

fn log_recorded(movement: &LineMovement) {
    if movement.direction == LineDirection::Unknown {
        warn!(
            "🤷 Could not match pick {} recommendation to a side; direction recorded as unknown",
            movement.pick_id
        );
    }
    debug!(
        "📈 Line {} -> {} on pick {} ({}%, {}{})",
        movement.opening_line,
        movement.current_line,
        movement.pick_id,
        movement.movement_percentage,
        movement.direction.as_str(),
        if movement.sharp_money { ", sharp" } else { "" }
    );
}

impl<S: ReportStore> ReportDesk<S> {
    /// Appends a movement for a pick. Direction is advisory: when the
    /// recommendation can't be matched to a side it degrades to `unknown`
    /// instead of failing.
    pub fn record_movement(&self, movement: NewLineMovement) -> Result<LineMovement> {
        let now = self.now();
        let recorded = self.store().transact(|book| append(book, movement, now))?;
        log_recorded(&recorded);
        Ok(recorded)
    }

    /// Same as [`ReportDesk::record_movement`], scoped to a report: the pick
    /// must belong to `report_id`.
    pub fn attach_line_movement(
        &self,
        report_id: Uuid,
        movement: NewLineMovement,
    ) -> Result<LineMovement> {
        let now = self.now();
        let recorded = self.store().transact(|book| {
            book.report(report_id)?;
            book.pick_in_report(movement.pick_id, report_id)?;
            append(book, movement, now)
        })?;
        log_recorded(&recorded);
        Ok(recorded)
    }

    /// Movements for a pick in the order they were recorded.
    pub fn line_history(&self, pick_id: Uuid) -> Result<Vec<LineMovement>> {
        self.store().read(|book| {
            book.pick(pick_id)?;
            Ok(book
                .movements_for_pick(pick_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }
}
