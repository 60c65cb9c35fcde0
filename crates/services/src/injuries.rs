// Injury-to-pick linking and impact severity

use pickdesk_db::ReportStore;
use pickdesk_models::{DeskError, ImpactSeverity, InjuryUpdate, Result};
use tracing::debug;
use uuid::Uuid;

use crate::desk::{mutable_report, ReportDesk};

impl<S: ReportStore> ReportDesk<S> {
    /// Links are a set: linking the same pair twice changes nothing.
    pub fn link_injury_to_pick(&self, injury_id: Uuid, pick_id: Uuid) -> Result<InjuryUpdate> {
        let (injury, added) = self.store().transact(|book| {
            let report_id = book.injury(injury_id)?.report_id;
            mutable_report(book, report_id)?;

            let pick = book.pick(pick_id)?;
            if pick.report_id != report_id {
                return Err(DeskError::CrossReportReference {
                    entity: "pick",
                    entity_id: pick_id,
                    expected_report: report_id,
                    actual_report: pick.report_id,
                });
            }

            let injury = book.injury_mut(injury_id)?;
            let added = injury.link(pick_id);
            Ok((injury.clone(), added))
        })?;

        if added {
            debug!("Linked injury {} to pick {}", injury_id, pick_id);
        }
        Ok(injury)
    }

    /// Injuries currently linked to the pick, oldest report first.
    pub fn linked_injuries(&self, pick_id: Uuid) -> Result<Vec<InjuryUpdate>> {
        self.store().read(|book| {
            book.pick(pick_id)?;
            Ok(book
                .injuries_linked_to(pick_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }

    /// The highest severity among linked injuries, `None` when no injury is
    /// linked.
    pub fn impact_severity_for(&self, pick_id: Uuid) -> Result<Option<ImpactSeverity>> {
        self.store().read(|book| {
            book.pick(pick_id)?;
            Ok(book
                .injuries_linked_to(pick_id)
                .into_iter()
                .map(|injury| injury.impact)
                .max())
        })
    }
}
