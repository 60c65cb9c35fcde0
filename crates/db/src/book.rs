use std::collections::BTreeMap;

use pickdesk_models::{
    DeskError, InjuryUpdate, IntelligenceUpdate, LineMovement, OutcomeCorrection, Pick, Report,
    ReportStatus, Result, Sport,
};
use uuid::Uuid;

/// Every record the desk owns. Stores hand out shared references for reads
/// and private copies for transactions.
#[derive(Debug, Clone, Default)]
pub struct ReportBook {
    reports: BTreeMap<Uuid, Report>,
    picks: BTreeMap<Uuid, Pick>,
    injuries: BTreeMap<Uuid, InjuryUpdate>,
    intelligence: BTreeMap<Uuid, IntelligenceUpdate>,
    // insert-only
    movements: Vec<LineMovement>,
    corrections: Vec<OutcomeCorrection>,
}

impl ReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reports ─────────────────────────────────────────────────────────────

    pub fn report(&self, id: Uuid) -> Result<&Report> {
        self.reports
            .get(&id)
            .ok_or_else(|| DeskError::not_found("report", id))
    }

    pub fn report_mut(&mut self, id: Uuid) -> Result<&mut Report> {
        self.reports
            .get_mut(&id)
            .ok_or_else(|| DeskError::not_found("report", id))
    }

    pub fn insert_report(&mut self, report: Report) {
        self.reports.insert(report.id, report);
    }

    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.reports.values()
    }

    pub fn reports_for(&self, sport: Sport) -> Vec<&Report> {
        let mut reports: Vec<&Report> = self
            .reports
            .values()
            .filter(|r| r.sport == sport)
            .collect();
        reports.sort_by_key(|r| (r.generated_at, r.id));
        reports
    }

    /// Ids of every published report for the sport. The publish swap keeps
    /// this at most one long.
    pub fn published_ids(&self, sport: Sport) -> Vec<Uuid> {
        self.reports
            .values()
            .filter(|r| r.sport == sport && r.status == ReportStatus::Published)
            .map(|r| r.id)
            .collect()
    }

    pub fn published_for(&self, sport: Sport) -> Option<&Report> {
        self.reports
            .values()
            .find(|r| r.sport == sport && r.status == ReportStatus::Published)
    }

    /// Removes a report with every record it owns. Returns the number of
    /// child records dropped.
    pub fn remove_report(&mut self, id: Uuid) -> Result<usize> {
        self.reports
            .remove(&id)
            .ok_or_else(|| DeskError::not_found("report", id))?;

        let before = self.picks.len()
            + self.injuries.len()
            + self.intelligence.len()
            + self.movements.len()
            + self.corrections.len();

        self.picks.retain(|_, p| p.report_id != id);
        self.injuries.retain(|_, i| i.report_id != id);
        self.intelligence.retain(|_, i| i.report_id != id);
        self.movements.retain(|m| m.report_id != id);
        self.corrections.retain(|c| c.report_id != id);

        let after = self.picks.len()
            + self.injuries.len()
            + self.intelligence.len()
            + self.movements.len()
            + self.corrections.len();
        Ok(before - after)
    }

    // ── Picks ───────────────────────────────────────────────────────────────

    pub fn pick(&self, id: Uuid) -> Result<&Pick> {
        self.picks
            .get(&id)
            .ok_or_else(|| DeskError::not_found("pick", id))
    }

    pub fn pick_mut(&mut self, id: Uuid) -> Result<&mut Pick> {
        self.picks
            .get_mut(&id)
            .ok_or_else(|| DeskError::not_found("pick", id))
    }

    pub fn insert_pick(&mut self, pick: Pick) {
        self.picks.insert(pick.id, pick);
    }

    /// Ordered by game time, then hierarchy (highest first).
    pub fn picks_for(&self, report_id: Uuid) -> Vec<&Pick> {
        let mut picks: Vec<&Pick> = self
            .picks
            .values()
            .filter(|p| p.report_id == report_id)
            .collect();
        picks.sort_by(|a, b| {
            a.game_time
                .cmp(&b.game_time)
                .then_with(|| b.hierarchy.cmp(&a.hierarchy))
                .then_with(|| a.id.cmp(&b.id))
        });
        picks
    }

    /// Finds the pick that embeds a player prop.
    pub fn pick_for_prop(&self, prop_id: Uuid) -> Result<&Pick> {
        self.picks
            .values()
            .find(|p| p.prop(prop_id).is_some())
            .ok_or_else(|| DeskError::not_found("player prop", prop_id))
    }

    /// Fails with `CrossReportReference` unless the pick lives in `report_id`.
    pub fn pick_in_report(&self, pick_id: Uuid, report_id: Uuid) -> Result<&Pick> {
        let pick = self.pick(pick_id)?;
        if pick.report_id != report_id {
            return Err(DeskError::CrossReportReference {
                entity: "pick",
                entity_id: pick_id,
                expected_report: report_id,
                actual_report: pick.report_id,
            });
        }
        Ok(pick)
    }

    // ── Injuries ────────────────────────────────────────────────────────────

    pub fn injury(&self, id: Uuid) -> Result<&InjuryUpdate> {
        self.injuries
            .get(&id)
            .ok_or_else(|| DeskError::not_found("injury", id))
    }

    pub fn injury_mut(&mut self, id: Uuid) -> Result<&mut InjuryUpdate> {
        self.injuries
            .get_mut(&id)
            .ok_or_else(|| DeskError::not_found("injury", id))
    }

    pub fn insert_injury(&mut self, injury: InjuryUpdate) {
        self.injuries.insert(injury.id, injury);
    }

    pub fn injuries_for(&self, report_id: Uuid) -> Vec<&InjuryUpdate> {
        let mut injuries: Vec<&InjuryUpdate> = self
            .injuries
            .values()
            .filter(|i| i.report_id == report_id)
            .collect();
        injuries.sort_by_key(|i| (i.reported_at, i.id));
        injuries
    }

    /// Injuries whose affected set contains the pick.
    pub fn injuries_linked_to(&self, pick_id: Uuid) -> Vec<&InjuryUpdate> {
        let mut injuries: Vec<&InjuryUpdate> = self
            .injuries
            .values()
            .filter(|i| i.affects(pick_id))
            .collect();
        injuries.sort_by_key(|i| (i.reported_at, i.id));
        injuries
    }

    // ── Intelligence ────────────────────────────────────────────────────────

    pub fn intelligence(&self, id: Uuid) -> Result<&IntelligenceUpdate> {
        self.intelligence
            .get(&id)
            .ok_or_else(|| DeskError::not_found("intelligence update", id))
    }

    pub fn intelligence_mut(&mut self, id: Uuid) -> Result<&mut IntelligenceUpdate> {
        self.intelligence
            .get_mut(&id)
            .ok_or_else(|| DeskError::not_found("intelligence update", id))
    }

    pub fn insert_intelligence(&mut self, update: IntelligenceUpdate) {
        self.intelligence.insert(update.id, update);
    }

    pub fn intelligence_for(&self, report_id: Uuid) -> Vec<&IntelligenceUpdate> {
        let mut updates: Vec<&IntelligenceUpdate> = self
            .intelligence
            .values()
            .filter(|i| i.report_id == report_id)
            .collect();
        updates.sort_by_key(|i| (i.reported_at, i.id));
        updates
    }

    // ── Line movements ──────────────────────────────────────────────────────

    pub fn append_movement(&mut self, movement: LineMovement) {
        self.movements.push(movement);
    }

    /// Insertion order.
    pub fn movements_for_pick(&self, pick_id: Uuid) -> Vec<&LineMovement> {
        self.movements.iter().filter(|m| m.pick_id == pick_id).collect()
    }

    pub fn movements_for_report(&self, report_id: Uuid) -> Vec<&LineMovement> {
        self.movements
            .iter()
            .filter(|m| m.report_id == report_id)
            .collect()
    }

    // ── Outcome corrections ─────────────────────────────────────────────────

    pub fn append_correction(&mut self, correction: OutcomeCorrection) {
        self.corrections.push(correction);
    }

    pub fn corrections_for(&self, report_id: Uuid) -> Vec<&OutcomeCorrection> {
        self.corrections
            .iter()
            .filter(|c| c.report_id == report_id)
            .collect()
    }
}
