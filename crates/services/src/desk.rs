// Report aggregate: lifecycle and attachment of picks, injuries, intelligence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pickdesk_db::{InMemoryStore, ReportBook, ReportStore};
use pickdesk_models::{
    DeskError, InjuryUpdate, IntelligenceUpdate, NewInjury, NewIntelligence, NewPick,
    NewPlayerProp, Pick, PickPatch, PlayerProp, Report, Result, Sport, SystemPerformance,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};

/// Entry point for every operation on reports and their children. All
/// mutations go through a single store transaction, so a failed call leaves
/// no trace.
pub struct ReportDesk<S: ReportStore = InMemoryStore> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl ReportDesk<InMemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new(), Arc::new(SystemClock))
    }
}

/// Looks up a report that still accepts attachments.
pub(crate) fn mutable_report(book: &ReportBook, report_id: Uuid) -> Result<&Report> {
    let report = book.report(report_id)?;
    report.ensure_mutable()?;
    Ok(report)
}

impl<S: ReportStore> ReportDesk<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn create_report(
        &self,
        sport: &str,
        performance: Option<SystemPerformance>,
    ) -> Result<Report> {
        let sport: Sport = sport.parse()?;
        let report = Report::new(sport, performance, self.now());

        self.store.transact(|book| {
            book.insert_report(report.clone());
            Ok(())
        })?;

        info!("📝 Created {} report {}", report.sport, report.id);
        Ok(report)
    }

    /// Publishes a report, unpublishing whichever report of the same sport
    /// was live. Both transitions commit together.
    pub fn publish(&self, report_id: Uuid, published_by: &str) -> Result<Report> {
        let now = self.now();

        let (report, displaced) = self.store.transact(|book| {
            let target = book.report(report_id)?;
            if target.is_published() {
                return Err(DeskError::AlreadyPublished { report_id });
            }

            let displaced = book.published_ids(target.sport);
            for id in &displaced {
                book.report_mut(*id)?.unpublish()?;
            }

            let report = book.report_mut(report_id)?;
            report.publish(published_by, now)?;
            Ok((report.clone(), displaced))
        })?;

        for id in &displaced {
            info!("📦 Unpublished {} report {} (superseded)", report.sport, id);
        }
        info!("📣 Published {} report {} by {}", report.sport, report.id, published_by);
        Ok(report)
    }

    pub fn unpublish(&self, report_id: Uuid) -> Result<Report> {
        let report = self.store.transact(|book| {
            let report = book.report_mut(report_id)?;
            report.unpublish()?;
            Ok(report.clone())
        })?;

        info!("📦 Unpublished {} report {}", report.sport, report.id);
        Ok(report)
    }

    /// Deletes a report together with everything it owns.
    pub fn delete_report(&self, report_id: Uuid) -> Result<usize> {
        let removed = self.store.transact(|book| book.remove_report(report_id))?;
        info!("🗑️  Deleted report {} and {} child records", report_id, removed);
        Ok(removed)
    }

    pub fn report(&self, report_id: Uuid) -> Result<Report> {
        self.store.read(|book| book.report(report_id).cloned())
    }

    pub fn reports_for(&self, sport: Sport) -> Vec<Report> {
        self.store
            .read(|book| book.reports_for(sport).into_iter().cloned().collect())
    }

    /// The live report for a sport, derived from report statuses.
    pub fn published_report(&self, sport: Sport) -> Option<Report> {
        self.store.read(|book| book.published_for(sport).cloned())
    }

    pub fn attach_pick(&self, report_id: Uuid, new_pick: NewPick) -> Result<Pick> {
        let pick = self.store.transact(|book| {
            mutable_report(book, report_id)?;
            let pick = new_pick.into_pick(report_id)?;
            book.insert_pick(pick.clone());
            Ok(pick)
        })?;

        debug!("Attached {:?} pick {} to report {}", pick.hierarchy, pick.id, report_id);
        Ok(pick)
    }

    pub fn attach_player_prop(&self, pick_id: Uuid, new_prop: NewPlayerProp) -> Result<PlayerProp> {
        self.store.transact(|book| {
            let report_id = book.pick(pick_id)?.report_id;
            mutable_report(book, report_id)?;

            let prop = new_prop.into_prop(pick_id)?;
            book.pick_mut(pick_id)?.player_props.push(prop.clone());
            Ok(prop)
        })
    }

    pub fn update_pick(&self, pick_id: Uuid, patch: PickPatch) -> Result<Pick> {
        self.store.transact(|book| {
            let report_id = book.pick(pick_id)?.report_id;
            mutable_report(book, report_id)?;

            let pick = book.pick_mut(pick_id)?;
            pick.apply_patch(patch)?;
            Ok(pick.clone())
        })
    }

    pub fn pick(&self, pick_id: Uuid) -> Result<Pick> {
        self.store.read(|book| book.pick(pick_id).cloned())
    }

    pub fn picks(&self, report_id: Uuid) -> Result<Vec<Pick>> {
        self.store.read(|book| {
            book.report(report_id)?;
            Ok(book.picks_for(report_id).into_iter().cloned().collect())
        })
    }

    /// Every pick the injury names must belong to the same report.
    pub fn attach_injury(&self, report_id: Uuid, new_injury: NewInjury) -> Result<InjuryUpdate> {
        let now = self.now();

        let injury = self.store.transact(|book| {
            mutable_report(book, report_id)?;
            for pick_id in &new_injury.affected_pick_ids {
                book.pick_in_report(*pick_id, report_id)?;
            }

            let injury = new_injury.into_injury(report_id, now);
            book.insert_injury(injury.clone());
            Ok(injury)
        })?;

        debug!(
            "Attached {} injury for {} to report {} ({} picks)",
            injury.impact.as_str(),
            injury.player_name,
            report_id,
            injury.affected_pick_ids.len()
        );
        Ok(injury)
    }

    pub fn injuries(&self, report_id: Uuid) -> Result<Vec<InjuryUpdate>> {
        self.store.read(|book| {
            book.report(report_id)?;
            Ok(book.injuries_for(report_id).into_iter().cloned().collect())
        })
    }

    pub fn attach_intelligence(
        &self,
        report_id: Uuid,
        new_update: NewIntelligence,
    ) -> Result<IntelligenceUpdate> {
        let now = self.now();

        let update = self.store.transact(|book| {
            mutable_report(book, report_id)?;
            let update = new_update.into_update(report_id, now)?;
            book.insert_intelligence(update.clone());
            Ok(update)
        })?;

        debug!(
            "Attached {} intelligence on {} to report {}",
            update.update_type.as_str(),
            update.target_name,
            report_id
        );
        Ok(update)
    }

    /// Clears the is-new flag.
    pub fn acknowledge_intelligence(&self, update_id: Uuid) -> Result<IntelligenceUpdate> {
        self.store.transact(|book| {
            let update = book.intelligence_mut(update_id)?;
            update.acknowledge();
            Ok(update.clone())
        })
    }

    /// Unacknowledged updates, most credible first.
    pub fn fresh_intelligence(&self, report_id: Uuid) -> Result<Vec<IntelligenceUpdate>> {
        self.store.read(|book| {
            book.report(report_id)?;
            let mut updates: Vec<IntelligenceUpdate> = book
                .intelligence_for(report_id)
                .into_iter()
                .filter(|u| u.is_new)
                .cloned()
                .collect();
            updates.sort_by(|a, b| {
                b.credibility
                    .cmp(&a.credibility)
                    .then_with(|| b.reported_at.cmp(&a.reported_at))
            });
            Ok(updates)
        })
    }
}
