// Pick outcome tracking and report performance

use pickdesk_db::{ReportBook, ReportStore};
use pickdesk_models::{
    DeskError, OutcomeCorrection, Pick, PickOutcome, PlayerProp, Result, SystemPerformance,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::desk::ReportDesk;

/// Recomputes and stores the summary of a report from its picks.
fn refresh_performance(book: &mut ReportBook, report_id: Uuid) -> Result<SystemPerformance> {
    let performance =
        SystemPerformance::from_outcomes(book.picks_for(report_id).into_iter().map(|p| p.outcome));
    book.report_mut(report_id)?.performance = Some(performance.clone());
    Ok(performance)
}

fn require_reason(reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(DeskError::Validation(
            "an outcome correction needs a reason".to_string(),
        ));
    }
    Ok(())
}

impl<S: ReportStore> ReportDesk<S> {
    /// Settles a pick once its game has started. Recording the same outcome
    /// again succeeds without change; a different outcome needs
    /// [`ReportDesk::correct_outcome`].
    ///
    /// Outcomes are accepted in any report status, since results arrive after
    /// a report has usually been superseded.
    pub fn record_outcome(&self, pick_id: Uuid, outcome: PickOutcome) -> Result<Pick> {
        let now = self.now();

        let (pick, changed) = self.store().transact(|book| {
            let pick = book.pick_mut(pick_id)?;
            let changed = pick.record_outcome(outcome, now)?;
            let pick = pick.clone();
            if changed {
                refresh_performance(book, pick.report_id)?;
            }
            Ok((pick, changed))
        })?;

        if changed {
            info!("🏁 Pick {} settled as {}", pick.id, outcome);
        }
        Ok(pick)
    }

    /// The explicit path for changing a settled outcome. Leaves an
    /// [`OutcomeCorrection`] behind.
    pub fn correct_outcome(
        &self,
        pick_id: Uuid,
        outcome: PickOutcome,
        reason: &str,
        corrected_by: &str,
    ) -> Result<Pick> {
        require_reason(reason)?;
        let now = self.now();

        let (pick, previous) = self.store().transact(|book| {
            let pick = book.pick_mut(pick_id)?;
            let previous = pick.correct_outcome(outcome, now)?;
            let pick = pick.clone();

            book.append_correction(OutcomeCorrection {
                id: Uuid::new_v4(),
                report_id: pick.report_id,
                pick_id,
                prop_id: None,
                previous,
                corrected: outcome,
                reason: reason.to_string(),
                corrected_by: corrected_by.to_string(),
                corrected_at: now,
            });
            refresh_performance(book, pick.report_id)?;
            Ok((pick, previous))
        })?;

        warn!(
            "✏️  Pick {} corrected {} -> {} by {}: {}",
            pick_id, previous, outcome, corrected_by, reason
        );
        Ok(pick)
    }

    pub fn record_prop_outcome(&self, prop_id: Uuid, outcome: PickOutcome) -> Result<PlayerProp> {
        let now = self.now();

        self.store().transact(|book| {
            let pick_id = book.pick_for_prop(prop_id)?.id;
            let pick = book.pick_mut(pick_id)?;
            pick.record_prop_outcome(prop_id, outcome, now)?;
            pick.prop(prop_id)
                .cloned()
                .ok_or_else(|| DeskError::not_found("player prop", prop_id))
        })
    }

    pub fn correct_prop_outcome(
        &self,
        prop_id: Uuid,
        outcome: PickOutcome,
        reason: &str,
        corrected_by: &str,
    ) -> Result<PlayerProp> {
        require_reason(reason)?;
        let now = self.now();

        let (prop, previous) = self.store().transact(|book| {
            let pick_id = book.pick_for_prop(prop_id)?.id;
            let pick = book.pick_mut(pick_id)?;
            let previous = pick.correct_prop_outcome(prop_id, outcome, now)?;
            let report_id = pick.report_id;
            let prop = pick
                .prop(prop_id)
                .cloned()
                .ok_or_else(|| DeskError::not_found("player prop", prop_id))?;

            book.append_correction(OutcomeCorrection {
                id: Uuid::new_v4(),
                report_id,
                pick_id,
                prop_id: Some(prop_id),
                previous,
                corrected: outcome,
                reason: reason.to_string(),
                corrected_by: corrected_by.to_string(),
                corrected_at: now,
            });
            Ok((prop, previous))
        })?;

        warn!(
            "✏️  Prop {} corrected {} -> {} by {}: {}",
            prop_id, previous, outcome, corrected_by, reason
        );
        Ok(prop)
    }

    /// Derives the W-L summary from the report's picks and stores it.
    pub fn recompute_report_performance(&self, report_id: Uuid) -> Result<SystemPerformance> {
        self.store()
            .transact(|book| refresh_performance(book, report_id))
    }

    /// Correction audit trail, oldest first.
    pub fn corrections(&self, report_id: Uuid) -> Result<Vec<OutcomeCorrection>> {
        self.store().read(|book| {
            book.report(report_id)?;
            Ok(book.corrections_for(report_id).into_iter().cloned().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::testing::{new_pick, DeskFixture};
    use chrono::Duration;
    use pickdesk_models::{NewPlayerProp, PropSelection};
    use rust_decimal_macros::dec;

    #[test]
    fn test_premature_outcome_leaves_pick_unset() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NFL", None).unwrap();
        let game_time = fx.clock.now() + Duration::hours(2);
        let pick = fx.desk.attach_pick(report.id, new_pick(game_time)).unwrap();

        let err = fx.desk.record_outcome(pick.id, PickOutcome::Win).unwrap_err();
        assert!(matches!(err, DeskError::PrematureOutcome { .. }));
        assert!(fx.desk.pick(pick.id).unwrap().outcome.is_none());
        assert!(fx.desk.report(report.id).unwrap().performance.is_none());
    }

    #[test]
    fn test_record_outcome_refreshes_summary() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NFL", None).unwrap();
        let kickoff = fx.clock.now() + Duration::hours(1);
        let picks: Vec<Pick> = (0..4)
            .map(|_| fx.desk.attach_pick(report.id, new_pick(kickoff)).unwrap())
            .collect();

        fx.clock.advance(Duration::hours(4));
        let outcomes = [PickOutcome::Win, PickOutcome::Win, PickOutcome::Loss, PickOutcome::Push];
        for (pick, outcome) in picks.iter().zip(outcomes) {
            fx.desk.record_outcome(pick.id, outcome).unwrap();
        }

        let stored = fx.desk.report(report.id).unwrap().performance.unwrap();
        assert_eq!(stored.record, "2-1");
        assert_eq!(stored.pushes, 1);
        assert!((stored.win_rate - 200.0 / 3.0).abs() < 1e-9);

        let recomputed = fx.desk.recompute_report_performance(report.id).unwrap();
        assert_eq!(recomputed, stored);
    }

    #[test]
    fn test_conflicting_outcome_requires_correction() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NBA", None).unwrap();
        let pick = fx
            .desk
            .attach_pick(report.id, new_pick(fx.clock.now() - Duration::hours(3)))
            .unwrap();

        fx.desk.record_outcome(pick.id, PickOutcome::Win).unwrap();
        fx.desk.record_outcome(pick.id, PickOutcome::Win).unwrap();
        assert!(matches!(
            fx.desk.record_outcome(pick.id, PickOutcome::Loss),
            Err(DeskError::OutcomeConflict { .. })
        ));
        assert!(fx.desk.corrections(report.id).unwrap().is_empty());

        assert!(matches!(
            fx.desk.correct_outcome(pick.id, PickOutcome::Loss, "  ", "ops"),
            Err(DeskError::Validation(_))
        ));

        let corrected = fx
            .desk
            .correct_outcome(pick.id, PickOutcome::Loss, "stat correction from league", "ops")
            .unwrap();
        assert_eq!(corrected.outcome, Some(PickOutcome::Loss));

        let trail = fx.desk.corrections(report.id).unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].previous, PickOutcome::Win);
        assert_eq!(trail[0].corrected, PickOutcome::Loss);
        assert_eq!(trail[0].corrected_by, "ops");
        assert_eq!(
            fx.desk.report(report.id).unwrap().performance.unwrap().record,
            "0-1"
        );
    }

    #[test]
    fn test_prop_outcomes() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NFL", None).unwrap();
        let mut input = new_pick(fx.clock.now() + Duration::hours(1));
        input.player_props.push(NewPlayerProp {
            player_name: "Rashee Rice".to_string(),
            stat_type: "receptions".to_string(),
            line: dec!(5.5),
            selection: PropSelection::Over,
            odds: "+105".to_string(),
            confidence_score: 64,
            reasoning: String::new(),
        });
        let pick = fx.desk.attach_pick(report.id, input).unwrap();
        let prop_id = pick.player_props[0].id;

        assert!(matches!(
            fx.desk.record_prop_outcome(prop_id, PickOutcome::Win),
            Err(DeskError::PrematureOutcome { .. })
        ));

        fx.clock.advance(Duration::hours(5));
        let prop = fx.desk.record_prop_outcome(prop_id, PickOutcome::Win).unwrap();
        assert_eq!(prop.outcome, Some(PickOutcome::Win));
        assert!(fx.desk.pick(pick.id).unwrap().outcome.is_none());

        let prop = fx
            .desk
            .correct_prop_outcome(prop_id, PickOutcome::Push, "catch overturned", "ops")
            .unwrap();
        assert_eq!(prop.outcome, Some(PickOutcome::Push));
        assert_eq!(fx.desk.corrections(report.id).unwrap()[0].prop_id, Some(prop_id));

        assert!(matches!(
            fx.desk.record_prop_outcome(Uuid::new_v4(), PickOutcome::Win),
            Err(DeskError::NotFound { .. })
        ));
    }

    #[test]
    fn test_outcome_allowed_after_report_is_superseded() {
        let fx = DeskFixture::new();
        let old = fx.desk.create_report("NFL", None).unwrap();
        let pick = fx
            .desk
            .attach_pick(old.id, new_pick(fx.clock.now() + Duration::hours(1)))
            .unwrap();
        fx.desk.publish(old.id, "desk").unwrap();

        let new = fx.desk.create_report("NFL", None).unwrap();
        fx.desk.publish(new.id, "desk").unwrap();

        fx.clock.advance(Duration::hours(6));
        let settled = fx.desk.record_outcome(pick.id, PickOutcome::Loss).unwrap();
        assert_eq!(settled.outcome, Some(PickOutcome::Loss));
    }
}
