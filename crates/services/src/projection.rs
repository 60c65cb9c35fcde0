// Subscriber-facing projection of published picks

use std::cmp::Reverse;

use pickdesk_db::{ReportBook, ReportStore};
use pickdesk_models::{ClientPick, ClientPickFilter, DeskError, Pick, Result, Sport};
use uuid::Uuid;

use crate::desk::ReportDesk;

fn project(book: &ReportBook, sport: Sport, pick: &Pick) -> ClientPick {
    let injuries = book.injuries_linked_to(pick.id);
    ClientPick::project(pick, sport, &injuries)
}

/// Projects the picks of a published report. Reports in any other status
/// yield nothing.
fn published_picks(
    book: &ReportBook,
    report_id: Uuid,
    filter: &ClientPickFilter,
) -> Result<Vec<ClientPick>> {
    let report = book.report(report_id)?;
    if !report.is_published() {
        return Ok(Vec::new());
    }

    let mut picks: Vec<ClientPick> = book
        .picks_for(report_id)
        .into_iter()
        .filter(|pick| filter.matches(report.sport, pick))
        .map(|pick| project(book, report.sport, pick))
        .collect();

    picks.sort_by_key(|p| (Reverse(p.hierarchy), p.game_time, p.id));
    Ok(picks)
}

impl<S: ReportStore> ReportDesk<S> {
    /// Client view of a report's picks, strongest tier first. Draft and
    /// unpublished reports project to an empty list.
    pub fn to_client_picks(
        &self,
        report_id: Uuid,
        filter: &ClientPickFilter,
    ) -> Result<Vec<ClientPick>> {
        self.store()
            .read(|book| published_picks(book, report_id, filter))
    }

    /// Client picks from the live report of a sport, empty when nothing is
    /// published.
    pub fn client_picks_for_sport(
        &self,
        sport: Sport,
        filter: &ClientPickFilter,
    ) -> Result<Vec<ClientPick>> {
        self.store().read(|book| match book.published_for(sport) {
            Some(report) => published_picks(book, report.id, filter),
            None => Ok(Vec::new()),
        })
    }

    /// A single pick as a subscriber sees it. Picks of unpublished reports
    /// are reported as missing.
    pub fn to_client_pick(&self, pick_id: Uuid) -> Result<ClientPick> {
        self.store().read(|book| {
            let pick = book.pick(pick_id)?;
            let report = book.report(pick.report_id)?;
            if !report.is_published() {
                return Err(DeskError::not_found("pick", pick_id));
            }
            Ok(project(book, report.sport, pick))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::testing::{new_pick, DeskFixture};
    use chrono::Duration;
    use pickdesk_models::{BetType, HierarchyTier, ImpactSeverity, InjuryStatus, NewInjury};

    #[test]
    fn test_draft_report_projects_nothing() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NFL", None).unwrap();
        for _ in 0..5 {
            fx.desk.attach_pick(report.id, new_pick(fx.clock.now())).unwrap();
        }

        let filter = ClientPickFilter::default();
        assert!(fx.desk.to_client_picks(report.id, &filter).unwrap().is_empty());

        fx.desk.publish(report.id, "desk").unwrap();
        assert_eq!(fx.desk.to_client_picks(report.id, &filter).unwrap().len(), 5);

        fx.desk.unpublish(report.id).unwrap();
        assert!(fx.desk.to_client_picks(report.id, &filter).unwrap().is_empty());
        assert!(fx.desk.client_picks_for_sport(Sport::Nfl, &filter).unwrap().is_empty());
    }

    #[test]
    fn test_missing_report_is_not_found() {
        let fx = DeskFixture::new();
        assert!(matches!(
            fx.desk.to_client_picks(Uuid::new_v4(), &ClientPickFilter::default()),
            Err(DeskError::NotFound { entity: "report", .. })
        ));
    }

    #[test]
    fn test_ordering_and_filters() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NBA", None).unwrap();
        let now = fx.clock.now();

        let mut value = new_pick(now + Duration::hours(1));
        value.hierarchy = HierarchyTier::Value;
        value.bet_type = BetType::Moneyline;
        let value = fx.desk.attach_pick(report.id, value).unwrap();

        let late_lock = fx.desk.attach_pick(report.id, new_pick(now + Duration::hours(3))).unwrap();
        let early_lock = fx.desk.attach_pick(report.id, new_pick(now + Duration::hours(2))).unwrap();
        fx.desk.publish(report.id, "desk").unwrap();

        let all = fx
            .desk
            .to_client_picks(report.id, &ClientPickFilter::default())
            .unwrap();
        assert_eq!(
            all.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![early_lock.id, late_lock.id, value.id]
        );

        let moneyline = ClientPickFilter {
            bet_type: Some(BetType::Moneyline),
            ..Default::default()
        };
        let picks = fx.desk.to_client_picks(report.id, &moneyline).unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, value.id);

        let strong = ClientPickFilter {
            min_hierarchy: Some(HierarchyTier::High),
            ..Default::default()
        };
        assert_eq!(fx.desk.to_client_picks(report.id, &strong).unwrap().len(), 2);

        let wrong_sport = ClientPickFilter {
            sport: Some(Sport::Ufc),
            ..Default::default()
        };
        assert!(fx.desk.to_client_picks(report.id, &wrong_sport).unwrap().is_empty());
        assert_eq!(
            fx.desk
                .client_picks_for_sport(Sport::Nba, &ClientPickFilter::default())
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn test_injury_summary_uses_worst_linked_injury() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("NFL", None).unwrap();
        let pick = fx.desk.attach_pick(report.id, new_pick(fx.clock.now())).unwrap();

        for (injury_type, status, impact) in [
            ("hamstring", InjuryStatus::Questionable, ImpactSeverity::Minor),
            ("knee", InjuryStatus::Out, ImpactSeverity::Critical),
        ] {
            fx.desk
                .attach_injury(
                    report.id,
                    NewInjury {
                        player_name: "Lamar Jackson".to_string(),
                        team: Some("BAL".to_string()),
                        status,
                        injury_type: injury_type.to_string(),
                        impact,
                        details: "internal scouting note".to_string(),
                        reported_at: None,
                        affected_pick_ids: vec![pick.id],
                    },
                )
                .unwrap();
        }
        fx.desk.publish(report.id, "desk").unwrap();

        let client = fx.desk.to_client_pick(pick.id).unwrap();
        assert_eq!(client.stars, 5);
        assert_eq!(client.impact_severity, Some(ImpactSeverity::Critical));
        assert_eq!(client.injury_impact.as_deref(), Some("knee (out)"));

        let json = serde_json::to_string(&client).unwrap();
        assert!(!json.contains("detailed_analysis"));
        assert!(!json.contains("risk_score"));
        assert!(!json.contains("internal scouting note"));
    }

    #[test]
    fn test_single_pick_hidden_until_published() {
        let fx = DeskFixture::new();
        let report = fx.desk.create_report("UFC", None).unwrap();
        let pick = fx.desk.attach_pick(report.id, new_pick(fx.clock.now())).unwrap();

        assert!(matches!(
            fx.desk.to_client_pick(pick.id),
            Err(DeskError::NotFound { .. })
        ));
        fx.desk.publish(report.id, "desk").unwrap();
        assert_eq!(fx.desk.to_client_pick(pick.id).unwrap().sport, Sport::Ufc);
    }
}
