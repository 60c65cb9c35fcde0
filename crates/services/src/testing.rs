// Shared fixtures for unit tests

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pickdesk_db::InMemoryStore;
use pickdesk_models::{BetType, HierarchyTier, NewPick};
use rust_decimal_macros::dec;

use crate::clock::ManualClock;
use crate::desk::ReportDesk;

pub struct DeskFixture {
    pub desk: ReportDesk,
    pub clock: Arc<ManualClock>,
}

impl DeskFixture {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        Self {
            desk: ReportDesk::new(InMemoryStore::new(), clock.clone()),
            clock,
        }
    }
}

pub fn new_pick(game_time: DateTime<Utc>) -> NewPick {
    NewPick {
        game_id: "nfl-kc-bal".to_string(),
        matchup: "Kansas City Chiefs vs. Baltimore Ravens".to_string(),
        game_time,
        bet_type: BetType::Spread,
        recommendation: "Chiefs -3".to_string(),
        confidence_score: 92,
        risk_score: Some(25),
        hierarchy: HierarchyTier::Lock,
        units: dec!(3),
        current_odds: "-3".to_string(),
        opening_odds: Some("-2.5".to_string()),
        expected_value: Some(dec!(5.1)),
        reasoning: "Ravens missing both starting corners".to_string(),
        detailed_analysis: "Internal: model edge 4.1 pts".to_string(),
        player_props: Vec::new(),
    }
}
