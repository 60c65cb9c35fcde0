// Common test utilities and helpers
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pickdesk_db::InMemoryStore;
use pickdesk_models::{BetType, HierarchyTier, NewLineMovement, NewPick};
use pickdesk_services::{ManualClock, ReportDesk};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// A desk wired to a clock the test controls.
pub struct TestDesk {
    pub desk: Arc<ReportDesk>,
    pub clock: Arc<ManualClock>,
}

pub fn test_desk(start: DateTime<Utc>) -> TestDesk {
    let clock = Arc::new(ManualClock::new(start));
    TestDesk {
        desk: Arc::new(ReportDesk::new(InMemoryStore::new(), clock.clone())),
        clock,
    }
}

/// The standard Chiefs spread lock used across tests.
pub fn lock_pick(game_time: DateTime<Utc>) -> NewPick {
    NewPick {
        game_id: "nfl-2024-wk10-kc-bal".to_string(),
        matchup: "Kansas City Chiefs vs. Baltimore Ravens".to_string(),
        game_time,
        bet_type: BetType::Spread,
        recommendation: "Chiefs -3".to_string(),
        confidence_score: 92,
        risk_score: Some(20),
        hierarchy: HierarchyTier::Lock,
        units: dec!(3),
        current_odds: "-3 (-110)".to_string(),
        opening_odds: Some("-2.5 (-110)".to_string()),
        expected_value: Some(dec!(4.8)),
        reasoning: "Ravens secondary banged up".to_string(),
        detailed_analysis: "Model: KC -4.6, edge 1.6 pts. Do not share.".to_string(),
        player_props: Vec::new(),
    }
}

pub fn tiered_pick(game_time: DateTime<Utc>, hierarchy: HierarchyTier, confidence_score: u8) -> NewPick {
    NewPick {
        hierarchy,
        confidence_score,
        ..lock_pick(game_time)
    }
}

pub fn line_move(pick_id: Uuid, opening: &str, current: &str) -> NewLineMovement {
    NewLineMovement {
        pick_id,
        opening_line: opening.to_string(),
        current_line: current.to_string(),
        sharp_money: true,
        notes: Some("steam move".to_string()),
    }
}
