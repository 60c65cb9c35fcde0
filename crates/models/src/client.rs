use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{BetType, HierarchyTier, ImpactSeverity, PickOutcome, PropSelection, Sport};
use crate::injury::{most_severe, InjuryUpdate};
use crate::pick::{Pick, PlayerProp};

/// Confidence floor for each star count, highest first. Anything below the
/// last floor is one star. These bands are shown to subscribers.
pub const STAR_BANDS: [(u8, u8); 4] = [(90, 5), (75, 4), (60, 3), (45, 2)];

pub fn stars_for(confidence_score: u8) -> u8 {
    STAR_BANDS
        .iter()
        .find(|(floor, _)| confidence_score >= *floor)
        .map(|(_, stars)| *stars)
        .unwrap_or(1)
}

/// Subscriber view of a pick. Detailed analysis and risk score never leave
/// the desk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientPick {
    pub id: Uuid,
    pub report_id: Uuid,
    pub sport: Sport,
    pub game_id: String,
    pub matchup: String,
    pub game_time: DateTime<Utc>,
    pub bet_type: BetType,
    pub recommendation: String,
    pub hierarchy: HierarchyTier,
    pub stars: u8,
    pub units: Decimal,
    pub odds: String,
    pub opening_odds: Option<String>,
    pub expected_value: Option<Decimal>,
    pub reasoning: String,
    pub injury_impact: Option<String>,
    pub impact_severity: Option<ImpactSeverity>,
    pub outcome: Option<PickOutcome>,
    pub player_props: Vec<ClientPlayerProp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientPlayerProp {
    pub player_name: String,
    pub stat_type: String,
    pub line: Decimal,
    pub selection: PropSelection,
    pub odds: String,
    pub stars: u8,
    pub reasoning: String,
    pub outcome: Option<PickOutcome>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientPickFilter {
    pub sport: Option<Sport>,
    pub bet_type: Option<BetType>,
    pub hierarchy: Option<HierarchyTier>,
    /// Keep picks at or above this tier.
    pub min_hierarchy: Option<HierarchyTier>,
}

impl ClientPickFilter {
    pub fn matches(&self, sport: Sport, pick: &Pick) -> bool {
        self.sport.map_or(true, |s| s == sport)
            && self.bet_type.map_or(true, |b| b == pick.bet_type)
            && self.hierarchy.map_or(true, |h| h == pick.hierarchy)
            && self.min_hierarchy.map_or(true, |min| pick.hierarchy >= min)
    }
}

impl From<&PlayerProp> for ClientPlayerProp {
    fn from(prop: &PlayerProp) -> Self {
        Self {
            player_name: prop.player_name.clone(),
            stat_type: prop.stat_type.clone(),
            line: prop.line,
            selection: prop.selection,
            odds: prop.odds.clone(),
            stars: stars_for(prop.confidence_score),
            reasoning: prop.reasoning.clone(),
            outcome: prop.outcome,
        }
    }
}

impl ClientPick {
    pub fn project(pick: &Pick, sport: Sport, linked_injuries: &[&InjuryUpdate]) -> Self {
        let worst = most_severe(linked_injuries.iter().copied());

        Self {
            id: pick.id,
            report_id: pick.report_id,
            sport,
            game_id: pick.game_id.clone(),
            matchup: pick.matchup.clone(),
            game_time: pick.game_time,
            bet_type: pick.bet_type,
            recommendation: pick.recommendation.clone(),
            hierarchy: pick.hierarchy,
            stars: stars_for(pick.confidence_score),
            units: pick.units,
            odds: pick.current_odds.clone(),
            opening_odds: pick.opening_odds.clone(),
            expected_value: pick.expected_value,
            reasoning: pick.reasoning.clone(),
            injury_impact: worst.map(InjuryUpdate::summary),
            impact_severity: worst.map(|injury| injury.impact),
            outcome: pick.outcome,
            player_props: pick.player_props.iter().map(ClientPlayerProp::from).collect(),
        }
    }
}
