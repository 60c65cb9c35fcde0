use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{ImpactSeverity, InjuryStatus};

/// An injury report. `affected_pick_ids` is the only record of which picks an
/// injury touches; picks hold no back-references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryUpdate {
    pub id: Uuid,
    pub report_id: Uuid,
    pub player_name: String,
    pub team: Option<String>,
    pub status: InjuryStatus,
    pub injury_type: String,
    pub impact: ImpactSeverity,
    pub details: String,
    pub reported_at: DateTime<Utc>,
    pub affected_pick_ids: BTreeSet<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInjury {
    pub player_name: String,
    #[serde(default)]
    pub team: Option<String>,
    pub status: InjuryStatus,
    pub injury_type: String,
    pub impact: ImpactSeverity,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub reported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub affected_pick_ids: Vec<Uuid>,
}

impl NewInjury {
    pub fn into_injury(self, report_id: Uuid, now: DateTime<Utc>) -> InjuryUpdate {
        InjuryUpdate {
            id: Uuid::new_v4(),
            report_id,
            player_name: self.player_name,
            team: self.team,
            status: self.status,
            injury_type: self.injury_type,
            impact: self.impact,
            details: self.details,
            reported_at: self.reported_at.unwrap_or(now),
            affected_pick_ids: self.affected_pick_ids.into_iter().collect(),
        }
    }
}

impl InjuryUpdate {
    /// Returns false when the pick was already linked.
    pub fn link(&mut self, pick_id: Uuid) -> bool {
        self.affected_pick_ids.insert(pick_id)
    }

    pub fn affects(&self, pick_id: Uuid) -> bool {
        self.affected_pick_ids.contains(&pick_id)
    }

    /// Short subscriber-facing label, e.g. `"hamstring (questionable)"`.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.injury_type, self.status)
    }
}

/// The most severe injury, ties broken by most recent report and then id so
/// the choice never depends on iteration order.
pub fn most_severe<'a, I>(injuries: I) -> Option<&'a InjuryUpdate>
where
    I: IntoIterator<Item = &'a InjuryUpdate>,
{
    injuries.into_iter().max_by(|a, b| {
        a.impact
            .cmp(&b.impact)
            .then_with(|| a.reported_at.cmp(&b.reported_at))
            .then_with(|| a.id.cmp(&b.id))
    })
}
