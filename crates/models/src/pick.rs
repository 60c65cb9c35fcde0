use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{BetType, HierarchyTier, PickOutcome, PropSelection};
use crate::error::{DeskError, Result};
use crate::line::parse_line;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pick {
    pub id: Uuid,
    pub report_id: Uuid,
    pub game_id: String,
    pub matchup: String,
    pub game_time: DateTime<Utc>,
    pub bet_type: BetType,
    pub recommendation: String,
    pub confidence_score: u8,
    pub risk_score: Option<u8>,
    pub hierarchy: HierarchyTier,
    pub units: Decimal,
    pub current_odds: String,
    pub opening_odds: Option<String>,
    pub expected_value: Option<Decimal>,
    pub reasoning: String,
    pub detailed_analysis: String,
    pub outcome: Option<PickOutcome>,
    pub outcome_recorded_at: Option<DateTime<Utc>>,
    pub player_props: Vec<PlayerProp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProp {
    pub id: Uuid,
    pub pick_id: Uuid,
    pub player_name: String,
    pub stat_type: String,
    pub line: Decimal,
    pub selection: PropSelection,
    pub odds: String,
    pub confidence_score: u8,
    pub reasoning: String,
    pub outcome: Option<PickOutcome>,
}

/// Analyst input for a new pick; ids and outcome are assigned by the desk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPick {
    pub game_id: String,
    pub matchup: String,
    pub game_time: DateTime<Utc>,
    pub bet_type: BetType,
    pub recommendation: String,
    pub confidence_score: u8,
    #[serde(default)]
    pub risk_score: Option<u8>,
    pub hierarchy: HierarchyTier,
    pub units: Decimal,
    pub current_odds: String,
    #[serde(default)]
    pub opening_odds: Option<String>,
    #[serde(default)]
    pub expected_value: Option<Decimal>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub detailed_analysis: String,
    #[serde(default)]
    pub player_props: Vec<NewPlayerProp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayerProp {
    pub player_name: String,
    pub stat_type: String,
    pub line: Decimal,
    pub selection: PropSelection,
    pub odds: String,
    pub confidence_score: u8,
    #[serde(default)]
    pub reasoning: String,
}

/// Scalar fields that may be edited in place. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickPatch {
    pub current_odds: Option<String>,
    pub confidence_score: Option<u8>,
    pub risk_score: Option<u8>,
    pub units: Option<Decimal>,
    pub expected_value: Option<Decimal>,
    pub reasoning: Option<String>,
    pub detailed_analysis: Option<String>,
}

/// Audit entry written whenever a settled outcome is changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeCorrection {
    pub id: Uuid,
    pub report_id: Uuid,
    pub pick_id: Uuid,
    pub prop_id: Option<Uuid>,
    pub previous: PickOutcome,
    pub corrected: PickOutcome,
    pub reason: String,
    pub corrected_by: String,
    pub corrected_at: DateTime<Utc>,
}

pub(crate) fn validate_score(field: &str, value: u8) -> Result<()> {
    if value > 100 {
        return Err(DeskError::Validation(format!(
            "{} must be between 0 and 100, got {}",
            field, value
        )));
    }
    Ok(())
}

fn validate_units(units: Decimal) -> Result<()> {
    if units < Decimal::ZERO {
        return Err(DeskError::Validation(format!(
            "units must not be negative, got {}",
            units
        )));
    }
    Ok(())
}

/// Settles an outcome slot. Returns whether anything changed; re-recording
/// the same outcome is a no-op.
fn settle(
    slot: &mut Option<PickOutcome>,
    entity_id: Uuid,
    requested: PickOutcome,
    game_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<bool> {
    if now < game_time {
        return Err(DeskError::PrematureOutcome {
            pick_id: entity_id,
            game_time,
            now,
        });
    }

    match *slot {
        None => {
            *slot = Some(requested);
            Ok(true)
        }
        Some(existing) if existing == requested => Ok(false),
        Some(existing) => Err(DeskError::OutcomeConflict {
            entity_id,
            existing,
            requested,
        }),
    }
}

/// Overwrites a settled slot and hands back the replaced outcome.
fn amend(
    slot: &mut Option<PickOutcome>,
    entity_id: Uuid,
    corrected: PickOutcome,
    game_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<PickOutcome> {
    if now < game_time {
        return Err(DeskError::PrematureOutcome {
            pick_id: entity_id,
            game_time,
            now,
        });
    }

    let previous = slot.ok_or_else(|| {
        DeskError::Validation(format!("{} has no outcome to correct", entity_id))
    })?;
    if previous == corrected {
        return Err(DeskError::Validation(format!(
            "{} is already settled as {}",
            entity_id, corrected
        )));
    }

    *slot = Some(corrected);
    Ok(previous)
}

impl NewPick {
    pub fn into_pick(self, report_id: Uuid) -> Result<Pick> {
        validate_score("confidence_score", self.confidence_score)?;
        if let Some(risk) = self.risk_score {
            validate_score("risk_score", risk)?;
        }
        validate_units(self.units)?;
        parse_line(&self.current_odds)?;
        if let Some(opening) = &self.opening_odds {
            parse_line(opening)?;
        }

        let id = Uuid::new_v4();
        let player_props = self
            .player_props
            .into_iter()
            .map(|prop| prop.into_prop(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Pick {
            id,
            report_id,
            game_id: self.game_id,
            matchup: self.matchup,
            game_time: self.game_time,
            bet_type: self.bet_type,
            recommendation: self.recommendation,
            confidence_score: self.confidence_score,
            risk_score: self.risk_score,
            hierarchy: self.hierarchy,
            units: self.units,
            current_odds: self.current_odds,
            opening_odds: self.opening_odds,
            expected_value: self.expected_value,
            reasoning: self.reasoning,
            detailed_analysis: self.detailed_analysis,
            outcome: None,
            outcome_recorded_at: None,
            player_props,
        })
    }
}

impl NewPlayerProp {
    pub fn into_prop(self, pick_id: Uuid) -> Result<PlayerProp> {
        validate_score("confidence_score", self.confidence_score)?;
        parse_line(&self.odds)?;

        Ok(PlayerProp {
            id: Uuid::new_v4(),
            pick_id,
            player_name: self.player_name,
            stat_type: self.stat_type,
            line: self.line,
            selection: self.selection,
            odds: self.odds,
            confidence_score: self.confidence_score,
            reasoning: self.reasoning,
            outcome: None,
        })
    }
}

impl Pick {
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.game_time
    }

    pub fn record_outcome(&mut self, outcome: PickOutcome, now: DateTime<Utc>) -> Result<bool> {
        let changed = settle(&mut self.outcome, self.id, outcome, self.game_time, now)?;
        if changed {
            self.outcome_recorded_at = Some(now);
        }
        Ok(changed)
    }

    pub fn correct_outcome(
        &mut self,
        outcome: PickOutcome,
        now: DateTime<Utc>,
    ) -> Result<PickOutcome> {
        let previous = amend(&mut self.outcome, self.id, outcome, self.game_time, now)?;
        self.outcome_recorded_at = Some(now);
        Ok(previous)
    }

    /// Prop outcomes are gated on the parent pick's game time.
    pub fn record_prop_outcome(
        &mut self,
        prop_id: Uuid,
        outcome: PickOutcome,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let game_time = self.game_time;
        let prop = self.prop_mut(prop_id)?;
        settle(&mut prop.outcome, prop.id, outcome, game_time, now)
    }

    pub fn correct_prop_outcome(
        &mut self,
        prop_id: Uuid,
        outcome: PickOutcome,
        now: DateTime<Utc>,
    ) -> Result<PickOutcome> {
        let game_time = self.game_time;
        let prop = self.prop_mut(prop_id)?;
        amend(&mut prop.outcome, prop.id, outcome, game_time, now)
    }

    pub fn prop(&self, prop_id: Uuid) -> Option<&PlayerProp> {
        self.player_props.iter().find(|p| p.id == prop_id)
    }

    fn prop_mut(&mut self, prop_id: Uuid) -> Result<&mut PlayerProp> {
        self.player_props
            .iter_mut()
            .find(|p| p.id == prop_id)
            .ok_or_else(|| DeskError::not_found("player prop", prop_id))
    }

    /// Validates the whole patch before touching any field.
    pub fn apply_patch(&mut self, patch: PickPatch) -> Result<()> {
        if let Some(odds) = &patch.current_odds {
            parse_line(odds)?;
        }
        if let Some(confidence) = patch.confidence_score {
            validate_score("confidence_score", confidence)?;
        }
        if let Some(risk) = patch.risk_score {
            validate_score("risk_score", risk)?;
        }
        if let Some(units) = patch.units {
            validate_units(units)?;
        }

        if let Some(odds) = patch.current_odds {
            self.current_odds = odds;
        }
        if let Some(confidence) = patch.confidence_score {
            self.confidence_score = confidence;
        }
        if let Some(risk) = patch.risk_score {
            self.risk_score = Some(risk);
        }
        if let Some(units) = patch.units {
            self.units = units;
        }
        if let Some(ev) = patch.expected_value {
            self.expected_value = Some(ev);
        }
        if let Some(reasoning) = patch.reasoning {
            self.reasoning = reasoning;
        }
        if let Some(analysis) = patch.detailed_analysis {
            self.detailed_analysis = analysis;
        }
        Ok(())
    }
}
