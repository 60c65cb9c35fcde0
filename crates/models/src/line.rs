use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{BetType, LineDirection};
use crate::error::{DeskError, Result};
use crate::pick::Pick;

/// Immutable ledger entry. A later change is a new entry, never an edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineMovement {
    pub id: Uuid,
    pub pick_id: Uuid,
    pub report_id: Uuid,
    pub opening_line: String,
    pub current_line: String,
    pub movement_percentage: Decimal,
    pub direction: LineDirection,
    pub sharp_money: bool,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineMovement {
    pub pick_id: Uuid,
    pub opening_line: String,
    pub current_line: String,
    #[serde(default)]
    pub sharp_money: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The side of the market a pick's recommendation backs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendedSide {
    Team(String),
    Over,
    Under,
}

const MATCHUP_SEPARATORS: [&str; 5] = [" vs. ", " vs ", " v ", " @ ", " at "];

/// Reads the leading signed number of an odds or spread string such as
/// `"-140"`, `"+180"`, `"-3.5 (-110)"`. `PK` reads as zero and `EVEN` as +100.
pub fn parse_line(raw: &str) -> Result<Decimal> {
    let text = raw.trim();
    match text.to_ascii_lowercase().as_str() {
        "pk" | "pick" | "pickem" | "pick'em" => return Ok(Decimal::ZERO),
        "ev" | "even" | "evens" => return Ok(Decimal::ONE_HUNDRED),
        _ => {}
    }

    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let number = &text[..end];

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(DeskError::UnparseableLine(raw.to_string()));
    }

    Decimal::from_str(number.trim_start_matches('+'))
        .map_err(|_| DeskError::UnparseableLine(raw.to_string()))
}

/// Sign-agnostic relative change in percent, rounded to two places. A zero
/// opening line (pick'em) is measured against one point. Fails when the
/// lines are too far apart to express as a decimal.
pub fn movement_percentage(opening: Decimal, current: Decimal) -> Result<Decimal> {
    let base = if opening.is_zero() {
        Decimal::ONE
    } else {
        opening.abs()
    };
    current
        .checked_sub(opening)
        .and_then(|delta| delta.abs().checked_div(base))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .ok_or_else(|| {
            DeskError::Validation(format!(
                "line movement {} -> {} is out of range",
                opening, current
            ))
        })
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn split_matchup(matchup: &str) -> Option<(String, String)> {
    let lowered = matchup.to_lowercase();
    MATCHUP_SEPARATORS.iter().find_map(|sep| {
        let at = lowered.find(sep)?;
        let first = matchup[..at].trim();
        let second = matchup[at + sep.len()..].trim();
        if first.is_empty() || second.is_empty() {
            None
        } else {
            Some((first.to_string(), second.to_string()))
        }
    })
}

fn mentions_team(recommendation: &str, rec_words: &[String], team: &str) -> bool {
    if recommendation.contains(&team.to_lowercase()) {
        return true;
    }
    // nickname match, e.g. "Chiefs" for "Kansas City Chiefs"
    words(team)
        .last()
        .filter(|nickname| nickname.len() >= 3)
        .map(|nickname| rec_words.contains(nickname))
        .unwrap_or(false)
}

impl RecommendedSide {
    /// Totals and props resolve by over/under wording; sides resolve by
    /// matching exactly one team of the matchup. Anything else is ambiguous.
    pub fn resolve(bet_type: BetType, matchup: &str, recommendation: &str) -> Option<Self> {
        let rec_words = words(recommendation);

        match bet_type {
            BetType::OverUnder | BetType::PlayerProp => {
                let over = rec_words.iter().any(|w| w == "over");
                let under = rec_words.iter().any(|w| w == "under");
                match (over, under) {
                    (true, false) => Some(RecommendedSide::Over),
                    (false, true) => Some(RecommendedSide::Under),
                    _ => None,
                }
            }
            BetType::Moneyline | BetType::Spread => {
                let (first, second) = split_matchup(matchup)?;
                let lowered = recommendation.to_lowercase();
                match (
                    mentions_team(&lowered, &rec_words, &first),
                    mentions_team(&lowered, &rec_words, &second),
                ) {
                    (true, false) => Some(RecommendedSide::Team(first)),
                    (false, true) => Some(RecommendedSide::Team(second)),
                    _ => None,
                }
            }
        }
    }

    pub fn for_pick(pick: &Pick) -> Option<Self> {
        Self::resolve(pick.bet_type, &pick.matchup, &pick.recommendation)
    }

    /// Lines are quoted from the recommended side. A team side or an under
    /// gains market support as its number drops; an over as its number rises.
    pub fn direction(&self, opening: Decimal, current: Decimal) -> LineDirection {
        if opening == current {
            return LineDirection::Neutral;
        }

        let toward = match self {
            RecommendedSide::Team(_) | RecommendedSide::Under => current < opening,
            RecommendedSide::Over => current > opening,
        };

        if toward {
            LineDirection::Toward
        } else {
            LineDirection::Away
        }
    }
}

impl LineMovement {
    pub fn record(
        pick: &Pick,
        movement: NewLineMovement,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self> {
        let opening = parse_line(&movement.opening_line)?;
        let current = parse_line(&movement.current_line)?;

        let direction = match RecommendedSide::for_pick(pick) {
            Some(side) => side.direction(opening, current),
            None if opening == current => LineDirection::Neutral,
            None => LineDirection::Unknown,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            pick_id: pick.id,
            report_id: pick.report_id,
            opening_line: movement.opening_line,
            current_line: movement.current_line,
            movement_percentage: movement_percentage(opening, current)?,
            direction,
            sharp_money: movement.sharp_money,
            notes: movement.notes,
            recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HierarchyTier;
    use rust_decimal_macros::dec;

    fn pick(bet_type: BetType, matchup: &str, recommendation: &str) -> Pick {
        Pick {
            id: Uuid::new_v4(),
            report_id: Uuid::new_v4(),
            game_id: "g1".to_string(),
            matchup: matchup.to_string(),
            game_time: Utc::now(),
            bet_type,
            recommendation: recommendation.to_string(),
            confidence_score: 70,
            risk_score: None,
            hierarchy: HierarchyTier::High,
            units: dec!(1),
            current_odds: "-110".to_string(),
            opening_odds: None,
            expected_value: None,
            reasoning: String::new(),
            detailed_analysis: String::new(),
            outcome: None,
            outcome_recorded_at: None,
            player_props: Vec::new(),
        }
    }

    fn movement(pick: &Pick, opening: &str, current: &str) -> NewLineMovement {
        NewLineMovement {
            pick_id: pick.id,
            opening_line: opening.to_string(),
            current_line: current.to_string(),
            sharp_money: false,
            notes: None,
        }
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("-140").unwrap(), dec!(-140));
        assert_eq!(parse_line("+180").unwrap(), dec!(180));
        assert_eq!(parse_line(" -3.5 (-110)").unwrap(), dec!(-3.5));
        assert_eq!(parse_line("47.5").unwrap(), dec!(47.5));
        assert_eq!(parse_line("PK").unwrap(), dec!(0));
        assert_eq!(parse_line("EVEN").unwrap(), dec!(100));

        for bad in ["", "+", "-", "Chiefs -3", "o47.5", "1.2.3"] {
            assert!(
                matches!(parse_line(bad), Err(DeskError::UnparseableLine(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_movement_percentage_is_sign_agnostic() {
        assert_eq!(movement_percentage(dec!(-140), dec!(-160)).unwrap(), dec!(14.29));
        assert_eq!(movement_percentage(dec!(-160), dec!(-140)).unwrap(), dec!(12.5));
        assert_eq!(movement_percentage(dec!(180), dec!(150)).unwrap(), dec!(16.67));
        assert_eq!(movement_percentage(dec!(-3), dec!(-3)).unwrap(), dec!(0));
        assert_eq!(movement_percentage(dec!(0), dec!(-1.5)).unwrap(), dec!(150));
    }

    #[test]
    fn test_extreme_lines_are_rejected() {
        let tiny = parse_line("0.0000000000000000000000000001").unwrap();
        let huge = parse_line("+100000").unwrap();
        assert!(matches!(
            movement_percentage(tiny, huge),
            Err(DeskError::Validation(_))
        ));
        assert!(movement_percentage(Decimal::MIN, Decimal::MAX).is_err());

        let pick = pick(
            BetType::Spread,
            "Kansas City Chiefs vs. Baltimore Ravens",
            "Chiefs -3",
        );
        let extreme = movement(&pick, "0.0000000000000000000000000001", "+100000");
        assert!(matches!(
            LineMovement::record(&pick, extreme, Utc::now()),
            Err(DeskError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_team_side() {
        let matchup = "Kansas City Chiefs vs. Baltimore Ravens";
        assert_eq!(
            RecommendedSide::resolve(BetType::Spread, matchup, "Chiefs -3"),
            Some(RecommendedSide::Team("Kansas City Chiefs".to_string()))
        );
        assert_eq!(
            RecommendedSide::resolve(BetType::Moneyline, matchup, "Baltimore Ravens ML"),
            Some(RecommendedSide::Team("Baltimore Ravens".to_string()))
        );
        assert_eq!(RecommendedSide::resolve(BetType::Moneyline, matchup, "Home dog"), None);
        assert_eq!(
            RecommendedSide::resolve(BetType::Moneyline, matchup, "Chiefs or Ravens"),
            None
        );
        assert_eq!(RecommendedSide::resolve(BetType::Spread, "Chiefs", "Chiefs -3"), None);
    }

    #[test]
    fn test_resolve_totals() {
        assert_eq!(
            RecommendedSide::resolve(BetType::OverUnder, "A vs B", "Over 47.5"),
            Some(RecommendedSide::Over)
        );
        assert_eq!(
            RecommendedSide::resolve(BetType::PlayerProp, "A vs B", "Mahomes under 2.5 TDs"),
            Some(RecommendedSide::Under)
        );
        assert_eq!(RecommendedSide::resolve(BetType::OverUnder, "A vs B", "Total 47.5"), None);
    }

    #[test]
    fn test_direction_relative_to_recommendation() {
        let fav = pick(BetType::Moneyline, "Chiefs @ Ravens", "Chiefs ML");
        let toward = LineMovement::record(&fav, movement(&fav, "-140", "-160"), Utc::now()).unwrap();
        assert_eq!(toward.direction, LineDirection::Toward);
        assert_eq!(toward.report_id, fav.report_id);

        let away = LineMovement::record(&fav, movement(&fav, "-140", "-120"), Utc::now()).unwrap();
        assert_eq!(away.direction, LineDirection::Away);

        let over = pick(BetType::OverUnder, "Chiefs @ Ravens", "Over 47.5");
        let up = LineMovement::record(&over, movement(&over, "47.5", "49"), Utc::now()).unwrap();
        assert_eq!(up.direction, LineDirection::Toward);

        let under = pick(BetType::OverUnder, "Chiefs @ Ravens", "Under 47.5");
        let up = LineMovement::record(&under, movement(&under, "47.5", "49"), Utc::now()).unwrap();
        assert_eq!(up.direction, LineDirection::Away);
    }

    #[test]
    fn test_ambiguous_direction_degrades_to_unknown() {
        let vague = pick(BetType::Spread, "Chiefs @ Ravens", "Take the points");
        let recorded = LineMovement::record(&vague, movement(&vague, "+3.5", "+2.5"), Utc::now()).unwrap();

        assert_eq!(recorded.direction, LineDirection::Unknown);
        assert_eq!(recorded.movement_percentage, dec!(28.57));

        let flat = LineMovement::record(&vague, movement(&vague, "+3.5", "+3.5"), Utc::now()).unwrap();
        assert_eq!(flat.direction, LineDirection::Neutral);
    }

    #[test]
    fn test_unparseable_operand_fails() {
        let fav = pick(BetType::Moneyline, "Chiefs @ Ravens", "Chiefs ML");
        let result = LineMovement::record(&fav, movement(&fav, "off the board", "-120"), Utc::now());
        assert_eq!(result, Err(DeskError::UnparseableLine("off the board".to_string())));
    }
}
