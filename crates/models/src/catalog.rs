use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Serialized as its uppercase code; deserializes from any casing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Sport {
    Nfl,
    Ncaa,
    Nba,
    Ufc,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Nfl, Sport::Ncaa, Sport::Nba, Sport::Ufc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nfl => "NFL",
            Sport::Ncaa => "NCAA",
            Sport::Nba => "NBA",
            Sport::Ufc => "UFC",
        }
    }
}

impl FromStr for Sport {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| DeskError::InvalidSport(s.to_string()))
    }
}

impl TryFrom<String> for Sport {
    type Error = DeskError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Moneyline,
    Spread,
    OverUnder,
    PlayerProp,
}

impl BetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Moneyline => "moneyline",
            BetType::Spread => "spread",
            BetType::OverUnder => "over_under",
            BetType::PlayerProp => "player_prop",
        }
    }
}

impl FromStr for BetType {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "moneyline" | "ml" => Ok(BetType::Moneyline),
            "spread" => Ok(BetType::Spread),
            "over_under" | "total" => Ok(BetType::OverUnder),
            "player_prop" | "prop" => Ok(BetType::PlayerProp),
            _ => Err(DeskError::Validation(format!("unknown bet type: {}", s))),
        }
    }
}

/// Display priority of a pick. Ordering comes from [`HierarchyTier::rank`],
/// never from declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyTier {
    Lock,
    Featured,
    High,
    Medium,
    Value,
}

impl HierarchyTier {
    pub const ALL: [HierarchyTier; 5] = [
        HierarchyTier::Lock,
        HierarchyTier::Featured,
        HierarchyTier::High,
        HierarchyTier::Medium,
        HierarchyTier::Value,
    ];

    /// Higher rank displays first.
    pub fn rank(&self) -> u8 {
        match self {
            HierarchyTier::Lock => 5,
            HierarchyTier::Featured => 4,
            HierarchyTier::High => 3,
            HierarchyTier::Medium => 2,
            HierarchyTier::Value => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyTier::Lock => "lock",
            HierarchyTier::Featured => "featured",
            HierarchyTier::High => "high",
            HierarchyTier::Medium => "medium",
            HierarchyTier::Value => "value",
        }
    }
}

impl Ord for HierarchyTier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for HierarchyTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for HierarchyTier {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tier = s.trim();
        HierarchyTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tier))
            .ok_or_else(|| DeskError::Validation(format!("unknown hierarchy tier: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InjuryStatus {
    Out,
    Questionable,
    Probable,
    SeasonEnding,
}

impl InjuryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryStatus::Out => "out",
            InjuryStatus::Questionable => "questionable",
            InjuryStatus::Probable => "probable",
            InjuryStatus::SeasonEnding => "season-ending",
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How hard an injury hits the picks it is linked to. Ordered by
/// [`ImpactSeverity::rank`]: critical > moderate > minor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImpactSeverity {
    Critical,
    Moderate,
    Minor,
}

impl ImpactSeverity {
    pub fn rank(&self) -> u8 {
        match self {
            ImpactSeverity::Critical => 3,
            ImpactSeverity::Moderate => 2,
            ImpactSeverity::Minor => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactSeverity::Critical => "critical",
            ImpactSeverity::Moderate => "moderate",
            ImpactSeverity::Minor => "minor",
        }
    }
}

impl Ord for ImpactSeverity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for ImpactSeverity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IntelligenceType {
    Training,
    WeightCut,
    Personal,
    Lineup,
    Other,
}

impl IntelligenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntelligenceType::Training => "training",
            IntelligenceType::WeightCut => "weight-cut",
            IntelligenceType::Personal => "personal",
            IntelligenceType::Lineup => "lineup",
            IntelligenceType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    Official,
    VerifiedSocial,
    Media,
    Forum,
    Insider,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Official => "official",
            SourceType::VerifiedSocial => "verified-social",
            SourceType::Media => "media",
            SourceType::Forum => "forum",
            SourceType::Insider => "insider",
        }
    }
}

/// Which way a line moved relative to the recommended side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LineDirection {
    /// The market moved onto the recommended side.
    Toward,
    /// The market moved off the recommended side.
    Away,
    /// Opening and current lines are equal.
    Neutral,
    /// The recommended side could not be matched to the line.
    Unknown,
}

impl LineDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineDirection::Toward => "toward",
            LineDirection::Away => "away",
            LineDirection::Neutral => "neutral",
            LineDirection::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Published,
    Unpublished,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Published => "published",
            ReportStatus::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PickOutcome {
    Win,
    Loss,
    Push,
}

impl PickOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickOutcome::Win => "win",
            PickOutcome::Loss => "loss",
            PickOutcome::Push => "push",
        }
    }
}

impl fmt::Display for PickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropSelection {
    Over,
    Under,
}

impl PropSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropSelection::Over => "over",
            PropSelection::Under => "under",
        }
    }
}
