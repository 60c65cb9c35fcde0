use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{IntelligenceType, SourceType};
use crate::error::Result;
use crate::pick::validate_score;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntelligenceUpdate {
    pub id: Uuid,
    pub report_id: Uuid,
    pub target_id: Option<String>,
    pub target_name: String,
    pub update_type: IntelligenceType,
    pub content: String,
    pub source_name: String,
    pub source_type: SourceType,
    /// 0-100, higher is more trusted.
    pub credibility: u8,
    pub reported_at: DateTime<Utc>,
    pub is_new: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIntelligence {
    #[serde(default)]
    pub target_id: Option<String>,
    pub target_name: String,
    pub update_type: IntelligenceType,
    pub content: String,
    pub source_name: String,
    pub source_type: SourceType,
    pub credibility: u8,
    #[serde(default)]
    pub reported_at: Option<DateTime<Utc>>,
}

impl NewIntelligence {
    pub fn into_update(self, report_id: Uuid, now: DateTime<Utc>) -> Result<IntelligenceUpdate> {
        validate_score("credibility", self.credibility)?;

        Ok(IntelligenceUpdate {
            id: Uuid::new_v4(),
            report_id,
            target_id: self.target_id,
            target_name: self.target_name,
            update_type: self.update_type,
            content: self.content,
            source_name: self.source_name,
            source_type: self.source_type,
            credibility: self.credibility,
            reported_at: self.reported_at.unwrap_or(now),
            is_new: true,
        })
    }
}

impl IntelligenceUpdate {
    pub fn acknowledge(&mut self) {
        self.is_new = false;
    }
}
