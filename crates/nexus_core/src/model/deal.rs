//! Deal record and pipeline stages.
//!
//! # Invariants
//! - `amount` is non-negative whole currency units (enforced by `u64`).
//! - `probability` stays within `0..=100`.
//! - Stage transitions are unconstrained; any stage may follow any other.

use super::{ensure_id, new_record_id, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEAL_TITLE: &str = "New Deal Opportunity";
pub const DEFAULT_DEAL_PROBABILITY: u8 = 10;

/// Pipeline phase of a deal. Wire names are the human-readable labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStage {
    #[serde(rename = "New Lead")]
    New,
    #[serde(rename = "Qualified")]
    Qualified,
    #[serde(rename = "Proposal Sent")]
    ProposalSent,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl DealStage {
    /// Board column order.
    pub const ALL: [DealStage; 6] = [
        DealStage::New,
        DealStage::Qualified,
        DealStage::ProposalSent,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New Lead",
            Self::Qualified => "Qualified",
            Self::ProposalSent => "Proposal Sent",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Closed stages are terminal for reporting, not for transitions.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: RecordId,
    pub title: String,
    pub amount: u64,
    pub stage: DealStage,
    /// Empty when the deal was created without any contact available.
    pub contact_id: RecordId,
    /// ISO date (`YYYY-MM-DD`).
    pub close_date: String,
    pub probability: u8,
}

impl Deal {
    /// Builds the default deal created from the pipeline "New Deal" action.
    pub fn new_default(contact_id: impl Into<RecordId>, close_date: impl Into<String>) -> Self {
        Self {
            id: new_record_id('d'),
            title: DEFAULT_DEAL_TITLE.to_string(),
            amount: 0,
            stage: DealStage::New,
            contact_id: contact_id.into(),
            close_date: close_date.into(),
            probability: DEFAULT_DEAL_PROBABILITY,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.stage.is_closed()
    }

    /// Returns a copy moved to `stage` with every other field unchanged.
    pub fn with_stage(&self, stage: DealStage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(&self.id)?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle {
                id: self.id.clone(),
            });
        }
        if self.probability > 100 {
            return Err(ValidationError::ProbabilityOutOfRange {
                id: self.id.clone(),
                value: self.probability,
            });
        }
        Ok(())
    }
}

/// Sums deal amounts, saturating at `u64::MAX`.
pub fn total_amount<'a>(deals: impl IntoIterator<Item = &'a Deal>) -> u64 {
    deals
        .into_iter()
        .fold(0u64, |total, deal| total.saturating_add(deal.amount))
}

/// Formats whole currency units as `$1,234,567`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}

impl Record for Deal {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_amount, total_amount, Deal, DealStage, DEFAULT_DEAL_PROBABILITY,
        DEFAULT_DEAL_TITLE,
    };
    use crate::model::ValidationError;

    #[test]
    fn default_deal_matches_pipeline_defaults() {
        let deal = Deal::new_default("c1", "2024-05-01");
        assert!(deal.id.starts_with('d'));
        assert_eq!(deal.title, DEFAULT_DEAL_TITLE);
        assert_eq!(deal.amount, 0);
        assert_eq!(deal.stage, DealStage::New);
        assert_eq!(deal.probability, DEFAULT_DEAL_PROBABILITY);
        assert_eq!(deal.contact_id, "c1");
        assert!(deal.validate().is_ok());
    }

    #[test]
    fn total_amount_saturates() {
        let mut big = Deal::new_default("c1", "2024-05-01");
        big.amount = u64::MAX - 1;
        let mut small = big.clone();
        small.amount = 10;

        assert_eq!(total_amount(&[small.clone()]), 10);
        assert_eq!(total_amount(&[big, small]), u64::MAX);
        assert_eq!(total_amount(&[]), 0);
    }

    #[test]
    fn stage_uses_label_on_the_wire() {
        let json = serde_json::to_string(&DealStage::ProposalSent).unwrap();
        assert_eq!(json, "\"Proposal Sent\"");
        let parsed: DealStage = serde_json::from_str("\"New Lead\"").unwrap();
        assert_eq!(parsed, DealStage::New);
        assert_eq!(DealStage::parse(" closed won "), Some(DealStage::ClosedWon));
        assert_eq!(DealStage::parse("Won"), None);
    }

    #[test]
    fn validate_rejects_probability_over_100_and_blank_title() {
        let mut deal = Deal::new_default("c1", "2024-05-01");
        deal.probability = 101;
        assert!(matches!(
            deal.validate(),
            Err(ValidationError::ProbabilityOutOfRange { value: 101, .. })
        ));

        deal.probability = 100;
        deal.title = "   ".to_string();
        assert!(matches!(
            deal.validate(),
            Err(ValidationError::EmptyTitle { .. })
        ));
    }

    #[test]
    fn with_stage_changes_only_stage() {
        let deal = Deal::new_default("c1", "2024-05-01");
        let moved = deal.with_stage(DealStage::ClosedLost);
        assert_eq!(moved.stage, DealStage::ClosedLost);
        assert!(!moved.is_open());
        assert_eq!(moved.id, deal.id);
        assert_eq!(moved.amount, deal.amount);
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(999), "$999");
        assert_eq!(format_amount(50_000), "$50,000");
        assert_eq!(format_amount(1_234_567), "$1,234,567");
    }
}
