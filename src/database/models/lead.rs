use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sales pipeline entity. Rows are always scoped by `tenant_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub assigned_user_id: Option<Uuid>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lead_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[sqlx(rename = "NEW")]
    New,
    #[sqlx(rename = "CONTACTED")]
    Contacted,
    #[sqlx(rename = "QUALIFIED")]
    Qualified,
    #[sqlx(rename = "PROPOSAL_SENT")]
    ProposalSent,
    #[sqlx(rename = "NEGOTIATION")]
    Negotiation,
    #[sqlx(rename = "CONVERTED")]
    Converted,
    #[sqlx(rename = "LOST")]
    Lost,
    #[sqlx(rename = "ON_HOLD")]
    OnHold,
    #[sqlx(rename = "ARCHIVED")]
    Archived,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::ProposalSent => "PROPOSAL_SENT",
            LeadStatus::Negotiation => "NEGOTIATION",
            LeadStatus::Converted => "CONVERTED",
            LeadStatus::Lost => "LOST",
            LeadStatus::OnHold => "ON_HOLD",
            LeadStatus::Archived => "ARCHIVED",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = UnknownLeadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(LeadStatus::New),
            "CONTACTED" => Ok(LeadStatus::Contacted),
            "QUALIFIED" => Ok(LeadStatus::Qualified),
            "PROPOSAL_SENT" => Ok(LeadStatus::ProposalSent),
            "NEGOTIATION" => Ok(LeadStatus::Negotiation),
            "CONVERTED" => Ok(LeadStatus::Converted),
            "LOST" => Ok(LeadStatus::Lost),
            "ON_HOLD" => Ok(LeadStatus::OnHold),
            "ARCHIVED" => Ok(LeadStatus::Archived),
            other => Err(UnknownLeadStatus(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownLeadStatus(pub String);

impl std::fmt::Display for UnknownLeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown lead status: {}", self.0)
    }
}

impl std::error::Error for UnknownLeadStatus {}

/// The one qualifying transition: the status must change FROM a
/// non-CONVERTED value TO CONVERTED within the same update. Re-saving an
/// already-converted lead never qualifies.
pub fn conversion_triggered(previous: LeadStatus, current: LeadStatus) -> bool {
    previous != LeadStatus::Converted && current == LeadStatus::Converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::ProposalSent,
            LeadStatus::Negotiation,
            LeadStatus::Converted,
            LeadStatus::Lost,
            LeadStatus::OnHold,
            LeadStatus::Archived,
        ] {
            assert_eq!(LeadStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(LeadStatus::from_str("WON").is_err());
        assert!(LeadStatus::from_str("converted").is_err());
        assert!(LeadStatus::from_str("").is_err());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&LeadStatus::ProposalSent).unwrap();
        assert_eq!(json, "\"PROPOSAL_SENT\"");
        let back: LeadStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(back, LeadStatus::OnHold);
    }

    #[test]
    fn transition_into_converted_triggers() {
        assert!(conversion_triggered(LeadStatus::Qualified, LeadStatus::Converted));
        assert!(conversion_triggered(LeadStatus::New, LeadStatus::Converted));
        assert!(conversion_triggered(LeadStatus::Lost, LeadStatus::Converted));
    }

    #[test]
    fn resaving_converted_does_not_trigger() {
        assert!(!conversion_triggered(LeadStatus::Converted, LeadStatus::Converted));
    }

    #[test]
    fn other_transitions_do_not_trigger() {
        assert!(!conversion_triggered(LeadStatus::New, LeadStatus::Qualified));
        assert!(!conversion_triggered(LeadStatus::Converted, LeadStatus::Lost));
        assert!(!conversion_triggered(LeadStatus::Negotiation, LeadStatus::ProposalSent));
    }
}
