use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fact record linking a lead to the contact it produced. Its presence is
/// the durable record of "has this lead already been converted"; the
/// `lead_id` unique constraint keeps it to at most one per lead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadConversion {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub lead_id: Uuid,
    pub contact_id: Uuid,
    pub converted_at: DateTime<Utc>,
}

/// Conversion report row: the conversion plus the identity of the lead and
/// contact it links, as returned by the conversions listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConversionRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub lead_id: Uuid,
    pub contact_id: Uuid,
    pub converted_at: DateTime<Utc>,
    pub lead_name: String,
    pub lead_email: String,
    pub contact_name: String,
    pub contact_email: String,
}
