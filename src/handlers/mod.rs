// Request handlers: parse input, authorize, call the service, wrap the
// result in the `{"success": true, "data": ...}` envelope.
pub mod auth;
pub mod contacts;
pub mod conversions;
pub mod leads;
pub mod users;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::LeadStatus;
use crate::error::ApiError;

/// Required-input check; absence classifies as invalid-argument
pub(crate) fn require<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::missing_field(field))
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), format!("Invalid UUID format: {}", value));
        ApiError::invalid_fields("Invalid field format", field_errors)
    })
}

pub(crate) fn parse_status(field: &str, value: Option<&str>) -> Result<Option<LeadStatus>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<LeadStatus>().map(Some).map_err(|_| {
            let mut field_errors = HashMap::new();
            field_errors.insert(field.to_string(), format!("Unknown status value: {}", raw));
            ApiError::invalid_fields("Invalid field format", field_errors)
        }),
    }
}

pub(crate) fn parse_timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                let mut field_errors = HashMap::new();
                field_errors
                    .insert(field.to_string(), format!("Invalid timestamp format: {}", raw));
                ApiError::invalid_fields("Invalid field format", field_errors)
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_classifies_missing_input() {
        let err = require::<String>("tenant_id", None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(require("tenant_id", Some("x")).is_ok());
    }

    #[test]
    fn parse_uuid_rejects_garbage() {
        assert!(parse_uuid("lead_id", "not-a-uuid").is_err());
        assert!(parse_uuid("lead_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
    }

    #[test]
    fn parse_status_accepts_wire_names_only() {
        assert_eq!(parse_status("status", None).unwrap(), None);
        assert_eq!(
            parse_status("status", Some("CONVERTED")).unwrap(),
            Some(LeadStatus::Converted)
        );
        assert!(parse_status("status", Some("WON")).is_err());
    }

    #[test]
    fn parse_timestamp_takes_rfc3339() {
        assert!(parse_timestamp("date_from", Some("2026-01-15T10:00:00Z")).unwrap().is_some());
        assert!(parse_timestamp("date_from", Some("yesterday")).is_err());
        assert_eq!(parse_timestamp("date_from", None).unwrap(), None);
    }
}
