//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{DocumentId, Error, PlanTierId};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    UnknownTier,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownTier => "unknown_tier",
        }
    }
}

fn field_error(field: &str, message: String, code: ValidationCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field, "value": value, "code": code.as_str() }),
        None => json!({ "field": field, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

/// Error for a required field that was absent.
pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        format!("missing required field: {field}"),
        ValidationCode::MissingField,
        None,
    )
}

/// Parse a document id path segment.
pub(crate) fn parse_document_id(raw: &str) -> Result<DocumentId, Error> {
    Uuid::parse_str(raw).map(DocumentId::from_uuid).map_err(|_| {
        field_error(
            "id",
            "document id must be a valid UUID".to_owned(),
            ValidationCode::InvalidUuid,
            Some(raw),
        )
    })
}

/// Parse a tier identifier, rejecting names outside the catalog.
pub(crate) fn parse_tier_id(raw: &str) -> Result<PlanTierId, Error> {
    raw.parse().map_err(|_| {
        field_error(
            "tier",
            format!("unknown plan tier: {raw}"),
            ValidationCode::UnknownTier,
            Some(raw),
        )
    })
}
