//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep required fields as `Option` so a missing field becomes a
//! `400 invalid_request` with field context instead of a deserialiser error.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UnknownVariant};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    NotPositive,
    UnknownValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::NotPositive => "not_positive",
            ErrorCode::UnknownValue => "unknown_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Unwrap a required body field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Unwrap a required text field, treating blank strings as missing.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Unwrap a required number that must be strictly positive.
pub(crate) fn positive_number(value: Option<f64>, field: FieldName) -> Result<f64, Error> {
    let number = required(value, field)?;
    if number.is_finite() && number > 0.0 {
        Ok(number)
    } else {
        let name = field.as_str();
        Err(
            ValidationError::new(field, format!("{name} must be a positive number"))
                .with_value(ErrorCode::NotPositive, number.to_string()),
        )
    }
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

pub(crate) fn parse_required_uuid(value: Option<String>, field: FieldName) -> Result<Uuid, Error> {
    parse_uuid(required(value, field)?, field)
}

/// Parse a text enum, reporting the allowed values on failure.
pub(crate) fn parse_enum<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse().map_err(|err: UnknownVariant| {
        let name = field.as_str();
        Error::invalid_request(format!("Invalid {name}")).with_details(json!({
            "field": name,
            "value": err.value(),
            "allowed": err.allowed(),
            "code": ErrorCode::UnknownValue.as_str(),
        }))
    })
}

pub(crate) fn parse_optional_enum<T>(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.map(|raw| parse_enum(&raw, field)).transpose()
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|timestamp| timestamp.with_timezone(&Utc))
                .map_err(|_| {
                    let name = field.as_str();
                    ValidationError::new(field, format!("{name} must be an RFC 3339 timestamp"))
                        .with_value(ErrorCode::UnknownValue, raw.as_str())
                })
        })
        .transpose()
}
