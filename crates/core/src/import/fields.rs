//! Per-field validators.
//!
//! Each validator is a pure function from a trimmed, non-empty cell string
//! to a typed [`FieldValue`]. `None` is the sentinel for "invalid": a
//! failed validator is an expected outcome that becomes a user-facing
//! message, never an error path, so validators do not return `Result` and
//! never panic.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::enums::{ContractType, Gender, RoleType};

/// Email shape accepted by the importer. No normalization is applied.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$";

/// Cnss registration number: 8 digits, a dash, 2 digits.
pub const CNSS_PATTERN: &str = r"^\d{8}-\d{2}$";

/// National phone number: exactly 8 digits, no country prefix.
pub const PHONE_PATTERN: &str = r"^\d{8}$";

/// Canonical birth-date format (ISO calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
static CNSS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(CNSS_PATTERN).expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

/// A successfully converted cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Date(NaiveDate),
    Gender(Gender),
    Contract(ContractType),
    Roles(Vec<RoleType>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_gender(&self) -> Option<Gender> {
        match self {
            Self::Gender(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_contract(&self) -> Option<ContractType> {
        match self {
            Self::Contract(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_roles(&self) -> Option<&[RoleType]> {
        match self {
            Self::Roles(r) => Some(r),
            _ => None,
        }
    }
}

/// The shared validator signature: trimmed input in, typed value or
/// invalid-sentinel out.
pub type ValidatorFn = fn(&str) -> Option<FieldValue>;

/// Strict email-shape match.
pub fn valid_email(input: &str) -> Option<FieldValue> {
    EMAIL_RE
        .is_match(input)
        .then(|| FieldValue::Text(input.to_string()))
}

/// Integer greater than or equal to zero. Zero is valid.
pub fn positive_int(input: &str) -> Option<FieldValue> {
    match input.parse::<i64>() {
        Ok(n) if n >= 0 => Some(FieldValue::Int(n)),
        _ => None,
    }
}

/// Calendar date in the canonical `YYYY-MM-DD` format.
pub fn valid_date(input: &str) -> Option<FieldValue> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .map(FieldValue::Date)
}

/// Cnss number shape match. Whether the field is required at all depends
/// on the row's contract type; that is the policy table's concern.
pub fn valid_cnss_number(input: &str) -> Option<FieldValue> {
    CNSS_RE
        .is_match(input)
        .then(|| FieldValue::Text(input.to_string()))
}

/// National 8-digit phone number.
pub fn valid_phone_number(input: &str) -> Option<FieldValue> {
    PHONE_RE
        .is_match(input)
        .then(|| FieldValue::Text(input.to_string()))
}

pub fn valid_gender(input: &str) -> Option<FieldValue> {
    Gender::from_input(input).map(FieldValue::Gender)
}

pub fn valid_contract_type(input: &str) -> Option<FieldValue> {
    ContractType::from_input(input).map(FieldValue::Contract)
}

/// Comma-separated role list. Every token must match the closed role set;
/// one invalid token fails the whole field.
pub fn valid_roles(input: &str) -> Option<FieldValue> {
    let mut roles = Vec::new();
    for token in input.split(',') {
        roles.push(RoleType::from_input(token)?);
    }
    Some(FieldValue::Roles(roles))
}
