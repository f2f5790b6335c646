//! The field policy table.
//!
//! A [`FieldPolicy`] declares every field the importer understands: its
//! wire key, display name, mandatoriness, and validator. It is built once
//! at startup ([`FieldPolicy::standard`]) and passed by reference into the
//! row validator and the orchestrator — there is no ambient global table.
//!
//! Declaration order is evaluation order. A conditionally-mandatory field
//! must be declared after every field its predicate reads, so that the
//! predicate sees those fields already parsed; `cnss_number` therefore
//! comes last, after `contract_type`.

use crate::enums::{ContractType, Gender, RoleType};
use serde::Serialize;

use super::fields::{self, ValidatorFn};
use super::row::ParsedRow;

/// Wire keys of the fields an import row may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    FirstName,
    LastName,
    Email,
    Number,
    ContractType,
    Gender,
    EmployeeRoles,
    BirthDate,
    Address,
    PhoneNumber,
    CnssNumber,
}

impl FieldKey {
    /// The snake_case key used in upload payloads and field descriptors.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Number => "number",
            Self::ContractType => "contract_type",
            Self::Gender => "gender",
            Self::EmployeeRoles => "employee_roles",
            Self::BirthDate => "birth_date",
            Self::Address => "address",
            Self::PhoneNumber => "phone_number",
            Self::CnssNumber => "cnss_number",
        }
    }

    /// Resolve a wire key. Returns `None` for keys outside the table.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "number" => Some(Self::Number),
            "contract_type" => Some(Self::ContractType),
            "gender" => Some(Self::Gender),
            "employee_roles" => Some(Self::EmployeeRoles),
            "birth_date" => Some(Self::BirthDate),
            "address" => Some(Self::Address),
            "phone_number" => Some(Self::PhoneNumber),
            "cnss_number" => Some(Self::CnssNumber),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// When a field must carry a value.
#[derive(Clone, Copy)]
pub enum Requirement {
    /// Always required.
    Mandatory,
    /// May be absent or empty; stored as null when it is.
    Optional,
    /// Required only when the predicate holds over the other,
    /// already-parsed fields of the same row.
    MandatoryIf(fn(&ParsedRow) -> bool),
}

impl std::fmt::Debug for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mandatory => f.write_str("Mandatory"),
            Self::Optional => f.write_str("Optional"),
            Self::MandatoryIf(_) => f.write_str("MandatoryIf(..)"),
        }
    }
}

/// A validator paired with its canned user-facing failure message.
#[derive(Debug, Clone)]
pub struct FieldCheck {
    pub run: ValidatorFn,
    pub failure_message: String,
}

/// One declared import field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub display_name: &'static str,
    pub requirement: Requirement,
    pub check: Option<FieldCheck>,
}

/// Broad cell type hint for the spreadsheet-matching UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
}

/// Import field descriptor returned by the import-fields endpoint, so the
/// client can label columns and pre-check cells.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    /// Unconditionally mandatory. Conditional fields report `false` here
    /// and describe their condition in `mandatory_when`.
    pub mandatory: bool,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory_when: Option<String>,
}

/// Cnss registration is only required for the contract types that carry
/// social-security enrollment.
fn cnss_required(row: &ParsedRow) -> bool {
    matches!(
        row.get(FieldKey::ContractType).and_then(|v| v.as_contract()),
        Some(ContractType::Cdi) | Some(ContractType::Cdd)
    )
}

/// The static field policy table.
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    specs: Vec<FieldSpec>,
}

impl FieldPolicy {
    /// The standard employee import policy.
    pub fn standard() -> Self {
        use FieldKey::*;
        use Requirement::{Mandatory, MandatoryIf, Optional};

        let check = |run: ValidatorFn, message: String| Some(FieldCheck {
            run,
            failure_message: message,
        });
        let allowed = |values: &[&str]| format!("Possible values are: {}", values.join(", "));

        let specs = vec![
            FieldSpec {
                key: FirstName,
                display_name: "First Name",
                requirement: Mandatory,
                check: None,
            },
            FieldSpec {
                key: LastName,
                display_name: "Last Name",
                requirement: Mandatory,
                check: None,
            },
            FieldSpec {
                key: Email,
                display_name: "Email",
                requirement: Mandatory,
                check: check(fields::valid_email, "Wrong email format".to_string()),
            },
            FieldSpec {
                key: Number,
                display_name: "Number",
                requirement: Mandatory,
                check: check(
                    fields::positive_int,
                    "It should be an integer >= 0".to_string(),
                ),
            },
            FieldSpec {
                key: ContractType,
                display_name: "Contract Type",
                requirement: Mandatory,
                check: check(
                    fields::valid_contract_type,
                    allowed(crate::enums::ContractType::possible_values()),
                ),
            },
            FieldSpec {
                key: Gender,
                display_name: "Gender",
                requirement: Mandatory,
                check: check(
                    fields::valid_gender,
                    allowed(crate::enums::Gender::possible_values()),
                ),
            },
            FieldSpec {
                key: EmployeeRoles,
                display_name: "Roles",
                requirement: Mandatory,
                check: check(
                    fields::valid_roles,
                    allowed(RoleType::possible_values()),
                ),
            },
            FieldSpec {
                key: BirthDate,
                display_name: "Birth Date",
                requirement: Optional,
                check: check(
                    fields::valid_date,
                    "Dates format should be YYYY-MM-DD".to_string(),
                ),
            },
            FieldSpec {
                key: Address,
                display_name: "Address",
                requirement: Optional,
                check: None,
            },
            FieldSpec {
                key: PhoneNumber,
                display_name: "Phone Number",
                requirement: Optional,
                check: check(
                    fields::valid_phone_number,
                    "Phone number should be exactly 8 digits".to_string(),
                ),
            },
            FieldSpec {
                key: CnssNumber,
                display_name: "Cnss Number",
                requirement: MandatoryIf(cnss_required),
                check: check(
                    fields::valid_cnss_number,
                    "It should be {8 digits}-{2 digits} and it's mandatory for Cdi and Cdd"
                        .to_string(),
                ),
            },
        ];

        Self { specs }
    }

    /// All field specs, in declaration (= evaluation) order.
    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn spec(&self, key: FieldKey) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    /// Display name for a key; falls back to the wire key for robustness
    /// in messages.
    pub fn display_name(&self, key: FieldKey) -> &'static str {
        self.spec(key).map(|s| s.display_name).unwrap_or(key.as_key())
    }

    /// Whether `key` is mandatory for this (possibly partially-parsed) row.
    pub fn is_mandatory(&self, row: &ParsedRow, key: FieldKey) -> bool {
        match self.spec(key).map(|s| s.requirement) {
            Some(Requirement::Mandatory) => true,
            Some(Requirement::MandatoryIf(pred)) => pred(row),
            Some(Requirement::Optional) | None => false,
        }
    }

    /// The validator registered for `key`, if any.
    pub fn check_for(&self, key: FieldKey) -> Option<&FieldCheck> {
        self.spec(key).and_then(|s| s.check.as_ref())
    }

    /// Keys that must be present as columns in every upload, i.e. the
    /// unconditionally mandatory ones.
    pub fn required_keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.specs
            .iter()
            .filter(|s| matches!(s.requirement, Requirement::Mandatory))
            .map(|s| s.key)
    }

    /// Field descriptors for the spreadsheet-matching client.
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.specs
            .iter()
            .map(|spec| {
                let kind = match spec.key {
                    FieldKey::Number => FieldKind::Integer,
                    _ => FieldKind::Text,
                };
                let pattern = match spec.key {
                    FieldKey::Email => Some(fields::EMAIL_PATTERN),
                    FieldKey::CnssNumber => Some(fields::CNSS_PATTERN),
                    FieldKey::PhoneNumber => Some(fields::PHONE_PATTERN),
                    _ => None,
                };
                let allowed_values = match spec.key {
                    FieldKey::ContractType => Some(ContractType::possible_values().to_vec()),
                    FieldKey::Gender => Some(Gender::possible_values().to_vec()),
                    FieldKey::EmployeeRoles => Some(RoleType::possible_values().to_vec()),
                    _ => None,
                };
                let mandatory_when = match spec.requirement {
                    Requirement::MandatoryIf(_) => {
                        Some("contract_type is Cdi or Cdd".to_string())
                    }
                    _ => None,
                };
                FieldDescriptor {
                    key: spec.key.as_key(),
                    display_name: spec.display_name,
                    mandatory: matches!(spec.requirement, Requirement::Mandatory),
                    kind,
                    pattern,
                    allowed_values,
                    mandatory_when,
                }
            })
            .collect()
    }
}
