//! Row-level validation.
//!
//! [`validate_row`] walks the policy table over one uploaded row and
//! produces categorized problems plus a [`ParsedRow`] of typed values.
//! Severity is decided solely by the field's mandatoriness at the moment
//! of the check — the same failed validator yields an Error on a mandatory
//! field and a Warning on an optional one, so a batch can proceed with
//! warnings while still surfacing them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{ContractType, Gender, RoleType};

use super::fields::FieldValue;
use super::policy::{FieldKey, FieldPolicy};
use super::report::WrongCell;

/// One uploaded cell, tagged with its source position. The position is
/// used only for error reporting, never for business logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    pub row_index: i32,
    pub col_index: i32,
}

/// One uploaded row: field key to cell.
pub type Row = BTreeMap<FieldKey, Cell>;

/// A row's typed values, filled in as validation walks the policy table.
///
/// Conditional-mandatoriness predicates are evaluated against this while
/// it is still partially built, which is why declaration order in the
/// policy table matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRow {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl ParsedRow {
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn insert(&mut self, key: FieldKey, value: FieldValue) {
        self.values.insert(key, value);
    }
}

/// Everything row validation produces for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub wrong_cells: Vec<WrongCell>,
    pub parsed: ParsedRow,
}

impl RowValidation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validate one row against the policy table.
///
/// Per declared field:
/// 1. absent and mandatory → Error, no flagged cell (there is no cell);
/// 2. present but empty → Error + flagged cell if mandatory, null if not;
/// 3. present with a validator → typed value, or the canned message as
///    Error/Warning per mandatoriness plus a flagged cell;
/// 4. present without a validator → trimmed string kept as-is.
pub fn validate_row(policy: &FieldPolicy, row: &Row) -> RowValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut wrong_cells = Vec::new();
    let mut parsed = ParsedRow::default();

    for spec in policy.specs() {
        let key = spec.key;
        let Some(cell) = row.get(&key) else {
            if policy.is_mandatory(&parsed, key) {
                errors.push(format!("{} is mandatory but missing", spec.display_name));
            }
            continue;
        };

        let trimmed = cell.value.trim();
        if trimmed.is_empty() {
            if policy.is_mandatory(&parsed, key) {
                let message = format!("{} is mandatory but empty", spec.display_name);
                wrong_cells.push(WrongCell::at(&message, cell));
                errors.push(message);
            }
            // Optional and empty: stored as null, not a problem.
            continue;
        }

        match &spec.check {
            Some(check) => match (check.run)(trimmed) {
                Some(value) => parsed.insert(key, value),
                None => {
                    let message = check.failure_message.clone();
                    wrong_cells.push(WrongCell::at(&message, cell));
                    if policy.is_mandatory(&parsed, key) {
                        errors.push(message);
                    } else {
                        warnings.push(message);
                    }
                }
            },
            None => parsed.insert(key, FieldValue::Text(trimmed.to_string())),
        }
    }

    RowValidation {
        errors,
        warnings,
        wrong_cells,
        parsed,
    }
}

/// A fully typed employee extracted from a cleanly validated row, with the
/// role list kept separate from the persisted-entity shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: i64,
    pub contract_type: ContractType,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub cnss_number: Option<String>,
    pub roles: Vec<RoleType>,
}

impl ValidatedEmployee {
    /// Build from a parsed row. Returns `None` if any mandatory piece is
    /// absent — callers must only invoke this after validation produced no
    /// errors for the row.
    pub fn from_row(row: &ParsedRow) -> Option<Self> {
        use FieldKey::*;

        Some(Self {
            first_name: row.get(FirstName)?.as_text()?.to_string(),
            last_name: row.get(LastName)?.as_text()?.to_string(),
            email: row.get(Email)?.as_text()?.to_string(),
            number: row.get(Number)?.as_int()?,
            contract_type: row.get(ContractType)?.as_contract()?,
            gender: row.get(Gender)?.as_gender()?,
            birth_date: row.get(BirthDate).and_then(|v| v.as_date()),
            address: row.get(Address).and_then(|v| v.as_text()).map(String::from),
            phone_number: row
                .get(PhoneNumber)
                .and_then(|v| v.as_text())
                .map(String::from),
            cnss_number: row
                .get(CnssNumber)
                .and_then(|v| v.as_text())
                .map(String::from),
            roles: row.get(EmployeeRoles)?.as_roles()?.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: &str, row_index: i32, col_index: i32) -> Cell {
        Cell {
            value: value.to_string(),
            row_index,
            col_index,
        }
    }

    /// A fully valid row on a Cdi contract, including the Cnss number that
    /// contract requires.
    fn complete_row() -> Row {
        let mut row = Row::new();
        row.insert(FieldKey::FirstName, cell("Amel", 0, 0));
        row.insert(FieldKey::LastName, cell("Ben Salah", 0, 1));
        row.insert(FieldKey::Email, cell("amel@example.com", 0, 2));
        row.insert(FieldKey::Number, cell("12", 0, 3));
        row.insert(FieldKey::ContractType, cell("Cdi", 0, 4));
        row.insert(FieldKey::Gender, cell("Female", 0, 5));
        row.insert(FieldKey::EmployeeRoles, cell("Admin,User", 0, 6));
        row.insert(FieldKey::BirthDate, cell("1991-02-03", 0, 7));
        row.insert(FieldKey::Address, cell("12 Rue de Carthage", 0, 8));
        row.insert(FieldKey::PhoneNumber, cell("20345678", 0, 9));
        row.insert(FieldKey::CnssNumber, cell("12345678-90", 0, 10));
        row
    }

    #[test]
    fn clean_row_produces_no_problems_and_a_typed_employee() {
        let policy = FieldPolicy::standard();
        let outcome = validate_row(&policy, &complete_row());

        assert!(outcome.is_clean(), "unexpected problems: {outcome:?}");
        assert!(outcome.wrong_cells.is_empty());

        let employee = ValidatedEmployee::from_row(&outcome.parsed).expect("complete row");
        assert_eq!(employee.email, "amel@example.com");
        assert_eq!(employee.number, 12);
        assert_eq!(employee.contract_type, ContractType::Cdi);
        assert_eq!(employee.roles, vec![RoleType::Admin, RoleType::User]);
        assert_eq!(employee.cnss_number.as_deref(), Some("12345678-90"));
    }

    #[test]
    fn missing_mandatory_field_is_one_error_with_no_cell() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.remove(&FieldKey::Email);

        let outcome = validate_row(&policy, &row);
        assert_eq!(outcome.errors, vec!["Email is mandatory but missing"]);
        assert!(outcome.warnings.is_empty());
        assert!(outcome.wrong_cells.is_empty());
    }

    #[test]
    fn empty_mandatory_field_is_one_error_and_one_flagged_cell() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::Gender, cell("   ", 0, 5));

        let outcome = validate_row(&policy, &row);
        assert_eq!(outcome.errors, vec!["Gender is mandatory but empty"]);
        assert_eq!(outcome.wrong_cells.len(), 1);
        assert_eq!(outcome.wrong_cells[0].row_index, 0);
        assert_eq!(outcome.wrong_cells[0].col_index, 5);
    }

    #[test]
    fn empty_optional_field_is_stored_as_null_without_problems() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::BirthDate, cell("", 0, 7));

        let outcome = validate_row(&policy, &row);
        assert!(outcome.is_clean());
        assert!(outcome.parsed.get(FieldKey::BirthDate).is_none());

        let employee = ValidatedEmployee::from_row(&outcome.parsed).unwrap();
        assert_eq!(employee.birth_date, None);
    }

    #[test]
    fn absent_optional_field_is_not_a_problem() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.remove(&FieldKey::Address);

        let outcome = validate_row(&policy, &row);
        assert!(outcome.is_clean());
    }

    #[test]
    fn failed_validator_on_optional_field_is_a_warning() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::PhoneNumber, cell("+21620345678", 0, 9));

        let outcome = validate_row(&policy, &row);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.warnings,
            vec!["Phone number should be exactly 8 digits"]
        );
        assert_eq!(outcome.wrong_cells.len(), 1);
    }

    #[test]
    fn failed_validator_on_mandatory_field_is_an_error() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::Number, cell("-3", 0, 3));

        let outcome = validate_row(&policy, &row);
        assert_eq!(outcome.errors, vec!["It should be an integer >= 0"]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn cnss_empty_on_cdi_contract_is_an_error() {
        // The scenario row: bad email, Cdi contract, empty Cnss cell.
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::Email, cell("bad-email", 0, 2));
        row.insert(FieldKey::CnssNumber, cell("", 0, 10));

        let outcome = validate_row(&policy, &row);
        assert_eq!(
            outcome.errors,
            vec![
                "Wrong email format".to_string(),
                "Cnss Number is mandatory but empty".to_string(),
            ]
        );
        // Only the Cnss cell is flagged for emptiness; the email cell is
        // flagged for its format failure.
        assert_eq!(outcome.wrong_cells.len(), 2);
    }

    #[test]
    fn cnss_empty_on_sivp_contract_is_null() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::ContractType, cell("Sivp", 0, 4));
        row.insert(FieldKey::CnssNumber, cell("", 0, 10));

        let outcome = validate_row(&policy, &row);
        assert!(outcome.is_clean());
        let employee = ValidatedEmployee::from_row(&outcome.parsed).unwrap();
        assert_eq!(employee.cnss_number, None);
    }

    #[test]
    fn malformed_cnss_on_sivp_contract_is_a_warning() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::ContractType, cell("Apprenti", 0, 4));
        row.insert(FieldKey::CnssNumber, cell("not-a-cnss", 0, 10));

        let outcome = validate_row(&policy, &row);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn invalid_role_token_is_always_an_error() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::EmployeeRoles, cell("Admin,Ghost", 0, 6));

        let outcome = validate_row(&policy, &row);
        assert_eq!(outcome.errors, vec!["Possible values are: Admin, Vendor, User"]);
    }

    #[test]
    fn values_are_trimmed_before_validation_and_storage() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::FirstName, cell("  Amel  ", 0, 0));
        row.insert(FieldKey::Email, cell(" amel@example.com ", 0, 2));

        let outcome = validate_row(&policy, &row);
        assert!(outcome.is_clean());
        let employee = ValidatedEmployee::from_row(&outcome.parsed).unwrap();
        assert_eq!(employee.first_name, "Amel");
        assert_eq!(employee.email, "amel@example.com");
    }

    #[test]
    fn revalidating_the_same_row_is_idempotent() {
        let policy = FieldPolicy::standard();
        let mut row = complete_row();
        row.insert(FieldKey::Email, cell("bad-email", 0, 2));
        row.insert(FieldKey::PhoneNumber, cell("bad-phone", 0, 9));

        let first = validate_row(&policy, &row);
        let second = validate_row(&policy, &row);
        assert_eq!(first, second);
    }
}
