//! Bulk-import validation pipeline.
//!
//! The pipeline is pure logic (no DB, no async, no I/O) split into the
//! layers a batch flows through:
//!
//! - [`fields`] — per-field validators: raw cell string in, typed value or
//!   sentinel out.
//! - [`policy`] — the field policy table: which fields exist, which are
//!   mandatory (unconditionally or based on other fields of the same row),
//!   and which validator applies to each.
//! - [`row`] — validates one row against the policy table, producing a
//!   typed employee plus categorized problems.
//! - [`batch`] — cross-row helpers: in-batch duplicate detection and
//!   candidate collection for the datastore uniqueness query.
//! - [`report`] — aggregates per-row problems into the import report and
//!   applies the accept/reject decision rule.
//!
//! The async orchestration around this pipeline (datastore lookups, the
//! insert transaction, notification dispatch) lives in the API crate.

pub mod batch;
pub mod fields;
pub mod policy;
pub mod report;
pub mod row;

pub use batch::{batch_duplicates, cells_with_value, unique_candidates, UNIQUE_FIELDS};
pub use fields::FieldValue;
pub use policy::{FieldDescriptor, FieldKey, FieldKind, FieldPolicy, FieldSpec, Requirement};
pub use report::{ImportReport, ImportReportBuilder, Severity, WrongCell};
pub use row::{validate_row, Cell, ParsedRow, Row, RowValidation, ValidatedEmployee};
