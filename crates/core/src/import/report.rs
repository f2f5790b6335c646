//! Import report assembly.
//!
//! Pure aggregation: per-line problem groups become `Line N:` prefixed
//! blocks, flagged cells are concatenated, and the accept/reject decision
//! is applied. No business logic beyond string assembly lives here.

use serde::Serialize;

use super::row::Cell;

/// Whether a problem blocks the batch or merely needs acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A flagged cell returned to the client for highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrongCell {
    pub message: String,
    pub row_index: i32,
    pub col_index: i32,
}

impl WrongCell {
    /// Flag `cell` with `message`, carrying over its source position.
    pub fn at(message: &str, cell: &Cell) -> Self {
        Self {
            message: message.to_string(),
            row_index: cell.row_index,
            col_index: cell.col_index,
        }
    }
}

/// The response of one import attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub accepted: bool,
    /// Newline-joined error blocks, `None` when there are none.
    pub errors: Option<String>,
    /// Newline-joined warning blocks, `None` when there are none.
    pub warnings: Option<String>,
    pub wrong_cells: Vec<WrongCell>,
}

/// Accumulates problems across a batch and produces the final report.
#[derive(Debug, Default)]
pub struct ImportReportBuilder {
    error_blocks: Vec<String>,
    warning_blocks: Vec<String>,
    wrong_cells: Vec<WrongCell>,
}

impl ImportReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one row's problems under a 1-based line number. Empty
    /// message lists are skipped entirely.
    pub fn record_line(&mut self, line: usize, errors: &[String], warnings: &[String]) {
        if !errors.is_empty() {
            self.error_blocks
                .push(format!("Line {line}:\n{}", errors.join("\n")));
        }
        if !warnings.is_empty() {
            self.warning_blocks
                .push(format!("Line {line}:\n{}", warnings.join("\n")));
        }
    }

    /// Record a batch-wide problem (e.g. a uniqueness violation) that is
    /// not tied to a single line.
    pub fn record_global(&mut self, severity: Severity, message: impl Into<String>) {
        match severity {
            Severity::Error => self.error_blocks.push(message.into()),
            Severity::Warning => self.warning_blocks.push(message.into()),
        }
    }

    pub fn push_cell(&mut self, cell: WrongCell) {
        self.wrong_cells.push(cell);
    }

    pub fn extend_cells(&mut self, cells: impl IntoIterator<Item = WrongCell>) {
        self.wrong_cells.extend(cells);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_blocks.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warning_blocks.is_empty()
    }

    /// The decision rule: errors always block; warnings block unless the
    /// caller explicitly opted in with the force-upload flag.
    pub fn should_accept(&self, force_upload: bool) -> bool {
        !self.has_errors() && (force_upload || !self.has_warnings())
    }

    /// Assemble the final report.
    pub fn finish(self, accepted: bool) -> ImportReport {
        let join = |blocks: Vec<String>| {
            if blocks.is_empty() {
                None
            } else {
                Some(blocks.join("\n"))
            }
        };
        ImportReport {
            accepted,
            errors: join(self.error_blocks),
            warnings: join(self.warning_blocks),
            wrong_cells: self.wrong_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_accepts_and_reports_nothing() {
        let builder = ImportReportBuilder::new();
        assert!(builder.should_accept(false));

        let report = builder.finish(true);
        assert!(report.accepted);
        assert_eq!(report.errors, None);
        assert_eq!(report.warnings, None);
        assert!(report.wrong_cells.is_empty());
    }

    #[test]
    fn lines_are_prefixed_and_joined() {
        let mut builder = ImportReportBuilder::new();
        builder.record_line(1, &["Wrong email format".to_string()], &[]);
        builder.record_line(
            3,
            &[
                "Email is mandatory but missing".to_string(),
                "It should be an integer >= 0".to_string(),
            ],
            &["Phone number should be exactly 8 digits".to_string()],
        );

        let report = builder.finish(false);
        assert_eq!(
            report.errors.as_deref(),
            Some(
                "Line 1:\nWrong email format\n\
                 Line 3:\nEmail is mandatory but missing\nIt should be an integer >= 0"
            )
        );
        assert_eq!(
            report.warnings.as_deref(),
            Some("Line 3:\nPhone number should be exactly 8 digits")
        );
    }

    #[test]
    fn clean_lines_are_skipped() {
        let mut builder = ImportReportBuilder::new();
        builder.record_line(1, &[], &[]);
        assert!(!builder.has_errors());
        assert!(!builder.has_warnings());
    }

    #[test]
    fn errors_always_block_even_with_force() {
        let mut builder = ImportReportBuilder::new();
        builder.record_global(Severity::Error, "Email should be unique");
        assert!(!builder.should_accept(false));
        assert!(!builder.should_accept(true));
    }

    #[test]
    fn warnings_block_unless_forced() {
        let mut builder = ImportReportBuilder::new();
        builder.record_line(2, &[], &["a warning".to_string()]);
        assert!(!builder.should_accept(false));
        assert!(builder.should_accept(true));
    }

    #[test]
    fn cells_are_concatenated_in_order() {
        let mut builder = ImportReportBuilder::new();
        builder.push_cell(WrongCell {
            message: "first".to_string(),
            row_index: 0,
            col_index: 1,
        });
        builder.extend_cells(vec![WrongCell {
            message: "second".to_string(),
            row_index: 2,
            col_index: 3,
        }]);

        let report = builder.finish(false);
        assert_eq!(report.wrong_cells.len(), 2);
        assert_eq!(report.wrong_cells[0].message, "first");
        assert_eq!(report.wrong_cells[1].message, "second");
    }
}
