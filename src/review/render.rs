//! Delimited text rendering of a report.
//!
//! Fields are written as-is: a `;` or line break inside a name or topic is not
//! escaped and will shift the columns of that line.

use crate::review::report::ReportRow;

pub const FIELD_SEPARATOR: &str = ";";

pub const CLIENTS_HEADER: &[&str] = &["Client name", "Client username", "Topic subscription"];
pub const QUEUES_HEADER: &[&str] = &["Queue name", "Owner", "Non-owner permission", "Topic subscription"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub header: &'static [&'static str],
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(header: &'static [&'static str], rows: Vec<ReportRow>) -> Self {
        Self { header, rows }
    }

    /// Number of identifying columns before the topic column.
    pub fn identity_width(&self) -> usize {
        self.header.len().saturating_sub(1)
    }

    /// Header line, then one line per row, each terminated by `\n`.
    /// Continuation rows leave the identifying columns empty.
    pub fn render(&self) -> String {
        let blank = vec![""; self.identity_width()].join(FIELD_SEPARATOR);

        let mut out = self.header.join(FIELD_SEPARATOR);
        out.push('\n');

        for row in &self.rows {
            match &row.identity {
                Some(fields) => out.push_str(&fields.join(FIELD_SEPARATOR)),
                None => out.push_str(&blank),
            }
            out.push_str(FIELD_SEPARATOR);
            out.push_str(&row.topic);
            out.push('\n');
        }
        out
    }
}

// ==========================================
// TESTS
// ==========================================
