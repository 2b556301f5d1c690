//! Plain-text rendering of inspection and cleanup results.

use crate::classify::{Classification, ClassificationResult};
use crate::remediate::{DeletionOutcome, DeletionStatus};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Bordered text table with columns sized to their widest cell.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(cell.width()),
                    None => widths.push(cell.width()),
                }
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();

        let separator = widths.iter().fold(String::from("+"), |mut acc, w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });

        let line = |cells: &[String]| {
            let mut out = String::from("|");
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                out.push(' ');
                out.push_str(cell);
                out.push_str(&" ".repeat(w - cell.width() + 1));
                out.push('|');
            }
            out
        };

        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&line(&self.headers));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        if !self.rows.is_empty() {
            out.push_str(&separator);
            out.push('\n');
        }
        out
    }
}

/// Renders the version table shown by `inspect` and `clean`.
///
/// The source bundle column is only filled for disposable versions, since
/// those are the artifacts a `clean` run may remove.
pub fn render_inspection(application: &str, result: &ClassificationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Application Name: {application}");
    let _ = writeln!(out, "Total versions: {}", result.versions.len());

    let mut table = Table::new([
        "Version Label",
        "Date Created",
        "Environment",
        "Source Bundle",
    ]);
    for entry in &result.versions {
        let (environment, source_bundle) = match entry.classification {
            Classification::InUse => (entry.environments.join(", "), String::new()),
            Classification::Disposable => (
                "*Disposable*".to_string(),
                entry
                    .version
                    .source_bundle
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            Classification::TooYoung => ("Not disposable".to_string(), String::new()),
        };

        table.add_row([
            entry.version.label.clone(),
            entry.version.created_at.format(DATE_FORMAT).to_string(),
            environment,
            source_bundle,
        ]);
    }

    out.push_str(&table.render());
    let _ = writeln!(out, "Disposable version count: {}", result.disposable_count());
    out
}

/// One line per attempted deletion.
pub fn render_outcomes(outcomes: &[DeletionOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        match &outcome.status {
            DeletionStatus::Deleted => {
                let _ = writeln!(out, "Deleting version {} .......... OK", outcome.label);
            }
            DeletionStatus::Failed { reason } => {
                let _ = writeln!(
                    out,
                    "Deleting version {} .......... Error: {}",
                    outcome.label, reason
                );
            }
        }
    }
    out
}
