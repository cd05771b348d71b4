//! Report rendering
//!
//! Projections of a [`CompletenessReport`] for people and machines. No
//! function here changes or re-derives analysis results.

use crate::finding::CompletenessFinding;
use crate::report::CompletenessReport;
use planlint_schema::SchemaIssue;
use schemars::schema::RootSchema;
use serde_json::Value;
use std::fmt;

/// Options for [`render_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    /// Maximum entries in the attention list
    pub attention_limit: usize,
    /// Maximum characters of step text shown per entry
    pub text_width: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            attention_limit: 5,
            text_width: 100,
        }
    }
}

impl TextOptions {
    /// With attention list limit
    #[inline]
    #[must_use]
    pub fn with_attention_limit(mut self, limit: usize) -> Self {
        self.attention_limit = limit;
        self
    }

    /// With step text width
    #[inline]
    #[must_use]
    pub fn with_text_width(mut self, width: usize) -> Self {
        self.text_width = width;
        self
    }
}

/// Report as a JSON value
///
/// # Errors
/// Returns error if serialization fails
pub fn render_json(report: &CompletenessReport) -> Result<Value, serde_json::Error> {
    serde_json::to_value(report)
}

/// Report as a JSON string
///
/// # Errors
/// Returns error if serialization fails
pub fn render_json_string(
    report: &CompletenessReport,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// JSON Schema describing exported reports
#[must_use]
pub fn report_schema() -> RootSchema {
    schemars::schema_for!(CompletenessReport)
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn truncate(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width).collect();
        out.push_str("...");
        out
    }
}

fn missing_cell(finding: &CompletenessFinding) -> String {
    if finding.unrecognized_action {
        "unrecognized action, not assessed".to_string()
    } else if finding.is_complete {
        "complete".to_string()
    } else {
        finding
            .missing_required
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Human-readable report
///
/// Summary first, then one row per step, then the incomplete steps with the
/// most missing required parameters.
#[must_use]
pub fn render_text(report: &CompletenessReport, options: &TextOptions) -> String {
    TextReport { report, options }.to_string()
}

/// Numbered list of rejection issues with dotted paths
#[must_use]
pub fn render_issues_text(issues: &[SchemaIssue]) -> String {
    IssueList(issues).to_string()
}

struct TextReport<'a> {
    report: &'a CompletenessReport,
    options: &'a TextOptions,
}

impl TextReport<'_> {
    fn summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "Procedure Analysis Summary")?;
        if let Some(citation) = &report.citation {
            writeln!(f, "  Citation:           {citation}")?;
        }
        writeln!(f, "  Total steps:        {}", report.total_steps)?;
        writeln!(f, "  Complete:           {}", report.complete_steps)?;
        writeln!(f, "  Incomplete:         {}", report.incomplete_steps)?;
        writeln!(f, "  Missing parameters: {}", report.total_missing_required)?;
        if report.unrecognized_steps > 0 {
            writeln!(f, "  Unrecognized:       {}", report.unrecognized_steps)?;
        }
        writeln!(f, "  Completeness:       {}", percent(report.overall_score))?;
        writeln!(f, "  Requirements:       v{}", report.requirements_version)
    }

    fn step_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let findings = &self.report.findings;
        let id_width = findings
            .iter()
            .map(|finding| finding.step_id.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);
        let action_width = findings
            .iter()
            .map(|finding| finding.action.chars().count())
            .max()
            .unwrap_or(0)
            .max(6);

        writeln!(f)?;
        writeln!(f, "Step-by-Step Analysis")?;
        writeln!(
            f,
            "  {:<id_width$}  {:<action_width$}  {:>8}  MISSING",
            "STEP", "ACTION", "COVERAGE"
        )?;
        for finding in findings {
            writeln!(
                f,
                "  {:<id_width$}  {:<action_width$}  {:>8}  {}",
                finding.step_id,
                finding.action,
                percent(finding.coverage),
                missing_cell(finding)
            )?;
        }
        Ok(())
    }

    fn attention(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attention = self.report.needing_attention(self.options.attention_limit);
        if attention.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Steps Needing Attention")?;
        for finding in attention {
            writeln!(f, "  {} ({})", finding.step_id, finding.action)?;
            if !finding.text.trim().is_empty() {
                writeln!(
                    f,
                    "    Text: {}",
                    truncate(&finding.text, self.options.text_width)
                )?;
            }
            writeln!(f, "    Missing:")?;
            for name in &finding.missing_required {
                writeln!(f, "      - {name}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary(f)?;
        if self.report.no_content {
            writeln!(f)?;
            return writeln!(f, "No content to assess: the procedure has no steps.");
        }
        self.step_table(f)?;
        self.attention(f)
    }
}

struct IssueList<'a>(&'a [SchemaIssue]);

impl fmt::Display for IssueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, issue) in self.0.iter().enumerate() {
            writeln!(f, "  {}. {}", n + 1, issue)?;
        }
        Ok(())
    }
}
