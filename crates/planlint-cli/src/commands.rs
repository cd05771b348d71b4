//! Subcommand execution
//!
//! Commands write their output to the given writer and report an
//! [`Outcome`]; the binary maps it to an exit status.

use anyhow::{Context, Result};
use clap::ArgMatches;
use planlint_analysis::{
    render_issues_text, render_json_string, render_text, report_schema, CompletenessReport,
};
use planlint_core::{Planlint, PlanlintConfig, PlanlintError};
use planlint_requirements::ActionRequirementSpec;
use planlint_schema::SchemaIssue;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Result of a command, as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything passed
    Success,
    /// At least one input was rejected or invalid
    Rejected,
    /// Inputs were valid but some steps are incomplete
    Incomplete,
}

impl Outcome {
    /// Process exit status
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Rejected => ExitCode::from(1),
            Self::Incomplete => ExitCode::from(2),
        }
    }
}

/// Load configuration and apply command-line overrides
///
/// # Errors
/// Returns error if the configuration file cannot be loaded
pub fn load_config(matches: &ArgMatches) -> Result<PlanlintConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PlanlintConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlanlintConfig::default(),
    };
    if let Some(level) = matches.get_one::<String>("log-level") {
        config = config.with_log_level(level.clone());
    }
    if matches.get_flag("log-json") {
        config = config.with_log_json(true);
    }
    Ok(config)
}

/// Run the selected subcommand
///
/// # Errors
/// Returns error on setup failures (configuration, unreadable files,
/// output that cannot be written). Rejected inputs are an [`Outcome`], not
/// an error.
pub fn run(matches: &ArgMatches, config: PlanlintConfig, out: &mut dyn Write) -> Result<Outcome> {
    let Some((name, args)) = matches.subcommand() else {
        anyhow::bail!("no subcommand given");
    };

    if name == "report-schema" {
        let schema = serde_json::to_string_pretty(&report_schema())?;
        writeln!(out, "{schema}")?;
        return Ok(Outcome::Success);
    }

    let planlint = Planlint::new(config).context("initializing planlint")?;
    match name {
        "analyze" => analyze(&planlint, args, out),
        "analyze-response" => analyze_response(&planlint, args, out),
        "validate" => validate(&planlint, args, out),
        "validate-plan" => validate_plan(&planlint, args, out),
        "actions" => actions(&planlint, args.get_flag("json"), out),
        other => anyhow::bail!("unknown subcommand '{other}'"),
    }
}

fn wants_json(args: &ArgMatches) -> bool {
    args.get_one::<String>("format").map(String::as_str) == Some("json")
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn emit(args: &ArgMatches, out: &mut dyn Write, content: &str) -> Result<()> {
    match args.try_get_one::<PathBuf>("output").ok().flatten() {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => out.write_all(content.as_bytes())?,
    }
    Ok(())
}

/// Per-file entry of `analyze` JSON output
#[derive(Debug, Serialize)]
struct FileResult {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<CompletenessReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<SchemaIssue>>,
}

fn parse_issue(e: &serde_json::Error) -> SchemaIssue {
    SchemaIssue::new("", format!("not valid JSON: {e}")).with_keyword("parse")
}

fn analyze(planlint: &Planlint, args: &ArgMatches, out: &mut dyn Write) -> Result<Outcome> {
    let files: Vec<&PathBuf> = args.get_many::<PathBuf>("files").into_iter().flatten().collect();

    let mut parsed = Vec::with_capacity(files.len());
    for path in &files {
        parsed.push(serde_json::from_str::<Value>(&read_text(path)?));
    }

    let documents: Vec<Value> = parsed
        .iter()
        .filter_map(|p| p.as_ref().ok().cloned())
        .collect();
    let mut checked = planlint.check_many(&documents).into_iter();

    let results: Vec<FileResult> = files
        .iter()
        .zip(&parsed)
        .map(|(path, parsed)| {
            let file = path.display().to_string();
            match parsed {
                Err(e) => FileResult {
                    file,
                    report: None,
                    errors: Some(vec![parse_issue(e)]),
                },
                Ok(_) => match checked.next() {
                    Some(Ok(report)) => FileResult {
                        file,
                        report: Some(report),
                        errors: None,
                    },
                    Some(Err(rejection)) => FileResult {
                        file,
                        report: None,
                        errors: Some(rejection.issues()),
                    },
                    None => FileResult {
                        file,
                        report: None,
                        errors: Some(vec![SchemaIssue::new("", "document was not checked")]),
                    },
                },
            }
        })
        .collect();

    let rejected = results.iter().filter(|r| r.errors.is_some()).count();
    let incomplete = results
        .iter()
        .filter_map(|r| r.report.as_ref())
        .any(|r| !r.is_fully_complete());
    tracing::info!(files = results.len(), rejected, "analysis finished");

    let content = if wants_json(args) {
        let mut json = if let [single] = results.as_slice() {
            serde_json::to_string_pretty(single)?
        } else {
            serde_json::to_string_pretty(&results)?
        };
        json.push('\n');
        json
    } else {
        let options = planlint.text_options();
        let mut text = String::new();
        for result in &results {
            if results.len() > 1 {
                writeln!(text, "== {} ==", result.file)?;
            }
            if let Some(report) = &result.report {
                text.push_str(&render_text(report, &options));
            }
            if let Some(errors) = &result.errors {
                writeln!(text, "Rejected with {} issue(s):", errors.len())?;
                text.push_str(&render_issues_text(errors));
            }
            if results.len() > 1 {
                text.push('\n');
            }
        }
        text
    };
    emit(args, out, &content)?;

    Ok(if rejected > 0 {
        Outcome::Rejected
    } else if incomplete && args.get_flag("fail-incomplete") {
        Outcome::Incomplete
    } else {
        Outcome::Success
    })
}

fn analyze_response(planlint: &Planlint, args: &ArgMatches, out: &mut dyn Write) -> Result<Outcome> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing response file")?;
    let response = read_text(path)?;

    match planlint.check_response(&response) {
        Ok(report) => {
            let content = if wants_json(args) {
                format!("{}\n", render_json_string(&report, true)?)
            } else {
                render_text(&report, &planlint.text_options())
            };
            emit(args, out, &content)?;
            Ok(Outcome::Success)
        }
        Err(e) if e.is_rejection() => {
            let issues = match &e {
                PlanlintError::Validation(v) => v.issues(),
                other => vec![SchemaIssue::new("", other.to_string()).with_keyword("extraction")],
            };
            let content = if wants_json(args) {
                format!("{}\n", serde_json::to_string_pretty(&issues)?)
            } else {
                format!(
                    "Rejected with {} issue(s):\n{}",
                    issues.len(),
                    render_issues_text(&issues)
                )
            };
            emit(args, out, &content)?;
            Ok(Outcome::Rejected)
        }
        Err(e) => Err(e).context("analyzing response"),
    }
}

fn validate(planlint: &Planlint, args: &ArgMatches, out: &mut dyn Write) -> Result<Outcome> {
    let path = args.get_one::<PathBuf>("file").context("missing file")?;
    let issues = match serde_json::from_str::<Value>(&read_text(path)?) {
        Err(e) => vec![parse_issue(&e)],
        Ok(document) => match planlint.validate(&document) {
            Ok(procedure) => {
                if wants_json(args) {
                    let summary = serde_json::json!({
                        "valid": true,
                        "steps": procedure.len(),
                        "procedure_digest": procedure.digest(),
                    });
                    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
                } else {
                    writeln!(
                        out,
                        "{}: valid procedure with {} step(s)",
                        path.display(),
                        procedure.len()
                    )?;
                }
                return Ok(Outcome::Success);
            }
            Err(rejection) => rejection.issues(),
        },
    };

    if wants_json(args) {
        let summary = serde_json::json!({"valid": false, "errors": issues});
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "{}: rejected with {} issue(s)", path.display(), issues.len())?;
        write!(out, "{}", render_issues_text(&issues))?;
    }
    Ok(Outcome::Rejected)
}

fn validate_plan(planlint: &Planlint, args: &ArgMatches, out: &mut dyn Write) -> Result<Outcome> {
    let path = args.get_one::<PathBuf>("file").context("missing file")?;
    let plan: Value = serde_json::from_str(&read_text(path)?)
        .with_context(|| format!("parsing {}", path.display()))?;
    let validation = planlint.validate_plan(&plan);

    if wants_json(args) {
        writeln!(out, "{}", serde_json::to_string_pretty(&validation)?)?;
    } else if validation.valid {
        writeln!(
            out,
            "{}: valid experiment plan ({})",
            path.display(),
            validation.schema_version
        )?;
    } else {
        writeln!(
            out,
            "{}: invalid experiment plan ({}) with {} issue(s)",
            path.display(),
            validation.schema_version,
            validation.errors.len()
        )?;
        write!(out, "{}", render_issues_text(&validation.errors))?;
    }

    Ok(if validation.valid {
        Outcome::Success
    } else {
        Outcome::Rejected
    })
}

#[derive(Serialize)]
struct ActionListing<'a> {
    version: &'a str,
    actions: Vec<&'a ActionRequirementSpec>,
}

fn actions(planlint: &Planlint, json: bool, out: &mut dyn Write) -> Result<Outcome> {
    let table = planlint.table();
    if json {
        let listing = ActionListing {
            version: table.version(),
            actions: table.specs().collect(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        return Ok(Outcome::Success);
    }

    writeln!(out, "Requirements table v{} ({} action types)", table.version(), table.len())?;
    for spec in table.specs() {
        writeln!(out)?;
        if spec.description().is_empty() {
            writeln!(out, "{}", spec.action())?;
        } else {
            writeln!(out, "{}: {}", spec.action(), spec.description())?;
        }
        let join = |names: &std::collections::BTreeSet<String>| {
            names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        };
        writeln!(out, "  required:    {}", join(spec.required()))?;
        if !spec.recommended().is_empty() {
            writeln!(out, "  recommended: {}", join(spec.recommended()))?;
        }
    }
    Ok(Outcome::Success)
}
