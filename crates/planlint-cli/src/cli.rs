//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .default_value("text")
        .value_parser(["text", "json"])
        .help("Output format")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_parser(value_parser!(PathBuf))
        .help("Write output to a file instead of stdout")
}

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Build the `planlint` command
#[must_use]
pub fn command() -> Command {
    Command::new("planlint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate structured procedures and check them for reproducibility completeness")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter when RUST_LOG is unset (e.g. debug, planlint_ir=trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Validate and analyze procedure IR documents")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Procedure IR JSON files"),
                )
                .arg(format_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("fail-incomplete")
                        .long("fail-incomplete")
                        .action(ArgAction::SetTrue)
                        .help("Exit with status 2 when any step is incomplete"),
                ),
        )
        .subcommand(
            Command::new("analyze-response")
                .about("Parse a raw extractor response, then validate and analyze it")
                .arg(file_arg("File holding the extractor response"))
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Run only the procedure IR gate")
                .arg(file_arg("Procedure IR JSON file"))
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("validate-plan")
                .about("Validate a microscopy experiment plan")
                .arg(file_arg("Experiment plan JSON file"))
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("actions")
                .about("List modelled action types and their parameters")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("report-schema").about("Print the JSON Schema of completeness reports"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn analyze_takes_many_files() {
        let matches = command()
            .try_get_matches_from(["planlint", "analyze", "a.json", "b.json", "--fail-incomplete"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let files: Vec<&PathBuf> = args.get_many::<PathBuf>("files").unwrap().collect();
        assert_eq!(files.len(), 2);
        assert!(args.get_flag("fail-incomplete"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = command()
            .try_get_matches_from(["planlint", "actions", "--log-json", "--log-level", "debug"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
        assert_eq!(
            matches.get_one::<String>("log-level").map(String::as_str),
            Some("debug")
        );
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(command()
            .try_get_matches_from(["planlint", "validate", "x.json", "--format", "yaml"])
            .is_err());
    }
}
