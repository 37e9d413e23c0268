use std::{fs, path::Path};

use colored::Colorize;

use crate::{
    config::{Config, ConfigError, ParseOptions},
    errors::{FileOperation, IoError},
    materialize::{self, Report, Status},
    parser, preview,
    tree::{Directory, NodeKind},
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum UekiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}

/// Reads `input` and parses it into a tree.
///
/// # Errors
///
/// Returns a [`UekiError`] if the input file cannot be read. Malformed lines are
/// skipped rather than reported.
pub fn read_tree(input: &Path, options: &ParseOptions) -> Result<Option<Directory>, UekiError> {
    let raw = fs::read_to_string(input)
        .map_err(|error| IoError::new(FileOperation::Read, input.to_path_buf(), error))?;

    Ok(parser::parse(&raw, options))
}

/// Parses `input` and either dumps the tree or builds it under the configured
/// output directory, depending on [`Config::dump_only`].
///
/// Returns the [`Report`] of the build, or `None` when nothing was written.
///
/// # Errors
///
/// Returns a [`UekiError`] if the input file cannot be read. Failures on
/// individual nodes are part of the report, not an error.
pub fn run(input: &Path, config: &Config) -> Result<Option<Report>, UekiError> {
    log::debug!("reading tree from: {}", input.display());

    let Some(root) = read_tree(input, &config.parse_options())? else {
        log::warn!("no tree found in: {}", input.display());
        return Ok(None);
    };

    if config.dump_only {
        print!("{}", preview::render_tree(&root));
        return Ok(None);
    }

    if config.debug {
        preview::preview_as_tree(&root);
    }

    let report = materialize::materialize(
        &root,
        &config.output_directory,
        config.conflict_policy(),
    );

    print_report(&report, config.quiet);

    if report.has_failures() {
        log::warn!(
            "{} of {} entries could not be created under: {}",
            report.failed(),
            report.outcomes().len(),
            config.output_directory.display()
        );
    }

    Ok(Some(report))
}

/// Prints one line per node. Created and skipped nodes go to stdout unless
/// `quiet`; failures always go to stderr, followed by a hint.
pub fn print_report(report: &Report, quiet: bool) {
    for outcome in report.outcomes() {
        let path = match outcome.kind {
            NodeKind::Directory => format!("{}/", outcome.path.display()),
            NodeKind::File => outcome.path.display().to_string(),
        };

        match &outcome.status {
            Status::Created { with_content } if !quiet => {
                if *with_content {
                    println!("{} {} {}", "create".green(), path, "(with content)".dimmed());
                } else {
                    println!("{} {}", "create".green(), path);
                }
            }
            Status::SkippedExisting if !quiet => {
                println!("{} {}", "exists".yellow(), path);
            }
            Status::Failed(error) => {
                eprintln!("{} {}: {}", "error".red(), path, error.reason());
                eprintln!("  {} {}", "help:".cyan(), error.hint);
            }
            _ => {}
        }
    }

    if !quiet {
        println!(
            "{} created, {} skipped, {} failed",
            report.created(),
            report.skipped(),
            report.failed()
        );
    }
}
