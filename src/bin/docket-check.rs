use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use docket::config::{load_engine_config, read_document};
use docket::error::{Diagnostic, Problem};
use docket::lifecycle::{check_document, read_documents, startup_report};
use docket::{DocumentKind, SchemaRegistry};

#[derive(Parser)]
#[command(name = "docket-check")]
#[command(about = "Check courtroom server documents without starting a server", long_about = None)]
struct Cli {
    /// A document file, or a directory holding every document.
    path: PathBuf,

    /// Document kind of a single file (defaults to the file name).
    #[arg(short, long)]
    kind: Option<DocumentKind>,

    /// Engine configuration file for unknown-key overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

struct Report {
    errors: Vec<Diagnostic>,
    warnings: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_engine_config(cli.config.as_deref())?;
    let registry = SchemaRegistry::new().with_overrides(&config.documents.unknown_keys);

    let report = if cli.path.is_dir() {
        check_dir(&cli.path, registry)?
    } else {
        check_file(&cli.path, cli.kind, &registry)?
    };

    let valid = report.errors.is_empty();
    if cli.json {
        let out = json!({
            "path": cli.path.display().to_string(),
            "valid": valid,
            "errors": report.errors,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for warning in &report.warnings {
            println!("warning: {}", warning);
        }
        for error in &report.errors {
            println!("error: {}", error.message);
        }
        println!("{}: {}", cli.path.display(), if valid { "VALID" } else { "NOT VALID" });
    }

    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn check_dir(dir: &Path, registry: SchemaRegistry) -> Result<Report, Box<dyn std::error::Error>> {
    let booted = startup_report(read_documents(dir)?, registry);
    let errors = match booted.outcome {
        Ok(_) => Vec::new(),
        Err(e) => e.problems.iter().map(Problem::diagnostic).collect(),
    };
    Ok(Report {
        errors,
        warnings: booted.warnings.iter().map(ToString::to_string).collect(),
    })
}

fn check_file(
    path: &Path,
    kind: Option<DocumentKind>,
    registry: &SchemaRegistry,
) -> Result<Report, Box<dyn std::error::Error>> {
    let kind = match kind {
        Some(kind) => kind,
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or("cannot tell the document kind, pass --kind")?
            .parse::<DocumentKind>()?,
    };
    let checked = check_document(kind, &read_document(path)?, registry);
    Ok(Report {
        errors: checked.problems.iter().map(Problem::diagnostic).collect(),
        warnings: checked.warnings.iter().map(ToString::to_string).collect(),
    })
}
