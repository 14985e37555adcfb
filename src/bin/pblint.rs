//! pblint: report naming-convention problems in proto3 files.
//!
//! Usage: pblint [OPTIONS] <FILES>...

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pb::lint::{Linter, Problem};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// `path:position text`
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pblint", about = "Lint proto3 schema files")]
struct Cli {
    /// Files to lint
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only report problems at or above this confidence
    #[arg(long, default_value_t = 0.8)]
    min_confidence: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a str,
    #[serde(flatten)]
    problem: &'a Problem,
}

fn print_problems(path: &str, problems: &[Problem], format: Format) {
    for problem in problems {
        match format {
            Format::Text => println!("{}:{} {}", path, problem.position, problem.text),
            Format::Json => match serde_json::to_string(&Report { path, problem }) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("{}: failed to encode problem: {}", path, e),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let linter = Linter::new().min_confidence(cli.min_confidence);
    let mut failed = false;

    for file in &cli.files {
        let path = file.display().to_string();
        let src = match std::fs::read(file) {
            Ok(src) => src,
            Err(e) => {
                log::error!("{}: {}", path, e);
                failed = true;
                continue;
            }
        };
        match linter.lint(&path, &src) {
            Ok(problems) => {
                log::info!("{}: {} problems", path, problems.len());
                print_problems(&path, &problems, cli.format);
            }
            Err(e) => {
                log::error!("{}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
