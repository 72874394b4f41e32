//! md2ts CLI - markdown documentation compiler.
//!
//! Compiles every `**/README.md` under a source directory into a
//! mirrored tree of TypeScript page modules, copying referenced internal
//! images alongside. A missing source directory is a warning, not an
//! error; accumulated document errors are printed grouped by file and
//! fail the run with exit code 1.

mod output;

use std::path::Path;

use clap::Parser;
use md2ts_core::{CompileOptions, CompileReport, Compiler, RoutePolicy};
use tracing_subscriber::EnvFilter;

use output::Output;

/// Compile markdown documentation into viewer page modules.
#[derive(Parser)]
#[command(name = "md2ts", version, about)]
struct Cli {
    /// The path to directory with Markdown
    #[arg(value_parser = trim_trailing_slash)]
    src: String,

    /// The path to directory where generated code should be stored
    #[arg(value_parser = trim_trailing_slash)]
    dest: String,

    /// Report conflicting route registrations instead of silently
    /// keeping the last one
    #[arg(long)]
    strict_routes: bool,
}

fn trim_trailing_slash(value: &str) -> Result<String, std::convert::Infallible> {
    Ok(value.trim_end_matches('/').to_owned())
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let src = Path::new(&cli.src);
    if !src.is_dir() {
        output.warning(&format!(
            r#"The "{}" source directory does not exist. Skipping."#,
            cli.src
        ));
        return;
    }

    let options = CompileOptions {
        route_policy: if cli.strict_routes {
            RoutePolicy::Strict
        } else {
            RoutePolicy::Lenient
        },
    };

    match Compiler::new(options).compile(src, Path::new(&cli.dest)) {
        Ok(report) if report.is_success() => {
            output.success(&format!("Processed {} files.", report.processed));
        }
        Ok(report) => {
            print_errors(&output, &report);
            std::process::exit(1);
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}

/// Print every accumulated error, grouped by source file.
fn print_errors(output: &Output, report: &CompileReport) {
    for file in &report.errors {
        let resolved = file
            .source
            .canonicalize()
            .unwrap_or_else(|_| file.source.clone());
        output.error(&resolved.display().to_string());

        for message in &file.messages {
            output.error(&format!("  - {message}"));
        }

        output.info("");
    }
}
