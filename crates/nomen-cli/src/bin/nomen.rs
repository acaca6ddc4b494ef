use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use nomen_cli::args::CliArgs;
use nomen_cli::{driver, reporter::Reporter};

/// Exit status codes. Errors surface through `main`'s `Result` with status 1.
const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 2;

fn main() -> Result<()> {
    // Initialize tracing if NOMEN_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports NOMEN_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    nomen::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let output = driver::run(&args, &cwd)?;
    let report = &output.report;

    if output.settings.json {
        let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        let pretty = output
            .settings
            .pretty
            .unwrap_or_else(|| std::io::stdout().is_terminal());
        let reporter = Reporter::new(pretty);
        println!("{}", reporter.render(report));
    }

    let status = if report.found {
        EXIT_SUCCESS
    } else {
        EXIT_NOT_FOUND
    };
    std::process::exit(status);
}
