//! netcount: capture on one interface for a fixed time and print how many
//! packets carried each protocol layer

use netcount_cli::{run, Cli, SessionConfig};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let result =
        SessionConfig::from_cli(&cli).and_then(|config| run(&config, &mut std::io::stdout().lock()));

    match result {
        Ok(report) => {
            debug!(
                "{} frames from {} ({})",
                report.summary.frames, report.interface.name, report.summary.reason
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout carries only the report
fn init_tracing(cli: &Cli) {
    let level = cli.log_level();
    let filter = EnvFilter::new(format!(
        "warn,netcount={0},netcount_cli={0},netcount_capture={0},netcount_packet={0},netcount_core={0}",
        level
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
