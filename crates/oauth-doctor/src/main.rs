mod bootstrap_helpers;
mod console;
mod orchestrator;

use anyhow::{Context, Result};
use clap::Parser;
use oauth_doctor_cli::Cli;

use crate::bootstrap_helpers::{color_enabled, init_tracing, wait_for_interrupt};
use crate::console::{Console, ConsoleRole};
use crate::orchestrator::{run_diagnostics, DiagnosticSettings};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    if let Err(error) = cli.validate() {
        error.exit();
    }
    let color = color_enabled(cli.no_color, std::env::var_os("NO_COLOR").as_deref());
    let settings = DiagnosticSettings::from_cli(&cli);

    let run = tokio::task::spawn_blocking(move || {
        let mut console = Console::new(std::io::stdout(), color);
        run_diagnostics(&settings, &mut console).map(|_| ())
    });

    // The blocking worker cannot be cancelled, so both exits leave through
    // `process::exit` instead of waiting for the runtime to drain it.
    tokio::select! {
        joined = run => {
            let outcome = joined
                .context("diagnostic worker terminated unexpectedly")
                .and_then(|result| result);
            if let Err(error) = outcome {
                let console = Console::new(std::io::stderr(), color);
                eprintln!();
                let message = format!("❌ error: {error:#}");
                eprintln!("{}", console.paint(ConsoleRole::Error, &message));
                std::process::exit(1);
            }
            Ok(())
        }
        () = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            let mut console = Console::new(std::io::stderr(), color);
            let _ = console.blank();
            let _ = console.painted(ConsoleRole::Warning, "Stopped by user");
            let _ = console.flush();
            std::process::exit(0)
        }
    }
}
