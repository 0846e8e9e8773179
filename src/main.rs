// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging and hand off to
//   `app::execute`, which picks the command and reports how it ended.
// - Every path that does not print a success message exits with status 1.

use clap::Parser;
use pinata_cli::app;
use pinata_cli::cli::Cli;
use pinata_cli::ui::{self, TermPrompter};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "pinata_cli=warn",
        1 => "pinata_cli=info",
        _ => "pinata_cli=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.quiet {
        println!("{}", ui::BANNER);
    }

    let report = app::execute(&cli, TermPrompter);
    report.print();
    ExitCode::from(report.exit_code())
}
