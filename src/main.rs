use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use scmls::cli::Cli;
use scmls::commands::list::ListingOutcome;
use scmls::output::{self, Verbosity};
use scmls::{ListingContext, commands, utils};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SCMLS_LOG";

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.quiet {
        output::set_verbosity(Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(Verbosity::Verbose);
    }

    if let Some(shell) = cli.completions {
        print_completions(shell, &mut Cli::command());
        return Ok(0);
    }

    let mut ctx = ListingContext::new()?;
    ctx.no_pager = cli.no_pager;

    if !cli.settings.is_empty() {
        commands::config::execute(&mut ctx, &cli.settings)?;
        return Ok(0);
    }

    colored::control::set_override(utils::color_capable());

    match commands::list::execute(&ctx, &cli)? {
        ListingOutcome::Completed | ListingOutcome::Interrupted => Ok(0),
        ListingOutcome::Failed(_) => Ok(1),
    }
}

/// Installs the stderr log subscriber; `-v` raises the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
