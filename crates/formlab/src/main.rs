//! `formlab` -- beverage formulation workbench CLI.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Log filter under `--verbose`; covers every `formlab*` crate.
const VERBOSE_FILTER: &str = "formlab=debug";

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(0);
    });

    let cli = Cli::parse();
    let ctx = RuntimeContext::from_global_args(&cli.global);

    // Logs go to stderr so stdout stays clean for tables, CSV and JSON.
    let filter = if ctx.verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Version) => commands::version::run(&ctx),
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        // Formulations
        Some(Commands::Check(args)) => commands::check::run(&ctx, &args),
        Some(Commands::Show(args)) => commands::show::run(&ctx, &args),
        Some(Commands::Normalize(args)) => commands::normalize::run(&ctx, &args),
        Some(Commands::Compare(args)) => commands::compare::run(&ctx, &args),
        Some(Commands::Cost(args)) => commands::cost::run(&ctx, &args),
        Some(Commands::Save(args)) => commands::save::run(&ctx, &args),
        Some(Commands::Saved(args)) => commands::saved::run(&ctx, &args),
        // Reference data
        Some(Commands::Price(args)) => commands::price::run(&ctx, &args),
        Some(Commands::Standard(args)) => commands::standard::run(&ctx, &args),
        Some(Commands::Sample(args)) => commands::sample::run(&ctx, &args),
        Some(Commands::Process(args)) => commands::process::run(&ctx, &args),
        Some(Commands::Label(args)) => commands::label::run(&ctx, &args),
        Some(Commands::Sales(args)) => commands::sales::run(&ctx, &args),
        Some(Commands::Card(args)) => commands::card::run(&ctx, &args),
        // Assistant
        Some(Commands::Analyze(args)) => commands::analyze::run(&ctx, &args),
        Some(Commands::Docs(args)) => commands::docs::run(&ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, &args),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
