mod cli;
mod logging;
mod reporter;

use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::*;
use dotenv::dotenv;
use reconcile_lists::config::load_configuration;
use reconcile_lists::{PlannerOptions, ReconcileEngine};
use reporter::ConsoleReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            process::exit(cli::exit_code(&err));
        }
    };

    let _guard = logging::init_logger();

    if let Err(err) = run(&args) {
        error!("{:#}", err);
        eprintln!("{}", Cli::command().render_usage());
        process::exit(1);
    }
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config =
        load_configuration(args.config.as_deref()).context("Error loading configuration")?;

    let mut engine = ReconcileEngine::new(config).with_options(PlannerOptions {
        name_report: args.by_name,
        ..PlannerOptions::default()
    });
    if let Some(dir) = &args.output_dir {
        engine = engine.with_output_dir(dir);
    }

    let reporter = ConsoleReporter::new();
    let result = engine.run(&args.source, &args.dest, &reporter)?;

    info!(
        "Load: {}, Plan: {}",
        format!("{:.2}s", result.load_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.plan_duration.as_secs_f64()).green(),
    );
    info!(
        "{} source files, {} dest files, {} copies to confirm, {} larger files kept",
        result.source_records,
        result.dest_records,
        format!("{}", result.plan.copy_count()).red(),
        format!("{}", result.plan.skip_count()).yellow(),
    );

    match &result.script_path {
        Some(path) => println!("\naction commands: {}", path.display()),
        None => info!("No actions necessary, no script written"),
    }

    Ok(())
}
