use anyhow::Context;
use clap::Parser;
use slsbench_cli::commands;
use slsbench_cli::{logging, Cli, Command, TerminalSelector};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let settings = cli.settings(&cwd)?;
    logging::init(&settings.log_level, settings.log_json)?;

    match &cli.command {
        Command::Enrich { spec, .. } => {
            let output = commands::enrich(spec, &settings, TerminalSelector::new())?;
            println!("{}", output.display());
        }
        Command::Scenario { spec, .. } => {
            let output = commands::scenario(spec, &settings, TerminalSelector::new(), |graph| {
                eprintln!("{graph}");
            })?;
            println!("{}", output.display());
        }
        Command::Order { scenario } => match commands::order(scenario)? {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Err(report) => {
                eprintln!("{}", report.error);
                for group in &report.groups {
                    eprintln!("  cycle: {}", group.join(", "));
                }
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}
