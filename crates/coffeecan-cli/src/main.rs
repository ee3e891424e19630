#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use miette::miette;
use tracing_subscriber::EnvFilter;

use coffeecan_engine::pipeline::{decide_with_options, PipelineOptions, SolverChoice};
use coffeecan_smt::encoder::SweepStrategy;

use crate::cli::{Cli, OutputFormat};

fn options_from_cli(cli: &Cli) -> miette::Result<PipelineOptions> {
    let solver: SolverChoice = cli.solver.parse().map_err(|e| miette!("{e}"))?;
    Ok(PipelineOptions {
        solver,
        bound: cli.bound,
        timeout_secs: cli.timeout,
        namespace: cli.namespace.clone(),
        sweep: if cli.exhaustive {
            SweepStrategy::Exhaustive
        } else {
            SweepStrategy::Reachable
        },
        dump_smt: cli.dump_smt.clone(),
    })
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = options_from_cli(&cli)?;
    let result = decide_with_options(cli.x, cli.y, &options).map_err(|e| miette!("{e}"))?;

    match cli.format {
        OutputFormat::Text => print!("{result}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result.to_json())
                .map_err(|e| miette!("could not render JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("coffeecan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_map_to_pipeline_defaults() {
        let options = options_from_cli(&parse(&["10", "11"])).unwrap();
        let defaults = PipelineOptions::default();
        assert_eq!(options.solver, defaults.solver);
        assert_eq!(options.bound, None);
        assert_eq!(options.timeout_secs, defaults.timeout_secs);
        assert_eq!(options.namespace, defaults.namespace);
        assert_eq!(options.sweep, SweepStrategy::Reachable);
    }

    #[test]
    fn flags_are_forwarded() {
        let cli = parse(&[
            "3", "1", "--bound", "7", "--solver", "cvc5", "--exhaustive", "--format", "json",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        let options = options_from_cli(&cli).unwrap();
        assert_eq!(options.solver, SolverChoice::Cvc5);
        assert_eq!(options.bound, Some(7));
        assert_eq!(options.sweep, SweepStrategy::Exhaustive);
    }

    #[test]
    fn negative_counts_reach_the_pipeline() {
        let cli = parse(&["-1", "2"]);
        assert_eq!(cli.x, -1);
    }

    #[test]
    fn unknown_solver_is_an_error() {
        assert!(options_from_cli(&parse(&["1", "1", "--solver", "yices"])).is_err());
    }
}
