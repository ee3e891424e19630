//! CLI argument definitions.

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "coffeecan")]
#[command(about = "Decide whether the last bean in the coffee can can be white")]
#[command(version, allow_negative_numbers = true)]
pub(crate) struct Cli {
    /// Initial number of black beans
    #[arg(value_name = "X")]
    pub(crate) x: i64,

    /// Initial number of white beans
    #[arg(value_name = "Y")]
    pub(crate) y: i64,

    /// Exact number of steps to check (default: X + Y - 1)
    #[arg(long)]
    pub(crate) bound: Option<i64>,

    /// Solver backend: z3 | cvc5
    #[arg(long, default_value = "z3")]
    pub(crate) solver: String,

    /// Solver timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 300)]
    pub(crate) timeout: u64,

    /// Prefix for proposition names
    #[arg(long, default_value = "cc")]
    pub(crate) namespace: String,

    /// Emit transitions for every configuration in the domain, not only reachable ones
    #[arg(long)]
    pub(crate) exhaustive: bool,

    /// Write the SMT-LIB2 query to this file before solving
    #[arg(long)]
    pub(crate) dump_smt: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
