//! Command-line interface for mcheck.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **check**: Run all consistency checks on the files described by a facts file
//! - **rules**: Show the attribute count rules in effect
//!
//! ## Usage
//!
//! ```text
//! # Check files described by a facts file
//! mcheck check facts.json
//!
//! # Use a custom rule table and require a GRCh38 reference
//! mcheck check facts.json --rules counts.txt --reference GRCh38
//!
//! # Also read headers and checksum the files locally
//! mcheck check facts.json --local-files
//!
//! # JSON output for scripting
//! mcheck --format json check facts.json
//! ```

use clap::{Parser, Subcommand};

pub mod check;
pub mod rules;

#[derive(Parser)]
#[command(name = "mcheck")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Cross-check sequencing file metadata between catalogue, header and registry")]
#[command(
    long_about = "mcheck compares what three independent sources say about the same sequencing file:\n- the storage catalogue's attributes\n- the file's own header\n- the sample registry\n\nIt reports missing or duplicated registry ids, disagreeing identifiers, wrong attribute counts and invalid attribute values."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the files described by a facts file
    Check(check::CheckArgs),

    /// Show the attribute count rules
    Rules(rules::RulesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
