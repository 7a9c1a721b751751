use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Maximum derivation depth (default: 10)
    #[arg(short, long, value_name = "DEPTH")]
    pub depth: Option<usize>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the grammar in Chomsky normal form
    Cnf,

    /// Test whether each input belongs to the language
    Check {
        /// Strings to test
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Generate random sentences
    Generate {
        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<u32>,
    },
}
