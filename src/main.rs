mod cli;

use std::process::ExitCode;

use chomsky::generator::{self, GenerateError};
use chomsky::grammar::canonical_sort;
use chomsky::{logging, parser, Grammar};
use clap::Parser;
use cli::{Cli, Command};
use tracing::info;

// Attempts per sentence before giving up on a grammar that keeps
// exceeding the depth bound
const GENERATE_ATTEMPTS: usize = 100;

fn check(grammar: &Grammar, inputs: &[String]) -> ExitCode {
    let mut all_accepted = true;
    for input in inputs {
        match grammar.evaluate(input) {
            Some(path) => println!("{:?}: accepted\n  {}", input, path.replay()),
            None => {
                all_accepted = false;
                println!("{:?}: rejected", input);
            }
        }
    }
    if all_accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn generate(grammar: &Grammar, amount: u32) -> ExitCode {
    let mut rng = rand::thread_rng();
    for _ in 0..amount {
        let mut last = None;
        for _ in 0..GENERATE_ATTEMPTS {
            match generator::generate(grammar, &mut rng) {
                Ok(sentence) => {
                    last = Some(Ok(sentence));
                    break;
                }
                Err(e @ GenerateError::DepthExceeded(_)) => last = Some(Err(e)),
                Err(e) => {
                    last = Some(Err(e));
                    break;
                }
            }
        }
        match last {
            Some(Ok(sentence)) => println!("{}", sentence),
            Some(Err(e)) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
            None => return ExitCode::FAILURE,
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_tracing(&cli.log_level) {
        eprintln!("Could not set up logging: {}", e);
    }

    let mut grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(depth) = cli.depth {
        grammar.set_max_depth(depth);
    }
    info!(file = %cli.file.display(), %grammar, "loaded grammar");

    match cli.command {
        Command::Cnf => {
            let mut rules = grammar.normalize();
            canonical_sort(&mut rules);
            for rule in rules {
                println!("{}", rule);
            }
            ExitCode::SUCCESS
        }
        Command::Check { inputs } => check(&grammar, &inputs),
        Command::Generate { amount } => generate(&grammar, amount.unwrap_or(1)),
    }
}
