/*
    This module generates random sentences of a grammar's language
*/

use rand::prelude::*;
use thiserror::Error;

use crate::grammar::*;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum GenerateError {
    // The expansion nested deeper than the grammar's max depth
    #[error("Expansion exceeded the maximum depth of {0}")]
    DepthExceeded(usize),
    // A variable without any production was reached
    #[error("No productions for variable `{0}`")]
    NoProductions(Variable),
}

pub type GenResult = Result<String, GenerateError>;

/// Expands the start variable, choosing among alternatives uniformly at
/// random. Nesting is bounded by the grammar's `max_depth`; hitting the
/// bound is an error, and callers typically retry.
pub fn generate(grammar: &Grammar, rng: &mut impl Rng) -> GenResult {
    generate_from(grammar, grammar.start(), rng)
}

// Generates a sentence starting with the given variable
pub fn generate_from(grammar: &Grammar, start: &Variable, rng: &mut impl Rng) -> GenResult {
    let mut result = String::new();
    generate_variable(grammar, start, 0, rng, &mut result)?;
    Ok(result)
}

fn generate_variable(
    grammar: &Grammar,
    variable: &Variable,
    depth: usize,
    rng: &mut impl Rng,
    result: &mut String,
) -> Result<(), GenerateError> {
    if depth >= grammar.max_depth() {
        return Err(GenerateError::DepthExceeded(grammar.max_depth()));
    }
    let production = grammar
        .productions_of(variable)
        .choose(rng)
        .ok_or_else(|| GenerateError::NoProductions(variable.clone()))?;

    for symbol in &production.body {
        match symbol {
            Symbol::Terminal(t) if t.is_epsilon() => {}
            Symbol::Terminal(t) => result.push_str(t.as_str()),
            Symbol::Variable(v) => generate_variable(grammar, v, depth + 1, rng, result)?,
        }
    }

    Ok(())
}
