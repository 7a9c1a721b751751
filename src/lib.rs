//! Context-free grammars: validation, conversion to Chomsky normal form and
//! membership testing by derivation search.

pub mod cnf;
pub mod derivation;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod logging;
pub mod parser;

pub use derivation::Path;
pub use grammar::{Grammar, Production, Symbol, Terminal, ValidationError, Variable};
