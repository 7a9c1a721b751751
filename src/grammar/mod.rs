/*
    This module is for storing and validating grammars
*/

mod symbol;
mod validation;

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;
use tracing::warn;

pub use symbol::*;
pub use validation::{Occurrence, ValidationError};

pub const DEFAULT_MAX_DEPTH: usize = 10;

// Upper bound on `max_depth`, which is also the deepest native recursion of
// the derivation search
pub const MAX_DEPTH_CEILING: usize = 2048;

/// A context-free grammar `G = (V, Σ, R, S)`.
///
/// Immutable once constructed except for the derivation depth bound.
#[derive(Debug, Clone)]
pub struct Grammar {
    variables: Vec<Variable>,
    alphabet: Vec<Terminal>,
    rules: Vec<Production>,
    start: Variable,
    max_depth: usize,
    rule_index: HashMap<Variable, Vec<Production>>,
}

impl Grammar {
    /// Validates and builds a grammar. The order of `rules` is the order
    /// alternatives are tried in during evaluation, except that empty
    /// productions are always tried last.
    pub fn new(
        variables: Vec<Variable>,
        alphabet: Vec<Terminal>,
        rules: Vec<Production>,
        start: Variable,
    ) -> validation::Result<Self> {
        let variables = variables.into_iter().unique().collect_vec();
        let (alphabet, reserved): (Vec<_>, Vec<_>) =
            alphabet.into_iter().unique().partition(|t| !t.is_epsilon());
        if !reserved.is_empty() {
            warn!("dropping reserved terminal `{}` from the alphabet", symbol::EPSILON);
        }

        validation::verify_grammar(&variables, &alphabet, &rules, &start)?;

        let rule_index = index_rules(&rules);
        Ok(Grammar {
            variables,
            alphabet,
            rules,
            start,
            max_depth: DEFAULT_MAX_DEPTH,
            rule_index,
        })
    }

    /// Builds a grammar whose variables and alphabet are exactly the symbols
    /// the rules use, in order of first appearance (the start comes first).
    pub fn from_productions(start: Variable, rules: Vec<Production>) -> validation::Result<Self> {
        let variables = std::iter::once(start.clone())
            .chain(rules.iter().flat_map(|rule| {
                std::iter::once(rule.head.clone()).chain(rule.body.iter().filter_map(|symbol| match symbol {
                    Symbol::Variable(v) => Some(v.clone()),
                    Symbol::Terminal(_) => None,
                }))
            }))
            .collect_vec();
        let alphabet = rules
            .iter()
            .flat_map(|rule| &rule.body)
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(t) if !t.is_epsilon() => Some(t.clone()),
                _ => None,
            })
            .collect_vec();

        Grammar::new(variables, alphabet, rules, start)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn alphabet(&self) -> &[Terminal] {
        &self.alphabet
    }

    pub fn rules(&self) -> &[Production] {
        &self.rules
    }

    pub fn start(&self) -> &Variable {
        &self.start
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the derivation depth bound (default 10). Values above
    /// [`MAX_DEPTH_CEILING`] are clamped.
    pub fn set_max_depth(&mut self, depth: usize) {
        if depth > MAX_DEPTH_CEILING {
            warn!(depth, ceiling = MAX_DEPTH_CEILING, "clamping maximum derivation depth");
        }
        self.max_depth = depth.min(MAX_DEPTH_CEILING);
    }

    // The alternatives of a variable in the order the search tries them
    pub fn productions_of(&self, variable: &Variable) -> &[Production] {
        self.rule_index.get(variable).map_or(&[], Vec::as_slice)
    }
}

// Groups rules by head, moving the (single) empty production of each head
// to the end of its group
fn index_rules(rules: &[Production]) -> HashMap<Variable, Vec<Production>> {
    let mut index: HashMap<Variable, Vec<Production>> = HashMap::new();
    let mut nullable: Vec<&Variable> = Vec::new();

    for rule in rules {
        if rule.is_epsilon() {
            if !nullable.contains(&&rule.head) {
                nullable.push(&rule.head);
            }
            continue;
        }
        index.entry(rule.head.clone()).or_default().push(rule.clone());
    }
    for head in nullable {
        index
            .entry(head.clone())
            .or_default()
            .push(Production::epsilon(head.clone()));
    }

    index
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "( {{ {} }}, {{ {} }}, [ {} ], {} )",
            self.variables.iter().join(", "),
            self.alphabet.iter().join(", "),
            self.rules.iter().join(", "),
            self.start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palindromes() -> Grammar {
        let s = Variable::new("S");
        let (a, b) = (Symbol::terminal("a"), Symbol::terminal("b"));
        Grammar::new(
            vec![s.clone()],
            vec![Terminal::new("a"), Terminal::new("b")],
            vec![
                Production::new(s.clone(), vec![a.clone(), s.clone().into(), a]),
                Production::epsilon(s.clone()),
                Production::new(s.clone(), vec![b.clone(), s.clone().into(), b]),
                Production::epsilon(s.clone()),
            ],
            s,
        )
        .unwrap()
    }

    #[test]
    fn display() {
        assert_eq!(
            palindromes().to_string(),
            "( { S }, { a, b }, [ S → aSa, S → ε, S → bSb, S → ε ], S )"
        );
    }

    #[test]
    fn epsilon_goes_last_once() {
        let grammar = palindromes();
        let alternatives: Vec<String> = grammar
            .productions_of(&Variable::new("S"))
            .iter()
            .map(Production::to_string)
            .collect();
        assert_eq!(alternatives, vec!["S → aSa", "S → bSb", "S → ε"]);
        // The original rules are kept verbatim
        assert_eq!(grammar.rules().len(), 4);
    }

    #[test]
    fn unknown_variable_has_no_alternatives() {
        assert!(palindromes().productions_of(&Variable::new("X")).is_empty());
    }

    #[test]
    fn depth_is_clamped() {
        let mut grammar = palindromes();
        assert_eq!(grammar.max_depth(), DEFAULT_MAX_DEPTH);
        grammar.set_max_depth(15);
        assert_eq!(grammar.max_depth(), 15);
        grammar.set_max_depth(usize::MAX);
        assert_eq!(grammar.max_depth(), MAX_DEPTH_CEILING);
    }

    #[test]
    fn duplicates_and_epsilon_are_removed_from_declarations() {
        let s = Variable::new("S");
        let grammar = Grammar::new(
            vec![s.clone(), s.clone()],
            vec![Terminal::new("a"), Terminal::epsilon(), Terminal::new("a")],
            vec![Production::new(s.clone(), vec![Symbol::terminal("a")])],
            s,
        )
        .unwrap();
        assert_eq!(grammar.variables(), &[Variable::new("S")]);
        assert_eq!(grammar.alphabet(), &[Terminal::new("a")]);
    }

    #[test]
    fn from_productions_collects_symbols() {
        let (s, x) = (Variable::new("S"), Variable::new("X"));
        let grammar = Grammar::from_productions(
            s.clone(),
            vec![
                Production::new(s.clone(), vec![Symbol::terminal("b"), x.clone().into()]),
                Production::new(x.clone(), vec![Symbol::terminal("a")]),
                Production::epsilon(x.clone()),
            ],
        )
        .unwrap();
        assert_eq!(grammar.variables(), &[s, x]);
        assert_eq!(grammar.alphabet(), &[Terminal::new("b"), Terminal::new("a")]);
    }

    #[test]
    fn construction_is_rejected() {
        let s = Variable::new("S");
        let result = Grammar::new(vec![], vec![], vec![], s.clone());
        assert_eq!(result.unwrap_err(), ValidationError::StartNotInVariables(s));
    }
}
