/*
    This module decides membership by searching for a leftmost derivation
*/

use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::grammar::*;

/// The productions of one successful derivation, in the order they were
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Production>);

impl Path {
    pub fn productions(&self) -> &[Production] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the sentential forms of the derivation, e.g.
    /// `S → aSa → aaSaa → aabSbaa → aabbaa`.
    pub fn replay(&self) -> String {
        let Some((first, rest)) = self.0.split_first() else {
            return String::new();
        };

        let mut forms = vec![first.head.to_string(), first.body_text()];
        for production in rest {
            let body = if production.is_epsilon() {
                String::new()
            } else {
                production.body_text()
            };
            let previous = &forms[forms.len() - 1];
            let next = previous.replacen(production.head.as_str(), &body, 1);
            forms.push(next);
        }
        forms.join(" → ")
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {} ]", self.0.iter().join(", "))
    }
}

struct Search<'g> {
    grammar: &'g Grammar,
    max_depth: usize,
    path: Vec<Production>,
}

impl<'g> Search<'g> {
    // Terminals and ε are consumed in place; only variable expansions
    // recurse, so the recursion is at most `max_depth` deep.
    fn derive(&mut self, mut input: &str, body: &[Symbol], mut depth: usize) -> bool {
        let mut remaining = body;
        loop {
            if depth >= self.max_depth {
                return false;
            }
            let Some((symbol, tail)) = remaining.split_first() else {
                return input.is_empty();
            };

            match symbol {
                Symbol::Terminal(t) if t.is_epsilon() => depth += 1,
                Symbol::Terminal(t) => match input.strip_prefix(t.as_str()) {
                    Some(rest) => input = rest,
                    None => return false,
                },
                Symbol::Variable(v) => {
                    let grammar = self.grammar;
                    for production in grammar.productions_of(v) {
                        let spliced = production.body.iter().chain(tail).cloned().collect_vec();
                        self.path.push(production.clone());
                        if self.derive(input, &spliced, depth + 1) {
                            return true;
                        }
                        self.path.pop();
                    }
                    return false;
                }
            }
            remaining = tail;
        }
    }
}

/// Searches for the first leftmost derivation of `input`, trying
/// alternatives in rule order, depth first.
///
/// `None` means no derivation exists within the grammar's `max_depth`,
/// which may be too low for long inputs.
pub fn evaluate(grammar: &Grammar, input: &str) -> Option<Path> {
    let mut search = Search {
        grammar,
        max_depth: grammar.max_depth(),
        path: Vec::new(),
    };

    for production in grammar.productions_of(grammar.start()) {
        search.path = vec![production.clone()];
        if search.derive(input, &production.body, 0) {
            debug!(input, steps = search.path.len(), "derivation found");
            return Some(Path(search.path));
        }
    }

    debug!(input, max_depth = grammar.max_depth(), "no derivation found");
    None
}

impl Grammar {
    pub fn evaluate(&self, input: &str) -> Option<Path> {
        evaluate(self, input)
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn rule(head: &str, body: &str) -> Production {
        let body = body
            .chars()
            .map(|c| match c {
                'ε' => Symbol::epsilon(),
                c if c.is_uppercase() => Symbol::variable(c),
                c => Symbol::terminal(c),
            })
            .collect();
        Production::new(Variable::new(head), body)
    }

    fn palindromes() -> Grammar {
        Grammar::from_productions(
            Variable::new("S"),
            vec![rule("S", "aSa"), rule("S", "bSb"), rule("S", "ε")],
        )
        .unwrap()
    }

    #[test]
    fn finds_first_derivation() {
        let path = palindromes().evaluate("aabbaa").unwrap();
        assert_eq!(path.to_string(), "[ S → aSa, S → aSa, S → bSb, S → ε ]");
        assert_eq!(path.replay(), "S → aSa → aaSaa → aabSbaa → aabbaa");
    }

    #[test]
    fn accepts_and_rejects() {
        let grammar = palindromes();
        let inputs = vec!["", "aa", "bb", "abba", "aabbaa", "aabbbbaa", "ababbaba", "a", "x", "aab", "abab", "abbba"];
        let answers = vec![true, true, true, true, true, true, true, false, false, false, false, false];

        for (input, answer) in zip(inputs, answers) {
            assert_eq!(grammar.evaluate(input).is_some(), answer, "input {:?}", input);
        }
    }

    #[test]
    fn depth_bounds_search() {
        let mut grammar = palindromes();
        // Ten nested expansions plus the final ε exceed the default bound
        assert!(grammar.evaluate("aaaaaaaaaaaaaaaaaaaa").is_none());
        grammar.set_max_depth(12);
        assert!(grammar.evaluate("aaaaaaaaaaaaaaaaaaaa").is_some());
    }

    #[test]
    fn left_recursion_terminates() {
        let grammar = Grammar::from_productions(
            Variable::new("S"),
            vec![rule("S", "Sa"), rule("S", "a")],
        )
        .unwrap();
        assert!(grammar.evaluate("aaa").is_some());
        assert!(grammar.evaluate("aab").is_none());
    }

    #[test]
    fn epsilon_costs_depth() {
        let mut grammar = Grammar::from_productions(
            Variable::new("S"),
            vec![rule("S", "AB"), rule("A", "ε"), rule("B", "ε")],
        )
        .unwrap();
        assert!(grammar.evaluate("").is_some());
        // S → AB, A → ε, ε, B → ε, ε
        grammar.set_max_depth(4);
        assert!(grammar.evaluate("").is_none());
    }

    #[test]
    fn replay_of_empty_path() {
        assert_eq!(Path::default().replay(), "");
        assert!(Path::default().is_empty());
    }

    #[test]
    fn replay_epsilon_start() {
        let path = palindromes().evaluate("").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.replay(), "S → ε");
    }
}
