/*
    Terminals, variables and the production rules built from them
*/

use std::fmt::Display;

use itertools::Itertools;

// The reserved terminal standing for the empty string
pub const EPSILON: &str = "ε";

// An elementary symbol of the input alphabet
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Terminal(String);

impl Terminal {
    pub fn new(name: impl Into<String>) -> Self {
        Terminal(name.into())
    }

    pub fn epsilon() -> Self {
        Terminal(EPSILON.to_string())
    }

    pub fn is_epsilon(&self) -> bool {
        self.0 == EPSILON
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// A grammar category (non-terminal)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// The base unit in the body of a production
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(Terminal),
    Variable(Variable),
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(Terminal::new(name))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Symbol::Variable(Variable::new(name))
    }

    pub fn epsilon() -> Self {
        Symbol::Terminal(Terminal::epsilon())
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Terminal(t) if t.is_epsilon())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Symbol::Terminal(t) => t.as_str(),
            Symbol::Variable(v) => v.as_str(),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Terminal> for Symbol {
    fn from(terminal: Terminal) -> Self {
        Symbol::Terminal(terminal)
    }
}

impl From<Variable> for Symbol {
    fn from(variable: Variable) -> Self {
        Symbol::Variable(variable)
    }
}

/// A rewrite rule `head → body`.
///
/// Equality is structural. A body of exactly `[ε]` is the empty production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub head: Variable,
    pub body: Vec<Symbol>,
}

impl Production {
    pub fn new(head: Variable, body: Vec<Symbol>) -> Self {
        Production { head, body }
    }

    pub fn epsilon(head: Variable) -> Self {
        Production::new(head, vec![Symbol::epsilon()])
    }

    pub fn is_epsilon(&self) -> bool {
        self.body.len() == 1 && self.body[0].is_epsilon()
    }

    // The target of a unit rule `A → B`
    pub fn unit_target(&self) -> Option<&Variable> {
        match self.body.as_slice() {
            [Symbol::Variable(v)] => Some(v),
            _ => None,
        }
    }

    pub fn body_text(&self) -> String {
        body_text(&self.body)
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.head, self.body_text())
    }
}

pub fn body_text(body: &[Symbol]) -> String {
    body.iter().map(Symbol::as_str).join("")
}

/// Sorts rules by `(head, body-as-text)` ascending, the order CNF output is
/// compared in. Rules with equal text are further ordered structurally so
/// that identical rules end up adjacent.
pub fn canonical_sort(rules: &mut [Production]) {
    rules.sort_by_cached_key(|rule| (rule.head.clone(), rule.body_text(), rule.body.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_display() {
        let s = Variable::new("S");
        let rule = Production::new(
            s.clone(),
            vec![Symbol::terminal("a"), s.clone().into(), Symbol::terminal("a")],
        );
        assert_eq!(rule.to_string(), "S → aSa");
        assert_eq!(Production::epsilon(s).to_string(), "S → ε");
    }

    #[test]
    fn production_classification() {
        let a = Variable::new("A");
        assert!(Production::epsilon(a.clone()).is_epsilon());
        assert!(!Production::new(a.clone(), vec![Symbol::epsilon(), Symbol::epsilon()]).is_epsilon());
        assert_eq!(
            Production::new(a.clone(), vec![Symbol::variable("B")]).unit_target(),
            Some(&Variable::new("B"))
        );
        assert_eq!(Production::new(a, vec![Symbol::terminal("b")]).unit_target(), None);
    }

    #[test]
    fn structural_equality() {
        let a = Variable::new("A");
        // Same text, different symbol kinds
        let terminal = Production::new(a.clone(), vec![Symbol::terminal("B")]);
        let variable = Production::new(a, vec![Symbol::variable("B")]);
        assert_eq!(terminal.body_text(), variable.body_text());
        assert_ne!(terminal, variable);
    }

    #[test]
    fn canonical_order() {
        let rule = |head: &str, body: &[Symbol]| Production::new(Variable::new(head), body.to_vec());
        let mut rules = vec![
            rule("S", &[Symbol::terminal("b")]),
            rule("A", &[Symbol::terminal("a")]),
            rule("S", &[Symbol::variable("A"), Symbol::variable("B")]),
            rule("S", &[Symbol::terminal("a")]),
        ];
        canonical_sort(&mut rules);
        let sorted: Vec<String> = rules.iter().map(Production::to_string).collect();
        assert_eq!(sorted, vec!["A → a", "S → AB", "S → a", "S → b"]);
    }
}
