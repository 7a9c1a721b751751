use std::collections::HashSet;
use std::fmt::Display;

use thiserror::Error;

use super::symbol::{Production, Symbol, Terminal, Variable};

// Where an undeclared variable was found in a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Head,
    Body,
}

impl Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occurrence::Head => write!(f, "head"),
            Occurrence::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("start variable `{0}` is not among the variables")]
    StartNotInVariables(Variable),
    #[error("`{0}` is both a variable and a terminal")]
    VariablesAlphabetOverlap(String),
    #[error("terminal `{terminal}` in rule `{rule}` is not in the alphabet")]
    TerminalNotInAlphabet { terminal: Terminal, rule: Production },
    #[error("variable `{variable}` in the {occurrence} of rule `{rule}` is not declared")]
    VariableNotDeclared {
        variable: Variable,
        occurrence: Occurrence,
        rule: Production,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

fn verify_start(variables: &[Variable], start: &Variable) -> Result<()> {
    if variables.contains(start) {
        Ok(())
    } else {
        Err(ValidationError::StartNotInVariables(start.clone()))
    }
}

fn verify_disjoint(variables: &[Variable], alphabet: &[Terminal]) -> Result<()> {
    let names: HashSet<&str> = variables.iter().map(Variable::as_str).collect();
    match alphabet.iter().find(|t| names.contains(t.as_str())) {
        Some(t) => Err(ValidationError::VariablesAlphabetOverlap(t.to_string())),
        None => Ok(()),
    }
}

fn verify_terminals(alphabet: &[Terminal], rules: &[Production]) -> Result<()> {
    let alphabet: HashSet<&Terminal> = alphabet.iter().collect();
    for rule in rules {
        let undeclared = rule.body.iter().find_map(|symbol| match symbol {
            Symbol::Terminal(t) if !t.is_epsilon() && !alphabet.contains(t) => Some(t),
            _ => None,
        });
        if let Some(terminal) = undeclared {
            return Err(ValidationError::TerminalNotInAlphabet {
                terminal: terminal.clone(),
                rule: rule.clone(),
            });
        }
    }
    Ok(())
}

fn verify_variables(variables: &[Variable], rules: &[Production]) -> Result<()> {
    let variables: HashSet<&Variable> = variables.iter().collect();
    let undeclared = |variable: &Variable, occurrence, rule: &Production| ValidationError::VariableNotDeclared {
        variable: variable.clone(),
        occurrence,
        rule: rule.clone(),
    };

    for rule in rules {
        if !variables.contains(&rule.head) {
            return Err(undeclared(&rule.head, Occurrence::Head, rule));
        }
        let in_body = rule.body.iter().find_map(|symbol| match symbol {
            Symbol::Variable(v) if !variables.contains(v) => Some(v),
            _ => None,
        });
        if let Some(variable) = in_body {
            return Err(undeclared(variable, Occurrence::Body, rule));
        }
    }
    Ok(())
}

// Checks the grammar invariants in order, reporting the first violation
pub fn verify_grammar(
    variables: &[Variable],
    alphabet: &[Terminal],
    rules: &[Production],
    start: &Variable,
) -> Result<()> {
    verify_start(variables, start)?;
    verify_disjoint(variables, alphabet)?;
    verify_terminals(alphabet, rules)?;
    verify_variables(variables, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::new(name)
    }

    fn t(name: &str) -> Terminal {
        Terminal::new(name)
    }

    fn rule(head: &str, body: Vec<Symbol>) -> Production {
        Production::new(v(head), body)
    }

    #[test]
    fn accepts_well_formed() {
        let rules = vec![
            rule("S", vec![Symbol::terminal("a"), Symbol::variable("S")]),
            rule("S", vec![Symbol::epsilon()]),
        ];
        assert_eq!(verify_grammar(&[v("S")], &[t("a")], &rules, &v("S")), Ok(()));
    }

    #[test]
    fn first_violation_wins() {
        // Missing start and an overlap: the start check runs first
        assert_eq!(
            verify_grammar(&[v("A")], &[t("A")], &[], &v("S")),
            Err(ValidationError::StartNotInVariables(v("S")))
        );
        assert_eq!(
            verify_grammar(&[v("S"), v("A")], &[t("A")], &[], &v("S")),
            Err(ValidationError::VariablesAlphabetOverlap("A".to_string()))
        );
    }

    #[test]
    fn reports_undeclared_terminal() {
        let bad = rule("S", vec![Symbol::terminal("a"), Symbol::terminal("b")]);
        assert_eq!(
            verify_grammar(&[v("S")], &[t("a")], &[bad.clone()], &v("S")),
            Err(ValidationError::TerminalNotInAlphabet {
                terminal: t("b"),
                rule: bad
            })
        );
    }

    #[test]
    fn reports_undeclared_variables() {
        let bad_head = rule("A", vec![Symbol::terminal("a")]);
        assert_eq!(
            verify_grammar(&[v("S")], &[t("a")], &[bad_head.clone()], &v("S")),
            Err(ValidationError::VariableNotDeclared {
                variable: v("A"),
                occurrence: Occurrence::Head,
                rule: bad_head
            })
        );

        let bad_body = rule("S", vec![Symbol::variable("B")]);
        let error = verify_grammar(&[v("S")], &[t("a")], &[bad_body], &v("S")).unwrap_err();
        assert_eq!(
            error.to_string(),
            "variable `B` in the body of rule `S → B` is not declared"
        );
    }
}
