/*
    This module converts grammars to Chomsky normal form
*/

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::grammar::*;

/// Converts the rules of `grammar` to Chomsky normal form: every body is
/// either a single terminal or exactly two variables.
///
/// The empty string cannot be expressed in this form, so the resulting
/// rules generate the language of `grammar` without `ε`. The grammar
/// itself is left untouched.
pub fn normalize(grammar: &Grammar) -> Vec<Production> {
    Normalizer::new(grammar).run()
}

impl Grammar {
    pub fn normalize(&self) -> Vec<Production> {
        normalize(self)
    }
}

// Per-call state: fresh auxiliary names and the suffixes they derive
struct Normalizer<'g> {
    grammar: &'g Grammar,
    used_names: HashSet<String>,
    next_index: usize,
    auxiliaries: HashMap<Vec<Symbol>, Variable>,
}

impl<'g> Normalizer<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Normalizer {
            grammar,
            used_names: grammar
                .variables()
                .iter()
                .map(Variable::as_str)
                .chain(grammar.alphabet().iter().map(Terminal::as_str))
                .map(str::to_string)
                .collect(),
            next_index: 0,
            auxiliaries: HashMap::new(),
        }
    }

    fn run(mut self) -> Vec<Production> {
        let rules = remove_nullable(self.grammar.rules());
        let rules = remove_units(rules);
        let rules = self.binarize(rules);
        self.isolate_terminals(rules)
    }

    fn fresh_variable(&mut self) -> Variable {
        loop {
            let name = format!("V{}", self.next_index);
            self.next_index += 1;
            if self.used_names.insert(name.clone()) {
                trace!(%name, "allocated auxiliary variable");
                return Variable::new(name);
            }
        }
    }

    // A → s1 s2 … sN becomes A → s1 X1, X1 → s2 X2, …, X(N-2) → s(N-1) sN.
    // Names are handed out from the left. An auxiliary stands for the suffix
    // it derives, so a suffix seen before ends the chain at the existing
    // auxiliary and no unit alternative appears.
    fn binarize(&mut self, rules: Vec<Production>) -> Vec<Production> {
        let mut result = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.body.len() <= 2 {
                result.push(rule);
                continue;
            }

            let body = rule.body;
            let last = body.len() - 1;
            let mut links = Vec::new();
            let mut tail = body[last].clone();
            for start in 1..last {
                if let Some(existing) = self.auxiliaries.get(&body[start..]) {
                    tail = existing.clone().into();
                    break;
                }
                let auxiliary = self.fresh_variable();
                self.auxiliaries.insert(body[start..].to_vec(), auxiliary.clone());
                links.push((start, auxiliary));
            }

            let mut chain = Vec::with_capacity(links.len());
            for (start, auxiliary) in links.into_iter().rev() {
                chain.push(Production::new(auxiliary.clone(), vec![body[start].clone(), tail]));
                tail = auxiliary.into();
            }
            result.push(Production::new(rule.head, vec![body[0].clone(), tail]));
            result.extend(chain.into_iter().rev());
        }

        debug!(auxiliaries = self.auxiliaries.len(), "binarized long productions");
        result
    }

    fn terminal_name(&mut self, index: usize) -> Variable {
        let mut name = format!("T{}", index);
        while !self.used_names.insert(name.clone()) {
            name.push('\'');
        }
        Variable::new(name)
    }

    fn isolate_terminals(&mut self, rules: Vec<Production>) -> Vec<Production> {
        let grammar = self.grammar;
        let alphabet = grammar.alphabet();
        let dedicated: HashMap<&Terminal, Variable> = alphabet
            .iter()
            .enumerate()
            .map(|(i, t)| (t, self.terminal_name(i)))
            .collect();

        let mut result = rules
            .into_iter()
            .map(|rule| {
                if rule.body.len() < 2 {
                    return rule;
                }
                let body = rule
                    .body
                    .into_iter()
                    .map(|symbol| match symbol {
                        Symbol::Terminal(t) => match dedicated.get(&t) {
                            Some(v) => Symbol::Variable(v.clone()),
                            None => Symbol::Terminal(t),
                        },
                        variable => variable,
                    })
                    .collect();
                Production::new(rule.head, body)
            })
            .collect_vec();

        result.extend(
            alphabet
                .iter()
                .map(|t| Production::new(dedicated[t].clone(), vec![Symbol::Terminal(t.clone())])),
        );
        result
    }
}

fn without_epsilon(rule: &Production) -> Production {
    let body = rule.body.iter().filter(|s| !s.is_epsilon()).cloned().collect();
    Production::new(rule.head.clone(), body)
}

fn nullable_variables(rules: &[Production]) -> HashSet<Variable> {
    let mut nullable: HashSet<Variable> = rules
        .iter()
        .filter(|rule| rule.body.is_empty())
        .map(|rule| rule.head.clone())
        .collect();

    loop {
        let found = rules
            .iter()
            .filter(|rule| !nullable.contains(&rule.head))
            .filter(|rule| {
                rule.body
                    .iter()
                    .all(|s| matches!(s, Symbol::Variable(v) if nullable.contains(v)))
            })
            .map(|rule| rule.head.clone())
            .collect_vec();
        if found.is_empty() {
            return nullable;
        }
        nullable.extend(found);
    }
}

// Removes ε-productions, adding for every rule the alternatives obtained by
// dropping any non-empty subset of its nullable occurrences
fn remove_nullable(rules: &[Production]) -> Vec<Production> {
    let rules = rules.iter().map(without_epsilon).collect_vec();
    let nullable = nullable_variables(&rules);
    debug!(nullable = ?nullable.iter().sorted().collect_vec(), "computed nullable variables");

    let mut result = Vec::with_capacity(rules.len());
    for rule in rules.into_iter().filter(|rule| !rule.body.is_empty()) {
        let positions = rule
            .body
            .iter()
            .positions(|s| matches!(s, Symbol::Variable(v) if nullable.contains(v)))
            .collect_vec();

        let alternatives = positions
            .into_iter()
            .powerset()
            .skip(1)
            .map(|removed| {
                rule.body
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !removed.contains(i))
                    .map(|(_, s)| s.clone())
                    .collect_vec()
            })
            .filter(|body| !body.is_empty() && *body != rule.body)
            .unique()
            .collect_vec();

        let head = rule.head.clone();
        result.push(rule);
        result.extend(alternatives.into_iter().map(|body| Production::new(head.clone(), body)));
    }
    result
}

// Pairs (A, B) such that A derives B through unit rules alone, A ≠ B
fn unit_pairs(rules: &[Production]) -> HashSet<(Variable, Variable)> {
    let mut pairs: HashSet<(Variable, Variable)> = rules
        .iter()
        .filter_map(|rule| rule.unit_target().map(|target| (rule.head.clone(), target.clone())))
        .filter(|(a, b)| a != b)
        .collect();

    loop {
        let found = pairs
            .iter()
            .cartesian_product(pairs.iter())
            .filter(|((_, b), (c, _))| b == c)
            .map(|((a, _), (_, d))| (a.clone(), d.clone()))
            .filter(|pair| pair.0 != pair.1 && !pairs.contains(pair))
            .collect_vec();
        if found.is_empty() {
            return pairs;
        }
        pairs.extend(found);
    }
}

// Replaces every unit rule A → B with copies of B's productions, resolving
// chains transitively. Ends with the canonical sort.
fn remove_units(rules: Vec<Production>) -> Vec<Production> {
    let pairs = unit_pairs(&rules);
    debug!(unit_pairs = pairs.len(), "removing unit productions");

    let mut result = Vec::with_capacity(rules.len());
    for rule in rules.into_iter().filter(|rule| rule.unit_target().is_none()) {
        for (a, _) in pairs.iter().filter(|(_, b)| *b == rule.head) {
            result.push(Production::new(a.clone(), rule.body.clone()));
        }
        result.push(rule);
    }

    canonical_sort(&mut result);
    result.dedup();
    result
}
