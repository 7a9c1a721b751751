/*
    This module reads grammars written one rule per line, e.g.

        S → aSa | bSb | ε
        S -> SS

    Blank lines may appear anywhere and are skipped; every rule line must end
    with a line break.
*/

mod lexer;

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error_handling::{Error, ErrorType, Location};
use crate::grammar::*;
use lexer::*;

#[derive(Debug, thiserror::Error)]
pub enum ParseErrorType {
    // A rule line starts with something other than a variable
    #[error("Expected a variable (`A`-`Z`) at the start of the rule")]
    MissingHead,
    #[error("Expected `→` or `->` after the head")]
    MissingSeparator,
    // A `-` that is not followed by `>`
    #[error("Malformed separator, expected `->`")]
    MalformedSeparator,
    // A second arrow on the same line
    #[error("Unexpected separator inside a rule body")]
    UnexpectedSeparator,
    #[error("Unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("Empty alternative")]
    EmptyAlternative,
    #[error("`ε` must stand alone in an alternative")]
    MisplacedEpsilon,
    #[error("The rule is not terminated by a line break")]
    UnterminatedLine,
    #[error("The grammar has no rules")]
    NoRules,
    #[error("Invalid grammar: {0}")]
    InvalidGrammar(#[from] ValidationError),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
}

impl ErrorType for ParseErrorType {}

impl PartialEq for ParseErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParseErrorType::FileError(a), ParseErrorType::FileError(b)) => a.kind() == b.kind(),
            (ParseErrorType::InvalidGrammar(a), ParseErrorType::InvalidGrammar(b)) => a == b,
            (ParseErrorType::UnexpectedCharacter(a), ParseErrorType::UnexpectedCharacter(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

pub type ParseError = Error<ParseErrorType>;
pub type ParseResult<T> = std::result::Result<T, ParseError>;

// Errors within one line carry only the column
pub type ColumnResult<T> = std::result::Result<T, (usize, ParseErrorType)>;

#[derive(PartialEq, Debug)]
struct Rule {
    head: Variable,
    alternatives: Vec<Vec<Symbol>>,
}

impl Rule {
    fn into_productions(self) -> impl Iterator<Item = Production> {
        let head = self.head;
        self.alternatives
            .into_iter()
            .map(move |body| Production::new(head.clone(), body))
    }
}

fn parse_alternative(tokens: &[Lexeme], end: usize) -> ColumnResult<Vec<Symbol>> {
    if tokens.is_empty() {
        return Err((end, ParseErrorType::EmptyAlternative));
    }
    tokens
        .iter()
        .map(|&(column, token)| match token {
            Token::Epsilon if tokens.len() == 1 => Ok(Symbol::epsilon()),
            Token::Epsilon => Err((column, ParseErrorType::MisplacedEpsilon)),
            Token::Variable(c) => Ok(Symbol::variable(c)),
            Token::Terminal(c) => Ok(Symbol::terminal(c)),
            Token::Arrow | Token::Or => Err((column, ParseErrorType::UnexpectedSeparator)),
        })
        .collect()
}

// Splits the body on `|`; an empty alternative is reported at the `|` (or
// the end of the line) that closes it
fn parse_rewrite(tokens: &[Lexeme], end: usize) -> ColumnResult<Vec<Vec<Symbol>>> {
    let mut alternatives = Vec::new();
    let mut rest = tokens;
    while let Some(split) = rest.iter().position(|(_, t)| *t == Token::Or) {
        alternatives.push(parse_alternative(&rest[..split], rest[split].0)?);
        rest = &rest[split + 1..];
    }
    alternatives.push(parse_alternative(rest, end)?);
    Ok(alternatives)
}

fn parse_line(tokens: &[Lexeme], end: usize) -> ColumnResult<Rule> {
    let head = match tokens.first() {
        Some(&(_, Token::Variable(c))) => Variable::new(c),
        Some(&(column, _)) => return Err((column, ParseErrorType::MissingHead)),
        None => return Err((end, ParseErrorType::MissingHead)),
    };

    match tokens.get(1) {
        Some((_, Token::Arrow)) => {}
        Some(&(column, _)) => return Err((column, ParseErrorType::MissingSeparator)),
        None => return Err((end, ParseErrorType::MissingSeparator)),
    }

    let alternatives = parse_rewrite(&tokens[2..], end)?;

    Ok(Rule { head, alternatives })
}

fn parse_lex_line(line: &str) -> ColumnResult<Rule> {
    let end = line.chars().count() + 1;
    lexer::lex_line(line).and_then(|tokens| parse_line(&tokens, end))
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Reads a grammar from its textual notation. The head of the first rule
/// is the start variable.
pub fn parse_str(input: &str) -> ParseResult<Grammar> {
    let mut start = None;
    let mut productions = Vec::new();

    for (num, raw) in input.split_inclusive('\n').enumerate() {
        if is_blank(raw) {
            continue;
        }
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');
        let located = |column, error| ParseError {
            location: Location::at(num + 1, column),
            error,
        };

        let rule = parse_lex_line(line).map_err(|(column, error)| located(column, error))?;
        if !raw.ends_with('\n') {
            return Err(located(line.chars().count() + 1, ParseErrorType::UnterminatedLine));
        }

        start.get_or_insert_with(|| rule.head.clone());
        productions.extend(rule.into_productions());
    }

    let Some(start) = start else {
        return Err(ParseError {
            location: Location::at(1, 1),
            error: ParseErrorType::NoRules,
        });
    };
    debug!(%start, rules = productions.len(), "parsed grammar");

    Grammar::from_productions(start, productions).map_err(|e| ParseError {
        location: Location::default(),
        error: e.into(),
    })
}

pub fn parse_file(path: &Path) -> ParseResult<Grammar> {
    let text = std::fs::read_to_string(path).map_err(|e| ParseError {
        location: Location::default().in_file(path.to_path_buf()),
        error: e.into(),
    })?;

    parse_str(&text).map_err(|e| ParseError {
        location: e.location.in_file(path.to_path_buf()),
        error: e.error,
    })
}

impl FromStr for Grammar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}
