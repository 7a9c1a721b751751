use super::{ColumnResult, ParseErrorType};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Token {
    Arrow,
    Or,
    Epsilon,
    Variable(char),
    Terminal(char),
}

// A token and the (1-based) column it starts at
pub type Lexeme = (usize, Token);

fn is_terminal(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, '(' | ')' | '[' | ']')
}

pub fn lex_line(line: &str) -> ColumnResult<Vec<Lexeme>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().enumerate().peekable();

    while let Some((i, c)) = line_chars.next() {
        let column = i + 1;
        let token = match c {
            ' ' | '\t' => continue,
            '→' => Token::Arrow,
            // The ASCII arrow is the only two-character token
            '-' => match line_chars.next_if(|&(_, c)| c == '>') {
                Some(_) => Token::Arrow,
                None => return Err((column, ParseErrorType::MalformedSeparator)),
            },
            '|' => Token::Or,
            'ε' => Token::Epsilon,
            c if c.is_ascii_uppercase() => Token::Variable(c),
            c if is_terminal(c) => Token::Terminal(c),
            c => return Err((column, ParseErrorType::UnexpectedCharacter(c))),
        };
        tokens.push((column, token));
    }

    Ok(tokens)
}
