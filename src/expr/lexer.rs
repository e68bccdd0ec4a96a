use super::parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Int(i64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    Not,
    AndAnd,
    OrOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Match,
    NotMatch,
}

pub(super) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' => {
                chars.next();
                if chars.next_if_eq(&'&').is_none() {
                    return Err(ParseError::new("expected '&&'"));
                }
                tokens.push(Token::AndAnd);
            }
            '|' => {
                chars.next();
                if chars.next_if_eq(&'|').is_none() {
                    return Err(ParseError::new("expected '||'"));
                }
                tokens.push(Token::OrOr);
            }
            '=' => {
                chars.next();
                match chars.next() {
                    Some('=') => tokens.push(Token::Eq),
                    Some('~') => tokens.push(Token::Match),
                    _ => return Err(ParseError::new("expected '==' or '=~'")),
                }
            }
            '!' => {
                chars.next();
                match chars.peek() {
                    Some('=') => {
                        chars.next();
                        tokens.push(Token::Ne);
                    }
                    Some('~') => {
                        chars.next();
                        tokens.push(Token::NotMatch);
                    }
                    _ => tokens.push(Token::Not),
                }
            }
            '<' => {
                chars.next();
                if chars.next_if_eq(&'=').is_some() {
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.next_if_eq(&'=').is_some() {
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(lex_string(&mut chars)?));
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        let n = lex_int(&mut chars)?;
                        tokens.push(Token::Int(-n));
                    }
                    _ => return Err(ParseError::new("expected digit after '-'")),
                }
            }
            c if c.is_ascii_digit() => {
                tokens.push(Token::Int(lex_int(&mut chars)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                tokens.push(Token::Ident(lex_ident(&mut chars)));
            }
            other => {
                return Err(ParseError::new(format!("unexpected character {other:?}")));
            }
        }
    }

    Ok(tokens)
}

fn lex_string(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<String, ParseError> {
    let mut s = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(s),
            Some('\\') => match chars.next() {
                Some(escaped @ ('"' | '\\')) => s.push(escaped),
                Some(other) => {
                    s.push('\\');
                    s.push(other);
                }
                None => return Err(ParseError::new("unterminated string literal")),
            },
            Some(c) => s.push(c),
            None => return Err(ParseError::new("unterminated string literal")),
        }
    }
}

fn lex_int(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<i64, ParseError> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    digits
        .parse()
        .map_err(|_| ParseError::new(format!("integer literal {digits:?} out of range")))
}

/// Identifiers may be dotted (`TARGET.VO`); the parser splits any
/// scope prefix off.
fn lex_ident(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}
