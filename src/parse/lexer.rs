//! Tokenizer for the DOT subset used by the upstream graph generator
//!
//! Only the structural pieces of the language are recognized: identifiers
//! (bare, numeric, or double-quoted), the edge arrow, braces, brackets,
//! and the attribute punctuation. Line comments (`//`, `#`) and block
//! comments are skipped. Lines are tracked so diagnostics can point at
//! the offending statement.

use crate::error::{GraphError, GraphResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare identifier, numeric literal, or unquoted content of a string.
    Ident(String),
    /// `->`
    Arrow,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Comma,
    Semi,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "'{}'", s),
            Token::Arrow => write!(f, "'->'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Equals => write!(f, "'='"),
            Token::Comma => write!(f, "','"),
            Token::Semi => write!(f, "';'"),
        }
    }
}

/// A token plus the 1-based source line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == ':'
}

/// Tokenize a graph description.
pub fn tokenize(src: &str) -> GraphResult<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => skip_line(&mut chars),
            '/' => {
                chars.next();
                match chars.peek() {
                    Some('/') => skip_line(&mut chars),
                    Some('*') => {
                        chars.next();
                        skip_block_comment(&mut chars, &mut line)?;
                    }
                    _ => return Err(GraphError::malformed(line, "unexpected character '/'")),
                }
            }
            '{' => push(&mut tokens, Token::LBrace, line, &mut chars),
            '}' => push(&mut tokens, Token::RBrace, line, &mut chars),
            '[' => push(&mut tokens, Token::LBracket, line, &mut chars),
            ']' => push(&mut tokens, Token::RBracket, line, &mut chars),
            '=' => push(&mut tokens, Token::Equals, line, &mut chars),
            ',' => push(&mut tokens, Token::Comma, line, &mut chars),
            ';' => push(&mut tokens, Token::Semi, line, &mut chars),
            '"' => {
                chars.next();
                let value = read_quoted(&mut chars, &mut line)?;
                tokens.push(Spanned {
                    token: Token::Ident(value),
                    line,
                });
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some('>') => {
                        chars.next();
                        tokens.push(Spanned {
                            token: Token::Arrow,
                            line,
                        });
                    }
                    Some(&d) if d.is_ascii_digit() || d == '.' => {
                        let mut value = String::from("-");
                        read_ident_into(&mut chars, &mut value);
                        tokens.push(Spanned {
                            token: Token::Ident(value),
                            line,
                        });
                    }
                    Some('-') => {
                        // Undirected edge operator; the caller rejects it
                        // with a better message than "unexpected '-'".
                        return Err(GraphError::malformed(
                            line,
                            "undirected edge '--' is not supported; use '->'",
                        ));
                    }
                    _ => return Err(GraphError::malformed(line, "unexpected character '-'")),
                }
            }
            c if is_ident_start(c) => {
                let mut value = String::new();
                read_ident_into(&mut chars, &mut value);
                tokens.push(Spanned {
                    token: Token::Ident(value),
                    line,
                });
            }
            other => {
                return Err(GraphError::malformed(
                    line,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
    }

    Ok(tokens)
}

fn push(
    tokens: &mut Vec<Spanned>,
    token: Token,
    line: usize,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) {
    chars.next();
    tokens.push(Spanned { token, line });
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    for c in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

fn skip_block_comment(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: &mut usize,
) -> GraphResult<()> {
    let start = *line;
    let mut prev = '\0';
    for c in chars.by_ref() {
        if c == '\n' {
            *line += 1;
        }
        if prev == '*' && c == '/' {
            return Ok(());
        }
        prev = c;
    }
    Err(GraphError::malformed(start, "unterminated block comment"))
}

fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: &mut usize,
) -> GraphResult<String> {
    let start = *line;
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some(other) => {
                    // Graphviz passes unknown escapes through verbatim
                    // (layout escapes like \n, \l live in labels).
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            '\n' => {
                *line += 1;
                value.push('\n');
            }
            other => value.push(other),
        }
    }
    Err(GraphError::malformed(start, "unterminated quoted string"))
}

fn read_ident_into(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(&c) = chars.peek() {
        if is_ident_continue(c) {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
}
