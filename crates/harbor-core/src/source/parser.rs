//! The declaration grammar.
//!
//! The entire "language" the manager understands is one header shape:
//!
//! ```text
//! class NAME [ ( BASE {, BASE} ) ] : [inline member]
//! ```
//!
//! plus a member grammar for body lines (method headers, attribute
//! assignments, docstrings, `pass`). Member bodies are opaque. This is
//! intentionally far narrower than any real language; anything richer is
//! somebody else's compiler.
use crate::source::block::SourceBlock;
use crate::source::error::SourceError;

/// The keyword opening a definition header.
pub const DEFINITION_KEYWORD: &str = "class";

/// A parsed definition header: the declared name plus any base/capability
/// names, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub bases: Vec<String>,
}

impl Declaration {
    pub fn declares_base(&self, base: &str) -> bool {
        self.bases.iter().any(|b| b == base)
    }

    /// The same declaration with `base` removed. Applied when a selector
    /// match strips the capability marker before compilation.
    pub fn without_base(mut self, base: &str) -> Declaration {
        self.bases.retain(|b| b != base);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    LParen,
    RParen,
    Comma,
    Colon,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lex a header line. Stops after the first ':' outside parentheses (the
/// block terminator); anything beyond it is inline body, not header.
fn lex_header(line: &str) -> Result<Vec<Token>, SourceError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut chars = line.char_indices().peekable();
    while let Some(&(column, c)) = chars.peek() {
        match c {
            '#' => break,
            '(' => {
                chars.next();
                depth += 1;
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                depth = depth.saturating_sub(1);
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ':' => {
                chars.next();
                tokens.push(Token::Colon);
                if depth == 0 {
                    break;
                }
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            c if is_ident_start(c) => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if is_ident_continue(c) {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => {
                return Err(SourceError::UnexpectedCharacter {
                    character: c,
                    column,
                    line: line.to_string(),
                });
            }
        }
    }
    Ok(tokens)
}

/// Parse one definition header into a [`Declaration`].
pub fn parse_declaration(header: &str) -> Result<Declaration, SourceError> {
    let tokens = lex_header(header)?;
    let mut tokens = tokens.into_iter().peekable();

    match tokens.next() {
        Some(Token::Ident(keyword)) if keyword == DEFINITION_KEYWORD => {}
        _ => {
            return Err(SourceError::MissingKeyword {
                line: header.to_string(),
            });
        }
    }

    let name = match tokens.next() {
        Some(Token::Ident(name)) => name,
        _ => {
            return Err(SourceError::MissingName {
                line: header.to_string(),
            });
        }
    };

    let mut bases = Vec::new();
    if tokens.peek() == Some(&Token::LParen) {
        tokens.next();
        loop {
            match tokens.next() {
                Some(Token::RParen) => break,
                Some(Token::Ident(base)) => {
                    bases.push(base);
                    match tokens.next() {
                        Some(Token::Comma) => continue,
                        Some(Token::RParen) => break,
                        _ => {
                            return Err(SourceError::UnterminatedBaseList {
                                line: header.to_string(),
                            });
                        }
                    }
                }
                _ => {
                    return Err(SourceError::UnterminatedBaseList {
                        line: header.to_string(),
                    });
                }
            }
        }
    }

    match tokens.next() {
        Some(Token::Colon) => Ok(Declaration { name, bases }),
        _ => Err(SourceError::MissingTerminator {
            line: header.to_string(),
        }),
    }
}

/// Content following the block terminator on the header line itself, if
/// any. A one-line definition carries its single member here.
pub fn inline_body(header: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, c) in header.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                let rest = header[idx + 1..].trim();
                return (!rest.is_empty()).then_some(rest);
            }
            _ => {}
        }
    }
    None
}

/// Structural validation of a block body.
///
/// The first contentful line fixes the member indentation level. Lines at
/// or shallower than that level must be recognizable members; deeper
/// lines belong to the innermost member and are opaque.
pub fn check_body(block: &SourceBlock) -> Result<(), SourceError> {
    if let Some(inline) = inline_body(block.header()) {
        validate_member(inline)?;
    }
    let mut member_indent: Option<usize> = None;
    for line in block.content_lines() {
        let indent = indentation_of(line);
        let level = *member_indent.get_or_insert(indent);
        if indent <= level {
            validate_member(line.trim())?;
        }
    }
    Ok(())
}

fn indentation_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// A member is one of: a (possibly `async`) method header, an attribute
/// assignment, a docstring, or `pass`. Comments and decorators pass
/// through. Member bodies are not inspected.
pub fn validate_member(member: &str) -> Result<(), SourceError> {
    let member = member.trim();
    if member == "pass"
        || member.starts_with('"')
        || member.starts_with('\'')
        || member.starts_with('#')
        || member.starts_with('@')
    {
        return Ok(());
    }
    let stripped = member
        .strip_prefix("async ")
        .map(str::trim_start)
        .unwrap_or(member);
    if let Some(rest) = stripped.strip_prefix("def") {
        if rest.starts_with(|c: char| c.is_whitespace()) {
            return validate_method_header(rest.trim_start(), member);
        }
    }
    if is_assignment(member) {
        return Ok(());
    }
    Err(SourceError::MalformedMember {
        line: member.to_string(),
    })
}

/// `NAME ( ... ) : [opaque inline body]`
fn validate_method_header(rest: &str, full: &str) -> Result<(), SourceError> {
    let malformed = || SourceError::MalformedMember {
        line: full.to_string(),
    };

    if !rest.starts_with(is_ident_start) {
        return Err(malformed());
    }
    let name_end = rest
        .char_indices()
        .find(|&(_, c)| !is_ident_continue(c))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());

    let tail = rest[name_end..].trim_start();
    let params = tail.strip_prefix('(').ok_or_else(malformed)?;
    let mut depth = 1usize;
    let mut close = None;
    for (idx, c) in params.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(idx);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close.ok_or_else(malformed)?;
    let after = params[close + 1..].trim_start();
    if after.starts_with(':') {
        Ok(())
    } else {
        Err(malformed())
    }
}

/// `NAME = <opaque>` (but not `==`).
fn is_assignment(member: &str) -> bool {
    if !member.starts_with(is_ident_start) {
        return false;
    }
    let name_end = member
        .char_indices()
        .find(|&(_, c)| !is_ident_continue(c))
        .map(|(idx, _)| idx)
        .unwrap_or(member.len());
    let rest = member[name_end..].trim_start();
    rest.starts_with('=') && !rest.starts_with("==")
}
