//! Errors produced while lexing and parsing declaration headers and
//! validating block bodies against the member grammar.
use thiserror::Error;

use crate::source::parser::DEFINITION_KEYWORD;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unexpected character '{character}' at column {column} of '{line}'")]
    UnexpectedCharacter {
        character: char,
        column: usize,
        line: String,
    },

    #[error("line does not start with the '{keyword}' keyword: '{line}'", keyword = DEFINITION_KEYWORD)]
    MissingKeyword { line: String },

    #[error("definition header declares no name: '{line}'")]
    MissingName { line: String },

    #[error("unterminated base list in '{line}'")]
    UnterminatedBaseList { line: String },

    #[error("definition header is missing its ':' terminator: '{line}'")]
    MissingTerminator { line: String },

    #[error("unrecognizable member: '{line}'")]
    MalformedMember { line: String },
}
