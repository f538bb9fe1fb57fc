//! Error types surfaced by lexing and parsing Jack source.

use std::io;

use thiserror::Error;

/// Fatal errors that abort an analysis run.
#[derive(Debug, Error)]
pub enum JackError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("line {line}: unexpected character '{ch}'")]
    Lex { line: usize, ch: char },

    #[error("line {line}: unterminated string constant")]
    UnterminatedString { line: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unexpected end of input while parsing {context}")]
    UnexpectedEof { context: &'static str },
}

pub type Result<T> = std::result::Result<T, JackError>;
