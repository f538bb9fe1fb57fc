//! Error types surfaced by VM-to-assembly translation.

use std::io;

use thiserror::Error;

/// Fatal errors that abort a translation run.
///
/// Like the assembler, the VM translator is a batch tool: every error
/// carries a source path or line so the failure can be located, and there
/// is no partial-output recovery path.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{path}: {source}")]
    File { path: String, source: io::Error },

    #[error("line {line}: unknown command '{text}'")]
    UnknownCommand { line: usize, text: String },

    #[error("line {line}: unknown arithmetic mnemonic '{mnemonic}'")]
    UnknownArithmetic { line: usize, mnemonic: String },

    #[error("line {line}: unknown segment '{segment}'")]
    UnknownSegment { line: usize, segment: String },

    #[error("line {line}: malformed command '{text}' (expected {expected} argument(s))")]
    MalformedArity {
        line: usize,
        text: String,
        expected: usize,
    },

    #[error("line {line}: invalid index '{text}'")]
    InvalidIndex { line: usize, text: String },
}

pub type Result<T> = std::result::Result<T, VmError>;
