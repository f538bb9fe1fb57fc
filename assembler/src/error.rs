//! Error types surfaced by the assembler's two-pass translation.

use std::io;

use thiserror::Error;

/// Fatal errors that abort an assembly run.
///
/// The assembler is a batch tool: every error is reported with enough
/// context (a path or a source line number) to locate the problem, and
/// there is no partial-output recovery path.
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("line {line}: unknown computation mnemonic '{mnemonic}'")]
    UnknownComp { line: usize, mnemonic: String },

    #[error("line {line}: malformed C-instruction '{text}'")]
    MalformedInstruction { line: usize, text: String },

    #[error("line {line}: address {value} exceeds the 15-bit address space (max 32767)")]
    AddressOverflow { line: usize, value: u32 },
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
