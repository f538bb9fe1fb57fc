//! Lexer, recursive-descent parser, and XML parse-tree emitter for the
//! Jack language.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod xml;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{JackError, Result};

/// Analyzes a single `.jack` file, writing its XML parse tree to a sibling
/// `.xml` file.
pub fn analyze_file(input: &Path) -> Result<PathBuf> {
    let source = fs::read_to_string(input).map_err(|source| JackError::Read {
        path: input.display().to_string(),
        source,
    })?;

    let stripped = lexer::strip_comments(&source);
    let tokens = lexer::tokenize(&stripped)?;
    let tree = parser::Parser::new(&tokens).parse_class()?;
    let xml = xml::render(&tree).join("\n");

    let output = hack_common::sibling_with_extension(input, "xml");
    fs::write(&output, format!("{xml}\n")).map_err(|source| JackError::Write {
        path: output.display().to_string(),
        source,
    })?;

    log::info!("wrote {}", output.display());
    Ok(output)
}

/// Analyzes every `.jack` file in `dir`, in lexicographic order.
pub fn analyze_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();
    for path in hack_common::discover_jack_files(dir)? {
        outputs.push(analyze_file(&path)?);
    }
    Ok(outputs)
}
