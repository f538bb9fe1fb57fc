//! VM Translator for the `Nand2Tetris` Hack platform
//!
//! Lowers the stack-based Hack VM intermediate representation into Hack
//! assembly.
//!
//! # Architecture
//! - [`parser`]: splits a `.vm` file into commands, stripping comments
//! - [`codegen`]: emits assembly for each command, owning the label
//!   counters and the current function scope
//! - [`error`]: fatal error types for malformed input
//!
//! # Example
//! ```rust
//! use vm_translator::codegen::CodeWriter;
//!
//! let mut writer = CodeWriter::new(Vec::new());
//! writer.write_arithmetic("add", 1).unwrap();
//! writer.flush().unwrap();
//! ```

#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc)]

pub mod codegen;
pub mod error;
pub mod parser;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use error::{Result, VmError};

use codegen::CodeWriter;
use parser::{CommandType, Parser};

/// Translates every command in `path` through `writer`, updating `writer`'s
/// filename (for `static` segment namespacing) first.
pub fn translate_file<W: Write>(path: &Path, writer: &mut CodeWriter<W>) -> Result<()> {
    writer.set_filename(hack_common::file_stem(path));

    let mut parser = Parser::new(path)?;
    while parser.has_more_commands() {
        parser.advance();
        let line = parser.line_number();

        match parser.command_type()? {
            CommandType::Arithmetic => writer.write_arithmetic(parser.arg1()?, line)?,
            CommandType::Push => {
                writer.write_push_pop(true, parser.arg1()?, parser.arg2()?, line)?;
            }
            CommandType::Pop => {
                writer.write_push_pop(false, parser.arg1()?, parser.arg2()?, line)?;
            }
            CommandType::Label => writer.write_label(parser.arg1()?)?,
            CommandType::Goto => writer.write_goto(parser.arg1()?)?,
            CommandType::If => writer.write_if(parser.arg1()?)?,
            CommandType::Function => {
                writer.write_function(parser.arg1()?, parser.arg2()?)?;
            }
            CommandType::Call => writer.write_call(parser.arg1()?, parser.arg2()?)?,
            CommandType::Return => writer.write_return()?,
        }
    }

    Ok(())
}

/// Translates a single `.vm` file into a sibling `.asm` file.
///
/// Per the single-file-mode contract, the bootstrap prelude is an opt-in:
/// single-file output is a linkable fragment suitable for unit testing by
/// default.
pub fn translate_single_file(input: &Path, with_bootstrap: bool) -> Result<std::path::PathBuf> {
    let output_path = hack_common::vm_output_path(input);
    let output_file = File::create(&output_path).map_err(|source| VmError::Write {
        path: output_path.display().to_string(),
        source,
    })?;
    let mut writer = CodeWriter::new(BufWriter::new(output_file));

    if with_bootstrap {
        writer.write_bootstrap()?;
    }
    translate_file(input, &mut writer)?;
    writer.flush()?;

    Ok(output_path)
}

/// Translates every `.vm` file directly inside `dir`, in lexicographic
/// filename order, into a single combined `<dir>/<dir>.asm`, always
/// preceded by the bootstrap prelude.
pub fn translate_directory(dir: &Path) -> Result<std::path::PathBuf> {
    let vm_files = hack_common::discover_vm_files(dir).map_err(|source| VmError::Read {
        path: dir.display().to_string(),
        source,
    })?;

    let output_path = hack_common::vm_output_path(dir);
    let output_file = File::create(&output_path).map_err(|source| VmError::Write {
        path: output_path.display().to_string(),
        source,
    })?;
    let mut writer = CodeWriter::new(BufWriter::new(output_file));

    writer.write_bootstrap()?;
    for vm_file in &vm_files {
        log::debug!("translating {}", vm_file.display());
        translate_file(vm_file, &mut writer)?;
    }
    writer.flush()?;

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_vm(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("vm-translator-test-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_single_file_translation_omits_bootstrap() {
        let dir = temp_dir("single");
        let input = write_temp_vm(&dir, "Add.vm", "push constant 7\npush constant 8\nadd\n");

        let output = translate_single_file(&input, false).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(!text.contains("call Sys.init"));
        assert!(text.contains("@7"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_directory_translation_bootstraps_and_sorts_files() {
        let dir = temp_dir("dir");
        write_temp_vm(&dir, "Zeta.vm", "push constant 1\n");
        write_temp_vm(&dir, "Alpha.vm", "push constant 2\n");

        let output = translate_directory(&dir).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();

        assert!(text.contains("call Sys.init"));
        let alpha_pos = text.find("@2").unwrap();
        let zeta_pos = text.find("@1").unwrap();
        assert!(alpha_pos < zeta_pos, "Alpha.vm must translate before Zeta.vm");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_function_call_return_round_trip() {
        let dir = temp_dir("callret");
        let input = write_temp_vm(
            &dir,
            "Main.vm",
            "function Main.main 0\n\
             push constant 5\n\
             call Main.identity 1\n\
             return\n\
             function Main.identity 0\n\
             push argument 0\n\
             return\n",
        );

        let output = translate_single_file(&input, false).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("(Main.main)"));
        assert!(text.contains("(Main.identity)"));
        assert!(text.contains("Main.identity$ret.1"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
