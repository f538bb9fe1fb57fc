//! Hack Assembler - Main Entry Point
//!
//! A two-pass assembler for the Hack assembly language.
//!
//! # Architecture
//! - **Pass 1**: Builds the symbol table by recording label positions
//! - **Pass 2**: Generates machine code, resolving all symbols
//!
//! # Usage
//! ```bash
//! assembler <input.asm>
//! ```
//!
//! Set `VERBOSE=1` to trace symbol resolution and instruction encoding.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use assembler::code::{self, InvalidField};
use assembler::error::{AssemblerError, Result};
use assembler::parser::{CommandType, ParserLines};
use assembler::symbol_table::SymbolTable;

/// Reads assembly file into memory
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|source| AssemblerError::Read {
        path: path.display().to_string(),
        source,
    })?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|source| AssemblerError::Read {
            path: path.display().to_string(),
            source,
        })
}

/// First pass: Build symbol table with label addresses
///
/// Scans through all lines and records the ROM address of each label.
/// Label definitions (L-commands) don't generate code, so they don't
/// increment the ROM address counter.
fn first_pass(lines: &[String], symbol_table: &mut SymbolTable) {
    let mut rom_address = 0u16;
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        match parser.command_type().expect("advance() guarantees a command") {
            CommandType::LCommand => {
                // Labels mark the next instruction's address
                let symbol = parser.symbol().expect("L-commands always carry a symbol");
                symbol_table.add_entry(symbol, rom_address);
            }
            CommandType::ACommand | CommandType::CCommand => {
                // Actual instructions increment the address
                rom_address += 1;
            }
        }
    }
}

/// Second pass: Generate machine code
///
/// Translates each instruction to binary:
/// - A-commands: Resolve symbols to addresses, rejecting values past the
///   15-bit address space
/// - C-commands: Encode dest, comp, and jump fields, rejecting unknown
///   mnemonics
/// - L-commands: Skip (already processed in pass 1)
fn second_pass(
    lines: &[String],
    symbol_table: &mut SymbolTable,
    writer: &mut impl Write,
) -> Result<()> {
    let mut ram_address = 16u16; // Variables start at RAM[16]
    let mut parser = ParserLines::from_lines(lines);

    while parser.advance() {
        let line_number = parser.line_number();
        match parser.command_type().expect("advance() guarantees a command") {
            CommandType::ACommand => {
                let symbol = parser.symbol().expect("A-commands always carry a symbol");

                let address = match symbol.parse::<u32>() {
                    Ok(value) if value > 0x7FFF => {
                        return Err(AssemblerError::AddressOverflow {
                            line: line_number,
                            value,
                        });
                    }
                    Ok(value) => value as u16,
                    Err(_) => symbol_table.get_or_insert(symbol, &mut ram_address),
                };
                log::debug!("line {line_number}: @{symbol} -> {address}");

                let instruction = code::encode_a_instruction(address);
                writeln!(writer, "{instruction}")?;
            }
            CommandType::CCommand => {
                let dest = parser.dest().expect("advance() guarantees a command").unwrap_or("");
                let comp = parser.comp().expect("advance() guarantees a command").unwrap_or("");
                let jump = parser.jump().expect("advance() guarantees a command").unwrap_or("");

                let instruction = code::try_encode_c_instruction(dest, comp, jump).map_err(
                    |field| match field {
                        InvalidField::Comp => AssemblerError::UnknownComp {
                            line: line_number,
                            mnemonic: comp.to_string(),
                        },
                        InvalidField::Dest | InvalidField::Jump => {
                            AssemblerError::MalformedInstruction {
                                line: line_number,
                                text: parser.raw_line().to_string(),
                            }
                        }
                    },
                )?;
                log::debug!("line {line_number}: {} -> {instruction}", parser.raw_line());
                writeln!(writer, "{instruction}")?;
            }
            CommandType::LCommand => {}
        }
    }

    writer.flush()?;
    Ok(())
}

/// Determines the output file path: `<input>.hack` next to the source.
fn output_path(input: &Path) -> PathBuf {
    hack_common::sibling_with_extension(input, "hack")
}

fn run(input_path: &Path) -> Result<PathBuf> {
    // Read source file
    let lines = read_lines(input_path)?;

    // Initialize symbol table with predefined symbols
    let mut symbol_table = SymbolTable::new();

    // Pass 1: Build symbol table
    first_pass(&lines, &mut symbol_table);

    // Pass 2: Generate machine code
    let output = output_path(input_path);
    let output_file = File::create(&output).map_err(|source| AssemblerError::Write {
        path: output.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(output_file);

    second_pass(&lines, &mut symbol_table, &mut writer)?;

    Ok(output)
}

fn main() {
    hack_common::init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        let program = args.first().map_or("assembler", String::as_str);
        eprintln!("Usage: {program} <input.asm>");
        process::exit(1);
    }

    let input_path = Path::new(&args[1]);
    match run(input_path) {
        Ok(output) => println!("Assembly completed. Output written to {}", output.display()),
        Err(err) => {
            eprintln!("assembler: {err}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_generation() {
        assert_eq!(output_path(Path::new("test.asm")), Path::new("test.hack"));
        assert_eq!(
            output_path(Path::new("dir/file.asm")),
            Path::new("dir/file.hack")
        );
        assert_eq!(
            output_path(Path::new("path/to/file.asm")),
            Path::new("path/to/file.hack")
        );
    }

    #[test]
    fn test_end_to_end_add_program() {
        let lines: Vec<String> = "// Computes 2 + 3\n@2\nD=A\n@3\nD=D+A\n@0\nM=D\n"
            .lines()
            .map(str::to_string)
            .collect();

        let mut symbol_table = SymbolTable::new();
        first_pass(&lines, &mut symbol_table);

        let mut output = Vec::new();
        second_pass(&lines, &mut symbol_table, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let out_lines: Vec<&str> = text.lines().collect();

        assert_eq!(out_lines.len(), 6);
        for line in &out_lines {
            assert_eq!(line.len(), 16);
            assert!(line.bytes().all(|b| b == b'0' || b == b'1'));
        }
        assert_eq!(out_lines[0], "0000000000000010"); // @2
        assert_eq!(out_lines[1], "1110110000010000"); // D=A
    }

    #[test]
    fn test_second_pass_rejects_unknown_comp() {
        let lines = vec!["D=XYZ".to_string()];
        let mut symbol_table = SymbolTable::new();
        first_pass(&lines, &mut symbol_table);

        let mut output = Vec::new();
        let err = second_pass(&lines, &mut symbol_table, &mut output).unwrap_err();
        assert!(matches!(err, AssemblerError::UnknownComp { line: 1, .. }));
    }

    #[test]
    fn test_second_pass_rejects_oversized_address() {
        let lines = vec!["@40000".to_string()];
        let mut symbol_table = SymbolTable::new();
        first_pass(&lines, &mut symbol_table);

        let mut output = Vec::new();
        let err = second_pass(&lines, &mut symbol_table, &mut output).unwrap_err();
        assert!(matches!(
            err,
            AssemblerError::AddressOverflow { line: 1, value: 40000 }
        ));
    }

    #[test]
    fn test_second_pass_resolves_labels_across_passes() {
        let lines: Vec<String> = vec![
            "(LOOP)".to_string(),
            "@LOOP".to_string(),
            "0;JMP".to_string(),
        ];
        let mut symbol_table = SymbolTable::new();
        first_pass(&lines, &mut symbol_table);
        assert_eq!(symbol_table.get_address("LOOP"), 0);

        let mut output = Vec::new();
        second_pass(&lines, &mut symbol_table, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let out_lines: Vec<&str> = text.lines().collect();
        assert_eq!(out_lines[0], "0000000000000000");
    }
}
