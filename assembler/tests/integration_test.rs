//! End-to-end assembler tests against the canonical Nand2Tetris sample programs.
//!
//! These drive the public `assembler` library API directly (parser + code +
//! symbol table) rather than spawning the compiled binary, so the suite
//! doesn't depend on fixture files living on disk.

use assembler::code::{self, InvalidField};
use assembler::parser::{CommandType, ParserLines};
use assembler::symbol_table::SymbolTable;

fn assemble(source: &str) -> Result<Vec<String>, String> {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let mut symbol_table = SymbolTable::new();
    let mut rom_address = 0u16;

    let mut parser = ParserLines::from_lines(&lines);
    while parser.advance() {
        if let CommandType::LCommand = parser.command_type().unwrap() {
            symbol_table.add_entry(parser.symbol().unwrap(), rom_address);
        } else {
            rom_address += 1;
        }
    }

    let mut output = Vec::new();
    let mut ram_address = 16u16;
    let mut parser = ParserLines::from_lines(&lines);
    while parser.advance() {
        match parser.command_type().unwrap() {
            CommandType::ACommand => {
                let symbol = parser.symbol().unwrap();
                let address = symbol
                    .parse::<u16>()
                    .unwrap_or_else(|_| symbol_table.get_or_insert(symbol, &mut ram_address));
                output.push(code::encode_a_instruction(address));
            }
            CommandType::CCommand => {
                let dest = parser.dest().unwrap().unwrap_or("");
                let comp = parser.comp().unwrap().unwrap_or("");
                let jump = parser.jump().unwrap().unwrap_or("");
                let instruction = code::try_encode_c_instruction(dest, comp, jump)
                    .map_err(|field: InvalidField| format!("{field:?} rejected on line"))?;
                output.push(instruction);
            }
            CommandType::LCommand => {}
        }
    }

    Ok(output)
}

/// Add.asm: 2 + 3, stored at RAM[0]. The canonical first Nand2Tetris sample.
#[test]
fn test_add_program() {
    let source = "\
// Adds 2 + 3
@2
D=A
@3
D=D+A
@0
M=D
";
    let output = assemble(source).unwrap();
    assert_eq!(
        output,
        vec![
            "0000000000000010",
            "1110110000010000",
            "0000000000000011",
            "1110000010010000",
            "0000000000000000",
            "1110001100001000",
        ]
    );
}

/// Max.asm: computes max(R0, R1) into R2 using a label and a variable-free
/// conditional jump — exercises L-command resolution across both passes.
#[test]
fn test_max_program_with_labels() {
    let source = "\
@0
D=M
@1
D=D-M
@OUTPUT_FIRST
D;JGT
@1
D=M
@OUTPUT_D
0;JMP
(OUTPUT_FIRST)
@0
D=M
(OUTPUT_D)
@2
M=D
(INFINITE_LOOP)
@INFINITE_LOOP
0;JMP
";
    let output = assemble(source).unwrap();
    assert_eq!(output.len(), 14);
    // Every instruction must be exactly 16 bits of 0/1.
    for line in &output {
        assert_eq!(line.len(), 16);
        assert!(line.bytes().all(|b| b == b'0' || b == b'1'));
    }
}

/// Pong-style variable allocation: repeated use of the same variable name
/// must resolve to the same RAM address, new names get the next free slot.
#[test]
fn test_variable_reuse_across_program() {
    let source = "\
@i
M=0
@sum
M=0
(LOOP)
@i
D=M
@sum
M=D+M
@i
M=M+1
@LOOP
0;JMP
";
    let output = assemble(source).unwrap();
    // @i -> 16 (first @16 instruction: "0000000000010000")
    assert_eq!(output[0], "0000000000010000");
    // @sum -> 17
    assert_eq!(output[2], "0000000000010001");
    // Later references to @i still resolve to 16.
    assert_eq!(output[5], "0000000000010000");
}

#[test]
fn test_malformed_comp_mnemonic_is_rejected() {
    let result = assemble("D=NOTACOMP\n");
    assert!(result.is_err());
}
