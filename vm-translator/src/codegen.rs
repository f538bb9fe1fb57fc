//! Code generation module for the Hack VM language
//!
//! Translates VM commands to Hack assembly. Every emission is a
//! straightforward, non-peephole expansion; no instruction-level
//! optimization is attempted.

use std::io::Write;

use crate::error::{Result, VmError};

/// Per-translation-unit mutable state: label counters and the current
/// function scope. Owned by the caller and threaded through explicitly,
/// rather than held as process-wide globals, so a single process can run
/// multiple independent translations.
pub struct CodeWriter<W: Write> {
    output: W,
    /// Shared monotonic counter for eq/lt/gt comparison label pairs.
    compare_counter: usize,
    /// Shared monotonic counter for call-site return labels.
    call_counter: usize,
    /// Name of the `.vm` file currently being translated (no extension),
    /// used for `static` segment namespacing.
    filename: String,
    /// `<file>.<function>$` prefix applied to `label`/`goto`/`if-goto`
    /// inside the current function body; empty before the first
    /// `function` command.
    function_prefix: String,
}

enum Segment {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl Segment {
    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(Self::Local),
            "argument" => Some(Self::Argument),
            "this" => Some(Self::This),
            "that" => Some(Self::That),
            "temp" => Some(Self::Temp),
            "pointer" => Some(Self::Pointer),
            "static" => Some(Self::Static),
            "constant" => Some(Self::Constant),
            _ => None,
        }
    }

    /// Base-pointer symbol for the four dynamically addressable segments.
    fn base_symbol(&self) -> Option<&'static str> {
        match self {
            Self::Local => Some("LCL"),
            Self::Argument => Some("ARG"),
            Self::This => Some("THIS"),
            Self::That => Some("THAT"),
            _ => None,
        }
    }
}

impl<W: Write> CodeWriter<W> {
    pub fn new(output: W) -> Self {
        CodeWriter {
            output,
            compare_counter: 0,
            call_counter: 0,
            filename: String::new(),
            function_prefix: String::new(),
        }
    }

    /// Sets the current input file's base name, used for `static i`
    /// namespacing (`RAM[<File>.i]`).
    pub fn set_filename(&mut self, filename: &str) {
        self.filename.clear();
        self.filename.push_str(filename);
    }

    /// Emits the bootstrap prelude for directory-mode translation:
    /// `SP=256` followed by `call Sys.init 0`.
    pub fn write_bootstrap(&mut self) -> Result<()> {
        writeln!(self.output, "// bootstrap: SP=256; call Sys.init 0")?;
        writeln!(self.output, "@256")?;
        writeln!(self.output, "D=A")?;
        writeln!(self.output, "@SP")?;
        writeln!(self.output, "M=D")?;
        self.write_call("Sys.init", 0)
    }

    pub fn write_arithmetic(&mut self, command: &str, line: usize) -> Result<()> {
        writeln!(self.output, "// {command}")?;
        match command {
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("M-D"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_neg(),
            "not" => self.write_unary_op("!M"),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => Err(VmError::UnknownArithmetic {
                line,
                mnemonic: other.to_string(),
            }),
        }
    }

    /// Pops y into D, then leaves `D <op> M` where M is the new top (x).
    /// `op` is written from x's perspective: `D+M`=x+y, `M-D`=x-y, etc.
    fn write_binary_op(&mut self, op: &str) -> Result<()> {
        writeln!(
            self.output,
            "@SP\nAM=M-1\nD=M\nA=A-1\nM={op}",
        )?;
        Ok(())
    }

    fn write_unary_neg(&mut self) -> Result<()> {
        writeln!(self.output, "@SP\nA=M-1\nM=-M")?;
        Ok(())
    }

    fn write_unary_op(&mut self, op: &str) -> Result<()> {
        writeln!(self.output, "@SP\nA=M-1\nM={op}")?;
        Ok(())
    }

    /// Each comparison gets a unique forward label pair so repeated
    /// emissions never collide within one output (VM P1).
    fn write_comparison(&mut self, jump: &str) -> Result<()> {
        self.compare_counter += 1;
        let n = self.compare_counter;
        let prefix = match jump {
            "JEQ" => "EQ",
            "JGT" => "GT",
            "JLT" => "LT",
            _ => jump,
        };

        writeln!(
            self.output,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             A=A-1\n\
             D=M-D\n\
             M=-1\n\
             @{prefix}TRUE_{n}\n\
             D;{jump}\n\
             @SP\n\
             A=M-1\n\
             M=0\n\
             ({prefix}TRUE_{n})",
        )?;
        Ok(())
    }

    pub fn write_push_pop(
        &mut self,
        is_push: bool,
        segment: &str,
        index: i32,
        line: usize,
    ) -> Result<()> {
        writeln!(
            self.output,
            "// {} {} {}",
            if is_push { "push" } else { "pop" },
            segment,
            index
        )?;

        if is_push {
            self.write_push(segment, index, line)
        } else {
            self.write_pop(segment, index, line)
        }
    }

    fn write_push(&mut self, segment: &str, index: i32, line: usize) -> Result<()> {
        let seg = Segment::parse(segment).ok_or_else(|| VmError::UnknownSegment {
            line,
            segment: segment.to_string(),
        })?;

        match seg {
            Segment::Constant => {
                writeln!(self.output, "@{index}\nD=A")?;
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = seg.base_symbol().expect("addressable segment has a base symbol");
                writeln!(self.output, "@{base}\nD=M\n@{index}\nA=D+A\nD=M")?;
            }
            Segment::Temp => {
                writeln!(self.output, "@{}\nD=M", 5 + index)?;
            }
            Segment::Pointer => {
                let symbol = if index == 0 { "THIS" } else { "THAT" };
                writeln!(self.output, "@{symbol}\nD=M")?;
            }
            Segment::Static => {
                writeln!(self.output, "@{}.{}\nD=M", self.filename, index)?;
            }
        }

        self.write_push_d()
    }

    fn write_pop(&mut self, segment: &str, index: i32, line: usize) -> Result<()> {
        let seg = Segment::parse(segment).ok_or_else(|| VmError::UnknownSegment {
            line,
            segment: segment.to_string(),
        })?;

        match seg {
            Segment::Constant => Err(VmError::UnknownSegment {
                line,
                segment: "constant (not poppable)".to_string(),
            }),
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = seg.base_symbol().expect("addressable segment has a base symbol");
                writeln!(self.output, "@{base}\nD=M\n@{index}\nD=D+A\n@R13\nM=D")?;
                self.write_pop_to_d()?;
                writeln!(self.output, "@R13\nA=M\nM=D")?;
                Ok(())
            }
            Segment::Temp => {
                writeln!(self.output, "@{}\nD=A\n@R13\nM=D", 5 + index)?;
                self.write_pop_to_d()?;
                writeln!(self.output, "@R13\nA=M\nM=D")?;
                Ok(())
            }
            Segment::Pointer => {
                let symbol = if index == 0 { "THIS" } else { "THAT" };
                self.write_pop_to_d()?;
                writeln!(self.output, "@{symbol}\nM=D")?;
                Ok(())
            }
            Segment::Static => {
                self.write_pop_to_d()?;
                writeln!(self.output, "@{}.{}\nM=D", self.filename, index)?;
                Ok(())
            }
        }
    }

    fn write_push_d(&mut self) -> Result<()> {
        writeln!(self.output, "@SP\nAM=M+1\nA=A-1\nM=D")?;
        Ok(())
    }

    fn write_pop_to_d(&mut self) -> Result<()> {
        writeln!(self.output, "@SP\nAM=M-1\nD=M")?;
        Ok(())
    }

    /// `label L` - namespaced to the current function.
    pub fn write_label(&mut self, name: &str) -> Result<()> {
        writeln!(self.output, "({}{})", self.function_prefix, name)?;
        Ok(())
    }

    /// `goto L` - namespaced to the current function.
    pub fn write_goto(&mut self, name: &str) -> Result<()> {
        writeln!(self.output, "@{}{}\n0;JMP", self.function_prefix, name)?;
        Ok(())
    }

    /// `if-goto L` - pops the top of the stack and branches if nonzero.
    pub fn write_if(&mut self, name: &str) -> Result<()> {
        self.write_pop_to_d()?;
        writeln!(self.output, "@{}{}\nD;JNE", self.function_prefix, name)?;
        Ok(())
    }

    /// `function f n` - emits the entry label, zero-initializes `n`
    /// locals, and updates the function-scope label prefix.
    pub fn write_function(&mut self, name: &str, n_locals: i32) -> Result<()> {
        writeln!(self.output, "({name})")?;
        for _ in 0..n_locals {
            writeln!(self.output, "@SP\nAM=M+1\nA=A-1\nM=0")?;
        }
        self.function_prefix = format!("{}.{}$", self.filename, name);
        Ok(())
    }

    /// `call f m` - five-word call frame, then jump to `f`.
    ///
    /// Each call site gets a unique return label so recursive and repeated
    /// calls never collide within one output (VM P1).
    pub fn write_call(&mut self, name: &str, n_args: i32) -> Result<()> {
        self.call_counter += 1;
        let return_label = format!("{name}$ret.{}", self.call_counter);

        writeln!(self.output, "@{return_label}\nD=A")?;
        self.write_push_d()?;
        for base in ["LCL", "ARG", "THIS", "THAT"] {
            writeln!(self.output, "@{base}\nD=M")?;
            self.write_push_d()?;
        }

        // ARG = SP - 5 - n_args
        writeln!(
            self.output,
            "@SP\nD=M\n@{}\nD=D-A\n@ARG\nM=D",
            5 + n_args
        )?;
        // LCL = SP
        writeln!(self.output, "@SP\nD=M\n@LCL\nM=D")?;
        writeln!(self.output, "@{name}\n0;JMP")?;
        writeln!(self.output, "({return_label})")?;
        Ok(())
    }

    /// `return` - the standard 9-step epilogue (VM P3):
    /// stash frame and return address, store the result at `*ARG`,
    /// collapse the stack to `ARG+1`, restore the caller's segment
    /// pointers, then jump indirectly to the return address.
    pub fn write_return(&mut self) -> Result<()> {
        // frame = LCL (R13)
        writeln!(self.output, "@LCL\nD=M\n@R13\nM=D")?;
        // retAddr = *(frame - 5) (R14)
        writeln!(self.output, "@R13\nD=M\n@5\nA=D-A\nD=M\n@R14\nM=D")?;
        // *ARG = pop()
        self.write_pop_to_d()?;
        writeln!(self.output, "@ARG\nA=M\nM=D")?;
        // SP = ARG + 1
        writeln!(self.output, "@ARG\nD=M+1\n@SP\nM=D")?;
        // THAT = *(frame - 1), THIS = *(frame - 2), ARG = *(frame - 3), LCL = *(frame - 4)
        for (offset, dest) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            writeln!(
                self.output,
                "@R13\nD=M\n@{offset}\nA=D-A\nD=M\n@{dest}\nM=D"
            )?;
        }
        // goto retAddr
        writeln!(self.output, "@R14\nA=M\n0;JMP")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }
}
