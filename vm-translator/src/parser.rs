//! Parser module for the Hack VM language
//!
//! Reads a `.vm` file into memory, strips comments and blank lines, and
//! exposes each remaining command one at a time with its verb and
//! arguments split out.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, VmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
}

pub struct Parser {
    /// (1-based source line number, cleaned command text)
    lines: Vec<(usize, String)>,
    current_line: usize,
    current_line_number: usize,
    current_command: String,
    cached_parts: Vec<String>,
}

impl Parser {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| VmError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| VmError::Read {
                path: path.display().to_string(),
                source,
            })?;

            let stripped = match line.find("//") {
                Some(pos) => &line[..pos],
                None => &line,
            };
            let trimmed = stripped.trim();

            if !trimmed.is_empty() {
                lines.push((index + 1, trimmed.to_string()));
            }
        }

        Ok(Parser {
            lines,
            current_line: 0,
            current_line_number: 0,
            current_command: String::new(),
            cached_parts: Vec::new(),
        })
    }

    #[inline]
    #[must_use]
    pub fn has_more_commands(&self) -> bool {
        self.current_line < self.lines.len()
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.has_more_commands() {
            let (line_number, text) = &self.lines[self.current_line];
            self.current_line_number = *line_number;
            self.current_command.clear();
            self.current_command.push_str(text);

            self.cached_parts.clear();
            self.cached_parts
                .extend(self.current_command.split_whitespace().map(str::to_string));

            self.current_line += 1;
        }
    }

    /// 1-based source line number of the command currently being parsed.
    #[inline]
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.current_line_number
    }

    /// The current command's cleaned source text, for error messages.
    #[inline]
    #[must_use]
    pub fn raw_command(&self) -> &str {
        &self.current_command
    }

    pub fn command_type(&self) -> Result<CommandType> {
        let verb = self.cached_parts.first().ok_or_else(|| VmError::UnknownCommand {
            line: self.current_line_number,
            text: self.current_command.clone(),
        })?;

        Ok(match verb.as_str() {
            "push" => CommandType::Push,
            "pop" => CommandType::Pop,
            "label" => CommandType::Label,
            "goto" => CommandType::Goto,
            "if-goto" => CommandType::If,
            "function" => CommandType::Function,
            "return" => CommandType::Return,
            "call" => CommandType::Call,
            "add" | "sub" | "neg" | "eq" | "gt" | "lt" | "and" | "or" | "not" => {
                CommandType::Arithmetic
            }
            _ => {
                return Err(VmError::UnknownCommand {
                    line: self.current_line_number,
                    text: self.current_command.clone(),
                });
            }
        })
    }

    /// First argument: the arithmetic mnemonic, segment name, or label name.
    pub fn arg1(&self) -> Result<&str> {
        match self.command_type()? {
            CommandType::Arithmetic => Ok(&self.cached_parts[0]),
            CommandType::Return => Err(VmError::MalformedArity {
                line: self.current_line_number,
                text: self.current_command.clone(),
                expected: 0,
            }),
            _ => self.cached_parts.get(1).map(String::as_str).ok_or_else(|| {
                VmError::MalformedArity {
                    line: self.current_line_number,
                    text: self.current_command.clone(),
                    expected: 1,
                }
            }),
        }
    }

    /// Second argument: an index (push/pop) or count (function/call).
    pub fn arg2(&self) -> Result<i32> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let text = self.cached_parts.get(2).ok_or_else(|| VmError::MalformedArity {
                    line: self.current_line_number,
                    text: self.current_command.clone(),
                    expected: 2,
                })?;
                text.parse().map_err(|_| VmError::InvalidIndex {
                    line: self.current_line_number,
                    text: text.clone(),
                })
            }
            _ => Err(VmError::MalformedArity {
                line: self.current_line_number,
                text: self.current_command.clone(),
                expected: 2,
            }),
        }
    }
}
