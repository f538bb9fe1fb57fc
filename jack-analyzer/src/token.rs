//! Token types produced by the lexer.

pub const KEYWORDS: &[&str] = &[
    "class", "constructor", "function", "method", "field", "static", "var", "int", "char",
    "boolean", "void", "true", "false", "null", "this", "let", "do", "if", "else", "while",
    "return",
];

pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(&'static str),
    Symbol(char),
    IntegerConstant(u16),
    StringConstant(String),
    Identifier(String),
}
