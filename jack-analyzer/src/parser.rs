//! Recursive-descent parser for the Jack grammar.
//!
//! Builds an [`ast::Node`] tree; XML emission is a separate fold over that
//! tree (see [`crate::xml`]), so the grammar-matching logic here never
//! touches text formatting.

use crate::ast::Node;
use crate::error::{JackError, Result};
use crate::lexer::SpannedToken;
use crate::token::Token;

const TYPE_KEYWORDS: &[&str] = &["int", "char", "boolean"];
const KEYWORD_CONSTANTS: &[&str] = &["true", "false", "null", "this"];
const OPERATORS: &[char] = &['+', '-', '*', '/', '&', '|', '<', '>', '='];

pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parses a full compilation unit: exactly one `class` declaration.
    pub fn parse_class(&mut self) -> Result<Node> {
        let mut children = Vec::new();
        children.push(self.eat_keyword("class")?);
        children.push(self.eat_identifier()?);
        children.push(self.eat_symbol('{')?);

        while self.peek_is_keyword(&["static", "field"]) {
            children.push(self.parse_class_var_dec()?);
        }
        while self.peek_is_keyword(&["constructor", "function", "method"]) {
            children.push(self.parse_subroutine_dec()?);
        }

        children.push(self.eat_symbol('}')?);
        Ok(Node::non_terminal("class", children))
    }

    fn parse_class_var_dec(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_any_keyword(&["static", "field"])?];
        children.push(self.parse_type()?);
        children.push(self.eat_identifier()?);

        while self.peek_is_symbol(',') {
            children.push(self.eat_symbol(',')?);
            children.push(self.eat_identifier()?);
        }
        children.push(self.eat_symbol(';')?);
        Ok(Node::non_terminal("classVarDec", children))
    }

    fn parse_type(&mut self) -> Result<Node> {
        if self.peek_is_keyword(TYPE_KEYWORDS) {
            self.eat_any_keyword(TYPE_KEYWORDS)
        } else {
            self.eat_identifier()
        }
    }

    fn parse_subroutine_dec(&mut self) -> Result<Node> {
        let mut children =
            vec![self.eat_any_keyword(&["constructor", "function", "method"])?];

        children.push(if self.peek_is_keyword(&["void"]) {
            self.eat_keyword("void")?
        } else {
            self.parse_type()?
        });

        children.push(self.eat_identifier()?);
        children.push(self.eat_symbol('(')?);
        children.push(self.parse_parameter_list()?);
        children.push(self.eat_symbol(')')?);
        children.push(self.parse_subroutine_body()?);

        Ok(Node::non_terminal("subroutineDec", children))
    }

    fn parse_parameter_list(&mut self) -> Result<Node> {
        let mut children = Vec::new();

        if !self.peek_is_symbol(')') {
            children.push(self.parse_type()?);
            children.push(self.eat_identifier()?);

            while self.peek_is_symbol(',') {
                children.push(self.eat_symbol(',')?);
                children.push(self.parse_type()?);
                children.push(self.eat_identifier()?);
            }
        }

        Ok(Node::non_terminal("parameterList", children))
    }

    fn parse_subroutine_body(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_symbol('{')?];

        while self.peek_is_keyword(&["var"]) {
            children.push(self.parse_var_dec()?);
        }
        children.push(self.parse_statements()?);
        children.push(self.eat_symbol('}')?);

        Ok(Node::non_terminal("subroutineBody", children))
    }

    fn parse_var_dec(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_keyword("var")?];
        children.push(self.parse_type()?);
        children.push(self.eat_identifier()?);

        while self.peek_is_symbol(',') {
            children.push(self.eat_symbol(',')?);
            children.push(self.eat_identifier()?);
        }
        children.push(self.eat_symbol(';')?);
        Ok(Node::non_terminal("varDec", children))
    }

    fn parse_statements(&mut self) -> Result<Node> {
        let mut children = Vec::new();
        while self.peek_is_keyword(&["let", "if", "while", "do", "return"]) {
            children.push(self.parse_statement()?);
        }
        Ok(Node::non_terminal("statements", children))
    }

    fn parse_statement(&mut self) -> Result<Node> {
        match self.peek_keyword() {
            Some("let") => self.parse_let_statement(),
            Some("if") => self.parse_if_statement(),
            Some("while") => self.parse_while_statement(),
            Some("do") => self.parse_do_statement(),
            Some("return") => self.parse_return_statement(),
            _ => Err(self.error("expected a statement")),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_keyword("let")?, self.eat_identifier()?];

        if self.peek_is_symbol('[') {
            children.push(self.eat_symbol('[')?);
            children.push(self.parse_expression()?);
            children.push(self.eat_symbol(']')?);
        }

        children.push(self.eat_symbol('=')?);
        children.push(self.parse_expression()?);
        children.push(self.eat_symbol(';')?);
        Ok(Node::non_terminal("letStatement", children))
    }

    fn parse_if_statement(&mut self) -> Result<Node> {
        let mut children = vec![
            self.eat_keyword("if")?,
            self.eat_symbol('(')?,
            self.parse_expression()?,
            self.eat_symbol(')')?,
            self.eat_symbol('{')?,
            self.parse_statements()?,
            self.eat_symbol('}')?,
        ];

        if self.peek_is_keyword(&["else"]) {
            children.push(self.eat_keyword("else")?);
            children.push(self.eat_symbol('{')?);
            children.push(self.parse_statements()?);
            children.push(self.eat_symbol('}')?);
        }

        Ok(Node::non_terminal("ifStatement", children))
    }

    fn parse_while_statement(&mut self) -> Result<Node> {
        let children = vec![
            self.eat_keyword("while")?,
            self.eat_symbol('(')?,
            self.parse_expression()?,
            self.eat_symbol(')')?,
            self.eat_symbol('{')?,
            self.parse_statements()?,
            self.eat_symbol('}')?,
        ];
        Ok(Node::non_terminal("whileStatement", children))
    }

    fn parse_do_statement(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_keyword("do")?];
        children.extend(self.parse_subroutine_call()?);
        children.push(self.eat_symbol(';')?);
        Ok(Node::non_terminal("doStatement", children))
    }

    fn parse_return_statement(&mut self) -> Result<Node> {
        let mut children = vec![self.eat_keyword("return")?];
        if !self.peek_is_symbol(';') {
            children.push(self.parse_expression()?);
        }
        children.push(self.eat_symbol(';')?);
        Ok(Node::non_terminal("returnStatement", children))
    }

    fn parse_expression(&mut self) -> Result<Node> {
        let mut children = vec![self.parse_term()?];
        while self.peek_is_operator() {
            children.push(self.eat_symbol(self.peek_symbol().unwrap())?);
            children.push(self.parse_term()?);
        }
        Ok(Node::non_terminal("expression", children))
    }

    fn parse_term(&mut self) -> Result<Node> {
        let token = self.peek().ok_or(JackError::UnexpectedEof { context: "term" })?.clone();

        let node = match &token.token {
            Token::IntegerConstant(value) => {
                self.advance();
                Node::integer_constant(*value)
            }
            Token::StringConstant(text) => {
                self.advance();
                Node::string_constant(text)
            }
            Token::Keyword(k) if KEYWORD_CONSTANTS.contains(k) => {
                self.advance();
                Node::keyword(k)
            }
            Token::Symbol('(') => {
                let open = self.eat_symbol('(')?;
                let expr = self.parse_expression()?;
                let close = self.eat_symbol(')')?;
                return Ok(Node::non_terminal("term", vec![open, expr, close]));
            }
            Token::Symbol(c) if *c == '-' || *c == '~' => {
                let op = self.eat_symbol(*c)?;
                let inner = self.parse_term()?;
                return Ok(Node::non_terminal("term", vec![op, inner]));
            }
            Token::Identifier(_) => {
                let next = self.peek_nth(1).map(|t| &t.token);
                match next {
                    Some(Token::Symbol('[')) => {
                        let name = self.eat_identifier()?;
                        let open = self.eat_symbol('[')?;
                        let expr = self.parse_expression()?;
                        let close = self.eat_symbol(']')?;
                        return Ok(Node::non_terminal("term", vec![name, open, expr, close]));
                    }
                    Some(Token::Symbol('(')) | Some(Token::Symbol('.')) => {
                        let call = self.parse_subroutine_call()?;
                        return Ok(Node::non_terminal("term", call));
                    }
                    _ => {
                        self.advance();
                        Node::identifier(identifier_text(&token.token))
                    }
                }
            }
            _ => return Err(self.error("expected a term")),
        };

        Ok(Node::non_terminal("term", vec![node]))
    }

    /// `name(...)` or `name.name(...)`. Returns a flat list of child nodes
    /// (not wrapped), since this production is inlined into both `term`
    /// and `doStatement`.
    fn parse_subroutine_call(&mut self) -> Result<Vec<Node>> {
        let mut children = vec![self.eat_identifier()?];

        if self.peek_is_symbol('.') {
            children.push(self.eat_symbol('.')?);
            children.push(self.eat_identifier()?);
        }

        children.push(self.eat_symbol('(')?);
        children.push(self.parse_expression_list()?);
        children.push(self.eat_symbol(')')?);
        Ok(children)
    }

    fn parse_expression_list(&mut self) -> Result<Node> {
        let mut children = Vec::new();
        if !self.peek_is_symbol(')') {
            children.push(self.parse_expression()?);
            while self.peek_is_symbol(',') {
                children.push(self.eat_symbol(',')?);
                children.push(self.parse_expression()?);
            }
        }
        Ok(Node::non_terminal("expressionList", children))
    }

    // --- token cursor helpers ---

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, offset: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_line(&self) -> usize {
        self.peek().or_else(|| self.tokens.last()).map_or(0, |t| t.line)
    }

    fn error(&self, message: &str) -> JackError {
        JackError::Parse { line: self.current_line(), message: message.to_string() }
    }

    fn peek_keyword(&self) -> Option<&'static str> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Keyword(k)) => Some(k),
            _ => None,
        }
    }

    fn peek_is_keyword(&self, candidates: &[&str]) -> bool {
        self.peek_keyword().is_some_and(|k| candidates.contains(&k))
    }

    fn peek_symbol(&self) -> Option<char> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Symbol(c)) => Some(*c),
            _ => None,
        }
    }

    fn peek_is_symbol(&self, c: char) -> bool {
        self.peek_symbol() == Some(c)
    }

    fn peek_is_operator(&self) -> bool {
        self.peek_symbol().is_some_and(|c| OPERATORS.contains(&c))
    }

    fn eat_keyword(&mut self, expected: &str) -> Result<Node> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Keyword(k)) if *k == expected => {
                self.advance();
                Ok(Node::keyword(expected))
            }
            _ => Err(self.error(&format!("expected keyword '{expected}'"))),
        }
    }

    fn eat_any_keyword(&mut self, candidates: &[&str]) -> Result<Node> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Keyword(k)) if candidates.contains(k) => {
                let text = *k;
                self.advance();
                Ok(Node::keyword(text))
            }
            _ => Err(self.error(&format!("expected one of {candidates:?}"))),
        }
    }

    fn eat_symbol(&mut self, expected: char) -> Result<Node> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Symbol(c)) if *c == expected => {
                self.advance();
                Ok(Node::symbol(expected))
            }
            _ => Err(self.error(&format!("expected symbol '{expected}'"))),
        }
    }

    fn eat_identifier(&mut self) -> Result<Node> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Identifier(name)) => {
                let node = Node::identifier(name);
                self.advance();
                Ok(node)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }
}

fn identifier_text(token: &Token) -> &str {
    match token {
        Token::Identifier(name) => name,
        _ => unreachable!("identifier_text called on a non-identifier token"),
    }
}
