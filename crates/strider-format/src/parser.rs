use crate::ast::{Blueprint, Node, Prop, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_blueprint(&mut self) -> Result<Blueprint, ParseError> {
        let root = self.parse_node()?;
        if self.peek() != &Token::Eof {
            return Err(self.err("a blueprint has exactly one root node"));
        }
        Ok(Blueprint { root })
    }

    // ── Node ──────────────────────────────────────────────────────────────

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let (line, _) = self.current_pos();
        let kind = match self.peek().clone() {
            Token::Ident(s) => { self.advance(); s }
            tok => return Err(self.err(format!("expected a node kind, got {:?}", tok))),
        };

        let name = if let Token::Str(_) = self.peek() {
            if let Token::Str(s) = self.advance() { Some(s) } else { None }
        } else {
            None
        };

        let (props, children) = if self.peek() == &Token::LBrace {
            self.parse_block()?
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Node { kind, name, props, children, line })
    }

    // ── Block ─────────────────────────────────────────────────────────────

    /// `{ item* }` where an item is a `key: value` property or a child node.
    /// `Ident ":"` starts a property; any other `Ident` starts a child.
    fn parse_block(&mut self) -> Result<(Vec<Prop>, Vec<Node>), ParseError> {
        self.advance(); // `{`
        let mut props = Vec::new();
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Token::RBrace => { self.advance(); break; }
                Token::Eof    => return Err(self.err("unclosed '{' block")),
                Token::Ident(_) => {
                    if self.peek_ahead(1) == &Token::Colon {
                        props.push(self.parse_prop()?);
                    } else {
                        children.push(self.parse_node()?);
                    }
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} inside block, expected a property (key: value) or a node",
                        tok
                    )));
                }
            }
        }

        Ok((props, children))
    }

    // ── Prop ──────────────────────────────────────────────────────────────

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let key = match self.advance() {
            Token::Ident(s) => s,
            tok => return Err(self.err(format!("expected property name, got {:?}", tok))),
        };
        self.advance(); // `:`
        let value = self.parse_value()?;
        Ok(Prop { key, value })
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek().clone() {
            Token::Str(s)    => { self.advance(); Ok(Value::Str(s)) }
            Token::Number(n) => { self.advance(); Ok(Value::Number(n)) }
            Token::Ident(s)  => { self.advance(); Ok(Value::Ident(s)) }
            tok => Err(self.err(format!("expected a value, got {:?}", tok))),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse `.scene` source text into a [`Blueprint`].
pub fn parse_str(src: &str) -> Result<Blueprint, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_blueprint()
}
