//! Jack tokenizer: a forward-only token stream over a character buffer.
//!
//! The stream keeps exactly one token of lookahead so `has_more_tokens` can
//! answer without consuming input, and tracks the 1-based line of the
//! current token for diagnostics.

use crate::error::{Error, Result};
use crate::span::{Span, Spanned};

use super::token::{Keyword, Token, TokenType, SYMBOLS};

#[derive(Debug)]
pub struct Tokenizer<'src> {
    source: &'src [u8],
    pos: usize,
    /// 1-based line of the scan cursor.
    line: u32,
    current: Option<Spanned<Token>>,
    current_line: u32,
    next: Option<Spanned<Token>>,
    next_line: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a tokenizer and prime one token of lookahead.
    pub fn new(source: &'src str) -> Result<Self> {
        let mut tokenizer = Self {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            current: None,
            current_line: 0,
            next: None,
            next_line: 0,
        };
        if let Some((token, line)) = tokenizer.scan_token()? {
            tokenizer.next = Some(token);
            tokenizer.next_line = line;
        }
        Ok(tokenizer)
    }

    /// True iff a next token has been successfully read.
    pub fn has_more_tokens(&self) -> bool {
        self.next.is_some()
    }

    /// Consume the next token; fails if none is available.
    pub fn advance(&mut self) -> Result<()> {
        match self.next.take() {
            Some(token) => {
                self.current = Some(token);
                self.current_line = self.next_line;
                if let Some((token, line)) = self.scan_token()? {
                    self.next = Some(token);
                    self.next_line = line;
                }
                Ok(())
            }
            None => Err(Error::tokenizer(
                "unexpected end of input, no more tokens to process",
                self.eof_span(),
                self.line,
            )),
        }
    }

    /// 1-based line of the current token.
    pub fn line(&self) -> u32 {
        self.current_line
    }

    /// Span of the current token.
    pub fn span(&self) -> Span {
        self.current
            .as_ref()
            .map(|t| t.span)
            .unwrap_or_else(Span::dummy)
    }

    pub fn token(&self) -> Result<&Token> {
        self.current.as_ref().map(|t| &t.node).ok_or_else(|| {
            Error::tokenizer(
                "no current token; advance() has not been called",
                Span::dummy(),
                0,
            )
        })
    }

    pub fn token_type(&self) -> Result<TokenType> {
        Ok(self.token()?.token_type())
    }

    pub fn keyword(&self) -> Result<Keyword> {
        match self.token()? {
            Token::Keyword(kw) => Ok(*kw),
            other => Err(self.accessor_mismatch("keyword", other)),
        }
    }

    pub fn symbol(&self) -> Result<char> {
        match self.token()? {
            Token::Symbol(ch) => Ok(*ch),
            other => Err(self.accessor_mismatch("symbol", other)),
        }
    }

    pub fn identifier(&self) -> Result<&str> {
        match self.token()? {
            Token::Identifier(name) => Ok(name),
            other => Err(self.accessor_mismatch("identifier", other)),
        }
    }

    pub fn int_val(&self) -> Result<u16> {
        match self.token()? {
            Token::IntConst(value) => Ok(*value),
            other => Err(self.accessor_mismatch("integer constant", other)),
        }
    }

    pub fn string_val(&self) -> Result<&str> {
        match self.token()? {
            Token::StringConst(value) => Ok(value),
            other => Err(self.accessor_mismatch("string constant", other)),
        }
    }

    fn accessor_mismatch(&self, wanted: &str, found: &Token) -> Error {
        Error::tokenizer(
            format!(
                "current token is {}, not a {}",
                found.description(),
                wanted
            ),
            self.span(),
            self.current_line,
        )
    }

    // --- Scanning ---

    fn scan_token(&mut self) -> Result<Option<(Spanned<Token>, u32)>> {
        self.skip_whitespace_and_comments()?;

        if self.pos >= self.source.len() {
            return Ok(None);
        }

        let start = self.pos;
        let line = self.line;
        let ch = self.source[self.pos];

        let token = if ch == b'"' {
            self.scan_string(line)?
        } else if ch.is_ascii_digit() {
            self.scan_number(line)?
        } else if is_ident_start(ch) {
            self.scan_ident_or_keyword()
        } else if SYMBOLS.contains(&(ch as char)) {
            self.pos += 1;
            Token::Symbol(ch as char)
        } else {
            return Err(Error::token(
                format!("unable to classify character '{}'", ch as char),
                Span::new(start as u32, start as u32 + 1),
                line,
            ));
        };

        let span = Span::new(start as u32, self.pos as u32);
        Ok(Some((Spanned::new(token, span), line)))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                if self.source[self.pos] == b'\n' {
                    self.line += 1;
                }
                self.pos += 1;
            }

            if self.at_pair(b'/', b'/') {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            // Block comments; /** API comments are the same form.
            if self.at_pair(b'/', b'*') {
                let start = self.pos;
                let line = self.line;
                self.pos += 2;
                let mut closed = false;
                while self.pos < self.source.len() {
                    if self.at_pair(b'*', b'/') {
                        self.pos += 2;
                        closed = true;
                        break;
                    }
                    if self.source[self.pos] == b'\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
                if !closed {
                    return Err(Error::tokenizer(
                        "reached end of input before finding closing */",
                        Span::new(start as u32, self.pos as u32),
                        line,
                    ));
                }
                continue;
            }

            return Ok(());
        }
    }

    fn scan_string(&mut self, line: u32) -> Result<Token> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let content_start = self.pos;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'"' => {
                    let value = std::str::from_utf8(&self.source[content_start..self.pos])
                        .unwrap_or_default()
                        .to_string();
                    self.pos += 1; // closing quote
                    return Ok(Token::StringConst(value));
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        Err(Error::token(
            "unterminated string constant",
            Span::new(start as u32, self.pos as u32),
            line,
        ))
    }

    fn scan_number(&mut self, line: u32) -> Result<Token> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        match text.parse::<u32>() {
            Ok(value) if value <= 32767 => Ok(Token::IntConst(value as u16)),
            _ => Err(Error::token(
                format!("integer constant {} out of range", text),
                Span::new(start as u32, self.pos as u32),
                line,
            )
            .with_help("integer constants must lie in 0..=32767")),
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        match Keyword::from_str(text) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Identifier(text.to_string()),
        }
    }

    fn at_pair(&self, first: u8, second: u8) -> bool {
        self.pos + 1 < self.source.len()
            && self.source[self.pos] == first
            && self.source[self.pos + 1] == second
    }

    fn eof_span(&self) -> Span {
        let end = self.source.len() as u32;
        Span::new(end.saturating_sub(1), end)
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
