// lox-parser - Lexer for Lox
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (scanner) for Lox source code.
//!
//! Converts a source string into a stream of tokens. Lexemes borrow from
//! the source buffer. Errors are yielded in the stream rather than
//! aborting the scan, so a single pass reports every lexical problem.

use std::fmt;
use std::str::CharIndices;

use itertools::{self, MultiPeek};

use crate::token::{Token, TokenKind};

/// Error while scanning Lox source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A string literal ran off the end of the source.
    UnterminatedString(u32),
    /// A character outside the lexical grammar.
    UnexpectedCharacter(u32, char),
}

impl ScanError {
    /// The source line the error was detected on.
    pub fn line(&self) -> u32 {
        match self {
            ScanError::UnterminatedString(line) => *line,
            ScanError::UnexpectedCharacter(line, _) => *line,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::UnterminatedString(line) => {
                write!(f, "[line {}] Error: Unterminated string.", line)
            }
            ScanError::UnexpectedCharacter(line, c) => {
                write!(f, "[line {}] Error: Unexpected character '{}'.", line, c)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// The lexer groups source characters into a sequence of tokens.
#[derive(Debug)]
pub struct Scanner<'src> {
    src: &'src str,
    chars: MultiPeek<CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner over the given source code.
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            chars: itertools::multipeek(src.char_indices()),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scan the whole source, collecting tokens and errors.
    ///
    /// The token vector always ends with an `Eof` token carrying the last
    /// line number, even when errors occurred.
    pub fn scan_all(src: &'src str) -> (Vec<Token<'src>>, Vec<ScanError>) {
        let mut scanner = Scanner::new(src);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match scanner.scan() {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => break,
                Err(err) => errors.push(err),
            }
        }
        tokens.push(scanner.eof_token());
        (tokens, errors)
    }

    /// Consume and return the next token, or `None` at end of input.
    pub fn scan(&mut self) -> Result<Option<Token<'src>>, ScanError> {
        self.skip_whitespace();
        self.start = self.current;
        let c = match self.advance() {
            None => return Ok(None),
            Some(c) => c,
        };

        Ok(Some(match c {
            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            '{' => self.make_token(TokenKind::LBrace),
            '}' => self.make_token(TokenKind::RBrace),
            ';' => self.make_token(TokenKind::Semicolon),
            ',' => self.make_token(TokenKind::Comma),
            '.' => self.make_token(TokenKind::Dot),
            '-' => self.make_token(TokenKind::Minus),
            '+' => self.make_token(TokenKind::Plus),
            '/' => self.make_token(TokenKind::Slash),
            '*' => self.make_token(TokenKind::Star),
            '!' => {
                if self.consume('=') {
                    self.make_token(TokenKind::BangEqual)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            '=' => {
                if self.consume('=') {
                    self.make_token(TokenKind::EqualEqual)
                } else {
                    self.make_token(TokenKind::Equal)
                }
            }
            '<' => {
                if self.consume('=') {
                    self.make_token(TokenKind::LessEqual)
                } else {
                    self.make_token(TokenKind::Less)
                }
            }
            '>' => {
                if self.consume('=') {
                    self.make_token(TokenKind::GreaterEqual)
                } else {
                    self.make_token(TokenKind::Greater)
                }
            }
            '"' => self.string()?,
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            c => return Err(ScanError::UnexpectedCharacter(self.line, c)),
        }))
    }

    /// The `Eof` token for the line scanning stopped on.
    pub fn eof_token(&self) -> Token<'src> {
        Token {
            kind: TokenKind::Eof,
            lexeme: "",
            line: self.line,
        }
    }

    fn identifier(&mut self) -> Token<'src> {
        while self.peek_check(|c| is_alpha(c) || c.is_ascii_digit()) {
            self.advance();
        }
        let lexeme = &self.src[self.start..self.current];
        self.make_token(TokenKind::keyword_or_identifier(lexeme))
    }

    fn number(&mut self) -> Token<'src> {
        while self.peek_check(|c| c.is_ascii_digit()) {
            self.advance();
        }
        // A trailing '.' is not part of the number; only consume the dot
        // when a digit follows it.
        if self.peek_check(|c| c == '.') && self.peek_next_check(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek_check(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.make_token(TokenKind::Number)
    }

    fn string(&mut self) -> Result<Token<'src>, ScanError> {
        while self.peek_check(|c| c != '"') {
            self.advance();
        }
        if self.peek().is_none() {
            return Err(ScanError::UnterminatedString(self.line));
        }
        self.advance(); // closing quote
        Ok(self.make_token(TokenKind::String))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\r' | '\t' | '\n' => {
                    self.advance();
                }
                '/' => {
                    if !self.peek_next_check(|c| c == '/') {
                        return;
                    }
                    while self.peek_check(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.reset_peek();
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_next(&mut self) -> Option<char> {
        self.chars.reset_peek();
        match self.chars.peek() {
            None => None,
            Some(_) => self.chars.peek().map(|&(_, c)| c),
        }
    }

    fn peek_check<F: Fn(char) -> bool>(&mut self, check: F) -> bool {
        self.peek().map(&check).unwrap_or(false)
    }

    fn peek_next_check<F: Fn(char) -> bool>(&mut self, check: F) -> bool {
        self.peek_next().map(&check).unwrap_or(false)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(i, c)| {
            self.current = i + c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
            c
        })
    }

    fn consume(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.src[self.start..self.current],
            line: self.line,
        }
    }
}

impl<'src> IntoIterator for Scanner<'src> {
    type Item = Result<Token<'src>, ScanError>;
    type IntoIter = Iter<'src>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            scanner: self,
            done: false,
        }
    }
}

/// Iterator over scanned tokens.
///
/// Yields every token followed by a final `Eof` token, with scan errors
/// interleaved as `Err` items.
#[derive(Debug)]
pub struct Iter<'src> {
    scanner: Scanner<'src>,
    done: bool,
}

impl<'src> Iterator for Iter<'src> {
    type Item = Result<Token<'src>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                Some(Ok(self.scanner.eof_token()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
