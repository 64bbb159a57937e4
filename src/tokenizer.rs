//! Streaming tokenizer over a byte source.
//!
//! The lexer keeps one token of lookahead and a line counter. Two
//! concrete sources exist: an arbitrary `Read` stream (stdin, files)
//! and an appendable in-memory buffer used by the REPL and the prelude
//! loader. Both share the same lexing core.

use crate::error::{Error, Result};
use crate::token::Token;
use std::collections::VecDeque;
use std::io::Read;

/// A cursor over bytes with two characters of lookahead (the second is
/// needed to decide whether a sign starts a number or a symbol).
pub trait ByteSource {
    /// Byte `ahead` positions past the cursor, without consuming.
    fn peek_at(&mut self, ahead: usize) -> Option<u8>;

    /// Consumes and returns the next byte.
    fn bump(&mut self) -> Option<u8>;

    /// Forgets sticky end-of-input state and, for buffered sources,
    /// any unconsumed bytes.
    fn reset(&mut self);

    fn peek(&mut self) -> Option<u8> {
        self.peek_at(0)
    }
}

/// Byte source over any `Read` stream. Reads are byte-at-a-time, so
/// wrap files in a `BufReader`.
pub struct ReaderSource<R: Read> {
    inner: R,
    lookahead: VecDeque<u8>,
    ended: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        ReaderSource {
            inner,
            lookahead: VecDeque::new(),
            ended: false,
        }
    }

    fn fill(&mut self, upto: usize) {
        while self.lookahead.len() <= upto && !self.ended {
            let mut byte = [0u8; 1];
            match self.inner.read(&mut byte) {
                Ok(0) => self.ended = true,
                Ok(_) => self.lookahead.push_back(byte[0]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => self.ended = true,
            }
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn peek_at(&mut self, ahead: usize) -> Option<u8> {
        self.fill(ahead);
        self.lookahead.get(ahead).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        self.fill(0);
        self.lookahead.pop_front()
    }

    fn reset(&mut self) {
        // A closed stream stays closed; nothing to flush.
    }
}

/// Appendable in-memory byte source. Running out of bytes is not
/// final: `append` makes the tokenizer productive again.
#[derive(Default)]
pub struct StringSource {
    buffer: VecDeque<u8>,
}

impl StringSource {
    pub fn new() -> Self {
        StringSource::default()
    }

    pub fn append(&mut self, text: &str) {
        self.buffer.extend(text.bytes());
    }
}

impl ByteSource for StringSource {
    fn peek_at(&mut self, ahead: usize) -> Option<u8> {
        self.buffer.get(ahead).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        self.buffer.pop_front()
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// The tokenizer interface the reader works against.
pub trait Tokenize {
    fn next_token(&mut self) -> Result<Token>;
    fn peek_token(&mut self) -> Result<Token>;
    fn current_token(&self) -> Token;
    fn has_more_tokens(&mut self) -> bool;
    fn current_line(&self) -> usize;
    fn clear(&mut self);
}

pub struct Tokenizer<S: ByteSource> {
    source: S,
    next: Token,
    current: Token,
    line: usize,
}

pub type StreamTokenizer<R> = Tokenizer<ReaderSource<R>>;
pub type StringTokenizer = Tokenizer<StringSource>;

impl<R: Read> StreamTokenizer<R> {
    pub fn new(reader: R) -> Self {
        Tokenizer::over(ReaderSource::new(reader))
    }
}

impl StringTokenizer {
    pub fn new() -> Self {
        Tokenizer::over(StringSource::new())
    }

    pub fn with_input(text: &str) -> Self {
        let mut tokenizer = Self::new();
        tokenizer.append(text);
        tokenizer
    }

    pub fn append(&mut self, text: &str) {
        self.source.append(text);
    }
}

impl Default for StringTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sign(c: u8) -> bool {
    c == b'+' || c == b'-'
}

fn is_digit_ext(c: u8) -> bool {
    c.is_ascii_digit() || is_sign(c) || c == b'.'
}

fn is_symbol_initial(c: u8) -> bool {
    c.is_ascii_alphabetic() || b"!$%&*/:<=>?~_^#".contains(&c)
}

fn is_symbol_char(c: u8) -> bool {
    is_symbol_initial(c) || c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+'
}

impl<S: ByteSource> Tokenizer<S> {
    fn over(source: S) -> Self {
        Tokenizer {
            source,
            next: Token::Undefined,
            current: Token::Undefined,
            line: 0,
        }
    }

    fn skip_whitespace(&mut self, with_newline: bool) {
        while let Some(c) = self.source.peek() {
            if c.is_ascii_whitespace() && (with_newline || c != b'\n') {
                self.source.bump();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, condition: fn(u8) -> bool) -> String {
        let mut result = String::new();
        while let Some(c) = self.source.peek() {
            if condition(c) {
                result.push(c as char);
                self.source.bump();
            } else {
                break;
            }
        }
        result
    }

    fn parse_token(&mut self) -> Result<Token> {
        self.skip_whitespace(false);

        let Some(c) = self.source.peek() else {
            return Ok(Token::End);
        };
        if c == b'\n' {
            self.source.bump();
            self.line += 1;
            Ok(Token::Newline)
        } else if c == b'"' {
            self.parse_string_token()
        } else if self.is_symbol_token_start(c) {
            self.parse_symbol_token()
        } else if is_digit_ext(c) {
            self.parse_number_token()
        } else {
            self.parse_punct_token()
        }
    }

    /// A sign only starts a symbol when not followed by a digit, sign,
    /// or dot; otherwise it belongs to a number.
    fn is_symbol_token_start(&mut self, c: u8) -> bool {
        is_symbol_initial(c) || (is_sign(c) && !self.source.peek_at(1).is_some_and(is_digit_ext))
    }

    fn parse_string_token(&mut self) -> Result<Token> {
        self.source.bump();
        let mut bytes = Vec::new();
        loop {
            match self.source.bump() {
                Some(b'"') => break,
                Some(c) => bytes.push(c),
                None => {
                    return Err(Error::tokenizer("Unexpected end of input while reading string"))
                }
            }
        }
        Ok(Token::String(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn parse_symbol_token(&mut self) -> Result<Token> {
        let value = self.read_while(is_symbol_char);
        if value.as_bytes().first().copied().is_some_and(is_sign) && value.len() != 1 {
            return Err(Error::tokenizer(format!(
                "Invalid identifier token '{}'",
                value
            )));
        }
        Ok(Token::Symbol(value))
    }

    fn parse_number_token(&mut self) -> Result<Token> {
        let value = self.read_while(is_digit_ext);

        // A sign anywhere past the first character cannot be part of
        // one number: `1+2` and `--1` are malformed tokens, not pairs.
        if value[1..].contains(['+', '-']) {
            return Err(Error::tokenizer(format!("Invalid number token '{}'", value)));
        }
        if value == "." {
            return Ok(Token::Dot);
        }
        if value.matches('.').count() <= 1 {
            if let Ok(number) = value.parse::<f64>() {
                return Ok(Token::Number(number));
            }
        }
        Err(Error::tokenizer(format!("Invalid number token '{}'", value)))
    }

    fn parse_punct_token(&mut self) -> Result<Token> {
        let c = self.source.bump().unwrap_or(0);
        match c {
            b',' => Ok(Token::Comma),
            b'`' => Ok(Token::Backtick),
            b'\'' => Ok(Token::Quote),
            b'(' => Ok(Token::OpenParen),
            b')' => Ok(Token::CloseParen),
            other => Err(Error::tokenizer(format!(
                "Unexpected symbol: '{}' ({})",
                other as char, other
            ))),
        }
    }
}

impl<S: ByteSource> Tokenize for Tokenizer<S> {
    fn peek_token(&mut self) -> Result<Token> {
        // End is re-polled rather than cached: an appendable source may
        // have grown since the last look.
        if self.next.is_undefined() || self.next == Token::End {
            self.next = self.parse_token()?;
        }
        Ok(self.next.clone())
    }

    fn next_token(&mut self) -> Result<Token> {
        self.peek_token()?;
        self.current = std::mem::replace(&mut self.next, Token::Undefined);
        Ok(self.current.clone())
    }

    fn current_token(&self) -> Token {
        self.current.clone()
    }

    fn has_more_tokens(&mut self) -> bool {
        self.skip_whitespace(false);
        self.source.peek().is_some()
    }

    fn current_line(&self) -> usize {
        self.line
    }

    fn clear(&mut self) {
        self.next = Token::Undefined;
        self.source.reset();
    }
}
