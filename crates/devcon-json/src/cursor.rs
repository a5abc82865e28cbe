//! Single-pass reader over a borrowed JSON buffer.
//!
//! A [`Cursor`] is a position inside an immutable byte slice. Each `parse_*`
//! method consumes exactly one well-formed value of the matching type and
//! leaves the cursor on the first byte after it. Containers are never
//! materialised: [`Cursor::parse_array`] and [`Cursor::parse_object`] hand each
//! element to a visitor as an undecoded [`Value`] and skip over it with
//! [`Cursor::skip_value`].
//!
//! The end of the slice plays the role of the terminator, so callers never
//! need to append a sentinel byte.

use crate::error::JsonError;
use crate::value::{Value, ValueType};

/// Maximum container nesting accepted by [`Cursor::skip_value`].
pub const MAX_DEPTH: usize = 128;

/// Position within a borrowed JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Creates a cursor at byte `pos` of `input`.
    #[must_use]
    pub const fn at(input: &'a [u8], pos: usize) -> Self {
        Self { input, pos }
    }

    /// Byte offset of the cursor within its buffer.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Buffer the cursor reads from.
    #[must_use]
    pub const fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Advances past ASCII space, tab, newline, and carriage return.
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Classifies the value starting at the cursor without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::UnexpectedEnd`] at the end of the buffer and
    /// [`JsonError::Unexpected`] when the byte cannot start a value.
    pub fn value_type(&self) -> Result<ValueType, JsonError> {
        let byte = self.peek().ok_or_else(|| self.end())?;
        ValueType::classify(byte).ok_or_else(|| self.unexpected("a JSON value", byte))
    }

    /// Decodes a string literal, translating the supported escapes.
    ///
    /// Only `\" \\ \/ \b \f \n \r \t` are recognised. Any other escape,
    /// including `\u`, is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadEscape`], [`JsonError::UnterminatedString`], or
    /// [`JsonError::InvalidUtf8`] when the literal is malformed.
    pub fn parse_string(&mut self) -> Result<String, JsonError> {
        let start = self.pos;
        self.expect(b'"', "'\"'")?;
        let mut decoded = Vec::new();
        loop {
            let Some(byte) = self.bump() else {
                return Err(JsonError::UnterminatedString { offset: start });
            };
            match byte {
                b'"' => break,
                b'\\' => {
                    let escape_at = self.pos - 1;
                    let Some(escape) = self.bump() else {
                        return Err(JsonError::UnterminatedString { offset: start });
                    };
                    decoded.push(unescape(escape).ok_or(JsonError::BadEscape {
                        escape: char::from(escape),
                        offset: escape_at,
                    })?);
                }
                other => decoded.push(other),
            }
        }
        String::from_utf8(decoded).map_err(|source| JsonError::InvalidUtf8 {
            offset: start,
            source,
        })
    }

    /// Decodes a number literal into an IEEE double.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadNumber`] when the literal does not follow
    /// `-?digit+(.digit+)?([eE][+-]?digit+)?`.
    pub fn parse_number(&mut self) -> Result<f64, JsonError> {
        let start = self.pos;
        let malformed = JsonError::BadNumber { offset: start };
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.skip_digits() == 0 {
            return Err(malformed);
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err(malformed);
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return Err(malformed);
            }
        }
        self.input
            .get(start..self.pos)
            .and_then(|literal| std::str::from_utf8(literal).ok())
            .and_then(|literal| literal.parse::<f64>().ok())
            .ok_or(malformed)
    }

    /// Matches the literal `true` or `false`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadBoolean`] for any other input.
    pub fn parse_bool(&mut self) -> Result<bool, JsonError> {
        if self.consume_literal(b"true") {
            Ok(true)
        } else if self.consume_literal(b"false") {
            Ok(false)
        } else {
            Err(JsonError::BadBoolean { offset: self.pos })
        }
    }

    /// Matches the literal `null`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadNull`] for any other input.
    pub fn parse_null(&mut self) -> Result<(), JsonError> {
        if self.consume_literal(b"null") {
            Ok(())
        } else {
            Err(JsonError::BadNull { offset: self.pos })
        }
    }

    /// Walks an array, passing each element to `visit` without decoding it.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadArray`] when the closing bracket is missing or
    /// elements are not separated by commas, and propagates errors raised
    /// while skipping an element.
    pub fn parse_array<F>(&mut self, mut visit: F) -> Result<(), JsonError>
    where
        F: FnMut(Value<'a>),
    {
        self.expect(b'[', "'['")?;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            let element = self.element(|offset| JsonError::BadArray { offset })?;
            visit(element);
            self.skip_value()?;
            self.skip_whitespace();
            match self.bump() {
                Some(b']') => return Ok(()),
                Some(b',') => self.skip_whitespace(),
                _ => return Err(JsonError::BadArray { offset: self.pos }),
            }
        }
    }

    /// Walks an object, passing each unescaped key and undecoded value to
    /// `visit`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::BadObject`] when a key, colon, comma, or the
    /// closing brace is missing, and propagates errors raised while decoding a
    /// key or skipping a value.
    pub fn parse_object<F>(&mut self, mut visit: F) -> Result<(), JsonError>
    where
        F: FnMut(String, Value<'a>),
    {
        self.expect(b'{', "'{'")?;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            if self.peek() != Some(b'"') {
                return Err(JsonError::BadObject { offset: self.pos });
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            if self.bump() != Some(b':') {
                return Err(JsonError::BadObject {
                    offset: self.pos.saturating_sub(1),
                });
            }
            self.skip_whitespace();
            let value = self.element(|offset| JsonError::BadObject { offset })?;
            visit(key, value);
            self.skip_value()?;
            self.skip_whitespace();
            match self.bump() {
                Some(b'}') => return Ok(()),
                Some(b',') => self.skip_whitespace(),
                _ => return Err(JsonError::BadObject { offset: self.pos }),
            }
        }
    }

    /// Advances past one complete value without decoding it.
    ///
    /// Strings honour escapes, so an escaped quote or a bracket inside a
    /// string never ends the value early. Containers are skipped by balanced
    /// bracket matching. Scalars run up to the next `,`, `}`, or `]`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::UnterminatedString`], [`JsonError::BadArray`],
    /// [`JsonError::BadObject`], or [`JsonError::NestingTooDeep`] when the
    /// value cannot be delimited.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        self.skip_value_at_depth(0)
    }

    fn skip_value_at_depth(&mut self, depth: usize) -> Result<(), JsonError> {
        match self.peek() {
            Some(b'"') => self.skip_string(),
            Some(b'[') => self.skip_block(b']', depth),
            Some(b'{') => self.skip_block(b'}', depth),
            Some(_) => {
                self.skip_scalar();
                Ok(())
            }
            None => Err(self.end()),
        }
    }

    fn skip_string(&mut self) -> Result<(), JsonError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bump() {
                Some(b'"') => return Ok(()),
                Some(b'\\') => {
                    if self.bump().is_none() {
                        return Err(JsonError::UnterminatedString { offset: start });
                    }
                }
                Some(_) => {}
                None => return Err(JsonError::UnterminatedString { offset: start }),
            }
        }
    }

    fn skip_block(&mut self, close: u8, depth: usize) -> Result<(), JsonError> {
        let start = self.pos;
        if depth >= MAX_DEPTH {
            return Err(JsonError::NestingTooDeep {
                max: MAX_DEPTH,
                offset: start,
            });
        }
        let broken = |offset| {
            if close == b']' {
                JsonError::BadArray { offset }
            } else {
                JsonError::BadObject { offset }
            }
        };
        self.pos += 1;
        loop {
            match self.peek() {
                None => return Err(broken(self.pos)),
                Some(b'"' | b'[' | b'{') => self.skip_value_at_depth(depth + 1)?,
                Some(byte) if byte == close => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b']' | b'}') => return Err(broken(self.pos)),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn skip_scalar(&mut self) {
        while let Some(byte) = self.peek() {
            if matches!(byte, b',' | b'}' | b']') {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn element(&self, broken: impl Fn(usize) -> JsonError) -> Result<Value<'a>, JsonError> {
        match self.peek() {
            None | Some(b',' | b']' | b'}') => Err(broken(self.pos)),
            Some(_) => Value::classify(*self),
        }
    }

    fn consume_literal(&mut self, literal: &[u8]) -> bool {
        let matches = self
            .input
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(literal));
        if matches {
            self.pos += literal.len();
        }
        matches
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), JsonError> {
        match self.peek() {
            Some(found) if found == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(self.unexpected(expected, found)),
            None => Err(self.end()),
        }
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    const fn end(&self) -> JsonError {
        JsonError::UnexpectedEnd {
            offset: self.input.len(),
        }
    }

    fn unexpected(&self, expected: &'static str, found: u8) -> JsonError {
        JsonError::Unexpected {
            expected,
            found: char::from(found),
            offset: self.pos,
        }
    }
}

const fn unescape(escape: u8) -> Option<u8> {
    match escape {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}
