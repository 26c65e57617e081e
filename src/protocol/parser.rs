//! Recursive-descent parser for Firebolt type descriptors.
//!
//! Grammar:
//!
//! ```text
//! type      := base [ "null" ]
//! base      := primitive
//!            | "array" "(" type ")"
//!            | ( "decimal" | "numeric" ) "(" uint "," uint ")"
//!            | "struct" "(" field { "," field } ")"
//! field     := name type
//! name      := plain-token | "`" any-but-backquote "`"
//! ```
//!
//! Keywords are matched ASCII case-insensitively. Field names keep their case.
//! Nesting deeper than `MAX_TYPE_DEPTH` levels is rejected.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::protocol::constants::*;
use crate::protocol::types::{TypeDescriptor, TypeKind};

/// Parse a type descriptor string such as `array(Decimal(38, 9) null)`.
///
/// Malformed input is always rejected; unknown primitive names are never
/// mapped to a default type.
pub fn parse_type(descriptor: &str) -> Result<TypeDescriptor> {
    let mut parser = Parser::new(descriptor);
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error(format!("unexpected input at offset {}", parser.pos)));
    }
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::type_parse(self.input, message)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(b) if b == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(self.error(format!(
                "expected '{}' at offset {}, found '{}'",
                expected as char, self.pos, b as char
            ))),
            None => Err(self.error(format!(
                "expected '{}' at offset {}, found end of input",
                expected as char, self.pos
            ))),
        }
    }

    fn word_end(&self, from: usize) -> usize {
        let mut end = from;
        while end < self.bytes.len()
            && (self.bytes[end].is_ascii_alphanumeric() || self.bytes[end] == b'_')
        {
            end += 1;
        }
        end
    }

    fn read_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        self.pos = self.word_end(start);
        &input[start..self.pos]
    }

    /// Consume `keyword` if it is the next whitespace-separated word.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let saved = self.pos;
        if !self.skip_whitespace() {
            return false;
        }
        let end = self.word_end(self.pos);
        if self.input[self.pos..end].eq_ignore_ascii_case(keyword) {
            self.pos = end;
            true
        } else {
            self.pos = saved;
            false
        }
    }

    fn read_uint(&mut self, what: &str) -> Result<u32> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error(format!("expected {} at offset {}", what, start)));
        }
        self.input[start..self.pos]
            .parse::<u32>()
            .map_err(|e| self.error(format!("invalid {}: {}", what, e)))
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        if self.depth >= MAX_TYPE_DEPTH {
            return Err(self.error(format!("type nesting exceeds {} levels", MAX_TYPE_DEPTH)));
        }
        self.depth += 1;
        let ty = self.parse_nested();
        self.depth -= 1;
        ty
    }

    fn parse_nested(&mut self) -> Result<TypeDescriptor> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.read_word();
        if word.is_empty() {
            return Err(self.error(format!("expected a type at offset {}", start)));
        }

        let kind = if word.eq_ignore_ascii_case(TYPE_ARRAY) {
            self.expect(b'(')?;
            let element = self.parse_type()?;
            self.expect(b')')?;
            TypeKind::Array(Box::new(element))
        } else if word.eq_ignore_ascii_case(TYPE_DECIMAL)
            || word.eq_ignore_ascii_case(TYPE_NUMERIC)
        {
            self.expect(b'(')?;
            let precision = self.read_uint("precision")?;
            self.expect(b',')?;
            let scale = self.read_uint("scale")?;
            self.expect(b')')?;
            TypeKind::Decimal { precision, scale }
        } else if word.eq_ignore_ascii_case(TYPE_STRUCT) {
            self.expect(b'(')?;
            TypeKind::Struct(self.parse_fields()?)
        } else {
            self.primitive(word)?
        };

        let ty = TypeDescriptor::new(kind);
        if self.eat_keyword(NULLABLE_KEYWORD) {
            Ok(ty.into_nullable())
        } else {
            Ok(ty)
        }
    }

    fn primitive(&mut self, word: &str) -> Result<TypeKind> {
        let is = |name: &str| word.eq_ignore_ascii_case(name);
        let kind = if is(TYPE_INT) || is(TYPE_INTEGER) {
            TypeKind::Int
        } else if is(TYPE_LONG) || is(TYPE_BIGINT) {
            TypeKind::Long
        } else if is(TYPE_FLOAT) || is(TYPE_REAL) {
            TypeKind::Float
        } else if is(TYPE_DOUBLE) {
            self.eat_keyword(TYPE_PRECISION);
            TypeKind::Double
        } else if is(TYPE_TEXT) || is(TYPE_STRING) {
            TypeKind::Text
        } else if is(TYPE_DATE) || is(TYPE_PGDATE) {
            TypeKind::Date
        } else if is(TYPE_TIMESTAMP) || is(TYPE_TIMESTAMP_NTZ) {
            TypeKind::Timestamp
        } else if is(TYPE_TIMESTAMP_TZ) {
            TypeKind::TimestampTz
        } else if is(TYPE_BOOLEAN) || is(TYPE_BOOL) {
            TypeKind::Boolean
        } else if is(TYPE_BYTEA) {
            TypeKind::Bytea
        } else if is(TYPE_GEOGRAPHY) {
            TypeKind::Geography
        } else {
            return Err(self.error(format!("unknown type '{}'", word)));
        };
        Ok(kind)
    }

    /// Parse struct fields after the opening parenthesis, through the closing one.
    fn parse_fields(&mut self) -> Result<IndexMap<String, TypeDescriptor>> {
        let mut fields = IndexMap::new();
        loop {
            let name = self.parse_field_name()?;
            let ty = self.parse_type()?;
            if fields.contains_key(&name) {
                return Err(self.error(format!("duplicate struct field '{}'", name)));
            }
            fields.insert(name, ty);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(fields);
                }
                Some(b) => {
                    return Err(self.error(format!(
                        "unexpected '{}' at offset {} in struct fields",
                        b as char, self.pos
                    )))
                }
                None => return Err(self.error("unbalanced parentheses in struct")),
            }
        }
    }

    fn parse_field_name(&mut self) -> Result<String> {
        self.skip_whitespace();
        let start = self.pos;

        if self.peek() == Some(b'`') {
            let close = self.input[start + 1..]
                .find('`')
                .ok_or_else(|| self.error(format!("unterminated back-quote at offset {}", start)))?;
            let name = &self.input[start + 1..start + 1 + close];
            self.pos = start + close + 2;
            if name.is_empty() {
                return Err(self.error(format!("empty field name at offset {}", start)));
            }
            return Ok(name.to_string());
        }

        while matches!(self.peek(), Some(b) if !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let name = &self.input[start..self.pos];
        if name.is_empty() {
            return Err(self.error(format!("expected a field name at offset {}", start)));
        }
        if name.contains('`') {
            return Err(self.error(format!("field name '{}' is not fully back-quoted", name)));
        }
        if name.contains(|c: char| c == ',' || c == '(' || c == ')') {
            return Err(self.error(format!("field '{}' has no type", name)));
        }
        Ok(name.to_string())
    }
}
