//! Lazily typed handles into a JSON document.

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;

use crate::cursor::Cursor;
use crate::error::JsonError;

/// Kind of JSON value, inferred from its first significant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A `"`-delimited string.
    String,
    /// A number literal starting with a digit or `-`.
    Number,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// A `{`-delimited object.
    Object,
    /// A `[`-delimited array.
    Array,
}

impl ValueType {
    /// Infers the value type from the byte that starts a value.
    #[must_use]
    pub const fn classify(byte: u8) -> Option<Self> {
        match byte {
            b'"' => Some(Self::String),
            b'{' => Some(Self::Object),
            b'[' => Some(Self::Array),
            b'-' | b'0'..=b'9' => Some(Self::Number),
            b't' | b'f' => Some(Self::Bool),
            b'n' => Some(Self::Null),
            _ => None,
        }
    }

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Undecoded value borrowed from its source buffer.
///
/// A `Value` is only a type tag and a position. Decoding happens on demand
/// through the typed accessors, and the handle cannot outlive the buffer it
/// points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value<'a> {
    kind: ValueType,
    at: Cursor<'a>,
}

impl<'a> Value<'a> {
    /// Locates the document's root value, skipping leading whitespace.
    ///
    /// Only the first byte of the root is inspected; the rest of the document
    /// is validated as it is read.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::UnexpectedEnd`] for blank input and
    /// [`JsonError::Unexpected`] when the first byte cannot start a value.
    pub fn parse(input: &'a [u8]) -> Result<Self, JsonError> {
        let mut cursor = Cursor::new(input);
        cursor.skip_whitespace();
        Self::classify(cursor)
    }

    /// Builds a handle for the value starting at `cursor`.
    ///
    /// # Errors
    ///
    /// Returns the classification error reported by [`Cursor::value_type`].
    pub fn classify(cursor: Cursor<'a>) -> Result<Self, JsonError> {
        let kind = cursor.value_type()?;
        Ok(Self { kind, at: cursor })
    }

    /// Inferred type of the value.
    #[must_use]
    pub const fn kind(&self) -> ValueType {
        self.kind
    }

    /// Byte offset of the value within its buffer.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.at.position()
    }

    /// Cursor positioned on the first byte of the value.
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'a> {
        self.at
    }

    /// Raw, still-escaped bytes spanned by the value.
    ///
    /// Scalars extend up to the next structural delimiter, so trailing
    /// whitespace before that delimiter is included.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by [`Cursor::skip_value`].
    pub fn raw(&self) -> Result<&'a [u8], JsonError> {
        let mut cursor = self.at;
        cursor.skip_value()?;
        let input = cursor.input();
        Ok(input
            .get(self.offset()..cursor.position())
            .unwrap_or_default())
    }

    /// Decodes the value as a string.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_string`].
    pub fn as_str(&self) -> Result<String, JsonError> {
        self.cursor().parse_string()
    }

    /// Decodes the value as a double.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_number`].
    pub fn as_f64(&self) -> Result<f64, JsonError> {
        self.cursor().parse_number()
    }

    /// Decodes the value as a double and truncates it towards zero.
    ///
    /// Values outside the `i32` range saturate.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_number`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "integer accessor truncates by contract"
    )]
    pub fn as_i32(&self) -> Result<i32, JsonError> {
        self.as_f64().map(|number| number as i32)
    }

    /// Decodes the value as a double and narrows it to single precision.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_number`].
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float accessor narrows by contract"
    )]
    pub fn as_f32(&self) -> Result<f32, JsonError> {
        self.as_f64().map(|number| number as f32)
    }

    /// Decodes the value as a boolean.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_bool`].
    pub fn as_bool(&self) -> Result<bool, JsonError> {
        self.cursor().parse_bool()
    }

    /// Returns `true` when the value is the literal `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.cursor().parse_null().is_ok()
    }

    /// Visits each array element in order without decoding it.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_array`].
    pub fn for_each_element<F>(&self, visit: F) -> Result<(), JsonError>
    where
        F: FnMut(Value<'a>),
    {
        self.cursor().parse_array(visit)
    }

    /// Collects the array elements as undecoded handles.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_array`].
    pub fn elements(&self) -> Result<Vec<Value<'a>>, JsonError> {
        let mut elements = Vec::new();
        self.for_each_element(|element| elements.push(element))?;
        Ok(elements)
    }

    /// Visits each object member in document order.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_object`].
    pub fn for_each_member<F>(&self, visit: F) -> Result<(), JsonError>
    where
        F: FnMut(String, Value<'a>),
    {
        self.cursor().parse_object(visit)
    }

    /// Indexes the object members by unescaped key.
    ///
    /// # Errors
    ///
    /// Returns the error raised by [`Cursor::parse_object`].
    pub fn members(&self) -> Result<Object<'a>, JsonError> {
        let mut members = HashMap::new();
        self.for_each_member(|key, value| {
            members.insert(key, value);
        })?;
        Ok(Object { members })
    }
}

/// Object members keyed by unescaped name.
///
/// Values remain undecoded. When a key repeats, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object<'a> {
    members: HashMap<String, Value<'a>>,
}

impl<'a> Object<'a> {
    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value<'a>> {
        self.members.get(key).copied()
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` for `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over members in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value<'a>> {
        self.members.iter()
    }
}

impl<'o, 'a> IntoIterator for &'o Object<'a> {
    type Item = (&'o String, &'o Value<'a>);
    type IntoIter = hash_map::Iter<'o, String, Value<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
