//! Lazy, zero-copy JSON reader used by the development console protocol.
//!
//! The reader never builds a document tree. [`Value::parse`] classifies the
//! root from its first significant byte and returns a handle that borrows the
//! caller's buffer. Objects and arrays yield further undecoded handles, and
//! scalars are decoded only when one of the typed accessors is called. Every
//! fault is reported as a [`JsonError`] carrying the byte offset of the
//! failure, so a malformed message can be rejected without affecting anything
//! else.
//!
//! ```
//! use devcon_json::{Value, ValueType};
//!
//! let message = br#"{"type":"command","command":"reload"}"#;
//! let root = Value::parse(message)?;
//! assert_eq!(root.kind(), ValueType::Object);
//!
//! let members = root.members()?;
//! let command = members.get("command").map(|value| value.as_str()).transpose()?;
//! assert_eq!(command.as_deref(), Some("reload"));
//! # Ok::<(), devcon_json::JsonError>(())
//! ```

mod cursor;
mod error;
mod value;

pub use cursor::{Cursor, MAX_DEPTH};
pub use error::JsonError;
pub use value::{Object, Value, ValueType};

#[cfg(test)]
mod tests;
