//! Cross-module checks for the JSON reader.
