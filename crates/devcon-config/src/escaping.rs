use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How free-form text is escaped when embedded in a broadcast `message`.
///
/// `QuotesOnly` escapes each `"` and copies every other character verbatim,
/// which matches what existing console front-ends expect but yields invalid
/// JSON for text containing backslashes or control characters. `Json` applies
/// full JSON string escaping.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MessageEscaping {
    /// Escape double quotes only.
    #[default]
    QuotesOnly,
    /// Escape as a JSON string literal.
    Json,
}
