// gx-core/src/ports/console.rs

use crate::error::GxError;

pub const INVALID_INPUT: &str = "Error: invalid input";

/// The conversation channel of the interactive commands.
///
/// Every prompt reads exactly one answer. Implementations re-ask on
/// malformed answers (not a number, out of range, not yes/no) and return
/// `GxError::InputExhausted` when no answer is left.
pub trait Console {
    fn say(&mut self, text: &str) -> Result<(), GxError>;

    /// Yes/no question. A blank answer takes `default`.
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, GxError>;

    /// Numbered choice. Returns the 0-based index of the chosen entry.
    fn select(&mut self, message: &str, choices: &[&str]) -> Result<usize, GxError>;

    /// Free text, trimmed. A blank answer takes `default` when there is one.
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String, GxError>;

    /// Free text kept exactly as typed (passwords). A blank answer is empty.
    fn secret(&mut self, message: &str) -> Result<String, GxError>;

    /// Reports an answer the caller rejected, before it asks again.
    fn invalid(&mut self) -> Result<(), GxError> {
        self.say(INVALID_INPUT)
    }
}
