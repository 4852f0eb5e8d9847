//! Input sanitization.
//!
//! Text entering the engine from the host (keystrokes, paste, programmatic
//! value assignment) passes through a [`Sanitizer`] before emoji expansion
//! and splicing. The default [`PlainTextSanitizer`] keeps printable text and
//! line structure and drops everything else; hosts with stricter rules plug
//! in their own implementation.

/// Normalizes unprocessed host text before it is spliced into a document.
pub trait Sanitizer {
    /// Return the cleaned text. Must not introduce markup.
    fn sanitize(&self, input: &str) -> String;
}

/// Default sanitizer: normalizes `\r\n` and `\r` to `\n` and strips control
/// characters other than newline and tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSanitizer;

impl Sanitizer for PlainTextSanitizer {
    fn sanitize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push('\n');
                }
                '\n' | '\t' => out.push(ch),
                ch if ch.is_control() => {}
                ch => out.push(ch),
            }
        }
        out
    }
}
