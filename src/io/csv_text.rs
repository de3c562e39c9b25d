//! Character-scanning CSV row splitter.
//!
//! This is a best-effort reader for the customer exports the dashboard consumes,
//! not a validating one: malformed quoting never fails, whatever was accumulated
//! is flushed as-is.
//!
//! Rules:
//! - `,` separates fields outside quotes
//! - `"` enters quoted mode; inside it `""` is a literal quote and a lone `"` leaves it
//! - an unquoted `\n`, `\r` or `\r\n` ends the row (`\r\n` counts once)
//! - a trailing row without a terminator is still emitted

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Split `text` into rows of raw field strings.
///
/// Blank lines come back as a single empty field; dropping them is the caller's
/// decision (see `ingest`).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Quoted => match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => state = State::Unquoted,
                _ => field.push(c),
            },
            State::Unquoted => match c {
                '"' => state = State::Quoted,
                ',' => row.push(std::mem::take(&mut field)),
                '\r' | '\n' => {
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            },
        }
    }

    // EOF without a terminator (or inside an unterminated quote).
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
