use crate::gateway::ContextSnippet;

use super::{take_chars, ExtractionError, MAX_ENTRIES};

/// Quotes longer than this many characters are shortened.
pub const QUOTE_LIMIT: usize = 300;

/// Quotes of this many characters or fewer are dropped.
pub const MIN_QUOTE_CHARS: usize = 20;

/// Character offsets searched for a sentence end when shortening.
const BREAK_START: usize = 250;
const BREAK_END: usize = 350;

const ELLIPSIS: &str = "...";

pub(super) fn collect(contexts: &[ContextSnippet]) -> Result<Vec<String>, ExtractionError> {
    if contexts.is_empty() {
        return Err(ExtractionError::NoContexts);
    }

    Ok(contexts
        .iter()
        .take(MAX_ENTRIES)
        .map(|c| trim_quote(&c.text))
        .filter(|q| q.chars().count() > MIN_QUOTE_CHARS)
        .collect())
}

/// Trims a snippet to a quotable length.
///
/// Text up to [`QUOTE_LIMIT`] characters is returned trimmed. Longer text is
/// cut just after the first `.` at character offset 250..350, or else at
/// [`QUOTE_LIMIT`] characters with `...` appended.
pub fn trim_quote(text: &str) -> String {
    let quote = text.trim();
    if quote.chars().count() <= QUOTE_LIMIT {
        return quote.to_string();
    }

    let break_point = quote
        .chars()
        .enumerate()
        .skip(BREAK_START)
        .take(BREAK_END - BREAK_START)
        .find(|(_, c)| *c == '.')
        .map(|(i, _)| i);

    match break_point {
        Some(i) => take_chars(quote, i + 1).to_string(),
        None => format!("{}{}", take_chars(quote, QUOTE_LIMIT), ELLIPSIS),
    }
}
