use std::borrow::Cow;

use fancy_regex::Regex;
use lazy_static::lazy_static;

use crate::error::Result;

const SPACE_BEFORE_PUNCTUATION_PATTERN: &str = r" (?=[.?!,])";
const SPACE_BEFORE_CONTRACTION_PATTERN: &str = r" (?=n't|'(?:m|s|ve|re))";

lazy_static! {
    static ref SPACE_BEFORE_PUNCTUATION_COMPILED_PATTERN: Regex =
        Regex::new(SPACE_BEFORE_PUNCTUATION_PATTERN).unwrap();
    static ref SPACE_BEFORE_CONTRACTION_COMPILED_PATTERN: Regex =
        Regex::new(SPACE_BEFORE_CONTRACTION_PATTERN).unwrap();
}

/// Undo the spacing artifacts word-level decoders leave behind, the way
/// transformers does when `clean_up_tokenization_spaces` is set.
///
/// The rules run in transformers' order: punctuation, then the spaced
/// apostrophe, then contractions.
pub fn clean_up_tokenization(text: &str) -> Result<Cow<'_, str>> {
    let text = strip_matches(&SPACE_BEFORE_PUNCTUATION_COMPILED_PATTERN, Cow::Borrowed(text))?;
    let text = if text.contains(" ' ") {
        Cow::Owned(text.replace(" ' ", "'"))
    } else {
        text
    };
    strip_matches(&SPACE_BEFORE_CONTRACTION_COMPILED_PATTERN, text)
}

fn strip_matches<'a>(re: &Regex, text: Cow<'a, str>) -> Result<Cow<'a, str>> {
    let stripped = match re.try_replacen(&text, 0, "")? {
        Cow::Borrowed(_) => None,
        Cow::Owned(stripped) => Some(stripped),
    };
    Ok(match stripped {
        Some(stripped) => Cow::Owned(stripped),
        None => text,
    })
}
