// MaintLog - core/token.rs
//
// Lexical tokenizer: word runs (letters/digits) and single punctuation
// characters, each with its byte range in the source and its lemma.

use crate::core::lemma::Lemmatizer;
use regex::Regex;
use std::sync::OnceLock;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+|[^\s\p{L}\p{N}]").expect("static regex is valid"))
}

/// One token of a note, borrowing its surface text from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Surface text exactly as it appears in the source.
    pub text: &'a str,

    /// Byte offset of the first character.
    pub start: usize,

    /// Byte offset one past the last character.
    pub end: usize,

    /// Lowercase surface form.
    pub lower: String,

    /// Base form as computed by the lemmatizer.
    pub lemma: String,
}

/// Split `text` into tokens in source order.
pub fn tokenize<'a>(text: &'a str, lemmatizer: &Lemmatizer) -> Vec<Token<'a>> {
    token_re()
        .find_iter(text)
        .map(|m| {
            let lower = m.as_str().to_lowercase();
            let lemma = if m.as_str().chars().any(char::is_alphabetic) {
                lemmatizer.lemma(&lower)
            } else {
                lower.clone()
            };
            Token {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
                lower,
                lemma,
            }
        })
        .collect()
}
