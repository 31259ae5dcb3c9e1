// MaintLog - core/normalize.rs
//
// Note text cleaning: lowercase, restrict the character set, collapse
// whitespace. Pure and total; never fails.

use regex::Regex;
use std::sync::OnceLock;

/// Characters outside the allowed set become a space.
fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s.,;:\-/]").expect("static regex is valid"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Normalise a raw note. `None` (a missing CSV cell) yields an empty string.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let lowered = raw.to_lowercase();
    let restricted = disallowed_re().replace_all(&lowered, " ");
    whitespace_re()
        .replace_all(&restricted, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_symbols() {
        assert_eq!(
            normalize(Some("Pump #3 LEAKING!! (again)")),
            "pump 3 leaking again"
        );
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        assert_eq!(
            normalize(Some("Checked: belt/roller - ok; 2.5mm, done.")),
            "checked: belt/roller - ok; 2.5mm, done."
        );
    }

    #[test]
    fn test_collapses_and_trims_whitespace() {
        assert_eq!(normalize(Some("  a\t\tb \n\n c  ")), "a b c");
    }

    #[test]
    fn test_missing_and_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
        assert_eq!(normalize(Some("@@@ ###")), "");
    }

    #[test]
    fn test_non_ascii_letters_become_spaces() {
        assert_eq!(normalize(Some("Öl über Düse")), "l ber d se");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Replaced the coolant filter, pump still vibrating.",
            "RESET done -- tested OK!!",
            "  Öl/Überdruck:  12 bar \u{00a0} alarm ",
            "",
            "already clean text",
        ];
        for s in samples {
            let once = normalize(Some(s));
            assert_eq!(normalize(Some(&once)), once, "not idempotent for {s:?}");
        }
    }
}
