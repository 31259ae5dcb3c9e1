// MaintLog - core/extract.rs
//
// Signal extraction engine. Applies every catalog rule independently over
// the full token sequence (overlapping matches allowed), routes matched spans
// into per-category ordered sets, and detects status tags by substring.
// Core layer: pure logic, no I/O.

use crate::core::catalog::PatternCatalog;
use crate::core::lemma::Lemmatizer;
use crate::core::model::{SignalSet, StatusTag};
use crate::core::token::tokenize;

/// Immutable extraction engine. Safe to call repeatedly; holds no per-call
/// state.
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: PatternCatalog,
    lemmatizer: Lemmatizer,
}

impl Extractor {
    /// Build an engine around a validated catalog. The lemmatizer lexicon is
    /// extended with the catalog's lemma words.
    pub fn new(catalog: PatternCatalog) -> Self {
        let lemmatizer = Lemmatizer::new(catalog.lemma_words());
        Self {
            catalog,
            lemmatizer,
        }
    }

    /// The catalog this engine applies.
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Extract the signal set of one note.
    pub fn extract(&self, text: &str) -> SignalSet {
        let tokens = tokenize(text, &self.lemmatizer);
        let mut signals = SignalSet::default();

        for rule in &self.catalog.rules {
            let width = rule.matcher.width();
            if width == 0 || tokens.len() < width {
                continue;
            }
            for window in tokens.windows(width) {
                if !rule.matcher.matches(window) {
                    continue;
                }
                let (first, last) = (&window[0], &window[width - 1]);
                let span = text[first.start..last.end].trim();
                if !span.is_empty() {
                    signals.phrases_mut(rule.label).insert(span.to_string());
                }
            }
        }

        signals.status = detect_status(text);
        signals
    }
}

/// Status tags present in `text`, in fixed check order. Plain substring
/// containment on the lowercased text, independent of tokenization.
pub fn detect_status(text: &str) -> Vec<StatusTag> {
    let lowered = text.to_lowercase();
    StatusTag::all()
        .iter()
        .filter(|tag| lowered.contains(tag.trigger()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::load_builtin_catalog;
    use crate::core::model::Category;

    fn extractor() -> Extractor {
        Extractor::new(load_builtin_catalog().unwrap())
    }

    fn sorted(items: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    fn as_vec(set: &std::collections::BTreeSet<String>) -> Vec<String> {
        set.iter().cloned().collect()
    }

    #[test]
    fn test_raw_sentence() {
        let s = extractor().extract("Replaced the coolant filter, pump still vibrating.");
        assert_eq!(as_vec(&s.actions), ["Replaced"]);
        assert_eq!(
            as_vec(&s.components),
            ["coolant", "coolant filter", "filter", "pump"]
        );
        assert!(s.symptoms.is_empty(), "vibrating is not in the vocabulary");
        assert!(s.status.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let s = extractor().extract("");
        assert!(s.is_empty());
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"actions":[],"components":[],"symptoms":[],"status":[]}"#
        );
    }

    #[test]
    fn test_no_vocabulary_hits() {
        let s = extractor().extract("operator shift handover, nothing to note");
        assert!(s.is_empty());
    }

    #[test]
    fn test_status_fixed_order() {
        let s = extractor().extract("Reset done, tested ok, scheduled for monitor.");
        assert_eq!(
            s.status,
            [
                StatusTag::Monitor,
                StatusTag::TestedOk,
                StatusTag::Scheduled,
                StatusTag::ResetDone
            ]
        );
    }

    #[test]
    fn test_status_is_substring_not_token_match() {
        assert_eq!(detect_status("monitoring vibration"), [StatusTag::Monitor]);
        assert_eq!(detect_status("preset value"), [StatusTag::ResetDone]);
        assert_eq!(detect_status("TESTED OK"), [StatusTag::TestedOk]);
        assert!(detect_status("tested, ok").is_empty());
    }

    #[test]
    fn test_lemma_and_surface_rules_overlap() {
        let s = extractor().extract("cleaning the roller, recalibrated sensor, topped up oil");
        assert_eq!(as_vec(&s.actions), sorted(&["cleaning", "recalibrated", "topped"]));
        assert_eq!(as_vec(&s.components), sorted(&["oil", "roller"]));
    }

    #[test]
    fn test_multi_token_symptoms() {
        let s = extractor().extract("hydraulic pressure drop and poor finish on part");
        assert_eq!(
            as_vec(&s.symptoms),
            sorted(&["poor finish", "pressure", "pressure drop"])
        );
    }

    #[test]
    fn test_loose_wiring_component() {
        let s = extractor().extract("found loose wiring near motor");
        assert_eq!(
            as_vec(&s.components),
            sorted(&["loose wiring", "motor", "wiring"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let s = extractor().extract("leak at pump. pump leak again, leak leak");
        assert_eq!(as_vec(&s.symptoms), ["leak"]);
        assert_eq!(as_vec(&s.components), ["pump"]);
    }

    #[test]
    fn test_case_preserved_and_distinct() {
        let s = extractor().extract("Pump ok, pump ok");
        assert_eq!(as_vec(&s.components), ["Pump", "pump"]);
    }

    #[test]
    fn test_reset_is_action_and_status() {
        let s = extractor().extract("alarm reset");
        assert_eq!(as_vec(&s.actions), ["reset"]);
        assert_eq!(as_vec(&s.symptoms), ["alarm"]);
        assert_eq!(s.status, [StatusTag::ResetDone]);
    }

    #[test]
    fn test_idempotent() {
        let e = extractor();
        let text = "inspected bearing, noise and vibration, scheduled belt change";
        let first = serde_json::to_string(&e.extract(text)).unwrap();
        let second = serde_json::to_string(&e.extract(text)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sets_sorted_and_unique() {
        let e = extractor();
        let s = e.extract("tool seal belt bearing filter tool seal pump motor reservoir oil");
        for category in [Category::Action, Category::Component, Category::Symptom] {
            let phrases = as_vec(s.phrases(category));
            let mut expected = phrases.clone();
            expected.sort();
            expected.dedup();
            assert_eq!(phrases, expected);
        }
    }
}
