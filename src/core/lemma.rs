// MaintLog - core/lemma.rs
//
// Rule-based English lemmatizer tuned for maintenance narratives.
//
// Lookup order: irregular exceptions, then the word itself if it is a known
// base form, then suffix rules whose candidates must be in the lexicon.
// Words with no accepted candidate keep their lowercase form, which is why
// catalogs also carry surface-form rules for jargon the rules cannot reach.

use std::collections::HashSet;

/// Irregular inflections: (inflected form, base form).
const IRREGULAR: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("did", "do"),
    ("done", "do"),
    ("does", "do"),
    ("ran", "run"),
    ("broke", "break"),
    ("broken", "break"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("took", "take"),
    ("taken", "take"),
    ("made", "make"),
    ("found", "find"),
    ("left", "leave"),
    ("shook", "shake"),
    ("shaken", "shake"),
    ("bent", "bend"),
    ("ground", "grind"),
    ("began", "begin"),
    ("begun", "begin"),
    ("went", "go"),
    ("gone", "go"),
    ("got", "get"),
    ("gotten", "get"),
    ("kept", "keep"),
    ("fed", "feed"),
    ("led", "lead"),
    ("rode", "ride"),
    ("stuck", "stick"),
    ("spun", "spin"),
];

/// Base forms known to the lemmatizer in addition to catalog vocabulary.
const BASE_LEXICON: &[&str] = &[
    // verbs common in maintenance notes
    "add", "align", "adjust", "assemble", "begin", "bend", "bleed", "break", "calibrate",
    "change", "charge", "check", "clean", "clear", "close", "confirm", "connect", "cool",
    "disassemble", "disconnect", "drain", "drop", "fail", "feed", "fill", "find", "fit",
    "fix", "flush", "freeze", "get", "go", "grease", "grind", "heat", "hold", "inspect",
    "install", "jam", "keep", "lead", "leak", "leave", "level", "loosen", "lubricate",
    "make", "measure", "monitor", "mount", "note", "oil", "open", "order", "overheat",
    "pass", "prime", "pump", "rattle", "realign", "rebuild", "recalibrate", "record",
    "refill", "reinstall", "remove", "repair", "replace", "report", "reset", "restart",
    "restore", "retighten", "ride", "run", "schedule", "seal", "secure", "seize", "set",
    "shake", "shut", "slip", "spin", "squeal", "start", "stick", "stop", "swap", "take",
    "test", "tighten", "top", "trip", "turn", "update", "use", "vibrate", "wear", "weld",
    "wipe",
    // frequent nouns whose plurals show up in notes
    "alarm", "bearing", "belt", "bolt", "cable", "chain", "clamp", "coupling", "drive",
    "fan", "filter", "fitting", "fuse", "gasket", "gear", "guard", "hose", "leak",
    "light", "line", "machine", "motor", "noise", "nozzle", "nut", "part", "pressure",
    "reservoir", "roller", "screw", "sensor", "shaft", "spindle", "spring", "switch",
    "tool", "valve", "wire", "wiring",
    // auxiliaries targeted by the irregular table
    "be", "have", "do",
];

/// Suffix rules in priority order: (suffix, replacement).
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ied", "y"),
    ("ing", ""),
    ("ing", "e"),
    ("ed", ""),
    ("ed", "e"),
    ("es", ""),
    ("s", ""),
];

/// Minimum stem length (in bytes) a suffix rule may leave behind.
const MIN_STEM_LEN: usize = 2;

/// Immutable lemmatizer. Construct once and share by reference.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    lexicon: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl Lemmatizer {
    /// Build a lemmatizer whose lexicon is the built-in base forms plus
    /// `extra_base_forms` (typically every lemma word of a catalog).
    pub fn new<I, S>(extra_base_forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon: HashSet<String> = BASE_LEXICON.iter().map(|w| w.to_string()).collect();
        lexicon.extend(
            extra_base_forms
                .into_iter()
                .map(|w| w.as_ref().to_lowercase()),
        );
        Self { lexicon }
    }

    /// True if `word` is a known base form.
    pub fn is_base_form(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    /// Lemma of an already-lowercased word.
    pub fn lemma(&self, lower: &str) -> String {
        if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == lower) {
            return (*base).to_string();
        }
        if self.is_base_form(lower) {
            return lower.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            let Some(stem) = lower.strip_suffix(suffix) else {
                continue;
            };
            if stem.len() < MIN_STEM_LEN {
                continue;
            }

            let candidate = format!("{stem}{replacement}");
            if self.is_base_form(&candidate) {
                return candidate;
            }

            // topped -> topp -> top, resetting -> resett -> reset
            if replacement.is_empty() {
                if let Some(undoubled) = undouble(stem) {
                    if self.is_base_form(undoubled) {
                        return undoubled.to_string();
                    }
                }
            }
        }

        lower.to_string()
    }
}

/// Strip a doubled final consonant ("topp" -> "top").
fn undouble(stem: &str) -> Option<&str> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let prev = chars.next()?;
    if last == prev && last.is_ascii_alphabetic() && !"aeiou".contains(last) {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmatizer() -> Lemmatizer {
        Lemmatizer::default()
    }

    #[test]
    fn test_regular_past_tense() {
        let l = lemmatizer();
        assert_eq!(l.lemma("replaced"), "replace");
        assert_eq!(l.lemma("cleaned"), "clean");
        assert_eq!(l.lemma("tightened"), "tighten");
        assert_eq!(l.lemma("changed"), "change");
        assert_eq!(l.lemma("lubricated"), "lubricate");
    }

    #[test]
    fn test_progressive_and_plural() {
        let l = lemmatizer();
        assert_eq!(l.lemma("cleaning"), "clean");
        assert_eq!(l.lemma("replacing"), "replace");
        assert_eq!(l.lemma("changes"), "change");
        assert_eq!(l.lemma("filters"), "filter");
        assert_eq!(l.lemma("batteries"), "batteries");
    }

    #[test]
    fn test_doubled_consonant() {
        let l = lemmatizer();
        assert_eq!(l.lemma("topped"), "top");
        assert_eq!(l.lemma("topping"), "top");
        assert_eq!(l.lemma("resetting"), "reset");
        assert_eq!(l.lemma("jammed"), "jam");
    }

    #[test]
    fn test_irregular_forms() {
        let l = lemmatizer();
        assert_eq!(l.lemma("worn"), "wear");
        assert_eq!(l.lemma("was"), "be");
        assert_eq!(l.lemma("broken"), "break");
    }

    #[test]
    fn test_base_forms_are_stable() {
        let l = lemmatizer();
        for word in ["reset", "bearing", "pressure", "top", "pass"] {
            assert_eq!(l.lemma(word), word);
        }
    }

    #[test]
    fn test_suffix_candidates_need_lexicon_entry() {
        let l = lemmatizer();
        assert_eq!(l.lemma("vibrating"), "vibrate");
        assert_eq!(l.lemma("recalibrated"), "recalibrate");
        assert_eq!(l.lemma("xyzzed"), "xyzzed");
        assert_eq!(l.lemma("cnc"), "cnc");
    }

    #[test]
    fn test_extra_base_forms_extend_lexicon() {
        let plain = lemmatizer();
        assert_eq!(plain.lemma("degreased"), "degreased");

        let extended = Lemmatizer::new(["Degrease"]);
        assert_eq!(extended.lemma("degreased"), "degrease");
        assert!(extended.is_base_form("degrease"));
    }

    #[test]
    fn test_short_stems_rejected() {
        let l = Lemmatizer::new(["b"]);
        assert_eq!(l.lemma("bed"), "bed");
    }
}
