// MaintLog - core/catalog.rs
//
// Pattern catalog definition, validation, and compilation.
// Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::catalog_mgr which feeds content here.

use crate::core::model::Category;
use crate::core::token::Token;
use crate::util::constants;
use crate::util::error::CatalogError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML catalog as deserialized from a .toml file.
/// Validated and compiled into a `PatternCatalog` for runtime use.
#[derive(Debug, Deserialize)]
pub struct CatalogDefinition {
    pub catalog: CatalogMeta,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogMeta {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// How a rule decides whether tokens match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Single token, lemma in `words`.
    Lemma,
    /// Single token, lowercase surface form in `words`.
    Surface,
    /// Consecutive tokens, one accepted-form list per position in `tokens`.
    Sequence,
}

impl RuleKind {
    fn name(&self) -> &'static str {
        match self {
            RuleKind::Lemma => "lemma",
            RuleKind::Surface => "surface",
            RuleKind::Sequence => "sequence",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RuleDef {
    #[serde(default)]
    pub id: Option<String>,
    pub label: Category,
    pub kind: RuleKind,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<Vec<String>>,
}

// =============================================================================
// Runtime representation
// =============================================================================

/// Compiled token test of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMatcher {
    Lemma(HashSet<String>),
    Surface(HashSet<String>),
    Sequence(Vec<HashSet<String>>),
}

impl TokenMatcher {
    /// Number of consecutive tokens one match covers.
    pub fn width(&self) -> usize {
        match self {
            TokenMatcher::Lemma(_) | TokenMatcher::Surface(_) => 1,
            TokenMatcher::Sequence(positions) => positions.len(),
        }
    }

    /// Test a window of exactly `width()` tokens.
    pub fn matches(&self, window: &[Token<'_>]) -> bool {
        if window.len() != self.width() {
            return false;
        }
        match self {
            TokenMatcher::Lemma(words) => words.contains(&window[0].lemma),
            TokenMatcher::Surface(words) => words.contains(&window[0].lower),
            TokenMatcher::Sequence(positions) => positions
                .iter()
                .zip(window)
                .all(|(accepted, token)| accepted.contains(&token.lower)),
        }
    }
}

/// One labeled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub label: Category,
    pub matcher: TokenMatcher,
}

/// Validated, immutable rule table. Built once at startup and passed by
/// reference to the extraction engine.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub rules: Vec<Rule>,
    /// Whether this is the embedded catalog (true) or a user file (false).
    pub is_builtin: bool,
}

impl PatternCatalog {
    /// Every word any lemma rule accepts. These seed the lemmatizer lexicon
    /// so catalog verbs are always recognised as base forms.
    pub fn lemma_words(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().flat_map(|rule| match &rule.matcher {
            TokenMatcher::Lemma(words) => words.iter().map(String::as_str).collect::<Vec<_>>(),
            _ => Vec::new(),
        })
    }

    /// Number of rules routing into `category`.
    pub fn rule_count(&self, category: Category) -> usize {
        self.rules.iter().filter(|r| r.label == category).count()
    }
}

// =============================================================================
// Catalog validation and compilation
// =============================================================================

/// Parse a TOML string into a `CatalogDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_catalog_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<CatalogDefinition, CatalogError> {
    toml::from_str(toml_content).map_err(|e| CatalogError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Validate a `CatalogDefinition` and compile it into a `PatternCatalog`.
///
/// Validates:
/// - Required metadata is present and non-empty
/// - Rule count, word counts and sequence lengths are within limits
/// - Every rule (and every sequence position) accepts at least one word
///
/// Words are trimmed and lowercased; a warning is logged when that changes
/// a word, or when a word can never equal a single token.
pub fn validate_and_compile(
    def: CatalogDefinition,
    source_path: &Path,
    is_builtin: bool,
) -> Result<PatternCatalog, CatalogError> {
    let id = def.catalog.id.trim().to_string();

    if id.is_empty() {
        return Err(CatalogError::MissingField {
            catalog_id: "(empty)".to_string(),
            field: "catalog.id",
        });
    }
    if def.catalog.name.trim().is_empty() {
        return Err(CatalogError::MissingField {
            catalog_id: id,
            field: "catalog.name",
        });
    }
    if def.rules.is_empty() {
        return Err(CatalogError::MissingField {
            catalog_id: id,
            field: "rules",
        });
    }
    if def.rules.len() > constants::MAX_CATALOG_RULES {
        return Err(CatalogError::TooManyRules {
            count: def.rules.len(),
            max: constants::MAX_CATALOG_RULES,
        });
    }

    let mut rules = Vec::with_capacity(def.rules.len());
    for (index, rule_def) in def.rules.into_iter().enumerate() {
        let rule_id = rule_def
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}-{}-{index}",
                    rule_def.label.label().to_lowercase(),
                    rule_def.kind.name()
                )
            });

        let matcher = match rule_def.kind {
            RuleKind::Lemma | RuleKind::Surface => {
                if !rule_def.tokens.is_empty() {
                    tracing::warn!(
                        catalog_id = %id,
                        rule = %rule_id,
                        source = %source_path.display(),
                        "Rule has 'tokens' but is not a sequence rule; ignoring them"
                    );
                }
                let words = compile_word_list(&id, &rule_id, source_path, rule_def.words)?;
                if rule_def.kind == RuleKind::Lemma {
                    TokenMatcher::Lemma(words)
                } else {
                    TokenMatcher::Surface(words)
                }
            }
            RuleKind::Sequence => {
                if rule_def.tokens.is_empty() {
                    return Err(CatalogError::EmptyWordList {
                        catalog_id: id,
                        rule: rule_id,
                    });
                }
                if rule_def.tokens.len() > constants::MAX_SEQUENCE_LENGTH {
                    return Err(CatalogError::SequenceTooLong {
                        catalog_id: id,
                        rule: rule_id,
                        length: rule_def.tokens.len(),
                        max_length: constants::MAX_SEQUENCE_LENGTH,
                    });
                }
                if !rule_def.words.is_empty() {
                    tracing::warn!(
                        catalog_id = %id,
                        rule = %rule_id,
                        source = %source_path.display(),
                        "Sequence rule has 'words'; only 'tokens' is used"
                    );
                }
                let positions = rule_def
                    .tokens
                    .into_iter()
                    .map(|position| compile_word_list(&id, &rule_id, source_path, position))
                    .collect::<Result<Vec<_>, _>>()?;
                TokenMatcher::Sequence(positions)
            }
        };

        rules.push(Rule {
            id: rule_id,
            label: rule_def.label,
            matcher,
        });
    }

    Ok(PatternCatalog {
        id,
        name: def.catalog.name,
        version: def.catalog.version,
        description: def.catalog.description,
        rules,
        is_builtin,
    })
}

/// Normalise and bound-check one accepted-word list.
fn compile_word_list(
    catalog_id: &str,
    rule_id: &str,
    source_path: &Path,
    words: Vec<String>,
) -> Result<HashSet<String>, CatalogError> {
    if words.len() > constants::MAX_WORDS_PER_RULE {
        return Err(CatalogError::TooManyWords {
            catalog_id: catalog_id.to_string(),
            rule: rule_id.to_string(),
            count: words.len(),
            max: constants::MAX_WORDS_PER_RULE,
        });
    }

    let mut compiled = HashSet::with_capacity(words.len());
    for word in words {
        let normalised = word.trim().to_lowercase();
        if normalised.is_empty() {
            continue;
        }
        if normalised != word {
            tracing::warn!(
                catalog_id,
                rule = rule_id,
                word = %word,
                "Catalog word was not trimmed lowercase; normalised"
            );
        }
        if !is_single_token(&normalised) {
            tracing::warn!(
                catalog_id,
                rule = rule_id,
                word = %normalised,
                source = %source_path.display(),
                "Catalog word spans several tokens and can never match; use a sequence rule"
            );
        }
        compiled.insert(normalised);
    }

    if compiled.is_empty() {
        return Err(CatalogError::EmptyWordList {
            catalog_id: catalog_id.to_string(),
            rule: rule_id.to_string(),
        });
    }
    Ok(compiled)
}

/// Mirrors the tokenizer: a word run, or exactly one other character.
fn is_single_token(word: &str) -> bool {
    word.chars().all(char::is_alphanumeric) || word.chars().count() == 1
}

// =============================================================================
// Built-in catalog (embedded at compile time)
// =============================================================================

/// Embedded TOML content for the built-in catalog as (filename, content).
pub fn builtin_catalog_source() -> (&'static str, &'static str) {
    (
        "maintenance.toml",
        include_str!("../../rules/maintenance.toml"),
    )
}

/// Load and validate the built-in catalog.
///
/// A failure here is a packaging bug, but it is still reported as an error
/// rather than a panic so the CLI can exit cleanly.
pub fn load_builtin_catalog() -> Result<PatternCatalog, CatalogError> {
    let (filename, content) = builtin_catalog_source();
    let path = PathBuf::from(format!("<builtin>/{filename}"));
    let catalog = parse_catalog_toml(content, &path)
        .and_then(|def| validate_and_compile(def, &path, true))?;

    tracing::debug!(
        catalog_id = %catalog.id,
        rules = catalog.rules.len(),
        "Loaded built-in catalog"
    );
    Ok(catalog)
}

// =============================================================================
// Tests
// =============================================================================
