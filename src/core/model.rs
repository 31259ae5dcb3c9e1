// MaintLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// Log Record (input unit)
// =============================================================================

/// One maintenance log row after column selection and `log_id` coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Numeric log identifier. Uniqueness is expected, not enforced.
    pub log_id: i64,

    /// Machine identifier (e.g. "CNC-12").
    pub machine: String,

    /// Note text, either pre-cleaned or raw depending on the source column.
    pub text: String,
}

// =============================================================================
// Category
// =============================================================================

/// Signal category a catalog rule routes its matches into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "ACTION")]
    Action,
    #[serde(alias = "COMPONENT")]
    Component,
    #[serde(alias = "SYMPTOM")]
    Symptom,
}

impl Category {
    /// Upper-case label as used in rule tables and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Action => "ACTION",
            Category::Component => "COMPONENT",
            Category::Symptom => "SYMPTOM",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Status tags
// =============================================================================

/// Fixed status enumeration, detected by literal substring triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTag {
    Monitor,
    TestedOk,
    Scheduled,
    ResetDone,
}

impl StatusTag {
    /// All tags in check order. This order is the output order.
    pub fn all() -> &'static [StatusTag] {
        &[
            StatusTag::Monitor,
            StatusTag::TestedOk,
            StatusTag::Scheduled,
            StatusTag::ResetDone,
        ]
    }

    /// Lowercase substring whose presence in a note emits this tag.
    pub fn trigger(&self) -> &'static str {
        match self {
            StatusTag::Monitor => "monitor",
            StatusTag::TestedOk => "tested ok",
            StatusTag::Scheduled => "scheduled",
            StatusTag::ResetDone => "reset",
        }
    }

    /// Serialised tag name.
    pub fn label(&self) -> &'static str {
        match self {
            StatusTag::Monitor => "monitor",
            StatusTag::TestedOk => "tested_ok",
            StatusTag::Scheduled => "scheduled",
            StatusTag::ResetDone => "reset_done",
        }
    }
}

impl std::fmt::Display for StatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Signal Set (output of extraction)
// =============================================================================

/// Structured signals extracted from one note.
///
/// The three phrase categories are ordered sets, so duplicates are
/// impossible and serialisation is always ascending. `status` keeps the
/// fixed check order of [`StatusTag::all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub actions: BTreeSet<String>,
    pub components: BTreeSet<String>,
    pub symptoms: BTreeSet<String>,
    pub status: Vec<StatusTag>,
}

impl SignalSet {
    /// Mutable access to the phrase set for a category.
    pub fn phrases_mut(&mut self, category: Category) -> &mut BTreeSet<String> {
        match category {
            Category::Action => &mut self.actions,
            Category::Component => &mut self.components,
            Category::Symptom => &mut self.symptoms,
        }
    }

    /// Phrase set for a category.
    pub fn phrases(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Action => &self.actions,
            Category::Component => &self.components,
            Category::Symptom => &self.symptoms,
        }
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
            && self.components.is_empty()
            && self.symptoms.is_empty()
            && self.status.is_empty()
    }
}

// =============================================================================
// Extracted Record (persisted unit)
// =============================================================================

/// One line of the extraction JSON-lines output. Field order is the
/// on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub log_id: i64,
    pub machine: String,
    pub text: String,
    pub extracted: SignalSet,
}

// =============================================================================
// Row error policy
// =============================================================================

/// What the batch runner does with a row that cannot become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowErrorPolicy {
    /// Record the failure in the run summary and continue with the next row.
    #[default]
    Skip,

    /// Stop at the first bad row; no output is written.
    Abort,
}

impl RowErrorPolicy {
    /// Parse a config/CLI value ("skip" or "abort", case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "skip" => Some(RowErrorPolicy::Skip),
            "abort" => Some(RowErrorPolicy::Abort),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowErrorPolicy::Skip => "skip",
            RowErrorPolicy::Abort => "abort",
        }
    }
}

// =============================================================================
// Reports (downstream collaborator format)
// =============================================================================

/// Three-step rating used for both priority and safety risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Natural-language maintenance report for one log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    pub issue_summary: String,
    pub likely_cause: String,
    pub recommended_actions: Vec<String>,
    pub priority: Level,
    pub safety_risk: Level,
}

/// One line of the report JSON-lines output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub log_id: i64,
    pub machine: String,
    pub report: Report,
}
