// MaintLog - core/report.rs
//
// Report generation seam. The core only defines the capability ("given an
// extracted record, produce a report or fail"), the prompt text, and strict
// parsing of the model's answer. Transport lives in platform::openai.

use crate::core::model::{ExtractedRecord, Report, StatusTag};
use crate::util::error::ReportError;
use std::collections::BTreeSet;

/// Produces a maintenance report for one extracted record.
///
/// Implementations may perform I/O and may fail; callers must not assume
/// any retrying happens underneath.
pub trait ReportGenerator {
    fn generate(&self, record: &ExtractedRecord) -> Result<Report, ReportError>;
}

/// System prompt pinning the output schema.
pub const SYSTEM_PROMPT: &str = r#"You are a maintenance analysis assistant.
Return ONLY valid JSON that matches the schema exactly.
Do not add extra keys. Do not wrap in markdown.

Schema:
{
  "issue_summary": string,
  "likely_cause": string,
  "recommended_actions": [string],
  "priority": "low" | "medium" | "high",
  "safety_risk": "low" | "medium" | "high"
}"#;

/// Render the per-record user prompt.
pub fn build_user_prompt(record: &ExtractedRecord) -> String {
    let signals = &record.extracted;
    format!(
        "Maintenance log:\n\
         Machine: {machine}\n\
         Text: {text}\n\
         \n\
         Extracted signals:\n\
         Actions: {actions}\n\
         Components: {components}\n\
         Symptoms: {symptoms}\n\
         Status: {status}\n\
         \n\
         Task:\n\
         Create a concise maintenance report in the required JSON schema.\n\
         - issue_summary: 1 sentence\n\
         - likely_cause: best guess from text/signals (use 'unknown' if unclear)\n\
         - recommended_actions: 2-4 short action steps\n\
         - priority and safety_risk based on severity",
        machine = record.machine,
        text = record.text,
        actions = render_list(&signals.actions),
        components = render_list(&signals.components),
        symptoms = render_list(&signals.symptoms),
        status = render_status(&signals.status),
    )
}

fn render_list(items: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn render_status(tags: &[StatusTag]) -> String {
    let quoted: Vec<String> = tags.iter().map(|t| format!("'{}'", t.label())).collect();
    format!("[{}]", quoted.join(", "))
}

/// Parse the model's message content into a `Report`.
///
/// Strict: unknown keys, missing keys, and ratings outside low/medium/high
/// are all rejected. Surrounding whitespace is tolerated.
pub fn parse_report(content: &str) -> Result<Report, ReportError> {
    serde_json::from_str(content.trim()).map_err(|e| ReportError::InvalidReport { source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Level, SignalSet};

    fn record() -> ExtractedRecord {
        let mut extracted = SignalSet::default();
        extracted.actions.insert("replaced".to_string());
        extracted.components.insert("seal".to_string());
        extracted.components.insert("pump".to_string());
        extracted.status.push(StatusTag::Monitor);
        ExtractedRecord {
            log_id: 12,
            machine: "PRESS-2".to_string(),
            text: "replaced pump seal, monitor".to_string(),
            extracted,
        }
    }

    #[test]
    fn test_prompt_carries_record_and_signals() {
        let prompt = build_user_prompt(&record());
        assert!(prompt.contains("Machine: PRESS-2"));
        assert!(prompt.contains("Text: replaced pump seal, monitor"));
        assert!(prompt.contains("Actions: ['replaced']"));
        assert!(prompt.contains("Components: ['pump', 'seal']"));
        assert!(prompt.contains("Symptoms: []"));
        assert!(prompt.contains("Status: ['monitor']"));
    }

    #[test]
    fn test_parse_valid_report() {
        let content = r#"
            {"issue_summary": "Pump seal replaced after leak.",
             "likely_cause": "unknown",
             "recommended_actions": ["Check seal", "Log pressure"],
             "priority": "medium",
             "safety_risk": "low"}
        "#;
        let report = parse_report(content).unwrap();
        assert_eq!(report.priority, Level::Medium);
        assert_eq!(report.safety_risk, Level::Low);
        assert_eq!(report.recommended_actions.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_rating() {
        let content = r#"{"issue_summary": "x", "likely_cause": "y",
            "recommended_actions": [], "priority": "urgent", "safety_risk": "low"}"#;
        assert!(matches!(
            parse_report(content),
            Err(ReportError::InvalidReport { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_markdown_fence() {
        let content = "```json\n{}\n```";
        assert!(parse_report(content).is_err());
    }

    #[test]
    fn test_system_prompt_lists_every_field() {
        for field in [
            "issue_summary",
            "likely_cause",
            "recommended_actions",
            "priority",
            "safety_risk",
        ] {
            assert!(SYSTEM_PROMPT.contains(field), "missing {field}");
        }
    }
}
