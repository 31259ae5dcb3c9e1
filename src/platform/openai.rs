// MaintLog - platform/openai.rs
//
// Report generator backed by an OpenAI-compatible chat-completions endpoint.
// One blocking request per record, JSON-object response format, no retries.

use crate::core::model::{ExtractedRecord, Report};
use crate::core::report::{build_user_prompt, parse_report, ReportGenerator, SYSTEM_PROMPT};
use crate::platform::config::ReportConfig;
use crate::util::constants;
use crate::util::error::{ConfigError, ReportError};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub struct OpenAiReportGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
}

impl OpenAiReportGenerator {
    /// Build a generator reading the API key from the configured
    /// environment variable. Fails before any request when the key is
    /// unset or blank.
    pub fn from_env(config: &ReportConfig) -> Result<Self, ConfigError> {
        let key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::new(config, key)
    }

    pub fn new(config: &ReportConfig, api_key: String) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient { source: e })?;

        tracing::info!(
            model = %config.model,
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Report generator ready"
        );

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Chat-completions request body for one record.
    pub fn request_body(&self, record: &ExtractedRecord) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(record) },
            ],
        })
    }
}

impl ReportGenerator for OpenAiReportGenerator {
    fn generate(&self, record: &ExtractedRecord) -> Result<Report, ReportError> {
        tracing::debug!(log_id = record.log_id, model = %self.model, "Requesting report");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(record))
            .send()
            .map_err(|e| ReportError::Http { source: e })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReportError::Status {
                status: status.as_u16(),
                body: body.chars().take(constants::MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let payload: Value = response
            .json()
            .map_err(|e| ReportError::Http { source: e })?;
        let content = extract_message_content(&payload)?;
        parse_report(content)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn extract_message_content(payload: &Value) -> Result<&str, ReportError> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ReportError::MalformedResponse {
            reason: "missing choices[0].message.content".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SignalSet;

    fn generator() -> OpenAiReportGenerator {
        let config = ReportConfig {
            base_url: "http://localhost:9/v1/".to_string(),
            ..ReportConfig::default()
        };
        OpenAiReportGenerator::new(&config, "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let record = ExtractedRecord {
            log_id: 7,
            machine: "LATHE-1".to_string(),
            text: "spindle noise, monitor".to_string(),
            extracted: SignalSet::default(),
        };
        let body = generator().request_body(&record);
        assert_eq!(body["model"], constants::DEFAULT_REPORT_MODEL);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("Machine: LATHE-1"));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        assert_eq!(generator().endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_extract_message_content() {
        let payload = json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"a\":1}" } }]
        });
        assert_eq!(extract_message_content(&payload).unwrap(), "{\"a\":1}");

        let empty = json!({ "choices": [] });
        assert!(matches!(
            extract_message_content(&empty),
            Err(ReportError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_from_env_requires_key() {
        let config = ReportConfig {
            api_key_env: "MAINTLOG_TEST_UNSET_KEY_VAR".to_string(),
            ..ReportConfig::default()
        };
        assert!(matches!(
            OpenAiReportGenerator::from_env(&config),
            Err(ConfigError::MissingApiKey { .. })
        ));
    }
}
