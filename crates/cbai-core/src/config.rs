//! Agent configuration as served over IPC.
//!
//! The agent owns the configuration file; the CLI only ever sees this
//! deserialized snapshot, fetched fresh for every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How to reach a text-generation backend.
///
/// `kind` is an open set: `ollama`, `openai`, `anthropic`, or anything
/// else for a custom OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Human-readable label used in policy messages: the kind, or the
    /// endpoint when the kind is empty.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.kind.is_empty() {
            self.endpoint.as_deref().unwrap_or("unknown")
        } else {
            &self.kind
        }
    }
}

/// Per-action toggle in the agent's automation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionToggle {
    pub enabled: bool,
    pub trigger: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub poll_interval: u64,
    pub safe_mode: bool,
    pub notifications: bool,
    pub log_level: String,
}

/// Full configuration snapshot returned by the agent's `/config` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub actions: BTreeMap<String, ActionToggle>,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "provider": {"type": "ollama", "endpoint": "http://localhost:11434/v1", "model": "mistral"},
            "actions": {"summary": {"enabled": true, "trigger": "double-copy"}},
            "settings": {"poll_interval": 150, "safe_mode": true, "notifications": false, "log_level": "info"}
        }"#
    }

    #[test]
    fn deserializes_agent_config() {
        let config: AgentConfig = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(config.provider.kind, "ollama");
        assert_eq!(config.provider.model, "mistral");
        assert!(config.provider.api_key.is_none());
        assert!(config.settings.safe_mode);
        assert!(config.actions["summary"].enabled);
    }

    #[test]
    fn provider_kind_round_trips_as_type() {
        let config: AgentConfig = serde_json::from_str(sample_json()).unwrap();
        let json = serde_json::to_value(&config.provider).unwrap();
        assert_eq!(json["type"], "ollama");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn label_prefers_kind() {
        let provider = ProviderConfig {
            kind: "openai".into(),
            endpoint: Some("https://api.openai.com/v1".into()),
            model: "gpt-4o-mini".into(),
            api_key: None,
        };
        assert_eq!(provider.label(), "openai");
    }

    #[test]
    fn label_falls_back_to_endpoint() {
        let provider = ProviderConfig {
            kind: String::new(),
            endpoint: Some("https://llm.internal/v1".into()),
            model: "m".into(),
            api_key: None,
        };
        assert_eq!(provider.label(), "https://llm.internal/v1");
    }

    #[test]
    fn missing_actions_defaults_empty() {
        let json = r#"{
            "provider": {"type": "ollama", "model": "mistral"},
            "settings": {"poll_interval": 150, "safe_mode": false, "notifications": true, "log_level": "debug"}
        }"#;
        let config: AgentConfig = serde_json::from_str(json).unwrap();
        assert!(config.actions.is_empty());
        assert!(config.provider.endpoint.is_none());
    }
}
