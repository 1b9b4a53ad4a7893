//! The built-in action set.

use crate::types::{ActionBehavior, ActionDefinition};

/// All actions the binary ships with.
///
/// Ids and aliases here are the reserved namespace: plugin actions that
/// collide with any of these names are rejected at merge time.
#[must_use]
pub fn builtin_actions() -> Vec<ActionDefinition> {
    vec![
        ActionDefinition {
            id: "summary".into(),
            aliases: vec!["summarize".into(), "sum".into()],
            description: "Summarize clipboard content".into(),
            progress_message: Some("Summarizing clipboard content...".into()),
            output_title: "Summary".into(),
            behavior: ActionBehavior::Summarize,
        },
        ActionDefinition {
            id: "explain".into(),
            aliases: vec![],
            description: "Explain clipboard content (good for code)".into(),
            progress_message: Some("Explaining clipboard content...".into()),
            output_title: "Explanation".into(),
            behavior: ActionBehavior::Explain,
        },
        ActionDefinition {
            id: "translate".into(),
            aliases: vec![],
            description: "Translate clipboard to target language".into(),
            progress_message: Some("Translating clipboard content...".into()),
            output_title: "Translation".into(),
            behavior: ActionBehavior::Translate,
        },
        ActionDefinition {
            id: "improve".into(),
            aliases: vec![],
            description: "Improve writing in clipboard".into(),
            progress_message: Some("Improving writing...".into()),
            output_title: "Improved".into(),
            behavior: ActionBehavior::Improve,
        },
        ActionDefinition {
            id: "extract".into(),
            aliases: vec![],
            description: "Extract structured data from clipboard".into(),
            progress_message: Some("Extracting structured data...".into()),
            output_title: "Extracted Data".into(),
            behavior: ActionBehavior::Extract,
        },
        ActionDefinition {
            id: "tldr".into(),
            aliases: vec![],
            description: "Get a very brief summary (1-2 sentences)".into(),
            progress_message: None,
            output_title: "TL;DR".into(),
            behavior: ActionBehavior::Tldr,
        },
        ActionDefinition {
            id: "classify".into(),
            aliases: vec![],
            description: "Classify clipboard content by type".into(),
            progress_message: Some("Classifying clipboard content...".into()),
            output_title: "Classification".into(),
            behavior: ActionBehavior::Classify,
        },
    ]
}
