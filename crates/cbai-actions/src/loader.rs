//! Declarative plugin actions loaded from `.toml` / `.json` files.
//!
//! A bad plugin file never takes the CLI down: each file is parsed in
//! isolation, failures are logged and the file is skipped.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use serde_json::Value;
use tracing::warn;

use crate::types::{ActionBehavior, ActionDefinition};

/// Environment override for the plugin directory, mainly for tests.
pub const PLUGIN_DIR_ENV: &str = "CBAI_PLUGIN_DIR";

/// Directory scanned for plugin action files.
#[must_use]
pub fn plugin_dir() -> PathBuf {
    std::env::var_os(PLUGIN_DIR_ENV)
        .map_or_else(|| cbai_core::paths::app_dir().join("actions"), PathBuf::from)
}

/// Load every parseable action file under `dir`, lexicographic by file name.
///
/// Missing directory means no plugins. Unreadable or malformed files are
/// skipped with a warning.
#[must_use]
pub fn load_plugin_actions(dir: &Path) -> Vec<ActionDefinition> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "cannot read plugin directory");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("toml" | "json")
            )
        })
        .collect();
    paths.sort();

    let mut actions = Vec::new();
    for path in paths {
        match load_action_file(&path) {
            Ok(action) => actions.push(action),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping plugin action file");
            }
        }
    }
    actions
}

fn load_action_file(path: &Path) -> anyhow::Result<ActionDefinition> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let doc: Value = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        serde_json::from_str(&raw).context("invalid JSON")?
    } else {
        let table: toml::Value = toml::from_str(&raw).context("invalid TOML")?;
        serde_json::to_value(table).context("TOML document is not representable")?
    };

    parse_action(&doc)
}

/// Accept the three layouts plugin files come in:
/// the action fields at the document root, an `action` table, or a
/// `metadata` table alongside a root-level run spec.
fn parse_action(doc: &Value) -> anyhow::Result<ActionDefinition> {
    if let Some(nested) = doc.get("action") {
        return build_action(nested, nested);
    }
    if let Some(metadata) = doc.get("metadata") {
        return build_action(metadata, doc);
    }
    build_action(doc, doc)
}

fn build_action(meta: &Value, run: &Value) -> anyhow::Result<ActionDefinition> {
    let id = meta
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| anyhow!("missing or empty \"id\""))?
        .to_owned();

    let aliases = meta
        .get("aliases")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|value| {
                    let alias = value.as_str();
                    if alias.is_none() {
                        warn!(?value, "dropping non-string alias");
                    }
                    alias.map(str::to_owned)
                })
                .collect()
        })
        .unwrap_or_default();

    let description = meta
        .get("description")
        .and_then(Value::as_str)
        .filter(|description| !description.is_empty())
        .map_or_else(|| format!("Plugin action: {id}"), str::to_owned);

    let progress_message = meta
        .get("progress_message")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let output_title = meta
        .get("output_title")
        .and_then(Value::as_str)
        .map_or_else(|| id.clone(), str::to_owned);

    let behavior = parse_behavior(run)?;

    Ok(ActionDefinition {
        id,
        aliases,
        description,
        progress_message,
        output_title,
        behavior,
    })
}

fn parse_behavior(run: &Value) -> anyhow::Result<ActionBehavior> {
    if let Some(template) = run.get("prompt") {
        let template = template
            .as_str()
            .ok_or_else(|| anyhow!("\"prompt\" must be a string"))?;
        if template.is_empty() {
            bail!("\"prompt\" must not be empty");
        }
        let system = run
            .get("system")
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Ok(ActionBehavior::Prompt {
            template: template.to_owned(),
            system,
        });
    }

    if let Some(command) = run.get("command") {
        let argv: Vec<String> = command
            .as_array()
            .ok_or_else(|| anyhow!("\"command\" must be an array of strings"))?
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| anyhow!("\"command\" must be an array of strings"))
            })
            .collect::<anyhow::Result<_>>()?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("\"command\" must not be empty"))?;
        return Ok(ActionBehavior::Command {
            program: program.clone(),
            args: args.to_vec(),
        });
    }

    bail!("action needs either a \"prompt\" or a \"command\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_plugin_actions(&missing).is_empty());
    }

    #[test]
    fn loads_root_shape_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("shout.toml"),
            r#"
id = "shout"
aliases = ["loud"]
description = "Uppercase the text"
output_title = "Shouted"
command = ["tr", "a-z", "A-Z"]
"#,
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.id, "shout");
        assert_eq!(action.aliases, ["loud"]);
        assert_eq!(action.output_title, "Shouted");
        assert_eq!(
            action.behavior,
            ActionBehavior::Command {
                program: "tr".into(),
                args: vec!["a-z".into(), "A-Z".into()],
            }
        );
    }

    #[test]
    fn loads_nested_action_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("haiku.toml"),
            r#"
[action]
id = "haiku"
description = "Turn the text into a haiku"
prompt = "Write a haiku about:\n\n{text}"
system = "You are a poet."
"#,
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "haiku");
        assert_eq!(
            actions[0].behavior,
            ActionBehavior::Prompt {
                template: "Write a haiku about:\n\n{text}".into(),
                system: Some("You are a poet.".into()),
            }
        );
    }

    #[test]
    fn loads_metadata_shape_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("emoji.json"),
            r#"{
  "metadata": { "id": "emoji", "output_title": "Emoji" },
  "prompt": "Pick one emoji for: {text}"
}"#,
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "emoji");
        assert_eq!(actions[0].output_title, "Emoji");
    }

    #[test]
    fn malformed_file_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a-broken.toml"), "id = ").unwrap();
        fs::write(dir.path().join("b-no-run.toml"), "id = \"noop\"").unwrap();
        fs::write(
            dir.path().join("c-good.toml"),
            "id = \"good\"\nprompt = \"Do the thing: {text}\"",
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id, "good");
    }

    #[test]
    fn files_load_in_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("zz.toml"),
            "id = \"last\"\nprompt = \"p {text}\"",
        )
        .unwrap();
        fs::write(
            dir.path().join("aa.toml"),
            "id = \"first\"\nprompt = \"p {text}\"",
        )
        .unwrap();

        let ids: Vec<String> = load_plugin_actions(dir.path())
            .into_iter()
            .map(|action| action.id)
            .collect();
        assert_eq!(ids, ["first", "last"]);
    }

    #[test]
    fn non_string_aliases_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("mixed.json"),
            r#"{ "id": "mixed", "aliases": ["ok", 7, null], "prompt": "p" }"#,
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions[0].aliases, ["ok"]);
    }

    #[test]
    fn non_action_extensions_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "# not an action").unwrap();
        fs::write(
            dir.path().join("real.toml"),
            "id = \"real\"\nprompt = \"p {text}\"",
        )
        .unwrap();

        assert_eq!(load_plugin_actions(dir.path()).len(), 1);
    }

    #[test]
    fn defaults_fill_in() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bare.toml"),
            "id = \"bare\"\nprompt = \"p {text}\"",
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        let action = &actions[0];
        assert!(action.aliases.is_empty());
        assert_eq!(action.description, "Plugin action: bare");
        assert!(action.progress_message.is_none());
        assert_eq!(action.output_title, "bare");
    }

    #[test]
    fn empty_description_is_synthesized_too() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("blank.toml"),
            "id = \"blank\"\ndescription = \"\"\nprompt = \"p {text}\"",
        )
        .unwrap();

        let actions = load_plugin_actions(dir.path());
        assert_eq!(actions[0].description, "Plugin action: blank");
    }
}
