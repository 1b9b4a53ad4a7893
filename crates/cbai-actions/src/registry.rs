//! Name resolution over the combined action set.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::warn;

use crate::builtin::builtin_actions;
use crate::loader::{load_plugin_actions, plugin_dir};
use crate::types::ActionDefinition;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate action id: {id}")]
    DuplicateId { id: String },

    #[error("Duplicate action name or alias: {name}")]
    DuplicateName { name: String },
}

/// Lookup table from action ids and aliases to their definitions.
#[derive(Debug)]
pub struct ActionRegistry {
    actions: Vec<ActionDefinition>,
    by_name: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Build a registry, rejecting any id or alias collision.
    ///
    /// # Errors
    ///
    /// Returns an error when two actions share an id, or when a name
    /// (id or alias) is claimed twice.
    pub fn new(actions: Vec<ActionDefinition>) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::new();
        let mut ids = HashMap::new();
        for (index, action) in actions.iter().enumerate() {
            if ids.insert(action.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId {
                    id: action.id.clone(),
                });
            }
            for name in action.names() {
                if by_name.insert(name.to_owned(), index).is_some() {
                    return Err(RegistryError::DuplicateName {
                        name: name.to_owned(),
                    });
                }
            }
        }
        Ok(Self { actions, by_name })
    }

    /// Combine built-in and plugin actions.
    ///
    /// Built-ins are strict: a collision among them is a bug and fails
    /// construction. Plugins are lenient: a plugin action whose id or any
    /// alias is already taken is skipped whole, with a warning naming the
    /// colliding names. Built-ins always win; among plugins, earlier
    /// (lexicographically earlier file) wins.
    ///
    /// # Errors
    ///
    /// Returns an error only for collisions within the built-in set.
    pub fn merged(
        builtins: Vec<ActionDefinition>,
        plugins: Vec<ActionDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(builtins)?;
        for plugin in plugins {
            let taken: Vec<&str> = plugin
                .names()
                .filter(|name| registry.by_name.contains_key(*name))
                .collect();
            if !taken.is_empty() {
                warn!(
                    action = %plugin.id,
                    names = ?taken,
                    "skipping plugin action: name already registered"
                );
                continue;
            }
            let index = registry.actions.len();
            for name in plugin.names() {
                registry.by_name.insert(name.to_owned(), index);
            }
            registry.actions.push(plugin);
        }
        Ok(registry)
    }

    /// Look up an action by id or alias.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ActionDefinition> {
        self.by_name.get(name).map(|&index| &self.actions[index])
    }

    /// All registered action ids, sorted.
    #[must_use]
    pub fn action_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.actions.iter().map(|action| action.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// All registered actions, built-ins first then plugins in load order.
    #[must_use]
    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }
}

/// The process-wide registry: built-ins plus whatever the plugin
/// directory holds at first use.
pub fn shared_registry() -> &'static ActionRegistry {
    static REGISTRY: OnceLock<ActionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let plugins = load_plugin_actions(&plugin_dir());
        ActionRegistry::merged(builtin_actions(), plugins)
            .expect("built-in action set must have unique ids and aliases")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionBehavior;

    fn action(id: &str, aliases: &[&str]) -> ActionDefinition {
        ActionDefinition {
            id: id.into(),
            aliases: aliases.iter().map(|&a| a.into()).collect(),
            description: String::new(),
            progress_message: None,
            output_title: id.into(),
            behavior: ActionBehavior::Prompt {
                template: "{text}".into(),
                system: None,
            },
        }
    }

    #[test]
    fn resolves_by_id_and_alias() {
        let registry =
            ActionRegistry::new(vec![action("summary", &["summarize", "sum"])]).unwrap();
        assert_eq!(registry.resolve("summary").unwrap().id, "summary");
        assert_eq!(registry.resolve("sum").unwrap().id, "summary");
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn duplicate_id_is_fatal() {
        let err = ActionRegistry::new(vec![action("x", &[]), action("x", &[])]).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate action id: x");
    }

    #[test]
    fn duplicate_alias_is_fatal() {
        let err =
            ActionRegistry::new(vec![action("a", &["shared"]), action("b", &["shared"])])
                .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate action name or alias: shared");
    }

    #[test]
    fn alias_colliding_with_id_is_fatal() {
        let err = ActionRegistry::new(vec![action("a", &[]), action("b", &["a"])]).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate action name or alias: a");
    }

    #[test]
    fn merged_skips_colliding_plugin_whole() {
        let registry = ActionRegistry::merged(
            vec![action("summary", &["sum"])],
            vec![action("shout", &["sum"]), action("haiku", &[])],
        )
        .unwrap();
        // "shout" shares the "sum" alias with a built-in, so the whole
        // plugin action is dropped, fresh alias included.
        assert!(registry.resolve("shout").is_none());
        assert_eq!(registry.resolve("sum").unwrap().id, "summary");
        assert_eq!(registry.resolve("haiku").unwrap().id, "haiku");
    }

    #[test]
    fn merged_builtin_wins_on_id_collision() {
        let registry = ActionRegistry::merged(
            vec![action("summary", &[])],
            vec![action("summary", &["other"])],
        )
        .unwrap();
        assert!(registry.resolve("other").is_none());
        assert_eq!(registry.actions().len(), 1);
    }

    #[test]
    fn merged_earlier_plugin_wins() {
        let registry = ActionRegistry::merged(
            vec![],
            vec![action("dup", &["first"]), action("dup", &["second"])],
        )
        .unwrap();
        assert_eq!(registry.resolve("first").unwrap().id, "dup");
        assert!(registry.resolve("second").is_none());
    }

    #[test]
    fn action_ids_are_sorted() {
        let registry = ActionRegistry::new(vec![
            action("zebra", &[]),
            action("apple", &[]),
            action("mango", &[]),
        ])
        .unwrap();
        assert_eq!(registry.action_ids(), ["apple", "mango", "zebra"]);
    }

    #[test]
    fn shared_registry_resolves_builtins() {
        let registry = shared_registry();
        assert!(registry.resolve("summary").is_some());
        assert!(registry.resolve("sum").is_some());
        assert!(registry.resolve("tldr").is_some());
    }
}
