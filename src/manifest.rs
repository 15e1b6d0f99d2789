//! # Manifest Module
//!
//! Declarative controller definitions loaded from YAML, used by the CLI and
//! by tests to build a dispatcher without writing Rust controllers.
//!
//! ## Format
//!
//! ```yaml
//! show_internal_actions: false
//! controllers:
//!   - name: Root
//!     namespace: ""
//!     actions:
//!       - name: index
//!         attributes: ":Path('/')"
//!       - name: Auto
//!         attributes: ":Private"
//!   - name: Users
//!     namespace: users
//!     actions:
//!       - name: show
//!         attributes: ":Local :Args(1)"
//!       - name: locked
//!         attributes: ":Local"
//!         deny: true
//! ```
//!
//! Every action gets an echo handler (see [`crate::echo`]) that appends its
//! reverse key to the `trail` stash entry and succeeds unless `deny` is set.

use crate::action::Action;
use crate::controller::{ActionController, Controller};
use crate::dispatcher::Dispatcher;
use crate::echo::echo_handler;
use crate::runtime_config::DispatcherConfig;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Top-level manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Treat duplicate registrations as fatal; OR-ed with the environment
    #[serde(default)]
    pub show_internal_actions: bool,
    #[serde(default)]
    pub controllers: Vec<ControllerManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControllerManifest {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub actions: Vec<ActionManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionManifest {
    pub name: String,
    /// Attribute declaration such as `:Local :Args(1)`
    #[serde(default)]
    pub attributes: String,
    /// Make the action's handler fail
    #[serde(default)]
    pub deny: bool,
}

impl Manifest {
    /// Read and parse a manifest file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid manifest.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse manifest {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails on invalid YAML or a document not matching the manifest shape.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content).context("invalid manifest YAML")?;
        Ok(manifest)
    }

    /// Build one controller per entry, with echo handlers on every action
    #[must_use]
    pub fn controllers(&self) -> Vec<Arc<dyn Controller>> {
        self.controllers
            .iter()
            .map(|c| {
                let controller = c.actions.iter().fold(
                    ActionController::new(&c.name, &c.namespace),
                    |controller, a| {
                        controller.action(
                            Action::builder(&a.name)
                                .attributes(&a.attributes)
                                .handler(echo_handler(a.deny)),
                        )
                    },
                );
                Arc::new(controller) as Arc<dyn Controller>
            })
            .collect()
    }

    /// Effective configuration: the manifest flag OR-ed with `base`
    #[must_use]
    pub fn config(&self, base: DispatcherConfig) -> DispatcherConfig {
        DispatcherConfig {
            show_internal_actions: base.show_internal_actions || self.show_internal_actions,
        }
    }

    /// Create and set up a dispatcher for this manifest
    ///
    /// # Errors
    ///
    /// Propagates [`crate::DispatchError::DuplicateAction`] when diagnostics
    /// are enabled.
    pub fn build_dispatcher(&self, base: DispatcherConfig) -> anyhow::Result<Dispatcher> {
        let mut dispatcher = Dispatcher::new(self.config(base));
        dispatcher
            .setup_actions(self.controllers())
            .context("dispatcher setup failed")?;
        info!(
            controllers = self.controllers.len(),
            actions = dispatcher.registry().len(),
            "Manifest loaded"
        );
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
controllers:
  - name: Users
    namespace: /users/
    actions:
      - name: show
        attributes: ":Local :Args(1)"
      - name: locked
        deny: true
"#;

    #[test]
    fn test_parse_defaults() {
        let manifest = Manifest::from_yaml_str(DOC).expect("parse");
        assert!(!manifest.show_internal_actions);
        let users = &manifest.controllers[0];
        assert_eq!(users.namespace, "/users/");
        assert_eq!(users.actions[1].attributes, "");
        assert!(users.actions[1].deny);
    }

    #[test]
    fn test_config_is_or_of_env_and_manifest() {
        let mut manifest = Manifest::default();
        assert!(!manifest.config(DispatcherConfig::default()).show_internal_actions);
        assert!(manifest.config(DispatcherConfig::diagnostics()).show_internal_actions);
        manifest.show_internal_actions = true;
        assert!(manifest.config(DispatcherConfig::default()).show_internal_actions);
    }

    #[test]
    fn test_rejects_unknown_shape() {
        assert!(Manifest::from_yaml_str("controllers: 5").is_err());
    }

    #[test]
    fn test_build_dispatcher() {
        let manifest = Manifest::from_yaml_str(DOC).expect("parse");
        let dispatcher = manifest
            .build_dispatcher(DispatcherConfig::default())
            .expect("build");
        assert!(dispatcher.get_action("show", "users").is_some());
        assert!(dispatcher.get_action("locked", "users").is_some());
    }
}
