//! Properties shared by every building block.
//!
//! These mirror the workflow-level knobs of the biobb calling convention:
//! sandbox handling, restart behaviour and container execution. Blocks embed
//! them with `#[serde(flatten)]` next to their tool-specific properties, so a
//! single properties mapping configures both layers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonProperties {
    /// Remove the staging directory once the run has finished.
    #[serde(default = "default_remove_tmp")]
    pub remove_tmp: bool,
    /// Skip execution when every output file already exists non-empty.
    #[serde(default)]
    pub restart: bool,
    /// Parent directory under which staging directories are created.
    #[serde(default = "default_sandbox_path")]
    pub sandbox_path: PathBuf,
    /// Persist the tool's captured stdout to this file.
    #[serde(default)]
    pub out_log_path: Option<PathBuf>,
    /// Persist the tool's captured stderr to this file.
    #[serde(default)]
    pub err_log_path: Option<PathBuf>,
    /// Container runtime executable; container execution is active when set.
    #[serde(default)]
    pub container_path: Option<String>,
    /// Container image identifier.
    #[serde(default)]
    pub container_image: Option<String>,
    /// Directory inside the container where the sandbox is mounted.
    #[serde(default = "default_container_volume_path")]
    pub container_volume_path: String,
    /// Working directory inside the container.
    #[serde(default)]
    pub container_working_dir: Option<String>,
    /// User id mapped inside the container.
    #[serde(default)]
    pub container_user_id: Option<String>,
    /// Shell used to run the wrapped command inside the container.
    #[serde(default = "default_container_shell_path")]
    pub container_shell_path: String,
    /// Runtime subcommand that launches the container ("run", "exec", ...).
    #[serde(default = "default_container_generic_command")]
    pub container_generic_command: String,
}

fn default_remove_tmp() -> bool { true }
fn default_sandbox_path() -> PathBuf { PathBuf::from(".") }
fn default_container_volume_path() -> String { "/data".to_string() }
fn default_container_shell_path() -> String { "/bin/bash".to_string() }
fn default_container_generic_command() -> String { "run".to_string() }

impl Default for CommonProperties {
    fn default() -> Self {
        Self {
            remove_tmp: default_remove_tmp(),
            restart: false,
            sandbox_path: default_sandbox_path(),
            out_log_path: None,
            err_log_path: None,
            container_path: None,
            container_image: None,
            container_volume_path: default_container_volume_path(),
            container_working_dir: None,
            container_user_id: None,
            container_shell_path: default_container_shell_path(),
            container_generic_command: default_container_generic_command(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_calling_convention() {
        let props = CommonProperties::default();
        assert!(props.remove_tmp);
        assert!(!props.restart);
        assert_eq!(props.sandbox_path, PathBuf::from("."));
        assert_eq!(props.container_volume_path, "/data");
        assert_eq!(props.container_shell_path, "/bin/bash");
        assert_eq!(props.container_generic_command, "run");
    }

    #[test]
    fn test_deserializes_from_empty_mapping() {
        let props: CommonProperties = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(props.remove_tmp);
        assert!(props.container_path.is_none());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let props: CommonProperties = serde_json::from_value(serde_json::json!({
            "restart": true,
            "container_path": "singularity",
            "container_image": "shub://bioexcel/pydock3",
            "container_generic_command": "exec"
        }))
        .unwrap();
        assert!(props.restart);
        assert!(props.remove_tmp);
        assert_eq!(props.container_path.as_deref(), Some("singularity"));
        assert_eq!(props.container_generic_command, "exec");
        assert_eq!(props.container_volume_path, "/data");
    }
}
