//! Workflow configuration reader.
//!
//! Building blocks are configured through a properties mapping that can come
//! from a YAML or JSON file, or from an inline literal (the CLI defaults to
//! the literal `{}`). Two shapes are understood: a plain configuration with a
//! top-level `properties` mapping, and a workflow configuration with one
//! section per step plus an optional `global_properties` mapping merged into
//! every step (step keys win).

use crate::error::{BiobbError, Result};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug)]
pub struct ConfReader {
    doc: Map<String, Value>,
}

impl ConfReader {
    /// Load a configuration from a file path or an inline YAML/JSON literal.
    /// A source naming an existing file is read from disk, anything else is
    /// parsed as a literal.
    pub fn load(source: &str) -> Result<Self> {
        let text = if Path::new(source).exists() {
            std::fs::read_to_string(source)?
        } else {
            source.to_string()
        };

        let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
        let doc = match serde_json::to_value(&yaml)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(BiobbError::Config(format!(
                    "expected a mapping at the top level of the configuration, found: {other}"
                )))
            }
        };
        Ok(Self { doc })
    }

    /// Properties of a plain configuration. Returns an empty mapping when the
    /// configuration has no `properties` section.
    pub fn properties(&self) -> Value {
        match self.doc.get("properties") {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            _ => Value::Object(Map::new()),
        }
    }

    /// Merged properties for one step of a workflow configuration:
    /// `global_properties` overlaid with the step's own `properties`.
    pub fn step_properties(&self, step: &str) -> Result<Value> {
        let Some(section) = self.doc.get(step) else {
            return Err(BiobbError::Config(format!(
                "step not found in the configuration: {step}"
            )));
        };

        let mut merged = match self.doc.get("global_properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        if let Some(Value::Object(props)) = section.get("properties") {
            for (key, value) in props {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(Value::Object(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_empty_literal_gives_empty_properties() {
        let reader = ConfReader::load("{}").unwrap();
        assert_eq!(reader.properties(), serde_json::json!({}));
    }

    #[test]
    fn test_plain_yaml_properties() {
        let reader = ConfReader::load("properties:\n  docking_name: 1PPE\n  restart: true\n").unwrap();
        let props = reader.properties();
        assert_eq!(props["docking_name"], "1PPE");
        assert_eq!(props["restart"], true);
    }

    #[test]
    fn test_inline_json_literal_is_valid_yaml() {
        let reader = ConfReader::load(r#"{"properties": {"docking_name": "1PPE"}}"#).unwrap();
        assert_eq!(reader.properties()["docking_name"], "1PPE");
    }

    #[test]
    fn test_step_properties_merge_globals_with_step_precedence() {
        let text = "
global_properties:
  remove_tmp: false
  docking_name: global
step_setup:
  properties:
    docking_name: 1PPE
    receptor:
      mol: E
      newmol: A
";
        let reader = ConfReader::load(text).unwrap();
        let props = reader.step_properties("step_setup").unwrap();
        assert_eq!(props["docking_name"], "1PPE");
        assert_eq!(props["remove_tmp"], false);
        assert_eq!(props["receptor"]["mol"], "E");
    }

    #[test]
    fn test_step_without_properties_yields_globals_only() {
        let reader = ConfReader::load("global_properties:\n  restart: true\nstep_oda: {}\n").unwrap();
        let props = reader.step_properties("step_oda").unwrap();
        assert_eq!(props, serde_json::json!({"restart": true}));
    }

    #[test]
    fn test_unknown_step_is_an_error() {
        let reader = ConfReader::load("{}").unwrap();
        let err = reader.step_properties("step_ftdock").unwrap_err();
        assert!(err.to_string().contains("step_ftdock"));
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = ConfReader::load("42").unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_file_sources_are_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.yml");
        std::fs::write(&path, "properties:\n  subunit_name: 1PPE_rec\n").unwrap();

        let reader = ConfReader::load(path.to_str().unwrap()).unwrap();
        assert_eq!(reader.properties()["subunit_name"], "1PPE_rec");
    }
}
