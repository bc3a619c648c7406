// Parameter document loading
//
// Reads ROS parameter files into flat layers before the merge. The merger
// itself never touches the filesystem.

use std::fs;
use std::path::Path;

use super::{ParameterMap, ParameterValue, ParamsError};
use crate::lifecycle::NodeHandle;

const ROS_PARAMETERS_KEY: &str = "ros__parameters";
const WILDCARD_SELECTOR: &str = "/**";

/// Node identity used to pick the sections of a document that apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelector {
    pub name: String,
    pub namespace: String,
}

impl NodeSelector {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Whether a top level section key addresses this node
    pub fn matches(&self, section: &str) -> bool {
        if section == WILDCARD_SELECTOR {
            return true;
        }
        if section == self.name || section == format!("/**/{}", self.name) {
            return true;
        }
        let handle = NodeHandle::new(&self.name, &self.namespace);
        let qualified = handle.as_str();
        section == qualified || format!("/{}", section.trim_start_matches('/')) == qualified
    }
}

/// A parsed parameter document, flattened to dotted keys
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsDocument {
    pub source: String,
    pub entries: ParameterMap,
}

impl ParamsDocument {
    /// Read and parse a parameter file.
    pub fn load(path: &Path, selector: &NodeSelector) -> Result<Self, ParamsError> {
        let text = fs::read_to_string(path).map_err(|source| ParamsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_yaml_str(&text, &path.display().to_string(), selector)?;
        tracing::debug!(
            path = %path.display(),
            entries = document.entries.len(),
            "Loaded parameter document"
        );
        Ok(document)
    }

    /// Parse parameter document text; `source` names it in errors.
    pub fn from_yaml_str(
        text: &str,
        source: &str,
        selector: &NodeSelector,
    ) -> Result<Self, ParamsError> {
        let blank = text
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if blank {
            return Ok(Self {
                source: source.to_string(),
                entries: ParameterMap::new(),
            });
        }

        let root: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ParamsError::Parse {
                source_name: source.to_string(),
                message: e.to_string(),
            })?;

        let mapping = match root {
            serde_yaml::Value::Null => {
                return Ok(Self {
                    source: source.to_string(),
                    entries: ParameterMap::new(),
                })
            }
            serde_yaml::Value::Mapping(mapping) => mapping,
            _ => {
                return Err(ParamsError::NotAMapping {
                    source_name: source.to_string(),
                })
            }
        };

        let mut entries = ParameterMap::new();
        if has_ros_sections(&mapping) {
            for (section, body) in &mapping {
                let Some(section) = section.as_str() else {
                    continue;
                };
                if !selector.matches(section) {
                    tracing::debug!(section, node = %selector.name, "Skipping section for another node");
                    continue;
                }
                let Some(parameters) = body.get(ROS_PARAMETERS_KEY) else {
                    continue;
                };
                match parameters {
                    serde_yaml::Value::Mapping(parameters) => {
                        flatten_into(&mut entries, "", parameters)?
                    }
                    serde_yaml::Value::Null => {}
                    _ => {
                        return Err(ParamsError::NotAMapping {
                            source_name: format!("{source} [{section}]"),
                        })
                    }
                }
            }
        } else {
            flatten_into(&mut entries, "", &mapping)?;
        }

        Ok(Self {
            source: source.to_string(),
            entries,
        })
    }
}

fn has_ros_sections(mapping: &serde_yaml::Mapping) -> bool {
    mapping
        .values()
        .any(|body| body.get(ROS_PARAMETERS_KEY).is_some())
}

fn flatten_into(
    entries: &mut ParameterMap,
    prefix: &str,
    mapping: &serde_yaml::Mapping,
) -> Result<(), ParamsError> {
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(ParamsError::UnsupportedValue {
                    key: prefix.to_string(),
                    reason: "parameter names must be scalars".to_string(),
                })
            }
        };
        let full_key = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            serde_yaml::Value::Mapping(nested) => flatten_into(entries, &full_key, nested)?,
            other => {
                let converted = ParameterValue::from_yaml(&full_key, other)?;
                entries.insert(full_key, converted);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> NodeSelector {
        NodeSelector::new("microstrain_inertial_driver", "/")
    }

    #[test]
    fn test_wildcard_section_unwrapped() {
        let text = r#"
/**:
  ros__parameters:
    port: "/dev/ttyACM0"
    baudrate: 115200
    imu_data_rate: 100.0
"#;
        let doc = ParamsDocument::from_yaml_str(text, "params.yml", &driver()).unwrap();
        assert_eq!(doc.entries.get("port"), Some(&ParameterValue::from("/dev/ttyACM0")));
        assert_eq!(doc.entries.get("baudrate"), Some(&ParameterValue::Integer(115200)));
        assert_eq!(doc.entries.get("imu_data_rate"), Some(&ParameterValue::Double(100.0)));
    }

    #[test]
    fn test_other_node_sections_ignored() {
        let text = r#"
other_node:
  ros__parameters:
    port: "/dev/ttyS0"
microstrain_inertial_driver:
  ros__parameters:
    port: "/dev/ttyUSB0"
"#;
        let doc = ParamsDocument::from_yaml_str(text, "mine.yml", &driver()).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries.get("port"), Some(&ParameterValue::from("/dev/ttyUSB0")));
    }

    #[test]
    fn test_namespaced_selector() {
        let selector = NodeSelector::new("imu", "/robot");
        assert!(selector.matches("/robot/imu"));
        assert!(selector.matches("robot/imu"));
        assert!(selector.matches("imu"));
        assert!(selector.matches("/**/imu"));
        assert!(!selector.matches("/other/imu"));
    }

    #[test]
    fn test_selector_agrees_with_node_handle() {
        for (name, namespace) in [("imu", "/"), ("imu", "robot"), ("imu", "/robot/"), ("imu", "")] {
            let selector = NodeSelector::new(name, namespace);
            let handle = NodeHandle::new(name, namespace);
            assert!(selector.matches(handle.as_str()), "{name} in {namespace:?}");
        }
    }

    #[test]
    fn test_plain_mapping_flattened() {
        let text = "filter:\n  auto_init: true\n  declination: 0.2\nport: /dev/ttyACM1\n";
        let doc = ParamsDocument::from_yaml_str(text, "plain.yml", &driver()).unwrap();
        assert_eq!(doc.entries.get("filter.auto_init"), Some(&ParameterValue::Bool(true)));
        assert_eq!(doc.entries.get("filter.declination"), Some(&ParameterValue::Double(0.2)));
        assert_eq!(doc.entries.get("port"), Some(&ParameterValue::from("/dev/ttyACM1")));
    }

    #[test]
    fn test_empty_documents() {
        for text in ["", "{}", "~", "# only a comment\n"] {
            let doc = ParamsDocument::from_yaml_str(text, "empty.yml", &driver()).unwrap();
            assert!(doc.entries.is_empty(), "expected empty layer for {text:?}");
        }
    }

    #[test]
    fn test_empty_ros_parameters_section() {
        let text = "/**:\n  ros__parameters: {}\n";
        let doc = ParamsDocument::from_yaml_str(text, "empty.yml", &driver()).unwrap();
        assert!(doc.entries.is_empty());
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = ParamsDocument::from_yaml_str("42", "bad.yml", &driver()).unwrap_err();
        assert!(matches!(err, ParamsError::NotAMapping { .. }));
    }

    #[test]
    fn test_syntax_error_reported() {
        let err = ParamsDocument::from_yaml_str("port: [unterminated", "bad.yml", &driver()).unwrap_err();
        assert!(matches!(err, ParamsError::Parse { ref source_name, .. } if source_name == "bad.yml"));
    }

    #[test]
    fn test_missing_file() {
        let err = ParamsDocument::load(Path::new("/nonexistent/params.yml"), &driver()).unwrap_err();
        assert!(matches!(err, ParamsError::Read { .. }));
    }
}
