use serde::Serialize;

use super::arguments::LaunchArgument;
use super::LaunchError;
use crate::config::OutputFormat;
use crate::lifecycle::{NodeHandle, TransitionRequest};
use crate::params::{LayerKind, ParameterSet, Provenance};

/// Environment variable the driver reads its debug switch from
pub const DEBUG_ENV_VAR: &str = "MICROSTRAIN_INERTIAL_DEBUG";

pub const NODE_EXECUTABLE: &str = "microstrain_inertial_driver_node";

/// Debug intent carried with the node declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugSetting {
    /// True only for the literal `true`; the `debug` parameter itself is
    /// typed from `raw` and may differ (e.g. `True`)
    pub enabled: bool,
    /// Value exactly as given on the command line
    pub raw: String,
}

/// The managed driver process as declared to the host engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDeclaration {
    pub package: String,
    pub executable: String,
    pub name: String,
    pub namespace: String,
    pub debug: DebugSetting,
    pub parameters: ParameterSet,
}

impl NodeDeclaration {
    pub fn handle(&self) -> NodeHandle {
        NodeHandle::new(&self.name, &self.namespace)
    }

    /// Environment entries the host engine must give the child process.
    ///
    /// The launcher's own environment is never modified.
    pub fn environment(&self) -> Vec<(String, String)> {
        vec![(DEBUG_ENV_VAR.to_string(), self.debug.raw.clone())]
    }
}

/// Summary of one merged layer, kept for inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub kind: LayerKind,
    pub source: String,
    pub entries: usize,
}

/// Static startup description: declared arguments, the node, and the
/// transitions to request after it starts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchDescription {
    pub arguments: Vec<LaunchArgument>,
    pub node: NodeDeclaration,
    pub environment: Vec<(String, String)>,
    pub transitions: Vec<TransitionRequest>,
    pub layers: Vec<LayerSummary>,
    #[serde(skip)]
    pub provenance: Provenance,
}

impl LaunchDescription {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, LaunchError> {
        let (label, rendered) = match format {
            OutputFormat::Json => ("json", self.to_json().map_err(|e| e.to_string())),
            OutputFormat::Yaml => ("yaml", self.to_yaml().map_err(|e| e.to_string())),
            OutputFormat::Toml => ("toml", self.to_toml().map_err(|e| e.to_string())),
        };
        rendered.map_err(|message| LaunchError::Render {
            format: label,
            message,
        })
    }
}
