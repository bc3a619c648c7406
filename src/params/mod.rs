// Parameter layers and the merge that produces the driver's effective parameters

pub mod layer;
pub mod loader;
pub mod merge;
pub mod value;

use std::path::PathBuf;
use thiserror::Error;

pub use layer::{parameter_map, LayerKind, ParameterLayer, ParameterMap};
pub use loader::{NodeSelector, ParamsDocument};
pub use merge::{merge_layers, merge_layers_with_provenance, ParameterSet, Provenance};
pub use value::ParameterValue;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Failed to read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse parameter document {source_name}: {message}")]
    Parse { source_name: String, message: String },
    #[error("Parameter document {source_name} must be a mapping")]
    NotAMapping { source_name: String },
    #[error("Unsupported value for parameter '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },
}
