// Launch Module - builds the startup description of the driver node

pub mod arguments;
pub mod builder;
pub mod description;
pub mod share;

use std::path::PathBuf;
use thiserror::Error;

use crate::params::ParamsError;

pub use arguments::{
    declared_arguments, parse_assignment, LaunchArgument, LaunchArguments, StartupOptions,
    LEGACY_ARGUMENTS, PACKAGE_NAME,
};
pub use builder::DescriptionBuilder;
pub use description::{DebugSetting, LaunchDescription, LayerSummary, NodeDeclaration, DEBUG_ENV_VAR};
pub use share::package_share_directory;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Unknown launch argument '{0}'")]
    UnknownArgument(String),
    #[error("Malformed launch argument '{0}', expected name:=value")]
    MalformedArgument(String),
    #[error("Package '{package}' not found in any prefix of {searched:?}")]
    PackageNotFound {
        package: String,
        searched: Vec<PathBuf>,
    },
    #[error("Default parameter document is unusable: {0}")]
    DefaultParameters(#[source] ParamsError),
    #[error("User parameter document is unusable: {0}")]
    UserParameters(#[source] ParamsError),
    #[error("Failed to render launch description as {format}: {message}")]
    Render { format: &'static str, message: String },
}
