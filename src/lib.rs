// MicroStrain Launch Library - startup description of the inertial driver node
// This exposes the core components for testing and integration

pub mod config;
pub mod launch;
pub mod lifecycle;
pub mod params;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{LauncherConfig, LoggingConfig, OutputFormat};
pub use launch::{
    package_share_directory, DescriptionBuilder, LaunchArguments, LaunchDescription, LaunchError,
    NodeDeclaration,
};
pub use lifecycle::{
    plan_transitions, schedule_transitions, simulate, LifecycleState, NodeHandle,
    TransitionIntent, TransitionKind, TransitionRequest,
};
pub use params::{
    merge_layers, merge_layers_with_provenance, LayerKind, ParameterLayer, ParameterSet,
    ParameterValue, ParamsError,
};
pub use telemetry::{create_launch_span, generate_launch_id, init_telemetry};
