// Launch description construction
//
// Loads the document layers, merges them with the argument-driven layers,
// declares the node, and schedules its startup transitions. One-shot: any
// failure aborts the whole description.

use std::path::{Path, PathBuf};

use super::arguments::{self, LaunchArguments, StartupOptions, PACKAGE_NAME};
use super::description::{DebugSetting, LaunchDescription, LayerSummary, NodeDeclaration, NODE_EXECUTABLE};
use super::LaunchError;
use crate::lifecycle::{schedule_transitions, simulate};
use crate::params::{
    merge_layers_with_provenance, LayerKind, NodeSelector, ParameterLayer, ParamsDocument,
};

/// Builds [`LaunchDescription`]s against one installed driver package
#[derive(Debug, Clone)]
pub struct DescriptionBuilder {
    share_dir: PathBuf,
}

impl DescriptionBuilder {
    pub fn new(share_dir: impl Into<PathBuf>) -> Self {
        Self {
            share_dir: share_dir.into(),
        }
    }

    pub fn share_dir(&self) -> &Path {
        &self.share_dir
    }

    pub fn declared_arguments(&self) -> Vec<arguments::LaunchArgument> {
        arguments::declared_arguments(&self.share_dir)
    }

    /// Resolve `name:=value` style overrides against the declared arguments.
    pub fn resolve_arguments<I, K, V>(&self, overrides: I) -> Result<LaunchArguments, LaunchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LaunchArguments::resolve(&self.declared_arguments(), overrides)
    }

    pub fn build(&self, args: &LaunchArguments) -> Result<LaunchDescription, LaunchError> {
        let options = args.startup_options()?;
        let selector = NodeSelector::new(&options.node_name, &options.namespace);

        let layers = vec![
            self.defaults_layer(&selector)?,
            ParameterLayer::legacy(args.legacy_parameters()?),
            self.user_layer(&options, &selector)?,
            ParameterLayer::final_override(options.supported_overrides()),
        ];
        let (parameters, provenance) = merge_layers_with_provenance(&layers);

        for (key, source) in provenance.iter() {
            tracing::debug!(parameter = %key, source = %source, "Effective parameter source");
        }

        let node = NodeDeclaration {
            package: PACKAGE_NAME.to_string(),
            executable: NODE_EXECUTABLE.to_string(),
            name: options.node_name.clone(),
            namespace: options.namespace.clone(),
            debug: DebugSetting {
                enabled: options.debug,
                raw: options.debug_raw.clone(),
            },
            parameters,
        };

        let handle = node.handle();
        let transitions = schedule_transitions(&handle, options.intent);

        let report = simulate(&transitions);
        for rejected in &report.rejected {
            tracing::warn!(
                node = %handle,
                transition = %rejected.kind,
                state = %rejected.from,
                "Requested transition is not valid from the node's startup state; the node will reject it"
            );
        }

        tracing::info!(
            node = %handle,
            parameters = node.parameters.len(),
            transitions = transitions.len(),
            "Launch description built"
        );

        Ok(LaunchDescription {
            arguments: self.declared_arguments(),
            environment: node.environment(),
            layers: layers
                .iter()
                .map(|layer| LayerSummary {
                    kind: layer.kind,
                    source: layer.source.clone(),
                    entries: layer.len(),
                })
                .collect(),
            node,
            transitions,
            provenance,
        })
    }

    fn defaults_layer(&self, selector: &NodeSelector) -> Result<ParameterLayer, LaunchError> {
        let path = arguments::default_params_file(&self.share_dir);
        let document =
            ParamsDocument::load(&path, selector).map_err(LaunchError::DefaultParameters)?;
        Ok(ParameterLayer::defaults(document.source, document.entries))
    }

    fn user_layer(
        &self,
        options: &StartupOptions,
        selector: &NodeSelector,
    ) -> Result<ParameterLayer, LaunchError> {
        let Some(path) = &options.params_file else {
            return Ok(ParameterLayer::empty(LayerKind::UserDocument, "<none>"));
        };
        let document =
            ParamsDocument::load(path, selector).map_err(LaunchError::UserParameters)?;
        Ok(ParameterLayer::user_document(document.source, document.entries))
    }
}
