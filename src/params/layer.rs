use serde::Serialize;
use std::collections::BTreeMap;

use super::ParameterValue;

/// Key to value entries of one parameter source, ordered by key
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// The role a layer plays in the startup parameter stack.
///
/// The kind is descriptive only. Precedence is decided by a layer's position
/// in the list handed to [`merge_layers`](super::merge_layers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Parameter document shipped with the driver package
    Defaults,
    /// Deprecated individually named launch arguments
    Legacy,
    /// Parameter document named by the `params_file` argument
    UserDocument,
    /// Small set of keys that must always win
    FinalOverride,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Defaults => "defaults",
            LayerKind::Legacy => "legacy",
            LayerKind::UserDocument => "user_document",
            LayerKind::FinalOverride => "final_override",
        }
    }
}

/// One ordered configuration source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterLayer {
    pub kind: LayerKind,
    /// Where the entries came from: a file path or a short label
    pub source: String,
    pub entries: ParameterMap,
}

impl ParameterLayer {
    pub fn new(kind: LayerKind, source: impl Into<String>, entries: ParameterMap) -> Self {
        Self {
            kind,
            source: source.into(),
            entries,
        }
    }

    pub fn empty(kind: LayerKind, source: impl Into<String>) -> Self {
        Self::new(kind, source, ParameterMap::new())
    }

    pub fn defaults(source: impl Into<String>, entries: ParameterMap) -> Self {
        Self::new(LayerKind::Defaults, source, entries)
    }

    pub fn legacy(entries: ParameterMap) -> Self {
        Self::new(LayerKind::Legacy, "legacy launch arguments", entries)
    }

    pub fn user_document(source: impl Into<String>, entries: ParameterMap) -> Self {
        Self::new(LayerKind::UserDocument, source, entries)
    }

    pub fn final_override(entries: ParameterMap) -> Self {
        Self::new(LayerKind::FinalOverride, "supported overrides", entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Build a [`ParameterMap`] from literal pairs.
pub fn parameter_map<K, V, I>(pairs: I) -> ParameterMap
where
    K: Into<String>,
    V: Into<ParameterValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
