// Parameter Layer Merger
//
// Folds an ordered list of layers into one effective parameter set. Later
// layers override earlier ones key by key. No I/O, no validation, no failure.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{ParameterLayer, ParameterMap, ParameterValue};

/// The effective parameter set handed whole to the node declaration.
///
/// Produced once by [`merge_layers`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: ParameterMap,
}

impl ParameterSet {
    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn as_map(&self) -> &ParameterMap {
        &self.entries
    }
}

/// Which layer supplied the winning value for each key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    winners: BTreeMap<String, String>,
}

impl Provenance {
    /// Source name of the layer whose value survived for `key`
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.winners.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.winners.iter()
    }
}

/// Merge layers in the given order; the last layer defining a key wins.
pub fn merge_layers(layers: &[ParameterLayer]) -> ParameterSet {
    merge_layers_with_provenance(layers).0
}

/// Same as [`merge_layers`], also recording the winning layer per key.
pub fn merge_layers_with_provenance(layers: &[ParameterLayer]) -> (ParameterSet, Provenance) {
    let mut entries = ParameterMap::new();
    let mut winners = BTreeMap::new();

    for layer in layers {
        for (key, value) in &layer.entries {
            entries.insert(key.clone(), value.clone());
            winners.insert(key.clone(), layer.source.clone());
        }
        tracing::trace!(
            layer.kind = layer.kind.as_str(),
            layer.source = %layer.source,
            layer.entries = layer.len(),
            "Applied parameter layer"
        );
    }

    (ParameterSet { entries }, Provenance { winners })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parameter_map, LayerKind};

    fn stack(user: ParameterLayer) -> Vec<ParameterLayer> {
        vec![
            ParameterLayer::defaults(
                "params.yml",
                parameter_map([
                    ("port", ParameterValue::from("/dev/ttyACM0")),
                    ("imu_data_rate", ParameterValue::from(100.0)),
                    ("debug", ParameterValue::from(false)),
                ]),
            ),
            ParameterLayer::legacy(parameter_map([("port", "/dev/ttyUSB0")])),
            user,
            ParameterLayer::final_override(parameter_map([("debug", true)])),
        ]
    }

    #[test]
    fn test_later_layer_wins() {
        let merged = merge_layers(&stack(ParameterLayer::empty(LayerKind::UserDocument, "empty.yml")));
        assert_eq!(merged.get("port"), Some(&ParameterValue::from("/dev/ttyUSB0")));
        assert_eq!(merged.get("imu_data_rate"), Some(&ParameterValue::from(100.0)));
    }

    #[test]
    fn test_user_document_overrides_legacy() {
        let user = ParameterLayer::user_document("mine.yml", parameter_map([("port", "/dev/ttyS3")]));
        let merged = merge_layers(&stack(user));
        assert_eq!(merged.get("port"), Some(&ParameterValue::from("/dev/ttyS3")));
    }

    #[test]
    fn test_final_layer_beats_user_debug() {
        let user = ParameterLayer::user_document("mine.yml", parameter_map([("debug", false)]));
        let merged = merge_layers(&stack(user));
        assert_eq!(merged.get("debug"), Some(&ParameterValue::Bool(true)));
    }

    #[test]
    fn test_empty_user_layer_same_as_omitted() {
        let with_empty = merge_layers(&stack(ParameterLayer::empty(LayerKind::UserDocument, "empty.yml")));
        let mut without = stack(ParameterLayer::empty(LayerKind::UserDocument, "empty.yml"));
        without.remove(2);
        assert_eq!(with_empty, merge_layers(&without));
    }

    #[test]
    fn test_no_layers_yields_empty_set() {
        assert!(merge_layers(&[]).is_empty());
    }

    #[test]
    fn test_keys_absent_everywhere_stay_absent() {
        let merged = merge_layers(&stack(ParameterLayer::empty(LayerKind::UserDocument, "empty.yml")));
        assert!(!merged.contains_key("baudrate"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let user = ParameterLayer::user_document("mine.yml", parameter_map([("imu_data_rate", 50.0)]));
        let layers = stack(user);
        let first = merge_layers(&layers);
        let second = merge_layers(&layers);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_provenance_tracks_winning_layer() {
        let user = ParameterLayer::user_document("mine.yml", parameter_map([("imu_data_rate", 50.0)]));
        let (_, provenance) = merge_layers_with_provenance(&stack(user));
        assert_eq!(provenance.source_of("imu_data_rate"), Some("mine.yml"));
        assert_eq!(provenance.source_of("port"), Some("legacy launch arguments"));
        assert_eq!(provenance.source_of("debug"), Some("supported overrides"));
        assert_eq!(provenance.source_of("missing"), None);
    }

    #[test]
    fn test_order_matters() {
        let a = ParameterLayer::legacy(parameter_map([("baudrate", 115200i64)]));
        let b = ParameterLayer::user_document("b.yml", parameter_map([("baudrate", 921600i64)]));
        assert_eq!(
            merge_layers(&[a.clone(), b.clone()]).get("baudrate"),
            Some(&ParameterValue::Integer(921600))
        );
        assert_eq!(
            merge_layers(&[b, a]).get("baudrate"),
            Some(&ParameterValue::Integer(115200))
        );
    }
}
