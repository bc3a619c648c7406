// Declared launch arguments and their resolution
//
// Arguments arrive as text. They are resolved against the declared defaults
// once, then parsed into typed startup options before any decision is made.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::LaunchError;
use crate::lifecycle::TransitionIntent;
use crate::params::{parameter_map, ParameterMap, ParameterValue};

pub const PACKAGE_NAME: &str = "microstrain_inertial_driver";

const DEPRECATED_DESCRIPTION: &str = "DEPRECATED. Use params_file instead";

/// Names of the deprecated arguments copied into the legacy layer, in
/// declaration order of the layer
pub const LEGACY_ARGUMENTS: [&str; 12] = [
    "port",
    "aux_port",
    "baudrate",
    "imu_frame_id",
    "gnss1_frame_id",
    "gnss2_frame_id",
    "filter_frame_id",
    "filter_child_frame_id",
    "nmea_frame_id",
    "imu_data_rate",
    "filter_data_rate",
    "use_enu_frame",
];

/// A user overridable startup argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchArgument {
    pub name: String,
    pub default: String,
    pub description: String,
    pub deprecated: bool,
}

impl LaunchArgument {
    fn new(name: &str, default: impl Into<String>, description: &str) -> Self {
        Self {
            name: name.to_string(),
            default: default.into(),
            description: description.to_string(),
            deprecated: false,
        }
    }

    fn legacy(name: &str, default: &str) -> Self {
        Self {
            deprecated: true,
            ..Self::new(name, default, DEPRECATED_DESCRIPTION)
        }
    }
}

/// Location of the empty parameter document used as the `params_file` default
pub fn empty_params_file(share_dir: &Path) -> PathBuf {
    share_dir.join("config").join("empty.yml")
}

/// Location of the driver's built-in parameter document
pub fn default_params_file(share_dir: &Path) -> PathBuf {
    share_dir
        .join("microstrain_inertial_driver_common")
        .join("config")
        .join("params.yml")
}

/// Every argument the launcher accepts, with defaults
pub fn declared_arguments(share_dir: &Path) -> Vec<LaunchArgument> {
    vec![
        LaunchArgument::new("namespace", "/", "Namespace to use when launching the nodes in this launch file"),
        LaunchArgument::new("node_name", PACKAGE_NAME, "Name to give the Microstrain Inertial Driver node"),
        LaunchArgument::new("configure", "false", "Whether or not to configure the node on startup"),
        LaunchArgument::new("activate", "false", "Whether or not to activate the node on startup"),
        LaunchArgument::new("debug", "false", "Whether or not to log debug information."),
        LaunchArgument::new(
            "params_file",
            empty_params_file(share_dir).display().to_string(),
            "Path to file that will load additional parameters",
        ),
        LaunchArgument::legacy("port", "/dev/ttyACM0"),
        LaunchArgument::legacy("aux_port", "/dev/ttyACM1"),
        LaunchArgument::legacy("baudrate", "115200"),
        LaunchArgument::legacy("imu_frame_id", "sensor"),
        LaunchArgument::legacy("imu_data_rate", "100.0"),
        LaunchArgument::legacy("filter_data_rate", "10.0"),
        LaunchArgument::legacy("gnss1_frame_id", "gnss1_antenna_wgs84"),
        LaunchArgument::legacy("gnss2_frame_id", "gnss2_antenns_wgs84"),
        LaunchArgument::legacy("filter_frame_id", "sensor_wgs84"),
        LaunchArgument::legacy("filter_child_frame_id", "sensor"),
        LaunchArgument::legacy("nmea_frame_id", "nmea"),
        LaunchArgument::legacy("use_enu_frame", "False"),
    ]
}

/// Parse a `name:=value` token.
pub fn parse_assignment(token: &str) -> Result<(String, String), LaunchError> {
    match token.split_once(":=") {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(LaunchError::MalformedArgument(token.to_string())),
    }
}

/// Textual values of all declared arguments after applying overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchArguments {
    values: BTreeMap<String, String>,
    #[serde(skip)]
    overridden: Vec<String>,
}

impl LaunchArguments {
    /// Start from declared defaults and apply `overrides` in order.
    ///
    /// Undeclared names are rejected. Explicitly set deprecated arguments
    /// log a warning pointing at `params_file`.
    pub fn resolve<I, K, V>(declared: &[LaunchArgument], overrides: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: BTreeMap<String, String> = declared
            .iter()
            .map(|arg| (arg.name.clone(), arg.default.clone()))
            .collect();
        let mut overridden = Vec::new();

        for (name, value) in overrides {
            let name = name.into();
            let Some(argument) = declared.iter().find(|arg| arg.name == name) else {
                return Err(LaunchError::UnknownArgument(name));
            };
            if argument.deprecated {
                tracing::warn!(
                    argument = %name,
                    "Launch argument is deprecated and will be removed in a future release; set it in params_file instead"
                );
            }
            values.insert(name.clone(), value.into());
            if !overridden.contains(&name) {
                overridden.push(name);
            }
        }

        Ok(Self { values, overridden })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn required(&self, name: &str) -> Result<&str, LaunchError> {
        self.get(name)
            .ok_or_else(|| LaunchError::UnknownArgument(name.to_string()))
    }

    /// Names set explicitly by the caller, in first-seen order
    pub fn overridden(&self) -> &[String] {
        &self.overridden
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }

    /// Parse the typed options every downstream decision uses.
    pub fn startup_options(&self) -> Result<StartupOptions, LaunchError> {
        let debug_raw = self.required("debug")?.to_string();
        let params_file = self.required("params_file")?.trim();
        Ok(StartupOptions {
            namespace: self.required("namespace")?.to_string(),
            node_name: self.required("node_name")?.to_string(),
            intent: TransitionIntent::from_launch_flags(
                self.required("configure")?,
                self.required("activate")?,
            ),
            debug: debug_raw == "true",
            debug_raw,
            params_file: if params_file.is_empty() {
                None
            } else {
                Some(PathBuf::from(params_file))
            },
        })
    }

    /// Entries of the deprecated legacy layer, typed the way launch
    /// substitutions become parameters
    pub fn legacy_parameters(&self) -> Result<ParameterMap, LaunchError> {
        LEGACY_ARGUMENTS
            .iter()
            .map(|name| {
                self.required(name)
                    .map(|raw| (name.to_string(), ParameterValue::from_launch_string(raw)))
            })
            .collect()
    }
}

/// Startup arguments parsed once into typed values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupOptions {
    pub namespace: String,
    pub node_name: String,
    pub intent: TransitionIntent,
    /// Set only by the literal `true`, like the transition flags
    pub debug: bool,
    /// Debug argument exactly as supplied
    pub debug_raw: String,
    /// `None` when the argument was set to an empty string
    pub params_file: Option<PathBuf>,
}

impl StartupOptions {
    /// Entries of the final override layer. The `debug` parameter is typed
    /// from the raw argument like any other launch value, so `True` is a
    /// boolean here even though `self.debug` only honours the literal `true`.
    pub fn supported_overrides(&self) -> ParameterMap {
        parameter_map([("debug", ParameterValue::from_launch_string(&self.debug_raw))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share() -> PathBuf {
        PathBuf::from("/opt/ros/share/microstrain_inertial_driver")
    }

    fn resolve(overrides: &[(&str, &str)]) -> Result<LaunchArguments, LaunchError> {
        LaunchArguments::resolve(&declared_arguments(&share()), overrides.iter().copied())
    }

    #[test]
    fn test_declared_catalogue() {
        let declared = declared_arguments(&share());
        assert_eq!(declared.len(), 18);
        assert_eq!(declared.iter().filter(|a| a.deprecated).count(), LEGACY_ARGUMENTS.len());
        for name in LEGACY_ARGUMENTS {
            assert!(declared.iter().any(|a| a.name == name && a.deprecated), "{name} missing");
        }
    }

    #[test]
    fn test_defaults_resolve() {
        let args = resolve(&[]).unwrap();
        let options = args.startup_options().unwrap();
        assert_eq!(options.namespace, "/");
        assert_eq!(options.node_name, PACKAGE_NAME);
        assert_eq!(options.intent, TransitionIntent::new(false, false));
        assert!(!options.debug);
        assert_eq!(
            options.params_file,
            Some(share().join("config").join("empty.yml"))
        );
        assert!(args.overridden().is_empty());
    }

    #[test]
    fn test_overrides_applied() {
        let args = resolve(&[("configure", "true"), ("activate", "true"), ("debug", "true")]).unwrap();
        let options = args.startup_options().unwrap();
        assert_eq!(options.intent, TransitionIntent::new(true, true));
        assert!(options.debug);
        assert_eq!(args.overridden(), ["configure", "activate", "debug"]);
    }

    #[test]
    fn test_debug_requires_literal_true() {
        let options = resolve(&[("debug", "True")]).unwrap().startup_options().unwrap();
        assert!(!options.debug);
        assert_eq!(options.debug_raw, "True");
        assert_eq!(
            options.supported_overrides().get("debug"),
            Some(&ParameterValue::Bool(true))
        );
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let err = resolve(&[("baud", "9600")]).unwrap_err();
        assert!(matches!(err, LaunchError::UnknownArgument(ref name) if name == "baud"));
    }

    #[test]
    fn test_empty_params_file_means_none() {
        let options = resolve(&[("params_file", "")]).unwrap().startup_options().unwrap();
        assert_eq!(options.params_file, None);
    }

    #[test]
    fn test_legacy_parameters_typed() {
        let legacy = resolve(&[("baudrate", "921600")]).unwrap().legacy_parameters().unwrap();
        assert_eq!(legacy.len(), 12);
        assert_eq!(legacy.get("baudrate"), Some(&ParameterValue::Integer(921600)));
        assert_eq!(legacy.get("imu_data_rate"), Some(&ParameterValue::Double(100.0)));
        assert_eq!(legacy.get("use_enu_frame"), Some(&ParameterValue::Bool(false)));
        assert_eq!(legacy.get("port"), Some(&ParameterValue::from("/dev/ttyACM0")));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("port:=/dev/ttyUSB0").unwrap(),
            ("port".to_string(), "/dev/ttyUSB0".to_string())
        );
        assert_eq!(
            parse_assignment("params_file:=").unwrap(),
            ("params_file".to_string(), String::new())
        );
        assert!(parse_assignment("port=/dev/ttyUSB0").is_err());
        assert!(parse_assignment(":=value").is_err());
    }
}
