use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "microstrain-launch.toml";
pub const ENV_PREFIX: &str = "MICROSTRAIN_LAUNCH";

/// Launcher settings. Launch arguments for the driver are not part of this;
/// they come from the command line only.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LauncherConfig {
    /// Installed share directory of the driver package. Looked up on
    /// AMENT_PREFIX_PATH when unset.
    pub share_dir: Option<PathBuf>,
    /// Output settings
    pub output: OutputConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Rendering of the launch description
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set
    pub level: String,
    /// Emit JSON lines instead of human readable logs
    pub json: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            share_dir: None,
            output: OutputConfig {
                format: OutputFormat::Yaml,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
        }
    }
}

impl LauncherConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (microstrain-launch.toml, or `config_path`)
    /// 3. Environment variables (prefixed with MICROSTRAIN_LAUNCH_)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with(config_path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(config_path: Option<&Path>, environment: Environment) -> Result<Self> {
        // Start with default configuration
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match config_path {
            // An explicitly requested file must exist
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if Path::new(CONFIG_FILE_NAME).exists() {
                    builder = builder.add_source(File::new(CONFIG_FILE_NAME, FileFormat::Toml));
                }
            }
        }

        // Override with environment variables
        builder = builder.add_source(environment);

        let config = builder.build()?;
        let launcher_config: LauncherConfig = config.try_deserialize()?;
        Ok(launcher_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists. Runs before logging is set up, so the
    /// caller logs the outcome.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path)?;
        Ok(true)
    }
}
