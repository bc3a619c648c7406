use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use microstrain_launch::config::{LauncherConfig, OutputFormat};
use microstrain_launch::launch::{package_share_directory, parse_assignment, DescriptionBuilder, PACKAGE_NAME};
use microstrain_launch::telemetry::{create_launch_span, generate_launch_id, init_telemetry};

#[derive(Parser)]
#[command(name = "microstrain-launch")]
#[command(about = "Build the startup description of the MicroStrain inertial driver node")]
#[command(long_about = "Resolves launch arguments, merges the driver's parameter layers \
                       (package defaults, deprecated arguments, params_file, supported overrides) \
                       and prints the node declaration with its startup lifecycle transitions.")]
struct Cli {
    /// Launch arguments as name:=value
    #[arg(value_name = "NAME:=VALUE")]
    arguments: Vec<String>,

    /// Driver share directory (skips the AMENT_PREFIX_PATH lookup)
    #[arg(long, value_name = "DIR")]
    share_dir: Option<PathBuf>,

    /// Launcher configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format for the description
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print which layer supplied each effective parameter
    #[arg(long)]
    explain: bool,

    /// List the declared launch arguments and exit
    #[arg(long)]
    show_args: bool,

    /// Write the effective launcher configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file_loaded = LauncherConfig::load_env_file()?;
    let config = LauncherConfig::load(cli.config.as_deref()).context("Failed to load launcher configuration")?;
    init_telemetry(&config.logging)?;
    if env_file_loaded {
        tracing::info!("Loaded environment variables from .env file");
    }

    if let Some(path) = &cli.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write launcher configuration to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote launcher configuration");
        return Ok(());
    }

    let share_dir = match cli.share_dir.or(config.share_dir.clone()) {
        Some(dir) => dir,
        None => package_share_directory(PACKAGE_NAME)?,
    };
    let builder = DescriptionBuilder::new(share_dir);

    if cli.show_args {
        show_arguments(&builder);
        return Ok(());
    }

    let overrides = cli
        .arguments
        .iter()
        .map(|token| parse_assignment(token))
        .collect::<Result<Vec<_>, _>>()?;
    let args = builder.resolve_arguments(overrides)?;

    let launch_id = generate_launch_id();
    let span = create_launch_span(&launch_id, args.get("node_name"));
    let _guard = span.enter();

    let description = builder.build(&args).context("Failed to build launch description")?;

    if cli.explain {
        for (key, source) in description.provenance.iter() {
            if let Some(value) = description.node.parameters.get(key) {
                println!("{key} = {value}  ({source})");
            }
        }
        return Ok(());
    }

    let rendered = description.render(cli.format.unwrap_or(config.output.format))?;
    println!("{rendered}");
    Ok(())
}

fn show_arguments(builder: &DescriptionBuilder) {
    for argument in builder.declared_arguments() {
        let marker = if argument.deprecated { " [deprecated]" } else { "" };
        println!("{}:{}", argument.name, marker);
        println!("    {}", argument.description);
        println!("    (default: '{}')", argument.default);
    }
}
