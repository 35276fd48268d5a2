//! flock_launch CLI

use clap::{Parser, Subcommand, ValueEnum};
use flock_launch::{
    build_launch_plan, record::CommandGenerator, xml::write_launch_xml, FlockConfig, Profile,
};
use std::{
    path::{Path, PathBuf},
    process,
};

#[derive(Parser)]
#[command(name = "flock_launch")]
#[command(about = "Launch plan generator for simulated drone flocks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the launch plan and write it out
    Plan {
        /// YAML configuration file (defaults apply to missing keys)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Plan profile, replacing the configured one
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,

        /// Drone names, replacing the configured roster (repeatable)
        #[arg(short, long = "drone")]
        drones: Vec<String>,

        /// Emit the per-drone odometry filter node
        #[arg(long)]
        odom_filter: bool,

        /// Package share directory overrides (package:=path)
        #[arg(long = "share-dir", value_parser = parse_share_dir)]
        share_dirs: Vec<(String, PathBuf)>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Launch plan as JSON
    Json,
    /// record.json for the play_launch runtime
    Record,
    /// ROS 2 XML launch file
    Xml,
}

fn parse_share_dir(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once(":=") {
        Some((package, path)) if !package.is_empty() && !path.is_empty() => {
            Ok((package.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("Invalid share directory format: {}", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Plan {
            config,
            profile,
            drones,
            odom_filter,
            share_dirs,
            format,
            output,
        } => load_config(config.as_deref()).and_then(|mut flock| {
            if let Some(profile) = profile {
                flock.profile = profile;
            }
            if !drones.is_empty() {
                flock.drones = drones;
            }
            if odom_filter {
                flock.odom_filter.enabled = true;
            }
            for (package, path) in share_dirs {
                flock.share_directories.insert(package, path);
            }
            plan_and_write(&flock, format, output.as_deref())
        }),
        Commands::Config { config } => load_config(config.as_deref())
            .and_then(|flock| flock.to_yaml().map_err(Into::into))
            .and_then(|yaml| write_output(&yaml, None)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<FlockConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("Loading configuration: {}", path.display());
            Ok(FlockConfig::from_file(path)?)
        }
        None => Ok(FlockConfig::default()),
    }
}

fn plan_and_write(
    config: &FlockConfig,
    format: Format,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = build_launch_plan(config)?;

    let content = match format {
        Format::Json => plan.to_json()?,
        Format::Record => CommandGenerator::from_config(config)
            .generate_record(&plan)
            .to_json()?,
        Format::Xml => write_launch_xml(&plan),
    };
    write_output(&content, output)?;

    log::info!(
        "  {} entities: {} processes, {} nodes",
        plan.len(),
        plan.processes().count(),
        plan.nodes().count()
    );
    Ok(())
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
