//! fmuforge CLI - FMU export for simulation-toolkit scripts.

mod create;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fmuforge")]
#[command(about = "Generate FMUs for co-simulation from simulation-toolkit scripts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Package a simulation script as an FMU
    Create {
        /// FMU model identifier
        #[arg(short, long)]
        model_id: String,

        /// Path to the simulation script
        #[arg(short, long)]
        script: PathBuf,

        /// Toolkit install directory (default: the configured location)
        #[arg(short, long)]
        toolkit_dir: Option<PathBuf>,

        /// FMI version of the generated manifest
        #[arg(short, long, default_value = "2", value_parser = ["1", "2"])]
        fmi_version: String,

        /// Do not clean up intermediate files
        #[arg(short, long)]
        litter: bool,

        /// Start values (`name=value`) and/or auxiliary files
        #[arg(value_name = "EXTRA")]
        extra: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Create {
            model_id,
            script,
            toolkit_dir,
            fmi_version,
            litter,
            extra,
        } => create::execute(create::CreateArgs {
            model_id,
            script,
            toolkit_dir,
            fmi_version,
            litter,
            extra,
        }),
    };

    match result {
        Ok(package) => println!("FMU created successfully: {}", package.display()),
        Err(err) => {
            eprintln!("[ERROR] {}", err);
            std::process::exit(err.exit_code());
        }
    }
}
