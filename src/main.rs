// src/main.rs

use anyhow::Result;
use apkguard::{SoNameCheck, SoNameOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apkguard")]
#[command(author, version, about = "ABI compatibility checker for APK package repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Checks run against a freshly built package set
    Check {
        #[command(subcommand)]
        check: CheckCommands,
    },
}

#[derive(Subcommand)]
enum CheckCommands {
    /// Compare versioned sonames against the previously published release
    SoName {
        /// CI build manifest, one ARCH|NAME|VERSION-rEPOCH line per package
        #[arg(long, default_value = "packages.log")]
        package_list_file: PathBuf,
        /// Directory containing the build recipes ({name}.yaml)
        #[arg(long = "dir", default_value = ".")]
        recipe_dir: PathBuf,
        /// Directory containing the newly built archives
        #[arg(long, default_value = "packages")]
        packages_dir: PathBuf,
        /// Published APKINDEX URL; its filename segment is replaced to fetch
        /// individual archives
        #[arg(long = "apk-index-url")]
        index_url: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            check:
                CheckCommands::SoName {
                    package_list_file,
                    recipe_dir,
                    packages_dir,
                    index_url,
                },
        } => {
            let check = SoNameCheck::new(SoNameOptions {
                package_list_file,
                recipe_dir,
                packages_dir,
                index_url,
            })?;
            check.run()?;
            println!("so name check passed");
            Ok(())
        }
    }
}
