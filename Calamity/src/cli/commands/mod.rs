use clap::Subcommand;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::Config;

pub mod config_cmd;
pub mod merge;
pub mod remap;
pub mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Merge title directories, export RDB archives and remap textures
    Run {
        /// Path to the Age of Calamity game files
        game_path: String,

        /// Hash list mapping models to texture ids and kidsobjdb keys
        #[arg(long, default_value = "hash-list")]
        hash_list: PathBuf,

        /// Config file (defaults to ./calamity.toml or the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write bundles here instead of into the export tree
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads for the remap (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Overlay directories onto a destination, later sources win
    Merge {
        /// Destination directory
        #[arg(short, long)]
        destination: PathBuf,

        /// Source directories, lowest priority first
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Remap textures from an existing export tree
    Remap {
        /// Hash list mapping models to texture ids and kidsobjdb keys
        #[arg(long, default_value = "hash-list")]
        hash_list: PathBuf,

        /// Exporter output directory (defaults to the configured export root)
        #[arg(short, long)]
        export_root: Option<PathBuf>,

        /// Write bundles here instead of into the export tree
        #[arg(short, long)]
        output_root: Option<PathBuf>,

        /// KTID tool executable (defaults to the configured tool)
        #[arg(long)]
        ktid_tool: Option<PathBuf>,

        /// Config file (defaults to ./calamity.toml or the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the run log
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Worker threads for the remap (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file (defaults to ./calamity.toml or the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Run {
                game_path,
                hash_list,
                config,
                output,
                threads,
                quiet,
            } => {
                let mut config = load_config(config.as_deref())?;
                if let Some(output) = output {
                    config.paths.output_root = Some(output.clone());
                }
                if let Some(threads) = threads {
                    config.pipeline.threads = *threads;
                }
                run::execute(game_path, hash_list, &config, !*quiet)
            }
            Commands::Merge { destination, sources } => merge::execute(sources, destination),
            Commands::Remap {
                hash_list,
                export_root,
                output_root,
                ktid_tool,
                config,
                log_dir,
                threads,
                quiet,
            } => {
                let mut config = load_config(config.as_deref())?;
                if let Some(export_root) = export_root {
                    config.paths.export_root = export_root.clone();
                }
                if let Some(output_root) = output_root {
                    config.paths.output_root = Some(output_root.clone());
                }
                if let Some(ktid_tool) = ktid_tool {
                    config.tools.ktid = ktid_tool.clone();
                }
                if let Some(log_dir) = log_dir {
                    config.paths.log_dir = log_dir.clone();
                }
                if let Some(threads) = threads {
                    config.pipeline.threads = *threads;
                }
                remap::execute(hash_list, &config, !*quiet)
            }
            Commands::Config { config } => config_cmd::execute(&load_config(config.as_deref())?),
        }
    }
}

/// Load an explicit config file, or discover one
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Config::discover().context("loading config"),
    }
}
