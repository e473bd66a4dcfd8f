//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

/// Control the mouse pointer with one hand in front of a webcam
#[derive(Parser, Debug)]
#[command(name = "hand-mouse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (TOML); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (gesture transitions, ignored pointer failures)
    #[arg(short, long)]
    pub verbose: bool,

    /// Camera device index, overrides the config file
    #[arg(long)]
    pub camera: Option<u32>,

    /// Run without the preview window
    #[arg(long)]
    pub no_overlay: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(index) = self.camera {
            config.camera.index = index;
        }
        if self.no_overlay {
            config.display.show_overlay = false;
        }
        Ok(config)
    }
}
