use std::path::PathBuf;

use clap::Parser;
use experience::{
    sources::{fox_world_sources, load_manifest},
    ResourceError, Source,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "visual-examples", about = "Interactive scene demos")]
pub struct Settings {
    /// Demo to open on start: cube-group, falling-bodies or fox-world
    #[arg(long)]
    pub demo: Option<String>,

    /// Show the tweak panel on start (toggle with H)
    #[arg(long)]
    pub debug: bool,

    /// Directory asset paths are resolved against
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// JSON manifest replacing the built-in fox world sources
    #[arg(long)]
    pub sources: Option<PathBuf>,
}

impl Settings {
    pub fn fox_world_sources(&self) -> Result<Vec<Source>, ResourceError> {
        match &self.sources {
            Some(path) => load_manifest(path),
            None => Ok(fox_world_sources()),
        }
    }
}
