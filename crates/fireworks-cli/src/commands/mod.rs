//! CLI command implementations

pub mod describe;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use fireworks_particles::ShowFile;

/// Load the show at `path`, or the built-in show when no path is given
pub fn load_show(path: Option<&str>) -> Result<ShowFile> {
    match path {
        Some(path) => {
            ShowFile::load(path).with_context(|| format!("Failed to load show {path}"))
        }
        None => ShowFile::builtin().context("Built-in show is invalid"),
    }
}
