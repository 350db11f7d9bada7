pub mod config;
pub mod editor;
pub mod error;
pub mod fill;
pub mod literal;
pub mod prompt;
pub mod scrape;
pub mod version;
pub mod writer;

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use log::info;

pub use config::Config;
pub use error::{BuildError, Result};
pub use prompt::Prompter;
pub use scrape::{PatternScraper, Scraper};
pub use version::{FixedVersion, PythonTransformers, VersionSource};

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Training script to scrape.
    pub script_path: PathBuf,
    /// Previously saved config used as defaults, if any.
    pub existing_config: Option<PathBuf>,
    /// Directory the new config is written to.
    pub output_dir: PathBuf,
}

impl BuildOptions {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            existing_config: None,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn existing_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.existing_config = Some(path.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// Builds a model config from a saved config, a training script and the
/// operator's answers, writes it, and returns the path written.
///
/// Sources are layered in increasing priority: saved config, scraped
/// script values, operator input.
///
/// # Errors
/// Returns a `BuildError` if a file cannot be read or written, the saved
/// config or a scraped dict is malformed, the framework version cannot be
/// obtained, or the console fails.
pub fn create_config<R, W, S, V>(
    options: &BuildOptions,
    prompter: &mut Prompter<R, W>,
    scraper: &S,
    versions: &V,
) -> Result<PathBuf>
where
    R: BufRead,
    W: Write,
    S: Scraper,
    V: VersionSource,
{
    let existing = config::load_existing(options.existing_config.as_deref())?;
    let scraped = scraper.scrape_file(&options.script_path)?;
    info!(
        "scraped {} field(s) from {}",
        scraped.len(),
        options.script_path.display()
    );

    let mut config = config::merge(&existing, &scraped);
    fill::fill_missing(&mut config, &existing, prompter, versions)?;
    editor::review(&mut config, prompter)?;

    let path = writer::resolve_output_path(&options.output_dir, prompter)?;
    writer::write_config(&config, &path)?;
    prompter.say(format!("Config saved to {}", path.display()))?;
    Ok(path)
}
