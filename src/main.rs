use std::env;

use anyhow::{Context, Result};
use log::info;

use model_config_builder::{
    create_config, BuildOptions, PatternScraper, Prompter, PythonTransformers,
};

const DEFAULT_SCRIPT: &str = "run_finetune.py";
const DEFAULT_CONFIG: &str = "config.json";

fn main() -> Result<()> {
    env_logger::init();

    let cwd = env::current_dir().context("cannot determine the working directory")?;
    let mut prompter = Prompter::stdio();

    let script = prompter.ask(&format!(
        "Please enter the finetune script filename (default: {DEFAULT_SCRIPT}): "
    ))?;
    let script = if script.is_empty() {
        DEFAULT_SCRIPT.to_string()
    } else {
        script
    };
    let mut options = BuildOptions::new(cwd.join(script)).output_dir(cwd.clone());

    if prompter.confirm("Do you want to load an existing config.json for defaults?")? {
        let name = prompter.ask(&format!(
            "Please enter the config.json filename (default: {DEFAULT_CONFIG}): "
        ))?;
        let name = if name.is_empty() {
            DEFAULT_CONFIG.to_string()
        } else {
            name
        };
        options = options.existing_config(cwd.join(name));
    }

    info!("building config from {}", options.script_path.display());
    create_config(
        &options,
        &mut prompter,
        &PatternScraper::new(),
        &PythonTransformers::from_env(),
    )
    .context("failed to create config")?;

    Ok(())
}
