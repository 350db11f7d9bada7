use std::io::{BufRead, Write};

use log::debug;

use crate::{
    config::{display_value, fields, Config},
    error::Result,
    fill,
    prompt::Prompter,
};

/// Prints every entry, then offers the edit menu if the operator wants it.
///
/// # Errors
/// Returns `BuildError::Prompt` if the console fails.
pub fn review<R: BufRead, W: Write>(
    config: &mut Config,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    prompter.say("\nConfig entries detected and filled:")?;
    for (key, value) in config.iter() {
        prompter.say(format!("{key}: {}", display_value(value)))?;
    }

    if prompter.confirm("\nDo you want to modify any entry?")? {
        edit(config, prompter)?;
    }
    Ok(())
}

/// Lets the operator overwrite entries by their 1-based menu position until
/// an empty choice is entered. Anything that is not a valid position just
/// shows the menu again.
///
/// # Errors
/// Returns `BuildError::Prompt` if the console fails.
pub fn edit<R: BufRead, W: Write>(
    config: &mut Config,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    loop {
        prompter.say(
            "Enter the number corresponding to the field you want to modify or press Enter to continue:",
        )?;
        for (i, (key, value)) in config.iter().enumerate() {
            prompter.say(format!("{}. {key}: {}", i + 1, display_value(value)))?;
        }

        let choice = prompter.ask("Your choice: ")?;
        if choice.is_empty() {
            return Ok(());
        }

        let Some(key) = select(config, &choice) else {
            debug!("ignoring menu choice {choice:?}");
            continue;
        };

        let prompt = match fields::descriptor(&key) {
            Some(field) => field.prompt.to_string(),
            None => format!("Please enter {key}"),
        };
        let current = config.get(&key).cloned();
        if let Some(value) = fill::ask_field(prompter, &key, &prompt, true, current.as_ref())? {
            config.insert(key, value);
        }
    }
}

fn select(config: &Config, choice: &str) -> Option<String> {
    if !choice.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = choice.parse::<usize>().ok()?.checked_sub(1)?;
    config.keys().nth(index).cloned()
}
