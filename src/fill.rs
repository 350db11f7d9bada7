use std::io::{BufRead, Write};

use log::{debug, info};
use serde_json::Value;

use crate::{
    config::{
        display_value,
        fields::{self, TRANSFORMERS_VERSION},
        Config, FieldDescriptor, MANDATORY_FIELDS, OPTIONAL_FIELDS,
    },
    error::Result,
    literal,
    prompt::Prompter,
    version::VersionSource,
};

/// Operator text is parsed as a literal only when the default is one of these.
fn expects_literal(default: Option<&Value>) -> bool {
    matches!(
        default,
        Some(Value::Number(_) | Value::Bool(_) | Value::Object(_) | Value::Array(_))
    )
}

/// Asks for one field until a usable answer is given.
///
/// Empty input takes `default` when there is one. Otherwise a mandatory
/// field is asked again and an optional one resolves to `None`, meaning the
/// field is left out. A JSON `null` default counts as no default.
///
/// # Errors
/// Returns `BuildError::Prompt` if the console fails.
pub fn ask_field<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    name: &str,
    prompt: &str,
    mandatory: bool,
    default: Option<&Value>,
) -> Result<Option<Value>> {
    let default = default.filter(|v| !v.is_null());

    let mut question = prompt.to_string();
    if let Some(default) = default {
        question.push_str(&format!(" (default: {})", display_value(default)));
    }
    if !mandatory {
        question.push_str(" [optional]");
    }
    question.push_str(": ");

    loop {
        let input = prompter.ask(&question)?;

        if input.is_empty() {
            match default {
                Some(default) => return Ok(Some(default.clone())),
                None if !mandatory => return Ok(None),
                None => {
                    prompter.say(format!("A value is required for {name}."))?;
                    continue;
                }
            }
        }

        if !expects_literal(default) {
            return Ok(Some(Value::String(input)));
        }

        match literal::parse(&input) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => {
                debug!("rejected input for {name}: {e}");
                prompter.say(format!("Invalid input for {name}. Please try again."))?;
            }
        }
    }
}

fn fill_field<R: BufRead, W: Write, V: VersionSource>(
    config: &mut Config,
    defaults: &Config,
    field: &FieldDescriptor,
    prompter: &mut Prompter<R, W>,
    versions: &V,
) -> Result<()> {
    if let Some(value) = config.get(field.name) {
        prompter.say(format!("{} detected: {}", field.name, display_value(value)))?;
        return Ok(());
    }

    let value = if field.name == TRANSFORMERS_VERSION {
        Some(Value::String(versions.framework_version(prompter)?))
    } else {
        ask_field(
            prompter,
            field.name,
            field.prompt,
            field.is_mandatory(),
            defaults.get(field.name),
        )?
    };

    match value {
        Some(value) => {
            config.insert(field.name.to_string(), value);
        }
        None => debug!("{} left out", field.name),
    }
    Ok(())
}

/// Removes `null` entries, which stand for "not set". Mandatory fields are
/// kept whatever their value.
pub fn drop_absent(config: &mut Config) {
    config.retain(|key, value| {
        let keep = !value.is_null()
            || fields::descriptor(key).is_some_and(FieldDescriptor::is_mandatory);
        if !keep {
            debug!("{key} is null, leaving it out");
        }
        keep
    });
}

/// Prompts for every mandatory and optional field missing from `config`.
///
/// `defaults` is the previously saved config. `transformers_version` is
/// taken from `versions` and never asked for. Optional fields the operator
/// skips are not added, and `null` entries other than mandatory fields are
/// dropped once filling is done.
///
/// # Errors
/// Returns an error if the console fails or the version cannot be obtained.
pub fn fill_missing<R: BufRead, W: Write, V: VersionSource>(
    config: &mut Config,
    defaults: &Config,
    prompter: &mut Prompter<R, W>,
    versions: &V,
) -> Result<()> {
    for field in MANDATORY_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        fill_field(config, defaults, field, prompter, versions)?;
    }
    drop_absent(config);
    info!("config has {} entries after filling", config.len());
    Ok(())
}
