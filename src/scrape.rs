//! Extraction of config values from training-script text.
//!
//! Scraping is plain pattern matching over lines; no Python is parsed. Callers
//! go through [`Scraper`] so a structured parser can replace it later.

use std::{fs, path::Path, sync::LazyLock};

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::{
    config::Config,
    error::{BuildError, Result},
    literal,
};

/// Produces config entries from the text of a training script.
pub trait Scraper {
    /// Extracts at most one value per recognised field from `text`.
    ///
    /// # Errors
    /// Returns an error if a matched value cannot be converted.
    fn scrape(&self, text: &str) -> Result<Config>;

    /// Reads `path` and scrapes its contents.
    ///
    /// # Errors
    /// Returns `BuildError::Io` if the file cannot be read, or whatever
    /// [`Scraper::scrape`] returns.
    fn scrape_file(&self, path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.scrape(&text)
    }
}

/// How a captured match is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// Kept as the literal matched text.
    Text,
    /// Parsed as a dict literal.
    Dict,
}

struct Pattern {
    field: &'static str,
    regex: Regex,
    capture: Capture,
}

impl Pattern {
    fn new(field: &'static str, regex: &str, capture: Capture) -> Self {
        Self {
            field,
            regex: Regex::new(regex).expect("valid scrape pattern"),
            capture,
        }
    }
}

// `model_name` in scripts is stored under `model_type`.
static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new("hidden_size", r"hidden_size\s*=\s*(\d+)", Capture::Text),
        Pattern::new("num_hidden_layers", r"num_hidden_layers\s*=\s*(\d+)", Capture::Text),
        Pattern::new("intermediate_size", r"intermediate_size\s*=\s*(\d+)", Capture::Text),
        Pattern::new(
            "max_position_embeddings",
            r"max_position_embeddings\s*=\s*(\d+)",
            Capture::Text,
        ),
        Pattern::new("num_attention_heads", r"num_attention_heads\s*=\s*(\d+)", Capture::Text),
        Pattern::new("model_type", r#"model_name\s*=\s*["'](.+?)["']"#, Capture::Text),
        Pattern::new("rope_scaling", r"rope_scaling\s*=\s*(\{.*?\})", Capture::Dict),
        Pattern::new("use_cache", r"use_cache\s*=\s*(True|False)", Capture::Text),
        Pattern::new(
            "quantization_config",
            r"quantization_config\s*=\s*(\{.*?\})",
            Capture::Dict,
        ),
    ]
});

/// Line-oriented regex scraper. For each field the first matching line wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternScraper;

impl PatternScraper {
    pub fn new() -> Self {
        Self
    }
}

impl Scraper for PatternScraper {
    fn scrape(&self, text: &str) -> Result<Config> {
        let mut config = Config::new();

        for pattern in PATTERNS.iter() {
            let found = text
                .lines()
                .enumerate()
                .find_map(|(i, line)| pattern.regex.captures(line).map(|caps| (i, caps)));

            let Some((line_no, caps)) = found else {
                continue;
            };
            let raw = &caps[1];
            debug!("{} found on line {}: {raw}", pattern.field, line_no + 1);

            let value = match pattern.capture {
                Capture::Text => Value::String(raw.to_string()),
                Capture::Dict => literal::parse(raw).map_err(|source| BuildError::Literal {
                    field: pattern.field,
                    source,
                })?,
            };
            config.insert(pattern.field.to_string(), value);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scrape(text: &str) -> Value {
        Value::Object(PatternScraper::new().scrape(text).unwrap())
    }

    #[test]
    fn integers_stay_text() {
        assert_eq!(scrape("hidden_size = 4096\n"), json!({"hidden_size": "4096"}));
    }

    #[test]
    fn model_name_maps_to_model_type() {
        assert_eq!(scrape(r#"model_name = "llama""#), json!({"model_type": "llama"}));
        assert_eq!(
            scrape("model_name='unsloth/Meta-Llama-3.1-8B'"),
            json!({"model_type": "unsloth/Meta-Llama-3.1-8B"})
        );
    }

    #[test]
    fn first_match_wins() {
        let text = "num_hidden_layers = 32\nnum_hidden_layers = 16\n";
        assert_eq!(scrape(text), json!({"num_hidden_layers": "32"}));
    }

    #[test]
    fn use_cache_is_text() {
        assert_eq!(scrape("    use_cache=False,"), json!({"use_cache": "False"}));
        assert_eq!(scrape("use_cache = maybe"), json!({}));
    }

    #[test]
    fn dicts_are_parsed() {
        let text = "\
model = load(
    rope_scaling = {'type': 'linear', 'factor': 2.0},
    quantization_config = {\"load_in_4bit\": True}
)";
        assert_eq!(
            scrape(text),
            json!({
                "rope_scaling": {"type": "linear", "factor": 2.0},
                "quantization_config": {"load_in_4bit": true},
            })
        );
    }

    #[test]
    fn fields_come_out_in_pattern_order() {
        let text = "use_cache = True\nhidden_size = 8\nmodel_name = 'x'\n";
        let config = PatternScraper::new().scrape(text).unwrap();
        let keys: Vec<_> = config.keys().map(String::as_str).collect();
        assert_eq!(keys, ["hidden_size", "model_type", "use_cache"]);
    }

    #[test]
    fn malformed_dict_is_fatal() {
        let err = PatternScraper::new()
            .scrape("rope_scaling = {'type': linear}")
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Literal {
                field: "rope_scaling",
                ..
            }
        ));
    }

    #[test]
    fn unrelated_text_yields_nothing() {
        assert_eq!(scrape("import torch\n# hidden size is large\n"), json!({}));
    }
}
