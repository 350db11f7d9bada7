use std::{fs, io::Cursor, path::Path};

use serde_json::{json, Value};
use tempfile::TempDir;

use model_config_builder::{
    config::{MANDATORY_FIELDS, OPTIONAL_FIELDS},
    create_config, BuildError, BuildOptions, FixedVersion, PatternScraper, Prompter,
};

const SCRIPT: &str = r#"
import torch
from transformers import AutoModelForCausalLM

model_name = "llama"
hidden_size = 4096
use_cache = True
model = AutoModelForCausalLM.from_pretrained(
    model_name,
    rope_scaling = {'type': 'linear', 'factor': 2.0},
)
"#;

fn run(options: &BuildOptions, answers: &[&str]) -> (Result<std::path::PathBuf, BuildError>, String) {
    let mut input = answers.join("\n");
    input.push('\n');
    let mut prompter = Prompter::new(Cursor::new(input.into_bytes()), Vec::new());
    let res = create_config(
        options,
        &mut prompter,
        &PatternScraper::new(),
        &FixedVersion("4.44.0".into()),
    );
    (res, String::from_utf8(prompter.into_output()).unwrap())
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn builds_config_from_all_sources() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("run_finetune.py");
    let base = dir.path().join("base.json");
    fs::write(&script, SCRIPT).unwrap();
    fs::write(&base, r#"{"hidden_size": 2048, "vocab_size": 128256, "custom": 1}"#).unwrap();

    let options = BuildOptions::new(&script)
        .existing_config(&base)
        .output_dir(dir.path());

    let answers = [
        // mandatory: _name_or_path .. torch_dtype, minus the scraped/loaded ones
        "unsloth/Meta-Llama-3.1-8B",
        "LlamaForCausalLM",
        "32",
        "14336",
        "131072",
        "32",
        "bfloat16",
        // optional: everything but rope_scaling and use_cache
        "", "", "", "", "", "8", "", "", "", "", "", "",
        // no edits
        "n",
    ];
    let (res, out) = run(&options, &answers);
    let path = res.unwrap();
    assert_eq!(path, dir.path().join("config.json"));

    let written = read_json(&path);
    let keys: Vec<_> = written.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "hidden_size",
            "vocab_size",
            "custom",
            "model_type",
            "rope_scaling",
            "use_cache",
            "_name_or_path",
            "architectures",
            "num_hidden_layers",
            "intermediate_size",
            "max_position_embeddings",
            "num_attention_heads",
            "torch_dtype",
            "transformers_version",
            "num_key_value_heads",
        ]
    );
    assert_eq!(written["hidden_size"], json!("4096"));
    assert_eq!(written["vocab_size"], json!(128256));
    assert_eq!(written["model_type"], json!("llama"));
    assert_eq!(written["use_cache"], json!("True"));
    assert_eq!(written["rope_scaling"], json!({"type": "linear", "factor": 2.0}));
    assert_eq!(written["transformers_version"], json!("4.44.0"));
    assert_eq!(written["num_key_value_heads"], json!("8"));

    assert!(out.contains("hidden_size detected: 4096"));
    assert!(out.contains("model_type detected: llama"));
    assert!(!out.contains("transformers version"));
    assert!(out.contains(&format!("Config saved to {}", path.display())));
}

#[test]
fn malformed_scraped_dict_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("run_finetune.py");
    fs::write(&script, "quantization_config = {'bits': four}\n").unwrap();

    let options = BuildOptions::new(&script).output_dir(dir.path());
    let (res, _) = run(&options, &[]);

    assert!(matches!(
        res,
        Err(BuildError::Literal {
            field: "quantization_config",
            ..
        })
    ));
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn missing_script_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let options = BuildOptions::new(dir.path().join("nope.py")).output_dir(dir.path());
    let (res, _) = run(&options, &[]);
    assert!(matches!(res, Err(BuildError::Io { .. })));
}

#[test]
fn complete_existing_config_only_asks_to_edit_and_save() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("run_finetune.py");
    let existing = dir.path().join("config.json");
    fs::write(&script, "# nothing to see\n").unwrap();

    let mut full = serde_json::Map::new();
    for field in MANDATORY_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        full.insert(field.name.to_string(), json!(1));
    }
    fs::write(&existing, serde_json::to_string(&full).unwrap()).unwrap();

    let options = BuildOptions::new(&script)
        .existing_config(&existing)
        .output_dir(dir.path());

    // Edit entry 3 (hidden_size), then keep the file name but decline overwrite.
    let (res, out) = run(
        &options,
        &["y", "99", "3", "4096", "", "n", "config_v2.json"],
    );
    let path = res.unwrap();
    assert_eq!(path, dir.path().join("config_v2.json"));

    let written = read_json(&path);
    assert_eq!(written["hidden_size"], json!(4096));
    assert_eq!(written["vocab_size"], json!(1));
    assert_eq!(written.as_object().unwrap().len(), 25);
    assert_eq!(read_json(&existing)["hidden_size"], json!(1));

    assert!(!out.contains("[optional]"));
    assert!(out.contains("already exists. Do you want to overwrite it? (y/n): "));
}

#[test]
fn null_entries_from_saved_config_are_left_out() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("run_finetune.py");
    let base = dir.path().join("base.json");
    fs::write(&script, "# nothing to see\n").unwrap();

    let mut saved = serde_json::Map::new();
    for field in MANDATORY_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        saved.insert(field.name.to_string(), json!(1));
    }
    saved.insert("rope_scaling".into(), Value::Null);
    saved.insert("sliding_window".into(), Value::Null);
    fs::write(&base, serde_json::to_string(&saved).unwrap()).unwrap();

    let options = BuildOptions::new(&script)
        .existing_config(&base)
        .output_dir(dir.path());
    let (res, out) = run(&options, &["n"]);

    let written = read_json(&res.unwrap());
    let written = written.as_object().unwrap();
    assert!(!written.contains_key("rope_scaling"));
    assert!(!written.contains_key("sliding_window"));
    assert_eq!(written.len(), 24);
    assert!(out.contains("rope_scaling detected: None"));
}
