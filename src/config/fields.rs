/// Whether a field must be present in the written config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Mandatory,
    Optional,
}

/// A known config key and the question asked when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub prompt: &'static str,
    pub requirement: Requirement,
}

impl FieldDescriptor {
    const fn mandatory(name: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            prompt,
            requirement: Requirement::Mandatory,
        }
    }

    const fn optional(name: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            prompt,
            requirement: Requirement::Optional,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        self.requirement == Requirement::Mandatory
    }
}

/// Filled from the installed framework rather than asked for.
pub const TRANSFORMERS_VERSION: &str = "transformers_version";

pub static MANDATORY_FIELDS: [FieldDescriptor; 11] = [
    FieldDescriptor::mandatory(
        "_name_or_path",
        "Please provide the model name or path (e.g., 'unsloth/Meta-Llama-3.1-8B')",
    ),
    FieldDescriptor::mandatory(
        "architectures",
        "Please provide the architecture (e.g., 'LlamaForCausalLM')",
    ),
    FieldDescriptor::mandatory("hidden_size", "Please provide the hidden size (e.g., 4096)"),
    FieldDescriptor::mandatory(
        "num_hidden_layers",
        "Please provide the number of hidden layers (e.g., 32)",
    ),
    FieldDescriptor::mandatory(
        "intermediate_size",
        "Please provide the intermediate size (e.g., 14336)",
    ),
    FieldDescriptor::mandatory(
        "max_position_embeddings",
        "Please provide the max position embeddings (e.g., 131072)",
    ),
    FieldDescriptor::mandatory(
        "num_attention_heads",
        "Please provide the number of attention heads (e.g., 32)",
    ),
    FieldDescriptor::mandatory("model_type", "Please provide the model type (e.g., 'llama')"),
    FieldDescriptor::mandatory("vocab_size", "Please provide the vocabulary size (e.g., 128256)"),
    FieldDescriptor::mandatory("torch_dtype", "Please provide the torch dtype (e.g., 'bfloat16')"),
    FieldDescriptor::mandatory(TRANSFORMERS_VERSION, "Please provide the transformers version"),
];

pub static OPTIONAL_FIELDS: [FieldDescriptor; 14] = [
    FieldDescriptor::optional("attention_bias", "Does the model use attention bias? (True/False)"),
    FieldDescriptor::optional(
        "attention_dropout",
        "Please provide the attention dropout rate (e.g., 0.0)",
    ),
    FieldDescriptor::optional("bos_token_id", "Please provide the BOS token ID (e.g., 128000)"),
    FieldDescriptor::optional("eos_token_id", "Please provide the EOS token ID (e.g., 128001)"),
    FieldDescriptor::optional("mlp_bias", "Does the model use MLP bias? (True/False)"),
    FieldDescriptor::optional(
        "num_key_value_heads",
        "Please provide the number of key/value heads (e.g., 8)",
    ),
    FieldDescriptor::optional("pad_token_id", "Please provide the PAD token ID (e.g., 128004)"),
    FieldDescriptor::optional("pretraining_tp", "Please provide the pretraining TP (e.g., 1)"),
    FieldDescriptor::optional(
        "rope_scaling",
        "Provide rope scaling settings if used (leave blank if not)",
    ),
    FieldDescriptor::optional("rope_theta", "Please provide the rope theta (e.g., 500000.0)"),
    FieldDescriptor::optional("tie_word_embeddings", "Are word embeddings tied? (True/False)"),
    FieldDescriptor::optional("use_cache", "Does the model use cache? (True/False)"),
    FieldDescriptor::optional(
        "quantization_config",
        "Provide quantization settings if used (leave blank if not)",
    ),
    FieldDescriptor::optional("rms_norm_eps", "Please provide the RMS norm epsilon (e.g., 1e-05)"),
];

/// Looks up the descriptor for a known field.
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    MANDATORY_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter())
        .find(|f| f.name == name)
}
