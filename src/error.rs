use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tokenizer file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to fetch '{model_id}' from the hub: {source}")]
    Hub {
        model_id: String,
        #[source]
        source: hf_hub::api::sync::ApiError,
    },
    #[error("invalid tokenizer config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    // tokenizers errors are boxed trait objects, only the message is kept
    #[error("failed to load tokenizer: {0}")]
    Load(String),
    #[error("encoding failed: {0}")]
    Encode(String),
    #[error("decoding failed: {0}")]
    Decode(String),
    #[error("regex error: {0}")]
    Regex(#[from] fancy_regex::Error),
}
