//! Locating the files a pretrained tokenizer is made of, either in a local
//! directory or on the Hugging Face hub. Downloading and caching are left to
//! `hf-hub`.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "tokenizer_config.json";
pub const SPECIAL_TOKENS_MAP_FILE: &str = "special_tokens_map.json";

#[derive(Debug, Clone, Default)]
pub struct HubOptions {
    /// Access token for gated or private repositories.
    pub token: Option<String>,
    /// Overrides the hf-hub cache location (`HF_HOME` otherwise).
    pub cache_dir: Option<PathBuf>,
    /// Branch, tag or commit; the repository default when unset.
    pub revision: Option<String>,
    pub progress: bool,
}

impl HubOptions {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerFiles {
    pub tokenizer_json: PathBuf,
    pub config_json: Option<PathBuf>,
    pub special_tokens_map_json: Option<PathBuf>,
}

impl TokenizerFiles {
    /// Find the tokenizer files inside `dir`. Only `tokenizer.json` is required.
    pub fn locate(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let tokenizer_json = dir.join(TOKENIZER_FILE);
        if !tokenizer_json.is_file() {
            return Err(Error::MissingFile(tokenizer_json));
        }
        let optional = |name: &str| Some(dir.join(name)).filter(|path| path.is_file());
        Ok(TokenizerFiles {
            tokenizer_json,
            config_json: optional(CONFIG_FILE),
            special_tokens_map_json: optional(SPECIAL_TOKENS_MAP_FILE),
        })
    }
}

/// Fetch the tokenizer files of `model_id` through the hf-hub cache.
pub fn fetch(model_id: &str, options: &HubOptions) -> Result<TokenizerFiles> {
    let hub_error = |source| Error::Hub {
        model_id: model_id.to_string(),
        source,
    };

    let mut builder = ApiBuilder::new().with_progress(options.progress);
    // an unset token must not clobber the one saved by `huggingface-cli login`
    if let Some(token) = &options.token {
        builder = builder.with_token(Some(token.clone()));
    }
    if let Some(dir) = &options.cache_dir {
        builder = builder.with_cache_dir(dir.clone());
    }
    let api = builder.build().map_err(hub_error)?;

    let repo = match &options.revision {
        Some(revision) => api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.clone(),
        )),
        None => api.model(model_id.to_string()),
    };

    let tokenizer_json = repo.get(TOKENIZER_FILE).map_err(hub_error)?;
    let config_json = match repo.get(CONFIG_FILE) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(model_id, error = %e, "no tokenizer_config.json, using defaults");
            None
        }
    };

    let special_tokens_map_json = match repo.get(SPECIAL_TOKENS_MAP_FILE) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!(model_id, error = %e, "no special_tokens_map.json");
            None
        }
    };

    Ok(TokenizerFiles {
        tokenizer_json,
        config_json,
        special_tokens_map_json,
    })
}

/// Resolve `model_id` to tokenizer files. An existing directory is used as is,
/// anything else is treated as a hub repository id.
pub fn resolve(model_id: &str, options: &HubOptions) -> Result<TokenizerFiles> {
    let local = Path::new(model_id);
    let files = if local.is_dir() {
        TokenizerFiles::locate(local)?
    } else {
        fetch(model_id, options)?
    };
    info!(
        model_id,
        tokenizer = %files.tokenizer_json.display(),
        has_config = files.config_json.is_some(),
        "resolved tokenizer files"
    );
    Ok(files)
}
