use std::path::Path;

use tokenizers::Tokenizer as HfTokenizer;
use tracing::{debug, info};

use crate::base::{TokenId, Tokenizer};
use crate::cleanup::clean_up_tokenization;
use crate::config::{SpecialTokensMap, TokenizerConfig};
use crate::error::{Error, Result};
use crate::hub::{self, HubOptions, TokenizerFiles};

/// A pretrained tokenizer: the `tokenizers` pipeline from `tokenizer.json`
/// plus the settings transformers keeps in `tokenizer_config.json`.
pub struct PretrainedTokenizer {
    inner: HfTokenizer,
    config: TokenizerConfig,
    bos_id: Option<TokenId>,
    eos_id: Option<TokenId>,
}

impl PretrainedTokenizer {
    /// Load the tokenizer named by `model_id`, a hub repository id or a local
    /// directory.
    pub fn from_pretrained(model_id: &str, options: &HubOptions) -> Result<Self> {
        let files = hub::resolve(model_id, options)?;
        Self::from_files(&files)
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let files = TokenizerFiles::locate(dir)?;
        Self::from_files(&files)
    }

    pub fn from_files(files: &TokenizerFiles) -> Result<Self> {
        let inner = HfTokenizer::from_file(&files.tokenizer_json)
            .map_err(|e| Error::Load(e.to_string()))?;
        let mut config = match &files.config_json {
            Some(path) => TokenizerConfig::from_file(path)?,
            None => TokenizerConfig::default(),
        };
        if let Some(path) = &files.special_tokens_map_json {
            config.fill_missing_from(SpecialTokensMap::from_file(path)?);
        }
        Ok(Self::new(inner, config))
    }

    pub fn new(inner: HfTokenizer, config: TokenizerConfig) -> Self {
        let bos_id = config.bos_token().and_then(|token| inner.token_to_id(token));
        let eos_id = config.eos_token().and_then(|token| inner.token_to_id(token));
        info!(
            vocab_size = inner.get_vocab_size(true),
            class = config.tokenizer_class.as_deref().unwrap_or("unknown"),
            special_tokens = ?config.special_token_contents(),
            "loaded tokenizer"
        );
        PretrainedTokenizer {
            inner,
            config,
            bos_id,
            eos_id,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    pub fn token_to_id(&self, token: &str) -> Option<TokenId> {
        self.inner.token_to_id(token)
    }

    pub fn id_to_token(&self, id: TokenId) -> Option<String> {
        self.inner.id_to_token(id)
    }

    pub fn encode_with(&self, text: &str, add_special_tokens: bool) -> Result<Vec<TokenId>> {
        let encoding = self
            .inner
            .encode(text, add_special_tokens)
            .map_err(|e| Error::Encode(e.to_string()))?;
        let mut ids = encoding.get_ids().to_vec();
        if add_special_tokens {
            self.ensure_configured_special_tokens(&mut ids);
        }
        debug!(chars = text.len(), tokens = ids.len(), "encoded");
        Ok(ids)
    }

    pub fn decode_with(&self, ids: &[TokenId], skip_special_tokens: bool) -> Result<String> {
        let text = self
            .inner
            .decode(ids, skip_special_tokens)
            .map_err(|e| Error::Decode(e.to_string()))?;
        if self.config.clean_up_tokenization_spaces() {
            return Ok(clean_up_tokenization(&text)?.into_owned());
        }
        Ok(text)
    }

    // the post-processor in tokenizer.json normally adds these already, but
    // add_bos_token/add_eos_token in the config take precedence
    fn ensure_configured_special_tokens(&self, ids: &mut Vec<TokenId>) {
        if let (Some(true), Some(bos)) = (self.config.add_bos_token, self.bos_id)
            && ids.first() != Some(&bos)
        {
            ids.insert(0, bos);
        }
        if let (Some(true), Some(eos)) = (self.config.add_eos_token, self.eos_id)
            && ids.last() != Some(&eos)
        {
            ids.push(eos);
        }
    }
}

impl Tokenizer for PretrainedTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>> {
        self.encode_with(text, true)
    }

    fn decode(&self, ids: &[TokenId]) -> Result<String> {
        self.decode_with(ids, true)
    }
}
