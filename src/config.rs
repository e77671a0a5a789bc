//! `tokenizer_config.json`, the companion file transformers writes next to
//! `tokenizer.json`. Only the keys that affect encoding and decoding are read;
//! everything else is ignored.

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer};

use crate::base::TokenId;
use crate::error::{Error, Result};

/// A special token is written either as a bare string or as a full added-token
/// object, depending on the transformers version that saved the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SpecialToken {
    Text(String),
    Added(AddedTokenEntry),
}

impl SpecialToken {
    pub fn content(&self) -> &str {
        match self {
            SpecialToken::Text(content) => content,
            SpecialToken::Added(entry) => &entry.content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddedTokenEntry {
    pub content: String,
    #[serde(default)]
    pub lstrip: bool,
    #[serde(default)]
    pub rstrip: bool,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub single_word: bool,
    #[serde(default)]
    pub special: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub add_bos_token: Option<bool>,
    #[serde(default)]
    pub add_eos_token: Option<bool>,
    // keys are token ids written as strings
    #[serde(default, deserialize_with = "null_as_default")]
    pub added_tokens_decoder: IndexMap<String, AddedTokenEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_special_tokens: Vec<SpecialToken>,
    #[serde(default)]
    pub bos_token: Option<SpecialToken>,
    #[serde(default)]
    pub eos_token: Option<SpecialToken>,
    #[serde(default)]
    pub unk_token: Option<SpecialToken>,
    #[serde(default)]
    pub pad_token: Option<SpecialToken>,
    #[serde(default)]
    pub clean_up_tokenization_spaces: Option<bool>,
    #[serde(default)]
    pub legacy: Option<bool>,
    /// Often a sentinel like `1e30`, hence a float.
    #[serde(default)]
    pub model_max_length: Option<f64>,
    #[serde(default)]
    pub tokenizer_class: Option<String>,
    #[serde(default)]
    pub chat_template: Option<serde_json::Value>,
}

/// `special_tokens_map.json`, the older home of the named special tokens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialTokensMap {
    #[serde(default)]
    pub bos_token: Option<SpecialToken>,
    #[serde(default)]
    pub eos_token: Option<SpecialToken>,
    #[serde(default)]
    pub unk_token: Option<SpecialToken>,
    #[serde(default)]
    pub pad_token: Option<SpecialToken>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_special_tokens: Vec<SpecialToken>,
}

impl SpecialTokensMap {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

impl TokenizerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Fill the named special tokens this config leaves unset from `map`.
    /// Tokens the config already names win.
    pub fn fill_missing_from(&mut self, map: SpecialTokensMap) {
        let SpecialTokensMap {
            bos_token,
            eos_token,
            unk_token,
            pad_token,
            additional_special_tokens,
        } = map;
        self.bos_token = self.bos_token.take().or(bos_token);
        self.eos_token = self.eos_token.take().or(eos_token);
        self.unk_token = self.unk_token.take().or(unk_token);
        self.pad_token = self.pad_token.take().or(pad_token);
        if self.additional_special_tokens.is_empty() {
            self.additional_special_tokens = additional_special_tokens;
        }
    }

    pub fn bos_token(&self) -> Option<&str> {
        self.bos_token.as_ref().map(SpecialToken::content)
    }

    pub fn eos_token(&self) -> Option<&str> {
        self.eos_token.as_ref().map(SpecialToken::content)
    }

    pub fn unk_token(&self) -> Option<&str> {
        self.unk_token.as_ref().map(SpecialToken::content)
    }

    pub fn pad_token(&self) -> Option<&str> {
        self.pad_token.as_ref().map(SpecialToken::content)
    }

    pub fn clean_up_tokenization_spaces(&self) -> bool {
        self.clean_up_tokenization_spaces.unwrap_or(false)
    }

    /// Entries of `added_tokens_decoder` in file order. Keys that are not
    /// integers are skipped.
    pub fn added_tokens(&self) -> impl Iterator<Item = (TokenId, &AddedTokenEntry)> {
        self.added_tokens_decoder
            .iter()
            .filter_map(|(id, entry)| id.parse::<TokenId>().ok().map(|id| (id, entry)))
    }

    /// Every special token the config declares, without duplicates.
    pub fn special_token_contents(&self) -> Vec<&str> {
        let named = [
            &self.bos_token,
            &self.eos_token,
            &self.unk_token,
            &self.pad_token,
        ];
        let mut contents: IndexSet<&str> = named
            .into_iter()
            .flatten()
            .map(SpecialToken::content)
            .collect();
        contents.extend(self.additional_special_tokens.iter().map(SpecialToken::content));
        contents.extend(
            self.added_tokens()
                .filter(|(_, entry)| entry.special)
                .map(|(_, entry)| entry.content.as_str()),
        );
        contents.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXTRAL_LIKE: &str = r#"{
        "add_bos_token": true,
        "add_eos_token": false,
        "added_tokens_decoder": {
            "0": {"content": "<unk>", "lstrip": false, "normalized": false, "rstrip": false, "single_word": false, "special": true},
            "1": {"content": "<s>", "lstrip": false, "normalized": false, "rstrip": false, "single_word": false, "special": true},
            "2": {"content": "</s>", "lstrip": false, "normalized": false, "rstrip": false, "single_word": false, "special": true}
        },
        "additional_special_tokens": [],
        "bos_token": "<s>",
        "clean_up_tokenization_spaces": false,
        "eos_token": "</s>",
        "legacy": true,
        "model_max_length": 1000000000000000019884624838656,
        "pad_token": null,
        "sp_model_kwargs": {},
        "spaces_between_special_tokens": false,
        "tokenizer_class": "LlamaTokenizer",
        "unk_token": "<unk>",
        "use_default_system_prompt": false
    }"#;

    #[test]
    fn parses_mixtral_style_config() {
        let config = TokenizerConfig::from_json(MIXTRAL_LIKE).unwrap();
        assert_eq!(config.add_bos_token, Some(true));
        assert_eq!(config.add_eos_token, Some(false));
        assert_eq!(config.bos_token(), Some("<s>"));
        assert_eq!(config.eos_token(), Some("</s>"));
        assert_eq!(config.unk_token(), Some("<unk>"));
        assert_eq!(config.pad_token(), None);
        assert_eq!(config.tokenizer_class.as_deref(), Some("LlamaTokenizer"));
        assert!(config.model_max_length.unwrap() > 1e29);
        assert!(!config.clean_up_tokenization_spaces());
    }

    #[test]
    fn added_tokens_keep_file_order() {
        let config = TokenizerConfig::from_json(MIXTRAL_LIKE).unwrap();
        let ids: Vec<TokenId> = config.added_tokens().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn special_tokens_as_objects() {
        let json = r#"{
            "bos_token": {"content": "<bos>", "lstrip": false, "normalized": false, "rstrip": false, "single_word": false},
            "eos_token": "<eos>",
            "additional_special_tokens": ["<start_of_turn>", {"content": "<end_of_turn>", "special": true}]
        }"#;
        let config = TokenizerConfig::from_json(json).unwrap();
        assert_eq!(config.bos_token(), Some("<bos>"));
        assert_eq!(config.eos_token(), Some("<eos>"));
        assert_eq!(
            config.special_token_contents(),
            vec!["<bos>", "<eos>", "<start_of_turn>", "<end_of_turn>"]
        );
    }

    #[test]
    fn special_token_contents_are_deduplicated() {
        let config = TokenizerConfig::from_json(MIXTRAL_LIKE).unwrap();
        assert_eq!(config.special_token_contents(), vec!["<s>", "</s>", "<unk>"]);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = TokenizerConfig::from_json("{}").unwrap();
        assert_eq!(config.add_bos_token, None);
        assert_eq!(config.bos_token(), None);
        assert!(!config.clean_up_tokenization_spaces());
        assert!(config.special_token_contents().is_empty());
    }

    #[test]
    fn non_numeric_added_token_keys_are_skipped() {
        let json = r#"{"added_tokens_decoder": {"x": {"content": "<x>"}, "7": {"content": "<y>", "special": true}}}"#;
        let config = TokenizerConfig::from_json(json).unwrap();
        let tokens: Vec<_> = config
            .added_tokens()
            .map(|(id, entry)| (id, entry.content.as_str()))
            .collect();
        assert_eq!(tokens, vec![(7, "<y>")]);
    }

    #[test]
    fn null_lists_and_maps_are_empty() {
        let json = r#"{"additional_special_tokens": null, "added_tokens_decoder": null, "bos_token": "<s>"}"#;
        let config = TokenizerConfig::from_json(json).unwrap();
        assert!(config.additional_special_tokens.is_empty());
        assert!(config.added_tokens_decoder.is_empty());
        assert_eq!(config.special_token_contents(), vec!["<s>"]);
    }

    #[test]
    fn special_tokens_map_fills_gaps_only() {
        let mut config = TokenizerConfig::from_json(r#"{"eos_token": "<eos>"}"#).unwrap();
        let map = SpecialTokensMap::from_json(
            r#"{
                "bos_token": {"content": "<s>", "lstrip": false, "normalized": false, "rstrip": false, "single_word": false},
                "eos_token": "</s>",
                "unk_token": "<unk>",
                "additional_special_tokens": null
            }"#,
        )
        .unwrap();
        config.fill_missing_from(map);
        assert_eq!(config.bos_token(), Some("<s>"));
        assert_eq!(config.eos_token(), Some("<eos>"));
        assert_eq!(config.unk_token(), Some("<unk>"));
        assert_eq!(config.pad_token(), None);
    }

    #[test]
    fn from_file_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer_config.json");
        fs::write(&path, "{ not json").unwrap();
        match TokenizerConfig::from_file(&path) {
            Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
