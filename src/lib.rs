pub mod base;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod hub;
pub mod pretrained;
pub mod report;

pub use base::{TokenId, Tokenizer};
pub use config::{SpecialTokensMap, TokenizerConfig};
pub use error::{Error, Result};
pub use hub::{HubOptions, TokenizerFiles};
pub use pretrained::PretrainedTokenizer;
pub use report::EncodeReport;
