use crate::error::Result;

pub type TokenId = u32;

pub trait Tokenizer {
    /// Encode `text` into ids, adding the model's special tokens.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>>;
    /// Decode ids back into text, dropping special tokens.
    fn decode(&self, ids: &[TokenId]) -> Result<String>;
}
