use std::fmt;

use crate::base::TokenId;

/// What the command line prints: the token count, the ids, and optionally
/// the decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeReport {
    pub ids: Vec<TokenId>,
    pub decoded: Option<String>,
}

impl EncodeReport {
    pub fn new(ids: Vec<TokenId>, decoded: Option<String>) -> Self {
        EncodeReport { ids, decoded }
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.count())?;
        write!(f, "{:?}", self.ids)?;
        if let Some(decoded) = &self.decoded {
            write!(f, "\n{}", decoded)?;
        }
        Ok(())
    }
}
