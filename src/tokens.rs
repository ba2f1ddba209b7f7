//! Token counting for file contents.

use tiktoken_rs::CoreBPE;

use crate::errors::{Error, Result};

/// Tokenizers selectable by name in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEncoding {
    Cl100kBase,
    O200kBase,
    P50kBase,
    R50kBase,
    /// Byte-length heuristic, no vocabulary needed
    Estimate,
}

impl TokenEncoding {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cl100k_base" => Ok(Self::Cl100kBase),
            "o200k_base" => Ok(Self::O200kBase),
            "p50k_base" => Ok(Self::P50kBase),
            "r50k_base" => Ok(Self::R50kBase),
            "estimate" => Ok(Self::Estimate),
            other => Err(Error::config(format!(
                "unknown token encoding '{}' (expected cl100k_base, o200k_base, p50k_base, r50k_base or estimate)",
                other
            ))),
        }
    }
}

/// Counts tokens with a loaded encoding. Shared across worker threads.
pub struct TokenCounter {
    bpe: Option<CoreBPE>,
}

impl TokenCounter {
    pub fn new(encoding: TokenEncoding) -> Result<Self> {
        let bpe = match encoding {
            TokenEncoding::Cl100kBase => Some(tiktoken_rs::cl100k_base()),
            TokenEncoding::O200kBase => Some(tiktoken_rs::o200k_base()),
            TokenEncoding::P50kBase => Some(tiktoken_rs::p50k_base()),
            TokenEncoding::R50kBase => Some(tiktoken_rs::r50k_base()),
            TokenEncoding::Estimate => None,
        }
        .transpose()
        .map_err(|e| Error::Tokenizer(e.to_string()))?;

        Ok(Self { bpe })
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::new(TokenEncoding::from_name(name)?)
    }

    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => estimate_tokens(text),
        }
    }
}

/// Roughly four bytes per token
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}
