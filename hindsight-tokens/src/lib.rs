//! The Tokenizer contract: `count(text) -> nat`, deterministic
//! and monotone under concatenation. Backed by `tiktoken-rs`.

use std::sync::OnceLock;

/// Estimates token counts for budget filtering. Does not need to match any
/// specific LLM's tokenizer exactly, but must be deterministic and monotone:
/// `count(a + b) >= count(a)`.
pub trait Tokenizer: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// `cl100k`-equivalent BPE tokenizer, cached lazily on first use.
pub struct TiktokenTokenizer {
    bpe: OnceLock<tiktoken_rs::CoreBPE>,
}

impl TiktokenTokenizer {
    pub fn new() -> Self {
        Self { bpe: OnceLock::new() }
    }

    fn get_bpe(&self) -> &tiktoken_rs::CoreBPE {
        self.bpe.get_or_init(|| {
            tiktoken_rs::cl100k_base().expect("cl100k_base encoding is bundled and always loads")
        })
    }
}

impl Default for TiktokenTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.get_bpe().encode_with_special_tokens(text).len()
    }
}
