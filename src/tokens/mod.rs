//! Token estimation.
//!
//! The real tokenizer is an external collaborator; the pipeline only needs the
//! length of its output. When none is wired in, a `ceil(chars / 4)` heuristic
//! stands in, counting Unicode code points rather than bytes so multi-byte
//! content (CJK text, emoji) is not over-counted.

/// External tokenizer collaborator. Implementations wrap whatever encoding the
/// target model uses.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;
}

/// Counts tokens through an optional [`Tokenizer`], falling back to the
/// character heuristic when none is available.
#[derive(Default)]
pub struct TokenEstimator {
    tokenizer: Option<Box<dyn Tokenizer>>,
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { tokenizer: Some(tokenizer) }
    }

    pub fn estimate(&self, text: &str) -> usize {
        match &self.tokenizer {
            Some(tokenizer) => tokenizer.encode(text).len(),
            None => fallback_estimate(text),
        }
    }
}

/// `ceil(char_count / 4)`.
pub fn fallback_estimate(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTokenizer;

    impl Tokenizer for FixedTokenizer {
        fn encode(&self, text: &str) -> Vec<u32> {
            // One token per whitespace-separated word.
            text.split_whitespace().map(|_| 0).collect()
        }
    }

    #[test]
    fn fallback_rounds_up() {
        assert_eq!(fallback_estimate(""), 0);
        assert_eq!(fallback_estimate("abcd"), 1);
        assert_eq!(fallback_estimate("abcde"), 2);
    }

    #[test]
    fn fallback_counts_code_points_not_bytes() {
        // Four 3-byte CJK characters: 1 token, not 3.
        assert_eq!(fallback_estimate("日本語字"), 1);
    }

    #[test]
    fn wired_tokenizer_takes_precedence() {
        let estimator = TokenEstimator::with_tokenizer(Box::new(FixedTokenizer));
        assert_eq!(estimator.estimate("three word input"), 3);
    }
}
