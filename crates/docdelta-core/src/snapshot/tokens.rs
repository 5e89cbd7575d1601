//! Token counting capability.

/// Counts tokens in page content.
///
/// Real tokenizers live outside this crate; callers inject one when they have
/// it and fall back to [`EstimatingTokenCounter`] otherwise.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> u64;
}

/// Quick estimate without tokenization: one token per four characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatingTokenCounter;

impl TokenCounter for EstimatingTokenCounter {
    fn count_tokens(&self, text: &str) -> u64 {
        (text.chars().count() / 4) as u64
    }
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> u64,
{
    fn count_tokens(&self, text: &str) -> u64 {
        self(text)
    }
}
