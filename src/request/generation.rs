//! [`GenerationRequest`] — one epoch of work for the generation pipeline.

use super::epoch::{Epoch, EpochClock};

/// Tokens to illustrate and how many variants to request per token.
///
/// Tokens behave as an ordered set: duplicates are dropped on construction
/// (first occurrence wins) and the remaining order is the display order of
/// the grouped result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    tokens: Vec<String>,
    variants_per_token: usize,
    epoch: Epoch,
}

impl GenerationRequest {
    /// Build a request stamped with the clock's next epoch.
    ///
    /// `variants_per_token` is clamped to at least 1.
    pub fn new<I, S>(clock: &EpochClock, tokens: I, variants_per_token: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for token in tokens.into_iter().map(Into::into) {
            if !unique.contains(&token) {
                unique.push(token);
            }
        }

        Self {
            tokens: unique,
            variants_per_token: variants_per_token.max(1),
            epoch: clock.tick(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn variants_per_token(&self) -> usize {
        self.variants_per_token
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Number of independent generation calls this request fans out to.
    pub fn call_count(&self) -> usize {
        self.tokens.len() * self.variants_per_token
    }

    /// Every `(token, variant_index)` pair, token-major.
    pub fn calls(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens
            .iter()
            .flat_map(move |t| (0..self.variants_per_token).map(move |v| (t.as_str(), v)))
    }
}
