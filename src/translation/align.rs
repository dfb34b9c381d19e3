//! [`Translation`] result and the per-token alignment of translated text.

use crate::request::LanguagePair;

/// The translated text for one source token, if the translation had a part
/// for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPart {
    pub token: String,
    pub text: Option<String>,
}

/// Output of a translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub pair: LanguagePair,
    /// Text that was sent to the translator (`"Dog Face, Cherry Blossom"`).
    pub source_text: String,
    /// Full translated text as returned.
    pub text: String,
    /// One entry per source token, in token order.
    pub parts: Vec<TranslatedPart>,
    /// Speech voice locale for the target language.
    pub voice: String,
}

impl Translation {
    /// Translation of nothing: no text, one empty part per token.
    pub fn empty(pair: LanguagePair, tokens: &[String], voice: impl Into<String>) -> Self {
        Self {
            pair,
            source_text: String::new(),
            text: String::new(),
            parts: align(tokens, ""),
            voice: voice.into(),
        }
    }

    /// Parts that received text, as `(token, text)`.
    pub fn spoken_parts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref().map(|t| (p.token.as_str(), t)))
    }
}

/// Split `text` on `,`, trim, drop empty pieces and pair the rest with
/// `tokens` in order.
///
/// Surplus pieces are ignored; tokens without a piece get `None`.
///
/// ```
/// use emoji_translate::translation::align;
///
/// let tokens = vec!["🐶".to_string(), "🌸".to_string()];
/// let parts = align(&tokens, "Wajah Anjing, ");
/// assert_eq!(parts[0].text.as_deref(), Some("Wajah Anjing"));
/// assert_eq!(parts[1].text, None);
/// ```
pub fn align(tokens: &[String], text: &str) -> Vec<TranslatedPart> {
    let mut pieces = text.split(',').map(str::trim).filter(|p| !p.is_empty());
    tokens
        .iter()
        .map(|token| TranslatedPart {
            token: token.clone(),
            text: pieces.next().map(str::to_string),
        })
        .collect()
}
