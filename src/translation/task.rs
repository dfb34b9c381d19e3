//! Scheduler task runners backed by a [`Translator`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{voice_for, Language};
use crate::emoji::display_name;
use crate::request::{LanguagePair, RequestConfiguration};
use crate::scheduler::TaskRunner;
use crate::service::{ServiceError, Translator};

use super::align::{align, Translation};

// ---------------------------------------------------------------------------
// TranslationTask
// ---------------------------------------------------------------------------

/// Translates the display names of the configuration's emoji tokens.
pub struct TranslationTask {
    translator: Arc<dyn Translator>,
    languages: Vec<Language>,
}

impl TranslationTask {
    /// `languages` is only used to look up the speech voice of the target.
    pub fn new(translator: Arc<dyn Translator>, languages: Vec<Language>) -> Self {
        Self {
            translator,
            languages,
        }
    }

    /// Text sent to the translator for `tokens`.
    pub fn source_text(tokens: &[String]) -> String {
        tokens
            .iter()
            .map(|t| display_name(t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl TaskRunner for TranslationTask {
    type Output = Translation;

    async fn run(&self, configuration: &RequestConfiguration) -> Result<Translation, ServiceError> {
        let pair = configuration.parameters().clone();
        let tokens = configuration.source_tokens();
        let voice = voice_for(&self.languages, &pair.target).to_string();

        if tokens.is_empty() {
            return Ok(Translation::empty(pair, tokens, voice));
        }

        let source_text = Self::source_text(tokens);
        log::debug!(
            "translation: {} → {}: {source_text:?}",
            pair.source,
            pair.target
        );

        let text = self.translator.translate(&source_text, &pair).await?;
        let parts = align(tokens, &text);

        Ok(Translation {
            pair,
            source_text,
            text,
            parts,
            voice,
        })
    }
}

// ---------------------------------------------------------------------------
// PrepareTask
// ---------------------------------------------------------------------------

/// Makes sure the translator is ready for the configuration's language pair.
pub struct PrepareTask {
    translator: Arc<dyn Translator>,
}

impl PrepareTask {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }
}

#[async_trait]
impl TaskRunner for PrepareTask {
    type Output = LanguagePair;

    async fn run(&self, configuration: &RequestConfiguration) -> Result<LanguagePair, ServiceError> {
        let pair = configuration.parameters();
        self.translator.prepare(pair).await?;
        log::info!("translation: {} → {} is ready", pair.source, pair.target);
        Ok(pair.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslationConfig;
    use crate::request::EpochClock;
    use crate::scheduler::{TaskOutcome, TaskScheduler};
    use crate::service::ErrorKind;
    use std::sync::Mutex;
    use std::time::Duration;

    // ---- Test doubles ---

    /// Returns a fixed reply and records every text it was asked to translate.
    struct FixedTranslator {
        reply: Result<String, ()>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedTranslator {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Translator for FixedTranslator {
        async fn translate(&self, text: &str, _pair: &LanguagePair) -> Result<String, ServiceError> {
            self.seen.lock().unwrap().push(text.to_string());
            self.reply.clone().map_err(|_| ServiceError::Unavailable)
        }

        async fn prepare(&self, _pair: &LanguagePair) -> Result<(), ServiceError> {
            self.reply
                .as_ref()
                .map(|_| ())
                .map_err(|_| ServiceError::Unavailable)
        }
    }

    fn languages() -> Vec<Language> {
        TranslationConfig::default().languages
    }

    fn configuration(tokens: &[&str], target: &str) -> RequestConfiguration {
        RequestConfiguration::new(
            &EpochClock::new(),
            tokens.iter().copied(),
            LanguagePair::new("en", target),
        )
    }

    // ---- Tests ---

    #[test]
    fn source_text_joins_display_names() {
        let tokens = vec!["😀".to_string(), "🐶".to_string()];
        assert_eq!(TranslationTask::source_text(&tokens), "Grinning Face, Dog Face");
    }

    #[tokio::test]
    async fn translation_is_aligned_with_tokens() {
        let translator = FixedTranslator::ok("웃는 얼굴, 개 얼굴");
        let task = TranslationTask::new(translator.clone(), languages());

        let result = task.run(&configuration(&["😀", "🐶"], "ko")).await.unwrap();

        assert_eq!(result.text, "웃는 얼굴, 개 얼굴");
        assert_eq!(result.voice, "ko-KR");
        assert_eq!(result.parts[1].token, "🐶");
        assert_eq!(result.parts[1].text.as_deref(), Some("개 얼굴"));
        assert_eq!(
            translator.seen.lock().unwrap().as_slice(),
            &["Grinning Face, Dog Face".to_string()]
        );
    }

    #[tokio::test]
    async fn no_tokens_skips_the_translator() {
        let translator = FixedTranslator::ok("unused");
        let task = TranslationTask::new(translator.clone(), languages());

        let result = task.run(&configuration(&[], "pt")).await.unwrap();

        assert!(result.text.is_empty());
        assert_eq!(result.voice, "pt-PT");
        assert!(translator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_target_uses_default_voice() {
        let task = TranslationTask::new(FixedTranslator::ok("x"), languages());
        let result = task.run(&configuration(&["🐶"], "fr")).await.unwrap();
        assert_eq!(result.voice, "en-US");
    }

    #[tokio::test]
    async fn translator_error_propagates() {
        let task = TranslationTask::new(FixedTranslator::unavailable(), languages());
        let err = task.run(&configuration(&["🐶"], "ko")).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn prepare_task_reports_the_pair() {
        let task = PrepareTask::new(FixedTranslator::ok("x"));
        let pair = task.run(&configuration(&["🐶"], "id")).await.unwrap();
        assert_eq!(pair, LanguagePair::new("en", "id"));
    }

    #[tokio::test]
    async fn scheduled_translation_fails_plainly_when_unavailable() {
        let scheduler = TaskScheduler::new(TranslationTask::new(
            FixedTranslator::unavailable(),
            languages(),
        ));
        let mut rx = scheduler.observe();

        let config = scheduler.configure(["🐶"], LanguagePair::new("en", "ko"));
        let epoch = config.epoch();
        scheduler.submit(config);

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|o| o.is_terminal()))
            .await
            .unwrap()
            .unwrap()
            .clone();
        assert_eq!(outcome, TaskOutcome::Failed(epoch, ErrorKind::Unavailable));
        assert_eq!(
            outcome.error().map(ErrorKind::translation_message).as_deref(),
            Some("Translation isn't supported on this device.")
        );
    }
}
