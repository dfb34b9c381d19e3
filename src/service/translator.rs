//! `Translator` trait and the OpenAI-compatible `ApiTranslator` backend.
//!
//! `ApiTranslator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint — Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.
//! All connection details come from [`TranslationConfig`].

use async_trait::async_trait;

use crate::config::TranslationConfig;
use crate::request::LanguagePair;
use crate::service::error::ServiceError;

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async text translation.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Translator>`).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `pair.source` to `pair.target`.
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String, ServiceError>;

    /// Make sure everything needed to translate `pair` is in place (language
    /// assets downloaded, model loaded).  The default does nothing.
    async fn prepare(&self, pair: &LanguagePair) -> Result<(), ServiceError> {
        let _ = pair;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Translates through an OpenAI-compatible chat-completions endpoint.
pub struct ApiTranslator {
    client: reqwest::Client,
    config: TranslationConfig,
}

impl ApiTranslator {
    /// Build an `ApiTranslator` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => req.bearer_auth(key),
            _ => req,
        }
    }
}

/// System and user messages asking the model for a comma-preserving
/// translation.
pub fn build_chat(text: &str, pair: &LanguagePair) -> (String, String) {
    let system = format!(
        "You translate short comma-separated lists of names from language '{}' to \
         language '{}'. Keep the items in the same order, separated by \", \". \
         Reply with the translation only.",
        pair.source, pair.target
    );
    (system, text.to_string())
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String, ServiceError> {
        let (system_msg, user_msg) = build_chat(text, pair);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
        });

        let req = self
            .authorize(self.client.post(self.endpoint("/v1/chat/completions")))
            .json(&body);
        let response = req.send().await?;

        if let Some(err) = ServiceError::from_status(response.status()) {
            return Err(err);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let translated = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ServiceError::EmptyResponse)?
            .trim()
            .to_string();

        if translated.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }

        Ok(translated)
    }

    /// Checks that the configured model is listed by `/v1/models`.
    async fn prepare(&self, pair: &LanguagePair) -> Result<(), ServiceError> {
        log::debug!(
            "translation: preparing {} → {} with model {}",
            pair.source,
            pair.target,
            self.config.model
        );

        let response = self
            .authorize(self.client.get(self.endpoint("/v1/models")))
            .send()
            .await?;

        if let Some(err) = ServiceError::from_status(response.status()) {
            return Err(err);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let listed = json["data"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .any(|m| m["id"].as_str() == Some(self.config.model.as_str()))
            })
            .unwrap_or(false);

        if listed {
            Ok(())
        } else {
            Err(ServiceError::Unavailable)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
