//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::service::ImageStyle;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A translation target offered by the language picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Display name (e.g. `"Korean"`).
    pub name: String,
    /// Language tag sent to the translator (e.g. `"ko"`).
    pub id: String,
    /// Speech voice locale used to read the translation aloud (e.g. `"ko-KR"`).
    pub voice: String,
}

impl Language {
    pub fn new(name: &str, id: &str, voice: &str) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            voice: voice.into(),
        }
    }
}

/// Voice locale for the language tag `id`, or `"en-US"` when it is not in
/// `languages`.
///
/// ```
/// use emoji_translate::config::{voice_for, TranslationConfig};
///
/// let langs = TranslationConfig::default().languages;
/// assert_eq!(voice_for(&langs, "pt"), "pt-PT");
/// assert_eq!(voice_for(&langs, "fr"), "en-US");
/// ```
pub fn voice_for<'a>(languages: &'a [Language], id: &str) -> &'a str {
    languages
        .iter()
        .find(|l| l.id == id)
        .map(|l| l.voice.as_str())
        .unwrap_or("en-US")
}

// ---------------------------------------------------------------------------
// TranslationConfig
// ---------------------------------------------------------------------------

/// Settings for the translation backend and the language picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a translation.
    pub timeout_secs: u64,
    /// Language the emoji names are written in.
    pub source_language: String,
    /// Index into `languages` selected on startup.
    pub default_language: usize,
    /// Targets offered by the picker, in display order.
    pub languages: Vec<Language>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 10,
            source_language: "en".into(),
            default_language: 0,
            languages: vec![
                Language::new("Indonesian", "id", "id-ID"),
                Language::new("Korean", "ko", "ko-KR"),
                Language::new("Portuguese", "pt", "pt-PT"),
            ],
        }
    }
}

impl TranslationConfig {
    /// The language selected on startup; falls back to the first entry when
    /// `default_language` is out of range.
    pub fn default_target(&self) -> Option<&Language> {
        self.languages
            .get(self.default_language)
            .or_else(|| self.languages.first())
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Settings for the image-generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// When `false` the remote backend is never contacted and every call takes
    /// the local fallback path.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible images API.
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Image model identifier.
    pub model: String,
    /// Maximum seconds to wait for one image.
    pub timeout_secs: u64,
    /// Independently styled images requested per selected emoji.
    pub variants_per_token: usize,
    /// Maximum number of emoji that can be selected at once.
    pub max_selection: usize,
    /// Style hint passed to the backend.
    pub style: ImageStyle,
    /// Edge length in pixels of the square fallback canvas.
    pub fallback_canvas: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-image-1".into(),
            timeout_secs: 60,
            variants_per_token: 2,
            max_selection: 3,
            style: ImageStyle::default(),
            fallback_canvas: 512,
        }
    }
}

impl GenerationConfig {
    /// Whether the remote backend should be contacted at all.
    ///
    /// `false` when disabled, or when the backend is the hosted OpenAI API and
    /// no key is configured (every call would be rejected).  Local providers
    /// work without a key.
    ///
    /// ```
    /// use emoji_translate::config::GenerationConfig;
    ///
    /// let mut cfg = GenerationConfig::default();
    /// assert!(!cfg.uses_remote());
    ///
    /// cfg.api_key = Some("sk-test".into());
    /// assert!(cfg.uses_remote());
    /// ```
    pub fn uses_remote(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        has_key || !self.base_url.contains("api.openai.com")
    }
}

// ---------------------------------------------------------------------------
// SchedulerConfig
// ---------------------------------------------------------------------------

/// Behaviour shared by the task scheduler and the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Abort the tokio task of superseded work instead of letting it run to
    /// completion.  Stale results are discarded either way.
    pub abort_superseded: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            abort_superseded: true,
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogConfig
// ---------------------------------------------------------------------------

/// Emoji picker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// How many emoji are drawn from the catalog for the picker grid.
    pub display_count: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { display_count: 15 }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use emoji_translate::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Translation backend and language picker.
    pub translation: TranslationConfig,
    /// Image generation backend and pipeline settings.
    pub generation: GenerationConfig,
    /// Supersession behaviour.
    pub scheduler: SchedulerConfig,
    /// Emoji picker.
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
