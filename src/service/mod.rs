//! External services consumed by the scheduler and the generation pipeline.
//!
//! This module provides:
//! * [`Translator`] — async trait for text translation, with the
//!   OpenAI-compatible [`ApiTranslator`] backend.
//! * [`ImageGenerator`] — lazy image streams, with [`ApiImageGenerator`] and
//!   [`UnsupportedImageGenerator`].
//! * [`ServiceError`] / [`ErrorKind`] — the error taxonomy.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use emoji_translate::config::AppConfig;
//! use emoji_translate::request::LanguagePair;
//! use emoji_translate::service::{ApiTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = ApiTranslator::from_config(&config.translation);
//!
//!     let text = translator
//!         .translate("Dog Face, Cherry Blossom", &LanguagePair::new("en", "ko"))
//!         .await
//!         .unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod error;
pub mod images;
pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::{ErrorKind, ServiceError};
pub use images::{
    ApiImageGenerator, ImageData, ImageGenerator, ImageStream, ImageStyle,
    UnsupportedImageGenerator,
};
pub use translator::{ApiTranslator, Translator};
