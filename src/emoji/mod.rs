//! Emoji catalog, display names and the bounded picker selection.

pub mod catalog;
pub mod selection;

pub use catalog::{capitalize, display_name, EmojiCatalog};
pub use selection::Selection;
