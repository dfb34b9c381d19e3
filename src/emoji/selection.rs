//! Bounded, ordered emoji selection.

/// Ordered set of picked emoji, capped at `max`.
///
/// ```
/// use emoji_translate::emoji::Selection;
///
/// let mut selection = Selection::new(2);
/// assert!(selection.toggle("🐶"));
/// assert!(selection.toggle("🌸"));
/// assert!(!selection.toggle("😀")); // full
/// assert!(!selection.is_enabled("😀"));
/// assert!(selection.is_enabled("🐶")); // can still be removed
///
/// selection.toggle("🐶");
/// assert_eq!(selection.tokens(), &["🌸"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    max: usize,
    items: Vec<String>,
}

impl Selection {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            items: Vec::with_capacity(max),
        }
    }

    /// Remove `emoji` if selected, otherwise insert it when there is room.
    ///
    /// Returns whether the selection changed.
    pub fn toggle(&mut self, emoji: &str) -> bool {
        if let Some(pos) = self.items.iter().position(|e| e == emoji) {
            self.items.remove(pos);
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.items.push(emoji.to_string());
        true
    }

    pub fn contains(&self, emoji: &str) -> bool {
        self.items.iter().any(|e| e == emoji)
    }

    /// Whether tapping `emoji` would do anything.
    pub fn is_enabled(&self, emoji: &str) -> bool {
        self.contains(emoji) || !self.is_full()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Selected emoji in the order they were picked.
    pub fn tokens(&self) -> &[String] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(3)
    }
}
