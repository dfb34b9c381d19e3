//! Built-in emoji catalog and display names.

use rand::seq::SliceRandom;
use rand::Rng;

/// `(emoji, Unicode character name of its first scalar)`.
const BUILTIN: &[(&str, &str)] = &[
    ("😀", "GRINNING FACE"),
    ("😂", "FACE WITH TEARS OF JOY"),
    ("😍", "SMILING FACE WITH HEART-SHAPED EYES"),
    ("🥺", "FACE WITH PLEADING EYES"),
    ("😎", "SMILING FACE WITH SUNGLASSES"),
    ("🥶", "FREEZING FACE"),
    ("🤩", "GRINNING FACE WITH STAR EYES"),
    ("😜", "FACE WITH STUCK-OUT TONGUE AND WINKING EYE"),
    ("🤔", "THINKING FACE"),
    ("😇", "SMILING FACE WITH HALO"),
    ("🥳", "FACE WITH PARTY HORN AND PARTY HAT"),
    ("😡", "POUTING FACE"),
    ("😭", "LOUDLY CRYING FACE"),
    ("😱", "FACE SCREAMING IN FEAR"),
    ("🤠", "FACE WITH COWBOY HAT"),
    ("🐶", "DOG FACE"),
    ("🐱", "CAT FACE"),
    ("🐭", "MOUSE FACE"),
    ("🦊", "FOX FACE"),
    ("🐻", "BEAR FACE"),
    ("🐼", "PANDA FACE"),
    ("🐨", "KOALA"),
    ("🐯", "TIGER FACE"),
    ("🦁", "LION FACE"),
    ("🐮", "COW FACE"),
    ("🐷", "PIG FACE"),
    ("🐸", "FROG FACE"),
    ("🐵", "MONKEY FACE"),
    ("🦄", "UNICORN FACE"),
    ("🐔", "CHICKEN"),
    ("🐧", "PENGUIN"),
    ("🐦", "BIRD"),
    ("🐤", "BABY CHICK"),
    ("🐣", "HATCHING CHICK"),
    ("🦆", "DUCK"),
    ("🦅", "EAGLE"),
    ("🦉", "OWL"),
    ("🦇", "BAT"),
    ("🐺", "WOLF FACE"),
    ("🐗", "BOAR"),
    ("🐴", "HORSE FACE"),
    ("🦓", "ZEBRA FACE"),
    ("🦍", "GORILLA"),
    ("🦧", "ORANGUTAN"),
    ("🦥", "SLOTH"),
    ("🦦", "OTTER"),
    ("🦨", "SKUNK"),
    ("🦘", "KANGAROO"),
    ("🦡", "BADGER"),
    ("🐢", "TURTLE"),
    ("🐍", "SNAKE"),
    ("🦎", "LIZARD"),
    ("🦂", "SCORPION"),
    ("🕷", "SPIDER"),
    ("🕸", "SPIDER WEB"),
    ("🦗", "CRICKET"),
    ("🕊", "DOVE OF PEACE"),
    ("🐝", "HONEYBEE"),
    ("🐞", "LADY BEETLE"),
    ("🦋", "BUTTERFLY"),
    ("🐌", "SNAIL"),
    ("🐚", "SPIRAL SHELL"),
    ("🐠", "TROPICAL FISH"),
    ("🐟", "FISH"),
    ("🐬", "DOLPHIN"),
    ("🐳", "SPOUTING WHALE"),
    ("🦈", "SHARK"),
    ("🐊", "CROCODILE"),
    ("🐅", "TIGER"),
    ("🐆", "LEOPARD"),
];

/// The emoji offered by the picker.
#[derive(Debug, Clone, Copy)]
pub struct EmojiCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl EmojiCatalog {
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emojis(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(emoji, _)| *emoji)
    }

    /// `n` distinct emoji in random order (all of them when `n` exceeds the
    /// catalog).
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<&'static str> {
        self.entries
            .choose_multiple(rng, n)
            .map(|(emoji, _)| *emoji)
            .collect()
    }

    /// Raw Unicode name of the first scalar of `emoji`, if known.
    pub fn unicode_name(&self, emoji: &str) -> Option<&'static str> {
        let first = emoji.chars().next()?;
        self.entries
            .iter()
            .find(|(e, _)| e.starts_with(first))
            .map(|(_, name)| *name)
    }
}

impl Default for EmojiCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Human-readable name for `emoji`, used as the text sent for translation.
///
/// Unknown emoji are returned unchanged.
///
/// ```
/// use emoji_translate::emoji::display_name;
///
/// assert_eq!(display_name("🐶"), "Dog Face");
/// assert_eq!(display_name("😍"), "Smiling Face With Heart-Shaped Eyes");
/// assert_eq!(display_name("★"), "★");
/// ```
pub fn display_name(emoji: &str) -> String {
    match EmojiCatalog::builtin().unicode_name(emoji) {
        Some(name) => capitalize(name),
        None => emoji.to_string(),
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
/// Words are separated by whitespace or `-`.
pub fn capitalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() || ch == '-' {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn builtin_has_seventy_unique_emoji() {
        let catalog = EmojiCatalog::builtin();
        assert_eq!(catalog.len(), 70);
        let unique: HashSet<_> = catalog.emojis().collect();
        assert_eq!(unique.len(), 70);
    }

    #[test]
    fn sample_is_distinct_and_bounded() {
        let catalog = EmojiCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        let picked = catalog.sample(15, &mut rng);
        assert_eq!(picked.len(), 15);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 15);

        assert_eq!(catalog.sample(500, &mut rng).len(), 70);
    }

    #[test]
    fn names_are_capitalized_word_wise() {
        assert_eq!(display_name("😀"), "Grinning Face");
        assert_eq!(display_name("🐨"), "Koala");
        assert_eq!(
            display_name("😜"),
            "Face With Stuck-Out Tongue And Winking Eye"
        );
    }

    #[test]
    fn variation_selector_does_not_hide_the_name() {
        assert_eq!(display_name("🕷\u{fe0f}"), "Spider");
    }

    #[test]
    fn unknown_emoji_falls_back_to_itself() {
        assert_eq!(display_name("🍕"), "🍕");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn capitalize_handles_mixed_input() {
        assert_eq!(capitalize("hello WORLD"), "Hello World");
        assert_eq!(capitalize("x-ray"), "X-Ray");
    }
}
