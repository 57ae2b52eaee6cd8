//! Keyword-based place intent detection for chat input
//!
//! Used when no language model is configured: a fixed vocabulary of
//! keywords maps free text like "where can I get a coffee?" to a place
//! category. Keywords only match on word boundaries; the earliest match in
//! the text wins.

use std::fmt;
use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};

/// Place category a chat message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceIntent {
    /// Post office
    Postal,
    /// Restaurants
    Food,
    /// Cafes
    Cafe,
    /// Museums
    Museum,
    /// Tourist attractions
    Attraction,
}

impl PlaceIntent {
    /// POI category tag searched for this intent
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Postal => "post_office",
            Self::Food => "restaurant",
            Self::Cafe => "cafe",
            Self::Museum => "museum",
            Self::Attraction => "attraction",
        }
    }
}

impl fmt::Display for PlaceIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}

const KEYWORDS: &[(&str, PlaceIntent)] = &[
    ("post office", PlaceIntent::Postal),
    ("postal", PlaceIntent::Postal),
    ("post", PlaceIntent::Postal),
    ("mail", PlaceIntent::Postal),
    ("stamps", PlaceIntent::Postal),
    ("restaurant", PlaceIntent::Food),
    ("restaurants", PlaceIntent::Food),
    ("food", PlaceIntent::Food),
    ("eat", PlaceIntent::Food),
    ("lunch", PlaceIntent::Food),
    ("dinner", PlaceIntent::Food),
    ("hungry", PlaceIntent::Food),
    ("cafe", PlaceIntent::Cafe),
    ("café", PlaceIntent::Cafe),
    ("cafes", PlaceIntent::Cafe),
    ("coffee", PlaceIntent::Cafe),
    ("espresso", PlaceIntent::Cafe),
    ("museum", PlaceIntent::Museum),
    ("museums", PlaceIntent::Museum),
    ("gallery", PlaceIntent::Museum),
    ("exhibition", PlaceIntent::Museum),
    ("attraction", PlaceIntent::Attraction),
    ("attractions", PlaceIntent::Attraction),
    ("sightseeing", PlaceIntent::Attraction),
    ("sights", PlaceIntent::Attraction),
    ("landmark", PlaceIntent::Attraction),
    ("landmarks", PlaceIntent::Attraction),
    ("things to do", PlaceIntent::Attraction),
];

static KEYWORD_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    let patterns: Vec<&str> = KEYWORDS.iter().map(|(keyword, _)| *keyword).collect();
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::Standard)
        .build(&patterns)
        .expect("Failed to build keyword matcher")
});

/// Whether `text[start..end]` is delimited by non-word characters
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Infer which kind of place a chat message asks for
#[must_use]
pub fn infer_place_intent(text: &str) -> Option<PlaceIntent> {
    KEYWORD_MATCHER
        .find_overlapping_iter(text)
        .filter(|m| on_word_boundary(text, m.start(), m.end()))
        .min_by_key(|m| (m.start(), std::cmp::Reverse(m.end())))
        .map(|m| KEYWORDS[m.pattern().as_usize()].1)
}
