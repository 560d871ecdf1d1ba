//! Task suggestions for an empty or stale list.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Returned when the suggestion pool has nothing left to offer.
pub const FALLBACK_SUGGESTION: &str = "Drink a glass of water";

/// Curated micro-task pool the picker draws from.
const SUGGESTIONS: &[&str] = &[
    "Drink a glass of water",
    "Take a 10-minute walk",
    "Stretch for 5 minutes",
    "Write down three things you're grateful for",
    "Read 10 pages of a book",
    "Tidy your desk",
    "Do 20 push-ups",
    "Meditate for 5 minutes",
    "Review tomorrow's calendar",
    "Call or message a friend",
    "Step outside for fresh air",
    "Eat a piece of fruit",
    "Write in a journal for 5 minutes",
    "Practice deep breathing for 2 minutes",
    "Learn one new word in another language",
];

/// Picks task suggestions, optionally from a fixed seed for
/// reproducibility.
pub struct Suggester {
    rng: Mcg128Xsl64,
}

impl Suggester {
    pub fn new() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    /// Pick any suggestion from the pool.
    pub fn pick(&mut self) -> &'static str {
        SUGGESTIONS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_SUGGESTION)
    }

    /// Pick a suggestion not already present among `existing` task names.
    /// Falls back to [`FALLBACK_SUGGESTION`] when everything is taken.
    pub fn pick_new(&mut self, existing: &[String]) -> &'static str {
        let available: Vec<&'static str> = SUGGESTIONS
            .iter()
            .copied()
            .filter(|s| !existing.iter().any(|name| name.eq_ignore_ascii_case(s)))
            .collect();
        available
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FALLBACK_SUGGESTION)
    }
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new()
    }
}
