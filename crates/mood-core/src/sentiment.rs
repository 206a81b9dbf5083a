//! Mood taxonomy and the default text classifier.
//!
//! The engine only needs `text → Sentiment`; anything implementing
//! [`Classifier`] can stand in. [`LexiconClassifier`] is a small
//! polarity-lexicon scorer good enough for live short-form text: each known
//! word carries a polarity in [-1, 1], a negator flips the next scored word,
//! and the mean over scored words is cut at ±0.2.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{POLARITY_HAPPY, POLARITY_SAD};
use crate::tokenizer::tokenize;

/// Mood category of one event.
///
/// Declaration order is the tie-break order when picking a cluster's
/// dominant sentiment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sentiment {
    Happy,
    Sad,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Happy, Sentiment::Sad, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Neutral => "Neutral",
        }
    }

    /// Unknown labels map to Neutral rather than failing.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" | "positive" => Self::Happy,
            "sad" | "negative" => Self::Sad,
            _ => Self::Neutral,
        }
    }

    /// Bucket a polarity score in [-1, 1].
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POLARITY_HAPPY {
            Self::Happy
        } else if polarity < POLARITY_SAD {
            Self::Sad
        } else {
            Self::Neutral
        }
    }
}

/// Per-mood tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub happy: usize,
    pub sad: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Happy => self.happy += 1,
            Sentiment::Sad => self.sad += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Happy => self.happy,
            Sentiment::Sad => self.sad,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.happy + self.sad + self.neutral
    }

    /// Most frequent mood; ties resolve in [`Sentiment::ALL`] order.
    /// Meaningless when `total() == 0`: empty counts fall through to Happy.
    pub fn dominant(&self) -> Sentiment {
        let mut best = Sentiment::Happy;
        for s in Sentiment::ALL {
            if self.get(s) > self.get(best) {
                best = s;
            }
        }
        best
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = Self::default();
        for s in iter {
            counts.add(s);
        }
        counts
    }
}

/// Pure `text → Sentiment` mapping supplied to the ingestion boundary.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Sentiment + Send + Sync,
{
    fn classify(&self, text: &str) -> Sentiment {
        self(text)
    }
}

const POSITIVE: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("celebrate", 0.5),
    ("cool", 0.35),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("joy", 0.8),
    ("lovely", 0.5),
    ("love", 0.5),
    ("loving", 0.6),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("proud", 0.8),
    ("sunny", 0.4),
    ("thanks", 0.2),
    ("win", 0.8),
    ("wonderful", 1.0),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("angry", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("broken", -0.4),
    ("cry", -0.6),
    ("depressed", -0.8),
    ("disappointed", -0.75),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("lonely", -0.6),
    ("lost", -0.3),
    ("miss", -0.4),
    ("pain", -0.6),
    ("sad", -0.5),
    ("sick", -0.7),
    ("sorry", -0.5),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("ugly", -0.7),
    ("upset", -0.6),
    ("worst", -1.0),
];

const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "neither", "nor"];

/// Lexicon-based polarity classifier.
pub struct LexiconClassifier {
    lexicon: HashMap<&'static str, f64>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        let lexicon = POSITIVE.iter().chain(NEGATIVE.iter()).copied().collect();
        Self { lexicon }
    }

    /// Mean polarity over lexicon hits; 0.0 when nothing scores.
    pub fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut negate = false;

        for token in tokenize(text) {
            if NEGATORS.contains(&token.as_str()) || token.ends_with("n't") {
                negate = true;
                continue;
            }
            if let Some(&p) = self.lexicon.get(token.as_str()) {
                // Negation dampens as well as flips
                total += if negate { -0.5 * p } else { p };
                scored += 1;
                negate = false;
            }
        }

        if scored == 0 {
            0.0
        } else {
            (total / scored as f64).clamp(-1.0, 1.0)
        }
    }
}

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.polarity(text))
    }
}
