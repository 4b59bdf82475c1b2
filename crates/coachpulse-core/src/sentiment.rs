//! Sentiment score type
//!
//! Bounded numeric sentiment shared by every scorer variant.

use serde::{Deserialize, Serialize};

/// Sentiment score ranging from -1.0 (very negative) to 1.0 (very positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore(f64);

impl SentimentScore {
    /// Create a new sentiment score, clamping to [-1.0, 1.0]
    pub fn new(score: f64) -> Self {
        if score.is_nan() {
            return Self::NEUTRAL;
        }
        Self(score.clamp(-1.0, 1.0))
    }

    /// Get the raw score value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Check if sentiment is positive (> 0)
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Check if sentiment is negative (< 0)
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Get absolute value of the score (intensity)
    pub fn intensity(&self) -> f64 {
        self.0.abs()
    }

    /// Neutral sentiment score
    pub const NEUTRAL: SentimentScore = SentimentScore(0.0);
}

impl Default for SentimentScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<f64> for SentimentScore {
    fn from(score: f64) -> Self {
        Self::new(score)
    }
}
