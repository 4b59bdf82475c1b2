//! Lexicon sentiment scorer
//!
//! Deterministic, no-I/O scorer over a signed-weight lexicon of
//! coach-speak words and phrases. This is the default and the fallback
//! for the external-model variant, so the system runs with zero
//! external dependencies.

use async_trait::async_trait;
use coachpulse_core::{ScoredMention, ScorerError, SentimentScore, SentimentScorer};
use std::collections::BTreeMap;
use std::path::Path;

/// A term occurrence counts at most this many times
const MAX_TERM_OCCURRENCES: usize = 3;

/// Context word count per normalization unit; shorter contexts are not
/// penalized below one unit
const NORMALIZATION_WORDS: f64 = 20.0;

/// Deterministic keyword/phrase scorer
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    /// Lowercased term -> signed weight. BTreeMap keeps summation order
    /// stable so repeated calls produce bit-identical floats.
    terms: BTreeMap<String, f64>,
}

impl LexiconScorer {
    pub fn new(terms: BTreeMap<String, f64>) -> Self {
        let terms = terms
            .into_iter()
            .map(|(term, weight)| (term.to_lowercase(), weight))
            .collect();
        Self { terms }
    }

    /// Load a lexicon override from a JSON map of term -> weight
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScorerError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScorerError::LexiconError(e.to_string()))?;
        let terms: BTreeMap<String, f64> =
            serde_json::from_str(&content).map_err(|e| ScorerError::LexiconError(e.to_string()))?;
        Ok(Self::new(terms))
    }

    /// Score a context window. Empty context is exactly neutral.
    pub fn score_context(&self, context: &str) -> ScoredMention {
        let trimmed = context.trim();
        if trimmed.is_empty() {
            return ScoredMention::neutral();
        }

        let context_lower = trimmed.to_lowercase();
        let word_count = context_lower.split_whitespace().count();

        let mut raw = 0.0_f64;
        let mut matched_terms = Vec::new();
        for (term, weight) in &self.terms {
            let count = context_lower.matches(term.as_str()).count();
            if count > 0 {
                raw += weight * count.min(MAX_TERM_OCCURRENCES) as f64;
                matched_terms.push(term.clone());
            }
        }

        if matched_terms.is_empty() {
            return ScoredMention::neutral();
        }

        let length_units = (word_count as f64 / NORMALIZATION_WORDS).max(1.0);
        ScoredMention {
            score: SentimentScore::new(raw / length_units),
            matched_terms,
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(default_lexicon())
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn score(
        &self,
        context: &str,
        _player_name: &str,
    ) -> Result<ScoredMention, ScorerError> {
        Ok(self.score_context(context))
    }
}

/// Built-in coach-speak lexicon. Phrases are matched as substrings, so
/// entries avoid overlapping one another (e.g. "trust" covers
/// "trust him").
fn default_lexicon() -> BTreeMap<String, f64> {
    let entries: &[(&str, f64)] = &[
        // Performance praise
        ("played great", 0.8),
        ("played well", 0.6),
        ("excellent", 0.8),
        ("fantastic", 0.8),
        ("incredible", 0.9),
        ("outstanding", 0.9),
        ("tremendous", 0.8),
        ("phenomenal", 0.9),
        ("stepped up", 0.7),
        ("came through", 0.6),
        ("delivered", 0.6),
        ("dominated", 0.8),
        ("took over", 0.7),
        // Role and minutes, positive
        ("earned", 0.5),
        ("deserves", 0.5),
        ("trust", 0.7),
        ("confident in", 0.6),
        ("believe in", 0.6),
        ("more minutes", 0.6),
        ("expanded role", 0.6),
        ("every night", 0.5),
        ("impressed", 0.6),
        ("really like", 0.5),
        // Growth
        ("improved", 0.5),
        ("getting better", 0.5),
        ("growing", 0.4),
        ("developing", 0.4),
        ("next level", 0.5),
        // Intangibles
        ("leader", 0.5),
        ("brings energy", 0.5),
        ("competitor", 0.5),
        ("works hard", 0.5),
        ("explosive", 0.6),
        ("clutch", 0.6),
        ("efficient", 0.5),
        ("winning plays", 0.6),
        // Performance criticism
        ("struggled", -0.7),
        ("tough night", -0.5),
        ("off night", -0.4),
        ("needs to be better", -0.6),
        ("unacceptable", -0.9),
        ("disappointed", -0.7),
        ("frustrating", -0.6),
        ("concerning", -0.6),
        // Role and minutes, negative
        ("won't play", -0.7),
        ("less minutes", -0.6),
        ("coming off the bench", -0.4),
        ("reduced role", -0.6),
        ("not ready", -0.6),
        ("not there yet", -0.5),
        ("needs work", -0.5),
        ("has to earn", -0.5),
        ("other options", -0.6),
        ("evaluate", -0.5),
        ("figure things out", -0.5),
        ("rotation", -0.3),
        // Effort and attitude
        ("discipline", -0.4),
        ("can't have", -0.5),
        ("expect more", -0.5),
        ("demand more", -0.5),
        // Availability, usually coded negative
        ("day to day", -0.3),
        ("questionable", -0.3),
        ("managing", -0.2),
        // Specific criticism
        ("turnovers", -0.4),
        ("defensive lapses", -0.5),
        ("shot selection", -0.4),
        ("forcing", -0.4),
        ("costly mistakes", -0.6),
        ("out of control", -0.5),
    ];
    entries
        .iter()
        .map(|(term, weight)| (term.to_string(), *weight))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_context_scores_exactly_zero() {
        let scorer = LexiconScorer::default();
        let scored = scorer.score("", "Jayson Tatum").await.unwrap();
        assert_eq!(scored.score.value(), 0.0);
        assert!(scored.matched_terms.is_empty());

        let scored = scorer.score("   \n\t ", "Jayson Tatum").await.unwrap();
        assert_eq!(scored.score.value(), 0.0);
    }

    #[tokio::test]
    async fn test_deterministic_across_calls() {
        let scorer = LexiconScorer::default();
        let context = "He struggled early but stepped up late, we trust his shot selection now";
        let first = scorer.score(context, "P").await.unwrap();
        for _ in 0..10 {
            let again = scorer.score(context, "P").await.unwrap();
            assert_eq!(first.score.value(), again.score.value());
            assert_eq!(first.matched_terms, again.matched_terms);
        }
    }

    #[tokio::test]
    async fn test_positive_coach_speak_scores_positive() {
        let scorer = LexiconScorer::default();
        let scored = scorer
            .score(
                "Tatum was incredible tonight, we trust him in the clutch",
                "Jayson Tatum",
            )
            .await
            .unwrap();
        assert!(scored.score.value() > 0.0);
        assert!(scored.matched_terms.contains(&"incredible".to_string()));
        assert!(scored.matched_terms.contains(&"trust".to_string()));
    }

    #[tokio::test]
    async fn test_negative_coach_speak_scores_negative() {
        let scorer = LexiconScorer::default();
        let scored = scorer
            .score(
                "He struggled with turnovers and we have to evaluate the rotation",
                "P",
            )
            .await
            .unwrap();
        assert!(scored.score.value() < 0.0);
    }

    #[test]
    fn test_no_indicators_is_neutral() {
        let scorer = LexiconScorer::default();
        let scored = scorer.score_context("They went zone in the second half");
        assert_eq!(scored.score.value(), 0.0);
        assert!(scored.matched_terms.is_empty());
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = LexiconScorer::default();
        let pile = "incredible outstanding phenomenal dominated excellent fantastic tremendous";
        let scored = scorer.score_context(pile);
        assert_eq!(scored.score.value(), 1.0);
    }

    #[test]
    fn test_repeated_term_has_diminishing_returns() {
        let mut terms = BTreeMap::new();
        terms.insert("excellent".to_string(), 0.1);
        let scorer = LexiconScorer::new(terms);
        let five = scorer.score_context("excellent excellent excellent excellent excellent");
        let three = scorer.score_context("excellent excellent excellent aaa bbb");
        assert_eq!(five.score.value(), three.score.value());
    }

    #[test]
    fn test_long_context_normalized_down() {
        let mut terms = BTreeMap::new();
        terms.insert("excellent".to_string(), 0.6);
        let scorer = LexiconScorer::new(terms);
        let short = scorer.score_context("he was excellent");
        let padding = vec!["word"; 80].join(" ");
        let long = scorer.score_context(&format!("he was excellent {padding}"));
        assert!(long.score.value() < short.score.value());
        assert!(long.score.value() > 0.0);
    }
}
