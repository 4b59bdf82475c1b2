//! Mention extractor
//!
//! Scans transcript text for occurrences of rostered player names and
//! captures a bounded word window around each occurrence. Matching is
//! case-insensitive and longest-pattern-first, so a bare last name never
//! double-matches inside a full name that was already claimed.

use coachpulse_core::{Mention, Resolution, RosterIndex, Transcript};
use tracing::debug;

/// Extraction output: resolved mentions plus the number of occurrences
/// skipped because name resolution was ambiguous.
#[derive(Debug, Default)]
pub struct Extraction {
    pub mentions: Vec<Mention>,
    pub ambiguous_skipped: usize,
}

/// Extracts player mentions with surrounding context windows
#[derive(Debug, Clone)]
pub struct MentionExtractor {
    /// Words captured on each side of a match
    window_words: usize,
}

impl MentionExtractor {
    pub fn new(window_words: usize) -> Self {
        Self { window_words }
    }

    /// Find every rostered-player occurrence in the transcript.
    ///
    /// Transcripts with no matches yield an empty mention list, not an
    /// error. Overlapping matches for two different players are both
    /// retained; a shorter match strictly contained in a longer claimed
    /// span is skipped.
    pub fn extract(&self, transcript: &Transcript, roster: &RosterIndex) -> Extraction {
        let text = &transcript.text;
        let text_lower = text.to_lowercase();
        // Offsets are computed against the lowercased text; fall back to
        // it for context slicing in the rare case lowercasing changed
        // byte lengths.
        let display_text: &str = if text_lower.len() == text.len() {
            text
        } else {
            &text_lower
        };
        let word_spans = word_spans(display_text);

        let mut extraction = Extraction::default();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for pattern in roster.candidate_patterns() {
            for (start, _) in text_lower.match_indices(&pattern) {
                let end = start + pattern.len();
                if !is_word_bounded(&text_lower, start, end) {
                    continue;
                }
                if claimed
                    .iter()
                    .any(|&(s, e)| s <= start && end <= e && (e - s) > (end - start))
                {
                    continue;
                }

                match roster.resolve(&pattern, Some(&transcript.team)) {
                    Resolution::Match(player) => {
                        let context =
                            context_window(display_text, &word_spans, start, self.window_words);
                        extraction.mentions.push(Mention {
                            transcript_id: transcript.id.clone(),
                            player_name: player.full_name.clone(),
                            team: player.team.clone(),
                            context,
                            position: start,
                        });
                        claimed.push((start, end));
                    }
                    Resolution::Ambiguous => {
                        extraction.ambiguous_skipped += 1;
                        debug!(
                            transcript_id = %transcript.id,
                            candidate = %pattern,
                            "Skipping ambiguous mention"
                        );
                    }
                    Resolution::NotFound => {}
                }
            }
        }

        extraction
            .mentions
            .sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.player_name.cmp(&b.player_name)));
        extraction
    }
}

/// A match counts only when bordered by non-alphanumeric characters
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before_ok && after_ok
}

/// Byte spans of whitespace-separated words
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Slice up to `window` words on each side of the word containing
/// `position`
fn context_window(
    text: &str,
    word_spans: &[(usize, usize)],
    position: usize,
    window: usize,
) -> String {
    if word_spans.is_empty() {
        return String::new();
    }
    let center = word_spans
        .iter()
        .position(|&(s, e)| position >= s && position < e)
        .unwrap_or_else(|| {
            word_spans
                .iter()
                .position(|&(s, _)| s > position)
                .unwrap_or(word_spans.len() - 1)
        });
    let lo = center.saturating_sub(window);
    let hi = (center + window).min(word_spans.len() - 1);
    text[word_spans[lo].0..word_spans[hi].1].to_string()
}
