//! Coachpulse Analysis
//!
//! Mention extraction, the two sentiment scorer variants, and the
//! concurrent batch analysis pipeline.

pub mod extractor;
pub mod lexicon;
pub mod model;
pub mod pipeline;

pub use extractor::{Extraction, MentionExtractor};
pub use lexicon::LexiconScorer;
pub use model::{ModelScorer, ScoreRequest, ScoreResponse};
pub use pipeline::{BatchSummary, TranscriptAnalyzer, TranscriptReport};
