//! Analyze command: batch-process a directory of transcript files

use anyhow::{Context, Result};
use coachpulse_analysis::TranscriptAnalyzer;
use coachpulse_core::Transcript;
use std::path::Path;
use tracing::warn;

pub async fn run(
    analyzer: &TranscriptAnalyzer,
    dir: &Path,
    limit: Option<usize>,
) -> Result<()> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("reading transcript directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    if let Some(limit) = limit {
        paths.truncate(limit);
    }

    let mut transcripts = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        match serde_json::from_str::<Transcript>(&content) {
            Ok(transcript) => transcripts.push(transcript),
            Err(err) => {
                // One malformed file never blocks the run
                warn!(path = %path.display(), error = %err, "Skipping unparseable transcript");
            }
        }
    }

    println!("Analyzing {} transcripts...", transcripts.len());
    let summary = analyzer.analyze_batch(transcripts).await;

    println!(
        "Processed {} transcripts ({} failed)",
        summary.transcripts_processed, summary.transcripts_failed
    );
    println!(
        "Mentions: {} found, {} appended, {} duplicates, {} ambiguous skipped",
        summary.mentions_found,
        summary.records_appended,
        summary.duplicates_skipped,
        summary.ambiguous_skipped
    );
    Ok(())
}
