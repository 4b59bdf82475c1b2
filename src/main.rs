//! Coachpulse - Press-Conference Sentiment Engine
//!
//! Thin CLI over the analysis core: batch-analyze transcript files,
//! then query player trends and team reports.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coachpulse_analysis::{LexiconScorer, MentionExtractor, ModelScorer, TranscriptAnalyzer};
use coachpulse_core::{AppConfig, RosterSnapshot, ScorerKind, SentimentScorer, SentimentStore};
use coachpulse_observability::{init_logging, LogFormat};
use coachpulse_persistence::{Database, SqliteSentimentStore};
use coachpulse_trends::TrendAggregator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{warn, Level};

#[derive(Parser)]
#[command(name = "coachpulse", version, about = "Coach press-conference sentiment trends")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config/default.toml")]
    config: String,

    /// Log format: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: String,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a directory of transcript JSON files
    Analyze {
        /// Directory containing one JSON file per transcript
        #[arg(long)]
        dir: PathBuf,
        /// Only process the first N transcripts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sentiment trend for a single player
    Player { name: String },
    /// Favorites and watch list for a team
    Team { name: String },
    /// Players with notable recent sentiment shifts
    Shifts {
        #[arg(long, default_value_t = 0.3)]
        min_shift: f64,
    },
    /// Combined report across every rostered team
    Report,
}

/// Wired-up application components
struct App {
    analyzer: TranscriptAnalyzer,
    aggregator: TrendAggregator,
}

impl App {
    async fn new(config: &AppConfig) -> Result<Self> {
        let db = Database::new(&config.database.path)
            .await
            .context("opening sentiment database")?;
        let store: Arc<dyn SentimentStore> = Arc::new(SqliteSentimentStore::new(db));

        let snapshot = RosterSnapshot::from_file(&config.roster.path)
            .context("loading roster snapshot")?;
        let roster = coachpulse_core::RosterIndex::new(&snapshot)?;

        let lexicon = match &config.analysis.lexicon_path {
            Some(path) => LexiconScorer::from_file(path).context("loading lexicon override")?,
            None => LexiconScorer::default(),
        };
        let scorer: Arc<dyn SentimentScorer> = match config.analysis.scorer {
            ScorerKind::Lexicon => Arc::new(lexicon),
            ScorerKind::Model => Arc::new(ModelScorer::new(config.model.clone(), lexicon)?),
        };

        let analyzer = TranscriptAnalyzer::new(
            roster,
            MentionExtractor::new(config.analysis.context_window_words),
            scorer,
            Arc::clone(&store),
            config.analysis.max_concurrent_transcripts,
        );
        let aggregator = TrendAggregator::new(store, config.trends.clone());

        Ok(Self { analyzer, aggregator })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogFormat::from_name(&cli.log_format), Level::INFO);

    let config = if Path::new(&cli.config).exists() {
        AppConfig::load(&cli.config)?
    } else {
        warn!(path = %cli.config, "Config file not found, using defaults");
        AppConfig::default()
    };

    let app = App::new(&config).await?;

    match cli.command {
        Command::Analyze { dir, limit } => {
            commands::analyze::run(&app.analyzer, &dir, limit).await?;
        }
        Command::Player { name } => {
            commands::report::player(&app.aggregator, &name, cli.json).await?;
        }
        Command::Team { name } => {
            commands::report::team(&app.aggregator, app.analyzer.roster(), &name, cli.json).await?;
        }
        Command::Shifts { min_shift } => {
            commands::report::shifts(&app.aggregator, min_shift, cli.json).await?;
        }
        Command::Report => {
            commands::report::league(&app.aggregator, app.analyzer.roster(), cli.json).await?;
        }
    }

    Ok(())
}
