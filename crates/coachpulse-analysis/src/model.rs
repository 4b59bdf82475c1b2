//! External-model sentiment scorer
//!
//! Delegates scoring to an external text-understanding service over
//! HTTP. Every failure mode (timeout, transport error, malformed or
//! non-finite score) falls back to the lexicon scorer so a mention is
//! never dropped silently; out-of-range numeric scores are clamped with
//! a warning.

use crate::lexicon::LexiconScorer;
use async_trait::async_trait;
use coachpulse_core::{ModelConfig, ScoredMention, ScorerError, SentimentScore, SentimentScorer};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Request body sent to the scoring service
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest {
    pub context: String,
    pub player_name: String,
    pub model: String,
}

/// Response body expected from the scoring service
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
}

/// HTTP scorer with timeout and lexicon fallback
pub struct ModelScorer {
    client: Client,
    config: ModelConfig,
    api_key: Option<String>,
    fallback: LexiconScorer,
}

impl ModelScorer {
    pub fn new(config: ModelConfig, fallback: LexiconScorer) -> Result<Self, ScorerError> {
        let api_key = config
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScorerError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
            fallback,
        })
    }

    async fn request_score(&self, context: &str, player_name: &str) -> Result<f64, ScorerError> {
        let request = ScoreRequest {
            context: context.to_string(),
            player_name: player_name.to_string(),
            model: self.config.model.clone(),
        };

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ScorerError::Timeout(self.config.timeout_secs)
            } else {
                ScorerError::HttpError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(ScorerError::HttpError(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| ScorerError::MalformedResponse(e.to_string()))?;
        Ok(body.score)
    }
}

#[async_trait]
impl SentimentScorer for ModelScorer {
    fn name(&self) -> &str {
        "model"
    }

    async fn score(
        &self,
        context: &str,
        player_name: &str,
    ) -> Result<ScoredMention, ScorerError> {
        // Contract shared with the lexicon variant: empty input is
        // exactly neutral, no network call.
        if context.trim().is_empty() {
            return Ok(ScoredMention::neutral());
        }

        match self.request_score(context, player_name).await {
            Ok(raw) => match interpret_score(raw) {
                Some(score) => Ok(ScoredMention {
                    score,
                    matched_terms: Vec::new(),
                }),
                None => {
                    warn!(player = %player_name, raw, "Non-finite model score, using lexicon fallback");
                    Ok(self.fallback.score_context(context))
                }
            },
            Err(err) => {
                warn!(player = %player_name, error = %err, "Model scoring failed, using lexicon fallback");
                Ok(self.fallback.score_context(context))
            }
        }
    }
}

/// Clamp a numeric model score into range; non-finite values are
/// unusable and reported as `None`.
fn interpret_score(raw: f64) -> Option<SentimentScore> {
    if !raw.is_finite() {
        return None;
    }
    if !(-1.0..=1.0).contains(&raw) {
        warn!(raw, "Model score out of range, clamping");
    }
    Some(SentimentScore::new(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP service answering 200 with the given body
    async fn spawn_stub_service(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if request_complete(&buf[..read]) {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/score")
    }

    fn request_complete(bytes: &[u8]) -> bool {
        let Some(split) = bytes.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&bytes[..split]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        bytes.len() >= split + 4 + content_length
    }

    fn scorer_with_endpoint(endpoint: &str) -> ModelScorer {
        let config = ModelConfig {
            endpoint: endpoint.to_string(),
            api_key_env: None,
            model: "sentiment-small".to_string(),
            timeout_secs: 2,
        };
        ModelScorer::new(config, LexiconScorer::default()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_context_is_exactly_zero_without_network() {
        // Unroutable endpoint: the empty-context short circuit must win
        let scorer = scorer_with_endpoint("http://127.0.0.1:1/score");
        let scored = scorer.score("", "Jayson Tatum").await.unwrap();
        assert_eq!(scored.score.value(), 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back_to_lexicon() {
        let scorer = scorer_with_endpoint("http://127.0.0.1:1/score");
        let context = "Tatum was incredible tonight, we trust him in the clutch";
        let scored = scorer.score(context, "Jayson Tatum").await.unwrap();

        let expected = LexiconScorer::default().score_context(context);
        assert_eq!(scored.score.value(), expected.score.value());
        assert_eq!(scored.matched_terms, expected.matched_terms);
    }

    #[tokio::test]
    async fn test_well_formed_response_is_used_directly() {
        let endpoint = spawn_stub_service(r#"{"score": 0.45}"#).await;
        let scorer = scorer_with_endpoint(&endpoint);
        let scored = scorer.score("He played well", "Jayson Tatum").await.unwrap();
        assert_eq!(scored.score.value(), 0.45);
        assert!(scored.matched_terms.is_empty());
    }

    #[tokio::test]
    async fn test_non_json_payload_falls_back_to_lexicon() {
        let endpoint = spawn_stub_service("service temporarily degraded").await;
        let scorer = scorer_with_endpoint(&endpoint);
        let context = "Tatum was incredible tonight, we trust him in the clutch";
        let scored = scorer.score(context, "Jayson Tatum").await.unwrap();

        let expected = LexiconScorer::default().score_context(context);
        assert_eq!(scored.score.value(), expected.score.value());
        assert_eq!(scored.matched_terms, expected.matched_terms);
    }

    #[tokio::test]
    async fn test_missing_score_field_falls_back_to_lexicon() {
        let endpoint = spawn_stub_service(r#"{"sentiment": "positive"}"#).await;
        let scorer = scorer_with_endpoint(&endpoint);
        let context = "Tatum was incredible tonight, we trust him in the clutch";
        let scored = scorer.score(context, "Jayson Tatum").await.unwrap();

        let expected = LexiconScorer::default().score_context(context);
        assert_eq!(scored.score.value(), expected.score.value());
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        assert_eq!(interpret_score(4.2).unwrap().value(), 1.0);
        assert_eq!(interpret_score(-7.0).unwrap().value(), -1.0);
        assert_eq!(interpret_score(0.35).unwrap().value(), 0.35);
    }

    #[test]
    fn test_non_finite_score_is_rejected() {
        assert!(interpret_score(f64::NAN).is_none());
        assert!(interpret_score(f64::INFINITY).is_none());
    }
}
