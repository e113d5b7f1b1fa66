//! Application state: game configuration, the fallback question bank, and
//! the optional OpenAI client.
//!
//! This module owns the source-with-fallback policy: generated questions
//! when OpenAI is configured and behaves, the local bank otherwise. The
//! engine itself never talks to the network.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::bank::QuestionBank;
use crate::config::{load_game_config_from_env, GameConfig};
use crate::domain::{Question, QuestionOrigin, SourceError};
use crate::openai::OpenAI;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GameConfig>,
    pub bank: QuestionBank,
    pub openai: Option<OpenAI>,
}

impl AppState {
    /// Build state from env: load config, merge the bank, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_game_config_from_env().unwrap_or_default();
        let bank = QuestionBank::new(config.questions.clone());

        info!(
            target: "game",
            total = bank.len(),
            bank = bank.count_by_origin(QuestionOrigin::Bank),
            "Startup question inventory"
        );
        if bank.len() < config.max_level as usize {
            // A full fallback ladder is a precondition of a guaranteed start.
            warn!(
                target: "game",
                bank = bank.len(),
                need = config.max_level,
                "Fallback bank cannot fill a full ladder on its own"
            );
        }

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "quizladder", base_url = %oa.base_url, model = %oa.model, "OpenAI question generation enabled.");
        } else {
            info!(target: "quizladder", "OpenAI disabled (no OPENAI_API_KEY). Using the fallback bank.");
        }

        Self { config: Arc::new(config), bank, openai }
    }

    /// Produce `count` validated questions for the given categories.
    /// Policy: try OpenAI when configured; on any failure or a short batch,
    /// fall back to the local sampler without surfacing the failure to the
    /// player. Errors only when the bank itself cannot meet the count.
    #[instrument(level = "info", skip(self, categories), fields(categories = categories.len()))]
    pub async fn generate_questions(
        &self,
        categories: &[String],
        count: usize,
    ) -> Result<Vec<Question>, SourceError> {
        if let Some(oa) = &self.openai {
            match oa.generate_questions(&self.config.prompts, categories, count).await {
                Ok(mut qs) if qs.len() >= count => {
                    qs.truncate(count);
                    info!(target: "game", count, source = "openai_generated", "Questions generated");
                    return Ok(qs);
                }
                Ok(qs) => {
                    warn!(target: "game", got = qs.len(), count, "OpenAI returned a short batch; using fallback bank");
                }
                Err(e) => {
                    error!(target: "game", error = %e, "OpenAI generation failed; using fallback bank");
                }
            }
        }

        let sampled = self.bank.sample(categories, count, &mut rand::thread_rng());
        if sampled.len() < count {
            return Err(SourceError::BankExhausted { needed: count, available: sampled.len() });
        }
        info!(target: "game", count, source = "fallback_bank", "Questions sampled");
        Ok(sampled)
    }

    /// Category set offered on the pre-game screen.
    pub fn categories(&self) -> Vec<String> {
        self.config.categories.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
