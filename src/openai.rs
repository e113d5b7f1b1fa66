//! Minimal OpenAI client for question generation.
//!
//! We only call chat.completions and request a strict JSON object. Calls are
//! instrumented and log model names, latencies, and response sizes (not
//! contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{Difficulty, Question, QuestionOrigin, SourceError, CHOICE_COUNT};
use crate::util::{fill_template, trunc_for_log};
use uuid::Uuid;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

/// Wire shape we ask the model for. Loosely typed on purpose: everything is
/// revalidated before a `Question` is built from it.
#[derive(Deserialize)]
struct GeneratedBatch {
  questions: Vec<QuestionWire>,
}

#[derive(Deserialize)]
struct QuestionWire {
  #[serde(default)]
  id: Option<String>,
  #[serde(default)]
  category: Option<String>,
  #[serde(default)]
  difficulty: Option<Difficulty>,
  prompt: String,
  choices: Vec<String>,
  #[serde(rename = "correctIndex")]
  correct_index: i64,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, SourceError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "quizladder-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(SourceError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    serde_json::from_str::<T>(&text).map_err(|e| SourceError::Parse(e.to_string()))
  }

  /// Generate `count` validated questions over the given categories.
  /// Schema violations in the response are an error (the caller treats them
  /// like any other source failure and falls back to the bank).
  #[instrument(
    level = "info",
    skip(self, prompts, categories),
    fields(categories = categories.len(), model = %self.model)
  )]
  pub async fn generate_questions(
    &self,
    prompts: &Prompts,
    categories: &[String],
    count: usize,
  ) -> Result<Vec<Question>, SourceError> {
    let count_s = count.to_string();
    let cats = categories.join(", ");
    let user = fill_template(
      &prompts.generation_user_template,
      &[("count", count_s.as_str()), ("categories", cats.as_str())],
    );

    let start = std::time::Instant::now();
    let result = self.chat_json::<GeneratedBatch>(&prompts.generation_system, &user, 0.8).await;
    let elapsed = start.elapsed();

    let batch = match result {
      Ok(b) => {
        info!(?elapsed, questions = b.questions.len(), "Model response received");
        b
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during question generation");
        return Err(e);
      }
    };

    validate_questions(batch.questions)
  }
}

/// Turn wire questions into validated `Question`s or reject the whole batch.
/// Wrong choice count or an out-of-range index anywhere poisons the batch,
/// matching the "malformed response == source failure" rule.
fn validate_questions(wire: Vec<QuestionWire>) -> Result<Vec<Question>, SourceError> {
  let mut out = Vec::with_capacity(wire.len());
  for (index, q) in wire.into_iter().enumerate() {
    if q.prompt.trim().is_empty() {
      return Err(SourceError::Schema(format!("empty prompt at index {index}")));
    }
    if q.choices.len() != CHOICE_COUNT {
      return Err(SourceError::Schema(format!(
        "question at index {index} has {} choices",
        q.choices.len()
      )));
    }
    if !(0..CHOICE_COUNT as i64).contains(&q.correct_index) {
      return Err(SourceError::Schema(format!(
        "correctIndex {} out of range at index {index}",
        q.correct_index
      )));
    }
    let choices: [String; CHOICE_COUNT] = q
      .choices
      .into_iter()
      .map(|c| c.trim().to_string())
      .collect::<Vec<_>>()
      .try_into()
      .expect("length checked above");
    out.push(Question {
      id: q.id.filter(|s| !s.is_empty()).unwrap_or_else(|| format!("generated-{}", Uuid::new_v4())),
      category: q.category.filter(|s| !s.is_empty()).unwrap_or_else(|| "General Knowledge".into()),
      difficulty: q.difficulty.unwrap_or_default(),
      prompt: q.prompt.trim().to_string(),
      choices,
      correct_index: q.correct_index as usize,
      origin: QuestionOrigin::Generated,
    });
  }
  Ok(out)
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
