//! Handlers for `/questions/:id/answers`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/questions/:id/answers` | Ranked by score, then newest first |
//! | `POST`   | `/questions/:id/answers` | Body: `{"content":"..."}`; returns 201 + stored answer |
//! | `DELETE` | `/questions/:id/answers` | Succeeds even when there is nothing to delete |

use std::sync::Arc;

use agora_core::{
  answer::AnswerContent,
  question::QuestionId,
  ranking::{QuestionSummary, RankedAnswer},
  store::{AnswerPurge, ForumStore},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Ranked list ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnswerBoardResponse {
  pub message:       &'static str,
  pub question:      QuestionSummary,
  pub answers_count: usize,
  pub answers:       Vec<RankedAnswer>,
}

/// `GET /questions/:id/answers`
pub async fn ranked<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
) -> Result<Json<AnswerBoardResponse>, ApiError>
where
  S: ForumStore,
{
  let board = store.answers_ranked(QuestionId::new(raw_id)?).await?;
  let message = if board.is_unanswered() {
    "No answers found for this question."
  } else {
    "Answers retrieved successfully."
  };
  Ok(Json(AnswerBoardResponse {
    message,
    question: board.question,
    answers_count: board.answers.len(),
    answers: board.answers,
  }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub content: Option<String>,
}

/// `POST /questions/:id/answers` — returns 201 + the stored answer.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
  body: Result<Json<AnswerBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore,
{
  let Json(body) = body?;
  let question_id = QuestionId::new(raw_id)?;
  let content = AnswerContent::new(body.content.unwrap_or_default())?;
  let answer = store.create_answer(question_id, content).await?;
  Ok((StatusCode::CREATED, Json(answer)))
}

// ─── Delete all ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
  pub message: &'static str,
  #[serde(flatten)]
  pub purge:   AnswerPurge,
}

/// `DELETE /questions/:id/answers`
pub async fn delete_all<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
) -> Result<Json<PurgeResponse>, ApiError>
where
  S: ForumStore,
{
  let purge = store
    .delete_answers_for_question(QuestionId::new(raw_id)?)
    .await?;
  Ok(Json(PurgeResponse {
    message: "All answers for the question have been deleted successfully.",
    purge,
  }))
}
