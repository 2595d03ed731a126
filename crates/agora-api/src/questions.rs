//! Handlers for `/questions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/questions` | All questions |
//! | `POST`   | `/questions` | Body: [`QuestionBody`]; returns 201 + stored question |
//! | `GET`    | `/questions/:id` | 404 if not found |
//! | `PUT`    | `/questions/:id` | Body: [`QuestionBody`] |
//! | `DELETE` | `/questions/:id` | Deletes answers and votes with it |

use std::sync::Arc;

use agora_core::{
  question::{NewQuestion, Question, QuestionId},
  store::{DeletedQuestion, ForumStore},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JSON body accepted by `POST /questions` and `PUT /questions/:id`.
///
/// Absent and `null` fields are reported by validation as missing rather
/// than as a JSON shape error.
#[derive(Debug, Deserialize)]
pub struct QuestionBody {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub category:    Option<String>,
}

impl TryFrom<QuestionBody> for NewQuestion {
  type Error = agora_core::Error;

  fn try_from(b: QuestionBody) -> Result<Self, Self::Error> {
    NewQuestion::new(
      b.title.unwrap_or_default(),
      b.description.unwrap_or_default(),
      b.category.unwrap_or_default(),
    )
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /questions`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: ForumStore,
{
  Ok(Json(store.list_questions().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /questions` — returns 201 + the stored [`Question`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<QuestionBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore,
{
  let Json(body) = body?;
  let question = store.create_question(NewQuestion::try_from(body)?).await?;
  Ok((StatusCode::CREATED, Json(question)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /questions/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
) -> Result<Json<Question>, ApiError>
where
  S: ForumStore,
{
  let id = QuestionId::new(raw_id)?;
  let question = store
    .get_question(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("question not found: {id}")))?;
  Ok(Json(question))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /questions/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
  body: Result<Json<QuestionBody>, JsonRejection>,
) -> Result<Json<Question>, ApiError>
where
  S: ForumStore,
{
  let Json(body) = body?;
  let id = QuestionId::new(raw_id)?;
  let question = store
    .update_question(id, NewQuestion::try_from(body)?)
    .await?;
  Ok(Json(question))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub message: &'static str,
  #[serde(flatten)]
  pub deleted: DeletedQuestion,
}

/// `DELETE /questions/:id` — removes the question, its answers and every vote
/// on either, or nothing at all.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError>
where
  S: ForumStore,
{
  let id = QuestionId::new(raw_id)?;
  let deleted = store.delete_question(id).await?;
  Ok(Json(DeleteResponse {
    message: "Question and all associated answers have been deleted successfully.",
    deleted,
  }))
}
