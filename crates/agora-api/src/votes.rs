//! Vote endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/questions/:id/vote` | Body: `{"vote":1}` or `{"vote":-1}` |
//! | `POST` | `/questions/:qid/answers/:aid/vote` | Same body; `qid` is only checked for shape |

use std::sync::Arc;

use agora_core::{
  answer::AnswerId,
  question::QuestionId,
  store::ForumStore,
  vote::{Subject, Vote, VoteEntry},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// The vote is kept as raw JSON so that strings, fractions and the like are
/// reported as invalid votes.
#[derive(Debug, Deserialize)]
pub struct VoteBody {
  #[serde(default)]
  pub vote: Value,
}

impl TryFrom<VoteBody> for Vote {
  type Error = agora_core::Error;

  fn try_from(b: VoteBody) -> Result<Self, Self::Error> {
    match b.vote {
      Value::Null => Err(agora_core::Error::MissingField("vote")),
      Value::Number(n) => match n.as_i64() {
        Some(raw) => Vote::try_from(raw),
        None => Err(agora_core::Error::MalformedVote(n.to_string())),
      },
      other => Err(agora_core::Error::MalformedVote(other.to_string())),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
  pub message: &'static str,
  pub entry:   VoteEntry,
}

async fn record<S: ForumStore>(
  store: &S,
  subject: Subject,
  body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
  let Json(body) = body?;
  let vote = Vote::try_from(body)?;
  let entry = store.cast_vote(subject, vote).await?;
  let message = match vote {
    Vote::Up => "Upvote recorded successfully.",
    Vote::Down => "Downvote recorded successfully.",
  };
  Ok(Json(VoteResponse { message, entry }))
}

/// `POST /questions/:id/vote`
pub async fn question<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<i64>,
  body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError>
where
  S: ForumStore,
{
  let subject = Subject::Question(QuestionId::new(raw_id)?);
  record(store.as_ref(), subject, body).await
}

/// `POST /questions/:qid/answers/:aid/vote`
pub async fn answer<S>(
  State(store): State<Arc<S>>,
  Path((raw_question_id, raw_answer_id)): Path<(i64, i64)>,
  body: Result<Json<VoteBody>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError>
where
  S: ForumStore,
{
  QuestionId::new(raw_question_id)?;
  let subject = Subject::Answer(AnswerId::new(raw_answer_id)?);
  record(store.as_ref(), subject, body).await
}
