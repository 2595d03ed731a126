//! Handler for `GET /questions/search`.
//!
//! Query params map directly to [`QuestionQuery`] fields. At least one of
//! them must be non-blank.

use std::sync::Arc;

use agora_core::{
  question::{Question, QuestionQuery},
  store::ForumStore,
};
use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Substring of the question title.
  pub title:    Option<String>,
  /// Substring of the question category.
  pub category: Option<String>,
}

/// `GET /questions/search[?title=...][&category=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: ForumStore,
{
  let query = QuestionQuery {
    title:    params.title,
    category: params.category,
  };
  Ok(Json(store.search_questions(&query).await?))
}
