//! JSON REST API for Agora.
//!
//! Exposes an axum [`Router`] backed by any [`agora_core::store::ForumStore`].
//! Status codes follow the core's error classes: validation failures are 400,
//! missing questions or answers 404, store failures 500.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(agora_api::api_router(store.clone()))
//! ```

pub mod answers;
pub mod error;
pub mod questions;
pub mod search;
pub mod votes;

use std::sync::Arc;

use agora_core::store::ForumStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ForumStore + 'static,
{
  Router::new()
    // Questions
    .route("/questions", get(questions::list::<S>).post(questions::create::<S>))
    .route("/questions/search", get(search::handler::<S>))
    .route(
      "/questions/{question_id}",
      get(questions::get_one::<S>)
        .put(questions::update::<S>)
        .delete(questions::delete_one::<S>),
    )
    .route("/questions/{question_id}/vote", post(votes::question::<S>))
    // Answers
    .route(
      "/questions/{question_id}/answers",
      get(answers::ranked::<S>)
        .post(answers::create::<S>)
        .delete(answers::delete_all::<S>),
    )
    .route(
      "/questions/{question_id}/answers/{answer_id}/vote",
      post(votes::answer::<S>),
    )
    .with_state(store)
}
