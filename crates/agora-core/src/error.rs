//! Error types for `agora-core`.
//!
//! Every failure a [`ForumStore`](crate::store::ForumStore) operation can
//! produce falls into one of three classes (see [`ErrorClass`]): bad input,
//! a missing question or answer, or an infrastructure failure in the store.

use thiserror::Error;

use crate::{answer::AnswerId, question::QuestionId};

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ──────────────────────────────────────────────────────────
  #[error("invalid id {0}: ids are positive integers")]
  InvalidId(i64),

  #[error("invalid vote value {0}: must be 1 (upvote) or -1 (downvote)")]
  InvalidVote(i64),

  /// The vote was not an integer at all, e.g. `"1"` or `1.5` on the wire.
  #[error("invalid vote value {0}: must be 1 (upvote) or -1 (downvote)")]
  MalformedVote(String),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("answer content must not exceed {max} characters (got {len})")]
  ContentTooLong { len: usize, max: usize },

  #[error("at least one search parameter (title or category) is required")]
  EmptySearch,

  // ── Not found ───────────────────────────────────────────────────────────
  #[error("question not found: {0}")]
  QuestionNotFound(QuestionId),

  #[error("answer not found: {0}")]
  AnswerNotFound(AnswerId),

  // ── Infrastructure ──────────────────────────────────────────────────────
  /// The backing store failed; the operation was rolled back.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The coarse outcome class of an [`Error`], used by transport layers to
/// pick a status code and a log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  Validation,
  NotFound,
  Store,
}

impl Error {
  pub fn class(&self) -> ErrorClass {
    match self {
      Self::InvalidId(_)
      | Self::InvalidVote(_)
      | Self::MalformedVote(_)
      | Self::MissingField(_)
      | Self::ContentTooLong { .. }
      | Self::EmptySearch => ErrorClass::Validation,
      Self::QuestionNotFound(_) | Self::AnswerNotFound(_) => ErrorClass::NotFound,
      Self::Store(_) => ErrorClass::Store,
    }
  }

  pub fn is_not_found(&self) -> bool { self.class() == ErrorClass::NotFound }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
