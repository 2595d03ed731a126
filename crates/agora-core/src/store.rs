//! The `ForumStore` trait and the result types of its compound operations.
//!
//! The trait is implemented by storage backends (e.g. `agora-store-sqlite`).
//! Every method is a single all-or-nothing unit of work: it either commits
//! all of its writes or none of them. The HTTP layer depends on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  answer::{Answer, AnswerContent},
  question::{NewQuestion, Question, QuestionId, QuestionQuery},
  ranking::AnswerBoard,
  vote::{Subject, Vote, VoteEntry},
};

// ─── Operation results ───────────────────────────────────────────────────────

/// What [`ForumStore::delete_question`] removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedQuestion {
  pub question:               Question,
  pub answers_removed:        u64,
  pub answer_votes_removed:   u64,
  pub question_votes_removed: u64,
}

/// What [`ForumStore::delete_answers_for_question`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPurge {
  pub answers_removed:      u64,
  pub answer_votes_removed: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Agora forum backend.
///
/// Vote ledgers are append-only: casting a vote inserts a row and nothing
/// ever updates one. Ledger rows disappear only together with their subject.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ForumStore: Send + Sync {
  // ── Questions ─────────────────────────────────────────────────────────

  /// Validate and persist a new question.
  fn create_question(
    &self,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Question>> + Send + '_;

  /// All questions in creation order.
  fn list_questions(&self) -> impl Future<Output = Result<Vec<Question>>> + Send + '_;

  /// Retrieve a question by id. Returns `None` if not found.
  fn get_question(
    &self,
    id: QuestionId,
  ) -> impl Future<Output = Result<Option<Question>>> + Send + '_;

  /// Replace a question's title, description and category.
  ///
  /// Fails with [`Error::QuestionNotFound`](crate::Error::QuestionNotFound)
  /// if the question does not exist.
  fn update_question(
    &self,
    id: QuestionId,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Question>> + Send + '_;

  /// Questions whose title or category contains the query terms.
  fn search_questions<'a>(
    &'a self,
    query: &'a QuestionQuery,
  ) -> impl Future<Output = Result<Vec<Question>>> + Send + 'a;

  /// Delete a question together with its answers and every vote that
  /// references any of them.
  ///
  /// Fails with `QuestionNotFound`, leaving the store untouched, if the
  /// question does not exist. Any failure part-way through rolls back the
  /// whole cascade.
  fn delete_question(
    &self,
    id: QuestionId,
  ) -> impl Future<Output = Result<DeletedQuestion>> + Send + '_;

  // ── Answers ───────────────────────────────────────────────────────────

  /// Attach a new answer to an existing question.
  fn create_answer(
    &self,
    question_id: QuestionId,
    content: AnswerContent,
  ) -> impl Future<Output = Result<Answer>> + Send + '_;

  /// The question's title and its answers in ranking order.
  ///
  /// An existing question without answers yields an empty board, not an
  /// error.
  fn answers_ranked(
    &self,
    question_id: QuestionId,
  ) -> impl Future<Output = Result<AnswerBoard>> + Send + '_;

  /// Delete every answer of a question, and their votes. Succeeds with zero
  /// counts when there is nothing to delete, including when the question
  /// itself does not exist.
  fn delete_answers_for_question(
    &self,
    question_id: QuestionId,
  ) -> impl Future<Output = Result<AnswerPurge>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Append one vote to the subject's ledger.
  ///
  /// Fails with the subject's not-found error, writing nothing, if the
  /// subject does not exist.
  fn cast_vote(
    &self,
    subject: Subject,
    vote: Vote,
  ) -> impl Future<Output = Result<VoteEntry>> + Send + '_;

  /// The subject's current score: the sum of its ledger, 0 when empty.
  fn score(&self, subject: Subject) -> impl Future<Output = Result<i64>> + Send + '_;
}
