//! The ranking engine: orders a question's answers by net vote score.
//!
//! Scores are never stored. The backend reports each answer with the sum of
//! its ledger entries and [`rank`] imposes the display order:
//!
//! 1. score, highest first;
//! 2. on equal scores, answer id, highest (most recent) first.
//!
//! Answer ids are unique, so this is a total order and repeated calls over
//! the same data always produce the same sequence.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{answer::AnswerId, question::QuestionId};

/// An answer together with its score at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedAnswer {
  pub id:      AnswerId,
  pub content: String,
  pub score:   i64,
}

/// The display order between two answers.
pub fn compare(a: &RankedAnswer, b: &RankedAnswer) -> Ordering {
  b.score.cmp(&a.score).then_with(|| b.id.cmp(&a.id))
}

/// Sort answers into display order.
pub fn rank(mut answers: Vec<RankedAnswer>) -> Vec<RankedAnswer> {
  answers.sort_by(compare);
  answers
}

/// Whether `answers` is already in display order.
pub fn is_ranked(answers: &[RankedAnswer]) -> bool {
  answers
    .windows(2)
    .all(|pair| compare(&pair[0], &pair[1]) == Ordering::Less)
}

// ─── Answer board ────────────────────────────────────────────────────────────

/// Just enough of a question to label its answer board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
  pub id:    QuestionId,
  pub title: String,
}

/// Result of [`crate::store::ForumStore::answers_ranked`]: a question's title
/// and its answers in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBoard {
  pub question: QuestionSummary,
  pub answers:  Vec<RankedAnswer>,
}

impl AnswerBoard {
  /// The question exists but nobody has answered it yet. This is a normal
  /// outcome, distinct from the question being missing.
  pub fn is_unanswered(&self) -> bool { self.answers.is_empty() }
}
