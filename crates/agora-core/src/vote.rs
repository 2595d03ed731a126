//! Votes and the append-only ledgers that record them.
//!
//! Each vote cast appends one ledger entry worth +1 or -1. Entries are never
//! updated; a subject's score is the sum of its entries, computed on read.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, answer::AnswerId, question::QuestionId};

/// A single vote. Only up- and down-votes exist; any other value is rejected
/// when converting from the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Vote {
  Up,
  Down,
}

impl Vote {
  /// The signed contribution of this vote to a score.
  pub fn value(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }
}

impl TryFrom<i64> for Vote {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    match value {
      1 => Ok(Self::Up),
      -1 => Ok(Self::Down),
      other => Err(Error::InvalidVote(other)),
    }
  }
}

impl From<Vote> for i64 {
  fn from(vote: Vote) -> Self { vote.value() }
}

/// Which ledger a subject's votes live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
  Question,
  Answer,
}

/// Something that can be voted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Subject {
  Question(QuestionId),
  Answer(AnswerId),
}

impl Subject {
  /// Build a subject from its kind and a raw, caller-supplied identifier.
  pub fn new(kind: SubjectKind, raw_id: i64) -> Result<Self> {
    Ok(match kind {
      SubjectKind::Question => Self::Question(QuestionId::new(raw_id)?),
      SubjectKind::Answer => Self::Answer(AnswerId::new(raw_id)?),
    })
  }

  pub fn kind(&self) -> SubjectKind {
    match self {
      Self::Question(_) => SubjectKind::Question,
      Self::Answer(_) => SubjectKind::Answer,
    }
  }

  pub fn raw_id(&self) -> i64 {
    match self {
      Self::Question(id) => id.get(),
      Self::Answer(id) => id.get(),
    }
  }

  /// The not-found error to report when this subject does not exist.
  pub fn not_found(&self) -> Error {
    match *self {
      Self::Question(id) => Error::QuestionNotFound(id),
      Self::Answer(id) => Error::AnswerNotFound(id),
    }
  }
}

/// One immutable row of a vote ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
  pub id:      i64,
  pub subject: Subject,
  pub vote:    Vote,
}
