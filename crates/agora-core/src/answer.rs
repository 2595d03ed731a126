//! Answers — short replies attached to exactly one question.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, question::QuestionId};

/// Maximum answer length, counted in characters rather than bytes.
pub const MAX_CONTENT_CHARS: usize = 300;

/// Store-assigned answer identifier. Identifiers are never reused, so a
/// larger id always belongs to a more recently created answer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnswerId(i64);

impl AnswerId {
  pub fn new(raw: i64) -> Result<Self> {
    if raw > 0 { Ok(Self(raw)) } else { Err(Error::InvalidId(raw)) }
  }

  pub fn from_row(raw: i64) -> Self { Self(raw) }

  pub fn get(self) -> i64 { self.0 }
}

impl fmt::Display for AnswerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Validated answer text: non-blank and at most [`MAX_CONTENT_CHARS`] long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerContent(String);

impl AnswerContent {
  pub fn new(content: impl Into<String>) -> Result<Self> {
    let content = content.into();
    if content.trim().is_empty() {
      return Err(Error::MissingField("content"));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_CHARS {
      return Err(Error::ContentTooLong { len, max: MAX_CONTENT_CHARS });
    }
    Ok(Self(content))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
  pub id:          AnswerId,
  pub question_id: QuestionId,
  pub content:     String,
}
