//! Questions — the root of the forum's ownership tree.
//!
//! A question owns its answers, and both questions and answers own their
//! vote ledgers. Deleting a question cascades through everything it owns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Store-assigned question identifier. Always positive.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
  /// Validate a raw identifier received from a caller.
  pub fn new(raw: i64) -> Result<Self> {
    if raw > 0 { Ok(Self(raw)) } else { Err(Error::InvalidId(raw)) }
  }

  /// Wrap an identifier read back from the store, where positivity is
  /// guaranteed by the schema.
  pub fn from_row(raw: i64) -> Self { Self(raw) }

  pub fn get(self) -> i64 { self.0 }
}

impl fmt::Display for QuestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Question ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id:          QuestionId,
  pub title:       String,
  pub description: String,
  pub category:    String,
}

/// Input to [`crate::store::ForumStore::create_question`] and
/// [`crate::store::ForumStore::update_question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
  pub title:       String,
  pub description: String,
  pub category:    String,
}

impl NewQuestion {
  /// Build a validated question payload.
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    category: impl Into<String>,
  ) -> Result<Self> {
    let input = Self {
      title:       title.into(),
      description: description.into(),
      category:    category.into(),
    };
    input.validate()?;
    Ok(input)
  }

  /// Every field is required and must contain something other than
  /// whitespace.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("title", &self.title),
      ("description", &self.description),
      ("category", &self.category),
    ] {
      if value.trim().is_empty() {
        return Err(Error::MissingField(field));
      }
    }
    Ok(())
  }
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::ForumStore::search_questions`].
///
/// A question matches when its title contains `title` OR its category
/// contains `category` (case-insensitive substring match).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
  pub title:    Option<String>,
  pub category: Option<String>,
}

impl QuestionQuery {
  /// Drop blank terms and require at least one remaining term.
  pub fn normalized(&self) -> Result<Self> {
    let keep = |term: &Option<String>| {
      term
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
    };
    let query = Self {
      title:    keep(&self.title),
      category: keep(&self.category),
    };
    if query.title.is_none() && query.category.is_none() {
      return Err(Error::EmptySearch);
    }
    Ok(query)
  }

  /// Whether `question` satisfies this query. Terms are matched literally,
  /// ignoring case under Unicode lowercase folding.
  pub fn matches(&self, question: &Question) -> bool {
    let hit = |term: &Option<String>, field: &str| {
      term
        .as_deref()
        .is_some_and(|t| field.to_lowercase().contains(&t.to_lowercase()))
    };
    hit(&self.title, &question.title) || hit(&self.category, &question.category)
  }
}
