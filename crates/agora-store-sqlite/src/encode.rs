//! Decoding helpers between SQLite rows and Agora domain types.

use agora_core::{
  answer::AnswerId,
  question::{Question, QuestionId},
  ranking::RankedAnswer,
};
use rusqlite::Row;

/// Expects `id, title, description, category`.
pub fn decode_question(row: &Row<'_>) -> rusqlite::Result<Question> {
  Ok(Question {
    id:          QuestionId::from_row(row.get(0)?),
    title:       row.get(1)?,
    description: row.get(2)?,
    category:    row.get(3)?,
  })
}

/// Expects `id, content, score`.
pub fn decode_ranked_answer(row: &Row<'_>) -> rusqlite::Result<RankedAnswer> {
  Ok(RankedAnswer {
    id:      AnswerId::from_row(row.get(0)?),
    content: row.get(1)?,
    score:   row.get(2)?,
  })
}

/// Change counts as reported in operation results.
pub fn count(changes: usize) -> u64 { changes as u64 }
