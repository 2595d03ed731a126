//! Per-subject SQL for the two vote ledgers.
//!
//! Questions and answers keep their votes in separate tables with the same
//! shape. Statements are fixed strings per subject kind; no SQL is assembled
//! at runtime.

use agora_core::vote::SubjectKind;

pub struct LedgerSql {
  /// Existence check for the subject row; `?1` is the subject id.
  pub subject_exists: &'static str,
  /// Append one entry; `?1` is the subject id, `?2` the vote value.
  pub insert:         &'static str,
  /// Sum of the subject's entries, 0 when there are none.
  pub score:          &'static str,
}

const QUESTION: LedgerSql = LedgerSql {
  subject_exists: "SELECT 1 FROM questions WHERE id = ?1",
  insert:         "INSERT INTO question_votes (question_id, value) VALUES (?1, ?2)",
  score:          "SELECT COALESCE(SUM(value), 0) FROM question_votes WHERE question_id = ?1",
};

const ANSWER: LedgerSql = LedgerSql {
  subject_exists: "SELECT 1 FROM answers WHERE id = ?1",
  insert:         "INSERT INTO answer_votes (answer_id, value) VALUES (?1, ?2)",
  score:          "SELECT COALESCE(SUM(value), 0) FROM answer_votes WHERE answer_id = ?1",
};

pub fn ledger(kind: SubjectKind) -> &'static LedgerSql {
  match kind {
    SubjectKind::Question => &QUESTION,
    SubjectKind::Answer => &ANSWER,
  }
}
