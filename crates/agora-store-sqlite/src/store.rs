//! [`SqliteStore`] — the SQLite implementation of [`ForumStore`].
//!
//! Every trait method is one call to [`SqliteStore::read`] or
//! [`SqliteStore::write`]: existence checks, mutations and the final read-back
//! all happen inside the same transaction, so a failure at any step leaves the
//! database exactly as it was.

use std::path::Path;

use rusqlite::{OptionalExtension as _, Transaction, TransactionBehavior, params};
use tracing::debug;

use agora_core::{
  answer::{Answer, AnswerContent, AnswerId},
  question::{NewQuestion, Question, QuestionId, QuestionQuery},
  ranking::{self, AnswerBoard, QuestionSummary},
  store::{AnswerPurge, DeletedQuestion, ForumStore},
  vote::{Subject, Vote, VoteEntry},
};

use crate::{
  Result,
  encode::{count, decode_question, decode_ranked_answer},
  ledger::ledger,
  pool::Pool,
  schema::SCHEMA,
  transaction::transact,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Agora forum store backed by a single SQLite file.
///
/// Cloning is cheap — clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteStore {
  pool: Pool,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with `pool_size` connections and run
  /// schema initialisation.
  pub async fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
    let pool = Pool::open(path.as_ref(), pool_size).await?;
    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let pool = Pool::open_in_memory().await?;
    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  /// Number of pooled connections.
  pub fn pool_size(&self) -> usize { self.pool.size() }

  async fn init_schema(&self) -> Result<()> {
    self
      .write(|tx| {
        tx.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` in a read transaction. All reads inside see one snapshot.
  pub(crate) async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    transact(&self.pool, TransactionBehavior::Deferred, f).await
  }

  /// Run `f` in a write transaction. The write lock is taken up front so the
  /// existence checks and the mutations that depend on them cannot be split
  /// by another writer.
  pub(crate) async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    transact(&self.pool, TransactionBehavior::Immediate, f).await
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

fn fetch_question(
  tx: &Transaction<'_>,
  id: QuestionId,
) -> rusqlite::Result<Option<Question>> {
  tx.query_row(
    "SELECT id, title, description, category FROM questions WHERE id = ?1",
    params![id.get()],
    decode_question,
  )
  .optional()
}

fn question_exists(tx: &Transaction<'_>, id: QuestionId) -> rusqlite::Result<bool> {
  subject_exists(tx, Subject::Question(id))
}

fn subject_exists(tx: &Transaction<'_>, subject: Subject) -> rusqlite::Result<bool> {
  Ok(
    tx.query_row(
      ledger(subject.kind()).subject_exists,
      params![subject.raw_id()],
      |_| Ok(()),
    )
    .optional()?
    .is_some(),
  )
}

/// Delete the answers of a question and, first, every vote on them.
fn purge_answers(tx: &Transaction<'_>, id: QuestionId) -> rusqlite::Result<AnswerPurge> {
  let answer_votes_removed = tx.execute(
    "DELETE FROM answer_votes
     WHERE answer_id IN (SELECT id FROM answers WHERE question_id = ?1)",
    params![id.get()],
  )?;
  let answers_removed =
    tx.execute("DELETE FROM answers WHERE question_id = ?1", params![id.get()])?;
  Ok(AnswerPurge {
    answers_removed:      count(answers_removed),
    answer_votes_removed: count(answer_votes_removed),
  })
}

// ─── ForumStore impl ─────────────────────────────────────────────────────────

impl ForumStore for SqliteStore {
  // ── Questions ─────────────────────────────────────────────────────────────

  async fn create_question(&self, input: NewQuestion) -> agora_core::Result<Question> {
    input.validate()?;

    let question = self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO questions (title, description, category) VALUES (?1, ?2, ?3)",
          params![input.title, input.description, input.category],
        )?;
        Ok(Question {
          id:          QuestionId::from_row(tx.last_insert_rowid()),
          title:       input.title,
          description: input.description,
          category:    input.category,
        })
      })
      .await?;

    debug!(question_id = %question.id, "question created");
    Ok(question)
  }

  async fn list_questions(&self) -> agora_core::Result<Vec<Question>> {
    let questions = self
      .read(|tx| {
        let mut stmt = tx.prepare(
          "SELECT id, title, description, category FROM questions ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], decode_question)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(questions)
  }

  async fn get_question(&self, id: QuestionId) -> agora_core::Result<Option<Question>> {
    Ok(self.read(move |tx| Ok(fetch_question(tx, id)?)).await?)
  }

  async fn update_question(
    &self,
    id:    QuestionId,
    input: NewQuestion,
  ) -> agora_core::Result<Question> {
    input.validate()?;

    let question = self
      .write(move |tx| {
        let changed = tx.execute(
          "UPDATE questions SET title = ?1, description = ?2, category = ?3
           WHERE id = ?4",
          params![input.title, input.description, input.category, id.get()],
        )?;
        if changed == 0 {
          return Err(agora_core::Error::QuestionNotFound(id).into());
        }
        Ok(Question {
          id,
          title: input.title,
          description: input.description,
          category: input.category,
        })
      })
      .await?;

    debug!(question_id = %id, "question updated");
    Ok(question)
  }

  async fn search_questions<'a>(
    &'a self,
    query: &'a QuestionQuery,
  ) -> agora_core::Result<Vec<Question>> {
    let query = query.normalized()?;

    let questions = self
      .read(move |tx| {
        // SQLite's LIKE only folds ASCII case and treats `%`/`_` as
        // wildcards, so matching happens on the decoded rows instead.
        let mut stmt = tx.prepare(
          "SELECT id, title, description, category FROM questions ORDER BY id",
        )?;
        let mut matched = Vec::new();
        for row in stmt.query_map([], decode_question)? {
          let question = row?;
          if query.matches(&question) {
            matched.push(question);
          }
        }
        Ok(matched)
      })
      .await?;
    Ok(questions)
  }

  async fn delete_question(&self, id: QuestionId) -> agora_core::Result<DeletedQuestion> {
    let deleted = self
      .write(move |tx| {
        // Existence first: a missing question must not run a single DELETE.
        let question = fetch_question(tx, id)?
          .ok_or(agora_core::Error::QuestionNotFound(id))?;

        // Dependency order; foreign keys reject anything else.
        let purge = purge_answers(tx, id)?;
        let question_votes_removed = tx.execute(
          "DELETE FROM question_votes WHERE question_id = ?1",
          params![id.get()],
        )?;
        if tx.execute("DELETE FROM questions WHERE id = ?1", params![id.get()])? == 0 {
          return Err(agora_core::Error::QuestionNotFound(id).into());
        }

        Ok(DeletedQuestion {
          question,
          answers_removed: purge.answers_removed,
          answer_votes_removed: purge.answer_votes_removed,
          question_votes_removed: count(question_votes_removed),
        })
      })
      .await?;

    debug!(
      question_id = %id,
      answers = deleted.answers_removed,
      answer_votes = deleted.answer_votes_removed,
      question_votes = deleted.question_votes_removed,
      "question deleted with cascade"
    );
    Ok(deleted)
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn create_answer(
    &self,
    question_id: QuestionId,
    content:     AnswerContent,
  ) -> agora_core::Result<Answer> {
    let answer = self
      .write(move |tx| {
        if !question_exists(tx, question_id)? {
          return Err(agora_core::Error::QuestionNotFound(question_id).into());
        }
        tx.execute(
          "INSERT INTO answers (question_id, content) VALUES (?1, ?2)",
          params![question_id.get(), content.as_str()],
        )?;
        Ok(Answer {
          id: AnswerId::from_row(tx.last_insert_rowid()),
          question_id,
          content: content.into_inner(),
        })
      })
      .await?;

    debug!(question_id = %question_id, answer_id = %answer.id, "answer created");
    Ok(answer)
  }

  async fn answers_ranked(&self, question_id: QuestionId) -> agora_core::Result<AnswerBoard> {
    let board = self
      .read(move |tx| {
        let title: Option<String> = tx
          .query_row(
            "SELECT title FROM questions WHERE id = ?1",
            params![question_id.get()],
            |r| r.get(0),
          )
          .optional()?;
        let Some(title) = title else {
          return Err(agora_core::Error::QuestionNotFound(question_id).into());
        };

        let mut stmt = tx.prepare(
          "SELECT a.id, a.content, COALESCE(SUM(v.value), 0) AS score
           FROM answers a
           LEFT JOIN answer_votes v ON v.answer_id = a.id
           WHERE a.question_id = ?1
           GROUP BY a.id, a.content",
        )?;
        let scored = stmt
          .query_map(params![question_id.get()], decode_ranked_answer)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(AnswerBoard {
          question: QuestionSummary { id: question_id, title },
          answers:  ranking::rank(scored),
        })
      })
      .await?;
    Ok(board)
  }

  async fn delete_answers_for_question(
    &self,
    question_id: QuestionId,
  ) -> agora_core::Result<AnswerPurge> {
    let purge = self
      .write(move |tx| Ok(purge_answers(tx, question_id)?))
      .await?;

    debug!(
      question_id = %question_id,
      answers = purge.answers_removed,
      answer_votes = purge.answer_votes_removed,
      "answers purged"
    );
    Ok(purge)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote(&self, subject: Subject, vote: Vote) -> agora_core::Result<VoteEntry> {
    let entry = self
      .write(move |tx| {
        if !subject_exists(tx, subject)? {
          return Err(subject.not_found().into());
        }
        tx.execute(
          ledger(subject.kind()).insert,
          params![subject.raw_id(), vote.value()],
        )?;
        Ok(VoteEntry { id: tx.last_insert_rowid(), subject, vote })
      })
      .await?;

    debug!(subject = ?entry.subject, value = vote.value(), "vote recorded");
    Ok(entry)
  }

  async fn score(&self, subject: Subject) -> agora_core::Result<i64> {
    let score: i64 = self
      .read(move |tx| {
        if !subject_exists(tx, subject)? {
          return Err(subject.not_found().into());
        }
        Ok(tx.query_row(
          ledger(subject.kind()).score,
          params![subject.raw_id()],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(score)
  }
}
