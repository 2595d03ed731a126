//! SQL schema for the Agora SQLite store.
//!
//! [`SCHEMA`] is executed once when a store is opened; [`CONNECTION_PRAGMAS`]
//! runs on every pooled connection because SQLite scopes those settings to
//! the connection. Future migrations will be gated on `PRAGMA user_version`.

/// Settings that must hold on every connection.
///
/// `foreign_keys` makes SQLite reject any delete that would orphan an answer
/// or a ledger entry, so a mis-ordered cascade fails instead of committing.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- AUTOINCREMENT: ids are never reused, so a larger id is always a newer row.
CREATE TABLE IF NOT EXISTS questions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS answers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL REFERENCES questions(id),
    content     TEXT NOT NULL CHECK (length(content) <= 300)
);

-- Vote ledgers are append-only; rows leave only with their subject.
-- A subject may collect any number of entries, so the subject column is not unique.
CREATE TABLE IF NOT EXISTS question_votes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL REFERENCES questions(id),
    value       INTEGER NOT NULL CHECK (value IN (1, -1))
);

CREATE TABLE IF NOT EXISTS answer_votes (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    answer_id INTEGER NOT NULL REFERENCES answers(id),
    value     INTEGER NOT NULL CHECK (value IN (1, -1))
);

CREATE INDEX IF NOT EXISTS answers_question_idx        ON answers(question_id);
CREATE INDEX IF NOT EXISTS question_votes_question_idx ON question_votes(question_id);
CREATE INDEX IF NOT EXISTS answer_votes_answer_idx     ON answer_votes(answer_id);

PRAGMA user_version = 1;
";
