//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use agora_core::{
  ErrorClass,
  answer::{AnswerContent, AnswerId},
  question::{NewQuestion, Question, QuestionId, QuestionQuery},
  ranking::is_ranked,
  store::ForumStore,
  vote::{Subject, Vote},
};
use rusqlite::params;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn question(s: &SqliteStore, title: &str) -> Question {
  s.create_question(NewQuestion::new(title, "some description", "general").unwrap())
    .await
    .unwrap()
}

async fn answer(s: &SqliteStore, q: QuestionId, content: &str) -> AnswerId {
  s.create_answer(q, AnswerContent::new(content).unwrap())
    .await
    .unwrap()
    .id
}

async fn row_count(s: &SqliteStore, table: &'static str) -> i64 {
  s.read(move |tx| {
    Ok(tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
  })
  .await
  .unwrap()
}

async fn table_counts(s: &SqliteStore) -> [i64; 4] {
  [
    row_count(s, "questions").await,
    row_count(s, "answers").await,
    row_count(s, "question_votes").await,
    row_count(s, "answer_votes").await,
  ]
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_question() {
  let s = store().await;

  let q = question(&s, "How do lifetimes work?").await;
  assert!(q.id.get() > 0);

  let fetched = s.get_question(q.id).await.unwrap();
  assert_eq!(fetched, Some(q));
}

#[tokio::test]
async fn get_question_missing_returns_none() {
  let s = store().await;
  let missing = QuestionId::new(42).unwrap();
  assert!(s.get_question(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn list_questions_in_creation_order() {
  let s = store().await;
  let a = question(&s, "first").await;
  let b = question(&s, "second").await;

  let all = s.list_questions().await.unwrap();
  assert_eq!(all, vec![a, b]);
}

#[tokio::test]
async fn create_question_rejects_blank_fields() {
  let s = store().await;
  let input = NewQuestion {
    title:       "title".into(),
    description: "".into(),
    category:    "general".into(),
  };
  let err = s.create_question(input).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::Validation);
  assert_eq!(row_count(&s, "questions").await, 0);
}

#[tokio::test]
async fn update_question_replaces_fields() {
  let s = store().await;
  let q = question(&s, "old title").await;

  let updated = s
    .update_question(q.id, NewQuestion::new("new title", "new body", "rust").unwrap())
    .await
    .unwrap();
  assert_eq!(updated.title, "new title");

  let fetched = s.get_question(q.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .update_question(
      QuestionId::new(9).unwrap(),
      NewQuestion::new("t", "d", "c").unwrap(),
    )
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn search_matches_title_or_category_case_insensitively() {
  let s = store().await;
  let borrow = s
    .create_question(NewQuestion::new("Borrow checker woes", "d", "rust").unwrap())
    .await
    .unwrap();
  let async_q = s
    .create_question(NewQuestion::new("Futures", "d", "Async").unwrap())
    .await
    .unwrap();
  question(&s, "Unrelated").await;

  let by_title = s
    .search_questions(&QuestionQuery {
      title:    Some("BORROW".into()),
      category: None,
    })
    .await
    .unwrap();
  assert_eq!(by_title, vec![borrow.clone()]);

  let either = s
    .search_questions(&QuestionQuery {
      title:    Some("borrow".into()),
      category: Some("async".into()),
    })
    .await
    .unwrap();
  assert_eq!(either, vec![borrow, async_q]);

  let none = s
    .search_questions(&QuestionQuery {
      title:    Some("nothing like this".into()),
      category: None,
    })
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  let summer = question(&s, "Été en Provence").await;
  question(&s, "Winter").await;

  let found = s
    .search_questions(&QuestionQuery {
      title:    Some("été".into()),
      category: None,
    })
    .await
    .unwrap();
  assert_eq!(found, vec![summer]);
}

#[tokio::test]
async fn search_terms_have_no_wildcards() {
  let s = store().await;
  let discount = question(&s, "50% off_topic").await;
  question(&s, "plain title").await;

  let percent = s
    .search_questions(&QuestionQuery {
      title:    Some("%".into()),
      category: None,
    })
    .await
    .unwrap();
  assert_eq!(percent, vec![discount.clone()]);

  let underscore = s
    .search_questions(&QuestionQuery {
      title:    Some("f_t".into()),
      category: None,
    })
    .await
    .unwrap();
  assert_eq!(underscore, vec![discount]);

  let wildcard = s
    .search_questions(&QuestionQuery {
      title:    Some("p_ain".into()),
      category: None,
    })
    .await
    .unwrap();
  assert!(wildcard.is_empty());
}

#[tokio::test]
async fn search_without_terms_is_rejected() {
  let s = store().await;
  let err = s.search_questions(&QuestionQuery::default()).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::Validation);
}

// ─── Answers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_answer_for_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .create_answer(QuestionId::new(3).unwrap(), AnswerContent::new("hi").unwrap())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
  assert_eq!(row_count(&s, "answers").await, 0);
}

#[tokio::test]
async fn ranked_answers_scenario() {
  let s = store().await;
  let q = question(&s, "Q1").await;
  let a1 = answer(&s, q.id, "first").await;
  let a2 = answer(&s, q.id, "second").await;

  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a2), Vote::Up).await.unwrap();

  let board = s.answers_ranked(q.id).await.unwrap();
  assert_eq!(board.question.title, "Q1");
  assert!(!board.is_unanswered());

  let got: Vec<_> = board
    .answers
    .iter()
    .map(|a| (a.id, a.content.as_str(), a.score))
    .collect();
  assert_eq!(got, vec![(a1, "first", 2), (a2, "second", 1)]);
}

#[tokio::test]
async fn ranked_answers_break_ties_by_newest() {
  let s = store().await;
  let q = question(&s, "ties").await;
  let older = answer(&s, q.id, "older").await;
  let newer = answer(&s, q.id, "newer").await;
  let downvoted = answer(&s, q.id, "downvoted").await;
  s.cast_vote(Subject::Answer(downvoted), Vote::Down).await.unwrap();

  let first = s.answers_ranked(q.id).await.unwrap();
  let ids: Vec<_> = first.answers.iter().map(|a| a.id).collect();
  assert_eq!(ids, vec![newer, older, downvoted]);
  assert!(is_ranked(&first.answers));

  // Stable across repeated reads of unchanged data.
  let second = s.answers_ranked(q.id).await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn ranked_answers_only_include_the_question() {
  let s = store().await;
  let q1 = question(&s, "one").await;
  let q2 = question(&s, "two").await;
  answer(&s, q1.id, "for one").await;
  answer(&s, q2.id, "for two").await;

  let board = s.answers_ranked(q1.id).await.unwrap();
  assert_eq!(board.answers.len(), 1);
  assert_eq!(board.answers[0].content, "for one");
}

#[tokio::test]
async fn ranked_answers_for_unanswered_question_is_empty() {
  let s = store().await;
  let q = question(&s, "lonely").await;

  let board = s.answers_ranked(q.id).await.unwrap();
  assert!(board.is_unanswered());
  assert_eq!(board.question.id, q.id);
}

#[tokio::test]
async fn ranked_answers_for_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .answers_ranked(QuestionId::new(77).unwrap())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_answers_removes_answers_and_their_votes() {
  let s = store().await;
  let q = question(&s, "purge me").await;
  let keep = question(&s, "keep me").await;
  let a1 = answer(&s, q.id, "a1").await;
  answer(&s, q.id, "a2").await;
  let kept_answer = answer(&s, keep.id, "kept").await;
  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(kept_answer), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Question(q.id), Vote::Up).await.unwrap();

  let purge = s.delete_answers_for_question(q.id).await.unwrap();
  assert_eq!(purge.answers_removed, 2);
  assert_eq!(purge.answer_votes_removed, 1);

  // The question and its own votes survive; the other question is untouched.
  assert!(s.get_question(q.id).await.unwrap().is_some());
  assert_eq!(s.score(Subject::Question(q.id)).await.unwrap(), 1);
  assert_eq!(s.score(Subject::Answer(kept_answer)).await.unwrap(), 1);
  assert_eq!(table_counts(&s).await, [2, 1, 1, 1]);
}

#[tokio::test]
async fn delete_answers_with_nothing_to_delete_succeeds() {
  let s = store().await;
  let q = question(&s, "no answers").await;

  let purge = s.delete_answers_for_question(q.id).await.unwrap();
  assert_eq!(purge.answers_removed, 0);
  assert_eq!(purge.answer_votes_removed, 0);

  // The question need not exist at all.
  let purge = s
    .delete_answers_for_question(QuestionId::new(500).unwrap())
    .await
    .unwrap();
  assert_eq!(purge.answers_removed, 0);
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn score_is_sum_of_votes() {
  let s = store().await;
  let q = question(&s, "vote on me").await;
  let subject = Subject::Question(q.id);

  assert_eq!(s.score(subject).await.unwrap(), 0);

  let votes = [Vote::Up, Vote::Down, Vote::Up, Vote::Up, Vote::Down, Vote::Up];
  for vote in votes {
    s.cast_vote(subject, vote).await.unwrap();
  }
  let expected: i64 = votes.iter().map(|v| v.value()).sum();
  assert_eq!(s.score(subject).await.unwrap(), expected);
  assert_eq!(row_count(&s, "question_votes").await, votes.len() as i64);
}

#[tokio::test]
async fn cast_vote_returns_the_ledger_entry() {
  let s = store().await;
  let q = question(&s, "entry").await;
  let a = answer(&s, q.id, "answer").await;

  let entry = s.cast_vote(Subject::Answer(a), Vote::Down).await.unwrap();
  assert!(entry.id > 0);
  assert_eq!(entry.subject, Subject::Answer(a));
  assert_eq!(entry.vote, Vote::Down);
}

#[tokio::test]
async fn vote_on_missing_subject_is_not_found_and_writes_nothing() {
  let s = store().await;

  let err = s
    .cast_vote(Subject::Question(QuestionId::new(1).unwrap()), Vote::Up)
    .await
    .unwrap_err();
  assert!(matches!(err, agora_core::Error::QuestionNotFound(_)));

  let err = s
    .cast_vote(Subject::Answer(AnswerId::new(1).unwrap()), Vote::Up)
    .await
    .unwrap_err();
  assert!(matches!(err, agora_core::Error::AnswerNotFound(_)));

  assert_eq!(table_counts(&s).await, [0, 0, 0, 0]);
}

#[tokio::test]
async fn ledger_rejects_out_of_range_values() {
  let s = store().await;
  let q = question(&s, "checked").await;
  let id = q.id.get();

  let result = s
    .write(move |tx| {
      tx.execute(
        "INSERT INTO question_votes (question_id, value) VALUES (?1, 2)",
        params![id],
      )?;
      Ok(())
    })
    .await;
  assert!(result.is_err());
  assert_eq!(row_count(&s, "question_votes").await, 0);
}

#[tokio::test]
async fn concurrent_votes_all_count() {
  let path = std::env::temp_dir()
    .join(format!("agora-concurrent-votes-{}.db", std::process::id()));
  let remove_files = || {
    for suffix in ["", "-wal", "-shm"] {
      let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
  };
  remove_files();

  let s = SqliteStore::open(&path, 4).await.unwrap();
  assert_eq!(s.pool_size(), 4);

  let q = question(&s, "popular").await;
  let a = answer(&s, q.id, "answer").await;

  let mut expected_question = 0;
  let mut expected_answer = 0;
  let mut tasks = tokio::task::JoinSet::new();
  for i in 0..40 {
    let vote = if i % 4 == 0 { Vote::Down } else { Vote::Up };
    let subject = if i % 2 == 0 {
      expected_question += vote.value();
      Subject::Question(q.id)
    } else {
      expected_answer += vote.value();
      Subject::Answer(a)
    };
    let s = s.clone();
    tasks.spawn(async move { s.cast_vote(subject, vote).await });
  }
  let mut cast = 0;
  while let Some(joined) = tasks.join_next().await {
    joined.unwrap().unwrap();
    cast += 1;
  }
  assert_eq!(cast, 40);

  assert_eq!(s.score(Subject::Question(q.id)).await.unwrap(), expected_question);
  assert_eq!(s.score(Subject::Answer(a)).await.unwrap(), expected_answer);

  drop(s);
  remove_files();
}

// ─── Cascading delete ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_question_cascades_to_answers_and_votes() {
  let s = store().await;
  let q = question(&s, "doomed").await;
  let other = question(&s, "survivor").await;
  let a1 = answer(&s, q.id, "a1").await;
  let a2 = answer(&s, q.id, "a2").await;
  let other_answer = answer(&s, other.id, "other").await;

  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a2), Vote::Down).await.unwrap();
  s.cast_vote(Subject::Question(q.id), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(other_answer), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Question(other.id), Vote::Down).await.unwrap();

  let deleted = s.delete_question(q.id).await.unwrap();
  assert_eq!(deleted.question, q);
  assert_eq!(deleted.answers_removed, 2);
  assert_eq!(deleted.answer_votes_removed, 3);
  assert_eq!(deleted.question_votes_removed, 1);

  assert!(s.get_question(q.id).await.unwrap().is_none());

  let qid = q.id.get();
  let (answers_left, votes_left): (i64, i64) = s
    .read(move |tx| {
      let answers: i64 = tx.query_row(
        "SELECT COUNT(*) FROM answers WHERE question_id = ?1",
        params![qid],
        |r| r.get(0),
      )?;
      let votes: i64 = tx.query_row(
        "SELECT COUNT(*) FROM answer_votes WHERE answer_id NOT IN (SELECT id FROM answers)",
        [],
        |r| r.get(0),
      )?;
      Ok((answers, votes))
    })
    .await
    .unwrap();
  assert_eq!(answers_left, 0);
  assert_eq!(votes_left, 0);

  // The other question keeps everything it had.
  assert_eq!(table_counts(&s).await, [1, 1, 1, 1]);
  assert_eq!(s.score(Subject::Answer(other_answer)).await.unwrap(), 1);
}

#[tokio::test]
async fn delete_missing_question_changes_nothing() {
  let s = store().await;
  let q = question(&s, "present").await;
  let a = answer(&s, q.id, "answer").await;
  s.cast_vote(Subject::Answer(a), Vote::Up).await.unwrap();
  let before = table_counts(&s).await;

  let err = s
    .delete_question(QuestionId::new(q.id.get() + 100).unwrap())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
  assert_eq!(table_counts(&s).await, before);
}

#[tokio::test]
async fn failed_cascade_rolls_back_every_step() {
  let s = store().await;
  let q = question(&s, "protected").await;
  let a = answer(&s, q.id, "answer").await;
  s.cast_vote(Subject::Answer(a), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Question(q.id), Vote::Up).await.unwrap();
  let before = table_counts(&s).await;

  // Make the last step of the cascade fail after the earlier deletes ran.
  s.write(|tx| {
    tx.execute_batch(
      "CREATE TRIGGER fail_question_delete BEFORE DELETE ON questions
       BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )?;
    Ok(())
  })
  .await
  .unwrap();

  let err = s.delete_question(q.id).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::Store);
  assert_eq!(table_counts(&s).await, before);
  assert_eq!(s.score(Subject::Answer(a)).await.unwrap(), 1);
}

#[tokio::test]
async fn failed_answer_purge_restores_answer_votes() {
  let s = store().await;
  let q = question(&s, "purge guarded").await;
  let a1 = answer(&s, q.id, "first").await;
  let a2 = answer(&s, q.id, "second").await;
  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a1), Vote::Up).await.unwrap();
  s.cast_vote(Subject::Answer(a2), Vote::Down).await.unwrap();
  let before = table_counts(&s).await;

  // Answer votes are deleted first; the answers step then fails.
  s.write(|tx| {
    tx.execute_batch(
      "CREATE TRIGGER fail_answer_delete BEFORE DELETE ON answers
       BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )?;
    Ok(())
  })
  .await
  .unwrap();

  let err = s.delete_answers_for_question(q.id).await.unwrap_err();
  assert_eq!(err.class(), ErrorClass::Store);
  assert_eq!(table_counts(&s).await, before);
  assert_eq!(row_count(&s, "answer_votes").await, 3);
  assert_eq!(s.score(Subject::Answer(a1)).await.unwrap(), 2);
  assert_eq!(s.score(Subject::Answer(a2)).await.unwrap(), -1);
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn abandoned_transaction_is_rolled_back() {
  let s = store().await;
  let q = question(&s, "cancelled vote").await;
  let id = q.id.get();

  let slow_vote = s.write(move |tx| {
    tx.execute(
      "INSERT INTO question_votes (question_id, value) VALUES (?1, 1)",
      params![id],
    )?;
    std::thread::sleep(Duration::from_millis(300));
    Ok(())
  });
  let timed_out = tokio::time::timeout(Duration::from_millis(50), slow_vote).await;
  assert!(timed_out.is_err());

  // The next call queues behind the abandoned closure on the same connection.
  assert_eq!(s.score(Subject::Question(q.id)).await.unwrap(), 0);
  assert_eq!(row_count(&s, "question_votes").await, 0);
}

#[tokio::test]
async fn failed_write_releases_its_connection() {
  let s = store().await;
  for _ in 0..3 {
    let err = s
      .cast_vote(Subject::Question(QuestionId::new(1).unwrap()), Vote::Up)
      .await
      .unwrap_err();
    assert!(err.is_not_found());
  }
  // The single pooled connection is still available.
  question(&s, "still works").await;
}
