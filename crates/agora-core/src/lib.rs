//! Core types and trait definitions for the Agora Q&A forum.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::ForumStore`]; the HTTP layer depends on
//! the trait, not on any concrete backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod answer;
pub mod error;
pub mod question;
pub mod ranking;
pub mod store;
pub mod vote;

pub use error::{Error, ErrorClass, Result};
