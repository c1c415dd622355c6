//! Database abstraction layer.
//!
//! [`JokeStore`] defines the interface for persisting joke records.  The
//! default implementation is [`sqlite::SqliteStore`].  To swap to another
//! database (Postgres, MySQL, …), implement [`JokeStore`] for your new
//! type and change the concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.

pub mod sqlite;

use chrono::{DateTime, Utc};

/// A single row in the `jokes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Joke {
    /// Storage-assigned id; stable for the record's lifetime and never
    /// reissued after deletion.
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` at creation; advanced on every update.
    pub updated_at: DateTime<Utc>,
}

/// A joke candidate about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewJoke {
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trait for persisting joke records.
///
/// Category comparisons (`*_by_category`, `*_in_category`) ignore letter
/// case using an ordinal, locale-independent comparison.
///
/// `update` and `delete` report the number of affected rows so callers can
/// distinguish a missing record without a prior read.
pub trait JokeStore: Send + Sync + 'static {
    /// Persist a new joke and return the stored record with its id.
    fn insert(
        &self,
        joke: NewJoke,
    ) -> impl std::future::Future<Output = Result<Joke, sqlx::Error>> + Send;

    /// Retrieve a single joke by id.
    fn get(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Joke>, sqlx::Error>> + Send;

    /// All jokes in storage order.
    fn list_all(&self) -> impl std::future::Future<Output = Result<Vec<Joke>, sqlx::Error>> + Send;

    /// All jokes ordered ascending by category (byte-wise lexicographic).
    fn list_sorted_by_category(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Joke>, sqlx::Error>> + Send;

    /// All jokes whose category matches, ignoring case.
    fn list_by_category(
        &self,
        category: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Joke>, sqlx::Error>> + Send;

    /// Total number of jokes.
    fn count(&self) -> impl std::future::Future<Output = Result<i64, sqlx::Error>> + Send;

    /// Number of jokes whose category matches, ignoring case.
    fn count_by_category(
        &self,
        category: &str,
    ) -> impl std::future::Future<Output = Result<i64, sqlx::Error>> + Send;

    /// The joke at `offset` within storage order, if any.
    fn nth(
        &self,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Option<Joke>, sqlx::Error>> + Send;

    /// The joke at `offset` within the case-insensitive category filter.
    fn nth_in_category(
        &self,
        category: &str,
        offset: i64,
    ) -> impl std::future::Future<Output = Result<Option<Joke>, sqlx::Error>> + Send;

    /// Replace title, content and category of the joke with `id` and stamp
    /// `updated_at`.  `id` and `created_at` are left untouched.  Returns the
    /// number of rows affected (0 when the id does not exist).
    fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        category: &str,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, sqlx::Error>> + Send;

    /// Hard-delete the joke with `id`.  Returns the number of rows affected.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<u64, sqlx::Error>> + Send;
}
