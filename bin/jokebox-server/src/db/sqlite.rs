//! SQLite implementation of [`JokeStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature.  Migrations are run automatically
//! on startup via [`SqliteStore::connect`].
//!
//! # Migrations path
//!
//! `sqlx::migrate!("./migrations")` resolves the path **at compile time**
//! relative to `CARGO_MANIFEST_DIR` (the crate root), so the directory is
//! embedded into the binary.  The database file location is determined at
//! runtime by the `JOKEBOX_DATABASE_URL` environment variable and is **not**
//! related to the current working directory at runtime.
//!
//! # Queries
//!
//! The `sqlx::query` (runtime-verified) form is used deliberately so that no
//! `DATABASE_URL` environment variable is needed at compile time.  Category
//! matching uses `COLLATE NOCASE`, SQLite's locale-independent ASCII folding.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{Joke, JokeStore, NewJoke};

/// Columns of the `jokes` table, in select order.
type JokeRow = (i64, String, String, String, String, String);

/// SQLite-backed joke store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://jokebox.db"`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Open a fresh in-memory database.
    ///
    /// The pool is pinned to a single connection: every pooled connection
    /// would otherwise open its own private `:memory:` database and the
    /// migrated schema would be lost between checkouts.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

fn row_to_joke(row: JokeRow) -> Joke {
    let (id, title, content, category, created_at, updated_at) = row;
    Joke {
        id,
        title,
        content,
        category,
        created_at: parse_instant(&created_at, "created_at"),
        updated_at: parse_instant(&updated_at, "updated_at"),
    }
}

/// Stored instants are RFC 3339 text; a row that fails to parse is reported
/// and stamped with the current time rather than failing the whole request.
fn parse_instant(raw: &str, field: &'static str) -> DateTime<Utc> {
    raw.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(raw = %raw, field, error = %e, "failed to parse stored timestamp; using now");
        Utc::now()
    })
}

impl JokeStore for SqliteStore {
    async fn insert(&self, joke: NewJoke) -> Result<Joke, sqlx::Error> {
        let created_at = joke.created_at.to_rfc3339();
        let updated_at = joke.updated_at.to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO jokes (title, content, category, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&joke.title)
        .bind(&joke.content)
        .bind(&joke.category)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(Joke {
            id: result.last_insert_rowid(),
            title: joke.title,
            content: joke.content,
            category: joke.category,
            created_at: joke.created_at,
            updated_at: joke.updated_at,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Joke>, sqlx::Error> {
        let row: Option<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at \
             FROM jokes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_joke))
    }

    async fn list_all(&self) -> Result<Vec<Joke>, sqlx::Error> {
        let rows: Vec<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at FROM jokes",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_joke).collect())
    }

    async fn list_sorted_by_category(&self) -> Result<Vec<Joke>, sqlx::Error> {
        let rows: Vec<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at \
             FROM jokes ORDER BY category ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_joke).collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Joke>, sqlx::Error> {
        let rows: Vec<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at \
             FROM jokes WHERE category = ?1 COLLATE NOCASE",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_joke).collect())
    }

    async fn count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jokes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_category(&self, category: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM jokes WHERE category = ?1 COLLATE NOCASE")
                .bind(category)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn nth(&self, offset: i64) -> Result<Option<Joke>, sqlx::Error> {
        let row: Option<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at \
             FROM jokes LIMIT 1 OFFSET ?1",
        )
        .bind(offset)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_joke))
    }

    async fn nth_in_category(&self, category: &str, offset: i64) -> Result<Option<Joke>, sqlx::Error> {
        let row: Option<JokeRow> = sqlx::query_as(
            "SELECT id, title, content, category, created_at, updated_at \
             FROM jokes WHERE category = ?1 COLLATE NOCASE LIMIT 1 OFFSET ?2",
        )
        .bind(category)
        .bind(offset)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_joke))
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        category: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let updated_at = updated_at.to_rfc3339();
        let result = sqlx::query(
            "UPDATE jokes SET title = ?1, content = ?2, category = ?3, updated_at = ?4 \
             WHERE id = ?5",
        )
        .bind(title)
        .bind(content)
        .bind(category)
        .bind(&updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jokes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn sample(title: &str, category: &str) -> NewJoke {
        let now = Utc::now();
        NewJoke {
            title: title.to_owned(),
            content: "why did the chicken cross the road".to_owned(),
            category: category.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = SqliteStore::in_memory().await.unwrap();
        let a = store.insert(sample("a", "Dad")).await.unwrap();
        let b = store.insert(sample("b", "Dad")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample("a", "Dad")).await.unwrap();
        let b = store.insert(sample("b", "Dad")).await.unwrap();
        assert_eq!(store.delete(b.id).await.unwrap(), 1);
        let c = store.insert(sample("c", "Dad")).await.unwrap();
        assert!(c.id > b.id);
    }

    #[tokio::test]
    async fn insert_roundtrips_through_get() {
        let store = SqliteStore::in_memory().await.unwrap();
        let stored = store.insert(sample("a", "Dad")).await.unwrap();
        let fetched = store.get(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn get_missing_id_is_none() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_fields_but_preserves_created_at() {
        let store = SqliteStore::in_memory().await.unwrap();
        let stored = store.insert(sample("a", "Dad")).await.unwrap();

        let later = Utc::now();
        let rows = store
            .update(stored.id, "a2", "new content", "Pun", later)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let fetched = store.get(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.title, "a2");
        assert_eq!(fetched.content, "new content");
        assert_eq!(fetched.category, "Pun");
        assert_eq!(fetched.created_at, stored.created_at);
        assert_eq!(fetched.updated_at, later);
        assert!(fetched.created_at <= fetched.updated_at);
    }

    #[tokio::test]
    async fn update_missing_id_affects_no_rows() {
        let store = SqliteStore::in_memory().await.unwrap();
        let rows = store.update(7, "t", "c", "Dad", Utc::now()).await.unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn category_matching_ignores_case() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample("a", "Dad")).await.unwrap();
        store.insert(sample("b", "dad")).await.unwrap();
        store.insert(sample("c", "Pun")).await.unwrap();

        assert_eq!(store.count_by_category("DAD").await.unwrap(), 2);
        assert_eq!(store.list_by_category("dAd").await.unwrap().len(), 2);
        assert_eq!(store.count_by_category("pun").await.unwrap(), 1);
        assert!(store.list_by_category("knock-knock").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sorted_listing_orders_by_category() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample("a", "Pun")).await.unwrap();
        store.insert(sample("b", "Animal")).await.unwrap();
        store.insert(sample("c", "Dad")).await.unwrap();

        let categories: Vec<String> = store
            .list_sorted_by_category()
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.category)
            .collect();
        assert_eq!(categories, ["Animal", "Dad", "Pun"]);
    }

    #[tokio::test]
    async fn nth_walks_storage_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        let a = store.insert(sample("a", "Dad")).await.unwrap();
        let b = store.insert(sample("b", "Pun")).await.unwrap();

        assert_eq!(store.nth(0).await.unwrap().unwrap().id, a.id);
        assert_eq!(store.nth(1).await.unwrap().unwrap().id, b.id);
        assert!(store.nth(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn nth_in_category_skips_other_categories() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert(sample("a", "Pun")).await.unwrap();
        let b = store.insert(sample("b", "Dad")).await.unwrap();

        assert_eq!(
            store.nth_in_category("dad", 0).await.unwrap().unwrap().id,
            b.id
        );
        assert!(store.nth_in_category("dad", 1).await.unwrap().is_none());
    }
}
