//! Diesel-based movie repository for SQLite.
//!
//! Uses diesel-async's SyncConnectionWrapper to provide an async interface
//! while maintaining Diesel's compile-time query checking.

use std::path::Path;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{MovieRow, NewMovie};
use super::pool::{AsyncSqlitePool, DieselError};
use crate::models::MovieRecord;
use crate::normalize::normalize_votes;
use crate::schema::movies;

/// Rows per INSERT statement, kept well under SQLite's bind limit.
const INSERT_CHUNK: usize = 500;

/// Movie repository with compile-time query checking.
#[derive(Clone)]
pub struct MovieRepository {
    pool: AsyncSqlitePool,
}

impl MovieRepository {
    /// Create a repository with an existing pool.
    pub fn new(pool: AsyncSqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a batch of records, returning the number inserted.
    pub async fn insert_batch(&self, records: &[MovieRecord]) -> Result<usize, DieselError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.get().await?;
        let timestamps: Vec<String> = records.iter().map(|r| r.scraped_at.to_rfc3339()).collect();

        let mut inserted = 0;
        for (chunk, stamps) in records
            .chunks(INSERT_CHUNK)
            .zip(timestamps.chunks(INSERT_CHUNK))
        {
            let rows: Vec<NewMovie> = chunk
                .iter()
                .zip(stamps)
                .map(|(record, stamp)| NewMovie::from_record(record, stamp))
                .collect();

            // diesel-async + SQLite does not support multi-row batch inserts
            // (no `QueryFragment<Sqlite>` for `BatchInsert`); insert each row of
            // the chunk individually, which is the supported idiom for this stack.
            for row in &rows {
                inserted += diesel::insert_into(movies::table)
                    .values(row)
                    .execute(&mut conn)
                    .await?;
            }
        }

        Ok(inserted)
    }

    /// Load the full record set in insertion order.
    pub async fn load_all(&self) -> Result<Vec<MovieRecord>, DieselError> {
        let mut conn = self.pool.get().await?;

        movies::table
            .order(movies::id.asc())
            .load::<MovieRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(MovieRecord::from).collect())
    }

    /// Count stored records.
    pub async fn count(&self) -> Result<u64, DieselError> {
        let mut conn = self.pool.get().await?;

        use diesel::dsl::count_star;
        let count: i64 = movies::table.select(count_star()).first(&mut conn).await?;
        Ok(count.max(0) as u64)
    }

    /// Delete every record, returning the number removed.
    pub async fn delete_all(&self) -> Result<usize, DieselError> {
        let mut conn = self.pool.get().await?;
        diesel::delete(movies::table).execute(&mut conn).await
    }

    /// Append every movie row from another cinescrape database.
    ///
    /// No deduplication: concatenation preserves all rows. The vote
    /// normalizer is re-applied to the incoming votes column, which is
    /// idempotent for already-clean integer values; anything unparseable
    /// degrades to 0 rather than failing the import.
    pub async fn import_from(&self, other_db: &Path) -> Result<usize, DieselError> {
        let other = MovieRepository::new(AsyncSqlitePool::from_path(other_db));
        let mut incoming = other.load_all().await?;

        for record in &mut incoming {
            record.votes = normalize_votes(&record.votes.to_string()).value_or_default();
        }

        self.insert_batch(&incoming).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel_async::SimpleAsyncConnection;
    use tempfile::tempdir;

    async fn setup_test_db() -> (AsyncSqlitePool, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let pool = AsyncSqlitePool::from_path(&db_path);

        let mut conn = pool.get().await.unwrap();
        conn.batch_execute(
            r#"CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                genre TEXT NOT NULL,
                rating INTEGER NOT NULL DEFAULT 0,
                votes BIGINT NOT NULL DEFAULT 0,
                duration INTEGER NOT NULL DEFAULT 0,
                scraped_at TEXT NOT NULL
            )"#,
        )
        .await
        .unwrap();

        (pool, dir)
    }

    fn record(name: &str, genre: &str, rating: u8, votes: u64, duration: u32) -> MovieRecord {
        MovieRecord::new(name.to_string(), genre.to_string(), rating, votes, duration)
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let (pool, _dir) = setup_test_db().await;
        let repo = MovieRepository::new(pool);

        let records = vec![
            record("A", "Action", 9, 500, 120),
            record("B", "Action,Drama", 7, 100, 0),
            record("C", "Drama", 9, 500, 200),
        ];
        let inserted = repo.insert_batch(&records).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(repo.count().await.unwrap(), 3);

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.len(), 3);
        // insertion order preserved
        assert_eq!(loaded[0].name, "A");
        assert_eq!(loaded[1].name, "B");
        assert_eq!(loaded[2].name, "C");
        assert_eq!(loaded[1].genre, "Action,Drama");
        assert_eq!(loaded[2].votes, 500);
        assert_eq!(loaded[2].duration, 200);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let (pool, _dir) = setup_test_db().await;
        let repo = MovieRepository::new(pool);

        assert_eq!(repo.insert_batch(&[]).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (pool, _dir) = setup_test_db().await;
        let repo = MovieRepository::new(pool);

        repo.insert_batch(&[record("A", "Drama", 7, 10, 90)])
            .await
            .unwrap();
        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_concatenates_without_dedup() {
        let (pool_a, _dir_a) = setup_test_db().await;
        let (pool_b, dir_b) = setup_test_db().await;

        let repo_a = MovieRepository::new(pool_a);
        let repo_b = MovieRepository::new(pool_b);

        let shared = record("Same", "Drama", 7, 1234, 90);
        repo_a.insert_batch(&[shared.clone()]).await.unwrap();
        repo_b.insert_batch(&[shared]).await.unwrap();

        let imported = repo_a
            .import_from(&dir_b.path().join("test.db"))
            .await
            .unwrap();
        assert_eq!(imported, 1);

        let all = repo_a.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        // vote re-normalization is idempotent on clean integers
        assert_eq!(all[0].votes, 1234);
        assert_eq!(all[1].votes, 1234);
    }
}
