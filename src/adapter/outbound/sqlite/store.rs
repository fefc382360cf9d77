//! SQLite record store implementation.
//!
//! Appends accepted results to the `accepted_results` table using Diesel.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::{debug, warn};

use crate::adapter::outbound::sqlite::database::connection::{configure_sqlite_connection, DbPool};
use crate::adapter::outbound::sqlite::database::model::{AcceptedRow, NewAcceptedRow};
use crate::adapter::outbound::sqlite::database::schema::accepted_results;
use crate::domain::evaluation::AcceptedResult;
use crate::error::{Error, Result};
use crate::port::outbound::store::RecordStore;

/// SQLite-backed record store.
///
/// Every batch is written in one transaction and tagged with `source`, the
/// run identifier, so repeated runs never overwrite each other.
///
/// With a write deadline, a transaction that is still running when the
/// deadline passes is rolled back instead of committed. The blocking write
/// cannot be cancelled from the async side, so this keeps a caller that
/// stopped waiting from retrying a batch that later commits.
pub struct SqliteRecordStore {
    pool: DbPool,
    source: String,
    write_deadline: Option<Duration>,
}

impl SqliteRecordStore {
    #[must_use]
    pub fn new(pool: DbPool, source: impl Into<String>) -> Self {
        Self {
            pool,
            source: source.into(),
            write_deadline: None,
        }
    }

    /// Roll back any batch whose write has not reached commit within `deadline`.
    #[must_use]
    pub fn with_write_deadline(mut self, deadline: Duration) -> Self {
        self.write_deadline = Some(deadline);
        self
    }

    /// Rows written under this store's source tag, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn rows(&self) -> Result<Vec<AcceptedRow>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        accepted_results::table
            .filter(accepted_results::source.eq(&self.source))
            .order(accepted_results::id.asc())
            .select(AcceptedRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn insert_rows(
        pool: &DbPool,
        rows: &[NewAcceptedRow],
        deadline: Option<Instant>,
    ) -> Result<usize> {
        let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
        if let Err(e) = configure_sqlite_connection(&mut conn) {
            warn!(error = %e, "Failed to configure SQLite connection");
        }

        let outcome = conn.transaction(|conn| {
            let written = diesel::insert_into(accepted_results::table)
                .values(rows)
                .execute(conn)?;
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(diesel::result::Error::RollbackTransaction);
            }
            Ok(written)
        });
        match outcome {
            Ok(written) => Ok(written),
            Err(diesel::result::Error::RollbackTransaction) => Err(Error::Database(
                "write deadline passed before commit, batch rolled back".into(),
            )),
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert_batch(&self, records: &[AcceptedResult]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewAcceptedRow> = records
            .iter()
            .map(|record| NewAcceptedRow::from_result(&self.source, record))
            .collect();
        let pool = self.pool.clone();
        let deadline = self.write_deadline.map(|d| Instant::now() + d);

        let written = tokio::task::spawn_blocking(move || Self::insert_rows(&pool, &rows, deadline))
            .await
            .map_err(|e| Error::Database(format!("insert task failed: {e}")))??;

        debug!(source = %self.source, written, "Inserted accepted results");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use crate::domain::evaluation::EvaluationResult;
    use crate::testkit::domain;

    fn store(source: &str) -> SqliteRecordStore {
        let pool = create_pool(":memory:", 1).unwrap();
        run_migrations(&pool).unwrap();
        SqliteRecordStore::new(pool, source)
    }

    fn accepted(name: &str) -> AcceptedResult {
        match domain::accepted(name) {
            EvaluationResult::Accepted(accepted) => accepted,
            EvaluationResult::Discarded(_) => unreachable!(),
        }
    }

    #[tokio::test]
    async fn insert_batch_persists_every_record() {
        let store = store("run-1");
        let records = vec![accepted("AK-47 | Redline"), accepted("AWP | Asiimov")];

        let written = store.insert_batch(&records).await.unwrap();
        assert_eq!(written, 2);

        let rows = store.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "AK-47 | Redline");
        assert_eq!(rows[0].source, "run-1");
        assert_eq!(rows[0].buff_locator, "buff/ak-47-redline");
        assert_eq!(rows[0].buff_price, records[0].buff_price().to_string());
        assert_eq!(rows[0].profit, records[0].profit().to_string());
        assert_eq!(rows[1].steam_listings, 90);
    }

    #[tokio::test]
    async fn repeated_batches_append() {
        let store = store("run-2");
        let records = vec![accepted("Glock-18 | Fade")];
        store.insert_batch(&records).await.unwrap();
        store.insert_batch(&records).await.unwrap();
        assert_eq!(store.rows().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn write_past_its_deadline_is_rolled_back() {
        let store = store("run-4").with_write_deadline(Duration::ZERO);
        let records = vec![accepted("M4A4 | Howl"), accepted("AWP | Dragon Lore")];

        let err = store.insert_batch(&records).await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert!(store.rows().unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_within_its_deadline_commits() {
        let store = store("run-5").with_write_deadline(Duration::from_secs(30));
        let written = store.insert_batch(&[accepted("USP-S | Kill Confirmed")]).await.unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.rows().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let store = store("run-3");
        assert_eq!(store.insert_batch(&[]).await.unwrap(), 0);
        assert!(store.rows().unwrap().is_empty());
    }
}
