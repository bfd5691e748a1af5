use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    EventStoreError, Result, StoredEvent, StreamId, UniqueEmailAssertion, Version,
    store::{EventStore, validate_events_for_append},
};

/// PostgreSQL-backed event store implementation.
///
/// Relies on two tables (see `migrations/`):
/// - `eventstore` with primary key `(stream_id, stream_version)`
/// - `unique_email_addresses` with primary key `email_address`
///
/// Correctness under concurrent writers only needs read-committed isolation:
/// two transactions inserting the same `(stream_id, stream_version)` collide
/// on the primary key and exactly one of them commits.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Creates a new PostgreSQL event store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_event(row: PgRow) -> Result<StoredEvent> {
        let stream_id: String = row.try_get("stream_id")?;
        let stream_version: i32 = row.try_get("stream_version")?;

        Ok(StoredEvent {
            stream_id: StreamId::from_raw(stream_id),
            stream_version: Version::new(i64::from(stream_version)),
            event_name: row.try_get("event_name")?,
            occurred_at: row.try_get("occurred_at")?,
            payload: row.try_get("payload")?,
        })
    }

    fn version_column(version: Version) -> Result<i32> {
        i32::try_from(version.as_i64()).map_err(|_| EventStoreError::VersionOutOfRange(version))
    }

    async fn version_taken(&self, stream_id: &StreamId, version: Version) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM eventstore WHERE stream_id = $1 AND stream_version = $2)",
        )
        .bind(stream_id.as_str())
        .bind(Self::version_column(version)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Reclassifies an index failure as a conflict when the stream already
    /// holds the batch's first version.
    ///
    /// A writer with a stale view derives its assertions from an email address
    /// another writer has since moved or released, so its `Replace` matches no
    /// row or hits the winner's new entry before the event insert can collide.
    async fn resolve_assertion_failure(
        &self,
        err: EventStoreError,
        first: &StoredEvent,
    ) -> EventStoreError {
        if !matches!(
            err,
            EventStoreError::DuplicateUniqueValue { .. } | EventStoreError::UniqueValueMissing { .. }
        ) {
            return err;
        }

        match self.version_taken(&first.stream_id, first.stream_version).await {
            Ok(true) => EventStoreError::ConcurrencyConflict {
                stream_id: first.stream_id.clone(),
                version: first.stream_version,
            },
            Ok(false) => err,
            Err(lookup) => lookup,
        }
    }

    async fn apply_assertion(
        tx: &mut Transaction<'_, Postgres>,
        assertion: &UniqueEmailAssertion,
    ) -> Result<()> {
        let duplicate = |e: sqlx::Error| {
            if is_unique_violation(&e) {
                return EventStoreError::DuplicateUniqueValue {
                    email_address: assertion.target_email_address().to_string(),
                };
            }
            EventStoreError::Database(e)
        };

        match assertion {
            UniqueEmailAssertion::Add {
                email_address,
                customer_id,
            } => {
                sqlx::query(
                    "INSERT INTO unique_email_addresses (email_address, customer_id) VALUES ($1, $2)",
                )
                .bind(email_address)
                .bind(customer_id)
                .execute(&mut **tx)
                .await
                .map_err(duplicate)?;
            }
            UniqueEmailAssertion::Replace { previous, new } => {
                let result = sqlx::query(
                    "UPDATE unique_email_addresses SET email_address = $1 WHERE email_address = $2",
                )
                .bind(new)
                .bind(previous)
                .execute(&mut **tx)
                .await
                .map_err(duplicate)?;

                if result.rows_affected() == 0 {
                    return Err(EventStoreError::UniqueValueMissing {
                        email_address: previous.clone(),
                    });
                }
            }
            UniqueEmailAssertion::Remove { email_address } => {
                sqlx::query("DELETE FROM unique_email_addresses WHERE email_address = $1")
                    .bind(email_address)
                    .execute(&mut **tx)
                    .await?;
            }
        }

        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn load_stream(
        &self,
        stream_id: &StreamId,
        from_version: Version,
        max_events: usize,
    ) -> Result<Vec<StoredEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT stream_id, stream_version, event_name, occurred_at, payload
            FROM eventstore
            WHERE stream_id = $1 AND stream_version >= $2
            ORDER BY stream_version ASC
            LIMIT $3
            "#,
        )
        .bind(stream_id.as_str())
        .bind(Self::version_column(from_version)?)
        .bind(i64::try_from(max_events).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn append(
        &self,
        events: Vec<StoredEvent>,
        assertions: Vec<UniqueEmailAssertion>,
    ) -> Result<Version> {
        validate_events_for_append(&events)?;

        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        for assertion in &assertions {
            if let Err(e) = Self::apply_assertion(&mut tx, assertion).await {
                // release the connection before looking at the stream head
                tx.rollback().await?;
                return Err(self.resolve_assertion_failure(e, &events[0]).await);
            }
        }

        let mut last_version = Version::initial();
        for event in &events {
            sqlx::query(
                r#"
                INSERT INTO eventstore (stream_id, stream_version, event_name, occurred_at, payload)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(event.stream_id.as_str())
            .bind(Self::version_column(event.stream_version)?)
            .bind(&event.event_name)
            .bind(&event.occurred_at)
            .bind(&event.payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return EventStoreError::ConcurrencyConflict {
                        stream_id: event.stream_id.clone(),
                        version: event.stream_version,
                    };
                }
                EventStoreError::Database(e)
            })?;

            last_version = event.stream_version;
        }

        tx.commit().await?;
        tracing::debug!(
            stream_id = %events[0].stream_id,
            version = %last_version,
            events = events.len(),
            assertions = assertions.len(),
            "appended events"
        );
        Ok(last_version)
    }

    async fn purge_stream(&self, stream_id: &StreamId, owner_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let purged = sqlx::query("DELETE FROM eventstore WHERE stream_id = $1")
            .bind(stream_id.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM unique_email_addresses WHERE customer_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(%stream_id, purged, "purged stream");
        Ok(())
    }
}
