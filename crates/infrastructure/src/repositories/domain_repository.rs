use dns_noise_domain::DomainError;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::{error, info, instrument};

/// Rows per multi-value INSERT; two binds each keeps well under SQLite's limit.
const INSERT_BATCH_SIZE: usize = 500;

/// Candidate domains, tagged with the label of the source they came from.
pub struct SqliteDomainRepository {
    pool: SqlitePool,
}

impl SqliteDomainRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM domains")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count domains");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self))]
    pub async fn count_label(&self, label: &str) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM domains WHERE label = ?")
            .bind(label)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count domains for label");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(count.max(0) as u64)
    }

    /// Row at dense position `position` (0-based), one indexed lookup.
    pub async fn fetch_at(&self, position: u64) -> Result<Option<String>, DomainError> {
        let seq = i64::try_from(position).map_err(|_| {
            DomainError::DatabaseError(format!("Position {} out of range", position))
        })?;

        let row: Option<(String,)> = sqlx::query_as("SELECT domain FROM domains WHERE seq = ?")
            .bind(seq)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, seq, "Failed to fetch domain");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|(domain,)| domain))
    }

    /// Rewrites `seq` as 0..N-1 in primary-key order.
    async fn renumber(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE domains SET seq = ranked.pos \
             FROM (SELECT id, ROW_NUMBER() OVER (ORDER BY id) - 1 AS pos FROM domains) AS ranked \
             WHERE domains.id = ranked.id",
        )
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Replaces every row of `label` with `domains` in one transaction.
    #[instrument(skip(self, domains), fields(rows = domains.len()))]
    pub async fn replace_label(&self, label: &str, domains: &[String]) -> Result<u64, DomainError> {
        let db_err = |e: sqlx::Error| {
            error!(error = %e, "Failed to reload domains");
            DomainError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM domains WHERE label = ?")
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for chunk in domains.chunks(INSERT_BATCH_SIZE) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO domains (domain, label) ");
            builder.push_values(chunk, |mut row, domain| {
                row.push_bind(domain).push_bind(label);
            });
            builder.build().execute(&mut *tx).await.map_err(db_err)?;
        }

        Self::renumber(&mut tx).await.map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        info!(label, rows = domains.len(), "Domain source loaded");
        Ok(domains.len() as u64)
    }

    /// Distinct labels currently stored.
    pub async fn labels(&self) -> Result<Vec<String>, DomainError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT label FROM domains ORDER BY label")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to list domain labels");
                    DomainError::DatabaseError(e.to_string())
                })?;

        Ok(rows.into_iter().map(|(label,)| label).collect())
    }

    #[instrument(skip(self))]
    pub async fn purge_label(&self, label: &str) -> Result<u64, DomainError> {
        let db_err = |e: sqlx::Error| {
            error!(error = %e, "Failed to purge domains");
            DomainError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let result = sqlx::query("DELETE FROM domains WHERE label = ?")
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        Self::renumber(&mut tx).await.map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
