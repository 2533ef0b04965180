//! Transactional seeding of the dashboard tables.

use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, query_builder::Separated};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    config::SeedConfig,
    db::schema,
    error::SeedError,
    fixture::SeedDataset,
    models::{Customer, Invoice, RevenueRecord, User},
    password::hash_password,
};

/// Rows actually inserted per table. Rows skipped on conflict are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: u64,
    pub customers: u64,
    pub invoices: u64,
    pub revenue: u64,
}

impl SeedReport {
    pub fn total(&self) -> u64 {
        self.users + self.customers + self.invoices + self.revenue
    }
}

/// A user whose password has already been replaced by its hash.
struct HashedUser {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
}

/// Key of the transaction-scoped advisory lock that serializes seed runs.
const SEED_LOCK_KEY: i64 = 0x5EED_DA7A;

/// Loads a [`SeedDataset`] into the database inside a single transaction.
///
/// Each call to [`Seeder::run`] checks out its own connection from the pool and
/// gives it back on every exit path. Runs sharing a database take an advisory
/// lock first, so concurrent calls queue up instead of racing on the DDL.
#[derive(Clone)]
pub struct Seeder {
    pool: PgPool,
    dataset: SeedDataset,
    config: SeedConfig,
}

impl Seeder {
    /// Creates a seeder with an empty dataset and the default configuration.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            dataset: SeedDataset::default(),
            config: SeedConfig::default(),
        }
    }

    pub fn with_dataset(mut self, dataset: SeedDataset) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn with_config(mut self, config: SeedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dataset(&self) -> &SeedDataset {
        &self.dataset
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Runs the whole seed under the configured deadline.
    ///
    /// Either every table step succeeds and the transaction commits, or the
    /// transaction is rolled back and the first error is returned. On timeout
    /// the in-flight transaction is dropped, which rolls it back.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        let deadline = self.config.timeout;
        match tokio::time::timeout(deadline, self.run_in_transaction()).await {
            Ok(result) => result,
            Err(_) => {
                error!("Seeding timed out after {deadline:?}");
                Err(SeedError::Timeout(deadline))
            }
        }
    }

    async fn run_in_transaction(&self) -> Result<SeedReport, SeedError> {
        let mut tx = self.pool.begin().await?;

        let outcome = match acquire_seed_lock(&mut tx).await {
            Ok(()) => self.seed_all(&mut tx).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(report) => {
                tx.commit().await?;
                info!(
                    users = report.users,
                    customers = report.customers,
                    invoices = report.invoices,
                    revenue = report.revenue,
                    "Seed committed"
                );
                Ok(report)
            }
            Err(err) => {
                error!("Seeding failed, rolling back: {err}");
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Table steps run strictly in order on the same connection.
    async fn seed_all(&self, conn: &mut PgConnection) -> Result<SeedReport, SeedError> {
        let users = self.seed_users(conn, &self.dataset.users).await?;
        let customers = self.seed_customers(conn, &self.dataset.customers).await?;
        let invoices = self.seed_invoices(conn, &self.dataset.invoices).await?;
        let revenue = self.seed_revenue(conn, &self.dataset.revenue).await?;

        Ok(SeedReport {
            users,
            customers,
            invoices,
            revenue,
        })
    }

    /// Creates `users` if needed and inserts `users`, skipping existing ids.
    ///
    /// Passwords are hashed on the blocking pool, at most `max_concurrency` at
    /// a time; the plaintext never reaches the database.
    pub async fn seed_users(
        &self,
        conn: &mut PgConnection,
        users: &[User],
    ) -> Result<u64, SeedError> {
        info!("Seeding {} users...", users.len());

        schema::ensure_uuid_extension(conn).await?;
        schema::ensure_users_table(conn).await?;

        let cost = self.config.hash_cost;
        let hashed: Vec<HashedUser> = stream::iter(users.iter().cloned())
            .map(|user| async move {
                let User {
                    id,
                    name,
                    email,
                    password,
                } = user;
                let password_hash =
                    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;
                Ok::<_, SeedError>(HashedUser {
                    id,
                    name,
                    email,
                    password_hash,
                })
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .try_collect()
            .await?;

        let inserted = insert_batches(
            conn,
            "INSERT INTO users (id, name, email, password) ",
            " ON CONFLICT (id) DO NOTHING",
            &hashed,
            self.config.batch_size,
        )
        .await?;

        info!("Seeded {inserted} of {} users", users.len());
        Ok(inserted)
    }

    /// Creates `customers` if needed and inserts `customers`, skipping existing ids.
    pub async fn seed_customers(
        &self,
        conn: &mut PgConnection,
        customers: &[Customer],
    ) -> Result<u64, SeedError> {
        info!("Seeding {} customers...", customers.len());

        schema::ensure_uuid_extension(conn).await?;
        schema::ensure_customers_table(conn).await?;

        let inserted = insert_batches(
            conn,
            "INSERT INTO customers (id, name, email, image_url) ",
            " ON CONFLICT (id) DO NOTHING",
            customers,
            self.config.batch_size,
        )
        .await?;

        info!("Seeded {inserted} of {} customers", customers.len());
        Ok(inserted)
    }

    /// Creates `invoices` if needed and inserts `invoices`.
    ///
    /// Invoice ids are generated by the database, so the conflict clause never
    /// fires for seed rows: every run adds a fresh copy of each invoice.
    pub async fn seed_invoices(
        &self,
        conn: &mut PgConnection,
        invoices: &[Invoice],
    ) -> Result<u64, SeedError> {
        info!("Seeding {} invoices...", invoices.len());

        schema::ensure_uuid_extension(conn).await?;
        schema::ensure_invoices_table(conn).await?;

        let inserted = insert_batches(
            conn,
            "INSERT INTO invoices (customer_id, amount, status, date) ",
            " ON CONFLICT (id) DO NOTHING",
            invoices,
            self.config.batch_size,
        )
        .await?;

        info!("Seeded {inserted} of {} invoices", invoices.len());
        Ok(inserted)
    }

    /// Creates `revenue` if needed and inserts `revenue`, skipping existing months.
    pub async fn seed_revenue(
        &self,
        conn: &mut PgConnection,
        revenue: &[RevenueRecord],
    ) -> Result<u64, SeedError> {
        info!("Seeding {} revenue months...", revenue.len());

        schema::ensure_revenue_table(conn).await?;

        let inserted = insert_batches(
            conn,
            "INSERT INTO revenue (month, revenue) ",
            " ON CONFLICT (month) DO NOTHING",
            revenue,
            self.config.batch_size,
        )
        .await?;

        info!("Seeded {inserted} of {} revenue months", revenue.len());
        Ok(inserted)
    }
}

/// Blocks until no other seed transaction holds the lock. Released on commit
/// or rollback.
async fn acquire_seed_lock(conn: &mut PgConnection) -> Result<(), SeedError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// A record that can be written as one row of a multi-row INSERT.
trait InsertRow {
    fn push_row<'a>(&'a self, row: Separated<'_, 'a, Postgres, &'static str>);
}

impl InsertRow for HashedUser {
    fn push_row<'a>(&'a self, mut row: Separated<'_, 'a, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(&self.name)
            .push_bind(&self.email)
            .push_bind(&self.password_hash);
    }
}

impl InsertRow for Customer {
    fn push_row<'a>(&'a self, mut row: Separated<'_, 'a, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(&self.name)
            .push_bind(&self.email)
            .push_bind(&self.image_url);
    }
}

impl InsertRow for Invoice {
    fn push_row<'a>(&'a self, mut row: Separated<'_, 'a, Postgres, &'static str>) {
        row.push_bind(self.customer_id)
            .push_bind(self.amount)
            .push_bind(self.status.as_str())
            .push_bind(self.date);
    }
}

impl InsertRow for RevenueRecord {
    fn push_row<'a>(&'a self, mut row: Separated<'_, 'a, Postgres, &'static str>) {
        row.push_bind(&self.month).push_bind(self.revenue);
    }
}

/// Writes `rows` as multi-row INSERTs of at most `batch_size` rows each and
/// returns the number of rows the database actually inserted.
async fn insert_batches<T: InsertRow>(
    conn: &mut PgConnection,
    insert: &str,
    on_conflict: &str,
    rows: &[T],
    batch_size: usize,
) -> Result<u64, SeedError> {
    let mut inserted = 0;

    for chunk in rows.chunks(batch_size.max(1)) {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(insert);
        qb.push_values(chunk, |row, item| item.push_row(row));
        qb.push(on_conflict);

        inserted += qb.build().execute(&mut *conn).await?.rows_affected();
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_total() {
        let report = SeedReport {
            users: 1,
            customers: 10,
            invoices: 15,
            revenue: 12,
        };
        assert_eq!(report.total(), 38);
        assert_eq!(SeedReport::default().total(), 0);
    }

    #[tokio::test]
    async fn test_seeder_keeps_dataset_and_config() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/none")
            .unwrap();
        let config = SeedConfig {
            batch_size: 3,
            ..Default::default()
        };

        let seeder = Seeder::new(pool)
            .with_dataset(SeedDataset::placeholder().unwrap())
            .with_config(config);

        assert_eq!(seeder.config().batch_size, 3);
        assert_eq!(seeder.dataset().revenue.len(), 12);
    }

    #[tokio::test]
    async fn test_new_seeder_starts_empty() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/none")
            .unwrap();

        let seeder = Seeder::new(pool);

        assert!(seeder.dataset().is_empty());
        assert_eq!(seeder.config().batch_size, SeedConfig::default().batch_size);
    }
}
