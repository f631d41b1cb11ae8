use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar};
use tracing::{error, info};

#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
#[cfg(feature = "sqlite")]
use std::{str::FromStr, time::Duration};

#[cfg(feature = "postgres")]
use sqlx::PgPool;

use crate::customer::{Customer, NewCustomer};
use crate::errors::{CustomerError, CustomerResult};
use crate::server::store::CustomerStore;

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("the `server` feature needs at least one database backend: enable `sqlite` or `postgres`");

/// Unified database abstraction over SQLite and Postgres.
///
/// Available variants depend on enabled features:
/// - `sqlite` feature enables `Database::SQLite`
/// - `postgres` feature enables `Database::Postgres`
#[derive(Debug, Clone)]
pub enum Database {
    #[cfg(feature = "sqlite")]
    SQLite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

impl Database {
    /// Connect to the database named by `url`.
    ///
    /// The scheme picks the backend: `sqlite:` or `postgres://` / `postgresql://`.
    pub async fn connect(url: &str) -> CustomerResult<Arc<Self>> {
        if url.starts_with("sqlite:") {
            Self::connect_sqlite(url).await
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Self::connect_postgres(url).await
        } else {
            Err(CustomerError::ConfigError(format!(
                "unsupported database URL scheme: {url}"
            )))
        }
    }

    #[cfg(feature = "sqlite")]
    async fn connect_sqlite(url: &str) -> CustomerResult<Arc<Self>> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| CustomerError::ConfigError(format!("invalid SQLite URL: {e}")))?
            .create_if_missing(true);

        // An in-memory database only lives as long as its one connection.
        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            error!("Failed to connect to SQLite: {e}");
            CustomerError::DatabaseError(format!("failed to connect to SQLite: {e}"))
        })?;

        Ok(Arc::new(Database::SQLite(pool)))
    }

    #[cfg(not(feature = "sqlite"))]
    async fn connect_sqlite(_url: &str) -> CustomerResult<Arc<Self>> {
        Err(CustomerError::ConfigError(
            "SQLite support not compiled in. Enable the 'sqlite' feature.".to_string(),
        ))
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(url: &str) -> CustomerResult<Arc<Self>> {
        let pool = PgPool::connect(url).await.map_err(|e| {
            error!("Failed to connect to PostgreSQL: {e}");
            CustomerError::DatabaseError(format!("failed to connect to PostgreSQL: {e}"))
        })?;

        Ok(Arc::new(Database::Postgres(pool)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect_postgres(_url: &str) -> CustomerResult<Arc<Self>> {
        Err(CustomerError::ConfigError(
            "PostgreSQL support not compiled in. Enable the 'postgres' feature.".to_string(),
        ))
    }

    /// Backend name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Database::Postgres(_) => "postgres",
        }
    }

    /// Create the `customers` table if it does not exist yet.
    ///
    /// Safe to call on every startup.
    pub async fn ensure_schema(&self) -> CustomerResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                query(
                    r#"
                    CREATE TABLE IF NOT EXISTS customers (
                        id     INTEGER PRIMARY KEY AUTOINCREMENT,
                        name   TEXT,
                        email  TEXT,
                        status TEXT
                    )
                    "#,
                )
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("SQLite ensure_schema failed: {e}");
                    CustomerError::DatabaseError(format!("can't create table customers: {e}"))
                })?;
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                query(
                    r#"
                    CREATE TABLE IF NOT EXISTS customers (
                        id     BIGSERIAL PRIMARY KEY,
                        name   TEXT,
                        email  TEXT,
                        status TEXT
                    )
                    "#,
                )
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("Postgres ensure_schema failed: {e}");
                    CustomerError::DatabaseError(format!("can't create table customers: {e}"))
                })?;
            }
        }

        info!(backend = self.kind(), "customers table is ready");
        Ok(())
    }

    /// Close every pooled connection.
    ///
    /// Call once after the server has stopped serving requests.
    pub async fn close(&self) {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => pool.close().await,
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => pool.close().await,
        }
    }
}

// Text columns are nullable in the table, so reads coalesce NULL to "".
// Postgres casts `id` so tables created with a 32-bit SERIAL still decode.

#[async_trait]
impl CustomerStore for Database {
    async fn insert_customer(&self, new: &NewCustomer) -> CustomerResult<Customer> {
        let id = match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => query_scalar::<_, i64>(
                "INSERT INTO customers (name, email, status) VALUES (?, ?, ?) RETURNING id",
            )
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.status)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                error!("SQLite insert_customer failed: {e}");
                CustomerError::DatabaseError(e.to_string())
            })?,
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => query_scalar::<_, i64>(
                "INSERT INTO customers (name, email, status) VALUES ($1, $2, $3) RETURNING id::BIGINT",
            )
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.status)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                error!("Postgres insert_customer failed: {e}");
                CustomerError::DatabaseError(e.to_string())
            })?,
        };

        Ok(Customer::from_new(id, new.clone()))
    }

    async fn get_customer(&self, id: i64) -> CustomerResult<Option<Customer>> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                let customer = query_as::<_, Customer>(
                    "SELECT id, \
                            COALESCE(name, '') AS name, \
                            COALESCE(email, '') AS email, \
                            COALESCE(status, '') AS status \
                     FROM customers WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    error!("SQLite get_customer failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?;

                Ok(customer)
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                let customer = query_as::<_, Customer>(
                    "SELECT id::BIGINT AS id, \
                            COALESCE(name, '') AS name, \
                            COALESCE(email, '') AS email, \
                            COALESCE(status, '') AS status \
                     FROM customers WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    error!("Postgres get_customer failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?;

                Ok(customer)
            }
        }
    }

    async fn list_customers(&self) -> CustomerResult<Vec<Customer>> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                let customers = query_as::<_, Customer>(
                    "SELECT id, \
                            COALESCE(name, '') AS name, \
                            COALESCE(email, '') AS email, \
                            COALESCE(status, '') AS status \
                     FROM customers ORDER BY id",
                )
                .fetch_all(pool)
                .await
                .map_err(|e| {
                    error!("SQLite list_customers failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?;

                Ok(customers)
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                let customers = query_as::<_, Customer>(
                    "SELECT id::BIGINT AS id, \
                            COALESCE(name, '') AS name, \
                            COALESCE(email, '') AS email, \
                            COALESCE(status, '') AS status \
                     FROM customers ORDER BY id",
                )
                .fetch_all(pool)
                .await
                .map_err(|e| {
                    error!("Postgres list_customers failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?;

                Ok(customers)
            }
        }
    }

    async fn update_customer(&self, customer: &Customer) -> CustomerResult<bool> {
        let rows_affected = match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => query(
                "UPDATE customers \
                     SET name = ?, email = ?, status = ? \
                     WHERE id = ?",
            )
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.status)
            .bind(customer.id)
            .execute(pool)
            .await
            .map_err(|e| {
                error!("SQLite update_customer failed: {e}");
                CustomerError::DatabaseError(e.to_string())
            })?
            .rows_affected(),
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => query(
                "UPDATE customers \
                     SET name = $1, email = $2, status = $3 \
                     WHERE id = $4",
            )
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.status)
            .bind(customer.id)
            .execute(pool)
            .await
            .map_err(|e| {
                error!("Postgres update_customer failed: {e}");
                CustomerError::DatabaseError(e.to_string())
            })?
            .rows_affected(),
        };

        Ok(rows_affected > 0)
    }

    async fn delete_customer(&self, id: i64) -> CustomerResult<bool> {
        let rows_affected = match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => query("DELETE FROM customers WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("SQLite delete_customer failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?
                .rows_affected(),
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => query("DELETE FROM customers WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("Postgres delete_customer failed: {e}");
                    CustomerError::DatabaseError(e.to_string())
                })?
                .rows_affected(),
        };

        Ok(rows_affected > 0)
    }
}
