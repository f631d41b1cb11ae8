//! Storage seam used by the HTTP handlers.
//!
//! Handlers only ever see an `Arc<dyn CustomerStore>`, so the SQL-backed
//! [`Database`](crate::server::database::Database) and the in-process
//! [`MemoryStore`](crate::server::memory::MemoryStore) are interchangeable.

use async_trait::async_trait;

use crate::customer::{Customer, NewCustomer};
use crate::errors::CustomerResult;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a new row and return it with its server-assigned id.
    async fn insert_customer(&self, new: &NewCustomer) -> CustomerResult<Customer>;

    /// Fetch a customer by id.
    ///
    /// Returns:
    /// - `Ok(Some(Customer))` if found
    /// - `Ok(None)` if not found
    /// - `Err(CustomerError::DatabaseError)` on storage failure
    async fn get_customer(&self, id: i64) -> CustomerResult<Option<Customer>>;

    /// All customers ordered by id. Empty when the table is empty.
    async fn list_customers(&self) -> CustomerResult<Vec<Customer>>;

    /// Overwrite name, email and status of the row with `customer.id`.
    ///
    /// Returns `Ok(false)` if no row matched.
    async fn update_customer(&self, customer: &Customer) -> CustomerResult<bool>;

    /// Hard-delete the row with `id`.
    ///
    /// Returns `Ok(false)` if no row matched.
    async fn delete_customer(&self, id: i64) -> CustomerResult<bool>;
}
