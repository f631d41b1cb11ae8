use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::customer::{Customer, NewCustomer};
use crate::errors::{CustomerError, CustomerResult};
use crate::server::store::CustomerStore;

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Customer>,
}

/// An in-process customer table.
///
/// Ids start at 1 and are never reused, matching an auto-increment column.
#[derive(Debug)]
pub struct MemoryStore {
    table: Mutex<Table>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> CustomerResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| CustomerError::ServerError("failed to acquire customer table lock".into()))
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn insert_customer(&self, new: &NewCustomer) -> CustomerResult<Customer> {
        let mut table = self.lock()?;
        let id = table.next_id;
        table.next_id += 1;

        let customer = Customer::from_new(id, new.clone());
        table.rows.insert(id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: i64) -> CustomerResult<Option<Customer>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn list_customers(&self) -> CustomerResult<Vec<Customer>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn update_customer(&self, customer: &Customer) -> CustomerResult<bool> {
        let mut table = self.lock()?;
        match table.rows.get_mut(&customer.id) {
            Some(row) => {
                *row = customer.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_customer(&self, id: i64) -> CustomerResult<bool> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}
