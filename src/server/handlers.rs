//! HTTP handlers for the customer endpoints.
//!
//! - `POST /customers` - Create a customer
//! - `GET /customers/:id` - Get a customer by id
//! - `GET /customers` - List all customers
//! - `PUT /customers/:id` - Update the supplied fields of a customer
//! - `DELETE /customers/:id` - Delete a customer

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::customer::{Customer, CustomerPatch, NewCustomer};
use crate::server::api_error::ApiError;
use crate::server::auth::AuthState;
use crate::server::extract::{CustomerId, JsonBody};
use crate::server::logging::{log_customer_event, CustomerEvent};
use crate::server::store::CustomerStore;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>, auth: AuthState) -> Self {
        Self { store, auth }
    }
}

/// Response body for a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCustomerResponse {
    pub message: String,
}

impl DeleteCustomerResponse {
    pub fn deleted() -> Self {
        Self {
            message: "customer deleted".to_string(),
        }
    }
}

/// Create a customer.
///
/// `POST /customers`
pub async fn create_customer_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    info!("Creating customer email={}", payload.email);

    let customer = state.store.insert_customer(&payload).await?;
    log_customer_event(CustomerEvent::Created, customer.id, None);

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Get a customer by id.
///
/// `GET /customers/:id`
pub async fn get_customer_handler(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, ApiError> {
    info!("Getting customer id={}", id);

    let customer = state
        .store
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::customer_not_found(id))?;

    Ok(Json(customer))
}

/// List every customer.
///
/// `GET /customers`
pub async fn list_customers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    info!("Listing customers");

    let customers = state.store.list_customers().await?;
    Ok(Json(customers))
}

/// Update a customer.
///
/// Fields missing from the body keep their stored values.
///
/// `PUT /customers/:id`
pub async fn update_customer_handler(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
    JsonBody(patch): JsonBody<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    info!("Updating customer id={}", id);

    let mut customer = state
        .store
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::customer_not_found(id))?;

    patch.apply(&mut customer);

    // The row can vanish between the read and the write.
    if !state.store.update_customer(&customer).await? {
        return Err(ApiError::customer_not_found(id));
    }

    log_customer_event(CustomerEvent::Updated, id, None);

    Ok(Json(customer))
}

/// Delete a customer.
///
/// Succeeds whether or not a row existed; storage failures are a 500.
///
/// `DELETE /customers/:id`
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<DeleteCustomerResponse>, ApiError> {
    info!("Deleting customer id={}", id);

    if state.store.delete_customer(id).await? {
        log_customer_event(CustomerEvent::Deleted, id, None);
    } else {
        log_customer_event(CustomerEvent::DeleteMissed, id, Some("no row with this id"));
    }

    Ok(Json(DeleteCustomerResponse::deleted()))
}
