use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::server::auth::auth_gate;
use crate::server::handlers::{
    create_customer_handler, delete_customer_handler, get_customer_handler,
    list_customers_handler, update_customer_handler, AppState,
};
use crate::server::logging::request_logging_middleware;

/// Build the application router.
///
/// # Routes
///
/// - `POST /customers` - Create a customer
/// - `GET /customers` - List customers
/// - `GET /customers/:id` - Get a customer
/// - `PUT /customers/:id` - Update a customer
/// - `DELETE /customers/:id` - Delete a customer
///
/// Every request, matched or not, goes through the auth gate, which in turn
/// sits inside the request logging layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/customers", post(create_customer_handler))
        .route("/customers", get(list_customers_handler))
        .route("/customers/:id", get(get_customer_handler))
        .route("/customers/:id", put(update_customer_handler))
        .route("/customers/:id", delete(delete_customer_handler))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_gate,
        ))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
