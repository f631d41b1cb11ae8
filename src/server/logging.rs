//! Request logging middleware and customer audit events.
//!
//! Every request gets:
//! - a unique request ID, returned in the `X-Request-Id` header
//! - a tracing span carrying the ID, method and path
//! - a completion line with status and duration

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Response},
    middleware::Next,
};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Customer state change event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerEvent {
    /// Customer row was inserted
    Created,
    /// Customer row was overwritten
    Updated,
    /// Customer row was removed
    Deleted,
    /// Delete was requested for an id with no row
    DeleteMissed,
}

impl std::fmt::Display for CustomerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CustomerEvent::Created => "created",
            CustomerEvent::Updated => "updated",
            CustomerEvent::Deleted => "deleted",
            CustomerEvent::DeleteMissed => "delete_missed",
        };
        write!(f, "{}", s)
    }
}

/// Log a customer state change event.
///
/// # Arguments
///
/// * `event` - The type of customer event
/// * `customer_id` - The affected customer id
/// * `details` - Optional additional details about the event
pub fn log_customer_event(event: CustomerEvent, customer_id: i64, details: Option<&str>) {
    let span = info_span!(
        "customer_event",
        event = %event,
        customer_id = %customer_id,
    );
    let _enter = span.enter();

    match (event, details) {
        (CustomerEvent::DeleteMissed, Some(d)) => warn!(reason = %d, "Customer event occurred"),
        (CustomerEvent::DeleteMissed, None) => warn!("Customer event occurred"),
        (_, Some(d)) => info!(details = %d, "Customer event occurred"),
        (_, None) => info!("Customer event occurred"),
    }
}

/// Header name for the request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Generate a new unique request ID.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Logging middleware that tracks request timing and generates request IDs.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response<Body> {
    let request_id = generate_request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    let start = Instant::now();

    let response = async move {
        info!("Started processing request");
        next.run(request).await
    }
    .instrument(span.clone())
    .await;

    let duration = start.elapsed();
    let status = response.status();

    let _enter = span.enter();
    info!(
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    let (mut parts, body) = response.into_parts();
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, header_value);
    }

    Response::from_parts(parts, body)
}
