/*
 * Responsibility
 * - URL layout of v1
 * - Authentication, if added, is layered here and stays inside the
 *   client library headers (see app::build_router)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::health::health;

pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
