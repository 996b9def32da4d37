/*
 * Responsibility
 * - Router-level middleware, one module per concern
 * - Each module exposes `apply(router, ...) -> Router`; ordering lives in app.rs
 */
pub mod client_lib_version;
pub mod cors;
pub mod http;
pub mod security_headers;
