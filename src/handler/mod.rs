//! Request handler module
//!
//! Routes album requests to their handlers and shapes store results into
//! HTTP responses.

pub mod albums;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
