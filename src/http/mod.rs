//! HTTP protocol layer module
//!
//! Response builders shared by the album handlers and the router.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_204_response, build_404_response, build_405_response, build_413_response,
    build_health_response, json_error, json_response,
};
