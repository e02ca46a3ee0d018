//! API data transfer objects

mod common;

pub use common::ApiResponse;
