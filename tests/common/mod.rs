//! Common test utilities shared across integration tests.

pub mod image_utils;
pub mod test_data;
