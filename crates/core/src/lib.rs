pub mod analysis;
pub mod common;
pub mod config;
pub mod market;

#[cfg(feature = "test-utils")]
pub mod test_utils;
