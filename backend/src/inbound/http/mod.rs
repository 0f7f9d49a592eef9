//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod input_seq;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
