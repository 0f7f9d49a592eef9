//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{SequenceAnalysis, UserAccounts};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub analysis: Arc<dyn SequenceAnalysis>,
}

impl HttpState {
    pub fn new(accounts: Arc<dyn UserAccounts>, analysis: Arc<dyn SequenceAnalysis>) -> Self {
        Self { accounts, analysis }
    }
}
