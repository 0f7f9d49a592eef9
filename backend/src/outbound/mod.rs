//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed user repository using Diesel
//! - **memory**: process-local user repository for database-less runs
//! - **workspace**: request-scoped scratch directories for submissions
//! - **script**: the analysis script behind `SequenceAnalysisProvider`
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod script;
pub mod workspace;
