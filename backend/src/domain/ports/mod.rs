//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`UserAccounts`, `SequenceAnalysis`) are called by inbound
//! adapters. Driven ports (`UserRepository`, `SubmissionStore`,
//! `SequenceAnalysisProvider`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod sequence_analysis;
mod sequence_analysis_provider;
mod submission_store;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use sequence_analysis::MockSequenceAnalysis;
pub use sequence_analysis::SequenceAnalysis;
#[cfg(test)]
pub use sequence_analysis_provider::MockSequenceAnalysisProvider;
pub use sequence_analysis_provider::{AnalysisProviderError, SequenceAnalysisProvider};
#[cfg(test)]
pub use submission_store::MockSubmissionStore;
pub use submission_store::{
    StagedInputKind, StagedSubmission, SubmissionStore, SubmissionStoreError, Workspace,
    WorkspaceGuard,
};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
