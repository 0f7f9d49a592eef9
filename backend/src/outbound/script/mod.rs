//! Script-backed analysis adapter.
//!
//! `runner` owns the child-process contract; `provider` adapts it to the
//! `SequenceAnalysisProvider` port.

mod provider;
mod runner;

pub use provider::ScriptAnalysisProvider;
pub use runner::{DEFAULT_SCRIPT_TIMEOUT, ScriptConfig, ScriptError, ScriptMode, ScriptRunner};
