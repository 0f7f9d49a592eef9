//! Child-process runner for the analysis script.
//!
//! Invokes `<interpreter> <script> <mode> <args...>` inside a workspace
//! directory, waits for it under a timeout and decodes the JSON object the
//! script leaves behind. No shell is involved, so arguments reach the script
//! verbatim.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use cap_std::{ambient_authority, fs::Dir};
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::AnalysisOutcome;

/// Default upper bound on a single script run.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(600);

const STDERR_TAIL_BYTES: usize = 2048;

/// Script entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    /// Reference metadata lookup; writes `metadata.json`.
    Metadata,
    /// Alignment of a staged input; writes `alignment_data.json`.
    Alignment,
}

impl ScriptMode {
    /// Positional mode flag understood by the script.
    pub fn flag(self) -> &'static str {
        match self {
            Self::Metadata => "1",
            Self::Alignment => "2",
        }
    }

    /// Output file the script writes into its working directory.
    pub fn output_file(self) -> &'static str {
        match self {
            Self::Metadata => "metadata.json",
            Self::Alignment => "alignment_data.json",
        }
    }
}

/// Failures while running the script or decoding its output.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to launch `{interpreter}`: {source}")]
    Launch {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("script exited unsuccessfully ({status})")]
    Exit {
        status: String,
        code: Option<i32>,
        stderr_tail: String,
    },
    #[error("script did not finish within {}s", .timeout.as_secs())]
    Timeout { timeout: Duration },
    #[error("failed to read `{file}`: {source}")]
    OutputRead {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("`{file}` does not hold a JSON object: {reason}")]
    MalformedOutput { file: String, reason: String },
}

/// Interpreter, script location and time budget.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    interpreter: String,
    script_path: PathBuf,
    timeout: Duration,
}

impl ScriptConfig {
    /// Build a configuration. Relative script paths are resolved against the
    /// current directory, since the child runs inside its workspace.
    pub fn new(interpreter: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        let script_path = script_path.into();
        let script_path = std::path::absolute(&script_path).unwrap_or(script_path);
        Self {
            interpreter: interpreter.into(),
            script_path,
            timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Runs the analysis script, one child process per call.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    config: ScriptConfig,
}

impl ScriptRunner {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Run the script in `workdir` and decode its output file.
    ///
    /// A successful run that leaves no output file, or an empty object,
    /// yields [`AnalysisOutcome::Empty`].
    ///
    /// # Errors
    ///
    /// See [`ScriptError`]; each failure mode has its own variant.
    pub async fn run(
        &self,
        workdir: &Path,
        mode: ScriptMode,
        args: &[&str],
    ) -> Result<AnalysisOutcome, ScriptError> {
        let mut command = Command::new(&self.config.interpreter);
        command
            .arg(&self.config.script_path)
            .arg(mode.flag())
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            interpreter = %self.config.interpreter,
            script = %self.config.script_path.display(),
            mode = mode.flag(),
            workdir = %workdir.display(),
            "launching analysis script"
        );
        let child = command.spawn().map_err(|source| ScriptError::Launch {
            interpreter: self.config.interpreter.clone(),
            source,
        })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!(timeout_secs = self.config.timeout.as_secs(), "analysis script timed out");
                ScriptError::Timeout {
                    timeout: self.config.timeout,
                }
            })?
            .map_err(|source| ScriptError::Launch {
                interpreter: self.config.interpreter.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr_tail = stderr_tail(&output.stderr);
            warn!(status = %output.status, stderr = %stderr_tail, "analysis script failed");
            return Err(ScriptError::Exit {
                status: output.status.to_string(),
                code: output.status.code(),
                stderr_tail,
            });
        }

        read_output(workdir, mode.output_file()).await
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(stderr.get(start..).unwrap_or_default())
        .trim()
        .to_owned()
}

async fn read_output(workdir: &Path, file: &'static str) -> Result<AnalysisOutcome, ScriptError> {
    let workdir = workdir.to_path_buf();
    let read = tokio::task::spawn_blocking(move || {
        let dir = Dir::open_ambient_dir(&workdir, ambient_authority())?;
        match dir.read(file) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    })
    .await
    .map_err(|err| ScriptError::OutputRead {
        file: file.to_owned(),
        source: io::Error::other(err),
    })?
    .map_err(|source| ScriptError::OutputRead {
        file: file.to_owned(),
        source,
    })?;

    let Some(bytes) = read else {
        debug!(file, "analysis script wrote no output");
        return Ok(AnalysisOutcome::Empty);
    };
    decode_output(file, &bytes)
}

fn decode_output(file: &str, bytes: &[u8]) -> Result<AnalysisOutcome, ScriptError> {
    let malformed = |reason: String| ScriptError::MalformedOutput {
        file: file.to_owned(),
        reason,
    };
    match serde_json::from_slice::<Value>(bytes).map_err(|err| malformed(err.to_string()))? {
        Value::Object(map) => Ok(AnalysisOutcome::from_result(map)),
        other => Err(malformed(format!("found {}", json_kind(&other)))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
