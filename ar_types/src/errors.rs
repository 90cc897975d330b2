use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The backend interaction an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStage {
    Submit,
    FetchSequences,
    FetchReport,
    FetchLog,
}

impl fmt::Display for BackendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendStage::Submit => "job submission",
            BackendStage::FetchSequences => "contig retrieval",
            BackendStage::FetchReport => "report retrieval",
            BackendStage::FetchLog => "log retrieval",
        })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("return code: {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Every way a single assembly request can fail.
///
/// None of these are retried by the adapter. Errors raised after a job was
/// submitted leave that job running in the backend.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// The request, or an object it references, is missing a field or has a
    /// field of the wrong shape.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// An external command exited unsuccessfully.
    #[error(
        "Error running {command} during {stage}, {}\n{output}",
        describe_exit(exit_code)
    )]
    BackendExecution {
        stage: BackendStage,
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// The submit command succeeded but its output did not contain a job id.
    #[error("No integer job ID found: {output}")]
    BackendProtocol { output: String },

    /// An external command did not finish within the configured timeout and
    /// was killed.
    #[error("{command} did not finish within {}s during {stage}", timeout.as_secs())]
    BackendTimeout {
        stage: BackendStage,
        command: String,
        timeout: Duration,
    },

    /// A record in the contig stream could not be parsed.
    #[error("Malformed contig record {record:?} in {path:?}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        record: String,
        reason: String,
    },

    /// The object store rejected a save.
    #[error("Failed to save object {object_name:?}")]
    Persistence {
        object_name: String,
        source: anyhow::Error,
    },

    /// The read library could not be fetched from the object store.
    #[error("Failed to fetch object {reference:?}")]
    ObjectFetch {
        reference: String,
        source: anyhow::Error,
    },

    /// Local scratch file handling failed.
    #[error("{context}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl AssemblyError {
    /// A required request field was absent or empty.
    pub fn missing_field(field: &str) -> Self {
        AssemblyError::Validation {
            field: field.to_string(),
            message: format!("{field} parameter is required"),
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AssemblyError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AssemblyError::Io {
            context: context.into(),
            source,
        }
    }
}
