//! Errors raised while building or flushing a sink
//!
//! Only construction and explicit flushes report errors. The logging entry
//! points swallow write failures and report them on stderr instead.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A configuration value the sink cannot be built from
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The log directory could not be created
    #[error("cannot create log directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A log file could not be opened or inspected
    #[error("cannot open log file '{}': {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The active file could not be closed out before moving to the next one
    #[error("rotation failed for '{}': {source}", .path.display())]
    Rotation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Write or flush failure on an appender's destination
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An appender rejected a record
    #[error("appender error: {0}")]
    Appender(String),
}

impl LoggerError {
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn create_dir(path: &Path, source: io::Error) -> Self {
        LoggerError::CreateDir {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn open_file(path: &Path, source: io::Error) -> Self {
        LoggerError::OpenFile {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn rotation(path: &Path, source: io::Error) -> Self {
        LoggerError::Rotation {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn appender(message: impl Into<String>) -> Self {
        LoggerError::Appender(message.into())
    }
}
