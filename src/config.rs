//! Logger configuration and option functions
//!
//! A [`LogConfig`] starts from defaults and is adjusted by an ordered list of
//! [`LogOption`]s. Every option ignores a zero or empty argument, so callers
//! can forward unset settings without clobbering defaults.
//!
//! ```
//! use request_logger::config::{self, LogConfig, SinkType};
//!
//! let mut cfg = LogConfig::default();
//! cfg.apply(vec![
//!     config::set_app_name("svc"),
//!     config::set_log_type("console"),
//!     config::set_app_mode(""),
//! ]);
//!
//! assert_eq!(cfg.app_name(), "svc");
//! assert_eq!(cfg.app_mode(), "dev");
//! assert_eq!(cfg.sink_type(), SinkType::Console);
//! ```

use crate::appenders::RotationOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_APP_NAME: &str = "default-app";
pub const DEFAULT_APP_MODE: &str = "dev";
pub const DEFAULT_LOG_TYPE: &str = "file";
pub const DEFAULT_LOG_PATH: &str = "/home/logs/app";
pub const DEFAULT_CHILD_PATH: &str = "glogs/%Y-%m-%d.log";
pub const DEFAULT_ROTATION_SIZE: u64 = 32 * 1024 * 1024;
pub const DEFAULT_ROTATION_TIME: Duration = Duration::from_secs(24 * 3600);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600);

/// Where a sink writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkType {
    Console,
    File,
}

/// One configuration adjustment
pub type LogOption = Box<dyn FnOnce(&mut LogConfig) + Send>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    app_name: String,
    app_mode: String,
    log_type: String,
    log_path: String,
    child_path: String,
    rotation_size: u64,
    rotation_count: usize,
    #[serde(with = "duration_secs")]
    rotation_time: Duration,
    #[serde(with = "duration_secs")]
    max_age: Duration,
    no_buffer_write: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_mode: DEFAULT_APP_MODE.to_string(),
            log_type: DEFAULT_LOG_TYPE.to_string(),
            log_path: DEFAULT_LOG_PATH.to_string(),
            child_path: DEFAULT_CHILD_PATH.to_string(),
            rotation_size: DEFAULT_ROTATION_SIZE,
            rotation_count: 0,
            rotation_time: DEFAULT_ROTATION_TIME,
            max_age: DEFAULT_MAX_AGE,
            no_buffer_write: false,
        }
    }
}

impl LogConfig {
    /// Defaults with `options` applied left to right
    pub fn with_options(options: impl IntoIterator<Item = LogOption>) -> Self {
        let mut config = Self::default();
        config.apply(options);
        config
    }

    pub fn apply(&mut self, options: impl IntoIterator<Item = LogOption>) {
        for option in options {
            option(self);
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn app_mode(&self) -> &str {
        &self.app_mode
    }

    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    pub fn log_path(&self) -> &str {
        &self.log_path
    }

    pub fn child_path(&self) -> &str {
        &self.child_path
    }

    pub fn rotation_size(&self) -> u64 {
        self.rotation_size
    }

    pub fn rotation_count(&self) -> usize {
        self.rotation_count
    }

    pub fn rotation_time(&self) -> Duration {
        self.rotation_time
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn no_buffer_write(&self) -> bool {
        self.no_buffer_write
    }

    /// `file` selects the rotating file sink, anything else the console
    pub fn sink_type(&self) -> SinkType {
        if self.log_type == "file" {
            SinkType::File
        } else {
            SinkType::Console
        }
    }

    /// `{log_path}/{app_name}/{child_path}`, still holding strftime tokens
    pub fn file_pattern(&self) -> String {
        format!("{}/{}/{}", self.log_path, self.app_name, self.child_path)
    }

    /// Settings for the rotating writer; a file sink never appends to a
    /// file left over from an earlier start.
    pub fn rotation_options(&self) -> RotationOptions {
        RotationOptions::new()
            .with_rotation_size(self.rotation_size)
            .with_rotation_count(self.rotation_count)
            .with_rotation_time(self.rotation_time)
            .with_max_age(self.max_age)
            .with_buffered(!self.no_buffer_write)
            .with_force_new_file(true)
    }
}

pub fn set_app_name(app_name: impl Into<String>) -> LogOption {
    let app_name = app_name.into();
    Box::new(move |c| {
        if !app_name.is_empty() {
            c.app_name = app_name;
        }
    })
}

pub fn set_app_mode(app_mode: impl Into<String>) -> LogOption {
    let app_mode = app_mode.into();
    Box::new(move |c| {
        if !app_mode.is_empty() {
            c.app_mode = app_mode;
        }
    })
}

/// `"console"` or `"file"`
pub fn set_log_type(log_type: impl Into<String>) -> LogOption {
    let log_type = log_type.into();
    Box::new(move |c| {
        if !log_type.is_empty() {
            c.log_type = log_type;
        }
    })
}

/// Base directory; the app name and child path are joined below it
pub fn set_log_path(log_path: impl Into<String>) -> LogOption {
    let log_path = log_path.into();
    Box::new(move |c| {
        if !log_path.is_empty() {
            c.log_path = log_path;
        }
    })
}

/// Sub directory plus file name, e.g. `glogs/%Y-%m-%d.log`
pub fn set_child_path(child_path: impl Into<String>) -> LogOption {
    let child_path = child_path.into();
    Box::new(move |c| {
        if !child_path.is_empty() {
            c.child_path = child_path;
        }
    })
}

/// Maximum size of one file in bytes
pub fn set_max_size(bytes: u64) -> LogOption {
    Box::new(move |c| {
        if bytes > 0 {
            c.rotation_size = bytes;
        }
    })
}

pub fn set_max_age(max_age: Duration) -> LogOption {
    Box::new(move |c| {
        if !max_age.is_zero() {
            c.max_age = max_age;
        }
    })
}

pub fn set_rotation_time(rotation_time: Duration) -> LogOption {
    Box::new(move |c| {
        if !rotation_time.is_zero() {
            c.rotation_time = rotation_time;
        }
    })
}

/// Number of files kept; unlimited unless set
pub fn set_rotation_count(count: usize) -> LogOption {
    Box::new(move |c| {
        if count > 0 {
            c.rotation_count = count;
        }
    })
}

/// Write every record straight to the file. Slower, but nothing is lost on
/// an abrupt exit.
pub fn set_no_buffer_write() -> LogOption {
    Box::new(|c| c.no_buffer_write = true)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
