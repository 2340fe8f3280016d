//! Logging macros that build the argument list.
//!
//! Every trailing argument goes through [`Arg::from`](crate::Arg), so plain
//! values become positional format arguments and [`Field`](crate::Field)s
//! become structured fields, in one list.
//!
//! # Examples
//!
//! ```no_run
//! use request_logger::{config, info, warn_f, Field, Logger};
//!
//! let logger = Logger::new(vec![config::set_log_type("console")]);
//!
//! info!(logger, "Server started");
//! info!(logger, "listening on port %d", 8080, Field::new("tls", true));
//!
//! let request = http::Request::builder().uri("/v1/orders").body(()).unwrap();
//! warn_f!(logger, &request, "orders", "slow upstream: %dms", 950);
//! ```

/// Log at an explicit level without context.
///
/// ```no_run
/// # use request_logger::{config, Logger, LogLevel};
/// # let logger = Logger::new(vec![config::set_log_type("console")]);
/// use request_logger::log;
/// log!(logger, LogLevel::Error, "exit code %d", 2);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            $level,
            $crate::CallContext::Absent,
            $crate::LogLevel::as_str(&$level),
            $template,
            &[$($crate::Arg::from($arg)),*],
        )
    };
}

/// Log an info-level message titled `info`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.info($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log a warning titled `warn`.
///
/// ```no_run
/// # use request_logger::{config, Logger};
/// # let logger = Logger::new(vec![config::set_log_type("console")]);
/// use request_logger::warn;
/// warn!(logger, "retry %d of %d", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log an error titled `error`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.error($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log an info-level message with a context and a title.
#[macro_export]
macro_rules! info_f {
    ($logger:expr, $ctx:expr, $title:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.info_f($ctx, $title, $template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log a warning with a context and a title.
#[macro_export]
macro_rules! warn_f {
    ($logger:expr, $ctx:expr, $title:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn_f($ctx, $title, $template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Log an error with a context and a title.
#[macro_export]
macro_rules! error_f {
    ($logger:expr, $ctx:expr, $title:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.error_f($ctx, $title, $template, &[$($crate::Arg::from($arg)),*])
    };
}
