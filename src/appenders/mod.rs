//! Appender implementations

pub mod console;
pub mod json;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use json::JsonAppender;
pub use rotating_file::{RotatingFileWriter, RotationOptions};

pub use crate::core::Appender;
