//! Global log stream instances.
//!
//! One stream per producer context.

use crate::logging::LogStream;

/// RT log stream (sampling loop only).
///
/// Single producer (sampling loop), single consumer (log drain).
pub static RT_LOG_STREAM: LogStream = LogStream::new();

/// Background log stream (startup, configuration).
///
/// Single producer (main task, before and after the sampling loop), single
/// consumer (log drain). The drain task never pushes here; it writes its own
/// reports straight to its sink.
pub static BG_LOG_STREAM: LogStream = LogStream::new();
