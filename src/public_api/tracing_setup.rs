/*
 *   Copyright (c) 2025 the rawline authors
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! Optional tracing bring-up for programs embedding the editor.
//!
//! The editor owns stdout while a read is in progress, so logs go to a file:
//! a [`tracing_appender`] rolling appender that never rolls. The library
//! itself only emits events (unrecognized escape sequences, history file
//! truncation); calling [`init`] is entirely optional.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Fields:
/// - `level`: [tracing::Level] - The maximum log level to record.
/// - `log_file_path_and_prefix`: [String] - The file path and prefix to use
///   for the log file. Eg: `/tmp/my_repl` or `my_repl`.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub level: tracing::Level,
    pub log_file_path_and_prefix: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            log_file_path_and_prefix: "rawline_log".to_string(),
        }
    }
}

/// Initialize the global tracing subscriber writing to the configured file.
///
/// More info:
/// - [Configure
///   subscriber](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/fmt/index.html#configuration)
/// - [Rolling file appender](https://docs.rs/tracing-appender/latest/tracing_appender/)
///
/// # Errors
///
/// Returns an error if the log file location is unusable or a global
/// subscriber is already installed.
pub fn init(tracing_config: TracingConfig) -> miette::Result<()> {
    let TracingConfig {
        level,
        log_file_path_and_prefix,
    } = tracing_config;

    let writer_log =
        try_create_log_file_appender(log_file_path_and_prefix.as_str())?.with_max_level(level);

    let subscriber = tracing_subscriber::fmt()
        .compact() /* one line output */
        .with_max_level(level)
        .without_time()
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(writer_log)
        .finish();
    tracing::subscriber::set_global_default(subscriber).into_diagnostic()?;

    Ok(())
}

/// Appender over `<parent>/<stem>`, writing synchronously. Do not hand it to
/// [`tracing_appender::non_blocking`]: the worker-thread guard that call
/// returns has no owner here, and dropping it silences the log.
fn try_create_log_file_appender(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);
    let unusable =
        |what: &str| miette::miette!("log file path {} has no {what}", path.display());

    let parent = path.parent().ok_or_else(|| unusable("parent directory"))?;
    let file_stem = path.file_stem().ok_or_else(|| unusable("file name"))?;
    Ok(tracing_appender::rolling::never(parent, file_stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_logs_at_debug() {
        let config = TracingConfig::default();
        assert_eq!(config.level, tracing::Level::DEBUG);
        assert_eq!(config.log_file_path_and_prefix, "rawline_log");
    }

    #[test]
    fn test_appender_rejects_a_bare_root_path() {
        assert!(try_create_log_file_appender("/").is_err());
    }
}
