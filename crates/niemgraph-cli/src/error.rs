// Dweve NIEM Graph - Document to Property Graph Conversion
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured error types for the niemgraph CLI.
//!
//! Every command returns `Result<T, CliError>`; `main` prints the error and
//! exits with a failure status.

use std::io;
use std::path::PathBuf;

use niemgraph_core::ConversionError;
use niemgraph_neo4j::Neo4jError;
use thiserror::Error;

/// The main error type for CLI operations.
///
/// # Examples
///
/// ```rust,no_run
/// use niemgraph_cli::error::CliError;
///
/// fn read(path: &str) -> Result<Vec<u8>, CliError> {
///     std::fs::read(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O operation failed (file read, write, or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input exceeds the maximum file size.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// Input format could not be determined.
    #[error("cannot tell whether '{path}' is XML or JSON, use --input-format")]
    UnknownFormat {
        /// The file path
        path: PathBuf,
    },

    /// Conversion failed.
    #[error("{path}: {source}")]
    Conversion {
        /// Input file, or `<batch>` for shared conversions
        path: String,
        /// The underlying error
        #[source]
        source: ConversionError,
    },

    /// Cypher generation failed.
    #[error("Cypher export error: {0}")]
    Cypher(#[from] Neo4jError),

    /// A configuration or mapping file could not be loaded.
    #[error("invalid configuration in '{path}': {message}")]
    Config {
        /// The file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// JSON serialization of the output failed.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// Some documents of a batch failed.
    #[error("{failed} of {total} documents failed")]
    BatchFailed {
        /// Number of failed documents
        failed: usize,
        /// Number of documents in the batch
        total: usize,
    },

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// File-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Conversion error for one input.
    pub fn conversion(path: impl Into<String>, source: ConversionError) -> Self {
        Self::Conversion {
            path: path.into(),
            source,
        }
    }

    /// Configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::JsonFormat {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path() {
        let err = CliError::io_error(
            "missing.xml",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "I/O error for 'missing.xml': not found");
    }

    #[test]
    fn test_file_too_large_reports_megabytes() {
        let err = CliError::file_too_large("big.xml", 3 * 1024 * 1024, 2 * 1024 * 1024);
        assert!(err.to_string().contains("(2 MB)"));
    }

    #[test]
    fn test_conversion_error_names_input() {
        let err = CliError::conversion(
            "report.xml",
            ConversionError::DanglingReference {
                raw_id: "P99".to_string(),
                path: "/r/x".to_string(),
            },
        );
        let message = err.to_string();
        assert!(message.starts_with("report.xml: "));
        assert!(message.contains("P99"));
    }

    #[test]
    fn test_batch_failed_message() {
        let err = CliError::BatchFailed { failed: 1, total: 3 };
        assert_eq!(err.to_string(), "1 of 3 documents failed");
    }
}
