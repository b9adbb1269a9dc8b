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

//! Error and warning types for document conversion.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal conversion error.
///
/// Every variant raised while walking a document carries the path of the
/// offending element (`/cd:Root/j:Crash/nc:RoleOfPerson[2]`), so callers can
/// point at the exact spot in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Malformed input, raised by a normalizer.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the failure, including position when known.
        message: String,
    },

    /// A reference names an identifier that no element declares.
    #[error("dangling reference to '{raw_id}' at {path}")]
    DanglingReference {
        /// Identifier as written in the document.
        raw_id: String,
        /// Path of the referencing element.
        path: String,
    },

    /// Strict mapping mode met a complex element without a mapping rule.
    #[error("no mapping rule for type '{type_name}' at {path}")]
    MissingMapping {
        /// Qualified name of the unmapped element.
        type_name: String,
        /// Path of the element.
        path: String,
    },

    /// The same identifier was declared on elements of different types.
    #[error(
        "identifier '{raw_id}' declared as {first_type} at {first_path} and as {second_type} at {second_path}"
    )]
    IdCollision {
        /// Identifier as written in the document.
        raw_id: String,
        /// Qualified name of the first declaration.
        first_type: String,
        /// Path of the first declaration.
        first_path: String,
        /// Qualified name of the conflicting declaration.
        second_type: String,
        /// Path of the conflicting declaration.
        second_path: String,
    },

    /// A configured resource limit was exceeded.
    #[error("{limit} limit exceeded: {actual} > {max} at {path}")]
    LimitExceeded {
        /// Which limit (`depth`, `nodes`).
        limit: String,
        /// Configured maximum.
        max: usize,
        /// Value reached.
        actual: usize,
        /// Path of the element that crossed the limit.
        path: String,
    },
}

impl ConversionError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        ConversionError::Parse {
            message: message.into(),
        }
    }

    /// Element path carried by the error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConversionError::Parse { .. } => None,
            ConversionError::DanglingReference { path, .. }
            | ConversionError::MissingMapping { path, .. }
            | ConversionError::LimitExceeded { path, .. } => Some(path),
            ConversionError::IdCollision { second_path, .. } => Some(second_path),
        }
    }

    pub(crate) fn depth_exceeded(max: usize, actual: usize, path: &str) -> Self {
        ConversionError::LimitExceeded {
            limit: "depth".to_string(),
            max,
            actual,
            path: path.to_string(),
        }
    }

    pub(crate) fn nodes_exceeded(max: usize, actual: usize, path: &str) -> Self {
        ConversionError::LimitExceeded {
            limit: "nodes".to_string(),
            max,
            actual,
            path: path.to_string(),
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Category of a non-fatal problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Reference omitted under a lenient policy.
    DanglingReference,
    /// Unmapped type classified structurally.
    MissingMapping,
    /// Metadata id that names no metadata block.
    MetadataResolution,
    /// Association with fewer than two resolved endpoints.
    AssociationDemoted,
    /// Identifier declared by more than one document in a shared batch.
    DuplicateDeclaration,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::DanglingReference => "dangling reference",
            WarningKind::MissingMapping => "missing mapping",
            WarningKind::MetadataResolution => "metadata resolution",
            WarningKind::AssociationDemoted => "association demoted",
            WarningKind::DuplicateDeclaration => "duplicate declaration",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem collected during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Category.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
    /// Path of the element the warning is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Warning {
    /// Create a warning attached to an element path.
    pub fn new(kind: WarningKind, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a warning with no element path.
    pub fn detached(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {} at {}", self.kind, self.message, path),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_reference_display() {
        let err = ConversionError::DanglingReference {
            raw_id: "P99".to_string(),
            path: "/cd:Root/j:CrashDriver/nc:RoleOfPerson".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("P99"));
        assert!(msg.contains("/cd:Root/j:CrashDriver/nc:RoleOfPerson"));
        assert_eq!(err.path(), Some("/cd:Root/j:CrashDriver/nc:RoleOfPerson"));
    }

    #[test]
    fn test_id_collision_display() {
        let err = ConversionError::IdCollision {
            raw_id: "X1".to_string(),
            first_type: "nc:Person".to_string(),
            first_path: "/r:Root/nc:Person".to_string(),
            second_type: "j:Charge".to_string(),
            second_path: "/r:Root/j:Charge".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("nc:Person"));
        assert!(msg.contains("j:Charge"));
        assert_eq!(err.path(), Some("/r:Root/j:Charge"));
    }

    #[test]
    fn test_limit_exceeded_display() {
        let err = ConversionError::depth_exceeded(10, 11, "/a");
        assert_eq!(err.to_string(), "depth limit exceeded: 11 > 10 at /a");
    }

    #[test]
    fn test_parse_error_has_no_path() {
        let err = ConversionError::parse("unexpected end of input");
        assert_eq!(err.path(), None);
        assert!(err.to_string().starts_with("parse error"));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::new(WarningKind::MetadataResolution, "unknown metadata 'M9'", "/a/b");
        assert_eq!(
            warning.to_string(),
            "metadata resolution: unknown metadata 'M9' at /a/b"
        );
        let detached = Warning::detached(WarningKind::DuplicateDeclaration, "P01 declared twice");
        assert_eq!(detached.to_string(), "duplicate declaration: P01 declared twice");
    }
}
