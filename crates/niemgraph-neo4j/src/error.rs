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

//! Error types for Cypher generation.

use thiserror::Error;

/// Errors raised while turning a graph into Cypher.
#[derive(Debug, Error)]
pub enum Neo4jError {
    /// Identifier that cannot be used even after escaping.
    #[error("invalid Cypher identifier: '{0}'")]
    InvalidIdentifier(String),

    /// String length limit exceeded.
    #[error("String length {length} exceeds maximum allowed length {max_length} for property '{property}'")]
    StringLengthExceeded {
        /// Actual length of the string.
        length: usize,
        /// Maximum allowed length.
        max_length: usize,
        /// Property name where the violation occurred.
        property: String,
    },

    /// Node count limit exceeded.
    #[error("Node count {count} exceeds maximum allowed count {max_count}")]
    NodeCountExceeded {
        /// Number of nodes in the graph.
        count: usize,
        /// Maximum allowed nodes.
        max_count: usize,
    },

    /// Edge endpoint missing from the graph.
    #[error("edge {edge} points at unknown node {node}")]
    UnknownEndpoint {
        /// Edge id.
        edge: String,
        /// Missing node id.
        node: String,
    },

    /// Writing the script failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error from serde_json.
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<std::io::Error> for Neo4jError {
    fn from(err: std::io::Error) -> Self {
        Neo4jError::Io(err.to_string())
    }
}

/// Result type alias for Cypher generation.
pub type Result<T> = std::result::Result<T, Neo4jError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_string_length() {
        let err = Neo4jError::StringLengthExceeded {
            length: 20,
            max_length: 10,
            property: "nc:PersonGivenName".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("10"));
        assert!(msg.contains("nc:PersonGivenName"));
    }

    #[test]
    fn test_error_display_unknown_endpoint() {
        let err = Neo4jError::UnknownEndpoint {
            edge: "a-[CONTAINS]->b".to_string(),
            node: "b".to_string(),
        };
        assert_eq!(err.to_string(), "edge a-[CONTAINS]->b points at unknown node b");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Neo4jError = io.into();
        assert!(matches!(err, Neo4jError::Io(ref m) if m.contains("pipe closed")));
    }
}
