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

//! Configuration for Cypher generation.

use serde::{Deserialize, Serialize};

/// Default maximum string length for property values: 100 MB.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 100 * 1024 * 1024;

/// Configuration for [`to_cypher`](crate::to_cypher) and friends.
///
/// # Examples
///
/// ```
/// use niemgraph_neo4j::ToCypherConfig;
///
/// let config = ToCypherConfig::new()
///     .with_create()
///     .without_constraints()
///     .with_batch_size(500);
/// assert!(!config.use_merge);
/// assert!(!config.create_constraints);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToCypherConfig {
    /// Use MERGE instead of CREATE for idempotent imports (default: true).
    pub use_merge: bool,

    /// Generate uniqueness constraints on the id property per label (default: true).
    pub create_constraints: bool,

    /// Property holding the graph node or edge id (default: "_niem_id").
    pub id_property: String,

    /// Rows per UNWIND statement (default: 1000).
    pub batch_size: usize,

    /// Store the node type as a property as well as a label (default: false).
    pub include_type_metadata: bool,

    /// Property name for the node type (default: "_niem_type").
    pub type_property: String,

    /// Store hub, association and augmentation-host flags as boolean
    /// properties (default: true).
    pub include_flags: bool,

    /// Generate comments in output (default: true).
    pub include_comments: bool,

    /// Maximum string length for property values (default: 100MB, None = unlimited).
    pub max_string_length: Option<usize>,

    /// Maximum number of nodes to export (default: None = unlimited).
    pub max_nodes: Option<usize>,
}

impl Default for ToCypherConfig {
    fn default() -> Self {
        Self {
            use_merge: true,
            create_constraints: true,
            id_property: "_niem_id".to_string(),
            batch_size: 1000,
            include_type_metadata: false,
            type_property: "_niem_type".to_string(),
            include_flags: true,
            include_comments: true,
            max_string_length: Some(DEFAULT_MAX_STRING_LENGTH),
            max_nodes: None,
        }
    }
}

impl ToCypherConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use CREATE instead of MERGE.
    pub fn with_create(mut self) -> Self {
        self.use_merge = false;
        self
    }

    /// Skip constraint generation.
    pub fn without_constraints(mut self) -> Self {
        self.create_constraints = false;
        self
    }

    /// Set the id property name.
    pub fn with_id_property(mut self, name: impl Into<String>) -> Self {
        self.id_property = name.into();
        self
    }

    /// Set the UNWIND batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Store the node type as a property.
    pub fn with_type_metadata(mut self) -> Self {
        self.include_type_metadata = true;
        self
    }

    /// Drop flag properties.
    pub fn without_flags(mut self) -> Self {
        self.include_flags = false;
        self
    }

    /// Disable comments in output.
    pub fn without_comments(mut self) -> Self {
        self.include_comments = false;
        self
    }

    /// Set maximum string length for property values.
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(max);
        self
    }

    /// Remove the string length limit.
    pub fn without_string_length_limit(mut self) -> Self {
        self.max_string_length = None;
        self
    }

    /// Set maximum number of nodes to export.
    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = Some(max);
        self
    }

    /// Conservative limits for graphs built from untrusted documents:
    /// 1MB strings, 100K nodes, batches of 100, no comments.
    pub fn for_untrusted_input() -> Self {
        Self {
            max_string_length: Some(1_000_000),
            max_nodes: Some(100_000),
            batch_size: 100,
            include_comments: false,
            ..Default::default()
        }
    }

    pub(crate) fn keyword(&self) -> &'static str {
        if self.use_merge {
            "MERGE"
        } else {
            "CREATE"
        }
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
