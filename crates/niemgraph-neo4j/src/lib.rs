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

//! Cypher export for NIEM property graphs
//!
//! Turns a [`Graph`](niemgraph_core::Graph) produced by `niemgraph-core` into
//! a Cypher script for Neo4j (or any openCypher store):
//!
//! - `CREATE CONSTRAINT ... IS UNIQUE` on the id property for every label
//! - batched `UNWIND $rows AS row MERGE (n:Label {id}) SET n += row.properties`
//! - relationships grouped by type and endpoint labels, matched by id
//!
//! Statements can be rendered to one string ([`to_cypher`]), streamed to a
//! writer ([`to_cypher_stream`]) or kept as parameterized statements for a
//! driver ([`to_cypher_statements`], [`to_cypher_json`]).
//!
//! # Example
//!
//! ```rust
//! use niemgraph_core::{convert, ConvertConfig, ElementNode, ElementTree, QName};
//! use niemgraph_neo4j::{to_cypher, ToCypherConfig};
//!
//! let root = ElementNode::new(QName::local("Report"))
//!     .with_child(ElementNode::new(QName::local("Person")).with_id("P01"));
//! let tree = ElementTree::from_source(root, b"<Report/>");
//! let graph = convert(&tree, &ConvertConfig::default()).unwrap().graph;
//!
//! let cypher = to_cypher(&graph, &ToCypherConfig::default()).unwrap();
//! assert!(cypher.contains("MERGE (from)-[rel:CONTAINS"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod cypher;
pub mod error;
pub mod to_cypher;

pub use config::{ToCypherConfig, DEFAULT_MAX_STRING_LENGTH};
pub use cypher::{CypherScript, CypherStatement, CypherValue, StatementType};
pub use error::{Neo4jError, Result};
pub use to_cypher::{to_cypher, to_cypher_json, to_cypher_statements, to_cypher_stream};
