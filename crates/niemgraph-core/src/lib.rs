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

//! Conversion of NIEM exchange documents into property graphs.
//!
//! The input is a normalized [`ElementTree`] (produced by `niemgraph-xml` or
//! `niemgraph-json`); the output is a [`Graph`] of typed nodes and typed
//! edges plus the warnings collected on the way.
//!
//! # Pipeline
//!
//! | Stage | Module | Result |
//! |-------|--------|--------|
//! | Resolver | [`resolve`] | deterministic node ids, reference table |
//! | Builder | [`build`] | nodes, properties, CONTAINS edges, pending links |
//! | Hub merger | [`hub`] | hub nodes, REPRESENTS edges |
//! | Association handler | `association` | ASSOCIATED_WITH edges |
//! | Augmentation flattener | `augmentation` | properties merged onto owners |
//! | Overlay | [`overlay`] | metadata merged onto nodes and edges |
//!
//! The builder runs per document. Everything after it runs in a
//! [`Reconciler`], which is what lets a shared-namespace batch resolve
//! references and hubs across documents.
//!
//! # Mapping
//!
//! | Element | Graph |
//! |---------|-------|
//! | complex element | node, CONTAINS edge from the nearest node ancestor |
//! | simple element | property `prefix:Name` on the nearest node |
//! | attribute of a leaf | property `prefix:Leaf@prefix:attr` |
//! | `structures:ref` pointer | REFERS_TO edge with `role` |
//! | `RoleOf*` pointers from two role nodes | hub node + REPRESENTS edges |
//! | association | node + ASSOCIATED_WITH edges |
//! | `*Augmentation` | properties on the owner, no node |
//! | `*Metadata` block | fields merged through metadata references, no node |
//!
//! # Example
//!
//! ```
//! use niemgraph_core::{convert, ConvertConfig, EdgeType, ElementNode, ElementTree, QName};
//!
//! let nc = |local: &str| QName::new("http://release.niem.gov/niem/niem-core/5.0/", "nc", local);
//! let root = ElementNode::new(nc("Report"))
//!     .with_child(
//!         ElementNode::new(nc("Person"))
//!             .with_id("P01")
//!             .with_child(ElementNode::leaf(nc("PersonGivenName"), "Ada")),
//!     )
//!     .with_child(
//!         ElementNode::new(nc("Witness"))
//!             .with_child(ElementNode::pointer(nc("RoleOfPerson"), "P01"))
//!             .with_child(ElementNode::leaf(nc("WitnessStatement"), "none")),
//!     );
//! let tree = ElementTree::from_source(root, b"<report/>");
//!
//! let conversion = convert(&tree, &ConvertConfig::default())?;
//! let graph = &conversion.graph;
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edges_of_type(EdgeType::Contains).count(), 2);
//! assert_eq!(graph.edges_of_type(EdgeType::RefersTo).count(), 1);
//! # Ok::<(), niemgraph_core::ConversionError>(())
//! ```

#![deny(missing_docs)]

mod association;
mod augmentation;
pub mod batch;
pub mod build;
pub mod classify;
pub mod config;
pub mod error;
pub mod graph;
pub mod hub;
pub mod overlay;
pub mod reconcile;
pub mod resolve;
pub mod tree;

pub use batch::{BatchConfig, BatchConverter, BatchResults, DocumentResult};
pub use build::PartialGraph;
pub use classify::{classify, Shape};
pub use config::{ConversionMode, ConvertConfig, ConvertConfigBuilder, MappingTable, Rule};
pub use error::{ConversionError, Result, Warning, WarningKind};
pub use graph::{
    Conversion, EdgeType, Graph, GraphEdge, GraphNode, NodeFlags, NodeSignature, Properties,
    PropertyValue,
};
pub use hub::{HubKey, HubRegistry};
pub use overlay::MetadataRegistry;
pub use reconcile::{HubScope, Reconciler};
pub use resolve::{ReferenceTable, Resolution, Resolver, UnresolvedReference};
pub use tree::{conventional_prefix, ElementKind, ElementNode, ElementTree, Fingerprint, PrefixTable, QName};

/// Convert one document.
///
/// Fatal errors return no graph at all; non-fatal problems are listed in
/// [`Conversion::warnings`].
pub fn convert(tree: &ElementTree, config: &ConvertConfig) -> Result<Conversion> {
    let resolution = Resolver::new(config).resolve(tree)?;
    let partial = build::build(tree, &resolution, config)?;
    let mut reconciler = Reconciler::new(config);
    reconciler.add(partial);
    reconciler.finish()
}

/// Build the per-document half of the pipeline, leaving unresolved
/// references for a shared-namespace [`Reconciler`].
pub fn build_partial(tree: &ElementTree, config: &ConvertConfig) -> Result<PartialGraph> {
    let resolution = Resolver::new(config).deferring().resolve(tree)?;
    build::build(tree, &resolution, config)
}
