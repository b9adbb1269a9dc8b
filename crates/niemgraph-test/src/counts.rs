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

//! Graph shape summaries for assertions.

use niemgraph_core::{EdgeType, Graph};

/// Node and edge counts of a graph, broken down by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphCounts {
    /// All nodes.
    pub nodes: usize,
    /// All edges.
    pub edges: usize,
    /// Hub nodes.
    pub hubs: usize,
    /// Association nodes.
    pub associations: usize,
    /// CONTAINS edges.
    pub contains: usize,
    /// REPRESENTS edges.
    pub represents: usize,
    /// ASSOCIATED_WITH edges.
    pub associated_with: usize,
    /// REFERS_TO edges.
    pub refers_to: usize,
}

impl GraphCounts {
    /// Count a graph.
    pub fn of(graph: &Graph) -> Self {
        let by_type = graph.edge_type_counts();
        let edges = |t: EdgeType| by_type.get(&t).copied().unwrap_or(0);
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            hubs: graph.hubs().count(),
            associations: graph.associations().count(),
            contains: edges(EdgeType::Contains),
            represents: edges(EdgeType::Represents),
            associated_with: edges(EdgeType::AssociatedWith),
            refers_to: edges(EdgeType::RefersTo),
        }
    }
}

/// Compare two graphs by shape: node signatures and edge type counts.
/// Ids are ignored since they carry the document fingerprint.
pub fn same_shape(a: &Graph, b: &Graph) -> Result<(), String> {
    if a.signatures() != b.signatures() {
        return Err(format!(
            "node signatures differ:\n  left:  {:?}\n  right: {:?}",
            a.signatures(),
            b.signatures()
        ));
    }
    if a.edge_type_counts() != b.edge_type_counts() {
        return Err(format!(
            "edge counts differ: {:?} vs {:?}",
            a.edge_type_counts(),
            b.edge_type_counts()
        ));
    }
    Ok(())
}
