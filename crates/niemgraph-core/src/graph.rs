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

//! Output property graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Warning;

/// A property value: one scalar or a list of scalars.
///
/// Scalars are kept in their lexical form so that XML text and JSON scalars
/// of the same document compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Single value.
    Single(String),
    /// Repeated values in document order.
    Many(Vec<String>),
}

impl PropertyValue {
    /// The value when single.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Single(value) => Some(value),
            PropertyValue::Many(_) => None,
        }
    }

    /// All values.
    pub fn values(&self) -> Vec<&str> {
        match self {
            PropertyValue::Single(value) => vec![value.as_str()],
            PropertyValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Append a value, turning a single value into a list.
    pub fn push(&mut self, value: String) {
        match self {
            PropertyValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = PropertyValue::Many(vec![first, value]);
            }
            PropertyValue::Many(values) => values.push(value),
        }
    }

    fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Single(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Single(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        PropertyValue::Many(values)
    }
}

/// Property map with deterministic key order.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Set a property, appending when the key already exists.
pub fn append_property(properties: &mut Properties, key: impl Into<String>, value: String) {
    let key = key.into();
    match properties.get_mut(&key) {
        Some(existing) => existing.push(value),
        None => {
            properties.insert(key, PropertyValue::Single(value));
        }
    }
}

/// Merge a value, skipping values already present under the key.
pub fn merge_property(properties: &mut Properties, key: &str, value: &PropertyValue) {
    for item in value.values() {
        match properties.get_mut(key) {
            Some(existing) if existing.contains(item) => {}
            Some(existing) => existing.push(item.to_string()),
            None => {
                properties.insert(key.to_string(), PropertyValue::Single(item.to_string()));
            }
        }
    }
}

/// Flags set on special nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFlags {
    /// Synthesized hub.
    pub is_hub: bool,
    /// Association node.
    pub is_association: bool,
    /// Received augmentation content.
    pub is_augmentation_host: bool,
}

impl NodeFlags {
    fn is_empty(&self) -> bool {
        !(self.is_hub || self.is_association || self.is_augmentation_host)
    }
}

/// A typed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Fingerprint-qualified id.
    pub id: String,
    /// Qualified name or configured label.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Properties.
    pub properties: Properties,
    /// Flags.
    #[serde(default, skip_serializing_if = "NodeFlags::is_empty")]
    pub flags: NodeFlags,
    /// Types of the role nodes merged into a hub.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub role_types: BTreeSet<String>,
}

impl GraphNode {
    /// Create a node without properties.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            properties: Properties::new(),
            flags: NodeFlags::default(),
            role_types: BTreeSet::new(),
        }
    }

    /// Single property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_str)
    }

    /// Type plus sorted property keys.
    pub fn signature(&self) -> NodeSignature {
        NodeSignature {
            node_type: self.node_type.clone(),
            property_keys: self.properties.keys().cloned().collect(),
        }
    }
}

/// Edge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    /// Parent node to contained child node.
    Contains,
    /// Role node to hub.
    Represents,
    /// Association node to endpoint.
    AssociatedWith,
    /// Owner node to referenced node.
    RefersTo,
}

impl EdgeType {
    /// Relationship type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Contains => "CONTAINS",
            EdgeType::Represents => "REPRESENTS",
            EdgeType::AssociatedWith => "ASSOCIATED_WITH",
            EdgeType::RefersTo => "REFERS_TO",
        }
    }

    /// All edge types.
    pub const ALL: [EdgeType; 4] = [
        EdgeType::Contains,
        EdgeType::Represents,
        EdgeType::AssociatedWith,
        EdgeType::RefersTo,
    ];
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Deterministic id derived from endpoints, type and role.
    pub id: String,
    /// Edge type.
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Properties.
    pub properties: Properties,
}

impl GraphEdge {
    /// Create an edge; the id is derived from the other fields.
    pub fn new(
        edge_type: EdgeType,
        source: impl Into<String>,
        target: impl Into<String>,
        properties: Properties,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        let id = edge_id(edge_type, &source, &target, &properties);
        Self {
            id,
            edge_type,
            source,
            target,
            properties,
        }
    }

    /// Single property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_str)
    }
}

/// `source-[TYPE]->target`, with `:role` inside the brackets when present.
pub(crate) fn edge_id(
    edge_type: EdgeType,
    source: &str,
    target: &str,
    properties: &Properties,
) -> String {
    match properties.get("role").and_then(PropertyValue::as_str) {
        Some(role) => format!("{}-[{}:{}]->{}", source, edge_type, role, target),
        None => format!("{}-[{}]->{}", source, edge_type, target),
    }
}

/// Node type plus sorted property keys, used for format parity checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeSignature {
    /// Node type.
    pub node_type: String,
    /// Sorted property keys.
    pub property_keys: Vec<String>,
}

/// Converted property graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in creation order.
    pub nodes: Vec<GraphNode>,
    /// Edges in creation order.
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes of a type.
    pub fn nodes_of_type<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a GraphNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// Edges of a type.
    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Edges leaving a node.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Edges entering a node.
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.target == id)
    }

    /// Hub nodes.
    pub fn hubs(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.flags.is_hub)
    }

    /// Association nodes.
    pub fn associations(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.flags.is_association)
    }

    /// Edge count per type, every type present.
    pub fn edge_type_counts(&self) -> BTreeMap<EdgeType, usize> {
        let mut counts: BTreeMap<EdgeType, usize> =
            EdgeType::ALL.iter().map(|t| (*t, 0)).collect();
        for edge in &self.edges {
            *counts.entry(edge.edge_type).or_insert(0) += 1;
        }
        counts
    }

    /// Sorted node signatures (a multiset).
    pub fn signatures(&self) -> Vec<NodeSignature> {
        let mut signatures: Vec<_> = self.nodes.iter().map(GraphNode::signature).collect();
        signatures.sort();
        signatures
    }

    /// Set of node ids.
    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Set of edge ids.
    pub fn edge_ids(&self) -> BTreeSet<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }

    /// Node count per type.
    pub fn type_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Index from node id to position in [`Graph::nodes`].
    pub fn index(&self) -> HashMap<&str, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect()
    }

    /// Pretty JSON rendering.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// The graph.
    pub graph: Graph,
    /// Non-fatal problems in the order they were found.
    pub warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_property_builds_lists() {
        let mut props = Properties::new();
        append_property(&mut props, "nc:PersonMiddleName", "A".to_string());
        assert_eq!(props["nc:PersonMiddleName"], PropertyValue::from("A"));
        append_property(&mut props, "nc:PersonMiddleName", "B".to_string());
        append_property(&mut props, "nc:PersonMiddleName", "C".to_string());
        assert_eq!(
            props["nc:PersonMiddleName"],
            PropertyValue::Many(vec!["A".into(), "B".into(), "C".into()])
        );
    }

    #[test]
    fn test_merge_property_skips_duplicates() {
        let mut props = Properties::new();
        merge_property(&mut props, "priv:PrivacyCode", &PropertyValue::from("PII"));
        merge_property(&mut props, "priv:PrivacyCode", &PropertyValue::from("PII"));
        assert_eq!(props["priv:PrivacyCode"], PropertyValue::from("PII"));
        merge_property(
            &mut props,
            "priv:PrivacyCode",
            &PropertyValue::Many(vec!["PII".into(), "PHI".into()]),
        );
        assert_eq!(
            props["priv:PrivacyCode"],
            PropertyValue::Many(vec!["PII".into(), "PHI".into()])
        );
    }

    #[test]
    fn test_edge_id_includes_role() {
        let mut props = Properties::new();
        props.insert("role".to_string(), PropertyValue::from("nc:RoleOfPerson"));
        let edge = GraphEdge::new(EdgeType::Represents, "a", "b", props);
        assert_eq!(edge.id, "a-[REPRESENTS:nc:RoleOfPerson]->b");

        let plain = GraphEdge::new(EdgeType::Contains, "a", "b", Properties::new());
        assert_eq!(plain.id, "a-[CONTAINS]->b");
    }

    #[test]
    fn test_counts_and_signatures() {
        let mut graph = Graph::new();
        let mut person = GraphNode::new("f:P01", "nc:Person");
        person
            .properties
            .insert("nc:PersonSexCode".to_string(), PropertyValue::from("M"));
        graph.nodes.push(GraphNode::new("f:root", "cd:Root"));
        graph.nodes.push(person);
        graph.edges.push(GraphEdge::new(
            EdgeType::Contains,
            "f:root",
            "f:P01",
            Properties::new(),
        ));

        let counts = graph.edge_type_counts();
        assert_eq!(counts[&EdgeType::Contains], 1);
        assert_eq!(counts[&EdgeType::RefersTo], 0);
        assert_eq!(graph.signatures().len(), 2);
        assert_eq!(graph.node("f:P01").map(|n| n.node_type.as_str()), Some("nc:Person"));
        assert_eq!(graph.outgoing("f:root").count(), 1);
        assert_eq!(graph.incoming("f:P01").count(), 1);
        assert_eq!(graph.type_counts()["cd:Root"], 1);
    }

    #[test]
    fn test_json_uses_type_names() {
        let mut graph = Graph::new();
        let mut hub = GraphNode::new("f:hub:P01", "Entity");
        hub.flags.is_hub = true;
        graph.nodes.push(hub);
        let json = graph.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"Entity\""));
        assert!(json.contains("\"isHub\": true"));
    }
}
