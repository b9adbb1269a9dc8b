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

//! Per-document graph construction.
//!
//! The builder consumes the resolver's ids in the same pre-order and turns
//! each element into a node, a property, a pending link or a metadata field.
//! Work that needs the whole document, or the whole batch, is recorded on the
//! [`PartialGraph`] and finished by the [`Reconciler`](crate::Reconciler).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::classify::{classify, is_role_pointer, is_unmapped, Shape};
use crate::config::ConvertConfig;
use crate::error::{ConversionError, Result, Warning, WarningKind};
use crate::graph::{append_property, EdgeType, GraphNode, Properties, PropertyValue};
use crate::resolve::{ReferenceStatus, Resolution};
use crate::tree::{ElementNode, ElementTree, Fingerprint};

/// Edge waiting for the metadata overlay.
#[derive(Debug, Clone)]
pub(crate) struct EdgeDraft {
    pub edge_type: EdgeType,
    pub source: String,
    pub target: String,
    pub properties: Properties,
    pub relationship_metadata: Vec<String>,
    pub scope: Fingerprint,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkKind {
    Reference,
    Role,
    Endpoint,
}

/// Reference whose edge type depends on later phases.
#[derive(Debug, Clone)]
pub(crate) struct PendingLink {
    pub kind: LinkKind,
    pub owner: String,
    pub raw_id: String,
    /// `None` until resolved across documents.
    pub target: Option<String>,
    pub properties: Properties,
    pub relationship_metadata: Vec<String>,
    pub scope: Fingerprint,
    pub path: String,
    pub nil: bool,
}

impl PendingLink {
    pub(crate) fn into_edge(self, edge_type: EdgeType, target: String) -> EdgeDraft {
        EdgeDraft {
            edge_type,
            source: self.owner,
            target,
            properties: self.properties,
            relationship_metadata: self.relationship_metadata,
            scope: self.scope,
            path: self.path,
        }
    }
}

/// Leaf content of one augmentation element.
#[derive(Debug, Clone)]
pub(crate) struct AugmentationPatch {
    pub owner: String,
    pub augmentation: String,
    pub properties: Properties,
}

/// Object-level metadata ids attached to a node.
#[derive(Debug, Clone)]
pub(crate) struct MetadataAttachment {
    pub node: String,
    pub ids: Vec<String>,
    pub scope: Fingerprint,
    pub path: String,
}

/// Output of the per-document phase.
///
/// Nodes, containment edges and properties are final. Reference links, hub
/// candidates, augmentation content and metadata references are kept for the
/// reconciler.
#[derive(Debug, Clone)]
pub struct PartialGraph {
    pub(crate) fingerprint: Fingerprint,
    pub(crate) source: Option<String>,
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) node_paths: HashMap<String, String>,
    pub(crate) edges: Vec<EdgeDraft>,
    pub(crate) links: Vec<PendingLink>,
    pub(crate) augmentations: Vec<AugmentationPatch>,
    pub(crate) metadata_blocks: BTreeMap<String, Properties>,
    pub(crate) attachments: Vec<MetadataAttachment>,
    pub(crate) aliases: HashMap<String, String>,
    pub(crate) declarations: Vec<(String, String)>,
    pub(crate) warnings: Vec<Warning>,
}

impl PartialGraph {
    /// Fingerprint of the source document.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Source label, if the tree carried one.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Nodes built so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Links still waiting for reconciliation.
    pub fn pending_links(&self) -> usize {
        self.links.len()
    }

    /// Warnings raised in the per-document phase.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Node,
    Augmentation(usize),
    Metadata(String),
}

#[derive(Debug, Clone)]
struct Owner {
    node: String,
    sink: Sink,
    association: bool,
}

/// Build the partial graph of one resolved document.
pub fn build(
    tree: &ElementTree,
    resolution: &Resolution,
    config: &ConvertConfig,
) -> Result<PartialGraph> {
    let mut builder = Builder {
        config,
        resolution,
        partial: PartialGraph {
            fingerprint: tree.fingerprint.clone(),
            source: tree.source.clone(),
            nodes: Vec::new(),
            index: HashMap::new(),
            node_paths: HashMap::new(),
            edges: Vec::new(),
            links: Vec::new(),
            augmentations: Vec::new(),
            metadata_blocks: BTreeMap::new(),
            attachments: Vec::new(),
            aliases: HashMap::new(),
            declarations: Vec::new(),
            warnings: resolution.warnings.clone(),
        },
        cursor: 0,
        unmapped: BTreeSet::new(),
    };
    builder.root(&tree.root)?;

    let partial = builder.partial;
    debug!(
        fingerprint = %partial.fingerprint,
        nodes = partial.nodes.len(),
        contains = partial.edges.len(),
        links = partial.links.len(),
        augmentations = partial.augmentations.len(),
        metadata_blocks = partial.metadata_blocks.len(),
        "built partial graph"
    );
    Ok(partial)
}

struct Builder<'a> {
    config: &'a ConvertConfig,
    resolution: &'a Resolution,
    partial: PartialGraph,
    cursor: usize,
    unmapped: BTreeSet<String>,
}

impl<'a> Builder<'a> {
    fn next_index(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }

    fn path(&self, index: usize) -> String {
        self.resolution.path(index).unwrap_or_default().to_string()
    }

    fn node_id(&self, index: usize) -> String {
        self.resolution.node_id(index).unwrap_or_default().to_string()
    }

    fn root(&mut self, root: &ElementNode) -> Result<()> {
        let index = self.next_index();
        let path = self.path(index);
        let shape = classify(root, self.config, &path)?;
        self.note_unmapped(root, &path);
        match shape {
            Shape::Association => self.entity(root, index, None, None, true),
            Shape::Entity { label } => self.entity(root, index, None, label, false),
            // a root has no owner to merge into
            _ => self.entity(root, index, None, None, false),
        }
    }

    fn visit(&mut self, element: &ElementNode, owner: &Owner) -> Result<()> {
        let index = self.next_index();
        let path = self.path(index);

        if let Sink::Metadata(_) = owner.sink {
            return self.leaf(element, index, owner, None);
        }

        let shape = classify(element, self.config, &path)?;
        self.note_unmapped(element, &path);
        match shape {
            Shape::Leaf => self.leaf(element, index, owner, None),
            Shape::ReferenceOnly { role } => {
                self.pointer(element, index, owner, role);
                Ok(())
            }
            Shape::Entity { label } => self.entity(element, index, Some(owner), label, false),
            Shape::Association => self.entity(element, index, Some(owner), None, true),
            Shape::Augmentation => self.augmentation(element, index, owner),
            Shape::Metadata => self.metadata(element, index),
        }
    }

    fn note_unmapped(&mut self, element: &ElementNode, path: &str) {
        if !is_unmapped(element, self.config) {
            return;
        }
        let type_name = element.name.to_string();
        if self.unmapped.insert(type_name.clone()) {
            debug!(type_name = %type_name, %path, "no mapping rule, classifying structurally");
            self.partial.warnings.push(Warning::new(
                WarningKind::MissingMapping,
                format!("no mapping rule for '{}', classified structurally", type_name),
                path,
            ));
        }
    }

    fn entity(
        &mut self,
        element: &ElementNode,
        index: usize,
        parent: Option<&Owner>,
        label: Option<String>,
        association: bool,
    ) -> Result<()> {
        let id = self.node_id(index);
        let path = self.path(index);

        if !self.partial.index.contains_key(&id) {
            if let Some(max) = self.config.max_nodes {
                if self.partial.nodes.len() >= max {
                    return Err(ConversionError::nodes_exceeded(
                        max,
                        self.partial.nodes.len() + 1,
                        &path,
                    ));
                }
            }
            let node_type = label.unwrap_or_else(|| element.name.to_string());
            self.partial
                .index
                .insert(id.clone(), self.partial.nodes.len());
            self.partial.nodes.push(GraphNode::new(id.clone(), node_type));
            self.partial.node_paths.insert(id.clone(), path.clone());
            if let Some(raw) = &element.declared_id {
                self.partial.declarations.push((raw.clone(), id.clone()));
            }
        }

        let own = Owner {
            node: id.clone(),
            sink: Sink::Node,
            association,
        };
        if association {
            if let Some(node) = self.node_mut(&id) {
                node.flags.is_association = true;
            }
        }
        for (name, value) in &element.attributes {
            self.put(&own, name.to_string(), value.clone());
        }
        if let Some(text) = element.text.as_ref().filter(|t| !t.is_empty()) {
            self.put(&own, "value".to_string(), text.clone());
        }

        if let Some(parent) = parent {
            self.partial.edges.push(EdgeDraft {
                edge_type: EdgeType::Contains,
                source: parent.node.clone(),
                target: id.clone(),
                properties: Properties::new(),
                relationship_metadata: element.relationship_metadata.clone(),
                scope: self.partial.fingerprint.clone(),
                path: path.clone(),
            });
        }
        self.attach_metadata(&id, &element.metadata, &path);

        if element.reference.is_some() {
            self.pointer(element, index, &own, false);
        }

        for child in &element.children {
            self.visit(child, &own)?;
        }
        Ok(())
    }

    fn leaf(
        &mut self,
        element: &ElementNode,
        index: usize,
        owner: &Owner,
        prefix: Option<&str>,
    ) -> Result<()> {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, element.name),
            None => element.name.to_string(),
        };
        let path = self.path(index);

        match &element.text {
            Some(text) => self.put(owner, key.clone(), text.clone()),
            None if !element.nil && element.children.is_empty() => {
                self.put(owner, key.clone(), String::new())
            }
            None => {}
        }
        for attribute in element.attribute_nodes() {
            let value = attribute.text.unwrap_or_default();
            self.put(owner, format!("{}@{}", key, attribute.name), value);
        }
        if !matches!(owner.sink, Sink::Metadata(_)) {
            self.attach_metadata(&owner.node, &element.metadata, &path);
            if element.reference.is_some() {
                self.pointer(element, index, owner, false);
            }
        }

        for child in &element.children {
            let child_index = self.next_index();
            if child.is_reference_only() && !matches!(owner.sink, Sink::Metadata(_)) {
                let role = is_role_pointer(child, self.config);
                self.pointer(child, child_index, owner, role);
            } else {
                self.leaf(child, child_index, owner, Some(&key))?;
            }
        }
        Ok(())
    }

    fn pointer(&mut self, element: &ElementNode, index: usize, owner: &Owner, role: bool) {
        let Some(raw_id) = element.reference.clone() else {
            return;
        };
        let target = match self.resolution.reference(index) {
            Some(ReferenceStatus::Resolved(id)) => Some(id.clone()),
            Some(ReferenceStatus::Deferred) => None,
            Some(ReferenceStatus::Omitted) | None => return,
        };
        let kind = if role {
            LinkKind::Role
        } else if owner.association && element.is_reference_only() {
            LinkKind::Endpoint
        } else {
            LinkKind::Reference
        };

        let mut properties = Properties::new();
        properties.insert(
            "role".to_string(),
            PropertyValue::Single(element.name.to_string()),
        );
        if element.is_reference_only() {
            for (name, value) in &element.attributes {
                // `role` names the pointer element itself
                let key = match name.to_string() {
                    key if key == "role" => "@role".to_string(),
                    key => key,
                };
                append_property(&mut properties, key, value.clone());
            }
        }
        let mut relationship_metadata = element.relationship_metadata.clone();
        if element.is_reference_only() {
            relationship_metadata.extend(element.metadata.iter().cloned());
        }

        self.partial.links.push(PendingLink {
            kind,
            owner: owner.node.clone(),
            raw_id,
            target,
            properties,
            relationship_metadata,
            scope: self.partial.fingerprint.clone(),
            path: self.path(index),
            nil: element.nil,
        });
    }

    fn augmentation(&mut self, element: &ElementNode, index: usize, owner: &Owner) -> Result<()> {
        let path = self.path(index);
        if element.declared_id.is_some() {
            let alias = self.node_id(index);
            self.partial.aliases.insert(alias, owner.node.clone());
        }
        self.partial.augmentations.push(AugmentationPatch {
            owner: owner.node.clone(),
            augmentation: element.name.to_string(),
            properties: Properties::new(),
        });
        let patch = self.partial.augmentations.len() - 1;
        self.attach_metadata(&owner.node, &element.metadata, &path);

        let inner = Owner {
            node: owner.node.clone(),
            sink: Sink::Augmentation(patch),
            association: owner.association,
        };
        for (name, value) in &element.attributes {
            self.put(&inner, format!("{}@{}", element.name, name), value.clone());
        }
        for child in &element.children {
            self.visit(child, &inner)?;
        }
        Ok(())
    }

    fn metadata(&mut self, element: &ElementNode, index: usize) -> Result<()> {
        let Some(raw_id) = element.declared_id.clone() else {
            // unreachable block: consume its ids and move on
            warn!(path = %self.path(index), "metadata block without an identifier");
            self.cursor += element.subtree_size() - 1;
            return Ok(());
        };
        self.partial.metadata_blocks.entry(raw_id.clone()).or_default();
        let owner = Owner {
            node: String::new(),
            sink: Sink::Metadata(raw_id),
            association: false,
        };
        for child in &element.children {
            self.visit(child, &owner)?;
        }
        Ok(())
    }

    fn put(&mut self, owner: &Owner, key: String, value: String) {
        match &owner.sink {
            Sink::Node => {
                if let Some(node) = self.node_mut(&owner.node) {
                    append_property(&mut node.properties, key, value);
                }
            }
            Sink::Augmentation(patch) => {
                if let Some(patch) = self.partial.augmentations.get_mut(*patch) {
                    append_property(&mut patch.properties, key, value);
                }
            }
            Sink::Metadata(raw_id) => {
                let block = self
                    .partial
                    .metadata_blocks
                    .entry(raw_id.clone())
                    .or_default();
                append_property(block, key, value);
            }
        }
    }

    fn attach_metadata(&mut self, node: &str, ids: &[String], path: &str) {
        if ids.is_empty() {
            return;
        }
        self.partial.attachments.push(MetadataAttachment {
            node: node.to_string(),
            ids: ids.to_vec(),
            scope: self.partial.fingerprint.clone(),
            path: path.to_string(),
        });
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        let position = *self.partial.index.get(id)?;
        self.partial.nodes.get_mut(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolver;
    use crate::tree::QName;

    fn nc(local: &str) -> QName {
        QName::new("urn:core", "nc", local)
    }

    fn j(local: &str) -> QName {
        QName::new("urn:justice", "j", local)
    }

    fn partial(root: ElementNode, config: &ConvertConfig) -> Result<PartialGraph> {
        let tree = ElementTree::from_source(root, b"builder-test");
        let resolution = Resolver::new(config).resolve(&tree)?;
        build(&tree, &resolution, config)
    }

    #[test]
    fn test_leaves_become_properties() {
        let root = ElementNode::new(nc("Person"))
            .with_child(ElementNode::leaf(nc("PersonGivenName"), "Peter"))
            .with_child(ElementNode::leaf(nc("PersonMiddleName"), "A"))
            .with_child(ElementNode::leaf(nc("PersonMiddleName"), "B"))
            .with_child(ElementNode::new(nc("PersonSuffix")).with_nil())
            .with_child(ElementNode::new(nc("PersonTitle")));
        let built = partial(root, &ConvertConfig::default()).unwrap();

        assert_eq!(built.nodes.len(), 1);
        let props = &built.nodes[0].properties;
        assert_eq!(props["nc:PersonGivenName"], PropertyValue::from("Peter"));
        assert_eq!(
            props["nc:PersonMiddleName"],
            PropertyValue::Many(vec!["A".into(), "B".into()])
        );
        assert!(!props.contains_key("nc:PersonSuffix"));
        assert_eq!(props["nc:PersonTitle"], PropertyValue::from(""));
    }

    #[test]
    fn test_attribute_keys() {
        let sensitive = QName::new("urn:priv", "priv", "sensitive");
        let root = ElementNode::new(nc("PersonName"))
            .with_attribute(QName::local("lang"), "en")
            .with_child(
                ElementNode::leaf(nc("PersonGivenName"), "Peter")
                    .with_attribute(sensitive, "true"),
            );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        let props = &built.nodes[0].properties;
        assert_eq!(props["lang"], PropertyValue::from("en"));
        assert_eq!(
            props["nc:PersonGivenName@priv:sensitive"],
            PropertyValue::from("true")
        );
    }

    #[test]
    fn test_complex_children_are_contained() {
        let root = ElementNode::new(j("Crash")).with_child(
            ElementNode::new(nc("ActivityDate")).with_child(ElementNode::leaf(nc("Date"), "2024-01-01")),
        );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        assert_eq!(built.nodes.len(), 2);
        assert_eq!(built.edges.len(), 1);
        assert_eq!(built.edges[0].edge_type, EdgeType::Contains);
        assert_eq!(built.edges[0].source, built.nodes[0].id);
        assert_eq!(built.edges[0].target, built.nodes[1].id);
        assert_eq!(
            built.nodes[1].properties["nc:Date"],
            PropertyValue::from("2024-01-01")
        );
    }

    #[test]
    fn test_simple_content_of_node_goes_to_value() {
        let root = ElementNode::new(nc("Root")).with_child(
            ElementNode::leaf(nc("Measure"), "12").with_id("M1"),
        );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        let measure = &built.nodes[1];
        assert_eq!(measure.node_type, "nc:Measure");
        assert_eq!(measure.properties["value"], PropertyValue::from("12"));
    }

    #[test]
    fn test_property_rule_flattens_with_dotted_keys() {
        let table = crate::config::MappingTable::new()
            .with_rule("nc:PersonName", crate::config::Rule::Property);
        let config = ConvertConfig::default().with_mapping(table);
        let root = ElementNode::new(nc("Person")).with_child(
            ElementNode::new(nc("PersonName"))
                .with_child(ElementNode::leaf(nc("PersonGivenName"), "Peter"))
                .with_child(
                    ElementNode::new(nc("PersonFullName"))
                        .with_child(ElementNode::leaf(nc("Text"), "Peter Wimsey")),
                ),
        );
        let built = partial(root, &config).unwrap();
        assert_eq!(built.nodes.len(), 1);
        let props = &built.nodes[0].properties;
        assert_eq!(
            props["nc:PersonName.nc:PersonGivenName"],
            PropertyValue::from("Peter")
        );
        assert_eq!(
            props["nc:PersonName.nc:PersonFullName.nc:Text"],
            PropertyValue::from("Peter Wimsey")
        );
        // unmapped complex root falls back with a warning
        assert_eq!(built.warnings.len(), 1);
        assert_eq!(built.warnings[0].kind, WarningKind::MissingMapping);
    }

    #[test]
    fn test_pointers_become_links() {
        let root = ElementNode::new(nc("Root"))
            .with_child(ElementNode::new(nc("Person")).with_id("P01"))
            .with_child(
                ElementNode::new(j("CrashDriver"))
                    .with_child(ElementNode::pointer(nc("RoleOfPerson"), "P01"))
                    .with_child(ElementNode::leaf(j("DriverLicenseNumber"), "X")),
            );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        assert_eq!(built.links.len(), 1);
        let link = &built.links[0];
        assert_eq!(link.kind, LinkKind::Role);
        assert_eq!(link.raw_id, "P01");
        assert!(link.target.as_deref().is_some_and(|t| t.ends_with(":P01")));
        assert_eq!(
            link.properties["role"],
            PropertyValue::from("nc:RoleOfPerson")
        );
    }

    #[test]
    fn test_pointer_role_attribute_keeps_the_edge_role() {
        let root = ElementNode::new(nc("Root"))
            .with_child(ElementNode::new(nc("Person")).with_id("P01"))
            .with_child(
                ElementNode::new(j("CrashDriver")).with_child(
                    ElementNode::pointer(nc("RoleOfPerson"), "P01")
                        .with_attribute(QName::local("role"), "driver"),
                ),
            );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        let link = &built.links[0];
        assert_eq!(link.properties["role"], PropertyValue::from("nc:RoleOfPerson"));
        assert_eq!(link.properties["@role"], PropertyValue::from("driver"));
    }

    #[test]
    fn test_role_pointer_under_mapped_association_is_a_role() {
        let table = crate::config::MappingTable::new()
            .with_rule("j:CrashDriver", crate::config::Rule::Association);
        let config = ConvertConfig::default().with_mapping(table);
        let root = ElementNode::new(nc("Root"))
            .with_child(ElementNode::new(nc("Person")).with_id("P01"))
            .with_child(ElementNode::new(nc("Vehicle")).with_id("V01"))
            .with_child(
                ElementNode::new(j("CrashDriver"))
                    .with_child(ElementNode::pointer(nc("RoleOfPerson"), "P01"))
                    .with_child(ElementNode::pointer(nc("Vehicle"), "V01")),
            );
        let built = partial(root, &config).unwrap();
        let kinds: Vec<LinkKind> = built.links.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Role, LinkKind::Endpoint]);
    }

    #[test]
    fn test_augmentation_is_recorded_not_built() {
        let root = ElementNode::new(j("Charge"))
            .with_id("CH01")
            .with_child(
                ElementNode::new(j("ChargeAugmentation"))
                    .with_child(ElementNode::leaf(j("ChargeFelonyIndicator"), "false")),
            );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        assert_eq!(built.nodes.len(), 1);
        assert_eq!(built.augmentations.len(), 1);
        let patch = &built.augmentations[0];
        assert_eq!(patch.owner, built.nodes[0].id);
        assert_eq!(patch.augmentation, "j:ChargeAugmentation");
        assert_eq!(
            patch.properties["j:ChargeFelonyIndicator"],
            PropertyValue::from("false")
        );
    }

    #[test]
    fn test_metadata_block_is_registered() {
        let priv_ = |local: &str| QName::new("urn:priv", "priv", local);
        let root = ElementNode::new(nc("Root"))
            .with_child(ElementNode::new(nc("Person")).with_id("P01").with_metadata("PM01"))
            .with_child(
                ElementNode::new(priv_("PrivacyMetadata"))
                    .with_id("PM01")
                    .with_child(ElementNode::leaf(priv_("PrivacyCode"), "PII")),
            );
        let built = partial(root, &ConvertConfig::default()).unwrap();
        assert_eq!(built.nodes.len(), 2);
        assert_eq!(
            built.metadata_blocks["PM01"]["priv:PrivacyCode"],
            PropertyValue::from("PII")
        );
        assert_eq!(built.attachments.len(), 1);
        assert_eq!(built.attachments[0].ids, vec!["PM01".to_string()]);
    }

    #[test]
    fn test_node_limit() {
        let root = ElementNode::new(nc("Root"))
            .with_child(ElementNode::new(nc("A")).with_id("A1"))
            .with_child(ElementNode::new(nc("B")).with_id("B1"));
        let config = ConvertConfig::default().with_max_nodes(2);
        match partial(root, &config) {
            Err(ConversionError::LimitExceeded { limit, path, .. }) => {
                assert_eq!(limit, "nodes");
                assert_eq!(path, "/nc:Root/nc:B");
            }
            other => panic!("expected node limit, got {:?}", other.map(|p| p.nodes.len())),
        }
    }
}
