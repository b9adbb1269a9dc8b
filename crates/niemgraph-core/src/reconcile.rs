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

//! Single-threaded reconciliation of partial graphs.
//!
//! The reconciler owns an append-only arena of declarations. Partial graphs
//! are added in batch order; [`Reconciler::finish`] then runs the whole-graph
//! phases in a fixed order:
//!
//! 1. resolve pending links (including cross-document ids in shared mode)
//! 2. hub merging
//! 3. association endpoints
//! 4. augmentation flattening
//! 5. metadata overlay
//!
//! and freezes the result into a [`Graph`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::build::{AugmentationPatch, EdgeDraft, LinkKind, MetadataAttachment, PartialGraph, PendingLink};
use crate::config::ConvertConfig;
use crate::error::{ConversionError, Result, Warning, WarningKind};
use crate::graph::{Conversion, EdgeType, Graph, GraphEdge, GraphNode};
use crate::overlay::MetadataRegistry;
use crate::tree::Fingerprint;
use crate::{association, augmentation, hub, overlay};

/// Where hub identity is scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HubScope {
    /// Raw ids only meet within their own document.
    #[default]
    Document,
    /// Raw ids meet across every document of the batch.
    Shared,
}

#[derive(Debug, Clone)]
struct Declaration {
    fingerprint: Fingerprint,
    node_id: String,
}

/// Append-only record of every declared id in batch order.
#[derive(Debug, Default)]
pub(crate) struct DeclarationArena {
    entries: Vec<Declaration>,
    by_raw: HashMap<String, Vec<usize>>,
}

impl DeclarationArena {
    fn push(&mut self, fingerprint: &Fingerprint, raw_id: &str, node_id: &str) {
        self.by_raw
            .entry(raw_id.to_string())
            .or_default()
            .push(self.entries.len());
        self.entries.push(Declaration {
            fingerprint: fingerprint.clone(),
            node_id: node_id.to_string(),
        });
    }

    /// First declaration in batch order.
    fn first(&self, raw_id: &str) -> Option<&Declaration> {
        self.by_raw
            .get(raw_id)
            .and_then(|positions| positions.first())
            .and_then(|&i| self.entries.get(i))
    }

    /// Raw ids declared by more than one document.
    fn shared_ids(&self) -> Vec<(&str, usize)> {
        let mut shared: Vec<(&str, usize)> = self
            .by_raw
            .iter()
            .filter_map(|(raw, positions)| {
                let documents: BTreeSet<&Fingerprint> = positions
                    .iter()
                    .filter_map(|&i| self.entries.get(i))
                    .map(|d| &d.fingerprint)
                    .collect();
                (documents.len() > 1).then_some((raw.as_str(), documents.len()))
            })
            .collect();
        shared.sort();
        shared
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Mutable state shared by the reconciliation phases.
#[derive(Debug, Default)]
pub(crate) struct Workspace {
    pub nodes: Vec<GraphNode>,
    pub index: HashMap<String, usize>,
    pub node_paths: HashMap<String, String>,
    pub edges: Vec<EdgeDraft>,
    pub links: Vec<PendingLink>,
    pub augmentations: Vec<AugmentationPatch>,
    pub metadata: MetadataRegistry,
    pub attachments: Vec<MetadataAttachment>,
    pub warnings: Vec<Warning>,
}

impl Workspace {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).and_then(|&i| self.nodes.get(i))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        let position = *self.index.get(id)?;
        self.nodes.get_mut(position)
    }

    pub fn add_node(&mut self, node: GraphNode) {
        if self.index.contains_key(&node.id) {
            return;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub fn warn(&mut self, warning: Warning) {
        warn!(kind = %warning.kind, path = warning.path.as_deref().unwrap_or(""), "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Links of one kind, removed from the workspace in their original order.
    pub fn take_links(&mut self, kind: LinkKind) -> Vec<PendingLink> {
        let (taken, kept) = std::mem::take(&mut self.links)
            .into_iter()
            .partition(|link| link.kind == kind);
        self.links = kept;
        taken
    }
}

/// Combines partial graphs into one [`Conversion`].
pub struct Reconciler<'c> {
    config: &'c ConvertConfig,
    scope: HubScope,
    arena: DeclarationArena,
    partials: Vec<PartialGraph>,
    seen: BTreeSet<Fingerprint>,
}

impl<'c> Reconciler<'c> {
    /// Reconciler for a single document or independent documents.
    pub fn new(config: &'c ConvertConfig) -> Self {
        Self::with_scope(config, HubScope::Document)
    }

    /// Reconciler for a shared-namespace batch.
    pub fn shared(config: &'c ConvertConfig) -> Self {
        Self::with_scope(config, HubScope::Shared)
    }

    /// Reconciler with an explicit hub scope.
    pub fn with_scope(config: &'c ConvertConfig, scope: HubScope) -> Self {
        Self {
            config,
            scope,
            arena: DeclarationArena::default(),
            partials: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Hub scope in use.
    pub fn scope(&self) -> HubScope {
        self.scope
    }

    /// Add a partial graph. Byte-identical documents are added once.
    pub fn add(&mut self, partial: PartialGraph) {
        if !self.seen.insert(partial.fingerprint.clone()) {
            debug!(fingerprint = %partial.fingerprint, "skipping repeated document");
            return;
        }
        for (raw_id, node_id) in &partial.declarations {
            self.arena.push(&partial.fingerprint, raw_id, node_id);
        }
        self.partials.push(partial);
    }

    /// Number of documents added.
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// True when nothing was added.
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Run the whole-graph phases and freeze the result.
    pub fn finish(self) -> Result<Conversion> {
        let Reconciler {
            config,
            scope,
            arena,
            partials,
            ..
        } = self;

        let mut workspace = Workspace::default();
        let mut aliases: HashMap<String, String> = HashMap::new();
        for partial in partials {
            workspace.warnings.extend(partial.warnings);
            for node in partial.nodes {
                workspace.add_node(node);
            }
            workspace.node_paths.extend(partial.node_paths);
            workspace.edges.extend(partial.edges);
            workspace.links.extend(partial.links);
            workspace.augmentations.extend(partial.augmentations);
            workspace.attachments.extend(partial.attachments);
            for (raw_id, fields) in partial.metadata_blocks {
                workspace
                    .metadata
                    .register(&partial.fingerprint, &raw_id, fields);
            }
            aliases.extend(partial.aliases);
        }

        if scope == HubScope::Shared {
            for (raw_id, documents) in arena.shared_ids() {
                let message = format!(
                    "'{}' is declared by {} documents, references resolve to the first",
                    raw_id, documents
                );
                workspace.warn(Warning::detached(WarningKind::DuplicateDeclaration, message));
            }
        }

        resolve_links(&mut workspace, config, scope, &arena, &aliases)?;
        hub::merge(&mut workspace, config, scope);
        association::finalize(&mut workspace);
        augmentation::flatten(&mut workspace);
        overlay::apply(&mut workspace, scope == HubScope::Shared);

        let graph = freeze(workspace.nodes, workspace.edges, workspace.links);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            declarations = arena.len(),
            warnings = workspace.warnings.len(),
            "reconciled graph"
        );
        Ok(Conversion {
            graph,
            warnings: workspace.warnings,
        })
    }
}

fn resolve_links(
    workspace: &mut Workspace,
    config: &ConvertConfig,
    scope: HubScope,
    arena: &DeclarationArena,
    aliases: &HashMap<String, String>,
) -> Result<()> {
    let links = std::mem::take(&mut workspace.links);
    let mut resolved = Vec::with_capacity(links.len());

    for mut link in links {
        let target = match link.target.take() {
            Some(target) => Some(target),
            None if scope == HubScope::Shared => {
                arena.first(&link.raw_id).map(|d| d.node_id.clone())
            }
            None => None,
        };
        let target = target
            .map(|t| aliases.get(&t).cloned().unwrap_or(t))
            .filter(|t| workspace.index.contains_key(t));

        match target {
            Some(target) => {
                link.target = Some(target);
                resolved.push(link);
            }
            None => {
                let tolerated =
                    !config.strict_references || (link.nil && config.lenient_nil_references);
                if !tolerated {
                    return Err(ConversionError::DanglingReference {
                        raw_id: link.raw_id,
                        path: link.path,
                    });
                }
                workspace.warn(Warning::new(
                    WarningKind::DanglingReference,
                    format!("reference to '{}' does not name a node", link.raw_id),
                    link.path,
                ));
            }
        }
    }

    workspace.links = resolved;
    Ok(())
}

/// Turn drafts and leftover reference links into the final edge list.
fn freeze(nodes: Vec<GraphNode>, mut drafts: Vec<EdgeDraft>, links: Vec<PendingLink>) -> Graph {
    for link in links {
        if let Some(target) = link.target.clone() {
            drafts.push(link.into_edge(EdgeType::RefersTo, target));
        }
    }

    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut edges: Vec<GraphEdge> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let edge = GraphEdge::new(draft.edge_type, draft.source, draft.target, draft.properties);
        match seen.get(&edge.id) {
            Some(&position) => {
                // same edge reached twice, keep the union of its properties
                if let Some(existing) = edges.get_mut(position) {
                    for (key, value) in &edge.properties {
                        crate::graph::merge_property(&mut existing.properties, key, value);
                    }
                }
            }
            None => {
                seen.insert(edge.id.clone(), edges.len());
                edges.push(edge);
            }
        }
    }
    Graph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use crate::resolve::Resolver;
    use crate::tree::{ElementNode, ElementTree, QName};

    fn nc(local: &str) -> QName {
        QName::new("urn:core", "nc", local)
    }

    fn partial(root: ElementNode, source: &[u8], config: &ConvertConfig) -> PartialGraph {
        let tree = ElementTree::from_source(root, source);
        let resolution = Resolver::new(config).deferring().resolve(&tree).unwrap();
        build(&tree, &resolution, config).unwrap()
    }

    #[test]
    fn test_shared_scope_resolves_across_documents() {
        let config = ConvertConfig::default();
        let declaring = partial(
            ElementNode::new(nc("Root")).with_child(ElementNode::new(nc("Person")).with_id("P01")),
            b"doc-a",
            &config,
        );
        let referencing = partial(
            ElementNode::new(nc("Root")).with_child(
                ElementNode::new(nc("Case")).with_child(ElementNode::pointer(nc("Subject"), "P01"))
                    .with_child(ElementNode::leaf(nc("CaseTitle"), "x")),
            ),
            b"doc-b",
            &config,
        );
        let person_id = declaring.declarations[0].1.clone();

        let mut reconciler = Reconciler::shared(&config);
        reconciler.add(declaring);
        reconciler.add(referencing);
        let conversion = reconciler.finish().unwrap();

        let refers: Vec<_> = conversion.graph.edges_of_type(EdgeType::RefersTo).collect();
        assert_eq!(refers.len(), 1);
        assert_eq!(refers[0].target, person_id);
    }

    #[test]
    fn test_document_scope_keeps_documents_apart() {
        let config = ConvertConfig::default();
        let declaring = partial(
            ElementNode::new(nc("Root")).with_child(ElementNode::new(nc("Person")).with_id("P01")),
            b"doc-a",
            &config,
        );
        let referencing = partial(
            ElementNode::new(nc("Root")).with_child(ElementNode::pointer(nc("Subject"), "P01")),
            b"doc-b",
            &config,
        );
        let mut reconciler = Reconciler::new(&config);
        reconciler.add(declaring);
        reconciler.add(referencing);
        let err = reconciler.finish().unwrap_err();
        assert!(matches!(err, ConversionError::DanglingReference { ref raw_id, .. } if raw_id == "P01"));
    }

    #[test]
    fn test_repeated_document_added_once() {
        let config = ConvertConfig::default();
        let root = ElementNode::new(nc("Root")).with_child(ElementNode::new(nc("Person")).with_id("P01"));
        let mut reconciler = Reconciler::shared(&config);
        reconciler.add(partial(root.clone(), b"same", &config));
        reconciler.add(partial(root, b"same", &config));
        assert_eq!(reconciler.len(), 1);
        let conversion = reconciler.finish().unwrap();
        assert_eq!(conversion.graph.node_count(), 2);
    }

    #[test]
    fn test_duplicate_declarations_warn_in_shared_mode() {
        let config = ConvertConfig::default();
        let root = |tag: &str| {
            ElementNode::new(nc("Root"))
                .with_child(ElementNode::new(nc("Person")).with_id("P01"))
                .with_child(ElementNode::leaf(nc("Tag"), tag))
        };
        let mut reconciler = Reconciler::shared(&config);
        reconciler.add(partial(root("a"), b"doc-a", &config));
        reconciler.add(partial(root("b"), b"doc-b", &config));
        let conversion = reconciler.finish().unwrap();
        assert!(conversion
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::DuplicateDeclaration));
    }
}
