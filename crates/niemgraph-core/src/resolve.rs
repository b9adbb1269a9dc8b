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

//! Identifier assignment and reference resolution.
//!
//! The resolver walks the tree once in pre-order. Every element gets a node id
//! whether or not it later becomes a node, so that ids never depend on how an
//! element is classified:
//!
//! - declared id `P01` → `<fingerprint>:P01`
//! - anything else → `<fingerprint>:_<hash>` where the hash covers the parent
//!   id, the child ordinal and the qualified name
//!
//! A second pass resolves every reference against the declarations.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::config::ConvertConfig;
use crate::error::{ConversionError, Result, Warning, WarningKind};
use crate::tree::{short_hash, ElementNode, ElementTree, Fingerprint};

/// A reference that did not resolve within its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Identifier as written.
    pub raw_id: String,
    /// Path of the referencing element.
    pub path: String,
    /// The pointer was `xsi:nil`.
    pub nil: bool,
}

/// Declared ids of one document and the references that missed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    resolved: BTreeMap<String, String>,
    unresolved: Vec<UnresolvedReference>,
}

impl ReferenceTable {
    /// Node id for a raw declared id.
    pub fn resolve(&self, raw_id: &str) -> Option<&str> {
        self.resolved.get(raw_id).map(String::as_str)
    }

    /// References that did not resolve, in document order.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Declared ids and their node ids.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.resolved.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of declared ids.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// True when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Outcome for one referencing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReferenceStatus {
    /// Resolved to a node id.
    Resolved(String),
    /// Left for cross-document reconciliation.
    Deferred,
    /// Dropped with a warning.
    Omitted,
}

/// Ids, paths and reference outcomes of one document, indexed by pre-order
/// position.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Fingerprint of the document.
    pub fingerprint: Fingerprint,
    /// Reference table.
    pub table: ReferenceTable,
    /// Warnings raised while resolving.
    pub warnings: Vec<Warning>,
    ids: Vec<String>,
    paths: Vec<String>,
    references: HashMap<usize, ReferenceStatus>,
}

impl Resolution {
    /// Node id of the element at a pre-order position.
    pub fn node_id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Path of the element at a pre-order position.
    pub fn path(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True for an empty resolution.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn reference(&self, index: usize) -> Option<&ReferenceStatus> {
        self.references.get(&index)
    }
}

struct Declaration {
    type_name: String,
    index: usize,
    path: String,
}

struct ReferenceSite {
    raw_id: String,
    index: usize,
    path: String,
    nil: bool,
}

/// Assigns ids and resolves references for one document.
pub struct Resolver<'c> {
    config: &'c ConvertConfig,
    defer_unresolved: bool,
}

impl<'c> Resolver<'c> {
    /// Resolver applying the configured reference policy.
    pub fn new(config: &'c ConvertConfig) -> Self {
        Self {
            config,
            defer_unresolved: false,
        }
    }

    /// Leave unresolved references for a later cross-document pass.
    pub fn deferring(mut self) -> Self {
        self.defer_unresolved = true;
        self
    }

    /// Assign ids to every element and resolve every reference.
    pub fn resolve(&self, tree: &ElementTree) -> Result<Resolution> {
        let fingerprint = &tree.fingerprint;
        let mut ids = Vec::with_capacity(tree.element_count());
        let mut paths = Vec::with_capacity(ids.capacity());
        let mut declarations: BTreeMap<String, Declaration> = BTreeMap::new();
        let mut sites = Vec::new();

        // (element, parent id, ordinal, path, depth)
        let mut stack: Vec<(&ElementNode, String, usize, String, usize)> =
            vec![(&tree.root, String::new(), 0, tree.root_path(), 1)];

        while let Some((element, parent_id, ordinal, path, depth)) = stack.pop() {
            if depth > self.config.max_depth {
                return Err(ConversionError::depth_exceeded(
                    self.config.max_depth,
                    depth,
                    &path,
                ));
            }
            let index = ids.len();
            let type_name = element.name.to_string();

            let id = match &element.declared_id {
                Some(raw) => {
                    if let Some(first) = declarations.get(raw) {
                        if first.type_name != type_name {
                            return Err(ConversionError::IdCollision {
                                raw_id: raw.clone(),
                                first_type: first.type_name.clone(),
                                first_path: first.path.clone(),
                                second_type: type_name,
                                second_path: path,
                            });
                        }
                        debug!(raw_id = %raw, %path, "repeated declaration merges into one node");
                    } else {
                        declarations.insert(
                            raw.clone(),
                            Declaration {
                                type_name: type_name.clone(),
                                index,
                                path: path.clone(),
                            },
                        );
                    }
                    declared_node_id(fingerprint, raw)
                }
                None => synthetic_node_id(fingerprint, &parent_id, ordinal, &type_name),
            };

            if let Some(raw) = &element.reference {
                sites.push(ReferenceSite {
                    raw_id: raw.clone(),
                    index,
                    path: path.clone(),
                    nil: element.nil,
                });
            }

            for (child_ordinal, child) in element.children.iter().enumerate().rev() {
                let child_path = format!("{}/{}", path, element.child_segment(child_ordinal));
                stack.push((child, id.clone(), child_ordinal, child_path, depth + 1));
            }

            ids.push(id);
            paths.push(path);
        }

        let mut table = ReferenceTable {
            resolved: declarations
                .keys()
                .map(|raw| (raw.clone(), declared_node_id(fingerprint, raw)))
                .collect(),
            unresolved: Vec::new(),
        };
        let mut references = HashMap::with_capacity(sites.len());
        let mut warnings = Vec::new();

        for site in sites {
            let visible = declarations
                .get(&site.raw_id)
                .filter(|d| self.config.allow_forward_references || d.index < site.index);
            let status = match visible {
                Some(_) => ReferenceStatus::Resolved(declared_node_id(fingerprint, &site.raw_id)),
                None => self.unresolved(&site, &mut warnings)?,
            };
            if status == ReferenceStatus::Omitted {
                table.unresolved.push(UnresolvedReference {
                    raw_id: site.raw_id.clone(),
                    path: site.path.clone(),
                    nil: site.nil,
                });
            }
            references.insert(site.index, status);
        }

        debug!(
            fingerprint = %fingerprint,
            elements = ids.len(),
            declarations = table.len(),
            unresolved = table.unresolved.len(),
            "resolved document"
        );

        Ok(Resolution {
            fingerprint: fingerprint.clone(),
            table,
            warnings,
            ids,
            paths,
            references,
        })
    }

    fn unresolved(
        &self,
        site: &ReferenceSite,
        warnings: &mut Vec<Warning>,
    ) -> Result<ReferenceStatus> {
        if self.defer_unresolved {
            return Ok(ReferenceStatus::Deferred);
        }
        let tolerated = !self.config.strict_references
            || (site.nil && self.config.lenient_nil_references);
        if !tolerated {
            return Err(ConversionError::DanglingReference {
                raw_id: site.raw_id.clone(),
                path: site.path.clone(),
            });
        }
        warn!(raw_id = %site.raw_id, path = %site.path, "omitting unresolved reference");
        warnings.push(Warning::new(
            WarningKind::DanglingReference,
            format!("reference to '{}' does not resolve", site.raw_id),
            site.path.clone(),
        ));
        Ok(ReferenceStatus::Omitted)
    }
}

/// Node id of a declared identifier.
pub fn declared_node_id(fingerprint: &Fingerprint, raw_id: &str) -> String {
    format!("{}:{}", fingerprint, raw_id)
}

/// Node id of an element without a declared identifier.
pub fn synthetic_node_id(
    fingerprint: &Fingerprint,
    parent_id: &str,
    ordinal: usize,
    type_name: &str,
) -> String {
    let seed = format!("{}:{}:{}:{}", fingerprint, parent_id, ordinal, type_name);
    format!("{}:_{}", fingerprint, short_hash(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::QName;

    fn q(local: &str) -> QName {
        QName::new("urn:test", "t", local)
    }

    fn tree(root: ElementNode) -> ElementTree {
        ElementTree::new(root, Fingerprint::of_bytes(b"resolver-test"))
    }

    #[test]
    fn test_declared_and_synthetic_ids() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::new(q("Person")).with_id("P01"))
                .with_child(ElementNode::leaf(q("Note"), "x")),
        );
        let config = ConvertConfig::default();
        let resolution = Resolver::new(&config).resolve(&doc).unwrap();

        assert_eq!(resolution.len(), 3);
        let fp = doc.fingerprint.as_str();
        assert_eq!(resolution.node_id(1), Some(format!("{}:P01", fp).as_str()));
        let root_id = resolution.node_id(0).unwrap();
        assert!(root_id.starts_with(&format!("{}:_", fp)));
        assert_eq!(
            resolution.node_id(2),
            Some(synthetic_node_id(&doc.fingerprint, root_id, 1, "t:Note").as_str())
        );
        assert_eq!(resolution.path(2), Some("/t:Root/t:Note"));
        assert_eq!(resolution.table.resolve("P01"), resolution.node_id(1));
    }

    #[test]
    fn test_ids_are_deterministic() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::new(q("A")).with_child(ElementNode::leaf(q("B"), "1")))
                .with_child(ElementNode::new(q("A")).with_child(ElementNode::leaf(q("B"), "2"))),
        );
        let config = ConvertConfig::default();
        let first = Resolver::new(&config).resolve(&doc).unwrap();
        let second = Resolver::new(&config).resolve(&doc).unwrap();
        assert_eq!(first.ids, second.ids);
        // sibling ordinals keep same-named elements apart
        assert_ne!(first.node_id(1), first.node_id(3));
        assert_eq!(first.path(3), Some("/t:Root/t:A[2]"));
    }

    #[test]
    fn test_forward_reference_policy() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::pointer(q("RoleOfPerson"), "P01"))
                .with_child(ElementNode::new(q("Person")).with_id("P01")),
        );
        let config = ConvertConfig::default();
        let resolution = Resolver::new(&config).resolve(&doc).unwrap();
        assert!(matches!(
            resolution.reference(1),
            Some(ReferenceStatus::Resolved(_))
        ));

        let strict_order = ConvertConfig::default().without_forward_references();
        let err = Resolver::new(&strict_order).resolve(&doc).unwrap_err();
        assert_eq!(
            err,
            ConversionError::DanglingReference {
                raw_id: "P01".to_string(),
                path: "/t:Root/t:RoleOfPerson".to_string(),
            }
        );
    }

    #[test]
    fn test_dangling_reference_policies() {
        let doc = tree(
            ElementNode::new(q("Root")).with_child(ElementNode::pointer(q("RoleOfPerson"), "P99")),
        );

        let strict = ConvertConfig::default();
        assert!(matches!(
            Resolver::new(&strict).resolve(&doc),
            Err(ConversionError::DanglingReference { .. })
        ));

        let lenient = ConvertConfig::default().with_lenient_references();
        let resolution = Resolver::new(&lenient).resolve(&doc).unwrap();
        assert_eq!(resolution.reference(1), Some(&ReferenceStatus::Omitted));
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.table.unresolved().len(), 1);

        let deferred = Resolver::new(&strict).deferring().resolve(&doc).unwrap();
        assert_eq!(deferred.reference(1), Some(&ReferenceStatus::Deferred));
        assert!(deferred.warnings.is_empty());
    }

    #[test]
    fn test_nil_pointer_policy() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::pointer(q("RoleOfPerson"), "P99").with_nil()),
        );
        let lenient_nil = ConvertConfig::default();
        let resolution = Resolver::new(&lenient_nil).resolve(&doc).unwrap();
        assert!(resolution.table.unresolved()[0].nil);

        let strict_nil = ConvertConfig::default().with_strict_nil_references();
        assert!(Resolver::new(&strict_nil).resolve(&doc).is_err());
    }

    #[test]
    fn test_id_collision() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::new(q("Person")).with_id("X1"))
                .with_child(ElementNode::new(q("Charge")).with_id("X1")),
        );
        let config = ConvertConfig::default();
        match Resolver::new(&config).resolve(&doc) {
            Err(ConversionError::IdCollision {
                first_type,
                second_type,
                second_path,
                ..
            }) => {
                assert_eq!(first_type, "t:Person");
                assert_eq!(second_type, "t:Charge");
                assert_eq!(second_path, "/t:Root/t:Charge");
            }
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_declaration_shares_id() {
        let doc = tree(
            ElementNode::new(q("Root"))
                .with_child(ElementNode::new(q("Person")).with_id("P01"))
                .with_child(ElementNode::new(q("Person")).with_id("P01")),
        );
        let config = ConvertConfig::default();
        let resolution = Resolver::new(&config).resolve(&doc).unwrap();
        assert_eq!(resolution.node_id(1), resolution.node_id(2));
    }

    #[test]
    fn test_depth_limit() {
        let doc = tree(
            ElementNode::new(q("A")).with_child(
                ElementNode::new(q("B")).with_child(ElementNode::leaf(q("C"), "deep")),
            ),
        );
        let config = ConvertConfig::default().with_max_depth(2);
        match Resolver::new(&config).resolve(&doc) {
            Err(ConversionError::LimitExceeded { limit, path, .. }) => {
                assert_eq!(limit, "depth");
                assert_eq!(path, "/t:A/t:B/t:C");
            }
            other => panic!("expected depth limit, got {:?}", other),
        }
    }
}
