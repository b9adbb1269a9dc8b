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

//! Format-neutral element tree produced by the normalizers.
//!
//! Both the XML and the JSON normalizer emit an [`ElementTree`]. Everything
//! downstream of the normalizers works on this model only, so the syntax
//! differences between the two encodings (attribute vs `@`-key, namespace URI
//! vs `@context` prefix) are gone by the time ids are assigned.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Qualified element or attribute name.
///
/// Equality and ordering consider the namespace URI, the source prefix and
/// the local name. Graph node types and property keys use the display form
/// (`prefix:local`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI, when bound.
    pub namespace: Option<String>,
    /// Prefix as written in the source.
    pub prefix: Option<String>,
    /// Local name.
    pub local: String,
}

impl QName {
    /// Create a name without namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    /// Create a prefixed name bound to a namespace URI.
    pub fn new(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => write!(f, "{}:{}", prefix, self.local),
            _ => f.write_str(&self.local),
        }
    }
}

/// Conventional prefixes of NIEM release namespaces, keyed by a path
/// segment of the namespace URI so that every release version matches.
const CONVENTIONAL_PREFIXES: &[(&str, &str)] = &[
    ("/niem-core/", "nc"),
    ("/structures/", "structures"),
    ("/appinfo/", "appinfo"),
    ("/proxy/", "niem-xs"),
    ("/domains/jxdm/", "j"),
    ("/domains/emergencyManagement/", "em"),
    ("/domains/humanServices/", "hs"),
    ("/domains/immigration/", "im"),
    ("/domains/internationalTrade/", "it"),
    ("/domains/screening/", "scr"),
    ("/domains/cbrn/", "cbrn"),
    ("/domains/maritime/", "m"),
    ("/domains/militaryOperations/", "mo"),
    ("/domains/intelligence/", "intel"),
    ("/domains/infrastructureProtection/", "ip"),
    ("/domains/biometrics/", "biom"),
    ("/domains/cyber/", "cyber"),
    ("/domains/surfaceTransportation/", "st"),
    ("/domains/agriculture/", "ag"),
    ("/domains/statistics/", "stat"),
];

const XSI_URI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XS_URI: &str = "http://www.w3.org/2001/XMLSchema";

/// Conventional prefix of a well-known namespace URI.
pub fn conventional_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        XSI_URI => return Some("xsi"),
        XS_URI => return Some("xs"),
        _ => {}
    }
    if !uri.contains("niem") {
        return None;
    }
    CONVENTIONAL_PREFIXES
        .iter()
        .find(|(segment, _)| uri.contains(segment))
        .map(|(_, prefix)| *prefix)
}

/// Namespace URI to display prefix bindings that take precedence over the
/// conventional NIEM prefixes and over the prefixes written in a document.
///
/// ```
/// use niemgraph_core::PrefixTable;
///
/// let table = PrefixTable::new().with_binding("cd", "http://example.com/CrashDriver/1.0/");
/// assert_eq!(table.get("http://example.com/CrashDriver/1.0/"), Some("cd"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable(BTreeMap<String, String>);

impl PrefixTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display names in `uri` with `prefix`.
    pub fn with_binding(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bind(prefix, uri);
        self
    }

    /// Display names in `uri` with `prefix`.
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let uri = uri.into();
        let uri = uri.strip_suffix('#').map(str::to_string).unwrap_or(uri);
        self.0.insert(uri, prefix.into());
    }

    /// Pinned prefix of a namespace URI.
    pub fn get(&self, uri: &str) -> Option<&str> {
        self.0.get(uri).map(String::as_str)
    }

    /// True when nothing is pinned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Structural kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Has element children or a declared identifier.
    Complex,
    /// Text-only (possibly empty) element.
    Simple,
    /// An ordinary attribute viewed as a leaf element.
    Attribute,
}

/// One element of the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Qualified name.
    pub name: QName,
    /// Structural kind, see [`ElementNode::refresh_kind`].
    pub kind: ElementKind,
    /// Child elements in document order.
    pub children: Vec<ElementNode>,
    /// Trimmed text content.
    pub text: Option<String>,
    /// Ordinary (non-structural) attributes.
    pub attributes: BTreeMap<QName, String>,
    /// Identifier declared by this element.
    pub declared_id: Option<String>,
    /// Identifier this element points at.
    pub reference: Option<String>,
    /// Object-level metadata block ids.
    pub metadata: Vec<String>,
    /// Relationship-level metadata block ids.
    pub relationship_metadata: Vec<String>,
    /// Explicit nil marker.
    pub nil: bool,
}

impl ElementNode {
    /// Create an empty simple element.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            kind: ElementKind::Simple,
            children: Vec::new(),
            text: None,
            attributes: BTreeMap::new(),
            declared_id: None,
            reference: None,
            metadata: Vec::new(),
            relationship_metadata: Vec::new(),
            nil: false,
        }
    }

    /// Create a simple element with text content.
    pub fn leaf(name: QName, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    /// Create a reference-only pointer element.
    pub fn pointer(name: QName, target: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.reference = Some(target.into());
        node
    }

    /// Append a child and recompute the kind.
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self.refresh_kind();
        self
    }

    /// Append several children and recompute the kind.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementNode>) -> Self {
        self.children.extend(children);
        self.refresh_kind();
        self
    }

    /// Declare an identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.declared_id = Some(id.into());
        self.refresh_kind();
        self
    }

    /// Set an ordinary attribute.
    pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value.into());
        self
    }

    /// Add an object-level metadata reference.
    pub fn with_metadata(mut self, id: impl Into<String>) -> Self {
        self.metadata.push(id.into());
        self
    }

    /// Add a relationship-level metadata reference.
    pub fn with_relationship_metadata(mut self, id: impl Into<String>) -> Self {
        self.relationship_metadata.push(id.into());
        self
    }

    /// Mark the element nil.
    pub fn with_nil(mut self) -> Self {
        self.nil = true;
        self
    }

    /// Recompute [`ElementKind`] from the children and declared id.
    ///
    /// Attribute-kind nodes keep their kind.
    pub fn refresh_kind(&mut self) {
        if self.kind == ElementKind::Attribute {
            return;
        }
        self.kind = if !self.children.is_empty() || self.declared_id.is_some() {
            ElementKind::Complex
        } else {
            ElementKind::Simple
        };
    }

    /// Pointer with no content of its own.
    pub fn is_reference_only(&self) -> bool {
        self.reference.is_some()
            && self.children.is_empty()
            && self.declared_id.is_none()
            && self.text.as_deref().map_or(true, str::is_empty)
    }

    /// Ordinary attributes viewed as attribute-kind leaf elements.
    pub fn attribute_nodes(&self) -> impl Iterator<Item = ElementNode> + '_ {
        self.attributes.iter().map(|(name, value)| {
            let mut node = ElementNode::leaf(name.clone(), value.clone());
            node.kind = ElementKind::Attribute;
            node
        })
    }

    /// Path segment for the child at `index`, as seen from this element.
    ///
    /// A positional suffix (`[2]`, one-based) is added only when the parent
    /// has several children with the same name.
    pub fn child_segment(&self, index: usize) -> String {
        let Some(child) = self.children.get(index) else {
            return String::new();
        };
        let same_name = self
            .children
            .iter()
            .filter(|c| c.name == child.name)
            .count();
        if same_name > 1 {
            let position = self.children[..index]
                .iter()
                .filter(|c| c.name == child.name)
                .count()
                + 1;
            format!("{}[{}]", child.name, position)
        } else {
            child.name.to_string()
        }
    }

    /// Number of elements in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(ElementNode::subtree_size).sum::<usize>()
    }

    /// Depth of this subtree; a childless element has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(ElementNode::depth).max().unwrap_or(0)
    }
}

/// Content fingerprint of a source document.
///
/// The first 16 hex digits of the SHA-256 of the raw bytes. Every node id of
/// a document is prefixed with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Number of hex digits kept.
    pub const LEN: usize = 16;

    /// Fingerprint raw document bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(short_hash(bytes))
    }

    /// Hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shortened hex SHA-256.
pub(crate) fn short_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(Fingerprint::LEN);
    hex
}

/// A normalized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTree {
    /// Root element.
    pub root: ElementNode,
    /// Prefix to namespace URI table collected from the source.
    pub namespaces: BTreeMap<String, String>,
    /// Fingerprint of the source bytes.
    pub fingerprint: Fingerprint,
    /// Optional source label (file name) used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ElementTree {
    /// Create a tree with an explicit fingerprint.
    pub fn new(root: ElementNode, fingerprint: Fingerprint) -> Self {
        Self {
            root,
            namespaces: BTreeMap::new(),
            fingerprint,
            source: None,
        }
    }

    /// Create a tree fingerprinted from the source bytes.
    pub fn from_source(root: ElementNode, source_bytes: &[u8]) -> Self {
        Self::new(root, Fingerprint::of_bytes(source_bytes))
    }

    /// Attach a prefix table.
    pub fn with_namespaces(mut self, namespaces: BTreeMap<String, String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Give every namespace URI a single display prefix.
    ///
    /// A URI takes its prefix from `pinned`, else its conventional NIEM
    /// prefix, else the first prefix it is written with in document order.
    /// Two encodings of one document then produce the same qualified names
    /// whatever prefixes their authors chose. A prefix claimed by two URIs
    /// is numbered for the later one (`nc2`).
    pub fn canonicalize_prefixes(mut self, pinned: &PrefixTable) -> Self {
        let mut seen: Vec<(String, String)> = Vec::new();
        collect_bindings(&self.root, &mut seen);
        for (prefix, uri) in &self.namespaces {
            seen.push((uri.clone(), prefix.clone()));
        }

        let mut by_uri: BTreeMap<String, String> = BTreeMap::new();
        let mut taken: BTreeMap<String, String> = BTreeMap::new();
        for (uri, source_prefix) in seen {
            if by_uri.contains_key(&uri) {
                continue;
            }
            let wanted = pinned
                .get(&uri)
                .or_else(|| conventional_prefix(&uri))
                .unwrap_or(source_prefix.as_str())
                .to_string();
            let mut prefix = wanted.clone();
            let mut n = 2;
            while taken.get(&prefix).is_some_and(|owner| owner != &uri) {
                prefix = format!("{}{}", wanted, n);
                n += 1;
            }
            taken.insert(prefix.clone(), uri.clone());
            by_uri.insert(uri, prefix);
        }

        rename(&mut self.root, &by_uri);
        self.namespaces = by_uri.into_iter().map(|(uri, prefix)| (prefix, uri)).collect();
        self
    }

    /// Attach a source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Total number of elements.
    pub fn element_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Path of the root element.
    pub fn root_path(&self) -> String {
        format!("/{}", self.root.name)
    }
}

fn collect_bindings(node: &ElementNode, seen: &mut Vec<(String, String)>) {
    let names = std::iter::once(&node.name).chain(node.attributes.keys());
    for name in names {
        if let Some(uri) = &name.namespace {
            seen.push((uri.clone(), name.prefix.clone().unwrap_or_default()));
        }
    }
    for child in &node.children {
        collect_bindings(child, seen);
    }
}

fn canonical(name: &mut QName, by_uri: &BTreeMap<String, String>) {
    if let Some(prefix) = name.namespace.as_ref().and_then(|uri| by_uri.get(uri)) {
        name.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix.clone())
        };
    }
}

fn rename(node: &mut ElementNode, by_uri: &BTreeMap<String, String>) {
    canonical(&mut node.name, by_uri);
    if node.attributes.keys().any(|name| name.namespace.is_some()) {
        node.attributes = std::mem::take(&mut node.attributes)
            .into_iter()
            .map(|(mut name, value)| {
                canonical(&mut name, by_uri);
                (name, value)
            })
            .collect();
    }
    for child in &mut node.children {
        rename(child, by_uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nc(local: &str) -> QName {
        QName::new("http://release.niem.gov/niem/niem-core/5.0/", "nc", local)
    }

    #[test]
    fn test_qname_display() {
        assert_eq!(nc("Person").to_string(), "nc:Person");
        assert_eq!(QName::local("Root").to_string(), "Root");
    }

    #[test]
    fn test_kind_follows_children_and_id() {
        let leaf = ElementNode::leaf(nc("PersonGivenName"), "Peter");
        assert_eq!(leaf.kind, ElementKind::Simple);

        let with_id = ElementNode::new(nc("Person")).with_id("P01");
        assert_eq!(with_id.kind, ElementKind::Complex);

        let parent = ElementNode::new(nc("PersonName")).with_child(leaf);
        assert_eq!(parent.kind, ElementKind::Complex);
    }

    #[test]
    fn test_reference_only() {
        let pointer = ElementNode::pointer(nc("RoleOfPerson"), "P01");
        assert!(pointer.is_reference_only());

        let with_text = ElementNode::leaf(nc("RoleOfPerson"), "x");
        assert!(!with_text.is_reference_only());

        let mut pointer_with_content = ElementNode::pointer(nc("Person"), "P01");
        pointer_with_content.children.push(ElementNode::leaf(nc("A"), "1"));
        assert!(!pointer_with_content.is_reference_only());
    }

    #[test]
    fn test_child_segment_positions() {
        let parent = ElementNode::new(nc("Crash"))
            .with_child(ElementNode::new(nc("Vehicle")))
            .with_child(ElementNode::new(nc("Driver")))
            .with_child(ElementNode::new(nc("Vehicle")));
        assert_eq!(parent.child_segment(0), "nc:Vehicle[1]");
        assert_eq!(parent.child_segment(1), "nc:Driver");
        assert_eq!(parent.child_segment(2), "nc:Vehicle[2]");
    }

    #[test]
    fn test_attribute_nodes() {
        let leaf = ElementNode::leaf(nc("PersonGivenName"), "Peter")
            .with_attribute(QName::new("urn:priv", "priv", "sensitive"), "true");
        let attrs: Vec<_> = leaf.attribute_nodes().collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].kind, ElementKind::Attribute);
        assert_eq!(attrs[0].text.as_deref(), Some("true"));
    }

    #[test]
    fn test_conventional_prefixes() {
        assert_eq!(conventional_prefix("http://release.niem.gov/niem/niem-core/4.0/"), Some("nc"));
        assert_eq!(
            conventional_prefix("https://docs.oasis-open.org/niemopen/ns/model/domains/jxdm/7.3/"),
            Some("j")
        );
        assert_eq!(conventional_prefix("http://www.w3.org/2001/XMLSchema-instance"), Some("xsi"));
        assert_eq!(conventional_prefix("http://example.com/CrashDriver/1.0/"), None);
    }

    #[test]
    fn test_canonical_prefixes_replace_source_prefixes() {
        let core = "http://release.niem.gov/niem/niem-core/5.0/";
        let root = ElementNode::new(QName::new("urn:cd", "x", "Report")).with_child(
            ElementNode::new(QName::new(core, "n", "Person"))
                .with_id("P01")
                .with_attribute(QName::new(core, "n", "sensitive"), "true"),
        );
        let mut namespaces = BTreeMap::new();
        namespaces.insert("n".to_string(), core.to_string());
        namespaces.insert("x".to_string(), "urn:cd".to_string());

        let tree = ElementTree::from_source(root, b"doc")
            .with_namespaces(namespaces)
            .canonicalize_prefixes(&PrefixTable::new().with_binding("cd", "urn:cd#"));

        assert_eq!(tree.root.name.to_string(), "cd:Report");
        let person = &tree.root.children[0];
        assert_eq!(person.name.to_string(), "nc:Person");
        let keys: Vec<String> = person.attributes.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["nc:sensitive".to_string()]);
        assert_eq!(tree.namespaces.get("nc").map(String::as_str), Some(core));
        assert!(!tree.namespaces.contains_key("n"));
    }

    #[test]
    fn test_prefix_clash_is_numbered() {
        let core = "http://release.niem.gov/niem/niem-core/5.0/";
        let root = ElementNode::new(QName::new("urn:other", "nc", "Report"))
            .with_child(ElementNode::leaf(QName::new(core, "core", "Name"), "x"));
        let tree = ElementTree::from_source(root, b"doc").canonicalize_prefixes(&PrefixTable::new());
        assert_eq!(tree.root.name.to_string(), "nc:Report");
        assert_eq!(tree.root.children[0].name.to_string(), "nc2:Name");
    }

    #[test]
    fn test_default_namespace_stays_unprefixed() {
        let root = ElementNode::new(QName {
            namespace: Some("urn:example".to_string()),
            prefix: None,
            local: "Report".to_string(),
        });
        let tree = ElementTree::from_source(root, b"doc").canonicalize_prefixes(&PrefixTable::new());
        assert_eq!(tree.root.name.to_string(), "Report");
        assert_eq!(tree.namespaces.get(""), Some(&"urn:example".to_string()));
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = Fingerprint::of_bytes(b"<a/>");
        let b = Fingerprint::of_bytes(b"<a/>");
        let c = Fingerprint::of_bytes(b"<b/>");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), Fingerprint::LEN);
    }

    #[test]
    fn test_tree_counts() {
        let root = ElementNode::new(nc("Root")).with_child(
            ElementNode::new(nc("Person")).with_child(ElementNode::leaf(nc("Name"), "x")),
        );
        let tree = ElementTree::from_source(root, b"doc");
        assert_eq!(tree.element_count(), 3);
        assert_eq!(tree.root.depth(), 3);
        assert_eq!(tree.root_path(), "/nc:Root");
    }
}
