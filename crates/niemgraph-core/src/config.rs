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

//! Conversion configuration and mapping rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Conservative nesting depth for untrusted documents.
pub const UNTRUSTED_MAX_DEPTH: usize = 64;

/// Conservative node limit for untrusted documents.
pub const UNTRUSTED_MAX_NODES: usize = 1_000_000;

/// How elements are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Structural classification only.
    #[default]
    Dynamic,
    /// Mapping table first, structural classification as fallback.
    Mapping,
}

/// What a mapped type turns into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// A node, optionally with a custom label instead of the qualified name.
    Node {
        /// Node type override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Flattened onto the nearest node with dotted keys.
    Property,
    /// An association node with endpoint edges.
    Association,
    /// Content merged onto the owning node.
    Augmentation,
    /// A metadata block.
    Metadata,
    /// A role reference eligible for hub merging.
    Role,
}

/// Qualified type name (`prefix:Local`) to [`Rule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    rules: BTreeMap<String, Rule>,
}

impl MappingTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, type_name: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.rules.insert(type_name.into(), rule)
    }

    /// Fluent form of [`MappingTable::insert`].
    pub fn with_rule(mut self, type_name: impl Into<String>, rule: Rule) -> Self {
        self.insert(type_name, rule);
        self
    }

    /// Rule for a qualified type name.
    pub fn get(&self, type_name: &str) -> Option<&Rule> {
        self.rules.get(type_name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are defined.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Rule)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (String, Rule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Configuration for [`convert`](crate::convert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Dynamic or mapping-driven classification (default: dynamic).
    pub mode: ConversionMode,

    /// Fail on references to undeclared ids (default: true).
    pub strict_references: bool,

    /// Tolerate unresolved `xsi:nil` pointers even under strict references
    /// (default: true).
    pub lenient_nil_references: bool,

    /// Resolve references to ids declared later in the document
    /// (default: true).
    pub allow_forward_references: bool,

    /// Fail on complex elements with no mapping rule in mapping mode
    /// (default: false).
    pub strict_mapping: bool,

    /// Type rules used in mapping mode.
    pub mapping_table: MappingTable,

    /// Type of synthesized hub nodes (default: `Entity`).
    pub hub_label: String,

    /// Local-name prefix of role references (default: `RoleOf`).
    pub role_prefix: String,

    /// Local-name suffix of augmentation elements (default: `Augmentation`).
    pub augmentation_suffix: String,

    /// Local-name suffix of metadata blocks (default: `Metadata`).
    pub metadata_suffix: String,

    /// Maximum element nesting depth (default: 256).
    pub max_depth: usize,

    /// Maximum number of graph nodes per document (default: unlimited).
    pub max_nodes: Option<usize>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Dynamic,
            strict_references: true,
            lenient_nil_references: true,
            allow_forward_references: true,
            strict_mapping: false,
            mapping_table: MappingTable::new(),
            hub_label: "Entity".to_string(),
            role_prefix: "RoleOf".to_string(),
            augmentation_suffix: "Augmentation".to_string(),
            metadata_suffix: "Metadata".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: None,
        }
    }
}

impl ConvertConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder::new()
    }

    /// Tight limits for documents from unknown sources.
    pub fn for_untrusted_input() -> Self {
        Self {
            max_depth: UNTRUSTED_MAX_DEPTH,
            max_nodes: Some(UNTRUSTED_MAX_NODES),
            ..Self::default()
        }
    }

    /// Switch to mapping mode with the given table.
    pub fn with_mapping(mut self, table: MappingTable) -> Self {
        self.mode = ConversionMode::Mapping;
        self.mapping_table = table;
        self
    }

    /// Fail on unmapped complex elements.
    pub fn with_strict_mapping(mut self) -> Self {
        self.strict_mapping = true;
        self
    }

    /// Warn instead of failing on unresolved references.
    pub fn with_lenient_references(mut self) -> Self {
        self.strict_references = false;
        self
    }

    /// Treat unresolved nil pointers like any other reference.
    pub fn with_strict_nil_references(mut self) -> Self {
        self.lenient_nil_references = false;
        self
    }

    /// Only resolve references to ids declared earlier.
    pub fn without_forward_references(mut self) -> Self {
        self.allow_forward_references = false;
        self
    }

    /// Set the hub node type.
    pub fn with_hub_label(mut self, label: impl Into<String>) -> Self {
        self.hub_label = label.into();
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the node limit.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Mapping rule for a type, honored only in mapping mode.
    pub fn rule_for(&self, type_name: &str) -> Option<&Rule> {
        match self.mode {
            ConversionMode::Mapping => self.mapping_table.get(type_name),
            ConversionMode::Dynamic => None,
        }
    }
}

/// Builder for [`ConvertConfig`].
///
/// ```
/// use niemgraph_core::{ConvertConfig, ConversionMode};
///
/// let config = ConvertConfig::builder()
///     .strict_references(false)
///     .hub_label("Person")
///     .max_nodes(10_000)
///     .build();
/// assert_eq!(config.mode, ConversionMode::Dynamic);
/// assert!(!config.strict_references);
/// ```
#[derive(Debug, Default)]
pub struct ConvertConfigBuilder {
    mode: Option<ConversionMode>,
    strict_references: Option<bool>,
    lenient_nil_references: Option<bool>,
    allow_forward_references: Option<bool>,
    strict_mapping: Option<bool>,
    mapping_table: Option<MappingTable>,
    hub_label: Option<String>,
    role_prefix: Option<String>,
    augmentation_suffix: Option<String>,
    metadata_suffix: Option<String>,
    max_depth: Option<usize>,
    max_nodes: Option<Option<usize>>,
}

impl ConvertConfigBuilder {
    /// Builder with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification mode.
    pub fn mode(mut self, mode: ConversionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the reference policy.
    pub fn strict_references(mut self, strict: bool) -> Self {
        self.strict_references = Some(strict);
        self
    }

    /// Set the nil pointer policy.
    pub fn lenient_nil_references(mut self, lenient: bool) -> Self {
        self.lenient_nil_references = Some(lenient);
        self
    }

    /// Allow or forbid forward references.
    pub fn allow_forward_references(mut self, allow: bool) -> Self {
        self.allow_forward_references = Some(allow);
        self
    }

    /// Set the strict mapping flag.
    pub fn strict_mapping(mut self, strict: bool) -> Self {
        self.strict_mapping = Some(strict);
        self
    }

    /// Set the mapping table.
    pub fn mapping_table(mut self, table: MappingTable) -> Self {
        self.mapping_table = Some(table);
        self
    }

    /// Set the hub node type.
    pub fn hub_label(mut self, label: impl Into<String>) -> Self {
        self.hub_label = Some(label.into());
        self
    }

    /// Set the role reference prefix.
    pub fn role_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.role_prefix = Some(prefix.into());
        self
    }

    /// Set the augmentation suffix.
    pub fn augmentation_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.augmentation_suffix = Some(suffix.into());
        self
    }

    /// Set the metadata suffix.
    pub fn metadata_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.metadata_suffix = Some(suffix.into());
        self
    }

    /// Set the maximum depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the node limit.
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(Some(max_nodes));
        self
    }

    /// Remove the node limit.
    pub fn unlimited_nodes(mut self) -> Self {
        self.max_nodes = Some(None);
        self
    }

    /// Build, falling back to defaults for unset fields.
    pub fn build(self) -> ConvertConfig {
        let defaults = ConvertConfig::default();
        ConvertConfig {
            mode: self.mode.unwrap_or(defaults.mode),
            strict_references: self
                .strict_references
                .unwrap_or(defaults.strict_references),
            lenient_nil_references: self
                .lenient_nil_references
                .unwrap_or(defaults.lenient_nil_references),
            allow_forward_references: self
                .allow_forward_references
                .unwrap_or(defaults.allow_forward_references),
            strict_mapping: self.strict_mapping.unwrap_or(defaults.strict_mapping),
            mapping_table: self.mapping_table.unwrap_or(defaults.mapping_table),
            hub_label: self.hub_label.unwrap_or(defaults.hub_label),
            role_prefix: self.role_prefix.unwrap_or(defaults.role_prefix),
            augmentation_suffix: self
                .augmentation_suffix
                .unwrap_or(defaults.augmentation_suffix),
            metadata_suffix: self.metadata_suffix.unwrap_or(defaults.metadata_suffix),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
        }
    }
}
