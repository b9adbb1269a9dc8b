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

//! Element classification.
//!
//! [`classify`] is the single decision point that maps an element onto the
//! closed [`Shape`] set. The builder dispatches on the result and never looks
//! at mapping rules or naming conventions itself.

use crate::config::{ConversionMode, ConvertConfig, Rule};
use crate::error::{ConversionError, Result};
use crate::tree::{ElementKind, ElementNode};

/// What an element turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Property on the nearest node. Complex leaves are flattened with dotted
    /// keys.
    Leaf,
    /// Pointer to another element. `role` marks hub candidates.
    ReferenceOnly {
        /// Role reference.
        role: bool,
    },
    /// Ordinary node, optionally relabeled.
    Entity {
        /// Type override from the mapping table.
        label: Option<String>,
    },
    /// Association node with endpoint edges.
    Association,
    /// Content merged onto the owner.
    Augmentation,
    /// Metadata block, no node.
    Metadata,
}

/// Classify one element.
///
/// Pointers and attribute-like leaves never consult the mapping table except
/// to learn whether a pointer is a role. Strict mapping only fails on complex
/// elements.
pub fn classify(element: &ElementNode, config: &ConvertConfig, path: &str) -> Result<Shape> {
    if element.kind == ElementKind::Attribute {
        return Ok(Shape::Leaf);
    }

    let type_name = element.name.to_string();
    let rule = config.rule_for(&type_name);

    if element.is_reference_only() {
        return Ok(Shape::ReferenceOnly {
            role: is_role_pointer(element, config),
        });
    }

    // augmentations merge onto their owner whatever the table says
    if is_augmentation_name(element, config) && element.text.is_none() {
        return Ok(Shape::Augmentation);
    }

    match rule {
        Some(Rule::Node { label }) => {
            return Ok(Shape::Entity {
                label: label.clone(),
            })
        }
        Some(Rule::Property) => return Ok(Shape::Leaf),
        Some(Rule::Association) => return Ok(Shape::Association),
        Some(Rule::Augmentation) => return Ok(Shape::Augmentation),
        Some(Rule::Metadata) => return Ok(Shape::Metadata),
        Some(Rule::Role) => {}
        None => {
            if config.mode == ConversionMode::Mapping
                && config.strict_mapping
                && element.kind == ElementKind::Complex
            {
                return Err(ConversionError::MissingMapping {
                    type_name,
                    path: path.to_string(),
                });
            }
        }
    }

    Ok(structural(element, config))
}

/// True when a mapping-mode conversion fell back to structural rules.
pub(crate) fn is_unmapped(element: &ElementNode, config: &ConvertConfig) -> bool {
    config.mode == ConversionMode::Mapping
        && element.kind == ElementKind::Complex
        && !element.is_reference_only()
        && !(is_augmentation_name(element, config) && element.text.is_none())
        && config.rule_for(&element.name.to_string()).is_none()
}

fn structural(element: &ElementNode, config: &ConvertConfig) -> Shape {
    if element.declared_id.is_some() && element.name.local.ends_with(&config.metadata_suffix) {
        return Shape::Metadata;
    }
    if element.kind != ElementKind::Complex {
        return Shape::Leaf;
    }

    // a role holder is an entity even when it points at two things
    if element
        .children
        .iter()
        .any(|c| c.is_reference_only() && is_role_pointer(c, config))
    {
        return Shape::Entity { label: None };
    }

    let pointers = element
        .children
        .iter()
        .filter(|c| c.is_reference_only())
        .count();
    let complex = element
        .children
        .iter()
        .filter(|c| {
            c.kind == ElementKind::Complex
                && !c.is_reference_only()
                && !is_augmentation_name(c, config)
        })
        .count();

    if pointers >= 2 && complex == 0 {
        Shape::Association
    } else {
        Shape::Entity { label: None }
    }
}

fn is_augmentation_name(element: &ElementNode, config: &ConvertConfig) -> bool {
    element.name.local.ends_with(&config.augmentation_suffix)
}

/// True for a pointer that says "this element is a role of" its target.
pub(crate) fn is_role_pointer(element: &ElementNode, config: &ConvertConfig) -> bool {
    matches!(config.rule_for(&element.name.to_string()), Some(Rule::Role))
        || element.name.local.starts_with(&config.role_prefix)
}
