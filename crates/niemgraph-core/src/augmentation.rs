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

//! Augmentation flattening.

use tracing::debug;

use crate::graph::append_property;
use crate::reconcile::Workspace;

/// Merge every augmentation's leaf content onto its owner node.
///
/// A leaf whose key is already present on the owner is stored as
/// `<augmentation>.<leaf>` instead.
pub(crate) fn flatten(workspace: &mut Workspace) {
    let patches = std::mem::take(&mut workspace.augmentations);
    let mut merged = 0;

    for patch in patches {
        let Some(owner) = workspace.node_mut(&patch.owner) else {
            continue;
        };
        owner.flags.is_augmentation_host = true;
        for (key, value) in patch.properties {
            let key = if owner.properties.contains_key(&key) {
                format!("{}.{}", patch.augmentation, key)
            } else {
                key
            };
            for item in value.values() {
                append_property(&mut owner.properties, key.clone(), item.to_string());
            }
            merged += 1;
        }
    }

    debug!(properties = merged, "flattened augmentations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::AugmentationPatch;
    use crate::graph::{GraphNode, Properties, PropertyValue};

    fn workspace_with_charge() -> Workspace {
        let mut workspace = Workspace::default();
        let mut charge = GraphNode::new("f:CH01", "j:Charge");
        charge.properties.insert(
            "j:ChargeDescriptionText".to_string(),
            PropertyValue::from("Theft"),
        );
        workspace.add_node(charge);
        workspace
    }

    fn patch(entries: &[(&str, &str)]) -> AugmentationPatch {
        let mut properties = Properties::new();
        for (key, value) in entries {
            append_property(&mut properties, *key, value.to_string());
        }
        AugmentationPatch {
            owner: "f:CH01".to_string(),
            augmentation: "j:ChargeAugmentation".to_string(),
            properties,
        }
    }

    #[test]
    fn test_leaves_land_on_owner() {
        let mut workspace = workspace_with_charge();
        workspace.augmentations.push(patch(&[
            ("j:ChargeFelonyIndicator", "false"),
            ("j:ChargeDrugIndicator", "true"),
        ]));
        flatten(&mut workspace);

        let charge = workspace.node("f:CH01").unwrap();
        assert!(charge.flags.is_augmentation_host);
        assert_eq!(charge.property("j:ChargeFelonyIndicator"), Some("false"));
        assert_eq!(charge.property("j:ChargeDrugIndicator"), Some("true"));
        assert!(workspace.augmentations.is_empty());
    }

    #[test]
    fn test_collision_is_prefixed() {
        let mut workspace = workspace_with_charge();
        workspace
            .augmentations
            .push(patch(&[("j:ChargeDescriptionText", "Grand theft")]));
        flatten(&mut workspace);

        let charge = workspace.node("f:CH01").unwrap();
        assert_eq!(charge.property("j:ChargeDescriptionText"), Some("Theft"));
        assert_eq!(
            charge.property("j:ChargeAugmentation.j:ChargeDescriptionText"),
            Some("Grand theft")
        );
    }

    #[test]
    fn test_repeated_leaves_stay_lists() {
        let mut workspace = workspace_with_charge();
        workspace
            .augmentations
            .push(patch(&[("j:ChargeNote", "a"), ("j:ChargeNote", "b")]));
        flatten(&mut workspace);
        let charge = workspace.node("f:CH01").unwrap();
        assert_eq!(
            charge.properties["j:ChargeNote"],
            PropertyValue::Many(vec!["a".into(), "b".into()])
        );
    }
}
