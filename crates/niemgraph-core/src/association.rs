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

//! Association endpoints.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::build::{LinkKind, PendingLink};
use crate::error::{Warning, WarningKind};
use crate::graph::{EdgeType, PropertyValue};
use crate::reconcile::Workspace;

/// Emit ASSOCIATED_WITH edges for every association node with at least two
/// distinct resolved endpoints, dropping any CONTAINS edge that duplicates
/// one. Associations short of that are demoted to ordinary entities and
/// their endpoints become REFERS_TO edges.
pub(crate) fn finalize(workspace: &mut Workspace) {
    let mut by_owner: HashMap<String, Vec<PendingLink>> = HashMap::new();
    for link in workspace.take_links(LinkKind::Endpoint) {
        by_owner.entry(link.owner.clone()).or_default().push(link);
    }

    let associations: Vec<String> = workspace
        .nodes
        .iter()
        .filter(|n| n.flags.is_association)
        .map(|n| n.id.clone())
        .collect();

    let mut kept = 0;
    for id in associations {
        let endpoints = by_owner.remove(&id).unwrap_or_default();
        let distinct = endpoints
            .iter()
            .map(|l| {
                (
                    l.target.as_deref(),
                    l.properties.get("role").and_then(PropertyValue::as_str),
                )
            })
            .collect::<BTreeSet<_>>()
            .len();

        if distinct >= 2 {
            kept += 1;
            // an endpoint declared inline is not also a contained child
            let targets: BTreeSet<String> =
                endpoints.iter().filter_map(|l| l.target.clone()).collect();
            workspace.edges.retain(|e| {
                !(e.edge_type == EdgeType::Contains && e.source == id && targets.contains(&e.target))
            });
            for link in endpoints {
                if let Some(target) = link.target.clone() {
                    workspace
                        .edges
                        .push(link.into_edge(EdgeType::AssociatedWith, target));
                }
            }
            continue;
        }

        if let Some(node) = workspace.node_mut(&id) {
            node.flags.is_association = false;
        }
        let path = workspace.node_paths.get(&id).cloned().unwrap_or_else(|| id.clone());
        workspace.warn(Warning::new(
            WarningKind::AssociationDemoted,
            format!(
                "association has {} resolved endpoint(s), kept as an entity",
                distinct
            ),
            path,
        ));
        demote(workspace, endpoints);
    }

    // endpoints whose owner is not an association node
    let mut leftovers: Vec<PendingLink> = by_owner.into_values().flatten().collect();
    leftovers.sort_by(|a, b| a.path.cmp(&b.path));
    demote(workspace, leftovers);

    debug!(associations = kept, "finalized associations");
}

fn demote(workspace: &mut Workspace, links: Vec<PendingLink>) {
    for link in links {
        if let Some(target) = link.target.clone() {
            workspace.edges.push(link.into_edge(EdgeType::RefersTo, target));
        }
    }
}
