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

//! Hub merging of role references.
//!
//! When two or more distinct role nodes point at the same raw id, a hub node
//! stands in for the real-world entity and each role node gets exactly one
//! REPRESENTS edge to it. Role references with a single role node stay
//! ordinary REFERS_TO edges.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::build::{LinkKind, PendingLink};
use crate::config::ConvertConfig;
use crate::graph::{EdgeType, GraphNode, PropertyValue};
use crate::reconcile::{HubScope, Workspace};

/// Identity of a hub: the raw id, plus the document when hubs are scoped to
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HubKey {
    /// Document fingerprint, `None` in shared scope.
    pub scope: Option<String>,
    /// Raw declared id.
    pub raw_id: String,
}

#[derive(Debug, Default)]
struct Claim {
    role_nodes: Vec<String>,
    hub_id: Option<String>,
}

/// Raw id to hub node id, filled the first time a second role node appears.
#[derive(Debug, Default)]
pub struct HubRegistry {
    claims: HashMap<HubKey, Claim>,
    created: Vec<HubKey>,
}

impl HubRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a role node for a key.
    ///
    /// Returns the hub id when this observation created the hub.
    pub fn observe(&mut self, key: &HubKey, role_node: &str, hub_id: impl FnOnce() -> String) -> Option<String> {
        let claim = self.claims.entry(key.clone()).or_default();
        if claim.role_nodes.iter().any(|n| n == role_node) {
            return None;
        }
        claim.role_nodes.push(role_node.to_string());
        if claim.role_nodes.len() == 2 && claim.hub_id.is_none() {
            let id = hub_id();
            claim.hub_id = Some(id.clone());
            self.created.push(key.clone());
            return Some(id);
        }
        None
    }

    /// Hub id of a key, if the key has one.
    pub fn hub_id(&self, key: &HubKey) -> Option<&str> {
        self.claims.get(key).and_then(|c| c.hub_id.as_deref())
    }

    /// Distinct role nodes seen for a key, in first-seen order.
    pub fn role_nodes(&self, key: &HubKey) -> &[String] {
        self.claims
            .get(key)
            .map(|c| c.role_nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Keys with hubs, in creation order.
    pub fn hubs(&self) -> impl Iterator<Item = &HubKey> {
        self.created.iter()
    }

    /// Number of hubs.
    pub fn len(&self) -> usize {
        self.created.len()
    }

    /// True when no hub exists.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

fn key_for(link: &PendingLink, scope: HubScope) -> HubKey {
    HubKey {
        scope: match scope {
            HubScope::Document => Some(link.scope.to_string()),
            HubScope::Shared => None,
        },
        raw_id: link.raw_id.clone(),
    }
}

/// Create hubs and REPRESENTS edges; turn the remaining role links into
/// ordinary references.
pub(crate) fn merge(workspace: &mut Workspace, config: &ConvertConfig, scope: HubScope) {
    let role_links = workspace.take_links(LinkKind::Role);
    let mut registry = HubRegistry::new();

    for link in &role_links {
        let key = key_for(link, scope);
        let created = registry.observe(&key, &link.owner, || {
            format!("{}:hub:{}", link.scope, link.raw_id)
        });
        if let Some(hub_id) = created {
            let mut hub = GraphNode::new(hub_id, config.hub_label.clone());
            hub.flags.is_hub = true;
            workspace.add_node(hub);
        }
    }

    for key in registry.hubs() {
        let Some(hub_id) = registry.hub_id(key) else {
            continue;
        };
        let role_nodes = registry.role_nodes(key);
        let role_types: BTreeSet<String> = role_nodes
            .iter()
            .filter_map(|id| workspace.node(id))
            .map(|n| n.node_type.clone())
            .collect();
        let entity_ids: BTreeSet<String> = role_links
            .iter()
            .filter(|l| &key_for(l, scope) == key)
            .filter_map(|l| l.target.clone())
            .collect();
        let role_count = role_nodes.len();

        if let Some(hub) = workspace.node_mut(hub_id) {
            hub.properties.insert(
                "roleTypes".to_string(),
                PropertyValue::Many(role_types.iter().cloned().collect()),
            );
            hub.properties.insert(
                "roleCount".to_string(),
                PropertyValue::Single(role_count.to_string()),
            );
            hub.properties.insert(
                "entityIds".to_string(),
                PropertyValue::Many(entity_ids.into_iter().collect()),
            );
            hub.role_types = role_types;
        }
    }

    let mut represented: BTreeSet<(HubKey, String)> = BTreeSet::new();
    for link in role_links {
        let key = key_for(&link, scope);
        match registry.hub_id(&key) {
            Some(hub_id) => {
                if represented.insert((key.clone(), link.owner.clone())) {
                    let hub_id = hub_id.to_string();
                    workspace.edges.push(link.into_edge(EdgeType::Represents, hub_id));
                }
            }
            None => {
                if let Some(target) = link.target.clone() {
                    workspace.edges.push(link.into_edge(EdgeType::RefersTo, target));
                }
            }
        }
    }

    debug!(hubs = registry.len(), "merged role references");
}
