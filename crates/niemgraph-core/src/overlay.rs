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

//! Metadata and privacy overlay.
//!
//! Metadata blocks never become nodes. Their fields are registered under the
//! block's declared id and merged onto whatever references them: nodes
//! through `structures:metadata`, edges through
//! `structures:relationshipMetadata`.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Warning, WarningKind};
use crate::graph::{merge_property, Properties};
use crate::reconcile::Workspace;
use crate::tree::Fingerprint;

/// Metadata fields per document and block id.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    blocks: HashMap<(Fingerprint, String), Properties>,
    order: Vec<(Fingerprint, String)>,
}

impl MetadataRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or extend) a block.
    pub fn register(&mut self, scope: &Fingerprint, raw_id: &str, fields: Properties) {
        let key = (scope.clone(), raw_id.to_string());
        match self.blocks.get_mut(&key) {
            Some(existing) => {
                for (field, value) in &fields {
                    merge_property(existing, field, value);
                }
            }
            None => {
                self.order.push(key.clone());
                self.blocks.insert(key, fields);
            }
        }
    }

    /// Fields of a block declared in `scope`. With `shared`, a block declared
    /// by another document is used when the scope has none, first
    /// registration winning.
    pub fn lookup(&self, scope: &Fingerprint, raw_id: &str, shared: bool) -> Option<&Properties> {
        let local = self.blocks.get(&(scope.clone(), raw_id.to_string()));
        if local.is_some() || !shared {
            return local;
        }
        self.order
            .iter()
            .find(|(_, id)| id == raw_id)
            .and_then(|key| self.blocks.get(key))
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when no block is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Merge metadata onto nodes and edges.
pub(crate) fn apply(workspace: &mut Workspace, shared: bool) {
    let attachments = std::mem::take(&mut workspace.attachments);
    let mut warnings = Vec::new();
    let mut applied = 0;

    for attachment in &attachments {
        for raw_id in &attachment.ids {
            let Some(fields) = workspace.metadata.lookup(&attachment.scope, raw_id, shared) else {
                warnings.push(unresolved(raw_id, &attachment.path));
                continue;
            };
            let fields = fields.clone();
            if let Some(node) = workspace.node_mut(&attachment.node) {
                for (key, value) in &fields {
                    merge_property(&mut node.properties, key, value);
                }
                applied += 1;
            }
        }
    }

    for edge in workspace.edges.iter_mut() {
        for raw_id in &edge.relationship_metadata {
            match workspace.metadata.lookup(&edge.scope, raw_id, shared) {
                Some(fields) => {
                    for (key, value) in fields {
                        merge_property(&mut edge.properties, key, value);
                    }
                    applied += 1;
                }
                None => warnings.push(unresolved(raw_id, &edge.path)),
            }
        }
    }

    for warning in warnings {
        workspace.warn(warning);
    }
    debug!(applied, "applied metadata overlay");
}

fn unresolved(raw_id: &str, path: &str) -> Warning {
    Warning::new(
        WarningKind::MetadataResolution,
        format!("metadata '{}' does not name a metadata block", raw_id),
        path,
    )
}
