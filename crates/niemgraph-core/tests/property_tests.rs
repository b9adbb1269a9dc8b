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

//! Property-based tests for determinism and graph invariants.

use std::collections::BTreeSet;

use niemgraph_core::{convert, ConvertConfig, EdgeType, ElementNode, ElementTree, QName};
use proptest::prelude::*;

const NAMES: &[&str] = &[
    "Person",
    "Charge",
    "Vehicle",
    "Note",
    "RoleOfPerson",
    "ChargeAugmentation",
    "PrivacyMetadata",
    "Association",
];

fn qname(index: usize) -> QName {
    QName::new("urn:test", "t", NAMES[index % NAMES.len()])
}

fn raw_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("P0"), Just("P1"), Just("P2"), Just("P3")].prop_map(str::to_string)
}

fn element() -> impl Strategy<Value = ElementNode> {
    let leaf = prop_oneof![
        (0..NAMES.len(), "[a-z]{0,6}").prop_map(|(n, text)| ElementNode::leaf(qname(n), text)),
        (0..NAMES.len(), raw_id()).prop_map(|(n, id)| ElementNode::pointer(qname(n), id)),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            0..NAMES.len(),
            prop::collection::vec(inner, 1..5),
            prop::option::of(raw_id()),
        )
            .prop_map(|(n, children, id)| {
                let element = ElementNode::new(qname(n)).with_children(children);
                match id {
                    Some(id) => element.with_id(id),
                    None => element,
                }
            })
    })
}

fn document() -> impl Strategy<Value = ElementTree> {
    prop::collection::vec(element(), 1..6).prop_map(|children| {
        let root = ElementNode::new(QName::new("urn:test", "t", "Report")).with_children(children);
        let seed = format!("{:?}", root);
        ElementTree::from_source(root, seed.as_bytes())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn conversion_is_deterministic(tree in document()) {
        let config = ConvertConfig::default().with_lenient_references();
        let first = convert(&tree, &config);
        let second = convert(&tree, &config);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn ids_are_scoped_and_unique(tree in document()) {
        let config = ConvertConfig::default().with_lenient_references();
        if let Ok(conversion) = convert(&tree, &config) {
            let prefix = format!("{}:", tree.fingerprint);
            let graph = &conversion.graph;
            let ids: BTreeSet<&str> = graph.node_ids();
            prop_assert_eq!(ids.len(), graph.node_count());
            prop_assert!(ids.iter().all(|id| id.starts_with(&prefix)));
            prop_assert_eq!(graph.edge_ids().len(), graph.edge_count());
            for edge in &graph.edges {
                prop_assert!(ids.contains(edge.source.as_str()));
                prop_assert!(ids.contains(edge.target.as_str()));
            }
        }
    }

    #[test]
    fn structural_invariants_hold(tree in document()) {
        let config = ConvertConfig::default().with_lenient_references();
        if let Ok(conversion) = convert(&tree, &config) {
            let graph = &conversion.graph;

            prop_assert_eq!(graph.nodes_of_type("t:ChargeAugmentation").count(), 0);

            for hub in graph.hubs() {
                let represents: BTreeSet<&str> = graph
                    .incoming(&hub.id)
                    .filter(|e| e.edge_type == EdgeType::Represents)
                    .map(|e| e.source.as_str())
                    .collect();
                let incoming = graph
                    .incoming(&hub.id)
                    .filter(|e| e.edge_type == EdgeType::Represents)
                    .count();
                prop_assert!(represents.len() >= 2);
                prop_assert_eq!(represents.len(), incoming);
                let role_count = represents.len().to_string();
                prop_assert_eq!(hub.property("roleCount"), Some(role_count.as_str()));
            }

            for association in graph.associations() {
                let endpoints = graph
                    .outgoing(&association.id)
                    .filter(|e| e.edge_type == EdgeType::AssociatedWith)
                    .count();
                prop_assert!(endpoints >= 2);
            }
        }
    }
}
