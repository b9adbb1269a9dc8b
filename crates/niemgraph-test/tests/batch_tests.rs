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

//! Standard and shared-namespace batches across fixture documents.

use niemgraph_core::{BatchConfig, BatchConverter, ConversionError, ConvertConfig, EdgeType, WarningKind};
use niemgraph_test::fixtures::{crash_driver, shared_person, shared_role};
use niemgraph_test::{json_tree, xml_tree, GraphCounts};

#[test]
fn test_standard_batch_isolates_documents() {
    let trees = vec![
        xml_tree(&shared_person()).unwrap(),
        xml_tree(&shared_role()).unwrap(),
        json_tree(&crash_driver()).unwrap(),
    ];
    let results = BatchConverter::new(ConvertConfig::default()).convert_all(&trees);

    assert_eq!(results.total(), 3);
    assert_eq!(results.success_count(), 2);
    let failure = results.failures().next().unwrap();
    assert_eq!(failure.index, 1);
    assert!(matches!(
        failure.result,
        Err(ConversionError::DanglingReference { ref raw_id, .. }) if raw_id == "P01"
    ));
    // 3 nodes from the person document, 19 from the crash report
    assert_eq!(results.total_nodes(), 22);
}

#[test]
fn test_shared_batch_resolves_across_documents() {
    let trees = vec![
        xml_tree(&shared_person()).unwrap(),
        json_tree(&shared_role()).unwrap(),
    ];
    let conversion = BatchConverter::new(ConvertConfig::default())
        .convert_shared(&trees)
        .unwrap();
    let graph = &conversion.graph;

    let counts = GraphCounts::of(graph);
    assert_eq!(counts.nodes, 7);
    assert_eq!(counts.hubs, 1);
    assert_eq!(counts.represents, 2);
    assert_eq!(counts.contains, 4);
    assert_eq!(counts.refers_to, 0);

    let person = graph.nodes_of_type("nc:Person").next().unwrap();
    assert!(person.id.starts_with(trees[0].fingerprint.as_str()));
    let hub = graph.hubs().next().unwrap();
    assert_eq!(hub.properties["entityIds"].values(), vec![person.id.as_str()]);
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_shared_batch_warns_on_duplicate_declarations() {
    let trees = vec![
        xml_tree(&shared_person()).unwrap(),
        json_tree(&shared_person()).unwrap(),
        xml_tree(&shared_role()).unwrap(),
    ];
    let conversion = BatchConverter::new(ConvertConfig::default())
        .convert_shared(&trees)
        .unwrap();

    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::DuplicateDeclaration));
    // one role node per document, all on the same hub
    assert_eq!(conversion.graph.hubs().count(), 1);
    assert_eq!(conversion.graph.edges_of_type(EdgeType::Represents).count(), 3);
    assert_eq!(conversion.graph.nodes_of_type("nc:Person").count(), 2);
}

#[test]
fn test_parallel_batch_matches_serial() {
    let trees: Vec<_> = (0..6)
        .map(|n| if n % 2 == 0 { xml_tree(&crash_driver()) } else { json_tree(&crash_driver()) })
        .collect::<Result<_, _>>()
        .unwrap();

    let serial = BatchConverter::new(ConvertConfig::default())
        .with_batch_config(BatchConfig {
            parallel_threshold: 100,
            max_threads: None,
        })
        .convert_all(&trees);
    let parallel = BatchConverter::new(ConvertConfig::default())
        .with_batch_config(BatchConfig {
            parallel_threshold: 2,
            max_threads: Some(3),
        })
        .convert_all(&trees);

    assert!(parallel.all_succeeded());
    for (a, b) in serial.documents.iter().zip(&parallel.documents) {
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.result, b.result);
    }
}
