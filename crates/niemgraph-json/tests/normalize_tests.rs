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

//! Conversion of NIEM JSON documents.

use niemgraph_core::{ConversionError, ConvertConfig, EdgeType, WarningKind};
use niemgraph_json::{convert_json, from_json_str, FromJsonConfig};
use proptest::prelude::*;

const CONTEXT: &str = r##""@context": {
    "nc": "http://release.niem.gov/niem/niem-core/5.0/#",
    "j": "http://release.niem.gov/niem/domains/jxdm/7.0/#",
    "priv": "http://example.com/privacy/1.0/#",
    "structures": "http://release.niem.gov/niem/structures/5.0/#"
}"##;

fn convert(body: &str) -> niemgraph_core::Result<niemgraph_core::Conversion> {
    let json = format!(r#"{{{}, "j:Report": {{{}}}}}"#, CONTEXT, body);
    convert_json(json.as_bytes(), &FromJsonConfig::default(), &ConvertConfig::default())
}

#[test]
fn test_hub_from_json() {
    let conversion = convert(
        r#""nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"},
           "j:CrashDriver": {"nc:RoleOfPerson": {"@id": "P01"}},
           "j:Arrestee": {"nc:RoleOfPerson": {"@ref": "P01"}}"#,
    )
    .unwrap();
    let graph = &conversion.graph;
    assert_eq!(graph.hubs().count(), 1);
    assert_eq!(graph.edges_of_type(EdgeType::Represents).count(), 2);
    let person = graph.nodes_of_type("nc:Person").next().unwrap();
    assert_eq!(person.property("nc:PersonGivenName"), Some("Peter"));
}

#[test]
fn test_metadata_overlay_from_json() {
    let conversion = convert(
        r#""nc:Person": {"@id": "P01", "@metadata": "M1", "nc:PersonGivenName": "Peter"},
           "priv:PrivacyMetadata": {"@id": "M1", "priv:PrivacyCode": "PII"}"#,
    )
    .unwrap();
    let graph = &conversion.graph;
    assert_eq!(graph.nodes_of_type("priv:PrivacyMetadata").count(), 0);
    let person = graph.nodes_of_type("nc:Person").next().unwrap();
    assert_eq!(person.property("priv:PrivacyCode"), Some("PII"));
    assert!(conversion.warnings.is_empty());
}

#[test]
fn test_missing_metadata_is_a_warning() {
    let conversion = convert(r#""nc:Person": {"@id": "P01", "@metadata": "M9", "nc:Name": "x"}"#)
        .unwrap();
    assert_eq!(conversion.warnings.len(), 1);
    assert_eq!(conversion.warnings[0].kind, WarningKind::MetadataResolution);
}

#[test]
fn test_dangling_reference_from_json() {
    let err = convert(r#""j:Charge": {"j:ChargeSubject": {"@ref": "P99"}}"#).unwrap_err();
    assert_eq!(
        err,
        ConversionError::DanglingReference {
            raw_id: "P99".to_string(),
            path: "/j:Report/j:Charge/j:ChargeSubject".to_string(),
        }
    );
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let err = convert_json(b"{\"a\": ", &FromJsonConfig::default(), &ConvertConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConversionError::Parse { .. }));
}

#[test]
fn test_vocab_binds_unprefixed_keys() {
    let json = r#"{"@context": {"@vocab": "urn:example#"}, "Report": {"Item": 1}}"#;
    let tree = from_json_str(json, &FromJsonConfig::default()).unwrap();
    assert_eq!(tree.root.name.namespace.as_deref(), Some("urn:example"));
    assert_eq!(tree.root.children[0].text.as_deref(), Some("1"));
}

proptest! {
    #[test]
    fn repeated_values_keep_order(values in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let items: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
        let json = format!(r#"{{"Report": {{"Item": [{}]}}}}"#, items.join(", "));
        let tree = from_json_str(&json, &FromJsonConfig::default()).unwrap();
        let texts: Vec<&str> = tree
            .root
            .children
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect();
        prop_assert_eq!(texts, values.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
