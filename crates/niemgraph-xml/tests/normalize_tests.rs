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

//! Normalization and end-to-end conversion of NIEM XML.

use niemgraph_core::{ConversionError, ConvertConfig, EdgeType, ElementKind};
use niemgraph_xml::{convert_xml, from_xml_str, FromXmlConfig, XmlError};
use proptest::prelude::*;

const HEADER: &str = r#"xmlns:nc="http://release.niem.gov/niem/niem-core/5.0/"
    xmlns:j="http://release.niem.gov/niem/domains/jxdm/7.0/"
    xmlns:structures="http://release.niem.gov/niem/structures/5.0/"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#;

fn doc(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?>
<j:Report {}>
{}
</j:Report>"#, HEADER, body)
}

#[test]
fn test_prolog_and_comments_are_ignored() {
    let xml = doc("<!-- a note --><nc:Person structures:id=\"P01\"/>");
    let tree = from_xml_str(&xml, &FromXmlConfig::default()).unwrap();
    assert_eq!(tree.root.children.len(), 1);
    assert_eq!(tree.root.children[0].kind, ElementKind::Complex);
}

#[test]
fn test_cdata_is_text() {
    let xml = doc("<nc:Note><![CDATA[a < b]]></nc:Note>");
    let tree = from_xml_str(&xml, &FromXmlConfig::default()).unwrap();
    assert_eq!(tree.root.children[0].text.as_deref(), Some("a < b"));
}

#[test]
fn test_default_namespace_binds_unprefixed_names() {
    let xml = r#"<Report xmlns="urn:example"><Item>1</Item></Report>"#;
    let tree = from_xml_str(xml, &FromXmlConfig::default()).unwrap();
    assert_eq!(tree.root.name.namespace.as_deref(), Some("urn:example"));
    assert_eq!(tree.root.name.to_string(), "Report");
    assert_eq!(tree.namespaces.get(""), Some(&"urn:example".to_string()));
}

#[test]
fn test_declared_root_accepted() {
    let config = FromXmlConfig::default().with_root("j:Report");
    assert!(from_xml_str(&doc(""), &config).is_ok());
}

#[test]
fn test_two_roots_rejected() {
    let err = from_xml_str("<a/><b/>", &FromXmlConfig::default()).unwrap_err();
    assert!(matches!(err, XmlError::Structure { .. } | XmlError::Parse { .. }));
}

#[test]
fn test_convert_hub_from_xml() {
    let xml = doc(
        r#"<nc:Person structures:id="P01"><nc:PersonGivenName>Peter</nc:PersonGivenName></nc:Person>
<j:CrashDriver><nc:RoleOfPerson structures:ref="P01"/></j:CrashDriver>
<j:Arrestee><nc:RoleOfPerson structures:ref="P01"/></j:Arrestee>"#,
    );
    let conversion = convert_xml(
        xml.as_bytes(),
        &FromXmlConfig::default(),
        &ConvertConfig::default(),
    )
    .unwrap();
    let graph = &conversion.graph;
    assert_eq!(graph.hubs().count(), 1);
    assert_eq!(graph.edges_of_type(EdgeType::Represents).count(), 2);
    assert_eq!(graph.edges_of_type(EdgeType::RefersTo).count(), 0);

    let person = graph.nodes_of_type("nc:Person").next().unwrap();
    assert_eq!(person.property("nc:PersonGivenName"), Some("Peter"));
    assert!(person.id.ends_with(":P01"));
}

#[test]
fn test_dangling_reference_path_from_xml() {
    let xml = doc(r#"<j:Charge><j:ChargeSubject structures:ref="P99"/></j:Charge>"#);
    let err = convert_xml(
        xml.as_bytes(),
        &FromXmlConfig::default(),
        &ConvertConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConversionError::DanglingReference {
            raw_id: "P99".to_string(),
            path: "/j:Report/j:Charge/j:ChargeSubject".to_string(),
        }
    );
}

#[test]
fn test_nil_pointer_is_tolerated() {
    let xml = doc(r#"<j:Charge><j:ChargeSubject structures:ref="P99" xsi:nil="true"/></j:Charge>"#);
    let conversion = convert_xml(
        xml.as_bytes(),
        &FromXmlConfig::default(),
        &ConvertConfig::default(),
    )
    .unwrap();
    assert_eq!(conversion.graph.edges_of_type(EdgeType::RefersTo).count(), 0);
    assert_eq!(conversion.warnings.len(), 1);
}

#[test]
fn test_malformed_input_is_a_parse_error() {
    let err = convert_xml(
        b"<j:Report><unclosed></j:Report>",
        &FromXmlConfig::default(),
        &ConvertConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConversionError::Parse { .. }));
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

proptest! {
    #[test]
    fn escaped_text_survives(text in "[a-zA-Z0-9 &<>]{0,40}") {
        let xml = format!("<Note>{}</Note>", escape(&text));
        let tree = from_xml_str(&xml, &FromXmlConfig::default()).unwrap();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            prop_assert_eq!(tree.root.text, None);
        } else {
            prop_assert_eq!(tree.root.text.as_deref(), Some(trimmed));
        }
    }

    #[test]
    fn same_bytes_same_fingerprint(text in "[a-z]{1,20}") {
        let xml = format!("<Note>{}</Note>", text);
        let a = from_xml_str(&xml, &FromXmlConfig::default()).unwrap();
        let b = from_xml_str(&xml, &FromXmlConfig::default()).unwrap();
        prop_assert_eq!(a.fingerprint, b.fingerprint);
    }
}
