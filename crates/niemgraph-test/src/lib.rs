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

//! Shared test fixtures and cross-format tests for niemgraph.
//!
//! Every fixture is one exchange written twice, as NIEM XML and as NIEM
//! JSON. The two forms must convert to graphs of the same shape, which is
//! what the parity tests in this crate check.
//!
//! # Quick Start
//!
//! ```rust
//! use niemgraph_core::ConvertConfig;
//! use niemgraph_test::{convert_fixture, fixtures, GraphCounts};
//!
//! let fixture = fixtures::crash_driver();
//! let (xml, json) = convert_fixture(&fixture, &ConvertConfig::default());
//! let counts = GraphCounts::of(&xml.unwrap().graph);
//! assert_eq!(counts.nodes, 19);
//! assert_eq!(counts.edges, 21);
//! assert_eq!(counts, GraphCounts::of(&json.unwrap().graph));
//! ```

#![deny(missing_docs)]

pub mod counts;
pub mod fixtures;

pub use counts::{same_shape, GraphCounts};
pub use fixtures::Fixture;

use niemgraph_core::{Conversion, ConvertConfig, ElementTree, Result};
use niemgraph_json::FromJsonConfig;
use niemgraph_xml::FromXmlConfig;

/// A list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> Fixture)>;

/// Normalize the XML form of a fixture.
pub fn xml_tree(fixture: &Fixture) -> Result<ElementTree> {
    Ok(niemgraph_xml::from_xml_str(&fixture.xml, &FromXmlConfig::default())?)
}

/// Normalize the JSON form of a fixture.
pub fn json_tree(fixture: &Fixture) -> Result<ElementTree> {
    Ok(niemgraph_json::from_json_str(&fixture.json, &FromJsonConfig::default())?)
}

/// Convert both forms of a fixture, XML first.
pub fn convert_fixture(fixture: &Fixture, config: &ConvertConfig) -> (Result<Conversion>, Result<Conversion>) {
    let xml = xml_tree(fixture).and_then(|tree| niemgraph_core::convert(&tree, config));
    let json = json_tree(fixture).and_then(|tree| niemgraph_core::convert(&tree, config));
    (xml, json)
}
