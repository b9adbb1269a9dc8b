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

//! NIEM JSON normalizer
//!
//! Reads NIEM JSON (the JSON-LD serialization of NIEM exchanges) into the
//! format-neutral [`ElementTree`](niemgraph_core::ElementTree) used by
//! `niemgraph-core`. A document and its XML twin normalize to trees that
//! convert to the same graph shape.
//!
//! | JSON | Element tree |
//! |------|--------------|
//! | `@context` prefix table | namespace bindings, trailing `#` removed |
//! | `@id` | declared id, or a reference when it is the only content |
//! | `@ref`, `@uri: "#id"` | reference |
//! | `@metadata`, `@relationshipMetadata` | metadata id lists |
//! | `@xsi:nil`, `@nil`, `null` | nil |
//! | `@value`, `rdf:value` | simple content |
//! | other `@`-keys | ordinary attributes |
//! | arrays | repeated sibling elements |
//!
//! # Example
//!
//! ```rust
//! use niemgraph_json::{from_json_str, FromJsonConfig};
//!
//! let json = r#"{
//!   "@context": {"nc": "http://release.niem.gov/niem/niem-core/5.0/#"},
//!   "nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"}
//! }"#;
//!
//! let tree = from_json_str(json, &FromJsonConfig::default()).unwrap();
//! assert_eq!(tree.root.declared_id.as_deref(), Some("P01"));
//! assert_eq!(
//!     tree.root.name.namespace.as_deref(),
//!     Some("http://release.niem.gov/niem/niem-core/5.0/")
//! );
//! ```

#![deny(missing_docs)]

mod from_json;

pub use from_json::{
    from_json, from_json_str, FromJsonConfig, JsonError, Result, DEFAULT_MAX_ARRAY_SIZE,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_STRING_LENGTH,
};

use niemgraph_core::{Conversion, ConvertConfig};

/// Normalize and convert a JSON document in one step.
///
/// Normalization failures surface as [`ConversionError::Parse`](niemgraph_core::ConversionError::Parse).
pub fn convert_json(
    input: &[u8],
    json: &FromJsonConfig,
    config: &ConvertConfig,
) -> niemgraph_core::Result<Conversion> {
    let tree = from_json(input, json)?;
    niemgraph_core::convert(&tree, config)
}
