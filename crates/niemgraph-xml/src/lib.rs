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

//! NIEM XML normalizer
//!
//! Reads a NIEM XML instance into the format-neutral [`ElementTree`] used by
//! `niemgraph-core`.
//!
//! - Element and attribute names are resolved against their `xmlns`
//!   bindings; unbound prefixes are an error
//! - `structures:id`, `structures:ref`, `structures:uri="#id"`,
//!   `structures:metadata` and `structures:relationshipMetadata` become the
//!   structural fields of [`ElementNode`](niemgraph_core::ElementNode)
//! - `xsi:nil="true"` sets the nil flag
//! - text is unescaped and trimmed, whitespace between elements is dropped
//!
//! # Example
//!
//! ```rust
//! use niemgraph_xml::{from_xml_str, FromXmlConfig};
//!
//! let xml = r#"<nc:Person xmlns:nc="http://release.niem.gov/niem/niem-core/5.0/"
//!     xmlns:structures="http://release.niem.gov/niem/structures/5.0/"
//!     structures:id="P01">
//!   <nc:PersonGivenName>Peter</nc:PersonGivenName>
//! </nc:Person>"#;
//!
//! let tree = from_xml_str(xml, &FromXmlConfig::default()).unwrap();
//! assert_eq!(tree.root.declared_id.as_deref(), Some("P01"));
//! assert_eq!(tree.element_count(), 2);
//! ```

#![deny(missing_docs)]

pub mod error;
mod from_xml;

pub use error::{Result, XmlError};
pub use from_xml::{
    from_xml, from_xml_str, FromXmlConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STRING_LENGTH,
    XSI_NAMESPACE,
};

use niemgraph_core::{Conversion, ConvertConfig};

/// Normalize and convert an XML document in one step.
///
/// Normalization failures surface as [`ConversionError::Parse`](niemgraph_core::ConversionError::Parse).
pub fn convert_xml(
    input: &[u8],
    xml: &FromXmlConfig,
    config: &ConvertConfig,
) -> niemgraph_core::Result<Conversion> {
    let tree = from_xml(input, xml)?;
    niemgraph_core::convert(&tree, config)
}
