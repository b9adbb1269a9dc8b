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

//! Documents that fail, or only convert with warnings.

use super::documents::{json_document, xml_document};
use super::Fixture;

/// A driver role pointing at `P99`, which nothing declares.
///
/// Strict references fail with the pointer's path
/// `/cd:CrashDriverInfo/j:CrashDriver/nc:RoleOfPerson`.
pub fn dangling_reference() -> Fixture {
    let xml = xml_document(
        r#"  <nc:Person structures:id="P01">
    <nc:PersonGivenName>Peter</nc:PersonGivenName>
  </nc:Person>
  <j:CrashDriver>
    <nc:RoleOfPerson structures:ref="P99"/>
    <j:DriverLicenseRestrictionText>none</j:DriverLicenseRestrictionText>
  </j:CrashDriver>"#,
    );
    let json = json_document(
        r#"    "nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"},
    "j:CrashDriver": {
      "nc:RoleOfPerson": {"@id": "P99"},
      "j:DriverLicenseRestrictionText": "none"
    }"#,
    );
    Fixture::new("dangling_reference", xml, json)
}

/// Path of the dangling pointer in [`dangling_reference`].
pub const DANGLING_PATH: &str = "/cd:CrashDriverInfo/j:CrashDriver/nc:RoleOfPerson";

/// An association with a single resolvable endpoint.
pub fn one_sided_association() -> Fixture {
    let xml = xml_document(
        r#"  <nc:Person structures:id="P01">
    <nc:PersonGivenName>Peter</nc:PersonGivenName>
  </nc:Person>
  <j:PersonChargeAssociation>
    <nc:Person structures:ref="P01"/>
    <j:Charge structures:ref="CH99" xsi:nil="true"/>
  </j:PersonChargeAssociation>"#,
    );
    let json = json_document(
        r#"    "nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"},
    "j:PersonChargeAssociation": {
      "nc:Person": {"@id": "P01"},
      "j:Charge": {"@ref": "CH99", "@xsi:nil": true}
    }"#,
    );
    Fixture::new("one_sided_association", xml, json)
}

/// Inputs that do not parse, as `(name, xml, json)`.
pub fn malformed_samples() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("empty", "", ""),
        ("unclosed", "<cd:CrashDriverInfo xmlns:cd=\"urn:cd\">", "{\"cd:CrashDriverInfo\": {"),
        ("two_roots", "<a/><b/>", "{\"a\": {}, \"b\": {}}"),
        ("unbound_prefix", "<zz:Report/>", "{\"zz:Report\": {}}"),
        ("bare_scalar", "just text", "42"),
    ]
}
