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

//! Well-formed exchange documents, each in XML and JSON form.

use super::Fixture;

const XML_NAMESPACES: &str = r#"xmlns:cd="http://example.com/CrashDriver/1.0/"
    xmlns:nc="http://release.niem.gov/niem/niem-core/5.0/"
    xmlns:j="http://release.niem.gov/niem/domains/jxdm/7.0/"
    xmlns:priv="http://example.com/privacy/1.0/"
    xmlns:structures="http://release.niem.gov/niem/structures/5.0/"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#;

const JSON_CONTEXT: &str = r##""@context": {
    "cd": "http://example.com/CrashDriver/1.0/#",
    "nc": "http://release.niem.gov/niem/niem-core/5.0/#",
    "j": "http://release.niem.gov/niem/domains/jxdm/7.0/#",
    "priv": "http://example.com/privacy/1.0/#",
    "structures": "http://release.niem.gov/niem/structures/5.0/#"
  }"##;

/// Wrap a body in a `cd:CrashDriverInfo` XML root with the usual bindings.
pub fn xml_document(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<cd:CrashDriverInfo {}>\n{}\n</cd:CrashDriverInfo>\n",
        XML_NAMESPACES, body
    )
}

/// Wrap the members of a root object in a JSON document with a context.
pub fn json_document(members: &str) -> String {
    format!(
        "{{\n  {},\n  \"cd:CrashDriverInfo\": {{\n{}\n  }}\n}}\n",
        JSON_CONTEXT, members
    )
}

/// One person with a name, a birth date and a driver license, a crash with
/// a driver role and a crash-person role both pointing at that person, and
/// one charge linked to the person through an association.
///
/// Converts to 19 nodes (18 element nodes and one hub) and 21 edges
/// (17 CONTAINS, 2 REPRESENTS, 2 ASSOCIATED_WITH).
pub fn crash_driver() -> Fixture {
    let xml = xml_document(
        r#"  <j:Crash>
    <nc:ActivityDate><nc:Date>2024-05-01</nc:Date></nc:ActivityDate>
    <nc:ActivityLocation>
      <nc:Address><nc:LocationCityName>Springfield</nc:LocationCityName></nc:Address>
    </nc:ActivityLocation>
    <j:CrashVehicle>
      <nc:VehicleIdentification><nc:IdentificationID>1HGCM82633A004352</nc:IdentificationID></nc:VehicleIdentification>
      <j:CrashDriver>
        <nc:RoleOfPerson structures:ref="P01"/>
        <j:DriverLicenseRestrictionText>corrective lenses</j:DriverLicenseRestrictionText>
      </j:CrashDriver>
    </j:CrashVehicle>
    <j:CrashPerson>
      <nc:RoleOfPerson structures:ref="P01"/>
      <j:CrashPersonInjury><nc:InjuryDescriptionText>Broken arm</nc:InjuryDescriptionText></j:CrashPersonInjury>
    </j:CrashPerson>
  </j:Crash>
  <nc:Person structures:id="P01">
    <nc:PersonBirthDate><nc:Date>1890-05-04</nc:Date></nc:PersonBirthDate>
    <nc:PersonName>
      <nc:PersonGivenName>Peter</nc:PersonGivenName>
      <nc:PersonSurName>Wimsey</nc:PersonSurName>
    </nc:PersonName>
    <j:DriverLicense>
      <j:DriverLicenseCardIdentification><nc:IdentificationID>A1234567</nc:IdentificationID></j:DriverLicenseCardIdentification>
      <nc:IdentificationExpirationDate><nc:Date>2030-05-04</nc:Date></nc:IdentificationExpirationDate>
    </j:DriverLicense>
  </nc:Person>
  <j:Charge structures:id="CH01">
    <j:ChargeDescriptionText>Furious driving</j:ChargeDescriptionText>
    <j:ChargeAugmentation>
      <j:ChargeFelonyIndicator>false</j:ChargeFelonyIndicator>
      <j:ChargeDrugIndicator>true</j:ChargeDrugIndicator>
    </j:ChargeAugmentation>
  </j:Charge>
  <j:PersonChargeAssociation>
    <nc:Person structures:ref="P01"/>
    <j:Charge structures:ref="CH01"/>
  </j:PersonChargeAssociation>"#,
    );

    let json = json_document(
        r#"    "j:Crash": {
      "nc:ActivityDate": {"nc:Date": "2024-05-01"},
      "nc:ActivityLocation": {
        "nc:Address": {"nc:LocationCityName": "Springfield"}
      },
      "j:CrashVehicle": {
        "nc:VehicleIdentification": {"nc:IdentificationID": "1HGCM82633A004352"},
        "j:CrashDriver": {
          "nc:RoleOfPerson": {"@id": "P01"},
          "j:DriverLicenseRestrictionText": "corrective lenses"
        }
      },
      "j:CrashPerson": {
        "nc:RoleOfPerson": {"@id": "P01"},
        "j:CrashPersonInjury": {"nc:InjuryDescriptionText": "Broken arm"}
      }
    },
    "nc:Person": {
      "@id": "P01",
      "nc:PersonBirthDate": {"nc:Date": "1890-05-04"},
      "nc:PersonName": {
        "nc:PersonGivenName": "Peter",
        "nc:PersonSurName": "Wimsey"
      },
      "j:DriverLicense": {
        "j:DriverLicenseCardIdentification": {"nc:IdentificationID": "A1234567"},
        "nc:IdentificationExpirationDate": {"nc:Date": "2030-05-04"}
      }
    },
    "j:Charge": {
      "@id": "CH01",
      "j:ChargeDescriptionText": "Furious driving",
      "j:ChargeAugmentation": {
        "j:ChargeFelonyIndicator": false,
        "j:ChargeDrugIndicator": true
      }
    },
    "j:PersonChargeAssociation": {
      "nc:Person": {"@id": "P01"},
      "j:Charge": {"@id": "CH01"}
    }"#,
    );

    Fixture::new("crash_driver", xml, json)
}

/// A charge whose augmentation adds two indicators.
pub fn augmented_charge() -> Fixture {
    let xml = xml_document(
        r#"  <j:Charge structures:id="CH01">
    <j:ChargeDescriptionText>Theft</j:ChargeDescriptionText>
    <j:ChargeAugmentation>
      <j:ChargeFelonyIndicator>false</j:ChargeFelonyIndicator>
      <j:ChargeDrugIndicator>true</j:ChargeDrugIndicator>
    </j:ChargeAugmentation>
  </j:Charge>"#,
    );
    let json = json_document(
        r#"    "j:Charge": {
      "@id": "CH01",
      "j:ChargeDescriptionText": "Theft",
      "j:ChargeAugmentation": {
        "j:ChargeFelonyIndicator": false,
        "j:ChargeDrugIndicator": true
      }
    }"#,
    );
    Fixture::new("augmented_charge", xml, json)
}

/// A person carrying privacy metadata, and a relationship whose pointer
/// carries relationship metadata.
pub fn metadata_overlay() -> Fixture {
    let xml = xml_document(
        r#"  <nc:Person structures:id="P01" structures:metadata="M1">
    <nc:PersonGivenName>Peter</nc:PersonGivenName>
  </nc:Person>
  <j:CrashDriver>
    <nc:RoleOfPerson structures:ref="P01" structures:relationshipMetadata="M2"/>
    <j:DriverLicenseRestrictionText>none</j:DriverLicenseRestrictionText>
  </j:CrashDriver>
  <priv:PrivacyMetadata structures:id="M1">
    <priv:PrivacyCode>PII</priv:PrivacyCode>
  </priv:PrivacyMetadata>
  <nc:Metadata structures:id="M2">
    <nc:SourceIDText>DMV</nc:SourceIDText>
  </nc:Metadata>"#,
    );
    let json = json_document(
        r#"    "nc:Person": {
      "@id": "P01",
      "@metadata": "M1",
      "nc:PersonGivenName": "Peter"
    },
    "j:CrashDriver": {
      "nc:RoleOfPerson": {"@id": "P01", "@relationshipMetadata": "M2"},
      "j:DriverLicenseRestrictionText": "none"
    },
    "priv:PrivacyMetadata": {
      "@id": "M1",
      "priv:PrivacyCode": "PII"
    },
    "nc:Metadata": {
      "@id": "M2",
      "nc:SourceIDText": "DMV"
    }"#,
    );
    Fixture::new("metadata_overlay", xml, json)
}

/// The person half of a two-document exchange.
pub fn shared_person() -> Fixture {
    let xml = xml_document(
        r#"  <nc:Person structures:id="P01">
    <nc:PersonGivenName>Peter</nc:PersonGivenName>
  </nc:Person>
  <j:CrashDriver>
    <nc:RoleOfPerson structures:ref="P01"/>
    <j:DriverLicenseRestrictionText>none</j:DriverLicenseRestrictionText>
  </j:CrashDriver>"#,
    );
    let json = json_document(
        r#"    "nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"},
    "j:CrashDriver": {
      "nc:RoleOfPerson": {"@id": "P01"},
      "j:DriverLicenseRestrictionText": "none"
    }"#,
    );
    Fixture::new("shared_person", xml, json)
}

/// The role half of a two-document exchange: refers to `P01` without
/// declaring it.
pub fn shared_role() -> Fixture {
    let xml = xml_document(
        r#"  <j:CrashPerson>
    <nc:RoleOfPerson structures:ref="P01"/>
    <j:CrashPersonInjury><nc:InjuryDescriptionText>Bruising</nc:InjuryDescriptionText></j:CrashPersonInjury>
  </j:CrashPerson>"#,
    );
    let json = json_document(
        r#"    "j:CrashPerson": {
      "nc:RoleOfPerson": {"@id": "P01"},
      "j:CrashPersonInjury": {"nc:InjuryDescriptionText": "Bruising"}
    }"#,
    );
    Fixture::new("shared_role", xml, json)
}

/// A person referenced by `roles` role containers.
pub fn role_fan(roles: usize) -> Fixture {
    let mut xml_body = String::from(
        "  <nc:Person structures:id=\"P01\"><nc:PersonGivenName>Peter</nc:PersonGivenName></nc:Person>",
    );
    let mut json_members = vec![
        r#"    "nc:Person": {"@id": "P01", "nc:PersonGivenName": "Peter"}"#.to_string(),
    ];
    for n in 0..roles {
        xml_body.push_str(&format!(
            "\n  <cd:Role{n}><nc:RoleOfPerson structures:ref=\"P01\"/><nc:Note>{n}</nc:Note></cd:Role{n}>"
        ));
        json_members.push(format!(
            "    \"cd:Role{n}\": {{\"nc:RoleOfPerson\": {{\"@id\": \"P01\"}}, \"nc:Note\": \"{n}\"}}"
        ));
    }
    Fixture::new(
        "role_fan",
        xml_document(&xml_body),
        json_document(&json_members.join(",\n")),
    )
}
