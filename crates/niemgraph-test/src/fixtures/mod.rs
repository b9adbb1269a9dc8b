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

//! Canonical exchange documents.
//!
//! - **documents**: well-formed exchanges (crash report, augmentation,
//!   metadata, two-document batches)
//! - **errors**: dangling references, demoted associations and inputs that
//!   do not parse
//!
//! Every fixture carries the same exchange as NIEM XML and NIEM JSON, so a
//! test can run once per format and compare the results.

mod documents;
pub mod errors;

pub use documents::*;

use crate::FixtureList;

/// One exchange in both serializations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Fixture name.
    pub name: &'static str,
    /// NIEM XML form.
    pub xml: String,
    /// NIEM JSON form.
    pub json: String,
}

impl Fixture {
    /// Create a fixture.
    pub fn new(name: &'static str, xml: String, json: String) -> Self {
        Self { name, xml, json }
    }
}

/// All well-formed fixtures, for tests that run across every document.
pub fn all() -> FixtureList {
    vec![
        ("crash_driver", crash_driver),
        ("augmented_charge", augmented_charge),
        ("metadata_overlay", metadata_overlay),
        ("shared_person", shared_person),
        ("three_roles", three_roles),
    ]
}

fn three_roles() -> Fixture {
    role_fan(3)
}
