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

//! Configuration files.
//!
//! A conversion configuration or a mapping table can be written as JSON or
//! YAML; `.yaml` and `.yml` files are read as YAML, everything else as JSON.
//!
//! ```yaml
//! mode: mapping
//! strict_references: false
//! mapping_table:
//!   j:PersonChargeAssociation:
//!     rule: association
//!   nc:PersonName:
//!     rule: property
//! ```

use std::fs;
use std::path::Path;

use niemgraph_core::{ConvertConfig, MappingTable};
use serde::de::DeserializeOwned;

use crate::error::CliError;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load<T: DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
    if is_yaml(Path::new(path)) {
        serde_yaml::from_str(&text).map_err(|e| CliError::config(path, e))
    } else {
        serde_json::from_str(&text).map_err(|e| CliError::config(path, e))
    }
}

/// Load a [`ConvertConfig`]. Missing fields keep their defaults.
pub fn load_convert_config(path: &str) -> Result<ConvertConfig, CliError> {
    load(path)
}

/// Load a [`MappingTable`] of qualified type names to rules.
pub fn load_mapping_table(path: &str) -> Result<MappingTable, CliError> {
    load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use niemgraph_core::{ConversionMode, Rule};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_yaml_config() {
        let file = write_temp(
            ".yaml",
            "mode: mapping\nstrict_references: false\nmapping_table:\n  nc:PersonName:\n    rule: property\n",
        );
        let config = load_convert_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.mode, ConversionMode::Mapping);
        assert!(!config.strict_references);
        assert_eq!(config.mapping_table.get("nc:PersonName"), Some(&Rule::Property));
        assert_eq!(config.hub_label, "Entity");
    }

    #[test]
    fn test_json_mapping_table() {
        let file = write_temp(
            ".json",
            r#"{"nc:Person": {"rule": "node", "label": "Person"}, "j:Charge": {"rule": "node"}}"#,
        );
        let table = load_mapping_table(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("nc:Person"),
            Some(&Rule::Node {
                label: Some("Person".to_string())
            })
        );
    }

    #[test]
    fn test_invalid_config_names_file() {
        let file = write_temp(".json", "{\"mode\": 7}");
        let err = load_convert_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
