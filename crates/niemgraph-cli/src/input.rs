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

//! Reading and normalizing input documents.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use niemgraph_core::ElementTree;
use niemgraph_json::FromJsonConfig;
use niemgraph_xml::FromXmlConfig;
use tracing::debug;

use crate::error::CliError;

/// Default maximum input size (1 GB).
/// Can be overridden via the `NIEMGRAPH_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

fn max_file_size() -> u64 {
    std::env::var("NIEMGRAPH_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Serialization of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// NIEM XML.
    Xml,
    /// NIEM JSON (JSON-LD).
    Json,
}

impl InputFormat {
    /// Format from the file extension, falling back to the first
    /// non-whitespace byte.
    pub fn detect(path: &Path, bytes: &[u8]) -> Option<Self> {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match by_extension.as_deref() {
            Some("xml") => return Some(InputFormat::Xml),
            Some("json") | Some("jsonld") => return Some(InputFormat::Json),
            _ => {}
        }
        let first = bytes
            .iter()
            .copied()
            .find(|b| !(b.is_ascii_whitespace() || matches!(b, 0xEF | 0xBB | 0xBF)));
        match first {
            Some(b'<') => Some(InputFormat::Xml),
            Some(b'{') => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// Read a file with a size check before allocating.
pub fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;
    let max = max_file_size();
    if metadata.len() > max {
        return Err(CliError::file_too_large(path, metadata.len(), max));
    }
    fs::read(path).map_err(|e| CliError::io_error(path, e))
}

/// Normalize a document into an element tree labelled with its path.
pub fn normalize(
    path: &str,
    bytes: &[u8],
    format: Option<InputFormat>,
    root: Option<&str>,
) -> Result<ElementTree, CliError> {
    let format = format
        .or_else(|| InputFormat::detect(Path::new(path), bytes))
        .ok_or_else(|| CliError::UnknownFormat { path: path.into() })?;

    let tree = match format {
        InputFormat::Xml => {
            let mut config = FromXmlConfig::default();
            if let Some(root) = root {
                config = config.with_root(root);
            }
            niemgraph_xml::from_xml(bytes, &config)
                .map_err(|e| CliError::conversion(path, e.into()))?
        }
        InputFormat::Json => {
            let mut config = FromJsonConfig::default();
            if let Some(root) = root {
                config = config.with_root(root);
            }
            niemgraph_json::from_json(bytes, &config)
                .map_err(|e| CliError::conversion(path, e.into()))?
        }
    };
    debug!(path, ?format, elements = tree.element_count(), "normalized input");
    Ok(tree.with_source(path))
}

/// Read and normalize in one step.
pub fn load(path: &str, format: Option<InputFormat>, root: Option<&str>) -> Result<ElementTree, CliError> {
    let bytes = read_input(path)?;
    normalize(path, &bytes, format, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(InputFormat::detect(Path::new("a.xml"), b"{"), Some(InputFormat::Xml));
        assert_eq!(InputFormat::detect(Path::new("a.JSON"), b"<"), Some(InputFormat::Json));
        assert_eq!(InputFormat::detect(Path::new("a.jsonld"), b""), Some(InputFormat::Json));
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            InputFormat::detect(Path::new("report"), b"  \n<?xml version=\"1.0\"?><a/>"),
            Some(InputFormat::Xml)
        );
        assert_eq!(
            InputFormat::detect(Path::new("report.txt"), b"\xEF\xBB\xBF{\"a\": {}}"),
            Some(InputFormat::Json)
        );
        assert_eq!(InputFormat::detect(Path::new("report"), b"plain"), None);
    }

    #[test]
    fn test_normalize_labels_source() {
        let tree = normalize("doc.xml", b"<Report><Item>1</Item></Report>", None, None).unwrap();
        assert_eq!(tree.source.as_deref(), Some("doc.xml"));
        assert_eq!(tree.element_count(), 2);
    }

    #[test]
    fn test_unknown_format() {
        let err = normalize("doc", b"???", None, None).unwrap_err();
        assert!(matches!(err, CliError::UnknownFormat { .. }));
    }

    #[test]
    fn test_parse_failure_names_file() {
        let err = normalize("bad.json", b"{", None, None).unwrap_err();
        assert!(err.to_string().starts_with("bad.json: "));
    }
}
