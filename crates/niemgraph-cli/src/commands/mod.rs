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

//! CLI command implementations

mod batch;
mod convert;
mod inspect;

pub use batch::{batch, BatchRequest};
pub use convert::convert;
pub use inspect::inspect;

use std::fs;
use std::io::{self, Write};

use colored::Colorize;
use niemgraph_core::{Conversion, Warning};
use serde_json::json;

use crate::cli::{OutputFormat, OutputOptions};
use crate::error::CliError;

/// Serialize a conversion in the requested format.
///
/// Graph output carries the warnings next to the nodes and edges so nothing
/// is lost when stderr is discarded.
pub fn render(conversion: &Conversion, export: &OutputOptions) -> Result<String, CliError> {
    let mut text = match export.to {
        OutputFormat::Graph => {
            let value = json!({
                "nodes": conversion.graph.nodes,
                "edges": conversion.graph.edges,
                "warnings": conversion.warnings,
            });
            serde_json::to_string_pretty(&value)?
        }
        OutputFormat::Cypher => niemgraph_neo4j::to_cypher(&conversion.graph, &export.cypher_config())?,
        OutputFormat::CypherJson => {
            niemgraph_neo4j::to_cypher_json(&conversion.graph, &export.cypher_config())?
        }
    };
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write content to a file or stdout.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

/// Print warnings to stderr, one per line.
pub(crate) fn print_warnings(source: &str, warnings: &[Warning]) {
    for warning in warnings {
        let location = warning.path.as_deref().unwrap_or("");
        eprintln!(
            "{} {} [{}] {} {}",
            "warning:".yellow().bold(),
            source,
            warning.kind,
            warning.message,
            location.dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niemgraph_core::{convert, ConvertConfig, ElementNode, ElementTree, QName};

    fn conversion() -> Conversion {
        let root = ElementNode::new(QName::local("Report"))
            .with_child(ElementNode::new(QName::local("Item")).with_child(ElementNode::leaf(QName::local("Name"), "x")));
        convert(&ElementTree::from_source(root, b"r"), &ConvertConfig::default()).unwrap()
    }

    #[test]
    fn test_graph_output_has_sections() {
        let text = render(&conversion(), &OutputOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"].as_array().unwrap().len(), 1);
        assert!(value["warnings"].as_array().unwrap().is_empty());
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_cypher_output() {
        let export = OutputOptions {
            to: OutputFormat::Cypher,
            ..Default::default()
        };
        let text = render(&conversion(), &export).unwrap();
        assert!(text.contains("CREATE CONSTRAINT"));
        assert!(text.contains("MERGE (from)-[rel:CONTAINS"));
    }
}
