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

//! Inspect command - normalized element tree visualization

use colored::Colorize;
use niemgraph_core::{classify, ConvertConfig, ElementNode, ElementTree, Shape};

use crate::cli::{ConversionOptions, InputOptions};
use crate::error::CliError;
use crate::input;

/// Print the normalized tree of a document with the shape of each element.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or normalized, or if the
/// conversion options are invalid.
///
/// # Output
///
/// Displays:
/// - source, fingerprint and element count
/// - namespace bindings
/// - the element tree, each element tagged with its shape
/// - in verbose mode: attributes and metadata references
pub fn inspect(
    file: &str,
    verbose: bool,
    input: &InputOptions,
    conversion: &ConversionOptions,
) -> Result<(), CliError> {
    let config = conversion.to_config()?;
    let tree = input::load(file, input.input_format, input.root.as_deref())?;
    print!("{}", describe(&tree, &config, verbose));
    Ok(())
}

/// Render the inspection text.
pub fn describe(tree: &ElementTree, config: &ConvertConfig, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", "NIEM Document".bold().underline()));
    if let Some(source) = &tree.source {
        out.push_str(&format!("{}       {}\n", "Source:".cyan(), source));
    }
    out.push_str(&format!("{}  {}\n", "Fingerprint:".cyan(), tree.fingerprint.as_str()));
    out.push_str(&format!("{}     {}\n", "Elements:".cyan(), tree.element_count()));

    if !tree.namespaces.is_empty() {
        out.push_str(&format!("\n{}\n", "Namespaces:".cyan()));
        for (prefix, uri) in &tree.namespaces {
            let prefix = if prefix.is_empty() { "(default)" } else { prefix.as_str() };
            out.push_str(&format!("  {}: {}\n", prefix.green(), uri));
        }
    }

    out.push_str(&format!("\n{}\n", "Tree:".cyan()));
    element(&mut out, &tree.root, &tree.root_path(), 1, config, verbose);
    out
}

fn element(
    out: &mut String,
    node: &ElementNode,
    path: &str,
    indent: usize,
    config: &ConvertConfig,
    verbose: bool,
) {
    let prefix = "  ".repeat(indent);
    let shape = match classify(node, config, path) {
        Ok(shape) => shape_label(&shape),
        Err(_) => "unmapped",
    };

    let mut line = format!("{}{} {}", prefix, node.name.to_string().yellow(), format!("[{}]", shape).dimmed());
    if let Some(id) = &node.declared_id {
        line.push_str(&format!(" #{}", id.green()));
    }
    if let Some(target) = &node.reference {
        line.push_str(&format!(" -> {}", target.green()));
    }
    if node.nil {
        line.push_str(" nil");
    }
    if let Some(text) = &node.text {
        line.push_str(&format!(" = {:?}", text));
    }
    out.push_str(&line);
    out.push('\n');

    if verbose {
        for (name, value) in &node.attributes {
            out.push_str(&format!("{}  @{} = {:?}\n", prefix, name, value));
        }
        if !node.metadata.is_empty() {
            out.push_str(&format!("{}  metadata: {}\n", prefix, node.metadata.join(" ")));
        }
        if !node.relationship_metadata.is_empty() {
            out.push_str(&format!(
                "{}  relationship metadata: {}\n",
                prefix,
                node.relationship_metadata.join(" ")
            ));
        }
    }

    for (index, child) in node.children.iter().enumerate() {
        let child_path = format!("{}/{}", path, node.child_segment(index));
        element(out, child, &child_path, indent + 1, config, verbose);
    }
}

fn shape_label(shape: &Shape) -> &'static str {
    match shape {
        Shape::Leaf => "leaf",
        Shape::ReferenceOnly { role: true } => "role",
        Shape::ReferenceOnly { role: false } => "pointer",
        Shape::Entity { .. } => "entity",
        Shape::Association => "association",
        Shape::Augmentation => "augmentation",
        Shape::Metadata => "metadata",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niemgraph_core::QName;

    #[test]
    fn test_describe_tags_shapes() {
        colored::control::set_override(false);
        let root = ElementNode::new(QName::local("Report"))
            .with_child(
                ElementNode::new(QName::local("Person"))
                    .with_id("P01")
                    .with_child(ElementNode::leaf(QName::local("Name"), "Ada")),
            )
            .with_child(
                ElementNode::new(QName::local("Driver"))
                    .with_child(ElementNode::pointer(QName::local("RoleOfPerson"), "P01")),
            );
        let tree = ElementTree::from_source(root, b"doc").with_source("doc.xml");
        let text = describe(&tree, &ConvertConfig::default(), false);

        assert!(text.contains("Source:       doc.xml"));
        assert!(text.contains("Elements:     5"));
        assert!(text.contains("  Report [entity]"));
        assert!(text.contains("    Person [entity] #P01"));
        assert!(text.contains("      Name [leaf] = \"Ada\""));
        assert!(text.contains("      RoleOfPerson [role] -> P01"));
    }
}
