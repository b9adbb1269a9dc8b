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

//! Convert NIEM property graphs to Cypher.
//!
//! Output order:
//!
//! 1. one uniqueness constraint per node label (when enabled)
//! 2. node statements per label, `UNWIND` batches of `batch_size` rows
//! 3. relationship statements per (type, source label, target label) group
//!
//! Labels are node types (`nc:Person`, `Entity`), relationship types are the
//! four edge types. Every node and relationship carries its graph id in
//! `id_property`, so MERGE output can be replayed without duplicates.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use niemgraph_core::{EdgeType, Graph, GraphEdge, GraphNode, Properties};
use tracing::debug;

use crate::config::ToCypherConfig;
use crate::cypher::{
    escape_identifier, escape_label, escape_relationship_type, validate_identifier,
    validate_string_length, CypherScript, CypherStatement, CypherValue,
};
use crate::error::{Neo4jError, Result};

/// Convert a graph to Cypher statements.
///
/// # Errors
///
/// - `NodeCountExceeded` when the graph has more nodes than `max_nodes`
/// - `StringLengthExceeded` when a property value exceeds `max_string_length`
/// - `UnknownEndpoint` when an edge names a node that is not in the graph
pub fn to_cypher_statements(graph: &Graph, config: &ToCypherConfig) -> Result<Vec<CypherStatement>> {
    let mut statements = Vec::new();
    generate(graph, config, &mut |statement| {
        statements.push(statement);
        Ok(())
    })?;
    Ok(statements)
}

/// Convert a graph to a complete Cypher script.
///
/// ```
/// use niemgraph_core::{Graph, GraphNode};
/// use niemgraph_neo4j::{to_cypher, ToCypherConfig};
///
/// let mut graph = Graph::new();
/// graph.nodes.push(GraphNode::new("0123456789abcdef:P01", "nc:Person"));
///
/// let cypher = to_cypher(&graph, &ToCypherConfig::default()).unwrap();
/// assert!(cypher.contains("CREATE CONSTRAINT"));
/// assert!(cypher.contains("MERGE (n:`nc:Person` {_niem_id: row._niem_id})"));
/// ```
pub fn to_cypher(graph: &Graph, config: &ToCypherConfig) -> Result<String> {
    let script = CypherScript {
        statements: to_cypher_statements(graph, config)?,
    };
    Ok(script.render(config.include_comments))
}

/// Write the script produced by [`to_cypher`] to `writer`, one statement at
/// a time. The bytes written equal the string [`to_cypher`] returns.
pub fn to_cypher_stream<W: Write>(
    graph: &Graph,
    config: &ToCypherConfig,
    writer: &mut W,
) -> Result<()> {
    let mut first = true;
    generate(graph, config, &mut |statement| {
        if !first {
            write!(writer, "\n\n")?;
        }
        first = false;
        write!(writer, "{}", statement.format(config.include_comments))?;
        Ok(())
    })?;
    writer.flush()?;
    Ok(())
}

/// Statements with their parameters as JSON, for driver-side execution.
pub fn to_cypher_json(graph: &Graph, config: &ToCypherConfig) -> Result<String> {
    let statements = to_cypher_statements(graph, config)?;
    Ok(serde_json::to_string_pretty(&statements)?)
}

fn generate<F>(graph: &Graph, config: &ToCypherConfig, emit: &mut F) -> Result<()>
where
    F: FnMut(CypherStatement) -> Result<()>,
{
    if let Some(max_count) = config.max_nodes {
        if graph.node_count() > max_count {
            return Err(Neo4jError::NodeCountExceeded {
                count: graph.node_count(),
                max_count,
            });
        }
    }
    validate_identifier(&config.id_property)?;

    let mut labels: BTreeMap<&str, Vec<&GraphNode>> = BTreeMap::new();
    for node in &graph.nodes {
        labels.entry(node.node_type.as_str()).or_default().push(node);
    }

    if config.create_constraints {
        for label in labels.keys() {
            emit(constraint(label, config))?;
        }
    }

    let mut node_statements = 0;
    for (label, nodes) in &labels {
        for chunk in nodes.chunks(config.chunk_size()) {
            emit(node_batch(label, chunk, config)?)?;
            node_statements += 1;
        }
    }

    let index = graph.index();
    let mut groups: BTreeMap<(EdgeType, &str, &str), Vec<&GraphEdge>> = BTreeMap::new();
    for edge in &graph.edges {
        let from = label_of(graph, &index, edge, &edge.source)?;
        let to = label_of(graph, &index, edge, &edge.target)?;
        groups.entry((edge.edge_type, from, to)).or_default().push(edge);
    }

    let mut relationship_statements = 0;
    for ((edge_type, from, to), edges) in &groups {
        for chunk in edges.chunks(config.chunk_size()) {
            emit(relationship_batch(*edge_type, from, to, chunk, config)?)?;
            relationship_statements += 1;
        }
    }

    debug!(
        labels = labels.len(),
        node_statements,
        relationship_statements,
        "generated Cypher"
    );
    Ok(())
}

fn label_of<'g>(
    graph: &'g Graph,
    index: &HashMap<&str, usize>,
    edge: &GraphEdge,
    id: &str,
) -> Result<&'g str> {
    index
        .get(id)
        .map(|&i| graph.nodes[i].node_type.as_str())
        .ok_or_else(|| Neo4jError::UnknownEndpoint {
            edge: edge.id.clone(),
            node: id.to_string(),
        })
}

fn constraint_name(label: &str, config: &ToCypherConfig) -> String {
    let mut name: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    name.push('_');
    name.push_str(&config.id_property.replace('.', "_"));
    name
}

fn constraint(label: &str, config: &ToCypherConfig) -> CypherStatement {
    let query = format!(
        "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n{}) REQUIRE n.{} IS UNIQUE",
        escape_identifier(&constraint_name(label, config)),
        escape_label(label),
        escape_identifier(&config.id_property)
    );
    CypherStatement::constraint(query).with_comment(format!("Ensure unique {} ids", label))
}

fn properties_map(properties: &Properties, config: &ToCypherConfig) -> Result<BTreeMap<String, CypherValue>> {
    let mut map = BTreeMap::new();
    for (key, value) in properties {
        for text in value.values() {
            validate_string_length(text, key, config)?;
        }
        map.insert(key.clone(), CypherValue::from(value));
    }
    Ok(map)
}

fn node_row(node: &GraphNode, config: &ToCypherConfig) -> Result<CypherValue> {
    let mut properties = properties_map(&node.properties, config)?;
    if config.include_type_metadata {
        properties.insert(config.type_property.clone(), node.node_type.clone().into());
    }
    if config.include_flags {
        let flags = [
            ("isHub", node.flags.is_hub),
            ("isAssociation", node.flags.is_association),
            ("isAugmentationHost", node.flags.is_augmentation_host),
        ];
        for (name, set) in flags {
            if set {
                properties.insert(name.to_string(), CypherValue::Bool(true));
            }
        }
    }

    let mut row = BTreeMap::new();
    row.insert(config.id_property.clone(), node.id.clone().into());
    row.insert("properties".to_string(), CypherValue::Map(properties));
    Ok(CypherValue::Map(row))
}

fn node_batch(label: &str, nodes: &[&GraphNode], config: &ToCypherConfig) -> Result<CypherStatement> {
    let rows = nodes
        .iter()
        .map(|node| node_row(node, config))
        .collect::<Result<Vec<_>>>()?;
    let id = escape_identifier(&config.id_property);
    let query = format!(
        "UNWIND $rows AS row\n{} (n{} {{{}: row.{}}})\nSET n += row.properties",
        config.keyword(),
        escape_label(label),
        id,
        id
    );
    Ok(CypherStatement::create_node(query)
        .with_param("rows", CypherValue::List(rows))
        .with_comment(format!("Create {} {} nodes", nodes.len(), label)))
}

fn relationship_batch(
    edge_type: EdgeType,
    from: &str,
    to: &str,
    edges: &[&GraphEdge],
    config: &ToCypherConfig,
) -> Result<CypherStatement> {
    let mut rows = Vec::with_capacity(edges.len());
    for edge in edges {
        let mut row = BTreeMap::new();
        row.insert("from_id".to_string(), edge.source.clone().into());
        row.insert("to_id".to_string(), edge.target.clone().into());
        row.insert(config.id_property.clone(), edge.id.clone().into());
        row.insert(
            "properties".to_string(),
            CypherValue::Map(properties_map(&edge.properties, config)?),
        );
        rows.push(CypherValue::Map(row));
    }

    let id = escape_identifier(&config.id_property);
    let query = format!(
        "UNWIND $rows AS row\n\
         MATCH (from{} {{{}: row.from_id}})\n\
         MATCH (to{} {{{}: row.to_id}})\n\
         {} (from)-[rel{} {{{}: row.{}}}]->(to)\n\
         SET rel += row.properties",
        escape_label(from),
        id,
        escape_label(to),
        id,
        config.keyword(),
        escape_relationship_type(edge_type.as_str()),
        id,
        id
    );
    Ok(CypherStatement::create_relationship(query)
        .with_param("rows", CypherValue::List(rows))
        .with_comment(format!(
            "Create {} {} relationships from {} to {}",
            edges.len(),
            edge_type,
            from,
            to
        )))
}
