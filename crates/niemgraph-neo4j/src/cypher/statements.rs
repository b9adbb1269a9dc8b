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

//! Cypher statement and value types.

use std::collections::BTreeMap;

use niemgraph_core::PropertyValue;
use serde::{Deserialize, Serialize};

/// A Cypher parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
    /// List value.
    List(Vec<CypherValue>),
    /// Map value.
    Map(BTreeMap<String, CypherValue>),
}

impl From<bool> for CypherValue {
    fn from(v: bool) -> Self {
        CypherValue::Bool(v)
    }
}

impl From<String> for CypherValue {
    fn from(v: String) -> Self {
        CypherValue::String(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::String(v.to_string())
    }
}

impl From<&PropertyValue> for CypherValue {
    fn from(v: &PropertyValue) -> Self {
        match v {
            PropertyValue::Single(s) => CypherValue::String(s.clone()),
            PropertyValue::Many(items) => {
                CypherValue::List(items.iter().cloned().map(CypherValue::String).collect())
            }
        }
    }
}

impl<T: Into<CypherValue>> From<Vec<T>> for CypherValue {
    fn from(v: Vec<T>) -> Self {
        CypherValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl CypherValue {
    /// Cypher literal syntax.
    pub fn to_cypher_literal(&self) -> String {
        match self {
            CypherValue::Bool(b) => b.to_string(),
            CypherValue::String(s) => super::escape::quote_string(s),
            CypherValue::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_cypher_literal()).collect();
                format!("[{}]", inner.join(", "))
            }
            CypherValue::Map(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}: {}",
                            super::escape::escape_identifier(k),
                            v.to_cypher_literal()
                        )
                    })
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }

    /// String content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CypherValue::String(s) => Some(s),
            _ => None,
        }
    }

}

/// Kind of statement, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementType {
    /// Constraint creation.
    Constraint,
    /// Node creation (CREATE or MERGE).
    CreateNode,
    /// Relationship creation.
    CreateRelationship,
}

/// One Cypher statement with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherStatement {
    /// The Cypher query text.
    pub query: String,
    /// Parameters referenced as `$name` in the query.
    pub parameters: BTreeMap<String, CypherValue>,
    /// Type of statement.
    pub statement_type: StatementType,
    /// Optional comment describing the statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CypherStatement {
    /// Create a statement.
    pub fn new(query: impl Into<String>, statement_type: StatementType) -> Self {
        Self {
            query: query.into(),
            parameters: BTreeMap::new(),
            statement_type,
            comment: None,
        }
    }

    /// Constraint statement.
    pub fn constraint(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::Constraint)
    }

    /// Node creation statement.
    pub fn create_node(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateNode)
    }

    /// Relationship creation statement.
    pub fn create_relationship(query: impl Into<String>) -> Self {
        Self::new(query, StatementType::CreateRelationship)
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<CypherValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add a comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Query text with parameter values substituted as literals.
    pub fn render_inline(&self) -> String {
        let mut result = self.query.clone();
        for (name, value) in &self.parameters {
            let placeholder = format!("${}", name);
            result = result.replace(&placeholder, &value.to_cypher_literal());
        }
        result
    }

    /// Executable text: optional `//` comment line, then the inlined query
    /// and a semicolon.
    pub fn format(&self, include_comment: bool) -> String {
        let mut lines = Vec::new();
        if include_comment {
            if let Some(comment) = &self.comment {
                lines.push(format!("// {}", comment));
            }
        }
        lines.push(format!("{};", self.render_inline()));
        lines.join("\n")
    }
}

/// An ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CypherScript {
    /// The statements, in execution order.
    pub statements: Vec<CypherStatement>,
}

impl CypherScript {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement.
    pub fn add(&mut self, statement: CypherStatement) {
        self.statements.push(statement);
    }

    /// Render as one script, statements separated by blank lines.
    pub fn render(&self, include_comments: bool) -> String {
        self.statements
            .iter()
            .map(|s| s.format(include_comments))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True when there are no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(CypherValue::Bool(true).to_cypher_literal(), "true");
        assert_eq!(CypherValue::from("it's").to_cypher_literal(), "'it\\'s'");
        assert_eq!(
            CypherValue::from(vec!["a", "b"]).to_cypher_literal(),
            "['a', 'b']"
        );
    }

    #[test]
    fn test_map_literal_quotes_qualified_keys() {
        let mut map = BTreeMap::new();
        map.insert("nc:PersonGivenName".to_string(), CypherValue::from("Peter"));
        map.insert("roleCount".to_string(), CypherValue::from("2"));
        assert_eq!(
            CypherValue::Map(map).to_cypher_literal(),
            "{`nc:PersonGivenName`: 'Peter', roleCount: '2'}"
        );
    }

    #[test]
    fn test_property_value_conversion() {
        let single = PropertyValue::Single("x".to_string());
        let many = PropertyValue::Many(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(CypherValue::from(&single), CypherValue::from("x"));
        assert_eq!(
            CypherValue::from(&many).to_cypher_literal(),
            "['a', 'b']"
        );
    }

    #[test]
    fn test_render_inline_and_format() {
        let stmt = CypherStatement::create_node("UNWIND $rows AS row MERGE (n {id: row.id})")
            .with_param("rows", CypherValue::from(vec!["x"]))
            .with_comment("Create nodes");
        assert_eq!(
            stmt.render_inline(),
            "UNWIND ['x'] AS row MERGE (n {id: row.id})"
        );
        assert_eq!(
            stmt.format(true),
            "// Create nodes\nUNWIND ['x'] AS row MERGE (n {id: row.id});"
        );
        assert!(!stmt.format(false).contains("//"));
    }

    #[test]
    fn test_script() {
        let mut script = CypherScript::new();
        assert!(script.is_empty());
        script.add(CypherStatement::constraint("C1"));
        script.add(CypherStatement::create_node("N1"));
        script.add(CypherStatement::constraint("C2"));
        assert_eq!(script.len(), 3);
        assert_eq!(
            script.statements.iter().filter(|s| s.statement_type == StatementType::Constraint).count(),
            2
        );
        assert_eq!(script.render(false), "C1;\n\nN1;\n\nC2;");
    }

    #[test]
    fn test_statement_serializes_parameters() {
        let stmt = CypherStatement::create_node("Q").with_param("rows", CypherValue::from(vec![true]));
        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["parameters"]["rows"], serde_json::json!([true]));
        assert_eq!(json["statement_type"], "CreateNode");
    }
}
