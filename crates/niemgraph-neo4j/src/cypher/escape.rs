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

//! Escaping of Cypher strings, identifiers, labels and relationship types.
//!
//! NIEM qualified names such as `nc:Person` are not bare Cypher identifiers,
//! so most labels and property keys end up backtick-quoted. Identifiers are
//! NFC-normalized and stripped of invisible formatting characters first so
//! that visually identical names map to the same label.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::ToCypherConfig;
use crate::error::{Neo4jError, Result};

/// Check a property value against the configured string limit.
pub fn validate_string_length(s: &str, property: &str, config: &ToCypherConfig) -> Result<()> {
    if let Some(max_length) = config.max_string_length {
        if s.len() > max_length {
            return Err(Neo4jError::StringLengthExceeded {
                length: s.len(),
                max_length,
                property: property.to_string(),
            });
        }
    }
    Ok(())
}

fn replacement(c: char) -> Option<&'static str> {
    Some(match c {
        '\\' => "\\\\",
        '\'' => "\\'",
        '"' => "\\\"",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\x00' => "\\u0000",
        _ => return None,
    })
}

/// Escape a string for use inside a single-quoted Cypher literal.
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match replacement(c) {
            Some(r) => out.push_str(r),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Single-quoted Cypher string literal.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

/// True for identifiers that need no backticks: ASCII letter or underscore
/// followed by ASCII alphanumerics or underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// NFC normalization.
pub fn normalize_unicode(s: &str) -> String {
    s.nfc().collect()
}

/// Zero-width, bidi override and soft-hyphen characters.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200B}'..='\u{200D}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2066}'..='\u{2069}'
                | '\u{FEFF}'
                | '\u{00AD}'
                | '\u{061C}'
                | '\u{180E}'
        )
}

fn sanitize(s: &str) -> String {
    normalize_unicode(s)
        .chars()
        .filter(|c| !is_invisible(*c))
        .collect()
}

fn quote_if_needed(sanitized: String) -> String {
    if is_valid_identifier(&sanitized) && !is_cypher_keyword(&sanitized) {
        sanitized
    } else {
        format!("`{}`", sanitized.replace('`', "``"))
    }
}

/// Escape a property key or variable name.
///
/// ```
/// use niemgraph_neo4j::cypher::escape_identifier;
///
/// assert_eq!(escape_identifier("roleCount"), "roleCount");
/// assert_eq!(escape_identifier("nc:PersonGivenName"), "`nc:PersonGivenName`");
/// ```
pub fn escape_identifier(s: &str) -> String {
    quote_if_needed(sanitize(s))
}

/// Escape a node label, including the leading colon.
pub fn escape_label(s: &str) -> String {
    format!(":{}", escape_identifier(s))
}

/// Escape a relationship type, including the leading colon.
///
/// A type follows a colon, so reserved words such as `CONTAINS` stay bare.
pub fn escape_relationship_type(s: &str) -> String {
    let sanitized = sanitize(s);
    if is_valid_identifier(&sanitized) {
        format!(":{}", sanitized)
    } else {
        format!(":`{}`", sanitized.replace('`', "``"))
    }
}

/// Reject identifiers that are empty after sanitizing.
pub fn validate_identifier(s: &str) -> Result<&str> {
    if sanitize(s).is_empty() {
        Err(Neo4jError::InvalidIdentifier(s.to_string()))
    } else {
        Ok(s)
    }
}

/// Reserved words that must be quoted when used as identifiers, sorted.
const RESERVED: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "ASCENDING", "BY", "CALL",
    "CASE", "CONTAINS", "COUNT", "CREATE", "DELETE", "DESC", "DESCENDING", "DETACH",
    "DISTINCT", "DO", "DROP", "ELSE", "END", "ENDS", "EXISTS", "FALSE",
    "FILTER", "FOREACH", "IN", "IS", "LIMIT", "MANDATORY", "MATCH", "MERGE",
    "NODE", "NONE", "NOT", "NULL", "OF", "ON", "OPTIONAL", "OR",
    "ORDER", "REDUCE", "RELATIONSHIP", "REMOVE", "RETURN", "SET", "SINGLE", "SKIP",
    "SOME", "STARTS", "THEN", "TRUE", "UNION", "UNIQUE", "UNWIND", "USING",
    "WHEN", "WHERE", "WITH", "XOR", "YIELD",
];

fn is_cypher_keyword(s: &str) -> bool {
    RESERVED.binary_search(&s.to_ascii_uppercase().as_str()).is_ok()
}
