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

//! NIEM JSON (JSON-LD) document to [`ElementTree`].

use std::collections::BTreeMap;

use niemgraph_core::{ConversionError, ElementNode, ElementTree, PrefixTable, QName};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default maximum array size.
pub const DEFAULT_MAX_ARRAY_SIZE: usize = 1_000_000;

/// Default maximum string length: 10 MB.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 10 * 1024 * 1024;

/// Errors from JSON normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    /// The input is not JSON.
    #[error("JSON parse error: {0}")]
    Parse(String),

    /// Valid JSON that does not have the shape of a NIEM JSON document.
    #[error("invalid NIEM JSON structure at {path}: {message}")]
    InvalidStructure {
        /// JSON path of the offending value.
        path: String,
        /// What is wrong.
        message: String,
    },

    /// A key uses a prefix missing from every `@context` in scope.
    #[error("unknown namespace prefix '{prefix}' at {path}")]
    UnknownPrefix {
        /// The prefix as written.
        prefix: String,
        /// JSON path of the key.
        path: String,
    },

    /// The root element is not the declared root.
    #[error("root element is {found}, expected {expected}")]
    RootMismatch {
        /// Declared root qualified name.
        expected: String,
        /// Key found at the top level.
        found: String,
    },

    /// Maximum recursion depth exceeded.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),

    /// Maximum array size exceeded.
    #[error("maximum array size ({0}) exceeded - array has {1} elements")]
    MaxArraySizeExceeded(usize, usize),

    /// Maximum string length exceeded.
    #[error("maximum string length ({0}) exceeded - string has {1} bytes")]
    MaxStringLengthExceeded(usize, usize),
}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        JsonError::Parse(err.to_string())
    }
}

impl From<JsonError> for ConversionError {
    fn from(err: JsonError) -> Self {
        ConversionError::parse(err.to_string())
    }
}

/// Result type alias for JSON normalization.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Configuration for [`from_json`].
///
/// ```
/// use niemgraph_json::FromJsonConfig;
///
/// let config = FromJsonConfig::default()
///     .with_root("cd:CrashDriverInfo")
///     .with_max_depth(32);
/// assert_eq!(config.max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromJsonConfig {
    /// Expected root qualified name. `None` takes the single top-level key.
    pub root: Option<String>,
    /// Maximum nesting depth (default: 100).
    pub max_depth: usize,
    /// Maximum number of items in one array (default: 1,000,000).
    pub max_array_size: usize,
    /// Maximum string length in bytes (default: 10 MB).
    pub max_string_length: usize,
    /// Display prefixes pinned per namespace URI.
    pub prefixes: PrefixTable,
}

impl Default for FromJsonConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_array_size: DEFAULT_MAX_ARRAY_SIZE,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            prefixes: PrefixTable::new(),
        }
    }
}

impl FromJsonConfig {
    /// Require a root element.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the array size limit.
    pub fn with_max_array_size(mut self, max: usize) -> Self {
        self.max_array_size = max;
        self
    }

    /// Set the string length limit.
    pub fn with_max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = max;
        self
    }

    /// Display names in `uri` with `prefix`, whatever the document binds.
    pub fn with_prefix(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.prefixes.bind(prefix, uri);
        self
    }
}

/// Normalize a NIEM JSON document.
///
/// The fingerprint of the tree is computed over `input` exactly as given.
pub fn from_json(input: &[u8], config: &FromJsonConfig) -> Result<ElementTree> {
    let value: Value = serde_json::from_slice(input)?;
    let top = match value {
        Value::Object(top) => top,
        other => {
            return Err(invalid(
                "$",
                format!("top level must be an object, found {}", kind(&other)),
            ))
        }
    };

    let mut normalizer = Normalizer {
        config,
        namespaces: BTreeMap::new(),
    };
    let scope = normalizer.scope(&Scope::default(), &top, "$")?;
    let root = normalizer.root(top, &scope)?;
    debug!(
        root = %root.name,
        elements = root.subtree_size(),
        prefixes = normalizer.namespaces.len(),
        "normalized JSON document"
    );
    Ok(ElementTree::from_source(root, input)
        .with_namespaces(normalizer.namespaces)
        .canonicalize_prefixes(&config.prefixes))
}

/// Normalize a NIEM JSON document held in a string.
pub fn from_json_str(input: &str, config: &FromJsonConfig) -> Result<ElementTree> {
    from_json(input.as_bytes(), config)
}

/// Prefix bindings visible at one object.
#[derive(Debug, Clone, Default)]
struct Scope {
    prefixes: BTreeMap<String, String>,
    vocab: Option<String>,
}

struct Normalizer<'a> {
    config: &'a FromJsonConfig,
    namespaces: BTreeMap<String, String>,
}

fn invalid(path: &str, message: impl Into<String>) -> JsonError {
    JsonError::InvalidStructure {
        path: path.to_string(),
        message: message.into(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Namespace URI as it would be spelled in XML.
fn namespace_uri(uri: &str) -> String {
    uri.strip_suffix('#').unwrap_or(uri).to_string()
}

/// Structural keyword named by a key, if any.
fn keyword(key: &str) -> Option<&str> {
    let bare = key.strip_prefix('@').unwrap_or(key);
    let bare = bare.strip_prefix("structures:").unwrap_or(bare);
    let marked = key.starts_with('@') || key.starts_with("structures:");
    match bare {
        "id" | "ref" | "uri" | "metadata" | "relationshipMetadata" if marked => Some(bare),
        "nil" | "xsi:nil" if key.starts_with('@') || key == "xsi:nil" => Some("nil"),
        "value" | "context" if key.starts_with('@') => Some(bare),
        "rdf:value" => Some("value"),
        _ => None,
    }
}

impl Normalizer<'_> {
    /// Extend `outer` with the `@context` of `object`.
    fn scope(&mut self, outer: &Scope, object: &Map<String, Value>, path: &str) -> Result<Scope> {
        let Some(context) = object.get("@context") else {
            return Ok(outer.clone());
        };
        let mut scope = outer.clone();
        let entries = match context {
            Value::Object(entries) => vec![entries],
            Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
            // remote context documents are not fetched
            Value::String(_) => Vec::new(),
            other => {
                return Err(invalid(
                    &format!("{}.@context", path),
                    format!("expected an object, found {}", kind(other)),
                ))
            }
        };
        for entries in entries {
            for (prefix, uri) in entries {
                let uri = match uri {
                    Value::String(uri) => uri.as_str(),
                    Value::Object(term) => match term.get("@id").and_then(Value::as_str) {
                        Some(uri) => uri,
                        None => continue,
                    },
                    _ => continue,
                };
                let uri = namespace_uri(uri);
                if prefix == "@vocab" {
                    self.namespaces.entry(String::new()).or_insert_with(|| uri.clone());
                    scope.vocab = Some(uri);
                } else if !prefix.starts_with('@') {
                    self.namespaces
                        .entry(prefix.clone())
                        .or_insert_with(|| uri.clone());
                    scope.prefixes.insert(prefix.clone(), uri);
                }
            }
        }
        Ok(scope)
    }

    fn qname(&self, key: &str, scope: &Scope, path: &str) -> Result<QName> {
        match key.split_once(':') {
            Some((prefix, local)) => {
                let namespace = scope.prefixes.get(prefix).ok_or_else(|| JsonError::UnknownPrefix {
                    prefix: prefix.to_string(),
                    path: path.to_string(),
                })?;
                Ok(QName::new(namespace.clone(), prefix, local))
            }
            None => Ok(QName {
                namespace: scope.vocab.clone(),
                prefix: None,
                local: key.to_string(),
            }),
        }
    }

    fn root(&mut self, mut top: Map<String, Value>, scope: &Scope) -> Result<ElementNode> {
        let content_keys: Vec<String> = top
            .keys()
            .filter(|k| !k.starts_with('@'))
            .cloned()
            .collect();

        let wrapped = match (&self.config.root, content_keys.as_slice()) {
            (Some(expected), [only]) if only == expected => true,
            (Some(_), _) => false,
            (None, [_]) => true,
            (None, keys) => {
                return Err(invalid(
                    "$",
                    format!("expected a single root key, found {}", keys.len()),
                ))
            }
        };

        if wrapped {
            let key = content_keys[0].clone();
            let value = top.remove(&key).unwrap_or(Value::Null);
            let path = format!("$.{}", key);
            let name = self.qname(&key, scope, &path)?;
            return match value {
                Value::Array(_) => Err(invalid(&path, "the root element cannot repeat")),
                value => self.element(name, value, scope, &path, 1),
            };
        }

        // top-level object is the content of the declared root
        let expected = self.config.root.clone().unwrap_or_default();
        let name = self.qname(&expected, scope, "$").map_err(|_| JsonError::RootMismatch {
            expected: expected.clone(),
            found: content_keys.join(", "),
        })?;
        self.element(name, Value::Object(top), scope, "$", 1)
    }

    fn text(&self, value: &Value, path: &str) -> Result<Option<String>> {
        let text = match value {
            Value::String(s) => {
                if s.len() > self.config.max_string_length {
                    return Err(JsonError::MaxStringLengthExceeded(
                        self.config.max_string_length,
                        s.len(),
                    ));
                }
                s.trim().to_string()
            }
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => return Ok(None),
            other => {
                return Err(invalid(
                    path,
                    format!("expected a scalar, found {}", kind(other)),
                ))
            }
        };
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    fn id_list(&self, value: &Value, path: &str) -> Result<Vec<String>> {
        match value {
            Value::String(ids) => Ok(ids.split_whitespace().map(str::to_string).collect()),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(path, "metadata ids must be strings"))
                })
                .collect(),
            other => Err(invalid(
                path,
                format!("expected metadata ids, found {}", kind(other)),
            )),
        }
    }

    fn element(
        &mut self,
        name: QName,
        value: Value,
        scope: &Scope,
        path: &str,
        depth: usize,
    ) -> Result<ElementNode> {
        if depth > self.config.max_depth {
            return Err(JsonError::MaxDepthExceeded(self.config.max_depth));
        }
        let mut element = ElementNode::new(name);
        let object = match value {
            Value::Object(object) => object,
            Value::Array(_) => return Err(invalid(path, "nested arrays are not allowed")),
            Value::Null => {
                element.nil = true;
                return Ok(element);
            }
            scalar => {
                element.text = self.text(&scalar, path)?;
                return Ok(element);
            }
        };

        let scope = self.scope(scope, &object, path)?;
        let mut declared_only = true;
        for (key, value) in object {
            let child_path = format!("{}.{}", path, key);
            match keyword(&key) {
                Some("context") => {}
                Some("id") => element.declared_id = self.text(&value, &child_path)?,
                Some("ref") => element.reference = self.text(&value, &child_path)?,
                Some("uri") => {
                    if let Some(uri) = self.text(&value, &child_path)? {
                        match uri.strip_prefix('#') {
                            Some(id) => element.reference = Some(id.to_string()),
                            // an absolute IRI is kept as an ordinary attribute
                            None => {
                                declared_only = false;
                                let name = QName {
                                    namespace: scope.prefixes.get("structures").cloned(),
                                    prefix: Some("structures".to_string()),
                                    local: "uri".to_string(),
                                };
                                element.attributes.insert(name, uri);
                            }
                        }
                    }
                }
                Some("metadata") => element.metadata.extend(self.id_list(&value, &child_path)?),
                Some("relationshipMetadata") => element
                    .relationship_metadata
                    .extend(self.id_list(&value, &child_path)?),
                Some("nil") => {
                    element.nil = matches!(value, Value::Bool(true))
                        || matches!(value.as_str(), Some("true" | "1"))
                }
                Some(_) => {
                    declared_only = false;
                    element.text = self.text(&value, &child_path)?;
                }
                None if key.starts_with('@') => {
                    declared_only = false;
                    let name = self.qname(&key[1..], &scope, &child_path)?;
                    let text = self.text(&value, &child_path)?.unwrap_or_default();
                    element.attributes.insert(name, text);
                }
                None => {
                    declared_only = false;
                    let name = self.qname(&key, &scope, &child_path)?;
                    match value {
                        Value::Array(items) => {
                            if items.len() > self.config.max_array_size {
                                return Err(JsonError::MaxArraySizeExceeded(
                                    self.config.max_array_size,
                                    items.len(),
                                ));
                            }
                            for (i, item) in items.into_iter().enumerate() {
                                let item_path = format!("{}[{}]", child_path, i);
                                let child =
                                    self.element(name.clone(), item, &scope, &item_path, depth + 1)?;
                                element.children.push(child);
                            }
                        }
                        value => {
                            let child = self.element(name, value, &scope, &child_path, depth + 1)?;
                            element.children.push(child);
                        }
                    }
                }
            }
        }

        // `{"@id": "P01"}` on its own points at P01
        if declared_only && element.reference.is_none() {
            if let Some(id) = element.declared_id.take() {
                element.reference = Some(id);
            }
        }
        element.refresh_kind();
        Ok(element)
    }
}
