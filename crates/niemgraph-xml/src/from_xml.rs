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

//! XML document to [`ElementTree`].

use std::collections::BTreeMap;

use niemgraph_core::{ElementNode, ElementTree, PrefixTable, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, PrefixDeclaration, ResolveResult};
use quick_xml::NsReader;
use tracing::debug;

use crate::error::{Result, XmlError};

/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default maximum text or attribute length: 10 MB.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 10 * 1024 * 1024;

/// XML Schema instance namespace (`xsi:nil`).
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Configuration for [`from_xml`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromXmlConfig {
    /// Expected root qualified name (`prefix:Local`). `None` accepts any root.
    pub root: Option<String>,
    /// Maximum nesting depth (default: 100).
    pub max_depth: usize,
    /// Maximum length of text content or an attribute value (default: 10 MB).
    pub max_string_length: usize,
    /// Display prefixes pinned per namespace URI.
    pub prefixes: PrefixTable,
}

impl Default for FromXmlConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            prefixes: PrefixTable::new(),
        }
    }
}

impl FromXmlConfig {
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

/// Normalize an XML document.
///
/// The fingerprint of the tree is computed over `input` exactly as given.
pub fn from_xml(input: &[u8], config: &FromXmlConfig) -> Result<ElementTree> {
    let text = std::str::from_utf8(input)?;
    let (root, namespaces) = parse(text, config)?;
    debug!(
        root = %root.name,
        elements = root.subtree_size(),
        prefixes = namespaces.len(),
        "normalized XML document"
    );
    Ok(ElementTree::from_source(root, input)
        .with_namespaces(namespaces)
        .canonicalize_prefixes(&config.prefixes))
}

/// Normalize an XML document held in a string.
pub fn from_xml_str(input: &str, config: &FromXmlConfig) -> Result<ElementTree> {
    from_xml(input.as_bytes(), config)
}

struct Open {
    element: ElementNode,
    text: String,
}

fn parse(text: &str, config: &FromXmlConfig) -> Result<(ElementNode, BTreeMap<String, String>)> {
    let mut reader = NsReader::from_str(text);
    let mut namespaces = BTreeMap::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut root: Option<ElementNode> = None;

    loop {
        let pos = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| XmlError::parse(reader.buffer_position(), e))?;
        match event {
            Event::Start(start) => {
                let element = open(&reader, &start, &mut namespaces, config, pos)?;
                check_root(&stack, &root, &element, config)?;
                if stack.len() + 1 > config.max_depth {
                    return Err(XmlError::RecursionLimitExceeded {
                        max: config.max_depth,
                        current: stack.len() + 1,
                    });
                }
                stack.push(Open {
                    element,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                let element = open(&reader, &start, &mut namespaces, config, pos)?;
                check_root(&stack, &root, &element, config)?;
                if stack.len() + 1 > config.max_depth {
                    return Err(XmlError::RecursionLimitExceeded {
                        max: config.max_depth,
                        current: stack.len() + 1,
                    });
                }
                close(element, &mut stack, &mut root);
            }
            Event::Text(content) => {
                if let Some(top) = stack.last_mut() {
                    let unescaped = content
                        .unescape()
                        .map_err(|e| XmlError::parse(reader.buffer_position(), e))?;
                    top.text.push_str(&unescaped);
                    check_length(top.text.len(), config)?;
                }
            }
            Event::CData(content) => {
                if let Some(top) = stack.last_mut() {
                    let raw = content.into_inner();
                    top.text.push_str(std::str::from_utf8(&raw)?);
                    check_length(top.text.len(), config)?;
                }
            }
            Event::End(_) => {
                let Some(Open { mut element, text }) = stack.pop() else {
                    return Err(XmlError::structure("closing tag without an open element"));
                };
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    element.text = Some(trimmed.to_string());
                }
                close(element, &mut stack, &mut root);
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::structure(format!(
            "unexpected end of document inside {}",
            open.element.name
        )));
    }
    let root = root.ok_or_else(|| XmlError::structure("document has no root element"))?;
    Ok((root, namespaces))
}

fn check_root(
    stack: &[Open],
    root: &Option<ElementNode>,
    element: &ElementNode,
    config: &FromXmlConfig,
) -> Result<()> {
    if !stack.is_empty() {
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::structure(format!(
            "second root element {}",
            element.name
        )));
    }
    match &config.root {
        Some(expected) if *expected != element.name.to_string() => Err(XmlError::RootMismatch {
            expected: expected.clone(),
            found: element.name.to_string(),
        }),
        _ => Ok(()),
    }
}

fn close(mut element: ElementNode, stack: &mut [Open], root: &mut Option<ElementNode>) {
    element.refresh_kind();
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None => *root = Some(element),
    }
}

fn check_length(length: usize, config: &FromXmlConfig) -> Result<()> {
    if length > config.max_string_length {
        return Err(XmlError::StringLengthLimitExceeded {
            max: config.max_string_length,
            current: length,
        });
    }
    Ok(())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn namespace_of(resolved: ResolveResult<'_>, pos: usize) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(lossy(uri))),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(XmlError::UnresolvedPrefix {
            prefix: lossy(&prefix),
            pos,
        }),
    }
}

fn is_structures(namespace: Option<&str>) -> bool {
    namespace.is_some_and(|ns| ns.contains("/structures/"))
}

fn open(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    namespaces: &mut BTreeMap<String, String>,
    config: &FromXmlConfig,
    pos: usize,
) -> Result<ElementNode> {
    let (resolved, local) = reader.resolve_element(start.name());
    let name = QName {
        namespace: namespace_of(resolved, pos)?,
        prefix: start.name().prefix().map(|p| lossy(p.as_ref())),
        local: lossy(local.as_ref()),
    };
    let mut element = ElementNode::new(name);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::parse(pos, e))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::parse(pos, e))?;
        check_length(value.len(), config)?;

        if let Some(binding) = attribute.key.as_namespace_binding() {
            let prefix = match binding {
                PrefixDeclaration::Default => String::new(),
                PrefixDeclaration::Named(prefix) => lossy(prefix),
            };
            namespaces.entry(prefix).or_insert_with(|| value.to_string());
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attribute.key);
        let namespace = namespace_of(resolved, pos)?;
        let local = lossy(local.as_ref());

        if is_structures(namespace.as_deref()) {
            match local.as_str() {
                "id" => element.declared_id = Some(value.to_string()),
                "ref" => element.reference = Some(value.to_string()),
                "uri" if value.starts_with('#') => {
                    element.reference = Some(value[1..].to_string())
                }
                "metadata" => element
                    .metadata
                    .extend(value.split_whitespace().map(str::to_string)),
                "relationshipMetadata" => element
                    .relationship_metadata
                    .extend(value.split_whitespace().map(str::to_string)),
                _ => {
                    let name = QName {
                        namespace,
                        prefix: attribute.key.prefix().map(|p| lossy(p.as_ref())),
                        local,
                    };
                    element.attributes.insert(name, value.to_string());
                }
            }
            continue;
        }

        if namespace.as_deref() == Some(XSI_NAMESPACE) {
            // schemaLocation and type are schema plumbing
            if local == "nil" {
                element.nil = matches!(value.trim(), "true" | "1");
            }
            continue;
        }

        let name = QName {
            namespace,
            prefix: attribute.key.prefix().map(|p| lossy(p.as_ref())),
            local,
        };
        element.attributes.insert(name, value.to_string());
    }

    Ok(element)
}
