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

//! Error types for XML normalization.

use niemgraph_core::ConversionError;
use thiserror::Error;

/// Errors raised while normalizing an XML document.
///
/// All of these are fatal: a document that fails to normalize produces no
/// element tree and therefore no graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// Malformed markup.
    ///
    /// ```text
    /// XML parse error at position 42: unexpected end of file
    /// ```
    #[error("XML parse error at position {pos}: {message}")]
    Parse {
        /// Byte offset reached by the reader.
        pos: usize,
        /// Description from the reader.
        message: String,
    },

    /// An element or attribute uses a prefix with no `xmlns` binding in scope.
    #[error("unbound namespace prefix '{prefix}' at position {pos}")]
    UnresolvedPrefix {
        /// The prefix as written.
        prefix: String,
        /// Byte offset of the element.
        pos: usize,
    },

    /// The root element is not the declared root.
    #[error("root element is {found}, expected {expected}")]
    RootMismatch {
        /// Declared root qualified name.
        expected: String,
        /// Qualified name found in the document.
        found: String,
    },

    /// Nesting deeper than the configured limit.
    ///
    /// Guards against documents like `<a><a><a>...</a></a></a>` built to
    /// exhaust memory.
    #[error("XML nesting depth exceeded (max: {max}, found: {current})")]
    RecursionLimitExceeded {
        /// Maximum allowed depth.
        max: usize,
        /// Depth reached.
        current: usize,
    },

    /// Text or attribute value longer than the configured limit.
    #[error("string length exceeded maximum (max: {max}, found: {current})")]
    StringLengthLimitExceeded {
        /// Maximum allowed length in bytes.
        max: usize,
        /// Length encountered.
        current: usize,
    },

    /// Input is not valid UTF-8.
    #[error("UTF-8 encoding error: {message}")]
    Utf8 {
        /// Decoder message.
        message: String,
    },

    /// Well-formed markup that is not a single-rooted document.
    #[error("invalid XML structure: {message}")]
    Structure {
        /// What is wrong.
        message: String,
    },
}

impl XmlError {
    pub(crate) fn parse(pos: usize, err: impl std::fmt::Display) -> Self {
        XmlError::Parse {
            pos,
            message: err.to_string(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        XmlError::Structure {
            message: message.into(),
        }
    }
}

impl From<std::str::Utf8Error> for XmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        XmlError::Utf8 {
            message: err.to_string(),
        }
    }
}

impl From<XmlError> for ConversionError {
    fn from(err: XmlError) -> Self {
        ConversionError::parse(err.to_string())
    }
}

/// Result type alias for XML normalization.
pub type Result<T> = std::result::Result<T, XmlError>;
