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

//! niemgraph CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **convert**: one NIEM XML or JSON document to graph JSON, a Cypher
//!   script, or Cypher statements as JSON
//! - **batch**: many documents, each on its own or (`--shared`) merged into
//!   one graph with identifiers and hubs resolved across documents
//! - **inspect**: the normalized element tree, each element tagged with the
//!   shape the converter gives it
//!
//! # Configuration
//!
//! `--config` loads a [`ConvertConfig`](niemgraph_core::ConvertConfig) from
//! JSON or YAML and `--mapping` loads a mapping table; individual flags
//! override both.
//!
//! # Examples
//!
//! ```no_run
//! use niemgraph_cli::cli::{ConversionOptions, InputOptions, OutputFormat, OutputOptions};
//! use niemgraph_cli::commands::convert;
//!
//! # fn main() -> Result<(), niemgraph_cli::error::CliError> {
//! let export = OutputOptions {
//!     to: OutputFormat::Cypher,
//!     ..Default::default()
//! };
//! convert(
//!     "crash.xml",
//!     Some("crash.cypher"),
//!     &InputOptions::default(),
//!     &ConversionOptions::default(),
//!     &export,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! - **File size limits**: inputs larger than `NIEMGRAPH_MAX_FILE_SIZE`
//!   bytes (default 1 GB) are rejected before reading
//! - **Untrusted input**: `--untrusted` applies tight depth and node limits

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
