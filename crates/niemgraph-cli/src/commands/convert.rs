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

//! Convert command - one document to graph JSON or Cypher

use tracing::info;

use super::{print_warnings, render, write_output};
use crate::cli::{ConversionOptions, InputOptions, OutputOptions};
use crate::error::CliError;
use crate::input;

/// Convert a NIEM XML or JSON document.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or parsed, if conversion fails
/// (for example on a dangling reference in strict mode), or if the output
/// cannot be written.
///
/// # Examples
///
/// ```no_run
/// use niemgraph_cli::cli::{ConversionOptions, InputOptions, OutputOptions};
/// use niemgraph_cli::commands::convert;
///
/// # fn main() -> Result<(), niemgraph_cli::error::CliError> {
/// convert(
///     "crash.xml",
///     Some("crash.graph.json"),
///     &InputOptions::default(),
///     &ConversionOptions::default(),
///     &OutputOptions::default(),
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn convert(
    file: &str,
    output: Option<&str>,
    input: &InputOptions,
    conversion: &ConversionOptions,
    export: &OutputOptions,
) -> Result<(), CliError> {
    let config = conversion.to_config()?;
    let tree = input::load(file, input.input_format, input.root.as_deref())?;

    let result = niemgraph_core::convert(&tree, &config).map_err(|e| CliError::conversion(file, e))?;
    print_warnings(file, &result.warnings);

    let text = render(&result, export)?;
    write_output(&text, output)?;

    info!(
        file,
        nodes = result.graph.node_count(),
        edges = result.graph.edge_count(),
        warnings = result.warnings.len(),
        "converted document"
    );
    Ok(())
}
