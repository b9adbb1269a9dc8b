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

//! CLI command definitions and argument parsing.
//!
//! ```text
//! Commands
//! ├── convert  one document to graph JSON or Cypher
//! ├── batch    many documents, separately or as one shared graph
//! └── inspect  the normalized element tree of a document
//! ```

mod options;

use clap::Subcommand;

pub use options::{ConversionOptions, InputOptions, OutputFormat, OutputOptions};

use crate::commands;
use crate::error::CliError;

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use niemgraph_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Convert one NIEM XML or JSON document
    ///
    /// Writes the graph as JSON, or as a Cypher script for Neo4j. Warnings
    /// go to stderr; a dangling reference fails unless --lenient is given.
    Convert {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        input: InputOptions,

        #[command(flatten)]
        conversion: ConversionOptions,

        #[command(flatten)]
        export: OutputOptions,
    },

    /// Convert many documents
    ///
    /// By default each document becomes its own graph and one failure does
    /// not stop the others. With --shared, identifiers and hubs are resolved
    /// across all documents into a single graph.
    Batch {
        /// Input file paths
        #[arg(value_name = "FILES", num_args = 1..)]
        files: Vec<String>,

        /// Resolve references and hubs across documents into one graph
        #[arg(short, long)]
        shared: bool,

        /// Output directory for per-document results
        #[arg(short = 'd', long, conflicts_with = "output")]
        output_dir: Option<String>,

        /// Output file for the shared graph (defaults to stdout)
        #[arg(short, long, requires = "shared")]
        output: Option<String>,

        /// Worker threads (defaults to all cores)
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Show per-document progress
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        input: InputOptions,

        #[command(flatten)]
        conversion: ConversionOptions,

        #[command(flatten)]
        export: OutputOptions,
    },

    /// Print the normalized element tree of a document
    ///
    /// Shows each element with the shape the converter gives it: entity,
    /// leaf, pointer, role, association, augmentation or metadata.
    Inspect {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Show attributes and metadata references
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        input: InputOptions,

        #[command(flatten)]
        conversion: ConversionOptions,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if reading, normalizing, converting or writing fails, or
    /// if any document of a batch fails.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Convert {
                file,
                output,
                input,
                conversion,
                export,
            } => commands::convert(&file, output.as_deref(), &input, &conversion, &export),
            Commands::Batch {
                files,
                shared,
                output_dir,
                output,
                threads,
                verbose,
                input,
                conversion,
                export,
            } => {
                let request = commands::BatchRequest {
                    files,
                    shared,
                    output_dir,
                    output,
                    threads,
                    verbose,
                };
                commands::batch(&request, &input, &conversion, &export)
            }
            Commands::Inspect {
                file,
                verbose,
                input,
                conversion,
            } => commands::inspect(&file, verbose, &input, &conversion),
        }
    }
}
