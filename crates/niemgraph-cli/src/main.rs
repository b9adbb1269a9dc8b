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

//! niemgraph command line interface

use std::process::ExitCode;

use clap::Parser;
use niemgraph_cli::cli::Commands;
use tracing_subscriber::EnvFilter;

/// niemgraph - NIEM documents to property graphs
///
/// # Examples
///
/// ```bash
/// # Convert a NIEM XML document to graph JSON
/// niemgraph convert crash.xml -o crash.graph.json
///
/// # Emit a Cypher script for Neo4j
/// niemgraph convert crash.json --to cypher
///
/// # Merge several documents into one graph
/// niemgraph batch --shared reports/*.xml -o merged.graph.json
/// ```
#[derive(Parser)]
#[command(name = "niemgraph")]
#[command(author, version, about = "niemgraph - NIEM documents to property graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("niemgraph_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
