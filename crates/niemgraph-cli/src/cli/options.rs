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

//! Arguments shared by several commands.

use clap::{Args, ValueEnum};
use niemgraph_core::{ConversionMode, ConvertConfig};
use niemgraph_neo4j::ToCypherConfig;

use crate::config::{load_convert_config, load_mapping_table};
use crate::error::CliError;
use crate::input::InputFormat;

/// How input documents are read.
#[derive(Args, Debug, Clone, Default)]
pub struct InputOptions {
    /// Input format (detected from the extension or content when omitted)
    #[arg(short = 'f', long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Expected root element, as `prefix:Local`
    #[arg(long, value_name = "QNAME")]
    pub root: Option<String>,
}

/// How documents are converted.
///
/// Flags override values loaded from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Conversion config file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Mapping table file (JSON or YAML); switches to mapping mode
    #[arg(short, long, value_name = "FILE")]
    pub mapping: Option<String>,

    /// Fail on complex elements without a mapping rule
    #[arg(long)]
    pub strict_mapping: bool,

    /// Record dangling references as warnings instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Fail on dangling nil references too
    #[arg(long)]
    pub strict_nil: bool,

    /// Only resolve references to ids declared earlier in the document
    #[arg(long)]
    pub no_forward_references: bool,

    /// Type of synthesized hub nodes
    #[arg(long, value_name = "LABEL")]
    pub hub_label: Option<String>,

    /// Maximum element nesting depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Maximum number of nodes per document
    #[arg(long, value_name = "N")]
    pub max_nodes: Option<usize>,

    /// Conservative limits for untrusted documents
    #[arg(long)]
    pub untrusted: bool,
}

impl ConversionOptions {
    /// Build the conversion config: file (or defaults) first, then flags.
    pub fn to_config(&self) -> Result<ConvertConfig, CliError> {
        let mut config = match (&self.config, self.untrusted) {
            (Some(path), _) => load_convert_config(path)?,
            (None, true) => ConvertConfig::for_untrusted_input(),
            (None, false) => ConvertConfig::default(),
        };

        if let Some(path) = &self.mapping {
            config = config.with_mapping(load_mapping_table(path)?);
        }
        if self.strict_mapping {
            if config.mode != ConversionMode::Mapping {
                return Err(CliError::InvalidInput(
                    "--strict-mapping needs a mapping table (--mapping or mode: mapping)".to_string(),
                ));
            }
            config = config.with_strict_mapping();
        }
        if self.lenient {
            config = config.with_lenient_references();
        }
        if self.strict_nil {
            config = config.with_strict_nil_references();
        }
        if self.no_forward_references {
            config = config.without_forward_references();
        }
        if let Some(label) = &self.hub_label {
            config = config.with_hub_label(label.clone());
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if let Some(nodes) = self.max_nodes {
            config = config.with_max_nodes(nodes);
        }
        Ok(config)
    }
}

/// Output serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Graph as JSON (nodes, edges, warnings)
    #[default]
    Graph,
    /// Executable Cypher script
    Cypher,
    /// Cypher statements with parameters as JSON
    CypherJson,
}

impl OutputFormat {
    /// File extension for per-document output files.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Graph => "graph.json",
            OutputFormat::Cypher => "cypher",
            OutputFormat::CypherJson => "cypher.json",
        }
    }
}

/// What is written and how.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Graph)]
    pub to: OutputFormat,

    /// Use CREATE instead of MERGE in Cypher output
    #[arg(long)]
    pub create: bool,

    /// Skip uniqueness constraints in Cypher output
    #[arg(long)]
    pub no_constraints: bool,

    /// Rows per UNWIND statement in Cypher output
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Omit comments from Cypher output
    #[arg(long)]
    pub no_comments: bool,
}

impl OutputOptions {
    /// Cypher settings from the flags.
    pub fn cypher_config(&self) -> ToCypherConfig {
        let mut config = ToCypherConfig::default();
        if self.create {
            config = config.with_create();
        }
        if self.no_constraints {
            config = config.without_constraints();
        }
        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        if self.no_comments {
            config = config.without_comments();
        }
        config
    }
}
