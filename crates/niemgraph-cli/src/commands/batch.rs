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

//! Batch command - many documents, standard or shared namespace

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use niemgraph_core::{BatchConfig, BatchConverter, ElementTree};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{print_warnings, render, write_output};
use crate::cli::{ConversionOptions, InputOptions, OutputOptions};
use crate::error::CliError;
use crate::input;

/// Label used for errors and warnings of a shared conversion.
const SHARED_SOURCE: &str = "<batch>";

/// Files and modes of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    /// Input files, in order.
    pub files: Vec<String>,
    /// Resolve identifiers and hubs across documents.
    pub shared: bool,
    /// Directory for per-document (or the shared) output.
    pub output_dir: Option<String>,
    /// Output file for the shared graph.
    pub output: Option<String>,
    /// Worker threads; `None` uses every core.
    pub threads: Option<usize>,
    /// Per-document progress lines.
    pub verbose: bool,
}

/// Convert many documents.
///
/// In standard mode every document is converted on its own and failures are
/// reported per document; the command fails at the end if any document
/// failed. In shared mode the first failure aborts the batch.
///
/// # Errors
///
/// Returns `Err` if the thread pool cannot be built, if output cannot be
/// written, or if any document fails.
pub fn batch(
    request: &BatchRequest,
    input: &InputOptions,
    conversion: &ConversionOptions,
    export: &OutputOptions,
) -> Result<(), CliError> {
    if request.files.is_empty() {
        return Err(CliError::InvalidInput("no input files".to_string()));
    }
    let config = conversion.to_config()?;
    let converter = BatchConverter::new(config).with_batch_config(BatchConfig {
        max_threads: request.threads,
        ..BatchConfig::default()
    });

    let loaded = load_all(request, input)?;
    debug!(documents = loaded.len(), "loaded batch inputs");

    if let Some(dir) = &request.output_dir {
        fs::create_dir_all(dir).map_err(|e| CliError::io_error(dir, e))?;
    }

    if request.shared {
        shared(request, &converter, loaded, export)
    } else {
        standard(request, &converter, loaded, export)
    }
}

fn load_all(
    request: &BatchRequest,
    input: &InputOptions,
) -> Result<Vec<(String, Result<ElementTree, CliError>)>, CliError> {
    let load = |file: &String| {
        let tree = input::load(file, input.input_format, input.root.as_deref());
        (file.clone(), tree)
    };
    match request.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| CliError::InvalidInput(format!("cannot start {} threads: {}", threads, e)))?;
            Ok(pool.install(|| request.files.par_iter().map(load).collect()))
        }
        None => Ok(request.files.par_iter().map(load).collect()),
    }
}

fn shared(
    request: &BatchRequest,
    converter: &BatchConverter,
    loaded: Vec<(String, Result<ElementTree, CliError>)>,
    export: &OutputOptions,
) -> Result<(), CliError> {
    let trees = loaded
        .into_iter()
        .map(|(_, tree)| tree)
        .collect::<Result<Vec<_>, _>>()?;

    let result = converter
        .convert_shared(&trees)
        .map_err(|e| CliError::conversion(SHARED_SOURCE, e))?;
    print_warnings(SHARED_SOURCE, &result.warnings);

    let text = render(&result, export)?;
    let target = match (&request.output_dir, &request.output) {
        (Some(dir), _) => Some(output_path(dir, "shared", export)),
        (None, Some(file)) => Some(PathBuf::from(file)),
        (None, None) => None,
    };
    let target = target.as_deref().map(path_str);
    write_output(&text, target.as_deref())?;

    info!(
        documents = trees.len(),
        nodes = result.graph.node_count(),
        edges = result.graph.edge_count(),
        warnings = result.warnings.len(),
        "merged documents"
    );
    Ok(())
}

fn standard(
    request: &BatchRequest,
    converter: &BatchConverter,
    loaded: Vec<(String, Result<ElementTree, CliError>)>,
    export: &OutputOptions,
) -> Result<(), CliError> {
    let total = loaded.len();
    let mut failures: Vec<(String, CliError)> = Vec::new();
    let mut names = Vec::new();
    let mut trees = Vec::new();
    for (file, tree) in loaded {
        match tree {
            Ok(tree) => {
                names.push(file);
                trees.push(tree);
            }
            Err(e) => failures.push((file, e)),
        }
    }

    let results = converter.convert_all(&trees);
    let mut used = HashSet::new();
    for document in &results.documents {
        let file = &names[document.index];
        match &document.result {
            Ok(conversion) => {
                print_warnings(file, &conversion.warnings);
                if let Some(dir) = &request.output_dir {
                    let path = unique_output_path(dir, file, export, &mut used);
                    write_output(&render(conversion, export)?, Some(&path_str(&path)))?;
                }
                if request.verbose {
                    println!(
                        "  {} {}: {} nodes, {} edges, {} warnings",
                        "✓".green(),
                        file,
                        conversion.graph.node_count(),
                        conversion.graph.edge_count(),
                        conversion.warnings.len()
                    );
                }
            }
            Err(e) => failures.push((file.clone(), CliError::conversion(file.as_str(), e.clone()))),
        }
    }

    if !failures.is_empty() {
        eprintln!("{}", "Conversion failures:".red().bold());
        for (file, error) in &failures {
            eprintln!("  {} {}: {}", "✗".red(), file, error);
        }
    }

    let succeeded = total - failures.len();
    println!(
        "{} {} documents, {} succeeded, {} failed, {} nodes, {} edges",
        "Summary:".bright_blue().bold(),
        total,
        succeeded.to_string().green(),
        failures.len().to_string().red(),
        results.total_nodes(),
        results.total_edges()
    );
    info!(documents = total, failed = failures.len(), "batch finished");

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            failed: failures.len(),
            total,
        })
    }
}

fn output_path(dir: &str, stem: &str, export: &OutputOptions) -> PathBuf {
    Path::new(dir).join(format!("{}.{}", stem, export.to.extension()))
}

/// Output path named after the input's stem, numbered when two inputs share
/// a stem.
fn unique_output_path(
    dir: &str,
    file: &str,
    export: &OutputOptions,
    used: &mut HashSet<String>,
) -> PathBuf {
    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let mut candidate = stem.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", stem, n);
        n += 1;
    }
    output_path(dir, &candidate, export)
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_output_names_are_unique() {
        let export = OutputOptions {
            to: OutputFormat::Cypher,
            ..Default::default()
        };
        let mut used = HashSet::new();
        let a = unique_output_path("out", "a/report.xml", &export, &mut used);
        let b = unique_output_path("out", "b/report.json", &export, &mut used);
        assert_eq!(a, Path::new("out").join("report.cypher"));
        assert_eq!(b, Path::new("out").join("report-2.cypher"));
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let err = batch(
            &BatchRequest::default(),
            &InputOptions::default(),
            &ConversionOptions::default(),
            &OutputOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
