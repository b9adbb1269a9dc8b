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

//! Batch conversion of many documents.
//!
//! Two modes:
//!
//! - **standard**: every document runs the full pipeline on its own, in
//!   parallel once the batch reaches [`BatchConfig::parallel_threshold`]
//! - **shared namespace**: per-document phases run in parallel, then a single
//!   [`Reconciler`] resolves references and hubs across the whole batch
//!
//! ```
//! use niemgraph_core::{BatchConverter, ConvertConfig, ElementNode, ElementTree, QName};
//!
//! let trees: Vec<ElementTree> = (0..3)
//!     .map(|i| {
//!         let root = ElementNode::new(QName::local("Report"))
//!             .with_child(ElementNode::leaf(QName::local("Number"), i.to_string()));
//!         ElementTree::from_source(root, format!("report-{}", i).as_bytes())
//!     })
//!     .collect();
//!
//! let results = BatchConverter::new(ConvertConfig::default()).convert_all(&trees);
//! assert_eq!(results.success_count(), 3);
//! ```

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::build::PartialGraph;
use crate::config::ConvertConfig;
use crate::error::Result;
use crate::graph::Conversion;
use crate::reconcile::Reconciler;
use crate::tree::{ElementTree, Fingerprint};

/// Batch execution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Minimum number of documents before work is spread over threads.
    ///
    /// Default: 4
    pub parallel_threshold: usize,

    /// Thread count for a dedicated pool. `None` uses rayon's global pool.
    ///
    /// Default: None
    pub max_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4,
            max_threads: None,
        }
    }
}

/// Outcome for one document of a standard batch.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Position in the input.
    pub index: usize,
    /// Document fingerprint.
    pub fingerprint: Fingerprint,
    /// Source label.
    pub source: Option<String>,
    /// Conversion or the error that stopped it.
    pub result: Result<Conversion>,
}

impl DocumentResult {
    /// True on success.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Results of a standard batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchResults {
    /// Per-document results.
    pub documents: Vec<DocumentResult>,
    /// Wall time.
    pub elapsed_ms: u128,
}

impl BatchResults {
    /// Number of documents.
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Number of successful conversions.
    pub fn success_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    /// Number of failed conversions.
    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// True when every document converted.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Successful conversions.
    pub fn successes(&self) -> impl Iterator<Item = (&DocumentResult, &Conversion)> {
        self.documents
            .iter()
            .filter_map(|d| d.result.as_ref().ok().map(|c| (d, c)))
    }

    /// Failed documents.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents.iter().filter(|d| !d.is_success())
    }

    /// Nodes across all successful documents.
    pub fn total_nodes(&self) -> usize {
        self.successes().map(|(_, c)| c.graph.node_count()).sum()
    }

    /// Edges across all successful documents.
    pub fn total_edges(&self) -> usize {
        self.successes().map(|(_, c)| c.graph.edge_count()).sum()
    }
}

/// Converts many documents with one configuration.
#[derive(Debug, Clone, Default)]
pub struct BatchConverter {
    config: ConvertConfig,
    batch: BatchConfig,
}

impl BatchConverter {
    /// Converter with default batch settings.
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            batch: BatchConfig::default(),
        }
    }

    /// Replace the batch settings.
    pub fn with_batch_config(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Conversion settings.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert each document independently. One failure does not stop the
    /// others.
    pub fn convert_all(&self, trees: &[ElementTree]) -> BatchResults {
        let start = Instant::now();
        let convert_one = |(index, tree): (usize, &ElementTree)| DocumentResult {
            index,
            fingerprint: tree.fingerprint.clone(),
            source: tree.source.clone(),
            result: crate::convert(tree, &self.config),
        };

        let documents: Vec<DocumentResult> = if self.parallel(trees.len()) {
            self.install(|| trees.par_iter().enumerate().map(convert_one).collect())
        } else {
            trees.iter().enumerate().map(convert_one).collect()
        };

        let results = BatchResults {
            documents,
            elapsed_ms: start.elapsed().as_millis(),
        };
        info!(
            documents = results.total(),
            succeeded = results.success_count(),
            failed = results.failure_count(),
            nodes = results.total_nodes(),
            edges = results.total_edges(),
            elapsed_ms = results.elapsed_ms as u64,
            "standard batch finished"
        );
        results
    }

    /// Convert the batch into one graph with references and hubs resolved
    /// across documents. Any fatal error aborts the whole batch.
    pub fn convert_shared(&self, trees: &[ElementTree]) -> Result<Conversion> {
        let start = Instant::now();
        let partial_of = |tree: &ElementTree| crate::build_partial(tree, &self.config);

        let partials: Vec<PartialGraph> = if self.parallel(trees.len()) {
            self.install(|| trees.par_iter().map(partial_of).collect::<Result<Vec<_>>>())?
        } else {
            trees.iter().map(partial_of).collect::<Result<Vec<_>>>()?
        };
        debug!(documents = partials.len(), "built partial graphs");

        let mut reconciler = Reconciler::shared(&self.config);
        for partial in partials {
            reconciler.add(partial);
        }
        let conversion = reconciler.finish()?;

        info!(
            documents = trees.len(),
            nodes = conversion.graph.node_count(),
            edges = conversion.graph.edge_count(),
            warnings = conversion.warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "shared batch finished"
        );
        Ok(conversion)
    }

    fn parallel(&self, documents: usize) -> bool {
        documents >= self.batch.parallel_threshold.max(1) && documents > 1
    }

    fn install<R: Send>(&self, work: impl FnOnce() -> R + Send) -> R {
        let Some(threads) = self.batch.max_threads else {
            return work();
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                debug!(error = %e, "dedicated pool unavailable, using the global pool");
                work()
            }
        }
    }
}
