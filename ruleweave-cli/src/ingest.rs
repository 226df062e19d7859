// Copyright 2025 Ruleweave Contributors (https://github.com/ruleweave)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Ingestion pipeline: read rule documents, extract fragments, populate the
//! graph. One bad document never aborts the batch; a dead store does.

use crate::config::IngestConfig;
use anyhow::{Context, Result};
use ruleweave_extract::{FragmentExtractor, LlmProviderManager};
use ruleweave_graph::store::Neo4jStore;
use ruleweave_graph::GraphPopulator;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(config: IngestConfig, data_dir: &Path) -> Result<()> {
    let store = Neo4jStore::connect(&config.graph)
        .await
        .with_context(|| format!("failed to connect to entity store at {}", config.graph.uri))?;
    let populator = GraphPopulator::new(Arc::new(store));

    let llm = Arc::new(LlmProviderManager::new(&config.llm));
    let extractor = FragmentExtractor::new(llm, config.extractor.clone());

    let documents = rule_documents(data_dir)?;
    if documents.is_empty() {
        warn!("No .txt rule documents found in {:?}", data_dir);
        return Ok(());
    }

    info!(
        "Starting ingestion of {} documents from {:?}",
        documents.len(),
        data_dir
    );

    let mut stored = 0usize;
    let mut skipped_fragments = 0usize;
    let mut skipped_documents = 0usize;

    for path in &documents {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: failed to read file: {}", name, e);
                skipped_documents += 1;
                continue;
            }
        };

        let fragments = extractor.extract(&text).await;
        if fragments.is_empty() {
            warn!("Skipping population for {}: extraction yielded no fragments", name);
            skipped_documents += 1;
            continue;
        }

        let report = populator
            .populate(&fragments)
            .await
            .with_context(|| format!("failed to populate fragments from {}", name))?;

        info!(
            document = %name,
            stored = report.stored(),
            skipped = report.skipped(),
            "populated rule fragments"
        );
        stored += report.stored();
        skipped_fragments += report.skipped();
    }

    info!(
        "Ingestion finished: {} fragments stored, {} fragments skipped, {} documents without extraction",
        stored, skipped_fragments, skipped_documents
    );

    Ok(())
}

/// The `.txt` documents of a directory, sorted for a deterministic batch
/// order.
fn rule_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read rule document directory {:?}", dir))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();

    paths.sort();
    Ok(paths)
}
