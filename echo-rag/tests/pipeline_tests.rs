//! End-to-end pipeline tests: rebuild, retrieval filtering, concurrency.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use echo_rag::chunking::FixedSizeChunker;
use echo_rag::document::{Chunk, IndexEntry, KnowledgeDocument};
use echo_rag::embedding::EmbeddingProvider;
use echo_rag::error::{RagError, Result};
use echo_rag::index::VectorIndex;
use echo_rag::inmemory::InMemoryVectorIndex;
use echo_rag::pipeline::RagPipeline;
use echo_rag::source::DocumentSource;
use echo_rag::RagConfig;
use tokio::sync::Notify;

/// Embedder with a fixed text → vector table. Unknown text is an error,
/// which keeps tests honest about what gets embedded.
struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl StubEmbedder {
    fn new(entries: &[(&str, [f32; 3])]) -> Self {
        Self {
            vectors: entries
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.vectors.get(text).cloned().ok_or_else(|| RagError::EmbeddingUnavailable {
            provider: "stub".to_string(),
            message: format!("no vector registered for '{text}'"),
        })
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Embedder that parks inside `embed_batch` until released, to hold a
/// rebuild open at a known point.
#[derive(Default)]
struct GatedEmbedder {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl EmbeddingProvider for GatedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }
}

struct StaticSource {
    documents: Vec<KnowledgeDocument>,
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn list_knowledge_documents(&self) -> Result<Vec<KnowledgeDocument>> {
        Ok(self.documents.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl DocumentSource for BrokenSource {
    async fn list_knowledge_documents(&self) -> Result<Vec<KnowledgeDocument>> {
        Err(RagError::SourceError("knowledge directory unreadable".to_string()))
    }
}

fn pipeline_with(embedder: Arc<dyn EmbeddingProvider>, config: RagConfig) -> RagPipeline {
    RagPipeline::builder()
        .chunker(Arc::new(
            FixedSizeChunker::new(config.chunk_size, config.chunk_overlap).unwrap(),
        ))
        .config(config)
        .embedding_provider(embedder)
        .index(Arc::new(InMemoryVectorIndex::new()))
        .build()
        .unwrap()
}

// Unit vectors whose first component equals their cosine similarity to the
// query vector [1, 0, 0].
const QUERY: [f32; 3] = [1.0, 0.0, 0.0];
const SIM_09: [f32; 3] = [0.9, 0.435_889_9, 0.0];
const SIM_07: [f32; 3] = [0.7, 0.714_142_9, 0.0];
const SIM_04: [f32; 3] = [0.4, 0.916_515_1, 0.0];

fn knowledge_fixture() -> (Arc<StubEmbedder>, Vec<KnowledgeDocument>) {
    let embedder = Arc::new(StubEmbedder::new(&[
        ("the captain sailed north", SIM_09),
        ("the ship carried spice", SIM_07),
        ("the port was quiet", SIM_04),
        ("where did the captain go?", QUERY),
    ]));
    let documents = vec![
        KnowledgeDocument::new("voyages.txt", "the captain sailed north"),
        KnowledgeDocument::new("cargo.txt", "the ship carried spice"),
        KnowledgeDocument::new("ports.txt", "the port was quiet"),
    ];
    (embedder, documents)
}

#[tokio::test]
async fn retrieve_filters_below_threshold_and_keeps_rank_order() {
    let (embedder, documents) = knowledge_fixture();
    let config = RagConfig::builder().top_k(3).min_similarity(0.6).build().unwrap();
    let pipeline = pipeline_with(embedder, config);

    pipeline.rebuild_index(&documents).await.unwrap();
    let results = pipeline.retrieve("where did the captain go?").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.source_id, "voyages.txt");
    assert_eq!(results[1].chunk.source_id, "cargo.txt");
    assert!((results[0].similarity - 0.9).abs() < 1e-3);
    assert!((results[1].similarity - 0.7).abs() < 1e-3);
    for result in &results {
        assert!(result.similarity >= 0.6);
    }
}

#[tokio::test]
async fn retrieve_on_empty_index_returns_no_results() {
    let (embedder, _) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());

    let results = pipeline.retrieve("where did the captain go?").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(pipeline.index_size().await, 0);
}

#[tokio::test]
async fn retrieve_with_rejects_threshold_outside_unit_interval() {
    let (embedder, _) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());

    let err = pipeline.retrieve_with("q", 3, 1.5).await.unwrap_err();
    assert!(matches!(err, RagError::ConfigError(_)));
    let err = pipeline.retrieve_with("q", 3, -0.1).await.unwrap_err();
    assert!(matches!(err, RagError::ConfigError(_)));
}

#[tokio::test]
async fn rebuild_reports_documents_and_chunks() {
    let (embedder, documents) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());

    let report = pipeline.rebuild_index(&documents).await.unwrap();
    assert_eq!(report.documents_indexed, 3);
    // Each fixture document is shorter than chunk_size, so one chunk apiece.
    assert_eq!(report.total_chunks, 3);
    assert_eq!(report.sources, ["voyages.txt", "cargo.txt", "ports.txt"]);
    assert_eq!(pipeline.index_size().await, 3);
}

#[tokio::test]
async fn rebuild_from_source_lists_then_indexes() {
    let (embedder, documents) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());
    let source = StaticSource { documents };

    let report = pipeline.rebuild_from_source(&source).await.unwrap();
    assert_eq!(report.documents_indexed, 3);
    assert_eq!(pipeline.index_size().await, 3);
}

#[tokio::test]
async fn failing_source_leaves_previous_index_authoritative() {
    let (embedder, documents) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());
    pipeline.rebuild_index(&documents).await.unwrap();

    let err = pipeline.rebuild_from_source(&BrokenSource).await.unwrap_err();
    assert!(matches!(err, RagError::RebuildError(_)));
    assert_eq!(pipeline.index_size().await, 3);
}

#[tokio::test]
async fn embedding_failure_fails_rebuild_and_keeps_old_index() {
    let (embedder, documents) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());
    pipeline.rebuild_index(&documents).await.unwrap();

    // This document's text has no registered vector.
    let unknown = vec![KnowledgeDocument::new("new.txt", "unembeddable text")];
    let err = pipeline.rebuild_index(&unknown).await.unwrap_err();
    assert!(matches!(err, RagError::RebuildError(_)));
    assert_eq!(pipeline.index_size().await, 3);
}

#[tokio::test]
async fn embedding_failure_surfaces_on_retrieve() {
    let (embedder, _) = knowledge_fixture();
    let pipeline = pipeline_with(embedder, RagConfig::default());

    let err = pipeline.retrieve("text nobody registered").await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingUnavailable { .. }));
}

#[tokio::test]
async fn concurrent_rebuild_fails_fast() {
    let embedder = Arc::new(GatedEmbedder::default());
    let pipeline = Arc::new(pipeline_with(embedder.clone(), RagConfig::default()));
    let documents = vec![KnowledgeDocument::new("a.txt", "hello there")];

    let background = {
        let pipeline = Arc::clone(&pipeline);
        let documents = documents.clone();
        tokio::spawn(async move { pipeline.rebuild_index(&documents).await })
    };

    // Wait until the first rebuild is parked inside the embedder, holding
    // the rebuild guard.
    embedder.entered.notified().await;

    let err = pipeline.rebuild_index(&documents).await.unwrap_err();
    assert!(matches!(err, RagError::RebuildInProgress));

    embedder.release.notify_one();
    background.await.unwrap().unwrap();

    // Once the first rebuild finishes, a new one may start.
    embedder.release.notify_one();
    let second = {
        let pipeline = Arc::clone(&pipeline);
        let documents = documents.clone();
        tokio::spawn(async move { pipeline.rebuild_index(&documents).await })
    };
    embedder.entered.notified().await;
    second.await.unwrap().unwrap();
}

fn generation(source_id: &str, count: usize) -> Vec<IndexEntry> {
    (0..count)
        .map(|i| IndexEntry {
            chunk: Chunk {
                chunk_id: format!("{source_id}_{i}"),
                source_id: source_id.to_string(),
                text: format!("chunk {i}"),
                offset: i,
            },
            vector: vec![1.0, i as f32],
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queries_racing_a_rebuild_never_observe_a_mixed_index() {
    let index = Arc::new(InMemoryVectorIndex::new());
    index.rebuild(generation("old", 32)).await.unwrap();

    let writer = {
        let index = Arc::clone(&index);
        tokio::spawn(async move {
            for round in 0..100 {
                let source = if round % 2 == 0 { "new" } else { "old" };
                index.rebuild(generation(source, 32)).await.unwrap();
            }
        })
    };

    let reader = {
        let index = Arc::clone(&index);
        tokio::spawn(async move {
            for _ in 0..200 {
                let results = index.query(&[1.0, 0.5], 32).await.unwrap();
                assert_eq!(results.len(), 32);
                let sources: HashSet<&str> =
                    results.iter().map(|r| r.chunk.source_id.as_str()).collect();
                assert_eq!(sources.len(), 1, "query observed a mixed old/new index");
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}
