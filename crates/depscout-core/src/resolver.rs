//! Recursive dependency resolution.
//!
//! Every name is looked up at most once per run: it is marked visited
//! before its metadata is fetched, which is also what stops cycles.
//! Traversal is depth-first over an explicit stack, so deep chains cannot
//! blow the call stack. Failed lookups are recorded and skipped, never
//! fatal.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use depscout_deps::dependency_names;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::license::License;
use crate::lookup::{LookupError, MetadataSource};
use crate::models::{DependencyEdge, DependencyGraph, PackageNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Transient,
}

/// A package whose lookup failed and that is therefore missing from the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    pub name: String,
    pub kind: FailureKind,
    pub message: String,
}

impl LookupFailure {
    fn new(name: &str, err: LookupError) -> Self {
        let kind = match err {
            LookupError::NotFound(_) => FailureKind::NotFound,
            LookupError::Transient(_) => FailureKind::Transient,
        };
        Self {
            name: name.to_string(),
            kind,
            message: err.to_string(),
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Seeds handed to the resolver, duplicates and already-visited included
    pub seeds: usize,
    /// Distinct names a lookup was attempted for
    pub visited: usize,
    pub nodes: usize,
    pub edges: usize,
    pub failures: Vec<LookupFailure>,
}

impl CrawlReport {
    pub fn failure_count(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// A package whose dependencies are still being walked
struct Frame {
    name: String,
    dependencies: Vec<String>,
    next: usize,
}

/// Owns all crawl state for one run: graph, visited set and failures
pub struct Resolver<S> {
    source: S,
    graph: DependencyGraph,
    visited: HashSet<String>,
    failures: Vec<LookupFailure>,
    seeds: usize,
    started_at: DateTime<Utc>,
}

impl<S: MetadataSource> Resolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            graph: DependencyGraph::new(),
            visited: HashSet::new(),
            failures: Vec::new(),
            seeds: 0,
            started_at: Utc::now(),
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn failures(&self) -> &[LookupFailure] {
        &self.failures
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Resolve every seed in order
    pub async fn resolve_all<I, T>(&mut self, seeds: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for seed in seeds {
            self.resolve(seed.as_ref()).await;
        }
    }

    /// Resolve `name` and everything reachable from it
    ///
    /// Empty and already-visited names are a no-op. Edges are emitted in
    /// declaration order, each one immediately followed by the walk of its
    /// target, exactly as a recursive descent would.
    pub async fn resolve(&mut self, name: &str) {
        self.seeds += 1;

        let Some(root) = self.visit(name).await else {
            return;
        };
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            let Some(dependency) = top.dependencies.get(top.next).cloned() else {
                stack.pop();
                continue;
            };
            top.next += 1;

            self.graph
                .add_edge(DependencyEdge::new(top.name.clone(), dependency.clone()));

            if let Some(frame) = self.visit(&dependency).await {
                stack.push(frame);
            }
        }
    }

    /// Mark `name` visited, look it up and store its node
    ///
    /// Returns the frame to expand, or `None` when there is nothing to do.
    async fn visit(&mut self, name: &str) -> Option<Frame> {
        if name.is_empty() || !self.visited.insert(name.to_string()) {
            return None;
        }

        debug!("Resolving {}", name);

        let metadata = match self.source.lookup(name).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Error with {}: {}", name, err);
                self.failures.push(LookupFailure::new(name, err));
                return None;
            }
        };

        self.graph.add_node(PackageNode {
            name: name.to_string(),
            license: License::classify(&metadata.license).to_string(),
            size: metadata.max_artifact_size(),
        });

        Some(Frame {
            name: name.to_string(),
            dependencies: dependency_names(&metadata.dependency_specifiers),
            next: 0,
        })
    }

    /// End the run and hand over the graph
    pub fn finish(self) -> (DependencyGraph, CrawlReport) {
        let report = CrawlReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            seeds: self.seeds,
            visited: self.visited.len(),
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            failures: self.failures,
        };

        info!(
            "Crawl finished: {} visited, {} packages, {} dependencies, {} failures",
            report.visited,
            report.nodes,
            report.edges,
            report.failures.len()
        );

        (self.graph, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{MockMetadataSource, PackageMetadata};

    fn metadata(deps: &[&str]) -> PackageMetadata {
        PackageMetadata {
            dependency_specifiers: deps.iter().map(|d| d.to_string()).collect(),
            artifact_sizes: vec![100],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_each_name_looked_up_once() {
        let mut source = MockMetadataSource::new();
        source
            .expect_lookup()
            .withf(|name| name == "a")
            .times(1)
            .returning(|_| Ok(metadata(&["b", "B (>=2)"])));
        source
            .expect_lookup()
            .withf(|name| name == "b")
            .times(1)
            .returning(|_| Ok(metadata(&["a"])));

        let mut resolver = Resolver::new(source);
        resolver.resolve_all(["a", "b", "a"]).await;

        let (graph, report) = resolver.finish();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.edges(),
            &[DependencyEdge::new("a", "b"), DependencyEdge::new("b", "a")]
        );
        assert_eq!(report.seeds, 3);
        assert_eq!(report.visited, 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_retried() {
        let mut source = MockMetadataSource::new();
        source
            .expect_lookup()
            .withf(|name| name == "gone")
            .times(1)
            .returning(|name| Err(LookupError::NotFound(name.to_string())));
        source
            .expect_lookup()
            .withf(|name| name == "root")
            .times(1)
            .returning(|_| Ok(metadata(&["gone"])));

        let mut resolver = Resolver::new(source);
        resolver.resolve_all(["gone", "root", "gone"]).await;

        assert!(resolver.is_visited("gone"));
        let (graph, report) = resolver.finish();
        assert!(!graph.contains("gone"));
        // Edge to a node-less package is still recorded
        assert_eq!(graph.edges(), &[DependencyEdge::new("root", "gone")]);
        assert_eq!(report.failure_count(FailureKind::NotFound), 1);
        assert_eq!(report.failures[0].name, "gone");
    }

    #[tokio::test]
    async fn test_empty_name_is_ignored() {
        let source = MockMetadataSource::new();
        let mut resolver = Resolver::new(source);

        resolver.resolve("").await;

        assert_eq!(resolver.visited_count(), 0);
        assert!(resolver.failures().is_empty());
    }

    #[tokio::test]
    async fn test_node_attributes_from_metadata() {
        let mut source = MockMetadataSource::new();
        source.expect_lookup().returning(|_| {
            let mut meta = metadata(&[]);
            meta.artifact_sizes = vec![5, 50, 20];
            meta.license.license = Some("BSD License".to_string());
            Ok(meta)
        });

        let mut resolver = Resolver::new(source);
        resolver.resolve("pkg").await;

        let node = resolver.graph().node("pkg").unwrap();
        assert_eq!(node.size, Some(50));
        assert_eq!(node.license, "BSD-3-Clause");
    }
}
