use crate::config::ExportConfig;
use crate::models::DependencyGraph;
use crate::resolver::CrawlReport;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the generated Cypher script, next to the tables
pub const CYPHER_FILE: &str = "load.cypher";

/// Where [`Exporter::write_all`] put things
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub packages: PathBuf,
    pub dependencies: PathBuf,
    pub cypher: PathBuf,
}

/// Serializes a crawl result for bulk import into a graph store
pub struct Exporter;

impl Exporter {
    /// Write the package table, the edge table and the Cypher script
    pub fn write_all(graph: &DependencyGraph, config: &ExportConfig) -> Result<ExportPaths> {
        let dir = &config.output_dir;
        fs::create_dir_all(dir).map_err(|e| {
            Error::ExportError(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let paths = ExportPaths {
            packages: dir.join(&config.packages_file),
            dependencies: dir.join(&config.dependencies_file),
            cypher: dir.join(CYPHER_FILE),
        };

        Self::write_file(&paths.packages, &Self::packages_csv(graph))?;
        Self::write_file(&paths.dependencies, &Self::dependencies_csv(graph))?;
        Self::write_file(&paths.cypher, &Self::cypher_script(config))?;

        info!(
            "Wrote {} packages and {} dependencies to {}",
            graph.node_count(),
            graph.edge_count(),
            dir.display()
        );

        Ok(paths)
    }

    /// Write a crawl report as pretty JSON
    pub fn write_report<P: AsRef<Path>>(report: &CrawlReport, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        Self::write_file(path.as_ref(), &json)
    }

    fn write_file(path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Package table: `name,license,size`, empty size when unknown
    pub fn packages_csv(graph: &DependencyGraph) -> String {
        let mut output = String::from("name,license,size\n");

        for node in graph.nodes() {
            output.push_str(&format!(
                "{},{},{}\n",
                Self::escape_csv(&node.name),
                Self::escape_csv(&node.license),
                node.size.map(|s| s.to_string()).unwrap_or_default(),
            ));
        }

        output
    }

    /// Edge table: `from,to`
    pub fn dependencies_csv(graph: &DependencyGraph) -> String {
        let mut output = String::from("from,to\n");

        for edge in graph.edges() {
            output.push_str(&format!(
                "{},{}\n",
                Self::escape_csv(&edge.from),
                Self::escape_csv(&edge.to)
            ));
        }

        output
    }

    /// Bulk-load statements, in the order they must run
    ///
    /// The CSV files are referenced by name only; the graph store reads
    /// them from its own import directory. Edges whose target has no
    /// package row are dropped by the `MATCH`.
    pub fn cypher_statements(config: &ExportConfig) -> Vec<String> {
        vec![
            "CREATE CONSTRAINT packageName IF NOT EXISTS \
             FOR (n:package) REQUIRE n.name IS UNIQUE"
                .to_string(),
            format!(
                "LOAD CSV WITH HEADERS FROM 'file:///{}' AS row \
                 MERGE (n:package {{name: row.name}}) \
                 SET n.license = row.license, n.packageSize = toInteger(row.size)",
                config.packages_file
            ),
            format!(
                "LOAD CSV WITH HEADERS FROM 'file:///{}' AS row \
                 MATCH (p1:package {{name: row.`from`}}) \
                 MATCH (p2:package {{name: row.`to`}}) \
                 MERGE (p1)-[:DEPENDS_ON]->(p2)",
                config.dependencies_file
            ),
        ]
    }

    /// The statements as a script runnable with `cypher-shell -f`
    pub fn cypher_script(config: &ExportConfig) -> String {
        let mut script = String::new();
        for statement in Self::cypher_statements(config) {
            script.push_str(&statement);
            script.push_str(";\n\n");
        }
        script
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DependencyEdge, PackageNode};

    fn create_test_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        graph.add_node(PackageNode {
            name: "requests".to_string(),
            license: "Apache-2.0".to_string(),
            size: Some(62574),
        });
        graph.add_node(PackageNode {
            name: "idna".to_string(),
            license: "BSD-3-Clause".to_string(),
            size: None,
        });
        graph.add_edge(DependencyEdge::new("requests", "idna"));
        graph.add_edge(DependencyEdge::new("requests", "missing"));
        graph
    }

    #[test]
    fn test_packages_csv() {
        let csv = Exporter::packages_csv(&create_test_graph());
        assert_eq!(
            csv,
            "name,license,size\nrequests,Apache-2.0,62574\nidna,BSD-3-Clause,\n"
        );
    }

    #[test]
    fn test_dependencies_csv_keeps_dangling_edges() {
        let csv = Exporter::dependencies_csv(&create_test_graph());
        assert_eq!(csv, "from,to\nrequests,idna\nrequests,missing\n");
    }

    #[test]
    fn test_cypher_statements_reference_configured_files() {
        let config = ExportConfig {
            packages_file: "p.csv".to_string(),
            dependencies_file: "d.csv".to_string(),
            ..Default::default()
        };
        let statements = Exporter::cypher_statements(&config);

        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE CONSTRAINT"));
        assert!(statements[1].contains("'file:///p.csv'"));
        assert!(statements[2].contains("'file:///d.csv'"));
        assert!(statements[2].contains("DEPENDS_ON"));
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().join("import"),
            ..Default::default()
        };

        let paths = Exporter::write_all(&create_test_graph(), &config).unwrap();

        let packages = fs::read_to_string(&paths.packages).unwrap();
        assert!(packages.starts_with("name,license,size\n"));
        assert!(paths.dependencies.ends_with("all_dependencies.csv"));
        let script = fs::read_to_string(&paths.cypher).unwrap();
        assert_eq!(script.matches(";\n").count(), 3);
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(Exporter::escape_csv("simple"), "simple");
        assert_eq!(Exporter::escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(Exporter::escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
