use depscout_core::{providers::Neo4jStore, Config, Exporter, GraphLoader};

pub async fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Loading into {} ({})", config.neo4j.url, config.neo4j.database);

    let store = Neo4jStore::from_config(&config.neo4j, &config.registry.user_agent)?;
    let statements = Exporter::cypher_statements(&config.export);
    let ran = GraphLoader::new(store).load(&statements).await?;

    println!("Ran {} load statements against {}", ran, config.neo4j.url);
    Ok(())
}
