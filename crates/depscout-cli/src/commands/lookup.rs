use anyhow::Context;
use depscout_core::{providers::PyPIProvider, Config, License, MetadataSource};
use depscout_deps::{dependency_names, is_extra, package_name};
use serde::Serialize;

/// What a crawl would record for one package
#[derive(Debug, Serialize)]
struct LookupOutput {
    name: String,
    license: String,
    size: Option<u64>,
    dependencies: Vec<String>,
    extras: Vec<String>,
}

pub async fn run(config: &Config, name: &str) -> anyhow::Result<()> {
    let name = name.trim().to_lowercase();
    let provider = PyPIProvider::from_config(&config.registry, &config.retry)?;

    let metadata = provider
        .lookup(&name)
        .await
        .with_context(|| format!("Lookup of {} failed", name))?;

    let specs = &metadata.dependency_specifiers;
    let output = LookupOutput {
        license: License::classify(&metadata.license).to_string(),
        size: metadata.max_artifact_size(),
        dependencies: dependency_names(specs),
        extras: specs
            .iter()
            .filter(|s| is_extra(s))
            .map(|s| package_name(s))
            .collect(),
        name,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
