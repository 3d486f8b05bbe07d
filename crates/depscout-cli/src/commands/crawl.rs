use anyhow::bail;
use clap::Args;
use depscout_api::RankingClient;
use depscout_core::{
    providers::PyPIProvider, Config, CrawlReport, Exporter, FailureKind, Resolver, SeedList,
};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::progress;

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Extra seed package, resolved first (repeatable)
    #[arg(short, long = "seed", value_name = "NAME")]
    pub seeds: Vec<String>,

    /// Take seeds from a requirements.txt
    #[arg(short, long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Skip the popularity ranking and use only explicit seeds
    #[arg(long)]
    pub no_top: bool,

    /// Only take the first N ranked packages
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Directory for the exported tables (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also write the crawl report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

pub async fn run(config: &Config, args: CrawlArgs) -> anyhow::Result<()> {
    let seeds = collect_seeds(config, &args).await?;
    if seeds.is_empty() {
        bail!("No seed packages; pass --seed, --requirements or drop --no-top");
    }
    info!("Crawling from {} seeds", seeds.len());

    let provider = PyPIProvider::from_config(&config.registry, &config.retry)?;
    let mut resolver = Resolver::new(provider);

    let pb = progress::progress_bar(seeds.len() as u64, "seeds");
    for seed in seeds.iter() {
        pb.set_message(seed.to_string());
        resolver.resolve(seed).await;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (graph, report) = resolver.finish();

    let mut export = config.export.clone();
    if let Some(dir) = args.output {
        export.output_dir = dir;
    }
    let paths = Exporter::write_all(&graph, &export)?;

    if let Some(path) = &args.report {
        Exporter::write_report(&report, path)?;
    }

    print_summary(&report);
    println!("Packages:     {}", paths.packages.display());
    println!("Dependencies: {}", paths.dependencies.display());
    println!("Cypher:       {}", paths.cypher.display());

    Ok(())
}

/// Seeds in priority order: flags, requirements file, config extras, ranking
async fn collect_seeds(config: &Config, args: &CrawlArgs) -> anyhow::Result<SeedList> {
    let mut seeds = SeedList::new();
    seeds.extend(&args.seeds);

    if let Some(path) = &args.requirements {
        let names = depscout_deps::read_requirements_file(path)?;
        info!("{} seeds from {}", names.len(), path.display());
        seeds.extend(names);
    }

    seeds.extend(&config.seeds.extra);

    if !args.no_top {
        let limit = args.limit.or(config.seeds.limit);
        let client = RankingClient::new(
            config.seeds.top_packages_url.clone(),
            config.registry.timeout(),
            &config.registry.user_agent,
        )?
        .with_retry_config(config.retry.to_retry_config());

        match client.top_packages(limit).await {
            Ok(names) => seeds.extend(names),
            // Explicit seeds are still worth crawling without the ranking
            Err(e) => warn!("Could not fetch ranked packages: {}", e),
        }
    }

    Ok(seeds)
}

fn print_summary(report: &CrawlReport) {
    println!("Seeds:        {}", report.seeds);
    println!("Visited:      {}", report.visited);
    println!("Packages:     {} nodes", report.nodes);
    println!("Edges:        {}", report.edges);
    println!(
        "Failures:     {} ({} not found, {} transient)",
        report.failures.len(),
        report.failure_count(FailureKind::NotFound),
        report.failure_count(FailureKind::Transient)
    );
    println!("Took:         {}s", report.duration().num_seconds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(seeds: &[&str], requirements: Option<PathBuf>) -> CrawlArgs {
        CrawlArgs {
            seeds: seeds.iter().map(|s| s.to_string()).collect(),
            requirements,
            no_top: true,
            limit: None,
            output: None,
            report: None,
        }
    }

    #[tokio::test]
    async fn test_seed_order_flags_then_requirements_then_extras() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# pinned").unwrap();
        writeln!(file, "Requests>=2.0").unwrap();
        writeln!(file, "-r other.txt").unwrap();
        writeln!(file, "click").unwrap();

        let mut config = Config::default();
        config.seeds.extra = vec!["  Tomni ".to_string(), "neo4j".to_string()];

        let args = args(&[" Flask ", "NUMPY"], Some(file.path().to_path_buf()));
        let seeds = collect_seeds(&config, &args).await.unwrap();

        let got: Vec<String> = seeds.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            got,
            vec!["flask", "numpy", "requests", "click", "tomni", "neo4j"]
        );
    }

    #[tokio::test]
    async fn test_no_top_without_explicit_seeds_is_empty() {
        let mut config = Config::default();
        config.seeds.extra.clear();

        let seeds = collect_seeds(&config, &args(&["   "], None)).await.unwrap();
        assert!(seeds.is_empty());
    }

    #[tokio::test]
    async fn test_missing_requirements_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&[], Some(dir.path().join("nope.txt")));

        assert!(collect_seeds(&Config::default(), &args).await.is_err());
    }
}
