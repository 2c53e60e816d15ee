mod batch;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use resolver_agent::EntityResolver;
use resolver_config::{init_tracing, CatalogConfig, LlmConfig};
use resolver_db::source_ids::{
    CsvSourceIdRepository, DataSource, PgSourceIdRepository, SourceIdRepository, DEFAULT_LIMIT,
};
use resolver_matching::{get_rubric, EntityType, ScoringMethod};

use crate::batch::run_batch;

/// Resolve a batch of source ids against the catalog and write one CSV row per id.
#[derive(Parser, Debug)]
#[command(name = "resolver-batch", version)]
struct Cli {
    /// Entity type to resolve: team or fixture.
    entity_type: EntityType,

    /// Where the source ids come from: csv or postgres.
    data_source: DataSource,

    /// CSV file path, or table name for postgres.
    source_input: String,

    /// Output CSV file.
    output_path: PathBuf,

    /// weighted or binary.
    #[arg(long, alias = "scoring_method", default_value = "weighted")]
    scoring_method: ScoringMethod,

    /// Maximum number of source ids to process.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
}

async fn open_source(cli: &Cli) -> anyhow::Result<Box<dyn SourceIdRepository>> {
    match cli.data_source {
        DataSource::Csv => Ok(Box::new(CsvSourceIdRepository::new(&cli.source_input))),
        DataSource::Postgres => {
            let url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set for the postgres data source")?;
            let pool = resolver_db::create_pool(&url).await?;
            Ok(Box::new(PgSourceIdRepository::new(pool, &cli.source_input)?))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(
        entity_type = %cli.entity_type,
        data_source = %cli.data_source,
        scoring_method = %cli.scoring_method,
        limit = cli.limit,
        "starting batch"
    );

    let source = open_source(&cli).await?;
    let ids = source.fetch_ids(cli.limit).await?;
    if ids.is_empty() {
        tracing::warn!(source = %source.source_name(), "no source ids found, halting");
        return Ok(());
    }

    let rubric = get_rubric(cli.entity_type, cli.scoring_method);
    let resolver = EntityResolver::from_config(
        &LlmConfig::from_env()?,
        &CatalogConfig::from_env()?,
        &rubric,
    )?;

    let mut writer = csv::Writer::from_path(&cli.output_path)
        .with_context(|| format!("cannot create {}", cli.output_path.display()))?;

    let summary = run_batch(&resolver, &ids, &mut writer).await?;
    tracing::info!(
        output = %cli.output_path.display(),
        processed = summary.processed,
        matched = summary.matched,
        no_match = summary.no_match,
        errors = summary.errors,
        "batch finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();
    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from([
            "resolver-batch",
            "team",
            "csv",
            "ids.csv",
            "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.entity_type, EntityType::Team);
        assert_eq!(cli.data_source, DataSource::Csv);
        assert_eq!(cli.scoring_method, ScoringMethod::Weighted);
        assert_eq!(cli.limit, 100);
        assert_eq!(cli.output_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn accepts_scoring_method_flag_and_alias() {
        for flag in ["--scoring-method", "--scoring_method"] {
            let cli = Cli::try_parse_from([
                "resolver-batch",
                "fixture",
                "postgres",
                "public.fixtures",
                "out.csv",
                flag,
                "binary",
                "--limit",
                "5",
            ])
            .unwrap();
            assert_eq!(cli.entity_type, EntityType::Fixture);
            assert_eq!(cli.scoring_method, ScoringMethod::Binary);
            assert_eq!(cli.limit, 5);
        }
    }

    #[test]
    fn rejects_unknown_entity_type() {
        assert!(Cli::try_parse_from(["resolver-batch", "player", "csv", "a", "b"]).is_err());
    }
}
