//! `irkun` command-line interface.

use clap::{Parser, Subcommand};
use futures::StreamExt;
use irkun::{
    Company, CompanyOutcome, DEFAULT_YEARS, DataError, FinancialsPipeline, FinancialsStore,
    FiscalYearRecord, Metric, Settings, TagResolver, TagTable, default_companies, extract_financials,
    extract_xbrl, find_company, normalize,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Label used by `parse` when no fiscal year is given.
const UNKNOWN_YEAR: &str = "不明";

#[derive(Debug, Parser)]
#[command(name = "irkun")]
#[command(about = "Collects annual-report financials from EDINET", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch annual reports from EDINET and update financials.json
    Fetch {
        /// Only process this company id
        #[arg(long)]
        company: Option<String>,

        /// Number of past years to collect
        #[arg(long, default_value_t = DEFAULT_YEARS)]
        years: u32,

        /// Print results without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Companies processed concurrently
        #[arg(long, default_value = "1")]
        jobs: usize,

        /// JSON file overriding the candidate tags per metric
        #[arg(long)]
        tags: Option<PathBuf>,
    },

    /// List the tracked companies
    Companies,

    /// Parse a local .xbrl instance or EDINET .zip archive and print the record
    Parse {
        /// Instance or archive path
        file: PathBuf,

        /// Fiscal year label of the record, e.g. 2025年3月期
        #[arg(long)]
        year: Option<String>,

        /// JSON file overriding the candidate tags per metric
        #[arg(long)]
        tags: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Fetch {
            company,
            years,
            dry_run,
            jobs,
            tags,
        } => fetch(company.as_deref(), years, dry_run, jobs, tags.as_deref()).await?,
        Commands::Companies => list_companies(),
        Commands::Parse { file, year, tags } => {
            let resolver = load_resolver(tags.as_deref())?;
            let record = parse_file(&file, &resolver, year.as_deref().unwrap_or(UNKNOWN_YEAR))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

fn load_resolver(tags: Option<&Path>) -> irkun::Result<TagResolver> {
    let Some(path) = tags else {
        return Ok(TagResolver::default());
    };
    let table = TagTable::from_json(&std::fs::read_to_string(path)?)?;
    info!(path = %path.display(), "Loaded tag table");
    Ok(TagResolver::new(table))
}

async fn fetch(
    company: Option<&str>,
    years: u32,
    dry_run: bool,
    jobs: usize,
    tags: Option<&Path>,
) -> irkun::Result<()> {
    // Configuration errors surface here, before any request is made.
    let settings = Settings::from_env()?;

    let registry = default_companies();
    let targets: Vec<Company> = match company {
        Some(id) => vec![find_company(&registry, id)?.clone()],
        None => registry,
    };

    let pipeline = FinancialsPipeline::new(Arc::new(settings.edinet_client()?))
        .with_resolver(load_resolver(tags)?)
        .with_years(years);

    println!("=== EDINET financials ===");
    println!("Companies: {}, years: {years}", targets.len());
    if dry_run {
        println!("Dry run: nothing will be written");
    }
    println!();

    let mut updated = Vec::new();
    let mut failures = 0usize;
    let mut results = pipeline.process_all(&targets, jobs);
    while let Some((company, result)) = results.next().await {
        match result {
            Ok(CompanyOutcome::Updated(financials)) => {
                let years: Vec<&str> = financials.years().collect();
                println!("[{}] OK: {} ({})", company.id, company.name, years.join(", "));
                updated.push(financials);
            }
            Ok(CompanyOutcome::Skipped(reason)) => {
                println!("[{}] SKIP: {} ({reason})", company.id, company.name);
                failures += 1;
            }
            Err(e) => {
                println!("[{}] ERROR: {} ({e})", company.id, company.name);
                failures += 1;
            }
        }
    }

    println!();
    println!("=== Done: {} success / {failures} failure ===", updated.len());

    if dry_run || updated.is_empty() {
        return Ok(());
    }

    // Completion order depends on --jobs; write in registry order.
    updated.sort_by_key(|f| targets.iter().position(|c| c.id == f.company_id));

    let store = settings.store();
    let total = store.upsert(&updated).await?;
    println!(
        "Updated {} ({total} companies)",
        store.financials_path().display()
    );

    let ids: Vec<_> = updated.iter().map(|f| f.company_id.clone()).collect();
    let changed = store.mark_full_data(&ids).await?;
    if changed > 0 {
        println!(
            "Set hasFullData on {changed} companies in {}",
            store.companies_path().display()
        );
    }

    Ok(())
}

fn list_companies() {
    for company in default_companies() {
        println!(
            "{:<12} {}  {}",
            company.id.as_str(),
            company.security_code.as_str(),
            company.name
        );
    }
}

/// Reads an XBRL instance, unpacking it first if the file is a zip archive.
fn read_instance(path: &Path) -> irkun::Result<String> {
    let bytes = std::fs::read(path)?;
    if bytes.starts_with(b"PK\x03\x04") {
        return extract_xbrl(&bytes)
            .ok_or_else(|| DataError::Archive(format!("no XBRL instance in {}", path.display())));
    }
    let text = String::from_utf8(bytes)
        .map_err(|e| DataError::Parse(format!("{} is not UTF-8: {e}", path.display())))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn parse_file(path: &Path, resolver: &TagResolver, year: &str) -> irkun::Result<FiscalYearRecord> {
    let xml = read_instance(path)?;
    let figures = extract_financials(&xml, resolver)?;
    for metric in Metric::ALL {
        if let Some(figure) = figures.get(metric) {
            info!(
                metric = metric.as_str(),
                tag = %figure.tag,
                context = ?figure.context,
                value = figure.value,
                "Selected"
            );
        }
    }
    if !figures.has_income_statement() {
        return Err(DataError::Parse(format!(
            "no revenue or operating profit in {}",
            path.display()
        )));
    }
    Ok(normalize(&figures, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INSTANCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
    xmlns:jppfs_cor="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2024-11-01/jppfs_cor">
  <jppfs_cor:NetSales contextRef="CurrentYearDuration" unitRef="JPY">18543210000</jppfs_cor:NetSales>
  <jppfs_cor:OperatingIncome contextRef="CurrentYearDuration" unitRef="JPY">926000000</jppfs_cor:OperatingIncome>
</xbrli:xbrl>"#;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["irkun", "fetch"]).unwrap();
        match cli.command {
            Commands::Fetch {
                company,
                years,
                dry_run,
                jobs,
                tags,
            } => {
                assert_eq!(company, None);
                assert_eq!(years, 5);
                assert!(!dry_run);
                assert_eq!(jobs, 1);
                assert_eq!(tags, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fetch_options() {
        let cli = Cli::try_parse_from([
            "irkun", "fetch", "--company", "litalico", "--years", "3", "--dry-run", "--jobs", "4",
        ])
        .unwrap();
        let Commands::Fetch {
            company,
            years,
            dry_run,
            jobs,
            ..
        } = cli.command
        else {
            panic!("expected fetch");
        };
        assert_eq!(company.as_deref(), Some("litalico"));
        assert_eq!(years, 3);
        assert!(dry_run);
        assert_eq!(jobs, 4);
    }

    #[test]
    fn test_parse_requires_file() {
        assert!(Cli::try_parse_from(["irkun", "parse"]).is_err());
    }

    #[test]
    fn test_parse_file_normalizes() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(INSTANCE.as_bytes());
        let file = write_temp(&bytes);

        let record = parse_file(file.path(), &TagResolver::default(), "2025年3月期").unwrap();
        assert_eq!(record.year, "2025年3月期");
        assert_eq!(record.revenue, Some(18_543));
        assert_eq!(record.operating_profit, Some(926));
        assert_eq!(record.operating_margin, Some(5.0));
        assert_eq!(record.roe, None);
    }

    #[test]
    fn test_parse_file_without_income_statement() {
        let file = write_temp(b"<xbrl/>");
        let err = parse_file(file.path(), &TagResolver::default(), UNKNOWN_YEAR).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_broken_archive_is_archive_error() {
        let file = write_temp(b"PK\x03\x04 truncated");
        assert!(matches!(read_instance(file.path()), Err(DataError::Archive(_))));
    }

    #[test]
    fn test_tag_override_file() {
        let tags = write_temp(br#"{"revenue": ["jppfs_cor:OperatingIncome"]}"#);
        let resolver = load_resolver(Some(tags.path())).unwrap();
        let file = write_temp(INSTANCE.as_bytes());

        let record = parse_file(file.path(), &resolver, UNKNOWN_YEAR).unwrap();
        assert_eq!(record.revenue, Some(926));
    }
}
