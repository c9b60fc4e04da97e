//! `gbif` - command line access to the GBIF species and name parser APIs
//!
//! Prints results as pretty JSON on stdout; logs go to stderr.

mod config;
mod error;

use std::future::Future;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gbif_species::{
    MatchRequest, NameInput, Page, Paging, Rank, ReqwestTransport, SearchParameter,
    SearchRequest, SpeciesClient, SuggestRequest, UsageFilter,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;
use crate::error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "gbif")]
#[command(about = "Query the GBIF species and name parser APIs")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// API root, overrides GBIF_API_ROOT
    #[arg(long, global = true, value_name = "URL")]
    root: Option<String>,

    /// API version, overrides GBIF_API_VERSION
    #[arg(long, global = true, value_name = "VERSION")]
    api_version: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get a name usage by key
    Get {
        key: u64,
        /// Language for the vernacular name (e.g. en, de)
        #[arg(long)]
        language: Option<String>,
    },
    /// Get the parsed name of a usage
    Name { key: u64 },
    /// List child usages
    Children {
        key: u64,
        #[arg(long)]
        language: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List synonyms
    Synonyms {
        key: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List all parents, highest rank first
    Parents { key: u64 },
    /// List vernacular names
    Vernacular {
        key: u64,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Full text search over name usages
    Search {
        q: Option<String>,
        #[arg(long)]
        rank: Vec<Rank>,
        #[arg(long, value_name = "UUID")]
        dataset_key: Vec<String>,
        /// Facet to count (rank, status, datasetKey, ...)
        #[arg(long, value_parser = parse_facet)]
        facet: Vec<SearchParameter>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Autocomplete scientific names
    Suggest {
        q: String,
        #[arg(long)]
        rank: Option<Rank>,
        /// Taxonomic status (e.g. ACCEPTED)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Fuzzy match a name against the backbone
    Match {
        name: String,
        #[arg(long)]
        kingdom: Option<String>,
        #[arg(long)]
        rank: Option<Rank>,
        /// Only match exactly on the given name
        #[arg(long)]
        strict: bool,
        /// Include alternative matches
        #[arg(long)]
        verbose: bool,
    },
    /// Parse scientific names into their components
    Parse {
        names: Vec<String>,
        /// Read raw newline separated names from a file
        #[arg(long, value_name = "PATH", conflicts_with = "names")]
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct PagingArgs {
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    limit: i64,
    /// Follow pages until the last one and print all records
    #[arg(long)]
    all: bool,
}

fn parse_facet(s: &str) -> std::result::Result<SearchParameter, String> {
    let parameter = match s {
        "datasetKey" => SearchParameter::DatasetKey,
        "constituentKey" => SearchParameter::ConstituentKey,
        "rank" => SearchParameter::Rank,
        "highertaxonKey" => SearchParameter::HigherTaxonKey,
        "status" => SearchParameter::Status,
        "isExtinct" => SearchParameter::IsExtinct,
        "habitat" => SearchParameter::Habitat,
        "threat" => SearchParameter::ThreatStatus,
        "nameType" => SearchParameter::NameType,
        "nomenclaturalStatus" => SearchParameter::NomenclaturalStatus,
        "origin" => SearchParameter::Origin,
        "issue" => SearchParameter::Issue,
        other => return Err(format!("unknown facet {:?}", other)),
    };
    Ok(parameter)
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_found<T: Serialize>(value: Option<T>) -> Result<()> {
    if value.is_none() {
        warn!("Record not found");
    }
    print(&value)
}

/// Fetch pages starting at `first` until the last one, keeping record order
async fn collect_pages<R, F, Fut>(first: Paging, fetch: F) -> gbif_species::Result<Vec<R>>
where
    F: Fn(Paging) -> Fut,
    Fut: Future<Output = gbif_species::Result<Page<R>>>,
{
    let mut records = Vec::new();
    let mut paging = Some(first);
    while let Some(current) = paging {
        let page = fetch(current).await?;
        debug!(
            offset = current.offset(),
            records = page.len(),
            "Fetched page"
        );
        paging = page.next_page();
        records.extend(page.into_results());
    }
    Ok(records)
}

/// Print one page, or with `--all` every record up to the last page
async fn listing<R, F, Fut>(args: &PagingArgs, fetch: F) -> Result<()>
where
    R: Serialize,
    F: Fn(Paging) -> Fut,
    Fut: Future<Output = gbif_species::Result<Page<R>>>,
{
    let first = Paging::new(args.offset, args.limit)?;
    if !args.all {
        return print(&fetch(first).await?);
    }

    let records = collect_pages(first, fetch).await?;
    info!("Fetched {} records", records.len());
    print(&records)
}

async fn run(client: &SpeciesClient<ReqwestTransport>, cmd: Command) -> Result<()> {
    match cmd {
        Command::Get { key, language } => {
            print_found(client.get_name_usage(key, language.as_deref()).await?)
        }
        Command::Name { key } => print_found(client.get_parsed_name(key).await?),
        Command::Children {
            key,
            language,
            paging,
        } => {
            let mut filter = UsageFilter::new();
            filter.language = language;
            let filter = &filter;
            listing(&paging, move |p| client.get_children(key, filter, p)).await
        }
        Command::Synonyms { key, paging } => {
            let filter = &UsageFilter::new();
            listing(&paging, move |p| client.get_synonyms(key, filter, p)).await
        }
        Command::Parents { key } => print(&client.get_parents(key, &UsageFilter::new()).await?),
        Command::Vernacular { key, paging } => {
            listing(&paging, move |p| client.get_vernacular_names(key, p)).await
        }
        Command::Search {
            q,
            rank,
            dataset_key,
            facet,
            paging,
        } => {
            let mut request = match q {
                Some(q) => SearchRequest::new(q),
                None => SearchRequest::all(),
            };
            for r in rank {
                request = request.rank(r);
            }
            for key in dataset_key {
                request = request.dataset_key(key);
            }
            for f in facet {
                request = request.facet(f);
            }
            let request = &request;
            listing(&paging, move |p| async move {
                client.search(&request.clone().paging(p)).await
            })
            .await
        }
        Command::Suggest {
            q,
            rank,
            status,
            limit,
        } => {
            let mut request = SuggestRequest::new(q);
            if let Some(rank) = rank {
                request = request.rank(rank);
            }
            if let Some(status) = status {
                request = request.status(status);
            }
            if let Some(limit) = limit {
                request = request.limit(limit);
            }
            print(&client.suggest(&request).await?)
        }
        Command::Match {
            name,
            kingdom,
            rank,
            strict,
            verbose,
        } => {
            let mut request = MatchRequest::new(name).strict(strict).verbose(verbose);
            if let Some(kingdom) = kingdom {
                request = request.kingdom(kingdom);
            }
            if let Some(rank) = rank {
                request = request.rank(rank);
            }
            let matched = client.match_name(&request).await?;
            if !matched.is_match() {
                warn!(name = %request.name, "No match found");
            }
            print(&matched)
        }
        Command::Parse { mut names, file } => {
            let input = match file {
                Some(path) => NameInput::Raw(std::fs::read_to_string(&path).map_err(|e| {
                    CliError::Config(format!("cannot read {}: {}", path.display(), e))
                })?),
                None if names.len() == 1 => NameInput::Single(names.remove(0)),
                None => NameInput::Batch(names),
            };
            print(&client.parse_names(&input).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("gbif=info".parse()?)
        .add_directive("gbif_species=info".parse()?);

    // Use JSON format for Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    let args = Args::parse();
    let config = Config::from_env()?.with_overrides(args.root, args.api_version);
    debug!(root = %config.root, version = %config.version, "Configuration loaded");

    let client = SpeciesClient::with_transport(
        config.api_config(),
        ReqwestTransport::with_timeout(config.timeout),
    );

    run(&client, args.cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gbif_species::GbifError;
    use std::sync::Mutex;

    fn numbered_page(paging: Paging, n: u64) -> Page<u64> {
        Page {
            offset: paging.offset(),
            limit: paging.limit(),
            end_of_records: None,
            count: None,
            results: (0..n).map(|i| paging.offset() + i).collect(),
            facets: vec![],
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_facet() {
        assert_eq!(parse_facet("rank"), Ok(SearchParameter::Rank));
        assert_eq!(parse_facet("threat"), Ok(SearchParameter::ThreatStatus));
        assert!(parse_facet("colour").is_err());
    }

    #[test]
    fn test_search_arguments() {
        let args = Args::try_parse_from([
            "gbif", "search", "Puma", "--rank", "SPECIES", "--rank", "genus", "--facet", "rank",
            "--limit", "5", "--all",
        ])
        .unwrap();
        match args.cmd {
            Command::Search {
                q,
                rank,
                facet,
                paging,
                ..
            } => {
                assert_eq!(q.as_deref(), Some("Puma"));
                assert_eq!(rank, vec![Rank::Species, Rank::Genus]);
                assert_eq!(facet, vec![SearchParameter::Rank]);
                assert_eq!(paging.limit, 5);
                assert!(paging.all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_overrides() {
        let args = Args::try_parse_from([
            "gbif",
            "get",
            "5231190",
            "--api-version",
            "v1.0",
        ])
        .unwrap();
        assert_eq!(args.api_version.as_deref(), Some("v1.0"));
        assert!(matches!(args.cmd, Command::Get { key: 5231190, .. }));
    }

    #[tokio::test]
    async fn test_collect_pages_stops_after_short_page() {
        let requested = Mutex::new(Vec::new());
        let records = collect_pages(Paging::new(0, 2).unwrap(), |paging| {
            requested.lock().unwrap().push(paging);
            let n = if paging.offset() == 0 { 2 } else { 1 };
            async move { Ok(numbered_page(paging, n)) }
        })
        .await
        .unwrap();

        assert_eq!(records, vec![0, 1, 2]);
        assert_eq!(
            *requested.lock().unwrap(),
            vec![Paging::new(0, 2).unwrap(), Paging::new(2, 2).unwrap()]
        );
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_error() {
        let calls = Mutex::new(0);
        let err = collect_pages(Paging::new(0, 2).unwrap(), |paging| {
            *calls.lock().unwrap() += 1;
            async move {
                if paging.offset() == 0 {
                    Ok(numbered_page(paging, 2))
                } else {
                    Err(GbifError::Status {
                        status: 503,
                        body: String::new(),
                    })
                }
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, GbifError::Status { status: 503, .. }));
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
