use anyhow::{bail, Result};
use clap::Parser;
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cascscraper::{
    fetch::urls::CASC_PUBLICATION_URL,
    lookup::IdLookup,
    merge, output,
    orgid::ORG_ID_PREFIX,
    pipeline::{self, PipelineOptions},
};

#[derive(Parser)]
#[command(name = "cascscraper")]
#[command(about = "Extract the register of Community Amateur Sports Clubs from HMRC and derive stable identifiers")]
#[command(version)]
struct Cli {
    /// Destination files; a `.csv` path produces the CSV artifact, a `.json`
    /// path the JSON one. Both may be given in a single run.
    #[arg(required = true)]
    outfile: Vec<PathBuf>,

    /// Publication page to scrape
    #[arg(long, default_value = CASC_PUBLICATION_URL)]
    url: String,

    /// Prefix for derived organisation ids
    #[arg(long, default_value = ORG_ID_PREFIX)]
    prefix: String,

    /// CSV of new_id,old_id pairs replacing derived ids with curated ones
    #[arg(long)]
    id_lookup: Option<PathBuf>,

    /// Previous published dataset (.csv or .json) to merge with
    #[arg(long)]
    merge: Option<PathBuf>,

    /// Write an id1,id2,name report of names shared by two ids
    #[arg(long)]
    name_match: Option<PathBuf>,

    /// Titlecase all-uppercase/all-lowercase organisation names
    #[arg(long)]
    titlecase: bool,
}

enum Artifact {
    Csv(PathBuf),
    Json(PathBuf),
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    // ─── 2) resolve output formats before doing any work ─────────────
    let mut artifacts = Vec::with_capacity(cli.outfile.len());
    for path in &cli.outfile {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => artifacts.push(Artifact::Csv(path.clone())),
            Some("json") => artifacts.push(Artifact::Json(path.clone())),
            _ => bail!("output path {} must end in .csv or .json", path.display()),
        }
    }

    // ─── 3) optional curated id lookup ───────────────────────────────
    let id_lookup = match &cli.id_lookup {
        Some(path) => IdLookup::from_csv(path)?,
        None => IdLookup::default(),
    };

    // ─── 4) scrape the register ──────────────────────────────────────
    let client = Client::new();
    let opts = PipelineOptions {
        page_url: cli.url.clone(),
        prefix: cli.prefix.clone(),
        titlecase: cli.titlecase,
        id_lookup,
    };
    let mut cascs = pipeline::fetch_cascs(&client, &opts).await?;

    // ─── 5) merge with the previous snapshot ─────────────────────────
    if let Some(path) = &cli.merge {
        let previous = merge::load_previous(path)?;
        info!("loaded {} existing cascs from {}", previous.len(), path.display());
        cascs = merge::merge(previous, cascs);
    }
    info!("found {} cascs", cascs.len());

    // ─── 6) reports and artifacts ────────────────────────────────────
    if let Some(path) = &cli.name_match {
        output::write_name_match(path, &cascs)?;
    }
    for artifact in &artifacts {
        match artifact {
            Artifact::Csv(path) => output::write_csv(path, &cascs)?,
            Artifact::Json(path) => output::write_json(path, &cascs)?,
        }
    }

    Ok(())
}
