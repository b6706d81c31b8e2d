use std::fs::File;
use std::path::PathBuf;
use clap::Parser;
use desc_meetings::config::{Config, CONFIG_FILE_NAME};
use desc_meetings::parse_desc_meetings::crawl;
use desc_meetings::parse_util::HttpFetcher;
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Crawl the Detroit Employment Solutions Corporation public meetings and write them out as JSON.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, value_parser, default_value = CONFIG_FILE_NAME)]
    /// Settings file. Defaults are used if it does not exist.
    config: PathBuf,
    #[clap(short, long, value_parser)]
    /// Where to write the meetings. Standard output if not given.
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(env_filter))
        .init();
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let meetings = crawl(&fetcher,&config).await?;
    match &args.output {
        Some(path) => {
            serde_json::to_writer_pretty(File::create(path)?,&meetings)?;
            info!("Wrote {} meetings to {}",meetings.len(),path.display());
        }
        None => { serde_json::to_writer_pretty(std::io::stdout().lock(),&meetings)?; }
    }
    Ok(())
}
