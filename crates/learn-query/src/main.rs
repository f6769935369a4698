use std::path::PathBuf;

use clap::{Parser, Subcommand};
use learn_api::models::{ListItemsParams, ListParams};
use learn_query::groups::{learning_paths, learning_resources, users};
use learn_query::observability::init_observability;
use learn_query::{ConfigBuilder, LearnQuery, config};
use serde::Serialize;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "learn-query")]
#[command(about = "Read MIT Learn resources through the query cache", long_about = None)]
#[command(version)]
struct Args {
    /// API base URL, e.g. https://learn.mit.edu/api/
    #[arg(short, long, env = "LEARN_API_BASE_URL")]
    base_url: Option<String>,

    /// CSRF token sent with unsafe requests
    #[arg(long)]
    csrf_token: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable JSON logging output
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one learning resource
    Resource { id: i64 },
    /// List learning paths
    LearningPaths {
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List the items of a learning path
    PathItems {
        id: i64,
        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
        /// Follow `next` until the last page
        #[arg(long)]
        all: bool,
    },
    /// Show the current user
    Me,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // CLI values are the lowest layer: env > file > CLI > defaults
    let mut builder = ConfigBuilder::new().json_logs(args.json_logs);
    if let Some(ref url_str) = args.base_url {
        let url = Url::parse(url_str).map_err(|e| anyhow::anyhow!("Invalid base URL: {e}"))?;
        builder = builder.base_url(url);
    }
    if args.csrf_token.is_some() {
        builder = builder.csrf_token(args.csrf_token.clone());
    }
    if args.verbose {
        builder = builder.log_level("debug".to_string());
    }

    let builder = if let Some(ref path) = args.config {
        config::load_config_from_path(path, builder)?
    } else {
        config::load_config(builder)?
    };
    let config = builder.build()?;

    init_observability(&config.telemetry)?;
    tracing::info!(base_url = %config.api.base_url, "starting");

    let lq = LearnQuery::from_config(&config)?;

    match args.command {
        Command::Resource { id } => {
            let resource = lq
                .client
                .fetch_query(&learning_resources::detail(&lq.api, Some(id)))
                .await?;
            print_json(&resource)?;
        }
        Command::LearningPaths { limit } => {
            let params = ListParams {
                limit,
                offset: None,
            };
            let paths = lq
                .client
                .fetch_query(&learning_paths::list(&lq.api, params))
                .await?;
            print_json(&paths)?;
        }
        Command::PathItems { id, limit, all } => {
            let def = learning_paths::items(&lq.api, id, ListItemsParams { limit, offset: None });
            let mut data = lq.client.fetch_infinite_query(&def).await?;
            while all && lq.client.has_next_page(def.key()) {
                data = lq.client.fetch_next_page(&def).await?;
            }
            tracing::debug!(pages = data.pages.len(), "loaded item pages");
            let items: Vec<_> = data.pages.into_iter().flat_map(|page| page.results).collect();
            print_json(&items)?;
        }
        Command::Me => {
            let user = lq.client.fetch_query(&users::me(&lq.api)).await?;
            print_json(&user)?;
        }
    }

    Ok(())
}
