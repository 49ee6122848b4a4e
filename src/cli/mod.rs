//! CLI for DeltaMemory: one-shot operations and the MCP stdio server.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::client::DeltaMemory;
use crate::collection::{CollectionName, CollectionPrefix, TenantId, TenantScope};
use crate::config::{ClientConfig, ConfigLayer};
use crate::mcp::{serve_stdio, MemoryMcpServer};
use crate::types::{IngestOptions, MemoryType, RecallOptions, StoreOptions};

/// DeltaMemory CLI
#[derive(Parser, Debug)]
#[command(name = "deltamemory", version, about = "DeltaMemory cognitive memory client")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags; they override the config file and environment.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Server URL (env: DELTAMEMORY_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key (env: DELTAMEMORY_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Collection to operate on (env: DELTAMEMORY_COLLECTION)
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Request timeout in milliseconds (env: DELTAMEMORY_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log filter, e.g. `debug` or `deltamemory=trace` (default: RUST_LOG or info)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            base_url: self.url.clone(),
            api_key: self.api_key.clone(),
            default_collection: self.collection.clone(),
            timeout_ms: self.timeout_ms,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve memory tools over MCP (stdio)
    Mcp(McpArgs),
    /// Check server health
    Health,
    /// Show collection statistics
    Stats,
    /// Dump the knowledge graph
    Graph,
    /// Delete every memory in the collection
    Purge {
        /// Confirm the purge
        #[arg(long)]
        yes: bool,
    },
    /// Search memories
    Recall {
        query: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Ingest content with fact and concept extraction
    Ingest {
        content: String,
        #[arg(long)]
        speaker: Option<String>,
        /// ISO 8601 creation time
        #[arg(long)]
        datetime: Option<String>,
    },
    /// Store content without extraction
    Store {
        content: String,
        /// Conversation, Fact, Insight or Summary
        #[arg(long, default_value = "Conversation")]
        memory_type: MemoryType,
    },
    /// Fetch one memory
    Get { id: String },
    /// Delete one memory
    Delete { id: String },
    /// Apply salience decay
    Decay {
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Merge similar memories
    Consolidate {
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Generate insights from recent memories
    Reflect {
        #[arg(long)]
        window_size: Option<u32>,
    },
}

/// Arguments for `deltamemory mcp`.
#[derive(Args, Debug)]
pub struct McpArgs {
    /// Tenant id; serves the `<prefix>-<tenant>` collection
    #[arg(long)]
    pub tenant: Option<String>,

    /// Collection prefix used with --tenant
    #[arg(long, default_value = "user")]
    pub prefix: String,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn print_json(value: &impl Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one command against a client built from `config`.
pub async fn run(command: Commands, config: ClientConfig) -> CliResult {
    let client = DeltaMemory::new(config)?;

    match command {
        Commands::Mcp(args) => handle_mcp(args, client).await?,
        Commands::Health => print_json(&client.health().await?)?,
        Commands::Stats => print_json(&client.stats(None).await?)?,
        Commands::Graph => print_json(&client.graph(None).await?)?,
        Commands::Purge { yes } => {
            if !yes {
                return Err(format!(
                    "refusing to purge collection '{}' without --yes",
                    client.collection(None)
                )
                .into());
            }
            print_json(&client.purge(None).await?)?
        }
        Commands::Recall { query, limit } => {
            let options = RecallOptions::builder().maybe_limit(limit).build();
            print_json(&client.recall(&query, options).await?)?
        }
        Commands::Ingest {
            content,
            speaker,
            datetime,
        } => {
            let options = IngestOptions::builder()
                .maybe_speaker(speaker)
                .maybe_datetime(datetime)
                .build();
            print_json(&client.ingest(&content, options).await?)?
        }
        Commands::Store {
            content,
            memory_type,
        } => {
            let options = StoreOptions::builder().memory_type(memory_type).build();
            print_json(&client.store(&content, options).await?)?
        }
        Commands::Get { id } => print_json(&client.get(&id, None).await?)?,
        Commands::Delete { id } => {
            client.delete(&id, None).await?;
            print_json(&serde_json::json!({ "deleted": id }))?
        }
        Commands::Decay { rate } => print_json(&client.decay(rate, None).await?)?,
        Commands::Consolidate { threshold } => {
            print_json(&client.consolidate(threshold, None).await?)?
        }
        Commands::Reflect { window_size } => print_json(&client.reflect(window_size, None).await?)?,
    }
    Ok(())
}

async fn handle_mcp(args: McpArgs, client: DeltaMemory) -> CliResult {
    let client = Arc::new(client);
    let server = match args.tenant {
        Some(tenant) => {
            let prefix: CollectionPrefix = args.prefix.parse()?;
            let scope = TenantScope::new(prefix, TenantId::new(tenant)?)?;
            MemoryMcpServer::for_tenant(client, &scope)
        }
        None => {
            let collection = CollectionName::new(client.config().default_collection())?;
            MemoryMcpServer::new(client, collection)
        }
    };
    serve_stdio(server).await?;
    Ok(())
}
