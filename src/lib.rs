//! DeltaMemory: Rust client for the DeltaMemory cognitive memory server.
//!
//! Provides a typed protocol client (ingest, recall, store, decay,
//! consolidate, reflect and collection management), a tenant-scoped
//! collection model, and tool adapters that expose the client to LLM
//! agent loops and to MCP hosts.
//!
//! # Quick Start
//!
//! ```no_run
//! use deltamemory::prelude::*;
//!
//! # async fn example() -> deltamemory::error::Result<()> {
//! let db = DeltaMemory::new(ClientConfig::default()).expect("valid config");
//!
//! let options = IngestOptions::builder().collection("hello-world").build();
//! db.ingest("I love TypeScript", options).await?;
//!
//! let options = RecallOptions::builder().collection("hello-world").build();
//! let recalled = db.recall("What do I love?", options).await?;
//! if let Some(top) = recalled.top() {
//!     println!("{}", top.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod client;
pub mod collection;
pub mod config;
pub mod error;
pub mod prelude;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::DeltaMemory;
pub use config::ClientConfig;
pub use error::{DeltaMemoryError, Result};
