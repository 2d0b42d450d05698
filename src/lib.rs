//! box_client - A client for the Box file-storage REST API.
//!
//! This library maps named operations (folders, files, metadata, sharing,
//! trash) onto documented REST endpoints through a static command table,
//! attaches bearer-token authentication to every request, and transforms
//! raw HTTP responses into decoded JSON values or typed errors.
//!
//! # Example
//!
//! ```no_run
//! use box_client::BoxClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BoxClient::new("access-token")?;
//!
//!     let folder = client.get_folder("0").await?;
//!     println!("{}", folder["name"]);
//!
//!     let created = client.create_folder("Reports", "0").await?;
//!     println!("created folder {}", created["id"]);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod commands;
pub mod error;
pub mod response;

// Re-exports for convenience
pub use client::{BoxClient, BoxClientBuilder, Params, SearchOptions};
pub use error::{BoxError, Result};
pub use response::Payload;
