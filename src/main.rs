//! box_client CLI - Interact with the Box file-storage API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use box_client::BoxClient;

/// CLI tool for interacting with the Box API.
#[derive(Parser)]
#[command(name = "box_client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bearer access token.
    #[arg(long, env = "BOX_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get information about a folder.
    Get {
        /// Folder ID.
        folder: String,
    },

    /// List the items in a folder.
    List {
        /// Folder ID.
        folder: String,

        /// Comma-separated list of attributes to include.
        #[arg(long)]
        fields: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Create a folder.
    Create {
        /// Name of the new folder.
        name: String,

        /// Parent folder ID.
        #[arg(long, short = 'p', default_value = "0")]
        parent: String,
    },

    /// Copy a folder into another folder.
    Copy {
        /// Folder ID to copy.
        folder: String,

        /// Destination parent folder ID.
        #[arg(long, short = 'p')]
        parent: String,

        /// Optional name for the copy.
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a folder.
    Delete {
        /// Folder ID.
        folder: String,

        /// Also delete the folder's contents.
        #[arg(long)]
        recursive: bool,

        /// Etag for an if-match conditional delete.
        #[arg(long)]
        etag: Option<String>,
    },

    /// List the items in the trash.
    Trash {
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        offset: Option<u32>,
    },

    /// Get a file's metadata.
    File {
        /// File ID.
        file: String,

        /// Comma-separated list of attributes to include.
        #[arg(long)]
        fields: Option<String>,
    },

    /// Upload a local file into a folder.
    Upload {
        /// Path to the local file.
        path: PathBuf,

        /// Destination folder ID.
        #[arg(long, short = 't')]
        to: String,

        /// Name on the server (defaults to the local file name).
        #[arg(long)]
        name: Option<String>,
    },

    /// Download a file's content.
    Download {
        /// File ID.
        file: String,

        /// Local destination path.
        #[arg(long, short = 't')]
        to: PathBuf,

        /// Specific file version to download.
        #[arg(long)]
        version: Option<String>,
    },

    /// Delete a file.
    DeleteFile {
        /// File ID.
        file: String,

        /// Etag for an if-match conditional delete.
        #[arg(long)]
        etag: Option<String>,
    },

    /// Look up a shared item by its shared link.
    Shared {
        /// The shared link.
        link: String,

        /// Password for the shared link.
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let client = BoxClient::new(cli.token).context("Failed to build client")?;

    match cli.command {
        Commands::Get { folder } => {
            let value = client
                .get_folder(&folder)
                .await
                .with_context(|| format!("Failed to get folder: {}", folder))?;
            print_json(&value)?;
        }

        Commands::List {
            folder,
            fields,
            limit,
            offset,
        } => {
            let value = client
                .get_folder_items(&folder, fields.as_deref(), limit, offset)
                .await
                .with_context(|| format!("Failed to list folder: {}", folder))?;
            print_json(&value)?;
        }

        Commands::Create { name, parent } => {
            let value = client
                .create_folder(&name, &parent)
                .await
                .with_context(|| format!("Failed to create folder: {}", name))?;
            print_json(&value)?;
        }

        Commands::Copy {
            folder,
            parent,
            name,
        } => {
            let value = client
                .copy_folder(&folder, &parent, name.as_deref())
                .await
                .with_context(|| format!("Failed to copy folder: {}", folder))?;
            print_json(&value)?;
        }

        Commands::Delete {
            folder,
            recursive,
            etag,
        } => {
            client
                .delete_folder(&folder, recursive, etag.as_deref())
                .await
                .with_context(|| format!("Failed to delete folder: {}", folder))?;
            println!("Deleted folder {}", folder);
        }

        Commands::Trash { limit, offset } => {
            let value = client
                .get_trash_items(None, limit, offset)
                .await
                .context("Failed to list trash")?;
            print_json(&value)?;
        }

        Commands::File { file, fields } => {
            let value = client
                .get_file(&file, fields.as_deref())
                .await
                .with_context(|| format!("Failed to get file: {}", file))?;
            print_json(&value)?;
        }

        Commands::Upload { path, to, name } => {
            let name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .with_context(|| format!("Invalid file path: {:?}", path))?,
            };

            print!("Uploading {}... ", name);
            let value = client
                .upload_file(&name, &to, &path)
                .await
                .with_context(|| format!("Failed to upload {:?}", path))?;
            println!("OK");
            print_json(&value)?;
        }

        Commands::Download { file, to, version } => {
            print!("Downloading {}... ", file);
            let bytes = client
                .download_file(&file, version.as_deref())
                .await
                .with_context(|| format!("Failed to download file: {}", file))?;
            std::fs::write(&to, &bytes)
                .with_context(|| format!("Failed to write to {:?}", to))?;
            println!("OK");
            println!("Saved {} bytes to {:?}", bytes.len(), to);
        }

        Commands::DeleteFile { file, etag } => {
            client
                .delete_file(&file, etag.as_deref())
                .await
                .with_context(|| format!("Failed to delete file: {}", file))?;
            println!("Deleted file {}", file);
        }

        Commands::Shared { link, password } => {
            let value = client
                .get_shared_item(&link, password.as_deref(), None)
                .await
                .with_context(|| format!("Failed to resolve shared link: {}", link))?;
            print_json(&value)?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
