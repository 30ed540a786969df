//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "swiftmedia")]
#[command(about = "Upload media to OpenStack Swift", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a local file under its content-hash key
    Upload {
        /// File to upload
        path: PathBuf,

        /// Hash used in the object key (default: SHA-256 of the content)
        #[arg(long)]
        hash: Option<String>,

        /// MIME type (default: guessed from the extension)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Delete a previously uploaded file
    Delete {
        /// Hash the file was uploaded under
        hash: String,

        /// Extension the file was uploaded with, e.g. `.png`
        #[arg(long, short = 'e')]
        ext: Option<String>,
    },
    /// Upload a local file to an explicit object key
    Put {
        /// File to upload
        path: PathBuf,

        /// Object key inside the container
        key: String,

        /// Content type sent with the object
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Print the public URL of a file without contacting the server
    Url {
        /// Hash the file was uploaded under
        hash: String,

        /// Extension the file was uploaded with
        #[arg(long, short = 'e')]
        ext: Option<String>,
    },
    /// Check that the configured credential can obtain a token
    Auth,
}
