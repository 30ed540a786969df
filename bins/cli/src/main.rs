//! SwiftMedia CLI
//!
//! Uploads and deletes media in an OpenStack Swift container using the same
//! provider a host application would.

#![allow(clippy::exit)]

mod cli;
mod media;

use std::collections::HashMap;

use anyhow::Context as _;
use clap::Parser;
use swiftmedia_core::provider::{MediaFile, SwiftProvider, UploadProvider};
use swiftmedia_shared::{AppConfig, AppError, AppResult, telemetry};
use tracing::info;

use crate::cli::{Cli, Commands};
use crate::media::{media_file_from_path, normalize_ext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.log)?;

    if let Err(err) = run(cli.command, &config).await {
        eprintln!("error[{}]: {err}", err.error_code());
        std::process::exit(err.exit_code());
    }

    Ok(())
}

async fn run(command: Commands, config: &AppConfig) -> AppResult<()> {
    let provider = SwiftProvider::init(&config.storage)?;

    match command {
        Commands::Upload { path, hash, mime } => {
            let mut file = media_file_from_path(&path, hash, mime).await?;
            provider.upload(&mut file).await?;
            let url = file
                .url
                .ok_or_else(|| AppError::Internal("upload returned no URL".into()))?;
            println!("{url}");
        }
        Commands::Delete { hash, ext } => {
            let file = MediaFile::new(hash, normalize_ext(ext.as_deref()).as_deref(), "");
            provider.delete(&file).await?;
            println!("deleted {}", provider.object_key(&file));
        }
        Commands::Put {
            path,
            key,
            content_type,
        } => {
            let headers: HashMap<String, String> = content_type
                .map(|ct| HashMap::from([("Content-Type".to_string(), ct)]))
                .unwrap_or_default();
            let url = provider
                .store()
                .upload_file(provider.container(), &path, &key, &headers)
                .await?;
            println!("{url}");
        }
        Commands::Url { hash, ext } => {
            let file = MediaFile::new(hash, normalize_ext(ext.as_deref()).as_deref(), "");
            let key = provider.object_key(&file);
            println!("{}", provider.store().object_url(provider.container(), &key));
        }
        Commands::Auth => {
            provider.store().ensure_token().await?;
            info!(endpoint = provider.store().endpoint(), "credential accepted");
            println!("authenticated");
        }
    }

    Ok(())
}
