//! Photo gallery commands.

use bytes::Bytes;
use clap::{Args, Subcommand};

use mandal_core::{AppError, AppResult};
use mandal_service::GalleryService;

use super::AppContext;

/// Arguments for gallery commands
#[derive(Debug, Args)]
pub struct GalleryArgs {
    /// Gallery subcommand
    #[command(subcommand)]
    pub command: GalleryCommand,
}

/// Gallery subcommands
#[derive(Debug, Subcommand)]
pub enum GalleryCommand {
    /// List gallery items, newest first
    List,
    /// Upload a photo
    Upload {
        /// Path to the image file
        file: std::path::PathBuf,
        /// Optional caption
        #[arg(short, long)]
        caption: Option<String>,
    },
    /// Remove a gallery item by row ID
    Remove {
        /// Row ID as shown by `gallery list`
        id: i64,
    },
}

/// Execute gallery commands
pub async fn execute(args: &GalleryArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.require_identity().await?;
    let service = GalleryService::new(ctx.rows.clone(), ctx.objects.clone());

    match &args.command {
        GalleryCommand::List => {
            for item in service.list().await? {
                println!(
                    "#{:<6} {}  {}",
                    item.id,
                    item.url,
                    item.caption.as_deref().unwrap_or("")
                );
            }
        }
        GalleryCommand::Upload { file, caption } => {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| AppError::validation("File name is required"))?;
            let data = tokio::fs::read(file)
                .await
                .map_err(|e| AppError::internal(format!("Failed to read '{}': {}", file.display(), e)))?;
            let item = service
                .upload(name, Bytes::from(data), caption.as_deref())
                .await?;
            println!("Uploaded #{}: {}", item.id, item.url);
        }
        GalleryCommand::Remove { id } => {
            let items = service.list().await?;
            let item = items
                .into_iter()
                .find(|item| item.id == *id)
                .ok_or_else(|| AppError::validation(format!("No gallery item with ID {}", id)))?;
            service.remove(&item).await?;
            println!("Removed #{}", id);
        }
    }
    Ok(())
}
